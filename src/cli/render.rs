//! Reply rendering
//!
//! Strings that happen to be JSON documents are shown as structured data;
//! everything else that is a string prints verbatim.

use std::io::{self, Write};

use colored::Colorize;
use serde_json::Value;

use crate::core::Reply;

const INDENT: &str = "  ";

/// Display form chosen for a reply
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Plain(String),
    Structured(Value),
}

/// Decide how a reply should be shown. `None` means print nothing.
pub fn classify(reply: &Reply) -> Option<Rendered> {
    match reply {
        Reply::Text(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Null) => None,
            Ok(value) => Some(Rendered::Structured(value)),
            Err(_) => Some(Rendered::Plain(s.clone())),
        },
        Reply::Value(Value::Null) => None,
        Reply::Value(value) => Some(Rendered::Structured(value.clone())),
    }
}

/// Format a rendered reply, optionally with ANSI colors
pub fn format(rendered: &Rendered, color: bool) -> String {
    match rendered {
        Rendered::Plain(s) => s.clone(),
        Rendered::Structured(value) => {
            let mut out = String::new();
            write_value(&mut out, value, 0, color);
            out
        }
    }
}

/// Write a reply to `out`, followed by a newline
pub fn render<W: Write>(out: &mut W, reply: &Reply, color: bool) -> io::Result<()> {
    match classify(reply) {
        Some(rendered) => writeln!(out, "{}", format(&rendered, color)),
        None => Ok(()),
    }
}

fn paint(text: &str, color: bool, style: fn(&str) -> colored::ColoredString) -> String {
    if color {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

fn scalar(value: &Value, color: bool) -> String {
    // Scalars only; containers are handled by write_value
    let text = value.to_string();
    match value {
        Value::String(_) => paint(&text, color, |s| s.green()),
        Value::Number(_) => paint(&text, color, |s| s.yellow()),
        Value::Bool(_) => paint(&text, color, |s| s.magenta()),
        _ => paint(&text, color, |s| s.dimmed()),
    }
}

fn write_value(out: &mut String, value: &Value, depth: usize, color: bool) {
    let pad = INDENT.repeat(depth + 1);
    let close = INDENT.repeat(depth);

    match value {
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                out.push_str(&pad);
                write_value(out, item, depth + 1, color);
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(&close);
            out.push(']');
        }
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                out.push_str(&pad);
                let quoted = Value::String(key.clone()).to_string();
                out.push_str(&paint(&quoted, color, |s| s.cyan()));
                out.push_str(": ");
                write_value(out, item, depth + 1, color);
                if i + 1 < map.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(&close);
            out.push('}');
        }
        _ => out.push_str(&scalar(value, color)),
    }
}
