//! RESP request encoding and reply decoding

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::core::{Reply, ReplError, Result};

/// Largest bulk string a server may send (proto-max-bulk-len)
pub const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Upper bound on array capacity reserved ahead of reading the elements
const ARRAY_PREALLOC: i64 = 1024;

/// A decoded RESP2 frame
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Option<Vec<u8>>),
    Array(Option<Vec<RespValue>>),
}

/// Encode a command as an array of bulk strings
pub fn encode_command(name: &str, args: &[String]) -> Vec<u8> {
    let mut buf = format!("*{}\r\n", args.len() + 1).into_bytes();
    for part in std::iter::once(name).chain(args.iter().map(String::as_str)) {
        buf.extend_from_slice(format!("${}\r\n", part.len()).as_bytes());
        buf.extend_from_slice(part.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    buf
}

async fn read_line<R>(reader: &mut R) -> Result<String>
where
    R: AsyncBufRead + Unpin + Send,
{
    let mut line = Vec::new();
    let n = reader.read_until(b'\n', &mut line).await?;
    if n == 0 {
        return Err(ReplError::connection("server closed the connection"));
    }
    if !line.ends_with(b"\r\n") {
        return Err(ReplError::protocol("line not terminated by CRLF"));
    }
    line.truncate(line.len() - 2);
    String::from_utf8(line).map_err(|_| ReplError::protocol("invalid UTF-8 in header line"))
}

fn parse_len(s: &str) -> Result<i64> {
    s.parse()
        .map_err(|_| ReplError::protocol(format!("invalid length {:?}", s)))
}

/// Read one complete frame, recursing into arrays
pub fn read_value<'a, R>(reader: &'a mut R) -> BoxFuture<'a, Result<RespValue>>
where
    R: AsyncBufRead + Unpin + Send,
{
    async move {
        let line = read_line(reader).await?;
        let mut chars = line.chars();
        let kind = chars
            .next()
            .ok_or_else(|| ReplError::protocol("empty frame"))?;
        let rest = chars.as_str();

        match kind {
            '+' => Ok(RespValue::Simple(rest.to_string())),
            '-' => Ok(RespValue::Error(rest.to_string())),
            ':' => Ok(RespValue::Integer(parse_len(rest)?)),
            '$' => {
                let len = parse_len(rest)?;
                if len < 0 {
                    return Ok(RespValue::Bulk(None));
                }
                if len > MAX_BULK_LEN {
                    return Err(ReplError::protocol(format!(
                        "bulk length {} exceeds {}",
                        len, MAX_BULK_LEN
                    )));
                }
                let mut data = vec![0u8; len as usize + 2];
                reader.read_exact(&mut data).await?;
                if !data.ends_with(b"\r\n") {
                    return Err(ReplError::protocol("bulk string not terminated by CRLF"));
                }
                data.truncate(len as usize);
                Ok(RespValue::Bulk(Some(data)))
            }
            '*' => {
                let len = parse_len(rest)?;
                if len < 0 {
                    return Ok(RespValue::Array(None));
                }
                let mut items = Vec::with_capacity(len.min(ARRAY_PREALLOC) as usize);
                for _ in 0..len {
                    items.push(read_value(reader).await?);
                }
                Ok(RespValue::Array(Some(items)))
            }
            other => Err(ReplError::protocol(format!("unknown frame type {:?}", other))),
        }
    }
    .boxed()
}

fn to_json(value: RespValue) -> Value {
    match value {
        RespValue::Simple(s) | RespValue::Error(s) => Value::String(s),
        RespValue::Integer(n) => Value::from(n),
        RespValue::Bulk(Some(data)) => Value::String(String::from_utf8_lossy(&data).into_owned()),
        RespValue::Bulk(None) | RespValue::Array(None) => Value::Null,
        RespValue::Array(Some(items)) => Value::Array(items.into_iter().map(to_json).collect()),
    }
}

impl RespValue {
    /// Convert a top-level frame into a reply.
    ///
    /// Error frames become [`ReplError::Server`]; nil becomes `None`.
    pub fn into_reply(self) -> Result<Option<Reply>> {
        match self {
            RespValue::Error(msg) => Err(ReplError::server(msg)),
            RespValue::Simple(s) => Ok(Some(Reply::Text(s))),
            RespValue::Bulk(Some(data)) => Ok(Some(Reply::Text(
                String::from_utf8_lossy(&data).into_owned(),
            ))),
            RespValue::Bulk(None) | RespValue::Array(None) => Ok(None),
            other => Ok(Some(Reply::Value(to_json(other)))),
        }
    }
}
