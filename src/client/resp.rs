//! RESP connection over TCP, optionally wrapped in TLS

use std::fmt;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;

use crate::client::codec::{encode_command, read_value};
use crate::client::commands::vocabulary;
use crate::client::traits::Connection;
use crate::core::{Config, Reply, ReplError, Result};

/// Byte stream a [`RespConnection`] can run over
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// Connection to a Redis-compatible server
pub struct RespConnection {
    stream: Option<BufStream<Box<dyn Transport>>>,
    commands: Vec<String>,
}

impl fmt::Debug for RespConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RespConnection")
            .field("open", &self.stream.is_some())
            .field("commands", &self.commands.len())
            .finish()
    }
}

impl RespConnection {
    /// Open a connection and complete the handshake.
    ///
    /// Any failure here (refused, TLS, AUTH) is a connection error.
    pub async fn connect(config: &Config) -> Result<Self> {
        let addr = config.addr();
        tracing::debug!(%addr, tls = config.server.tls, "connecting");

        let tcp = TcpStream::connect(&addr)
            .await
            .map_err(|e| ReplError::connection(format!("could not connect to {}: {}", addr, e)))?;

        let transport: Box<dyn Transport> = if config.server.tls {
            let connector = tokio_native_tls::TlsConnector::from(native_tls::TlsConnector::new()?);
            Box::new(connector.connect(&config.server.host, tcp).await?)
        } else {
            Box::new(tcp)
        };

        let mut connection = Self::from_transport(transport, vocabulary());
        connection.handshake(config.server.password.as_deref()).await?;
        tracing::info!(%addr, "connected");
        Ok(connection)
    }

    /// Wrap an already-open transport
    pub fn from_transport(transport: Box<dyn Transport>, commands: Vec<String>) -> Self {
        Self {
            stream: Some(BufStream::new(transport)),
            commands,
        }
    }

    /// Authenticate if needed, then confirm the server answers
    pub async fn handshake(&mut self, password: Option<&str>) -> Result<()> {
        if let Some(password) = password {
            self.send_command("AUTH", &[password.to_string()])
                .await
                .map_err(|e| ReplError::connection(format!("authentication failed: {}", e)))?;
        }
        self.send_command("PING", &[])
            .await
            .map_err(|e| match e {
                ReplError::Server(msg) => ReplError::connection(msg),
                other => other,
            })?;
        Ok(())
    }
}

#[async_trait]
impl Connection for RespConnection {
    fn commands(&self) -> Vec<String> {
        self.commands.clone()
    }

    async fn send_command(&mut self, name: &str, args: &[String]) -> Result<Option<Reply>> {
        let stream = self.stream.as_mut().ok_or(ReplError::Closed)?;

        let request = encode_command(name, args);
        let written = async {
            stream.write_all(&request).await?;
            stream.flush().await
        };
        if let Err(e) = written.await {
            self.detach();
            return Err(ReplError::connection(format!("write failed: {}", e)));
        }

        // After a bad frame the read buffer no longer lines up with the
        // server's replies, so the connection cannot be reused.
        match read_value(stream).await {
            Ok(value) => value.into_reply(),
            Err(e) => {
                self.detach();
                Err(match e {
                    ReplError::Protocol(msg) => {
                        ReplError::connection(format!("protocol error: {}", msg))
                    }
                    ReplError::Io(e) => ReplError::connection(format!("read failed: {}", e)),
                    other => other,
                })
            }
        }
    }

    fn detach(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("connection detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    fn connection(mock: tokio_test::io::Mock) -> RespConnection {
        RespConnection::from_transport(Box::new(mock), vec!["get".to_string()])
    }

    #[tokio::test]
    async fn test_send_command_round_trip() {
        let mock = Builder::new()
            .write(b"*2\r\n$3\r\nGET\r\n$3\r\nkey\r\n")
            .read(b"$5\r\nvalue\r\n")
            .build();
        let mut conn = connection(mock);

        let reply = conn.send_command("GET", &["key".to_string()]).await.unwrap();
        assert_eq!(reply, Some(Reply::text("value")));
    }

    #[tokio::test]
    async fn test_handshake_with_password() {
        let mock = Builder::new()
            .write(b"*2\r\n$4\r\nAUTH\r\n$6\r\nsecret\r\n")
            .read(b"+OK\r\n")
            .write(b"*1\r\n$4\r\nPING\r\n")
            .read(b"+PONG\r\n")
            .build();
        let mut conn = connection(mock);

        conn.handshake(Some("secret")).await.unwrap();
    }

    #[tokio::test]
    async fn test_auth_failure_is_connection_error() {
        let mock = Builder::new()
            .write(b"*2\r\n$4\r\nAUTH\r\n$3\r\nbad\r\n")
            .read(b"-WRONGPASS invalid password\r\n")
            .build();
        let mut conn = connection(mock);

        let err = conn.handshake(Some("bad")).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("WRONGPASS"));
    }

    #[tokio::test]
    async fn test_detached_connection_is_closed() {
        let mut conn = connection(Builder::new().build());
        conn.detach();

        let err = conn.send_command("PING", &[]).await.unwrap_err();
        assert!(matches!(err, ReplError::Closed));
    }

    #[tokio::test]
    async fn test_bad_frame_ends_connection() {
        let mock = Builder::new()
            .write(b"*2\r\n$3\r\nGET\r\n$1\r\na\r\n")
            .read(b"$2\r\nabXY\r\n+OK\r\n")
            .build();
        let mut conn = connection(mock);

        let err = conn.send_command("GET", &["a".to_string()]).await.unwrap_err();
        assert!(matches!(err, ReplError::Connection(_)));
        assert!(err.is_fatal());

        // The leftover bytes are never read as the next reply
        let err = conn.send_command("GET", &["k".to_string()]).await.unwrap_err();
        assert!(matches!(err, ReplError::Closed));
    }

    #[tokio::test]
    async fn test_eof_inside_bulk_string_is_fatal() {
        let mock = Builder::new()
            .write(b"*2\r\n$3\r\nGET\r\n$1\r\na\r\n")
            .read(b"$10\r\nabc")
            .build();
        let mut conn = connection(mock);

        let err = conn.send_command("GET", &["a".to_string()]).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("read failed"));
    }

    #[tokio::test]
    async fn test_oversized_reply_is_fatal() {
        let mock = Builder::new()
            .write(b"*1\r\n$4\r\nPING\r\n")
            .read(b"*9223372036854775807\r\n")
            .build();
        let mut conn = connection(mock);

        let err = conn.send_command("PING", &[]).await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_server_error_keeps_connection() {
        let mock = Builder::new()
            .write(b"*2\r\n$4\r\nINCR\r\n$1\r\nk\r\n")
            .read(b"-ERR not an integer\r\n")
            .write(b"*1\r\n$4\r\nPING\r\n")
            .read(b"+PONG\r\n")
            .build();
        let mut conn = connection(mock);

        let err = conn.send_command("INCR", &["k".to_string()]).await.unwrap_err();
        assert!(!err.is_fatal());
        let reply = conn.send_command("PING", &[]).await.unwrap();
        assert_eq!(reply, Some(Reply::text("PONG")));
    }

    #[test]
    fn test_commands_reports_vocabulary() {
        let conn = connection(Builder::new().build());
        assert_eq!(conn.commands(), vec!["get".to_string()]);
    }
}
