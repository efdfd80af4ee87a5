//! Host-platform socket primitives.
//!
//! A [`Connector`] opens the raw connection a sender writes to. The default
//! [`TokioConnector`] speaks plain TCP and UDP. TLS negotiation and
//! certificate validation belong to the host, so callers that need a secure
//! stream supply their own connector that returns an already-negotiated
//! stream.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use async_trait::async_trait;
use tokio::io::AsyncWrite;
use tokio::net::{TcpStream, UdpSocket, lookup_host};

/// Writable half of a stream connection.
pub type ByteStream = Box<dyn AsyncWrite + Send + Unpin>;

/// Connected datagram endpoint: each call sends exactly one datagram.
#[async_trait]
pub trait DatagramSocket: Send + Sync {
    async fn send_datagram(&self, bytes: &[u8]) -> io::Result<usize>;
}

#[async_trait]
impl DatagramSocket for UdpSocket {
    async fn send_datagram(&self, bytes: &[u8]) -> io::Result<usize> {
        self.send(bytes).await
    }
}

/// Opens connections for a [`SyslogSender`](super::SyslogSender).
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a stream to `host:port`. `secure` asks for an encrypted channel.
    async fn connect_stream(&self, host: &str, port: u16, secure: bool) -> io::Result<ByteStream>;

    /// Bind a local datagram socket associated with `host:port`.
    async fn connect_datagram(&self, host: &str, port: u16)
    -> io::Result<Box<dyn DatagramSocket>>;
}

/// Plain TCP/UDP connector backed by tokio.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioConnector;

#[async_trait]
impl Connector for TokioConnector {
    async fn connect_stream(&self, host: &str, port: u16, secure: bool) -> io::Result<ByteStream> {
        if secure {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "TokioConnector does not negotiate TLS; supply a TLS-capable Connector",
            ));
        }
        let stream = TcpStream::connect((host, port)).await?;
        Ok(Box::new(stream))
    }

    async fn connect_datagram(
        &self,
        host: &str,
        port: u16,
    ) -> io::Result<Box<dyn DatagramSocket>> {
        let target = lookup_host((host, port)).await?.next().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address found for {}:{}", host, port),
            )
        })?;
        // Bind to the unspecified address of the peer's family.
        let local: SocketAddr = match target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(target).await?;
        tracing::debug!(
            target = %target,
            local = ?socket.local_addr().ok(),
            "UDP socket bound"
        );
        Ok(Box::new(socket))
    }
}
