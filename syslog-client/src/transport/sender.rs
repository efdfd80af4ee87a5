//! Sender state machine.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::config::{DEFAULT_CONNECT_TIMEOUT_SECS, SenderConfig};
use crate::error::{Error, Result};
use crate::framing::Framing;
use crate::message::SyslogMessage;
use crate::serializer::MessageSerializer;

use super::connector::{ByteStream, Connector, DatagramSocket, TokioConnector};
use super::{Capabilities, SenderState, TransportProtocol};

/// Number of payload bytes shown in the first-send log line.
const PREVIEW_LEN: usize = 64;

enum Channel {
    Stream(ByteStream),
    Datagram(Box<dyn DatagramSocket>),
}

/// Delivers serialized syslog messages over UDP, TCP or TLS.
///
/// A sender owns its connection exclusively and is driven through `&mut self`,
/// so operations on one instance never overlap. Every operation observes the
/// sender's [`CancellationToken`]: it is checked before connecting and before
/// each write, and raced against connect, write and flush.
///
/// If cancellation or an I/O error interrupts a stream write, the connection
/// is dropped and the sender returns to [`SenderState::Disconnected`]; a
/// partly written frame is never followed by more data.
///
/// # Example
///
/// ```no_run
/// use syslog_client::{
///     Facility, Framing, Rfc5424Serializer, Severity, SyslogMessage, SyslogSender,
/// };
///
/// # async fn run() -> syslog_client::Result<()> {
/// let mut sender = SyslogSender::tcp("collector.example.com", 601, Framing::OctetCounting);
/// sender.connect().await?;
///
/// let msg = SyslogMessage::builder(Facility::Auth, Severity::Notice)
///     .host_name("web01")
///     .app_name("login")
///     .message("user admin logged in")
///     .build_rfc5424()?;
/// sender.send(&msg, &Rfc5424Serializer::default()).await?;
/// sender.disconnect().await
/// # }
/// ```
pub struct SyslogSender {
    host: String,
    port: u16,
    protocol: TransportProtocol,
    framing: Framing,
    connect_timeout: Option<Duration>,
    connector: Arc<dyn Connector>,
    cancel: CancellationToken,
    state: SenderState,
    channel: Option<Channel>,
    sent_cnt: u64,
}

impl SyslogSender {
    /// Build a sender from validated configuration.
    pub fn new(config: &SenderConfig) -> Result<Self> {
        config.validate()?;
        let mut sender = Self::checked(
            config.host.clone(),
            config.port,
            config.protocol,
            config.framing,
        )?;
        sender.connect_timeout = config.connect_timeout();
        Ok(sender)
    }

    /// Connectionless UDP sender. Datagrams are never framed.
    pub fn udp(host: impl Into<String>, port: u16) -> Self {
        Self::unchecked(host.into(), port, TransportProtocol::Udp, Framing::default())
    }

    /// Plain TCP sender with the given framing.
    pub fn tcp(host: impl Into<String>, port: u16, framing: Framing) -> Self {
        Self::unchecked(host.into(), port, TransportProtocol::Tcp, framing)
    }

    /// TLS sender. Only octet counting is accepted.
    pub fn tls(host: impl Into<String>, port: u16, framing: Framing) -> Result<Self> {
        Self::checked(host.into(), port, TransportProtocol::Tls, framing)
    }

    fn checked(
        host: String,
        port: u16,
        protocol: TransportProtocol,
        framing: Framing,
    ) -> Result<Self> {
        if protocol.capabilities().supports_secure && framing == Framing::NonTransparent {
            return Err(Error::invalid_configuration(
                "Non-transparent framing can not be used with TLS transport",
            ));
        }
        Ok(Self::unchecked(host, port, protocol, framing))
    }

    fn unchecked(host: String, port: u16, protocol: TransportProtocol, framing: Framing) -> Self {
        Self {
            host,
            port,
            protocol,
            framing,
            connect_timeout: Some(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            connector: Arc::new(TokioConnector),
            cancel: CancellationToken::new(),
            state: SenderState::Disconnected,
            channel: None,
            sent_cnt: 0,
        }
    }

    /// Use a custom connector, e.g. one that negotiates TLS.
    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    /// Observe `token` for cancellation.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Limit how long `connect` may take. `None` waits indefinitely.
    pub fn with_connect_timeout(mut self, limit: Option<Duration>) -> Self {
        self.connect_timeout = limit;
        self
    }

    /// Replace the cancellation token, e.g. after a cancelled operation.
    pub fn set_cancellation_token(&mut self, token: CancellationToken) {
        self.cancel = token;
    }

    /// A handle to the token this sender observes.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> SenderState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == SenderState::Connected
    }

    pub fn protocol(&self) -> TransportProtocol {
        self.protocol
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    pub fn capabilities(&self) -> Capabilities {
        self.protocol.capabilities()
    }

    /// `host:port` of the collector.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Messages written since the sender was created.
    pub fn messages_sent(&self) -> u64 {
        self.sent_cnt
    }

    /// Establish the connection (bind the local socket for UDP).
    ///
    /// Does nothing when already connected. On failure the sender stays
    /// disconnected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.state == SenderState::Connected {
            tracing::debug!(endpoint = %self.endpoint(), "Already connected");
            return Ok(());
        }
        self.check_cancelled()?;

        self.state = SenderState::Connecting;
        match self.open_channel().await {
            Ok(channel) => {
                self.channel = Some(channel);
                self.state = SenderState::Connected;
                tracing::info!(
                    endpoint = %self.endpoint(),
                    protocol = %self.protocol,
                    framing = %self.framing,
                    "Syslog sender connected"
                );
                Ok(())
            }
            Err(e) => {
                self.channel = None;
                self.state = SenderState::Disconnected;
                tracing::warn!(
                    endpoint = %self.endpoint(),
                    error = %e,
                    "Syslog sender connect failed"
                );
                Err(e)
            }
        }
    }

    async fn open_channel(&self) -> Result<Channel> {
        let caps = self.capabilities();
        let connect = async {
            if caps.connectionless {
                self.connector
                    .connect_datagram(&self.host, self.port)
                    .await
                    .map(Channel::Datagram)
            } else {
                self.connector
                    .connect_stream(&self.host, self.port, caps.supports_secure)
                    .await
                    .map(Channel::Stream)
            }
        };
        let bounded = async {
            match self.connect_timeout {
                Some(limit) => timeout(limit, connect).await.unwrap_or_else(|_| {
                    Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("connect timed out after {:?}", limit),
                    ))
                }),
                None => connect.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            result = bounded => result.map_err(|e| {
                Error::transport_io(format!("Failed to connect to {}", self.endpoint()), e)
            }),
        }
    }

    /// Release the connection.
    ///
    /// Calling this while disconnected is a no-op. A stream is shut down
    /// gracefully; if that fails the error is returned but the connection is
    /// released regardless.
    pub async fn disconnect(&mut self) -> Result<()> {
        let Some(channel) = self.channel.take() else {
            self.state = SenderState::Disconnected;
            return Ok(());
        };

        self.state = SenderState::Disconnecting;
        let result = match channel {
            Channel::Stream(mut stream) => stream.shutdown().await,
            Channel::Datagram(_) => Ok(()),
        };
        self.state = SenderState::Disconnected;

        tracing::info!(
            endpoint = %self.endpoint(),
            sent = self.sent_cnt,
            "Syslog sender disconnected"
        );
        result.map_err(|e| Error::transport_io("Failed to close connection", e))
    }

    /// Disconnect, then connect again. A no-op for UDP.
    ///
    /// A failure while closing the old connection is logged and does not
    /// prevent the new connection attempt.
    pub async fn reconnect(&mut self) -> Result<()> {
        if self.capabilities().connectionless {
            return Ok(());
        }
        if let Err(e) = self.disconnect().await {
            tracing::warn!(
                endpoint = %self.endpoint(),
                error = %e,
                "Error closing connection before reconnect"
            );
        }
        self.connect().await
    }

    /// Serialize, frame and write one message, then flush.
    pub async fn send(
        &mut self,
        message: &SyslogMessage,
        serializer: &dyn MessageSerializer,
    ) -> Result<()> {
        self.ensure_connected()?;
        self.write_message(message, serializer).await?;
        self.flush().await
    }

    /// Write messages in order and flush once at the end.
    ///
    /// The first failure aborts the batch; messages written before it are not
    /// recalled.
    pub async fn send_batch<'a, I>(
        &mut self,
        messages: I,
        serializer: &dyn MessageSerializer,
    ) -> Result<()>
    where
        I: IntoIterator<Item = &'a SyslogMessage>,
    {
        self.ensure_connected()?;
        let mut count = 0usize;
        for message in messages {
            self.write_message(message, serializer).await?;
            count += 1;
        }
        self.flush().await?;
        tracing::debug!(endpoint = %self.endpoint(), records = count, "Syslog batch sent");
        Ok(())
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.state != SenderState::Connected || self.channel.is_none() {
            return Err(Error::not_connected());
        }
        Ok(())
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    async fn write_message(
        &mut self,
        message: &SyslogMessage,
        serializer: &dyn MessageSerializer,
    ) -> Result<()> {
        self.check_cancelled()?;

        let payload = serializer.serialize(message);
        let unit = if self.capabilities().can_frame {
            self.framing.frame(&payload)
        } else {
            payload
        };

        if self.sent_cnt == 0 {
            tracing::info!(
                protocol = %self.protocol,
                msg_len = unit.len(),
                preview = %String::from_utf8_lossy(&unit[..unit.len().min(PREVIEW_LEN)]),
                "Syslog sender first-send"
            );
        }

        self.write_unit(&unit).await?;
        self.sent_cnt = self.sent_cnt.saturating_add(1);
        tracing::trace!(seq = self.sent_cnt, bytes = unit.len(), "Syslog message written");
        Ok(())
    }

    async fn write_unit(&mut self, unit: &[u8]) -> Result<()> {
        let cancel = &self.cancel;
        let (outcome, is_stream) = match self.channel.as_mut() {
            None => return Err(Error::not_connected()),
            Some(Channel::Datagram(socket)) => {
                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(Error::Cancelled),
                    result = socket.send_datagram(unit) => result
                        .map(|_| ())
                        .map_err(|e| Error::transport_io("Failed to send datagram", e)),
                };
                (outcome, false)
            }
            Some(Channel::Stream(stream)) => {
                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(Error::Cancelled),
                    result = stream.write_all(unit) => result
                        .map_err(|e| Error::transport_io("Failed to write to stream", e)),
                };
                (outcome, true)
            }
        };

        if is_stream && let Err(e) = &outcome {
            self.drop_stream(e);
        }
        outcome
    }

    async fn flush(&mut self) -> Result<()> {
        let cancel = &self.cancel;
        let outcome = match self.channel.as_mut() {
            None => return Err(Error::not_connected()),
            Some(Channel::Datagram(_)) => return Ok(()),
            Some(Channel::Stream(stream)) => tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(Error::Cancelled),
                result = stream.flush() => result
                    .map_err(|e| Error::transport_io("Failed to flush stream", e)),
            },
        };

        if let Err(e) = &outcome
            && e.is_transport()
        {
            self.drop_stream(e);
        }
        outcome
    }

    // The frame on the wire may be incomplete; the stream must not be reused.
    fn drop_stream(&mut self, cause: &Error) {
        self.channel = None;
        self.state = SenderState::Disconnected;
        tracing::warn!(
            endpoint = %self.endpoint(),
            error = %cause,
            "Stream write interrupted, connection released"
        );
    }
}

impl fmt::Debug for SyslogSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyslogSender")
            .field("endpoint", &self.endpoint())
            .field("protocol", &self.protocol)
            .field("framing", &self.framing)
            .field("state", &self.state)
            .field("sent", &self.sent_cnt)
            .finish()
    }
}
