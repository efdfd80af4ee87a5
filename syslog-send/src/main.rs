//! Command-line syslog sender.
//!
//! Sends the message given on the command line, or one message per stdin
//! line, to a syslog collector over UDP, TCP or TLS.

mod args;
mod compose;
mod config;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use syslog_client::{SyslogSender, init_tracing};
use tokio_util::sync::CancellationToken;

use args::{DEFAULT_CONFIG_PATH, SendArgs};
use compose::{MessageTemplate, read_lines};
use config::SendConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let args = SendArgs::parse();

    // An explicit --config must exist; the default file is optional.
    let mut config = match &args.config {
        Some(path) => SendConfig::load_from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            SendConfig::load_from_file(DEFAULT_CONFIG_PATH)?
        }
        None => SendConfig::default(),
    };
    args.apply_overrides(&mut config);
    config.validate()?;

    init_tracing(&config.logging)?;

    let texts = match args.message_text() {
        Some(text) => vec![text],
        None => read_lines(tokio::io::stdin())
            .await
            .context("Failed to read messages from stdin")?,
    };
    if texts.is_empty() {
        tracing::warn!("No message text given, nothing to send");
        return Ok(());
    }

    let template = MessageTemplate::resolve(&config.message, &args);
    let messages = template.build_all(&texts)?;
    let serializer = match config.message.encoding {
        Some(encoding) => template.format.build(encoding),
        None => template.format.build_default(),
    };

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling");
            ctrl_c_token.cancel();
        }
    });

    let mut sender = SyslogSender::new(&config.sender)?.with_cancellation(cancel);
    tracing::info!(
        endpoint = %sender.endpoint(),
        protocol = %sender.protocol(),
        format = %template.format,
        messages = messages.len(),
        "Sending syslog messages"
    );

    sender.connect().await?;
    let result = sender.send_batch(&messages, serializer.as_ref()).await;
    if let Err(e) = sender.disconnect().await {
        tracing::warn!(error = %e, "Failed to close connection cleanly");
    }
    result?;

    tracing::info!(sent = sender.messages_sent(), "Done");
    Ok(())
}
