//! CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;
use syslog_client::{Facility, Framing, SerializerKind, Severity, TextEncoding, TransportProtocol};

use crate::config::SendConfig;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_PATH: &str = "syslog-send.json5";

/// Send syslog messages to a remote collector.
///
/// Message text comes from the positional arguments. Without any, each line
/// read from stdin is sent as one message.
#[derive(Parser, Debug, Clone)]
#[command(name = "syslog-send", version)]
pub struct SendArgs {
    /// Path to configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Collector host.
    #[arg(long)]
    pub host: Option<String>,

    /// Collector port.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Transport: udp, tcp or tls.
    #[arg(long)]
    pub protocol: Option<TransportProtocol>,

    /// Stream framing: octet_counting or non_transparent.
    #[arg(long)]
    pub framing: Option<Framing>,

    /// Wire format: local, rfc3164 or rfc5424.
    #[arg(short, long)]
    pub format: Option<SerializerKind>,

    /// Header text encoding: ascii, latin1 or utf8.
    #[arg(long)]
    pub encoding: Option<TextEncoding>,

    /// Facility name or code.
    #[arg(long)]
    pub facility: Option<Facility>,

    /// Severity name or code.
    #[arg(short, long)]
    pub severity: Option<Severity>,

    #[arg(short, long)]
    pub app_name: Option<String>,

    #[arg(long)]
    pub proc_id: Option<String>,

    #[arg(long)]
    pub msg_id: Option<String>,

    /// Host name written into the header. Defaults to this machine's name.
    #[arg(long)]
    pub hostname: Option<String>,

    /// Structured data parameter as `ID:key=value`. Repeat to add more.
    #[arg(long = "sd", value_parser = parse_sd_param)]
    pub sd: Vec<SdParam>,

    /// Message text. Words are joined with single spaces.
    pub message: Vec<String>,
}

/// One `--sd` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdParam {
    pub id: String,
    pub name: String,
    pub value: String,
}

fn parse_sd_param(s: &str) -> Result<SdParam, String> {
    let (id, param) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ID:key=value, got '{}'", s))?;
    let (name, value) = param
        .split_once('=')
        .ok_or_else(|| format!("expected ID:key=value, got '{}'", s))?;
    if id.is_empty() || name.is_empty() {
        return Err(format!("SD-ID and parameter name must not be empty in '{}'", s));
    }
    Ok(SdParam {
        id: id.to_string(),
        name: name.to_string(),
        value: value.to_string(),
    })
}

impl SendArgs {
    /// Message text from the positional arguments, if any.
    pub fn message_text(&self) -> Option<String> {
        (!self.message.is_empty()).then(|| self.message.join(" "))
    }

    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut SendConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(host) = &self.host {
            config.sender.host = host.clone();
        }
        if let Some(port) = self.port {
            config.sender.port = port;
        }
        if let Some(protocol) = self.protocol {
            config.sender.protocol = protocol;
        }
        if let Some(framing) = self.framing {
            config.sender.framing = framing;
        }

        let message = &mut config.message;
        if let Some(format) = self.format {
            message.format = format;
        }
        if let Some(encoding) = self.encoding {
            message.encoding = Some(encoding);
        }
        if let Some(facility) = self.facility {
            message.facility = facility;
        }
        if let Some(severity) = self.severity {
            message.severity = severity;
        }
        if let Some(app_name) = &self.app_name {
            message.app_name = Some(app_name.clone());
        }
        if let Some(hostname) = &self.hostname {
            message.hostname = Some(hostname.clone());
        }
    }
}
