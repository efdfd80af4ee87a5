//! Turns command-line input into syslog messages.

use chrono::{DateTime, FixedOffset, Local};
use syslog_client::{
    Facility, Result, SerializerKind, Severity, StructuredDataElement, SyslogMessage,
};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::args::{SdParam, SendArgs};
use crate::config::MessageDefaults;

/// Header fields shared by every message of one invocation.
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    pub format: SerializerKind,
    pub facility: Facility,
    pub severity: Severity,
    pub host_name: String,
    pub app_name: Option<String>,
    pub proc_id: Option<String>,
    pub msg_id: Option<String>,
    pub structured_data: Vec<StructuredDataElement>,
}

impl MessageTemplate {
    /// Merge config defaults with per-invocation fields from the command line.
    pub fn resolve(defaults: &MessageDefaults, args: &SendArgs) -> Self {
        let host_name = defaults
            .hostname
            .clone()
            .unwrap_or_else(local_host_name);

        Self {
            format: defaults.format,
            facility: defaults.facility,
            severity: defaults.severity,
            host_name,
            app_name: defaults.app_name.clone(),
            proc_id: args.proc_id.clone(),
            msg_id: args.msg_id.clone(),
            structured_data: group_sd_params(&args.sd),
        }
    }

    /// Build one message carrying `text`, stamped with `timestamp`.
    pub fn build(&self, text: &str, timestamp: DateTime<FixedOffset>) -> Result<SyslogMessage> {
        let mut builder = SyslogMessage::builder(self.facility, self.severity).message(text);
        if let Some(app_name) = &self.app_name {
            builder = builder.app_name(app_name.clone());
        }

        match self.format {
            SerializerKind::Local => Ok(builder.build_local()),
            SerializerKind::Rfc3164 => builder
                .timestamp(timestamp)
                .host_name(self.host_name.clone())
                .build_rfc3164(),
            SerializerKind::Rfc5424 => {
                builder = builder
                    .timestamp(timestamp)
                    .host_name(self.host_name.clone());
                if let Some(proc_id) = &self.proc_id {
                    builder = builder.proc_id(proc_id.clone());
                }
                if let Some(msg_id) = &self.msg_id {
                    builder = builder.msg_id(msg_id.clone());
                }
                for element in &self.structured_data {
                    builder = builder.structured_data(element.clone());
                }
                builder.build_rfc5424()
            }
        }
    }

    /// Build messages for every text, all stamped with the current time.
    pub fn build_all(&self, texts: &[String]) -> Result<Vec<SyslogMessage>> {
        let now = Local::now().fixed_offset();
        texts.iter().map(|text| self.build(text, now)).collect()
    }
}

fn local_host_name() -> String {
    match hostname::get().map(|name| name.into_string()) {
        Ok(Ok(name)) if !name.is_empty() => name,
        _ => {
            tracing::warn!("Could not determine local host name, using 'localhost'");
            "localhost".to_string()
        }
    }
}

/// Group `ID:key=value` params into elements, keeping first-seen order of IDs.
fn group_sd_params(params: &[SdParam]) -> Vec<StructuredDataElement> {
    let mut grouped: Vec<(&str, Vec<(&str, &str)>)> = Vec::new();
    for param in params {
        let pair = (param.name.as_str(), param.value.as_str());
        match grouped.iter_mut().find(|(id, _)| *id == param.id) {
            Some((_, pairs)) => pairs.push(pair),
            None => grouped.push((param.id.as_str(), vec![pair])),
        }
    }
    grouped
        .into_iter()
        .map(|(id, pairs)| StructuredDataElement::new(id, pairs))
        .collect()
}

/// Read one message per non-blank line until EOF.
pub async fn read_lines<R: AsyncRead + Unpin>(reader: R) -> std::io::Result<Vec<String>> {
    let mut lines = BufReader::new(reader).lines();
    let mut texts = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            texts.push(line);
        }
    }
    Ok(texts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::Parser;
    use syslog_client::{MessageSerializer, Rfc3164Serializer, Rfc5424Serializer};

    fn template(format: SerializerKind, extra: &[&str]) -> MessageTemplate {
        let mut argv = vec!["syslog-send"];
        argv.extend_from_slice(extra);
        let args = SendArgs::try_parse_from(argv).unwrap();
        let defaults = MessageDefaults {
            format,
            hostname: Some("web01".to_string()),
            app_name: Some("deploy".to_string()),
            ..Default::default()
        };
        MessageTemplate::resolve(&defaults, &args)
    }

    fn fixed_time() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 7, 9, 5, 0)
            .unwrap()
    }

    #[test]
    fn test_rfc5424_message_with_sd() {
        let template = template(
            SerializerKind::Rfc5424,
            &["--msg-id", "REL", "--sd", "rel:ver=1.2", "--sd", "rel:env=prod"],
        );
        let msg = template.build("released", fixed_time()).unwrap();
        let out = String::from_utf8(Rfc5424Serializer::default().serialize(&msg)).unwrap();

        let header = concat!(
            "<13>1 2024-03-07T09:05:00.000000+00:00 web01 deploy - REL ",
            "[rel@32473 ver=\"1.2\" env=\"prod\"] ",
        );
        assert!(out.starts_with(header));
        assert!(out.ends_with("released"));
    }

    #[test]
    fn test_rfc3164_message() {
        let template = template(SerializerKind::Rfc3164, &[]);
        let msg = template.build("done", fixed_time()).unwrap();
        let out = Rfc3164Serializer::default().serialize(&msg);

        assert_eq!(out, b"<13>Mar  7 09:05:00 web01 deploy:done");
    }

    #[test]
    fn test_local_message_ignores_header() {
        let template = template(SerializerKind::Local, &["--sd", "x:k=v"]);
        let msg = template.build("plain", fixed_time()).unwrap();

        assert!(msg.host_name().is_none());
        assert!(msg.structured_data().is_empty());
        assert_eq!(msg.message(), Some("plain"));
    }

    #[test]
    fn test_sd_grouping_keeps_id_order() {
        let args = SendArgs::try_parse_from([
            "syslog-send",
            "--sd",
            "b:k=1",
            "--sd",
            "a:k=2",
            "--sd",
            "b:j=3",
        ])
        .unwrap();
        let elements = group_sd_params(&args.sd);

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].sd_id(), "b@32473");
        assert_eq!(elements[0].param("j"), Some("3"));
        assert_eq!(elements[1].sd_id(), "a@32473");
    }

    #[tokio::test]
    async fn test_read_lines_skips_blank() {
        let input = tokio_test::io::Builder::new()
            .read(b"first\n\n  \nsecond\n")
            .read(b"third")
            .build();
        let texts = read_lines(input).await.unwrap();

        assert_eq!(texts, vec!["first", "second", "third"]);
    }
}
