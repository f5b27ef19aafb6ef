//! Connector protocol messages.
//!
//! A test read consumes the message stream a connector writes while it runs:
//! one JSON object per line, tagged by `type`.
//!
//! ```text
//! {"type":"LOG","log":{"level":"INFO","message":"request: {...}"}}
//! {"type":"RECORD","record":{"stream":"users","data":{"id":1},"emitted_at":1670000000000}}
//! ```
//!
//! Only `LOG` and `RECORD` carry meaning for grouping. Every other message type
//! decodes to [`Message::Other`] and is skipped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{BufRead, Lines};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Message {
    Log { log: LogMessage },
    Record { record: RecordMessage },
    #[serde(other)]
    Other,
}

impl Message {
    pub fn log(message: impl Into<String>) -> Self {
        Self::Log {
            log: LogMessage {
                level: LogLevel::Info,
                message: message.into(),
            },
        }
    }

    pub fn record(stream: impl Into<String>, data: Map<String, Value>) -> Self {
        Self::Record {
            record: RecordMessage {
                stream: stream.into(),
                data,
                emitted_at: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Fatal,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    #[serde(default)]
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMessage {
    #[serde(default)]
    pub stream: String,
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emitted_at: Option<i64>,
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to read protocol message on line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Decodes newline-delimited protocol messages, one line per pull.
///
/// Lines that are not valid messages are skipped with a warning, the same way
/// a connector's stray stdout output would be. I/O failures are yielded as
/// errors.
pub fn decode_messages<R: BufRead>(reader: R) -> MessageDecoder<R> {
    MessageDecoder {
        lines: reader.lines(),
        line: 0,
    }
}

/// Lazy iterator returned by [`decode_messages`].
pub struct MessageDecoder<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> Iterator for MessageDecoder<R> {
    type Item = Result<Message, ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line += 1;

            let line = match line {
                Ok(line) => line,
                Err(source) => {
                    return Some(Err(ProtocolError::Read {
                        line: self.line,
                        source,
                    }));
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<Message>(line) {
                Ok(message) => return Some(Ok(message)),
                Err(error) => {
                    warn!(line = self.line, %error, "skipping undecodable protocol message")
                }
            }
        }
    }
}
