//! The log event consumed by layouts.
//!
//! Events are owned by the logging framework. Layouts only read them and never
//! keep them past a single `format` call.

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};

/// Severity of a log event, named the way the rendered line shows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Fine-grained tracing output.
    Trace,
    /// Diagnostic detail.
    Debug,
    /// Normal operation.
    Info,
    /// Something unexpected that the caller recovered from.
    Warn,
    /// A failed operation.
    Error,
    /// A failure the process cannot continue after.
    Fatal,
}

impl Level {
    /// The upper-case level name written into rendered lines.
    pub fn level_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` so width specifiers like `{:<5}` apply.
        f.pad(self.level_str())
    }
}

/// One item of a log call's data.
///
/// Keyed structures and sequences render as compact JSON; everything else
/// renders through its plain text form (strings without quotes).
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// A keyed structure, serialized as a JSON object.
    Object(Map<String, JsonValue>),
    /// An ordered sequence, serialized as a JSON array.
    Array(Vec<JsonValue>),
    /// Any other value, already in text form.
    Scalar(String),
}

impl Payload {
    /// Converts any serializable value into a payload item.
    pub fn serialize<T>(value: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        Ok(serde_json::to_value(value)?.into())
    }
}

impl From<JsonValue> for Payload {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Object(map) => Payload::Object(map),
            JsonValue::Array(items) => Payload::Array(items),
            JsonValue::String(text) => Payload::Scalar(text),
            other @ (JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_)) => {
                Payload::Scalar(other.to_string())
            }
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Scalar(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Scalar(text.to_string())
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Object(map) => {
                f.write_str(&serde_json::to_string(map).map_err(|_| fmt::Error)?)
            }
            Payload::Array(items) => {
                f.write_str(&serde_json::to_string(items).map_err(|_| fmt::Error)?)
            }
            Payload::Scalar(text) => f.write_str(text),
        }
    }
}

/// A structured record emitted by application code, before formatting.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEvent {
    /// The values passed to the log call, in call order.
    pub data: Vec<Payload>,
    /// When the event was created.
    pub start_time: DateTime<Local>,
    /// Id of the emitting process.
    pub pid: u32,
    /// Severity of the event.
    pub level: Level,
    /// Logger category the event was emitted under.
    pub category_name: String,
}

impl LogEvent {
    /// Starts building an event.
    pub fn builder() -> LogEventBuilder {
        LogEventBuilder::default()
    }

    /// Payload items rendered as text and joined by single spaces.
    pub fn content(&self) -> String {
        self.data
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Assembles a [`LogEvent`], failing fast when a required attribute is missing.
///
/// `start_time` defaults to the current time and `pid` to the current process.
#[derive(Debug, Default)]
pub struct LogEventBuilder {
    data: Vec<Payload>,
    start_time: Option<DateTime<Local>>,
    pid: Option<u32>,
    level: Option<Level>,
    category_name: Option<String>,
}

impl LogEventBuilder {
    /// Appends one payload item.
    #[must_use]
    pub fn payload(mut self, item: impl Into<Payload>) -> Self {
        self.data.push(item.into());
        self
    }

    /// Appends a serializable value as a payload item.
    pub fn serialized<T>(self, value: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        Ok(self.payload(Payload::serialize(value)?))
    }

    #[must_use]
    pub fn start_time(mut self, start_time: DateTime<Local>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    #[must_use]
    pub fn pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn category(mut self, category_name: impl Into<String>) -> Self {
        self.category_name = Some(category_name.into());
        self
    }

    /// Finishes the event.
    pub fn build(self) -> Result<LogEvent> {
        let level = self.level.ok_or(Error::MalformedEvent { field: "level" })?;
        let category_name = self.category_name.ok_or(Error::MalformedEvent {
            field: "category name",
        })?;
        Ok(LogEvent {
            data: self.data,
            start_time: self.start_time.unwrap_or_else(Local::now),
            pid: self.pid.unwrap_or_else(std::process::id),
            level,
            category_name,
        })
    }
}
