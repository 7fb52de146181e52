//! Adapters for rendering `slog` records through a [`Layout`].
//!
//! This module connects layouts to `slog` by providing a [`Drain`] that turns
//! each record into a [`LogEvent`] and writes the rendered line.
//!
//! It is responsible for:
//! - Mapping `slog` levels, tags and key/value pairs onto [`LogEvent`].
//! - Writing exactly one line per accepted record.
//!
//! It does not choose a layout, install a global logger, or rotate files.

use std::{
    fmt,
    io::{self, Write},
    sync::Mutex,
};

use chrono::Local;
use serde_json::{Map, Number, Value as JsonValue};
use slog::{Drain, Key, OwnedKVList, Record, Serializer, KV};

use crate::{
    error::{Error, Result},
    event::{Level, LogEvent, Payload},
    layout::{Layout, LayoutConfig},
    registry::LayoutRegistry,
};

/// Category used when a record carries no tag.
pub const DEFAULT_CATEGORY: &str = "default";

impl From<slog::Level> for Level {
    fn from(level: slog::Level) -> Self {
        match level {
            slog::Level::Critical => Level::Fatal,
            slog::Level::Error => Level::Error,
            slog::Level::Warning => Level::Warn,
            slog::Level::Info => Level::Info,
            slog::Level::Debug => Level::Debug,
            slog::Level::Trace => Level::Trace,
        }
    }
}

/// A `slog::Drain` that renders records through a [`Layout`] and writes one
/// line per record to `W`.
///
/// The event's data is the record message followed, when present, by a JSON
/// object of the record's key/value pairs and then the logger's, each in the
/// order they were written (record values win on key collisions). The category is the record tag, or the drain's configured
/// category when the tag is empty.
///
/// ## Example
/// ```ignore
/// use desensitization::{slog::LayoutDrain, LayoutConfig, LayoutRegistry};
/// use slog::{info, o, Drain, Logger};
///
/// let config = LayoutConfig::desensitization(["password"]);
/// let drain = LayoutDrain::from_config(&config, &LayoutRegistry::default(), std::io::stdout())?;
/// let logger = Logger::root(drain.fuse(), o!());
/// info!(logger, "login"; "password" => "a123456");
/// ```
pub struct LayoutDrain<W> {
    layout: Box<dyn Layout>,
    writer: Mutex<W>,
    category: String,
    min_level: Level,
}

impl<W: Write> LayoutDrain<W> {
    /// Writes records rendered by `layout` to `writer`.
    pub fn new(layout: Box<dyn Layout>, writer: W) -> Self {
        Self {
            layout,
            writer: Mutex::new(writer),
            category: DEFAULT_CATEGORY.to_string(),
            min_level: Level::Trace,
        }
    }

    /// Builds the layout named by `config` through `registry`.
    pub fn from_config(
        config: &LayoutConfig,
        registry: &LayoutRegistry,
        writer: W,
    ) -> Result<Self> {
        Ok(Self::new(registry.build(config)?, writer))
    }

    /// Category for records without a tag.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Drops records below `level`.
    #[must_use]
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    fn event(&self, record: &Record<'_>, values: &OwnedKVList) -> Result<LogEvent> {
        let mut logger_fields = JsonCollector::default();
        let mut record_fields = JsonCollector::default();
        values
            .serialize(record, &mut logger_fields)
            .and_then(|()| record.kv().serialize(record, &mut record_fields))
            .map_err(|err| io::Error::other(err.to_string()))?;

        let mut fields = Map::new();
        for (key, value) in record_fields.into_call_order() {
            fields.insert(key, value);
        }
        for (key, value) in logger_fields.into_call_order() {
            fields.entry(key).or_insert(value);
        }

        let category = if record.tag().is_empty() {
            self.category.as_str()
        } else {
            record.tag()
        };

        let mut builder = LogEvent::builder()
            .start_time(Local::now())
            .level(record.level().into())
            .category(category)
            .payload(record.msg().to_string());
        if !fields.is_empty() {
            builder = builder.payload(Payload::Object(fields));
        }
        builder.build()
    }
}

impl<W: Write> Drain for LayoutDrain<W> {
    type Ok = ();
    type Err = Error;

    fn log(&self, record: &Record<'_>, values: &OwnedKVList) -> Result<()> {
        if Level::from(record.level()) < self.min_level {
            return Ok(());
        }

        let event = self.event(record, values)?;
        let mut line = self.layout.format(&event);
        // Pattern layouts may already end with `%n`.
        if !line.ends_with('\n') {
            line.push('\n');
        }

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl<W> fmt::Debug for LayoutDrain<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutDrain")
            .field("category", &self.category)
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

/// Collects `slog` key/value pairs as JSON values.
///
/// `slog` hands pairs over last-written first, so they are kept in arrival
/// order and reversed on the way out.
#[derive(Default)]
struct JsonCollector {
    fields: Vec<(String, JsonValue)>,
}

impl JsonCollector {
    fn insert(&mut self, key: Key, value: JsonValue) -> slog::Result {
        self.fields.push((key.into(), value));
        Ok(())
    }

    fn into_call_order(self) -> impl Iterator<Item = (String, JsonValue)> {
        self.fields.into_iter().rev()
    }
}

impl Serializer for JsonCollector {
    fn emit_arguments(&mut self, key: Key, val: &fmt::Arguments<'_>) -> slog::Result {
        self.insert(key, JsonValue::String(val.to_string()))
    }

    fn emit_str(&mut self, key: Key, val: &str) -> slog::Result {
        self.insert(key, JsonValue::String(val.into()))
    }

    fn emit_char(&mut self, key: Key, val: char) -> slog::Result {
        self.insert(key, JsonValue::String(val.to_string()))
    }

    fn emit_bool(&mut self, key: Key, val: bool) -> slog::Result {
        self.insert(key, JsonValue::Bool(val))
    }

    fn emit_u8(&mut self, key: Key, val: u8) -> slog::Result {
        self.insert(key, JsonValue::from(val))
    }

    fn emit_i8(&mut self, key: Key, val: i8) -> slog::Result {
        self.insert(key, JsonValue::from(val))
    }

    fn emit_u16(&mut self, key: Key, val: u16) -> slog::Result {
        self.insert(key, JsonValue::from(val))
    }

    fn emit_i16(&mut self, key: Key, val: i16) -> slog::Result {
        self.insert(key, JsonValue::from(val))
    }

    fn emit_u32(&mut self, key: Key, val: u32) -> slog::Result {
        self.insert(key, JsonValue::from(val))
    }

    fn emit_i32(&mut self, key: Key, val: i32) -> slog::Result {
        self.insert(key, JsonValue::from(val))
    }

    fn emit_u64(&mut self, key: Key, val: u64) -> slog::Result {
        self.insert(key, JsonValue::from(val))
    }

    fn emit_i64(&mut self, key: Key, val: i64) -> slog::Result {
        self.insert(key, JsonValue::from(val))
    }

    fn emit_usize(&mut self, key: Key, val: usize) -> slog::Result {
        self.insert(key, JsonValue::from(val))
    }

    fn emit_isize(&mut self, key: Key, val: isize) -> slog::Result {
        self.insert(key, JsonValue::from(val))
    }

    fn emit_f32(&mut self, key: Key, val: f32) -> slog::Result {
        self.emit_f64(key, f64::from(val))
    }

    fn emit_f64(&mut self, key: Key, val: f64) -> slog::Result {
        // NaN and infinities have no JSON form.
        let value = Number::from_f64(val).map_or(JsonValue::Null, JsonValue::Number);
        self.insert(key, value)
    }

    fn emit_unit(&mut self, key: Key) -> slog::Result {
        self.insert(key, JsonValue::Null)
    }

    fn emit_none(&mut self, key: Key) -> slog::Result {
        self.insert(key, JsonValue::Null)
    }

    fn emit_serde(&mut self, key: Key, val: &dyn slog::SerdeValue) -> slog::Result {
        let value = serde_json::to_value(val.as_serde())
            .map_err(|err| slog::Error::Io(io::Error::other(err.to_string())))?;
        self.insert(key, value)
    }
}
