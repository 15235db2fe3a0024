//! Sinks: the encoders that turn a rendered record into a log line.

use super::{Level, Record};
use crate::attr::{Attr, AttrValue};
use crate::value::Value;
use parking_lot::Mutex;
use std::fmt::Write as _;
use std::io::Write;
use thiserror::Error;

/// SinkError represents a failure to encode or write a record.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write record: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sink receives fully rendered records.
///
/// Attributes with an empty key and a scalar value are dropped, groups with an
/// empty key are inlined into their parent, and groups that would produce no
/// output are omitted.
pub trait Sink: Send + Sync {
    /// Returns true if records at `level` should be handled.
    fn enabled(&self, level: Level) -> bool;

    /// Encodes and writes one record.
    fn handle(&self, record: &Record) -> Result<(), SinkError>;

    /// Flushes buffered output.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// TextSink writes logfmt lines such as `level=INFO msg=hi alice.foo=boo`.
pub struct TextSink<W> {
    writer: Mutex<W>,
    min_level: Level,
}

impl<W: Write + Send> TextSink<W> {
    /// Creates a text sink writing records at or above `min_level`.
    pub fn new(writer: W, min_level: Level) -> Self {
        TextSink {
            writer: Mutex::new(writer),
            min_level,
        }
    }

    /// Formats a record as one line, including the trailing newline.
    pub fn format(record: &Record) -> String {
        let mut line = String::new();
        let _ = write!(line, "level={} msg={}", record.level, quote(&record.message));
        write_text_attrs(&mut line, "", &record.attrs);
        line.push('\n');
        line
    }
}

impl<W: Write + Send> Sink for TextSink<W> {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn handle(&self, record: &Record) -> Result<(), SinkError> {
        let line = Self::format(record);
        self.writer.lock().write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

fn write_text_attrs(line: &mut String, prefix: &str, attrs: &[Attr]) {
    for attr in attrs {
        match &attr.value {
            AttrValue::Scalar(value) => {
                if attr.key.is_empty() {
                    continue;
                }
                let key = format!("{}{}", prefix, attr.key);
                let _ = write!(line, " {}={}", quote(&key), quote_value(value));
            }
            AttrValue::Group(members) => {
                if attr.key.is_empty() {
                    write_text_attrs(line, prefix, members);
                } else {
                    let nested = format!("{}{}.", prefix, attr.key);
                    write_text_attrs(line, &nested, members);
                }
            }
        }
    }
}

fn quote_value(value: &Value) -> String {
    quote(&value.to_string())
}

fn quote(s: &str) -> String {
    if needs_quoting(s) {
        format!("{:?}", s)
    } else {
        s.to_string()
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '=' || c == '"')
}

/// JsonSink writes one JSON object per record.
pub struct JsonSink<W> {
    writer: Mutex<W>,
    min_level: Level,
}

impl<W: Write + Send> JsonSink<W> {
    /// Creates a JSON sink writing records at or above `min_level`.
    pub fn new(writer: W, min_level: Level) -> Self {
        JsonSink {
            writer: Mutex::new(writer),
            min_level,
        }
    }

    /// Formats a record as one JSON line, including the trailing newline.
    ///
    /// Keys are written in order and never merged, so an attribute sharing a
    /// name with `level`, `msg` or an earlier attribute appears alongside it.
    pub fn format(record: &Record) -> Result<String, SinkError> {
        let mut line = String::from("{");
        let mut first = true;
        write_json_key(&mut line, "level", &mut first)?;
        line.push_str(&serde_json::to_string(record.level.as_str())?);
        write_json_key(&mut line, "msg", &mut first)?;
        line.push_str(&serde_json::to_string(&record.message)?);
        write_json_attrs(&mut line, &record.attrs, &mut first)?;
        line.push_str("}\n");
        Ok(line)
    }
}

impl<W: Write + Send> Sink for JsonSink<W> {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn handle(&self, record: &Record) -> Result<(), SinkError> {
        let line = Self::format(record)?;
        self.writer.lock().write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

/// Encodes a rendered attribute sequence as a JSON object, keeping order.
pub fn attrs_to_json(attrs: &[Attr]) -> Result<String, SinkError> {
    let mut out = String::from("{");
    write_json_attrs(&mut out, attrs, &mut true)?;
    out.push('}');
    Ok(out)
}

fn write_json_key(out: &mut String, key: &str, first: &mut bool) -> Result<(), SinkError> {
    if !*first {
        out.push(',');
    }
    *first = false;
    out.push_str(&serde_json::to_string(key)?);
    out.push(':');
    Ok(())
}

fn write_json_attrs(out: &mut String, attrs: &[Attr], first: &mut bool) -> Result<(), SinkError> {
    for attr in attrs {
        match &attr.value {
            AttrValue::Scalar(value) => {
                if attr.key.is_empty() {
                    continue;
                }
                write_json_key(out, &attr.key, first)?;
                out.push_str(&serde_json::to_string(&**value)?);
            }
            AttrValue::Group(members) => {
                if attr.key.is_empty() {
                    write_json_attrs(out, members, first)?;
                    continue;
                }
                if renders_empty(members) {
                    continue;
                }
                write_json_key(out, &attr.key, first)?;
                out.push('{');
                write_json_attrs(out, members, &mut true)?;
                out.push('}');
            }
        }
    }
    Ok(())
}

fn renders_empty(attrs: &[Attr]) -> bool {
    attrs.iter().all(|attr| match &attr.value {
        AttrValue::Scalar(_) => attr.key.is_empty(),
        AttrValue::Group(members) => renders_empty(members),
    })
}
