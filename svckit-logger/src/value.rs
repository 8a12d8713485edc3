//! Values attached to log lines.
//!
//! The original transport-agnostic contract: a payload is either raw
//! text, pre-structured data, or a schema-typed message. Rather than
//! inspecting types at runtime, the closed [`LogValue`] set makes the
//! caller's intent explicit.

use serde::Serialize;
use serde_json::Value;

/// A payload value carried on a log line.
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    /// Raw text. At encode time it is opportunistically parsed as a
    /// JSON object; anything that is not an object stays literal.
    Text(String),
    /// Pre-structured data, passed through unchanged.
    Data(Value),
}

impl LogValue {
    /// Schema-preserving path for typed messages: serde rename
    /// attributes carry the schema field names into the output.
    /// Serialization failure degrades to a literal description rather
    /// than failing the caller.
    pub fn message<T: Serialize>(msg: &T) -> Self {
        match serde_json::to_value(msg) {
            Ok(v) => LogValue::Data(v),
            Err(e) => LogValue::Text(format!("unserializable message: {e}")),
        }
    }

    /// Resolve to the JSON that gets logged.
    pub fn into_json(self) -> Value {
        match self {
            LogValue::Data(v) => v,
            LogValue::Text(s) => match serde_json::from_str::<Value>(&s) {
                Ok(v @ Value::Object(_)) => v,
                _ => Value::String(s),
            },
        }
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::Text(s.to_string())
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::Text(s)
    }
}

impl From<Value> for LogValue {
    fn from(v: Value) -> Self {
        LogValue::Data(v)
    }
}

/// An owned `(key, value)` pair handed to the logger.
#[derive(Debug, Clone)]
pub struct Field {
    pub key: String,
    pub value: LogValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<LogValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
