//! Transaction detail record.
//!
//! One TDR is written per completed request, carrying timing,
//! identity, and payload metadata for audit/analytics shipping. The
//! key set is fixed so SIEM pipelines can index it blind.

use serde_json::{Map, Value};

use crate::value::LogValue;

/// A single transaction detail record.
///
/// Payload fields (`header`, `request`, `response`,
/// `additional_data`) are [`LogValue`]s: structured data is passed
/// through, text is opportunistically promoted to an object.
#[derive(Debug, Clone)]
pub struct TdrRecord {
    pub app_name: String,
    pub app_version: String,
    pub ip: String,
    pub port: u16,
    pub src_ip: String,
    /// End-to-end response time in milliseconds.
    pub resp_time_ms: i64,
    pub path: String,
    pub header: LogValue,
    pub request: LogValue,
    pub response: LogValue,
    /// Empty string = no error.
    pub error: String,
    pub thread_id: String,
    pub additional_data: LogValue,
}

impl Default for TdrRecord {
    fn default() -> Self {
        Self {
            app_name: String::new(),
            app_version: String::new(),
            ip: String::new(),
            port: 0,
            src_ip: String::new(),
            resp_time_ms: 0,
            path: String::new(),
            header: LogValue::Data(Value::Object(Map::new())),
            request: LogValue::Data(Value::Object(Map::new())),
            response: LogValue::Data(Value::Object(Map::new())),
            error: String::new(),
            thread_id: String::new(),
            additional_data: LogValue::Data(Value::Object(Map::new())),
        }
    }
}

impl TdrRecord {
    /// Encode into the fixed TDR key schema.
    pub fn into_fields(self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("xid".into(), Value::String(self.thread_id));
        m.insert("rt".into(), Value::from(self.resp_time_ms));
        m.insert("port".into(), Value::from(self.port));
        m.insert("ip".into(), Value::String(self.ip));
        m.insert("app".into(), Value::String(self.app_name));
        m.insert("ver".into(), Value::String(self.app_version));
        m.insert("path".into(), Value::String(self.path));
        m.insert("header".into(), self.header.into_json());
        m.insert("req".into(), self.request.into_json());
        m.insert("resp".into(), self.response.into_json());
        m.insert("srcIP".into(), Value::String(self.src_ip));
        m.insert("error".into(), Value::String(self.error));
        m.insert("addData".into(), self.additional_data.into_json());
        m
    }
}
