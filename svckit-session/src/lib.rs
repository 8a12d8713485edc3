//! Per-request session context.
//!
//! A [`Session`] is created once at request entry, decorated with
//! metadata as handling proceeds, and discarded at completion. Its
//! trace methods emit tagged checkpoints through the shared
//! [`Logger`]; the terminal [`Session::t4`] additionally writes the
//! request's transaction detail record.
//!
//! Metadata setters take `&mut self` — the request-owning worker is
//! the single writer during setup. When a request fans out, workers
//! share `&Session`: the key/value store and every trace method are
//! `&self` and safe for concurrent use.

use dashmap::DashMap;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

use svckit_logger::{Field, LogValue, Logger, TdrRecord};

/// Per-request context: one logger, one concurrent key/value store,
/// the request start instant, and the metadata that ends up in the
/// TDR.
pub struct Session {
    logger: Arc<Logger>,
    data: DashMap<String, LogValue>,
    request_time: Instant,
    thread_id: String,
    app_name: String,
    app_version: String,
    ip: String,
    port: u16,
    src_ip: String,
    url: String,
    method: String,
    header: LogValue,
    request: LogValue,
    error_message: String,
}

impl Session {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            data: DashMap::new(),
            request_time: Instant::now(),
            thread_id: String::new(),
            app_name: String::new(),
            app_version: String::new(),
            ip: String::new(),
            port: 0,
            src_ip: String::new(),
            url: String::new(),
            method: String::new(),
            header: LogValue::Data(Value::Object(Map::new())),
            request: LogValue::Data(Value::Object(Map::new())),
            error_message: String::new(),
        }
    }

    // ── Metadata setters ──────────────────────────────────────────
    // No validation: any value is accepted, including empty. Each
    // overwrites exactly one field and returns the session for
    // chaining.

    pub fn set_thread_id(&mut self, thread_id: impl Into<String>) -> &mut Self {
        self.thread_id = thread_id.into();
        self
    }

    pub fn set_method(&mut self, method: impl Into<String>) -> &mut Self {
        self.method = method.into();
        self
    }

    pub fn set_app_name(&mut self, app_name: impl Into<String>) -> &mut Self {
        self.app_name = app_name.into();
        self
    }

    pub fn set_app_version(&mut self, app_version: impl Into<String>) -> &mut Self {
        self.app_version = app_version.into();
        self
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = url.into();
        self
    }

    pub fn set_ip(&mut self, ip: impl Into<String>) -> &mut Self {
        self.ip = ip.into();
        self
    }

    pub fn set_port(&mut self, port: u16) -> &mut Self {
        self.port = port;
        self
    }

    pub fn set_src_ip(&mut self, src_ip: impl Into<String>) -> &mut Self {
        self.src_ip = src_ip.into();
        self
    }

    pub fn set_header(&mut self, header: impl Into<LogValue>) -> &mut Self {
        self.header = header.into();
        self
    }

    pub fn set_request(&mut self, request: impl Into<LogValue>) -> &mut Self {
        self.request = request.into();
        self
    }

    pub fn set_error_message(&mut self, error_message: impl Into<String>) -> &mut Self {
        self.error_message = error_message.into();
        self
    }

    // ── Key/value store ───────────────────────────────────────────

    /// Store an ad-hoc value, replacing any previous one under `key`.
    pub fn put(&self, key: impl Into<String>, value: impl Into<LogValue>) {
        self.data.insert(key.into(), value.into());
    }

    /// Fetch a previously stored value. Absent keys are `None`, never
    /// a default.
    pub fn get(&self, key: &str) -> Option<LogValue> {
        self.data.get(key).map(|entry| entry.value().clone())
    }

    // ── Lifecycle trace methods ───────────────────────────────────

    /// Entry checkpoint.
    pub fn t1(&self, values: &[LogValue]) {
        let mut fields = self.base_fields("T1");
        push_positional(&mut fields, values);
        self.logger.info("|", fields);
    }

    /// Start of a timed sub-operation; pass the returned instant to
    /// [`Session::t3`].
    pub fn t2(&self, values: &[LogValue]) -> Instant {
        let mut fields = self.base_fields("T2");
        push_positional(&mut fields, values);
        self.logger.info("|", fields);
        Instant::now()
    }

    /// End of a timed sub-operation.
    pub fn t3(&self, start: Instant, values: &[LogValue]) {
        let elapsed_ms = start.elapsed().as_millis();
        let mut fields = self.base_fields("T3");
        push_positional(&mut fields, values);
        fields.push(Field::new("_process_time", format!("{elapsed_ms} ms")));
        self.logger.info("|", fields);
    }

    /// Terminal checkpoint: one Info line plus the request's TDR,
    /// built from the session's current state. `values` become the
    /// response payload; the key/value store becomes `addData`.
    pub fn t4(&self, values: &[LogValue]) {
        let rt = self.request_time.elapsed().as_millis() as i64;

        let mut fields = self.base_fields("T4");
        push_positional(&mut fields, values);
        fields.push(Field::new("_response_time", format!("{rt} ms")));
        self.logger.info("|", fields);

        let response = Value::Array(values.iter().cloned().map(LogValue::into_json).collect());
        let add_data: Map<String, Value> = self
            .data
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone().into_json()))
            .collect();

        self.logger.tdr(TdrRecord {
            app_name: self.app_name.clone(),
            app_version: self.app_version.clone(),
            ip: self.ip.clone(),
            port: self.port,
            src_ip: self.src_ip.clone(),
            resp_time_ms: rt,
            path: self.url.clone(),
            header: self.header.clone(),
            request: self.request.clone(),
            response: LogValue::Data(response),
            error: self.error_message.clone(),
            thread_id: self.thread_id.clone(),
            additional_data: LogValue::Data(Value::Object(add_data)),
        });
    }

    /// Generic tagged line at Info level.
    pub fn info(&self, values: &[LogValue]) {
        let mut fields = self.base_fields("INFO");
        push_positional(&mut fields, values);
        self.logger.info("|", fields);
    }

    /// Generic tagged line at Error level.
    pub fn error(&self, values: &[LogValue]) {
        let mut fields = self.base_fields("ERROR");
        push_positional(&mut fields, values);
        self.logger.error("|", fields);
    }

    fn base_fields(&self, tag: &str) -> Vec<Field> {
        vec![
            Field::new("_app_tag", tag),
            Field::new("_app_thread_id", self.thread_id.as_str()),
            Field::new("_app_method", self.method.as_str()),
            Field::new("_app_uri", self.url.as_str()),
        ]
    }
}

/// Label each supplied value with its positional key.
fn push_positional(fields: &mut Vec<Field>, values: &[LogValue]) {
    for (index, value) in values.iter().enumerate() {
        fields.push(Field::new(format!("_message_{index}"), value.clone()));
    }
}
