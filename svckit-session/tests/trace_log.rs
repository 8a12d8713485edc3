//! End-to-end session tracing against file-backed log streams.
//!
//! Each test builds its own Logger writing into a private temp
//! directory, drives a Session through its lifecycle, and reads the
//! emitted JSON lines back.

use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use svckit_core::LogConfig;
use svckit_logger::{LogValue, Logger};
use svckit_session::Session;

static COUNTER: AtomicU64 = AtomicU64::new(0);

struct LogDir {
    dir: PathBuf,
}

impl LogDir {
    fn new() -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "svckit-session-test-{}-{}",
            std::process::id(),
            n,
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    fn config(&self) -> LogConfig {
        LogConfig {
            stdout: false,
            file_location: self.dir.join("app.log").to_string_lossy().into_owned(),
            file_tdr_location: self.dir.join("tdr.log").to_string_lossy().into_owned(),
            max_age_days: 7,
        }
    }

    fn logger(&self) -> Arc<Logger> {
        Arc::new(Logger::new(&self.config()).unwrap())
    }

    /// All JSON lines written to the stream whose prefix is `base`.
    fn lines(&self, base: &str) -> Vec<Value> {
        let mut lines = Vec::new();
        for entry in fs::read_dir(&self.dir).unwrap() {
            let entry = entry.unwrap();
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(&format!("{base}.")) && entry.path().is_file() {
                for line in fs::read_to_string(entry.path()).unwrap().lines() {
                    lines.push(serde_json::from_str(line).unwrap());
                }
            }
        }
        lines
    }
}

impl Drop for LogDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn decorated_session(logger: Arc<Logger>) -> Session {
    let mut session = Session::new(logger);
    session
        .set_thread_id("t-123")
        .set_method("POST")
        .set_url("/v1/enroll")
        .set_app_name("enroll-api")
        .set_app_version("2.1.0")
        .set_ip("10.0.0.5")
        .set_port(9090)
        .set_src_ip("172.16.1.20");
    session
}

// ── Checkpoint lines ─────────────────────────────────────────────

#[test]
fn t1_emits_tagged_line_with_request_metadata() {
    let logs = LogDir::new();
    let session = decorated_session(logs.logger());

    session.t1(&["handler start".into()]);

    let lines = logs.lines("app.log");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["_app_tag"], "T1");
    assert_eq!(lines[0]["_app_thread_id"], "t-123");
    assert_eq!(lines[0]["_app_method"], "POST");
    assert_eq!(lines[0]["_app_uri"], "/v1/enroll");
    assert_eq!(lines[0]["_message_0"], "handler start");
    assert_eq!(lines[0]["xdata"], "|");
}

#[test]
fn values_are_labeled_by_position() {
    let logs = LogDir::new();
    let session = decorated_session(logs.logger());

    session.info(&["first".into(), json!({"n": 2}).into(), "third".into()]);

    let lines = logs.lines("app.log");
    assert_eq!(lines[0]["_app_tag"], "INFO");
    assert_eq!(lines[0]["_message_0"], "first");
    assert_eq!(lines[0]["_message_1"], json!({"n": 2}));
    assert_eq!(lines[0]["_message_2"], "third");
}

#[test]
fn error_goes_out_at_error_level() {
    let logs = LogDir::new();
    let session = decorated_session(logs.logger());

    session.error(&["boom".into()]);

    let lines = logs.lines("app.log");
    assert_eq!(lines[0]["_app_tag"], "ERROR");
    assert_eq!(lines[0]["level"], "error");
}

#[test]
fn t2_t3_measure_a_sub_operation() {
    let logs = LogDir::new();
    let session = decorated_session(logs.logger());

    let start = session.t2(&["begin lookup".into()]);
    std::thread::sleep(std::time::Duration::from_millis(30));
    session.t3(start, &["end lookup".into()]);

    let lines = logs.lines("app.log");
    assert_eq!(lines.len(), 2);
    let t3 = lines.iter().find(|l| l["_app_tag"] == "T3").unwrap();
    let process_time = t3["_process_time"].as_str().unwrap();
    let ms: u64 = process_time.strip_suffix(" ms").unwrap().parse().unwrap();
    assert!((30..1000).contains(&ms), "unexpected elapsed: {process_time}");
}

// ── Terminal checkpoint ──────────────────────────────────────────

#[test]
fn t4_emits_exactly_one_info_line_and_one_tdr() {
    let logs = LogDir::new();
    let session = decorated_session(logs.logger());

    std::thread::sleep(std::time::Duration::from_millis(20));
    session.t4(&[json!({"status": "ok"}).into()]);

    let app = logs.lines("app.log");
    assert_eq!(app.len(), 1);
    assert_eq!(app[0]["_app_tag"], "T4");
    let rt_field = app[0]["_response_time"].as_str().unwrap();
    assert!(rt_field.ends_with(" ms"));

    let tdr = logs.lines("tdr.log");
    assert_eq!(tdr.len(), 1);
}

#[test]
fn t4_tdr_reflects_final_session_state() {
    let logs = LogDir::new();
    let mut session = decorated_session(logs.logger());
    session.set_header(json!({"x-request-id": "abc"}));
    session.set_request(r#"{"studentId":"s-1"}"#);
    session.put("branch", "jkt");

    // Mutations after setup must show up in the record, not stale
    // captures.
    session.set_error_message("downstream timeout");

    std::thread::sleep(std::time::Duration::from_millis(25));
    session.t4(&[json!({"status": "failed"}).into()]);

    let tdr = &logs.lines("tdr.log")[0];
    assert_eq!(tdr["xid"], "t-123");
    assert_eq!(tdr["app"], "enroll-api");
    assert_eq!(tdr["ver"], "2.1.0");
    assert_eq!(tdr["ip"], "10.0.0.5");
    assert_eq!(tdr["port"], 9090);
    assert_eq!(tdr["srcIP"], "172.16.1.20");
    assert_eq!(tdr["path"], "/v1/enroll");
    assert_eq!(tdr["header"], json!({"x-request-id": "abc"}));
    assert_eq!(tdr["req"], json!({"studentId": "s-1"}));
    assert_eq!(tdr["resp"], json!([{"status": "failed"}]));
    assert_eq!(tdr["error"], "downstream timeout");
    assert_eq!(tdr["addData"], json!({"branch": "jkt"}));

    let rt = tdr["rt"].as_i64().unwrap();
    assert!((25..2000).contains(&rt), "unexpected rt: {rt}");
}

#[test]
fn t4_opportunistic_parse_applies_to_response_values() {
    let logs = LogDir::new();
    let session = decorated_session(logs.logger());

    session.t4(&[LogValue::from(r#"{"a":1}"#), LogValue::from("not json")]);

    let tdr = &logs.lines("tdr.log")[0];
    assert_eq!(tdr["resp"], json!([{"a": 1}, "not json"]));
}

// ── Fan-out sharing ──────────────────────────────────────────────

#[test]
fn shared_session_supports_parallel_workers() {
    let logs = LogDir::new();
    let session = Arc::new(decorated_session(logs.logger()));

    let mut handles = Vec::new();
    for w in 0..4 {
        let session = session.clone();
        handles.push(std::thread::spawn(move || {
            session.put(format!("worker-{w}"), format!("done-{w}"));
            session.info(&[format!("worker {w} finished").into()]);
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    session.t4(&[]);

    assert_eq!(logs.lines("app.log").len(), 5);
    let tdr = &logs.lines("tdr.log")[0];
    for w in 0..4 {
        assert_eq!(tdr["addData"][format!("worker-{w}")], format!("done-{w}"));
    }
}
