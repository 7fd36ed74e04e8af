use std::sync::Arc;

use ctx_logger::{Level, LineFlags, Logger, MemorySink, TraceContext};
use serde_json::{json, Value};

fn memory_logger() -> (Logger, MemorySink) {
    let sink = MemorySink::new();
    let logger = Logger::new(Arc::new(sink.clone()), "", LineFlags::NONE);
    (logger, sink)
}

fn records(sink: &MemorySink) -> Vec<Value> {
    sink.lines()
        .iter()
        .map(|line| serde_json::from_str(line).expect("each line is one JSON object"))
        .collect()
}

#[test]
fn with_fields_does_not_alter_parent() {
    let (root, _) = memory_logger();
    let parent = root
        .with_field("a", json!(1))
        .with_context("req-1")
        .with_caller(0);
    let callers_before = parent.callers().to_vec();

    let _child = parent.with_fields([("a", json!(2)), ("b", json!(3))]);

    assert_eq!(parent.fields().len(), 1);
    assert_eq!(parent.fields()["a"], json!(1));
    assert_eq!(parent.context(), Some(&TraceContext::from("req-1")));
    assert_eq!(parent.callers(), callers_before.as_slice());
}

#[test]
fn merge_overwrites_existing_keys() {
    let (root, _) = memory_logger();
    let parent = root.with_field("a", json!(1));
    let child = parent.with_fields([("a", json!(2)), ("b", json!(3))]);

    assert_eq!(child.fields().len(), 2);
    assert_eq!(child.fields()["a"], json!(2));
    assert_eq!(child.fields()["b"], json!(3));
    assert_eq!(parent.fields()["a"], json!(1));
}

#[test]
fn explicit_message_beats_message_field() {
    let (root, sink) = memory_logger();
    root.with_field("message", json!("shadow")).info("real");

    let out = records(&sink);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["message"], "real");
}

#[test]
fn single_frame_capture_is_stable_per_call_site() {
    let (root, _) = memory_logger();
    let captured: Vec<Vec<String>> = (0..5).map(|_| root.with_caller(0).callers().to_vec()).collect();

    assert_eq!(captured[0].len(), 1);
    assert!(captured.iter().all(|c| c == &captured[0]));
    assert!(
        captured[0][0].contains("logger_tests.rs"),
        "unexpected frame {:?}",
        captured[0][0]
    );
}

#[test]
fn unresolvable_frame_keeps_parent_callers() {
    let (root, _) = memory_logger();
    let parent = root.with_caller(0);
    let child = parent.with_caller(10_000);
    assert_eq!(child.callers(), parent.callers());
}

#[test]
fn with_caller_replaces_rather_than_appends() {
    let (root, _) = memory_logger();
    let full = root.with_callers_frames();
    let single = full.with_caller(0);
    assert_eq!(single.callers().len(), 1);
}

fn recurse(depth: usize, logger: &Logger) -> Logger {
    if depth == 0 {
        logger.with_callers_frames()
    } else {
        let child = recurse(depth - 1, logger);
        std::hint::black_box(child)
    }
}

#[cfg(feature = "stacktrace")]
#[test]
#[cfg_attr(not(debug_assertions), ignore = "frames need debug info to resolve")]
fn full_stack_capture_is_capped() {
    use ctx_logger::caller::MAX_CALLER_DEPTH;

    let (root, _) = memory_logger();
    let deep = recurse(60, &root);
    assert_eq!(deep.callers().len(), MAX_CALLER_DEPTH);
    assert!(deep.callers()[0].contains("recurse"), "got {:?}", deep.callers()[0]);

    let shallow = root.with_callers_frames();
    assert!(!shallow.callers().is_empty());
    assert!(shallow.callers().len() <= MAX_CALLER_DEPTH);
    assert!(
        shallow.callers()[0].contains("full_stack_capture_is_capped"),
        "immediate caller first, got {:?}",
        shallow.callers()[0]
    );
}

#[cfg(not(feature = "stacktrace"))]
#[test]
fn full_stack_capture_is_empty_without_stacktrace() {
    let (root, _) = memory_logger();
    assert!(recurse(60, &root).callers().is_empty());
    assert!(root.with_callers_frames().callers().is_empty());
}

#[test]
fn error_record_round_trips() {
    let (root, sink) = memory_logger();
    root.with_fields([("user", json!("u1"))]).error("boom");

    let out = records(&sink);
    assert_eq!(out[0]["level"], "error");
    assert_eq!(out[0]["message"], "boom");
    assert_eq!(out[0]["user"], "u1");
}

#[test]
fn fatal_and_panic_only_write() {
    let (root, sink) = memory_logger();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        root.fatal("fatal message");
        root.fatalf(format_args!("fatal {}", 1));
        root.panic("panic message");
        root.panicf(format_args!("panic {}", 2));
    }));
    assert!(result.is_ok());

    let levels: Vec<Value> = records(&sink).into_iter().map(|r| r["level"].clone()).collect();
    assert_eq!(levels, [json!("fatal"), json!("fatal"), json!("panic"), json!("panic")]);
}

#[test]
fn request_scenario_writes_one_info_record() {
    let (root, sink) = memory_logger();
    root.with_fields([("req_id", json!("abc"))])
        .infof(format_args!("start {}", "job1"));

    let out = records(&sink);
    assert_eq!(out.len(), 1);
    let record = &out[0];
    assert_eq!(record["level"], "info");
    assert_eq!(record["message"], "start job1");
    assert_eq!(record["req_id"], "abc");
    assert_eq!(record["callers"], json!([]));
    assert!(record["context"].is_null());
}

#[test]
fn record_carries_context_and_callers() {
    let (root, sink) = memory_logger();
    root.with_context(json!({"trace_id": "t-9"}))
        .with_caller(0)
        .warn(ctx_logger::concat_values!("retry ", 3, " of ", 5));

    let record = &records(&sink)[0];
    assert_eq!(record["context"], json!({"trace_id": "t-9"}));
    assert_eq!(record["message"], "retry 3 of 5");
    assert_eq!(record["callers"].as_array().unwrap().len(), 1);
}

#[test]
fn time_is_taken_at_output() {
    let (root, sink) = memory_logger();
    let derived = root.with_field("k", json!("v"));
    let before = chrono::Local::now().timestamp_nanos_opt().unwrap();
    derived.output(Level::Debug, "late");
    let after = chrono::Local::now().timestamp_nanos_opt().unwrap();

    let time = records(&sink)[0]["time"].as_i64().unwrap();
    assert!(before <= time && time <= after);
}

#[test]
fn prefix_and_flags_frame_the_line() {
    let sink = MemorySink::new();
    let root = Logger::new(Arc::new(sink.clone()), "[svc] ", LineFlags::DATE);
    root.info("hello");

    let line = &sink.lines()[0];
    assert!(line.starts_with("[svc] "));
    // `[svc] YYYY/MM/DD {json}`
    let json_start = line.find('{').unwrap();
    assert_eq!(json_start, "[svc] ".len() + "2009/01/23 ".len());
    let record: Value = serde_json::from_str(&line[json_start..]).unwrap();
    assert_eq!(record["message"], "hello");
}

#[test]
fn concurrent_derivation_and_emission() {
    let (root, sink) = memory_logger();
    let template = root.with_field("service", json!("orders"));

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let template = &template;
            scope.spawn(move || {
                let log = template.with_field("worker", json!(worker));
                for i in 0..25 {
                    log.infof(format_args!("tick {}", i));
                }
            });
        }
    });

    let out = records(&sink);
    assert_eq!(out.len(), 8 * 25);
    assert!(out.iter().all(|r| r["service"] == "orders"));
    assert_eq!(template.fields().len(), 1);
}
