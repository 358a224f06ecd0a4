#![cfg(feature = "serde")]

use plan_tools::{tags, TraceEvent, TraceLog};

#[test]
fn trace_log_json_roundtrip() {
    let log = TraceLog {
        events: vec![
            TraceEvent::new(1, tags::UTILITY_SELECT).with_a(2).with_b(0),
            TraceEvent::new(1, tags::GOAP_PLAN_OK).with_a(3).with_b(9),
            TraceEvent::new(2, tags::EXEC_SUBMIT).with_a(4).with_b(40),
        ],
    };

    let json = serde_json::to_string(&log).expect("serialize");
    let roundtrip: TraceLog = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(roundtrip, log);
}
