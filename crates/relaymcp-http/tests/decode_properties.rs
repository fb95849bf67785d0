//! Property-based tests for response body normalization
//!
//! Uses proptest to verify:
//! - Plain JSON objects pass through unchanged
//! - Single-event SSE bodies yield exactly the embedded payload
//! - Decode failures never quote more than a bounded excerpt

use proptest::prelude::*;
use relaymcp_http::error::BODY_EXCERPT_CHARS;
use relaymcp_http::{ClientError, extract_payload};
use serde_json::{Map, Value};

/// Strategy for leaf JSON values
fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 :{}\\[\\]\"\\\\\n-]{0,24}".prop_map(Value::String),
    ]
}

/// Strategy for JSON objects nested up to a few levels
fn json_object() -> impl Strategy<Value = Value> {
    let value = json_leaf().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    });
    prop::collection::btree_map("[a-zA-Z_]{1,12}", value, 0..6)
        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: a serialized JSON object is returned unchanged
    #[test]
    fn prop_json_object_passes_through(object in json_object()) {
        let body = serde_json::to_string(&object).unwrap();
        prop_assert_eq!(extract_payload(&body).unwrap(), body.as_str());
    }

    /// Property: pretty-printed JSON objects also pass through
    #[test]
    fn prop_pretty_json_passes_through(object in json_object()) {
        let body = serde_json::to_string_pretty(&object).unwrap();
        prop_assert_eq!(extract_payload(&body).unwrap(), body.as_str());
    }

    /// Property: a single SSE message event yields its data payload
    #[test]
    fn prop_sse_event_yields_payload(object in json_object(), event_id in 0u32..1000) {
        let payload = serde_json::to_string(&object).unwrap();
        let body = format!("id: {event_id}\nevent: message\ndata: {payload}\n\n");
        prop_assert_eq!(extract_payload(&body).unwrap(), payload.as_str());
    }

    /// Property: undecodable bodies fail with a bounded excerpt
    #[test]
    fn prop_failure_excerpt_is_bounded(prefix in "[a-z ]{0,40}", padding in 0usize..2000) {
        let body = format!("{prefix}not json or sse{}", "x".repeat(padding));
        let err = extract_payload(&body).unwrap_err();
        let ClientError::Decode(message) = err else {
            return Err(TestCaseError::fail("expected decode error"));
        };
        let excerpt = message
            .strip_prefix("no JSON payload in response body: ")
            .expect("excerpt prefix");
        prop_assert!(excerpt.chars().count() <= BODY_EXCERPT_CHARS);
        prop_assert!(body.starts_with(excerpt));
    }
}

#[test]
fn test_sse_example_from_wire() {
    let body = "event: message\ndata: {\"a\":1}\n\n";
    assert_eq!(extract_payload(body).unwrap(), "{\"a\":1}");
}

#[test]
fn test_long_garbage_is_truncated() {
    let body = format!("not json or sse{}", "x".repeat(500));
    let err = extract_payload(&body).unwrap_err();
    assert!(err.to_string().len() < 300);
}
