//! End-to-end rendering through the desensitization layout.
//!
//! These tests verify that:
//! - Sensitive values are masked inside otherwise byte-identical JSON
//! - The line prefix carries timestamp, pid, level and category
//! - The first-occurrence substitution limitation is preserved
//! - Rendering already-masked output changes nothing further

use chrono::{Local, TimeZone};
use desensitization::{
    desensitize, make_layout, DesensitizationLayout, FieldScanner, Layout, LayoutConfig, Level,
    LogEvent, MaskPolicy, Payload,
};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
struct Login {
    username: String,
    password: String,
}

fn login() -> Login {
    Login {
        username: "张三".into(),
        password: "a123456".into(),
    }
}

fn event_with(items: Vec<Payload>) -> LogEvent {
    let mut builder = LogEvent::builder()
        .start_time(Local.with_ymd_and_hms(2023, 11, 5, 9, 30, 0).unwrap())
        .pid(31337)
        .level(Level::Info)
        .category("default");
    for item in items {
        builder = builder.payload(item);
    }
    builder.build().unwrap()
}

#[test]
fn test_masks_password_and_keeps_username() {
    let render = make_layout(&LayoutConfig::desensitization(["password"])).unwrap();
    let event = event_with(vec![Payload::serialize(&login()).unwrap()]);

    let line = render(&event);

    assert_eq!(
        line,
        "2023-11-05 09:30:00 [31337] INFO [default] - \
         {\"username\":\"张三\",\"password\":\"a*****6\"}"
    );
}

#[test]
fn test_masked_payload_differs_only_in_the_value() {
    let layout = DesensitizationLayout::new(&LayoutConfig::desensitization(["password"])).unwrap();
    let plain = serde_json::to_string(&login()).unwrap();
    let event = event_with(vec![Payload::serialize(&login()).unwrap()]);

    let line = layout.format(&event);
    let payload = line.split_once(" - ").unwrap().1;

    assert_eq!(payload, plain.replace("a123456", "a*****6"));
    assert_eq!(payload.chars().count(), plain.chars().count());
}

#[test]
fn test_items_are_joined_with_single_spaces() {
    let layout = DesensitizationLayout::new(&LayoutConfig::desensitization(["token"])).unwrap();
    let event = event_with(vec![
        Payload::from("request"),
        Payload::from(json!({"token": "abcdef"})),
        Payload::from(json!([1, 2])),
        Payload::from(json!(404)),
    ]);

    let line = layout.format(&event);

    assert!(line.ends_with(r#"- request {"token":"a****f"} [1,2] 404"#));
}

#[test]
fn test_sensitive_text_inside_plain_strings_is_masked() {
    let layout = DesensitizationLayout::new(&LayoutConfig::desensitization(["password"])).unwrap();
    let event = event_with(vec![Payload::from(r#"raw body: {"password": "hunter2"}"#)]);

    let line = layout.format(&event);

    assert!(line.ends_with(r#"raw body: {"password": "h*****2"}"#));
}

#[test]
fn test_numeric_values_are_masked() {
    let layout = DesensitizationLayout::new(&LayoutConfig::desensitization(["pin"])).unwrap();
    let event = event_with(vec![Payload::from(json!({"pin": 987_654, "attempts": 3}))]);

    let line = layout.format(&event);

    assert!(line.ends_with(r#"{"pin":9****4,"attempts":3}"#));
}

#[test]
fn test_short_values_are_fully_masked() {
    let layout =
        DesensitizationLayout::new(&LayoutConfig::desensitization(["a", "b"]).with_mask('#'))
            .unwrap();
    let event = event_with(vec![Payload::from(json!({"a": "x", "b": "ab"}))]);

    let line = layout.format(&event);

    assert!(line.ends_with(r###"{"a":"#","b":"##"}"###));
}

#[test]
fn test_first_textual_occurrence_is_replaced() {
    // The unrelated "nickname" holds the same text and appears first, so it is
    // the occurrence that gets masked.
    let layout = DesensitizationLayout::new(&LayoutConfig::desensitization(["password"])).unwrap();
    let event = event_with(vec![
        Payload::from("hunter2 logged in"),
        Payload::from(json!({"nickname": "x", "password": "hunter2"})),
    ]);

    let line = layout.format(&event);

    assert!(line.ends_with(r#"h*****2 logged in {"nickname":"x","password":"hunter2"}"#));
}

#[test]
fn test_rescanning_masked_output_changes_nothing() {
    let scanner = FieldScanner::new(["password", "pin"]).unwrap();
    let policy = MaskPolicy::default();
    let content = r#"{"user":"bob","password":"a123456","pin":"42"} tail"#;

    let once = desensitize(content, &scanner, &policy);
    let twice = desensitize(&once, &scanner, &policy);

    assert_eq!(once, r#"{"user":"bob","password":"a*****6","pin":"**"} tail"#);
    assert_eq!(twice, once);
}

#[test]
fn test_levels_and_categories_in_prefix() {
    let layout = DesensitizationLayout::new(&LayoutConfig::default()).unwrap();
    let event = LogEvent::builder()
        .start_time(Local.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
        .pid(1)
        .level(Level::Fatal)
        .category("payments")
        .payload("boom")
        .build()
        .unwrap();

    assert_eq!(
        layout.format(&event),
        "2023-01-01 00:00:00 [1] FATAL [payments] - boom"
    );
}

#[test]
fn test_layouts_are_shared_across_threads() {
    let layout = std::sync::Arc::new(
        DesensitizationLayout::new(&LayoutConfig::desensitization(["password"])).unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let layout = std::sync::Arc::clone(&layout);
            std::thread::spawn(move || {
                let password = format!("pw{i}xyz");
                let event = event_with(vec![Payload::from(json!({ "password": password }))]);
                layout.format(&event)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let line = handle.join().unwrap();
        assert!(line.ends_with(r#"{"password":"p****z"}"#), "thread {i}: {line}");
    }
}
