#![allow(clippy::expect_used)]

use chrono::{DateTime, TimeZone, Utc};
use rs_chat_export::{
    ArtifactRecord, ConvertOptions, ExportMetadata, ParsedMessage, Platform, RecordBuilder, Role,
};
use serde_json::Value;

fn fixed(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
}

fn metadata(title: Option<&str>) -> ExportMetadata {
    ExportMetadata {
        platform: Platform::Claude,
        url: "https://claude.ai/chat/abc".to_string(),
        exported_at: fixed(1_764_410_400),
        title: title.map(str::to_string),
    }
}

fn parse_lines(jsonl: &str) -> Vec<Value> {
    jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("every line is one JSON object"))
        .collect()
}

#[test]
fn line_count_matches_messages_plus_meta() {
    let builder = RecordBuilder::new(ConvertOptions::default(), fixed(0));
    let messages = vec![
        ParsedMessage::new(Role::User, "Hi"),
        ParsedMessage::new(Role::Assistant, "<p>Hello <strong>you</strong></p>"),
    ];

    let out = builder.build(&messages, &metadata(Some("Greeting")), None).expect("build");
    let lines = parse_lines(&out);
    assert_eq!(lines.len(), messages.len() + 1);

    assert_eq!(lines[0]["_meta"], Value::Bool(true));
    assert_eq!(lines[0]["platform"], "claude");
    assert_eq!(lines[0]["url"], "https://claude.ai/chat/abc");
    assert_eq!(lines[0]["exported_at"], "2025-11-29T10:00:00.000Z");
    assert_eq!(lines[0]["title"], "Greeting");

    assert_eq!(lines[1]["role"], "user");
    assert_eq!(lines[1]["content"], "Hi");
    assert_eq!(lines[2]["role"], "assistant");
    assert!(lines[2]["content"].as_str().is_some_and(|c| c.contains("Hello **you**")));
}

#[test]
fn untimed_messages_get_build_time() {
    let now = fixed(1_700_000_000);
    let builder = RecordBuilder::new(ConvertOptions::default(), now);
    let mut timed = ParsedMessage::new(Role::User, "a");
    timed.timestamp = Some(fixed(1_600_000_000));
    let messages = vec![timed, ParsedMessage::new(Role::Assistant, "b")];

    let lines = parse_lines(&builder.build(&messages, &metadata(None), None).expect("build"));
    assert_eq!(lines[1]["timestamp"], "2020-09-13T12:26:40.000Z");
    assert_eq!(lines[2]["timestamp"], "2023-11-14T22:13:20.000Z");
}

#[test]
fn empty_conversation_is_metadata_only() {
    let builder = RecordBuilder::new(ConvertOptions::default(), fixed(0));
    let out = builder.build(&[], &metadata(None), None).expect("build");

    assert_eq!(out.lines().count(), 1);
    let meta = &parse_lines(&out)[0];
    assert!(meta.get("title").is_none());
}

#[test]
fn artifact_line_comes_last() {
    let builder = RecordBuilder::new(ConvertOptions::default(), fixed(0));
    let artifact = ArtifactRecord {
        title: "Poem".to_string(),
        version: "v2".to_string(),
        content_html: "<h1>Ode</h1><p>lines</p>".to_string(),
    };
    let messages = vec![ParsedMessage::new(Role::User, "write")];

    let out = builder
        .build(&messages, &metadata(None), Some(&artifact))
        .expect("build");
    let lines = parse_lines(&out);
    assert_eq!(lines.len(), messages.len() + 2);

    let last = &lines[2];
    assert_eq!(last["_artifact"], Value::Bool(true));
    assert_eq!(last["title"], "Poem");
    assert_eq!(last["version"], "v2");
    let content = last["content"].as_str().expect("artifact content");
    assert!(content.starts_with("# Ode"), "{content}");
    assert!(content.ends_with("lines"), "{content}");
}

#[test]
fn newlines_in_content_stay_inside_one_line() {
    let builder = RecordBuilder::new(ConvertOptions::default(), fixed(0));
    let messages = vec![ParsedMessage::new(
        Role::Assistant,
        "<p>one</p><p>two</p><pre><code>a\nb</code></pre>",
    )];

    let out = builder.build(&messages, &metadata(None), None).expect("build");
    assert_eq!(out.lines().count(), 2);
    let content = parse_lines(&out)[1]["content"].as_str().map(str::to_string).unwrap_or_default();
    assert!(content.starts_with("one"), "{content}");
    assert!(content.contains("two"), "{content}");
    assert!(content.ends_with("```\na\nb\n```"), "{content}");
}
