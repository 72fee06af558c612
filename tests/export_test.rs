#![allow(clippy::expect_used)]

use rs_chat_export::{
    export_bytes, export_conversation, export_html, handle_export_request, Error, ExportOptions, ExportResponse,
    Platform, Reaction, ReactionMode, SettlePolicy, SnapshotPage,
};
use serde_json::Value;

fn options() -> ExportOptions {
    ExportOptions {
        settle: SettlePolicy::none(),
        ..ExportOptions::default()
    }
}

fn lines(jsonl: &str) -> Vec<Value> {
    jsonl
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid JSON line"))
        .collect()
}

const CHATGPT_PAGE: &str = r#"<html><head><title>ChatGPT - Sorting in Python</title></head><body>
<div data-message-author-role="user"><div class="whitespace-pre-wrap">How do I sort a list?</div></div>
<div data-message-author-role="assistant"><div class="markdown prose">
  <p>Use <code>sorted</code>:</p>
  <pre><div><div>python</div><button>Copy code</button></div><div><code class="language-python">print(sorted([3, 1, 2]))</code></div></pre>
</div></div>
</body></html>"#;

#[test]
fn chatgpt_end_to_end() {
    let export = export_html(CHATGPT_PAGE, "https://chatgpt.com/c/42", &options()).expect("export");

    assert_eq!(export.metadata.platform, Platform::ChatGpt);
    assert_eq!(export.metadata.title.as_deref(), Some("Sorting in Python"));
    assert_eq!(export.message_count, 2);
    assert!(!export.has_artifact);

    let records = lines(&export.jsonl);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["platform"], "chatgpt");
    assert_eq!(records[0]["title"], "Sorting in Python");
    assert_eq!(records[1]["content"], "How do I sort a list?");
    let content = records[2]["content"].as_str().expect("assistant content");
    assert!(content.starts_with("Use `sorted`:"), "{content}");
    assert!(content.ends_with("\n\n```python\nprint(sorted([3, 1, 2]))\n```"), "{content}");
}

#[test]
fn unsupported_url_is_rejected() {
    let err = export_html(CHATGPT_PAGE, "https://example.com/c/42", &options())
        .expect_err("not a chat platform");
    assert!(matches!(err, Error::UnsupportedPlatform(_)));
}

#[test]
fn byte_snapshots_report_the_same_errors() {
    let err = export_bytes(CHATGPT_PAGE.as_bytes(), "https://example.com/c/42", &options())
        .expect_err("not a chat platform");
    assert!(matches!(err, Error::UnsupportedPlatform(ref url) if url == "https://example.com/c/42"));

    let empty = b"<html><body><p>nothing</p></body></html>";
    let err = export_bytes(empty, "https://gemini.google.com/app/1", &options()).expect_err("no turns");
    assert!(matches!(err, Error::EmptyConversation { .. }));

    let export = export_bytes(CHATGPT_PAGE.as_bytes(), "https://chatgpt.com/c/42", &options()).expect("export");
    assert_eq!(export.message_count, 2);
}

#[test]
fn generation_blocks_before_any_control_is_actuated() {
    let html = r#"
        <div data-testid="user-message"><p class="whitespace-pre-wrap">Write</p></div>
        <div data-is-streaming="true"><div class="standard-markdown"><p>Half</p></div>
          <div class="artifact-block-cell"><button aria-label="Preview contents">Doc</button></div>
        </div>"#;
    let page = SnapshotPage::new("https://claude.ai/chat/1", html);

    let err = export_conversation(&page, &options()).expect_err("still generating");
    assert!(matches!(err, Error::GenerationInProgress { ref platform } if platform == "Claude"));
    assert!(page.activations().is_empty());
}

#[test]
fn empty_page_is_rejected_by_default() {
    let err = export_html("<html><body><main></main></body></html>", "https://gemini.google.com/app/1", &options())
        .expect_err("no turns");
    assert!(matches!(err, Error::EmptyConversation { .. }));
    assert!(err.to_string().starts_with("Gemini: No messages found"));
}

#[test]
fn empty_page_can_export_metadata_only() {
    let options = ExportOptions {
        reject_empty: false,
        ..options()
    };
    let export = export_html("<html><body></body></html>", "https://gemini.google.com/app/1", &options)
        .expect("metadata-only export");
    assert_eq!(export.message_count, 0);
    assert_eq!(export.jsonl.lines().count(), 1);
    assert_eq!(lines(&export.jsonl)[0]["_meta"], Value::Bool(true));
}

#[test]
fn one_unclassifiable_turn_aborts_the_export() {
    let html = r#"
        <div data-message-author-role="user"><div class="whitespace-pre-wrap">ok</div></div>
        <div data-message-author-role="tool"><div class="markdown">x</div></div>
        <div data-message-author-role="assistant"><div class="markdown">fine</div></div>"#;
    let page = SnapshotPage::new("https://chatgpt.com/c/1", html);

    let err = export_conversation(&page, &options()).expect_err("tool turn");
    let Error::RoleResolution { platform, diagnostic } = err else {
        panic!("expected a role error");
    };
    assert_eq!(platform, "ChatGPT");
    assert!(diagnostic
        .attributes
        .iter()
        .any(|(name, value)| name == "data-message-author-role" && value == "tool"));
}

#[test]
fn claude_export_with_artifact() {
    let html = r#"<html><head><title>Claude</title></head><body>
        <button data-testid="chat-menu-trigger">✨ Poetry session</button>
        <div data-testid="user-message"><p class="whitespace-pre-wrap">Write a poem</p></div>
        <div data-is-streaming="false">
          <div class="grid overflow-hidden" style="height:0;opacity:0"><div class="standard-markdown"><p>thinking</p></div></div>
          <div class="standard-markdown"><p>Here is your poem.</p></div>
          <div class="artifact-block-cell"><button aria-label="Preview contents">Autumn</button></div>
        </div>
        <div id="side"></div>
    </body></html>"#;
    let page = SnapshotPage::new("https://claude.ai/chat/7", html).with_reaction(Reaction::new(
        r#"button[aria-label="Preview contents"]"#,
        "#side",
        r#"<div id="markdown-artifact"><div class="standard-markdown"><h2>Autumn</h2><p><em>Leaves</em> fall.</p></div></div>"#,
        ReactionMode::SetInner,
    ));

    let export = export_conversation(&page, &options()).expect("export");
    assert!(export.has_artifact);
    assert_eq!(export.metadata.title.as_deref(), Some("Poetry session"));

    let records = lines(&export.jsonl);
    assert_eq!(records.len(), export.message_count + 2);
    assert_eq!(records[2]["content"], "Here is your poem.");
    assert_eq!(records[3]["_artifact"], Value::Bool(true));
    assert_eq!(records[3]["title"], "Autumn");
    assert_eq!(records[3]["version"], "v1");
    let artifact = records[3]["content"].as_str().expect("artifact content");
    assert!(artifact.starts_with("## Autumn"), "{artifact}");
    assert!(artifact.contains("*Leaves* fall."), "{artifact}");
}

#[test]
fn artifact_can_be_skipped() {
    let html = r#"
        <div data-testid="user-message"><p class="whitespace-pre-wrap">q</p></div>
        <div id="markdown-artifact"><div class="standard-markdown"><p>doc</p></div></div>"#;
    let options = ExportOptions {
        include_artifact: false,
        ..options()
    };
    let export = export_html(html, "https://claude.ai/chat/1", &options).expect("export");
    assert!(!export.has_artifact);
    assert_eq!(export.jsonl.lines().count(), 2);
}

#[test]
fn grok_export_recovers_diagram_source() {
    let html = r#"<html><head><title>Flowchart - Grok</title></head><body>
        <div><div class="message-bubble"><p>Draw it</p></div><button aria-label="Edit"></button></div>
        <div><div class="message-bubble">
            <div class="group/mermaid"><div class="mpr-rendered"><svg><style>.n{}</style><text>A</text></svg></div><button aria-label="원본 보기"></button></div>
        </div><button aria-label="Regenerate"></button></div>
    </body></html>"#;
    let page = SnapshotPage::new("https://grok.com/chat/1", html).with_reaction(Reaction::new(
        r#"button[aria-label="원본 보기"]"#,
        r#"div[class*="group/mermaid"]"#,
        r#"<pre><code class="language-mermaid">graph LR; A--&gt;B</code></pre>"#,
        ReactionMode::SetInner,
    ));

    let export = export_conversation(&page, &options()).expect("export");
    let records = lines(&export.jsonl);
    assert_eq!(records[0]["title"], "Flowchart");
    assert_eq!(records[1]["role"], "user");
    assert_eq!(records[2]["role"], "assistant");
    assert_eq!(records[2]["content"], "```mermaid\ngraph LR; A-->B\n```");
}

#[test]
fn response_shapes() {
    let ok = handle_export_request(&SnapshotPage::new("https://chatgpt.com/c/1", CHATGPT_PAGE), &options());
    assert!(ok.success);
    assert!(ok.error.is_none());
    let json = serde_json::to_value(&ok).expect("serialize");
    assert_eq!(json["success"], Value::Bool(true));
    assert!(json["data"].as_str().is_some_and(|d| d.lines().count() == 3));
    assert!(json.get("error").is_none());

    let failed: ExportResponse =
        handle_export_request(&SnapshotPage::new("https://gemini.google.com/app", "<p></p>"), &options());
    assert!(!failed.success);
    let json = serde_json::to_value(&failed).expect("serialize");
    assert!(json.get("data").is_none());
    assert_eq!(
        json["error"],
        "Gemini: No messages found in this conversation. Please ensure the conversation has at least one message before exporting."
    );
}
