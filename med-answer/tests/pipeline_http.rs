use std::sync::Arc;

use ai_llm_service::{LlmModelConfig, LlmProvider, LlmServiceProfiles};
use med_answer::{
    AnswerError, AnswerPipeline, ChannelProgress, PipelineConfig, ProgressEvent, QueryCategory,
    QueryOrigin,
};
use pretty_assertions::assert_eq;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

fn profile(endpoint: String, max_tokens: u32) -> LlmModelConfig {
    LlmModelConfig {
        provider: LlmProvider::Perplexity,
        model: "sonar".into(),
        endpoint,
        api_key: Some("test-key".into()),
        max_tokens: Some(max_tokens),
        temperature: Some(0.1),
        top_p: None,
        timeout_secs: Some(5),
    }
}

fn pipeline(server: &MockServer) -> AnswerPipeline {
    let profiles = LlmServiceProfiles::new(
        profile(server.uri(), 1000),
        Some(profile(server.uri(), 200)),
    )
    .expect("profiles");
    AnswerPipeline::new(Arc::new(profiles), PipelineConfig::default())
}

fn sse_frame(content: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({ "choices": [{ "delta": { "content": content }, "finish_reason": null }] })
    )
}

#[tokio::test]
async fn streamed_answer_is_split_linked_and_gets_followups() {
    let server = MockServer::start().await;

    let sse = format!(
        "{}{}{}data: [DONE]\n\n",
        sse_frame("Start with 0.25mg once weekly [1], then increase per the guide [2]. Sou"),
        sse_frame("rces:\n1. Prescribing information: https://label.example/ozempic\n"),
        sse_frame("2. Dosing guide: https://guide.example/dosing"),
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({ "stream": true, "max_tokens": 1000 })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({ "stream": false, "max_tokens": 200 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": {
                "role": "assistant",
                "content": "What if I miss a dose?\n\nCan the dose go higher?\nHow do I inject it?\nIs it safe long term?"
            } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let progress = ChannelProgress::new(tx);
    let out = pipeline(&server)
        .process_query("What is the dosage for Ozempic?", QueryOrigin::TopLevel, &progress)
        .await
        .expect("answer");
    drop(progress);

    assert_eq!(out.answer.category(), QueryCategory::Dosage);
    assert_eq!(
        out.answer.body_text(),
        "Start with 0.25mg once weekly [[1]](https://label.example/ozempic), \
         then increase per the guide [[2]](https://guide.example/dosing). "
    );
    let titles: Vec<&str> = out.answer.sources().iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Prescribing information", "Dosing guide"]);
    assert_eq!(
        out.followups.questions(),
        ["What if I miss a dose?", "Can the dose go higher?", "How do I inject it?"]
    );

    let mut events = Vec::new();
    while let Some(ev) = rx.recv().await {
        events.push(ev);
    }
    let partial_bodies: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::Partial { body, .. } => Some(body.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(partial_bodies.len(), 3);
    assert!(partial_bodies.iter().all(|b| !b.contains("https://")));
    assert!(matches!(events.last(), Some(ProgressEvent::Finished(o)) if o.query == out.query));
}

#[tokio::test]
async fn refused_request_maps_to_upstream_refusal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"invalid api key\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let progress = ChannelProgress::new(tx);
    let err = pipeline(&server)
        .process_query("Can I drink alcohol on Wegovy?", QueryOrigin::TopLevel, &progress)
        .await
        .expect_err("refused");
    drop(progress);

    match err {
        AnswerError::UpstreamRefusal { status, snippet } => {
            assert_eq!(status, 401);
            assert!(snippet.contains("invalid api key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(rx.recv().await, Some(ProgressEvent::Failed(_))));
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn followup_query_skips_suggestion_call() {
    let server = MockServer::start().await;
    let sse = format!("{}data: [DONE]\n\n", sse_frame("Keep pens refrigerated before first use."));
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({ "stream": true })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({ "stream": false })))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let out = pipeline(&server)
        .process_query("How should I store it?", QueryOrigin::Followup, &med_answer::NoopProgress)
        .await
        .expect("answer");

    assert_eq!(out.answer.category(), QueryCategory::Storage);
    assert_eq!(out.answer.body_text(), "Keep pens refrigerated before first use.");
    assert!(out.answer.sources().is_empty());
    assert!(out.followups.is_empty());
}
