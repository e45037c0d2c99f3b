use ai_llm_service::{
    AiLlmError, ChatCompletionService, LlmModelConfig, LlmProvider,
    error_handler::{ProviderError, ProviderErrorKind},
};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn cfg(endpoint: String) -> LlmModelConfig {
    LlmModelConfig {
        provider: LlmProvider::Perplexity,
        model: "sonar".into(),
        endpoint,
        api_key: Some("test-key".into()),
        max_tokens: Some(1000),
        temperature: Some(0.1),
        top_p: None,
        timeout_secs: Some(5),
    }
}

fn sse_frame(content: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({ "choices": [{ "delta": { "content": content } }] })
    )
}

#[tokio::test]
async fn stream_yields_deltas_in_order() {
    let server = MockServer::start().await;
    let body = format!(
        "{}data: {{broken\n\n{}data: [DONE]\n\n",
        sse_frame("Take 0.25mg weekly. "),
        sse_frame("Sources:\n1. Label: http://x"),
    );

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({ "stream": true, "model": "sonar" })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let svc = ChatCompletionService::new(cfg(server.uri())).expect("client");
    let deltas: Vec<String> = svc
        .stream("What is the dosage for Ozempic?", Some("system"))
        .await
        .expect("stream opens")
        .map(|d| d.expect("delta"))
        .collect()
        .await;

    assert_eq!(
        deltas,
        vec!["Take 0.25mg weekly. ", "Sources:\n1. Label: http://x"]
    );
}

#[tokio::test]
async fn stream_non_success_status_is_http_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"invalid key\"}"))
        .mount(&server)
        .await;

    let svc = ChatCompletionService::new(cfg(server.uri())).expect("client");
    let err = match svc.stream("q", None).await {
        Ok(_) => panic!("expected refusal"),
        Err(e) => e,
    };
    let http = err.http_status().expect("http status error");
    assert_eq!(http.status.as_u16(), 401);
    assert!(http.snippet.contains("invalid key"));
}

#[tokio::test]
async fn generate_reads_message_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({ "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "Q1\nQ2\nQ3" } }]
        })))
        .mount(&server)
        .await;

    let svc = ChatCompletionService::new(cfg(server.uri())).expect("client");
    let out = svc.generate("prompt", None).await.expect("completion");
    assert_eq!(out, "Q1\nQ2\nQ3");
}

#[tokio::test]
async fn generate_without_choices_is_empty_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
        .mount(&server)
        .await;

    let svc = ChatCompletionService::new(cfg(server.uri())).expect("client");
    let err = svc.generate("prompt", None).await.expect_err("no choices");
    assert!(matches!(
        err,
        AiLlmError::Provider(ProviderError {
            kind: ProviderErrorKind::EmptyChoices,
            ..
        })
    ));
}
