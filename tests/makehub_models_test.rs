mod support;

use makehub_gateway::prelude::*;
use support::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_models(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("authorization", "Bearer KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(read_json("models.json")))
        .mount(server)
        .await;
}

#[tokio::test]
async fn lists_gateway_models() {
    let server = MockServer::start().await;
    mount_models(&server).await;

    let models = client_for(&server).list_models().await.unwrap();
    assert_eq!(models.len(), 2);

    let sonnet = models[0].to_model_info();
    assert_eq!(sonnet.context_window, Some(200_000));
    assert!(sonnet.supports_images);
    assert!(sonnet.supports_prompt_cache);
    assert_eq!(sonnet.cache_reads_price, Some(0.3));

    let r1 = &models[1];
    assert_eq!(r1.quantisation.as_deref(), Some("fp8"));
    assert_eq!(r1.thinking_config.as_ref().and_then(|t| t.max_budget), Some(32_000));
    let info = r1.to_model_info();
    assert!(!info.supports_images);
    assert_eq!(info.max_tokens, None);
}

#[tokio::test]
async fn listed_model_can_drive_a_turn() {
    let server = MockServer::start().await;
    mount_models(&server).await;
    mount_chat(&server, "inline_usage.chunks.txt").await;

    let lister = client_for(&server);
    let r1 = lister.get_model("deepseek/deepseek-r1").await.unwrap();

    let client = builder_for(&server)
        .model(r1.id())
        .model_info(r1.to_model_info())
        .build()
        .unwrap();
    assert!(client.model().uses_r1_format());

    let collected = collect_stream(client.create_message("sys", &[ChatMessage::user("Hi")]))
        .await
        .unwrap();
    let usage = collected.usage.unwrap();
    assert_eq!(
        usage.total_cost,
        makehub_gateway::calculate_cost(12, 5, &r1.to_model_info())
    );
}

#[tokio::test]
async fn unknown_model_is_reported_unavailable() {
    let server = MockServer::start().await;
    mount_models(&server).await;

    let client = client_for(&server);
    assert!(client.is_model_available("anthropic/claude-4-sonnet").await.unwrap());
    assert!(!client.is_model_available("nobody/nothing").await.unwrap());
    assert!(matches!(
        client.get_model("nobody/nothing").await,
        Err(LlmError::ApiError { code: 404, .. })
    ));
}

#[tokio::test]
async fn listing_errors_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(429).set_body_string("later"))
        .mount(&server)
        .await;

    let result = client_for(&server).list_models().await;
    assert!(matches!(result, Err(LlmError::RateLimitError(_))));
}
