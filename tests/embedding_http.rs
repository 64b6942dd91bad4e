//! HTTP-level tests for the embedding client against a mock provider

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatkb_retrieval::domain::embedding::{
    EmbeddingConfig, EmbeddingConfigOverrides, EmbeddingProvider,
};
use chatkb_retrieval::infrastructure::embedding::OpenAiEmbeddingProvider;
use chatkb_retrieval::infrastructure::http::HttpClient;
use chatkb_retrieval::RetrievalError;

fn provider(base_url: &str, timeout: Duration) -> OpenAiEmbeddingProvider<HttpClient> {
    let config = EmbeddingConfig::new("sk-test")
        .with_dimensions(4)
        .with_base_url(base_url)
        .resolve(&EmbeddingConfigOverrides::none())
        .unwrap();

    OpenAiEmbeddingProvider::new(HttpClient::with_timeout(timeout).unwrap(), config)
}

fn embedding_response(count: usize) -> serde_json::Value {
    let data: Vec<serde_json::Value> = (0..count)
        .map(|i| json!({"index": i, "embedding": [0.1, 0.2, 0.3, 0.4]}))
        .collect();

    json!({"data": data, "usage": {"total_tokens": 9}})
}

#[tokio::test]
async fn embeds_single_text_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "text-embedding-3-small",
            "input": "Qual o horário de atendimento?",
            "dimensions": 4,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(embedding_response(1)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server.uri(), Duration::from_secs(5));
    let result = provider.embed("Qual o horário de atendimento?").await.unwrap();

    assert_eq!(result.vector(), &[0.1, 0.2, 0.3, 0.4]);
    assert_eq!(result.tokens(), 9);
}

#[tokio::test]
async fn batch_call_distributes_token_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(embedding_response(2)))
        .mount(&server)
        .await;

    let provider = provider(&server.uri(), Duration::from_secs(5));
    let texts = vec!["primeira".to_string(), "segunda".to_string()];
    let results = provider.embed_batch(&texts).await.unwrap();

    assert_eq!(results.len(), 2);
    // ceil(9 / 2) = 5
    for result in &results {
        assert_eq!(result.tokens(), 5);
    }
}

#[tokio::test]
async fn rate_limit_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
        .mount(&server)
        .await;

    let provider = provider(&server.uri(), Duration::from_secs(5));
    let result = provider.embed("query").await;

    match result {
        Err(RetrievalError::Provider { status, body }) => {
            assert_eq!(status, 429);
            assert!(body.contains("Rate limit exceeded"));
        }
        other => panic!("expected provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn slow_provider_times_out_as_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(embedding_response(1))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let provider = provider(&server.uri(), Duration::from_millis(100));
    let result = provider.embed("query").await;

    assert!(matches!(
        result,
        Err(RetrievalError::ProviderUnavailable { .. })
    ));
}
