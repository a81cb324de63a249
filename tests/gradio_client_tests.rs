use serde_json::json;
use std::sync::Arc;
use tryme_backend::{
    Error,
    config::SpaceConfig,
    gradio::{GradioTryOnClient, TryOnClient},
};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn space_config(server: &MockServer) -> SpaceConfig {
    SpaceConfig {
        base_url: server.uri(),
        hf_token: None,
    }
}

async fn mock_config_endpoint(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "4.0"})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn try_on_posts_the_fixed_tuple_and_returns_the_envelope() {
    let server = MockServer::start().await;
    mock_config_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/run/tryon"))
        .and(body_string_contains("Virtual try-on from TryMe"))
        .and(body_string_contains("data:image/png;base64,"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": ["data:image/png;base64,AAA==", null]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = GradioTryOnClient::new(space_config(&server));
    let envelope = client.try_on(b"human", b"garment").await.unwrap();

    assert_eq!(envelope.data.len(), 2);
    assert_eq!(envelope.data[0], json!("data:image/png;base64,AAA=="));
}

#[tokio::test]
async fn concurrent_first_calls_establish_one_connection() {
    let server = MockServer::start().await;
    // expect(1): racing callers must converge on a single /config fetch.
    mock_config_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/run/tryon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["x.png"]})))
        .expect(5)
        .mount(&server)
        .await;

    let client = Arc::new(GradioTryOnClient::new(space_config(&server)));

    let mut handles = vec![];
    for _ in 0..5 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.try_on(b"human", b"garment").await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    server.verify().await;
}

#[tokio::test]
async fn auth_token_is_sent_as_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/config"))
        .and(header("authorization", "Bearer hf_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/run/tryon"))
        .and(header("authorization", "Bearer hf_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["x.png"]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = GradioTryOnClient::new(SpaceConfig {
        base_url: server.uri(),
        hf_token: Some("hf_test".to_string()),
    });

    client.try_on(b"human", b"garment").await.unwrap();
    server.verify().await;
}

#[tokio::test]
async fn unreachable_space_is_a_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = GradioTryOnClient::new(space_config(&server));
    let err = client.try_on(b"human", b"garment").await.unwrap_err();

    assert!(matches!(err, Error::Remote(_)));
}

#[tokio::test]
async fn failed_prediction_is_a_remote_error() {
    let server = MockServer::start().await;
    mock_config_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/run/tryon"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = GradioTryOnClient::new(space_config(&server));
    let err = client.try_on(b"human", b"garment").await.unwrap_err();

    assert!(matches!(err, Error::Remote(_)));
}

#[tokio::test]
async fn unparseable_envelope_is_a_remote_error() {
    let server = MockServer::start().await;
    mock_config_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/run/tryon"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = GradioTryOnClient::new(space_config(&server));
    let err = client.try_on(b"human", b"garment").await.unwrap_err();

    assert!(matches!(err, Error::Remote(_)));
}
