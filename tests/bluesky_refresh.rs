// tests/bluesky_refresh.rs
//
// Token lifecycle of the Bluesky source: session creation on first use,
// refresh-once-and-retry on an ExpiredToken 401.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use burgoscf_bot::feed::providers::bluesky::BlueskyProvider;
use burgoscf_bot::feed::types::FeedSource;

fn timeline_body() -> serde_json::Value {
    serde_json::json!({
        "feed": [
            {
                "post": {
                    "cid": "bafy-post-1",
                    "uri": "at://did:plc:burgos/app.bsky.feed.post/1",
                    "text": "Victoria del Burgos CF en El Plantío",
                    "createdAt": "2025-08-30T20:15:00Z"
                }
            },
            { "post": null }
        ]
    })
}

fn provider(server: &MockServer) -> BlueskyProvider {
    BlueskyProvider::new(
        "burgoscf.bsky.social".into(),
        "bot@example.com".into(),
        "app-password".into(),
    )
    .with_api_base(server.uri())
}

#[tokio::test]
async fn first_fetch_creates_a_session_then_reads_timeline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"accessJwt": "jwt-1", "did": "did:plc:x"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.feed.getActorTimeline"))
        .and(header("authorization", "Bearer jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timeline_body()))
        .expect(1)
        .mount(&server)
        .await;

    let entries = provider(&server).fetch_latest().await.expect("fetch ok");
    assert_eq!(entries.len(), 1); // the null post is skipped
    assert_eq!(entries[0].key, "bafy-post-1");
    assert!(entries[0].message.starts_with("🌀 Bluesky:\n"));
    assert!(entries[0].message.contains("2025-08-30T20:15:00Z"));
}

#[tokio::test]
async fn expired_token_is_refreshed_once_and_retried_once() {
    let server = MockServer::start().await;

    // Stale token rejected exactly once, fresh token accepted.
    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.feed.getActorTimeline"))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            serde_json::json!({"error": "ExpiredToken", "message": "Token has expired"}),
        ))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.feed.getActorTimeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timeline_body()))
        .expect(1)
        .mount(&server)
        .await;
    // Two sessions total: the initial one and the single refresh.
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"accessJwt": "jwt-fresh"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let entries = provider(&server).fetch_latest().await.expect("fetch ok");
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn plain_401_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"accessJwt": "jwt-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.feed.getActorTimeline"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"error": "AuthRequired"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = provider(&server).fetch_latest().await.unwrap_err();
    assert!(err.to_string().contains("auth token expired"), "{err}");
}
