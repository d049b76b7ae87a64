// tests/notify_telegram.rs
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use burgoscf_bot::{Notifier, TelegramNotifier};

#[tokio::test]
async fn deliver_posts_chat_id_and_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTEST_TOKEN/sendMessage"))
        .and(body_partial_json(serde_json::json!({
            "chat_id": "@BurgosCF",
            "text": "hola"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::new("TEST_TOKEN".into(), "@BurgosCF".into())
        .with_api_base(server.uri());
    notifier.deliver("hola").await.expect("delivery ok");
}

#[tokio::test]
async fn server_error_is_retried_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTEST_TOKEN/sendMessage"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/botTEST_TOKEN/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::new("TEST_TOKEN".into(), "@BurgosCF".into())
        .with_api_base(server.uri())
        .with_retries(2);
    notifier.deliver("gol").await.expect("retry succeeds");
}

#[tokio::test]
async fn retries_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/botTEST_TOKEN/sendMessage"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::new("TEST_TOKEN".into(), "@BurgosCF".into())
        .with_api_base(server.uri())
        .with_retries(2);
    assert!(notifier.deliver("gol").await.is_err());
}
