// tests/commands_start.rs
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use burgoscf_bot::commands::CommandListener;

#[tokio::test]
async fn start_command_gets_the_static_ack() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/botTEST_TOKEN/getUpdates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": [
                {
                    "update_id": 100,
                    "message": { "text": "/start", "chat": { "id": 42 } }
                },
                {
                    "update_id": 101,
                    "message": { "text": "hola bot", "chat": { "id": 43 } }
                }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/botTEST_TOKEN/sendMessage"))
        .and(body_partial_json(serde_json::json!({
            "chat_id": 42,
            "text": "¡Bot del Burgos CF en marcha!"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let listener = CommandListener::new("TEST_TOKEN".into()).with_api_base(server.uri());
    let next = listener.poll_once(0).await.expect("poll ok");
    assert_eq!(next, 102, "offset must advance past both updates");
}

#[tokio::test]
async fn empty_update_batch_keeps_the_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/botTEST_TOKEN/getUpdates"))
        .and(query_param("offset", "7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"ok": true, "result": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let listener = CommandListener::new("TEST_TOKEN".into()).with_api_base(server.uri());
    let next = listener.poll_once(7).await.expect("poll ok");
    assert_eq!(next, 7);
}
