//! End-to-end tests for the HTTP API.
//!
//! Each test starts the real server (SQLite store, migrations, seeding) on
//! a free port and drives it with `reqwest`.

use faqdesk::config::Config;
use faqdesk::server::run_server;
use serde_json::{json, Value};
use tempfile::TempDir;

const PASSWORD: &str = "server-test-secret";

fn test_config_with_port(tmp: &TempDir, port: u16) -> Config {
    let db_path = tmp.path().join("faqdesk.sqlite");
    let config_content = format!(
        r#"
[db]
path = "{}"

[server]
bind = "127.0.0.1:{}"

[admin]
password = "{}"
"#,
        db_path.display(),
        port,
        PASSWORD
    );
    Config::from_toml(&config_content).unwrap()
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

struct TestServer {
    _tmp: TempDir,
    base: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let tmp = TempDir::new().unwrap();
        let port = find_free_port();
        let cfg = test_config_with_port(&tmp, port);
        let handle = tokio::spawn(async move {
            run_server(&cfg).await.ok();
        });
        wait_for_server(port).await;
        Self {
            _tmp: tmp,
            base: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            handle,
        }
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn pending(&self) -> Vec<Value> {
        let (status, body) = self
            .post("/admin/pending/list", json!({ "password": PASSWORD }))
            .await;
        assert_eq!(status, 200);
        body["pending"].as_array().unwrap().clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .get(format!("{}/health", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_chat_found() {
    let server = TestServer::start().await;
    let (status, body) = server
        .post("/chat", json!({ "query": "reset my password" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["found"], true);
    assert!(body["reply"].as_str().unwrap().contains("Reset Password"));
    assert!(body["pending_id"].is_null());
    assert!(body["need_email"].is_null());
}

#[tokio::test]
async fn test_chat_empty_query_short_circuits() {
    let server = TestServer::start().await;
    let (status, body) = server.post("/chat", json!({ "query": "   " })).await;
    assert_eq!(status, 200);
    assert_eq!(body["reply"], "Please send a question.");
    assert_eq!(body["found"], false);
    assert!(body["pending_id"].is_null());
    assert_eq!(body["need_email"], false);
    assert!(server.pending().await.is_empty());
}

#[tokio::test]
async fn test_chat_fallback_then_attach_email() {
    let server = TestServer::start().await;
    let (status, body) = server.post("/chat", json!({ "query": "asdkfjasldkf" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["found"], false);
    assert_eq!(body["need_email"], true);
    let pending_id = body["pending_id"].as_i64().unwrap();

    let pending = server.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["id"], pending_id);
    assert_eq!(pending[0]["status"], "open");
    assert!(pending[0]["user_email"].is_null());

    let (status, _) = server
        .post(
            "/chat/email",
            json!({ "pending_id": pending_id, "email": "not-an-email" }),
        )
        .await;
    assert_eq!(status, 400);

    let (status, body) = server
        .post(
            "/chat/email",
            json!({ "pending_id": pending_id, "email": "user@example.com" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["ok"], true);
    assert_eq!(server.pending().await[0]["user_email"], "user@example.com");

    let (status, body) = server
        .post(
            "/chat/email",
            json!({ "pending_id": 9999, "email": "user@example.com" }),
        )
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, _) = server
        .post("/chat/email", json!({ "email": "user@example.com" }))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_admin_wrong_password_is_forbidden_and_changes_nothing() {
    let server = TestServer::start().await;
    let (_, body) = server.post("/chat", json!({ "query": "asdkfjasldkf" })).await;
    let pending_id = body["pending_id"].as_i64().unwrap();

    let (status, body) = server
        .post("/admin/pending/list", json!({ "password": "wrong" }))
        .await;
    assert_eq!(status, 403);
    assert_eq!(body["error"]["code"], "forbidden");

    let (status, _) = server
        .post(
            "/admin/pending/answer",
            json!({ "password": "wrong", "pending_id": pending_id, "answer": "x" }),
        )
        .await;
    assert_eq!(status, 403);

    let (status, _) = server
        .post("/admin/pending/delete", json!({ "pending_id": pending_id }))
        .await;
    assert_eq!(status, 403);

    let pending = server.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["status"], "open");
}

#[tokio::test]
async fn test_admin_answer_creates_matchable_faq() {
    let server = TestServer::start().await;
    let (_, body) = server
        .post("/chat", json!({ "query": "Do you ship to Canada?" }))
        .await;
    assert_eq!(body["found"], false);
    let pending_id = body["pending_id"].as_i64().unwrap();

    let (status, body) = server
        .post(
            "/admin/pending/answer",
            json!({ "password": PASSWORD, "pending_id": 9999, "answer": "x" }),
        )
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, body) = server
        .post(
            "/admin/pending/answer",
            json!({
                "password": PASSWORD,
                "pending_id": pending_id,
                "answer": "Yes, we ship worldwide."
            }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["ok"], true);
    assert_eq!(body["faq"]["question"], "Do you ship to Canada?");
    assert!(body["faq"]["tags"].is_null());

    assert_eq!(server.pending().await[0]["status"], "answered");

    let (_, body) = server
        .post("/chat", json!({ "query": "do you ship to canada?" }))
        .await;
    assert_eq!(body["found"], true);
    assert_eq!(body["reply"], "Yes, we ship worldwide.");
}

#[tokio::test]
async fn test_admin_delete_and_list_order() {
    let server = TestServer::start().await;
    let (_, first) = server.post("/chat", json!({ "query": "qwertyuiop" })).await;
    let (_, second) = server.post("/chat", json!({ "query": "zxcvbnmasd" })).await;
    let first_id = first["pending_id"].as_i64().unwrap();
    let second_id = second["pending_id"].as_i64().unwrap();

    let ids: Vec<i64> = server
        .pending()
        .await
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second_id, first_id]);

    let (status, body) = server
        .post(
            "/admin/pending/delete",
            json!({ "password": PASSWORD, "pending_id": first_id }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["ok"], true);

    let (status, _) = server
        .post(
            "/admin/pending/delete",
            json!({ "password": PASSWORD, "pending_id": first_id }),
        )
        .await;
    assert_eq!(status, 404);

    let remaining = server.pending().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["id"], second_id);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .post(format!("{}/chat", server.base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
}
