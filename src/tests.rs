//! Integration tests for the fleet dashboard backend.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::auth::{SessionStore, SESSION_HEADER};
use crate::config::{Config, LogFormat};
use crate::github::MemoryGitHub;
use crate::views::{ViewName, ViewRegistry};
use crate::{create_router, AppState};

const OWNER_TOKEN: &str = "owner-token";
const OTHER_TOKEN: &str = "other-token";

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    handle: Option<String>,
    temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for view in ViewName::ALL {
            std::fs::write(
                temp_dir.path().join(format!("{}.html", view)),
                format!("<section id=\"{}-view\" class=\"view\"></section>\n", view),
            )
            .expect("Failed to write fragment");
        }

        let github = MemoryGitHub::new()
            .with_account(OWNER_TOKEN, "owner")
            .with_account(OTHER_TOKEN, "other");

        // Create config
        let config = Config {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
            github_api_url: "http://unused.invalid".to_string(),
            github_timeout: Duration::from_secs(5),
            session_ttl: Duration::from_secs(60 * 60),
            views_dir: temp_dir.path().to_path_buf(),
            offline_token: None,
        };

        let state = AppState {
            github: Arc::new(github),
            sessions: Arc::new(SessionStore::with_ttl(config.session_ttl)),
            views: Arc::new(ViewRegistry::new(temp_dir.path())),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            handle: None,
            temp_dir,
        }
    }

    /// Fixture already registered as `owner/fleet`.
    async fn registered() -> Self {
        let mut fixture = Self::new().await;
        let body = fixture
            .send(fixture.post(
                "/api/session/register",
                json!({ "token": OWNER_TOKEN, "repo": "fleet" }),
            ))
            .await;
        fixture.handle = Some(body["data"]["handle"].as_str().unwrap().to_string());
        fixture
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.handle {
            Some(handle) => builder.header(SESSION_HEADER, handle),
            None => builder,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authed(self.client.get(self.url(path)))
    }

    fn post(&self, path: &str, body: Value) -> RequestBuilder {
        self.authed(self.client.post(self.url(path)).json(&body))
    }

    fn put(&self, path: &str, body: Value) -> RequestBuilder {
        self.authed(self.client.put(self.url(path)).json(&body))
    }

    /// Send and require a 200 response.
    async fn send(&self, builder: RequestBuilder) -> Value {
        let resp = builder.send().await.unwrap();
        let status = resp.status();
        let body: Value = resp.json().await.unwrap();
        assert_eq!(status, 200, "unexpected response: {body}");
        assert_eq!(body["success"], true);
        body
    }

    /// Send and return the status with the error envelope.
    async fn send_err(&self, builder: RequestBuilder) -> (u16, Value) {
        let resp = builder.send().await.unwrap();
        let status = resp.status().as_u16();
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], false);
        (status, body)
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_protected_route_requires_session() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.send_err(fixture.get("/api/drivers")).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = fixture
        .send_err(
            fixture
                .get("/api/drivers")
                .header("authorization", "Bearer made.up"),
        )
        .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_login_with_bad_token_is_unauthorized() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .send_err(fixture.post(
            "/api/session/login",
            json!({ "token": "ghp_wrong", "repo": "fleet" }),
        ))
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_login_to_inaccessible_repository_is_denied() {
    let fixture = TestFixture::registered().await;

    let (status, body) = fixture
        .send_err(fixture.client.post(fixture.url("/api/session/login")).json(&json!({
            "token": OTHER_TOKEN,
            "owner": "owner",
            "repo": "fleet"
        })))
        .await;
    assert_eq!(status, 403);
    assert_eq!(body["error"]["code"], "REPO_ACCESS_DENIED");

    let ok = fixture
        .send(fixture.client.post(fixture.url("/api/session/login")).json(&json!({
            "token": OWNER_TOKEN,
            "repo": "fleet"
        })))
        .await;
    assert_eq!(ok["data"]["session"]["repo"], "owner/fleet");
}

#[tokio::test]
async fn test_register_existing_repository_is_name_conflict() {
    let fixture = TestFixture::registered().await;

    let (status, body) = fixture
        .send_err(fixture.post(
            "/api/session/register",
            json!({ "token": OWNER_TOKEN, "repo": "fleet" }),
        ))
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "REPO_EXISTS");
}

#[tokio::test]
async fn test_register_seeds_admin_and_statuses() {
    let fixture = TestFixture::registered().await;

    let users = fixture.send(fixture.get("/api/users")).await;
    assert_eq!(users["data"].as_array().unwrap().len(), 1);
    assert_eq!(users["data"][0]["role"], "admin");

    let statuses = fixture
        .send(fixture.get("/api/statuses?module=tenders"))
        .await;
    let labels: Vec<&str> = statuses["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec!["Available", "Pending", "Delivered", "Cancelled", "Sold"]
    );
}

#[tokio::test]
async fn test_table_write_then_read() {
    let fixture = TestFixture::registered().await;

    let before = fixture.send(fixture.get("/api/tables/invoices")).await;
    assert_eq!(before["data"], json!([]));
    let sha = before["sha"].as_str().unwrap().to_string();

    let rows = json!([{ "id": 1, "client": "Acme Logistics", "amount": "$1,200" }]);
    let written = fixture
        .send(fixture.put(
            "/api/tables/invoices",
            json!({ "data": rows, "sha": sha, "message": "Import invoices" }),
        ))
        .await;
    assert_ne!(written["sha"], before["sha"]);

    let after = fixture.send(fixture.get("/api/tables/invoices")).await;
    assert_eq!(after["data"], rows);
    assert_eq!(after["sha"], written["sha"]);
}

#[tokio::test]
async fn test_stale_sha_is_rejected_and_table_unchanged() {
    let fixture = TestFixture::registered().await;

    let stale = fixture.send(fixture.get("/api/tables/cars")).await["sha"]
        .as_str()
        .unwrap()
        .to_string();

    // Another tab commits first.
    let winner = fixture
        .send(fixture.put(
            "/api/tables/cars",
            json!({ "data": [{ "id": 1, "tractorPlate": "B-AB 123" }], "sha": stale }),
        ))
        .await;

    let (status, body) = fixture
        .send_err(fixture.put(
            "/api/tables/cars",
            json!({ "data": [{ "id": 1, "tractorPlate": "M-XY 999" }], "sha": stale }),
        ))
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "SHA_MISMATCH");
    assert_eq!(body["error"]["details"]["currentSha"], winner["sha"]);

    let current = fixture.send(fixture.get("/api/tables/cars")).await;
    assert_eq!(current["data"][0]["tractorPlate"], "B-AB 123");
}

#[tokio::test]
async fn test_write_non_array_is_validation_error() {
    let fixture = TestFixture::registered().await;
    let (status, body) = fixture
        .send_err(fixture.put("/api/tables/drivers", json!({ "data": { "id": 1 } })))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_table_is_not_found() {
    let fixture = TestFixture::registered().await;
    let (status, _) = fixture
        .send_err(fixture.get("/api/tables/notifications"))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_create_tender_and_assign() {
    let fixture = TestFixture::registered().await;

    let created = fixture
        .send(fixture.post(
            "/api/tenders",
            json!({
                "route": "Berlin → Paris",
                "loadingDate": "Oct 25, 2023",
                "price": "$3,750"
            }),
        ))
        .await;
    assert_eq!(created["data"]["id"], "TND-1001");
    assert_eq!(created["data"]["status"], "available");
    assert_eq!(created["data"]["driver"], "Unassigned");

    let listed = fixture.send(fixture.get("/api/tenders")).await;
    let rows = listed["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["route"], "Berlin → Paris");
    assert_eq!(rows[0]["actions"], json!(["assign"]));

    let assigned = fixture
        .send(fixture.post(
            "/api/tenders/TND-1001/assign",
            json!({ "driver": "Anna Schmidt", "expectedSha": listed["sha"] }),
        ))
        .await;
    assert_eq!(assigned["data"]["status"], "pending");
    assert_eq!(assigned["data"]["driver"], "Anna Schmidt");
    assert_eq!(assigned["data"]["actions"], json!([]));

    // Only available tenders can be assigned.
    let (status, _) = fixture
        .send_err(fixture.post(
            "/api/tenders/TND-1001/assign",
            json!({ "driver": "Ben Weber" }),
        ))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_stale_expected_sha_blocks_create() {
    let fixture = TestFixture::registered().await;

    let stale = fixture.send(fixture.get("/api/drivers")).await["sha"].clone();
    fixture
        .send(fixture.post(
            "/api/drivers",
            json!({ "name": "Anna", "license": "C+E", "expectedSha": stale }),
        ))
        .await;

    let (status, body) = fixture
        .send_err(fixture.post(
            "/api/drivers",
            json!({ "name": "Ben", "license": "C", "expectedSha": stale }),
        ))
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "SHA_MISMATCH");

    let drivers = fixture.send(fixture.get("/api/drivers")).await;
    assert_eq!(drivers["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_driver_status_filter() {
    let fixture = TestFixture::registered().await;

    for (name, status) in [("Anna", "available"), ("Ben", "on-duty"), ("Cleo", "available")] {
        fixture
            .send(fixture.post(
                "/api/drivers",
                json!({ "name": name, "license": "C+E", "status": status }),
            ))
            .await;
    }

    let available = fixture
        .send(fixture.get("/api/drivers?status=available"))
        .await;
    let names: Vec<&str> = available["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Anna", "Cleo"]);

    let all = fixture.send(fixture.get("/api/drivers?status=all")).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 3);

    let (status, body) = fixture
        .send_err(fixture.get("/api/drivers?status=retired"))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_driver() {
    let fixture = TestFixture::registered().await;
    fixture
        .send(fixture.post("/api/drivers", json!({ "name": "Anna", "license": "C" })))
        .await;

    let updated = fixture
        .send(fixture.put(
            "/api/drivers/1",
            json!({ "status": "maintenance", "car": "B-AB 123" }),
        ))
        .await;
    assert_eq!(updated["data"]["status"], "maintenance");
    assert_eq!(updated["data"]["car"], "B-AB 123");
    assert_eq!(updated["data"]["name"], "Anna");

    let (status, body) = fixture
        .send_err(fixture.put("/api/drivers/99", json!({ "name": "Ghost" })))
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_card_number_is_masked() {
    let fixture = TestFixture::registered().await;

    let created = fixture
        .send(fixture.post(
            "/api/cards",
            json!({ "number": "4111 1111 1111 1234", "pin": "0000", "expiry": "12/27" }),
        ))
        .await;
    assert_eq!(created["data"]["number"], "**** **** **** 1234");

    let stored = fixture.send(fixture.get("/api/tables/cards")).await;
    assert!(!stored["data"].to_string().contains("4111"));
}

#[tokio::test]
async fn test_status_color_validation() {
    let fixture = TestFixture::registered().await;

    let (status, _) = fixture
        .send_err(fixture.post(
            "/api/statuses",
            json!({ "module": "cars", "label": "Leased", "color": "blue" }),
        ))
        .await;
    assert_eq!(status, 400);

    let created = fixture
        .send(fixture.post(
            "/api/statuses",
            json!({ "module": "cars", "label": "Leased", "color": "#1E90FF" }),
        ))
        .await;
    assert_eq!(created["data"]["color"], "#1e90ff");
}

#[tokio::test]
async fn test_chat_send_and_list() {
    let fixture = TestFixture::registered().await;

    let sent = fixture
        .send(fixture.post(
            "/api/chat",
            json!({ "senderId": 1, "content": "Loading at dock 4" }),
        ))
        .await;
    assert_eq!(sent["data"]["direction"], "sent");

    fixture
        .send(fixture.post(
            "/api/chat",
            json!({ "senderId": 2, "content": "On my way", "direction": "received" }),
        ))
        .await;

    let listed = fixture.send(fixture.get("/api/chat")).await;
    let messages = listed["data"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["content"], "Loading at dock 4");
    assert!(messages[1]["id"].as_u64().unwrap() > messages[0]["id"].as_u64().unwrap());
}

#[tokio::test]
async fn test_dashboard_summary_counts() {
    let fixture = TestFixture::registered().await;
    fixture
        .send(fixture.post("/api/tenders", json!({ "route": "Hamburg → Lyon" })))
        .await;
    fixture
        .send(fixture.post(
            "/api/invoices",
            json!({ "client": "Acme", "amount": "$900", "status": "overdue" }),
        ))
        .await;

    let summary = fixture.send(fixture.get("/api/dashboard")).await;
    assert_eq!(summary["data"]["tenders"]["available"], 1);
    assert_eq!(summary["data"]["tenders"]["sold"], 0);
    assert_eq!(summary["data"]["unassignedTenders"], 1);
    assert_eq!(summary["data"]["outstandingInvoices"], 1);
    assert_eq!(summary["data"]["users"], 1);
}

#[tokio::test]
async fn test_view_initialize_is_idempotent() {
    let fixture = TestFixture::registered().await;

    let first = fixture
        .send(fixture.post("/api/views/tenders/init", json!({})))
        .await;
    assert_eq!(first["data"]["attached"].as_array().unwrap().len(), 3);

    let second = fixture
        .send(fixture.post("/api/views/tenders/init", json!({})))
        .await;
    assert_eq!(second["data"]["attached"], json!([]));
    assert_eq!(second["data"]["alreadyWired"], 3);

    let clicked = fixture
        .send(fixture.post("/api/views/tenders/controls/add-tender-btn", json!({})))
        .await;
    assert_eq!(
        clicked["data"]["handlers"],
        json!([{ "kind": "create", "table": "tenders" }])
    );
}

#[tokio::test]
async fn test_view_load_returns_fragment_and_data() {
    let fixture = TestFixture::registered().await;
    fixture
        .send(fixture.post("/api/drivers", json!({ "name": "Anna", "license": "C" })))
        .await;

    let view = fixture.send(fixture.get("/api/views/drivers")).await;
    assert_eq!(view["data"]["state"], "ready");
    assert!(view["data"]["html"]
        .as_str()
        .unwrap()
        .contains("drivers-view"));
    assert_eq!(view["data"]["data"]["drivers"][0]["name"], "Anna");
    assert!(view["data"]["shas"]["drivers"].is_string());
}

#[tokio::test]
async fn test_damaged_view_yields_diagnostic() {
    let fixture = TestFixture::registered().await;
    std::fs::write(
        fixture.temp_dir.path().join("invoices.html"),
        "<div id=\"invoice-list\"></div>",
    )
    .unwrap();

    let view = fixture.send(fixture.get("/api/views/invoices")).await;
    assert_eq!(view["data"]["state"], "diagnostic");
    assert_eq!(view["data"]["problem"]["kind"], "missingRoot");
    assert_eq!(view["data"]["problem"]["expectedRoot"], "invoices-view");
    assert_eq!(view["data"]["retry"], "/api/views/invoices");

    let (status, _) = fixture.send_err(fixture.get("/api/views/settings")).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_fragments_served_statically() {
    let fixture = TestFixture::new().await;
    let resp = fixture
        .client
        .get(fixture.url("/views/chat.html"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("chat-view"));
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let fixture = TestFixture::registered().await;

    let me = fixture.send(fixture.get("/api/session")).await;
    assert_eq!(me["data"]["login"], "owner");

    let out = fixture
        .send(fixture.post("/api/session/logout", json!({})))
        .await;
    assert_eq!(out["data"], true);

    let (status, _) = fixture.send_err(fixture.get("/api/session")).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_create_after_largest_id_is_validation_error() {
    let fixture = TestFixture::registered().await;

    let sha = fixture.send(fixture.get("/api/tables/drivers")).await["sha"].clone();
    fixture
        .send(fixture.put(
            "/api/tables/drivers",
            json!({
                "data": [{ "id": u64::MAX, "name": "Last", "license": "C" }],
                "sha": sha
            }),
        ))
        .await;

    let (status, body) = fixture
        .send_err(fixture.post("/api/drivers", json!({ "name": "Anna", "license": "C" })))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("id space exhausted"));

    let drivers = fixture.send(fixture.get("/api/drivers")).await;
    assert_eq!(drivers["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_id_is_validation_error() {
    let fixture = TestFixture::registered().await;

    let (status, body) = fixture.send_err(fixture.get("/api/drivers/abc")).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("driver id"));

    let (status, body) = fixture
        .send_err(fixture.put("/api/cars/-1", json!({ "status": "maintenance" })))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_and_update_car() {
    let fixture = TestFixture::registered().await;

    let created = fixture
        .send(fixture.post(
            "/api/cars",
            json!({ "tractorPlate": "b-ab 123", "capacity": "24 t" }),
        ))
        .await;
    assert_eq!(created["data"]["id"], 1);
    assert_eq!(created["data"]["tractorPlate"], "B-AB 123");
    assert_eq!(created["data"]["status"], "available");

    let updated = fixture
        .send(fixture.put(
            "/api/cars/1",
            json!({ "status": "on-route", "driver": "Anna Schmidt", "expectedSha": created["sha"] }),
        ))
        .await;
    assert_eq!(updated["data"]["status"], "on-route");
    assert_eq!(updated["data"]["driver"], "Anna Schmidt");
    assert_eq!(updated["data"]["capacity"], "24 t");

    let on_route = fixture.send(fixture.get("/api/cars?status=on-route")).await;
    assert_eq!(on_route["data"].as_array().unwrap().len(), 1);

    let (status, body) = fixture
        .send_err(fixture.put("/api/cars/42", json!({ "status": "maintenance" })))
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invoice_update_and_status_filter() {
    let fixture = TestFixture::registered().await;

    for (client, status) in [("Acme", "pending"), ("Globex", "paid"), ("Initech", "overdue")] {
        fixture
            .send(fixture.post(
                "/api/invoices",
                json!({ "client": client, "amount": "$1,000", "status": status }),
            ))
            .await;
    }

    let paid = fixture.send(fixture.get("/api/invoices?status=paid")).await;
    assert_eq!(paid["data"].as_array().unwrap().len(), 1);
    assert_eq!(paid["data"][0]["client"], "Globex");

    let updated = fixture
        .send(fixture.put("/api/invoices/1", json!({ "status": "paid" })))
        .await;
    assert_eq!(updated["data"]["status"], "paid");
    assert_eq!(updated["data"]["client"], "Acme");

    let paid = fixture.send(fixture.get("/api/invoices?status=paid")).await;
    let clients: Vec<&str> = paid["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["client"].as_str().unwrap())
        .collect();
    assert_eq!(clients, vec!["Acme", "Globex"]);

    let (status, body) = fixture
        .send_err(fixture.get("/api/invoices?status=refunded"))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = fixture
        .send_err(fixture.put("/api/invoices/7", json!({ "status": "paid" })))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_user_email_validation_and_status_filter() {
    let fixture = TestFixture::registered().await;

    let (status, body) = fixture
        .send_err(fixture.post(
            "/api/users",
            json!({ "name": "Dana", "email": "dana-at-fleet", "role": "dispatcher" }),
        ))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let created = fixture
        .send(fixture.post(
            "/api/users",
            json!({ "name": "Dana", "email": "Dana@Fleet.Example", "role": "Dispatcher" }),
        ))
        .await;
    assert_eq!(created["data"]["id"], 2);
    assert_eq!(created["data"]["email"], "dana@fleet.example");
    assert_eq!(created["data"]["role"], "dispatcher");

    let updated = fixture
        .send(fixture.put("/api/users/2", json!({ "status": "inactive" })))
        .await;
    assert_eq!(updated["data"]["status"], "inactive");

    let inactive = fixture.send(fixture.get("/api/users?status=inactive")).await;
    assert_eq!(inactive["data"].as_array().unwrap().len(), 1);
    assert_eq!(inactive["data"][0]["name"], "Dana");

    let active = fixture.send(fixture.get("/api/users?status=active")).await;
    assert_eq!(active["data"][0]["role"], "admin");

    let (status, _) = fixture.send_err(fixture.get("/api/users?status=banned")).await;
    assert_eq!(status, 400);

    let (status, _) = fixture
        .send_err(fixture.put("/api/users/2", json!({ "email": "nope" })))
        .await;
    assert_eq!(status, 400);

    let (status, body) = fixture
        .send_err(fixture.put("/api/users/9", json!({ "status": "active" })))
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
