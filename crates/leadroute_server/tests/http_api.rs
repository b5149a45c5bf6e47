use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use leadroute_server::{router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    app: Router,
    _dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let app = router(AppState::new(dir.path().join("leadroute.db")));
        Self { app, _dir: dir }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }
}

#[tokio::test]
async fn health_reports_version_and_request_id() {
    let test_app = TestApp::new();
    let response = test_app
        .app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let (_, body) = test_app.get("/health").await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn alice_scenario_over_http() {
    let app = TestApp::new();

    let (status, alice) = app
        .post(
            "/operators",
            json!({"name": "Alice", "active": true, "load_limit": 2}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, web) = app.post("/sources", json!({"name": "web"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, assigned) = app
        .post(
            &format!("/sources/{}/weights", web["id"]),
            json!([{"operator_id": alice["id"], "weight": 1}]),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned, json!({"status": "ok", "assigned": 1}));

    let mut operators = Vec::new();
    for lead in ["l-1", "l-2", "l-3"] {
        let (status, receipt) = app
            .post(
                "/contacts",
                json!({"external_id": lead, "source_id": web["id"], "text": "hi"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(receipt["contact_id"].is_i64());
        assert!(receipt["lead_id"].is_i64());
        operators.push(receipt["operator"].clone());
    }
    assert_eq!(operators, vec![json!("Alice"), json!("Alice"), Value::Null]);

    let (_, report) = app.get("/reports").await;
    let report = report.as_array().unwrap();
    assert_eq!(report.len(), 3);
    assert_eq!(report[0]["source"], "web");
    assert_eq!(report[0]["operator"], "Alice");
    assert_eq!(report[2]["operator"], Value::Null);
}

#[tokio::test]
async fn repeated_external_id_creates_one_lead() {
    let app = TestApp::new();
    let (_, web) = app.post("/sources", json!({"name": "web"})).await;
    let (_, phone) = app.post("/sources", json!({"name": "phone"})).await;

    let (_, first) = app
        .post(
            "/contacts",
            json!({"external_id": "ext-1", "source_id": web["id"]}),
        )
        .await;
    let (_, second) = app
        .post(
            "/contacts",
            json!({"external_id": "ext-1", "source_id": phone["id"]}),
        )
        .await;
    assert_eq!(first["lead_id"], second["lead_id"]);

    let (_, leads) = app.get("/leads").await;
    assert_eq!(leads.as_array().unwrap().len(), 1);
    let (_, contacts) = app.get("/contacts").await;
    assert_eq!(contacts.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn operator_update_and_missing_records() {
    let app = TestApp::new();
    let (_, bob) = app.post("/operators", json!({"name": "Bob"})).await;
    assert_eq!(bob["active"], true);
    assert_eq!(bob["load_limit"], 5);

    let (status, updated) = app
        .send(
            Method::PATCH,
            &format!("/operators/{}", bob["id"]),
            Some(json!({"name": "Bobby", "active": false, "load_limit": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Bobby");
    assert_eq!(updated["active"], false);

    let (status, body) = app
        .send(
            Method::PATCH,
            "/operators/999",
            Some(json!({"name": "Ghost"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = app.get("/operators/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, operators) = app.get("/operators").await;
    assert_eq!(operators.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn weight_update_and_delete_endpoints() {
    let app = TestApp::new();
    let (_, alice) = app.post("/operators", json!({"name": "Alice"})).await;
    let (_, web) = app.post("/sources", json!({"name": "web"})).await;
    let weights_uri = format!("/sources/{}/weights", web["id"]);
    let pair_uri = format!("{weights_uri}/{}", alice["id"]);

    app.post(&weights_uri, json!([{"operator_id": alice["id"], "weight": 2}]))
        .await;

    let (status, updated) = app
        .send(Method::PATCH, &pair_uri, Some(json!({"weight": 6})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["weight"], 6);

    let (_, listed) = app.get(&weights_uri).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = app.send(Method::DELETE, &pair_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.send(Method::DELETE, &pair_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = app
        .send(Method::PATCH, &pair_uri, Some(json!({"weight": 1})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app.post("/operators", json!({"name": "   "})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");

    let (status, _) = app.post("/operators", json!({"active": true})).await;
    assert!(status.is_client_error());

    let (_, web) = app.post("/sources", json!({"name": "web"})).await;
    let (_, alice) = app.post("/operators", json!({"name": "Alice"})).await;
    let (status, body) = app
        .post(
            &format!("/sources/{}/weights", web["id"]),
            json!([{"operator_id": alice["id"], "weight": -4}]),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");

    let (status, body) = app
        .post("/contacts", json!({"external_id": "ext-1", "source_id": 404}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (_, leads) = app.get("/leads").await;
    assert!(leads.as_array().unwrap().is_empty());
}
