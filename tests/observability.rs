mod common;
use common::spawn_client;
use kube_ops_todo::{HealthResponse, MessageResponse};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn index_and_healthz() {
    let (client, _log, _handle) = spawn_client(0).await;

    let res = client.index().await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<MessageResponse>().await.unwrap().message,
        "Hello, Kube Ops!"
    );

    let res = client.healthz().await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<HealthResponse>().await.unwrap().status, "ok");
}

#[tokio::test]
async fn boom_is_an_opaque_500_with_one_error_record() {
    let (client, log, _handle) = spawn_client(0).await;

    let res = client.boom().await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"error": "internal server error"})
    );

    let records = log.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["url.path"], "/boom");
    assert_eq!(record["http.response.status_code"], 500);
    assert_eq!(record["status_class"], "5xx");
    assert_eq!(record["log.level"], "error");
    assert!(record["error.message"]
        .as_str()
        .unwrap()
        .starts_with("boom"));

    let res = client.healthz().await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn every_response_produces_exactly_one_record() {
    let (client, log, _handle) = spawn_client(1).await;

    client.index().await;
    client.healthz().await;
    client.list_todos().await;
    client.create_todo(json!({"title": "logged"})).await;
    client.create_todo(json!({})).await;
    client.get_todo("abc").await;
    client.get_raw("/no/such/route").await;

    let records = log.records();
    let statuses: Vec<u64> = records
        .iter()
        .map(|r| r["http.response.status_code"].as_u64().unwrap())
        .collect();
    assert_eq!(statuses, [200, 200, 200, 201, 400, 404, 404]);

    for record in &records {
        assert_eq!(record["event.action"], "http_request");
        assert_eq!(record["service.name"], "kube-ops-todo");
        assert!(record["metrics.response_time_ms"].as_f64().unwrap() >= 0.0);
        assert!(record["client.ip"].as_str().unwrap().starts_with("127.0.0.1"));
        assert!(record.get("error.message").is_none());
    }

    assert_eq!(records[2]["url.path"], "/api/todos");
    assert_eq!(records[4]["status_class"], "4xx");
}

#[tokio::test]
async fn record_carries_query_and_user_agent() {
    let (client, log, _handle) = spawn_client(0).await;

    let res = client.get_raw("/api/todos?page=2&verbose").await;
    assert_eq!(res.status(), StatusCode::OK);

    let records = log.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["url.path"], "/api/todos");
    assert_eq!(records[0]["url.query"], "page=2&verbose");
    assert_eq!(records[0]["user_agent.original"], "kube-ops-tests/1.0");
    assert_eq!(records[0]["http.request.method"], "GET");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (client, log, _handle) = spawn_client(0).await;

    let res = client.get_raw("/api-docs/openapi.json").await;
    assert_eq!(res.status(), StatusCode::OK);
    let doc = res.json::<Value>().await.unwrap();
    assert!(doc["paths"]["/api/todos/{id}"].is_object());
    assert!(doc["paths"]["/healthz"].is_object());

    assert_eq!(log.records().len(), 1);
}
