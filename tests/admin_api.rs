mod common;

use common::*;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

async fn body(res: reqwest::Response) -> Value {
    res.json::<Value>().await.unwrap()
}

#[tokio::test]
async fn test_requests_without_admin_key_are_rejected() {
    let (server, _store) = start_memory_server().await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/admin/multipliers")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(server.url("/admin/status"))
        .bearer_auth("wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client.get(server.url("/nothing-here")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_reports_backend() {
    let (server, _store) = start_memory_server().await;
    let res = server.client().get("/admin/status").await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let status = body(res).await;
    assert_eq!(status["store"], "memory");
    assert_eq!(status["notifications"], false);
}

#[tokio::test]
async fn test_create_multiplier_and_read_back() {
    let (server, store) = start_memory_server().await;
    let client = server.client();

    let res = client
        .send(
            Method::POST,
            "/admin/multipliers",
            Some(json!({
                "name": "Event 1.5x",
                "value": 1.5,
                "description": "Used for special events",
                "is_active": true
            })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = body(res).await;
    assert_eq!(created["notice"]["level"], "success");
    assert_eq!(created["notice"]["message"], "Multiplier added");
    assert_eq!(created["outcome"]["action"], "created");
    assert_eq!(store.row_count("multiplier_configs"), 1);

    let rows = body(client.get("/admin/multipliers").await).await;
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Event 1.5x");
    assert_eq!(rows[0]["value"], 1.5);
    assert_eq!(rows[0]["description"], "Used for special events");
    assert_eq!(rows[0]["is_active"], true);
    assert_eq!(rows[0]["id"], created["outcome"]["id"]);
    assert!(!rows[0]["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_keeps_id_and_server_columns() {
    let (server, store) = start_memory_server().await;
    let client = server.client();

    let created = body(
        client
            .send(Method::POST, "/admin/operators", Some(json!({"name": "Alpha", "order_index": 2})))
            .await,
    )
    .await;
    let id = created["outcome"]["id"].as_str().unwrap().to_string();
    let before = store.get("operator_configs", &id).unwrap();

    let res = client
        .send(
            Method::PUT,
            &format!("/admin/operators/{}", id),
            Some(json!({"name": "Alpha Prime", "order_index": 5, "is_active": false})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = body(res).await;
    assert_eq!(updated["notice"]["message"], "Operator updated");
    assert_eq!(updated["outcome"]["action"], "updated");
    assert_eq!(updated["outcome"]["id"], id.as_str());

    let after = store.get("operator_configs", &id).unwrap();
    assert_eq!(after["name"], "Alpha Prime");
    assert_eq!(after["order_index"], 5);
    assert_eq!(after["is_active"], false);
    assert_eq!(after["created_at"], before["created_at"]);
    assert_eq!(store.row_count("operator_configs"), 1);
}

#[tokio::test]
async fn test_operators_are_ordered_by_index_then_name() {
    let (server, _store) = start_memory_server().await;
    let client = server.client();

    for (name, order_index) in [("B", 1), ("A", 1), ("C", 0)] {
        let res = client
            .send(
                Method::POST,
                "/admin/operators",
                Some(json!({"name": name, "order_index": order_index})),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let rows = body(client.get("/admin/operators").await).await;
    let names: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["C", "A", "B"]);
}

#[tokio::test]
async fn test_non_numeric_input_falls_back_to_defaults() {
    let (server, _store) = start_memory_server().await;
    let client = server.client();

    client
        .send(Method::POST, "/admin/multipliers", Some(json!({"name": "Bad", "value": "abc"})))
        .await;
    client
        .send(Method::POST, "/admin/operators", Some(json!({"name": "Bad", "order_index": "abc"})))
        .await;

    for value in [json!(true), json!({}), json!([1])] {
        let res = client
            .send(Method::POST, "/admin/multipliers", Some(json!({"name": "Odd", "value": value})))
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }
    let res = client
        .send(Method::POST, "/admin/operators", Some(json!({"name": "Odd", "order_index": false})))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let multipliers = body(client.get("/admin/multipliers").await).await;
    let multipliers = multipliers.as_array().unwrap();
    assert_eq!(multipliers.len(), 4);
    assert!(multipliers.iter().all(|m| m["value"] == 1.0 && m["is_active"] == true));

    let operators = body(client.get("/admin/operators").await).await;
    let operators = operators.as_array().unwrap();
    assert_eq!(operators.len(), 2);
    assert!(operators.iter().all(|o| o["order_index"] == 0));
}

#[tokio::test]
async fn test_toggle_twice_restores_flag() {
    let (server, _store) = start_memory_server().await;
    let client = server.client();

    let created = body(
        client
            .send(Method::POST, "/admin/multipliers", Some(json!({"name": "Weekend", "value": 2})))
            .await,
    )
    .await;
    let path = format!("/admin/multipliers/{}/toggle", created["outcome"]["id"].as_str().unwrap());

    let res = client.send(Method::POST, &path, Some(json!({"is_active": true}))).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let rows = body(client.get("/admin/multipliers").await).await;
    assert_eq!(rows[0]["is_active"], false);

    let res = client.send(Method::POST, &path, Some(json!({"is_active": false}))).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let rows = body(client.get("/admin/multipliers").await).await;
    assert_eq!(rows[0]["is_active"], true);
}

#[tokio::test]
async fn test_delete_removes_row() {
    let (server, _store) = start_memory_server().await;
    let client = server.client();

    let created = body(
        client
            .send(Method::POST, "/admin/operators", Some(json!({"name": "Gone", "order_index": 1})))
            .await,
    )
    .await;
    let id = created["outcome"]["id"].as_str().unwrap().to_string();
    assert_eq!(body(client.get("/admin/operators").await).await.as_array().unwrap().len(), 1);

    let res = client.send(Method::DELETE, &format!("/admin/operators/{}", id), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res).await["message"], "Operator deleted");

    let rows = body(client.get("/admin/operators").await).await;
    assert!(rows.as_array().unwrap().iter().all(|row| row["id"] != id.as_str()));
}

#[tokio::test]
async fn test_notifications_disabled_without_functions_host() {
    let (server, _store) = start_memory_server().await;
    let res = server
        .client()
        .send(Method::POST, "/admin/notifications", Some(json!({"user": "pilot-7"})))
        .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_failed_save_echoes_form() {
    let (addr, recorder) =
        start_mock_backend(500, r#"{"message":"database unavailable"}"#).await;
    let server = start_rest_server(addr).await;

    let res = server
        .client()
        .send(
            Method::POST,
            "/admin/multipliers",
            Some(json!({"name": "Event", "value": "2.5", "description": "x"})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    let failed = body(res).await;
    assert_eq!(failed["notice"]["level"], "error");
    assert_eq!(failed["notice"]["message"], "Failed to save multiplier");
    assert!(failed.get("outcome").is_none());
    assert_eq!(failed["form"]["name"], "Event");
    assert_eq!(failed["form"]["value"], 2.5);
    assert_eq!(failed["form"]["is_active"], true);

    let calls = recorder.all();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].target, "/rest/v1/multiplier_configs");
}

#[tokio::test]
async fn test_failed_read_returns_empty_list() {
    let (addr, _recorder) = start_mock_backend(503, r#"{"message":"paused"}"#).await;
    let server = start_rest_server(addr).await;

    let res = server.client().get("/admin/operators").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res).await, json!([]));
}

#[tokio::test]
async fn test_failed_toggle_and_delete_report_errors() {
    let (addr, _recorder) = start_mock_backend(500, r#"{"message":"boom"}"#).await;
    let server = start_rest_server(addr).await;
    let client = server.client();

    let res = client
        .send(Method::POST, "/admin/operators/7/toggle", Some(json!({"is_active": true})))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body(res).await["message"], "Failed to toggle operator");

    let res = client.send(Method::DELETE, "/admin/multipliers/7", None).await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body(res).await["message"], "Failed to delete multiplier");
}

#[tokio::test]
async fn test_notification_is_forwarded() {
    let (addr, recorder) = start_mock_backend(200, r#"{"ok":true}"#).await;
    let server = start_rest_server(addr).await;

    let payload = json!({"user": "pilot-7", "new_rank": "Major"});
    let res = server
        .client()
        .send(Method::POST, "/admin/notifications", Some(payload.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert_eq!(body(res).await["message"], "Notification sent");

    let calls = recorder.all();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target, "/functions/v1/discord-rank-notification");
    assert_eq!(calls[0].body, Some(payload));
    assert_eq!(calls[0].headers["apikey"], "service-key");
}

#[tokio::test]
async fn test_notification_failure_surfaces_remote_message() {
    let (addr, recorder) = start_mock_backend(500, r#"{"error":"webhook rejected"}"#).await;
    let server = start_rest_server(addr).await;

    let res = server
        .client()
        .send(Method::POST, "/admin/notifications", Some(json!({"user": "pilot-7"})))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    let notice = body(res).await;
    assert_eq!(notice["level"], "error");
    assert_eq!(notice["message"], "remote call failed: webhook rejected");
    assert_eq!(recorder.len(), 1);
}
