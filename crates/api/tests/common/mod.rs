#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use wr_api::config::ServerConfig;
use wr_api::router::build_app_router;
use wr_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and no edit password.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        edit_password: None,
    }
}

/// Build the full application router (same middleware stack as production).
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(test_config()),
    })
}

/// Like [`build_test_app`] with editing protected by `password`.
pub fn build_protected_app(pool: PgPool, password: &str) -> Router {
    let config = ServerConfig {
        edit_password: Some(password.to_string()),
        ..test_config()
    };
    build_app_router(AppState {
        pool,
        config: Arc::new(config),
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None, None).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// POST a JSON body, assert 201 and return the created object's id.
pub async fn create_id(pool: &PgPool, uri: &str, body: serde_json::Value) -> i64 {
    let response = post_json(build_test_app(pool.clone()), uri, body).await;
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, 201, "POST {uri} failed: {json}");
    json["id"].as_i64().unwrap()
}

/// Ids of the "LabA" fixture.
pub struct Lab {
    pub project: i64,
    pub gm: i64,
    pub slave: i64,
    pub sfp_a: i64,
    pub sfp_b: i64,
    pub gm_port: i64,
}

/// Two switches linked port 1 to port 1. WRS-1 is the Grandmaster with
/// SFP-100 (alpha 2.6e-4, TX 5, RX -3) and board deltas TX 1, RX 0.5.
pub async fn seed_lab(pool: &PgPool) -> Lab {
    let project = create_id(pool, "/api/v1/projects", serde_json::json!({"name": "LabA"})).await;
    let base = format!("/api/v1/projects/{project}");

    let gm = create_id(
        pool,
        &format!("{base}/switches"),
        serde_json::json!({
            "name": "WRS-1",
            "role": "Grandmaster",
            "mac": "aa:bb:cc:00:00:01",
            "ip_address": "10.0.0.1",
        }),
    )
    .await;
    let slave = create_id(
        pool,
        &format!("{base}/switches"),
        serde_json::json!({"name": "WRS-2", "role": "Slave"}),
    )
    .await;

    let sfp_a = create_id(
        pool,
        &format!("{base}/sfps"),
        serde_json::json!({
            "serial": "SFP-100",
            "wavelength": "1310",
            "alpha": 2.6e-4,
            "delta_tx": 5.0,
            "delta_rx": -3.0,
        }),
    )
    .await;
    let sfp_b = create_id(
        pool,
        &format!("{base}/sfps"),
        serde_json::json!({"serial": "SFP-200", "wavelength": "1490", "delta_tx": 1.0, "delta_rx": 1.0}),
    )
    .await;

    let gm_port = create_id(
        pool,
        &format!("{base}/ports"),
        serde_json::json!({
            "switch_id": gm,
            "port_num": 1,
            "sfp_id": sfp_a,
            "remote_sfp_id": sfp_b,
            "connected_to_id": slave,
            "connected_port_num": 1,
            "port_delta_tx": 1.0,
            "port_delta_rx": 0.5,
        }),
    )
    .await;
    create_id(
        pool,
        &format!("{base}/ports"),
        serde_json::json!({
            "switch_id": slave,
            "port_num": 1,
            "sfp_id": sfp_b,
            "connected_to_id": gm,
            "connected_port_num": 1,
        }),
    )
    .await;

    Lab {
        project,
        gm,
        slave,
        sfp_a,
        sfp_b,
        gm_port,
    }
}
