//! End-to-end tests for the pizza HTTP API.
//!
//! Tests exercise the full stack: HTTP request -> axum router -> handler ->
//! request-scoped SqliteStore -> HTTP response.
//!
//! Each test creates a fresh AppState backed by a unique temp SQLite database
//! and sends requests with `tower::ServiceExt::oneshot`, without starting a
//! network server. Toppings have no HTTP endpoint, so they are seeded through
//! the storage crate directly.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use pizzeria_server::router::build_router;
use pizzeria_server::state::AppState;
use pizzeria_storage::{NewTopping, PizzaStore, Price, SqliteStore};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Compares two decimal strings by value, so "12.5" equals "12.50".
fn same_price(left: &str, right: &str) -> bool {
    match (left.parse::<Price>(), right.parse::<Price>()) {
        (Ok(l), Ok(r)) => l == r,
        _ => false,
    }
}

fn test_state() -> AppState {
    AppState::in_memory().expect("failed to create temp AppState")
}

/// Inserts toppings straight into the state's database.
fn seed_toppings(state: &AppState, names: &[&str]) -> Vec<i64> {
    let mut store = SqliteStore::connect(state.db.path()).unwrap();
    names
        .iter()
        .map(|name| {
            store
                .create_topping(NewTopping {
                    name: name.to_string(),
                    vegetarian: true,
                })
                .unwrap()
                .id
                .0
        })
        .collect()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(json!(null));
    (status, json)
}

async fn request_empty(app: &Router, method: Method, path: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn get_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    request_empty(app, Method::GET, path).await
}

async fn delete(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    request_empty(app, Method::DELETE, path).await
}

/// Sends a form-encoded POST built from key/value pairs.
async fn post_form(
    app: &Router,
    path: &str,
    fields: &[(&str, &str)],
) -> (StatusCode, serde_json::Value) {
    let body = serde_urlencoded::to_string(fields).unwrap();
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

async fn put_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// Creates a pizza and returns its id.
async fn create_pizza(app: &Router, fields: &[(&str, &str)]) -> i64 {
    let (status, body) = post_form(app, "/pizzas/", fields).await;
    assert_eq!(status, StatusCode::CREATED, "create pizza failed: {body:?}");
    body["pizza"]["id"].as_i64().unwrap()
}

fn topping_ids(detail: &serde_json::Value) -> Vec<i64> {
    detail["toppings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Collection endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_starts_empty() {
    let app = build_router(test_state());
    let (status, body) = get_json(&app, "/pizzas/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "pizzas": [] }));
}

#[tokio::test]
async fn create_returns_201_with_default_status() {
    let app = build_router(test_state());
    let (status, body) = post_form(
        &app,
        "/pizzas/",
        &[("nombre", "Margherita"), ("precio", "9.5")],
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Pizza creada con éxito");
    assert_eq!(body["pizza"]["nombre"], "Margherita");
    assert_eq!(body["pizza"]["precio"], "9.50");
    assert_eq!(body["pizza"]["estado"], "Disponible");
    assert!(body["pizza"]["id"].is_i64());
}

#[tokio::test]
async fn create_without_price_is_400_and_creates_nothing() {
    let app = build_router(test_state());
    let (status, body) = post_form(&app, "/pizzas/", &[("nombre", "Margherita")]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["message"], "Faltan nombre o precio");

    let (_, list) = get_json(&app, "/pizzas/").await;
    assert_eq!(list["pizzas"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_with_invalid_price_is_400() {
    let app = build_router(test_state());
    let (status, _) = post_form(
        &app,
        "/pizzas/",
        &[("nombre", "Margherita"), ("precio", "nueve")],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_toppings_links_them() {
    let state = test_state();
    let ids = seed_toppings(&state, &["Mozzarella", "Albahaca"]);
    let app = build_router(state);

    let first = ids[0].to_string();
    let second = ids[1].to_string();
    let id = create_pizza(
        &app,
        &[
            ("nombre", "Margherita"),
            ("precio", "9.5"),
            ("toppings", first.as_str()),
            ("toppings", second.as_str()),
        ],
    )
    .await;

    let (status, detail) = get_json(&app, &format!("/pizzas/{id}/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(topping_ids(&detail), ids);
    assert_eq!(detail["toppings"][0]["nombre"], "Mozzarella");
}

#[tokio::test]
async fn create_with_unknown_topping_is_400_and_creates_nothing() {
    let app = build_router(test_state());
    let (status, _) = post_form(
        &app,
        "/pizzas/",
        &[("nombre", "Margherita"), ("precio", "9.5"), ("toppings", "77")],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = get_json(&app, "/pizzas/").await;
    assert!(list["pizzas"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_returns_summaries_in_creation_order() {
    let app = build_router(test_state());
    let first = create_pizza(&app, &[("nombre", "Margherita"), ("precio", "9.5")]).await;
    let second = create_pizza(&app, &[("nombre", "Napolitana"), ("precio", "11")]).await;

    let (status, body) = get_json(&app, "/pizzas/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "pizzas": [
                { "id": first, "nombre": "Margherita", "precio": "9.50", "estado": "Disponible" },
                { "id": second, "nombre": "Napolitana", "precio": "11.00", "estado": "Disponible" },
            ]
        })
    );
}

#[tokio::test]
async fn collection_rejects_other_methods_with_405() {
    let app = build_router(test_state());
    for method in [Method::PUT, Method::DELETE, Method::PATCH] {
        let (status, body) = request_empty(&app, method.clone(), "/pizzas/").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(body["error"]["code"], "METHOD_NOT_ALLOWED");
        assert_eq!(body["error"]["message"], "Método no soportado");
    }
}

// ---------------------------------------------------------------------------
// Item endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn round_trip_preserves_name_and_price() {
    let app = build_router(test_state());
    let id = create_pizza(&app, &[("nombre", "Cuatro Quesos"), ("precio", "12.5")]).await;

    let (status, detail) = get_json(&app, &format!("/pizzas/{id}/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["id"], id);
    assert_eq!(detail["nombre"], "Cuatro Quesos");
    assert!(same_price(detail["precio"].as_str().unwrap(), "12.5"));
    assert_eq!(detail["estado"], "Disponible");
    assert!(detail["fecha_fabricacion"].is_string());
    assert_eq!(detail["toppings"], json!([]));
}

#[tokio::test]
async fn missing_pizza_is_404_for_get_put_delete() {
    let app = build_router(test_state());

    let (status, body) = get_json(&app, "/pizzas/999/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = put_json(&app, "/pizzas/999/", json!({ "estado": "PRO" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = delete(&app, "/pizzas/999/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_to_missing_pizza_is_404_even_with_bad_body() {
    let app = build_router(test_state());

    let (status, body) = request_empty(&app, Method::PUT, "/pizzas/999/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = put_json(&app, "/pizzas/999/", json!({ "precio": "abc" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = put_json(&app, "/pizzas/999/", json!({ "estado": "XYZ" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The same bodies are still a 400 once the pizza exists.
    let id = create_pizza(&app, &[("nombre", "Margherita"), ("precio", "9.5")]).await;
    let (status, _) = request_empty(&app, Method::PUT, &format!("/pizzas/{id}/")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = put_json(&app, &format!("/pizzas/{id}/"), json!({ "precio": "abc" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_integer_id_is_404() {
    let app = build_router(test_state());
    let (status, _) = get_json(&app, "/pizzas/margherita/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_with_only_status_keeps_name_and_price() {
    let app = build_router(test_state());
    let id = create_pizza(&app, &[("nombre", "Margherita"), ("precio", "9.5")]).await;

    let (status, detail) = put_json(&app, &format!("/pizzas/{id}/"), json!({ "estado": "PRO" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["estado"], "Promoción");
    assert_eq!(detail["nombre"], "Margherita");
    assert_eq!(detail["precio"], "9.50");
}

#[tokio::test]
async fn put_replaces_fields() {
    let app = build_router(test_state());
    let id = create_pizza(&app, &[("nombre", "Margherita"), ("precio", "9.5")]).await;

    let (status, detail) = put_json(
        &app,
        &format!("/pizzas/{id}/"),
        json!({ "nombre": "Marinara", "precio": "8.75", "estado": "Cancelada" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["nombre"], "Marinara");
    assert_eq!(detail["precio"], "8.75");
    assert_eq!(detail["estado"], "Cancelada");

    let (_, fetched) = get_json(&app, &format!("/pizzas/{id}/")).await;
    assert_eq!(fetched, detail);
}

#[tokio::test]
async fn put_toppings_replaces_the_whole_set() {
    let state = test_state();
    let ids = seed_toppings(&state, &["Jamón", "Piña", "Aceitunas"]);
    let app = build_router(state);

    let first = ids[0].to_string();
    let second = ids[1].to_string();
    let id = create_pizza(
        &app,
        &[
            ("nombre", "Hawaiana"),
            ("precio", "10"),
            ("toppings", first.as_str()),
            ("toppings", second.as_str()),
        ],
    )
    .await;

    let (status, _) = put_json(&app, &format!("/pizzas/{id}/"), json!({ "toppings": [ids[2]] })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = get_json(&app, &format!("/pizzas/{id}/")).await;
    assert_eq!(topping_ids(&detail), vec![ids[2]]);

    let (_, detail) = put_json(&app, &format!("/pizzas/{id}/"), json!({ "toppings": [] })).await;
    assert_eq!(detail["toppings"], json!([]));
}

#[tokio::test]
async fn put_with_invalid_input_is_400_and_changes_nothing() {
    let state = test_state();
    let ids = seed_toppings(&state, &["Jamón"]);
    let app = build_router(state);
    let topping = ids[0].to_string();
    let id = create_pizza(
        &app,
        &[("nombre", "Margherita"), ("precio", "9.5"), ("toppings", topping.as_str())],
    )
    .await;
    let path = format!("/pizzas/{id}/");

    let (status, _) = put_json(&app, &path, json!({ "estado": "Agotada" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = put_json(&app, &path, json!({ "precio": "1.999" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = put_json(&app, &path, json!({ "nombre": "Otra", "toppings": [404] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::PUT)
        .uri(&path)
        .header("content-type", "application/json")
        .body(Body::from("{oops"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, detail) = get_json(&app, &path).await;
    assert_eq!(detail["nombre"], "Margherita");
    assert_eq!(detail["estado"], "Disponible");
    assert_eq!(topping_ids(&detail), ids);
}

#[tokio::test]
async fn delete_returns_204_then_404() {
    let state = test_state();
    let ids = seed_toppings(&state, &["Mozzarella"]);
    let db_path = state.db.path().to_string();
    let app = build_router(state);
    let topping = ids[0].to_string();
    let id = create_pizza(
        &app,
        &[("nombre", "Margherita"), ("precio", "9.5"), ("toppings", topping.as_str())],
    )
    .await;
    let path = format!("/pizzas/{id}/");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(&path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());

    let (status, _) = get_json(&app, &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The topping outlives the pizza.
    let store = SqliteStore::connect(&db_path).unwrap();
    assert_eq!(store.list_toppings().unwrap().len(), 1);
}

#[tokio::test]
async fn item_rejects_other_methods_with_405() {
    let app = build_router(test_state());
    let id = create_pizza(&app, &[("nombre", "Margherita"), ("precio", "9.5")]).await;

    let (status, body) = request_empty(&app, Method::POST, &format!("/pizzas/{id}/")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"]["message"], "Método no soportado");
}

#[tokio::test]
async fn unsupported_method_on_missing_pizza_is_404() {
    let app = build_router(test_state());

    let (status, body) = request_empty(&app, Method::POST, "/pizzas/999/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = request_empty(&app, Method::PATCH, "/pizzas/abc/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let app = build_router(test_state());
    let (status, body) = get_json(&app, "/toppings/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
