//! Router assembly for the pizza API.
//!
//! [`build_router`] wires the handler functions to their routes with CORS and
//! tracing middleware layers.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router.
///
/// Routes use axum 0.8 `/{param}` path syntax and keep the trailing slash.
/// Each route falls back to a JSON 405 for methods it does not serve; the
/// item route answers 404 instead when the pizza does not exist.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/pizzas/",
            get(handlers::pizzas::list_pizzas)
                .post(handlers::pizzas::create_pizza)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/pizzas/{id}/",
            get(handlers::pizzas::get_pizza)
                .put(handlers::pizzas::update_pizza)
                .delete(handlers::pizzas::delete_pizza)
                .fallback(handlers::pizzas::item_method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
