//! Pizza handlers: list/create on the collection, get/update/delete on items.

use std::convert::Infallible;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use pizzeria_storage::{PizzaId, PizzaStore};

use crate::error::ApiError;
use crate::schema::pizzas::{
    CreatePizzaForm, CreatePizzaResponse, PizzaDetailView, PizzaListResponse, PizzaSummaryView,
    UpdatePizzaRequest, CREATED_MESSAGE,
};
use crate::state::AppState;

/// Parses the `{id}` path segment. Anything that is not an integer cannot
/// name a pizza, so it is a 404 rather than a 400.
fn parse_pizza_id(raw: &str) -> Result<PizzaId, ApiError> {
    raw.parse::<i64>()
        .map(PizzaId)
        .map_err(|_| ApiError::NotFound(format!("pizza not found: {}", raw)))
}

/// Lists all pizzas.
///
/// `GET /pizzas/`
pub async fn list_pizzas(
    State(state): State<AppState>,
) -> Result<Json<PizzaListResponse>, ApiError> {
    let pizzas = state.db.run(|store| store.list_pizzas()).await?;
    Ok(Json(PizzaListResponse {
        pizzas: pizzas.iter().map(PizzaSummaryView::from).collect(),
    }))
}

/// Creates a pizza from a form-encoded body.
///
/// `POST /pizzas/`
pub async fn create_pizza(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatePizzaResponse>), ApiError> {
    let new = CreatePizzaForm::from_urlencoded(&body)?.into_new_pizza()?;
    let detail = state.db.run(move |store| store.create_pizza(new)).await?;
    tracing::info!(pizza_id = detail.pizza.id.0, "pizza created");

    Ok((
        StatusCode::CREATED,
        Json(CreatePizzaResponse {
            message: CREATED_MESSAGE.to_string(),
            pizza: PizzaSummaryView::from(&detail.pizza),
        }),
    ))
}

/// Returns one pizza with its toppings.
///
/// `GET /pizzas/{id}/`
pub async fn get_pizza(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PizzaDetailView>, ApiError> {
    let id = parse_pizza_id(&id)?;
    let detail = state.db.run(move |store| store.get_pizza(id)).await?;
    Ok(Json(PizzaDetailView::from(&detail)))
}

/// Partially updates a pizza from a JSON body.
///
/// `PUT /pizzas/{id}/`
pub async fn update_pizza(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<PizzaDetailView>, ApiError> {
    let id = parse_pizza_id(&id)?;
    let patch = UpdatePizzaRequest::from_json(&body).and_then(UpdatePizzaRequest::into_patch);
    // An unknown id is a 404 whatever the body holds.
    state.db.run(move |store| store.get_pizza(id)).await?;
    let patch = patch?;
    let detail = state
        .db
        .run(move |store| store.update_pizza(id, patch))
        .await?;
    tracing::info!(pizza_id = id.0, "pizza updated");
    Ok(Json(PizzaDetailView::from(&detail)))
}

/// Deletes a pizza. Its toppings are left in place.
///
/// `DELETE /pizzas/{id}/`
pub async fn delete_pizza(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_pizza_id(&id)?;
    state.db.run(move |store| store.delete_pizza(id)).await?;
    tracing::info!(pizza_id = id.0, "pizza deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Method fallback for `/pizzas/{id}/`.
///
/// The pizza is resolved first, so an unknown id is a 404 for every method
/// and only an existing pizza answers 405.
pub async fn item_method_not_allowed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Infallible, ApiError> {
    let id = parse_pizza_id(&id)?;
    state.db.run(move |store| store.get_pizza(id)).await?;
    Err(ApiError::MethodNotAllowed)
}
