//! Pizza request/response types.
//!
//! Wire field names follow the catalog's column names (`nombre`, `precio`,
//! `estado`); the English names are accepted as aliases on input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pizzeria_storage::types::MAX_NAME_LEN;
use pizzeria_storage::{
    NewPizza, Pizza, PizzaDetail, PizzaPatch, PizzaStatus, Price, Topping, ToppingId,
};

use crate::error::ApiError;

/// Message returned alongside a freshly created pizza.
pub const CREATED_MESSAGE: &str = "Pizza creada con éxito";

/// Error message when the create form lacks a name or a price.
pub const MISSING_FIELDS_MESSAGE: &str = "Faltan nombre o precio";

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Summary view of a pizza, used by the list and create responses.
#[derive(Debug, Clone, Serialize)]
pub struct PizzaSummaryView {
    pub id: i64,
    pub nombre: String,
    /// Decimal rendered with two fraction digits.
    pub precio: String,
    /// Display label, not the stored code.
    pub estado: String,
}

impl From<&Pizza> for PizzaSummaryView {
    fn from(pizza: &Pizza) -> Self {
        PizzaSummaryView {
            id: pizza.id.0,
            nombre: pizza.name.clone(),
            precio: pizza.price.to_string(),
            estado: pizza.status.label().to_string(),
        }
    }
}

/// Topping as embedded in a pizza detail.
#[derive(Debug, Clone, Serialize)]
pub struct ToppingRefView {
    pub id: i64,
    pub nombre: String,
}

impl From<&Topping> for ToppingRefView {
    fn from(topping: &Topping) -> Self {
        ToppingRefView {
            id: topping.id.0,
            nombre: topping.name.clone(),
        }
    }
}

/// Full view of one pizza.
#[derive(Debug, Clone, Serialize)]
pub struct PizzaDetailView {
    pub id: i64,
    pub nombre: String,
    pub precio: String,
    pub estado: String,
    pub fecha_fabricacion: NaiveDate,
    pub toppings: Vec<ToppingRefView>,
}

impl From<&PizzaDetail> for PizzaDetailView {
    fn from(detail: &PizzaDetail) -> Self {
        let PizzaSummaryView {
            id,
            nombre,
            precio,
            estado,
        } = PizzaSummaryView::from(&detail.pizza);
        PizzaDetailView {
            id,
            nombre,
            precio,
            estado,
            fecha_fabricacion: detail.pizza.created_on,
            toppings: detail.toppings.iter().map(ToppingRefView::from).collect(),
        }
    }
}

/// Response for `GET /pizzas/`.
#[derive(Debug, Clone, Serialize)]
pub struct PizzaListResponse {
    pub pizzas: Vec<PizzaSummaryView>,
}

/// Response for `POST /pizzas/`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePizzaResponse {
    pub message: String,
    pub pizza: PizzaSummaryView,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// The form-encoded body of `POST /pizzas/`.
///
/// Built from raw key/value pairs because `toppings` may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePizzaForm {
    pub nombre: Option<String>,
    pub precio: Option<String>,
    pub toppings: Vec<String>,
}

impl CreatePizzaForm {
    /// Decodes an `application/x-www-form-urlencoded` body.
    pub fn from_urlencoded(body: &[u8]) -> Result<Self, ApiError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| ApiError::BadRequest(format!("invalid form body: {}", e)))?;
        Ok(Self::from_pairs(pairs))
    }

    /// Later duplicates of scalar fields win, as with a plain form lookup.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = CreatePizzaForm::default();
        for (key, value) in pairs {
            match key.as_str() {
                "nombre" | "name" => form.nombre = Some(value),
                "precio" | "price" => form.precio = Some(value),
                "toppings" | "toppings[]" => form.toppings.push(value),
                _ => {}
            }
        }
        form
    }

    /// Validates the form into a storage insert.
    ///
    /// An empty topping list leaves the new pizza without toppings.
    pub fn into_new_pizza(self) -> Result<NewPizza, ApiError> {
        let (Some(nombre), Some(precio)) = (
            self.nombre.filter(|s| !s.trim().is_empty()),
            self.precio.filter(|s| !s.trim().is_empty()),
        ) else {
            return Err(ApiError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
        };

        let toppings = self
            .toppings
            .iter()
            .map(String::as_str)
            .map(parse_topping_id)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewPizza {
            name: validate_name(nombre)?,
            price: parse_price(&precio)?,
            toppings: (!toppings.is_empty()).then_some(toppings),
        })
    }
}

/// A JSON scalar that may arrive either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrText {
    fn as_text(&self) -> String {
        match self {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s.clone(),
        }
    }
}

/// The JSON body of `PUT /pizzas/{id}/`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdatePizzaRequest {
    #[serde(default, alias = "name")]
    pub nombre: Option<String>,
    #[serde(default, alias = "price")]
    pub precio: Option<NumberOrText>,
    #[serde(default, alias = "status")]
    pub estado: Option<String>,
    #[serde(default)]
    pub toppings: Option<Vec<NumberOrText>>,
}

impl UpdatePizzaRequest {
    pub fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))
    }

    /// Validates the present fields into a storage patch.
    pub fn into_patch(self) -> Result<PizzaPatch, ApiError> {
        let name = self.nombre.map(validate_name).transpose()?;
        let price = self
            .precio
            .map(|raw| parse_price(&raw.as_text()))
            .transpose()?;
        let status = self
            .estado
            .map(|raw| {
                raw.parse::<PizzaStatus>()
                    .map_err(|e| ApiError::BadRequest(e.to_string()))
            })
            .transpose()?;
        let toppings = self
            .toppings
            .map(|ids| {
                ids.iter()
                    .map(|raw| parse_topping_id(&raw.as_text()))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(PizzaPatch {
            name,
            price,
            status,
            toppings,
        })
    }
}

fn validate_name(name: String) -> Result<String, ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("nombre must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::BadRequest(format!(
            "nombre must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name)
}

fn parse_price(raw: &str) -> Result<Price, ApiError> {
    raw.parse::<Price>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn parse_topping_id(raw: &str) -> Result<ToppingId, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map(ToppingId)
        .map_err(|_| ApiError::BadRequest(format!("invalid topping id: {:?}", raw)))
}
