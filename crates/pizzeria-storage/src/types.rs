//! Storage-layer types for the pizza catalog.
//!
//! Identifiers are storage concerns: pizzas and toppings only gain an ID when
//! persisted. The inner `i64` aligns with SQLite's `INTEGER PRIMARY KEY`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Longest name accepted for pizzas and toppings, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Unique identifier for a stored pizza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PizzaId(pub i64);

impl fmt::Display for PizzaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PizzaId({})", self.0)
    }
}

/// Unique identifier for a stored topping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToppingId(pub i64);

impl fmt::Display for ToppingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ToppingId({})", self.0)
    }
}

/// Availability status of a pizza.
///
/// Stored as a three-letter code; rendered to clients as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PizzaStatus {
    #[default]
    Available,
    Promotion,
    Scheduled,
    Cancelled,
}

impl PizzaStatus {
    pub const ALL: [PizzaStatus; 4] = [
        PizzaStatus::Available,
        PizzaStatus::Promotion,
        PizzaStatus::Scheduled,
        PizzaStatus::Cancelled,
    ];

    /// The code persisted in the `estado` column.
    pub fn code(self) -> &'static str {
        match self {
            PizzaStatus::Available => "DIS",
            PizzaStatus::Promotion => "PRO",
            PizzaStatus::Scheduled => "PRG",
            PizzaStatus::Cancelled => "CAN",
        }
    }

    /// The human-readable label shown to clients.
    pub fn label(self) -> &'static str {
        match self {
            PizzaStatus::Available => "Disponible",
            PizzaStatus::Promotion => "Promoción",
            PizzaStatus::Scheduled => "Programada",
            PizzaStatus::Cancelled => "Cancelada",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

impl fmt::Display for PizzaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string is neither a status code nor a status label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pizza status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for PizzaStatus {
    type Err = UnknownStatus;

    /// Accepts either the stored code (`PRO`) or the label (`Promoción`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
            .or_else(|| Self::ALL.into_iter().find(|st| st.label() == s))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A pizza price: non-negative, at most two decimal places and ten digits.
///
/// Always carries a scale of exactly two, so `"9.5"` renders as `"9.50"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

/// Why a price was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPrice {
    #[error("price is not a decimal number: {0:?}")]
    NotANumber(String),
    #[error("price must not be negative")]
    Negative,
    #[error("price has more than {} decimal places", Price::SCALE)]
    TooPrecise,
    #[error("price has more than {} digits", Price::MAX_DIGITS)]
    TooLarge,
}

impl Price {
    pub const SCALE: u32 = 2;
    pub const MAX_DIGITS: u32 = 10;

    pub fn new(value: Decimal) -> Result<Self, InvalidPrice> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(InvalidPrice::Negative);
        }
        let value = value.normalize();
        if value.scale() > Self::SCALE {
            return Err(InvalidPrice::TooPrecise);
        }
        let mut value = value;
        value.rescale(Self::SCALE);
        // Integer digits left once the two fraction digits are accounted for.
        let max_integral = Decimal::from(10_i64.pow(Self::MAX_DIGITS - Self::SCALE));
        if value.trunc() >= max_integral {
            return Err(InvalidPrice::TooLarge);
        }
        Ok(Price(value))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = InvalidPrice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = Decimal::from_str_exact(trimmed)
            .map_err(|_| InvalidPrice::NotANumber(s.to_string()))?;
        Price::new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A topping as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topping {
    pub id: ToppingId,
    pub name: String,
    pub vegetarian: bool,
}

/// A pizza row, without its topping set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pizza {
    pub id: PizzaId,
    pub name: String,
    pub price: Price,
    /// Set once at insert time.
    pub created_on: NaiveDate,
    pub status: PizzaStatus,
}

/// A pizza together with the toppings currently linked to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PizzaDetail {
    pub pizza: Pizza,
    /// Ordered by topping id.
    pub toppings: Vec<Topping>,
}

/// Input for creating a pizza. Status always starts as the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPizza {
    pub name: String,
    pub price: Price,
    /// `Some` sets exactly this topping set on the new pizza.
    pub toppings: Option<Vec<ToppingId>>,
}

/// A partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PizzaPatch {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub status: Option<PizzaStatus>,
    /// `Some` replaces the whole topping set, `Some(vec![])` clears it.
    pub toppings: Option<Vec<ToppingId>>,
}

impl PizzaPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.status.is_none()
            && self.toppings.is_none()
    }
}

/// Input for creating a topping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopping {
    pub name: String,
    pub vegetarian: bool,
}
