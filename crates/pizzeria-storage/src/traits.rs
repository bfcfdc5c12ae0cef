//! The [`PizzaStore`] trait defining the storage contract for the catalog.
//!
//! Every write is atomic: a create or update that fails part way (for
//! example on an unknown topping id) leaves no trace in storage.

use crate::error::StorageError;
use crate::types::{NewPizza, NewTopping, Pizza, PizzaDetail, PizzaId, PizzaPatch, Topping, ToppingId};

/// The storage contract for pizzas and toppings.
///
/// The trait is synchronous; callers own one store per unit of work and drop
/// it when done.
pub trait PizzaStore {
    // -------------------------------------------------------------------
    // Pizzas
    // -------------------------------------------------------------------

    /// Lists all pizzas in natural (id) order.
    fn list_pizzas(&self) -> Result<Vec<Pizza>, StorageError>;

    /// Creates a pizza with the default status and, if requested, its
    /// topping set.
    fn create_pizza(&mut self, new: NewPizza) -> Result<PizzaDetail, StorageError>;

    /// Loads a pizza with its toppings, or [`StorageError::PizzaNotFound`].
    fn get_pizza(&self, id: PizzaId) -> Result<PizzaDetail, StorageError>;

    /// Applies the present fields of `patch` and returns the updated pizza.
    fn update_pizza(&mut self, id: PizzaId, patch: PizzaPatch) -> Result<PizzaDetail, StorageError>;

    /// Deletes a pizza and its topping links. Toppings themselves survive.
    fn delete_pizza(&mut self, id: PizzaId) -> Result<(), StorageError>;

    /// Replaces the pizza's topping set with exactly `toppings`.
    ///
    /// Duplicates collapse; an unknown topping id fails the whole call.
    fn set_toppings(&mut self, id: PizzaId, toppings: &[ToppingId]) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Toppings
    // -------------------------------------------------------------------

    /// Creates a topping. Names are unique.
    fn create_topping(&mut self, new: NewTopping) -> Result<Topping, StorageError>;

    /// Lists all toppings in id order.
    fn list_toppings(&self) -> Result<Vec<Topping>, StorageError>;
}
