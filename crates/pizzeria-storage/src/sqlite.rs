//! SQLite implementation of [`PizzaStore`].
//!
//! [`SqliteStore`] owns a single `rusqlite::Connection`. Prices are stored as
//! TEXT with a fixed scale of two, statuses as their three-letter code, and
//! the pizza/topping relation lives in the `pizza_toppings` join table.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use crate::error::StorageError;
use crate::traits::PizzaStore;
use crate::types::{
    NewPizza, NewTopping, Pizza, PizzaDetail, PizzaId, PizzaPatch, PizzaStatus, Price, Topping,
    ToppingId,
};

/// SQLite-backed implementation of [`PizzaStore`].
///
/// Every write operation is wrapped in a transaction for atomicity.
/// The connection is closed when the store is dropped.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`, applying migrations.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens a connection to an already migrated database at `path`.
    pub fn connect(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::connect(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }
}

// -----------------------------------------------------------------------
// Row helpers (shared by plain connections and transactions)
// -----------------------------------------------------------------------

/// A pizza row exactly as read from SQLite, before decoding.
type RawPizza = (i64, String, String, NaiveDate, String);

const PIZZA_COLUMNS: &str = "id, nombre, precio, fecha_fabricacion, estado";

fn read_raw_pizza(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPizza> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn decode_pizza((id, name, price, created_on, status): RawPizza) -> Result<Pizza, StorageError> {
    let price = price.parse::<Price>().map_err(|e| StorageError::Corrupt {
        reason: format!("pizza {}: {}", id, e),
    })?;
    let status = PizzaStatus::from_code(&status).ok_or_else(|| StorageError::Corrupt {
        reason: format!("pizza {}: unknown status code {:?}", id, status),
    })?;
    Ok(Pizza {
        id: PizzaId(id),
        name,
        price,
        created_on,
        status,
    })
}

fn load_pizza(conn: &Connection, id: PizzaId) -> Result<Pizza, StorageError> {
    let raw = conn
        .query_row(
            &format!("SELECT {} FROM pizzas WHERE id = ?1", PIZZA_COLUMNS),
            params![id.0],
            read_raw_pizza,
        )
        .optional()?
        .ok_or(StorageError::PizzaNotFound(id.0))?;
    decode_pizza(raw)
}

fn load_toppings(conn: &Connection, id: PizzaId) -> Result<Vec<Topping>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT t.id, t.nombre, t.es_vegetariano
         FROM toppings t
         JOIN pizza_toppings pt ON pt.topping_id = t.id
         WHERE pt.pizza_id = ?1
         ORDER BY t.id",
    )?;
    let rows = stmt.query_map(params![id.0], read_topping)?;
    let mut toppings = Vec::new();
    for row in rows {
        toppings.push(row?);
    }
    Ok(toppings)
}

fn load_detail(conn: &Connection, id: PizzaId) -> Result<PizzaDetail, StorageError> {
    let pizza = load_pizza(conn, id)?;
    let toppings = load_toppings(conn, id)?;
    Ok(PizzaDetail { pizza, toppings })
}

fn read_topping(row: &rusqlite::Row<'_>) -> rusqlite::Result<Topping> {
    Ok(Topping {
        id: ToppingId(row.get(0)?),
        name: row.get(1)?,
        vegetarian: row.get(2)?,
    })
}

/// Deletes every link of `pizza` and inserts the de-duplicated `toppings`.
///
/// Must run inside the caller's transaction so a missing topping rolls back
/// the delete as well.
fn replace_toppings(
    conn: &Connection,
    pizza: PizzaId,
    toppings: &[ToppingId],
) -> Result<(), StorageError> {
    let wanted: BTreeSet<ToppingId> = toppings.iter().copied().collect();

    {
        let mut exists = conn.prepare_cached("SELECT EXISTS(SELECT 1 FROM toppings WHERE id = ?1)")?;
        for topping in &wanted {
            let found: bool = exists.query_row(params![topping.0], |row| row.get(0))?;
            if !found {
                return Err(StorageError::ToppingNotFound(topping.0));
            }
        }
    }

    conn.execute(
        "DELETE FROM pizza_toppings WHERE pizza_id = ?1",
        params![pizza.0],
    )?;
    let mut insert =
        conn.prepare_cached("INSERT INTO pizza_toppings (pizza_id, topping_id) VALUES (?1, ?2)")?;
    for topping in &wanted {
        insert.execute(params![pizza.0, topping.0])?;
    }
    Ok(())
}

/// Starts a transaction that takes the write lock up front.
///
/// In WAL mode a deferred transaction that reads and then writes gets
/// `SQLITE_BUSY` immediately if another connection committed in between;
/// the busy timeout only applies while acquiring the lock.
fn write_transaction(conn: &mut Connection) -> Result<Transaction<'_>, StorageError> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

// -----------------------------------------------------------------------
// PizzaStore implementation
// -----------------------------------------------------------------------

impl PizzaStore for SqliteStore {
    fn list_pizzas(&self) -> Result<Vec<Pizza>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("SELECT {} FROM pizzas ORDER BY id", PIZZA_COLUMNS))?;
        let rows = stmt.query_map([], read_raw_pizza)?;
        let mut pizzas = Vec::new();
        for row in rows {
            pizzas.push(decode_pizza(row?)?);
        }
        Ok(pizzas)
    }

    fn create_pizza(&mut self, new: NewPizza) -> Result<PizzaDetail, StorageError> {
        let tx = write_transaction(&mut self.conn)?;
        tx.execute(
            "INSERT INTO pizzas (nombre, precio, fecha_fabricacion, estado) VALUES (?1, ?2, ?3, ?4)",
            params![
                new.name,
                new.price.to_string(),
                Utc::now().date_naive(),
                PizzaStatus::default().code(),
            ],
        )?;
        let id = PizzaId(tx.last_insert_rowid());
        if let Some(toppings) = &new.toppings {
            replace_toppings(&tx, id, toppings)?;
        }
        let detail = load_detail(&tx, id)?;
        tx.commit()?;
        Ok(detail)
    }

    fn get_pizza(&self, id: PizzaId) -> Result<PizzaDetail, StorageError> {
        load_detail(&self.conn, id)
    }

    fn update_pizza(&mut self, id: PizzaId, patch: PizzaPatch) -> Result<PizzaDetail, StorageError> {
        if patch.is_empty() {
            return load_detail(&self.conn, id);
        }
        let tx = write_transaction(&mut self.conn)?;
        let current = load_pizza(&tx, id)?;

        let name = patch.name.unwrap_or(current.name);
        let price = patch.price.unwrap_or(current.price);
        let status = patch.status.unwrap_or(current.status);
        // Whole-row write: concurrent updates are last-writer-wins.
        tx.execute(
            "UPDATE pizzas SET nombre = ?1, precio = ?2, estado = ?3 WHERE id = ?4",
            params![name, price.to_string(), status.code(), id.0],
        )?;
        if let Some(toppings) = &patch.toppings {
            replace_toppings(&tx, id, toppings)?;
        }

        let detail = load_detail(&tx, id)?;
        tx.commit()?;
        Ok(detail)
    }

    fn delete_pizza(&mut self, id: PizzaId) -> Result<(), StorageError> {
        let tx = write_transaction(&mut self.conn)?;
        // CASCADE covers the links too, but the explicit delete keeps the
        // ordering obvious.
        tx.execute(
            "DELETE FROM pizza_toppings WHERE pizza_id = ?1",
            params![id.0],
        )?;
        let removed = tx.execute("DELETE FROM pizzas WHERE id = ?1", params![id.0])?;
        if removed == 0 {
            return Err(StorageError::PizzaNotFound(id.0));
        }
        tx.commit()?;
        Ok(())
    }

    fn set_toppings(&mut self, id: PizzaId, toppings: &[ToppingId]) -> Result<(), StorageError> {
        let tx = write_transaction(&mut self.conn)?;
        // Surface a missing pizza as such, not as a foreign key failure.
        load_pizza(&tx, id)?;
        replace_toppings(&tx, id, toppings)?;
        tx.commit()?;
        Ok(())
    }

    fn create_topping(&mut self, new: NewTopping) -> Result<Topping, StorageError> {
        let tx = write_transaction(&mut self.conn)?;
        tx.execute(
            "INSERT INTO toppings (nombre, es_vegetariano) VALUES (?1, ?2)",
            params![new.name, new.vegetarian],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                StorageError::DuplicateTopping(new.name.clone())
            } else {
                StorageError::Sqlite(e)
            }
        })?;
        let id = ToppingId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(Topping {
            id,
            name: new.name,
            vegetarian: new.vegetarian,
        })
    }

    fn list_toppings(&self) -> Result<Vec<Topping>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, nombre, es_vegetariano FROM toppings ORDER BY id")?;
        let rows = stmt.query_map([], read_topping)?;
        let mut toppings = Vec::new();
        for row in rows {
            toppings.push(row?);
        }
        Ok(toppings)
    }
}
