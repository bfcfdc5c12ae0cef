//! Pizza catalog admin CLI.
//!
//! Provides the `pizzeria` binary for catalog work that has no HTTP endpoint.
//! Toppings are created here and then referenced by id from the API; the
//! pizza listing mirrors `GET /pizzas/` for quick inspection of a database.
//!
//! Output is JSON on stdout. Exit codes: 0 = success, 1 = rejected input,
//! 3 = database error.

use std::process;

use clap::{Parser, Subcommand};
use serde_json::json;

use pizzeria_storage::types::MAX_NAME_LEN;
use pizzeria_storage::{NewTopping, PizzaStore, SqliteStore, StorageError};

/// Pizza catalog admin tools.
#[derive(Debug, Parser)]
#[command(name = "pizzeria", about = "Pizza catalog admin tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage toppings.
    Toppings {
        #[command(subcommand)]
        action: ToppingCommand,
    },
    /// Inspect pizzas.
    Pizzas {
        #[command(subcommand)]
        action: PizzaCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ToppingCommand {
    /// Create a topping.
    Add {
        /// Path to the catalog database file.
        #[arg(short, long)]
        db: String,

        /// Topping name (unique).
        #[arg(short, long)]
        name: String,

        /// Mark the topping as not vegetarian.
        #[arg(long)]
        meat: bool,
    },
    /// List all toppings.
    List {
        /// Path to the catalog database file.
        #[arg(short, long)]
        db: String,
    },
}

#[derive(Debug, Subcommand)]
enum PizzaCommand {
    /// List all pizzas.
    List {
        /// Path to the catalog database file.
        #[arg(short, long)]
        db: String,
    },
}

/// Why a command failed, carrying its exit code.
#[derive(Debug)]
enum CommandError {
    Rejected(String),
    Database(String),
}

impl CommandError {
    fn exit_code(&self) -> i32 {
        match self {
            CommandError::Rejected(_) => 1,
            CommandError::Database(_) => 3,
        }
    }
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateTopping(_) => CommandError::Rejected(err.to_string()),
            other => CommandError::Database(other.to_string()),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(output) => println!("{}", output),
        Err(err) => {
            match &err {
                CommandError::Rejected(msg) => eprintln!("Error: {}", msg),
                CommandError::Database(msg) => eprintln!("Database error: {}", msg),
            }
            process::exit(err.exit_code());
        }
    }
}

fn run(command: Commands) -> Result<serde_json::Value, CommandError> {
    match command {
        Commands::Toppings {
            action: ToppingCommand::Add { db, name, meat },
        } => add_topping(&mut open_store(&db)?, name, !meat),
        Commands::Toppings {
            action: ToppingCommand::List { db },
        } => list_toppings(&open_store(&db)?),
        Commands::Pizzas {
            action: PizzaCommand::List { db },
        } => list_pizzas(&open_store(&db)?),
    }
}

/// Opens the database, creating it and applying migrations if needed.
fn open_store(db_path: &str) -> Result<SqliteStore, CommandError> {
    SqliteStore::new(db_path).map_err(|e| {
        CommandError::Database(format!("failed to open database '{}': {}", db_path, e))
    })
}

fn add_topping(
    store: &mut impl PizzaStore,
    name: String,
    vegetarian: bool,
) -> Result<serde_json::Value, CommandError> {
    let name = name.trim().to_string();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(CommandError::Rejected(format!(
            "topping name must be 1 to {} characters",
            MAX_NAME_LEN
        )));
    }
    let topping = store.create_topping(NewTopping { name, vegetarian })?;
    Ok(json!({
        "id": topping.id.0,
        "nombre": topping.name,
        "es_vegetariano": topping.vegetarian,
    }))
}

fn list_toppings(store: &impl PizzaStore) -> Result<serde_json::Value, CommandError> {
    let toppings: Vec<_> = store
        .list_toppings()?
        .into_iter()
        .map(|t| {
            json!({
                "id": t.id.0,
                "nombre": t.name,
                "es_vegetariano": t.vegetarian,
            })
        })
        .collect();
    Ok(json!({ "toppings": toppings }))
}

fn list_pizzas(store: &impl PizzaStore) -> Result<serde_json::Value, CommandError> {
    let pizzas: Vec<_> = store
        .list_pizzas()?
        .into_iter()
        .map(|p| {
            json!({
                "id": p.id.0,
                "nombre": p.name,
                "precio": p.price.to_string(),
                "estado": p.status.label(),
            })
        })
        .collect();
    Ok(json!({ "pizzas": pizzas }))
}
