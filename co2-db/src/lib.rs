//! In-memory SQLite query layer for the CO2 dashboard.
//!
//! The cleaned [`co2_data::Dataset`] is bulk-loaded into an in-memory SQLite
//! database once per session. Each chart panel is then a typed query that
//! returns a serializable view-model, handed to D3.js as JSON by the
//! Dioxus frontend or written to disk by the CLI.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper for interior mutability in single-threaded WASM
//! - In-memory SQLite via `rusqlite`
//! - Typed query methods returning serializable structs from [`models`]
//! - [`dashboard::render_dashboard`] maps viewer selections to a full view
//!
//! # Usage
//!
//! ```rust
//! use co2_db::Database;
//!
//! let csv = "iso_code,country,year,co2,co2_per_capita,gdp,population,coal_co2,oil_co2,gas_co2,flaring_co2,cement_co2\n\
//! CHN,China,2022,11400,8.0,,,,,,,\n";
//! let dataset = co2_data::loader::load_bytes(csv.as_bytes()).unwrap();
//! let db = Database::from_dataset(&dataset).unwrap();
//!
//! let race = db.query_bar_race(10).unwrap();
//! assert_eq!(race.frames.len(), 1);
//! ```

pub mod dashboard;
pub mod error;
mod loader;
pub mod models;
mod queries;
pub mod schema;

pub use dashboard::{render_dashboard, ChartKind, DashboardView, Panel, Selection};
pub use error::{SelectionError, UnknownChart};

use co2_data::Dataset;
use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory SQLite database holding the cleaned observations.
///
/// This struct is cheaply cloneable (via `Rc`) and suitable for sharing
/// across Dioxus components in a single-threaded WASM environment.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the schema applied.
    ///
    /// The database is empty after creation; use
    /// [`load_dataset`](Self::load_dataset) to populate it.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }

    /// Create a database and load a cleaned dataset into it.
    pub fn from_dataset(dataset: &Dataset) -> anyhow::Result<Self> {
        let db = Self::new()?;
        db.load_dataset(dataset)?;
        Ok(db)
    }
}
