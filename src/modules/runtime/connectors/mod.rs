//! Relational engines for Tributary
//!
//! Each engine opens a fresh connection per call, introspects its catalog,
//! and executes synthesized read-only statements.

mod manager;
mod mysql;
mod postgres;
mod traits;
mod value;

pub use manager::EngineSet;
pub use mysql::MySqlEngine;
pub use postgres::PostgresEngine;
pub use traits::SqlEngine;
pub use value::{decimal_value, float_value};
