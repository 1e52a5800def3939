//! Klubbadmin - Administrativt registersystem för idrottsförening
//!
//! Medlemmar, personal, familjekontakter, sessioner, betalningar och
//! rapporter ovanpå en relationell SQLite-databas.

#![allow(dead_code)]

pub mod models;
pub mod db;
pub mod reports;
pub mod services;
pub mod utils;

// Re-exports
pub use db::Database;
pub use models::*;
pub use utils::error::{AppError, AppResult};
