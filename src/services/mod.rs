//! Tjänster ovanpå registret

pub mod export;

pub use export::{ExportFormat, ExportResult, ExportService};
