//! Export av rapporter till fil (JSON, CSV)

use chrono::Utc;
use serde::Serialize;
use std::path::Path;

use crate::reports::ReportTable;
use crate::utils::error::{AppError, AppResult};

/// Exportformat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }
}

/// Exporterbar tabellform med kolumnnamn per rad
#[derive(Debug, Serialize)]
struct TableExport<'a> {
    report: &'static str,
    generated_at: String,
    columns: &'a [&'static str],
    rows: &'a [Vec<String>],
}

/// Export-tjänst för rapporttabeller
pub struct ExportService;

impl ExportService {
    /// Generera filnamn för export
    pub fn generate_filename(table: &ReportTable, format: ExportFormat) -> String {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        format!(
            "klubbadmin_{}_{}.{}",
            table.kind.key(),
            timestamp,
            format.extension()
        )
    }

    /// Rendera en rapporttabell till vald textform
    pub fn render(table: &ReportTable, format: ExportFormat) -> AppResult<String> {
        match format {
            ExportFormat::Json => {
                let export = TableExport {
                    report: table.kind.key(),
                    generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                    columns: &table.columns,
                    rows: &table.rows,
                };
                serde_json::to_string_pretty(&export)
                    .map_err(|e| AppError::other(format!("JSON-serialisering misslyckades: {}", e)))
            }
            ExportFormat::Csv => Ok(Self::to_csv(table)),
        }
    }

    /// Exportera rapporttabell till fil
    pub fn export_to_file(
        table: &ReportTable,
        format: ExportFormat,
        path: &Path,
    ) -> AppResult<ExportResult> {
        let content = Self::render(table, format)?;
        std::fs::write(path, &content)?;

        Ok(ExportResult {
            format,
            row_count: table.len(),
            file_size: content.len(),
        })
    }

    /// Konvertera tabell till CSV
    fn to_csv(table: &ReportTable) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str(&table.columns.join(","));
        csv.push('\n');

        // Rader
        for row in &table.rows {
            let line: Vec<String> = row.iter().map(|cell| Self::csv_escape(cell)).collect();
            csv.push_str(&line.join(","));
            csv.push('\n');
        }

        csv
    }

    /// Escape CSV-värde
    fn csv_escape(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

/// Resultat av export
#[derive(Debug)]
pub struct ExportResult {
    pub format: ExportFormat,
    pub row_count: usize,
    pub file_size: usize,
}

impl ExportResult {
    pub fn summary(&self) -> String {
        format!(
            "{} exporterad: {} rader, {} bytes",
            self.format.display_name(),
            self.row_count,
            self.file_size
        )
    }
}
