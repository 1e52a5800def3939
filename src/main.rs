//! Klubbadmin - Entry Point
//!
//! Öppnar registret, kör migrationer och skriver en översikt.
//! Med `--seed` fylls en tom databas med demodata.

use anyhow::Result;

use klubbadmin::db::seed;
use klubbadmin::models::AppSettings;
use klubbadmin::Database;

fn main() -> Result<()> {
    // Initiera logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    tracing::info!("Startar Klubbadmin v{}", env!("CARGO_PKG_VERSION"));

    let settings = AppSettings::load();
    tracing::info!("Databas: {}", settings.database_path.display());

    let db = Database::open(&settings.database_path)?;
    db.migrate()?;

    if std::env::args().any(|arg| arg == "--seed") {
        seed::populate_demo(&db)?;
    }

    tracing::info!("{}", settings.club_name);
    for (entity, count) in db.entity_counts()? {
        tracing::info!("- {}: {} poster", entity, count);
    }

    Ok(())
}
