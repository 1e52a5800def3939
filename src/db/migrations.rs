use rusqlite::Connection;
use tracing::info;

use crate::utils::error::AppResult;

use super::schema::{CREATE_TABLES, DEFAULT_HOBBIES, SCHEMA_VERSION};

/// Kör alla nödvändiga migrationer
pub fn run_migrations(conn: &Connection) -> AppResult<()> {
    let current_version = get_current_version(conn)?;

    if current_version == 0 {
        // Ny databas - skapa allt
        info!("Skapar ny databas med schema version {}", SCHEMA_VERSION);
        initial_setup(conn)?;
    } else if current_version < SCHEMA_VERSION {
        // Uppdatera befintlig databas
        info!(
            "Migrerar databas från version {} till {}",
            current_version, SCHEMA_VERSION
        );
        migrate_from(conn, current_version)?;
    } else {
        info!("Databas är uppdaterad (version {})", current_version);
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> AppResult<i32> {
    // Kontrollera om schema_migrations-tabellen finns
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_migrations')",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    // Hämta senaste version
    let version: Option<i32> = conn
        .query_row(
            "SELECT MAX(version) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .ok();

    Ok(version.unwrap_or(0))
}

fn initial_setup(conn: &Connection) -> AppResult<()> {
    // Skapa alla tabeller
    conn.execute_batch(CREATE_TABLES)?;

    // Sätt in standardintressen
    insert_default_hobbies(conn)?;

    // Markera migration som klar
    conn.execute(
        "INSERT INTO schema_migrations (version) VALUES (?)",
        [SCHEMA_VERSION],
    )?;

    info!("Initial setup klar");
    Ok(())
}

fn insert_default_hobbies(conn: &Connection) -> AppResult<()> {
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO hobbies (name) VALUES (?)")?;

    for name in DEFAULT_HOBBIES {
        stmt.execute([*name])?;
    }

    info!("Lade till {} standardintressen", DEFAULT_HOBBIES.len());
    Ok(())
}

fn migrate_from(conn: &Connection, from_version: i32) -> AppResult<()> {
    // Kör migrationer stegvis
    for version in (from_version + 1)..=SCHEMA_VERSION {
        if version == 2 {
            migrate_v1_to_v2(conn)?;
        }

        // Markera version som migrerad
        conn.execute(
            "INSERT INTO schema_migrations (version) VALUES (?)",
            [version],
        )?;

        info!("Migrerade till version {}", version);
    }

    Ok(())
}

/// Migration v1 -> v2: Lägg till e-postloggen
///
/// Version 1 saknade spårning av utskick. Tabellen skapas med samma
/// definition som i CREATE_TABLES så att nya och migrerade databaser
/// hamnar i samma skick.
fn migrate_v1_to_v2(conn: &Connection) -> AppResult<()> {
    info!("Migration v2: Lägger till email_logs");

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS email_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sender_location_id INTEGER NOT NULL,
            receiver_member_id INTEGER,
            receiver_email TEXT NOT NULL,
            subject TEXT NOT NULL,
            body_preview TEXT NOT NULL DEFAULT '',
            email_type TEXT NOT NULL DEFAULT 'general',
            status TEXT NOT NULL DEFAULT 'pending',
            session_id INTEGER,
            sent_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (sender_location_id) REFERENCES locations(id) ON DELETE CASCADE,
            FOREIGN KEY (receiver_member_id) REFERENCES club_members(id) ON DELETE SET NULL,
            FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE SET NULL
        );
        CREATE INDEX IF NOT EXISTS idx_email_logs_sender ON email_logs(sender_location_id);",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_initial_migration() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        // Verifiera att tabeller skapades
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"club_members".to_string()));
        assert!(tables.contains(&"locations".to_string()));
        assert!(tables.contains(&"payments".to_string()));
        assert!(tables.contains(&"session_teams".to_string()));
        assert!(tables.contains(&"player_assignments".to_string()));
        assert!(tables.contains(&"email_logs".to_string()));
    }

    #[test]
    fn test_idempotent_migration() {
        let conn = Connection::open_in_memory().unwrap();

        // Kör migrationer två gånger
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        // Ska inte krascha
        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_all_registered_entities_have_tables() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for (entity, table) in crate::db::schema::ENTITIES {
            let exists: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?)",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert!(exists, "tabell saknas för {}: {}", entity, table);
        }
    }

    #[test]
    fn test_default_hobbies_seeded() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM hobbies", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, DEFAULT_HOBBIES.len() as i64);
    }
}
