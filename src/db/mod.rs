pub mod schema;
pub mod migrations;
pub mod location_repo;
pub mod personnel_repo;
pub mod family_repo;
pub mod member_repo;
pub mod payment_repo;
pub mod session_repo;
pub mod email_log_repo;
pub mod seed;

#[cfg(test)]
pub(crate) mod testutil;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::utils::error::AppResult;

pub use email_log_repo::EmailLogRepository;
pub use family_repo::FamilyRepository;
pub use location_repo::LocationRepository;
pub use member_repo::{MemberDetail, MemberRepository};
pub use payment_repo::PaymentRepository;
pub use personnel_repo::PersonnelRepository;
pub use session_repo::SessionRepository;

/// Huvuddatabas-wrapper med thread-safe access
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Öppna eller skapa databas
    pub fn open(path: &Path) -> AppResult<Self> {
        // Skapa katalog om den inte finns
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Konfigurera SQLite
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            ",
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Öppna in-memory databas (för tester)
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Kör databasmigrationer
    pub fn migrate(&self) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        migrations::run_migrations(&conn)
    }

    /// Hämta anläggnings-repository
    pub fn locations(&self) -> LocationRepository {
        LocationRepository::new(Arc::clone(&self.conn))
    }

    /// Hämta personal-repository
    pub fn personnel(&self) -> PersonnelRepository {
        PersonnelRepository::new(Arc::clone(&self.conn))
    }

    /// Hämta familje-repository
    pub fn families(&self) -> FamilyRepository {
        FamilyRepository::new(Arc::clone(&self.conn))
    }

    /// Hämta medlems-repository
    pub fn members(&self) -> MemberRepository {
        MemberRepository::new(Arc::clone(&self.conn))
    }

    /// Hämta betalnings-repository
    pub fn payments(&self) -> PaymentRepository {
        PaymentRepository::new(Arc::clone(&self.conn))
    }

    /// Hämta sessions-repository
    pub fn sessions(&self) -> SessionRepository {
        SessionRepository::new(Arc::clone(&self.conn))
    }

    /// Hämta e-postloggs-repository
    pub fn email_logs(&self) -> EmailLogRepository {
        EmailLogRepository::new(Arc::clone(&self.conn))
    }

    /// Antal poster per registrerad entitet
    pub fn entity_counts(&self) -> AppResult<Vec<(&'static str, i64)>> {
        let conn = self.conn.lock().unwrap();

        let mut counts = Vec::with_capacity(schema::ENTITIES.len());
        for (entity, table) in schema::ENTITIES {
            let count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", table),
                [],
                |row| row.get(0),
            )?;
            counts.push((*entity, count));
        }

        Ok(counts)
    }

    /// Direkt tillgång till connection (för rapportfrågor m.m.)
    pub fn with_connection<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let conn = self.conn.lock().unwrap();
        f(&conn)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("klubb.db");

        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();

        assert!(path.exists());
        assert_eq!(db.members().count().unwrap(), 0);
    }
}
