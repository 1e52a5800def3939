use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use crate::models::{Location, LocationType};
use crate::utils::error::{AppError, AppResult};

pub struct LocationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LocationRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Hämta alla anläggningar
    pub fn find_all(&self) -> AppResult<Vec<Location>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, type, address, city, province, postal_code,
                    phone, web_address, capacity, created_at, updated_at
             FROM locations
             ORDER BY name",
        )?;

        let locations = stmt
            .query_map([], Self::row_to_location)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(locations)
    }

    /// Hämta anläggning via ID
    pub fn find_by_id(&self, id: i64) -> AppResult<Option<Location>> {
        let conn = self.conn.lock().unwrap();
        let location = conn
            .query_row(
                "SELECT id, name, type, address, city, province, postal_code,
                        phone, web_address, capacity, created_at, updated_at
                 FROM locations
                 WHERE id = ?",
                [id],
                Self::row_to_location,
            )
            .ok();

        Ok(location)
    }

    /// Skapa ny anläggning
    pub fn create(&self, location: &mut Location) -> AppResult<i64> {
        location
            .validate()
            .map_err(|e| AppError::validation(e.field(), e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO locations (name, type, address, city, province, postal_code,
                                    phone, web_address, capacity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                location.name,
                location.location_type.as_db_str(),
                location.address,
                location.city,
                location.province,
                location.postal_code,
                location.phone,
                location.web_address,
                location.capacity,
            ],
        )?;

        let id = conn.last_insert_rowid();
        location.id = Some(id);

        Ok(id)
    }

    /// Uppdatera anläggning
    pub fn update(&self, location: &Location) -> AppResult<()> {
        let id = location
            .id
            .ok_or_else(|| AppError::other("Anläggning har inget ID"))?;
        location
            .validate()
            .map_err(|e| AppError::validation(e.field(), e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE locations SET
                name = ?1, type = ?2, address = ?3, city = ?4, province = ?5,
                postal_code = ?6, phone = ?7, web_address = ?8, capacity = ?9,
                updated_at = datetime('now')
             WHERE id = ?10",
            params![
                location.name,
                location.location_type.as_db_str(),
                location.address,
                location.city,
                location.province,
                location.postal_code,
                location.phone,
                location.web_address,
                location.capacity,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Anläggning med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    /// Ta bort anläggning. Blockeras om medlemmar, familjekontakter
    /// eller laguppställningar fortfarande hör till anläggningen;
    /// felet namnger vad som blockerar.
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();

        let mut blockers: Vec<String> = Vec::new();
        let checks: &[(&str, &str)] = &[
            ("club_members", "medlemmar"),
            ("family_members", "familjekontakter"),
            ("session_teams", "laguppställningar"),
        ];
        for (table, label) in checks {
            let count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {} WHERE location_id = ?", table),
                [id],
                |row| row.get(0),
            )?;
            if count > 0 {
                blockers.push(format!("{} {}", count, label));
            }
        }

        if !blockers.is_empty() {
            return Err(AppError::foreign_key(blockers.join(", ")));
        }

        let rows = conn.execute("DELETE FROM locations WHERE id = ?", [id])?;
        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Anläggning med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    /// Räkna antal anläggningar
    pub fn count(&self) -> AppResult<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_location(row: &Row) -> rusqlite::Result<Location> {
        Ok(Location {
            id: row.get(0).ok(),
            name: row.get(1)?,
            location_type: LocationType::from_db_str(&row.get::<_, String>(2)?),
            address: row.get(3)?,
            city: row.get(4)?,
            province: row.get(5)?,
            postal_code: row.get(6)?,
            phone: row.get(7)?,
            web_address: row.get(8)?,
            capacity: row.get(9)?,
            created_at: row.get(10).ok(),
            updated_at: row.get(11).ok(),
        })
    }
}
