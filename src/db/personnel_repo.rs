use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use crate::models::{Mandate, Personnel, PersonnelAssignment, PersonnelRole};
use crate::utils::error::{AppError, AppResult};

pub struct PersonnelRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PersonnelRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Hämta all personal
    pub fn find_all(&self) -> AppResult<Vec<Personnel>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, first_name, last_name, birthdate, ssn, medicare_number, email,
                    phone, address, city, province, postal_code, created_at, updated_at
             FROM personnel
             ORDER BY last_name, first_name",
        )?;

        let personnel = stmt
            .query_map([], Self::row_to_personnel)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(personnel)
    }

    /// Hämta personal via ID
    pub fn find_by_id(&self, id: i64) -> AppResult<Option<Personnel>> {
        let conn = self.conn.lock().unwrap();
        let person = conn
            .query_row(
                "SELECT id, first_name, last_name, birthdate, ssn, medicare_number, email,
                        phone, address, city, province, postal_code, created_at, updated_at
                 FROM personnel
                 WHERE id = ?",
                [id],
                Self::row_to_personnel,
            )
            .ok();

        Ok(person)
    }

    /// Skapa ny personalpost. Dubbletter på personnummer,
    /// sjukförsäkringsnummer eller e-post avvisas i sin helhet.
    pub fn create(&self, person: &mut Personnel) -> AppResult<i64> {
        person
            .validate()
            .map_err(|e| AppError::validation(e.field(), e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO personnel (first_name, last_name, birthdate, ssn, medicare_number,
                                    email, phone, address, city, province, postal_code)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                person.first_name,
                person.last_name,
                person.birthdate,
                person.ssn,
                person.medicare_number,
                person.email,
                person.phone,
                person.address,
                person.city,
                person.province,
                person.postal_code,
            ],
        )?;

        let id = conn.last_insert_rowid();
        person.id = Some(id);

        Ok(id)
    }

    /// Uppdatera personalpost
    pub fn update(&self, person: &Personnel) -> AppResult<()> {
        let id = person
            .id
            .ok_or_else(|| AppError::other("Personal har inget ID"))?;
        person
            .validate()
            .map_err(|e| AppError::validation(e.field(), e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE personnel SET
                first_name = ?1, last_name = ?2, birthdate = ?3, ssn = ?4,
                medicare_number = ?5, email = ?6, phone = ?7, address = ?8,
                city = ?9, province = ?10, postal_code = ?11,
                updated_at = datetime('now')
             WHERE id = ?12",
            params![
                person.first_name,
                person.last_name,
                person.birthdate,
                person.ssn,
                person.medicare_number,
                person.email,
                person.phone,
                person.address,
                person.city,
                person.province,
                person.postal_code,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Personal med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    /// Ta bort personal. Blockeras om personen är huvudtränare för
    /// laguppställningar; tilldelningshistoriken tas bort i kaskad.
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();

        let coached_teams: i64 = conn.query_row(
            "SELECT COUNT(*) FROM session_teams WHERE head_coach_id = ?",
            [id],
            |row| row.get(0),
        )?;
        if coached_teams > 0 {
            return Err(AppError::foreign_key(format!(
                "{} laguppställningar med personen som huvudtränare",
                coached_teams
            )));
        }

        let rows = conn.execute("DELETE FROM personnel WHERE id = ?", [id])?;
        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Personal med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    /// Räkna antal personalposter
    pub fn count(&self) -> AppResult<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM personnel", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Lägg till en rolltilldelning
    pub fn add_assignment(&self, assignment: &mut PersonnelAssignment) -> AppResult<i64> {
        assignment
            .validate()
            .map_err(|e| AppError::validation(e.field(), e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO personnel_assignments (personnel_id, location_id, role, mandate,
                                                start_date, end_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                assignment.personnel_id,
                assignment.location_id,
                assignment.role.as_db_str(),
                assignment.mandate.as_db_str(),
                assignment.start_date,
                assignment.end_date,
            ],
        )?;

        let id = conn.last_insert_rowid();
        assignment.id = Some(id);

        Ok(id)
    }

    /// Avsluta en pågående tilldelning
    pub fn end_assignment(&self, assignment_id: i64, end_date: NaiveDate) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE personnel_assignments SET end_date = ?1 WHERE id = ?2 AND end_date IS NULL",
            params![end_date, assignment_id],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Pågående tilldelning med ID {} hittades inte",
                assignment_id
            )));
        }

        Ok(())
    }

    /// Rollhistorik för en person, senaste först
    pub fn assignments_of(&self, personnel_id: i64) -> AppResult<Vec<PersonnelAssignment>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, personnel_id, location_id, role, mandate, start_date, end_date, created_at
             FROM personnel_assignments
             WHERE personnel_id = ?
             ORDER BY start_date DESC",
        )?;

        let assignments = stmt
            .query_map([personnel_id], Self::row_to_assignment)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(assignments)
    }

    /// Pågående tilldelningar på en anläggning
    pub fn current_assignments_at(&self, location_id: i64) -> AppResult<Vec<PersonnelAssignment>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, personnel_id, location_id, role, mandate, start_date, end_date, created_at
             FROM personnel_assignments
             WHERE location_id = ? AND end_date IS NULL
             ORDER BY start_date",
        )?;

        let assignments = stmt
            .query_map([location_id], Self::row_to_assignment)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(assignments)
    }

    /// Nuvarande klubbchef för en anläggning, om någon
    pub fn current_general_manager(&self, location_id: i64) -> AppResult<Option<Personnel>> {
        let conn = self.conn.lock().unwrap();
        let person = conn
            .query_row(
                "SELECT p.id, p.first_name, p.last_name, p.birthdate, p.ssn, p.medicare_number,
                        p.email, p.phone, p.address, p.city, p.province, p.postal_code,
                        p.created_at, p.updated_at
                 FROM personnel_assignments pa
                 JOIN personnel p ON pa.personnel_id = p.id
                 WHERE pa.location_id = ?
                   AND pa.role = 'general manager'
                   AND pa.end_date IS NULL",
                [location_id],
                Self::row_to_personnel,
            )
            .ok();

        Ok(person)
    }

    fn row_to_personnel(row: &Row) -> rusqlite::Result<Personnel> {
        Ok(Personnel {
            id: row.get(0).ok(),
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            birthdate: row.get(3)?,
            ssn: row.get(4)?,
            medicare_number: row.get(5)?,
            email: row.get(6)?,
            phone: row.get(7)?,
            address: row.get(8)?,
            city: row.get(9)?,
            province: row.get(10)?,
            postal_code: row.get(11)?,
            created_at: row.get(12).ok(),
            updated_at: row.get(13).ok(),
        })
    }

    fn row_to_assignment(row: &Row) -> rusqlite::Result<PersonnelAssignment> {
        Ok(PersonnelAssignment {
            id: row.get(0).ok(),
            personnel_id: row.get(1)?,
            location_id: row.get(2)?,
            role: PersonnelRole::from_db_str(&row.get::<_, String>(3)?)
                .unwrap_or(PersonnelRole::Coach),
            mandate: Mandate::from_db_str(&row.get::<_, String>(4)?),
            start_date: row.get(5)?,
            end_date: row.get(6).ok(),
            created_at: row.get(7).ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{testutil, Database};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_duplicate_ssn_rejected() {
        let db = setup_db();
        let repo = db.personnel();
        testutil::personnel(&db, "anna");

        let mut dup = Personnel {
            id: None,
            first_name: "Annika".into(),
            last_name: "Annorlunda".into(),
            birthdate: testutil::date("1985-05-15"),
            ssn: "p-ssn-anna".into(),
            medicare_number: "annat-nummer".into(),
            email: "annika@klubb.example".into(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            province: String::new(),
            postal_code: String::new(),
            created_at: None,
            updated_at: None,
        };

        let err = repo.create(&mut dup).unwrap_err();
        match err {
            AppError::AlreadyExists(column) => assert_eq!(column, "personnel.ssn"),
            other => panic!("fel variant: {:?}", other),
        }
    }

    #[test]
    fn test_assignment_history() {
        let db = setup_db();
        let repo = db.personnel();
        let location_id = testutil::location(&db, "Centralhallen");
        let person_id = testutil::personnel(&db, "coach");

        let mut first = PersonnelAssignment::new(
            person_id,
            location_id,
            PersonnelRole::AssistantCoach,
            Mandate::Volunteer,
            testutil::date("2022-01-01"),
        );
        let first_id = repo.add_assignment(&mut first).unwrap();
        repo.end_assignment(first_id, testutil::date("2022-12-31")).unwrap();

        let mut second = PersonnelAssignment::new(
            person_id,
            location_id,
            PersonnelRole::Coach,
            Mandate::Salaried,
            testutil::date("2023-01-01"),
        );
        repo.add_assignment(&mut second).unwrap();

        let history = repo.assignments_of(person_id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, PersonnelRole::Coach);
        assert!(history[0].is_current());
        assert!(!history[1].is_current());
    }

    #[test]
    fn test_current_general_manager() {
        let db = setup_db();
        let repo = db.personnel();
        let location_id = testutil::location(&db, "Centralhallen");
        let manager_id = testutil::personnel(&db, "sara");
        let former_id = testutil::personnel(&db, "gustav");

        // Tidigare chef med avslutad tilldelning räknas inte
        let mut former = PersonnelAssignment::new(
            former_id,
            location_id,
            PersonnelRole::GeneralManager,
            Mandate::Salaried,
            testutil::date("2020-01-01"),
        );
        former.end_date = Some(testutil::date("2022-05-31"));
        repo.add_assignment(&mut former).unwrap();

        let mut current = PersonnelAssignment::new(
            manager_id,
            location_id,
            PersonnelRole::GeneralManager,
            Mandate::Salaried,
            testutil::date("2022-06-01"),
        );
        repo.add_assignment(&mut current).unwrap();

        let gm = repo.current_general_manager(location_id).unwrap().unwrap();
        assert_eq!(gm.id, Some(manager_id));
    }

    #[test]
    fn test_delete_blocked_by_coached_teams() {
        let db = setup_db();
        let location_id = testutil::location(&db, "Centralhallen");
        let coach_id = testutil::personnel(&db, "ledare");
        let session_id = testutil::session(&db, "2024-05-01", crate::models::SessionType::Game);
        testutil::team(&db, session_id, 1, location_id, coach_id, None);

        let err = db.personnel().delete(coach_id).unwrap_err();
        assert!(matches!(err, AppError::ForeignKey(_)));
    }

    #[test]
    fn test_delete_cascades_assignments() {
        let db = setup_db();
        let repo = db.personnel();
        let location_id = testutil::location(&db, "Centralhallen");
        let person_id = testutil::personnel(&db, "tillfällig");

        let mut assignment = PersonnelAssignment::new(
            person_id,
            location_id,
            PersonnelRole::Treasurer,
            Mandate::Volunteer,
            testutil::date("2023-03-01"),
        );
        repo.add_assignment(&mut assignment).unwrap();

        repo.delete(person_id).unwrap();
        assert!(repo.assignments_of(person_id).unwrap().is_empty());
    }
}
