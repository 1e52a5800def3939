use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use crate::models::{
    FamilyMember, FamilyRelationship, MinorAssociationView, RelationType, SecondaryFamilyMember,
};
use crate::utils::error::{AppError, AppResult};

pub struct FamilyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FamilyRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Hämta alla familjekontakter
    pub fn find_all(&self) -> AppResult<Vec<FamilyMember>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, first_name, last_name, birthdate, ssn, medicare_number, email,
                    phone, address, city, province, postal_code, location_id,
                    created_at, updated_at
             FROM family_members
             ORDER BY last_name, first_name",
        )?;

        let members = stmt
            .query_map([], Self::row_to_family_member)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(members)
    }

    /// Hämta familjekontakt via ID
    pub fn find_by_id(&self, id: i64) -> AppResult<Option<FamilyMember>> {
        let conn = self.conn.lock().unwrap();
        let member = conn
            .query_row(
                "SELECT id, first_name, last_name, birthdate, ssn, medicare_number, email,
                        phone, address, city, province, postal_code, location_id,
                        created_at, updated_at
                 FROM family_members
                 WHERE id = ?",
                [id],
                Self::row_to_family_member,
            )
            .ok();

        Ok(member)
    }

    /// Skapa ny familjekontakt
    pub fn create(&self, member: &mut FamilyMember) -> AppResult<i64> {
        member
            .validate()
            .map_err(|e| AppError::validation(e.field(), e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO family_members (first_name, last_name, birthdate, ssn, medicare_number,
                                         email, phone, address, city, province, postal_code,
                                         location_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                member.first_name,
                member.last_name,
                member.birthdate,
                member.ssn,
                member.medicare_number,
                member.email,
                member.phone,
                member.address,
                member.city,
                member.province,
                member.postal_code,
                member.location_id,
            ],
        )?;

        let id = conn.last_insert_rowid();
        member.id = Some(id);

        Ok(id)
    }

    /// Uppdatera familjekontakt
    pub fn update(&self, member: &FamilyMember) -> AppResult<()> {
        let id = member
            .id
            .ok_or_else(|| AppError::other("Familjekontakt har inget ID"))?;
        member
            .validate()
            .map_err(|e| AppError::validation(e.field(), e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE family_members SET
                first_name = ?1, last_name = ?2, birthdate = ?3, ssn = ?4,
                medicare_number = ?5, email = ?6, phone = ?7, address = ?8,
                city = ?9, province = ?10, postal_code = ?11, location_id = ?12,
                updated_at = datetime('now')
             WHERE id = ?13",
            params![
                member.first_name,
                member.last_name,
                member.birthdate,
                member.ssn,
                member.medicare_number,
                member.email,
                member.phone,
                member.address,
                member.city,
                member.province,
                member.postal_code,
                member.location_id,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Familjekontakt med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    /// Ta bort familjekontakt. Sekundära kontakter och
    /// vårdnadskopplingar tas bort i samma kaskad.
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM family_members WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Familjekontakt med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    /// Räkna antal familjekontakter
    pub fn count(&self) -> AppResult<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM family_members", [], |row| row.get(0))?;
        Ok(count)
    }

    // ------------------------------------------------------------
    // Sekundära kontakter
    // ------------------------------------------------------------

    /// Skapa sekundär kontakt under en familjekontakt
    pub fn create_secondary(&self, secondary: &mut SecondaryFamilyMember) -> AppResult<i64> {
        if secondary.first_name.trim().is_empty() {
            return Err(AppError::validation("first_name", "Förnamn får inte vara tomt"));
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO secondary_family_members (primary_family_member_id, minor_id,
                                                   first_name, last_name, phone, relation_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                secondary.primary_family_member_id,
                secondary.minor_id,
                secondary.first_name,
                secondary.last_name,
                secondary.phone,
                secondary.relation_type.as_db_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        secondary.id = Some(id);

        Ok(id)
    }

    /// Uppdatera sekundär kontakt
    pub fn update_secondary(&self, secondary: &SecondaryFamilyMember) -> AppResult<()> {
        let id = secondary
            .id
            .ok_or_else(|| AppError::other("Sekundär kontakt har inget ID"))?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE secondary_family_members SET
                primary_family_member_id = ?1, minor_id = ?2, first_name = ?3,
                last_name = ?4, phone = ?5, relation_type = ?6
             WHERE id = ?7",
            params![
                secondary.primary_family_member_id,
                secondary.minor_id,
                secondary.first_name,
                secondary.last_name,
                secondary.phone,
                secondary.relation_type.as_db_str(),
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Sekundär kontakt med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    /// Ta bort sekundär kontakt
    pub fn delete_secondary(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM secondary_family_members WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Sekundär kontakt med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    /// Hämta sekundär kontakt via ID
    pub fn find_secondary_by_id(&self, id: i64) -> AppResult<Option<SecondaryFamilyMember>> {
        let conn = self.conn.lock().unwrap();
        let secondary = conn
            .query_row(
                "SELECT id, primary_family_member_id, minor_id, first_name, last_name,
                        phone, relation_type, created_at
                 FROM secondary_family_members
                 WHERE id = ?",
                [id],
                Self::row_to_secondary,
            )
            .ok();

        Ok(secondary)
    }

    /// Sekundära kontakter under en familjekontakt
    pub fn secondaries_of(&self, family_member_id: i64) -> AppResult<Vec<SecondaryFamilyMember>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, primary_family_member_id, minor_id, first_name, last_name,
                    phone, relation_type, created_at
             FROM secondary_family_members
             WHERE primary_family_member_id = ?
             ORDER BY last_name, first_name",
        )?;

        let secondaries = stmt
            .query_map([family_member_id], Self::row_to_secondary)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(secondaries)
    }

    // ------------------------------------------------------------
    // Vårdnadskopplingar
    // ------------------------------------------------------------

    /// Kontrollera om vårdnadskoppling redan finns
    pub fn relationship_exists(&self, minor_id: i64, major_id: i64) -> AppResult<bool> {
        let conn = self.conn.lock().unwrap();
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM family_relationships WHERE minor_id = ? AND major_id = ?)",
            params![minor_id, major_id],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    /// Koppla en minderårig medlem till en vårdnadshavare
    pub fn link_minor(&self, rel: &mut FamilyRelationship) -> AppResult<i64> {
        // Kontrollera att koppling inte redan finns
        if self.relationship_exists(rel.minor_id, rel.major_id)? {
            return Err(AppError::already_exists(
                "Vårdnadskoppling mellan medlem och kontakt finns redan",
            ));
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO family_relationships (minor_id, major_id, relation_type, start_date,
                                               is_primary, emergency_contact)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                rel.minor_id,
                rel.major_id,
                rel.relation_type.as_db_str(),
                rel.start_date,
                rel.is_primary,
                rel.emergency_contact,
            ],
        )?;

        let id = conn.last_insert_rowid();
        rel.id = Some(id);

        Ok(id)
    }

    /// Ta bort vårdnadskoppling
    pub fn unlink_minor(&self, relationship_id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "DELETE FROM family_relationships WHERE id = ?",
            [relationship_id],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Vårdnadskoppling med ID {} hittades inte",
                relationship_id
            )));
        }

        Ok(())
    }

    /// Minderåriga kopplade till en vårdnadshavare (för visning)
    pub fn minors_of(&self, major_id: i64) -> AppResult<Vec<MinorAssociationView>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT fr.id, cm.id, cm.first_name, cm.last_name, fr.relation_type,
                    fr.is_primary, fr.emergency_contact
             FROM family_relationships fr
             JOIN club_members cm ON fr.minor_id = cm.id
             WHERE fr.major_id = ?
             ORDER BY cm.last_name, cm.first_name",
        )?;

        let views = stmt
            .query_map([major_id], |row| {
                let first: String = row.get(2)?;
                let last: String = row.get(3)?;
                Ok(MinorAssociationView {
                    relationship_id: row.get(0)?,
                    minor_id: row.get(1)?,
                    minor_name: format!("{} {}", first, last),
                    relation_type: RelationType::from_db_str(&row.get::<_, String>(4)?),
                    is_primary: row.get(5)?,
                    emergency_contact: row.get(6)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(views)
    }

    fn row_to_family_member(row: &Row) -> rusqlite::Result<FamilyMember> {
        Ok(FamilyMember {
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
            location_id: row.get(12)?,
            created_at: row.get(13).ok(),
            updated_at: row.get(14).ok(),
        })
    }

    fn row_to_secondary(row: &Row) -> rusqlite::Result<SecondaryFamilyMember> {
        Ok(SecondaryFamilyMember {
            id: row.get(0).ok(),
            primary_family_member_id: row.get(1)?,
            minor_id: row.get(2).ok(),
            first_name: row.get(3)?,
            last_name: row.get(4)?,
            phone: row.get(5)?,
            relation_type: RelationType::from_db_str(&row.get::<_, String>(6)?),
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
    fn test_guardian_links() {
        let db = setup_db();
        let repo = db.families();
        let location_id = testutil::location(&db, "Centralhallen");
        let guardian_id = testutil::family_member(&db, "lisa", location_id);
        let minor_id = testutil::member_with(
            &db,
            "elsa",
            location_id,
            testutil::date("2011-05-15"),
            true,
            true,
        );

        let mut rel = FamilyRelationship::new(
            minor_id,
            guardian_id,
            RelationType::Mother,
            testutil::date("2011-05-15"),
        );
        rel.is_primary = true;
        rel.emergency_contact = true;
        repo.link_minor(&mut rel).unwrap();

        let minors = repo.minors_of(guardian_id).unwrap();
        assert_eq!(minors.len(), 1);
        assert_eq!(minors[0].minor_name, "elsa Testsson");
        assert_eq!(minors[0].relation_type, RelationType::Mother);
        assert!(minors[0].is_primary);
    }

    #[test]
    fn test_duplicate_link_rejected() {
        let db = setup_db();
        let repo = db.families();
        let location_id = testutil::location(&db, "Centralhallen");
        let guardian_id = testutil::family_member(&db, "micke", location_id);
        let minor_id = testutil::member_with(
            &db,
            "ture",
            location_id,
            testutil::date("2012-02-01"),
            true,
            true,
        );

        let mut rel = FamilyRelationship::new(
            minor_id,
            guardian_id,
            RelationType::Father,
            testutil::date("2012-02-01"),
        );
        repo.link_minor(&mut rel).unwrap();

        let mut dup = FamilyRelationship::new(
            minor_id,
            guardian_id,
            RelationType::Tutor,
            testutil::date("2020-01-01"),
        );
        assert!(matches!(
            repo.link_minor(&mut dup),
            Err(AppError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_delete_cascades_secondaries_and_links() {
        let db = setup_db();
        let repo = db.families();
        let location_id = testutil::location(&db, "Centralhallen");
        let guardian_id = testutil::family_member(&db, "bodil", location_id);
        let minor_id = testutil::member_with(
            &db,
            "sixten",
            location_id,
            testutil::date("2012-09-09"),
            true,
            true,
        );

        let mut secondary = SecondaryFamilyMember {
            id: None,
            primary_family_member_id: guardian_id,
            minor_id: Some(minor_id),
            first_name: "Göran".into(),
            last_name: "Reserv".into(),
            phone: "514-555-9001".into(),
            relation_type: RelationType::Grandfather,
            created_at: None,
        };
        repo.create_secondary(&mut secondary).unwrap();

        let mut rel = FamilyRelationship::new(
            minor_id,
            guardian_id,
            RelationType::Mother,
            testutil::date("2012-09-09"),
        );
        repo.link_minor(&mut rel).unwrap();

        repo.delete(guardian_id).unwrap();

        assert!(repo.secondaries_of(guardian_id).unwrap().is_empty());
        assert!(repo.minors_of(guardian_id).unwrap().is_empty());
    }
}
