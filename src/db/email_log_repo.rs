use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

use crate::models::{EmailLog, EmailStatus, EmailType};
use crate::utils::error::{AppError, AppResult};

pub struct EmailLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmailLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Logga ett utskick
    pub fn create(&self, log: &mut EmailLog) -> AppResult<i64> {
        if log.receiver_email.trim().is_empty() {
            return Err(AppError::validation(
                "receiver_email",
                "Mottagaradress får inte vara tom",
            ));
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO email_logs (sender_location_id, receiver_member_id, receiver_email,
                                     subject, body_preview, email_type, status, session_id, sent_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                log.sender_location_id,
                log.receiver_member_id,
                log.receiver_email,
                log.subject,
                log.body_preview,
                log.email_type.as_db_str(),
                log.status.as_db_str(),
                log.session_id,
                log.sent_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        log.id = Some(id);

        Ok(id)
    }

    /// Utskick från en anläggning, senaste först
    pub fn find_by_location(&self, location_id: i64) -> AppResult<Vec<EmailLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, sender_location_id, receiver_member_id, receiver_email, subject,
                    body_preview, email_type, status, session_id, sent_at
             FROM email_logs
             WHERE sender_location_id = ?
             ORDER BY id DESC",
        )?;

        let logs = stmt
            .query_map([location_id], Self::row_to_log)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(logs)
    }

    /// Utskick till en medlem, senaste först
    pub fn find_by_member(&self, member_id: i64) -> AppResult<Vec<EmailLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, sender_location_id, receiver_member_id, receiver_email, subject,
                    body_preview, email_type, status, session_id, sent_at
             FROM email_logs
             WHERE receiver_member_id = ?
             ORDER BY id DESC",
        )?;

        let logs = stmt
            .query_map([member_id], Self::row_to_log)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(logs)
    }

    /// Räkna antal loggposter
    pub fn count(&self) -> AppResult<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM email_logs", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_log(row: &Row) -> rusqlite::Result<EmailLog> {
        Ok(EmailLog {
            id: row.get(0).ok(),
            sender_location_id: row.get(1)?,
            receiver_member_id: row.get(2).ok(),
            receiver_email: row.get(3)?,
            subject: row.get(4)?,
            body_preview: row.get(5)?,
            email_type: EmailType::from_db_str(&row.get::<_, String>(6)?),
            status: EmailStatus::from_db_str(&row.get::<_, String>(7)?),
            session_id: row.get(8).ok(),
            sent_at: row.get(9).ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{testutil, Database};
    use crate::models::SessionType;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_list() {
        let db = setup_db();
        let repo = db.email_logs();
        let location_id = testutil::location(&db, "Centralhallen");
        let member_id = testutil::member(&db, "alva", location_id);

        let mut log = EmailLog::new(
            location_id,
            "alva@example.com".into(),
            "Välkommen till klubben".into(),
        );
        log.receiver_member_id = Some(member_id);
        log.status = EmailStatus::Sent;
        log.body_preview = EmailLog::preview_of("Hej Alva! Vi ser fram emot säsongen.");
        repo.create(&mut log).unwrap();

        let logs = repo.find_by_location(location_id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, EmailStatus::Sent);
        assert_eq!(repo.find_by_member(member_id).unwrap().len(), 1);
    }

    #[test]
    fn test_member_delete_nulls_receiver() {
        let db = setup_db();
        let repo = db.email_logs();
        let location_id = testutil::location(&db, "Centralhallen");
        let member_id = testutil::member(&db, "bert", location_id);
        let session_id = testutil::session(&db, "2024-05-01", SessionType::Training);

        let mut log = EmailLog::new(
            location_id,
            "bert@example.com".into(),
            "Träningspåminnelse".into(),
        );
        log.receiver_member_id = Some(member_id);
        log.session_id = Some(session_id);
        log.email_type = EmailType::SessionNotification;
        repo.create(&mut log).unwrap();

        // Loggen överlever medlemmen, referensen nollas
        db.members().delete(member_id).unwrap();

        let logs = repo.find_by_location(location_id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].receiver_member_id, None);
        assert_eq!(logs[0].email_type, EmailType::SessionNotification);
    }
}
