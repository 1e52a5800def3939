use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::models::{
    Gender, PlayerAssignment, Position, Session, SessionStatus, SessionTeam, SessionType,
};
use crate::utils::error::{AppError, AppResult};

/// En spelare i en laguppställning (för visning)
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub assignment_id: i64,
    pub member_id: i64,
    pub member_name: String,
    pub position: Position,
    pub is_starter: bool,
}

pub struct SessionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SessionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Hämta alla sessioner, senaste först
    pub fn find_all(&self) -> AppResult<Vec<Session>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, session_date, session_time, session_type, address, city,
                    province, postal_code, status, created_at
             FROM sessions
             ORDER BY session_date DESC, session_time DESC",
        )?;

        let sessions = stmt
            .query_map([], Self::row_to_session)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(sessions)
    }

    /// Hämta session via ID
    pub fn find_by_id(&self, id: i64) -> AppResult<Option<Session>> {
        let conn = self.conn.lock().unwrap();
        let session = conn
            .query_row(
                "SELECT id, session_date, session_time, session_type, address, city,
                        province, postal_code, status, created_at
                 FROM sessions
                 WHERE id = ?",
                [id],
                Self::row_to_session,
            )
            .ok();

        Ok(session)
    }

    /// Lagra session. Tar emot historiska sessioner: spelade matcher
    /// med resultat hör hemma i registret.
    pub fn create(&self, session: &mut Session) -> AppResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sessions (session_date, session_time, session_type, address,
                                   city, province, postal_code, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                session.session_date,
                session.session_time,
                session.session_type.as_db_str(),
                session.address,
                session.city,
                session.province,
                session.postal_code,
                session.status.as_db_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        session.id = Some(id);

        Ok(id)
    }

    /// Schemalägg ny session via inmatningsvägen: datum bakåt i tiden
    /// avvisas här men inte i `create`.
    pub fn schedule(&self, session: &mut Session, today: NaiveDate) -> AppResult<i64> {
        session
            .validate_for_scheduling(today)
            .map_err(|e| AppError::validation(e.field(), e.to_string()))?;
        self.create(session)
    }

    /// Uppdatera session
    pub fn update(&self, session: &Session) -> AppResult<()> {
        let id = session
            .id
            .ok_or_else(|| AppError::other("Session har inget ID"))?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE sessions SET
                session_date = ?1, session_time = ?2, session_type = ?3, address = ?4,
                city = ?5, province = ?6, postal_code = ?7, status = ?8,
                updated_at = datetime('now')
             WHERE id = ?9",
            params![
                session.session_date,
                session.session_time,
                session.session_type.as_db_str(),
                session.address,
                session.city,
                session.province,
                session.postal_code,
                session.status.as_db_str(),
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Session med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    /// Ta bort session med laguppställningar och spelartilldelningar
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM sessions WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Session med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    // ------------------------------------------------------------
    // Laguppställningar
    // ------------------------------------------------------------

    /// Skapa laguppställning för en session
    pub fn create_team(&self, team: &mut SessionTeam) -> AppResult<i64> {
        team.validate()
            .map_err(|e| AppError::validation(e.field(), e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO session_teams (session_id, team_number, team_name, location_id,
                                        head_coach_id, gender, score)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                team.session_id,
                team.team_number,
                team.team_name,
                team.location_id,
                team.head_coach_id,
                team.gender.as_db_str(),
                team.score,
            ],
        )?;

        let id = conn.last_insert_rowid();
        team.id = Some(id);

        Ok(id)
    }

    /// Uppdatera laguppställning
    pub fn update_team(&self, team: &SessionTeam) -> AppResult<()> {
        let id = team
            .id
            .ok_or_else(|| AppError::other("Laguppställning har inget ID"))?;
        team.validate()
            .map_err(|e| AppError::validation(e.field(), e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE session_teams SET
                session_id = ?1, team_number = ?2, team_name = ?3, location_id = ?4,
                head_coach_id = ?5, gender = ?6, score = ?7
             WHERE id = ?8",
            params![
                team.session_id,
                team.team_number,
                team.team_name,
                team.location_id,
                team.head_coach_id,
                team.gender.as_db_str(),
                team.score,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Laguppställning med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    /// Ta bort laguppställning
    pub fn delete_team(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM session_teams WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Laguppställning med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    /// Hämta laguppställning via ID
    pub fn find_team(&self, id: i64) -> AppResult<Option<SessionTeam>> {
        let conn = self.conn.lock().unwrap();
        let team = conn
            .query_row(
                "SELECT id, session_id, team_number, team_name, location_id,
                        head_coach_id, gender, score, created_at
                 FROM session_teams
                 WHERE id = ?",
                [id],
                Self::row_to_team,
            )
            .ok();

        Ok(team)
    }

    /// Alla laguppställningar, senaste session först
    pub fn find_all_teams(&self) -> AppResult<Vec<SessionTeam>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT st.id, st.session_id, st.team_number, st.team_name, st.location_id,
                    st.head_coach_id, st.gender, st.score, st.created_at
             FROM session_teams st
             JOIN sessions s ON st.session_id = s.id
             ORDER BY s.session_date DESC, s.session_time DESC, st.team_number",
        )?;

        let teams = stmt
            .query_map([], Self::row_to_team)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(teams)
    }

    /// Laguppställningar för en session
    pub fn teams_of_session(&self, session_id: i64) -> AppResult<Vec<SessionTeam>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, session_id, team_number, team_name, location_id,
                    head_coach_id, gender, score, created_at
             FROM session_teams
             WHERE session_id = ?
             ORDER BY team_number",
        )?;

        let teams = stmt
            .query_map([session_id], Self::row_to_team)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(teams)
    }

    /// Sätt resultat för ett lag
    pub fn set_score(&self, team_id: i64, score: i32) -> AppResult<()> {
        if score < 0 {
            return Err(AppError::validation("score", "Resultat kan inte vara negativt"));
        }

        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "UPDATE session_teams SET score = ?1 WHERE id = ?2",
            params![score, team_id],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Laguppställning med ID {} hittades inte",
                team_id
            )));
        }

        Ok(())
    }

    // ------------------------------------------------------------
    // Spelartilldelningar
    // ------------------------------------------------------------

    /// Tilldela en medlem till ett lag. Paret (lag, medlem) är unikt;
    /// andra försöket avvisas.
    pub fn assign_player(&self, assignment: &mut PlayerAssignment) -> AppResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO player_assignments (team_id, member_id, position, is_starter)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                assignment.team_id,
                assignment.member_id,
                assignment.position.as_db_str(),
                assignment.is_starter,
            ],
        )?;

        let id = conn.last_insert_rowid();
        assignment.id = Some(id);

        Ok(id)
    }

    /// Hämta spelartilldelning via ID
    pub fn find_assignment(&self, id: i64) -> AppResult<Option<PlayerAssignment>> {
        let conn = self.conn.lock().unwrap();
        let assignment = conn
            .query_row(
                "SELECT id, team_id, member_id, position, is_starter, created_at
                 FROM player_assignments
                 WHERE id = ?",
                [id],
                |row| {
                    Ok(PlayerAssignment {
                        id: row.get(0).ok(),
                        team_id: row.get(1)?,
                        member_id: row.get(2)?,
                        position: Position::from_db_str(&row.get::<_, String>(3)?)
                            .unwrap_or(Position::Setter),
                        is_starter: row.get(4)?,
                        created_at: row.get(5).ok(),
                    })
                },
            )
            .ok();

        Ok(assignment)
    }

    /// Ta bort spelartilldelning
    pub fn remove_player(&self, assignment_id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "DELETE FROM player_assignments WHERE id = ?",
            [assignment_id],
        )?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Spelartilldelning med ID {} hittades inte",
                assignment_id
            )));
        }

        Ok(())
    }

    /// Spelare i ett lag med namn (för visning)
    pub fn players_of_team(&self, team_id: i64) -> AppResult<Vec<PlayerView>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT pa.id, cm.id, cm.first_name, cm.last_name, pa.position, pa.is_starter
             FROM player_assignments pa
             JOIN club_members cm ON pa.member_id = cm.id
             WHERE pa.team_id = ?
             ORDER BY pa.is_starter DESC, cm.last_name, cm.first_name",
        )?;

        let players = stmt
            .query_map([team_id], |row| {
                let first: String = row.get(2)?;
                let last: String = row.get(3)?;
                Ok(PlayerView {
                    assignment_id: row.get(0)?,
                    member_id: row.get(1)?,
                    member_name: format!("{} {}", first, last),
                    position: Position::from_db_str(&row.get::<_, String>(4)?)
                        .unwrap_or(Position::Setter),
                    is_starter: row.get(5)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(players)
    }

    fn row_to_session(row: &Row) -> rusqlite::Result<Session> {
        Ok(Session {
            id: row.get(0).ok(),
            session_date: row.get(1)?,
            session_time: row.get(2)?,
            session_type: SessionType::from_db_str(&row.get::<_, String>(3)?),
            address: row.get(4)?,
            city: row.get(5)?,
            province: row.get(6)?,
            postal_code: row.get(7)?,
            status: SessionStatus::from_db_str(&row.get::<_, String>(8)?),
            created_at: row.get(9).ok(),
        })
    }

    fn row_to_team(row: &Row) -> rusqlite::Result<SessionTeam> {
        Ok(SessionTeam {
            id: row.get(0).ok(),
            session_id: row.get(1)?,
            team_number: row.get(2)?,
            team_name: row.get(3)?,
            location_id: row.get(4)?,
            head_coach_id: row.get(5)?,
            gender: Gender::from_db_str(&row.get::<_, String>(6)?),
            score: row.get(7).ok(),
            created_at: row.get(8).ok(),
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
    fn test_schedule_rejects_past_but_create_accepts() {
        let db = setup_db();
        let repo = db.sessions();
        let today = testutil::date("2024-06-15");

        let mut past = Session::new(
            testutil::date("2024-06-01"),
            chrono::NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            SessionType::Game,
        );
        assert!(matches!(
            repo.schedule(&mut past, today),
            Err(AppError::Validation { .. })
        ));

        // Historiska sessioner lagras via create
        let id = repo.create(&mut past).unwrap();
        assert!(repo.find_by_id(id).unwrap().is_some());
    }

    #[test]
    fn test_duplicate_player_assignment_rejected() {
        let db = setup_db();
        let repo = db.sessions();
        let location_id = testutil::location(&db, "Centralhallen");
        let coach_id = testutil::personnel(&db, "coach");
        let member_id = testutil::member(&db, "alva", location_id);

        let session_id = testutil::session(&db, "2024-05-01", SessionType::Game);
        let team_id = testutil::team(&db, session_id, 1, location_id, coach_id, None);

        testutil::assign(&db, team_id, member_id, Position::Setter);

        // Samma (lag, medlem) en andra gång avvisas, även med annan position
        let mut dup = PlayerAssignment::new(team_id, member_id, Position::Libero);
        assert!(matches!(
            repo.assign_player(&mut dup),
            Err(AppError::AlreadyExists(_))
        ));

        // Samma medlem i ett annat lag går bra
        let other_team = testutil::team(&db, session_id, 2, location_id, coach_id, None);
        let mut ok = PlayerAssignment::new(other_team, member_id, Position::Setter);
        assert!(repo.assign_player(&mut ok).is_ok());
    }

    #[test]
    fn test_session_delete_cascades_teams_and_assignments() {
        let db = setup_db();
        let repo = db.sessions();
        let location_id = testutil::location(&db, "Centralhallen");
        let coach_id = testutil::personnel(&db, "coach");
        let member_id = testutil::member(&db, "bert", location_id);

        let session_id = testutil::session(&db, "2024-05-01", SessionType::Training);
        let team_id = testutil::team(&db, session_id, 1, location_id, coach_id, None);
        testutil::assign(&db, team_id, member_id, Position::MiddleBlocker);

        repo.delete(session_id).unwrap();

        assert!(repo.find_team(team_id).unwrap().is_none());
        assert!(repo.players_of_team(team_id).unwrap().is_empty());
    }

    #[test]
    fn test_set_score() {
        let db = setup_db();
        let repo = db.sessions();
        let location_id = testutil::location(&db, "Centralhallen");
        let coach_id = testutil::personnel(&db, "coach");

        let session_id = testutil::session(&db, "2024-05-01", SessionType::Game);
        let team_id = testutil::team(&db, session_id, 1, location_id, coach_id, None);

        repo.set_score(team_id, 25).unwrap();
        assert_eq!(repo.find_team(team_id).unwrap().unwrap().score, Some(25));

        assert!(matches!(
            repo.set_score(team_id, -3),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_players_of_team_view() {
        let db = setup_db();
        let repo = db.sessions();
        let location_id = testutil::location(&db, "Centralhallen");
        let coach_id = testutil::personnel(&db, "coach");
        let member_id = testutil::member(&db, "cilla", location_id);

        let session_id = testutil::session(&db, "2024-05-01", SessionType::Game);
        let team_id = testutil::team(&db, session_id, 1, location_id, coach_id, None);
        testutil::assign(&db, team_id, member_id, Position::OutsideHitter);

        let players = repo.players_of_team(team_id).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].member_name, "cilla Testsson");
        assert_eq!(players[0].position, Position::OutsideHitter);
    }
}
