//! Frågorna bakom rapporterna: fasta aggregeringar och joinar
//! över schemat. Alla är läsande och tål tomma resultat.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::ToSql;

use crate::db::Database;
use crate::models::{Position, RelationType, SessionType, KEY_GAME_POSITIONS};
use crate::utils::date::{calculate_age, format_datetime};
use crate::utils::error::AppResult;

use super::rows::*;

pub struct ReportService<'a> {
    db: &'a Database,
}

impl<'a> ReportService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Per anläggning: nuvarande klubbchef (tilldelning utan slutdatum),
    /// antal minderåriga/vuxna medlemmar och antal laguppställningar.
    /// Ordnad efter provins, sedan stad.
    pub fn location_summary(&self) -> AppResult<Vec<LocationSummaryRow>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT l.name, l.address, l.city, l.province, l.postal_code, l.phone,
                        l.web_address, l.type, l.capacity,
                        (SELECT p.first_name || ' ' || p.last_name
                         FROM personnel_assignments pa
                         JOIN personnel p ON pa.personnel_id = p.id
                         WHERE pa.location_id = l.id
                           AND pa.role = 'general manager'
                           AND pa.end_date IS NULL) AS general_manager,
                        COUNT(DISTINCT CASE WHEN cm.minor = 1 THEN cm.id END) AS minor_members,
                        COUNT(DISTINCT CASE WHEN cm.minor = 0 THEN cm.id END) AS major_members,
                        (SELECT COUNT(*) FROM session_teams st
                         WHERE st.location_id = l.id) AS team_count
                 FROM locations l
                 LEFT JOIN club_members cm ON cm.location_id = l.id
                 GROUP BY l.id
                 ORDER BY l.province, l.city",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(LocationSummaryRow {
                        location_name: row.get(0)?,
                        address: row.get(1)?,
                        city: row.get(2)?,
                        province: row.get(3)?,
                        postal_code: row.get(4)?,
                        phone: row.get(5)?,
                        web_address: row.get(6)?,
                        location_type: row.get(7)?,
                        capacity: row.get(8)?,
                        general_manager: row.get(9)?,
                        minor_members: row.get(10)?,
                        major_members: row.get(11)?,
                        team_count: row.get(12)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(rows)
        })
    }

    /// Alla minderåriga under en vårdnadshavare, med eventuell
    /// sekundär nödkontakt: vänsterjoin så att minderåriga utan
    /// sekundär kontakt ändå visas
    pub fn guardian_dependents(&self, family_member_id: i64) -> AppResult<Vec<GuardianDependentRow>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT cm.id, cm.first_name, cm.last_name, cm.birthdate, cm.ssn,
                        cm.medicare_number, cm.phone, fr.relation_type,
                        sfm.first_name, sfm.last_name, sfm.phone, sfm.relation_type
                 FROM family_relationships fr
                 JOIN club_members cm ON fr.minor_id = cm.id
                 LEFT JOIN secondary_family_members sfm ON sfm.minor_id = cm.id
                 WHERE fr.major_id = ?
                 ORDER BY cm.last_name, cm.first_name",
            )?;

            let rows = stmt
                .query_map([family_member_id], |row| {
                    let first: String = row.get(1)?;
                    let last: String = row.get(2)?;
                    let secondary_first: Option<String> = row.get(8)?;
                    let secondary_last: Option<String> = row.get(9)?;
                    let secondary_name = secondary_first.map(|f| {
                        match secondary_last {
                            Some(l) => format!("{} {}", f, l),
                            None => f,
                        }
                    });

                    Ok(GuardianDependentRow {
                        minor_id: row.get(0)?,
                        minor_name: format!("{} {}", first, last),
                        birthdate: row.get(3)?,
                        ssn: row.get(4)?,
                        medicare_number: row.get(5)?,
                        phone: row.get(6)?,
                        relation_type: RelationType::from_db_str(&row.get::<_, String>(7)?),
                        secondary_name,
                        secondary_phone: row.get(10)?,
                        secondary_relation: row
                            .get::<_, Option<String>>(11)?
                            .map(|s| RelationType::from_db_str(&s)),
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(rows)
        })
    }

    /// Sessioner på en anläggning inom ett inklusivt tidsfönster,
    /// med tränare, lag och spelare, i kronologisk ordning
    pub fn sessions_at_location(
        &self,
        location_id: i64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> AppResult<Vec<SessionScheduleRow>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.first_name, p.last_name, s.session_date, s.session_time,
                        s.session_type, st.team_name, st.score,
                        cm.first_name, cm.last_name, pa.position
                 FROM session_teams st
                 JOIN sessions s ON st.session_id = s.id
                 JOIN personnel p ON st.head_coach_id = p.id
                 JOIN player_assignments pa ON pa.team_id = st.id
                 JOIN club_members cm ON pa.member_id = cm.id
                 WHERE st.location_id = ?1
                   AND datetime(s.session_date || ' ' || s.session_time) BETWEEN ?2 AND ?3
                 ORDER BY s.session_date, s.session_time",
            )?;

            let params: &[&dyn ToSql] = &[
                &location_id,
                &format_datetime(from),
                &format_datetime(to),
            ];

            let rows = stmt
                .query_map(params, |row| {
                    let coach_first: String = row.get(0)?;
                    let coach_last: String = row.get(1)?;
                    let date: NaiveDate = row.get(2)?;
                    let time: chrono::NaiveTime = row.get(3)?;
                    let player_first: String = row.get(7)?;
                    let player_last: String = row.get(8)?;

                    Ok(SessionScheduleRow {
                        coach_name: format!("{} {}", coach_first, coach_last),
                        start_time: date.and_time(time),
                        session_type: SessionType::from_db_str(&row.get::<_, String>(4)?),
                        team_name: row.get(5)?,
                        score: row.get(6)?,
                        player_name: format!("{} {}", player_first, player_last),
                        position: Position::from_db_str(&row.get::<_, String>(9)?)
                            .unwrap_or(Position::Setter),
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(rows)
        })
    }

    /// Anläggningar med minst fyra matcher i fönstret: tränings- och
    /// matchvolym samt antal spelartilldelningar per kategori, ordnat
    /// efter antal matcher fallande
    pub fn busy_game_locations(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> AppResult<Vec<GameLocationActivityRow>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT l.name,
                        SUM(CASE WHEN s.session_type = 'training' THEN 1 ELSE 0 END) AS training_sessions,
                        SUM(CASE WHEN s.session_type = 'training' THEN
                            (SELECT COUNT(*) FROM player_assignments pa WHERE pa.team_id = st.id)
                            ELSE 0 END) AS training_players,
                        SUM(CASE WHEN s.session_type = 'game' THEN 1 ELSE 0 END) AS game_sessions,
                        SUM(CASE WHEN s.session_type = 'game' THEN
                            (SELECT COUNT(*) FROM player_assignments pa WHERE pa.team_id = st.id)
                            ELSE 0 END) AS game_players
                 FROM session_teams st
                 JOIN sessions s ON st.session_id = s.id
                 JOIN locations l ON st.location_id = l.id
                 WHERE datetime(s.session_date || ' ' || s.session_time) BETWEEN ?1 AND ?2
                 GROUP BY l.id, l.name
                 HAVING game_sessions >= 4
                 ORDER BY game_sessions DESC",
            )?;

            let params: &[&dyn ToSql] = &[&format_datetime(from), &format_datetime(to)];

            let rows = stmt
                .query_map(params, |row| {
                    Ok(GameLocationActivityRow {
                        location_name: row.get(0)?,
                        training_sessions: row.get(1)?,
                        training_players: row.get(2)?,
                        game_sessions: row.get(3)?,
                        game_players: row.get(4)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(rows)
        })
    }

    /// Aktiva medlemmar som aldrig tagits ut i något lag -
    /// vänsterjoin filtrerad på att tilldelningssidan är NULL
    pub fn never_assigned(&self, reference: NaiveDate) -> AppResult<Vec<MemberContactRow>> {
        self.member_contacts(
            "SELECT cm.id, cm.first_name, cm.last_name, cm.birthdate, cm.phone, cm.email, l.name
             FROM club_members cm
             JOIN locations l ON cm.location_id = l.id
             LEFT JOIN player_assignments pa ON cm.id = pa.member_id
             WHERE cm.active = 1 AND pa.member_id IS NULL
             ORDER BY l.name, cm.birthdate DESC",
            &[],
            reference,
        )
    }

    /// Aktiva vuxna medlemmar med anslutningsdatum (första betalning),
    /// en rad per medlem, ordnat efter anläggning och ålder
    pub fn active_adults(&self, reference: NaiveDate) -> AppResult<Vec<ActiveAdultRow>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT cm.id, cm.first_name, cm.last_name, MIN(p.payment_date),
                        cm.birthdate, cm.phone, cm.email, l.name
                 FROM club_members cm
                 JOIN payments p ON cm.id = p.member_id
                 JOIN locations l ON cm.location_id = l.id
                 WHERE cm.active = 1 AND cm.minor = 0
                 GROUP BY cm.id, cm.first_name, cm.last_name, cm.birthdate,
                          cm.phone, cm.email, l.name
                 ORDER BY l.name, cm.birthdate DESC",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    let first: String = row.get(1)?;
                    let last: String = row.get(2)?;
                    let birthdate: NaiveDate = row.get(4)?;

                    Ok(ActiveAdultRow {
                        member_id: row.get(0)?,
                        name: format!("{} {}", first, last),
                        date_of_joining: row.get(3)?,
                        age: calculate_age(birthdate, reference),
                        phone: row.get(5)?,
                        email: row.get(6)?,
                        location_name: row.get(7)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(rows)
        })
    }

    /// Aktiva medlemmar som spelat den givna positionen och aldrig
    /// någon annan: i mängden för positionen och utanför mängden för
    /// alla övriga positioner
    pub fn single_position(
        &self,
        position: Position,
        reference: NaiveDate,
    ) -> AppResult<Vec<MemberContactRow>> {
        self.member_contacts(
            "SELECT cm.id, cm.first_name, cm.last_name, cm.birthdate, cm.phone, cm.email, l.name
             FROM club_members cm
             JOIN locations l ON cm.location_id = l.id
             WHERE cm.active = 1
               AND cm.id IN (
                   SELECT DISTINCT pa.member_id
                   FROM player_assignments pa
                   WHERE pa.position = ?1)
               AND cm.id NOT IN (
                   SELECT DISTINCT pa.member_id
                   FROM player_assignments pa
                   WHERE pa.position != ?1)
             ORDER BY l.name, cm.id",
            &[&position.as_db_str()],
            reference,
        )
    }

    /// Aktiva medlemmar som i matchspel har spelat samtliga fyra
    /// nyckelpositioner
    pub fn all_round_players(&self, reference: NaiveDate) -> AppResult<Vec<MemberContactRow>> {
        let positions = KEY_GAME_POSITIONS.map(|p| p.as_db_str());
        let params: Vec<&dyn ToSql> = positions.iter().map(|p| p as &dyn ToSql).collect();

        self.member_contacts(
            "SELECT cm.id, cm.first_name, cm.last_name, cm.birthdate, cm.phone, cm.email, l.name
             FROM club_members cm
             JOIN locations l ON cm.location_id = l.id
             WHERE cm.active = 1
               AND cm.id IN (
                   SELECT pa.member_id
                   FROM player_assignments pa
                   JOIN session_teams st ON pa.team_id = st.id
                   JOIN sessions s ON st.session_id = s.id
                   WHERE s.session_type = 'game'
                     AND pa.position IN (?1, ?2, ?3, ?4)
                   GROUP BY pa.member_id
                   HAVING COUNT(DISTINCT pa.position) = 4)
             ORDER BY l.name, cm.id",
            &params,
            reference,
        )
    }

    /// Familjekontakter som också är personal och huvudtränare för lag
    /// ur anläggningens aktiva medlemskår, matchade på personnummer
    pub fn coach_relatives(&self, location_id: i64) -> AppResult<Vec<CoachRelativeRow>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT fm.first_name, fm.last_name, fm.phone
                 FROM family_members fm
                 JOIN personnel p ON p.ssn = fm.ssn
                 JOIN session_teams st ON st.head_coach_id = p.id
                 JOIN club_members cm ON cm.location_id = st.location_id AND cm.active = 1
                 WHERE cm.location_id = ?
                 ORDER BY fm.last_name, fm.first_name",
            )?;

            let rows = stmt
                .query_map([location_id], |row| {
                    let first: String = row.get(0)?;
                    let last: String = row.get(1)?;
                    Ok(CoachRelativeRow {
                        name: format!("{} {}", first, last),
                        phone: row.get(2)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(rows)
        })
    }

    /// Aktiva medlemmar med minst en match som aldrig stått på den
    /// förlorande sidan i en resultatjämförelse mellan två lag i
    /// samma session
    pub fn undefeated_players(&self, reference: NaiveDate) -> AppResult<Vec<MemberContactRow>> {
        self.member_contacts(
            "SELECT cm.id, cm.first_name, cm.last_name, cm.birthdate, cm.phone, cm.email, l.name
             FROM club_members cm
             JOIN locations l ON cm.location_id = l.id
             WHERE cm.active = 1
               AND cm.id IN (
                   SELECT DISTINCT pa.member_id
                   FROM player_assignments pa
                   JOIN session_teams st ON pa.team_id = st.id
                   JOIN sessions s ON st.session_id = s.id
                   WHERE s.session_type = 'game')
               AND cm.id NOT IN (
                   SELECT DISTINCT pa.member_id
                   FROM player_assignments pa
                   JOIN session_teams st1 ON pa.team_id = st1.id
                   JOIN session_teams st2 ON st1.session_id = st2.session_id AND st1.id != st2.id
                   JOIN sessions s ON st1.session_id = s.id
                   WHERE s.session_type = 'game'
                     AND st1.score < st2.score)
             ORDER BY l.name, cm.id",
            &[],
            reference,
        )
    }

    /// Inaktivitetsregeln (flaggad inaktiv, ansluten för minst 730
    /// dagar sedan, ingen betalning för föregående år) renderad med
    /// anläggningsnamn
    pub fn inactive_members(&self, reference: NaiveDate) -> AppResult<Vec<InactiveMemberRow>> {
        let members = self.db.members().find_inactive(reference)?;

        let mut rows = Vec::with_capacity(members.len());
        for member in members {
            let location_name = self
                .db
                .locations()
                .find_by_id(member.location_id)?
                .map(|l| l.name)
                .unwrap_or_default();

            rows.push(InactiveMemberRow {
                member_id: member.id.unwrap_or(0),
                name: member.full_name(),
                membership_number: member.membership_number.clone().unwrap_or_default(),
                email: member.email.clone(),
                phone: member.phone.clone(),
                date_joined: member.date_joined,
                location_name,
            });
        }

        Ok(rows)
    }

    /// Gemensam radform för medlemsrapporterna: id, namn, härledd
    /// ålder, kontaktuppgifter och anläggning
    fn member_contacts(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
        reference: NaiveDate,
    ) -> AppResult<Vec<MemberContactRow>> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(sql)?;

            let rows = stmt
                .query_map(params, |row| {
                    let first: String = row.get(1)?;
                    let last: String = row.get(2)?;
                    let birthdate: NaiveDate = row.get(3)?;

                    Ok(MemberContactRow {
                        member_id: row.get(0)?,
                        name: format!("{} {}", first, last),
                        age: calculate_age(birthdate, reference),
                        phone: row.get(4)?,
                        email: row.get(5)?,
                        location_name: row.get(6)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(rows)
        })
    }
}
