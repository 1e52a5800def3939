//! Radtyper för rapporterna: en typ per rapport, med kolumnnamn
//! och strängceller för tabellrendering

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{Position, RelationType, SessionType};
use crate::utils::date::{format_date, format_datetime};

use super::ReportRow;

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Anläggningsöversikt: nuvarande klubbchef och medlems-/lagantal
#[derive(Debug, Clone, Serialize)]
pub struct LocationSummaryRow {
    pub location_name: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub phone: String,
    pub web_address: String,
    pub location_type: String,
    pub capacity: i64,
    pub general_manager: Option<String>,
    pub minor_members: i64,
    pub major_members: i64,
    pub team_count: i64,
}

impl ReportRow for LocationSummaryRow {
    fn columns() -> &'static [&'static str] {
        &[
            "name", "address", "city", "province", "postal_code", "phone", "web_address",
            "type", "capacity", "general_manager", "minor_members", "major_members", "teams",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.location_name.clone(),
            self.address.clone(),
            self.city.clone(),
            self.province.clone(),
            self.postal_code.clone(),
            self.phone.clone(),
            self.web_address.clone(),
            self.location_type.clone(),
            self.capacity.to_string(),
            opt(&self.general_manager),
            self.minor_members.to_string(),
            self.major_members.to_string(),
            self.team_count.to_string(),
        ]
    }
}

/// En minderårig under en vårdnadshavare, med eventuell sekundär
/// nödkontakt (vänsterjoin: minderåriga utan kontakt visas ändå)
#[derive(Debug, Clone, Serialize)]
pub struct GuardianDependentRow {
    pub minor_id: i64,
    pub minor_name: String,
    pub birthdate: NaiveDate,
    pub ssn: String,
    pub medicare_number: String,
    pub phone: String,
    pub relation_type: RelationType,
    pub secondary_name: Option<String>,
    pub secondary_phone: Option<String>,
    pub secondary_relation: Option<RelationType>,
}

impl ReportRow for GuardianDependentRow {
    fn columns() -> &'static [&'static str] {
        &[
            "member_id", "name", "birthdate", "ssn", "medicare_number", "phone",
            "relation", "secondary_name", "secondary_phone", "secondary_relation",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.minor_id.to_string(),
            self.minor_name.clone(),
            format_date(self.birthdate),
            self.ssn.clone(),
            self.medicare_number.clone(),
            self.phone.clone(),
            self.relation_type.as_db_str().to_string(),
            opt(&self.secondary_name),
            opt(&self.secondary_phone),
            self.secondary_relation
                .map(|r| r.as_db_str().to_string())
                .unwrap_or_default(),
        ]
    }
}

/// En spelares medverkan i en session inom ett tidsfönster
#[derive(Debug, Clone, Serialize)]
pub struct SessionScheduleRow {
    pub coach_name: String,
    pub start_time: NaiveDateTime,
    pub session_type: SessionType,
    pub team_name: String,
    pub score: Option<i32>,
    pub player_name: String,
    pub position: Position,
}

impl ReportRow for SessionScheduleRow {
    fn columns() -> &'static [&'static str] {
        &[
            "coach", "start_time", "type", "team", "score", "player", "position",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.coach_name.clone(),
            format_datetime(self.start_time),
            self.session_type.as_db_str().to_string(),
            self.team_name.clone(),
            self.score.map(|s| s.to_string()).unwrap_or_default(),
            self.player_name.clone(),
            self.position.as_db_str().to_string(),
        ]
    }
}

/// Tränings- och matchvolym per anläggning inom ett tidsfönster
#[derive(Debug, Clone, Serialize)]
pub struct GameLocationActivityRow {
    pub location_name: String,
    pub training_sessions: i64,
    pub training_players: i64,
    pub game_sessions: i64,
    pub game_players: i64,
}

impl ReportRow for GameLocationActivityRow {
    fn columns() -> &'static [&'static str] {
        &[
            "name", "training_sessions", "training_players", "game_sessions", "game_players",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.location_name.clone(),
            self.training_sessions.to_string(),
            self.training_players.to_string(),
            self.game_sessions.to_string(),
            self.game_players.to_string(),
        ]
    }
}

/// Medlem med kontaktuppgifter och härledd ålder: delas av flera
/// medlemsrapporter
#[derive(Debug, Clone, Serialize)]
pub struct MemberContactRow {
    pub member_id: i64,
    pub name: String,
    pub age: i32,
    pub phone: String,
    pub email: String,
    pub location_name: String,
}

impl ReportRow for MemberContactRow {
    fn columns() -> &'static [&'static str] {
        &["member_id", "name", "age", "phone", "email", "location"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.member_id.to_string(),
            self.name.clone(),
            self.age.to_string(),
            self.phone.clone(),
            self.email.clone(),
            self.location_name.clone(),
        ]
    }
}

/// Aktiv vuxen medlem med anslutningsdatum (första betalningen)
#[derive(Debug, Clone, Serialize)]
pub struct ActiveAdultRow {
    pub member_id: i64,
    pub name: String,
    pub date_of_joining: NaiveDate,
    pub age: i32,
    pub phone: String,
    pub email: String,
    pub location_name: String,
}

impl ReportRow for ActiveAdultRow {
    fn columns() -> &'static [&'static str] {
        &[
            "member_id", "name", "date_of_joining", "age", "phone", "email", "location",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.member_id.to_string(),
            self.name.clone(),
            format_date(self.date_of_joining),
            self.age.to_string(),
            self.phone.clone(),
            self.email.clone(),
            self.location_name.clone(),
        ]
    }
}

/// Familjekontakt som också är huvudtränare (matchad på personnummer)
#[derive(Debug, Clone, Serialize)]
pub struct CoachRelativeRow {
    pub name: String,
    pub phone: String,
}

impl ReportRow for CoachRelativeRow {
    fn columns() -> &'static [&'static str] {
        &["name", "phone"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), self.phone.clone()]
    }
}

/// Inaktiv medlem enligt inaktivitetsregeln
#[derive(Debug, Clone, Serialize)]
pub struct InactiveMemberRow {
    pub member_id: i64,
    pub name: String,
    pub membership_number: String,
    pub email: String,
    pub phone: String,
    pub date_joined: NaiveDate,
    pub location_name: String,
}

impl ReportRow for InactiveMemberRow {
    fn columns() -> &'static [&'static str] {
        &[
            "member_id", "name", "membership_number", "email", "phone", "date_joined", "location",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.member_id.to_string(),
            self.name.clone(),
            self.membership_number.clone(),
            self.email.clone(),
            self.phone.clone(),
            format_date(self.date_joined),
            self.location_name.clone(),
        ]
    }
}
