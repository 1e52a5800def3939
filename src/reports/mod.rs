//! Rapporter över klubbregistret
//!
//! Rapporterna identifieras av en typad uppräkning och tar typade
//! parametrar: okända rapportnycklar avvisas vid gränsen i stället
//! för att ge en tom uppslagning. Resultatet är en tabell med
//! namngivna kolumner; tomma resultat är giltiga.

pub mod queries;
pub mod rows;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::db::Database;
use crate::models::Position;
use crate::utils::error::{AppError, AppResult};

pub use queries::ReportService;
pub use rows::*;

/// En rad i en rapport: kolumnnamn och strängceller
pub trait ReportRow {
    fn columns() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

/// Typade rapportnycklar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportKind {
    LocationSummary,
    GuardianDependents,
    SessionsAtLocation,
    BusyGameLocations,
    NeverAssigned,
    ActiveAdults,
    SinglePosition,
    AllRoundPlayers,
    CoachRelatives,
    UndefeatedPlayers,
    InactiveMembers,
}

impl ReportKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::LocationSummary => "location-summary",
            Self::GuardianDependents => "guardian-dependents",
            Self::SessionsAtLocation => "sessions-at-location",
            Self::BusyGameLocations => "busy-game-locations",
            Self::NeverAssigned => "never-assigned",
            Self::ActiveAdults => "active-adults",
            Self::SinglePosition => "single-position",
            Self::AllRoundPlayers => "all-round-players",
            Self::CoachRelatives => "coach-relatives",
            Self::UndefeatedPlayers => "undefeated-players",
            Self::InactiveMembers => "inactive-members",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LocationSummary => "Anläggningsöversikt",
            Self::GuardianDependents => "Vårdnadshavarens minderåriga",
            Self::SessionsAtLocation => "Sessioner på anläggning",
            Self::BusyGameLocations => "Anläggningar med minst fyra matcher",
            Self::NeverAssigned => "Aldrig uttagna medlemmar",
            Self::ActiveAdults => "Aktiva vuxna medlemmar",
            Self::SinglePosition => "Enpositionsspelare",
            Self::AllRoundPlayers => "Allroundspelare",
            Self::CoachRelatives => "Familjekontakter som tränar",
            Self::UndefeatedPlayers => "Obesegrade spelare",
            Self::InactiveMembers => "Inaktiva medlemmar",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::LocationSummary,
            Self::GuardianDependents,
            Self::SessionsAtLocation,
            Self::BusyGameLocations,
            Self::NeverAssigned,
            Self::ActiveAdults,
            Self::SinglePosition,
            Self::AllRoundPlayers,
            Self::CoachRelatives,
            Self::UndefeatedPlayers,
            Self::InactiveMembers,
        ]
    }

    /// Tolka en rapportnyckel. Okända nycklar är ett eget fel,
    /// inte ett tomt resultat.
    pub fn parse(key: &str) -> AppResult<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| AppError::UnknownReport(key.to_string()))
    }
}

/// Typade parametrar per rapport. Referensdatum skickas in explicit
/// så att åldrar och inaktivitetsgränser blir deterministiska.
#[derive(Debug, Clone)]
pub enum ReportRequest {
    LocationSummary,
    GuardianDependents {
        family_member_id: i64,
    },
    SessionsAtLocation {
        location_id: i64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
    BusyGameLocations {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
    NeverAssigned {
        reference: NaiveDate,
    },
    ActiveAdults {
        reference: NaiveDate,
    },
    SinglePosition {
        position: Position,
        reference: NaiveDate,
    },
    AllRoundPlayers {
        reference: NaiveDate,
    },
    CoachRelatives {
        location_id: i64,
    },
    UndefeatedPlayers {
        reference: NaiveDate,
    },
    InactiveMembers {
        reference: NaiveDate,
    },
}

impl ReportRequest {
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::LocationSummary => ReportKind::LocationSummary,
            Self::GuardianDependents { .. } => ReportKind::GuardianDependents,
            Self::SessionsAtLocation { .. } => ReportKind::SessionsAtLocation,
            Self::BusyGameLocations { .. } => ReportKind::BusyGameLocations,
            Self::NeverAssigned { .. } => ReportKind::NeverAssigned,
            Self::ActiveAdults { .. } => ReportKind::ActiveAdults,
            Self::SinglePosition { .. } => ReportKind::SinglePosition,
            Self::AllRoundPlayers { .. } => ReportKind::AllRoundPlayers,
            Self::CoachRelatives { .. } => ReportKind::CoachRelatives,
            Self::UndefeatedPlayers { .. } => ReportKind::UndefeatedPlayers,
            Self::InactiveMembers { .. } => ReportKind::InactiveMembers,
        }
    }
}

/// Rapportresultat: ordnade rader med namngivna kolumner
#[derive(Debug, Clone, Serialize)]
pub struct ReportTable {
    pub kind: ReportKind,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    fn from_rows<R: ReportRow>(kind: ReportKind, rows: &[R]) -> Self {
        Self {
            kind,
            columns: R::columns().to_vec(),
            rows: rows.iter().map(ReportRow::cells).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Kör en rapport och rendera resultatet som tabell
pub fn run(db: &Database, request: &ReportRequest) -> AppResult<ReportTable> {
    let service = ReportService::new(db);
    let kind = request.kind();

    let table = match request {
        ReportRequest::LocationSummary => {
            ReportTable::from_rows(kind, &service.location_summary()?)
        }
        ReportRequest::GuardianDependents { family_member_id } => {
            ReportTable::from_rows(kind, &service.guardian_dependents(*family_member_id)?)
        }
        ReportRequest::SessionsAtLocation { location_id, from, to } => {
            ReportTable::from_rows(kind, &service.sessions_at_location(*location_id, *from, *to)?)
        }
        ReportRequest::BusyGameLocations { from, to } => {
            ReportTable::from_rows(kind, &service.busy_game_locations(*from, *to)?)
        }
        ReportRequest::NeverAssigned { reference } => {
            ReportTable::from_rows(kind, &service.never_assigned(*reference)?)
        }
        ReportRequest::ActiveAdults { reference } => {
            ReportTable::from_rows(kind, &service.active_adults(*reference)?)
        }
        ReportRequest::SinglePosition { position, reference } => {
            ReportTable::from_rows(kind, &service.single_position(*position, *reference)?)
        }
        ReportRequest::AllRoundPlayers { reference } => {
            ReportTable::from_rows(kind, &service.all_round_players(*reference)?)
        }
        ReportRequest::CoachRelatives { location_id } => {
            ReportTable::from_rows(kind, &service.coach_relatives(*location_id)?)
        }
        ReportRequest::UndefeatedPlayers { reference } => {
            ReportTable::from_rows(kind, &service.undefeated_players(*reference)?)
        }
        ReportRequest::InactiveMembers { reference } => {
            ReportTable::from_rows(kind, &service.inactive_members(*reference)?)
        }
    };

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_keys() {
        for kind in ReportKind::all() {
            assert_eq!(ReportKind::parse(kind.key()).unwrap(), *kind);
        }
    }

    #[test]
    fn test_parse_unknown_key_is_rejected() {
        let err = ReportKind::parse("query-42").unwrap_err();
        match err {
            AppError::UnknownReport(key) => assert_eq!(key, "query-42"),
            other => panic!("fel variant: {:?}", other),
        }
    }

    #[test]
    fn test_empty_database_gives_empty_tables() {
        let db = Database::open_in_memory().unwrap();
        let reference = chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        let table = run(&db, &ReportRequest::NeverAssigned { reference }).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns, MemberContactRow::columns());

        let table = run(&db, &ReportRequest::InactiveMembers { reference }).unwrap();
        assert!(table.is_empty());
    }
}
