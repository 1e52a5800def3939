use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::member::Gender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionType {
    Training,
    Game,
}

impl SessionType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Game => "game",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "game" => Self::Game,
            _ => Self::Training,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Training => "Träning",
            Self::Game => "Match",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Scheduled,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Scheduled => "Planerad",
            Self::Completed => "Genomförd",
            Self::Cancelled => "Inställd",
        }
    }
}

/// Spelposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Setter,
    Libero,
    OutsideHitter,
    OppositeHitter,
    MiddleBlocker,
    DefensiveSpecialist,
}

impl Position {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Setter => "Setter",
            Self::Libero => "Libero",
            Self::OutsideHitter => "Outside Hitter",
            Self::OppositeHitter => "Opposite Hitter",
            Self::MiddleBlocker => "Middle Blocker",
            Self::DefensiveSpecialist => "Defensive Specialist",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Setter" => Some(Self::Setter),
            "Libero" => Some(Self::Libero),
            "Outside Hitter" => Some(Self::OutsideHitter),
            "Opposite Hitter" => Some(Self::OppositeHitter),
            "Middle Blocker" => Some(Self::MiddleBlocker),
            "Defensive Specialist" => Some(Self::DefensiveSpecialist),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Setter,
            Self::Libero,
            Self::OutsideHitter,
            Self::OppositeHitter,
            Self::MiddleBlocker,
            Self::DefensiveSpecialist,
        ]
    }
}

/// De fyra nyckelpositioner som allround-rapporten kräver i matchspel
pub const KEY_GAME_POSITIONS: [Position; 4] = [
    Position::Setter,
    Position::Libero,
    Position::OutsideHitter,
    Position::OppositeHitter,
];

/// Schemalagd aktivitet (träning eller match)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Option<i64>,
    pub session_date: NaiveDate,
    pub session_time: NaiveTime,
    pub session_type: SessionType,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub status: SessionStatus,
    pub created_at: Option<String>,
}

impl Session {
    pub fn new(session_date: NaiveDate, session_time: NaiveTime, session_type: SessionType) -> Self {
        Self {
            id: None,
            session_date,
            session_time,
            session_type,
            address: String::new(),
            city: String::new(),
            province: String::new(),
            postal_code: String::new(),
            status: SessionStatus::Scheduled,
            created_at: None,
        }
    }

    pub fn start_datetime(&self) -> NaiveDateTime {
        self.session_date.and_time(self.session_time)
    }

    /// Schemaläggningsregel: nya sessioner får inte läggas bakåt i tiden.
    /// Gäller endast inmatningsvägen: lagret tar emot historiska
    /// sessioner (spelade matcher med resultat).
    pub fn validate_for_scheduling(&self, today: NaiveDate) -> Result<(), SessionValidationError> {
        if self.session_date < today {
            return Err(SessionValidationError::DateInPast);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionValidationError {
    #[error("Sessionsdatum kan inte ligga i det förflutna")]
    DateInPast,
}

impl SessionValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::DateInPast => "session_date",
        }
    }
}

/// Laguppställning för en session: ett lag per rad,
/// en session kan ha flera lag (hemma/borta)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTeam {
    pub id: Option<i64>,
    pub session_id: i64,
    pub team_number: i32,
    pub team_name: String,
    pub location_id: i64,
    pub head_coach_id: i64,
    pub gender: Gender,
    pub score: Option<i32>,
    pub created_at: Option<String>,
}

impl SessionTeam {
    pub fn validate(&self) -> Result<(), TeamValidationError> {
        if self.team_name.trim().is_empty() {
            return Err(TeamValidationError::EmptyTeamName);
        }
        if let Some(score) = self.score {
            if score < 0 {
                return Err(TeamValidationError::NegativeScore);
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TeamValidationError {
    #[error("Lagnamn får inte vara tomt")]
    EmptyTeamName,
    #[error("Resultat kan inte vara negativt")]
    NegativeScore,
}

impl TeamValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTeamName => "team_name",
            Self::NegativeScore => "score",
        }
    }
}

/// Koppling medlem -> laguppställning med position,
/// unik per (medlem, lag)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAssignment {
    pub id: Option<i64>,
    pub team_id: i64,
    pub member_id: i64,
    pub position: Position,
    pub is_starter: bool,
    pub created_at: Option<String>,
}

impl PlayerAssignment {
    pub fn new(team_id: i64, member_id: i64, position: Position) -> Self {
        Self {
            id: None,
            team_id,
            member_id,
            position,
            is_starter: false,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_roundtrip() {
        for p in Position::all() {
            assert_eq!(Position::from_db_str(p.as_db_str()), Some(*p));
        }
        assert_eq!(Position::from_db_str("Goalkeeper"), None);
    }

    #[test]
    fn test_scheduling_rejects_past() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let time = NaiveTime::from_hms_opt(18, 0, 0).unwrap();

        let past = Session::new(
            NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
            time,
            SessionType::Training,
        );
        assert!(past.validate_for_scheduling(today).is_err());

        let today_session = Session::new(today, time, SessionType::Game);
        assert!(today_session.validate_for_scheduling(today).is_ok());
    }

    #[test]
    fn test_start_datetime() {
        let session = Session::new(
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            SessionType::Game,
        );
        assert_eq!(
            session.start_datetime().to_string(),
            "2024-06-15 18:30:00"
        );
    }

    #[test]
    fn test_team_validation() {
        let mut team = SessionTeam {
            id: None,
            session_id: 1,
            team_number: 1,
            team_name: "Seniorlaget".into(),
            location_id: 1,
            head_coach_id: 1,
            gender: Gender::Male,
            score: Some(25),
            created_at: None,
        };
        assert!(team.validate().is_ok());

        team.score = Some(-1);
        assert!(matches!(
            team.validate(),
            Err(TeamValidationError::NegativeScore)
        ));
    }
}
