use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Roll i en personaltilldelning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonnelRole {
    GeneralManager,
    DeputyManager,
    Coach,
    AssistantCoach,
    Treasurer,
    Secretary,
}

impl PersonnelRole {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::GeneralManager => "general manager",
            Self::DeputyManager => "deputy manager",
            Self::Coach => "coach",
            Self::AssistantCoach => "assistant coach",
            Self::Treasurer => "treasurer",
            Self::Secretary => "secretary",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "general manager" => Some(Self::GeneralManager),
            "deputy manager" => Some(Self::DeputyManager),
            "coach" => Some(Self::Coach),
            "assistant coach" => Some(Self::AssistantCoach),
            "treasurer" => Some(Self::Treasurer),
            "secretary" => Some(Self::Secretary),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::GeneralManager => "Klubbchef",
            Self::DeputyManager => "Biträdande klubbchef",
            Self::Coach => "Tränare",
            Self::AssistantCoach => "Assisterande tränare",
            Self::Treasurer => "Kassör",
            Self::Secretary => "Sekreterare",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::GeneralManager,
            Self::DeputyManager,
            Self::Coach,
            Self::AssistantCoach,
            Self::Treasurer,
            Self::Secretary,
        ]
    }
}

/// Anställningsform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mandate {
    Salaried,
    Volunteer,
}

impl Mandate {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Salaried => "salaried",
            Self::Volunteer => "volunteer",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "volunteer" => Self::Volunteer,
            _ => Self::Salaried,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Salaried => "Anställd",
            Self::Volunteer => "Volontär",
        }
    }
}

/// Personal (tränare, chefer, kassörer m.fl.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personnel {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub ssn: String,
    pub medicare_number: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Personnel {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn validate_at(&self, reference: NaiveDate) -> Result<(), PersonnelValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(PersonnelValidationError::EmptyFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(PersonnelValidationError::EmptyLastName);
        }
        if self.birthdate > reference {
            return Err(PersonnelValidationError::BirthdateInFuture);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), PersonnelValidationError> {
        self.validate_at(crate::utils::date::today())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersonnelValidationError {
    #[error("Förnamn får inte vara tomt")]
    EmptyFirstName,
    #[error("Efternamn får inte vara tomt")]
    EmptyLastName,
    #[error("Födelsedatum kan inte ligga i framtiden")]
    BirthdateInFuture,
}

impl PersonnelValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyFirstName => "first_name",
            Self::EmptyLastName => "last_name",
            Self::BirthdateInFuture => "birthdate",
        }
    }
}

/// Tidsbegränsad roll på en anläggning: `end_date = None` betyder pågående
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonnelAssignment {
    pub id: Option<i64>,
    pub personnel_id: i64,
    pub location_id: i64,
    pub role: PersonnelRole,
    pub mandate: Mandate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: Option<String>,
}

impl PersonnelAssignment {
    pub fn new(
        personnel_id: i64,
        location_id: i64,
        role: PersonnelRole,
        mandate: Mandate,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            personnel_id,
            location_id,
            role,
            mandate,
            start_date,
            end_date: None,
            created_at: None,
        }
    }

    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }

    pub fn validate(&self) -> Result<(), AssignmentValidationError> {
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(AssignmentValidationError::EndBeforeStart);
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssignmentValidationError {
    #[error("Slutdatum kan inte vara före startdatum")]
    EndBeforeStart,
}

impl AssignmentValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::EndBeforeStart => "end_date",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in PersonnelRole::all() {
            assert_eq!(PersonnelRole::from_db_str(role.as_db_str()), Some(*role));
        }
        assert_eq!(PersonnelRole::from_db_str("janitor"), None);
    }

    #[test]
    fn test_assignment_dates() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let mut assignment = PersonnelAssignment::new(
            1,
            1,
            PersonnelRole::Coach,
            Mandate::Salaried,
            start,
        );
        assert!(assignment.is_current());
        assert!(assignment.validate().is_ok());

        assignment.end_date = NaiveDate::from_ymd_opt(2022, 12, 31);
        assert!(matches!(
            assignment.validate(),
            Err(AssignmentValidationError::EndBeforeStart)
        ));
    }
}
