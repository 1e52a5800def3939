use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::date::{calculate_age, today};

/// Myndighetsgräns för major/minor-klassificering i detaljvyer
pub const MAJORITY_AGE: i32 = 18;

/// Lägsta tillåtna ålder vid registrering
pub const MINIMUM_JOIN_AGE: i32 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "F" => Self::Female,
            _ => Self::Male,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Male => "Man",
            Self::Female => "Kvinna",
        }
    }
}

/// Klubbmedlem: registrets centrala post
///
/// `minor`-flaggan sätts vid registrering och styr årsavgiften;
/// åldersbaserad klassificering (`is_minor_by_age`) är härledd och
/// används endast för visning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubMember {
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
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub location_id: i64,
    pub active: bool,
    pub minor: bool,
    pub gender: Gender,
    /// Tilldelas vid skapande, ändras aldrig
    pub membership_number: Option<String>,
    pub date_joined: NaiveDate,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ClubMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Ålder i hela fyllda år vid referensdatumet
    pub fn age_at(&self, reference: NaiveDate) -> i32 {
        calculate_age(self.birthdate, reference)
    }

    pub fn age(&self) -> i32 {
        self.age_at(today())
    }

    /// Åldersbaserad klassificering (visning): den lagrade
    /// `minor`-flaggan är auktoritativ för avgifter
    pub fn is_minor_by_age(&self, reference: NaiveDate) -> bool {
        self.age_at(reference) < MAJORITY_AGE
    }

    /// Validera posten mot ett givet dagens-datum.
    /// Körs i lagringsvägen så att regeln håller oavsett ingång.
    pub fn validate_at(&self, reference: NaiveDate) -> Result<(), MemberValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(MemberValidationError::EmptyFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(MemberValidationError::EmptyLastName);
        }
        if self.ssn.trim().is_empty() {
            return Err(MemberValidationError::EmptySsn);
        }
        if self.medicare_number.trim().is_empty() {
            return Err(MemberValidationError::EmptyMedicareNumber);
        }
        if self.email.trim().is_empty() {
            return Err(MemberValidationError::EmptyEmail);
        }
        if self.birthdate > reference {
            return Err(MemberValidationError::BirthdateInFuture);
        }
        if self.age_at(reference) < MINIMUM_JOIN_AGE {
            return Err(MemberValidationError::BelowMinimumAge);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), MemberValidationError> {
        self.validate_at(today())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MemberValidationError {
    #[error("Förnamn får inte vara tomt")]
    EmptyFirstName,
    #[error("Efternamn får inte vara tomt")]
    EmptyLastName,
    #[error("Personnummer får inte vara tomt")]
    EmptySsn,
    #[error("Sjukförsäkringsnummer får inte vara tomt")]
    EmptyMedicareNumber,
    #[error("E-postadress får inte vara tom")]
    EmptyEmail,
    #[error("Födelsedatum kan inte ligga i framtiden")]
    BirthdateInFuture,
    #[error("Klubbmedlem måste vara minst 11 år")]
    BelowMinimumAge,
}

impl MemberValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyFirstName => "first_name",
            Self::EmptyLastName => "last_name",
            Self::EmptySsn => "ssn",
            Self::EmptyMedicareNumber => "medicare_number",
            Self::EmptyEmail => "email",
            Self::BirthdateInFuture | Self::BelowMinimumAge => "birthdate",
        }
    }
}

#[cfg(test)]
pub(crate) fn test_member(
    name: &str,
    birthdate: NaiveDate,
    location_id: i64,
) -> ClubMember {
    ClubMember {
        id: None,
        first_name: name.to_string(),
        last_name: "Testsson".to_string(),
        birthdate,
        ssn: format!("ssn-{}", name),
        medicare_number: format!("med-{}", name),
        email: format!("{}@example.com", name),
        phone: "514-555-0000".to_string(),
        address: "1 Testgatan".to_string(),
        city: "Montreal".to_string(),
        province: "Quebec".to_string(),
        postal_code: "H1A 1A1".to_string(),
        height_cm: Some(175),
        weight_kg: Some(70),
        location_id,
        active: true,
        minor: false,
        gender: Gender::Male,
        membership_number: None,
        date_joined: birthdate
            .checked_add_days(chrono::Days::new(365 * 12))
            .unwrap_or(birthdate),
        created_at: None,
        updated_at: None,
    }
}
