use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Släktskap mellan vårdnadshavare och minderårig medlem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    Mother,
    Father,
    Grandmother,
    Grandfather,
    Tutor,
    Other,
}

impl RelationType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Mother => "mother",
            Self::Father => "father",
            Self::Grandmother => "grandmother",
            Self::Grandfather => "grandfather",
            Self::Tutor => "tutor",
            Self::Other => "other",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "mother" => Self::Mother,
            "father" => Self::Father,
            "grandmother" => Self::Grandmother,
            "grandfather" => Self::Grandfather,
            "tutor" => Self::Tutor,
            _ => Self::Other,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mother => "Mor",
            Self::Father => "Far",
            Self::Grandmother => "Mormor/Farmor",
            Self::Grandfather => "Morfar/Farfar",
            Self::Tutor => "Förmyndare",
            Self::Other => "Annan",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Mother,
            Self::Father,
            Self::Grandmother,
            Self::Grandfather,
            Self::Tutor,
            Self::Other,
        ]
    }
}

/// Vuxen familjekontakt knuten till en anläggning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyMember {
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
    pub location_id: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl FamilyMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn validate_at(&self, reference: NaiveDate) -> Result<(), FamilyMemberValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(FamilyMemberValidationError::EmptyFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(FamilyMemberValidationError::EmptyLastName);
        }
        if self.birthdate > reference {
            return Err(FamilyMemberValidationError::BirthdateInFuture);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), FamilyMemberValidationError> {
        self.validate_at(crate::utils::date::today())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FamilyMemberValidationError {
    #[error("Förnamn får inte vara tomt")]
    EmptyFirstName,
    #[error("Efternamn får inte vara tomt")]
    EmptyLastName,
    #[error("Födelsedatum kan inte ligga i framtiden")]
    BirthdateInFuture,
}

impl FamilyMemberValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyFirstName => "first_name",
            Self::EmptyLastName => "last_name",
            Self::BirthdateInFuture => "birthdate",
        }
    }
}

/// Sekundär kontakt (nödkontakt) för en minderårig medlem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryFamilyMember {
    pub id: Option<i64>,
    pub primary_family_member_id: i64,
    /// Den minderåriga medlem kontakten gäller
    pub minor_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub relation_type: RelationType,
    pub created_at: Option<String>,
}

impl SecondaryFamilyMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Vårdnadskoppling mellan en minderårig klubbmedlem och en
/// familjekontakt: många-till-många, en kontakt kan ansvara
/// för flera minderåriga
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyRelationship {
    pub id: Option<i64>,
    /// Klubbmedlem (minderårig)
    pub minor_id: i64,
    /// Familjekontakt (vuxen)
    pub major_id: i64,
    pub relation_type: RelationType,
    pub start_date: NaiveDate,
    pub is_primary: bool,
    pub emergency_contact: bool,
    pub created_at: Option<String>,
}

impl FamilyRelationship {
    pub fn new(minor_id: i64, major_id: i64, relation_type: RelationType, start_date: NaiveDate) -> Self {
        Self {
            id: None,
            minor_id,
            major_id,
            relation_type,
            start_date,
            is_primary: false,
            emergency_contact: false,
            created_at: None,
        }
    }
}

/// En vårdnadskoppling från vårdnadshavarens perspektiv (för visning)
#[derive(Debug, Clone, Serialize)]
pub struct MinorAssociationView {
    pub relationship_id: i64,
    pub minor_id: i64,
    pub minor_name: String,
    pub relation_type: RelationType,
    pub is_primary: bool,
    pub emergency_contact: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_type_roundtrip() {
        for t in RelationType::all() {
            assert_eq!(RelationType::from_db_str(t.as_db_str()), *t);
        }
        // Okända värden faller tillbaka till Other
        assert_eq!(RelationType::from_db_str("cousin"), RelationType::Other);
    }

    #[test]
    fn test_family_member_validation() {
        let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let mut fm = FamilyMember {
            id: None,
            first_name: "Lisa".into(),
            last_name: "Parent".into(),
            birthdate: NaiveDate::from_ymd_opt(1982, 7, 25).unwrap(),
            ssn: "666-22-3333".into(),
            medicare_number: "PARL666222".into(),
            email: "lisa.parent@example.com".into(),
            phone: "514-555-2002".into(),
            address: "222 Parent Ave".into(),
            city: "Montreal".into(),
            province: "Quebec".into(),
            postal_code: "H5F 5F5".into(),
            location_id: 1,
            created_at: None,
            updated_at: None,
        };
        assert!(fm.validate_at(reference).is_ok());

        fm.birthdate = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert!(matches!(
            fm.validate_at(reference),
            Err(FamilyMemberValidationError::BirthdateInFuture)
        ));
    }
}
