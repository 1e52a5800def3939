use serde::{Deserialize, Serialize};

/// Typ av anläggning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocationType {
    /// Huvudkontor (högst ett per förening)
    Head,
    #[default]
    Branch,
}

impl LocationType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Branch => "branch",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "head" => Self::Head,
            _ => Self::Branch,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Head => "Huvudkontor",
            Self::Branch => "Filial",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Head, Self::Branch]
    }
}

/// Anläggning där verksamheten bedrivs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: Option<i64>,
    pub name: String,
    pub location_type: LocationType,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub phone: String,
    pub web_address: String,
    pub capacity: i32,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            location_type: LocationType::Branch,
            address: String::new(),
            city: String::new(),
            province: String::new(),
            postal_code: String::new(),
            phone: String::new(),
            web_address: String::new(),
            capacity: 0,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Location {
    pub fn new(name: String, location_type: LocationType) -> Self {
        Self {
            name,
            location_type,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), LocationValidationError> {
        if self.name.trim().is_empty() {
            return Err(LocationValidationError::EmptyName);
        }
        if self.capacity <= 0 {
            return Err(LocationValidationError::NonPositiveCapacity);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LocationValidationError {
    #[error("Namn får inte vara tomt")]
    EmptyName,
    #[error("Kapacitet måste vara större än noll")]
    NonPositiveCapacity,
}

impl LocationValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::NonPositiveCapacity => "capacity",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        let mut location = Location::new("Centralhallen".into(), LocationType::Head);
        location.capacity = 500;
        assert!(location.validate().is_ok());

        location.capacity = 0;
        assert!(matches!(
            location.validate(),
            Err(LocationValidationError::NonPositiveCapacity)
        ));

        location.capacity = 100;
        location.name = "  ".into();
        assert!(matches!(
            location.validate(),
            Err(LocationValidationError::EmptyName)
        ));
    }

    #[test]
    fn test_type_roundtrip() {
        for t in LocationType::all() {
            assert_eq!(LocationType::from_db_str(t.as_db_str()), *t);
        }
    }
}
