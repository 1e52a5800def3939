use serde::{Deserialize, Serialize};

/// Fritidsintresse, kopplas många-till-många till medlemmar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hobby {
    pub id: Option<i64>,
    pub name: String,
}

impl Hobby {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}
