use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Applikationsinställningar, sparas som TOML i plattformens
/// konfigurationskatalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub club_name: String,
    pub database_path: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        // Använd directories crate för platform-specifika sökvägar
        let data_dir = directories::ProjectDirs::from("se", "klubbadmin", "Klubbadmin")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"));

        Self {
            club_name: "Montreal Volleyballklubb".to_string(),
            database_path: data_dir.join("klubb.db"),
        }
    }
}

impl AppSettings {
    fn config_path() -> PathBuf {
        directories::ProjectDirs::from("se", "klubbadmin", "Klubbadmin")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    pub fn load() -> Self {
        if let Ok(content) = std::fs::read_to_string(Self::config_path()) {
            if let Ok(settings) = toml::from_str(&content) {
                return settings;
            }
        }

        Self::default()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_roundtrip() {
        let settings = AppSettings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let loaded: AppSettings = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded.club_name, settings.club_name);
        assert_eq!(loaded.database_path, settings.database_path);
    }

    #[test]
    fn test_partial_toml_gives_defaults() {
        let loaded: AppSettings = toml::from_str("club_name = \"IK Test\"\n").unwrap();
        assert_eq!(loaded.club_name, "IK Test");
        assert_eq!(loaded.database_path, AppSettings::default().database_path);
    }
}
