use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ProcessingError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BeachPreset {
    #[validate(length(min = 1))]
    pub key: String,

    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl BeachPreset {
    pub fn new(key: &str, name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
        }
    }

    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.key.eq_ignore_ascii_case(query) || self.name.eq_ignore_ascii_case(query)
    }
}

/// (key, display name, latitude, longitude) of the Tel Aviv area beaches.
const BEACHES: [(&str, &str, f64, f64); 10] = [
    ("Dolphinarium", "Dolphinarium Beach", 32.0698816, 34.763087),
    ("Maravi", "Maravi Beach", 32.0604267, 34.7587907),
    ("Gordon Beach", "Gordon Beach", 32.0826751, 34.7673111),
    ("Frishman Beach", "Frishman Beach", 32.0801646, 34.7667165),
    ("Bograshov Beach", "Bograshov Beach", 32.0777433, 34.7660297),
    ("Antenot", "Antenot Beach", 32.1288621, 34.785422),
    ("Hilton Beach", "Hilton Beach", 32.0920, 34.7580),
    ("Herzliya Beach", "Herzliya Beach", 32.1800, 34.8000),
    ("Bat Yam Beach", "Bat Yam Beach", 32.0200, 34.7500),
    ("Holon Beach", "Holon Beach", 32.0100, 34.7800),
];

/// Keys of the beaches compared side by side for a single date.
pub const COMPARISON_BEACHES: [&str; 4] = ["Dolphinarium", "Antenot", "Maravi", "Bograshov Beach"];

pub fn all_presets() -> Vec<BeachPreset> {
    BEACHES
        .iter()
        .map(|(key, name, lat, lon)| BeachPreset::new(key, name, *lat, *lon))
        .collect()
}

pub fn find_preset(query: &str) -> Result<BeachPreset> {
    all_presets()
        .into_iter()
        .find(|preset| preset.matches(query))
        .ok_or_else(|| ProcessingError::PresetNotFound(query.to_string()))
}

pub fn comparison_presets() -> Vec<BeachPreset> {
    all_presets()
        .into_iter()
        .filter(|preset| COMPARISON_BEACHES.contains(&preset.key.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        let presets = all_presets();
        assert_eq!(presets.len(), 10);
        for preset in &presets {
            assert!(preset.validate().is_ok(), "invalid preset {}", preset.key);
        }
    }

    #[test]
    fn test_find_preset() {
        let preset = find_preset("dolphinarium").unwrap();
        assert_eq!(preset.name, "Dolphinarium Beach");

        let by_name = find_preset("Antenot Beach").unwrap();
        assert_eq!(by_name.key, "Antenot");

        assert!(matches!(
            find_preset("Malibu"),
            Err(ProcessingError::PresetNotFound(_))
        ));
    }

    #[test]
    fn test_comparison_presets() {
        let presets = comparison_presets();
        assert_eq!(presets.len(), COMPARISON_BEACHES.len());
        assert!(presets.iter().any(|p| p.key == "Bograshov Beach"));
    }

    #[test]
    fn test_invalid_coordinates() {
        let preset = BeachPreset::new("Nowhere", "Nowhere Beach", 91.0, 34.0);
        assert!(preset.validate().is_err());
    }
}
