use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Hourly parameters requested from the marine API, in column order.
pub const HOURLY_PARAMETERS: [&str; 7] = [
    "wave_height",
    "wave_direction",
    "wind_wave_height",
    "wind_wave_direction",
    "swell_wave_height",
    "swell_wave_direction",
    "swell_wave_period",
];

/// Marine API payload as delivered, before any validation.
///
/// Top-level fields other than `hourly` are informational; anything the
/// crate does not model is kept in `extra` so the document can be written
/// back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMarineResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_units: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly: Option<RawHourly>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Parallel arrays under `hourly`, each index-aligned to `time`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHourly {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_height: Option<Vec<Option<f64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_direction: Option<Vec<Option<f64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_wave_height: Option<Vec<Option<f64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_wave_direction: Option<Vec<Option<f64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swell_wave_height: Option<Vec<Option<f64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swell_wave_direction: Option<Vec<Option<f64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swell_wave_period: Option<Vec<Option<f64>>>,
}

impl RawHourly {
    /// Look up a parameter array by its API name.
    pub fn parameter(&self, name: &str) -> Option<&[Option<f64>]> {
        let column = match name {
            "wave_height" => &self.wave_height,
            "wave_direction" => &self.wave_direction,
            "wind_wave_height" => &self.wind_wave_height,
            "wind_wave_direction" => &self.wind_wave_direction,
            "swell_wave_height" => &self.swell_wave_height,
            "swell_wave_direction" => &self.swell_wave_direction,
            "swell_wave_period" => &self.swell_wave_period,
            _ => return None,
        };
        column.as_deref()
    }

    /// Value of `name` at row `index`, absent when either is missing.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.parameter(name)
            .and_then(|column| column.get(index).copied())
            .flatten()
    }

    pub fn len(&self) -> usize {
        self.time.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_shape() {
        let json = r#"{
            "latitude": 32.08,
            "longitude": 34.77,
            "generationtime_ms": 0.5,
            "hourly_units": {"time": "iso8601", "wave_height": "m"},
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00"],
                "wave_height": [1.1, null]
            }
        }"#;

        let raw: RawMarineResponse = serde_json::from_str(json).unwrap();
        let hourly = raw.hourly.as_ref().unwrap();

        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly.value("wave_height", 0), Some(1.1));
        assert_eq!(hourly.value("wave_height", 1), None);
        assert_eq!(hourly.parameter("swell_wave_period"), None);
        assert!(raw.extra.contains_key("generationtime_ms"));
    }

    #[test]
    fn test_unknown_parameter() {
        let hourly = RawHourly::default();
        assert!(hourly.parameter("sea_surface_temperature").is_none());
        assert!(hourly.is_empty());
    }
}
