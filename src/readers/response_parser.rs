use crate::error::{ProcessingError, Result};
use crate::models::{HourlyRecord, RawHourly, RawMarineResponse, HOURLY_PARAMETERS};
use chrono::{DateTime, NaiveDateTime};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Timestamp layouts accepted besides RFC 3339. The API itself emits the first.
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Turns the API's parallel hourly arrays into one ordered sequence of records.
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    /// Read a raw response document from disk without interpreting it.
    pub fn read_response(&self, path: &Path) -> Result<RawMarineResponse> {
        let content = fs::read_to_string(path)?;
        self.decode(&content)
    }

    /// Decode JSON text into the raw response shape.
    pub fn decode(&self, content: &str) -> Result<RawMarineResponse> {
        serde_json::from_str(content)
            .map_err(|e| ProcessingError::MalformedResponse(format!("invalid JSON payload: {}", e)))
    }

    pub fn parse_str(&self, content: &str) -> Result<Vec<HourlyRecord>> {
        let raw = self.decode(content)?;
        self.parse(&raw)
    }

    pub fn parse_file(&self, path: &Path) -> Result<Vec<HourlyRecord>> {
        let raw = self.read_response(path)?;
        self.parse(&raw)
    }

    /// Validate the hourly section and build one unclassified record per hour.
    pub fn parse(&self, raw: &RawMarineResponse) -> Result<Vec<HourlyRecord>> {
        let hourly = raw.hourly.as_ref().ok_or_else(|| {
            ProcessingError::MalformedResponse("response has no 'hourly' section".to_string())
        })?;

        let times = hourly.time.as_ref().ok_or_else(|| {
            ProcessingError::MalformedResponse("hourly section has no 'time' array".to_string())
        })?;

        self.check_lengths(hourly, times.len())?;

        let mut records = Vec::with_capacity(times.len());
        let mut previous: Option<NaiveDateTime> = None;

        for (index, time) in times.iter().enumerate() {
            let timestamp = parse_timestamp(time)?;

            if let Some(prev) = previous {
                if timestamp < prev {
                    return Err(ProcessingError::MalformedResponse(format!(
                        "timestamp '{}' at index {} is earlier than the preceding {}",
                        time, index, prev
                    )));
                }
            }
            previous = Some(timestamp);

            records.push(HourlyRecord {
                timestamp,
                wave_height: hourly.value("wave_height", index),
                wind_wave_height: hourly.value("wind_wave_height", index),
                swell_wave_height: hourly.value("swell_wave_height", index),
                wave_direction: hourly.value("wave_direction", index),
                wind_wave_direction: hourly.value("wind_wave_direction", index),
                swell_wave_direction: hourly.value("swell_wave_direction", index),
                swell_wave_period: hourly.value("swell_wave_period", index),
                condition: None,
            });
        }

        debug!(hours = records.len(), "parsed hourly marine records");
        Ok(records)
    }

    /// Every parameter array that is present must line up with `time`.
    fn check_lengths(&self, hourly: &RawHourly, expected: usize) -> Result<()> {
        for name in HOURLY_PARAMETERS {
            match hourly.parameter(name) {
                Some(column) if column.len() != expected => {
                    return Err(ProcessingError::MalformedResponse(format!(
                        "'{}' has {} entries but 'time' has {}",
                        name,
                        column.len(),
                        expected
                    )));
                }
                Some(_) => {}
                None => debug!(parameter = name, "parameter missing from response"),
            }
        }
        Ok(())
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an hourly timestamp. Offsets are dropped, not applied: the wall
/// clock as written is what the record keeps.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();

    for format in TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(timestamp);
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.naive_local())
        .map_err(|e| {
            ProcessingError::MalformedResponse(format!("unparsable timestamp '{}': {}", value, e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use serde_json::json;

    fn times(count: usize) -> Vec<String> {
        (0..count)
            .map(|h| format!("2024-06-{:02}T{:02}:00", 1 + h / 24, h % 24))
            .collect()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap();

        assert_eq!(parse_timestamp("2024-06-01T05:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-06-01T05:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-06-01T05:00:00Z").unwrap(), expected);
        // Offset kept as written, not shifted to UTC
        assert_eq!(parse_timestamp("2024-06-01T05:00:00+03:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(ProcessingError::MalformedResponse(_))
        ));
        assert!(parse_timestamp("2024-13-01T00:00").is_err());
    }

    #[test]
    fn test_parse_preserves_nulls() {
        let payload = json!({
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00"],
                "wave_height": [1.4, null],
                "swell_wave_period": [null, 9.0]
            }
        });

        let records = ResponseParser::new().parse_str(&payload.to_string()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].wave_height, Some(1.4));
        assert_eq!(records[1].wave_height, None);
        assert_eq!(records[0].swell_wave_period, None);
        assert_eq!(records[1].swell_wave_period, Some(9.0));
        assert_eq!(records[1].timestamp.hour(), 1);
    }

    #[test]
    fn test_missing_parameter_is_absent_everywhere() {
        let payload = json!({
            "hourly": {
                "time": times(3),
                "wave_height": [1.0, 1.1, 1.2]
            }
        });

        let records = ResponseParser::new().parse_str(&payload.to_string()).unwrap();
        assert!(records.iter().all(|r| r.swell_wave_period.is_none()));
        assert!(records.iter().all(|r| r.condition.is_none()));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let payload = json!({
            "hourly": {
                "time": times(24),
                "wave_height": vec![1.0; 23]
            }
        });

        let result = ResponseParser::new().parse_str(&payload.to_string());
        match result {
            Err(ProcessingError::MalformedResponse(message)) => {
                assert!(message.contains("wave_height"));
                assert!(message.contains("23"));
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_time_rejected() {
        let parser = ResponseParser::new();

        let no_hourly = json!({"latitude": 32.0});
        assert!(matches!(
            parser.parse_str(&no_hourly.to_string()),
            Err(ProcessingError::MalformedResponse(_))
        ));

        let no_time = json!({"hourly": {"wave_height": [1.0]}});
        assert!(matches!(
            parser.parse_str(&no_time.to_string()),
            Err(ProcessingError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_decreasing_timestamps_rejected() {
        let payload = json!({
            "hourly": {
                "time": ["2024-06-01T02:00", "2024-06-01T01:00"]
            }
        });

        assert!(matches!(
            ResponseParser::new().parse_str(&payload.to_string()),
            Err(ProcessingError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_non_numeric_entry_rejected() {
        let payload = r#"{"hourly": {"time": ["2024-06-01T00:00"], "wave_height": ["high"]}}"#;
        assert!(matches!(
            ResponseParser::new().parse_str(payload),
            Err(ProcessingError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_empty_time_array() {
        let payload = json!({"hourly": {"time": []}});
        let records = ResponseParser::new().parse_str(&payload.to_string()).unwrap();
        assert!(records.is_empty());
    }
}
