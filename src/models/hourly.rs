use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative surf rating for one hour.
///
/// Variants are declared worst-first so that `Ord` ranks Good highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WaveCondition {
    Bad,
    #[serde(rename = "OK")]
    Ok,
    Good,
}

impl WaveCondition {
    pub const ALL: [WaveCondition; 3] = [WaveCondition::Good, WaveCondition::Ok, WaveCondition::Bad];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Good" => Some(WaveCondition::Good),
            "OK" | "Ok" => Some(WaveCondition::Ok),
            "Bad" => Some(WaveCondition::Bad),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WaveCondition::Good => "Good",
            WaveCondition::Ok => "OK",
            WaveCondition::Bad => "Bad",
        }
    }

    /// Base score used when ranking hours against each other.
    pub fn score(&self) -> f64 {
        match self {
            WaveCondition::Good => 3.0,
            WaveCondition::Ok => 2.0,
            WaveCondition::Bad => 1.0,
        }
    }
}

impl fmt::Display for WaveCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub timestamp: NaiveDateTime,

    // Heights in metres
    pub wave_height: Option<f64>,
    pub wind_wave_height: Option<f64>,
    pub swell_wave_height: Option<f64>,

    // Compass degrees, [0, 360)
    pub wave_direction: Option<f64>,
    pub wind_wave_direction: Option<f64>,
    pub swell_wave_direction: Option<f64>,

    // Seconds
    pub swell_wave_period: Option<f64>,

    /// Set by the classifier; `None` straight out of the parser.
    #[serde(default)]
    pub condition: Option<WaveCondition>,
}

impl HourlyRecord {
    /// A record with every measurement absent.
    pub fn empty(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            wave_height: None,
            wind_wave_height: None,
            swell_wave_height: None,
            wave_direction: None,
            wind_wave_direction: None,
            swell_wave_direction: None,
            swell_wave_period: None,
            condition: None,
        }
    }

    pub fn builder(timestamp: NaiveDateTime) -> HourlyRecordBuilder {
        HourlyRecordBuilder::new(timestamp)
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn is_classified(&self) -> bool {
        self.condition.is_some()
    }

    /// True when all three inputs of the rating rule are present.
    pub fn has_rating_inputs(&self) -> bool {
        self.wave_height.is_some()
            && self.swell_wave_height.is_some()
            && self.swell_wave_period.is_some()
    }
}

pub struct HourlyRecordBuilder {
    record: HourlyRecord,
}

impl HourlyRecordBuilder {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            record: HourlyRecord::empty(timestamp),
        }
    }

    pub fn wave_height(mut self, value: f64) -> Self {
        self.record.wave_height = Some(value);
        self
    }

    pub fn wind_wave_height(mut self, value: f64) -> Self {
        self.record.wind_wave_height = Some(value);
        self
    }

    pub fn swell_wave_height(mut self, value: f64) -> Self {
        self.record.swell_wave_height = Some(value);
        self
    }

    pub fn wave_direction(mut self, value: f64) -> Self {
        self.record.wave_direction = Some(value);
        self
    }

    pub fn wind_wave_direction(mut self, value: f64) -> Self {
        self.record.wind_wave_direction = Some(value);
        self
    }

    pub fn swell_wave_direction(mut self, value: f64) -> Self {
        self.record.swell_wave_direction = Some(value);
        self
    }

    pub fn swell_wave_period(mut self, value: f64) -> Self {
        self.record.swell_wave_period = Some(value);
        self
    }

    pub fn condition(mut self, condition: WaveCondition) -> Self {
        self.record.condition = Some(condition);
        self
    }

    pub fn build(self) -> HourlyRecord {
        self.record
    }
}
