use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::{HourlyRecord, WaveCondition};

/// Max/min/mean of one measurement over one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub max: f64,
    pub min: f64,
    pub avg: f64,
}

impl FieldStats {
    /// Statistics over the present values only. `None` when nothing is present.
    ///
    /// Values are sorted before summing so the mean does not depend on the
    /// order the hours arrive in.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(|a, b| a.total_cmp(b));

        let min = values[0];
        let max = values[values.len() - 1];
        let avg = values.iter().sum::<f64>() / values.len() as f64;

        Some(Self { max, min, avg })
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionCounts {
    #[serde(rename = "Good")]
    pub good: usize,
    #[serde(rename = "OK")]
    pub ok: usize,
    #[serde(rename = "Bad")]
    pub bad: usize,
}

impl ConditionCounts {
    pub fn record(&mut self, condition: WaveCondition) {
        match condition {
            WaveCondition::Good => self.good += 1,
            WaveCondition::Ok => self.ok += 1,
            WaveCondition::Bad => self.bad += 1,
        }
    }

    pub fn get(&self, condition: WaveCondition) -> usize {
        match condition {
            WaveCondition::Good => self.good,
            WaveCondition::Ok => self.ok,
            WaveCondition::Bad => self.bad,
        }
    }

    pub fn total(&self) -> usize {
        self.good + self.ok + self.bad
    }

    pub fn merge(&mut self, other: &ConditionCounts) {
        self.good += other.good;
        self.ok += other.ok;
        self.bad += other.bad;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_height: Option<FieldStats>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swell_height: Option<FieldStats>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swell_period: Option<FieldStats>,

    pub condition_counts: ConditionCounts,
    pub hour_count: usize,
}

impl DailySummary {
    /// Summarise the classified hours of one day.
    ///
    /// Fails with `EmptyDay` when `records` is empty and with
    /// `UnclassifiedRecord` when any hour has no condition yet.
    pub fn from_records(date: NaiveDate, records: &[&HourlyRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(ProcessingError::EmptyDay { date });
        }

        let mut condition_counts = ConditionCounts::default();
        for record in records {
            let condition = record.condition.ok_or(ProcessingError::UnclassifiedRecord {
                timestamp: record.timestamp,
            })?;
            condition_counts.record(condition);
        }

        Ok(Self {
            date,
            wave_height: FieldStats::from_values(records.iter().filter_map(|r| r.wave_height)),
            swell_height: FieldStats::from_values(
                records.iter().filter_map(|r| r.swell_wave_height),
            ),
            swell_period: FieldStats::from_values(
                records.iter().filter_map(|r| r.swell_wave_period),
            ),
            condition_counts,
            hour_count: records.len(),
        })
    }

    pub fn wave_height_max(&self) -> Option<f64> {
        self.wave_height.map(|s| s.max)
    }

    pub fn wave_height_min(&self) -> Option<f64> {
        self.wave_height.map(|s| s.min)
    }

    pub fn wave_height_avg(&self) -> Option<f64> {
        self.wave_height.map(|s| s.avg)
    }

    pub fn swell_height_max(&self) -> Option<f64> {
        self.swell_height.map(|s| s.max)
    }

    pub fn swell_height_min(&self) -> Option<f64> {
        self.swell_height.map(|s| s.min)
    }

    pub fn swell_height_avg(&self) -> Option<f64> {
        self.swell_height.map(|s| s.avg)
    }

    pub fn swell_period_max(&self) -> Option<f64> {
        self.swell_period.map(|s| s.max)
    }

    pub fn swell_period_min(&self) -> Option<f64> {
        self.swell_period.map(|s| s.min)
    }

    pub fn swell_period_avg(&self) -> Option<f64> {
        self.swell_period.map(|s| s.avg)
    }

    /// Best label seen on this day.
    pub fn best_condition(&self) -> WaveCondition {
        if self.condition_counts.good > 0 {
            WaveCondition::Good
        } else if self.condition_counts.ok > 0 {
            WaveCondition::Ok
        } else {
            WaveCondition::Bad
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.condition_counts.total() == self.hour_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn hour(h: u32, wave: Option<f64>, condition: WaveCondition) -> HourlyRecord {
        let mut record = HourlyRecord::empty(date().and_hms_opt(h, 0, 0).unwrap());
        record.wave_height = wave;
        record.condition = Some(condition);
        record
    }

    #[test]
    fn test_field_stats() {
        let stats = FieldStats::from_values([1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.min, 1.0);
        assert!((stats.avg - 2.0).abs() < 1e-12);
        assert!((stats.range() - 2.0).abs() < 1e-12);

        assert!(FieldStats::from_values(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_zero_is_not_absence() {
        let stats = FieldStats::from_values([0.0]).unwrap();
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.avg, 0.0);
    }

    #[test]
    fn test_empty_day_rejected() {
        let result = DailySummary::from_records(date(), &[]);
        assert!(matches!(result, Err(ProcessingError::EmptyDay { .. })));
    }

    #[test]
    fn test_unclassified_hour_rejected() {
        let record = HourlyRecord::empty(date().and_hms_opt(0, 0, 0).unwrap());
        let result = DailySummary::from_records(date(), &[&record]);
        assert!(matches!(
            result,
            Err(ProcessingError::UnclassifiedRecord { .. })
        ));
    }

    #[test]
    fn test_summary_counts_and_partial_fields() {
        let a = hour(0, Some(2.0), WaveCondition::Good);
        let b = hour(1, None, WaveCondition::Bad);
        let c = hour(2, Some(1.0), WaveCondition::Ok);

        let summary = DailySummary::from_records(date(), &[&a, &b, &c]).unwrap();

        assert_eq!(summary.hour_count, 3);
        assert_eq!(summary.condition_counts.good, 1);
        assert_eq!(summary.condition_counts.ok, 1);
        assert_eq!(summary.condition_counts.bad, 1);
        assert!(summary.is_consistent());
        assert_eq!(summary.wave_height_max(), Some(2.0));
        assert_eq!(summary.wave_height_min(), Some(1.0));
        assert_eq!(summary.wave_height_avg(), Some(1.5));
        assert_eq!(summary.swell_period_avg(), None);
        assert_eq!(summary.best_condition(), WaveCondition::Good);
    }

    #[test]
    fn test_absent_statistics_omitted_from_json() {
        let a = hour(0, Some(2.0), WaveCondition::Bad);
        let summary = DailySummary::from_records(date(), &[&a]).unwrap();
        let json = serde_json::to_value(&summary).unwrap();

        assert!(json.get("wave_height").is_some());
        assert!(json.get("swell_height").is_none());
        assert_eq!(json["condition_counts"]["OK"], 0);
        assert_eq!(summary.best_condition(), WaveCondition::Bad);
    }
}
