use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{ConditionCounts, DailySummary, HourlyRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DatasetMetadata {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    // Open-Meteo serves at most 16 days
    #[validate(range(min = 1, max = 16))]
    pub forecast_days: u32,

    pub retrieved_at: DateTime<Utc>,
}

impl DatasetMetadata {
    pub fn new(latitude: f64, longitude: f64, forecast_days: u32, retrieved_at: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            forecast_days,
            retrieved_at,
        }
    }
}

/// Result of one pipeline run: classified hours, daily summaries and the
/// query that produced them. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarineDataset {
    hourly: Vec<HourlyRecord>,
    daily: Vec<DailySummary>,
    metadata: DatasetMetadata,
}

impl MarineDataset {
    pub fn new(hourly: Vec<HourlyRecord>, daily: Vec<DailySummary>, metadata: DatasetMetadata) -> Self {
        Self {
            hourly,
            daily,
            metadata,
        }
    }

    pub fn hourly(&self) -> &[HourlyRecord] {
        &self.hourly
    }

    pub fn daily(&self) -> &[DailySummary] {
        &self.daily
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DailySummary> {
        self.daily
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|i| &self.daily[i])
    }

    /// Hours falling on `date`, in chronological order.
    pub fn hours_on(&self, date: NaiveDate) -> impl Iterator<Item = &HourlyRecord> {
        self.hourly.iter().filter(move |r| r.date() == date)
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.daily.first(), self.daily.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    pub fn total_condition_counts(&self) -> ConditionCounts {
        let mut totals = ConditionCounts::default();
        for day in &self.daily {
            totals.merge(&day.condition_counts);
        }
        totals
    }

    pub fn is_empty(&self) -> bool {
        self.hourly.is_empty()
    }
}
