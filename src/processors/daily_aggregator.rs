use crate::error::Result;
use crate::models::{DailySummary, HourlyRecord};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

pub struct DailyAggregator;

impl DailyAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Summarise classified hourly records, one summary per calendar date,
    /// ascending by date.
    pub fn aggregate(&self, records: &[HourlyRecord]) -> Result<Vec<DailySummary>> {
        let grouped = self.group_by_date(records);

        let summaries = grouped
            .into_iter()
            .map(|(date, hours)| DailySummary::from_records(date, &hours))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            days = summaries.len(),
            hours = records.len(),
            "aggregated daily summaries"
        );
        Ok(summaries)
    }

    /// Group records by the date of their own timestamp.
    pub fn group_by_date<'a>(
        &self,
        records: &'a [HourlyRecord],
    ) -> BTreeMap<NaiveDate, Vec<&'a HourlyRecord>> {
        let mut grouped: BTreeMap<NaiveDate, Vec<&HourlyRecord>> = BTreeMap::new();
        for record in records {
            grouped.entry(record.date()).or_default().push(record);
        }
        grouped
    }
}

impl Default for DailyAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use crate::processors::ConditionClassifier;
    use chrono::NaiveDateTime;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn classified_day(day: u32) -> Vec<HourlyRecord> {
        let classifier = ConditionClassifier::default();
        (0..24)
            .map(|h| {
                let mut record = HourlyRecord::builder(ts(day, h))
                    .wave_height(0.5 + h as f64 * 0.13)
                    .swell_wave_height(0.3 + h as f64 * 0.07)
                    .swell_wave_period(5.0 + h as f64 * 0.41)
                    .build();
                classifier.classify_record(&mut record);
                record
            })
            .collect()
    }

    #[test]
    fn test_groups_in_date_order() {
        let mut records = classified_day(3);
        records.extend(classified_day(1));
        records.extend(classified_day(2));

        let summaries = DailyAggregator::new().aggregate(&records).unwrap();
        let dates: Vec<u32> = summaries
            .iter()
            .map(|s| s.date.format("%d").to_string().parse().unwrap())
            .collect();

        assert_eq!(dates, vec![1, 2, 3]);
        assert!(summaries.iter().all(|s| s.hour_count == 24));
    }

    #[test]
    fn test_order_independent() {
        let records = classified_day(1);
        let mut reversed = records.clone();
        reversed.reverse();
        let mut shuffled = records.clone();
        shuffled.rotate_left(7);
        shuffled.swap(2, 19);

        let aggregator = DailyAggregator::new();
        let expected = aggregator.aggregate(&records).unwrap();

        assert_eq!(aggregator.aggregate(&records).unwrap(), expected);
        assert_eq!(aggregator.aggregate(&reversed).unwrap(), expected);
        assert_eq!(aggregator.aggregate(&shuffled).unwrap(), expected);
    }

    #[test]
    fn test_counts_sum_to_hours() {
        let mut records = classified_day(1);
        records.extend(classified_day(2));

        for summary in DailyAggregator::new().aggregate(&records).unwrap() {
            let counts = summary.condition_counts;
            assert_eq!(counts.good + counts.ok + counts.bad, summary.hour_count);
        }
    }

    #[test]
    fn test_partial_fields_average_present_hours_only() {
        let mut records = classified_day(1);
        for (i, record) in records.iter_mut().enumerate() {
            record.swell_wave_period = if i < 10 { Some(10.0) } else { None };
        }

        let summaries = DailyAggregator::new().aggregate(&records).unwrap();
        assert_eq!(summaries[0].swell_period_avg(), Some(10.0));
        assert_eq!(summaries[0].hour_count, 24);
    }

    #[test]
    fn test_field_absent_all_day() {
        let mut records = classified_day(1);
        for record in records.iter_mut() {
            record.swell_wave_height = None;
        }

        let summaries = DailyAggregator::new().aggregate(&records).unwrap();
        assert!(summaries[0].swell_height.is_none());
        assert!(summaries[0].wave_height.is_some());
    }

    #[test]
    fn test_unclassified_record_aborts() {
        let mut records = classified_day(1);
        records[5].condition = None;

        let result = DailyAggregator::new().aggregate(&records);
        assert!(matches!(
            result,
            Err(ProcessingError::UnclassifiedRecord { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let summaries = DailyAggregator::new().aggregate(&[]).unwrap();
        assert!(summaries.is_empty());
    }
}
