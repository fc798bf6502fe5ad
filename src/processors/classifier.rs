use crate::models::{HourlyRecord, WaveCondition};
use crate::settings::ThresholdConfig;

/// Rates an hour as Good, OK or Bad from wave height, swell height and swell
/// period. Direction fields play no part.
///
/// The first tier whose checks all pass wins. A missing measurement fails
/// every check it takes part in, so absence can only push the rating down.
#[derive(Debug, Clone, Default)]
pub struct ConditionClassifier {
    thresholds: ThresholdConfig,
}

impl ConditionClassifier {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    pub fn classify(
        &self,
        wave_height: Option<f64>,
        swell_wave_height: Option<f64>,
        swell_wave_period: Option<f64>,
    ) -> WaveCondition {
        let t = &self.thresholds;
        let swell_ok = swell_wave_height.is_some_and(|h| h >= t.swell_height.acceptable_min);

        if t.wave_height.optimal.contains(wave_height)
            && swell_ok
            && t.swell_period.optimal.contains(swell_wave_period)
        {
            return WaveCondition::Good;
        }

        if t.wave_height.acceptable.contains(wave_height)
            && swell_ok
            && swell_wave_period.is_some_and(|p| p >= t.swell_period.acceptable_min)
        {
            return WaveCondition::Ok;
        }

        WaveCondition::Bad
    }

    pub fn classify_record(&self, record: &mut HourlyRecord) -> WaveCondition {
        let condition = self.classify(
            record.wave_height,
            record.swell_wave_height,
            record.swell_wave_period,
        );
        record.condition = Some(condition);
        condition
    }

    pub fn classify_all(&self, records: &mut [HourlyRecord]) {
        for record in records.iter_mut() {
            self.classify_record(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Band;
    use chrono::NaiveDate;

    fn classify(wave: f64, swell: f64, period: f64) -> WaveCondition {
        ConditionClassifier::default().classify(Some(wave), Some(swell), Some(period))
    }

    #[test]
    fn test_wave_height_boundaries() {
        assert_eq!(classify(1.2, 0.5, 8.0), WaveCondition::Good);
        assert_eq!(classify(3.2, 0.5, 8.0), WaveCondition::Good);
        assert_eq!(classify(1.19999, 0.5, 8.0), WaveCondition::Ok);
        assert_eq!(classify(3.20001, 0.5, 8.0), WaveCondition::Ok);
        assert_eq!(classify(0.6, 0.5, 8.0), WaveCondition::Ok);
        assert_eq!(classify(4.0, 0.5, 8.0), WaveCondition::Ok);
        assert_eq!(classify(0.59999, 0.5, 8.0), WaveCondition::Bad);
        assert_eq!(classify(0.599999, 0.5, 8.0), WaveCondition::Bad);
        assert_eq!(classify(4.00001, 0.5, 8.0), WaveCondition::Bad);
    }

    #[test]
    fn test_swell_height_minimum() {
        assert_eq!(classify(2.0, 0.4, 8.0), WaveCondition::Bad);
        assert_eq!(classify(2.0, 0.5, 8.0), WaveCondition::Good);
        // No upper bound on swell height
        assert_eq!(classify(2.0, 9.0, 8.0), WaveCondition::Good);
    }

    #[test]
    fn test_swell_period_boundaries() {
        assert_eq!(classify(2.0, 1.0, 15.0), WaveCondition::Good);
        assert_eq!(classify(2.0, 1.0, 15.1), WaveCondition::Ok);
        assert_eq!(classify(2.0, 1.0, 7.9), WaveCondition::Ok);
        assert_eq!(classify(2.0, 1.0, 5.5), WaveCondition::Ok);
        assert_eq!(classify(2.0, 1.0, 5.49), WaveCondition::Bad);
    }

    #[test]
    fn test_absent_inputs_are_bad() {
        let classifier = ConditionClassifier::default();
        assert_eq!(
            classifier.classify(None, Some(0.5), Some(8.0)),
            WaveCondition::Bad
        );
        assert_eq!(
            classifier.classify(Some(2.0), None, Some(8.0)),
            WaveCondition::Bad
        );
        assert_eq!(
            classifier.classify(Some(2.0), Some(1.0), None),
            WaveCondition::Bad
        );
        assert_eq!(classifier.classify(None, None, None), WaveCondition::Bad);
    }

    #[test]
    fn test_implausible_inputs_degrade_to_bad() {
        assert_eq!(classify(-1.0, 0.5, 8.0), WaveCondition::Bad);
        assert_eq!(classify(f64::NAN, 0.5, 8.0), WaveCondition::Bad);
        assert_eq!(classify(2.0, f64::NAN, 8.0), WaveCondition::Bad);
        assert_eq!(classify(2.0, 0.5, f64::INFINITY), WaveCondition::Ok);
        assert_eq!(classify(f64::INFINITY, 0.5, 8.0), WaveCondition::Bad);
    }

    #[test]
    fn test_deterministic() {
        let classifier = ConditionClassifier::default();
        let inputs = [
            (Some(1.5), Some(1.2), Some(8.0)),
            (Some(0.8), Some(0.6), Some(6.5)),
            (Some(4.5), Some(3.5), Some(19.0)),
            (None, Some(1.0), Some(10.0)),
        ];
        for (wave, swell, period) in inputs {
            let first = classifier.classify(wave, swell, period);
            for _ in 0..10 {
                assert_eq!(classifier.classify(wave, swell, period), first);
            }
        }
    }

    #[test]
    fn test_regional_retuning() {
        let mut thresholds = ThresholdConfig::default();
        thresholds.wave_height.optimal = Band::new(0.8, 3.2);
        let classifier = ConditionClassifier::new(thresholds);

        assert_eq!(
            classifier.classify(Some(1.0), Some(0.8), Some(9.0)),
            WaveCondition::Good
        );
        assert_eq!(classify(1.0, 0.8, 9.0), WaveCondition::Ok);
    }

    #[test]
    fn test_classify_record_ignores_direction() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let mut north = HourlyRecord::builder(timestamp)
            .wave_height(2.0)
            .swell_wave_height(1.0)
            .swell_wave_period(10.0)
            .wave_direction(0.0)
            .build();
        let mut south = north.clone();
        south.wave_direction = Some(180.0);
        south.swell_wave_direction = Some(190.0);

        let classifier = ConditionClassifier::default();
        assert_eq!(classifier.classify_record(&mut north), WaveCondition::Good);
        assert_eq!(classifier.classify_record(&mut south), WaveCondition::Good);
        assert_eq!(north.condition, Some(WaveCondition::Good));
    }
}
