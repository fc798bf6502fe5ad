use crate::error::{ProcessingError, Result};
use crate::models::{DatasetMetadata, MarineDataset, RawMarineResponse};
use crate::processors::{ConditionClassifier, DailyAggregator};
use crate::readers::ResponseParser;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, info_span};

/// One already-fetched response plus the query that produced it.
#[derive(Debug, Clone)]
pub struct ForecastRequest {
    pub label: String,
    pub raw: RawMarineResponse,
    pub latitude: f64,
    pub longitude: f64,
    pub forecast_days: u32,
}

impl ForecastRequest {
    pub fn new(
        label: impl Into<String>,
        raw: RawMarineResponse,
        latitude: f64,
        longitude: f64,
        forecast_days: u32,
    ) -> Self {
        Self {
            label: label.into(),
            raw,
            latitude,
            longitude,
            forecast_days,
        }
    }
}

/// Parse, classify and aggregate one raw response into a `MarineDataset`.
///
/// Performs no I/O. Any error aborts the run; no partial dataset is returned.
pub struct MarinePipeline {
    parser: ResponseParser,
    classifier: ConditionClassifier,
    aggregator: DailyAggregator,
    max_workers: usize,
    pool: OnceLock<Arc<ThreadPool>>,
}

impl MarinePipeline {
    pub fn new(classifier: ConditionClassifier) -> Self {
        Self {
            parser: ResponseParser::new(),
            classifier,
            aggregator: DailyAggregator::new(),
            max_workers: num_cpus::get(),
            pool: OnceLock::new(),
        }
    }

    /// Size of the batch pool; ignored once a pool has been supplied.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Run batches on a caller-owned pool instead of building one.
    pub fn with_thread_pool(self, pool: Arc<ThreadPool>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(pool);
        Self { pool: cell, ..self }
    }

    /// The batch pool, built on first use and reused afterwards.
    pub fn thread_pool(&self) -> Result<Arc<ThreadPool>> {
        if let Some(pool) = self.pool.get() {
            return Ok(Arc::clone(pool));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;
        debug!(workers = self.max_workers, "built batch thread pool");

        // A concurrent first call may have won; use whichever pool was stored
        Ok(Arc::clone(self.pool.get_or_init(|| Arc::new(pool))))
    }

    pub fn classifier(&self) -> &ConditionClassifier {
        &self.classifier
    }

    pub fn run(
        &self,
        raw: &RawMarineResponse,
        latitude: f64,
        longitude: f64,
        forecast_days: u32,
    ) -> Result<MarineDataset> {
        self.run_at(raw, latitude, longitude, forecast_days, Utc::now())
    }

    /// `run` with an explicit retrieval time.
    pub fn run_at(
        &self,
        raw: &RawMarineResponse,
        latitude: f64,
        longitude: f64,
        forecast_days: u32,
        retrieved_at: DateTime<Utc>,
    ) -> Result<MarineDataset> {
        let span = info_span!("pipeline", latitude, longitude, forecast_days);
        let _guard = span.enter();

        let mut hourly = self.parser.parse(raw)?;
        self.classifier.classify_all(&mut hourly);
        debug!(hours = hourly.len(), "classified hourly records");

        let daily = self.aggregator.aggregate(&hourly)?;

        info!(
            hours = hourly.len(),
            days = daily.len(),
            "marine dataset assembled"
        );

        let metadata = DatasetMetadata::new(latitude, longitude, forecast_days, retrieved_at);
        Ok(MarineDataset::new(hourly, daily, metadata))
    }

    /// Run independent requests in parallel. Results come back in input
    /// order; one failing request does not affect the others.
    pub fn run_batch(&self, requests: &[ForecastRequest]) -> Result<Vec<Result<MarineDataset>>> {
        let pool = self.thread_pool()?;

        let retrieved_at = Utc::now();
        let results: Vec<Result<MarineDataset>> = pool.install(|| {
            requests
                .par_iter()
                .map(|request| {
                    let _span = info_span!("request", label = %request.label).entered();
                    self.run_at(
                        &request.raw,
                        request.latitude,
                        request.longitude,
                        request.forecast_days,
                        retrieved_at,
                    )
                })
                .collect()
        });

        Ok(results)
    }
}

impl Default for MarinePipeline {
    fn default() -> Self {
        Self::new(ConditionClassifier::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawHourly, WaveCondition};
    use chrono::TimeZone;

    fn raw_hours(count: usize, wave: impl Fn(usize) -> f64) -> RawMarineResponse {
        let time = (0..count)
            .map(|h| format!("2024-06-{:02}T{:02}:00", 1 + h / 24, h % 24))
            .collect();
        RawMarineResponse {
            hourly: Some(RawHourly {
                time: Some(time),
                wave_height: Some((0..count).map(|h| Some(wave(h))).collect()),
                swell_wave_height: Some(vec![Some(1.0); count]),
                swell_wave_period: Some(vec![Some(9.0); count]),
                ..RawHourly::default()
            }),
            ..RawMarineResponse::default()
        }
    }

    #[test]
    fn test_run_assembles_dataset() {
        let retrieved_at = Utc.with_ymd_and_hms(2024, 6, 1, 6, 0, 0).unwrap();
        let raw = raw_hours(48, |h| if h % 2 == 0 { 2.0 } else { 1.0 });

        let dataset = MarinePipeline::default()
            .run_at(&raw, 32.08, 34.77, 2, retrieved_at)
            .unwrap();

        assert_eq!(dataset.hourly().len(), 48);
        assert_eq!(dataset.daily().len(), 2);
        assert_eq!(dataset.metadata().retrieved_at, retrieved_at);
        assert_eq!(dataset.metadata().forecast_days, 2);
        assert!(dataset.hourly().iter().all(|r| r.condition.is_some()));
        assert_eq!(dataset.hourly()[0].condition, Some(WaveCondition::Good));
        assert_eq!(dataset.hourly()[1].condition, Some(WaveCondition::Ok));
    }

    #[test]
    fn test_run_fails_fast_on_malformed_response() {
        let mut raw = raw_hours(24, |_| 2.0);
        if let Some(hourly) = raw.hourly.as_mut() {
            hourly.swell_wave_period = Some(vec![Some(9.0); 23]);
        }

        let result = MarinePipeline::default().run(&raw, 32.08, 34.77, 1);
        assert!(matches!(result, Err(ProcessingError::MalformedResponse(_))));
    }

    #[test]
    fn test_run_batch_preserves_order_and_isolates_failures() {
        let good = raw_hours(24, |_| 2.0);
        let broken = RawMarineResponse::default();

        let requests = vec![
            ForecastRequest::new("first", good.clone(), 32.07, 34.76, 1),
            ForecastRequest::new("broken", broken, 32.06, 34.75, 1),
            ForecastRequest::new("third", good, 32.12, 34.78, 1),
        ];

        let results = MarinePipeline::default()
            .with_max_workers(2)
            .run_batch(&requests)
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().metadata().latitude, 32.07);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().metadata().latitude, 32.12);
    }

    #[test]
    fn test_batch_pool_is_reused() {
        let requests = vec![ForecastRequest::new("only", raw_hours(24, |_| 2.0), 32.07, 34.76, 1)];
        let pipeline = MarinePipeline::default().with_max_workers(2);

        pipeline.run_batch(&requests).unwrap();
        let first = pipeline.thread_pool().unwrap();
        pipeline.run_batch(&requests).unwrap();

        assert!(Arc::ptr_eq(&first, &pipeline.thread_pool().unwrap()));
        assert_eq!(first.current_num_threads(), 2);
    }

    #[test]
    fn test_batch_runs_on_supplied_pool() {
        let pool = Arc::new(rayon::ThreadPoolBuilder::new().num_threads(3).build().unwrap());
        let pipeline = MarinePipeline::default().with_thread_pool(Arc::clone(&pool));

        let requests = vec![ForecastRequest::new("only", raw_hours(24, |_| 2.0), 32.07, 34.76, 1)];
        let results = pipeline.run_batch(&requests).unwrap();

        assert!(results[0].is_ok());
        assert!(Arc::ptr_eq(&pool, &pipeline.thread_pool().unwrap()));
    }
}
