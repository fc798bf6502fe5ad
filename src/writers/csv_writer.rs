use crate::error::{ProcessingError, Result};
use crate::models::{MarineDataset, RawMarineResponse, HOURLY_PARAMETERS};
use crate::utils::constants::{
    DAILY_SUMMARY_SHEET, METADATA_SHEET, PROCESSED_HOURLY_SHEET, RAW_HOURLY_SHEET,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
struct ProcessedHourlyRow<'a> {
    date: String,
    hour: u32,
    timestamp: String,
    wave_height: Option<f64>,
    wave_direction: Option<f64>,
    wind_wave_height: Option<f64>,
    wind_wave_direction: Option<f64>,
    swell_wave_height: Option<f64>,
    swell_wave_direction: Option<f64>,
    swell_wave_period: Option<f64>,
    wave_condition: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DailySummaryRow<'a> {
    date: String,
    wave_height_max: Option<f64>,
    wave_height_min: Option<f64>,
    wave_height_avg: Option<f64>,
    swell_height_max: Option<f64>,
    swell_height_min: Option<f64>,
    swell_height_avg: Option<f64>,
    swell_period_max: Option<f64>,
    swell_period_min: Option<f64>,
    swell_period_avg: Option<f64>,
    hour_count: usize,
    good_conditions_hours: usize,
    ok_conditions_hours: usize,
    bad_conditions_hours: usize,
    best_condition: &'a str,
}

/// Paths of the sheets written for one dataset.
#[derive(Debug, Clone)]
pub struct SheetPaths {
    pub raw_hourly: Option<PathBuf>,
    pub processed_hourly: PathBuf,
    pub daily_summary: PathBuf,
    pub metadata: PathBuf,
}

/// Lays a dataset out as a directory of CSV sheets.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_all(
        &self,
        dataset: &MarineDataset,
        raw: Option<&RawMarineResponse>,
        dir: &Path,
    ) -> Result<SheetPaths> {
        fs::create_dir_all(dir)?;

        let raw_hourly = match raw {
            Some(raw) => {
                let path = dir.join(RAW_HOURLY_SHEET);
                self.write_raw_hourly(raw, &path)?;
                Some(path)
            }
            None => None,
        };

        let processed_hourly = dir.join(PROCESSED_HOURLY_SHEET);
        self.write_processed_hourly(dataset, &processed_hourly)?;

        let daily_summary = dir.join(DAILY_SUMMARY_SHEET);
        self.write_daily_summary(dataset, &daily_summary)?;

        let metadata = dir.join(METADATA_SHEET);
        self.write_metadata(dataset, &metadata)?;

        info!(dir = %dir.display(), "wrote CSV sheets");
        Ok(SheetPaths {
            raw_hourly,
            processed_hourly,
            daily_summary,
            metadata,
        })
    }

    /// Raw arrays as delivered: `time` plus whichever parameters were present.
    pub fn write_raw_hourly(&self, raw: &RawMarineResponse, path: &Path) -> Result<()> {
        let hourly = raw.hourly.as_ref().ok_or_else(|| {
            ProcessingError::MissingData("raw response has no hourly section".to_string())
        })?;
        let times = hourly.time.as_deref().unwrap_or_default();
        let columns: Vec<&str> = HOURLY_PARAMETERS
            .into_iter()
            .filter(|name| hourly.parameter(name).is_some())
            .collect();

        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec!["time"];
        header.extend(columns.iter().copied());
        writer.write_record(&header)?;

        for (index, time) in times.iter().enumerate() {
            let mut row = vec![time.clone()];
            row.extend(columns.iter().map(|name| {
                hourly
                    .value(name, index)
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            }));
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_processed_hourly(&self, dataset: &MarineDataset, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        for record in dataset.hourly() {
            writer.serialize(ProcessedHourlyRow {
                date: record.date().to_string(),
                hour: record.hour(),
                timestamp: record.timestamp.format("%Y-%m-%dT%H:%M").to_string(),
                wave_height: record.wave_height,
                wave_direction: record.wave_direction,
                wind_wave_height: record.wind_wave_height,
                wind_wave_direction: record.wind_wave_direction,
                swell_wave_height: record.swell_wave_height,
                swell_wave_direction: record.swell_wave_direction,
                swell_wave_period: record.swell_wave_period,
                wave_condition: record.condition.map(|c| c.as_str()),
            })?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_daily_summary(&self, dataset: &MarineDataset, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        for day in dataset.daily() {
            writer.serialize(DailySummaryRow {
                date: day.date.to_string(),
                wave_height_max: day.wave_height_max(),
                wave_height_min: day.wave_height_min(),
                wave_height_avg: day.wave_height_avg(),
                swell_height_max: day.swell_height_max(),
                swell_height_min: day.swell_height_min(),
                swell_height_avg: day.swell_height_avg(),
                swell_period_max: day.swell_period_max(),
                swell_period_min: day.swell_period_min(),
                swell_period_avg: day.swell_period_avg(),
                hour_count: day.hour_count,
                good_conditions_hours: day.condition_counts.good,
                ok_conditions_hours: day.condition_counts.ok,
                bad_conditions_hours: day.condition_counts.bad,
                best_condition: day.best_condition().as_str(),
            })?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_metadata(&self, dataset: &MarineDataset, path: &Path) -> Result<()> {
        let metadata = dataset.metadata();
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(["Parameter", "Value"])?;
        writer.write_record(["Latitude", &metadata.latitude.to_string()])?;
        writer.write_record(["Longitude", &metadata.longitude.to_string()])?;
        writer.write_record([
            "Data_Collection_Date",
            &metadata.retrieved_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ])?;
        writer.write_record(["Forecast_Length_Days", &metadata.forecast_days.to_string()])?;

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
