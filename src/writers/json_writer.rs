use crate::error::Result;
use crate::models::{DailySummary, DatasetMetadata, HourlyRecord, MarineDataset, RawMarineResponse};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// On-disk JSON document: the untouched API payload next to the processed
/// hourly records, the daily summaries and the query metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarineExport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<RawMarineResponse>,
    pub processed_data: Vec<HourlyRecord>,
    pub daily_summary: Vec<DailySummary>,
    pub metadata: DatasetMetadata,
}

impl MarineExport {
    pub fn from_dataset(dataset: &MarineDataset, raw: Option<&RawMarineResponse>) -> Self {
        Self {
            raw_data: raw.cloned(),
            processed_data: dataset.hourly().to_vec(),
            daily_summary: dataset.daily().to_vec(),
            metadata: dataset.metadata().clone(),
        }
    }

    pub fn into_dataset(self) -> MarineDataset {
        MarineDataset::new(self.processed_data, self.daily_summary, self.metadata)
    }
}

pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn to_string(
        &self,
        dataset: &MarineDataset,
        raw: Option<&RawMarineResponse>,
    ) -> Result<String> {
        let export = MarineExport::from_dataset(dataset, raw);
        let json = if self.pretty {
            serde_json::to_string_pretty(&export)?
        } else {
            serde_json::to_string(&export)?
        };
        Ok(json)
    }

    pub fn write(
        &self,
        dataset: &MarineDataset,
        raw: Option<&RawMarineResponse>,
        path: &Path,
    ) -> Result<()> {
        let export = MarineExport::from_dataset(dataset, raw);
        let mut writer = BufWriter::new(File::create(path)?);

        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, &export)?;
        } else {
            serde_json::to_writer(&mut writer, &export)?;
        }
        writer.flush()?;

        info!(path = %path.display(), hours = dataset.hourly().len(), "wrote JSON export");
        Ok(())
    }

    pub fn read(&self, path: &Path) -> Result<MarineExport> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn read_dataset(&self, path: &Path) -> Result<MarineDataset> {
        Ok(self.read(path)?.into_dataset())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
