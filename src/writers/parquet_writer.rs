use crate::error::{ProcessingError, Result};
use crate::models::{DailySummary, HourlyRecord, WaveCondition};
use crate::readers::parse_timestamp;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    fn properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }

    fn write_batch(&self, batch: RecordBatch, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(self.properties()))?;
        // An empty input still yields a readable file carrying the schema
        if batch.num_rows() > 0 {
            writer.write(&batch)?;
        }
        writer.close()?;
        Ok(())
    }

    /// Write hourly records; absent measurements become nulls.
    pub fn write_hourly(&self, records: &[HourlyRecord], path: &Path) -> Result<()> {
        let batch = self.hourly_to_batch(records)?;
        self.write_batch(batch, path)?;

        info!(path = %path.display(), rows = records.len(), "wrote hourly Parquet");
        Ok(())
    }

    pub fn write_daily(&self, summaries: &[DailySummary], path: &Path) -> Result<()> {
        let batch = self.daily_to_batch(summaries)?;
        self.write_batch(batch, path)?;

        info!(path = %path.display(), rows = summaries.len(), "wrote daily Parquet");
        Ok(())
    }

    fn hourly_schema() -> Arc<Schema> {
        let fields = vec![
            Field::new("timestamp", DataType::Utf8, false),
            Field::new("wave_height", DataType::Float64, true),
            Field::new("wave_direction", DataType::Float64, true),
            Field::new("wind_wave_height", DataType::Float64, true),
            Field::new("wind_wave_direction", DataType::Float64, true),
            Field::new("swell_wave_height", DataType::Float64, true),
            Field::new("swell_wave_direction", DataType::Float64, true),
            Field::new("swell_wave_period", DataType::Float64, true),
            Field::new("wave_condition", DataType::Utf8, true),
        ];

        Arc::new(Schema::new(fields))
    }

    fn daily_schema() -> Arc<Schema> {
        let fields = vec![
            Field::new("date", DataType::Date32, false),
            Field::new("wave_height_max", DataType::Float64, true),
            Field::new("wave_height_min", DataType::Float64, true),
            Field::new("wave_height_avg", DataType::Float64, true),
            Field::new("swell_height_max", DataType::Float64, true),
            Field::new("swell_height_min", DataType::Float64, true),
            Field::new("swell_height_avg", DataType::Float64, true),
            Field::new("swell_period_max", DataType::Float64, true),
            Field::new("swell_period_min", DataType::Float64, true),
            Field::new("swell_period_avg", DataType::Float64, true),
            Field::new("hour_count", DataType::UInt32, false),
            Field::new("good_hours", DataType::UInt32, false),
            Field::new("ok_hours", DataType::UInt32, false),
            Field::new("bad_hours", DataType::UInt32, false),
            Field::new("best_condition", DataType::Utf8, false),
        ];

        Arc::new(Schema::new(fields))
    }

    fn hourly_to_batch(&self, records: &[HourlyRecord]) -> Result<RecordBatch> {
        let column = |f: fn(&HourlyRecord) -> Option<f64>| -> ArrayRef {
            Arc::new(Float64Array::from(
                records.iter().map(f).collect::<Vec<Option<f64>>>(),
            ))
        };

        let timestamps: Vec<String> = records
            .iter()
            .map(|r| r.timestamp.format(TIMESTAMP_FORMAT).to_string())
            .collect();
        let conditions: Vec<Option<&str>> = records
            .iter()
            .map(|r| r.condition.map(|c| c.as_str()))
            .collect();

        let batch = RecordBatch::try_new(
            Self::hourly_schema(),
            vec![
                Arc::new(StringArray::from(timestamps)),
                column(|r| r.wave_height),
                column(|r| r.wave_direction),
                column(|r| r.wind_wave_height),
                column(|r| r.wind_wave_direction),
                column(|r| r.swell_wave_height),
                column(|r| r.swell_wave_direction),
                column(|r| r.swell_wave_period),
                Arc::new(StringArray::from(conditions)),
            ],
        )?;

        Ok(batch)
    }

    fn daily_to_batch(&self, summaries: &[DailySummary]) -> Result<RecordBatch> {
        let column = |f: fn(&DailySummary) -> Option<f64>| -> ArrayRef {
            Arc::new(Float64Array::from(
                summaries.iter().map(f).collect::<Vec<Option<f64>>>(),
            ))
        };
        let count = |f: fn(&DailySummary) -> usize| -> ArrayRef {
            Arc::new(UInt32Array::from(
                summaries.iter().map(|s| f(s) as u32).collect::<Vec<u32>>(),
            ))
        };

        let dates: Vec<i32> = summaries.iter().map(|s| days_since_epoch(s.date)).collect();
        let best: Vec<&str> = summaries
            .iter()
            .map(|s| s.best_condition().as_str())
            .collect();

        let batch = RecordBatch::try_new(
            Self::daily_schema(),
            vec![
                Arc::new(Date32Array::from(dates)),
                column(DailySummary::wave_height_max),
                column(DailySummary::wave_height_min),
                column(DailySummary::wave_height_avg),
                column(DailySummary::swell_height_max),
                column(DailySummary::swell_height_min),
                column(DailySummary::swell_height_avg),
                column(DailySummary::swell_period_max),
                column(DailySummary::swell_period_min),
                column(DailySummary::swell_period_avg),
                count(|s| s.hour_count),
                count(|s| s.condition_counts.good),
                count(|s| s.condition_counts.ok),
                count(|s| s.condition_counts.bad),
                Arc::new(StringArray::from(best)),
            ],
        )?;

        Ok(batch)
    }

    /// Read hourly records back from a file written by `write_hourly`.
    pub fn read_hourly(&self, path: &Path, limit: usize) -> Result<Vec<HourlyRecord>> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(limit.clamp(1, 8192))
            .build()?;

        let mut records = Vec::new();

        for batch_result in reader {
            let batch = batch_result?;
            let timestamps = string_column(&batch, 0, "timestamp")?;
            let floats = (1..=7)
                .map(|i| float_column(&batch, i))
                .collect::<Result<Vec<_>>>()?;
            let conditions = string_column(&batch, 8, "wave_condition")?;

            for i in 0..batch.num_rows() {
                if records.len() >= limit {
                    return Ok(records);
                }

                let value = |column: &Float64Array| {
                    if column.is_null(i) {
                        None
                    } else {
                        Some(column.value(i))
                    }
                };

                let mut record = HourlyRecord::empty(parse_timestamp(timestamps.value(i))?);
                record.wave_height = value(floats[0]);
                record.wave_direction = value(floats[1]);
                record.wind_wave_height = value(floats[2]);
                record.wind_wave_direction = value(floats[3]);
                record.swell_wave_height = value(floats[4]);
                record.swell_wave_direction = value(floats[5]);
                record.swell_wave_period = value(floats[6]);
                record.condition = if conditions.is_null(i) {
                    None
                } else {
                    WaveCondition::parse(conditions.value(i))
                };
                records.push(record);
            }
        }

        Ok(records)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();
        let columns = metadata
            .file_metadata()
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            columns,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days() as i32
}

fn string_column<'a>(batch: &'a RecordBatch, index: usize, name: &str) -> Result<&'a StringArray> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| ProcessingError::Config(format!("Invalid {} column type", name)))
}

fn float_column(batch: &RecordBatch, index: usize) -> Result<&Float64Array> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| {
            ProcessingError::Config(format!(
                "Invalid {} column type",
                batch.schema().field(index).name()
            ))
        })
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub columns: Vec<String>,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - Columns: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.columns.join(", "),
            self.file_size as f64 / 1024.0,
            self.compression,
            avg_rows
        )
    }
}
