pub mod beach;
pub mod daily;
pub mod dataset;
pub mod hourly;
pub mod raw_response;

pub use beach::{all_presets, comparison_presets, find_preset, BeachPreset, COMPARISON_BEACHES};
pub use daily::{ConditionCounts, DailySummary, FieldStats};
pub use dataset::{DatasetMetadata, MarineDataset};
pub use hourly::{HourlyRecord, HourlyRecordBuilder, WaveCondition};
pub use raw_response::{RawHourly, RawMarineResponse, HOURLY_PARAMETERS};
