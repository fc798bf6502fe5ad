/// Default query point (Tel Aviv coast)
pub const DEFAULT_LATITUDE: f64 = 32.08;
pub const DEFAULT_LONGITUDE: f64 = 34.77;

/// Forecast length
pub const DEFAULT_FORECAST_DAYS: u32 = 7;
pub const MAX_FORECAST_DAYS: u32 = 16;

/// Environment prefix for threshold overrides
pub const ENV_PREFIX: &str = "MARINE";

/// Output names
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_OUTPUT_STEM: &str = "marine_weather_data";
pub const RAW_HOURLY_SHEET: &str = "raw_hourly.csv";
pub const PROCESSED_HOURLY_SHEET: &str = "processed_hourly.csv";
pub const DAILY_SUMMARY_SHEET: &str = "daily_summary.csv";
pub const METADATA_SHEET: &str = "metadata.csv";

/// Swell period above which an hour earns a ranking bonus
pub const BEST_HOUR_PERIOD_BONUS_MIN: f64 = 7.0;
pub const BEST_HOUR_PERIOD_BONUS: f64 = 0.5;

/// Beach ranking: per-term caps and the period that earns no credit
pub const BEACH_WAVE_SCORE_CAP: f64 = 3.0;
pub const BEACH_SWELL_SCORE_CAP: f64 = 2.0;
pub const BEACH_PERIOD_BASELINE: f64 = 5.0;

/// Parquet defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
