use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

use crate::utils::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_STEM};

/// Default output stem: output/marine_weather_data-{YYMMDD}
pub fn generate_default_output_stem() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100;
    let month = now.month();
    let day = now.day();

    let filename = format!("{}-{:02}{:02}{:02}", DEFAULT_OUTPUT_STEM, year, month, day);
    PathBuf::from(DEFAULT_OUTPUT_DIR).join(filename)
}

/// `stem` with `extension` appended, e.g. `out/data` -> `out/data.json`.
pub fn with_extension(stem: &Path, extension: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

/// `stem` with a suffix and extension, e.g. `out/data` -> `out/data_daily.parquet`.
pub fn with_suffix(stem: &Path, suffix: &str, extension: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_owned();
    path.push("_");
    path.push(suffix);
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_output_stem() {
        let stem = generate_default_output_stem();
        let stem_str = stem.to_string_lossy();

        assert!(stem_str.starts_with("output/"));
        assert!(stem_str.contains("marine_weather_data-"));

        let parts: Vec<&str> = stem_str.split('/').collect();
        assert_eq!(parts.len(), 2);
        // marine_weather_data- plus YYMMDD
        assert_eq!(parts[1].len(), DEFAULT_OUTPUT_STEM.len() + 7);
    }

    #[test]
    fn test_extension_helpers() {
        let stem = PathBuf::from("out/beach.v2");
        assert_eq!(with_extension(&stem, "json"), PathBuf::from("out/beach.v2.json"));
        assert_eq!(
            with_suffix(&stem, "daily", "parquet"),
            PathBuf::from("out/beach.v2_daily.parquet")
        );
    }
}
