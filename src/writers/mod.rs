pub mod csv_writer;
pub mod json_writer;
pub mod parquet_writer;

pub use csv_writer::{CsvWriter, SheetPaths};
pub use json_writer::{JsonWriter, MarineExport};
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
