use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marine-processor")]
#[command(about = "Rates surf conditions from Open-Meteo marine forecasts and builds daily summaries")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Parquet,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process a saved marine forecast response into rated hours and daily summaries
    Process {
        #[arg(short, long, help = "Raw Open-Meteo marine response (JSON)")]
        input: PathBuf,

        #[arg(short, long, help = "Beach preset name; overrides --latitude/--longitude")]
        beach: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        latitude: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        longitude: Option<f64>,

        #[arg(long, default_value_t = crate::utils::DEFAULT_FORECAST_DAYS)]
        forecast_days: u32,

        #[arg(
            short,
            long,
            help = "Output path stem [default: output/marine_weather_data-{YYMMDD}]"
        )]
        output_stem: Option<PathBuf>,

        #[arg(short, long, help = "Threshold configuration file (TOML, YAML or JSON)")]
        thresholds: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, value_enum, value_delimiter = ',', default_value = "json,csv,parquet")]
        formats: Vec<OutputFormat>,

        #[arg(short, long, help = "Suppress the spinner and the printed summary")]
        quiet: bool,
    },

    /// Rate a single hour from its measurements
    Classify {
        #[arg(long)]
        wave_height: Option<f64>,

        #[arg(long)]
        swell_height: Option<f64>,

        #[arg(long)]
        swell_period: Option<f64>,

        #[arg(short, long)]
        thresholds: Option<PathBuf>,
    },

    /// Print the condition summary of a processed JSON export
    Summary {
        #[arg(short, long, help = "JSON export written by `process`")]
        input: PathBuf,

        #[arg(long, help = "Include the hour-by-hour condition grid")]
        heatmap: bool,

        #[arg(long, help = "Include the wave direction histogram")]
        directions: bool,
    },

    /// Compare the preset beaches on one date
    Compare {
        #[arg(
            short,
            long,
            help = "Directory holding one raw response per beach, named <preset>.json"
        )]
        input_dir: PathBuf,

        #[arg(short, long, help = "Date to compare [default: first forecast date]")]
        date: Option<NaiveDate>,

        #[arg(long, default_value_t = crate::utils::DEFAULT_FORECAST_DAYS)]
        forecast_days: u32,

        #[arg(short, long)]
        thresholds: Option<PathBuf>,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// List the beach presets
    Presets,

    /// Display information about a Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10", help = "Hourly rows to print")]
        sample: usize,
    },
}
