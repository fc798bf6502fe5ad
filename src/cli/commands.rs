use crate::analyzers::ConditionAnalyzer;
use crate::cli::args::{Cli, Commands, OutputFormat};
use crate::error::ProcessingError;
use crate::models::{
    all_presets, comparison_presets, find_preset, RawMarineResponse, WaveCondition,
    COMPARISON_BEACHES,
};
use crate::processors::{ConditionClassifier, ForecastRequest, MarinePipeline};
use crate::readers::ResponseParser;
use crate::settings::ThresholdConfig;
use crate::utils::filename::{with_extension, with_suffix};
use crate::utils::{
    compass_point, generate_default_output_stem, nearest_preset, validate_coordinates,
    ProgressReporter, DEFAULT_LATITUDE, DEFAULT_LONGITUDE, MAX_FORECAST_DAYS,
};
use crate::writers::{CsvWriter, JsonWriter, ParquetWriter};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{info, warn};
use validator::Validate;

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Process {
            input,
            beach,
            latitude,
            longitude,
            forecast_days,
            output_stem,
            thresholds,
            compression,
            formats,
            quiet,
        } => {
            let (label, latitude, longitude) =
                resolve_location(beach.as_deref(), latitude, longitude)?;
            if !(1..=MAX_FORECAST_DAYS).contains(&forecast_days) {
                bail!(
                    "forecast days must be between 1 and {}, got {}",
                    MAX_FORECAST_DAYS,
                    forecast_days
                );
            }

            let classifier = load_classifier(thresholds.as_deref())?;
            let raw = read_raw(&input).await?;
            info!(input = %input.display(), location = %label, "processing marine forecast");

            let progress = ProgressReporter::new_spinner("Processing marine forecast...", quiet);
            let pipeline = MarinePipeline::new(classifier);
            let task_raw = raw.clone();
            let dataset = tokio::task::spawn_blocking(move || {
                pipeline.run(&task_raw, latitude, longitude, forecast_days)
            })
            .await
            .context("processing task failed")?
            .with_context(|| {
                format!(
                    "processing {} for {} ({}, {})",
                    input.display(),
                    label,
                    latitude,
                    longitude
                )
            })?;

            dataset
                .metadata()
                .validate()
                .context("dataset metadata out of range")?;

            if let Some((start, end)) = dataset.date_range() {
                progress.set_message(&format!("Writing outputs for {} to {}...", start, end));
            }

            let stem = output_stem.unwrap_or_else(generate_default_output_stem);
            if let Some(parent) = stem.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }

            let mut written = Vec::new();
            for format in [OutputFormat::Json, OutputFormat::Csv, OutputFormat::Parquet] {
                if !formats.contains(&format) {
                    continue;
                }
                match format {
                    OutputFormat::Json => {
                        let path = with_extension(&stem, "json");
                        JsonWriter::new().write(&dataset, Some(&raw), &path)?;
                        written.push(path);
                    }
                    OutputFormat::Csv => {
                        CsvWriter::new().write_all(&dataset, Some(&raw), &stem)?;
                        written.push(stem.clone());
                    }
                    OutputFormat::Parquet => {
                        let writer = ParquetWriter::new().with_compression(&compression)?;
                        let hourly_path = with_suffix(&stem, "hourly", "parquet");
                        let daily_path = with_suffix(&stem, "daily", "parquet");
                        writer.write_hourly(dataset.hourly(), &hourly_path)?;
                        writer.write_daily(dataset.daily(), &daily_path)?;
                        written.push(hourly_path);
                        written.push(daily_path);
                    }
                }
            }

            progress.finish_with_message(&format!(
                "Processed {} hours into {} days",
                dataset.hourly().len(),
                dataset.daily().len()
            ));

            if !quiet {
                println!("\n{}", ConditionAnalyzer::new().detailed_summary(&dataset));
                println!("Written:");
                for path in &written {
                    println!("  {}", path.display());
                }
            }
        }

        Commands::Classify {
            wave_height,
            swell_height,
            swell_period,
            thresholds,
        } => {
            let classifier = load_classifier(thresholds.as_deref())?;
            let condition = classifier.classify(wave_height, swell_height, swell_period);

            println!("Wave height:  {}", describe(wave_height, "m"));
            println!("Swell height: {}", describe(swell_height, "m"));
            println!("Swell period: {}", describe(swell_period, "s"));
            println!("Condition:    {}", condition);
        }

        Commands::Summary {
            input,
            heatmap,
            directions,
        } => {
            let dataset = JsonWriter::new()
                .read_dataset(&input)
                .with_context(|| format!("reading export {}", input.display()))?;
            let analyzer = ConditionAnalyzer::new();

            println!("{}", analyzer.detailed_summary(&dataset));

            if heatmap {
                println!("Hourly conditions (G = Good, O = OK, B = Bad, . = no data)");
                println!("{:<10} {}", "", "0         1         2   ");
                println!("{:<10} {}", "", "012345678901234567890123");
                for row in analyzer.heatmap(&dataset) {
                    let cells: String = row
                        .hours
                        .iter()
                        .map(|condition| match condition {
                            Some(WaveCondition::Good) => 'G',
                            Some(WaveCondition::Ok) => 'O',
                            Some(WaveCondition::Bad) => 'B',
                            None => '.',
                        })
                        .collect();
                    println!("{} {}", row.date, cells);
                }
                println!();
            }

            if directions {
                let histogram = analyzer.direction_histogram(dataset.hourly());
                println!("Wave directions ({} hours)", histogram.total());
                for (sector, count) in histogram.bins.iter().enumerate() {
                    println!("  {:<4} {:>4}", compass_point(sector as f64 * 22.5), count);
                }
                if let Some(dominant) = histogram.dominant() {
                    println!("Dominant direction: {}", dominant);
                }
            }
        }

        Commands::Compare {
            input_dir,
            date,
            forecast_days,
            thresholds,
            max_workers,
        } => {
            let classifier = load_classifier(thresholds.as_deref())?;

            let mut requests = Vec::new();
            for preset in comparison_presets() {
                let path = input_dir.join(format!("{}.json", preset.key));
                if !path.exists() {
                    warn!(beach = %preset.name, path = %path.display(), "no response file, skipping");
                    continue;
                }
                let raw = read_raw(&path).await?;
                requests.push(ForecastRequest::new(
                    preset.name.clone(),
                    raw,
                    preset.latitude,
                    preset.longitude,
                    forecast_days,
                ));
            }

            if requests.is_empty() {
                bail!("no beach responses found in {}", input_dir.display());
            }

            let progress = ProgressReporter::new_spinner(
                &format!("Processing {} beaches...", requests.len()),
                false,
            );
            let labels: Vec<String> = requests.iter().map(|r| r.label.clone()).collect();
            let pipeline = MarinePipeline::new(classifier).with_max_workers(max_workers);
            let results = tokio::task::spawn_blocking(move || pipeline.run_batch(&requests))
                .await
                .map_err(ProcessingError::from)??;
            progress.finish_with_message("Processing complete");

            let mut datasets = Vec::new();
            for (label, result) in labels.into_iter().zip(results) {
                match result {
                    Ok(dataset) => datasets.push((label, dataset)),
                    Err(e) => warn!(beach = %label, error = %e, "skipping beach"),
                }
            }

            let date = match date {
                Some(date) => date,
                None => datasets
                    .iter()
                    .find_map(|(_, dataset)| dataset.date_range().map(|(start, _)| start))
                    .context("no forecast dates available to compare")?,
            };

            let analyzer = ConditionAnalyzer::new();
            println!("\nBeach comparison for {}", date);
            println!(
                "{:<20} {:>8} {:>8} {:>8} {:>8} {:>10} {:>8} {:>6} {:>6} {:>6}",
                "Beach", "MinWave", "AvgWave", "MaxWave", "Range", "AvgSwell", "Period", "Good",
                "OK", "Best"
            );
            let mut rows = Vec::new();
            for (label, dataset) in &datasets {
                match analyzer.compare(label, dataset, date) {
                    Some(row) => {
                        println!(
                            "{:<20} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>10.2} {:>8} {:>6} {:>6} {:>6}",
                            row.beach,
                            row.min_wave,
                            row.avg_wave,
                            row.max_wave,
                            row.wave_range,
                            row.avg_swell,
                            row.avg_period
                                .map_or_else(|| "-".to_string(), |p| format!("{:.1}", p)),
                            row.good_hours,
                            row.ok_hours,
                            row.best_time.as_deref().unwrap_or("-"),
                        );
                        rows.push(row);
                    }
                    None => println!("{:<20} no wave data for {}", label, date),
                }
            }

            if let Some(best) = analyzer.best_beach(&rows) {
                println!(
                    "\nBest beach for the day: {} (score {:.2}, {} Good / {} OK hours, best time {})",
                    best.beach,
                    best.score(),
                    best.good_hours,
                    best.ok_hours,
                    best.best_time.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Presets => {
            println!(
                "{:<18} {:<22} {:>10} {:>10}",
                "Key", "Name", "Latitude", "Longitude"
            );
            for preset in all_presets() {
                let marker = if COMPARISON_BEACHES.contains(&preset.key.as_str()) {
                    " *"
                } else {
                    ""
                };
                println!(
                    "{:<18} {:<22} {:>10.4} {:>10.4}{}",
                    preset.key, preset.name, preset.latitude, preset.longitude, marker
                );
            }
            println!("\n* included in `compare`");
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer
                .get_file_info(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            println!("\n{}", file_info.summary());

            let is_hourly = file_info.columns.first().map(String::as_str) == Some("timestamp");
            if sample > 0 && is_hourly {
                println!("\nSample Records (showing up to {} records):", sample);
                for (i, record) in writer.read_hourly(&file, sample)?.iter().enumerate() {
                    println!(
                        "{}. {}: wave={}, swell={}, period={} ({})",
                        i + 1,
                        record.timestamp.format("%Y-%m-%d %H:%M"),
                        describe(record.wave_height, "m"),
                        describe(record.swell_wave_height, "m"),
                        describe(record.swell_wave_period, "s"),
                        record.condition.map_or("unrated", |c| c.as_str())
                    );
                }
            }
        }
    }

    Ok(())
}

/// Preset by name, else explicit or default coordinates.
fn resolve_location(
    beach: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(String, f64, f64)> {
    if let Some(query) = beach {
        let preset = find_preset(query)?;
        return Ok((preset.name, preset.latitude, preset.longitude));
    }

    let latitude = latitude.unwrap_or(DEFAULT_LATITUDE);
    let longitude = longitude.unwrap_or(DEFAULT_LONGITUDE);
    validate_coordinates(latitude, longitude)?;

    let label = match nearest_preset(&all_presets(), latitude, longitude) {
        Some((preset, km)) if km < 1.0 => preset.name.clone(),
        _ => format!("{:.4}, {:.4}", latitude, longitude),
    };
    Ok((label, latitude, longitude))
}

fn load_classifier(path: Option<&Path>) -> Result<ConditionClassifier> {
    let thresholds = ThresholdConfig::load(path).with_context(|| match path {
        Some(path) => format!("loading thresholds from {}", path.display()),
        None => "loading thresholds".to_string(),
    })?;
    Ok(ConditionClassifier::new(thresholds))
}

async fn read_raw(path: &Path) -> Result<RawMarineResponse> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let raw = ResponseParser::new()
        .decode(&content)
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(raw)
}

fn describe(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.2}{}", v, unit),
        None => "n/a".to_string(),
    }
}
