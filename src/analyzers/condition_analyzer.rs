use crate::models::{ConditionCounts, HourlyRecord, MarineDataset, WaveCondition};
use crate::utils::constants::{
    BEACH_PERIOD_BASELINE, BEACH_SWELL_SCORE_CAP, BEACH_WAVE_SCORE_CAP, BEST_HOUR_PERIOD_BONUS,
    BEST_HOUR_PERIOD_BONUS_MIN,
};
use crate::utils::coordinates::{compass_point, compass_sector};
use chrono::NaiveDate;

/// Share of Good / OK / Bad hours across a whole dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionDistribution {
    pub counts: ConditionCounts,
}

impl ConditionDistribution {
    pub fn total_hours(&self) -> usize {
        self.counts.total()
    }

    pub fn percentage(&self, condition: WaveCondition) -> f64 {
        let total = self.total_hours();
        if total == 0 {
            0.0
        } else {
            100.0 * self.counts.get(condition) as f64 / total as f64
        }
    }
}

/// Highest-ranked hour of one day.
#[derive(Debug, Clone, PartialEq)]
pub struct BestHour {
    pub date: NaiveDate,
    pub hour: u32,
    pub condition: WaveCondition,
    pub score: f64,
}

impl BestHour {
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

/// Hourly wave direction counts over 16 compass sectors starting at north.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionHistogram {
    pub bins: [usize; 16],
}

impl DirectionHistogram {
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// Most frequent sector, `None` when no direction was reported.
    pub fn dominant(&self) -> Option<&'static str> {
        if self.total() == 0 {
            return None;
        }
        let (index, _) = self
            .bins
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))?;
        Some(compass_point(index as f64 * 22.5))
    }
}

/// One row of the date x hour condition grid; `None` where no hour exists.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapRow {
    pub date: NaiveDate,
    pub hours: [Option<WaveCondition>; 24],
}

/// Side-by-side figures for one beach on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct BeachComparison {
    pub beach: String,
    pub date: NaiveDate,
    pub min_wave: f64,
    pub avg_wave: f64,
    pub max_wave: f64,
    pub wave_range: f64,
    pub avg_swell: f64,
    pub max_swell: f64,
    pub avg_period: Option<f64>,
    pub good_hours: usize,
    pub ok_hours: usize,
    pub best_time: Option<String>,
}

impl BeachComparison {
    /// Ranking score used to pick the best beach of the day. Wave size is
    /// capped at 3 and swell quality at 2; a full day of Good hours adds 4.
    ///
    /// A day without swell period data gets no period credit.
    pub fn score(&self) -> f64 {
        let wave = (self.avg_wave * 2.0).min(BEACH_WAVE_SCORE_CAP);
        let period = self
            .avg_period
            .map_or(0.0, |p| (p - BEACH_PERIOD_BASELINE) * 0.1);
        let swell = (self.avg_swell * 1.5 + period).min(BEACH_SWELL_SCORE_CAP);
        let hours = (self.good_hours * 2 + self.ok_hours) as f64 / 24.0 * 2.0;
        wave + swell + hours
    }
}

pub struct ConditionAnalyzer;

impl ConditionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn distribution(&self, dataset: &MarineDataset) -> ConditionDistribution {
        ConditionDistribution {
            counts: dataset.total_condition_counts(),
        }
    }

    /// Score of an hour: the condition's base score, plus a bonus when the
    /// swell period is above the bonus threshold.
    pub fn hour_score(&self, record: &HourlyRecord) -> f64 {
        let base = record.condition.map_or(WaveCondition::Bad.score(), |c| c.score());
        match record.swell_wave_period {
            Some(period) if period > BEST_HOUR_PERIOD_BONUS_MIN => base + BEST_HOUR_PERIOD_BONUS,
            _ => base,
        }
    }

    /// Best hour of `date`; the earliest wins ties.
    pub fn best_hour(&self, dataset: &MarineDataset, date: NaiveDate) -> Option<BestHour> {
        let mut best: Option<BestHour> = None;
        for record in dataset.hours_on(date) {
            let score = self.hour_score(record);
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(BestHour {
                    date,
                    hour: record.hour(),
                    condition: record.condition.unwrap_or(WaveCondition::Bad),
                    score,
                });
            }
        }
        best
    }

    pub fn best_hours(&self, dataset: &MarineDataset) -> Vec<BestHour> {
        dataset
            .daily()
            .iter()
            .filter_map(|day| self.best_hour(dataset, day.date))
            .collect()
    }

    pub fn direction_histogram<'a, I>(&self, records: I) -> DirectionHistogram
    where
        I: IntoIterator<Item = &'a HourlyRecord>,
    {
        let mut bins = [0usize; 16];
        for direction in records.into_iter().filter_map(|r| r.wave_direction) {
            if direction.is_finite() {
                bins[compass_sector(direction)] += 1;
            }
        }
        DirectionHistogram { bins }
    }

    pub fn heatmap(&self, dataset: &MarineDataset) -> Vec<HeatmapRow> {
        dataset
            .daily()
            .iter()
            .map(|day| {
                let mut hours = [None; 24];
                for record in dataset.hours_on(day.date) {
                    if let Some(slot) = hours.get_mut(record.hour() as usize) {
                        *slot = record.condition;
                    }
                }
                HeatmapRow {
                    date: day.date,
                    hours,
                }
            })
            .collect()
    }

    /// Comparison row for `beach` on `date`; `None` without wave and swell data that day.
    pub fn compare(
        &self,
        beach: &str,
        dataset: &MarineDataset,
        date: NaiveDate,
    ) -> Option<BeachComparison> {
        let day = dataset.day(date)?;
        let wave = day.wave_height?;
        let swell = day.swell_height?;

        Some(BeachComparison {
            beach: beach.to_string(),
            date,
            min_wave: wave.min,
            avg_wave: wave.avg,
            max_wave: wave.max,
            wave_range: wave.range(),
            avg_swell: swell.avg,
            max_swell: swell.max,
            avg_period: day.swell_period_avg(),
            good_hours: day.condition_counts.good,
            ok_hours: day.condition_counts.ok,
            best_time: self.best_hour(dataset, date).map(|b| b.label()),
        })
    }

    /// Highest-scoring beach; the first listed wins ties.
    pub fn best_beach<'a>(&self, rows: &'a [BeachComparison]) -> Option<&'a BeachComparison> {
        let mut best: Option<&BeachComparison> = None;
        for row in rows {
            if best.map_or(true, |b| row.score() > b.score()) {
                best = Some(row);
            }
        }
        best
    }

    pub fn detailed_summary(&self, dataset: &MarineDataset) -> String {
        let metadata = dataset.metadata();
        let distribution = self.distribution(dataset);

        let mut lines = vec![
            "=== Marine Weather Data Summary ===".to_string(),
            format!("Location: {}, {}", metadata.latitude, metadata.longitude),
            format!("Data collected for {} days", dataset.daily().len()),
            String::new(),
            "=== Overall Condition Distribution ===".to_string(),
            format!("Total Hours: {}", distribution.total_hours()),
        ];
        lines.extend(WaveCondition::ALL.into_iter().map(|condition| {
            format!(
                "{}: {} hours ({:.1}%)",
                condition,
                distribution.counts.get(condition),
                distribution.percentage(condition)
            )
        }));

        for day in dataset.daily() {
            lines.push(String::new());
            lines.push(format!("{}:", day.date));
            if let Some(wave) = day.wave_height {
                lines.push(format!("  Max Wave Height: {:.2}m", wave.max));
                lines.push(format!("  Avg Wave Height: {:.2}m", wave.avg));
            }
            if let Some(max_swell) = day.swell_height_max() {
                lines.push(format!("  Max Swell Height: {:.2}m", max_swell));
            }
            if let Some(avg_period) = day.swell_period_avg() {
                lines.push(format!("  Avg Swell Period: {:.1}s", avg_period));
            }
            lines.push(format!(
                "  Wave Conditions: {} Good, {} OK, {} Bad",
                day.condition_counts.good, day.condition_counts.ok, day.condition_counts.bad
            ));
            if let Some(best) = self.best_hour(dataset, day.date) {
                lines.push(format!("  Best Time: {} ({})", best.label(), best.condition));
            }
            lines.push(format!("  Overall Rating: {}", day.best_condition()));
        }

        lines.push(String::new());
        lines.join("\n")
    }
}

impl Default for ConditionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
