pub mod condition_analyzer;

pub use condition_analyzer::{
    BeachComparison, BestHour, ConditionAnalyzer, ConditionDistribution, DirectionHistogram,
    HeatmapRow,
};
