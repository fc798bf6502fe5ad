pub mod classifier;
pub mod daily_aggregator;
pub mod pipeline;

pub use classifier::ConditionClassifier;
pub use daily_aggregator::DailyAggregator;
pub use pipeline::{ForecastRequest, MarinePipeline};
