pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{compass_point, haversine_distance, nearest_preset, validate_coordinates};
pub use filename::generate_default_output_stem;
pub use progress::ProgressReporter;
