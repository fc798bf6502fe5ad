use crate::error::{ProcessingError, Result};
use crate::models::BeachPreset;

/// Reject coordinates outside the globe.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Latitude {} is outside [-90, 90]",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Longitude {} is outside [-180, 180]",
            longitude
        )));
    }

    Ok(())
}

/// Calculate the distance between two points using the Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Closest preset to a query point, with its distance in km.
pub fn nearest_preset(
    presets: &[BeachPreset],
    latitude: f64,
    longitude: f64,
) -> Option<(&BeachPreset, f64)> {
    presets
        .iter()
        .map(|p| {
            (
                p,
                haversine_distance(latitude, longitude, p.latitude, p.longitude),
            )
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// 16-point compass label for a bearing in degrees.
pub fn compass_point(degrees: f64) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    POINTS[compass_sector(degrees)]
}

/// Index of the 22.5° sector holding `degrees`, sectors starting at 0°.
pub fn compass_sector(degrees: f64) -> usize {
    let normalized = degrees.rem_euclid(360.0);
    ((normalized / 22.5) as usize).min(15)
}
