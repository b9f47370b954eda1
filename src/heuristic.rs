use crate::common::{City, Position};

/// Mean Earth diameter used by the great-circle estimate.
pub const EARTH_DIAMETER: f64 = 12742.0;

/// Estimate of the remaining cost from a city to the goal.
pub trait Heuristic {
    fn estimate(&self, from: &City, goal: &City) -> f64;
}

/// Uses the heuristic value precomputed on each city.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectHeuristic;

impl Heuristic for DirectHeuristic {
    fn estimate(&self, from: &City, _goal: &City) -> f64 {
        match from.position {
            Position::Heuristic(value) => value as f64,
            Position::Coordinates { .. } => 0.0,
        }
    }
}

/// Great-circle distance scaled by `scaling_factor`.
///
/// A factor of 1.0 is admissible when edge weights are at least the
/// great-circle distance between their endpoints. Larger factors expand
/// fewer nodes but may return a more expensive route.
#[derive(Debug, Clone, Copy)]
pub struct GeodesicHeuristic {
    pub scaling_factor: f64,
}

impl GeodesicHeuristic {
    pub fn new(scaling_factor: f64) -> Self {
        GeodesicHeuristic { scaling_factor }
    }
}

impl Default for GeodesicHeuristic {
    fn default() -> Self {
        GeodesicHeuristic::new(1.0)
    }
}

impl Heuristic for GeodesicHeuristic {
    fn estimate(&self, from: &City, goal: &City) -> f64 {
        match (from.position, goal.position) {
            (
                Position::Coordinates {
                    latitude: lat1,
                    longitude: lon1,
                },
                Position::Coordinates {
                    latitude: lat2,
                    longitude: lon2,
                },
            ) => self.scaling_factor * haversine_distance(lat1, lon1, lat2, lon2),
            _ => 0.0,
        }
    }
}

/// Haversine great-circle distance between two points in decimal degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let sin_half_delta_lat = ((lat2 - lat1).to_radians() / 2.0).sin();
    let sin_half_delta_lon = ((lon2 - lon1).to_radians() / 2.0).sin();

    let a = sin_half_delta_lat * sin_half_delta_lat
        + lat1.to_radians().cos()
            * lat2.to_radians().cos()
            * sin_half_delta_lon
            * sin_half_delta_lon;

    EARTH_DIAMETER * a.sqrt().atan2((1.0 - a).sqrt())
}
