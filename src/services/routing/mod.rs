//! Routing costs between network locations
//!
//! Distances and durations come from a precomputed travel table; nothing is
//! derived from raw coordinates here.

mod tats;

pub use tats::TatCostProvider;

use crate::error::PlanningError;
use crate::types::LocationRecord;

/// Distance and time matrices between locations
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTimeMatrices {
    /// Distance in meters [i][j] from location i to location j
    pub distances: Vec<Vec<u64>>,
    /// Duration in seconds [i][j] from location i to location j
    pub durations: Vec<Vec<u64>>,
    /// Number of locations
    pub size: usize,
}

impl DistanceTimeMatrices {
    /// Create empty matrices
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            distances: vec![],
            durations: vec![],
            size: 0,
        }
    }

    /// Get distance from location i to location j in meters
    pub fn distance(&self, from: usize, to: usize) -> u64 {
        self.distances[from][to]
    }

    /// Get duration from location i to location j in seconds
    pub fn duration(&self, from: usize, to: usize) -> u64 {
        self.durations[from][to]
    }

    /// Query `provider` for every ordered pair of `locations`
    pub fn from_provider(
        provider: &dyn CostProvider,
        locations: &[&LocationRecord],
    ) -> Result<Self, PlanningError> {
        let size = locations.len();
        let mut distances = vec![vec![0u64; size]; size];
        let mut durations = vec![vec![0u64; size]; size];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                distances[i][j] = (provider.distance_km(from, to)? * 1000.0).round() as u64;
                durations[i][j] = (provider.travel_time_hours(from, to)? * 3600.0).round() as u64;
            }
        }

        Ok(Self {
            distances,
            durations,
            size,
        })
    }
}

/// Distance/duration lookup between two locations.
///
/// Implementations must fail, never return zero, when either endpoint has
/// no coordinates or the pair is unknown.
pub trait CostProvider {
    /// Road distance in kilometers
    fn distance_km(&self, from: &LocationRecord, to: &LocationRecord) -> Result<f64, PlanningError>;

    /// Travel time in hours
    fn travel_time_hours(&self, from: &LocationRecord, to: &LocationRecord) -> Result<f64, PlanningError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Reject pairs where either side lacks a geocode
pub fn ensure_coordinates(from: &LocationRecord, to: &LocationRecord) -> Result<(), PlanningError> {
    for location in [from, to] {
        if location.coordinates.is_none() {
            return Err(PlanningError::MissingCoordinate(location.code.clone()));
        }
    }
    Ok(())
}
