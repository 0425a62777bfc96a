//! Cost provider backed by the precomputed travel-time (TAT) table

use std::collections::HashMap;

use tracing::debug;

use crate::error::PlanningError;
use crate::services::network::TatRow;
use crate::types::{LocationRecord, MILLIS_PER_HOUR};
use super::{ensure_coordinates, CostProvider};

/// Lookup of distance (km) and travel time (hours) keyed by location ids
pub struct TatCostProvider {
    distances: HashMap<(i64, i64), f64>,
    durations: HashMap<(i64, i64), f64>,
}

impl TatCostProvider {
    /// Rows without a turnaround time travel at `avg_speed_kmph`
    pub fn new(rows: Vec<TatRow>, avg_speed_kmph: f64) -> Self {
        let mut distances = HashMap::with_capacity(rows.len());
        let mut durations = HashMap::with_capacity(rows.len());

        for row in rows {
            let key = (row.from_id, row.to_id);
            let hours = match row.tat_ms {
                Some(ms) => ms as f64 / MILLIS_PER_HOUR as f64,
                None => row.distance_km / avg_speed_kmph,
            };
            distances.insert(key, row.distance_km);
            durations.insert(key, hours);
        }

        debug!("Travel table holds {} pairs", distances.len());
        Self { distances, durations }
    }

    fn lookup(
        table: &HashMap<(i64, i64), f64>,
        from: &LocationRecord,
        to: &LocationRecord,
    ) -> Result<f64, PlanningError> {
        ensure_coordinates(from, to)?;
        match table.get(&(from.id, to.id)) {
            Some(value) => Ok(*value),
            None if from.id == to.id => Ok(0.0),
            None => Err(PlanningError::MissingTravelData {
                from: from.code.clone(),
                to: to.code.clone(),
            }),
        }
    }
}

impl CostProvider for TatCostProvider {
    fn distance_km(&self, from: &LocationRecord, to: &LocationRecord) -> Result<f64, PlanningError> {
        Self::lookup(&self.distances, from, to)
    }

    fn travel_time_hours(&self, from: &LocationRecord, to: &LocationRecord) -> Result<f64, PlanningError> {
        Self::lookup(&self.durations, from, to)
    }

    fn name(&self) -> &str {
        "tat-table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coordinates, Cutoffs};

    fn record(id: i64, code: &str, geocoded: bool) -> LocationRecord {
        LocationRecord {
            id,
            name: code.to_string(),
            code: code.to_string(),
            coordinates: geocoded.then_some(Coordinates { lat: 30.0, lng: 76.0 }),
            cutoffs: Cutoffs::new(0, 0),
        }
    }

    fn provider() -> TatCostProvider {
        TatCostProvider::new(
            vec![
                TatRow { from_id: 1, to_id: 2, distance_km: 60.0, tat_ms: None },
                TatRow { from_id: 2, to_id: 1, distance_km: 60.0, tat_ms: Some(3 * MILLIS_PER_HOUR) },
            ],
            30.0,
        )
    }

    #[test]
    fn derives_duration_from_speed_when_missing() {
        let hours = provider()
            .travel_time_hours(&record(1, "A", true), &record(2, "B", true))
            .unwrap();
        assert!((hours - 2.0).abs() < 1e-9);
    }

    #[test]
    fn explicit_turnaround_time_wins() {
        let hours = provider()
            .travel_time_hours(&record(2, "B", true), &record(1, "A", true))
            .unwrap();
        assert!((hours - 3.0).abs() < 1e-9);
    }

    #[test]
    fn missing_coordinate_fails_loudly() {
        let result = provider().distance_km(&record(1, "A", true), &record(2, "B", false));
        assert_eq!(result, Err(PlanningError::MissingCoordinate("B".to_string())));
    }

    #[test]
    fn unknown_pair_is_an_error() {
        let result = provider().distance_km(&record(1, "A", true), &record(3, "C", true));
        assert_eq!(
            result,
            Err(PlanningError::MissingTravelData { from: "A".into(), to: "C".into() })
        );
    }

    #[test]
    fn same_location_defaults_to_zero() {
        let a = record(1, "A", true);
        assert_eq!(provider().distance_km(&a, &a).unwrap(), 0.0);
    }
}
