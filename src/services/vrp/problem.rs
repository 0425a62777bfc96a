//! VRP Problem types

use crate::error::PlanningError;
use crate::services::routing::DistanceTimeMatrices;
use crate::types::{LocationCode, Shipment, Vehicle};

/// Pickup-and-delivery problem for one cluster and one sweep epoch
#[derive(Debug, Clone)]
pub struct RoutingProblem {
    pub shipments: Vec<Shipment>,
    /// Finite fleet; each vehicle can be used at most once
    pub vehicles: Vec<Vehicle>,
    /// Location of each matrix row/column
    pub locations: Vec<LocationCode>,
    pub matrices: DistanceTimeMatrices,
}

impl RoutingProblem {
    /// Matrix index of `code`
    pub fn location_index(&self, code: &str) -> Result<usize, PlanningError> {
        self.locations
            .iter()
            .position(|location| location == code)
            .ok_or_else(|| PlanningError::UnknownLocation(code.to_string()))
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.shipments.is_empty()
    }
}
