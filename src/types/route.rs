//! Realized vehicle routes

use serde::{Deserialize, Serialize};

use super::{FleetType, ShipmentRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopKind {
    Pickup,
    Delivery,
}

impl StopKind {
    /// Single-letter tag used in timed route strings
    pub fn tag(self) -> char {
        match self {
            StopKind::Pickup => 'P',
            StopKind::Delivery => 'D',
        }
    }
}

/// One activity of a vehicle's route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub kind: StopKind,
    pub shipment: ShipmentRef,
    /// Weight of the referenced shipment in kg
    pub weight: u32,
    /// Hours since the reference epoch
    pub arrival: f64,
    pub departure: f64,
}

impl RouteStop {
    /// Where the stop happens: origin for pickups, destination for deliveries
    pub fn location(&self) -> &str {
        match self.kind {
            StopKind::Pickup => &self.shipment.origin,
            StopKind::Delivery => &self.shipment.destination,
        }
    }
}

/// One vehicle's realized route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub vehicle_id: String,
    pub fleet: FleetType,
    pub stops: Vec<RouteStop>,
    /// Departure from the depot, in hours
    pub start_time: f64,
    /// Return to the depot (or last activity), in hours
    pub end_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_location_follows_kind() {
        let shipment = ShipmentRef::new("X", "H", 1);
        let pickup = RouteStop {
            kind: StopKind::Pickup,
            shipment: shipment.clone(),
            weight: 30,
            arrival: 1.0,
            departure: 2.0,
        };
        let delivery = RouteStop { kind: StopKind::Delivery, ..pickup.clone() };

        assert_eq!(pickup.location(), "X");
        assert_eq!(delivery.location(), "H");
        assert_eq!(delivery.kind.tag(), 'D');
    }
}
