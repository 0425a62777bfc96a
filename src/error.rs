//! Domain errors raised while building the network model and planning routes

use thiserror::Error;

/// Faults that abort topology construction or a planning step.
///
/// Unassigned shipments are not errors: the sweep reports them as metrics.
#[derive(Debug, Error, PartialEq)]
pub enum PlanningError {
    #[error("no demand recorded for {origin} -> {destination}")]
    MissingDemand { origin: String, destination: String },

    #[error("location '{0}' has no coordinates")]
    MissingCoordinate(String),

    #[error("no travel data for {from} -> {to}")]
    MissingTravelData { from: String, to: String },

    #[error("unknown location '{0}'")]
    UnknownLocation(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("invalid shipment reference '{0}'")]
    InvalidShipmentRef(String),

    #[error("optimizer returned no solution")]
    NoSolution,
}
