//! Location reference data

use serde::{Deserialize, Serialize};

/// Opaque identifier of a hub or branch
pub type LocationCode = String;

/// Cutoff columns are stored in milliseconds since the reference epoch
pub const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Cutoff pair of a location, in whole hours since the reference epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cutoffs {
    /// Earliest hour outbound freight is ready at the location
    pub outbound: i64,
    /// Latest hour inbound freight must reach the location
    pub inbound: i64,
}

impl Cutoffs {
    #[cfg(test)]
    pub fn new(outbound: i64, inbound: i64) -> Self {
        Self { outbound, inbound }
    }

    /// Convert millisecond cutoffs to whole hours (integer division)
    pub fn from_millis(outbound_ms: i64, inbound_ms: i64) -> Self {
        Self {
            outbound: outbound_ms / MILLIS_PER_HOUR,
            inbound: inbound_ms / MILLIS_PER_HOUR,
        }
    }
}

/// Static reference record of one physical node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Numeric key used by the travel-time table
    pub id: i64,
    /// Display name
    pub name: String,
    pub code: LocationCode,
    /// Missing when the reference table has no geocode for the node
    pub coordinates: Option<Coordinates>,
    pub cutoffs: Cutoffs,
}
