//! Shipments and their time windows

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanningError;
use super::LocationCode;

const OD_DELIMITER: &str = " - ";
const SEQUENCE_DELIMITER: &str = ", ShipmentNo:";

/// Time window in hours since the reference epoch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub earliest: f64,
    pub latest: f64,
}

impl TimeWindow {
    pub fn new(earliest: f64, latest: f64) -> Self {
        Self { earliest, latest }
    }

    /// Same window moved by `hours`
    pub fn shifted(&self, hours: f64) -> Self {
        Self {
            earliest: self.earliest + hours,
            latest: self.latest + hours,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.earliest, self.latest)
    }
}

/// Structured reference to one shipment of an OD demand cell.
///
/// `sequence` is 1-based and distinguishes the chunks of a split cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipmentRef {
    pub origin: LocationCode,
    pub destination: LocationCode,
    pub sequence: usize,
}

impl ShipmentRef {
    pub fn new(origin: impl Into<LocationCode>, destination: impl Into<LocationCode>, sequence: usize) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            sequence,
        }
    }

    /// Encode as an optimizer job id: `"<origin> - <destination>, ShipmentNo:<n>"`.
    ///
    /// Codes that would collide with the delimiters are rejected so that
    /// [`ShipmentRef::from_str`] stays lossless.
    pub fn job_id(&self) -> Result<String, PlanningError> {
        for code in [&self.origin, &self.destination] {
            if !is_encodable(code) {
                return Err(PlanningError::InvalidShipmentRef(code.clone()));
            }
        }
        Ok(self.to_string())
    }
}

fn is_encodable(code: &str) -> bool {
    !code.is_empty() && code.trim() == code && !code.contains(',') && !code.contains(OD_DELIMITER)
}

impl fmt::Display for ShipmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.origin, OD_DELIMITER, self.destination, SEQUENCE_DELIMITER, self.sequence
        )
    }
}

impl FromStr for ShipmentRef {
    type Err = PlanningError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || PlanningError::InvalidShipmentRef(value.to_string());

        let (od, sequence) = value.split_once(SEQUENCE_DELIMITER).ok_or_else(invalid)?;
        let (origin, destination) = od.split_once(OD_DELIMITER).ok_or_else(invalid)?;
        let sequence = sequence.parse::<usize>().map_err(|_| invalid())?;

        if !is_encodable(origin) || !is_encodable(destination) {
            return Err(invalid());
        }

        Ok(Self::new(origin, destination, sequence))
    }
}

/// One capacity-bounded movement from origin to destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub reference: ShipmentRef,
    /// Weight in kg, never above the largest vehicle capacity
    pub weight: u32,
    pub pickup_window: TimeWindow,
    pub delivery_window: TimeWindow,
    /// Service durations in hours
    pub pickup_service: f64,
    pub delivery_service: f64,
}

impl Shipment {
    pub fn origin(&self) -> &str {
        &self.reference.origin
    }

    pub fn destination(&self) -> &str {
        &self.reference.destination
    }
}
