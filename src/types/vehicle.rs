use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::LocationCode;

/// Vehicle class, named by body length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FleetType {
    Feet14,
    Feet17,
    Feet20,
    Feet22,
    Feet24,
    Feet32,
}

/// Capacity and running cost of a fleet type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FleetSpec {
    pub capacity_kg: u32,
    pub cost_per_km: f64,
}

/// Indexed by `FleetType as usize`
const FLEET_SPECS: [FleetSpec; 6] = [
    FleetSpec { capacity_kg: 2_500, cost_per_km: 15.0 },
    FleetSpec { capacity_kg: 3_000, cost_per_km: 17.0 },
    FleetSpec { capacity_kg: 4_000, cost_per_km: 20.0 },
    FleetSpec { capacity_kg: 5_000, cost_per_km: 22.0 },
    FleetSpec { capacity_kg: 6_000, cost_per_km: 24.0 },
    FleetSpec { capacity_kg: 10_000, cost_per_km: 32.0 },
];

const FLEET_NAMES: [&str; 6] = ["14_Feet", "17_Feet", "20_Feet", "22_Feet", "24_Feet", "32_Feet"];

impl FleetType {
    pub const ALL: [FleetType; 6] = [
        FleetType::Feet14,
        FleetType::Feet17,
        FleetType::Feet20,
        FleetType::Feet22,
        FleetType::Feet24,
        FleetType::Feet32,
    ];

    /// Fleet used when nothing is configured (24 feet is kept out)
    pub const DEFAULT_FLEET: [FleetType; 5] = [
        FleetType::Feet14,
        FleetType::Feet17,
        FleetType::Feet20,
        FleetType::Feet22,
        FleetType::Feet32,
    ];

    pub fn spec(self) -> FleetSpec {
        FLEET_SPECS[self as usize]
    }

    pub fn capacity_kg(self) -> u32 {
        self.spec().capacity_kg
    }

    pub fn cost_per_km(self) -> f64 {
        self.spec().cost_per_km
    }

    pub fn name(self) -> &'static str {
        FLEET_NAMES[self as usize]
    }
}

impl fmt::Display for FleetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FleetType {
    type Err = String;

    /// Accepts `14_Feet`, `14ft` or a bare `14`
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let digits = normalized
            .trim_end_matches("_feet")
            .trim_end_matches("ft");
        FleetType::ALL
            .into_iter()
            .find(|fleet| fleet.name().starts_with(digits) && digits.len() == 2)
            .ok_or_else(|| format!("unknown fleet type '{}'", value))
    }
}

/// One vehicle of the finite fleet offered to the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub fleet: FleetType,
    /// Depot the vehicle starts from
    pub home: LocationCode,
    /// Earliest start in hours
    pub earliest_start: f64,
    pub return_to_depot: bool,
}

impl Vehicle {
    /// Vehicles sharing fleet type and depot share an optimizer vehicle type
    pub fn type_id(&self) -> String {
        format!("{}@{}", self.fleet.name(), self.home)
    }
}
