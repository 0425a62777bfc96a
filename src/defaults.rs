//! Planning constants. Times are in hours, weights in kg.

pub const ONE_HOUR: f64 = 1.0;
pub const ONE_DAY: f64 = 24.0;

pub const BRANCH_LOWER_BOUND: f64 = 0.0;
pub const BRANCH_UPPER_BOUND: f64 = 24.0;
pub const HUB_LOWER_BOUND: f64 = 0.0;
pub const HUB_UPPER_BOUND: f64 = 36.0;

/// Handling time at a branch for each pickup or delivery
pub const BRANCH_SERVICE_HOURS: f64 = 1.0;

/// Extra pickup service per chunk index when a demand cell is split
pub const SPLIT_PICKUP_OFFSET_HOURS: f64 = 2.0;

/// Earliest start of every vehicle
pub const VEHICLE_DISPATCH_OFFSET_HOURS: f64 = 0.0;

/// Fleet pool size per fleet type per location
pub const VEHICLES_PER_TYPE: usize = 10;

/// Floor applied to zero aggregate demand so every branch stays connected
pub const MIN_WEIGHT_KG: f64 = 100.0;

/// Used when the travel-time table carries no explicit duration
pub const AVG_SPEED_KMPH: f64 = 30.0;

/// Sales plan volumes are given in thousands of kg
pub const SALES_VOLUME_UNIT_KG: f64 = 1000.0;
