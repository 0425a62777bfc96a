//! Adapter to build vrp-pragmatic inputs.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::debug;
use vrp_pragmatic::format::problem::Matrix;

use crate::defaults::ONE_DAY;
use crate::error::PlanningError;
use crate::services::routing::DistanceTimeMatrices;
use crate::types::{Shipment, TimeWindow, Vehicle};
use super::RoutingProblem;

pub const DEFAULT_PROFILE: &str = "car";

/// Optimizer job id -> index into `RoutingProblem::shipments`
pub type JobTable = HashMap<String, usize>;

/// Encode every shipment's job id; duplicates are rejected
pub fn build_job_table(problem: &RoutingProblem) -> Result<JobTable, PlanningError> {
    let mut table = JobTable::with_capacity(problem.shipments.len());
    for (index, shipment) in problem.shipments.iter().enumerate() {
        let job_id = shipment.reference.job_id()?;
        if table.insert(job_id.clone(), index).is_some() {
            return Err(PlanningError::InvalidShipmentRef(job_id));
        }
    }
    Ok(table)
}

/// Build pragmatic problem JSON: one pickup/delivery job per shipment and one
/// vehicle type per fleet type and depot.
pub fn build_pragmatic_problem(problem: &RoutingProblem, date: NaiveDate) -> Result<Value, PlanningError> {
    let jobs = problem
        .shipments
        .iter()
        .map(|shipment| build_job(problem, shipment, date))
        .collect::<Result<Vec<_>, _>>()?;

    let horizon = problem
        .shipments
        .iter()
        .map(|shipment| shipment.delivery_window.latest + shipment.delivery_service)
        .fold(0.0, f64::max)
        + ONE_DAY;

    // BTreeMap keeps the vehicle type order stable between runs
    let mut vehicle_types: BTreeMap<String, Vec<&Vehicle>> = BTreeMap::new();
    for vehicle in &problem.vehicles {
        vehicle_types.entry(vehicle.type_id()).or_default().push(vehicle);
    }

    let vehicles = vehicle_types
        .into_iter()
        .map(|(type_id, vehicles)| build_vehicle_type(problem, &type_id, &vehicles, date, horizon))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(json!({
        "plan": {
            "jobs": jobs
        },
        "fleet": {
            "vehicles": vehicles,
            "profiles": [{
                "name": DEFAULT_PROFILE
            }]
        }
    }))
}

fn build_job(problem: &RoutingProblem, shipment: &Shipment, date: NaiveDate) -> Result<Value, PlanningError> {
    let pickup = build_task(
        problem.location_index(shipment.origin())?,
        shipment.pickup_service,
        &shipment.pickup_window,
        shipment.weight,
        date,
    );
    let delivery = build_task(
        problem.location_index(shipment.destination())?,
        shipment.delivery_service,
        &shipment.delivery_window,
        shipment.weight,
        date,
    );

    Ok(json!({
        "id": shipment.reference.job_id()?,
        "pickups": [pickup],
        "deliveries": [delivery]
    }))
}

fn build_task(location: usize, service_hours: f64, window: &TimeWindow, weight: u32, date: NaiveDate) -> Value {
    // A cutoff at the very end of the day can push the window start past its end
    let latest = if window.latest < window.earliest {
        debug!("Collapsing inverted window {} at location {}", window, location);
        window.earliest
    } else {
        window.latest
    };

    json!({
        "places": [{
            "location": { "index": location },
            "duration": hours_to_seconds(service_hours),
            "times": [[format_rfc3339(date, window.earliest), format_rfc3339(date, latest)]]
        }],
        "demand": [weight]
    })
}

fn build_vehicle_type(
    problem: &RoutingProblem,
    type_id: &str,
    vehicles: &[&Vehicle],
    date: NaiveDate,
    horizon: f64,
) -> Result<Value, PlanningError> {
    let Some(first) = vehicles.first() else {
        return Err(PlanningError::MalformedInput(format!("vehicle type {} has no vehicles", type_id)));
    };
    let home = problem.location_index(&first.home)?;

    let mut shift = json!({
        "start": {
            "earliest": format_rfc3339(date, first.earliest_start),
            "location": { "index": home }
        }
    });
    if first.return_to_depot {
        shift["end"] = json!({
            "latest": format_rfc3339(date, horizon),
            "location": { "index": home }
        });
    }

    Ok(json!({
        "typeId": type_id,
        "vehicleIds": vehicles.iter().map(|vehicle| vehicle.id.as_str()).collect::<Vec<_>>(),
        "profile": { "matrix": DEFAULT_PROFILE },
        "costs": {
            "fixed": 0.0,
            "distance": first.fleet.cost_per_km() / 1000.0,
            "time": 0.0
        },
        "shifts": [shift],
        "capacity": [first.fleet.capacity_kg()]
    }))
}

/// Build pragmatic routing matrix from distance/time matrices.
pub fn build_pragmatic_matrix(
    matrices: &DistanceTimeMatrices,
    profile: &str,
) -> Matrix {
    let size = matrices.size;
    let mut travel_times = Vec::with_capacity(size * size);
    let mut distances = Vec::with_capacity(size * size);

    for i in 0..size {
        for j in 0..size {
            travel_times.push(matrices.duration(i, j) as i64);
            distances.push(matrices.distance(i, j) as i64);
        }
    }

    Matrix {
        profile: Some(profile.to_string()),
        timestamp: None,
        travel_times,
        distances,
        error_codes: None,
    }
}

fn hours_to_seconds(hours: f64) -> i64 {
    (hours * 3600.0).round() as i64
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    NaiveDateTime::new(date, NaiveTime::MIN)
}

/// Planning hours as an RFC3339 timestamp relative to `date` midnight (UTC)
pub fn format_rfc3339(date: NaiveDate, hours: f64) -> String {
    let naive = midnight(date) + Duration::seconds(hours_to_seconds(hours));
    DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Inverse of [`format_rfc3339`]
pub fn parse_hours(date: NaiveDate, value: &str) -> Option<f64> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| (parsed.naive_utc() - midnight(date)).num_seconds() as f64 / 3600.0)
}
