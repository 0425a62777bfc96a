//! VRP Solution parser
//!
//! Converts a vrp-pragmatic solution to typed routes.

use chrono::NaiveDate;
use tracing::warn;
use vrp_pragmatic::format::solution::{Solution as PragmaticSolution, UnassignedJobReason};

use crate::error::PlanningError;
use crate::types::{RouteRecord, RouteStop, ShipmentRef, StopKind};
use super::adapter::{parse_hours, JobTable};
use super::RoutingProblem;

/// One optimizer solution in planning terms
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Total cost as reported by the optimizer
    pub cost: f64,
    /// One route per used vehicle
    pub routes: Vec<RouteRecord>,
    /// Shipments no vehicle could serve
    pub unassigned: Vec<ShipmentRef>,
}

impl Solution {
    /// Create empty solution (for empty problems)
    pub fn empty() -> Self {
        Self {
            cost: 0.0,
            routes: vec![],
            unassigned: vec![],
        }
    }

    pub fn vehicle_count(&self) -> usize {
        self.routes.len()
    }
}

/// Map a pragmatic solution onto the problem it was solved for.
///
/// Job ids resolve through `jobs`; an id the table does not know means the
/// solution belongs to another problem and is an error.
pub fn map_solution(
    solution: &PragmaticSolution,
    problem: &RoutingProblem,
    jobs: &JobTable,
    date: NaiveDate,
) -> Result<Solution, PlanningError> {
    let time = |value: &str| {
        parse_hours(date, value)
            .ok_or_else(|| PlanningError::MalformedInput(format!("bad solution timestamp '{}'", value)))
    };

    let mut routes = Vec::with_capacity(solution.tours.len());
    for tour in &solution.tours {
        let vehicle = problem.vehicle(&tour.vehicle_id).ok_or_else(|| {
            PlanningError::MalformedInput(format!("unknown vehicle '{}' in solution", tour.vehicle_id))
        })?;

        let mut stops = Vec::new();
        for stop in &tour.stops {
            let schedule = stop.schedule();
            for activity in stop.activities() {
                let kind = match activity.activity_type.as_str() {
                    "pickup" => StopKind::Pickup,
                    "delivery" => StopKind::Delivery,
                    _ => continue,
                };
                let shipment = resolve(problem, jobs, &activity.job_id)?;
                let (arrival, departure) = match &activity.time {
                    Some(interval) => (time(&interval.start)?, time(&interval.end)?),
                    None => (time(&schedule.arrival)?, time(&schedule.departure)?),
                };

                stops.push(RouteStop {
                    kind,
                    shipment: shipment.reference.clone(),
                    weight: shipment.weight,
                    arrival,
                    departure,
                });
            }
        }

        let start_time = match tour.stops.first() {
            Some(stop) => time(&stop.schedule().departure)?,
            None => vehicle.earliest_start,
        };
        let end_time = match tour.stops.last() {
            Some(stop) => time(&stop.schedule().arrival)?,
            None => start_time,
        };

        routes.push(RouteRecord {
            vehicle_id: vehicle.id.clone(),
            fleet: vehicle.fleet,
            stops,
            start_time,
            end_time,
        });
    }

    let mut unassigned = Vec::new();
    for job in solution.unassigned.iter().flatten() {
        let shipment = resolve(problem, jobs, &job.job_id)?;
        unassigned.push(shipment.reference.clone());

        warn!("Unassigned {}: {}", shipment.reference, describe_reasons(&job.reasons));
    }

    Ok(Solution {
        cost: solution.statistic.cost,
        routes,
        unassigned,
    })
}

fn describe_reasons(reasons: &[UnassignedJobReason]) -> String {
    let reasons: Vec<String> = reasons
        .iter()
        .map(|reason| {
            let description = Some(reason.description.as_str()).filter(|d| !d.is_empty());
            format_unassigned_reason(&reason.code, description)
        })
        .collect();

    if reasons.is_empty() {
        "unknown reason".to_string()
    } else {
        reasons.join(", ")
    }
}

fn resolve<'a>(
    problem: &'a RoutingProblem,
    jobs: &JobTable,
    job_id: &str,
) -> Result<&'a crate::types::Shipment, PlanningError> {
    jobs.get(job_id)
        .and_then(|index| problem.shipments.get(*index))
        .ok_or_else(|| PlanningError::InvalidShipmentRef(job_id.to_string()))
}

/// Format unassigned reason code to human-readable message
fn format_unassigned_reason(code: &str, description: Option<&str>) -> String {
    let reason = match code {
        "NO_VEHICLE_SHIFT_TIME" => "shift time exceeded",
        "CAPACITY_CONSTRAINT" => "vehicle capacity exceeded",
        "TIME_WINDOW_CONSTRAINT" => "time window violated",
        "REACHABLE_CONSTRAINT" => "location not reachable",
        "MAX_DISTANCE_CONSTRAINT" => "max distance exceeded",
        "MAX_DURATION_CONSTRAINT" => "max duration exceeded",
        "MAX_TRAVEL_TIME_CONSTRAINT" => "max travel time exceeded",
        _ => code,
    };

    match description {
        Some(desc) => format!("{} ({})", reason, desc),
        None => reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::services::routing::DistanceTimeMatrices;
    use crate::services::vrp::adapter::build_job_table;
    use crate::types::{FleetType, Shipment, TimeWindow, Vehicle};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 26).unwrap()
    }

    fn shipment(origin: &str, destination: &str, weight: u32) -> Shipment {
        Shipment {
            reference: ShipmentRef::new(origin, destination, 1),
            weight,
            pickup_window: TimeWindow::new(0.0, 24.0),
            delivery_window: TimeWindow::new(0.0, 36.0),
            pickup_service: 1.0,
            delivery_service: 0.0,
        }
    }

    fn problem() -> RoutingProblem {
        RoutingProblem {
            shipments: vec![shipment("X", "H", 30), shipment("H", "Y", 50)],
            vehicles: vec![Vehicle {
                id: "14_Feet_1-X".to_string(),
                fleet: FleetType::Feet14,
                home: "X".to_string(),
                earliest_start: 0.0,
                return_to_depot: true,
            }],
            locations: vec!["H".to_string(), "X".to_string(), "Y".to_string()],
            matrices: DistanceTimeMatrices::empty(),
        }
    }

    fn statistic() -> serde_json::Value {
        json!({
            "cost": 1234.5,
            "distance": 120000,
            "duration": 19800,
            "times": { "driving": 14400, "serving": 5400, "waiting": 0, "break": 0 }
        })
    }

    fn pragmatic_solution() -> PragmaticSolution {
        serde_json::from_value(json!({
            "statistic": statistic(),
            "tours": [{
                "vehicleId": "14_Feet_1-X",
                "typeId": "14_Feet@X",
                "shiftIndex": 0,
                "stops": [
                    {
                        "location": { "index": 1 },
                        "time": { "arrival": "2026-01-26T07:00:00Z", "departure": "2026-01-26T07:00:00Z" },
                        "distance": 0,
                        "load": [0],
                        "activities": [{ "jobId": "departure", "type": "departure" }]
                    },
                    {
                        "location": { "index": 1 },
                        "time": { "arrival": "2026-01-26T07:00:00Z", "departure": "2026-01-26T08:00:00Z" },
                        "distance": 0,
                        "load": [30],
                        "activities": [{ "jobId": "X - H, ShipmentNo:1", "type": "pickup" }]
                    },
                    {
                        "location": { "index": 0 },
                        "time": { "arrival": "2026-01-26T10:00:00Z", "departure": "2026-01-26T10:30:00Z" },
                        "distance": 60000,
                        "load": [0],
                        "activities": [{ "jobId": "X - H, ShipmentNo:1", "type": "delivery" }]
                    },
                    {
                        "location": { "index": 1 },
                        "time": { "arrival": "2026-01-26T12:30:00Z", "departure": "2026-01-26T12:30:00Z" },
                        "distance": 120000,
                        "load": [0],
                        "activities": [{ "jobId": "arrival", "type": "arrival" }]
                    }
                ],
                "statistic": statistic()
            }],
            "unassigned": [{
                "jobId": "H - Y, ShipmentNo:1",
                "reasons": [{ "code": "TIME_WINDOW_CONSTRAINT", "description": "cannot be visited within time window" }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn maps_tours_into_typed_routes() {
        let problem = problem();
        let jobs = build_job_table(&problem).unwrap();

        let solution = map_solution(&pragmatic_solution(), &problem, &jobs, date()).unwrap();

        assert_eq!(solution.cost, 1234.5);
        assert_eq!(solution.vehicle_count(), 1);

        let route = &solution.routes[0];
        assert_eq!(route.fleet, FleetType::Feet14);
        assert_eq!(route.start_time, 7.0);
        assert_eq!(route.end_time, 12.5);
        assert_eq!(route.stops.len(), 2);
        assert_eq!(route.stops[0].kind, StopKind::Pickup);
        assert_eq!(route.stops[0].location(), "X");
        assert_eq!(route.stops[0].weight, 30);
        assert_eq!((route.stops[1].arrival, route.stops[1].departure), (10.0, 10.5));
    }

    #[test]
    fn unassigned_jobs_resolve_to_references_with_reasons() {
        let problem = problem();
        let jobs = build_job_table(&problem).unwrap();

        let solution = map_solution(&pragmatic_solution(), &problem, &jobs, date()).unwrap();

        assert_eq!(solution.unassigned, vec![ShipmentRef::new("H", "Y", 1)]);
        assert_eq!(
            describe_reasons(&pragmatic_solution().unassigned.unwrap()[0].reasons),
            "time window violated (cannot be visited within time window)"
        );
        assert_eq!(describe_reasons(&[]), "unknown reason");
    }

    #[test]
    fn foreign_job_id_is_an_error() {
        let problem = problem();
        let mut jobs = build_job_table(&problem).unwrap();
        jobs.remove("H - Y, ShipmentNo:1");

        let result = map_solution(&pragmatic_solution(), &problem, &jobs, date());
        assert_eq!(
            result,
            Err(PlanningError::InvalidShipmentRef("H - Y, ShipmentNo:1".to_string()))
        );
    }

    #[test]
    fn test_format_unassigned_reason() {
        assert_eq!(format_unassigned_reason("CAPACITY_CONSTRAINT", None), "vehicle capacity exceeded");
        assert_eq!(format_unassigned_reason("SOMETHING_NEW", Some("x")), "SOMETHING_NEW (x)");
    }
}
