//! Route and network strings, timings and load split for solved routes

use crate::error::PlanningError;
use crate::services::network::NetworkModel;
use crate::types::{FleetType, RouteRecord, StopKind};

/// Report-ready view of one vehicle's route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub vehicle_id: String,
    pub fleet: FleetType,
    /// `[A-B-C]`
    pub route: String,
    /// `[A(P:1.00-2.00)-B(D:4.00-5.00)]`
    pub time_route: String,
    /// Return to the depot, in hours
    pub arrival: f64,
    /// Arrival minus the iteration's hub dispatch time
    pub round_trip: f64,
    /// Delivered kg per cluster, in model cluster order
    pub load_split: Vec<f64>,
}

pub fn summarize(route: &RouteRecord, dispatch_time: f64, model: &NetworkModel) -> Result<RouteSummary, PlanningError> {
    Ok(RouteSummary {
        vehicle_id: route.vehicle_id.clone(),
        fleet: route.fleet,
        route: compact_route(route),
        time_route: timed_route(route),
        arrival: route.end_time,
        round_trip: route.end_time - dispatch_time,
        load_split: load_split(route, model)?,
    })
}

/// Stop locations with consecutive repeats collapsed
pub fn compact_route(route: &RouteRecord) -> String {
    let mut locations: Vec<&str> = Vec::with_capacity(route.stops.len());
    for stop in &route.stops {
        let location = stop.location();
        if locations.last() != Some(&location) {
            locations.push(location);
        }
    }
    format!("[{}]", locations.join("-"))
}

/// Stop locations annotated with activity times.
///
/// Identical tokens appear once; back-to-back activities at one location
/// share a token, e.g. `X(P:1.00-2.00,D:2.00-3.00)`. When the last two stops
/// leave at the same time the final one adds nothing and is dropped.
pub fn timed_route(route: &RouteRecord) -> String {
    let stops = match route.stops.as_slice() {
        [.., previous, last] if previous.departure == last.departure => &route.stops[..route.stops.len() - 1],
        stops => stops,
    };

    let mut seen: Vec<(&str, String)> = Vec::with_capacity(stops.len());
    for stop in stops {
        let token = (
            stop.location(),
            format!(
                "{}:{}-{}",
                stop.kind.tag(),
                format_hours(stop.arrival),
                format_hours(stop.departure)
            ),
        );
        if !seen.contains(&token) {
            seen.push(token);
        }
    }

    let mut merged: Vec<(&str, Vec<String>)> = Vec::with_capacity(seen.len());
    for (location, activity) in seen {
        match merged.last_mut() {
            Some((last, activities)) if *last == location => activities.push(activity),
            _ => merged.push((location, vec![activity])),
        }
    }

    let tokens: Vec<String> = merged
        .into_iter()
        .map(|(location, activities)| format!("{}({})", location, activities.join(",")))
        .collect();
    format!("[{}]", tokens.join("-"))
}

/// Every route's compact string, `[r1, r2]`
pub fn network(routes: &[RouteRecord]) -> String {
    let routes: Vec<String> = routes.iter().map(compact_route).collect();
    format!("[{}]", routes.join(", "))
}

/// Hours as `H.MM`, rounded to the minute
pub fn format_hours(hours: f64) -> String {
    let minutes = (hours * 60.0).round() as i64;
    let sign = if minutes < 0 { "-" } else { "" };
    let minutes = minutes.abs();
    format!("{}{}.{:02}", sign, minutes / 60, minutes % 60)
}

/// Delivered weight attributed to each cluster.
///
/// Branch deliveries count toward the branch's cluster. Freight delivered
/// to a hub moves on into the network, so it is spread over clusters by
/// the origin's planned volume to each; an origin without planned volume
/// keeps it in its own cluster.
pub fn load_split(route: &RouteRecord, model: &NetworkModel) -> Result<Vec<f64>, PlanningError> {
    let clusters = model.clusters();
    let mut split = vec![0.0; clusters.len()];
    let position = |code: &str| {
        clusters
            .iter()
            .position(|cluster| cluster.contains(code))
            .ok_or_else(|| PlanningError::UnknownLocation(code.to_string()))
    };

    for stop in route.stops.iter().filter(|stop| stop.kind == StopKind::Delivery) {
        let weight = stop.weight as f64;
        let destination = &stop.shipment.destination;

        if model.cluster(destination).is_none() {
            split[position(destination)?] += weight;
            continue;
        }

        let origin = &stop.shipment.origin;
        let volumes = clusters
            .iter()
            .map(|cluster| model.sales_plan().total_to_cluster(origin, cluster))
            .collect::<Result<Vec<f64>, _>>()?;
        let total: f64 = volumes.iter().sum();

        if total > 0.0 {
            for (share, volume) in split.iter_mut().zip(&volumes) {
                *share += weight * volume / total;
            }
        } else {
            split[position(origin)?] += weight;
        }
    }

    Ok(split)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::services::network::fixtures::{hub_and_two_branches, location};
    use crate::services::network::{Cluster, SalesPlan};
    use crate::types::{Cutoffs, RouteStop, ShipmentRef};

    fn stop(kind: StopKind, origin: &str, destination: &str, weight: u32, arrival: f64, departure: f64) -> RouteStop {
        RouteStop {
            kind,
            shipment: ShipmentRef::new(origin, destination, 1),
            weight,
            arrival,
            departure,
        }
    }

    fn route(stops: Vec<RouteStop>) -> RouteRecord {
        RouteRecord {
            vehicle_id: "32_Feet_1-H".to_string(),
            fleet: FleetType::Feet32,
            stops,
            start_time: 5.0,
            end_time: 12.0,
        }
    }

    #[test]
    fn compact_route_collapses_consecutive_repeats() {
        let route = route(vec![
            stop(StopKind::Pickup, "A", "B", 1, 0.0, 0.0),
            stop(StopKind::Pickup, "A", "C", 1, 0.0, 0.0),
            stop(StopKind::Delivery, "A", "B", 1, 0.0, 0.0),
            stop(StopKind::Pickup, "B", "C", 1, 0.0, 0.0),
            stop(StopKind::Pickup, "B", "C", 1, 0.0, 0.0),
            stop(StopKind::Delivery, "B", "C", 1, 0.0, 0.0),
        ]);
        assert_eq!(compact_route(&route), "[A-B-C]");
    }

    #[test]
    fn compact_route_of_empty_route() {
        assert_eq!(compact_route(&route(vec![])), "[]");
    }

    #[test]
    fn timed_route_merges_same_location_and_drops_duplicates() {
        let route = route(vec![
            stop(StopKind::Pickup, "H", "X", 100, 5.0, 5.0),
            stop(StopKind::Pickup, "H", "X", 100, 5.0, 5.0),
            stop(StopKind::Delivery, "H", "X", 100, 7.0, 8.0),
            stop(StopKind::Pickup, "X", "H", 30, 8.0, 9.0),
            stop(StopKind::Delivery, "X", "H", 30, 11.25, 11.25),
        ]);
        assert_eq!(
            timed_route(&route),
            "[H(P:5.00-5.00)-X(D:7.00-8.00,P:8.00-9.00)-H(D:11.15-11.15)]"
        );
    }

    #[test]
    fn timed_route_drops_final_stop_leaving_with_the_previous_one() {
        let route = route(vec![
            stop(StopKind::Pickup, "X", "H", 30, 5.0, 6.0),
            stop(StopKind::Pickup, "Y", "H", 40, 7.0, 8.0),
            stop(StopKind::Delivery, "X", "H", 30, 10.0, 11.0),
            stop(StopKind::Delivery, "Y", "H", 40, 11.0, 11.0),
        ]);
        assert_eq!(
            timed_route(&route),
            "[X(P:5.00-6.00)-Y(P:7.00-8.00)-H(D:10.00-11.00)]"
        );
        // the compact route is unaffected
        assert_eq!(compact_route(&route), "[X-Y-H]");
    }

    #[test]
    fn timed_route_keeps_final_stop_with_later_departure() {
        let single = route(vec![
            stop(StopKind::Pickup, "X", "H", 30, 5.0, 6.0),
            stop(StopKind::Delivery, "X", "H", 30, 10.0, 10.5),
        ]);
        assert_eq!(timed_route(&single), "[X(P:5.00-6.00)-H(D:10.00-10.30)]");
        assert_eq!(timed_route(&route(vec![])), "[]");
    }

    #[test]
    fn network_joins_compact_routes() {
        let first = route(vec![
            stop(StopKind::Pickup, "H", "X", 1, 0.0, 0.0),
            stop(StopKind::Delivery, "H", "X", 1, 0.0, 0.0),
        ]);
        let second = route(vec![
            stop(StopKind::Pickup, "Y", "H", 1, 0.0, 0.0),
            stop(StopKind::Delivery, "Y", "H", 1, 0.0, 0.0),
        ]);
        assert_eq!(network(&[first, second]), "[[H-X], [Y-H]]");
        assert_eq!(network(&[]), "[]");
    }

    #[test]
    fn format_hours_pads_minutes() {
        assert_eq!(format_hours(5.0), "5.00");
        assert_eq!(format_hours(7.05), "7.03");
        assert_eq!(format_hours(13.999), "14.00");
        assert_eq!(format_hours(-0.5), "-0.30");
    }

    #[test]
    fn branch_delivery_counts_toward_its_cluster() {
        let model = hub_and_two_branches();
        let route = route(vec![
            stop(StopKind::Pickup, "H", "X", 100, 5.0, 5.0),
            stop(StopKind::Delivery, "H", "X", 100, 7.0, 8.0),
        ]);
        assert_eq!(load_split(&route, &model).unwrap(), vec![100.0]);
    }

    #[test]
    fn hub_delivery_without_planned_volume_stays_with_origin() {
        // Y has no planned outbound volume; its 100 kg are the floor
        let model = hub_and_two_branches();
        let route = route(vec![
            stop(StopKind::Pickup, "Y", "H", 100, 6.0, 7.0),
            stop(StopKind::Delivery, "Y", "H", 100, 9.0, 9.0),
        ]);
        assert_eq!(load_split(&route, &model).unwrap(), vec![100.0]);
    }

    #[test]
    fn hub_delivery_is_spread_by_planned_volume() {
        let nodes = ["H", "X", "G", "Z"];
        let mut volumes = HashMap::new();
        for origin in nodes {
            for destination in nodes {
                volumes.insert((origin.to_string(), destination.to_string()), 0.0);
            }
        }
        volumes.insert(("X".to_string(), "H".to_string()), 10.0);
        volumes.insert(("X".to_string(), "G".to_string()), 20.0);
        volumes.insert(("X".to_string(), "Z".to_string()), 10.0);

        let clusters = vec![
            Cluster { hub: "H".into(), members: vec!["H".into(), "X".into()] },
            Cluster { hub: "G".into(), members: vec!["G".into(), "Z".into()] },
        ];
        let plan = SalesPlan::new(nodes.iter().map(|n| n.to_string()).collect(), volumes);
        let locations = nodes
            .iter()
            .enumerate()
            .map(|(i, code)| location(i as i64 + 1, code, Cutoffs::new(5, 12)))
            .collect();
        let model = NetworkModel::new(clusters, plan, locations, 100.0).unwrap();

        let route = route(vec![
            stop(StopKind::Pickup, "X", "H", 100, 6.0, 7.0),
            stop(StopKind::Delivery, "X", "H", 100, 9.0, 9.0),
        ]);
        assert_eq!(load_split(&route, &model).unwrap(), vec![25.0, 75.0]);
    }

    #[test]
    fn summary_uses_dispatch_time_for_round_trip() {
        let model = hub_and_two_branches();
        let route = route(vec![
            stop(StopKind::Pickup, "X", "H", 30, 7.0, 8.0),
            stop(StopKind::Delivery, "X", "H", 30, 10.0, 10.0),
        ]);

        let summary = summarize(&route, 4.0, &model).unwrap();
        assert_eq!(summary.route, "[X-H]");
        assert_eq!(summary.arrival, 12.0);
        assert_eq!(summary.round_trip, 8.0);
        assert_eq!(summary.load_split.iter().sum::<f64>(), 30.0);
    }
}
