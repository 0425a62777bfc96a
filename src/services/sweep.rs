//! Dispatch-time sweep for one cluster
//!
//! Every integer hour between the hub lower bound and the cluster's latest
//! branch cutoff is tried as the hub dispatch time. Each candidate runs up to
//! two optimizer epochs: the second one relaxes delivery windows at the
//! locations the first one could not serve.

use std::num::NonZeroU32;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::defaults::{
    BRANCH_SERVICE_HOURS, ONE_DAY, SPLIT_PICKUP_OFFSET_HOURS, VEHICLES_PER_TYPE,
    VEHICLE_DISPATCH_OFFSET_HOURS,
};
use crate::error::PlanningError;
use crate::services::network::{Cluster, DemandMatrix, NetworkModel};
use crate::services::routing::{CostProvider, DistanceTimeMatrices};
use crate::services::splitter::split_demand;
use crate::services::vrp::{best_of, Optimizer, RoutingProblem, Solution};
use crate::services::windows::{ClusterWindows, TimeBounds};
use crate::types::{FleetType, LocationCode, Shipment, ShipmentRef, Vehicle};

/// Epoch 0 plus one relaxation epoch; there is never a third
pub const MAX_EPOCHS: usize = 2;

/// Knobs of the shipment and fleet builders
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSettings {
    pub bounds: TimeBounds,
    /// Fleet types offered at every cluster member
    pub fleet: Vec<FleetType>,
    pub vehicles_per_type: usize,
    /// Earliest start of every vehicle, in hours
    pub vehicle_dispatch_offset: f64,
    /// Handling time at a branch, in hours
    pub service_hours: f64,
    /// Extra pickup service per chunk index of a split cell, in hours
    pub split_pickup_offset: f64,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            bounds: TimeBounds::default(),
            fleet: FleetType::DEFAULT_FLEET.to_vec(),
            vehicles_per_type: VEHICLES_PER_TYPE,
            vehicle_dispatch_offset: VEHICLE_DISPATCH_OFFSET_HOURS,
            service_hours: BRANCH_SERVICE_HOURS,
            split_pickup_offset: SPLIT_PICKUP_OFFSET_HOURS,
        }
    }
}

impl SweepSettings {
    /// Largest capacity of the active fleet; cells are split to fit it.
    /// `None` when no fleet type is active.
    pub fn max_capacity(&self) -> Option<NonZeroU32> {
        self.fleet
            .iter()
            .map(|fleet| fleet.capacity_kg())
            .max()
            .and_then(NonZeroU32::new)
    }
}

/// Outcome of one dispatch-time candidate
#[derive(Debug, Clone, PartialEq)]
pub struct IterationResult {
    /// 0-based candidate index
    pub iteration: usize,
    pub dispatch_time: f64,
    /// Best solution of the final epoch
    pub solution: Solution,
    /// Non-hub endpoints of shipments left unassigned by epoch 0
    pub infeasible_locations: Vec<LocationCode>,
    /// Shipments still unassigned after the final epoch
    pub unresolved: usize,
}

/// Build every shipment of the cluster's demand matrix.
///
/// `relaxed` lists destinations whose delivery window opens to the full
/// branch day; it is empty for epoch 0. Fails when no fleet type is active.
pub fn build_shipments(
    cluster: &Cluster,
    demand: &DemandMatrix,
    windows: &ClusterWindows,
    relaxed: &[LocationCode],
    settings: &SweepSettings,
) -> Result<Vec<Shipment>, PlanningError> {
    let hub = cluster.hub_index();
    let capacity = settings
        .max_capacity()
        .ok_or_else(|| PlanningError::MalformedInput("no fleet type is active".to_string()))?;
    let mut shipments = Vec::new();

    for (from, to, weight) in demand.nonzero() {
        let chunks = split_demand(weight, capacity);
        let split = chunks.len() > 1;

        for (k, chunk) in chunks.into_iter().enumerate() {
            let origin = &cluster.members[from];
            let destination = &cluster.members[to];

            let mut delivery_window = windows.delivery(to);
            if relaxed.contains(destination) {
                delivery_window = settings.bounds.full_branch_day();
            }

            let mut pickup_service = settings.service_hours;
            let mut delivery_service = settings.service_hours;
            if split {
                pickup_service = settings.service_hours + settings.split_pickup_offset * k as f64;
            }
            if from == hub {
                pickup_service = 0.0;
            }
            if to == hub {
                delivery_service = 0.0;
            }
            // branch to branch freight lands the next day
            if from != hub && to != hub {
                delivery_window = windows.delivery(to).shifted(ONE_DAY);
            }

            shipments.push(Shipment {
                reference: ShipmentRef::new(origin.as_str(), destination.as_str(), k + 1),
                weight: chunk,
                pickup_window: windows.pickup(from),
                delivery_window,
                pickup_service,
                delivery_service,
            });
        }
    }

    Ok(shipments)
}

/// `vehicles_per_type` vehicles of every active fleet type at every member
pub fn build_vehicles(cluster: &Cluster, settings: &SweepSettings) -> Vec<Vehicle> {
    let mut vehicles = Vec::with_capacity(cluster.len() * settings.fleet.len() * settings.vehicles_per_type);
    for home in &cluster.members {
        for fleet in &settings.fleet {
            for n in 1..=settings.vehicles_per_type {
                vehicles.push(Vehicle {
                    id: format!("{}_{}-{}", fleet.name(), n, home),
                    fleet: *fleet,
                    home: home.clone(),
                    earliest_start: settings.vehicle_dispatch_offset,
                    return_to_depot: true,
                });
            }
        }
    }
    vehicles
}

/// Non-hub endpoint of each unassigned shipment, first occurrence order
pub fn infeasible_locations(cluster: &Cluster, unassigned: &[ShipmentRef]) -> Vec<LocationCode> {
    let mut locations: Vec<LocationCode> = Vec::new();
    for reference in unassigned {
        let location = if cluster.is_hub(&reference.origin) {
            &reference.destination
        } else {
            &reference.origin
        };
        if !locations.contains(location) {
            locations.push(location.clone());
        }
    }
    locations
}

/// Runs the sweep for clusters of one network model
pub struct SweepDriver<'a> {
    model: &'a NetworkModel,
    costs: &'a dyn CostProvider,
    optimizer: &'a dyn Optimizer,
    settings: SweepSettings,
}

impl<'a> SweepDriver<'a> {
    pub fn new(
        model: &'a NetworkModel,
        costs: &'a dyn CostProvider,
        optimizer: &'a dyn Optimizer,
        settings: SweepSettings,
    ) -> Self {
        Self {
            model,
            costs,
            optimizer,
            settings,
        }
    }

    /// Sweep every candidate dispatch time, handing each result to
    /// `on_iteration` as soon as it is ready.
    ///
    /// An optimizer failure aborts the sweep; unassigned shipments do not.
    pub fn sweep<F>(&self, cluster: &Cluster, mut on_iteration: F) -> Result<()>
    where
        F: FnMut(IterationResult) -> Result<()>,
    {
        let cutoffs = self.model.cutoffs(cluster)?;
        let demand = self.model.demand_matrix(cluster)?;
        let locations = self.model.member_locations(cluster)?;
        let matrices = DistanceTimeMatrices::from_provider(self.costs, &locations)
            .with_context(|| format!("Failed to build cost matrix for cluster {}", cluster.hub))?;
        let vehicles = build_vehicles(cluster, &self.settings);
        let base_windows = ClusterWindows::derive(cluster, &cutoffs, &self.settings.bounds);

        let first = self.settings.bounds.hub_lower.ceil() as i64;
        let last = base_windows.max_branch_cutoff().floor() as i64;

        info!(
            "Sweeping cluster {} ({} members) over dispatch times {}..={} with {} via {}",
            cluster.hub,
            cluster.len(),
            first,
            last,
            self.optimizer.name(),
            self.costs.name(),
        );

        for (iteration, dispatch_time) in (first..=last).enumerate() {
            let dispatch_time = dispatch_time as f64;
            let windows = base_windows.with_dispatch_time(dispatch_time);
            debug!(
                "Iteration {}: dispatch {} hub pickup {} hub delivery {}",
                iteration,
                dispatch_time,
                windows.pickup(cluster.hub_index()),
                windows.delivery(cluster.hub_index()),
            );

            let mut problem = RoutingProblem {
                shipments: vec![],
                vehicles: vehicles.clone(),
                locations: cluster.members.clone(),
                matrices: matrices.clone(),
            };

            let mut infeasible = Vec::new();
            let mut solution = Solution::empty();

            for epoch in 0..MAX_EPOCHS {
                if epoch > 0 {
                    if infeasible.is_empty() {
                        break;
                    }
                    warn!(
                        "Iteration {}: relaxing delivery windows at {:?}",
                        iteration, infeasible
                    );
                }

                problem.shipments = build_shipments(cluster, &demand, &windows, &infeasible, &self.settings)?;
                let candidates = self.optimizer.solve(&problem).with_context(|| {
                    format!(
                        "Optimizer failed for cluster {} at dispatch time {} (epoch {})",
                        cluster.hub, dispatch_time, epoch
                    )
                })?;
                solution = best_of(candidates)?;

                info!(
                    "Iteration {} epoch {}: {} shipments, {} vehicles, {} unassigned, cost {:.1}",
                    iteration,
                    epoch,
                    problem.shipments.len(),
                    solution.vehicle_count(),
                    solution.unassigned.len(),
                    solution.cost,
                );

                if epoch == 0 {
                    infeasible = infeasible_locations(cluster, &solution.unassigned);
                }
            }

            let unresolved = solution.unassigned.len();
            on_iteration(IterationResult {
                iteration,
                dispatch_time,
                solution,
                infeasible_locations: infeasible,
                unresolved,
            })?;
        }

        Ok(())
    }

    /// Collect every iteration of the sweep
    #[cfg(test)]
    pub fn run_cluster(&self, cluster: &Cluster) -> Result<Vec<IterationResult>> {
        let mut results = Vec::new();
        self.sweep(cluster, |result| {
            results.push(result);
            Ok(())
        })?;
        Ok(results)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic optimizer stand-in

    use std::cell::RefCell;

    use super::*;
    use crate::types::{RouteRecord, RouteStop, StopKind};

    /// Puts every shipment on its own vehicle from the origin; shipments
    /// whose delivery window closes before `reject_before` stay unassigned.
    pub struct FakeOptimizer {
        pub reject_before: f64,
        pub calls: RefCell<Vec<Vec<Shipment>>>,
        pub fail: bool,
    }

    impl FakeOptimizer {
        pub fn new(reject_before: f64) -> Self {
            Self {
                reject_before,
                calls: RefCell::new(vec![]),
                fail: false,
            }
        }
    }

    impl Optimizer for FakeOptimizer {
        fn solve(&self, problem: &RoutingProblem) -> Result<Vec<Solution>> {
            self.calls.borrow_mut().push(problem.shipments.clone());
            if self.fail {
                anyhow::bail!("solver exploded");
            }

            let mut solution = Solution::empty();
            for shipment in &problem.shipments {
                if shipment.delivery_window.latest < self.reject_before {
                    solution.unassigned.push(shipment.reference.clone());
                    continue;
                }

                let vehicle = problem
                    .vehicles
                    .iter()
                    .filter(|vehicle| vehicle.home == shipment.origin())
                    .nth(solution.routes.iter().filter(|r| r.stops[0].location() == shipment.origin()).count())
                    .ok_or_else(|| anyhow::anyhow!("fleet exhausted"))?;

                let start = shipment.pickup_window.earliest;
                let pickup = RouteStop {
                    kind: StopKind::Pickup,
                    shipment: shipment.reference.clone(),
                    weight: shipment.weight,
                    arrival: start,
                    departure: start + shipment.pickup_service,
                };
                let delivery = RouteStop {
                    kind: StopKind::Delivery,
                    arrival: pickup.departure + 2.0,
                    departure: pickup.departure + 2.0 + shipment.delivery_service,
                    ..pickup.clone()
                };
                solution.cost += 100.0;
                solution.routes.push(RouteRecord {
                    vehicle_id: vehicle.id.clone(),
                    fleet: vehicle.fleet,
                    start_time: start,
                    end_time: delivery.departure + 2.0,
                    stops: vec![pickup, delivery],
                });
            }

            // a worse candidate first, so best_of has work to do
            let mut worse = solution.clone();
            worse.cost += 1.0;
            Ok(vec![worse, solution])
        }

        fn name(&self) -> &str {
            "fake"
        }
    }
}
