//! Network model: cluster topology, sales plan and location reference data
//!
//! Built once from the input tables and read-only afterwards.

mod demand;
mod loader;
mod topology;

pub use demand::{DemandMatrix, SalesPlan};
pub use loader::{read_locations, read_sales_plan, read_tats, TatRow};
pub use topology::{build_clusters, Cluster, SalesRow};

use std::collections::HashMap;

use tracing::info;

use crate::error::PlanningError;
use crate::types::{Cutoffs, LocationRecord};

/// Immutable planning input shared by every sweep
#[derive(Debug, Clone)]
pub struct NetworkModel {
    clusters: Vec<Cluster>,
    plan: SalesPlan,
    locations: HashMap<String, LocationRecord>,
    min_weight_kg: f64,
}

impl NetworkModel {
    /// Assemble the model from sales rows and location records.
    ///
    /// Fails when the topology is malformed or a cluster member has no
    /// location record.
    pub fn from_rows(
        rows: &[SalesRow],
        locations: Vec<LocationRecord>,
        min_weight_kg: f64,
    ) -> Result<Self, PlanningError> {
        let clusters = build_clusters(rows)?;
        let plan = SalesPlan::from_rows(rows)?;
        Self::new(clusters, plan, locations, min_weight_kg)
    }

    pub fn new(
        clusters: Vec<Cluster>,
        plan: SalesPlan,
        locations: Vec<LocationRecord>,
        min_weight_kg: f64,
    ) -> Result<Self, PlanningError> {
        let locations: HashMap<String, LocationRecord> = locations
            .into_iter()
            .map(|record| (record.code.clone(), record))
            .collect();

        for cluster in &clusters {
            for member in &cluster.members {
                if !locations.contains_key(member) {
                    return Err(PlanningError::UnknownLocation(member.clone()));
                }
            }
        }

        info!(
            "Network model ready: {} clusters, {} nodes",
            clusters.len(),
            plan.nodes().len()
        );

        Ok(Self {
            clusters,
            plan,
            locations,
            min_weight_kg,
        })
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn cluster(&self, hub: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|cluster| cluster.hub == hub)
    }

    pub fn sales_plan(&self) -> &SalesPlan {
        &self.plan
    }

    pub fn location(&self, code: &str) -> Result<&LocationRecord, PlanningError> {
        self.locations
            .get(code)
            .ok_or_else(|| PlanningError::UnknownLocation(code.to_string()))
    }

    /// Cutoffs of every member, in member order
    pub fn cutoffs(&self, cluster: &Cluster) -> Result<Vec<Cutoffs>, PlanningError> {
        cluster
            .members
            .iter()
            .map(|member| self.location(member).map(|record| record.cutoffs))
            .collect()
    }

    /// Location records of every member, in member order
    pub fn member_locations(&self, cluster: &Cluster) -> Result<Vec<&LocationRecord>, PlanningError> {
        cluster.members.iter().map(|member| self.location(member)).collect()
    }

    pub fn demand_matrix(&self, cluster: &Cluster) -> Result<DemandMatrix, PlanningError> {
        DemandMatrix::for_cluster(&self.plan, cluster, self.min_weight_kg)
    }
}
