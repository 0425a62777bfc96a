//! Hub/branch cluster topology

use std::collections::HashMap;

use tracing::debug;

use crate::error::PlanningError;
use crate::types::LocationCode;

/// One row of the sales plan table
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRow {
    /// Present only on the row that opens a cluster
    pub cluster_head: Option<LocationCode>,
    pub location: LocationCode,
    /// Volume towards every network node, in row order, in thousands of kg
    pub volumes: Vec<f64>,
}

impl SalesRow {
    pub fn new(cluster_head: Option<&str>, location: &str, volumes: Vec<f64>) -> Self {
        Self {
            cluster_head: cluster_head
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_string),
            location: location.to_string(),
            volumes,
        }
    }
}

/// A hub and its ordered members (the hub included)
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub hub: LocationCode,
    pub members: Vec<LocationCode>,
}

impl Cluster {
    /// Position of the hub in the member list
    pub fn hub_index(&self) -> usize {
        self.index_of(&self.hub).unwrap_or(0)
    }

    pub fn index_of(&self, code: &str) -> Option<usize> {
        self.members.iter().position(|member| member == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index_of(code).is_some()
    }

    pub fn is_hub(&self, code: &str) -> bool {
        self.hub == code
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }
}

/// Split sales rows into clusters.
///
/// A labelled row opens a new cluster that spans every row up to the next
/// labelled row; the last cluster runs to the end of input.
pub fn build_clusters(rows: &[SalesRow]) -> Result<Vec<Cluster>, PlanningError> {
    let mut clusters = Vec::new();
    let mut open: Option<usize> = None;

    for (index, row) in rows.iter().enumerate() {
        if row.cluster_head.is_none() {
            if open.is_none() {
                return Err(PlanningError::MalformedInput(format!(
                    "row {} ('{}') precedes the first cluster head",
                    index, row.location
                )));
            }
            continue;
        }
        if let Some(start) = open {
            clusters.push(collect_cluster(&rows[start..index])?);
        }
        open = Some(index);
    }

    if let Some(start) = open {
        clusters.push(collect_cluster(&rows[start..])?);
    }

    let mut owner: HashMap<&str, &str> = HashMap::new();
    for cluster in &clusters {
        for member in &cluster.members {
            if let Some(previous) = owner.insert(member.as_str(), cluster.hub.as_str()) {
                return Err(PlanningError::MalformedInput(format!(
                    "location '{}' belongs to clusters '{}' and '{}'",
                    member, previous, cluster.hub
                )));
            }
        }
    }

    debug!("Built {} clusters from {} rows", clusters.len(), rows.len());
    Ok(clusters)
}

fn collect_cluster(rows: &[SalesRow]) -> Result<Cluster, PlanningError> {
    let hub = rows
        .first()
        .and_then(|row| row.cluster_head.clone())
        .ok_or_else(|| PlanningError::MalformedInput("empty cluster".to_string()))?;

    let mut members: Vec<LocationCode> = Vec::with_capacity(rows.len());
    for row in rows {
        if !members.contains(&row.location) {
            members.push(row.location.clone());
        }
    }

    if !members.contains(&hub) {
        return Err(PlanningError::MalformedInput(format!(
            "cluster head '{}' is not one of its own members",
            hub
        )));
    }

    Ok(Cluster { hub, members })
}
