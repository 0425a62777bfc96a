//! Sales plan lookups and per-cluster demand matrices

use std::collections::HashMap;

use crate::defaults::SALES_VOLUME_UNIT_KG;
use crate::error::PlanningError;
use crate::types::LocationCode;
use super::{Cluster, SalesRow};

/// Directed origin -> destination volumes over the whole network, in kg
#[derive(Debug, Clone, Default)]
pub struct SalesPlan {
    nodes: Vec<LocationCode>,
    volumes: HashMap<(LocationCode, LocationCode), f64>,
}

impl SalesPlan {
    /// Build from explicit kg volumes. Pairs not listed are unknown, not zero.
    #[cfg(test)]
    pub fn new(nodes: Vec<LocationCode>, volumes: HashMap<(LocationCode, LocationCode), f64>) -> Self {
        Self { nodes, volumes }
    }

    /// Build from sales rows; column `i` of every row is the volume towards row `i`'s node
    pub fn from_rows(rows: &[SalesRow]) -> Result<Self, PlanningError> {
        let nodes: Vec<LocationCode> = rows.iter().map(|row| row.location.clone()).collect();
        let mut volumes = HashMap::with_capacity(nodes.len() * nodes.len());

        for row in rows {
            if row.volumes.len() != nodes.len() {
                return Err(PlanningError::MalformedInput(format!(
                    "row '{}' has {} volume columns, expected {}",
                    row.location,
                    row.volumes.len(),
                    nodes.len()
                )));
            }
            for (destination, volume) in nodes.iter().zip(&row.volumes) {
                volumes.insert(
                    (row.location.clone(), destination.clone()),
                    volume * SALES_VOLUME_UNIT_KG,
                );
            }
        }

        Ok(Self { nodes, volumes })
    }

    pub fn nodes(&self) -> &[LocationCode] {
        &self.nodes
    }

    pub fn volume(&self, origin: &str, destination: &str) -> Result<f64, PlanningError> {
        self.volumes
            .get(&(origin.to_string(), destination.to_string()))
            .copied()
            .ok_or_else(|| PlanningError::MissingDemand {
                origin: origin.to_string(),
                destination: destination.to_string(),
            })
    }

    /// Everything leaving `node` for other network nodes, floored at `min_weight`
    pub fn total_outbound(&self, node: &str, min_weight: f64) -> Result<f64, PlanningError> {
        let mut total = 0.0;
        for other in self.nodes.iter().filter(|other| *other != node) {
            total += self.volume(node, other)?;
        }
        Ok(floor(total, min_weight))
    }

    /// Everything arriving at `node` from other network nodes, floored at `min_weight`
    pub fn total_inbound(&self, node: &str, min_weight: f64) -> Result<f64, PlanningError> {
        let mut total = 0.0;
        for other in self.nodes.iter().filter(|other| *other != node) {
            total += self.volume(other, node)?;
        }
        Ok(floor(total, min_weight))
    }

    /// Volume from `node` to all members of `cluster`
    pub fn total_to_cluster(&self, node: &str, cluster: &Cluster) -> Result<f64, PlanningError> {
        let mut total = 0.0;
        for member in &cluster.members {
            total += self.volume(node, member)?;
        }
        Ok(total)
    }
}

fn floor(total: f64, min_weight: f64) -> f64 {
    if total > 0.0 {
        total
    } else {
        min_weight
    }
}

/// Square demand matrix indexed by cluster member position, in kg
#[derive(Debug, Clone, PartialEq)]
pub struct DemandMatrix {
    cells: Vec<Vec<u32>>,
}

impl DemandMatrix {
    /// Fill hub <-> branch cells: hub -> branch is the branch's inbound total,
    /// branch -> hub its outbound total
    pub fn for_cluster(plan: &SalesPlan, cluster: &Cluster, min_weight: f64) -> Result<Self, PlanningError> {
        let size = cluster.len();
        let hub = cluster.hub_index();
        let mut cells = vec![vec![0u32; size]; size];

        for (index, member) in cluster.members.iter().enumerate() {
            if index == hub {
                continue;
            }
            cells[hub][index] = plan.total_inbound(member, min_weight)? as u32;
            cells[index][hub] = plan.total_outbound(member, min_weight)? as u32;
        }

        Ok(Self { cells })
    }

    #[cfg(test)]
    pub fn from_cells(cells: Vec<Vec<u32>>) -> Self {
        Self { cells }
    }

    #[cfg(test)]
    pub fn get(&self, from: usize, to: usize) -> u32 {
        self.cells[from][to]
    }

    /// Off-diagonal cells carrying demand, row-major
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(from, row)| {
            row.iter()
                .enumerate()
                .filter(move |(to, weight)| from != *to && **weight != 0)
                .map(move |(to, weight)| (from, to, *weight))
        })
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(entries: &[(&str, &str, f64)], nodes: &[&str]) -> SalesPlan {
        let mut volumes = HashMap::new();
        for origin in nodes {
            for destination in nodes {
                volumes.insert((origin.to_string(), destination.to_string()), 0.0);
            }
        }
        for (origin, destination, volume) in entries {
            volumes.insert((origin.to_string(), destination.to_string()), *volume);
        }
        SalesPlan::new(nodes.iter().map(|n| n.to_string()).collect(), volumes)
    }

    fn cluster(hub: &str, members: &[&str]) -> Cluster {
        Cluster {
            hub: hub.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn from_rows_scales_to_kg() {
        let rows = vec![
            SalesRow::new(Some("H"), "H", vec![0.0, 2.5]),
            SalesRow::new(None, "X", vec![1.0, 0.0]),
        ];
        let plan = SalesPlan::from_rows(&rows).unwrap();

        assert_eq!(plan.volume("H", "X").unwrap(), 2500.0);
        assert_eq!(plan.volume("X", "H").unwrap(), 1000.0);
        assert_eq!(plan.nodes(), &["H".to_string(), "X".to_string()]);
    }

    #[test]
    fn from_rows_rejects_short_rows() {
        let rows = vec![
            SalesRow::new(Some("H"), "H", vec![0.0]),
            SalesRow::new(None, "X", vec![1.0, 0.0]),
        ];
        assert!(matches!(SalesPlan::from_rows(&rows), Err(PlanningError::MalformedInput(_))));
    }

    #[test]
    fn from_rows_rejects_extra_volume_columns() {
        let rows = vec![
            SalesRow::new(Some("H"), "H", vec![0.0, 1.0]),
            SalesRow::new(None, "X", vec![1.0, 0.0, 4.0]),
        ];
        let error = SalesPlan::from_rows(&rows).unwrap_err();
        assert_eq!(
            error,
            PlanningError::MalformedInput("row 'X' has 3 volume columns, expected 2".to_string())
        );
    }

    #[test]
    fn unknown_pair_is_an_error_not_zero() {
        let plan = SalesPlan::new(vec!["H".into(), "X".into()], HashMap::new());
        assert_eq!(
            plan.volume("H", "X"),
            Err(PlanningError::MissingDemand {
                origin: "H".into(),
                destination: "X".into()
            })
        );
        assert!(plan.total_outbound("H", 100.0).is_err());
    }

    #[test]
    fn totals_skip_self_and_apply_floor() {
        let plan = plan(
            &[("X", "X", 999.0), ("X", "H", 30.0), ("X", "Y", 20.0), ("H", "X", 100.0)],
            &["H", "X", "Y"],
        );

        assert_eq!(plan.total_outbound("X", 100.0).unwrap(), 50.0);
        assert_eq!(plan.total_inbound("X", 100.0).unwrap(), 100.0);
        assert_eq!(plan.total_outbound("Y", 100.0).unwrap(), 100.0);
        assert_eq!(plan.total_inbound("H", 100.0).unwrap(), 30.0);
    }

    #[test]
    fn cluster_matrix_only_fills_hub_cells() {
        let plan = plan(
            &[("H", "X", 100.0), ("H", "Y", 50.0), ("X", "H", 30.0)],
            &["H", "X", "Y"],
        );
        let matrix = DemandMatrix::for_cluster(&plan, &cluster("H", &["H", "X", "Y"]), 100.0).unwrap();

        assert_eq!(
            matrix.rows(),
            &[vec![0, 100, 50], vec![30, 0, 0], vec![100, 0, 0]]
        );
        assert_eq!(
            matrix.nonzero().collect::<Vec<_>>(),
            vec![(0, 1, 100), (0, 2, 50), (1, 0, 30), (2, 0, 100)]
        );
    }

    #[test]
    fn total_to_cluster_sums_member_volumes() {
        let plan = plan(&[("X", "H", 30.0), ("X", "Z", 70.0)], &["H", "X", "Z"]);
        assert_eq!(plan.total_to_cluster("X", &cluster("H", &["H", "X"])).unwrap(), 30.0);
        assert_eq!(plan.total_to_cluster("X", &cluster("Z", &["Z"])).unwrap(), 70.0);
    }
}
