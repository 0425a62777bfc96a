//! Per-cluster CSV output of the dispatch sweep

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::services::network::{Cluster, NetworkModel};
use crate::services::reconstruct::{format_hours, network, summarize};
use crate::services::sweep::IterationResult;

const FIXED_COLUMNS: [&str; 12] = [
    "Cluster",
    "Iteration",
    "Network",
    "Cost",
    "Vehicles_Required",
    "Vehicle_Capacity_In_Tonnes",
    "Route",
    "Time_Route",
    "Dispatch_Time_From_Hub",
    "Arrival_Time_At_Hub",
    "Round_Trip_Duration",
    "Infeasible_Shipments",
];

/// `<dir>/RegionalOutput-<hub>.csv`
pub fn output_path(dir: &Path, hub: &str) -> PathBuf {
    dir.join(format!("RegionalOutput-{}.csv", hub))
}

/// Fixed columns, a delivery-day flag per member, a load column per hub
pub fn header(cluster: &Cluster, model: &NetworkModel) -> Vec<String> {
    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(cluster.members.iter().map(|member| format!("{}_Delivery_Day", member)));
    header.extend(model.clusters().iter().map(|c| c.hub.clone()));
    header
}

/// Writes one cluster's sweep, one row per vehicle plus a network row per
/// iteration
pub struct ClusterReport<'a, W: Write> {
    writer: csv::Writer<W>,
    cluster: &'a Cluster,
    model: &'a NetworkModel,
    rows: usize,
}

impl<'a> ClusterReport<'a, File> {
    /// Create the report file in `dir`, creating the directory if needed
    pub fn create(dir: &Path, cluster: &'a Cluster, model: &'a NetworkModel) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        let path = output_path(dir, &cluster.hub);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create report {}", path.display()))?;
        info!("Writing cluster {} report to {}", cluster.hub, path.display());
        Self::new(file, cluster, model)
    }
}

impl<'a, W: Write> ClusterReport<'a, W> {
    /// Wrap `sink` and write the header row
    pub fn new(sink: W, cluster: &'a Cluster, model: &'a NetworkModel) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(sink);
        writer
            .write_record(header(cluster, model))
            .context("Failed to write report header")?;
        Ok(Self {
            writer,
            cluster,
            model,
            rows: 0,
        })
    }

    pub fn write_iteration(&mut self, result: &IterationResult) -> Result<()> {
        let solution = &result.solution;
        let flags: Vec<&str> = self
            .cluster
            .members
            .iter()
            .map(|member| if result.infeasible_locations.contains(member) { "1" } else { "0" })
            .collect();

        for route in &solution.routes {
            let summary = summarize(route, result.dispatch_time, self.model)?;

            let mut record = vec![
                self.cluster.hub.clone(),
                result.iteration.to_string(),
                "-".to_string(),
                format!("{:.2}", solution.cost),
                solution.vehicle_count().to_string(),
                format!("{:.1}", summary.fleet.capacity_kg() as f64 / 1000.0),
                summary.route,
                summary.time_route,
                format_hours(result.dispatch_time),
                format_hours(summary.arrival),
                format_hours(summary.round_trip),
                result.unresolved.to_string(),
            ];
            record.extend(flags.iter().map(|flag| flag.to_string()));
            record.extend(summary.load_split.iter().map(|load| format!("{:.1}", load)));

            self.writer
                .write_record(&record)
                .with_context(|| format!("Failed to write row for vehicle {}", summary.vehicle_id))?;
            self.rows += 1;
        }

        self.writer
            .write_record(["", "", network(&solution.routes).as_str()])
            .context("Failed to write network row")?;
        self.writer.flush().context("Failed to flush report")?;
        Ok(())
    }

    /// Vehicle rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[cfg(test)]
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("Failed to flush report: {}", err.error()))
    }
}
