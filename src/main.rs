//! Regional Dispatch - hub dispatch-time planner for regional freight clusters
//!
//! Loads the sales plan and location data, sweeps hub dispatch times per
//! cluster over a VRP solver and writes one CSV report per cluster.

mod cli;
mod config;
mod defaults;
mod error;
mod services;
mod types;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use cli::{Cli, Command, SolverPreset};
use config::Config;
use services::network::{read_locations, read_sales_plan, read_tats, Cluster, NetworkModel};
use services::report::ClusterReport;
use services::routing::TatCostProvider;
use services::sweep::SweepDriver;
use services::vrp::PragmaticOptimizer;
use services::windows::ClusterWindows;

fn main() -> Result<()> {
    // Logs directory - use LOGS_DIR env var or default to ./logs
    let logs_dir = std::env::var("LOGS_DIR")
        .unwrap_or_else(|_| "./logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        &logs_dir,
        "regional-dispatch.log",
    );
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - both stdout and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,regional_dispatch=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())  // stdout
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))  // file
        .init();

    let cli = Cli::parse();
    info!("Starting regional dispatch planner...");

    let config = Config::from_env()?;
    info!("Configuration loaded");

    let command = cli.command.unwrap_or(Command::Plan {
        cluster: None,
        solver: None,
        output_dir: None,
    });

    let result = match command {
        Command::Plan { cluster, solver, output_dir } => plan(&config, cluster.as_deref(), solver, output_dir),
        Command::Inspect { cluster } => inspect(&config, cluster.as_deref()),
    };

    if let Err(e) = result {
        error!("Planning failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}

fn load_model(config: &Config) -> Result<NetworkModel> {
    let rows = read_sales_plan(&config.sales_plan_csv)?;
    let locations = read_locations(&config.locations_csv)?;
    NetworkModel::from_rows(&rows, locations, config.min_weight_kg)
        .context("Failed to build network model")
}

fn select_clusters<'a>(model: &'a NetworkModel, hub: Option<&str>) -> Result<Vec<&'a Cluster>> {
    match hub {
        Some(hub) => {
            let cluster = model
                .cluster(hub)
                .with_context(|| format!("No cluster is headed by '{}'", hub))?;
            Ok(vec![cluster])
        }
        None => Ok(model.clusters().iter().collect()),
    }
}

fn plan(
    config: &Config,
    hub: Option<&str>,
    preset: Option<SolverPreset>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let model = load_model(config)?;
    let costs = TatCostProvider::new(read_tats(&config.tats_csv)?, config.avg_speed_kmph);
    let solver = preset.map(SolverPreset::config).unwrap_or_else(|| config.solver.clone());
    let optimizer = PragmaticOptimizer::new(solver, config.planning_date);
    let driver = SweepDriver::new(&model, &costs, &optimizer, config.sweep_settings());
    let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());

    for cluster in select_clusters(&model, hub)? {
        let mut report = ClusterReport::create(&output_dir, cluster, &model)?;
        driver
            .sweep(cluster, |result| report.write_iteration(&result))
            .with_context(|| format!("Sweep failed for cluster {}", cluster.hub))?;
        info!("Cluster {} done: {} vehicle rows", cluster.hub, report.rows());
    }

    Ok(())
}

fn inspect(config: &Config, hub: Option<&str>) -> Result<()> {
    let model = load_model(config)?;
    let bounds = config.sweep_settings().bounds;

    for cluster in select_clusters(&model, hub)? {
        let demand = model.demand_matrix(cluster)?;
        let windows = ClusterWindows::derive(cluster, &model.cutoffs(cluster)?, &bounds);

        println!("Cluster {} ({} members)", cluster.hub, cluster.len());
        println!("Dispatch sweep: {}..={}", bounds.hub_lower, windows.max_branch_cutoff());
        for (index, member) in cluster.members.iter().enumerate() {
            println!(
                "  {:<10} pickup {:<10} delivery {:<10} demand {:?}",
                member,
                windows.pickup(index).to_string(),
                windows.delivery(index).to_string(),
                demand.rows()[index],
            );
        }
    }

    Ok(())
}
