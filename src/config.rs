//! Configuration management

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{self, Context, Result};
use chrono::{NaiveDate, Utc};

use crate::defaults::{AVG_SPEED_KMPH, MIN_WEIGHT_KG, VEHICLES_PER_TYPE};
use crate::services::sweep::SweepSettings;
use crate::services::vrp::SolverConfig;
use crate::types::FleetType;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Sales plan CSV (cluster labels, codes, OD volumes)
    pub sales_plan_csv: PathBuf,

    /// Location reference CSV (coordinates and cutoffs)
    pub locations_csv: PathBuf,

    /// Precomputed travel-time table
    pub tats_csv: PathBuf,

    /// Where `RegionalOutput-<hub>.csv` files land
    pub output_dir: PathBuf,

    pub min_weight_kg: f64,

    /// Speed used when a travel-time row has no turnaround time
    pub avg_speed_kmph: f64,

    pub vehicles_per_type: usize,

    /// Fleet types offered at every location
    pub fleet: Vec<FleetType>,

    /// Day that planning hour 0 maps to
    pub planning_date: NaiveDate,

    pub solver: SolverConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through `var`, which returns a variable's value if set
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sales_plan_csv = var("SALES_PLAN_CSV")
            .context("SALES_PLAN_CSV must be set")?
            .into();

        let locations_csv = var("LOCATIONS_CSV")
            .context("LOCATIONS_CSV must be set")?
            .into();

        let tats_csv = var("TATS_CSV")
            .context("TATS_CSV must be set")?
            .into();

        let output_dir = var("OUTPUT_DIR")
            .unwrap_or_else(|| "output".to_string())
            .into();

        let fleet = match var("FLEET_TYPES") {
            Some(value) => parse_fleet(&value)?,
            None => FleetType::DEFAULT_FLEET.to_vec(),
        };

        let planning_date = match var("PLANNING_DATE") {
            Some(value) => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .with_context(|| format!("PLANNING_DATE must be YYYY-MM-DD, got '{}'", value))?,
            None => Utc::now().date_naive(),
        };

        let defaults = SolverConfig::default();
        let solver = SolverConfig::new(
            parse_or(&var, "SOLVER_MAX_TIME_SECONDS", defaults.max_time_seconds)?,
            parse_or(&var, "SOLVER_MAX_GENERATIONS", defaults.max_generations)?,
        );

        let config = Self {
            sales_plan_csv,
            locations_csv,
            tats_csv,
            output_dir,
            min_weight_kg: parse_or(&var, "MIN_WEIGHT_KG", MIN_WEIGHT_KG)?,
            avg_speed_kmph: parse_or(&var, "AVG_SPEED_KMPH", AVG_SPEED_KMPH)?,
            vehicles_per_type: parse_or(&var, "VEHICLES_PER_TYPE", VEHICLES_PER_TYPE)?,
            fleet,
            planning_date,
            solver,
        };

        if config.avg_speed_kmph <= 0.0 {
            anyhow::bail!("AVG_SPEED_KMPH must be positive (current: {})", config.avg_speed_kmph);
        }
        if config.vehicles_per_type == 0 {
            anyhow::bail!("VEHICLES_PER_TYPE must be at least 1");
        }

        Ok(config)
    }

    /// Sweep settings with the configured fleet
    pub fn sweep_settings(&self) -> SweepSettings {
        SweepSettings {
            fleet: self.fleet.clone(),
            vehicles_per_type: self.vehicles_per_type,
            ..SweepSettings::default()
        }
    }
}

fn parse_or<F, T>(var: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|err| anyhow::anyhow!("{} has invalid value '{}': {}", name, value, err)),
        None => Ok(default),
    }
}

/// Comma separated fleet types, e.g. `14_Feet,32ft`
fn parse_fleet(value: &str) -> Result<Vec<FleetType>> {
    let fleet = value
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| item.parse::<FleetType>().map_err(|err| anyhow::anyhow!("FLEET_TYPES: {}", err)))
        .collect::<Result<Vec<_>>>()?;

    if fleet.is_empty() {
        anyhow::bail!("FLEET_TYPES must name at least one fleet type");
    }
    Ok(fleet)
}
