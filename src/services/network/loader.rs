//! CSV readers for the sales plan, location and travel-time tables

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::PlanningError;
use crate::types::{Coordinates, Cutoffs, LocationRecord};
use super::SalesRow;

#[derive(Debug, Deserialize)]
struct CsvLocationRow {
    #[serde(alias = "location_id")]
    id: i64,
    #[serde(alias = "location_name")]
    name: String,
    #[serde(alias = "location_code")]
    code: String,
    #[serde(alias = "latitude")]
    lat: Option<f64>,
    #[serde(alias = "longitude")]
    lng: Option<f64>,
    #[serde(alias = "outbound_cutoff")]
    outbound_cutoff_ms: i64,
    #[serde(alias = "inbound_cutoff")]
    inbound_cutoff_ms: i64,
}

/// Row of the precomputed travel table; ids refer to [`LocationRecord::id`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TatRow {
    pub from_id: i64,
    pub to_id: i64,
    pub distance_km: f64,
    /// Turnaround time in milliseconds, derived from speed when absent
    #[serde(default)]
    pub tat_ms: Option<i64>,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

pub fn read_sales_plan(path: &Path) -> Result<Vec<SalesRow>> {
    let rows = parse_sales_plan(open(path)?)
        .with_context(|| format!("Failed to read sales plan {}", path.display()))?;
    info!("Loaded {} sales plan rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn read_locations(path: &Path) -> Result<Vec<LocationRecord>> {
    let locations = parse_locations(open(path)?)
        .with_context(|| format!("Failed to read locations {}", path.display()))?;
    info!("Loaded {} locations from {}", locations.len(), path.display());
    Ok(locations)
}

pub fn read_tats(path: &Path) -> Result<Vec<TatRow>> {
    let rows = parse_tats(open(path)?)
        .with_context(|| format!("Failed to read travel times {}", path.display()))?;
    info!("Loaded {} travel-time pairs from {}", rows.len(), path.display());
    Ok(rows)
}

/// Columns: cluster head (may be empty), location code, one volume per network node
pub fn parse_sales_plan<R: Read>(reader: R) -> Result<Vec<SalesRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let location = record
            .get(1)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| PlanningError::MalformedInput(format!("row {} has no location code", line + 1)))?;

        let volumes = record
            .iter()
            .skip(2)
            .map(|cell| {
                if cell.is_empty() {
                    Ok(0.0)
                } else {
                    cell.parse::<f64>().map_err(|_| {
                        PlanningError::MalformedInput(format!(
                            "row {} ('{}') has non-numeric volume '{}'",
                            line + 1,
                            location,
                            cell
                        ))
                    })
                }
            })
            .collect::<Result<Vec<f64>, PlanningError>>()?;

        rows.push(SalesRow::new(record.get(0), location, volumes));
    }
    Ok(rows)
}

pub fn parse_locations<R: Read>(reader: R) -> Result<Vec<LocationRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut locations = Vec::new();
    for result in reader.deserialize() {
        let row: CsvLocationRow = result?;
        let coordinates = match (row.lat, row.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => {
                warn!("Location {} has no coordinates", row.code);
                None
            }
        };
        locations.push(LocationRecord {
            id: row.id,
            name: row.name,
            code: row.code,
            coordinates,
            cutoffs: Cutoffs::from_millis(row.outbound_cutoff_ms, row.inbound_cutoff_ms),
        });
    }
    Ok(locations)
}

pub fn parse_tats<R: Read>(reader: R) -> Result<Vec<TatRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: TatRow = result?;
        rows.push(row);
    }
    Ok(rows)
}
