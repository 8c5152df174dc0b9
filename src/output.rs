//! Output formatting and persistence for the engine's tables.
//!
//! Supports CSV table writing, JSON serialization, and stdout printing.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::analyzers::types::{
    CostComponent, CycleTable, InclusionPolicy, PeriodAggregate, VehicleSummary,
};

/// Writes the cycle table as CSV, one row per cycle.
///
/// The column set is stable regardless of input size; undefined rates
/// are written as `NaN` and first-cycle previous-refuel fields as empty.
pub fn write_cycles_csv(path: &str, table: &CycleTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for cycle in &table.cycles {
        writer.serialize(cycle)?;
    }
    writer.flush()?;
    debug!(path, rows = table.cycles.len(), "Cycle table written");
    Ok(())
}

/// Writes the per-vehicle summary table as CSV.
pub fn write_summaries_csv(path: &str, summaries: &[VehicleSummary]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;
    debug!(path, rows = summaries.len(), "Vehicle summary table written");
    Ok(())
}

/// Column names of the flat period table: `period` plus eight columns
/// per inclusion policy.
pub fn period_csv_header() -> Vec<String> {
    let mut header = vec!["period".to_string()];
    for policy in InclusionPolicy::ALL {
        let p = policy.label();
        for component in CostComponent::ALL {
            header.push(format!("{p}_{}_rate", component.label()));
        }
        header.push(format!("{p}_efficiency_km_per_liter"));
        header.push(format!("{p}_cost_per_liter"));
        header.push(format!("{p}_fuel_records"));
        header.push(format!("{p}_toll_records"));
        header.push(format!("{p}_maintenance_records"));
    }
    header
}

/// Writes the period aggregate table as flat CSV with the full
/// four-policy column set, present even when the table is empty.
pub fn write_period_csv(path: &str, rows: &[PeriodAggregate]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(period_csv_header())?;

    for row in rows {
        let mut record = vec![row.period.to_string()];
        for policy in InclusionPolicy::ALL {
            let cell = row.policy(policy);
            for component in CostComponent::ALL {
                record.push(cell.rate(component).to_string());
            }
            record.push(cell.efficiency_km_per_liter.to_string());
            record.push(cell.cost_per_liter.to_string());
            record.push(cell.fuel_records.to_string());
            record.push(cell.toll_records.to_string());
            record.push(cell.maintenance_records.to_string());
        }
        writer.write_record(record)?;
    }

    writer.flush()?;
    debug!(path, rows = rows.len(), "Period aggregate table written");
    Ok(())
}

/// Writes any serializable value as pretty JSON to a file.
pub fn write_json(path: &str, value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    debug!(path, "JSON written");
    Ok(())
}

/// Prints any serializable value as pretty JSON to stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
