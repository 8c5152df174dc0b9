//! CSV ingestion for the order dataset.
//!
//! The engine fails fast on schema problems: a missing column, a value
//! of the wrong type, or a record violating the order invariants is a
//! [`SchemaError`], surfaced before any computation starts.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::orders::Order;

/// Fatal input-contract violations in the order dataset.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Missing column, unparseable value, or malformed CSV.
    #[error("line {line}: {source}")]
    Malformed {
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("order {order_id} (line {line}): closed {closed_at} before it opened {opened_at}")]
    ClosedBeforeOpened {
        line: u64,
        order_id: String,
        opened_at: chrono::DateTime<chrono::Utc>,
        closed_at: chrono::DateTime<chrono::Utc>,
    },
    #[error("order {order_id} (line {line}): negative {field} ({value})")]
    NegativeValue {
        line: u64,
        order_id: String,
        field: &'static str,
        value: f64,
    },
}

/// Decodes and validates the order dataset from CSV bytes.
///
/// # Errors
///
/// Returns a [`SchemaError`] for the first record that is missing a
/// required field, carries a non-numeric cost, closes before it opens,
/// or holds a negative distance, cost, or fuel volume.
pub fn parse_orders(reader: impl Read) -> Result<Vec<Order>, SchemaError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut orders = Vec::new();

    for result in rdr.deserialize() {
        // Header line is 1, so the first record sits on line 2.
        let line = orders.len() as u64 + 2;
        let order: Order = result.map_err(|source| SchemaError::Malformed { line, source })?;
        validate(&order, line)?;
        orders.push(order);
    }

    Ok(orders)
}

fn validate(order: &Order, line: u64) -> Result<(), SchemaError> {
    if order.closed_at < order.opened_at {
        return Err(SchemaError::ClosedBeforeOpened {
            line,
            order_id: order.order_id.clone(),
            opened_at: order.opened_at,
            closed_at: order.closed_at,
        });
    }

    let numeric_fields = [
        ("distance_km", order.distance_km),
        ("fuel_liters", order.fuel_liters),
        ("fuel_unit_price", order.fuel_unit_price),
        ("fuel_cost", order.fuel_cost),
        ("toll_cost", order.toll_cost),
        ("maintenance_cost", order.maintenance_cost),
    ];
    for (field, value) in numeric_fields {
        if value < 0.0 {
            return Err(SchemaError::NegativeValue {
                line,
                order_id: order.order_id.clone(),
                field,
                value,
            });
        }
    }

    Ok(())
}

/// Reads the order dataset from a CSV file on disk.
pub fn read_orders(path: &str) -> Result<Vec<Order>> {
    let file = File::open(Path::new(path)).with_context(|| format!("opening {path}"))?;
    let orders = parse_orders(file).with_context(|| format!("reading orders from {path}"))?;
    debug!(path, count = orders.len(), "Order dataset loaded");
    Ok(orders)
}
