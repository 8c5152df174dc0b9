//! Fingerprint-keyed memoization of the segmented cycle table.
//!
//! The unit of caching is the whole dataset: any change to any order
//! changes the fingerprint and recomputes the table from scratch. There
//! is no partial or incremental invalidation.

use std::hash::{DefaultHasher, Hash, Hasher};

use tracing::debug;

use crate::analyzers::segmenter::segment_orders;
use crate::analyzers::types::CycleTable;
use crate::orders::Order;

/// Stable 64-bit fingerprint of an order dataset.
pub fn fingerprint(orders: &[Order]) -> u64 {
    let mut hasher = DefaultHasher::new();
    orders.len().hash(&mut hasher);
    for order in orders {
        order.order_id.hash(&mut hasher);
        order.vehicle.hash(&mut hasher);
        order.project.hash(&mut hasher);
        order.route.hash(&mut hasher);
        order.period.to_string().hash(&mut hasher);
        order.opened_at.timestamp().hash(&mut hasher);
        order.closed_at.timestamp().hash(&mut hasher);
        order.distance_km.to_bits().hash(&mut hasher);
        order.fuel_liters.to_bits().hash(&mut hasher);
        order.fuel_unit_price.to_bits().hash(&mut hasher);
        order.fuel_cost.to_bits().hash(&mut hasher);
        order.toll_cost.to_bits().hash(&mut hasher);
        order.maintenance_cost.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

/// Memoized cycle segmentation keyed by the dataset fingerprint.
#[derive(Debug, Default)]
pub struct CycleCache {
    stamp: Option<u64>,
    table: CycleTable,
    hits: u64,
    misses: u64,
}

impl CycleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cycle table for `orders`, recomputing only when the
    /// dataset fingerprint changed since the last call.
    pub fn get_or_segment(&mut self, orders: &[Order]) -> &CycleTable {
        let stamp = fingerprint(orders);
        if self.stamp == Some(stamp) {
            self.hits += 1;
            debug!(stamp, hits = self.hits, "Cycle table cache hit");
        } else {
            self.misses += 1;
            debug!(stamp, misses = self.misses, "Cycle table cache miss, segmenting");
            self.table = segment_orders(orders);
            self.stamp = Some(stamp);
        }
        &self.table
    }

    /// Drops the cached table; the next call recomputes unconditionally.
    pub fn invalidate(&mut self) {
        self.stamp = None;
        self.table = CycleTable::default();
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
