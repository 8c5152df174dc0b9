//! Cycle segmentation: partitions each vehicle's time-ordered orders
//! into refuel-to-refuel cycles.
//!
//! The scan is a fold with an explicit accumulator. Every order is
//! folded into the running state; an order carrying a fuel cost then
//! closes the cycle, emitting a [`Cycle`] from the accumulated totals
//! and the closing order's fuel figures, and the accumulator resets.
//! Orders trailing the last refuel never close a cycle and are reported
//! as [`OpenSpan`] diagnostics instead of being silently dropped.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::analyzers::types::{Cycle, CycleTable, OpenSpan};
use crate::analyzers::utility::{mean, ratio};
use crate::orders::Order;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Running totals for the cycle currently being accumulated.
#[derive(Debug, Default)]
struct Accumulator {
    distance_km: f64,
    toll_cost: f64,
    maintenance_cost: f64,
    orders: u32,
    order_distances: Vec<f64>,
    routes: HashSet<String>,
    projects: HashSet<String>,
}

impl Accumulator {
    fn fold(&mut self, order: &Order) {
        self.distance_km += order.distance_km;
        self.toll_cost += order.toll_cost;
        self.maintenance_cost += order.maintenance_cost;
        self.orders += 1;
        self.order_distances.push(order.distance_km);
        self.routes.insert(order.route.clone());
        self.projects.insert(order.project.clone());
    }

    /// Emits the cycle closed by `refuel`, whose own figures are already
    /// folded into the accumulator.
    fn close(
        &self,
        refuel: &Order,
        cycle_index: u32,
        prev_refuel_at: Option<DateTime<Utc>>,
    ) -> Cycle {
        let refuel_at = refuel.closed_at;
        let elapsed_days = prev_refuel_at
            .map(|prev| (refuel_at - prev).num_seconds() as f64 / SECONDS_PER_DAY);
        let km_per_day = match prev_refuel_at {
            Some(prev) => {
                let whole_days = (refuel_at - prev).num_days();
                if whole_days != 0 {
                    self.distance_km / whole_days as f64
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        let total_cost = refuel.fuel_cost + self.toll_cost + self.maintenance_cost;

        Cycle {
            vehicle: refuel.vehicle.clone(),
            period: refuel.period,
            cycle_index,
            refuel_at,
            prev_refuel_at,
            elapsed_days,
            fuel_liters: refuel.fuel_liters,
            fuel_unit_price: refuel.fuel_unit_price,
            fuel_cost: refuel.fuel_cost,
            toll_cost: self.toll_cost,
            maintenance_cost: self.maintenance_cost,
            total_cost,
            distance_km: self.distance_km,
            orders: self.orders,
            distinct_routes: self.routes.len() as u32,
            distinct_projects: self.projects.len() as u32,
            mean_order_distance_km: mean(&self.order_distances),
            km_per_day,
            fuel_rate: ratio(refuel.fuel_cost, self.distance_km),
            toll_rate: ratio(self.toll_cost, self.distance_km),
            maintenance_rate: ratio(self.maintenance_cost, self.distance_km),
            efficiency_km_per_liter: ratio(self.distance_km, refuel.fuel_liters),
            cost_per_liter: ratio(refuel.fuel_cost, refuel.fuel_liters),
        }
    }
}

fn segment_vehicle(orders: &[&Order]) -> (Vec<Cycle>, Option<OpenSpan>) {
    let mut ordered = orders.to_vec();
    ordered.sort_by_key(|o| o.opened_at);

    let mut acc = Accumulator::default();
    let mut prev_refuel_at: Option<DateTime<Utc>> = None;
    let mut cycles = Vec::new();

    for order in ordered {
        acc.fold(order);
        if order.has_fuel_cost() {
            let cycle_index = cycles.len() as u32 + 1;
            cycles.push(acc.close(order, cycle_index, prev_refuel_at));
            prev_refuel_at = Some(order.closed_at);
            acc = Accumulator::default();
        }
    }

    let open_span = (acc.orders > 0).then(|| OpenSpan {
        vehicle: orders[0].vehicle.clone(),
        orders: acc.orders,
        distance_km: acc.distance_km,
    });

    (cycles, open_span)
}

/// Segments the full order dataset into per-vehicle cycles.
///
/// Vehicles are scanned independently in ascending vehicle-id order, so
/// the emitted table is deterministic for a fixed input. The input is
/// not mutated and no state survives the call.
pub fn segment_orders(orders: &[Order]) -> CycleTable {
    let mut by_vehicle: BTreeMap<&str, Vec<&Order>> = BTreeMap::new();
    for order in orders {
        by_vehicle.entry(&order.vehicle).or_default().push(order);
    }

    let mut table = CycleTable::default();
    for vehicle_orders in by_vehicle.values() {
        let (cycles, open_span) = segment_vehicle(vehicle_orders);
        table.cycles.extend(cycles);
        if let Some(span) = open_span {
            warn!(
                vehicle = %span.vehicle,
                orders = span.orders,
                distance_km = span.distance_km,
                "Orders after the last refuel were not closed into a cycle"
            );
            table.open_spans.push(span);
        }
    }

    debug!(
        vehicles = by_vehicle.len(),
        cycles = table.cycles.len(),
        open_spans = table.open_spans.len(),
        "Segmentation complete"
    );

    table
}
