//! Multi-method period aggregation: cost-per-distance and related rates
//! for every period in a record set, under four inclusion policies.
//!
//! Each policy runs its own pass with its own sums. Undefined cells
//! (`NaN`) survive every per-policy computation; [`finalize`] is the
//! single presentation-boundary step that replaces them with 0.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::analyzers::types::{CycleTable, PeriodAggregate, PolicyAggregate};
use crate::analyzers::utility::ratio;
use crate::orders::{Order, Period};

/// Sums folded over one subset of orders.
#[derive(Debug, Default)]
struct CostSums {
    fuel_cost: f64,
    toll_cost: f64,
    maintenance_cost: f64,
    distance_km: f64,
    fuel_liters: f64,
    records: u64,
}

impl CostSums {
    fn fold(&mut self, order: &Order) {
        self.fuel_cost += order.fuel_cost;
        self.toll_cost += order.toll_cost;
        self.maintenance_cost += order.maintenance_cost;
        self.distance_km += order.distance_km;
        self.fuel_liters += order.fuel_liters;
        self.records += 1;
    }

    /// One shared subset: the three per-component counts coincide.
    fn into_aggregate(self) -> PolicyAggregate {
        PolicyAggregate {
            fuel_rate: ratio(self.fuel_cost, self.distance_km),
            toll_rate: ratio(self.toll_cost, self.distance_km),
            maintenance_rate: ratio(self.maintenance_cost, self.distance_km),
            efficiency_km_per_liter: ratio(self.distance_km, self.fuel_liters),
            cost_per_liter: ratio(self.fuel_cost, self.fuel_liters),
            fuel_records: self.records,
            toll_records: self.records,
            maintenance_records: self.records,
        }
    }
}

fn fold_by_period<'a>(
    orders: impl Iterator<Item = &'a Order>,
) -> BTreeMap<Period, CostSums> {
    let mut sums: BTreeMap<Period, CostSums> = BTreeMap::new();
    for order in orders {
        sums.entry(order.period).or_default().fold(order);
    }
    sums
}

/// Every order in the supplied set.
fn all_orders(orders: &[Order]) -> BTreeMap<Period, PolicyAggregate> {
    fold_by_period(orders.iter())
        .into_iter()
        .map(|(period, sums)| (period, sums.into_aggregate()))
        .collect()
}

/// Orders whose total cost is strictly positive.
fn orders_with_cost(orders: &[Order]) -> BTreeMap<Period, PolicyAggregate> {
    fold_by_period(orders.iter().filter(|o| o.total_cost() > 0.0))
        .into_iter()
        .map(|(period, sums)| (period, sums.into_aggregate()))
        .collect()
}

/// Per component, only orders carrying that component's own cost. The
/// fuel subset also supplies efficiency and mean unit fuel cost; the
/// toll and maintenance subsets carry no fuel figures.
fn orders_with_component(orders: &[Order]) -> BTreeMap<Period, PolicyAggregate> {
    let fuel = fold_by_period(orders.iter().filter(|o| o.has_fuel_cost()));
    let toll = fold_by_period(orders.iter().filter(|o| o.has_toll_cost()));
    let maintenance = fold_by_period(orders.iter().filter(|o| o.has_maintenance_cost()));

    let periods: BTreeSet<Period> = fuel
        .keys()
        .chain(toll.keys())
        .chain(maintenance.keys())
        .copied()
        .collect();

    periods
        .into_iter()
        .map(|period| {
            let mut agg = PolicyAggregate::undefined();
            if let Some(sums) = fuel.get(&period) {
                agg.fuel_rate = ratio(sums.fuel_cost, sums.distance_km);
                agg.efficiency_km_per_liter = ratio(sums.distance_km, sums.fuel_liters);
                agg.cost_per_liter = ratio(sums.fuel_cost, sums.fuel_liters);
                agg.fuel_records = sums.records;
            }
            if let Some(sums) = toll.get(&period) {
                agg.toll_rate = ratio(sums.toll_cost, sums.distance_km);
                agg.toll_records = sums.records;
            }
            if let Some(sums) = maintenance.get(&period) {
                agg.maintenance_rate = ratio(sums.maintenance_cost, sums.distance_km);
                agg.maintenance_records = sums.records;
            }
            (period, agg)
        })
        .collect()
}

/// All cycles whose period falls in `periods`, drawn from the complete
/// cycle table. Deliberately ignores any record-level filter applied to
/// the order set: a cycle's accumulators span a contiguous run of
/// orders, and re-deriving them from a filtered subset would corrupt
/// the totals.
fn between_cycles(
    cycles: &CycleTable,
    periods: &BTreeSet<Period>,
) -> BTreeMap<Period, PolicyAggregate> {
    #[derive(Default)]
    struct CycleSums {
        fuel_cost: f64,
        toll_cost: f64,
        maintenance_cost: f64,
        distance_km: f64,
        fuel_liters: f64,
        cycles: u64,
        with_toll: u64,
        with_maintenance: u64,
    }

    let mut sums: BTreeMap<Period, CycleSums> = BTreeMap::new();
    for cycle in cycles.cycles.iter().filter(|c| periods.contains(&c.period)) {
        let entry = sums.entry(cycle.period).or_default();
        entry.fuel_cost += cycle.fuel_cost;
        entry.toll_cost += cycle.toll_cost;
        entry.maintenance_cost += cycle.maintenance_cost;
        entry.distance_km += cycle.distance_km;
        entry.fuel_liters += cycle.fuel_liters;
        entry.cycles += 1;
        if cycle.toll_cost > 0.0 {
            entry.with_toll += 1;
        }
        if cycle.maintenance_cost > 0.0 {
            entry.with_maintenance += 1;
        }
    }

    sums.into_iter()
        .map(|(period, s)| {
            let agg = PolicyAggregate {
                fuel_rate: ratio(s.fuel_cost, s.distance_km),
                toll_rate: ratio(s.toll_cost, s.distance_km),
                maintenance_rate: ratio(s.maintenance_cost, s.distance_km),
                efficiency_km_per_liter: ratio(s.distance_km, s.fuel_liters),
                cost_per_liter: ratio(s.fuel_cost, s.fuel_liters),
                fuel_records: s.cycles,
                toll_records: s.with_toll,
                maintenance_records: s.with_maintenance,
            };
            (period, agg)
        })
        .collect()
}

/// Computes the raw period table: one row per period present in the
/// supplied order set, each holding all four policy cells. Undefined
/// rates stay `NaN`; apply [`finalize`] before presenting the table.
pub fn aggregate_periods(orders: &[Order], cycles: &CycleTable) -> Vec<PeriodAggregate> {
    let periods: BTreeSet<Period> = orders.iter().map(|o| o.period).collect();

    let all = all_orders(orders);
    let with_cost = orders_with_cost(orders);
    let with_component = orders_with_component(orders);
    let between = between_cycles(cycles, &periods);

    let cell = |map: &BTreeMap<Period, PolicyAggregate>, period: &Period| {
        map.get(period).copied().unwrap_or_else(PolicyAggregate::undefined)
    };

    let rows: Vec<PeriodAggregate> = periods
        .iter()
        .map(|period| PeriodAggregate {
            period: *period,
            all_orders: cell(&all, period),
            with_cost: cell(&with_cost, period),
            with_component: cell(&with_component, period),
            between_cycles: cell(&between, period),
        })
        .collect();

    debug!(periods = rows.len(), "Period aggregation complete");
    rows
}

/// The single finalize-for-presentation step: replaces every undefined
/// cell with 0. Applied once, at the outward-facing table boundary, so
/// intermediate computations never see a zero-filled default.
pub fn finalize(rows: &[PeriodAggregate]) -> Vec<PeriodAggregate> {
    rows.iter().map(PeriodAggregate::finalized).collect()
}
