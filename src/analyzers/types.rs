//! Data types used by the segmentation and aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::orders::Period;

/// Cost components itemized on every order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostComponent {
    Fuel,
    Toll,
    Maintenance,
}

impl CostComponent {
    pub const ALL: [CostComponent; 3] = [
        CostComponent::Fuel,
        CostComponent::Toll,
        CostComponent::Maintenance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CostComponent::Fuel => "fuel",
            CostComponent::Toll => "toll",
            CostComponent::Maintenance => "maintenance",
        }
    }
}

/// The four record-inclusion policies a period rate can be computed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InclusionPolicy {
    /// Every order in the supplied set.
    AllOrders,
    /// Orders whose total cost is strictly positive.
    WithCost,
    /// Per component, only orders carrying that component's cost.
    WithComponent,
    /// Refuel-to-refuel cycles drawn from the complete cycle table.
    BetweenCycles,
}

impl InclusionPolicy {
    pub const ALL: [InclusionPolicy; 4] = [
        InclusionPolicy::AllOrders,
        InclusionPolicy::WithCost,
        InclusionPolicy::WithComponent,
        InclusionPolicy::BetweenCycles,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InclusionPolicy::AllOrders => "all_orders",
            InclusionPolicy::WithCost => "orders_with_cost",
            InclusionPolicy::WithComponent => "orders_with_component",
            InclusionPolicy::BetweenCycles => "between_cycles",
        }
    }
}

/// Indicators the cross-method comparator can spread across policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    FuelRate,
    TollRate,
    Efficiency,
    CostPerLiter,
}

/// One refuel-to-refuel span of a vehicle's order sequence.
///
/// Rates are undefined (`NaN`) when their denominator is zero; that
/// marker survives until the outward-facing period table is finalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cycle {
    pub vehicle: String,
    /// Period of the closing refuel order.
    pub period: Period,
    /// 1-based sequential index within the vehicle.
    pub cycle_index: u32,
    pub refuel_at: DateTime<Utc>,
    /// Close time of the previous refuel; `None` for the first cycle.
    pub prev_refuel_at: Option<DateTime<Utc>>,
    /// Fractional days since the previous refuel; `None` for the first cycle.
    pub elapsed_days: Option<f64>,
    pub fuel_liters: f64,
    pub fuel_unit_price: f64,
    /// Fuel cost of the closing order.
    pub fuel_cost: f64,
    /// Toll cost accumulated since the previous refuel, inclusive of the
    /// closing order.
    pub toll_cost: f64,
    pub maintenance_cost: f64,
    pub total_cost: f64,
    /// Distance accumulated since the previous refuel, inclusive of the
    /// closing order.
    pub distance_km: f64,
    /// Orders folded into the cycle, the closing refuel order included.
    pub orders: u32,
    pub distinct_routes: u32,
    pub distinct_projects: u32,
    pub mean_order_distance_km: f64,
    /// Distance per whole elapsed day; 0 for the first cycle or when the
    /// whole-day count is zero.
    pub km_per_day: f64,
    pub fuel_rate: f64,
    pub toll_rate: f64,
    pub maintenance_rate: f64,
    pub efficiency_km_per_liter: f64,
    pub cost_per_liter: f64,
}

/// Orders trailing a vehicle's last refuel, never closed into a cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenSpan {
    pub vehicle: String,
    pub orders: u32,
    pub distance_km: f64,
}

/// Full segmentation result: the cycle table plus the per-vehicle
/// diagnostics for discarded trailing spans.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleTable {
    pub cycles: Vec<Cycle>,
    pub open_spans: Vec<OpenSpan>,
}

/// Rates and counts for one inclusion policy within one period.
///
/// For the all-orders and with-cost policies the three record counts
/// coincide (one shared subset); the component-wise policies count each
/// component's own subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolicyAggregate {
    pub fuel_rate: f64,
    pub toll_rate: f64,
    pub maintenance_rate: f64,
    pub efficiency_km_per_liter: f64,
    pub cost_per_liter: f64,
    pub fuel_records: u64,
    pub toll_records: u64,
    pub maintenance_records: u64,
}

impl PolicyAggregate {
    /// A cell with no qualifying data: all rates undefined, counts zero.
    pub fn undefined() -> Self {
        PolicyAggregate {
            fuel_rate: f64::NAN,
            toll_rate: f64::NAN,
            maintenance_rate: f64::NAN,
            efficiency_km_per_liter: f64::NAN,
            cost_per_liter: f64::NAN,
            fuel_records: 0,
            toll_records: 0,
            maintenance_records: 0,
        }
    }

    pub fn rate(&self, component: CostComponent) -> f64 {
        match component {
            CostComponent::Fuel => self.fuel_rate,
            CostComponent::Toll => self.toll_rate,
            CostComponent::Maintenance => self.maintenance_rate,
        }
    }

    pub fn indicator(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::FuelRate => self.fuel_rate,
            Indicator::TollRate => self.toll_rate,
            Indicator::Efficiency => self.efficiency_km_per_liter,
            Indicator::CostPerLiter => self.cost_per_liter,
        }
    }

    /// Replaces undefined rates with the presentation default of 0.
    pub fn finalized(&self) -> Self {
        let fill = |v: f64| if v.is_finite() { v } else { 0.0 };
        PolicyAggregate {
            fuel_rate: fill(self.fuel_rate),
            toll_rate: fill(self.toll_rate),
            maintenance_rate: fill(self.maintenance_rate),
            efficiency_km_per_liter: fill(self.efficiency_km_per_liter),
            cost_per_liter: fill(self.cost_per_liter),
            ..*self
        }
    }
}

/// One period's rates under all four inclusion policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodAggregate {
    pub period: Period,
    pub all_orders: PolicyAggregate,
    pub with_cost: PolicyAggregate,
    pub with_component: PolicyAggregate,
    pub between_cycles: PolicyAggregate,
}

impl PeriodAggregate {
    pub fn policy(&self, policy: InclusionPolicy) -> &PolicyAggregate {
        match policy {
            InclusionPolicy::AllOrders => &self.all_orders,
            InclusionPolicy::WithCost => &self.with_cost,
            InclusionPolicy::WithComponent => &self.with_component,
            InclusionPolicy::BetweenCycles => &self.between_cycles,
        }
    }

    pub fn finalized(&self) -> Self {
        PeriodAggregate {
            period: self.period,
            all_orders: self.all_orders.finalized(),
            with_cost: self.with_cost.finalized(),
            with_component: self.with_component.finalized(),
            between_cycles: self.between_cycles.finalized(),
        }
    }
}

/// One vehicle's cycles reduced to a single row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSummary {
    pub vehicle: String,
    pub cycles: u32,
    pub median_cycle_index: f64,
    pub median_orders: f64,
    pub median_distinct_routes: f64,
    pub median_distinct_projects: f64,
    pub mean_elapsed_days: f64,
    pub mean_distance_km: f64,
    pub mean_fuel_liters: f64,
    pub mean_fuel_unit_price: f64,
    pub mean_efficiency_km_per_liter: f64,
    pub mean_fuel_cost: f64,
    pub mean_toll_cost: f64,
    pub mean_maintenance_cost: f64,
    pub mean_total_cost: f64,
    pub mean_fuel_rate: f64,
    pub mean_toll_rate: f64,
    pub mean_maintenance_rate: f64,
    pub mean_order_distance_km: f64,
    pub mean_km_per_day: f64,
    pub total_distance_km: f64,
    pub total_orders: u64,
}

/// Sample mean and spread of one indicator under one policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSpread {
    pub policy: InclusionPolicy,
    pub mean: f64,
    pub stddev: f64,
    /// The per-period values the statistics were computed from.
    pub series: Vec<f64>,
}

/// Cross-method comparison of one indicator over a period window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodComparison {
    pub indicator: Indicator,
    /// Periods that survived the validity drop, ascending.
    pub periods: Vec<Period>,
    pub methods: Vec<MethodSpread>,
}

/// Per-period share of orders carrying each cost component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessRow {
    pub period: Period,
    pub orders: u64,
    pub with_fuel_cost: u64,
    pub with_toll_cost: u64,
    pub with_maintenance_cost: u64,
    pub pct_with_fuel_cost: f64,
    pub pct_with_toll_cost: f64,
    pub pct_with_maintenance_cost: f64,
}

/// Mean and spread plus the five-number summary of one variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub mean: f64,
    pub stddev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Whole-selection indicators for an already-filtered order set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOverview {
    pub orders: u64,
    pub vehicles: u64,
    pub projects: u64,
    pub routes: u64,
    pub periods: u64,
    pub fuel_cost_total: f64,
    pub toll_cost_total: f64,
    pub maintenance_cost_total: f64,
    pub total_cost: f64,
    pub distance_km_total: f64,
    /// Total cost over total distance; 0 when no distance was traveled.
    pub overall_rate: f64,
    pub mean_fuel_unit_price: f64,
    pub fuel_cost: DescriptiveStats,
    pub toll_cost: DescriptiveStats,
    pub maintenance_cost: DescriptiveStats,
    pub distance_km: DescriptiveStats,
}
