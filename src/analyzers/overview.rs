//! Whole-selection descriptive statistics for an already-filtered
//! order set.

use std::collections::BTreeSet;

use crate::analyzers::types::{DescriptiveStats, SelectionOverview};
use crate::analyzers::utility::{mean, quantile, sample_stddev};
use crate::orders::Order;

fn descriptive(values: &[f64]) -> DescriptiveStats {
    // Non-finite inputs are excluded before describing the variable.
    let defined: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if defined.is_empty() {
        return DescriptiveStats {
            mean: f64::NAN,
            stddev: f64::NAN,
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
        };
    }

    DescriptiveStats {
        mean: mean(&defined),
        stddev: sample_stddev(&defined),
        min: defined.iter().copied().fold(f64::INFINITY, f64::min),
        q1: quantile(&defined, 0.25),
        median: quantile(&defined, 0.5),
        q3: quantile(&defined, 0.75),
        max: defined.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Reduces a selection to its headline indicators: distinct-entity
/// counts, cost and distance totals, the overall cost-per-distance, and
/// per-variable descriptive statistics.
pub fn selection_overview(orders: &[Order]) -> SelectionOverview {
    let vehicles: BTreeSet<&str> = orders.iter().map(|o| o.vehicle.as_str()).collect();
    let projects: BTreeSet<&str> = orders.iter().map(|o| o.project.as_str()).collect();
    let routes: BTreeSet<&str> = orders.iter().map(|o| o.route.as_str()).collect();
    let periods: BTreeSet<_> = orders.iter().map(|o| o.period).collect();

    let fuel_cost_total: f64 = orders.iter().map(|o| o.fuel_cost).sum();
    let toll_cost_total: f64 = orders.iter().map(|o| o.toll_cost).sum();
    let maintenance_cost_total: f64 = orders.iter().map(|o| o.maintenance_cost).sum();
    let total_cost = fuel_cost_total + toll_cost_total + maintenance_cost_total;
    let distance_km_total: f64 = orders.iter().map(|o| o.distance_km).sum();
    let overall_rate = if distance_km_total > 0.0 {
        total_cost / distance_km_total
    } else {
        0.0
    };

    let unit_prices: Vec<f64> = orders.iter().map(|o| o.fuel_unit_price).collect();

    SelectionOverview {
        orders: orders.len() as u64,
        vehicles: vehicles.len() as u64,
        projects: projects.len() as u64,
        routes: routes.len() as u64,
        periods: periods.len() as u64,
        fuel_cost_total,
        toll_cost_total,
        maintenance_cost_total,
        total_cost,
        distance_km_total,
        overall_rate,
        mean_fuel_unit_price: mean(&unit_prices),
        fuel_cost: descriptive(&orders.iter().map(|o| o.fuel_cost).collect::<Vec<_>>()),
        toll_cost: descriptive(&orders.iter().map(|o| o.toll_cost).collect::<Vec<_>>()),
        maintenance_cost: descriptive(
            &orders.iter().map(|o| o.maintenance_cost).collect::<Vec<_>>(),
        ),
        distance_km: descriptive(&orders.iter().map(|o| o.distance_km).collect::<Vec<_>>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn order(vehicle: &str, route: &str, distance_km: f64, fuel_cost: f64) -> Order {
        Order {
            order_id: "1".to_string(),
            vehicle: vehicle.to_string(),
            project: "P1".to_string(),
            route: route.to_string(),
            period: "2025-01".parse().unwrap(),
            opened_at: Utc.with_ymd_and_hms(2025, 1, 3, 8, 0, 0).unwrap(),
            closed_at: Utc.with_ymd_and_hms(2025, 1, 5, 18, 0, 0).unwrap(),
            distance_km,
            fuel_liters: 0.0,
            fuel_unit_price: 0.0,
            fuel_cost,
            toll_cost: 0.0,
            maintenance_cost: 0.0,
        }
    }

    #[test]
    fn test_totals_and_distinct_counts() {
        let orders = vec![
            order("T-1", "MTY-GDL", 100.0, 500.0),
            order("T-1", "GDL-MTY", 200.0, 0.0),
            order("T-2", "MTY-GDL", 300.0, 700.0),
        ];
        let overview = selection_overview(&orders);

        assert_eq!(overview.orders, 3);
        assert_eq!(overview.vehicles, 2);
        assert_eq!(overview.routes, 2);
        assert_eq!(overview.periods, 1);
        assert_eq!(overview.fuel_cost_total, 1200.0);
        assert_eq!(overview.distance_km_total, 600.0);
        assert!((overview.overall_rate - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_rate_defaults_to_zero_without_distance() {
        let orders = vec![order("T-1", "MTY-GDL", 0.0, 500.0)];
        let overview = selection_overview(&orders);
        assert_eq!(overview.overall_rate, 0.0);
    }

    #[test]
    fn test_descriptive_stats_quartiles() {
        let orders = vec![
            order("T-1", "A", 100.0, 0.0),
            order("T-1", "A", 200.0, 0.0),
            order("T-1", "A", 300.0, 0.0),
            order("T-1", "A", 400.0, 0.0),
        ];
        let overview = selection_overview(&orders);

        assert_eq!(overview.distance_km.min, 100.0);
        assert_eq!(overview.distance_km.max, 400.0);
        assert_eq!(overview.distance_km.median, 250.0);
        assert_eq!(overview.distance_km.q1, 175.0);
        assert_eq!(overview.distance_km.q3, 325.0);
        assert_eq!(overview.distance_km.mean, 250.0);
    }

    #[test]
    fn test_empty_selection_has_undefined_descriptives() {
        let overview = selection_overview(&[]);
        assert_eq!(overview.orders, 0);
        assert_eq!(overview.overall_rate, 0.0);
        assert!(overview.distance_km.mean.is_nan());
    }
}
