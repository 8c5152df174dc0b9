//! Per-period data completeness: how many orders actually carry each
//! cost component.

use std::collections::BTreeMap;

use crate::analyzers::types::CompletenessRow;
use crate::analyzers::utility::pct;
use crate::orders::{Order, Period};

/// One row per period present in the order set, ascending, counting the
/// orders that carry each cost component and the share they represent.
pub fn completeness_by_period(orders: &[Order]) -> Vec<CompletenessRow> {
    #[derive(Default)]
    struct Counts {
        orders: u64,
        fuel: u64,
        toll: u64,
        maintenance: u64,
    }

    let mut by_period: BTreeMap<Period, Counts> = BTreeMap::new();
    for order in orders {
        let counts = by_period.entry(order.period).or_default();
        counts.orders += 1;
        if order.has_fuel_cost() {
            counts.fuel += 1;
        }
        if order.has_toll_cost() {
            counts.toll += 1;
        }
        if order.has_maintenance_cost() {
            counts.maintenance += 1;
        }
    }

    by_period
        .into_iter()
        .map(|(period, c)| CompletenessRow {
            period,
            orders: c.orders,
            with_fuel_cost: c.fuel,
            with_toll_cost: c.toll,
            with_maintenance_cost: c.maintenance,
            pct_with_fuel_cost: pct(c.fuel, c.orders),
            pct_with_toll_cost: pct(c.toll, c.orders),
            pct_with_maintenance_cost: pct(c.maintenance, c.orders),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn order(period: &str, fuel_cost: f64, toll_cost: f64) -> Order {
        Order {
            order_id: "1".to_string(),
            vehicle: "T-1".to_string(),
            project: "P1".to_string(),
            route: "A-B".to_string(),
            period: period.parse().unwrap(),
            opened_at: Utc.with_ymd_and_hms(2025, 1, 3, 8, 0, 0).unwrap(),
            closed_at: Utc.with_ymd_and_hms(2025, 1, 5, 18, 0, 0).unwrap(),
            distance_km: 100.0,
            fuel_liters: 0.0,
            fuel_unit_price: 0.0,
            fuel_cost,
            toll_cost,
            maintenance_cost: 0.0,
        }
    }

    #[test]
    fn test_counts_and_percentages_per_period() {
        let orders = vec![
            order("2025-01", 500.0, 0.0),
            order("2025-01", 0.0, 120.0),
            order("2025-01", 0.0, 0.0),
            order("2025-02", 600.0, 80.0),
        ];
        let rows = completeness_by_period(&orders);
        assert_eq!(rows.len(), 2);

        let january = &rows[0];
        assert_eq!(january.orders, 3);
        assert_eq!(january.with_fuel_cost, 1);
        assert_eq!(january.with_toll_cost, 1);
        assert_eq!(january.with_maintenance_cost, 0);
        assert!((january.pct_with_fuel_cost - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(january.pct_with_maintenance_cost, 0.0);

        let february = &rows[1];
        assert_eq!(february.orders, 1);
        assert_eq!(february.pct_with_fuel_cost, 100.0);
        assert_eq!(february.pct_with_toll_cost, 100.0);
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        assert!(completeness_by_period(&[]).is_empty());
    }
}
