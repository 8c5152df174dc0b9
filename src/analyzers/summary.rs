//! Per-vehicle reduction of the cycle table.
//!
//! Rates and costs reduce by mean (skipping undefined values), counts
//! by median, running totals by sum. Vehicles with no emitted cycles do
//! not appear in the output.

use std::collections::BTreeMap;

use crate::analyzers::types::{Cycle, VehicleSummary};
use crate::analyzers::utility::{mean_defined, median};

fn collect<F: Fn(&Cycle) -> f64>(cycles: &[&Cycle], f: F) -> Vec<f64> {
    cycles.iter().map(|c| f(c)).collect()
}

fn summarize_vehicle(vehicle: &str, cycles: &[&Cycle]) -> VehicleSummary {
    let elapsed: Vec<f64> = cycles.iter().filter_map(|c| c.elapsed_days).collect();

    VehicleSummary {
        vehicle: vehicle.to_string(),
        cycles: cycles.len() as u32,
        median_cycle_index: median(&collect(cycles, |c| c.cycle_index as f64)),
        median_orders: median(&collect(cycles, |c| c.orders as f64)),
        median_distinct_routes: median(&collect(cycles, |c| c.distinct_routes as f64)),
        median_distinct_projects: median(&collect(cycles, |c| c.distinct_projects as f64)),
        mean_elapsed_days: mean_defined(&elapsed),
        mean_distance_km: mean_defined(&collect(cycles, |c| c.distance_km)),
        mean_fuel_liters: mean_defined(&collect(cycles, |c| c.fuel_liters)),
        mean_fuel_unit_price: mean_defined(&collect(cycles, |c| c.fuel_unit_price)),
        mean_efficiency_km_per_liter: mean_defined(&collect(cycles, |c| {
            c.efficiency_km_per_liter
        })),
        mean_fuel_cost: mean_defined(&collect(cycles, |c| c.fuel_cost)),
        mean_toll_cost: mean_defined(&collect(cycles, |c| c.toll_cost)),
        mean_maintenance_cost: mean_defined(&collect(cycles, |c| c.maintenance_cost)),
        mean_total_cost: mean_defined(&collect(cycles, |c| c.total_cost)),
        mean_fuel_rate: mean_defined(&collect(cycles, |c| c.fuel_rate)),
        mean_toll_rate: mean_defined(&collect(cycles, |c| c.toll_rate)),
        mean_maintenance_rate: mean_defined(&collect(cycles, |c| c.maintenance_rate)),
        mean_order_distance_km: mean_defined(&collect(cycles, |c| c.mean_order_distance_km)),
        mean_km_per_day: mean_defined(&collect(cycles, |c| c.km_per_day)),
        total_distance_km: cycles.iter().map(|c| c.distance_km).sum(),
        total_orders: cycles.iter().map(|c| c.orders as u64).sum(),
    }
}

/// Reduces the cycle table to one summary row per vehicle, in ascending
/// vehicle-id order.
pub fn summarize_vehicles(cycles: &[Cycle]) -> Vec<VehicleSummary> {
    let mut by_vehicle: BTreeMap<&str, Vec<&Cycle>> = BTreeMap::new();
    for cycle in cycles {
        by_vehicle.entry(&cycle.vehicle).or_default().push(cycle);
    }

    by_vehicle
        .iter()
        .map(|(vehicle, cycles)| summarize_vehicle(vehicle, cycles))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::segmenter::segment_orders;
    use crate::orders::{Order, Period};
    use chrono::{TimeZone, Utc};

    fn order(vehicle: &str, day: u32, distance_km: f64, fuel: (f64, f64, f64)) -> Order {
        Order {
            order_id: format!("{vehicle}-{day}"),
            vehicle: vehicle.to_string(),
            project: "P1".to_string(),
            route: "A-B".to_string(),
            period: Period::new(2025, 1).unwrap(),
            opened_at: Utc.with_ymd_and_hms(2025, 1, day, 8, 0, 0).unwrap(),
            closed_at: Utc.with_ymd_and_hms(2025, 1, day, 20, 0, 0).unwrap(),
            distance_km,
            fuel_liters: fuel.1,
            fuel_unit_price: fuel.2,
            fuel_cost: fuel.0,
            toll_cost: 0.0,
            maintenance_cost: 0.0,
        }
    }

    #[test]
    fn test_one_row_per_vehicle_with_cycles() {
        let orders = vec![
            order("T-1", 2, 100.0, (400.0, 40.0, 10.0)),
            order("T-1", 6, 200.0, (500.0, 50.0, 10.0)),
            order("T-2", 3, 300.0, (900.0, 90.0, 10.0)),
            // T-3 never refuels and must be absent.
            order("T-3", 4, 150.0, (0.0, 0.0, 0.0)),
        ];
        let table = segment_orders(&orders);
        let summaries = summarize_vehicles(&table.cycles);

        let vehicles: Vec<&str> = summaries.iter().map(|s| s.vehicle.as_str()).collect();
        assert_eq!(vehicles, vec!["T-1", "T-2"]);
    }

    #[test]
    fn test_mean_median_sum_mapping() {
        let orders = vec![
            order("T-1", 2, 100.0, (400.0, 40.0, 10.0)),
            order("T-1", 6, 200.0, (500.0, 50.0, 10.0)),
            order("T-1", 9, 300.0, (600.0, 60.0, 10.0)),
        ];
        let table = segment_orders(&orders);
        let summary = &summarize_vehicles(&table.cycles)[0];

        assert_eq!(summary.cycles, 3);
        assert_eq!(summary.median_cycle_index, 2.0);
        assert_eq!(summary.median_orders, 1.0);
        assert_eq!(summary.mean_distance_km, 200.0);
        assert_eq!(summary.mean_fuel_cost, 500.0);
        assert_eq!(summary.total_distance_km, 600.0);
        assert_eq!(summary.total_orders, 3);
    }

    #[test]
    fn test_mean_rate_skips_undefined_cycles() {
        let orders = vec![
            // Zero-distance cycle: its rates are undefined and must not
            // drag the vehicle mean down.
            order("T-1", 2, 0.0, (400.0, 40.0, 10.0)),
            order("T-1", 6, 100.0, (500.0, 50.0, 10.0)),
        ];
        let table = segment_orders(&orders);
        let summary = &summarize_vehicles(&table.cycles)[0];

        assert!((summary.mean_fuel_rate - 5.0).abs() < 1e-9);
        assert_eq!(summary.cycles, 2);
    }

    #[test]
    fn test_empty_cycle_table_yields_no_rows() {
        assert!(summarize_vehicles(&[]).is_empty());
    }

    #[test]
    fn test_mean_elapsed_days_ignores_first_cycle() {
        let orders = vec![
            order("T-1", 2, 100.0, (400.0, 40.0, 10.0)),
            order("T-1", 6, 200.0, (500.0, 50.0, 10.0)),
        ];
        let table = segment_orders(&orders);
        let summary = &summarize_vehicles(&table.cycles)[0];
        // Only the second cycle has a previous refuel: 4 whole days.
        assert_eq!(summary.mean_elapsed_days, 4.0);
    }
}
