//! Property tests for the cycle segmenter over generated order sequences.

use chrono::{Duration, TimeZone, Utc};
use fleet_cpk_rater::analyzers::segmenter::segment_orders;
use fleet_cpk_rater::orders::{Order, Period};
use proptest::prelude::*;

/// A single vehicle's order history: positive distances, with roughly a
/// third of the orders carrying a fuel cost.
fn orders_strategy() -> impl Strategy<Value = Vec<Order>> {
    let entry = (
        0.0f64..500.0,
        prop_oneof![2 => Just(0.0f64), 1 => 1.0f64..400.0],
    );
    prop::collection::vec(entry, 0..40).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (distance_km, fuel_cost))| {
                let opened_at = Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap()
                    + Duration::hours(i as i64 * 30);
                let closed_at = opened_at + Duration::hours(12);
                Order {
                    order_id: format!("o-{i}"),
                    vehicle: "T-1".to_string(),
                    project: "P1".to_string(),
                    route: "A-B".to_string(),
                    period: Period::from_datetime(&closed_at),
                    opened_at,
                    closed_at,
                    distance_km,
                    fuel_liters: if fuel_cost > 0.0 { 100.0 } else { 0.0 },
                    fuel_unit_price: 0.0,
                    fuel_cost,
                    toll_cost: 0.0,
                    maintenance_cost: 0.0,
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn distance_is_conserved_up_to_last_refuel(orders in orders_strategy()) {
        let table = segment_orders(&orders);

        let expected: f64 = match orders.iter().rposition(|o| o.has_fuel_cost()) {
            Some(last_refuel) => orders[..=last_refuel].iter().map(|o| o.distance_km).sum(),
            None => 0.0,
        };
        let total: f64 = table.cycles.iter().map(|c| c.distance_km).sum();
        prop_assert!((total - expected).abs() < 1e-6);
    }

    #[test]
    fn cycle_count_equals_refuel_count(orders in orders_strategy()) {
        let table = segment_orders(&orders);
        let refuels = orders.iter().filter(|o| o.has_fuel_cost()).count();
        prop_assert_eq!(table.cycles.len(), refuels);
    }

    #[test]
    fn refuel_timestamps_chain_in_index_order(orders in orders_strategy()) {
        let table = segment_orders(&orders);

        if let Some(first) = table.cycles.first() {
            prop_assert_eq!(first.prev_refuel_at, None);
            prop_assert_eq!(first.cycle_index, 1);
        }
        for pair in table.cycles.windows(2) {
            prop_assert!(pair[0].refuel_at <= pair[1].refuel_at);
            prop_assert_eq!(pair[1].prev_refuel_at, Some(pair[0].refuel_at));
            prop_assert_eq!(pair[1].cycle_index, pair[0].cycle_index + 1);
        }
    }

    #[test]
    fn every_order_before_last_refuel_is_counted_once(orders in orders_strategy()) {
        let table = segment_orders(&orders);

        let expected = match orders.iter().rposition(|o| o.has_fuel_cost()) {
            Some(last_refuel) => last_refuel + 1,
            None => 0,
        };
        let counted: usize = table.cycles.iter().map(|c| c.orders as usize).sum();
        prop_assert_eq!(counted, expected);
    }
}
