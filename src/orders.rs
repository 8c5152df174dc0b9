use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar reporting bucket at month granularity, rendered as `YYYY-MM`.
///
/// Used as the grouping key for every period-level aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid period {0:?}, expected YYYY-MM")]
pub struct PeriodParseError(String);

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodParseError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodParseError(format!("{year:04}-{month:02}")));
        }
        Ok(Period { year, month })
    }

    /// The period the given timestamp falls in.
    pub fn from_datetime(at: &DateTime<Utc>) -> Self {
        Period {
            year: at.year(),
            month: at.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PeriodParseError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Period::new(year, month).map_err(|_| err())
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> String {
        p.to_string()
    }
}

/// One completed transport order, as supplied by the upstream dataset.
///
/// Immutable input to the engine; costs and volumes are validated
/// non-negative at ingestion (see [`crate::parser`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub vehicle: String,
    pub project: String,
    pub route: String,
    pub period: Period,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub distance_km: f64,
    pub fuel_liters: f64,
    pub fuel_unit_price: f64,
    pub fuel_cost: f64,
    pub toll_cost: f64,
    pub maintenance_cost: f64,
}

impl Order {
    /// Whether this order carries a fuel cost. A true flag marks the
    /// order as a refuel event and closes the vehicle's running cycle.
    pub fn has_fuel_cost(&self) -> bool {
        self.fuel_cost > 0.0
    }

    pub fn has_toll_cost(&self) -> bool {
        self.toll_cost > 0.0
    }

    pub fn has_maintenance_cost(&self) -> bool {
        self.maintenance_cost > 0.0
    }

    pub fn total_cost(&self) -> f64 {
        self.fuel_cost + self.toll_cost + self.maintenance_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order(vehicle: &str, distance_km: f64, fuel_cost: f64) -> Order {
        Order {
            order_id: "1".to_string(),
            vehicle: vehicle.to_string(),
            project: "P1".to_string(),
            route: "A-B".to_string(),
            period: Period::new(2025, 1).unwrap(),
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
    fn test_period_parse_and_display() {
        let p: Period = "2025-03".parse().unwrap();
        assert_eq!(p.year(), 2025);
        assert_eq!(p.month(), 3);
        assert_eq!(p.to_string(), "2025-03");
    }

    #[test]
    fn test_period_rejects_bad_input() {
        assert!("2025".parse::<Period>().is_err());
        assert!("2025-00".parse::<Period>().is_err());
        assert!("2025-13".parse::<Period>().is_err());
        assert!("03-2025x".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_ordering_is_chronological() {
        let a: Period = "2024-12".parse().unwrap();
        let b: Period = "2025-01".parse().unwrap();
        let c: Period = "2025-02".parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_period_from_datetime() {
        let at = Utc.with_ymd_and_hms(2025, 7, 31, 23, 59, 0).unwrap();
        assert_eq!(Period::from_datetime(&at), Period::new(2025, 7).unwrap());
    }

    #[test]
    fn test_cost_flags_require_strictly_positive_cost() {
        let mut o = order("T-101", 100.0, 0.0);
        assert!(!o.has_fuel_cost());
        o.fuel_cost = 500.0;
        assert!(o.has_fuel_cost());
        assert!(!o.has_toll_cost());
        assert!(!o.has_maintenance_cost());
    }

    #[test]
    fn test_total_cost_sums_components() {
        let mut o = order("T-101", 100.0, 500.0);
        o.toll_cost = 120.0;
        o.maintenance_cost = 80.0;
        assert_eq!(o.total_cost(), 700.0);
    }
}
