//! Cross-method comparison: mean and spread of one indicator across the
//! four inclusion policies over an inclusive period range.
//!
//! Operates on the raw (pre-finalize) period rows so a zero-filled
//! undefined cell can never enter a mean as a genuine zero.

use tracing::warn;

use crate::analyzers::types::{
    Indicator, InclusionPolicy, MethodComparison, MethodSpread, PeriodAggregate,
};
use crate::analyzers::utility::{mean, sample_stddev};
use crate::orders::Period;

/// Spreads `indicator` across all four policies over `from..=to`.
///
/// A period is kept only when the indicator is finite under every
/// policy, keeping the four samples aligned. Returns `None` (reported,
/// not fatal) when no period survives; the caller decides whether to
/// skip or warn. A range with `from == to` selects that single period.
pub fn compare_methods(
    rows: &[PeriodAggregate],
    indicator: Indicator,
    from: Period,
    to: Period,
) -> Option<MethodComparison> {
    let in_range: Vec<&PeriodAggregate> = rows
        .iter()
        .filter(|r| from <= r.period && r.period <= to)
        .collect();

    let mut periods = Vec::new();
    let mut series: Vec<Vec<f64>> = vec![Vec::new(); InclusionPolicy::ALL.len()];

    for row in in_range {
        let values: Vec<f64> = InclusionPolicy::ALL
            .iter()
            .map(|policy| row.policy(*policy).indicator(indicator))
            .collect();
        if values.iter().all(|v| v.is_finite()) {
            periods.push(row.period);
            for (column, value) in series.iter_mut().zip(values) {
                column.push(value);
            }
        }
    }

    if periods.is_empty() {
        warn!(
            indicator = ?indicator,
            from = %from,
            to = %to,
            "No valid data for the requested indicator and period range"
        );
        return None;
    }

    let methods = InclusionPolicy::ALL
        .iter()
        .zip(series)
        .map(|(policy, values)| MethodSpread {
            policy: *policy,
            mean: mean(&values),
            stddev: sample_stddev(&values),
            series: values,
        })
        .collect();

    Some(MethodComparison {
        indicator,
        periods,
        methods,
    })
}
