//! Metric-to-insight classification.
//!
//! A fixed catalog of named business metrics, each mapped through a
//! [`ThresholdTable`] into a severity and a rendered message. Pure and
//! stateless: one invocation per metric per report render, no coupling
//! between metrics.

use serde::Serialize;
use thiserror::Error;

use crate::thresholds::{Ladder, Severity, ThresholdTable};

/// Every metric the insight layer knows how to judge.
///
/// Band values are percentages except `days_of_supply` (days) and
/// `avg_rating` (stars). Thresholds are inclusive on the lower end of each
/// band for the `AtLeast`/`AtMost` ladders.
pub const METRIC_CATALOG: &[ThresholdTable] = &[
    ThresholdTable {
        metric: "margin_pct",
        title: "Net margin",
        ladder: Ladder::AtLeast {
            good: 30.0,
            warn: 15.0,
        },
        good_msg: "Margin {v}% — healthy, above target.",
        warn_msg: "Margin {v}% — typical for FBA.",
        critical_msg: "Margin {v}% — low, investigate costs.",
    },
    ThresholdTable {
        metric: "conversion_pct",
        title: "Conversion",
        ladder: Ladder::AtLeast {
            good: 12.0,
            warn: 8.0,
        },
        good_msg: "Conversion {v}% — above the norm. Scale your ads.",
        warn_msg: "Conversion {v}% — in range. A+ content could lift it.",
        critical_msg: "Conversion {v}% — below the norm. Check photos and price.",
    },
    ThresholdTable {
        metric: "buy_box_pct",
        title: "Buy Box",
        ladder: Ladder::AtLeast {
            good: 95.0,
            warn: 80.0,
        },
        good_msg: "Buy Box {v}% — excellent.",
        warn_msg: "Buy Box {v}% — acceptable, some listings are losing it.",
        critical_msg: "Buy Box {v}% — critical. Check your repricer.",
    },
    ThresholdTable {
        metric: "fee_pct",
        title: "Fee burden",
        ladder: Ladder::AtMost {
            good: 30.0,
            warn: 40.0,
        },
        good_msg: "Fees {v}% of gross — in range.",
        warn_msg: "Fees {v}% of gross — somewhat high.",
        critical_msg: "Fees {v}% of gross — far too high.",
    },
    ThresholdTable {
        metric: "refund_rate_pct",
        title: "Refunds",
        ladder: Ladder::AtMost {
            good: 3.0,
            warn: 8.0,
        },
        good_msg: "Refunds {v}% — excellent.",
        warn_msg: "Refunds {v}% — moderate.",
        critical_msg: "Refunds {v}% — critical.",
    },
    ThresholdTable {
        metric: "return_rate_pct",
        title: "Return rate",
        ladder: Ladder::AtMost {
            good: 3.0,
            warn: 8.0,
        },
        good_msg: "Returns {v}% — excellent.",
        warn_msg: "Returns {v}% — acceptable.",
        critical_msg: "Returns {v}% — dangerous.",
    },
    ThresholdTable {
        metric: "days_of_supply",
        title: "Stock cover",
        ladder: Ladder::Above {
            good: 60.0,
            warn: 30.0,
        },
        good_msg: "Stock for {v} days — sufficient.",
        warn_msg: "Stock for {v} days — plan a shipment.",
        critical_msg: "Stock for {v} days — out-of-stock risk!",
    },
    ThresholdTable {
        metric: "avg_rating",
        title: "Rating health",
        ladder: Ladder::AtLeast {
            good: 4.4,
            warn: 4.0,
        },
        good_msg: "Average {v} stars — strong social proof.",
        warn_msg: "Average {v} stars — fine, but at risk of dropping below 4.0.",
        critical_msg: "Average {v} stars — critical. Hurts conversion and raises PPC cost.",
    },
    ThresholdTable {
        metric: "negative_review_pct",
        title: "Negative reviews",
        ladder: Ladder::AtMost {
            good: 10.0,
            warn: 20.0,
        },
        good_msg: "Only {v}% negative (1-2 stars). Product meets expectations.",
        warn_msg: "{v}% negative — a systemic issue. Read the 1-star texts.",
        critical_msg: "{v}% negative — critical. Fix the product or listing now.",
    },
];

/// A rendered verdict for one metric. Stateless, recomputed every render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InsightVerdict {
    pub metric: &'static str,
    pub title: &'static str,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}

/// Look up a metric's threshold table.
pub fn table_for(metric: &str) -> Option<&'static ThresholdTable> {
    METRIC_CATALOG.iter().find(|t| t.metric == metric)
}

/// Map one metric value to a severity and rendered message.
///
/// Total over all finite values of every cataloged metric. A name outside
/// the catalog is a typed error, never an index panic; rendering callers
/// degrade it to a skipped card.
pub fn classify(metric: &str, value: f64) -> Result<InsightVerdict, ClassifyError> {
    let table =
        table_for(metric).ok_or_else(|| ClassifyError::UnknownMetric(metric.to_string()))?;
    Ok(InsightVerdict {
        metric: table.metric,
        title: table.title,
        severity: table.severity(value),
        message: table.render(value),
    })
}
