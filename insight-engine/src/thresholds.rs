//! Generic three-band threshold ladders.
//!
//! Every insight metric in the catalog follows the same shape (a good, a
//! warn, and a critical band with different numbers), so the ladder lives
//! in one evaluator instead of a per-metric if/elif chain. Changing a band
//! here changes BOTH the severity decision and the rendered card.

use std::fmt;

use serde::Serialize;

/// Qualitative verdict for a metric value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Good,
    Warn,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Good => write!(f, "good"),
            Severity::Warn => write!(f, "warn"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// The three ladder shapes present in the source data.
///
/// Bands are contiguous and exhaustive over the reals: every finite value
/// lands in exactly one band. Non-finite values compare false against every
/// bound and fall through to `Critical`, so the evaluator is total even on
/// malformed input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ladder {
    /// Higher is better, inclusive bounds: `v >= good` | `v >= warn` | else.
    AtLeast { good: f64, warn: f64 },
    /// Lower is better, inclusive bounds: `v <= good` | `v <= warn` | else.
    AtMost { good: f64, warn: f64 },
    /// Higher is better, exclusive bounds: `v > good` | `v > warn` | else.
    /// Days-of-supply uses this (`> 60` good, `31-60` warn, `<= 30` critical).
    Above { good: f64, warn: f64 },
}

impl Ladder {
    pub fn severity(&self, value: f64) -> Severity {
        match *self {
            Ladder::AtLeast { good, warn } => {
                if value >= good {
                    Severity::Good
                } else if value >= warn {
                    Severity::Warn
                } else {
                    Severity::Critical
                }
            }
            Ladder::AtMost { good, warn } => {
                if value <= good {
                    Severity::Good
                } else if value <= warn {
                    Severity::Warn
                } else {
                    Severity::Critical
                }
            }
            Ladder::Above { good, warn } => {
                if value > good {
                    Severity::Good
                } else if value > warn {
                    Severity::Warn
                } else {
                    Severity::Critical
                }
            }
        }
    }
}

/// One metric's bands plus the message template for each band.
///
/// Templates embed the numeric value where `{v}` appears.
#[derive(Clone, Copy, Debug)]
pub struct ThresholdTable {
    pub metric: &'static str,
    pub title: &'static str,
    pub ladder: Ladder,
    pub good_msg: &'static str,
    pub warn_msg: &'static str,
    pub critical_msg: &'static str,
}

impl ThresholdTable {
    pub fn severity(&self, value: f64) -> Severity {
        self.ladder.severity(value)
    }

    /// Render the band message for `value`, substituting `{v}`.
    pub fn render(&self, value: f64) -> String {
        let template = match self.severity(value) {
            Severity::Good => self.good_msg,
            Severity::Warn => self.warn_msg,
            Severity::Critical => self.critical_msg,
        };
        template.replace("{v}", &format!("{value:.1}"))
    }
}
