pub mod classifier;
pub mod forecast;
pub mod regression;
pub mod thresholds;

pub use classifier::{classify, ClassifyError, InsightVerdict, METRIC_CATALOG};
pub use forecast::{forecast_sold_out, Forecast, ForecastPoint, ForecastStatus};
pub use regression::{fit_line, LinearFit};
pub use thresholds::{Ladder, Severity, ThresholdTable};
