pub mod aggregate;
pub mod cache;
pub mod digest;
pub mod loader;
pub mod metrics;
pub mod panel;
pub mod records;
pub mod store;

pub use cache::{Clock, SystemClock, TtlCache};
pub use digest::{OverviewDigest, ReportBundle, SkuForecast};
pub use panel::InsightCard;
pub use store::{load_report_dir, ReportStore};
