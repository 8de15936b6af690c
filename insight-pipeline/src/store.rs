//! Directory-backed report loading behind the TTL cache.
//!
//! One export directory holds up to six CSV reports under fixed names; a
//! missing file is an empty dataset, not an error, so a seller with no
//! returns still gets a digest. Repeated loads of the same directory within
//! the TTL are served from the cache, mirroring how the upstream query
//! layer bounds staleness.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::digest::ReportBundle;
use crate::loader::{
    load_inventory_file, load_orders_file, load_returns_file, load_reviews_file,
    load_settlements_file, load_traffic_file, LoadError,
};

/// How long a loaded bundle stays fresh.
pub const DEFAULT_REPORT_TTL: Duration = Duration::from_secs(60);

fn load_optional<T>(
    dir: &Path,
    file_name: &str,
    load: impl Fn(&Path) -> Result<Vec<T>, LoadError>,
) -> Result<Vec<T>, LoadError> {
    let path = dir.join(file_name);
    if !path.exists() {
        log::warn!("{} not found, skipping that report", path.display());
        return Ok(Vec::new());
    }
    load(&path)
}

/// Load every report present in `dir` into one bundle.
pub fn load_report_dir(dir: &Path) -> Result<ReportBundle, LoadError> {
    Ok(ReportBundle {
        inventory: load_optional(dir, "inventory.csv", |p| load_inventory_file(p))?,
        orders: load_optional(dir, "orders.csv", |p| load_orders_file(p))?,
        settlements: load_optional(dir, "settlements.csv", |p| load_settlements_file(p))?,
        traffic: load_optional(dir, "traffic.csv", |p| load_traffic_file(p))?,
        returns: load_optional(dir, "returns.csv", |p| load_returns_file(p))?,
        reviews: load_optional(dir, "reviews.csv", |p| load_reviews_file(p))?,
    })
}

/// Read-through report source: owns the cache so the digest and engine
/// layers never see it.
pub struct ReportStore<C: Clock = SystemClock> {
    cache: TtlCache<PathBuf, ReportBundle, C>,
}

impl ReportStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: TtlCache::new(ttl),
        }
    }
}

impl<C: Clock> ReportStore<C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            cache: TtlCache::with_clock(ttl, clock),
        }
    }

    /// The bundle for `dir`, re-read from disk only when the cached copy
    /// has expired. A failed read caches nothing.
    pub fn load(&mut self, dir: impl AsRef<Path>) -> Result<&ReportBundle, LoadError> {
        let dir = dir.as_ref();
        self.cache
            .try_get_or_insert_with(dir.to_path_buf(), || load_report_dir(dir))
    }
}
