//! Overview digest: every report's insight panel plus per-SKU forecasts,
//! assembled from one loaded bundle of datasets.
//!
//! Windowing mirrors the dashboard it replaces: settlements, orders and
//! returns are judged on the trailing 30 days of data, sales & traffic on
//! the trailing 14, and the inventory panel on the most recent snapshot
//! date only. Forecasts consume the full snapshot history.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use insight_engine::forecast::{forecast_sold_out, Forecast};

use crate::metrics::{ReturnMetrics, SettlementMetrics};
use crate::panel::{
    inventory_panel, orders_panel, returns_panel, reviews_panel, settlements_panel,
    traffic_panel, InsightCard,
};
use crate::records::{
    InventorySnapshot, OrderLine, ReturnEvent, Review, SettlementTxn, TrafficDay,
};

/// Trailing window, in days, for settlements, orders and returns.
const FINANCIAL_WINDOW_DAYS: i64 = 30;
/// Trailing window for sales & traffic.
const TRAFFIC_WINDOW_DAYS: i64 = 14;
/// Default forecast horizon (the UI slider's default).
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// Everything one render needs, already loaded and typed.
#[derive(Clone, Debug, Default)]
pub struct ReportBundle {
    pub inventory: Vec<InventorySnapshot>,
    pub orders: Vec<OrderLine>,
    pub settlements: Vec<SettlementTxn>,
    pub traffic: Vec<TrafficDay>,
    pub returns: Vec<ReturnEvent>,
    pub reviews: Vec<Review>,
}

/// One SKU's sold-out forecast.
#[derive(Clone, Debug, Serialize)]
pub struct SkuForecast {
    pub sku: String,
    pub history_points: usize,
    #[serde(flatten)]
    pub forecast: Forecast,
}

/// The assembled overview: one card panel per report plus the forecasts.
#[derive(Clone, Debug, Serialize)]
pub struct OverviewDigest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_date: Option<NaiveDate>,
    pub inventory: Vec<InsightCard>,
    pub settlements: Vec<InsightCard>,
    pub traffic: Vec<InsightCard>,
    pub orders: Vec<InsightCard>,
    pub returns: Vec<InsightCard>,
    pub reviews: Vec<InsightCard>,
    pub forecasts: Vec<SkuForecast>,
}

impl OverviewDigest {
    /// Build the digest with the default forecast horizon.
    pub fn build(bundle: &ReportBundle) -> Self {
        Self::build_with_horizon(bundle, DEFAULT_HORIZON_DAYS)
    }

    pub fn build_with_horizon(bundle: &ReportBundle, horizon_days: u32) -> Self {
        let snapshot_date = bundle.inventory.iter().map(|s| s.snapshot_date).max();
        let latest_inventory: Vec<InventorySnapshot> = match snapshot_date {
            Some(latest) => bundle
                .inventory
                .iter()
                .filter(|s| s.snapshot_date == latest)
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        let settlements =
            recent_window(&bundle.settlements, |t| t.posted_date, FINANCIAL_WINDOW_DAYS);
        let orders = recent_window(&bundle.orders, |o| o.order_date, FINANCIAL_WINDOW_DAYS);
        let returns = recent_window(&bundle.returns, |r| r.return_date, FINANCIAL_WINDOW_DAYS);
        let traffic = recent_window(&bundle.traffic, |d| d.report_date, TRAFFIC_WINDOW_DAYS);

        let settlement_metrics = SettlementMetrics::compute(&settlements);
        // The damage rollup covers the window; the rate compares the full
        // return history against the full order history.
        let return_metrics = ReturnMetrics::compute(&returns, &bundle.returns, &bundle.orders);

        let forecasts = sku_forecasts(&bundle.inventory, horizon_days);

        log::info!(
            "digest built: {} inventory rows ({} current), {} settlements, {} orders, \
             {} traffic days, {} returns, {} reviews, {} forecasts",
            bundle.inventory.len(),
            latest_inventory.len(),
            settlements.len(),
            orders.len(),
            traffic.len(),
            returns.len(),
            bundle.reviews.len(),
            forecasts.len()
        );

        Self {
            snapshot_date,
            inventory: inventory_panel(&latest_inventory),
            settlements: settlements_panel(&settlement_metrics),
            traffic: traffic_panel(&traffic),
            orders: orders_panel(&orders),
            returns: returns_panel(&return_metrics, &returns),
            reviews: reviews_panel(&bundle.reviews),
            forecasts,
        }
    }
}

/// Rows whose date falls within `days` of the newest row. An empty input
/// stays empty; the window always contains the newest row.
fn recent_window<T: Clone>(
    rows: &[T],
    date_of: impl Fn(&T) -> NaiveDate,
    days: i64,
) -> Vec<T> {
    let Some(max_date) = rows.iter().map(&date_of).max() else {
        return Vec::new();
    };
    let cutoff = max_date - Duration::days(days);
    rows.iter()
        .filter(|r| date_of(r) >= cutoff)
        .cloned()
        .collect()
}

/// One (date, available units) history per SKU, in snapshot order.
/// Duplicate-date handling is the forecaster's concern.
pub fn sku_history(snapshots: &[InventorySnapshot], sku: &str) -> Vec<(NaiveDate, f64)> {
    let mut history: Vec<(NaiveDate, f64)> = snapshots
        .iter()
        .filter(|s| s.sku == sku)
        .map(|s| (s.snapshot_date, s.available_units as f64))
        .collect();
    history.sort_by_key(|&(d, _)| d);
    history
}

/// Run the sold-out forecaster for every SKU in the snapshot set.
pub fn sku_forecasts(snapshots: &[InventorySnapshot], horizon_days: u32) -> Vec<SkuForecast> {
    let mut skus: Vec<&str> = snapshots.iter().map(|s| s.sku.as_str()).collect();
    skus.sort_unstable();
    skus.dedup();

    skus.into_iter()
        .map(|sku| {
            let history = sku_history(snapshots, sku);
            SkuForecast {
                sku: sku.to_string(),
                history_points: history.len(),
                forecast: forecast_sold_out(&history, horizon_days),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_engine::forecast::ForecastStatus;

    fn snap(sku: &str, day: u32, units: u64) -> InventorySnapshot {
        InventorySnapshot {
            sku: sku.into(),
            store_name: "Main".into(),
            product_name: String::new(),
            snapshot_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            available_units: units,
            unit_price: 10.0,
            velocity: 1.0,
            upto_90_days: units,
            days_91_to_180: 0,
            days_181_to_270: 0,
            days_271_to_365: 0,
            over_365_days: 0,
        }
    }

    #[test]
    fn forecasts_cover_every_sku_once() {
        let snapshots = vec![
            snap("A", 1, 100),
            snap("A", 2, 90),
            snap("A", 3, 80),
            snap("B", 1, 10),
        ];
        let forecasts = sku_forecasts(&snapshots, 30);
        assert_eq!(forecasts.len(), 2);
        assert_eq!(forecasts[0].sku, "A");
        assert_eq!(
            forecasts[0].forecast.status,
            ForecastStatus::SoldOut {
                date: NaiveDate::from_ymd_opt(2025, 1, 11).unwrap()
            }
        );
        // One snapshot is not enough history.
        assert_eq!(forecasts[1].forecast.status, ForecastStatus::InsufficientData);
    }

    #[test]
    fn recent_window_keeps_rows_near_the_newest_date() {
        let snapshots = vec![snap("A", 1, 10), snap("A", 20, 10), snap("A", 31, 10)];
        let windowed = recent_window(&snapshots, |s| s.snapshot_date, 15);
        // Cutoff is Jan 16: Jan 20 and Jan 31 stay.
        assert_eq!(windowed.len(), 2);
    }

    #[test]
    fn digest_uses_only_the_latest_snapshot_for_inventory_cards() {
        let bundle = ReportBundle {
            inventory: vec![snap("A", 1, 500), snap("A", 2, 400), snap("A", 3, 300)],
            ..Default::default()
        };
        let digest = OverviewDigest::build(&bundle);
        assert_eq!(digest.snapshot_date, NaiveDate::from_ymd_opt(2025, 1, 3));
        // Frozen capital reflects only the 300-unit snapshot: 300 x $10.
        let frozen = digest
            .inventory
            .iter()
            .find(|c| c.title == "Frozen capital")
            .unwrap();
        assert!(frozen.body.contains("$3000"), "{}", frozen.body);
    }

    #[test]
    fn return_rate_counts_returns_outside_the_window() {
        let order = |id: &str, day: u32| crate::records::OrderLine {
            order_id: id.into(),
            order_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            sku: "A".into(),
            quantity: 1.0,
            item_price: 20.0,
            item_tax: 0.0,
            shipping_price: 0.0,
        };
        let ret = |id: &str, month: u32, day: u32| crate::records::ReturnEvent {
            return_date: NaiveDate::from_ymd_opt(2025, month, day).unwrap(),
            order_id: id.into(),
            sku: "A".into(),
            quantity: 1.0,
            reason: String::new(),
            price: Some(20.0),
        };
        let bundle = ReportBundle {
            orders: (1..=5).map(|i| order(&format!("O-{i}"), i as u32)).collect(),
            // One return two months before the window, one inside it.
            returns: vec![ret("O-1", 1, 10), ret("O-5", 3, 10)],
            ..Default::default()
        };
        let digest = OverviewDigest::build(&bundle);
        let rate = digest
            .returns
            .iter()
            .find(|c| c.title == "Return rate")
            .unwrap();
        // 2 returned orders of 5 = 40%, even though the January return
        // falls outside the 30-day damage window.
        assert!(rate.body.contains("40.0%"), "{}", rate.body);
    }

    #[test]
    fn empty_bundle_builds_an_empty_digest() {
        let digest = OverviewDigest::build(&ReportBundle::default());
        assert!(digest.snapshot_date.is_none());
        assert!(digest.forecasts.is_empty());
        assert!(digest.reviews.is_empty());
        // Settlements panel still renders its zero-state cards.
        assert_eq!(digest.settlements.len(), 4);
    }
}
