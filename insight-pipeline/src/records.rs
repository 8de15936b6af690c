//! Canonical typed rows for every report dataset.
//!
//! Upstream ETL output is inconsistent about column spellings ("Item Price",
//! "item-price", "item_price") and about numeric hygiene. All of that is
//! absorbed here, at deserialization time: serde aliases map the spelling
//! variants onto one canonical field, and the coercing deserializers turn
//! missing or non-numeric values into 0. The engine never sees a raw column
//! name or a NaN.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Inventory snapshots
// ---------------------------------------------------------------------------

/// Age bucket labels for FBA inventory health, oldest last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeBucket {
    UpTo90Days,
    Days91To180,
    Days181To270,
    Days271To365,
    Over365Days,
}

pub const AGE_BUCKETS: [AgeBucket; 5] = [
    AgeBucket::UpTo90Days,
    AgeBucket::Days91To180,
    AgeBucket::Days181To270,
    AgeBucket::Days271To365,
    AgeBucket::Over365Days,
];

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeBucket::UpTo90Days => write!(f, "Upto 90 Days"),
            AgeBucket::Days91To180 => write!(f, "91 to 180 Days"),
            AgeBucket::Days181To270 => write!(f, "181 to 270 Days"),
            AgeBucket::Days271To365 => write!(f, "271 to 365 Days"),
            AgeBucket::Over365Days => write!(f, "More than 365 Days"),
        }
    }
}

/// One row per (SKU, store, snapshot date). Immutable once ingested;
/// the next day's snapshot supersedes it. The set of snapshots for one SKU
/// over time is exactly the series the forecaster consumes.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InventorySnapshot {
    #[serde(alias = "SKU")]
    pub sku: String,
    #[serde(alias = "Store Name", default)]
    pub store_name: String,
    #[serde(alias = "Product Name", default)]
    pub product_name: String,
    #[serde(alias = "created_at", alias = "Snapshot Date", deserialize_with = "de_date")]
    pub snapshot_date: NaiveDate,
    #[serde(alias = "Available", deserialize_with = "de_u64_or_zero")]
    pub available_units: u64,
    #[serde(alias = "Price", deserialize_with = "de_f64_or_zero")]
    pub unit_price: f64,
    /// Units/day; absent upstream values are zero.
    #[serde(alias = "Velocity", default, deserialize_with = "de_f64_or_zero")]
    pub velocity: f64,
    #[serde(alias = "Upto 90 Days", default, deserialize_with = "de_u64_or_zero")]
    pub upto_90_days: u64,
    #[serde(alias = "91 to 180 Days", default, deserialize_with = "de_u64_or_zero")]
    pub days_91_to_180: u64,
    #[serde(alias = "181 to 270 Days", default, deserialize_with = "de_u64_or_zero")]
    pub days_181_to_270: u64,
    #[serde(alias = "271 to 365 Days", default, deserialize_with = "de_u64_or_zero")]
    pub days_271_to_365: u64,
    #[serde(alias = "More than 365 Days", default, deserialize_with = "de_u64_or_zero")]
    pub over_365_days: u64,
}

impl InventorySnapshot {
    /// Stock value is always recomputed, never trusted from upstream storage.
    pub fn stock_value(&self) -> f64 {
        self.available_units as f64 * self.unit_price
    }

    /// Age bucket unit counts in bucket order. The buckets should partition
    /// `available_units` but the source data does not enforce that; each
    /// bucket is reported independently.
    pub fn age_bucket_units(&self) -> [(AgeBucket, u64); 5] {
        [
            (AgeBucket::UpTo90Days, self.upto_90_days),
            (AgeBucket::Days91To180, self.days_91_to_180),
            (AgeBucket::Days181To270, self.days_181_to_270),
            (AgeBucket::Days271To365, self.days_271_to_365),
            (AgeBucket::Over365Days, self.over_365_days),
        ]
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// One order line.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OrderLine {
    #[serde(alias = "Order ID", alias = "order-id", alias = "OrderID")]
    pub order_id: String,
    #[serde(alias = "Order Date", alias = "order-date", deserialize_with = "de_date")]
    pub order_date: NaiveDate,
    #[serde(alias = "SKU")]
    pub sku: String,
    #[serde(alias = "Quantity", alias = "qty", default, deserialize_with = "de_f64_or_zero")]
    pub quantity: f64,
    #[serde(
        alias = "Item Price",
        alias = "item-price",
        alias = "price",
        default,
        deserialize_with = "de_f64_or_zero"
    )]
    pub item_price: f64,
    #[serde(
        alias = "Item Tax",
        alias = "item-tax",
        alias = "tax",
        default,
        deserialize_with = "de_f64_or_zero"
    )]
    pub item_tax: f64,
    #[serde(
        alias = "Shipping Price",
        alias = "shipping-price",
        alias = "shipping",
        default,
        deserialize_with = "de_f64_or_zero"
    )]
    pub shipping_price: f64,
}

impl OrderLine {
    pub fn total_price(&self) -> f64 {
        self.item_price * self.quantity
    }
}

// ---------------------------------------------------------------------------
// Settlements
// ---------------------------------------------------------------------------

/// Settlement transaction kind. Anything that is not an order or a refund
/// keeps its raw label; fee detection needs to exclude "other" adjustments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TransactionType {
    Order,
    Refund,
    Other(String),
}

impl TransactionType {
    /// "Other" adjustment rows are excluded from the fee total, matching
    /// the source's case-insensitive substring check.
    pub fn is_other_adjustment(&self) -> bool {
        match self {
            TransactionType::Other(label) => label.to_lowercase().contains("other"),
            _ => false,
        }
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.trim() {
            "Order" => TransactionType::Order,
            "Refund" => TransactionType::Refund,
            other => TransactionType::Other(other.to_string()),
        })
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Order => write!(f, "Order"),
            TransactionType::Refund => write!(f, "Refund"),
            TransactionType::Other(label) => write!(f, "{label}"),
        }
    }
}

/// One financial settlement row. Negative amounts are charges.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SettlementTxn {
    #[serde(alias = "Posted Date", alias = "posted-date", deserialize_with = "de_date")]
    pub posted_date: NaiveDate,
    #[serde(alias = "Transaction Type", alias = "transaction-type")]
    pub transaction_type: TransactionType,
    #[serde(alias = "Amount", default, deserialize_with = "de_f64_or_zero")]
    pub amount: f64,
    #[serde(alias = "Quantity", default, deserialize_with = "de_f64_or_zero")]
    pub quantity: f64,
    #[serde(alias = "Currency", default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_return_qty() -> f64 {
    1.0
}

// ---------------------------------------------------------------------------
// Sales & traffic
// ---------------------------------------------------------------------------

/// One (ASIN, day) sales-and-traffic row.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TrafficDay {
    #[serde(deserialize_with = "de_date")]
    pub report_date: NaiveDate,
    #[serde(alias = "ASIN", default)]
    pub asin: String,
    #[serde(default, deserialize_with = "de_f64_or_zero")]
    pub sessions: f64,
    #[serde(default, deserialize_with = "de_f64_or_zero")]
    pub units_ordered: f64,
    #[serde(default, deserialize_with = "de_f64_or_zero")]
    pub ordered_product_sales: f64,
    #[serde(default, deserialize_with = "de_f64_or_zero")]
    pub buy_box_percentage: f64,
    #[serde(default, deserialize_with = "de_f64_or_zero")]
    pub mobile_sessions: f64,
    #[serde(default, deserialize_with = "de_f64_or_zero")]
    pub browser_sessions: f64,
}

// ---------------------------------------------------------------------------
// Returns
// ---------------------------------------------------------------------------

/// One customer return event.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReturnEvent {
    #[serde(alias = "Return Date", alias = "return-date", deserialize_with = "de_date")]
    pub return_date: NaiveDate,
    #[serde(alias = "Order ID", alias = "order-id", default)]
    pub order_id: String,
    #[serde(alias = "SKU")]
    pub sku: String,
    /// Absent quantities count as one returned unit.
    #[serde(
        alias = "Quantity",
        default = "default_return_qty",
        deserialize_with = "de_qty_or_one"
    )]
    pub quantity: f64,
    #[serde(alias = "Reason", default)]
    pub reason: String,
    /// Unit price if the report carries one; otherwise backfilled from the
    /// per-SKU mean order price during metric computation.
    #[serde(alias = "Price", default, deserialize_with = "de_opt_f64")]
    pub price: Option<f64>,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// One product review.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Review {
    #[serde(alias = "ASIN")]
    pub asin: String,
    #[serde(deserialize_with = "de_date")]
    pub review_date: NaiveDate,
    /// Star rating 1-5; non-numeric upstream values coerce to 0 and are
    /// excluded from rating aggregates.
    #[serde(default, deserialize_with = "de_u64_or_zero")]
    pub rating: u64,
    #[serde(default, deserialize_with = "de_bool")]
    pub is_verified: bool,
}

impl Review {
    pub fn is_negative(&self) -> bool {
        self.rating >= 1 && self.rating <= 2
    }

    pub fn is_positive(&self) -> bool {
        self.rating >= 4
    }
}

// ---------------------------------------------------------------------------
// Coercing deserializers
// ---------------------------------------------------------------------------

/// Missing or non-numeric values coerce to 0.0; NaN never enters a record.
fn de_f64_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let parsed = raw.trim().parse::<f64>().unwrap_or(0.0);
    Ok(if parsed.is_finite() { parsed } else { 0.0 })
}

/// Missing, non-numeric, or negative values coerce to 0.
fn de_u64_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let parsed = raw.trim().parse::<f64>().unwrap_or(0.0);
    Ok(if parsed.is_finite() && parsed > 0.0 {
        parsed.round() as u64
    } else {
        0
    })
}

/// Return quantities default to 1 when absent or unparseable, and floor at
/// 0 so a malformed negative row cannot subtract from the damage rollup.
fn de_qty_or_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim().parse::<f64>() {
        Ok(q) if q.is_finite() => Ok(q.max(0.0)),
        _ => Ok(1.0),
    }
}

fn de_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite()))
}

/// Flexible bool: "true"/"false", "1"/"0", "yes"/"no", empty = false.
fn de_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.to_lowercase().trim() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected bool value, got '{other}'"
        ))),
    }
}

/// Dates arrive either bare (`2025-01-15`) or with a timestamp; either way
/// only the calendar date matters to the reports.
fn de_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%SZ"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.date());
        }
    }
    Err(serde::de::Error::custom(format!(
        "unparseable date '{trimmed}'"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_value_is_recomputed_from_units_and_price() {
        let snap = InventorySnapshot {
            sku: "SKU-1".into(),
            store_name: "Main".into(),
            product_name: String::new(),
            snapshot_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            available_units: 40,
            unit_price: 12.5,
            velocity: 2.0,
            upto_90_days: 30,
            days_91_to_180: 10,
            days_181_to_270: 0,
            days_271_to_365: 0,
            over_365_days: 0,
        };
        assert!((snap.stock_value() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn age_buckets_come_out_in_bucket_order() {
        let snap = InventorySnapshot {
            sku: "SKU-1".into(),
            store_name: String::new(),
            product_name: String::new(),
            snapshot_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            available_units: 10,
            unit_price: 1.0,
            velocity: 0.0,
            upto_90_days: 1,
            days_91_to_180: 2,
            days_181_to_270: 3,
            days_271_to_365: 4,
            over_365_days: 5,
        };
        let buckets = snap.age_bucket_units();
        assert_eq!(buckets[0], (AgeBucket::UpTo90Days, 1));
        assert_eq!(buckets[4], (AgeBucket::Over365Days, 5));
    }

    #[test]
    fn other_adjustment_detection_is_case_insensitive() {
        assert!(TransactionType::Other("Other Adjustment".into()).is_other_adjustment());
        assert!(TransactionType::Other("other".into()).is_other_adjustment());
        assert!(!TransactionType::Other("ServiceFee".into()).is_other_adjustment());
        assert!(!TransactionType::Refund.is_other_adjustment());
    }

    #[test]
    fn review_polarity_bands() {
        let mut review = Review {
            asin: "B01".into(),
            review_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            rating: 1,
            is_verified: true,
        };
        assert!(review.is_negative());
        review.rating = 3;
        assert!(!review.is_negative() && !review.is_positive());
        review.rating = 5;
        assert!(review.is_positive());
        // Coerced-to-zero ratings count as neither.
        review.rating = 0;
        assert!(!review.is_negative() && !review.is_positive());
    }
}
