//! Aggregate business metrics, computed fresh per report render.
//!
//! Each builder reduces one dataset slice into a small typed summary plus a
//! [`MetricSample`], the name-to-value map the classifier consumes. Every
//! value that enters a sample is finite by construction; zero-denominator
//! ratios resolve to 0 by policy, never to NaN or an error.

use std::collections::BTreeMap;

use crate::aggregate::{
    distinct_count, finite_or_zero, mean, median, safe_pct, safe_ratio, sum_by,
};
use crate::records::{
    InventorySnapshot, OrderLine, ReturnEvent, Review, SettlementTxn, TrafficDay, TransactionType,
};

/// Days-of-supply reported when velocity is zero: nothing is selling, so
/// the stock never runs out. 999 reads as "don't worry about cover" and
/// classifies good; a 0 fallback would misreport the warehouse as sold out.
pub const INFINITE_SUPPLY_DAYS: f64 = 999.0;

/// Ephemeral, request-scoped metric map. Not persisted; rebuilt from the
/// filtered slice on every render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricSample {
    values: BTreeMap<&'static str, f64>,
}

impl MetricSample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a metric value, coercing non-finite input to 0.
    pub fn insert(&mut self, metric: &'static str, value: f64) {
        self.values.insert(metric, finite_or_zero(value));
    }

    pub fn get(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Settlements
// ---------------------------------------------------------------------------

/// Financial rollup of a settlement slice. Negative amounts are charges.
#[derive(Clone, Debug, PartialEq)]
pub struct SettlementMetrics {
    /// Sum of every amount, positive and negative: what actually lands.
    pub net_payout: f64,
    /// Positive Order-type amounts only.
    pub gross_sales: f64,
    /// Negative non-refund, non-"other" amounts (as a negative number).
    pub fees: f64,
    /// Refund-type amounts (as a negative number).
    pub refunds: f64,
    pub margin_pct: f64,
    pub fee_pct: f64,
    pub refund_rate_pct: f64,
}

impl SettlementMetrics {
    pub fn compute(txns: &[SettlementTxn]) -> Self {
        let net_payout: f64 = txns.iter().map(|t| finite_or_zero(t.amount)).sum();
        let gross_sales: f64 = txns
            .iter()
            .filter(|t| t.transaction_type == TransactionType::Order && t.amount > 0.0)
            .map(|t| t.amount)
            .sum();
        let fees: f64 = txns
            .iter()
            .filter(|t| {
                t.amount < 0.0
                    && t.transaction_type != TransactionType::Refund
                    && !t.transaction_type.is_other_adjustment()
            })
            .map(|t| t.amount)
            .sum();
        let refunds: f64 = txns
            .iter()
            .filter(|t| t.transaction_type == TransactionType::Refund)
            .map(|t| finite_or_zero(t.amount))
            .sum();

        Self {
            net_payout,
            gross_sales,
            fees,
            refunds,
            margin_pct: safe_pct(net_payout, gross_sales),
            fee_pct: safe_pct(fees.abs(), gross_sales),
            refund_rate_pct: safe_pct(refunds.abs(), gross_sales),
        }
    }

    pub fn sample(&self) -> MetricSample {
        let mut sample = MetricSample::new();
        sample.insert("margin_pct", self.margin_pct);
        sample.insert("fee_pct", self.fee_pct);
        sample.insert("refund_rate_pct", self.refund_rate_pct);
        sample
    }
}

// ---------------------------------------------------------------------------
// Sales & traffic
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct TrafficMetrics {
    pub total_sessions: f64,
    pub total_units: f64,
    pub total_revenue: f64,
    pub conversion_pct: f64,
    /// Mean, not sum: buy-box share is a percentage-type aggregate.
    pub buy_box_pct: f64,
    pub mobile_share_pct: f64,
    pub revenue_per_session: f64,
}

impl TrafficMetrics {
    pub fn compute(days: &[TrafficDay]) -> Self {
        let total_sessions: f64 = days.iter().map(|d| finite_or_zero(d.sessions)).sum();
        let total_units: f64 = days.iter().map(|d| finite_or_zero(d.units_ordered)).sum();
        let total_revenue: f64 = days
            .iter()
            .map(|d| finite_or_zero(d.ordered_product_sales))
            .sum();
        let mobile: f64 = days.iter().map(|d| finite_or_zero(d.mobile_sessions)).sum();
        let browser: f64 = days
            .iter()
            .map(|d| finite_or_zero(d.browser_sessions))
            .sum();

        Self {
            total_sessions,
            total_units,
            total_revenue,
            conversion_pct: safe_pct(total_units, total_sessions),
            buy_box_pct: mean(days.iter().map(|d| d.buy_box_percentage)),
            mobile_share_pct: safe_pct(mobile, mobile + browser),
            revenue_per_session: safe_ratio(total_revenue, total_sessions),
        }
    }

    pub fn sample(&self) -> MetricSample {
        let mut sample = MetricSample::new();
        sample.insert("conversion_pct", self.conversion_pct);
        sample.insert("buy_box_pct", self.buy_box_pct);
        sample
    }
}

/// Per-ASIN rollup of a traffic slice: summed sessions/units/revenue plus
/// mean buy box and the ASIN's own conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct AsinStat {
    pub asin: String,
    pub sessions: f64,
    pub units: f64,
    pub revenue: f64,
    pub buy_box_pct: f64,
    pub conversion_pct: f64,
}

/// Group a traffic slice by ASIN, sorted by ASIN for deterministic output.
pub fn asin_stats(days: &[TrafficDay]) -> Vec<AsinStat> {
    let mut groups: BTreeMap<String, (f64, f64, f64, Vec<f64>)> = BTreeMap::new();
    for day in days {
        let entry = groups.entry(day.asin.clone()).or_default();
        entry.0 += finite_or_zero(day.sessions);
        entry.1 += finite_or_zero(day.units_ordered);
        entry.2 += finite_or_zero(day.ordered_product_sales);
        entry.3.push(day.buy_box_percentage);
    }
    groups
        .into_iter()
        .map(|(asin, (sessions, units, revenue, buy_box))| AsinStat {
            asin,
            sessions,
            units,
            revenue,
            buy_box_pct: mean(buy_box),
            conversion_pct: safe_pct(units, sessions),
        })
        .collect()
}

/// ASINs with above-median sessions but below-median conversion: traffic
/// that the listing fails to turn into orders. Both comparisons are strict,
/// so a single-ASIN slice never flags itself.
pub fn high_traffic_low_conversion(stats: &[AsinStat]) -> Vec<&AsinStat> {
    let median_sessions = median(stats.iter().map(|s| s.sessions));
    let median_conversion = median(stats.iter().map(|s| s.conversion_pct));
    stats
        .iter()
        .filter(|s| s.sessions > median_sessions && s.conversion_pct < median_conversion)
        .collect()
}

// ---------------------------------------------------------------------------
// Returns
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnMetrics {
    /// Unique returned orders / unique orders, as a percentage. Computed
    /// over the FULL return and order history, not a trailing window; the
    /// rate is a lifetime health signal even when the damage rollup is
    /// windowed.
    pub return_rate_pct: f64,
    /// Dollar value of returned goods in the `returns` slice; rows without
    /// a price use the per-SKU mean order price, or 0 when the SKU never
    /// appears in orders.
    pub total_return_value: f64,
    pub return_count: usize,
}

impl ReturnMetrics {
    /// `returns` is the (possibly windowed) slice the damage rollup covers;
    /// `all_returns` and `orders` are the full histories the rate is
    /// computed against. Callers without a window pass the same slice twice.
    pub fn compute(
        returns: &[ReturnEvent],
        all_returns: &[ReturnEvent],
        orders: &[OrderLine],
    ) -> Self {
        let unique_returned = distinct_count(all_returns, |r| r.order_id.as_str());
        let unique_orders = distinct_count(orders, |o| o.order_id.as_str());

        // Per-SKU mean item price, for rows the report shipped priceless.
        let price_by_sku: BTreeMap<String, f64> = {
            let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
            for order in orders {
                let entry = sums.entry(order.sku.clone()).or_default();
                entry.0 += finite_or_zero(order.item_price);
                entry.1 += 1;
            }
            sums.into_iter()
                .map(|(sku, (sum, n))| (sku, safe_ratio(sum, n as f64)))
                .collect()
        };

        let total_return_value: f64 = returns
            .iter()
            .map(|r| {
                let price = r
                    .price
                    .unwrap_or_else(|| price_by_sku.get(&r.sku).copied().unwrap_or(0.0));
                finite_or_zero(price) * finite_or_zero(r.quantity)
            })
            .sum();

        Self {
            return_rate_pct: safe_pct(unique_returned as f64, unique_orders as f64),
            total_return_value,
            return_count: returns.len(),
        }
    }

    pub fn sample(&self) -> MetricSample {
        let mut sample = MetricSample::new();
        sample.insert("return_rate_pct", self.return_rate_pct);
        sample
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct InventoryMetrics {
    pub sku_count: usize,
    pub total_units: u64,
    /// Recomputed from units x price per row.
    pub total_stock_value: f64,
    pub avg_velocity: f64,
    /// `total_units / avg_velocity`; [`INFINITE_SUPPLY_DAYS`] when nothing
    /// is selling.
    pub days_of_supply: f64,
    pub dead_stock_skus: usize,
    pub dead_stock_value: f64,
}

impl InventoryMetrics {
    pub fn compute(snapshots: &[InventorySnapshot]) -> Self {
        let total_units: u64 = snapshots.iter().map(|s| s.available_units).sum();
        let total_stock_value: f64 = snapshots.iter().map(|s| s.stock_value()).sum();
        let avg_velocity = mean(snapshots.iter().map(|s| s.velocity));

        let days_of_supply = if avg_velocity > 0.0 {
            total_units as f64 / avg_velocity
        } else {
            INFINITE_SUPPLY_DAYS
        };

        let dead: Vec<&InventorySnapshot> =
            snapshots.iter().filter(|s| s.velocity == 0.0).collect();

        Self {
            sku_count: snapshots.len(),
            total_units,
            total_stock_value,
            avg_velocity,
            days_of_supply,
            dead_stock_skus: dead.len(),
            dead_stock_value: dead.iter().map(|s| s.stock_value()).sum(),
        }
    }

    pub fn sample(&self) -> MetricSample {
        let mut sample = MetricSample::new();
        sample.insert("days_of_supply", self.days_of_supply);
        sample
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct OrderMetrics {
    pub total_revenue: f64,
    pub order_count: usize,
    pub avg_order_value: f64,
    /// Revenue divided by the span between first and last order date,
    /// floored at one day.
    pub revenue_per_day: f64,
}

impl OrderMetrics {
    pub fn compute(orders: &[OrderLine]) -> Self {
        let total_revenue: f64 = orders.iter().map(|o| finite_or_zero(o.total_price())).sum();
        let order_count = distinct_count(orders, |o| o.order_id.as_str());

        let span_days = match (
            orders.iter().map(|o| o.order_date).min(),
            orders.iter().map(|o| o.order_date).max(),
        ) {
            (Some(first), Some(last)) => (last - first).num_days().max(1),
            _ => 1,
        };

        Self {
            total_revenue,
            order_count,
            avg_order_value: safe_ratio(total_revenue, order_count as f64),
            revenue_per_day: total_revenue / span_days as f64,
        }
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct ReviewMetrics {
    pub review_count: usize,
    /// Mean over validly-rated reviews (rating 1-5); coerced-zero ratings
    /// are invalid data, not one-star reviews.
    pub avg_rating: f64,
    pub negative_pct: f64,
    pub positive_pct: f64,
    pub verified_pct: f64,
}

impl ReviewMetrics {
    pub fn compute(reviews: &[Review]) -> Self {
        let rated: Vec<&Review> = reviews.iter().filter(|r| r.rating >= 1).collect();
        let negative = reviews.iter().filter(|r| r.is_negative()).count();
        let positive = reviews.iter().filter(|r| r.is_positive()).count();
        let verified = reviews.iter().filter(|r| r.is_verified).count();
        let total = reviews.len() as f64;

        Self {
            review_count: reviews.len(),
            avg_rating: mean(rated.iter().map(|r| r.rating as f64)),
            negative_pct: safe_pct(negative as f64, total),
            positive_pct: safe_pct(positive as f64, total),
            verified_pct: safe_pct(verified as f64, total),
        }
    }

    pub fn sample(&self) -> MetricSample {
        let mut sample = MetricSample::new();
        sample.insert("avg_rating", self.avg_rating);
        sample.insert("negative_review_pct", self.negative_pct);
        sample
    }
}

/// Revenue grouped by SKU, descending. Feeds the concentration card.
pub fn revenue_by_sku(orders: &[OrderLine]) -> Vec<(String, f64)> {
    let mut grouped = sum_by(orders, |o| o.sku.as_str(), |o| o.total_price());
    grouped.sort_by(|a, b| b.1.total_cmp(&a.1));
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn txn(kind: TransactionType, amount: f64) -> SettlementTxn {
        SettlementTxn {
            posted_date: date(10),
            transaction_type: kind,
            amount,
            quantity: 1.0,
            currency: "USD".into(),
        }
    }

    #[test]
    fn settlement_rollup_matches_hand_computation() {
        let txns = vec![
            txn(TransactionType::Order, 1000.0),
            txn(TransactionType::Order, 500.0),
            txn(TransactionType::Order, -30.0), // negative order row is a fee
            txn(TransactionType::Refund, -60.0),
            txn(TransactionType::Other("ServiceFee".into()), -210.0),
            txn(TransactionType::Other("Other Adjustment".into()), -50.0),
        ];
        let m = SettlementMetrics::compute(&txns);
        assert!((m.gross_sales - 1500.0).abs() < 1e-9);
        assert!((m.fees - (-240.0)).abs() < 1e-9); // -30 + -210; no refund, no "other"
        assert!((m.refunds - (-60.0)).abs() < 1e-9);
        assert!((m.net_payout - 1150.0).abs() < 1e-9);
        assert!((m.margin_pct - 76.666_666_666_666_67).abs() < 1e-9);
        assert!((m.fee_pct - 16.0).abs() < 1e-9);
        assert!((m.refund_rate_pct - 4.0).abs() < 1e-9);
    }

    #[test]
    fn settlement_metrics_survive_zero_gross() {
        let m = SettlementMetrics::compute(&[txn(TransactionType::Refund, -10.0)]);
        assert_eq!(m.margin_pct, 0.0);
        assert_eq!(m.fee_pct, 0.0);
        assert_eq!(m.refund_rate_pct, 0.0);
    }

    fn traffic(sessions: f64, units: f64, revenue: f64, buy_box: f64) -> TrafficDay {
        TrafficDay {
            report_date: date(10),
            asin: "B01".into(),
            sessions,
            units_ordered: units,
            ordered_product_sales: revenue,
            buy_box_percentage: buy_box,
            mobile_sessions: 60.0,
            browser_sessions: 40.0,
        }
    }

    #[test]
    fn conversion_with_zero_sessions_is_zero() {
        let m = TrafficMetrics::compute(&[traffic(0.0, 5.0, 100.0, 90.0)]);
        assert_eq!(m.conversion_pct, 0.0);
        assert_eq!(m.revenue_per_session, 0.0);
    }

    #[test]
    fn buy_box_uses_mean_not_sum() {
        let m = TrafficMetrics::compute(&[
            traffic(100.0, 10.0, 200.0, 90.0),
            traffic(100.0, 14.0, 200.0, 70.0),
        ]);
        assert!((m.buy_box_pct - 80.0).abs() < 1e-9);
        assert!((m.conversion_pct - 12.0).abs() < 1e-9);
        assert!((m.mobile_share_pct - 60.0).abs() < 1e-9);
    }

    fn asin_day(asin: &str, sessions: f64, units: f64, revenue: f64, buy_box: f64) -> TrafficDay {
        TrafficDay {
            asin: asin.into(),
            ..traffic(sessions, units, revenue, buy_box)
        }
    }

    #[test]
    fn asin_stats_sum_traffic_and_average_buy_box_per_asin() {
        let days = vec![
            asin_day("B01", 100.0, 10.0, 200.0, 90.0),
            asin_day("B01", 100.0, 6.0, 100.0, 70.0),
            asin_day("B02", 50.0, 10.0, 300.0, 95.0),
        ];
        let stats = asin_stats(&days);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].asin, "B01");
        assert!((stats[0].sessions - 200.0).abs() < 1e-9);
        assert!((stats[0].conversion_pct - 8.0).abs() < 1e-9); // 16/200
        assert!((stats[0].buy_box_pct - 80.0).abs() < 1e-9); // mean(90, 70)
        assert!((stats[1].revenue - 300.0).abs() < 1e-9);
    }

    #[test]
    fn high_traffic_low_conversion_compares_against_the_medians() {
        let days = vec![
            asin_day("B-HOT", 1000.0, 20.0, 400.0, 90.0), // 2% conv, big traffic
            asin_day("B-MID", 500.0, 50.0, 900.0, 90.0),  // 10% conv
            asin_day("B-LOW", 100.0, 12.0, 240.0, 90.0),  // 12% conv, small traffic
        ];
        let stats = asin_stats(&days);
        // Medians: 500 sessions, 10% conversion. Only B-HOT is strictly
        // above one and strictly below the other.
        let flagged = high_traffic_low_conversion(&stats);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].asin, "B-HOT");
    }

    #[test]
    fn a_single_asin_never_flags_itself() {
        let stats = asin_stats(&[asin_day("B01", 1000.0, 1.0, 20.0, 90.0)]);
        assert!(high_traffic_low_conversion(&stats).is_empty());
    }

    fn order(id: &str, sku: &str, day: u32, qty: f64, price: f64) -> OrderLine {
        OrderLine {
            order_id: id.into(),
            order_date: date(day),
            sku: sku.into(),
            quantity: qty,
            item_price: price,
            item_tax: 0.0,
            shipping_price: 0.0,
        }
    }

    #[test]
    fn return_rate_counts_unique_orders() {
        let orders = vec![
            order("A-1", "WID-001", 1, 1.0, 20.0),
            order("A-1", "WID-002", 1, 1.0, 10.0), // same order, second line
            order("A-2", "WID-001", 2, 1.0, 20.0),
            order("A-3", "WID-001", 3, 1.0, 20.0),
            order("A-4", "WID-001", 4, 1.0, 20.0),
        ];
        let returns = vec![ReturnEvent {
            return_date: date(5),
            order_id: "A-2".into(),
            sku: "WID-001".into(),
            quantity: 1.0,
            reason: "Defective".into(),
            price: None,
        }];
        let m = ReturnMetrics::compute(&returns, &returns, &orders);
        // 1 returned order of 4 unique orders
        assert!((m.return_rate_pct - 25.0).abs() < 1e-9);
        // Priceless return valued at the per-SKU mean order price ($20)
        assert!((m.total_return_value - 20.0).abs() < 1e-9);
    }

    #[test]
    fn return_rate_uses_the_full_history_even_when_the_value_is_windowed() {
        let orders: Vec<OrderLine> = (1..=5)
            .map(|i| order(&format!("A-{i}"), "WID-001", i as u32, 1.0, 20.0))
            .collect();
        let ret = |id: &str, day: u32| ReturnEvent {
            return_date: date(day),
            order_id: id.into(),
            sku: "WID-001".into(),
            quantity: 1.0,
            reason: String::new(),
            price: Some(20.0),
        };
        let all_returns = vec![ret("A-1", 1), ret("A-5", 20)];
        let recent = &all_returns[1..];

        let m = ReturnMetrics::compute(recent, &all_returns, &orders);
        // 2 returned orders of 5, even though only one is in the window.
        assert!((m.return_rate_pct - 40.0).abs() < 1e-9);
        // The damage rollup covers only the windowed slice.
        assert!((m.total_return_value - 20.0).abs() < 1e-9);
        assert_eq!(m.return_count, 1);
    }

    #[test]
    fn return_value_prefers_the_row_price() {
        let returns = vec![ReturnEvent {
            return_date: date(5),
            order_id: "A-9".into(),
            sku: "WID-001".into(),
            quantity: 2.0,
            reason: String::new(),
            price: Some(15.0),
        }];
        let m = ReturnMetrics::compute(&returns, &returns, &[]);
        assert!((m.total_return_value - 30.0).abs() < 1e-9);
        // No orders at all: rate falls back to 0, not a division error.
        assert_eq!(m.return_rate_pct, 0.0);
    }

    fn snapshot(sku: &str, units: u64, price: f64, velocity: f64) -> InventorySnapshot {
        InventorySnapshot {
            sku: sku.into(),
            store_name: "Main".into(),
            product_name: String::new(),
            snapshot_date: date(15),
            available_units: units,
            unit_price: price,
            velocity,
            upto_90_days: units,
            days_91_to_180: 0,
            days_181_to_270: 0,
            days_271_to_365: 0,
            over_365_days: 0,
        }
    }

    #[test]
    fn days_of_supply_from_units_and_velocity() {
        let m = InventoryMetrics::compute(&[
            snapshot("A", 100, 10.0, 2.0),
            snapshot("B", 100, 5.0, 2.0),
        ]);
        // 200 units / 2.0 avg velocity = 100 days
        assert!((m.days_of_supply - 100.0).abs() < 1e-9);
        assert!((m.total_stock_value - 1500.0).abs() < 1e-9);
        assert_eq!(m.dead_stock_skus, 0);
    }

    #[test]
    fn zero_velocity_reports_infinite_supply_not_zero_days() {
        let m = InventoryMetrics::compute(&[snapshot("A", 100, 10.0, 0.0)]);
        assert_eq!(m.days_of_supply, INFINITE_SUPPLY_DAYS);
        assert_eq!(m.dead_stock_skus, 1);
        assert!((m.dead_stock_value - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn order_metrics_average_and_run_rate() {
        let orders = vec![
            order("A-1", "WID-001", 1, 2.0, 25.0), // $50
            order("A-2", "WID-001", 11, 1.0, 30.0), // $30
        ];
        let m = OrderMetrics::compute(&orders);
        assert_eq!(m.order_count, 2);
        assert!((m.avg_order_value - 40.0).abs() < 1e-9);
        // $80 over a 10-day span
        assert!((m.revenue_per_day - 8.0).abs() < 1e-9);
    }

    fn review(rating: u64, verified: bool) -> Review {
        Review {
            asin: "B01".into(),
            review_date: date(1),
            rating,
            is_verified: verified,
        }
    }

    #[test]
    fn review_rollup_shares() {
        let reviews = vec![
            review(5, true),
            review(4, true),
            review(3, false),
            review(1, true),
            review(0, false), // invalid rating, excluded from the mean
        ];
        let m = ReviewMetrics::compute(&reviews);
        assert!((m.avg_rating - 3.25).abs() < 1e-9); // (5+4+3+1)/4
        assert!((m.negative_pct - 20.0).abs() < 1e-9); // 1 of 5
        assert!((m.positive_pct - 40.0).abs() < 1e-9); // 2 of 5
        assert!((m.verified_pct - 60.0).abs() < 1e-9);
    }

    #[test]
    fn empty_datasets_produce_all_zero_metrics() {
        assert_eq!(TrafficMetrics::compute(&[]).conversion_pct, 0.0);
        assert_eq!(OrderMetrics::compute(&[]).avg_order_value, 0.0);
        assert_eq!(ReviewMetrics::compute(&[]).avg_rating, 0.0);
        let inv = InventoryMetrics::compute(&[]);
        assert_eq!(inv.days_of_supply, INFINITE_SUPPLY_DAYS);
    }

    #[test]
    fn sample_values_are_always_finite() {
        let mut sample = MetricSample::new();
        sample.insert("margin_pct", f64::INFINITY);
        sample.insert("conversion_pct", f64::NAN);
        assert_eq!(sample.get("margin_pct"), Some(0.0));
        assert_eq!(sample.get("conversion_pct"), Some(0.0));
    }
}
