//! Per-report insight panels.
//!
//! Each builder turns one dataset's metrics into a list of rendered cards:
//! threshold verdicts go through the engine's classifier, and the purely
//! informational cards (top asset, concentration, run rates) are computed
//! here. A metric the classifier does not know is logged and skipped; the
//! panel renders without it rather than failing the whole report.

use serde::Serialize;

use insight_engine::classifier::classify;
use insight_engine::thresholds::Severity;

use crate::aggregate::{safe_pct, top_by_count, top_by_sum};
use crate::metrics::{
    asin_stats, high_traffic_low_conversion, revenue_by_sku, InventoryMetrics, OrderMetrics,
    ReturnMetrics, ReviewMetrics, SettlementMetrics, TrafficMetrics, INFINITE_SUPPLY_DAYS,
};
use crate::records::{InventorySnapshot, OrderLine, ReturnEvent, Review, TrafficDay};

/// One rendered card. Threshold cards carry a severity; informational
/// cards carry none.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InsightCard {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub body: String,
}

impl InsightCard {
    fn info(title: impl Into<String>, body: String) -> Self {
        Self {
            title: title.into(),
            severity: None,
            body,
        }
    }
}

/// Classify one metric and append the verdict card. Unknown metrics degrade
/// to a skipped card with a warning; the catalog is fixed, so hitting this
/// means a builder and the catalog drifted apart.
fn push_verdict(cards: &mut Vec<InsightCard>, metric: &'static str, value: f64) {
    match classify(metric, value) {
        Ok(verdict) => cards.push(InsightCard {
            title: verdict.title.to_string(),
            severity: Some(verdict.severity),
            body: verdict.message,
        }),
        Err(err) => log::warn!("skipping insight card: {err}"),
    }
}

/// Inventory panel: capital freeze, top asset, dead stock, stock cover.
pub fn inventory_panel(snapshots: &[InventorySnapshot]) -> Vec<InsightCard> {
    let m = InventoryMetrics::compute(snapshots);
    let mut cards = Vec::new();

    let cover = if m.avg_velocity > 0.0 {
        format!("{:.0} months of cover", m.total_units as f64 / m.avg_velocity / 30.0)
    } else {
        "no sales movement".to_string()
    };
    cards.push(InsightCard::info(
        "Frozen capital",
        format!("${:.0} tied up in stock; {cover}.", m.total_stock_value),
    ));

    if let Some((sku, value)) = top_by_sum(snapshots, |s| s.sku.as_str(), |s| s.stock_value()) {
        let pct = safe_pct(value, m.total_stock_value);
        cards.push(InsightCard::info(
            "Top asset",
            format!("{sku} holds ${value:.0} ({pct:.0}% of stock value)."),
        ));
    }

    if m.dead_stock_skus > 0 {
        cards.push(InsightCard::info(
            "Dead stock",
            format!(
                "{} SKU(s) with zero velocity worth ${:.0}. Consider liquidation.",
                m.dead_stock_skus, m.dead_stock_value
            ),
        ));
    }

    push_verdict(&mut cards, "days_of_supply", m.days_of_supply);
    cards
}

/// Settlements panel: margin, fee burden, refunds, plus the cash summary.
pub fn settlements_panel(metrics: &SettlementMetrics) -> Vec<InsightCard> {
    let mut cards = Vec::new();
    push_verdict(&mut cards, "margin_pct", metrics.margin_pct);
    push_verdict(&mut cards, "fee_pct", metrics.fee_pct);
    push_verdict(&mut cards, "refund_rate_pct", metrics.refund_rate_pct);
    cards.push(InsightCard::info(
        "Bottom line",
        format!(
            "Sales ${:.0} -> ${:.0} in hand. Fees: ${:.0}.",
            metrics.gross_sales,
            metrics.net_payout,
            metrics.fees.abs()
        ),
    ));
    cards
}

/// Sales & traffic panel: conversion, buy box, mobile share, missed
/// revenue, session value, top ASIN concentration.
pub fn traffic_panel(days: &[TrafficDay]) -> Vec<InsightCard> {
    let m = TrafficMetrics::compute(days);
    let stats = asin_stats(days);
    let mut cards = Vec::new();
    push_verdict(&mut cards, "conversion_pct", m.conversion_pct);

    // The warn band names how many individual ASINs are losing the box.
    let losing_box = stats.iter().filter(|s| s.buy_box_pct < 80.0).count();
    match classify("buy_box_pct", m.buy_box_pct) {
        Ok(mut verdict) => {
            if verdict.severity == Severity::Warn && losing_box > 0 {
                verdict.message = format!(
                    "Buy Box {:.1}% — acceptable, {losing_box} ASIN(s) are losing it.",
                    m.buy_box_pct
                );
            }
            cards.push(InsightCard {
                title: verdict.title.to_string(),
                severity: Some(verdict.severity),
                body: verdict.message,
            });
        }
        Err(err) => log::warn!("skipping insight card: {err}"),
    }

    let mobile_note = if m.mobile_share_pct >= 60.0 {
        "in the normal range"
    } else {
        "below the ~65% marketplace average"
    };
    cards.push(InsightCard::info(
        "Mobile",
        format!("{:.0}% mobile traffic — {mobile_note}.", m.mobile_share_pct),
    ));

    if !stats.is_empty() {
        let low_conversion = high_traffic_low_conversion(&stats);
        let worst = low_conversion
            .iter()
            .max_by(|a, b| a.sessions.total_cmp(&b.sessions));
        cards.push(match worst {
            Some(asin_stat) => InsightCard {
                title: "Missed revenue".to_string(),
                severity: Some(Severity::Critical),
                body: format!(
                    "{} ASIN(s) with high traffic and low conversion. Worst: {}.",
                    low_conversion.len(),
                    asin_stat.asin
                ),
            },
            None => InsightCard {
                title: "Missed revenue".to_string(),
                severity: Some(Severity::Good),
                body: "Every high-traffic ASIN converts well.".to_string(),
            },
        });
    }

    cards.push(InsightCard::info(
        "Session value",
        format!(
            "Each session is worth ${:.2}; +1000 sessions = +${:.0}.",
            m.revenue_per_session,
            m.revenue_per_session * 1000.0
        ),
    ));

    if let Some((asin, revenue)) =
        top_by_sum(days, |d| d.asin.as_str(), |d| d.ordered_product_sales)
    {
        let pct = safe_pct(revenue, m.total_revenue);
        cards.push(InsightCard::info(
            "Top ASIN",
            format!("{asin} = ${revenue:.0} ({pct:.0}% of revenue)."),
        ));
    }

    cards
}

/// Orders panel: average order value, daily run rate, SKU concentration.
pub fn orders_panel(orders: &[OrderLine]) -> Vec<InsightCard> {
    let m = OrderMetrics::compute(orders);
    let mut cards = Vec::new();

    cards.push(InsightCard::info(
        "Average order",
        format!(
            "${:.2} per order; +10% AOV = +${:.0}.",
            m.avg_order_value,
            m.total_revenue * 0.1
        ),
    ));

    cards.push(InsightCard::info(
        "Daily revenue",
        format!(
            "${:.0}/day; monthly run rate ${:.0}.",
            m.revenue_per_day,
            m.revenue_per_day * 30.0
        ),
    ));

    if let Some((sku, revenue)) = revenue_by_sku(orders).into_iter().next() {
        let pct = safe_pct(revenue, m.total_revenue);
        cards.push(InsightCard::info(
            "Concentration risk",
            format!("{sku} = {pct:.0}% of revenue (${revenue:.0}). Diversify."),
        ));
    }

    cards
}

/// Returns panel: rate verdict, dollar damage, top reason, problem SKU.
pub fn returns_panel(metrics: &ReturnMetrics, returns: &[ReturnEvent]) -> Vec<InsightCard> {
    let mut cards = Vec::new();
    push_verdict(&mut cards, "return_rate_pct", metrics.return_rate_pct);

    cards.push(InsightCard::info(
        "Damage",
        format!("Returns cost ${:.0}.", metrics.total_return_value),
    ));

    if let Some((reason, _)) =
        top_by_count(returns, |r| r.reason.as_str()).filter(|(reason, _)| !reason.is_empty())
    {
        cards.push(InsightCard::info(
            "Top reason",
            format!("\"{reason}\" leads the return reasons."),
        ));
    }

    if let Some((sku, count)) = top_by_count(returns, |r| r.sku.as_str()) {
        cards.push(InsightCard::info(
            "Problem SKU",
            format!("{sku} ({count} returns)."),
        ));
    }

    cards
}

/// Reviews panel: rating health, negativity, loyalty, verification, and the
/// most-complained-about ASIN.
pub fn reviews_panel(reviews: &[Review]) -> Vec<InsightCard> {
    let m = ReviewMetrics::compute(reviews);
    let mut cards = Vec::new();

    if m.review_count == 0 {
        return cards;
    }

    push_verdict(&mut cards, "avg_rating", m.avg_rating);
    push_verdict(&mut cards, "negative_review_pct", m.negative_pct);

    cards.push(InsightCard::info(
        "Loyalty",
        format!("{:.1}% positive (4-5 stars) — a loyal buyer base.", m.positive_pct),
    ));

    cards.push(InsightCard::info(
        "Verification",
        format!(
            "{:.1}% verified — {}.",
            m.verified_pct,
            if m.verified_pct >= 80.0 {
                "strong trust signal on Amazon"
            } else {
                "watch the review policy"
            }
        ),
    ));

    let negative: Vec<&Review> = reviews.iter().filter(|r| r.is_negative()).collect();
    if let Some((asin, count)) = top_by_count(&negative, |r| r.asin.as_str()) {
        cards.push(InsightCard::info(
            "Toxic ASIN",
            format!("{asin} — {count} negative review(s). Start the analysis there."),
        ));
    }

    cards
}
