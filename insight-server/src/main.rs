use std::env;
use std::path::Path;
use std::process;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use insight_engine::forecast::ForecastStatus;
use insight_engine::thresholds::Severity;
use insight_pipeline::digest::DEFAULT_HORIZON_DAYS;
use insight_pipeline::store::{ReportStore, DEFAULT_REPORT_TTL};
use insight_pipeline::{InsightCard, OverviewDigest};

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DigestJson<'a> {
    generated_at: String,
    horizon_days: u32,
    load_ms: u128,
    digest_ms: u128,
    rows_loaded: RowCounts,
    #[serde(flatten)]
    digest: &'a OverviewDigest,
}

#[derive(Serialize)]
struct RowCounts {
    inventory: usize,
    orders: usize,
    settlements: usize,
    traffic: usize,
    returns: usize,
    reviews: usize,
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

fn severity_icon(severity: Option<Severity>) -> &'static str {
    match severity {
        Some(Severity::Critical) => "!!",
        Some(Severity::Warn) => "! ",
        _ => "  ",
    }
}

fn print_panel(name: &str, cards: &[InsightCard]) {
    if cards.is_empty() {
        return;
    }
    println!("  {:\u{2500}<64}", "");
    println!("  {name}");
    println!();
    for card in cards {
        println!(
            "  {} {:18} {}",
            severity_icon(card.severity),
            card.title,
            card.body
        );
    }
    println!();
}

fn print_human(digest: &OverviewDigest, counts: &RowCounts, load_ms: u128, digest_ms: u128) {
    println!();
    println!("  Seller Overview Digest");
    if let Some(date) = digest.snapshot_date {
        println!("  Inventory snapshot: {date}");
    }
    println!(
        "  {} inventory rows \u{00b7} {} orders \u{00b7} {} settlements \u{00b7} \
         {} traffic days \u{00b7} {} returns \u{00b7} {} reviews",
        counts.inventory,
        counts.orders,
        counts.settlements,
        counts.traffic,
        counts.returns,
        counts.reviews
    );
    println!();

    print_panel("INVENTORY", &digest.inventory);
    print_panel("FINANCES", &digest.settlements);
    print_panel("SALES & TRAFFIC", &digest.traffic);
    print_panel("ORDERS", &digest.orders);
    print_panel("RETURNS", &digest.returns);
    print_panel("REVIEWS", &digest.reviews);

    if !digest.forecasts.is_empty() {
        println!("  {:\u{2500}<64}", "");
        println!("  SOLD-OUT FORECASTS");
        println!();
        for f in &digest.forecasts {
            let (icon, verdict) = match &f.forecast.status {
                ForecastStatus::SoldOut { date } => ("!!", format!("sold out by {date}")),
                ForecastStatus::Sufficient { horizon_days } => {
                    ("  ", format!("stock outlasts the {horizon_days}-day horizon"))
                }
                ForecastStatus::InsufficientData => {
                    ("  ", "not enough history to forecast".to_string())
                }
            };
            println!(
                "  {} {:16} {}  ({} history points, R\u{00b2} {:.2})",
                icon, f.sku, verdict, f.history_points, f.forecast.confidence
            );
        }
        println!();
    }

    println!("  {:\u{2500}<64}", "");
    println!(
        "  \u{23f1}  CSV loaded in {}ms \u{00b7} Digest built in {}ms \u{00b7} Total {}ms",
        load_ms,
        digest_ms,
        load_ms + digest_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: insight-server <data-dir> [--horizon N] [--json]");
        eprintln!();
        eprintln!("Reads the CSV exports from <data-dir> (inventory.csv, orders.csv,");
        eprintln!("settlements.csv, traffic.csv, returns.csv, reviews.csv; missing");
        eprintln!("files are skipped) and prints the overview digest.");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --horizon  Forecast horizon in days (default: {DEFAULT_HORIZON_DAYS})");
        eprintln!("  --json     Output as JSON instead of formatted text");
        process::exit(1);
    }

    let data_dir = Path::new(&args[1]);

    let mut horizon_days = DEFAULT_HORIZON_DAYS;
    let mut json_output = false;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--horizon" => {
                if i + 1 < args.len() {
                    horizon_days = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: --horizon requires a non-negative integer");
                        process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --horizon requires a number");
                    process::exit(1);
                }
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
    }

    let mut store = ReportStore::new(DEFAULT_REPORT_TTL);
    let load_start = Instant::now();
    let bundle = match store.load(data_dir) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error loading CSV: {e}");
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();
    log::info!("loaded reports from {} in {load_ms}ms", data_dir.display());

    let counts = RowCounts {
        inventory: bundle.inventory.len(),
        orders: bundle.orders.len(),
        settlements: bundle.settlements.len(),
        traffic: bundle.traffic.len(),
        returns: bundle.returns.len(),
        reviews: bundle.reviews.len(),
    };

    let digest_start = Instant::now();
    let digest = OverviewDigest::build_with_horizon(bundle, horizon_days);
    let digest_ms = digest_start.elapsed().as_millis();

    if json_output {
        let out = DigestJson {
            generated_at: Utc::now().to_rfc3339(),
            horizon_days,
            load_ms,
            digest_ms,
            rows_loaded: counts,
            digest: &digest,
        };
        println!("{}", serde_json::to_string_pretty(&out).unwrap());
    } else {
        print_human(&digest, &counts, load_ms, digest_ms);
    }
}
