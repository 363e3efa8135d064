//! Check command - categorize orders against the catalog

use std::path::PathBuf;

use anyhow::Result;
use ornament_config::{Config, OrderStatus};
use ornament_engine::{MatchStatus, OrderCategorizer, OrderItemReport, RunReport};
use ornament_sources::{JsonOrderSource, OrderSource, SeenOrders, StatusFilter, TimeWindow};
use time::OffsetDateTime;
use tracing::warn;

use super::{build_catalog, build_generator, build_matcher};

/// Command-line inputs for one `check` run.
pub struct CheckArgs {
    pub orders: PathBuf,
    pub days: Option<i64>,
    pub all_statuses: bool,
    pub year: Option<i32>,
    pub state: Option<PathBuf>,
}

pub fn handle(config: &Config, args: &CheckArgs, format: &str) -> Result<()> {
    let status = if args.all_statuses || config.orders.status == OrderStatus::All {
        StatusFilter::All
    } else {
        StatusFilter::Open
    };
    let now = OffsetDateTime::now_utc();
    let window = TimeWindow::last_days(args.days.unwrap_or(config.orders.days_back), now);

    let orders = JsonOrderSource::new(&args.orders).fetch_orders(&window, status)?;
    let catalog = build_catalog(config);
    let generator = build_generator(config, args.year);
    let matcher = build_matcher(config);

    let state_path = args.state.as_ref().or(config.orders.state_file.as_ref());
    let seen = match state_path {
        Some(path) => SeenOrders::load(path).unwrap_or_else(|e| {
            warn!("Could not load previous orders: {}", e);
            SeenOrders::default()
        }),
        None => SeenOrders::default(),
    };

    let report = OrderCategorizer::new(&generator, &matcher, &catalog)
        .with_seen_orders(&seen)
        .categorize(&orders);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => print_text(&report),
    }

    if let Some(path) = state_path {
        SeenOrders::save(path, orders.iter().map(|o| o.receipt_id.clone()), now)?;
    }

    Ok(())
}

fn print_text(report: &RunReport) {
    println!(
        "{} orders, {} items ({} new), {} unrecognized\n",
        report.orders,
        report.items.len(),
        report.new_items().count(),
        report.unrecognized.len()
    );

    for bucket in &report.counts {
        println!(
            "  {:<3} {:<13} {}",
            bucket.family.to_string(),
            bucket.status.label(),
            bucket.count
        );
    }

    for status in [MatchStatus::NeedsMade, MatchStatus::NeedsUpdate, MatchStatus::Exists] {
        let items: Vec<&OrderItemReport> = report.with_status(status).collect();
        if items.is_empty() {
            continue;
        }

        println!("\n{} ({})", status.label(), items.len());
        for entry in items {
            let preview = if entry.preview { " [preview]" } else { "" };
            print!(
                "  #{} {} [{}]: {}{}",
                entry.receipt_id,
                entry.buyer_name,
                entry.order_status.label(),
                entry.item.design_identifier,
                preview
            );
            match (&entry.item.matched_file, &entry.item.diff) {
                (Some(file), Some(diff)) => println!(" <- {} ({})", file.stem(), diff),
                (Some(file), None) => println!(" -> {}", file.path.display()),
                _ => println!(),
            }
        }
    }

    if !report.unrecognized.is_empty() {
        println!("\nUnrecognized ({})", report.unrecognized.len());
        for item in &report.unrecognized {
            println!(
                "  #{} {}: {} x{}",
                item.receipt_id, item.buyer_name, item.sku, item.quantity
            );
        }
    }
}
