//! Generate buy/sell/hold signals for a CSV price history
//!
//! Usage: cargo run --bin signal -- --input prices.csv
//!
//! The CSV needs a header with `date` (YYYY-MM-DD) and `close` columns.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Deserialize;
use stock_signal::{generate_signal, Bar, PriceSeries, Signal, SignalConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Buy/sell/hold signals from a daily price CSV")]
struct Args {
    /// CSV file with date,close columns
    #[arg(short, long)]
    input: PathBuf,

    /// Minimum labeled rows before the classifier is trained
    #[arg(long, default_value = "100")]
    min_training_rows: usize,

    /// Number of trees in the forest
    #[arg(long, default_value = "100")]
    trees: usize,

    /// Random seed for the forest
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Print every bar's signal, not just the latest
    #[arg(long)]
    full: bool,

    /// Emit the scored series as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    close: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stock_signal=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut reader = csv::Reader::from_path(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;

    let mut bars = Vec::new();
    for record in reader.deserialize() {
        let row: CsvRow = record.context("failed to parse CSV row")?;
        bars.push(Bar::new(row.date, row.close));
    }
    info!(bars = bars.len(), "loaded price history");

    let series = PriceSeries::new(bars).context("invalid price series")?;

    let config = SignalConfig {
        min_training_rows: args.min_training_rows,
        forest: stock_signal::models::ForestConfig {
            n_trees: args.trees,
            seed: args.seed,
            ..Default::default()
        },
        ..Default::default()
    };

    let scored = generate_signal(&series, &config).context("signal generation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(scored.bars())?);
        return Ok(());
    }

    let latest = scored.latest();
    println!(
        "{}  {}  (score {:.2}, technical {:.2}, model {:.2})",
        latest.date, latest.signal, latest.signal_score, latest.technical_score, latest.pred_prob
    );
    println!(
        "{} bars scored: {} BUY, {} SELL, {} HOLD",
        scored.len(),
        scored.count(Signal::Buy),
        scored.count(Signal::Sell),
        scored.count(Signal::Hold),
    );

    if args.full {
        for bar in scored.bars() {
            println!(
                "{}  {:<4}  score={:.3}  close={:.2}",
                bar.date, bar.signal.to_string(), bar.signal_score, bar.close
            );
        }
    }

    Ok(())
}
