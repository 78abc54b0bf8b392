use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use sales_analytics::engine::cache::DatasetCache;
use sales_analytics::engine::query::SalesQueryEngine;
use sales_analytics::engine::store::sqlite::import_csv;
use sales_analytics::engine::store::{Backend, MemoryStore, RecordStore, SqliteStore};
use sales_analytics::engine::types::{CategoryFilter, QueryPredicate, SummaryStats};
use sales_analytics::logging;
use sales_analytics::shared::config::{BackendKind, CONFIG, Settings};
use sales_analytics::shared::money::format_currency;
use sales_analytics::shared::time::DateParser;

#[derive(Parser)]
#[command(name = "sales_report")]
#[command(about = "Query the sales fact table", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the first and last order date
    Range,
    /// List canonical category labels
    Categories,
    /// Run a filtered query; defaults to the full range and every category
    Query {
        #[arg(long, value_parser = DateParser::parse_bound)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = DateParser::parse_bound)]
        end: Option<NaiveDate>,
        /// Category label, or "All Categories"
        #[arg(long)]
        category: Option<String>,
        /// Match --category literally, even a category named "All Categories"
        #[arg(long, requires = "category")]
        exact: bool,
        #[arg(long, value_enum, default_value_t = View::All)]
        view: View,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Load a CSV file into a SQLite fact table
    Import {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        sqlite: Option<PathBuf>,
        #[arg(long)]
        table: Option<String>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    All,
    Summary,
    TimeSeries,
    Categories,
    Products,
    Rows,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn open_backend(settings: &Settings) -> anyhow::Result<Backend> {
    let store = &settings.store;
    let backend = match store.backend {
        BackendKind::Memory => {
            let cache = Arc::new(DatasetCache::new(settings.cache.dataset_entries));
            Backend::Memory(MemoryStore::open(&store.csv_path, cache)?)
        }
        BackendKind::Sqlite => {
            Backend::Sqlite(SqliteStore::open(&store.sqlite_path, &store.table, &settings.pool)?)
        }
    };
    Ok(backend)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary_text(predicate: &QueryPredicate, summary: &SummaryStats) {
    println!("Selection:        {predicate}");
    println!("Total revenue:    {}", summary.total_revenue.to_currency_string());
    println!("Total orders:     {}", summary.total_orders);
    println!(
        "Avg order value:  {}",
        format_currency(summary.avg_order_value)
    );
    println!("Top category:     {}", summary.top_category);
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings: &Settings = &CONFIG;
    logging::init(&settings.logging)?;

    if let Command::Import { csv, sqlite, table } = &args.command {
        let csv = csv.as_ref().unwrap_or(&settings.store.csv_path);
        let sqlite = sqlite.as_ref().unwrap_or(&settings.store.sqlite_path);
        let table = table.as_deref().unwrap_or(&settings.store.table);
        let rows = import_csv(csv, sqlite, table)
            .with_context(|| format!("importing {}", csv.display()))?;
        info!(rows, table, "Import finished");
        return Ok(());
    }

    let engine = SalesQueryEngine::new(open_backend(settings)?);
    match args.command {
        Command::Range => print_json(&engine.get_date_range()?)?,
        Command::Categories => print_json(&engine.get_categories()?)?,
        Command::Query {
            start,
            end,
            category,
            exact,
            view,
            format,
        } => {
            let Some(default) = engine.default_predicate()? else {
                bail!("fact table in {} is empty", engine.store().name());
            };
            let predicate = QueryPredicate::new(
                start.unwrap_or(default.start_date),
                end.unwrap_or(default.end_date),
                match category.as_deref() {
                    Some(label) if exact => CategoryFilter::exact(label),
                    selection => CategoryFilter::from(selection),
                },
            );
            if format == Format::Text {
                print_summary_text(&predicate, &engine.summary(&predicate)?);
                return Ok(());
            }
            match view {
                View::All => print_json(&engine.dashboard(&predicate)?)?,
                View::Summary => print_json(&engine.summary(&predicate)?)?,
                View::TimeSeries => print_json(&engine.time_series(&predicate)?)?,
                View::Categories => print_json(&engine.category_breakdown(&predicate)?)?,
                View::Products => print_json(&engine.top_products(&predicate)?)?,
                View::Rows => print_json(&engine.raw_rows(&predicate)?)?,
            }
        }
        Command::Import { .. } => {}
    }
    Ok(())
}
