// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! MineFlux CLI: should your surplus energy mine Bitcoin or feed the
//! grid?

mod config;
mod output;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mineflux_core::{compare, project, recommend_fleet, survey};
use mineflux_ingest::IngestReport;
use mineflux_market::{MarketDataClient, RemoteCatalog, load_or_fallback};
use mineflux_types::{MarketConditions, MinerSelection, MinerSpec};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "mineflux")]
#[command(author, version, about = "Mining-vs-grid profitability analysis for surplus energy")]
#[command(
    long_about = "Analyze whether surplus energy production is worth more mined into\n\
    Bitcoin or sold to the grid.\n\
    \nExamples:\n  \
    mineflux analyze export.csv --miner bitmain-antminer-s19-pro\n  \
    mineflux analyze export.csv --power-w 3250 --hashrate-ths 110 --offline\n  \
    mineflux compare --daily-production-kwh 120 --grid-sell-price 0.08 --miner bitmain-antminer-s21\n  \
    mineflux recommend export.csv\n  \
    mineflux profile export.csv"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "mineflux.toml")]
    config: PathBuf,

    /// Skip all network calls; use configured or fallback market data
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an energy export against a miner configuration
    Analyze(AnalyzeArgs),

    /// Compare grid selling against mining from a daily average
    Compare(CompareArgs),

    /// Statistical profile of an energy export
    Profile(ProfileArgs),

    /// Recommend a miner fleet for an energy export
    Recommend(RecommendArgs),

    /// List the available miner catalog
    Catalog,
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Energy export file (.csv or .xlsx)
    input: PathBuf,

    /// Catalog miner to run, as `id` or `id:quantity` (repeatable)
    #[arg(long = "miner")]
    miners: Vec<String>,

    /// Power draw of a custom miner (W)
    #[arg(long, requires = "hashrate_ths")]
    power_w: Option<f64>,

    /// Hashrate of a custom miner (TH/s)
    #[arg(long, requires = "power_w")]
    hashrate_ths: Option<f64>,

    /// Override the total hardware cost (USD)
    #[arg(long)]
    hardware_cost: Option<f64>,
}

#[derive(Parser)]
struct CompareArgs {
    /// Average daily energy production (kWh)
    #[arg(long)]
    daily_production_kwh: f64,

    /// Feed-in tariff (USD/kWh)
    #[arg(long, default_value_t = 0.08)]
    grid_sell_price: f64,

    /// Catalog miner id to compare with
    #[arg(long)]
    miner: String,

    /// Upfront hardware cost (USD); defaults to the catalog price
    #[arg(long)]
    hardware_cost: Option<f64>,

    /// Monthly incentives added to mining revenue (USD)
    #[arg(long, default_value_t = 0.0)]
    incentives: f64,

    /// Tax rate on mining revenue (percent)
    #[arg(long, default_value_t = 0.0)]
    tax_rate: f64,

    /// Write the 24-month projection to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Parser)]
struct ProfileArgs {
    /// Energy export file (.csv or .xlsx)
    input: PathBuf,
}

#[derive(Parser)]
struct RecommendArgs {
    /// Energy export file (.csv or .xlsx)
    input: PathBuf,

    /// Power budget (W); defaults to the 95th percentile of the export
    #[arg(long)]
    power_budget_w: Option<f64>,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;
    let offline = cli.offline || config.analysis.offline;

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args, &config, offline),
        Commands::Compare(args) => run_compare(&args, &config, offline),
        Commands::Profile(args) => run_profile(&args),
        Commands::Recommend(args) => run_recommend(&args, &config, offline),
        Commands::Catalog => run_catalog(&config, offline),
    }
}

fn load_series(path: &Path) -> Result<IngestReport> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let report = match extension.as_str() {
        "csv" => mineflux_ingest::read_csv(path)?,
        "xlsx" => mineflux_ingest::read_xlsx(path)?,
        other => bail!("unsupported input format '{other}', expected .csv or .xlsx"),
    };
    info!(
        samples = report.series.len(),
        dropped = report.rows_dropped,
        "energy series loaded"
    );
    Ok(report)
}

fn load_catalog(config: &AppConfig, offline: bool) -> Vec<MinerSpec> {
    if offline {
        return load_or_fallback(&OfflineOnly);
    }
    let catalog = match &config.analysis.catalog_url {
        Some(url) => RemoteCatalog::with_url(url.clone()),
        None => RemoteCatalog::new(),
    };
    load_or_fallback(&catalog)
}

/// Catalog source that always fails, forcing the built-in models
struct OfflineOnly;

impl mineflux_market::CatalogSource for OfflineOnly {
    fn load(&self) -> Result<Vec<MinerSpec>> {
        bail!("offline mode")
    }
}

fn market_conditions(config: &AppConfig, offline: bool) -> MarketConditions {
    if offline {
        return config.offline_market_conditions();
    }
    let snapshot = MarketDataClient::new().fetch(
        config.market.pool_fee_percent,
        config.market.electricity_cost_usd_per_kwh,
    );
    let mut conditions = snapshot.conditions;
    // Pinned values win over fetched ones
    if let Some(price) = config.market.btc_price_usd {
        conditions.btc_price_usd = price;
    }
    if let Some(difficulty) = config.market.network_difficulty {
        conditions.network_difficulty = difficulty;
    }
    conditions
}

fn build_selection(args: &AnalyzeArgs, catalog: &[MinerSpec]) -> Result<MinerSelection> {
    let mut selection = MinerSelection::new();

    for entry in &args.miners {
        let (id, quantity) = match entry.split_once(':') {
            Some((id, count)) => (
                id,
                count
                    .parse::<u32>()
                    .with_context(|| format!("bad quantity in --miner {entry}"))?,
            ),
            None => (entry.as_str(), 1),
        };
        let spec = catalog
            .iter()
            .find(|s| s.id == id)
            .with_context(|| format!("miner '{id}' not found in catalog, see `mineflux catalog`"))?;
        selection.add(spec.clone(), quantity);
    }

    if let (Some(power_w), Some(hashrate_ths)) = (args.power_w, args.hashrate_ths) {
        let mut custom = MinerSpec::new("custom", "Custom miner", power_w, hashrate_ths);
        custom.custom = true;
        custom.validate()?;
        selection.add(custom, 1);
    }

    if selection.is_empty() {
        bail!("no miner specified: use --miner <id> or --power-w/--hashrate-ths");
    }
    Ok(selection)
}

fn run_analyze(args: &AnalyzeArgs, config: &AppConfig, offline: bool) -> Result<()> {
    let report = load_series(&args.input)?;
    let catalog = load_catalog(config, offline);
    let selection = build_selection(args, &catalog)?;
    let combined = selection.combined();

    let market = market_conditions(config, offline);
    let network = config.network_params();

    let utilization = mineflux_core::analyze(&report.series, &combined)?;
    let hardware_cost = args.hardware_cost.or_else(|| selection.total_hardware_cost_usd());
    let profitability = project(&utilization, &combined, &market, &network, hardware_cost)?;

    println!("{}", output::selection_table(&selection));
    println!("{}", output::utilization_table(&utilization));
    println!("{}", output::profitability_table(&profitability));
    Ok(())
}

fn run_compare(args: &CompareArgs, config: &AppConfig, offline: bool) -> Result<()> {
    let catalog = load_catalog(config, offline);
    let spec = catalog
        .iter()
        .find(|s| s.id == args.miner)
        .with_context(|| format!("miner '{}' not found in catalog", args.miner))?;

    let hardware_cost = args
        .hardware_cost
        .or(spec.hardware_cost_usd)
        .unwrap_or_else(|| {
            let estimate = spec.hashrate_ths * config.network.hardware_cost_usd_per_th;
            warn!(estimate, "miner has no catalog price, using $/TH heuristic");
            estimate
        });

    let params = mineflux_core::ComparisonParams {
        daily_production_kwh: args.daily_production_kwh,
        grid_sell_price_usd_per_kwh: args.grid_sell_price,
        hardware_cost_usd: hardware_cost,
        incentives_usd_per_month: args.incentives,
        tax_rate_percent: args.tax_rate,
    };
    let market = market_conditions(config, offline);
    let result = compare(spec, &params, &market, &config.network_params())?;

    if result.max_miners == 0 {
        warn!(
            daily_production_kwh = args.daily_production_kwh,
            "production cannot sustain a single unit of this model"
        );
    }
    println!("{}", output::comparison_table(&result));

    if let Some(path) = &args.export {
        let file = File::create(path)
            .with_context(|| format!("cannot create export file {}", path.display()))?;
        mineflux_core::write_projection_csv(file, &result.monthly)?;
        info!(path = %path.display(), "projection exported");
    }
    Ok(())
}

fn run_profile(args: &ProfileArgs) -> Result<()> {
    let report = load_series(&args.input)?;
    let profile = survey(&report.series)?;
    println!("{}", output::profile_table(&profile));
    println!("{}", output::bands_table(&profile));
    Ok(())
}

fn run_recommend(args: &RecommendArgs, config: &AppConfig, offline: bool) -> Result<()> {
    let report = load_series(&args.input)?;
    let budget = args
        .power_budget_w
        .unwrap_or_else(|| report.series.suggested_power_budget_w());
    info!(budget_w = budget, "composing fleet for power budget");

    let catalog = load_catalog(config, offline);
    let selection = recommend_fleet(&catalog, budget)?;
    println!("{}", output::selection_table(&selection));

    // Show how the recommended fleet would actually perform
    let combined = selection.combined();
    let utilization = mineflux_core::analyze(&report.series, &combined)?;
    let profitability = project(
        &utilization,
        &combined,
        &market_conditions(config, offline),
        &config.network_params(),
        selection.total_hardware_cost_usd(),
    )?;
    println!("{}", output::utilization_table(&utilization));
    println!("{}", output::profitability_table(&profitability));
    Ok(())
}

fn run_catalog(config: &AppConfig, offline: bool) -> Result<()> {
    let catalog = load_catalog(config, offline);
    println!("{}", output::catalog_table(&catalog));
    Ok(())
}
