mod logging;
mod render;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use configuration::Config;
use dashboard::{Dashboard, DashboardView, ExportTable, QueryOverrides};
use dataset::{load_dataset, Dataset};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// The main entry point for the retail dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    let _log_guard = logging::init(&config.logging)?;

    match cli.command {
        Commands::Serve(args) => handle_serve(args, config).await,
        Commands::Report(args) => handle_report(args, &config),
        Commands::Export(args) => handle_export(args, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Inventory, sales and profitability analytics for a retail business.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard HTTP API.
    Serve(ServeArgs),
    /// Compute the dashboard once and print it.
    Report(ReportArgs),
    /// Write the dashboard tables as CSV files.
    Export(ExportArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Listen address, overriding `server.addr`.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

/// The input tables and filter selections shared by `report` and `export`.
#[derive(Args)]
struct InputArgs {
    /// Products CSV. Defaults to `datasets.products` from the configuration.
    #[arg(long)]
    products: Option<PathBuf>,
    #[arg(long)]
    sales: Option<PathBuf>,
    #[arg(long)]
    purchases: Option<PathBuf>,

    /// First sale date included (format: YYYY-MM-DD).
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last sale date included (format: YYYY-MM-DD).
    #[arg(long)]
    end: Option<NaiveDate>,

    /// A sale location to include. Repeat for several.
    #[arg(long = "location")]
    locations: Vec<String>,
    /// A product category to include. Repeat for several.
    #[arg(long = "category")]
    categories: Vec<String>,
}

impl InputArgs {
    fn overrides(&self) -> QueryOverrides {
        let non_empty = |values: &Vec<String>| (!values.is_empty()).then(|| values.clone());
        QueryOverrides {
            start: self.start,
            end: self.end,
            locations: non_empty(&self.locations),
            categories: non_empty(&self.categories),
        }
    }

    fn load(&self, config: &Config) -> anyhow::Result<Dataset> {
        let paths = &config.datasets;
        let resolve = |arg: &Option<PathBuf>, configured: &Option<PathBuf>, table: &str| {
            arg.clone()
                .or_else(|| configured.clone())
                .with_context(|| format!("no {table} file given; pass --{table} or set datasets.{table}"))
        };
        let products = resolve(&self.products, &paths.products, "products")?;
        let sales = resolve(&self.sales, &paths.sales, "sales")?;
        let purchases = resolve(&self.purchases, &paths.purchases, "purchases")?;
        Ok(load_dataset(&products, &sales, &purchases)?)
    }

    fn compute(&self, config: &Config) -> anyhow::Result<DashboardView> {
        let dataset = self.load(config)?;
        let dashboard = Dashboard::from_config(config)?;
        dashboard.warn_unknown_locations(&dataset);
        let query = dashboard.resolve_query(self.overrides())?;
        Ok(dashboard.build_view(&dataset, &query)?)
    }
}

#[derive(Args)]
struct ReportArgs {
    #[command(flatten)]
    inputs: InputArgs,

    /// Print the full dashboard as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    inputs: InputArgs,

    /// Directory the CSV files are written to. Created if missing.
    #[arg(long)]
    out_dir: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }
    web_server::run_server(config).await
}

fn handle_report(args: ReportArgs, config: &Config) -> anyhow::Result<()> {
    let view = args.inputs.compute(config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render_view(&view));
    }
    Ok(())
}

fn handle_export(args: ExportArgs, config: &Config) -> anyhow::Result<()> {
    let view = args.inputs.compute(config)?;
    write_exports(&view, &args.out_dir)
}

fn write_exports(view: &DashboardView, out_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    for table in ExportTable::ALL {
        view.write_export(table, out_dir)?;
    }
    Ok(())
}
