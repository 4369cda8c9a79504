use clap::{Parser, Subcommand};
use hud_core::*;
use std::io;
use std::path::{Path, PathBuf};

mod device;
mod hub;
mod routes;
mod simulate;

#[derive(Parser)]
#[command(name = "gymhud")]
#[command(about = "Voice-driven gym and macro head-up display server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HUD server (default)
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:8080
        #[arg(long)]
        bind: Option<String>,
    },

    /// List workout days and their exercises
    Catalog,

    /// Show the persisted macro snapshot
    Macros,

    /// Apply a metrics payload file to the persisted macro snapshot
    Ingest {
        /// JSON file shaped like the /metrics-update request body
        file: PathBuf,
    },

    /// Replay speech events from stdin and print each display update
    Simulate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    hud_core::logging::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    match cli.command {
        Some(Commands::Serve { bind }) => cmd_serve(config, bind).await,
        Some(Commands::Catalog) => cmd_catalog(catalog),
        Some(Commands::Macros) => cmd_macros(&config.data.macro_cache_path()),
        Some(Commands::Ingest { file }) => cmd_ingest(&config.data.macro_cache_path(), &file),
        Some(Commands::Simulate) => cmd_simulate(&config, catalog),
        None => cmd_serve(config, None).await,
    }
}

async fn cmd_serve(config: Config, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| config.server.bind_address.clone());

    let store = MacroStore::load(config.data.macro_cache_path());
    let hud = Hud::new(get_default_catalog(), store, config.timer.rest_seconds);
    let hub = hub::Hub::spawn(hud);

    let app = routes::router(routes::AppState {
        hub,
        package_name: config.device.package_name.clone(),
    });

    let listener = tokio::net::TcpListener::bind(bind.as_str()).await?;
    tracing::info!(
        package = %config.device.package_name,
        "HUD server listening on {}",
        bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HUD server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

fn cmd_catalog(catalog: &Catalog) -> Result<()> {
    for day in &catalog.days {
        println!("{} (say \"{}\")", day.label, day.keyword);
        for ex in &day.exercises {
            println!(
                "  {} - {} sets x {} @ {} lbs",
                ex.name, ex.target_sets, ex.rep_range, ex.weight
            );
        }
    }
    Ok(())
}

fn print_snapshot(snapshot: &MacroSnapshot) {
    println!("Calories: {}", snapshot.calories);
    println!("Protein:  {}g", snapshot.protein);
    println!("Carbs:    {}g", snapshot.carbs);
    println!("Fat:      {}g", snapshot.fat);
    if let Some(updated_at) = snapshot.updated_at {
        println!("Updated:  {}", updated_at.to_rfc3339());
    }
}

fn cmd_macros(cache_path: &Path) -> Result<()> {
    let snapshot = MacroSnapshot::load(cache_path)?;
    print_snapshot(&snapshot);
    Ok(())
}

fn cmd_ingest(cache_path: &Path, file: &Path) -> Result<()> {
    let body = std::fs::read(file)?;
    let metrics = parse_metrics(&body);

    let mut store = MacroStore::load(cache_path);
    let outcome = store.apply_metrics(&metrics);

    println!(
        "✓ Applied {} of {} metric readings",
        outcome.applied,
        metrics.len()
    );
    println!("  Cache: {}", store.path().display());
    print_snapshot(&outcome.snapshot);
    Ok(())
}

fn cmd_simulate(config: &Config, catalog: &'static Catalog) -> Result<()> {
    let store = MacroStore::load(config.data.macro_cache_path());
    let mut hud = Hud::new(catalog, store, config.timer.rest_seconds);

    let stdin = io::stdin();
    simulate::run(&mut hud, stdin.lock(), io::stdout().lock())
}
