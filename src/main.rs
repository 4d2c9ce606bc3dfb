use anyhow::Result;
use clap::{Parser, ValueEnum};
use skycast::config::SkycastConfig;
use skycast::{WeatherApp, presenter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skycast", version, about = "Weather dashboard for your terminal")]
struct Cli {
    /// City name or 5-digit zip code; omit to use your network location
    query: Option<String>,

    /// Temperature display units
    #[arg(short, long, value_enum, default_value = "f")]
    units: Units,

    /// Keep refreshing on the configured interval
    #[arg(short, long)]
    watch: bool,

    /// Path to a config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Units {
    /// Fahrenheit
    F,
    /// Celsius
    C,
}

fn init_tracing(config: &SkycastConfig, verbose: bool) {
    let default_filter = if verbose {
        "skycast=debug".to_string()
    } else {
        format!("skycast={}", config.logging.level)
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SkycastConfig::load_from_path(cli.config.clone())?;
    init_tracing(&config, cli.verbose);

    let mut app = WeatherApp::new(config)?;
    if matches!(cli.units, Units::C) {
        app.toggle_units();
    }

    let result = match cli.query.as_deref() {
        Some(query) => app.search(query).await,
        None => app.locate().await,
    };

    if let Err(e) = result {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    if let Some(state) = app.state() {
        presenter::print_dashboard(state, app.display_unit());
    }

    if cli.watch {
        app.watch(|state, unit| presenter::print_dashboard(state, unit))
            .await?;
    }

    Ok(())
}
