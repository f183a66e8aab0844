mod app;
mod daemon;
mod output;
mod run;

use std::path::PathBuf;

use clap::Parser;
use locsync_core::{CliOverrides, LocationType, OutputKind};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::output::Output;

#[derive(Debug, Parser)]
#[command(name = "locsync")]
#[command(about = "Sync Tesla charger locations into TeslaMate geofences")]
struct Cli {
    /// Keep running and repeat every interval.
    #[arg(short = 'd', long)]
    daemon: bool,

    /// Minutes between daemon runs.
    #[arg(short = 'i', long = "interval")]
    interval_minutes: Option<u64>,

    /// Geofence radius in meters for newly inserted locations.
    #[arg(short = 'r', long)]
    radius: Option<i32>,

    #[arg(short = 'l', long = "log-level")]
    log_level: Option<String>,

    /// Currency prices are converted into.
    #[arg(short = 'x', long)]
    currency: Option<String>,

    /// `Console` or `TeslamateDatabase`.
    #[arg(short = 'o', long)]
    output: Option<OutputKind>,

    /// Location type to include (repeatable).
    #[arg(short = 't', long = "type")]
    location_types: Vec<String>,

    /// Country code to include (repeatable).
    #[arg(short = 'c', long = "country")]
    countries: Vec<String>,

    /// Directory holding `config.json`, `prices.json` and `exchange_rates.json`.
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config_dir: self.config_dir.clone(),
            daemon: self.daemon.then_some(true),
            interval_minutes: self.interval_minutes,
            radius: self.radius,
            log_level: self.log_level.clone(),
            currency: self.currency.clone(),
            output: self.output,
            countries: self.countries.clone(),
            location_types: self
                .location_types
                .iter()
                .map(|t| LocationType::from(t.as_str()))
                .collect(),
        }
    }
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = locsync_core::load_app_config(&cli.overrides())?;
    init_tracing(&config.log_level)?;

    tracing::info!("starting TeslaMate geofence location sync");
    let app = App::init(config)?;

    let mut output = Output::from_config(&app.config);
    run::run_once(&app, &mut output).await?;

    if app.config.runs_as_daemon() {
        let interval = daemon::interval_from_minutes(app.config.interval_minutes);
        daemon::run(&app, interval).await?;
    }

    Ok(())
}
