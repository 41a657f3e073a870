//! Headless host for the Lifegrid simulation models.

mod host;
mod render;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lifegrid_core::{HostConfig, ModelKind, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use lifegrid_world::build_model;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    GameOfLife,
    BriansBrain,
    Schelling,
    Terrain,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::GameOfLife => ModelKind::GameOfLife,
            ModelArg::BriansBrain => ModelKind::BriansBrain,
            ModelArg::Schelling => ModelKind::Schelling,
            ModelArg::Terrain => ModelKind::Terrain,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lifegrid-host", version, about = "Run a Lifegrid model and print its frames")]
struct Args {
    /// JSON configuration file; command line flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model to run
    #[arg(short, long, value_enum)]
    model: Option<ModelArg>,

    /// Number of ticks
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Seed for every model
    #[arg(short, long)]
    seed: Option<u64>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<i32>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<i32>,

    /// Print a frame every N ticks (0 prints nothing)
    #[arg(short, long)]
    render_every: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn into_config(self) -> Result<HostConfig> {
        let mut config = match &self.config {
            Some(path) => HostConfig::from_json_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => HostConfig::default(),
        };

        if let Some(model) = self.model {
            config.model = model.into();
        }
        if let Some(ticks) = self.ticks {
            config.ticks = ticks;
        }
        if let Some(render_every) = self.render_every {
            config.render_every = render_every;
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.width.is_some() || self.height.is_some() {
            config = config.with_dimensions(
                self.width.unwrap_or(DEFAULT_WIDTH),
                self.height.unwrap_or(DEFAULT_HEIGHT),
            );
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.json_logs)?;

    let config = args.into_config()?;
    info!(model = %config.model, ticks = config.ticks, "Starting Lifegrid host");

    let mut model = build_model(&config).context("invalid model configuration")?;
    let stdout = std::io::stdout();
    let summary = host::run(&mut *model, &config, &mut stdout.lock())?;

    info!("Final status: {}", summary.status);
    Ok(())
}
