use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::GameConfig;
use grid_snake::modes::HumanMode;
use grid_snake::store::{FileScoreStore, MemoryScoreStore, ScoreStore};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a square grid, in the terminal")]
struct Cli {
    /// JSON game configuration; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Width and height of the grid
    #[arg(long)]
    field_size: Option<usize>,

    /// Tick interval at score 0 (ms)
    #[arg(long)]
    base_interval: Option<u64>,

    /// Shortest tick interval (ms)
    #[arg(long)]
    min_interval: Option<u64>,

    /// Interval reduction per point (ms)
    #[arg(long)]
    speed_step: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Wait for Space/Enter before the first tick
    #[arg(long)]
    paused: bool,

    /// Where the best score is kept
    #[arg(long, default_value = "snake_best.json")]
    best_score_file: PathBuf,

    /// Keep the best score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Write logs to this file (level from RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(field_size) = self.field_size {
            config.field_size = field_size;
        }
        if let Some(ms) = self.base_interval {
            config.base_interval_ms = ms;
        }
        if let Some(ms) = self.min_interval {
            config.min_interval_ms = ms;
        }
        if let Some(ms) = self.speed_step {
            config.speed_step_ms = ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.paused {
            config.autostart = false;
        }

        Ok(config)
    }

    fn score_store(&self) -> Box<dyn ScoreStore> {
        if self.no_persist {
            Box::new(MemoryScoreStore::new())
        } else {
            Box::new(FileScoreStore::new(&self.best_score_file))
        }
    }
}

/// The terminal belongs to the UI, so logs only go to a file when asked for
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    log::info!("Starting with {:?}", config);

    let mut human_mode = HumanMode::new(config, cli.score_store())?;
    human_mode.run().await?;

    Ok(())
}
