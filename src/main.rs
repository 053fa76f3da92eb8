use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use poke_snake::game::{GameConfig, GameEngine};
use poke_snake::logging::init_tracing;
use poke_snake::modes::PlayMode;
use poke_snake::starter::Starter;
use poke_snake::storage::{JsonFileStore, MemoryStore, ScoreStore};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "poke_snake")]
#[command(version, about = "Poké-Snake minigame in the terminal")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// JSON file with a game configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Tick interval at the start of a run, in milliseconds
    #[arg(long)]
    initial_tick_ms: Option<u64>,

    /// Fastest tick interval, in milliseconds
    #[arg(long)]
    min_tick_ms: Option<u64>,

    /// Interval reduction per food eaten, in milliseconds
    #[arg(long)]
    tick_step_ms: Option<u64>,

    /// Pokémon preselected on the menu
    #[arg(long, value_enum, default_value_t = Starter::Caterpie)]
    starter: Starter,

    /// File holding the best score
    #[arg(long, default_value = "poke_snake_scores.json")]
    store: PathBuf,

    /// Keep the best score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Log destination
    #[arg(long, default_value = "poke_snake.log")]
    log_file: PathBuf,

    /// Disable logging entirely
    #[arg(long)]
    no_log: bool,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play with keyboard controls
    Play,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(ms) = self.initial_tick_ms {
            config.initial_tick_ms = ms;
        }
        if let Some(ms) = self.min_tick_ms {
            config.min_tick_ms = ms;
        }
        if let Some(ms) = self.tick_step_ms {
            config.tick_step_ms = ms;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }

    fn score_store(&self) -> Box<dyn ScoreStore> {
        if self.no_persist {
            Box::new(MemoryStore::new())
        } else {
            Box::new(JsonFileStore::new(&self.store))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = (!cli.no_log).then_some(cli.log_file.as_path());
    init_tracing(log_file)?;

    let config = cli.game_config()?;
    info!(
        width = config.grid_width,
        height = config.grid_height,
        initial_tick_ms = config.initial_tick_ms,
        persist = !cli.no_persist,
        "starting Poké-Snake"
    );

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed)?,
        None => GameEngine::new(config)?,
    };

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Play => {
            let mut play_mode = PlayMode::new(engine, cli.score_store(), cli.starter);
            play_mode.run().await?;
        }
    }

    Ok(())
}
