use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use levelsearch::config::AppConfig;
use levelsearch::data::{load_checkpoint, FileCheckpointStore};
use levelsearch::engines::evaluation::{FitnessEvaluator, PopulationEvaluator};
use levelsearch::engines::generation::{EvolutionEngine, LogProgressCallback};
use levelsearch::environment::CorridorFactory;
use levelsearch::playback::Playback;
use log::{error, info};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "levelsearch", about = "Evolve action sequences that clear a side-scrolling level")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the genetic search and play the best genome found.
    Evolve {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        generations: Option<usize>,
        #[arg(long)]
        population: Option<usize>,
        #[arg(long)]
        no_playback: bool,
    },
    /// Play a stored checkpoint.
    Play {
        #[arg(long)]
        agent: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write the default configuration as TOML.
    InitConfig { path: PathBuf },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Evolve {
            config,
            seed,
            generations,
            population,
            no_playback,
        } => {
            let mut config = AppConfig::load(config.as_deref())?;
            if let Some(seed) = seed {
                config.evolution.seed = Some(seed);
            }
            if let Some(generations) = generations {
                config.evolution.num_generations = generations;
            }
            if let Some(population) = population {
                config.evolution.population_size = population;
            }
            config.validate()?;
            evolve(&config, !no_playback)
        }
        Command::Play { agent, config } => {
            let config = AppConfig::load(config.as_deref())?;
            let path = agent.unwrap_or_else(|| config.checkpoint.best_path());
            play(&config, path)
        }
        Command::InitConfig { path } => {
            AppConfig::default().save_to_file(&path)?;
            info!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

fn corridor(config: &AppConfig) -> Result<CorridorFactory> {
    Ok(CorridorFactory::new(
        config.environment.level.clone(),
        config.environment.action_set,
    )?)
}

fn evolve(config: &AppConfig, playback: bool) -> Result<()> {
    info!("Configuration:");
    info!("  Population size: {}", config.evolution.population_size);
    info!("  Genome length: {}", config.evolution.genome_length);
    info!("  Generations: {}", config.evolution.num_generations);
    info!("  Actions: {:?} ({})", config.environment.action_set, config.environment.action_count());

    let evaluator = FitnessEvaluator::new(
        corridor(config)?,
        config.evaluation.clone(),
        config.environment.action_count(),
    )?
    .with_genome_length(config.evolution.genome_length);
    let evaluator = PopulationEvaluator::new(evaluator, config.evolution.workers)?;
    let store = FileCheckpointStore::new(&config.checkpoint);

    let mut engine = EvolutionEngine::new(config.evolution.clone(), evaluator, store)?;
    let outcome = engine
        .run(LogProgressCallback::new(config.evolution.num_generations))
        .context("evolution aborted")?;

    info!("Best genome fitness: {:.2}", outcome.best_fitness);
    if outcome.degraded_checkpoints > 0 {
        error!(
            "{} checkpoint(s) could not be written during the run",
            outcome.degraded_checkpoints
        );
    }

    if playback {
        Playback::new(corridor(config)?, config.evaluation.frame_skip, config.playback.clone())?
            .play(&outcome.best_genome)?;
    }
    Ok(())
}

fn play(config: &AppConfig, path: PathBuf) -> Result<()> {
    let checkpoint = match load_checkpoint(&path) {
        Ok(checkpoint) => checkpoint,
        Err(e) => {
            error!("Could not load agent '{}': {}", path.display(), e);
            return Ok(());
        }
    };
    info!("Loaded agent '{}' ({} actions)", path.display(), checkpoint.genome.len());

    Playback::new(corridor(config)?, config.evaluation.frame_skip, config.playback.clone())?
        .play(&checkpoint.genome)?;
    Ok(())
}
