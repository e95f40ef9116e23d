mod common;

use common::{CollectingCallback, RecordingStore, ScriptedFactory};
use levelsearch::config::{CorridorLevel, EvaluationConfig, EvolutionConfig, CheckpointConfig};
use levelsearch::data::{load_checkpoint, CheckpointLabel, CheckpointStore, FileCheckpointStore};
use levelsearch::engines::evaluation::{FitnessEvaluator, PopulationEvaluator};
use levelsearch::engines::generation::{
    ChannelProgressCallback, EvolutionEngine, LogProgressCallback, ProgressMessage,
};
use levelsearch::environment::{ActionSet, CorridorFactory};
use levelsearch::LevelSearchError;
use std::sync::mpsc::channel;

fn one_step_per_action() -> EvaluationConfig {
    EvaluationConfig {
        frame_skip: 1,
        ..Default::default()
    }
}

fn small_config(generations: usize) -> EvolutionConfig {
    EvolutionConfig {
        population_size: 4,
        genome_length: 5,
        num_generations: generations,
        mutation_rate: 0.2,
        elite_size: 1,
        tournament_size: 3,
        checkpoint_interval: 10,
        seed: Some(42),
        workers: Some(2),
    }
}

fn engine_with<S: CheckpointStore>(
    factory: ScriptedFactory,
    config: EvolutionConfig,
    action_count: u32,
    store: S,
) -> EvolutionEngine<ScriptedFactory, S> {
    let evaluator = FitnessEvaluator::new(factory, one_step_per_action(), action_count)
        .unwrap()
        .with_genome_length(config.genome_length);
    let evaluator = PopulationEvaluator::new(evaluator, config.workers).unwrap();
    EvolutionEngine::new(config, evaluator, store).unwrap()
}

#[test]
fn constant_reward_stub_scores_every_genome_identically() {
    let factory = ScriptedFactory {
        done_at: Some(5),
        ..Default::default()
    };
    let mut engine = engine_with(factory, small_config(1), 2, RecordingStore::default());
    let mut callback = CollectingCallback::default();

    let mut state = engine.initialize();
    let summary = engine.run_generation(&mut state, &mut callback).unwrap();

    // Four steps of +1 reward and -1 time pressure, then +1 on the `done` step.
    assert_eq!(summary.fitnesses, vec![1.0; 4]);
    assert_eq!(state.best_fitness, 1.0);
    assert_eq!(state.best_genome.as_ref(), Some(&summary.population[0]));
}

#[test]
fn best_ever_genome_is_the_highest_scored() {
    let factory = ScriptedFactory {
        done_at: Some(5),
        reward_per_action: true,
        ..Default::default()
    };
    let mut engine = engine_with(factory, small_config(1), 2, RecordingStore::default());
    let mut callback = CollectingCallback::default();

    let mut state = engine.initialize();
    let summary = engine.run_generation(&mut state, &mut callback).unwrap();

    for (genome, fitness) in summary.population.iter().zip(&summary.fitnesses) {
        let expected = genome.iter().map(|&a| f64::from(a)).sum::<f64>() - 4.0;
        assert_eq!(*fitness, expected);
    }
    let top = summary
        .fitnesses
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(state.best_fitness, top);
    assert_eq!(state.best_genome.as_ref(), Some(summary.best_genome()));
}

#[test]
fn life_loss_stops_every_evaluation_early() {
    let factory = ScriptedFactory {
        life_lost_at: Some(2),
        ..Default::default()
    };
    let mut engine = engine_with(factory.clone(), small_config(1), 2, RecordingStore::default());
    let mut callback = CollectingCallback::default();

    let mut state = engine.initialize();
    let summary = engine.run_generation(&mut state, &mut callback).unwrap();

    // Only two of the five actions ever reach the oracle.
    assert_eq!(factory.total_steps(), 2 * 4);
    assert_eq!(factory.total_instances(), 4);
    // +1 -1 on the first step, +1 -1000 on the second.
    assert_eq!(summary.fitnesses, vec![-999.0; 4]);
}

#[test]
fn elites_survive_unchanged() {
    let factory = ScriptedFactory {
        reward_per_action: true,
        advance_per_action: 3,
        ..Default::default()
    };
    let config = EvolutionConfig {
        population_size: 10,
        genome_length: 12,
        elite_size: 3,
        mutation_rate: 1.0,
        num_generations: 5,
        ..small_config(5)
    };
    let mut engine = engine_with(factory, config, 4, RecordingStore::default());
    let mut callback = CollectingCallback::default();
    let mut state = engine.initialize();

    for _ in 0..4 {
        let summary = engine.run_generation(&mut state, &mut callback).unwrap();
        assert_eq!(state.population.len(), 10);
        for (slot, &elite) in summary.elites.iter().enumerate() {
            assert_eq!(state.population[slot], summary.population[elite]);
        }
        let mut ranked = summary.fitnesses.clone();
        ranked.sort_by(|a, b| b.partial_cmp(a).unwrap());
        let elite_fitness: Vec<f64> = summary.elites.iter().map(|&i| summary.fitnesses[i]).collect();
        assert_eq!(elite_fitness, ranked[..3].to_vec());
    }
}

#[test]
fn population_invariants_hold_every_generation() {
    let factory = ScriptedFactory {
        reward_per_action: true,
        advance_per_action: 2,
        ..Default::default()
    };
    let config = EvolutionConfig {
        population_size: 9,
        genome_length: 7,
        elite_size: 2,
        ..small_config(6)
    };
    let mut engine = engine_with(factory, config, 3, RecordingStore::default());
    let mut callback = CollectingCallback::default();
    let mut state = engine.initialize();

    while state.generation < 6 {
        engine.run_generation(&mut state, &mut callback).unwrap();
        assert_eq!(state.population.len(), 9);
        for genome in &state.population {
            assert_eq!(genome.len(), 7);
            assert!(genome.iter().all(|&a| a < 3));
        }
    }
    assert_eq!(callback.started, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn last_generation_keeps_its_evaluated_population() {
    let factory = ScriptedFactory {
        reward_per_action: true,
        ..Default::default()
    };
    let mut engine = engine_with(factory, small_config(2), 3, RecordingStore::default());
    let mut callback = CollectingCallback::default();
    let mut state = engine.initialize();

    engine.run_generation(&mut state, &mut callback).unwrap();
    let last = engine.run_generation(&mut state, &mut callback).unwrap();
    assert_eq!(state.generation, 2);
    assert_eq!(state.population, last.population);
}

#[test]
fn best_ever_fitness_never_decreases() {
    let factory = ScriptedFactory {
        reward_per_action: true,
        advance_per_action: 5,
        ..Default::default()
    };
    let config = EvolutionConfig {
        population_size: 8,
        genome_length: 20,
        mutation_rate: 0.3,
        ..small_config(15)
    };
    let mut engine = engine_with(factory, config, 5, RecordingStore::default());
    let (tx, rx) = channel();

    let outcome = engine.run(ChannelProgressCallback::new(tx)).unwrap();

    let best_ever: Vec<f64> = rx
        .try_iter()
        .filter_map(|message| match message {
            ProgressMessage::GenerationComplete { best_ever_fitness, .. } => Some(best_ever_fitness),
            _ => None,
        })
        .collect();
    assert_eq!(best_ever.len(), 15);
    assert!(best_ever.windows(2).all(|pair| pair[1] >= pair[0]));
    assert_eq!(*best_ever.last().unwrap(), outcome.best_fitness);
    let max_generation_best = outcome
        .best_per_generation
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(outcome.best_fitness, max_generation_best);
}

#[test]
fn checkpoints_follow_the_interval_schedule() {
    let factory = ScriptedFactory {
        reward_per_action: true,
        ..Default::default()
    };
    let mut engine = engine_with(factory, small_config(25), 2, RecordingStore::default());

    let outcome = engine.run(LogProgressCallback::new(25)).unwrap();
    assert_eq!(outcome.generations, 25);

    let store = engine.into_checkpoints();
    assert_eq!(
        store.saved,
        vec![
            CheckpointLabel::Generation(1),
            CheckpointLabel::Generation(10),
            CheckpointLabel::Generation(20),
            CheckpointLabel::Final,
            CheckpointLabel::Best,
        ]
    );
    let best = store.load(CheckpointLabel::Best).unwrap();
    assert_eq!(best.genome, outcome.best_genome);
    assert_eq!(store.load(CheckpointLabel::Final).unwrap().generation, Some(25));
}

#[test]
fn checkpoint_failures_degrade_but_do_not_abort() {
    let store = RecordingStore {
        fail: true,
        ..Default::default()
    };
    let mut engine = engine_with(ScriptedFactory::default(), small_config(3), 2, store);
    let mut callback = CollectingCallback::default();

    let outcome = engine.run(&mut callback).unwrap();

    assert_eq!(outcome.generations, 3);
    // Generation 1, final and best.
    assert_eq!(outcome.degraded_checkpoints, 3);
    assert!(callback.checkpoints.iter().all(|(_, saved)| !saved));
}

#[test]
fn oracle_fault_aborts_the_run() {
    let factory = ScriptedFactory {
        fail_on_action: Some(1),
        ..Default::default()
    };
    let config = EvolutionConfig {
        genome_length: 40,
        ..small_config(3)
    };
    let mut engine = engine_with(factory, config, 2, RecordingStore::default());

    let result = engine.run(LogProgressCallback::new(3));
    assert!(matches!(result, Err(LevelSearchError::Environment(_))));
    assert!(engine.checkpoints().saved.is_empty());
}

#[test]
fn same_seed_reproduces_the_run() {
    let run = || {
        let factory = ScriptedFactory {
            reward_per_action: true,
            advance_per_action: 4,
            ..Default::default()
        };
        let config = EvolutionConfig {
            population_size: 12,
            genome_length: 16,
            workers: Some(4),
            ..small_config(8)
        };
        let mut engine = engine_with(factory, config, 4, RecordingStore::default());
        engine.run(LogProgressCallback::new(8)).unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first.best_genome, second.best_genome);
    assert_eq!(first.best_per_generation, second.best_per_generation);
}

#[test]
fn invalid_configuration_is_rejected_before_simulation() {
    let factory = ScriptedFactory::default();
    let evaluator = FitnessEvaluator::new(factory.clone(), one_step_per_action(), 2).unwrap();
    let evaluator = PopulationEvaluator::new(evaluator, None).unwrap();
    let config = EvolutionConfig {
        elite_size: 4,
        ..small_config(1)
    };

    let result = EvolutionEngine::new(config, evaluator, RecordingStore::default());
    assert!(matches!(result, Err(LevelSearchError::Configuration(_))));
    assert_eq!(factory.total_instances(), 0);
}

#[test]
fn corridor_run_writes_checkpoint_files() {
    let dir = tempfile::tempdir().unwrap();
    let checkpoint_config = CheckpointConfig {
        directory: dir.path().join("checkpoints"),
        ..Default::default()
    };
    let factory = CorridorFactory::new(CorridorLevel::default(), ActionSet::RightOnly).unwrap();
    let evaluator = FitnessEvaluator::new(factory, EvaluationConfig::default(), ActionSet::RightOnly.len())
        .unwrap()
        .with_genome_length(120);
    let evaluator = PopulationEvaluator::new(evaluator, None).unwrap();
    let config = EvolutionConfig {
        population_size: 8,
        genome_length: 120,
        num_generations: 3,
        elite_size: 2,
        seed: Some(9),
        workers: None,
        ..Default::default()
    };
    let store = FileCheckpointStore::new(&checkpoint_config);
    let mut engine = EvolutionEngine::new(config, evaluator, store).unwrap();

    let outcome = engine.run(LogProgressCallback::new(3)).unwrap();

    let store = engine.checkpoints();
    for label in [CheckpointLabel::Generation(1), CheckpointLabel::Final, CheckpointLabel::Best] {
        assert!(store.path_for(label).exists(), "missing {label} checkpoint");
    }
    assert!(!store.path_for(CheckpointLabel::Generation(2)).exists());
    let best = load_checkpoint(checkpoint_config.best_path()).unwrap();
    assert_eq!(best.genome, outcome.best_genome);
}
