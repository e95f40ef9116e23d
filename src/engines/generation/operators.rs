use crate::engines::generation::genome::Genome;
use rand::seq::index;
use rand::Rng;
use std::cmp::Ordering;

/// Tournament selection: best of `tournament_size` distinct random competitors.
///
/// Ties go to the competitor drawn first. Returns the winner's index.
pub fn tournament_selection<R: Rng>(
    fitnesses: &[f64],
    tournament_size: usize,
    rng: &mut R,
) -> usize {
    let competitors = index::sample(rng, fitnesses.len(), tournament_size.min(fitnesses.len()));

    let mut winner = competitors.index(0);
    for idx in competitors.iter().skip(1) {
        if fitnesses[idx].total_cmp(&fitnesses[winner]) == Ordering::Greater {
            winner = idx;
        }
    }
    winner
}

/// Fill a parent pool of `count` genomes by repeated tournaments.
///
/// The same individual may win several tournaments.
pub fn select_parents<R: Rng>(
    population: &[Genome],
    fitnesses: &[f64],
    tournament_size: usize,
    count: usize,
    rng: &mut R,
) -> Vec<Genome> {
    (0..count)
        .map(|_| population[tournament_selection(fitnesses, tournament_size, rng)].clone())
        .collect()
}

/// Indices of the `count` fittest individuals, best first.
///
/// Equal fitness keeps population order.
pub fn elite_indices(fitnesses: &[f64], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitnesses.len()).collect();
    order.sort_by(|&a, &b| fitnesses[b].total_cmp(&fitnesses[a]));
    order.truncate(count);
    order
}

/// Index of the first maximum.
pub fn best_index(fitnesses: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, fitness) in fitnesses.iter().enumerate() {
        match best {
            Some(current) if fitness.total_cmp(&fitnesses[current]) != Ordering::Greater => {}
            _ => best = Some(idx),
        }
    }
    best
}

/// Single-point crossover with a cut drawn uniformly from `[1, len - 1]`.
pub fn crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    rng: &mut R,
) -> (Genome, Genome) {
    let len = parent1.len().min(parent2.len());
    if len <= 1 {
        return (parent1.clone(), parent2.clone());
    }

    let point = rng.gen_range(1..len);
    crossover_at(parent1, parent2, point)
}

/// Swap the suffixes of two parents from `point` onwards.
pub fn crossover_at(parent1: &Genome, parent2: &Genome, point: usize) -> (Genome, Genome) {
    let child1 = parent1[..point].iter().chain(&parent2[point..]).copied().collect();
    let child2 = parent2[..point].iter().chain(&parent1[point..]).copied().collect();
    (child1, child2)
}

/// Mutation: each position is redrawn from `[0, action_count)` with probability `mutation_rate`.
pub fn mutate<R: Rng>(
    genome: &Genome,
    mutation_rate: f64,
    action_count: u32,
    rng: &mut R,
) -> Genome {
    genome
        .iter()
        .map(|&action| {
            if rng.gen::<f64>() < mutation_rate {
                rng.gen_range(0..action_count)
            } else {
                action
            }
        })
        .collect()
}
