use std::fmt;
use std::str::FromStr;

use super::{ascending_order, sample_weighted, WEIGHT_EPSILON};
use crate::error::{Result, SolverError};
use crate::population::Individual;
use crate::rng::RandomNumberGenerator;

const TOP_POOL_SIZE: usize = 10;
const DEFAULT_TOURNAMENT_SIZE: usize = 3;

/// Strategies for picking the two parents of the next child.
///
/// Fitness is a profit to be maximized everywhere else in the solver, but `Truncation`,
/// `Rank` and `KTournament` favour the *lowest* fitness. Use `TournamentTop10`,
/// `RouletteWheel` or `StochasticUniversalSampling` to bias parents towards high profit.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentSelection {
    /// The two lowest-fitness individuals.
    Truncation,
    /// One parent uniformly from the ten fittest, the other uniformly from the rest.
    TournamentTop10,
    /// Fitness-proportionate sampling with replacement.
    RouletteWheel,
    /// Sampling with weight `1 / (rank + 1)`, ranks counted from the lowest fitness.
    Rank,
    /// Two tournaments over `k` distinct random individuals; the lowest fitness wins.
    KTournament { k: usize },
    /// Two evenly spaced pointers over the cumulative fitness wheel.
    StochasticUniversalSampling,
}

impl ParentSelection {
    pub fn name(&self) -> &'static str {
        match self {
            ParentSelection::Truncation => "truncation",
            ParentSelection::TournamentTop10 => "tournament_top_10",
            ParentSelection::RouletteWheel => "roulette_wheel",
            ParentSelection::Rank => "rank",
            ParentSelection::KTournament { .. } => "k_tournament",
            ParentSelection::StochasticUniversalSampling => "stochastic_universal_sampling",
        }
    }

    /// Checks the strategy's parameters.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `KTournament` has `k == 0`.
    pub fn validate(&self) -> Result<()> {
        match self {
            ParentSelection::KTournament { k: 0 } => Err(SolverError::Configuration(
                "Tournament size must be at least 1".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Picks two parents and returns their population indices.
    ///
    /// The same individual may be returned twice.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The population is empty
    /// - The fitness slice length doesn't match the population length
    /// - `KTournament` is configured with `k == 0`
    pub fn select(
        &self,
        population: &[Individual],
        fitness: &[f64],
        rng: &mut RandomNumberGenerator,
    ) -> Result<[usize; 2]> {
        if population.is_empty() {
            return Err(SolverError::EmptyPopulation);
        }

        if fitness.len() != population.len() {
            return Err(SolverError::Configuration(format!(
                "Fitness vector length ({}) doesn't match population length ({})",
                fitness.len(),
                population.len()
            )));
        }

        let parents = match *self {
            ParentSelection::Truncation => {
                let order = ascending_order(fitness);
                [order[0], order[1.min(order.len() - 1)]]
            }
            ParentSelection::TournamentTop10 => tournament_top_10(fitness, rng),
            ParentSelection::RouletteWheel => {
                [sample_weighted(fitness, rng), sample_weighted(fitness, rng)]
            }
            ParentSelection::Rank => {
                let order = ascending_order(fitness);
                let weights: Vec<f64> = (0..order.len()).map(|r| 1.0 / (r as f64 + 1.0)).collect();
                [
                    order[sample_weighted(&weights, rng)],
                    order[sample_weighted(&weights, rng)],
                ]
            }
            ParentSelection::KTournament { k } => {
                self.validate()?;
                [
                    k_tournament(fitness, k, rng),
                    k_tournament(fitness, k, rng),
                ]
            }
            ParentSelection::StochasticUniversalSampling => {
                stochastic_universal_sampling(fitness, rng)
            }
        };

        Ok(parents)
    }
}

fn tournament_top_10(fitness: &[f64], rng: &mut RandomNumberGenerator) -> [usize; 2] {
    let mut best_first = ascending_order(fitness);
    best_first.reverse();

    let pool = TOP_POOL_SIZE.min(best_first.len());
    let first = best_first[rng.index(pool)];

    // With ten or fewer individuals there is no remainder; draw from everyone.
    let second = if best_first.len() > pool {
        best_first[pool + rng.index(best_first.len() - pool)]
    } else {
        best_first[rng.index(best_first.len())]
    };

    [first, second]
}

fn k_tournament(fitness: &[f64], k: usize, rng: &mut RandomNumberGenerator) -> usize {
    let size = k.min(fitness.len());
    rng.distinct_indices(fitness.len(), size)
        .into_iter()
        .min_by(|&a, &b| fitness[a].total_cmp(&fitness[b]))
        .unwrap_or(0)
}

fn stochastic_universal_sampling(fitness: &[f64], rng: &mut RandomNumberGenerator) -> [usize; 2] {
    let total: f64 = fitness.iter().map(|f| f.max(0.0)).sum();
    if !total.is_finite() || total <= WEIGHT_EPSILON {
        return [rng.index(fitness.len()), rng.index(fitness.len())];
    }

    let spacing = total / 2.0;
    let start = rng.uniform_range(0.0, spacing);
    let mut parents = [fitness.len() - 1; 2];

    for (slot, parent) in parents.iter_mut().enumerate() {
        let pointer = start + slot as f64 * spacing;
        let mut cumulative = 0.0;
        for (idx, f) in fitness.iter().enumerate() {
            cumulative += f.max(0.0);
            if cumulative >= pointer {
                *parent = idx;
                break;
            }
        }
    }

    parents
}

impl fmt::Display for ParentSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParentSelection {
    type Err = SolverError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "truncation" => Ok(ParentSelection::Truncation),
            "tournament_top_10" => Ok(ParentSelection::TournamentTop10),
            "roulette_wheel" => Ok(ParentSelection::RouletteWheel),
            "rank" => Ok(ParentSelection::Rank),
            "k_tournament" => Ok(ParentSelection::KTournament {
                k: DEFAULT_TOURNAMENT_SIZE,
            }),
            "stochastic_universal_sampling" => Ok(ParentSelection::StochasticUniversalSampling),
            _ => Err(SolverError::StrategyNotFound {
                family: "parent selection",
                name: name.to_string(),
            }),
        }
    }
}
