use std::fmt;
use std::str::FromStr;

use super::{ascending_order, sample_weighted};
use crate::error::{Result, SolverError};
use crate::population::Individual;
use crate::rng::RandomNumberGenerator;

/// Keeps `1 / (f + eps)` finite for zero-fitness individuals.
const INVERSE_FITNESS_EPSILON: f64 = 1e-6;
const BOTTOM_FRACTION: f64 = 0.2;

/// Strategies for inserting a child into the population.
///
/// Every strategy overwrites exactly one individual, so the population size never
/// changes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// Overwrites the lowest-fitness individual (the first one on ties).
    LowestFitness,
    /// Overwrites a uniformly random member of the worst fifth (at least one individual).
    Bottom20Percent,
    /// Overwrites an individual drawn with weight `1 / (fitness + 1e-6)`.
    InverseFitnessProbability,
    /// Overwrites a uniformly random individual other than the current best.
    Elitism,
}

impl Replacement {
    pub fn name(&self) -> &'static str {
        match self {
            Replacement::LowestFitness => "lowest_fitness",
            Replacement::Bottom20Percent => "bottom_20_percent",
            Replacement::InverseFitnessProbability => "inverse_fitness_probability",
            Replacement::Elitism => "elitism",
        }
    }

    /// Puts `child` into `population` and returns the index it now occupies.
    ///
    /// `fitness` holds the scores of the population before the child arrives.
    /// A single-member population under `Elitism` has no non-best individual, so the
    /// child replaces it.
    ///
    /// # Errors
    ///
    /// Returns an error if the population is empty or `fitness` has a different length.
    pub fn replace(
        &self,
        population: &mut [Individual],
        fitness: &[f64],
        child: Individual,
        rng: &mut RandomNumberGenerator,
    ) -> Result<usize> {
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

        let target = match self {
            Replacement::LowestFitness => ascending_order(fitness)[0],
            Replacement::Bottom20Percent => {
                let order = ascending_order(fitness);
                let bottom = ((fitness.len() as f64 * BOTTOM_FRACTION) as usize).max(1);
                order[rng.index(bottom)]
            }
            Replacement::InverseFitnessProbability => {
                let weights: Vec<f64> = fitness
                    .iter()
                    .map(|f| 1.0 / (f.max(0.0) + INVERSE_FITNESS_EPSILON))
                    .collect();
                sample_weighted(&weights, rng)
            }
            Replacement::Elitism => {
                let best = fitness
                    .iter()
                    .enumerate()
                    .max_by(|(i, a), (j, b)| a.total_cmp(b).then(j.cmp(i)))
                    .map_or(0, |(idx, _)| idx);

                if population.len() == 1 {
                    0
                } else {
                    // Draw from everyone but the best by skipping over its slot.
                    let pick = rng.index(population.len() - 1);
                    if pick >= best {
                        pick + 1
                    } else {
                        pick
                    }
                }
            }
        };

        population[target] = child;
        Ok(target)
    }
}

impl fmt::Display for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Replacement {
    type Err = SolverError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "lowest_fitness" => Ok(Replacement::LowestFitness),
            "bottom_20_percent" => Ok(Replacement::Bottom20Percent),
            "inverse_fitness_probability" => Ok(Replacement::InverseFitnessProbability),
            "elitism" => Ok(Replacement::Elitism),
            _ => Err(SolverError::StrategyNotFound {
                family: "replacement",
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn population(size: usize) -> Vec<Individual> {
        let route: Arc<[usize]> = Arc::from(vec![0, 1]);
        (0..size)
            .map(|_| Individual::new(Arc::clone(&route), vec![0, 0]))
            .collect()
    }

    fn child() -> Individual {
        Individual::new(Arc::from(vec![0, 1]), vec![1, 1])
    }

    #[test]
    fn test_lowest_fitness_replaces_the_minimum() {
        let mut population = population(4);
        let fitness = [3.0, 1.0, 1.0, 8.0];
        let mut rng = RandomNumberGenerator::from_seed(1);

        let idx = Replacement::LowestFitness
            .replace(&mut population, &fitness, child(), &mut rng)
            .unwrap();

        assert_eq!(idx, 1);
        assert_eq!(population[1], child());
        assert_eq!(population.len(), 4);
    }

    #[test]
    fn test_bottom_20_percent_stays_in_the_bottom() {
        let fitness: Vec<f64> = (0..10).rev().map(|i| i as f64).collect();
        let mut rng = RandomNumberGenerator::from_seed(2);

        for _ in 0..30 {
            let mut population = population(10);
            let idx = Replacement::Bottom20Percent
                .replace(&mut population, &fitness, child(), &mut rng)
                .unwrap();
            // The two lowest scores sit at indices 8 and 9.
            assert!(idx == 8 || idx == 9);
        }
    }

    #[test]
    fn test_bottom_20_percent_small_population() {
        let mut population = population(3);
        let fitness = [5.0, 2.0, 9.0];
        let mut rng = RandomNumberGenerator::from_seed(3);

        let idx = Replacement::Bottom20Percent
            .replace(&mut population, &fitness, child(), &mut rng)
            .unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_inverse_fitness_prefers_weak_individuals() {
        let fitness = [1000.0, 0.0];
        let mut rng = RandomNumberGenerator::from_seed(4);
        let mut weak_hits = 0;

        for _ in 0..100 {
            let mut population = population(2);
            let idx = Replacement::InverseFitnessProbability
                .replace(&mut population, &fitness, child(), &mut rng)
                .unwrap();
            if idx == 1 {
                weak_hits += 1;
            }
        }

        assert!(weak_hits > 95);
    }

    #[test]
    fn test_elitism_never_replaces_the_best() {
        let fitness = [4.0, 2.0, 9.0, 1.0, 9.0];
        let mut rng = RandomNumberGenerator::from_seed(5);

        for _ in 0..50 {
            let mut population = population(5);
            let idx = Replacement::Elitism
                .replace(&mut population, &fitness, child(), &mut rng)
                .unwrap();
            // Ties for the best go to the first index.
            assert_ne!(idx, 2);
        }

        let mut single = population(1);
        let idx = Replacement::Elitism
            .replace(&mut single, &[1.0], child(), &mut rng)
            .unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn test_replace_validates_inputs() {
        let mut rng = RandomNumberGenerator::from_seed(6);

        assert_eq!(
            Replacement::LowestFitness.replace(&mut [], &[], child(), &mut rng),
            Err(SolverError::EmptyPopulation)
        );
        assert!(Replacement::LowestFitness
            .replace(&mut population(2), &[1.0], child(), &mut rng)
            .is_err());
    }

    #[test]
    fn test_names_round_trip() {
        for strategy in [
            Replacement::LowestFitness,
            Replacement::Bottom20Percent,
            Replacement::InverseFitnessProbability,
            Replacement::Elitism,
        ] {
            assert_eq!(strategy.name().parse::<Replacement>().unwrap(), strategy);
        }
        assert!("random".parse::<Replacement>().is_err());
    }
}
