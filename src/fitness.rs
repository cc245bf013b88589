//! # Fitness Evaluation
//!
//! Scores an individual by simulating the thief's tour: items are picked up as their
//! cities are reached, the carried weight slows the thief down, and the knapsack rent is
//! charged for the whole travel time.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ttp_qga::fitness::evaluate;
//! use ttp_qga::population::Individual;
//! use ttp_qga::problem::{City, Item, ItemIndexing, ProblemInstance};
//!
//! let instance = ProblemInstance::new(
//!     vec![City::new(0.0, 0.0), City::new(0.0, 10.0)],
//!     vec![Item::at_city(5.0, 100.0, 1)],
//!     10.0,
//!     0.1,
//!     1.0,
//!     0.0,
//! )
//! .unwrap();
//!
//! let individual = Individual::new(Arc::from(vec![0, 1]), vec![1]);
//! let score = evaluate(&individual, &instance, ItemIndexing::Direct);
//!
//! assert_eq!(score.profit, 100.0);
//! assert_eq!(score.weight, 5.0);
//! ```

use rayon::prelude::*;

use crate::error::{Result, SolverError};
use crate::evolution::Challenge;
use crate::population::Individual;
use crate::problem::{ItemIndexing, ProblemInstance};

/// The score of one individual.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitnessScore {
    /// Collected value minus rent, floored at zero and rounded to cents.
    pub profit: f64,
    /// Weight in the knapsack at the end of the tour.
    pub weight: f64,
}

/// Scores `individual` against `instance`.
///
/// Selected items that would overflow the knapsack when reached are skipped, not
/// deselected, so an unrepaired plan is scored rather than rejected. The function is
/// pure and deterministic.
pub fn evaluate(
    individual: &Individual,
    instance: &ProblemInstance,
    indexing: ItemIndexing,
) -> FitnessScore {
    let route = &individual.route;
    let n = route.len();
    if n == 0 {
        return FitnessScore::default();
    }

    let mut pickups: Vec<Vec<usize>> = vec![Vec::new(); n];
    match indexing {
        ItemIndexing::Direct => {
            let mut step_of_city = vec![0; instance.num_cities()];
            for (step, &city) in route.iter().enumerate() {
                step_of_city[city] = step;
            }
            for (position, item) in instance.items().iter().enumerate() {
                if individual.is_selected(position) {
                    let step = item.city.map_or(0, |city| step_of_city[city]);
                    pickups[step].push(position);
                }
            }
        }
        ItemIndexing::RouteOrder => {
            for (step, slot) in pickups.iter_mut().enumerate() {
                if individual.is_selected(step) && step < instance.num_items() {
                    slot.push(step);
                }
            }
        }
    }

    let capacity = instance.capacity();
    let mut weight = 0.0;
    let mut value = 0.0;
    let mut time = 0.0;

    for (step, positions) in pickups.iter().enumerate() {
        for &position in positions {
            if let Some(item) = instance.item_at(position, route, indexing) {
                if weight + item.weight <= capacity {
                    weight += item.weight;
                    value += item.value;
                }
            }
        }

        let from = route[step];
        let to = route[(step + 1) % n];
        time += instance.distance(from, to) / instance.speed(weight);
    }

    let rent = instance.renting_ratio() * time;
    let profit = (value - rent).max(0.0);

    FitnessScore {
        profit: (profit * 100.0).round() / 100.0,
        weight,
    }
}

/// The TTP objective as a `Challenge`.
#[derive(Debug, Clone, Copy)]
pub struct TtpChallenge<'a> {
    instance: &'a ProblemInstance,
    indexing: ItemIndexing,
}

impl<'a> TtpChallenge<'a> {
    pub fn new(instance: &'a ProblemInstance, indexing: ItemIndexing) -> Self {
        Self { instance, indexing }
    }
}

impl Challenge for TtpChallenge<'_> {
    fn score(&self, individual: &Individual) -> FitnessScore {
        evaluate(individual, self.instance, self.indexing)
    }
}

/// Scores every individual, in population order.
///
/// Populations of at least `parallel_threshold` individuals are scored in parallel.
///
/// # Errors
///
/// Returns `SolverError::FitnessCalculation` if any score is not finite.
pub fn evaluate_population<C>(
    challenge: &C,
    population: &[Individual],
    parallel_threshold: usize,
) -> Result<Vec<FitnessScore>>
where
    C: Challenge + Sync,
{
    let score_one = |individual: &Individual| {
        let score = challenge.score(individual);
        if !score.profit.is_finite() || !score.weight.is_finite() {
            return Err(SolverError::FitnessCalculation(format!(
                "Non-finite fitness score encountered: {:?}",
                score
            )));
        }
        Ok(score)
    };

    if population.len() >= parallel_threshold {
        population.par_iter().map(score_one).collect()
    } else {
        population.iter().map(score_one).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{City, Item};
    use std::sync::Arc;

    fn square_instance(renting_ratio: f64) -> ProblemInstance {
        ProblemInstance::new(
            vec![
                City::new(0.0, 0.0),
                City::new(10.0, 0.0),
                City::new(10.0, 10.0),
                City::new(0.0, 10.0),
            ],
            vec![
                Item::at_city(4.0, 50.0, 1),
                Item::at_city(6.0, 80.0, 2),
                Item::at_city(3.0, 30.0, 3),
            ],
            10.0,
            0.1,
            1.0,
            renting_ratio,
        )
        .unwrap()
    }

    #[test]
    fn test_rent_is_charged_per_segment() {
        let instance = square_instance(0.1);
        let individual = Individual::new(Arc::from(vec![0, 1, 2, 3]), vec![1, 0, 0]);

        let score = evaluate(&individual, &instance, ItemIndexing::Direct);
        // Leg 0->1 empty: 10 / 1.0. Remaining three legs at weight 4: speed 0.64.
        // Time 56.875, rent 5.6875, profit 44.3125 rounded to cents.
        assert_eq!(score.weight, 4.0);
        assert!((score.profit - 44.31).abs() < 1e-9);
    }

    #[test]
    fn test_profit_is_floored_at_zero() {
        let instance = square_instance(100.0);
        let individual = Individual::new(Arc::from(vec![0, 1, 2, 3]), vec![1, 1, 0]);

        let score = evaluate(&individual, &instance, ItemIndexing::Direct);
        assert_eq!(score.profit, 0.0);
        assert_eq!(score.weight, 10.0);
    }

    #[test]
    fn test_overflowing_items_are_skipped() {
        let instance = square_instance(0.0);
        // 4 + 6 fills the knapsack, the item at city 3 no longer fits.
        let individual = Individual::new(Arc::from(vec![0, 1, 2, 3]), vec![1, 1, 1]);

        let score = evaluate(&individual, &instance, ItemIndexing::Direct);
        assert_eq!(score.weight, 10.0);
        assert_eq!(score.profit, 130.0);
        // The plan itself is left alone.
        assert_eq!(individual.plan, vec![1, 1, 1]);
    }

    #[test]
    fn test_pickup_order_follows_the_route() {
        let instance = square_instance(0.0);
        // Visiting city 3 first means its item is picked before the heavy one.
        let individual = Individual::new(Arc::from(vec![0, 3, 2, 1]), vec![1, 1, 1]);

        let score = evaluate(&individual, &instance, ItemIndexing::Direct);
        assert_eq!(score.weight, 9.0);
        assert_eq!(score.profit, 110.0);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let instance = square_instance(0.7);
        let individual = Individual::new(Arc::from(vec![0, 2, 1, 3]), vec![0, 1, 1]);

        let first = evaluate(&individual, &instance, ItemIndexing::Direct);
        let second = evaluate(&individual, &instance, ItemIndexing::Direct);
        assert_eq!(first.profit.to_bits(), second.profit.to_bits());
        assert_eq!(first.weight.to_bits(), second.weight.to_bits());
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let instance = square_instance(0.3);
        let route: Arc<[usize]> = Arc::from(vec![0, 1, 2, 3]);
        let population: Vec<Individual> = (0..8u8)
            .map(|mask| {
                let plan = (0..3).map(|bit| (mask >> bit) & 1).collect();
                Individual::new(Arc::clone(&route), plan)
            })
            .collect();
        let challenge = TtpChallenge::new(&instance, ItemIndexing::Direct);

        let sequential = evaluate_population(&challenge, &population, usize::MAX).unwrap();
        let parallel = evaluate_population(&challenge, &population, 1).unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(sequential.len(), population.len());
    }
}
