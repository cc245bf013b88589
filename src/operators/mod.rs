//! # Operator Library
//!
//! The four strategy families of the genetic algorithm: parent selection, crossover,
//! mutation, and replacement. Each family is an enum whose variants are dispatched with
//! `match`; every variant also has a stable snake_case name so strategies can be chosen
//! from configuration, and parsing an unknown name fails with
//! `SolverError::StrategyNotFound`.
//!
//! The Q-learning controller sees exactly four slots per family. A `StrategyPalette`
//! decides which concrete strategy sits in each slot.
//!
//! ## Example
//!
//! ```rust
//! use ttp_qga::operators::{Crossover, ParentSelection};
//!
//! let selection: ParentSelection = "roulette_wheel".parse().unwrap();
//! assert_eq!(selection, ParentSelection::RouletteWheel);
//!
//! assert!("three_point".parse::<Crossover>().is_err());
//! ```

pub mod crossover;
pub mod mutation;
pub mod replacement;
pub mod selection;

use crate::controller::StrategyState;
use crate::error::Result;
use crate::rng::RandomNumberGenerator;

pub use crossover::Crossover;
pub use mutation::Mutation;
pub use replacement::Replacement;
pub use selection::ParentSelection;

/// Total weights at or below this are treated as all-zero.
pub(crate) const WEIGHT_EPSILON: f64 = 1e-12;

/// Samples an index with probability proportional to `weights`.
///
/// Falls back to a uniform choice when the weights sum to (nearly) zero or are not
/// finite, so degenerate populations never cause a division by zero.
pub(crate) fn sample_weighted(weights: &[f64], rng: &mut RandomNumberGenerator) -> usize {
    let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
    if !total.is_finite() || total <= WEIGHT_EPSILON {
        return rng.index(weights.len());
    }

    let target = rng.uniform() * total;
    let mut cumulative = 0.0;
    for (idx, weight) in weights.iter().enumerate() {
        cumulative += weight.max(0.0);
        if cumulative > target {
            return idx;
        }
    }

    // Floating-point slack at the top of the wheel.
    weights.len() - 1
}

/// Indices of `fitness` sorted from lowest to highest. Ties keep population order.
pub(crate) fn ascending_order(fitness: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));
    order
}

/// The concrete strategies behind the controller's four slots per family.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyPalette {
    pub selection: [ParentSelection; 4],
    pub crossover: [Crossover; 4],
    pub mutation: [Mutation; 4],
    pub replacement: [Replacement; 4],
}

impl Default for StrategyPalette {
    fn default() -> Self {
        Self {
            selection: [
                ParentSelection::Truncation,
                ParentSelection::TournamentTop10,
                ParentSelection::RouletteWheel,
                ParentSelection::Rank,
            ],
            crossover: [
                Crossover::SinglePoint,
                Crossover::TwoPoint,
                Crossover::Uniform,
                Crossover::Arithmetic,
            ],
            mutation: [
                Mutation::BitFlip,
                Mutation::Swap,
                Mutation::Scramble,
                Mutation::Inversion,
            ],
            replacement: [
                Replacement::Bottom20Percent,
                Replacement::LowestFitness,
                Replacement::InverseFitnessProbability,
                Replacement::Elitism,
            ],
        }
    }
}

impl StrategyPalette {
    /// Builds a palette from strategy names, slot by slot.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::StrategyNotFound` for the first name a family does not know.
    pub fn from_names(
        selection: [&str; 4],
        crossover: [&str; 4],
        mutation: [&str; 4],
        replacement: [&str; 4],
    ) -> Result<Self> {
        fn parse_all<T: std::str::FromStr<Err = crate::error::SolverError> + Copy>(
            names: [&str; 4],
        ) -> Result<[T; 4]> {
            Ok([
                names[0].parse()?,
                names[1].parse()?,
                names[2].parse()?,
                names[3].parse()?,
            ])
        }

        Ok(Self {
            selection: parse_all(selection)?,
            crossover: parse_all(crossover)?,
            mutation: parse_all(mutation)?,
            replacement: parse_all(replacement)?,
        })
    }

    /// Checks the parameters of every strategy in the palette.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error a strategy reports.
    pub fn validate(&self) -> Result<()> {
        for selection in &self.selection {
            selection.validate()?;
        }
        for mutation in &self.mutation {
            mutation.validate()?;
        }
        Ok(())
    }

    pub fn selection_for(&self, state: StrategyState) -> ParentSelection {
        self.selection[state.selection() as usize]
    }

    pub fn crossover_for(&self, state: StrategyState) -> Crossover {
        self.crossover[state.crossover() as usize]
    }

    pub fn mutation_for(&self, state: StrategyState) -> Mutation {
        self.mutation[state.mutation() as usize]
    }

    pub fn replacement_for(&self, state: StrategyState) -> Replacement {
        self.replacement[state.replacement() as usize]
    }

    /// The strategy names a state stands for.
    pub fn names(&self, state: StrategyState) -> StrategyNames {
        StrategyNames {
            selection: self.selection_for(state).name().to_string(),
            crossover: self.crossover_for(state).name().to_string(),
            mutation: self.mutation_for(state).name().to_string(),
            replacement: self.replacement_for(state).name().to_string(),
        }
    }
}

/// One strategy name per operator family.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyNames {
    pub selection: String,
    pub crossover: String,
    pub mutation: String,
    pub replacement: String,
}
