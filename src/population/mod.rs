//! # Population
//!
//! Individuals pair the shared, frozen route with a picking plan, one bit per item
//! position. Only the picking plan evolves; every individual in a run holds a clone of
//! the same `Arc` route.

pub mod repair;

use std::sync::Arc;

use crate::error::{Result, SolverError};
use crate::problem::{generate_route, ItemIndexing, ProblemInstance};
use crate::rng::RandomNumberGenerator;

pub use repair::{repair, CapacityConstraint, ConstraintViolation};

/// A closed tour over all cities, shared read-only by every individual.
pub type Route = Arc<[usize]>;

/// One {0, 1} gene per item position.
pub type PickingPlan = Vec<u8>;

/// A candidate solution: the tour and the items picked along it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    pub route: Route,
    pub plan: PickingPlan,
}

impl Individual {
    pub fn new(route: Route, plan: PickingPlan) -> Self {
        Self { route, plan }
    }

    /// Whether the gene at `position` selects its item.
    pub fn is_selected(&self, position: usize) -> bool {
        self.plan.get(position).is_some_and(|&gene| gene != 0)
    }

    /// Number of selected item positions.
    pub fn selected_count(&self) -> usize {
        self.plan.iter().filter(|&&gene| gene != 0).count()
    }
}

pub type Population = Vec<Individual>;

/// Creates the initial population.
///
/// Generates the seed route once, then draws each individual's picking plan with every
/// gene independently set with probability 0.5, and repairs it against the capacity.
///
/// # Errors
///
/// Returns a configuration error if `population_size` is zero.
pub fn initialize_population(
    instance: &ProblemInstance,
    population_size: usize,
    indexing: ItemIndexing,
    rng: &mut RandomNumberGenerator,
) -> Result<Population> {
    if population_size == 0 {
        return Err(SolverError::Configuration(
            "Population size cannot be zero".to_string(),
        ));
    }

    let route: Route = generate_route(instance.cities()).into();
    let constraint = CapacityConstraint::new(instance, indexing);

    let population = (0..population_size)
        .map(|_| {
            let plan: PickingPlan = (0..instance.num_items())
                .map(|_| u8::from(rng.chance(0.5)))
                .collect();
            let mut individual = Individual::new(Arc::clone(&route), plan);
            constraint.repair(&mut individual);
            individual
        })
        .collect();

    Ok(population)
}
