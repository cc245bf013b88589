//! # Evolution
//!
//! The generational loop. Each generation scores the population, guards against a drop
//! in the best profit by restoring the previous population, and otherwise breeds one
//! child with the strategies the controller currently has active.
//!
//! ## Example
//!
//! ```rust
//! use ttp_qga::evolution::{EvolutionLauncher, EvolutionOptions, LogLevel};
//! use ttp_qga::problem::{City, Item, ProblemInstance};
//! use ttp_qga::rng::RandomNumberGenerator;
//!
//! let instance = ProblemInstance::new(
//!     vec![City::new(0.0, 0.0), City::new(3.0, 4.0), City::new(6.0, 0.0)],
//!     vec![Item::at_city(2.0, 20.0, 1), Item::at_city(3.0, 25.0, 2)],
//!     4.0,
//!     0.1,
//!     1.0,
//!     0.1,
//! )
//! .unwrap();
//!
//! let options = EvolutionOptions::builder()
//!     .num_generations(20)
//!     .population_size(10)
//!     .log_level(LogLevel::None)
//!     .build();
//!
//! let launcher = EvolutionLauncher::new(&instance, options).unwrap();
//! let result = launcher.evolve(&mut RandomNumberGenerator::from_seed(42)).unwrap();
//!
//! assert_eq!(result.best_fitness_history.len(), 20);
//! ```

pub mod challenge;
pub mod launcher;
pub mod options;

pub use challenge::Challenge;
pub use launcher::{Evolution, EvolutionLauncher, EvolutionResult, GenerationOutcome};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder, LogLevel, OperatorPolicy};
