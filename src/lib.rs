pub mod controller;
pub mod error;
pub mod evolution;
pub mod fitness;
pub mod operators;
pub mod population;
pub mod problem;
pub mod rng;

// Re-export commonly used types for convenience
pub use error::{OptionExt, Result, SolverError};
pub use evolution::{EvolutionLauncher, EvolutionOptions, EvolutionResult, LogLevel, OperatorPolicy};
pub use fitness::{evaluate, FitnessScore};
pub use population::{Individual, Population};
pub use problem::{City, Item, ItemIndexing, ProblemInstance};
