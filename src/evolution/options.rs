//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds the configuration of one solver run: the
//! generation budget, the population size, the mutation rate, the Q-learning
//! hyper-parameters, and how operators are chosen.
//!
//! ## Example
//!
//! ```rust
//! use ttp_qga::evolution::options::{EvolutionOptions, LogLevel, OperatorPolicy};
//!
//! // Defaults: 2000 generations of 200 individuals, adaptive operators.
//! let default_options = EvolutionOptions::default();
//! assert_eq!(default_options.get_population_size(), 200);
//!
//! let options = EvolutionOptions::builder()
//!     .num_generations(300)
//!     .population_size(50)
//!     .mutation_rate(0.1)
//!     .log_level(LogLevel::Minimal)
//!     .build();
//!
//! assert!(options.validate().is_ok());
//! assert_eq!(options.get_policy(), OperatorPolicy::Adaptive);
//! ```
//!
//! ## Enums
//!
//! ### `LogLevel`
//!
//! - `Verbose`: one line per generation plus the controller's choices and rewards.
//! - `Minimal`: one line per generation.
//! - `None`: only rollbacks and the final summary.
//!
//! ### `OperatorPolicy`
//!
//! - `Adaptive`: the Q-learning controller picks the strategies every generation.
//! - `Fixed(state)`: the same strategy slots every generation; the controller is idle.

use crate::controller::StrategyState;
use crate::error::{Result, SolverError};
use crate::operators::StrategyPalette;
use crate::problem::ItemIndexing;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Minimal,
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatorPolicy {
    #[default]
    Adaptive,
    Fixed(StrategyState),
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    num_generations: usize,
    log_level: LogLevel,
    population_size: usize,
    mutation_rate: f64,
    /// Minimum population size scored in parallel
    parallel_threshold: usize,
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    exclude_noop_actions: bool,
    item_indexing: ItemIndexing,
    palette: StrategyPalette,
    policy: OperatorPolicy,
}

impl EvolutionOptions {
    /// Creates options with the given run size and defaults for everything else.
    pub fn new(
        num_generations: usize,
        log_level: LogLevel,
        population_size: usize,
        mutation_rate: f64,
    ) -> Self {
        Self {
            num_generations,
            log_level,
            population_size,
            mutation_rate,
            ..Self::default()
        }
    }

    /// Checks every value before a run starts.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::Configuration` if:
    /// - the population has fewer than two individuals
    /// - any rate is outside `[0, 1]`
    /// - a palette strategy has an invalid parameter (tournament size 0, bad gaussian sigma)
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(SolverError::Configuration(format!(
                "Population size must be at least 2, got {}",
                self.population_size
            )));
        }

        for (name, value) in [
            ("mutation_rate", self.mutation_rate),
            ("learning_rate", self.learning_rate),
            ("discount_factor", self.discount_factor),
            ("epsilon", self.epsilon),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SolverError::Configuration(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }

        self.palette.validate()?;

        Ok(())
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Returns the minimum population size scored in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn get_discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub fn get_epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn get_exclude_noop_actions(&self) -> bool {
        self.exclude_noop_actions
    }

    pub fn get_item_indexing(&self) -> ItemIndexing {
        self.item_indexing
    }

    pub fn get_palette(&self) -> &StrategyPalette {
        &self.palette
    }

    pub fn get_policy(&self) -> OperatorPolicy {
        self.policy
    }

    /// Sets the number of generations.
    pub fn set_num_generations(&mut self, num_generations: usize) {
        self.num_generations = num_generations;
    }

    /// Sets the log level.
    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    /// Sets the population size.
    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_mutation_rate(&mut self, mutation_rate: f64) {
        self.mutation_rate = mutation_rate;
    }

    /// Sets the parallel threshold.
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    pub fn set_item_indexing(&mut self, item_indexing: ItemIndexing) {
        self.item_indexing = item_indexing;
    }

    pub fn set_palette(&mut self, palette: StrategyPalette) {
        self.palette = palette;
    }

    pub fn set_policy(&mut self, policy: OperatorPolicy) {
        self.policy = policy;
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ttp_qga::evolution::options::EvolutionOptions;
    /// use ttp_qga::problem::ItemIndexing;
    ///
    /// let options = EvolutionOptions::builder()
    ///     .learning_rate(0.2)
    ///     .discount_factor(0.9)
    ///     .epsilon(0.05)
    ///     .exclude_noop_actions(true)
    ///     .item_indexing(ItemIndexing::RouteOrder)
    ///     .build();
    ///
    /// assert_eq!(options.get_epsilon(), 0.05);
    /// ```
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            num_generations: 2000,
            log_level: LogLevel::Minimal,
            population_size: 200,
            mutation_rate: 0.05,
            parallel_threshold: 1000,
            learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon: 0.1,
            exclude_noop_actions: false,
            item_indexing: ItemIndexing::Direct,
            palette: StrategyPalette::default(),
            policy: OperatorPolicy::Adaptive,
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Unset values fall back to `EvolutionOptions::default()`.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    num_generations: Option<usize>,
    log_level: Option<LogLevel>,
    population_size: Option<usize>,
    mutation_rate: Option<f64>,
    parallel_threshold: Option<usize>,
    learning_rate: Option<f64>,
    discount_factor: Option<f64>,
    epsilon: Option<f64>,
    exclude_noop_actions: Option<bool>,
    item_indexing: Option<ItemIndexing>,
    palette: Option<StrategyPalette>,
    policy: Option<OperatorPolicy>,
}

impl EvolutionOptionsBuilder {
    /// Sets the number of generations.
    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Sets the population size.
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    /// Sets the parallel threshold.
    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    /// Sets the Q-learning step size (alpha).
    pub fn learning_rate(mut self, value: f64) -> Self {
        self.learning_rate = Some(value);
        self
    }

    /// Sets the Q-learning discount factor (gamma).
    pub fn discount_factor(mut self, value: f64) -> Self {
        self.discount_factor = Some(value);
        self
    }

    /// Sets the exploration rate.
    pub fn epsilon(mut self, value: f64) -> Self {
        self.epsilon = Some(value);
        self
    }

    pub fn exclude_noop_actions(mut self, value: bool) -> Self {
        self.exclude_noop_actions = Some(value);
        self
    }

    pub fn item_indexing(mut self, value: ItemIndexing) -> Self {
        self.item_indexing = Some(value);
        self
    }

    pub fn palette(mut self, value: StrategyPalette) -> Self {
        self.palette = Some(value);
        self
    }

    pub fn policy(mut self, value: OperatorPolicy) -> Self {
        self.policy = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance.
    pub fn build(self) -> EvolutionOptions {
        let defaults = EvolutionOptions::default();

        EvolutionOptions {
            num_generations: self.num_generations.unwrap_or(defaults.num_generations),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            population_size: self.population_size.unwrap_or(defaults.population_size),
            mutation_rate: self.mutation_rate.unwrap_or(defaults.mutation_rate),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(defaults.parallel_threshold),
            learning_rate: self.learning_rate.unwrap_or(defaults.learning_rate),
            discount_factor: self.discount_factor.unwrap_or(defaults.discount_factor),
            epsilon: self.epsilon.unwrap_or(defaults.epsilon),
            exclude_noop_actions: self
                .exclude_noop_actions
                .unwrap_or(defaults.exclude_noop_actions),
            item_indexing: self.item_indexing.unwrap_or(defaults.item_indexing),
            palette: self.palette.unwrap_or(defaults.palette),
            policy: self.policy.unwrap_or(defaults.policy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EvolutionOptions::default();

        assert_eq!(options.get_num_generations(), 2000);
        assert_eq!(options.get_population_size(), 200);
        assert_eq!(options.get_mutation_rate(), 0.05);
        assert_eq!(options.get_parallel_threshold(), 1000);
        assert_eq!(options.get_learning_rate(), 0.1);
        assert_eq!(options.get_discount_factor(), 0.95);
        assert_eq!(options.get_epsilon(), 0.1);
        assert!(!options.get_exclude_noop_actions());
        assert_eq!(options.get_item_indexing(), ItemIndexing::Direct);
        assert_eq!(options.get_policy(), OperatorPolicy::Adaptive);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides_only_what_is_set() {
        let state = StrategyState::new(0, 1, 0, 1).unwrap();
        let options = EvolutionOptions::builder()
            .population_size(30)
            .policy(OperatorPolicy::Fixed(state))
            .build();

        assert_eq!(options.get_population_size(), 30);
        assert_eq!(options.get_policy(), OperatorPolicy::Fixed(state));
        assert_eq!(options.get_num_generations(), 2000);
        assert_eq!(options.get_palette(), &StrategyPalette::default());
    }

    #[test]
    fn test_new_keeps_defaults_for_the_rest() {
        let options = EvolutionOptions::new(10, LogLevel::None, 8, 0.2);

        assert_eq!(options.get_num_generations(), 10);
        assert_eq!(options.get_log_level(), LogLevel::None);
        assert_eq!(options.get_mutation_rate(), 0.2);
        assert_eq!(options.get_epsilon(), 0.1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let tiny = EvolutionOptions::builder().population_size(1).build();
        assert!(matches!(tiny.validate(), Err(SolverError::Configuration(_))));

        let mut options = EvolutionOptions::default();
        options.set_mutation_rate(1.2);
        assert!(options.validate().is_err());

        let greedy = EvolutionOptions::builder().epsilon(-0.1).build();
        assert!(greedy.validate().is_err());

        let boundary = EvolutionOptions::builder()
            .mutation_rate(0.0)
            .epsilon(1.0)
            .population_size(2)
            .build();
        assert!(boundary.validate().is_ok());
    }

    #[test]
    fn test_validate_checks_the_palette() {
        let mut palette = StrategyPalette::default();
        palette.selection[0] = crate::operators::ParentSelection::KTournament { k: 0 };
        let options = EvolutionOptions::builder().palette(palette).build();
        assert!(matches!(
            options.validate(),
            Err(SolverError::Configuration(_))
        ));

        let mut palette = StrategyPalette::default();
        palette.mutation = [crate::operators::Mutation::Gaussian { sigma: -1.0 }; 4];
        let options = EvolutionOptions::builder().palette(palette).build();
        assert!(options.validate().is_err());
    }
}
