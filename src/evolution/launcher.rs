use tracing::{debug, info};

use super::options::{EvolutionOptions, LogLevel, OperatorPolicy};
use crate::{
    controller::{QLearning, StrategyState},
    error::{OptionExt, Result, SolverError},
    fitness::{evaluate_population, TtpChallenge},
    operators::StrategyNames,
    population::{initialize_population, CapacityConstraint, Individual, Population},
    problem::ProblemInstance,
    rng::RandomNumberGenerator,
};

/// The outcome of a complete run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionResult {
    /// Best profit of every generation. A rolled back generation records the best of
    /// the population it was rolled back to.
    pub best_fitness_history: Vec<f64>,
    /// Best profit seen in any generation.
    pub best_fitness: f64,
    /// The individual that scored `best_fitness`.
    pub best_individual: Individual,
    /// `(weight, profit)` of every individual, per generation.
    pub pareto_front: Vec<Vec<(f64, f64)>>,
    /// The strategy combination the controller values most, or the fixed one.
    pub best_strategies: StrategyNames,
    /// Largest final knapsack weight of any individual in any generation.
    pub max_weight: f64,
    /// Number of generations voided by the regression guard.
    pub rollbacks: usize,
}

/// What a single generation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// A child was bred and inserted.
    Advanced,
    /// The best fitness regressed; the previous population was restored.
    RolledBack,
}

#[derive(Debug, Clone)]
struct Snapshot {
    population: Population,
    best_fitness: f64,
}

/// Configures and starts runs over one problem instance.
#[derive(Debug, Clone)]
pub struct EvolutionLauncher<'a> {
    instance: &'a ProblemInstance,
    options: EvolutionOptions,
}

impl<'a> EvolutionLauncher<'a> {
    /// # Errors
    ///
    /// Returns `SolverError::Configuration` if the options do not validate.
    pub fn new(instance: &'a ProblemInstance, options: EvolutionOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { instance, options })
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    /// Creates the initial population and a fresh controller.
    pub fn start(&self, rng: &mut RandomNumberGenerator) -> Result<Evolution<'a>> {
        let options = &self.options;
        let population = initialize_population(
            self.instance,
            options.get_population_size(),
            options.get_item_indexing(),
            rng,
        )?;

        let controller = QLearning::new(
            options.get_learning_rate(),
            options.get_discount_factor(),
            options.get_epsilon(),
        )?
        .with_noop_exclusion(options.get_exclude_noop_actions());

        let state = match options.get_policy() {
            OperatorPolicy::Adaptive => StrategyState::default(),
            OperatorPolicy::Fixed(state) => state,
        };

        Ok(Evolution {
            instance: self.instance,
            challenge: TtpChallenge::new(self.instance, options.get_item_indexing()),
            options: options.clone(),
            controller,
            state,
            population,
            previous: None,
            generation: 0,
            best_fitness: f64::NEG_INFINITY,
            best_individual: None,
            history: Vec::with_capacity(options.get_num_generations()),
            pareto_front: Vec::with_capacity(options.get_num_generations()),
            max_weight: 0.0,
            rollbacks: 0,
        })
    }

    /// Runs the configured number of generations.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The initial population cannot be created
    /// - A fitness score is not finite
    /// - An operator rejects its input
    /// - The generation budget is zero, so there is no best individual to report
    pub fn evolve(&self, rng: &mut RandomNumberGenerator) -> Result<EvolutionResult> {
        let mut evolution = self.start(rng)?;

        for _ in 0..self.options.get_num_generations() {
            evolution.step(rng)?;
        }

        info!(
            best_fitness = evolution.best_fitness,
            rollbacks = evolution.rollbacks,
            "evolution finished after {} generations",
            evolution.generation
        );

        evolution.finish()
    }
}

/// A run in progress, advanced one generation at a time.
#[derive(Debug, Clone)]
pub struct Evolution<'a> {
    instance: &'a ProblemInstance,
    challenge: TtpChallenge<'a>,
    options: EvolutionOptions,
    controller: QLearning,
    state: StrategyState,
    population: Population,
    previous: Option<Snapshot>,
    generation: usize,
    best_fitness: f64,
    best_individual: Option<Individual>,
    history: Vec<f64>,
    pareto_front: Vec<Vec<(f64, f64)>>,
    max_weight: f64,
    rollbacks: usize,
}

impl<'a> Evolution<'a> {
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Generations run so far, rolled back ones included.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The strategy slots the next generation will use.
    pub fn state(&self) -> StrategyState {
        self.state
    }

    pub fn controller(&self) -> &QLearning {
        &self.controller
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks
    }

    /// Runs one generation.
    ///
    /// Scores the population and, unless its best profit fell below the previous
    /// generation's, breeds one child with the current strategies and lets the
    /// controller move to its next state.
    pub fn step(&mut self, rng: &mut RandomNumberGenerator) -> Result<GenerationOutcome> {
        let generation = self.generation;
        self.generation += 1;

        let scores = evaluate_population(
            &self.challenge,
            &self.population,
            self.options.get_parallel_threshold(),
        )?;
        let fitness: Vec<f64> = scores.iter().map(|score| score.profit).collect();

        self.pareto_front
            .push(scores.iter().map(|score| (score.weight, score.profit)).collect());
        self.max_weight = scores
            .iter()
            .map(|score| score.weight)
            .fold(self.max_weight, f64::max);

        let (best_index, best) = fitness
            .iter()
            .copied()
            .enumerate()
            .fold(None, |acc: Option<(usize, f64)>, (idx, f)| match acc {
                Some((_, current)) if current >= f => acc,
                _ => Some((idx, f)),
            })
            .ok_or_else_solver(|| SolverError::EmptyPopulation)?;

        self.history.push(best);
        if best > self.best_fitness {
            self.best_fitness = best;
            self.best_individual = Some(self.population[best_index].clone());
        }

        let palette = *self.options.get_palette();
        if self.options.get_log_level() != LogLevel::None {
            let names = palette.names(self.state);
            info!(
                generation,
                best_fitness = best,
                selection = %names.selection,
                crossover = %names.crossover,
                mutation = %names.mutation,
                replacement = %names.replacement,
                "generation complete"
            );
        }

        let previous_best = self
            .previous
            .as_ref()
            .map_or(f64::NEG_INFINITY, |snapshot| snapshot.best_fitness);

        if best < previous_best {
            if let Some(snapshot) = &self.previous {
                self.population = snapshot.population.clone();
            }
            if let Some(last) = self.history.last_mut() {
                *last = previous_best;
            }
            self.rollbacks += 1;
            info!(
                generation,
                best_fitness = best,
                previous_best,
                "best fitness regressed, restoring previous population"
            );
            return Ok(GenerationOutcome::RolledBack);
        }

        self.previous = Some(Snapshot {
            population: self.population.clone(),
            best_fitness: best,
        });

        let action = match self.options.get_policy() {
            OperatorPolicy::Adaptive => Some(self.controller.choose_action(self.state, rng)),
            OperatorPolicy::Fixed(_) => None,
        };

        let [first, second] =
            palette
                .selection_for(self.state)
                .select(&self.population, &fitness, rng)?;
        let mut child = palette.crossover_for(self.state).crossover(
            &self.population[first],
            &self.population[second],
            rng,
        )?;
        palette.mutation_for(self.state).mutate(
            &mut child,
            self.options.get_mutation_rate(),
            rng,
        )?;
        CapacityConstraint::new(self.instance, self.options.get_item_indexing())
            .repair(&mut child);
        palette
            .replacement_for(self.state)
            .replace(&mut self.population, &fitness, child, rng)?;

        if let Some(action) = action {
            let next_state = self.state.apply(action);

            let verbose = self.options.get_log_level() == LogLevel::Verbose;

            // No baseline exists in the first generation.
            if previous_best.is_finite() {
                let reward = best - previous_best;
                self.controller
                    .update(self.state, action, reward, next_state);
                if verbose {
                    debug!(generation, state = %self.state, action = %action, reward, "controller updated");
                }
            }

            if verbose {
                debug!(generation, from = %self.state, to = %next_state, "strategy transition");
            }
            self.state = next_state;
        }

        Ok(GenerationOutcome::Advanced)
    }

    /// Ends the run.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::Evolution` if no generation has been run.
    pub fn finish(self) -> Result<EvolutionResult> {
        let best_individual = self.best_individual.ok_or_else_solver(|| {
            SolverError::Evolution(
                "Evolution completed but no generation was evaluated".to_string(),
            )
        })?;

        let best_state = match self.options.get_policy() {
            OperatorPolicy::Adaptive => self.controller.best_strategies(),
            OperatorPolicy::Fixed(state) => state,
        };

        Ok(EvolutionResult {
            best_fitness_history: self.history,
            best_fitness: self.best_fitness,
            best_individual,
            pareto_front: self.pareto_front,
            best_strategies: self.options.get_palette().names(best_state),
            max_weight: self.max_weight,
            rollbacks: self.rollbacks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{City, Item};

    fn instance() -> ProblemInstance {
        let cities = (0..8)
            .map(|i| City::new((i * 7 % 11) as f64, (i * 5 % 13) as f64))
            .collect();
        let items = (0..16)
            .map(|i| Item::at_city(2.0 + (i % 5) as f64, 10.0 + (i * 3 % 7) as f64, i % 8))
            .collect();
        ProblemInstance::new(cities, items, 20.0, 0.1, 1.0, 0.05).unwrap()
    }

    fn options(generations: usize) -> EvolutionOptions {
        EvolutionOptions::builder()
            .num_generations(generations)
            .population_size(12)
            .mutation_rate(0.3)
            .log_level(LogLevel::None)
            .build()
    }

    #[test]
    fn test_launcher_validates_options() {
        let instance = instance();
        let bad = EvolutionOptions::builder().population_size(1).build();

        assert!(matches!(
            EvolutionLauncher::new(&instance, bad),
            Err(SolverError::Configuration(_))
        ));
    }

    #[test]
    fn test_evolve_reports_every_generation() {
        let instance = instance();
        let launcher = EvolutionLauncher::new(&instance, options(40)).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(42);

        let result = launcher.evolve(&mut rng).unwrap();

        assert_eq!(result.best_fitness_history.len(), 40);
        assert_eq!(result.pareto_front.len(), 40);
        assert!(result.pareto_front.iter().all(|g| g.len() == 12));
        let history_max = result
            .best_fitness_history
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(result.best_fitness, history_max);
        assert!(result.max_weight <= instance.capacity());
    }

    #[test]
    fn test_history_never_decreases() {
        let instance = instance();
        let launcher = EvolutionLauncher::new(&instance, options(60)).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(7);

        let result = launcher.evolve(&mut rng).unwrap();

        for pair in result.best_fitness_history.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_zero_generations_is_an_error() {
        let instance = instance();
        let launcher = EvolutionLauncher::new(&instance, options(0)).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(1);

        assert!(matches!(
            launcher.evolve(&mut rng),
            Err(SolverError::Evolution(_))
        ));
    }

    #[test]
    fn test_fixed_policy_never_moves() {
        let instance = instance();
        let state = StrategyState::new(0, 1, 0, 1).unwrap();
        let mut options = options(25);
        options.set_policy(OperatorPolicy::Fixed(state));

        let launcher = EvolutionLauncher::new(&instance, options).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(3);
        let mut evolution = launcher.start(&mut rng).unwrap();
        let before = evolution.controller().table().clone();

        for _ in 0..25 {
            evolution.step(&mut rng).unwrap();
            assert_eq!(evolution.state(), state);
        }
        assert_eq!(evolution.controller().table(), &before);

        let result = evolution.finish().unwrap();
        assert_eq!(result.best_strategies.selection, "truncation");
        assert_eq!(result.best_strategies.crossover, "two_point");
        assert_eq!(result.best_strategies.mutation, "bit_flip");
        assert_eq!(result.best_strategies.replacement, "lowest_fitness");
    }
}
