use super::state::{Action, StrategyState, NUM_ACTIONS, NUM_STATES};
use crate::error::{Result, SolverError};
use crate::rng::RandomNumberGenerator;

/// Action values for every (state, action) pair, zero-initialised.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Vec<[f64; NUM_ACTIONS]>,
}

impl QTable {
    pub fn new() -> Self {
        Self {
            values: vec![[0.0; NUM_ACTIONS]; NUM_STATES],
        }
    }

    pub fn get(&self, state: StrategyState, action: Action) -> f64 {
        self.values[state.index()][action.index()]
    }

    pub fn set(&mut self, state: StrategyState, action: Action, value: f64) {
        self.values[state.index()][action.index()] = value;
    }

    pub fn row(&self, state: StrategyState) -> &[f64; NUM_ACTIONS] {
        &self.values[state.index()]
    }

    /// Highest action value of a state.
    pub fn max(&self, state: StrategyState) -> f64 {
        row_max(&self.values[state.index()])
    }

    /// The state whose best action value is highest. Ties go to the lowest index.
    pub fn best_state(&self) -> StrategyState {
        let mut best_index = 0;
        let mut best_value = f64::NEG_INFINITY;

        for (index, row) in self.values.iter().enumerate() {
            let value = row_max(row);
            if value > best_value {
                best_value = value;
                best_index = index;
            }
        }

        StrategyState::from_index(best_index).unwrap_or_default()
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new()
    }
}

fn row_max(row: &[f64; NUM_ACTIONS]) -> f64 {
    row.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Tabular Q-learning over strategy combinations.
///
/// The agent's state is the combination of active operator slots; an action switches one
/// family to a (possibly identical) slot. The reward is the change in best fitness the
/// generation produced.
#[derive(Debug, Clone)]
pub struct QLearning {
    table: QTable,
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    exclude_noop_actions: bool,
}

impl QLearning {
    /// # Errors
    ///
    /// Returns a configuration error if any rate is outside `[0, 1]`.
    pub fn new(learning_rate: f64, discount_factor: f64, epsilon: f64) -> Result<Self> {
        for (name, value) in [
            ("learning_rate", learning_rate),
            ("discount_factor", discount_factor),
            ("epsilon", epsilon),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SolverError::Configuration(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(Self {
            table: QTable::new(),
            learning_rate,
            discount_factor,
            epsilon,
            exclude_noop_actions: false,
        })
    }

    /// Restricts choices to actions that actually change the state.
    pub fn with_noop_exclusion(mut self, exclude: bool) -> Self {
        self.exclude_noop_actions = exclude;
        self
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Chooses an action epsilon-greedily.
    ///
    /// Exploits by taking the highest-valued action of the current row; ties go to the
    /// lowest action index.
    pub fn choose_action(
        &self,
        state: StrategyState,
        rng: &mut RandomNumberGenerator,
    ) -> Action {
        let candidates: Vec<Action> = (0..NUM_ACTIONS)
            .filter_map(|index| Action::from_index(index).ok())
            .filter(|action| !(self.exclude_noop_actions && action.is_noop(state)))
            .collect();

        if rng.chance(self.epsilon) {
            return candidates[rng.index(candidates.len())];
        }

        let row = self.table.row(state);
        let mut best = candidates[0];
        for &action in &candidates[1..] {
            if row[action.index()] > row[best.index()] {
                best = action;
            }
        }
        best
    }

    /// Applies the one-step Q-learning update to `Q[state][action]`.
    pub fn update(
        &mut self,
        state: StrategyState,
        action: Action,
        reward: f64,
        next_state: StrategyState,
    ) {
        let current = self.table.get(state, action);
        let target = reward + self.discount_factor * self.table.max(next_state);
        self.table
            .set(state, action, current + self.learning_rate * (target - current));
    }

    /// The strategy combination the agent currently values most.
    pub fn best_strategies(&self) -> StrategyState {
        self.table.best_state()
    }
}
