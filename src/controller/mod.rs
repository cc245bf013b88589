//! # Q-Learning Meta-Controller
//!
//! Learns online which combination of operator strategies improves the best fitness the
//! most. The controller's state is one active slot per operator family (4^4 = 256
//! states); an action moves a single family to another slot (4 × 4 = 16 actions).
//!
//! ## Example
//!
//! ```rust
//! use ttp_qga::controller::{QLearning, StrategyState};
//! use ttp_qga::rng::RandomNumberGenerator;
//!
//! let mut agent = QLearning::new(0.1, 0.95, 0.1).unwrap();
//! let mut rng = RandomNumberGenerator::from_seed(42);
//!
//! let state = StrategyState::default();
//! let action = agent.choose_action(state, &mut rng);
//! let next = state.apply(action);
//!
//! agent.update(state, action, 2.5, next);
//! ```

pub mod qlearning;
pub mod state;

pub use qlearning::{QLearning, QTable};
pub use state::{Action, Component, StrategyState, NUM_ACTIONS, NUM_STATES, SLOTS_PER_FAMILY};
