use std::fmt;

use crate::error::{Result, SolverError};

/// Strategies available per operator family.
pub const SLOTS_PER_FAMILY: usize = 4;
/// Every combination of one slot per family.
pub const NUM_STATES: usize = 256;
/// One action per (family, slot) pair.
pub const NUM_ACTIONS: usize = 16;

/// An operator family whose slot an action can change.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Selection = 0,
    Crossover = 1,
    Mutation = 2,
    Replacement = 3,
}

impl Component {
    pub const ALL: [Component; 4] = [
        Component::Selection,
        Component::Crossover,
        Component::Mutation,
        Component::Replacement,
    ];
}

/// The active slot of every operator family.
///
/// Each slot is in `0..4`, which the constructors and deserialization enforce.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawStrategyState")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StrategyState {
    selection: u8,
    crossover: u8,
    mutation: u8,
    replacement: u8,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawStrategyState {
    selection: u8,
    crossover: u8,
    mutation: u8,
    replacement: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<RawStrategyState> for StrategyState {
    type Error = SolverError;

    fn try_from(raw: RawStrategyState) -> Result<Self> {
        StrategyState::new(raw.selection, raw.crossover, raw.mutation, raw.replacement)
    }
}

impl StrategyState {
    /// # Errors
    ///
    /// Returns a configuration error if any slot is 4 or more.
    pub fn new(selection: u8, crossover: u8, mutation: u8, replacement: u8) -> Result<Self> {
        for (component, slot) in Component::ALL
            .iter()
            .zip([selection, crossover, mutation, replacement])
        {
            if slot as usize >= SLOTS_PER_FAMILY {
                return Err(SolverError::Configuration(format!(
                    "Slot {} out of range for {:?}; expected 0..{}",
                    slot, component, SLOTS_PER_FAMILY
                )));
            }
        }

        Ok(Self {
            selection,
            crossover,
            mutation,
            replacement,
        })
    }

    pub fn selection(&self) -> u8 {
        self.selection
    }

    pub fn crossover(&self) -> u8 {
        self.crossover
    }

    pub fn mutation(&self) -> u8 {
        self.mutation
    }

    pub fn replacement(&self) -> u8 {
        self.replacement
    }

    pub fn slot(&self, component: Component) -> u8 {
        match component {
            Component::Selection => self.selection,
            Component::Crossover => self.crossover,
            Component::Mutation => self.mutation,
            Component::Replacement => self.replacement,
        }
    }

    /// Row of this state in the Q-table: `sel * 64 + cross * 16 + mut * 4 + repl`.
    pub fn index(&self) -> usize {
        self.selection as usize * 64
            + self.crossover as usize * 16
            + self.mutation as usize * 4
            + self.replacement as usize
    }

    /// # Errors
    ///
    /// Returns a configuration error if `index >= 256`.
    pub fn from_index(index: usize) -> Result<Self> {
        if index >= NUM_STATES {
            return Err(SolverError::Configuration(format!(
                "State index {} out of range; expected 0..{}",
                index, NUM_STATES
            )));
        }

        Ok(Self {
            selection: (index / 64) as u8,
            crossover: (index / 16 % 4) as u8,
            mutation: (index / 4 % 4) as u8,
            replacement: (index % 4) as u8,
        })
    }

    /// The state reached by taking `action`: exactly one family's slot is replaced.
    pub fn apply(self, action: Action) -> Self {
        let mut next = self;
        match action.component {
            Component::Selection => next.selection = action.slot,
            Component::Crossover => next.crossover = action.slot,
            Component::Mutation => next.mutation = action.slot,
            Component::Replacement => next.replacement = action.slot,
        }
        next
    }
}

impl fmt::Display for StrategyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.selection, self.crossover, self.mutation, self.replacement
        )
    }
}

/// Switch one family to another slot.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawAction")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    component: Component,
    slot: u8,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawAction {
    component: Component,
    slot: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAction> for Action {
    type Error = SolverError;

    fn try_from(raw: RawAction) -> Result<Self> {
        Action::new(raw.component, raw.slot)
    }
}

impl Action {
    /// # Errors
    ///
    /// Returns a configuration error if `slot` is 4 or more.
    pub fn new(component: Component, slot: u8) -> Result<Self> {
        if slot as usize >= SLOTS_PER_FAMILY {
            return Err(SolverError::Configuration(format!(
                "Slot {} out of range for {:?}; expected 0..{}",
                slot, component, SLOTS_PER_FAMILY
            )));
        }
        Ok(Self { component, slot })
    }

    pub fn component(&self) -> Component {
        self.component
    }

    pub fn slot(&self) -> u8 {
        self.slot
    }

    /// Column of this action in the Q-table: `component * 4 + slot`.
    pub fn index(&self) -> usize {
        self.component as usize * SLOTS_PER_FAMILY + self.slot as usize
    }

    /// # Errors
    ///
    /// Returns a configuration error if `index >= 16`.
    pub fn from_index(index: usize) -> Result<Self> {
        if index >= NUM_ACTIONS {
            return Err(SolverError::Configuration(format!(
                "Action index {} out of range; expected 0..{}",
                index, NUM_ACTIONS
            )));
        }

        Ok(Self {
            component: Component::ALL[index / SLOTS_PER_FAMILY],
            slot: (index % SLOTS_PER_FAMILY) as u8,
        })
    }

    /// Whether taking this action from `state` leaves it unchanged.
    pub fn is_noop(&self, state: StrategyState) -> bool {
        state.slot(self.component) == self.slot
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} -> {}", self.component, self.slot)
    }
}
