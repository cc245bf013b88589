//! # Problem Model
//!
//! A Traveling Thief Problem instance: a set of cities visited on a closed tour, a set
//! of items that may be picked up along the way, a knapsack capacity, and the speed and
//! rent parameters that turn the carried weight into a travel-time cost.
//!
//! ## Example
//!
//! ```rust
//! use ttp_qga::problem::{City, Item, ProblemInstance};
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
//! assert_eq!(instance.distance(0, 1), 10.0);
//! assert_eq!(instance.speed(0.0), 1.0);
//! assert_eq!(instance.speed(10.0), 0.1);
//! ```

pub mod route;

use crate::error::{Result, SolverError};

pub use route::generate_route;

/// A city on the tour, given by its 2D coordinates.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub x: f64,
    pub y: f64,
}

impl City {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another city.
    pub fn euclidean(&self, other: &City) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An item that can be placed in the knapsack.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub weight: f64,
    pub value: f64,
    /// The city the item is stored at. Items without a city are available from the
    /// start of the tour.
    pub city: Option<usize>,
}

impl Item {
    /// Creates an item that is available from the start of the tour.
    pub fn new(weight: f64, value: f64) -> Self {
        Self {
            weight,
            value,
            city: None,
        }
    }

    /// Creates an item stored at the given city.
    pub fn at_city(weight: f64, value: f64, city: usize) -> Self {
        Self {
            weight,
            value,
            city: Some(city),
        }
    }
}

/// How a position in a picking plan is mapped to an item.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemIndexing {
    /// Position `i` refers to item `i`, picked up when the route reaches the item's city.
    #[default]
    Direct,
    /// Position `i` refers to item `route[i]`, picked up at route step `i`.
    RouteOrder,
}

/// A validated Traveling Thief Problem instance.
///
/// Deserialization goes through [`ProblemInstance::new`], so decoded instances are
/// validated too.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawProblemInstance")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemInstance {
    cities: Vec<City>,
    items: Vec<Item>,
    capacity: f64,
    min_speed: f64,
    max_speed: f64,
    renting_ratio: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawProblemInstance {
    cities: Vec<City>,
    items: Vec<Item>,
    capacity: f64,
    min_speed: f64,
    max_speed: f64,
    renting_ratio: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawProblemInstance> for ProblemInstance {
    type Error = SolverError;

    fn try_from(raw: RawProblemInstance) -> Result<Self> {
        ProblemInstance::new(
            raw.cities,
            raw.items,
            raw.capacity,
            raw.min_speed,
            raw.max_speed,
            raw.renting_ratio,
        )
    }
}

impl ProblemInstance {
    /// Creates a new instance after checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns `SolverError::InvalidInstance` if:
    /// - there are fewer than two cities
    /// - the capacity is not strictly positive
    /// - the speeds do not satisfy `0 < min_speed <= max_speed`
    /// - the renting ratio is negative
    /// - an item has a negative weight or value, or refers to a city that does not exist
    /// - any number is not finite
    pub fn new(
        cities: Vec<City>,
        items: Vec<Item>,
        capacity: f64,
        min_speed: f64,
        max_speed: f64,
        renting_ratio: f64,
    ) -> Result<Self> {
        if cities.len() < 2 {
            return Err(SolverError::InvalidInstance(format!(
                "At least two cities are required, got {}",
                cities.len()
            )));
        }

        if cities.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(SolverError::InvalidInstance(
                "City coordinates must be finite".to_string(),
            ));
        }

        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(SolverError::InvalidInstance(format!(
                "Capacity must be positive, got {}",
                capacity
            )));
        }

        if !min_speed.is_finite() || !max_speed.is_finite() || min_speed <= 0.0 {
            return Err(SolverError::InvalidInstance(format!(
                "Speeds must be finite and positive, got min {} and max {}",
                min_speed, max_speed
            )));
        }

        if min_speed > max_speed {
            return Err(SolverError::InvalidInstance(format!(
                "Minimum speed {} exceeds maximum speed {}",
                min_speed, max_speed
            )));
        }

        if !renting_ratio.is_finite() || renting_ratio < 0.0 {
            return Err(SolverError::InvalidInstance(format!(
                "Renting ratio must be non-negative, got {}",
                renting_ratio
            )));
        }

        for (idx, item) in items.iter().enumerate() {
            if !item.weight.is_finite() || item.weight < 0.0 {
                return Err(SolverError::InvalidInstance(format!(
                    "Item {} has invalid weight {}",
                    idx, item.weight
                )));
            }
            if !item.value.is_finite() || item.value < 0.0 {
                return Err(SolverError::InvalidInstance(format!(
                    "Item {} has invalid value {}",
                    idx, item.value
                )));
            }
            if let Some(city) = item.city {
                if city >= cities.len() {
                    return Err(SolverError::InvalidInstance(format!(
                        "Item {} refers to city {} but only {} cities exist",
                        idx,
                        city,
                        cities.len()
                    )));
                }
            }
        }

        Ok(Self {
            cities,
            items,
            capacity,
            min_speed,
            max_speed,
            renting_ratio,
        })
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn num_cities(&self) -> usize {
        self.cities.len()
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn min_speed(&self) -> f64 {
        self.min_speed
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn renting_ratio(&self) -> f64 {
        self.renting_ratio
    }

    /// Travel cost between two cities: the Euclidean distance rounded up, as in the
    /// standard TTP benchmarks.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.cities[from].euclidean(&self.cities[to]).ceil()
    }

    /// Travel speed when carrying `current_weight`.
    ///
    /// Speed falls linearly from `max_speed` (empty) to `min_speed` (full) and never
    /// drops below `min_speed`, even when overloaded.
    pub fn speed(&self, current_weight: f64) -> f64 {
        let weight_ratio = current_weight / self.capacity;
        (self.max_speed - weight_ratio * (self.max_speed - self.min_speed)).max(self.min_speed)
    }

    /// Total length of the closed tour, including the leg back to the first city.
    pub fn tour_length(&self, route: &[usize]) -> f64 {
        if route.len() < 2 {
            return 0.0;
        }
        (0..route.len())
            .map(|k| self.distance(route[k], route[(k + 1) % route.len()]))
            .sum()
    }

    /// The item referred to by picking-plan position `position`.
    ///
    /// Under `ItemIndexing::RouteOrder` a position past the end of the route, or a route
    /// entry with no matching item, refers to nothing.
    pub fn item_at(
        &self,
        position: usize,
        route: &[usize],
        indexing: ItemIndexing,
    ) -> Option<&Item> {
        match indexing {
            ItemIndexing::Direct => self.items.get(position),
            ItemIndexing::RouteOrder => route.get(position).and_then(|&i| self.items.get(i)),
        }
    }

    /// Weight of the item at picking-plan position `position`, zero if there is none.
    pub fn weight_at(&self, position: usize, route: &[usize], indexing: ItemIndexing) -> f64 {
        self.item_at(position, route, indexing)
            .map_or(0.0, |item| item.weight)
    }
}
