use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SolverError};
use crate::population::{Individual, PickingPlan};
use crate::rng::RandomNumberGenerator;

/// Strategies for combining two picking plans into one child.
///
/// The child always inherits the route of the first parent.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossover {
    /// Head of the first parent, tail of the second, split at a random cut in `1..len`.
    SinglePoint,
    /// The second parent's genes between two random cuts, the first parent's elsewhere.
    TwoPoint,
    /// Every gene from either parent with equal probability.
    Uniform,
    /// `round(alpha * g1 + (1 - alpha) * g2)` per gene, one `alpha ~ U(0, 1)` per child.
    Arithmetic,
}

impl Crossover {
    pub fn name(&self) -> &'static str {
        match self {
            Crossover::SinglePoint => "single_point",
            Crossover::TwoPoint => "two_point",
            Crossover::Uniform => "uniform",
            Crossover::Arithmetic => "arithmetic",
        }
    }

    /// Creates a child from two parents.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the parents' plans differ in length.
    pub fn crossover(
        &self,
        first: &Individual,
        second: &Individual,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Individual> {
        let a = &first.plan;
        let b = &second.plan;

        if a.len() != b.len() {
            return Err(SolverError::Configuration(format!(
                "Parent plans differ in length: {} vs {}",
                a.len(),
                b.len()
            )));
        }

        let plan: PickingPlan = match self {
            Crossover::SinglePoint => {
                if a.len() < 2 {
                    a.clone()
                } else {
                    let cut = rng.range_inclusive(1, a.len() - 1);
                    a[..cut].iter().chain(&b[cut..]).copied().collect()
                }
            }
            Crossover::TwoPoint => {
                if a.is_empty() {
                    a.clone()
                } else {
                    let x = rng.index(a.len());
                    let y = rng.index(a.len());
                    let (start, end) = (x.min(y), x.max(y));
                    let mut plan = a.clone();
                    plan[start..end].copy_from_slice(&b[start..end]);
                    plan
                }
            }
            Crossover::Uniform => a
                .iter()
                .zip(b)
                .map(|(&g1, &g2)| if rng.chance(0.5) { g1 } else { g2 })
                .collect(),
            Crossover::Arithmetic => {
                let alpha = rng.uniform();
                a.iter()
                    .zip(b)
                    .map(|(&g1, &g2)| {
                        let blended = alpha * f64::from(g1) + (1.0 - alpha) * f64::from(g2);
                        u8::from(blended.round() >= 1.0)
                    })
                    .collect()
            }
        };

        Ok(Individual::new(first.route.clone(), plan))
    }
}

impl fmt::Display for Crossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Crossover {
    type Err = SolverError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "single_point" => Ok(Crossover::SinglePoint),
            "two_point" => Ok(Crossover::TwoPoint),
            "uniform" => Ok(Crossover::Uniform),
            "arithmetic" => Ok(Crossover::Arithmetic),
            _ => Err(SolverError::StrategyNotFound {
                family: "crossover",
                name: name.to_string(),
            }),
        }
    }
}
