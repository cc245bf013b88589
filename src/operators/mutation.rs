use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SolverError};
use crate::population::Individual;
use crate::rng::RandomNumberGenerator;

const DEFAULT_GAUSSIAN_SIGMA: f64 = 0.1;

/// Strategies for perturbing a picking plan in place.
///
/// Every strategy except `BitFlip` first fires as a whole with probability `rate`.
/// `BitFlip` and `Gaussian` additionally gate each gene with probability `rate`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mutation {
    /// Flips each gene independently.
    BitFlip,
    /// Swaps two distinct positions.
    Swap,
    /// Shuffles a random contiguous range.
    Scramble,
    /// Reverses a random contiguous range.
    Inversion,
    /// Sets one random gene to a random bit.
    Reset,
    /// Flips every gene in a random contiguous range.
    BlockFlip,
    /// Adds `N(0, sigma)` noise to genes, clamps to `[0, 1]` and rounds back to a bit.
    Gaussian { sigma: f64 },
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::BitFlip => "bit_flip",
            Mutation::Swap => "swap",
            Mutation::Scramble => "scramble",
            Mutation::Inversion => "inversion",
            Mutation::Reset => "reset",
            Mutation::BlockFlip => "block_flip",
            Mutation::Gaussian { .. } => "gaussian",
        }
    }

    /// Checks the strategy's parameters.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `Gaussian` has a negative or non-finite `sigma`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Mutation::Gaussian { sigma } if !sigma.is_finite() || sigma < 0.0 => {
                Err(SolverError::Configuration(format!(
                    "Gaussian sigma must be finite and non-negative, got {}",
                    sigma
                )))
            }
            _ => Ok(()),
        }
    }

    /// Mutates `individual` in place. The route is never touched.
    ///
    /// Plans too short for a strategy (fewer than two genes for range and swap based
    /// strategies) are left as they are.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `Gaussian` has an invalid `sigma`, whether or not
    /// the mutation fires.
    pub fn mutate(
        &self,
        individual: &mut Individual,
        rate: f64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        self.validate()?;
        let plan = &mut individual.plan;

        if let Mutation::BitFlip = self {
            for gene in plan.iter_mut() {
                if rng.chance(rate) {
                    *gene = 1 - *gene;
                }
            }
            return Ok(());
        }

        if !rng.chance(rate) {
            return Ok(());
        }

        match *self {
            Mutation::BitFlip => {}
            Mutation::Swap => {
                if plan.len() >= 2 {
                    let picked = rng.distinct_indices(plan.len(), 2);
                    plan.swap(picked[0], picked[1]);
                }
            }
            Mutation::Scramble => {
                if let Some((start, end)) = random_range(plan.len(), rng) {
                    rng.shuffle(&mut plan[start..end]);
                }
            }
            Mutation::Inversion => {
                if let Some((start, end)) = random_range(plan.len(), rng) {
                    plan[start..end].reverse();
                }
            }
            Mutation::Reset => {
                if !plan.is_empty() {
                    let idx = rng.index(plan.len());
                    plan[idx] = u8::from(rng.chance(0.5));
                }
            }
            Mutation::BlockFlip => {
                if let Some((start, end)) = random_range(plan.len(), rng) {
                    for gene in &mut plan[start..end] {
                        *gene = 1 - *gene;
                    }
                }
            }
            Mutation::Gaussian { sigma } => {
                for gene in plan.iter_mut() {
                    if rng.chance(rate) {
                        let perturbed = f64::from(*gene) + rng.gaussian(0.0, sigma)?;
                        *gene = u8::from(perturbed.clamp(0.0, 1.0).round() >= 1.0);
                    }
                }
            }
        }

        Ok(())
    }
}

/// A random non-empty range `start..end` with `start <= len - 2` and `end <= len`.
fn random_range(len: usize, rng: &mut RandomNumberGenerator) -> Option<(usize, usize)> {
    if len < 2 {
        return None;
    }
    let start = rng.range_inclusive(0, len - 2);
    let end = rng.range_inclusive(start + 1, len);
    Some((start, end))
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mutation {
    type Err = SolverError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "bit_flip" => Ok(Mutation::BitFlip),
            "swap" => Ok(Mutation::Swap),
            "scramble" => Ok(Mutation::Scramble),
            "inversion" => Ok(Mutation::Inversion),
            "reset" => Ok(Mutation::Reset),
            "block_flip" => Ok(Mutation::BlockFlip),
            "gaussian" => Ok(Mutation::Gaussian {
                sigma: DEFAULT_GAUSSIAN_SIGMA,
            }),
            _ => Err(SolverError::StrategyNotFound {
                family: "mutation",
                name: name.to_string(),
            }),
        }
    }
}
