use crate::fitness::FitnessScore;
use crate::population::Individual;

/// An objective that scores individuals.
///
/// Implementations must be pure: the same individual always gets the same score.
pub trait Challenge {
    fn score(&self, individual: &Individual) -> FitnessScore;
}
