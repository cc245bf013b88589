//! # Capacity Repair
//!
//! Enforces the knapsack constraint on a picking plan by greedily dropping the heaviest
//! selected items until the carried weight fits. The repair is deterministic, leaves
//! feasible plans untouched, and is idempotent.

use std::fmt::{self, Display};

use super::{Individual, PickingPlan};
use crate::problem::{ItemIndexing, ProblemInstance};

/// Represents a violation of a constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    constraint_name: String,
    description: String,
    /// How far past the limit the individual is.
    severity: f64,
}

impl ConstraintViolation {
    pub fn new<S: Into<String>, D: Into<String>>(
        constraint_name: S,
        description: D,
        severity: f64,
    ) -> Self {
        Self {
            constraint_name: constraint_name.into(),
            description: description.into(),
            severity,
        }
    }

    pub fn constraint_name(&self) -> &str {
        &self.constraint_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn severity(&self) -> f64 {
        self.severity
    }
}

impl Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Constraint '{}' violated: {} (severity: {})",
            self.constraint_name, self.description, self.severity
        )
    }
}

/// The knapsack capacity constraint of a problem instance.
#[derive(Debug, Clone, Copy)]
pub struct CapacityConstraint<'a> {
    instance: &'a ProblemInstance,
    indexing: ItemIndexing,
}

impl<'a> CapacityConstraint<'a> {
    pub fn new(instance: &'a ProblemInstance, indexing: ItemIndexing) -> Self {
        Self { instance, indexing }
    }

    /// Total weight of the items the individual selects.
    pub fn selected_weight(&self, individual: &Individual) -> f64 {
        selected_weight(&individual.plan, self.instance, &individual.route, self.indexing)
    }

    /// Returns the violation, if the individual carries more than the capacity.
    pub fn check(&self, individual: &Individual) -> Option<ConstraintViolation> {
        let weight = self.selected_weight(individual);
        let capacity = self.instance.capacity();

        (weight > capacity).then(|| {
            ConstraintViolation::new(
                "Capacity",
                format!(
                    "selected weight {} exceeds knapsack capacity {}",
                    weight, capacity
                ),
                weight - capacity,
            )
        })
    }

    /// Repairs the individual in place and returns its weight after repair.
    pub fn repair(&self, individual: &mut Individual) -> f64 {
        let plan = std::mem::take(&mut individual.plan);
        let (plan, weight) = repair(plan, self.instance, &individual.route, self.indexing);
        individual.plan = plan;
        weight
    }
}

fn selected_weight(
    plan: &[u8],
    instance: &ProblemInstance,
    route: &[usize],
    indexing: ItemIndexing,
) -> f64 {
    plan.iter()
        .enumerate()
        .filter(|(_, &gene)| gene != 0)
        .map(|(position, _)| instance.weight_at(position, route, indexing))
        .sum()
}

/// Drops the heaviest selected items until the plan fits the knapsack.
///
/// Returns the repaired plan and its total selected weight, which is never above the
/// capacity. Among equally heavy items the one at the lower position is dropped first.
pub fn repair(
    mut plan: PickingPlan,
    instance: &ProblemInstance,
    route: &[usize],
    indexing: ItemIndexing,
) -> (PickingPlan, f64) {
    let capacity = instance.capacity();
    let mut total = selected_weight(&plan, instance, route, indexing);
    if total <= capacity {
        return (plan, total);
    }

    let weights: Vec<f64> = (0..plan.len())
        .map(|position| instance.weight_at(position, route, indexing))
        .collect();

    let mut heaviest_first: Vec<usize> = (0..plan.len()).filter(|&p| plan[p] != 0).collect();
    heaviest_first.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));

    let mut candidates = heaviest_first.into_iter();
    while total > capacity {
        let Some(position) = candidates.next() else {
            break;
        };
        plan[position] = 0;
        total -= weights[position];

        if total <= capacity {
            // Resync so the reported weight matches a fresh sum over the plan.
            total = selected_weight(&plan, instance, route, indexing);
        }
    }

    (plan, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{City, Item};
    use std::sync::Arc;

    fn instance(weights: &[f64], capacity: f64) -> ProblemInstance {
        let items = weights.iter().map(|&w| Item::new(w, 1.0)).collect();
        ProblemInstance::new(
            vec![City::new(0.0, 0.0), City::new(0.0, 10.0)],
            items,
            capacity,
            0.1,
            1.0,
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn test_repair_drops_heaviest_first() {
        let instance = instance(&[4.0, 9.0, 3.0, 6.0], 10.0);
        let (plan, weight) = repair(vec![1, 1, 1, 1], &instance, &[0, 1], ItemIndexing::Direct);

        // 22 -> drop 9 -> 13 -> drop 6 -> 7
        assert_eq!(plan, vec![1, 0, 1, 0]);
        assert_eq!(weight, 7.0);
    }

    #[test]
    fn test_repair_feasible_plan_is_untouched() {
        let instance = instance(&[4.0, 9.0, 3.0], 20.0);
        let (plan, weight) = repair(vec![1, 0, 1], &instance, &[0, 1], ItemIndexing::Direct);

        assert_eq!(plan, vec![1, 0, 1]);
        assert_eq!(weight, 7.0);

        let (plan, weight) = repair(vec![], &instance, &[0, 1], ItemIndexing::Direct);
        assert!(plan.is_empty());
        assert_eq!(weight, 0.0);
    }

    #[test]
    fn test_repair_route_order_indexing() {
        // Position 0 maps to item route[0] = 1 (weight 9).
        let instance = instance(&[4.0, 9.0], 5.0);
        let (plan, weight) =
            repair(vec![1, 1], &instance, &[1, 0], ItemIndexing::RouteOrder);

        assert_eq!(plan, vec![0, 1]);
        assert_eq!(weight, 4.0);
    }

    #[test]
    fn test_capacity_constraint_check_and_repair() {
        let instance = instance(&[15.0], 10.0);
        let constraint = CapacityConstraint::new(&instance, ItemIndexing::Direct);
        let mut individual = Individual::new(Arc::from(vec![0, 1]), vec![1]);

        let violation = constraint.check(&individual).unwrap();
        assert_eq!(violation.constraint_name(), "Capacity");
        assert_eq!(violation.severity(), 5.0);

        assert_eq!(constraint.repair(&mut individual), 0.0);
        assert_eq!(individual.plan, vec![0]);
        assert!(constraint.check(&individual).is_none());
    }
}
