//! Dense per-sequence vectors: loss vectors, realization plans and
//! behavioral strategy profiles.
//!
//! Sequence ids are contiguous, so every vector here is a plain `Vec<f64>`
//! sized to the treeplex's sequence count. A sequence with no explicit value
//! reads as 0; a fresh realization plan has 1.0 on the empty sequence.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::sequence::treeplex::{InfoSetId, Sequence, Treeplex};

/// Tolerance for flow conservation between a father sequence and its children.
pub const FLOW_TOLERANCE: f64 = 1e-7;

/// Per-sequence scalar, typically utility after fixing the other player's plan.
///
/// Despite the name (kept from the regret-minimization literature), the
/// engine maximizes these values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LossVector {
    values: Vec<f64>,
}

impl LossVector {
    /// All-zero vector over `len` sequences.
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    /// Wrap explicit values, one per sequence.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of sequences covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector covers no sequences.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `sequence`, 0 if out of range.
    pub fn get(&self, sequence: Sequence) -> f64 {
        self.values.get(sequence).copied().unwrap_or(0.0)
    }

    /// Raw values.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Inner product with a realization plan.
    pub fn dot(&self, plan: &RealizationPlan) -> f64 {
        self.values
            .iter()
            .zip(plan.as_slice())
            .map(|(&loss, &prob)| loss * prob)
            .sum()
    }
}

impl Index<Sequence> for LossVector {
    type Output = f64;

    fn index(&self, sequence: Sequence) -> &f64 {
        &self.values[sequence]
    }
}

impl IndexMut<Sequence> for LossVector {
    fn index_mut(&mut self, sequence: Sequence) -> &mut f64 {
        &mut self.values[sequence]
    }
}

impl From<Vec<f64>> for LossVector {
    fn from(values: Vec<f64>) -> Self {
        Self::from_values(values)
    }
}

/// Probability of reaching each sequence under some strategy.
///
/// A valid plan has `plan[empty] == 1`, non-negative entries, and for every
/// non-root infoset the children sum to the father's probability.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RealizationPlan {
    values: Vec<f64>,
}

impl RealizationPlan {
    /// Plan reaching only the empty sequence.
    pub fn new(treeplex: &Treeplex) -> Self {
        let mut values = vec![0.0; treeplex.sequence_count()];
        values[treeplex.empty_sequence()] = 1.0;
        Self { values }
    }

    /// Plan of the uniform behavioral strategy.
    pub fn uniform(treeplex: &Treeplex) -> Self {
        BehavioralStrategyProfile::uniform(treeplex).realization_plan(treeplex)
    }

    /// Wrap explicit values, one per sequence. Not validated.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of sequences covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the plan covers no sequences.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reach probability of `sequence`, 0 if out of range.
    pub fn get(&self, sequence: Sequence) -> f64 {
        self.values.get(sequence).copied().unwrap_or(0.0)
    }

    /// Raw values.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// `(sequence, probability)` pairs in ascending sequence order.
    pub fn iter(&self) -> impl Iterator<Item = (Sequence, f64)> + '_ {
        self.values.iter().copied().enumerate()
    }

    /// Check the realization-plan invariants against `treeplex`.
    ///
    /// Reports the first violation found: length, then the empty sequence,
    /// then negative entries in ascending sequence order, then flow
    /// conservation in ascending infoset order.
    pub fn validate(&self, treeplex: &Treeplex) -> Result<(), PlanError> {
        if self.values.len() != treeplex.sequence_count() {
            return Err(PlanError::Length {
                expected: treeplex.sequence_count(),
                actual: self.values.len(),
            });
        }

        let empty = treeplex.empty_sequence();
        if self.values[empty] != 1.0 {
            return Err(PlanError::RootProbability {
                sequence: empty,
                value: self.values[empty],
            });
        }

        // `!(v >= 0.0)` also catches NaN
        if let Some((sequence, value)) = self.iter().find(|&(_, v)| !(v >= 0.0)) {
            return Err(PlanError::Negative { sequence, value });
        }

        for infoset in treeplex.information_sets() {
            let Some(father) = infoset.father() else {
                continue;
            };
            let children_sum: f64 = infoset.children().map(|c| self.values[c]).sum();
            let father_probability = self.values[father];
            if !((children_sum - father_probability).abs() <= FLOW_TOLERANCE) {
                return Err(PlanError::FlowConservation {
                    infoset: infoset.id(),
                    father,
                    father_probability,
                    children_sum,
                });
            }
        }

        Ok(())
    }

    /// Whether [`validate`](Self::validate) passes.
    pub fn is_valid(&self, treeplex: &Treeplex) -> bool {
        self.validate(treeplex).is_ok()
    }
}

impl Index<Sequence> for RealizationPlan {
    type Output = f64;

    fn index(&self, sequence: Sequence) -> &f64 {
        &self.values[sequence]
    }
}

impl IndexMut<Sequence> for RealizationPlan {
    fn index_mut(&mut self, sequence: Sequence) -> &mut f64 {
        &mut self.values[sequence]
    }
}

/// One action distribution per infoset.
///
/// Each sequence belongs to exactly one infoset, so the distributions are
/// packed into one vector indexed by sequence: `probability(s)` is the
/// probability of choosing `s` at the infoset owning it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralStrategyProfile {
    probabilities: Vec<f64>,
}

impl BehavioralStrategyProfile {
    /// Profile with every action at probability 0, except the empty sequence.
    ///
    /// Not a valid profile until every infoset has a distribution set.
    pub fn zeros(treeplex: &Treeplex) -> Self {
        let mut probabilities = vec![0.0; treeplex.sequence_count()];
        probabilities[treeplex.empty_sequence()] = 1.0;
        Self { probabilities }
    }

    /// Uniform distribution at every infoset.
    pub fn uniform(treeplex: &Treeplex) -> Self {
        let mut probabilities = vec![0.0; treeplex.sequence_count()];
        for infoset in treeplex.information_sets() {
            let p = 1.0 / infoset.num_actions() as f64;
            probabilities[infoset.children()].fill(p);
        }
        Self { probabilities }
    }

    /// Number of sequences covered.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Whether the profile covers no sequences.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Probability of choosing `sequence` at its own infoset.
    pub fn probability(&self, sequence: Sequence) -> f64 {
        self.probabilities[sequence]
    }

    /// The distribution at `infoset`, in child-sequence order.
    pub fn distribution(&self, treeplex: &Treeplex, infoset: InfoSetId) -> &[f64] {
        &self.probabilities[treeplex.information_sets()[infoset].children()]
    }

    /// Replace the distribution at `infoset`.
    ///
    /// # Panics
    /// If `distribution` does not have one entry per action.
    pub fn set_distribution(&mut self, treeplex: &Treeplex, infoset: InfoSetId, distribution: &[f64]) {
        let range = treeplex.information_sets()[infoset].children();
        assert_eq!(
            range.clone().count(),
            distribution.len(),
            "distribution size mismatch at infoset {}",
            infoset
        );
        self.probabilities[range].copy_from_slice(distribution);
    }

    /// Top-down pass: `plan[child] = probability(child) * plan[father]`.
    pub fn realization_plan(&self, treeplex: &Treeplex) -> RealizationPlan {
        let mut plan = RealizationPlan::new(treeplex);

        for infoset in treeplex.ordered_information_sets() {
            let Some(father) = infoset.father() else {
                continue;
            };
            let reach = plan[father];
            for child in infoset.children() {
                plan[child] = self.probabilities[child] * reach;
            }
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_profile(treeplex: &Treeplex, rng: &mut StdRng) -> BehavioralStrategyProfile {
        let mut profile = BehavioralStrategyProfile::zeros(treeplex);
        for infoset in treeplex.information_sets() {
            let weights: Vec<f64> = infoset.children().map(|_| rng.gen::<f64>() + 1e-3).collect();
            let total: f64 = weights.iter().sum();
            let distribution: Vec<f64> = weights.iter().map(|w| w / total).collect();
            profile.set_distribution(treeplex, infoset.id(), &distribution);
        }
        profile
    }

    #[test]
    fn test_uniform_plan() {
        let treeplex = fixtures::two_level_treeplex();
        let plan = RealizationPlan::uniform(&treeplex);

        assert_eq!(plan[0], 1.0);
        assert_eq!(plan[1], 0.5);
        assert_eq!(plan[3], 0.25);
        assert_abs_diff_eq!(plan[5], 0.5 / 3.0, epsilon = 1e-12);
        assert_eq!(plan[8], 0.125);
        assert!(plan.is_valid(&treeplex));
    }

    #[test]
    fn test_plan_is_product_along_path() {
        let treeplex = fixtures::two_level_treeplex();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let profile = random_profile(&treeplex, &mut rng);
            let plan = profile.realization_plan(&treeplex);

            for sequence in 0..treeplex.sequence_count() {
                let mut expected = 1.0;
                let mut current = sequence;
                while let Some(father) = treeplex.owner_of(current).unwrap().father() {
                    expected *= profile.probability(current);
                    current = father;
                }
                assert_abs_diff_eq!(plan[sequence], expected, epsilon = 1e-12);
            }
            plan.validate(&treeplex).unwrap();
        }
    }

    #[test]
    fn test_distribution_roundtrip() {
        let treeplex = fixtures::two_level_treeplex();
        let mut profile = BehavioralStrategyProfile::uniform(&treeplex);
        profile.set_distribution(&treeplex, 3, &[0.2, 0.3, 0.5]);

        assert_eq!(profile.distribution(&treeplex, 3), &[0.2, 0.3, 0.5]);
        assert_eq!(profile.probability(6), 0.3);
        assert_eq!(profile.distribution(&treeplex, 0), &[1.0]);
    }

    #[test]
    #[should_panic(expected = "distribution size mismatch")]
    fn test_set_distribution_wrong_size() {
        let treeplex = fixtures::two_level_treeplex();
        let mut profile = BehavioralStrategyProfile::uniform(&treeplex);
        profile.set_distribution(&treeplex, 1, &[1.0]);
    }

    #[test]
    fn test_validate_root_probability() {
        let treeplex = fixtures::two_level_treeplex();
        let mut plan = RealizationPlan::uniform(&treeplex);
        plan[0] = 0.5;
        assert_eq!(
            plan.validate(&treeplex),
            Err(PlanError::RootProbability {
                sequence: 0,
                value: 0.5
            })
        );
    }

    #[test]
    fn test_validate_negative() {
        let treeplex = fixtures::two_level_treeplex();
        let mut plan = RealizationPlan::uniform(&treeplex);
        plan[9] = -0.125;
        plan[8] = 0.375;
        assert!(matches!(
            plan.validate(&treeplex),
            Err(PlanError::Negative { sequence: 9, .. })
        ));

        plan[9] = f64::NAN;
        assert!(matches!(
            plan.validate(&treeplex),
            Err(PlanError::Negative { sequence: 9, .. })
        ));
    }

    #[test]
    fn test_validate_flow() {
        let treeplex = fixtures::two_level_treeplex();
        let mut plan = RealizationPlan::uniform(&treeplex);
        plan[4] = 0.3;
        assert!(matches!(
            plan.validate(&treeplex),
            Err(PlanError::FlowConservation {
                infoset: 2,
                father: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_tolerance() {
        let treeplex = fixtures::two_level_treeplex();
        let mut plan = RealizationPlan::uniform(&treeplex);
        plan[8] += 1e-9;
        assert!(plan.is_valid(&treeplex));
    }

    #[test]
    fn test_validate_length() {
        let treeplex = fixtures::two_level_treeplex();
        let plan = RealizationPlan::from_values(vec![1.0]);
        assert_eq!(
            plan.validate(&treeplex),
            Err(PlanError::Length {
                expected: 10,
                actual: 1
            })
        );
    }

    #[test]
    fn test_loss_vector_defaults() {
        let mut loss = LossVector::zeros(3);
        loss[1] = 2.0;

        assert_eq!(loss.get(1), 2.0);
        assert_eq!(loss.get(2), 0.0);
        assert_eq!(loss.get(99), 0.0);

        let plan = RealizationPlan::from_values(vec![1.0, 0.25, 0.75]);
        assert_eq!(loss.dot(&plan), 0.5);
    }
}
