//! Regret minimizers.
//!
//! [`RegretMinimizer`] runs regret matching on a single infoset's simplex.
//! [`TreeplexRegretMinimizer`] composes one of those per infoset into a
//! regret minimizer over a whole treeplex: it backs terminal losses up the
//! tree with [`Treeplex::subtree_utility`] and hands every infoset the
//! counterfactual value of each of its actions.

use crate::error::SolverError;
use crate::sequence::{BehavioralStrategyProfile, InfoSetId, LossVector, Sequence, Treeplex};

/// Regret matching over the actions of one infoset.
///
/// Cumulative regrets are floored at zero after every update, so they are
/// never negative.
#[derive(Debug, Clone)]
pub struct RegretMinimizer {
    infoset: InfoSetId,
    first: Sequence,
    regrets: Vec<f64>,
}

impl RegretMinimizer {
    /// Minimizer for `num_actions` actions whose first sequence is `first`.
    pub fn new(infoset: InfoSetId, first: Sequence, num_actions: usize) -> Self {
        Self {
            infoset,
            first,
            regrets: vec![0.0; num_actions],
        }
    }

    /// Infoset this minimizer belongs to.
    pub fn infoset(&self) -> InfoSetId {
        self.infoset
    }

    /// Sequence id of the first action.
    pub fn first_sequence(&self) -> Sequence {
        self.first
    }

    /// Number of actions.
    pub fn num_actions(&self) -> usize {
        self.regrets.len()
    }

    /// Cumulative regret per action.
    pub fn regrets(&self) -> &[f64] {
        &self.regrets
    }

    /// Whether no regret has accumulated yet.
    pub fn is_zero(&self) -> bool {
        self.regrets.iter().all(|&r| r == 0.0)
    }

    /// Largest cumulative regret.
    pub fn max_regret(&self) -> f64 {
        self.regrets.iter().copied().fold(0.0, f64::max)
    }

    /// Current strategy: uniform while no regret has accumulated, otherwise
    /// proportional to cumulative regret.
    pub fn suggest_strategy(&self) -> Result<Vec<f64>, SolverError> {
        let n = self.regrets.len();
        if self.is_zero() {
            return Ok(vec![1.0 / n as f64; n]);
        }

        let sum: f64 = self.regrets.iter().sum();
        if !(sum > 0.0) {
            return Err(SolverError::DegenerateRegret {
                infoset: self.infoset,
                sum,
            });
        }

        Ok(self.regrets.iter().map(|&r| r / sum).collect())
    }

    /// Accumulate the regret of every action against the current strategy.
    ///
    /// `loss` holds one value per action (higher is better):
    ///
    /// ```text
    /// regret[a] = max(0, regret[a] + loss[a] - Σ strategy[b] * loss[b])
    /// ```
    pub fn observe_loss(&mut self, loss: &[f64]) -> Result<(), SolverError> {
        debug_assert_eq!(loss.len(), self.regrets.len());

        let strategy = self.suggest_strategy()?;
        let expected: f64 = strategy.iter().zip(loss).map(|(&p, &l)| p * l).sum();

        for (regret, &l) in self.regrets.iter_mut().zip(loss) {
            *regret = (*regret + l - expected).max(0.0);
        }

        Ok(())
    }
}

/// Sequence-form regret minimizer for one player's treeplex.
///
/// Owns one [`RegretMinimizer`] per infoset, indexed by infoset id.
#[derive(Debug, Clone)]
pub struct TreeplexRegretMinimizer<'a> {
    treeplex: &'a Treeplex,
    minimizers: Vec<RegretMinimizer>,
}

impl<'a> TreeplexRegretMinimizer<'a> {
    /// Fresh minimizer with zero regret everywhere.
    pub fn new(treeplex: &'a Treeplex) -> Self {
        let minimizers = treeplex
            .information_sets()
            .iter()
            .map(|infoset| RegretMinimizer::new(infoset.id(), infoset.first(), infoset.num_actions()))
            .collect();

        Self {
            treeplex,
            minimizers,
        }
    }

    /// The treeplex being played.
    pub fn treeplex(&self) -> &'a Treeplex {
        self.treeplex
    }

    /// Minimizer of one infoset.
    pub fn minimizer(&self, infoset: InfoSetId) -> &RegretMinimizer {
        &self.minimizers[infoset]
    }

    /// Update every infoset with the counterfactual value of its actions.
    ///
    /// The value of action `c` is its own terminal loss plus the expected
    /// value of the subtree below it under the current strategy.
    pub fn observe_loss(&mut self, loss: &LossVector) -> Result<(), SolverError> {
        let strategy = self.suggest_strategy()?;
        let propagated = self.treeplex.subtree_utility(&strategy, loss);

        for (infoset, minimizer) in self.treeplex.information_sets().iter().zip(&mut self.minimizers) {
            let local: Vec<f64> = infoset
                .children()
                .map(|child| loss[child] + propagated[child])
                .collect();
            minimizer.observe_loss(&local)?;
        }

        Ok(())
    }

    /// Current behavioral strategy, assembled from every infoset.
    pub fn suggest_strategy(&self) -> Result<BehavioralStrategyProfile, SolverError> {
        let mut profile = BehavioralStrategyProfile::zeros(self.treeplex);
        for minimizer in &self.minimizers {
            profile.set_distribution(self.treeplex, minimizer.infoset(), &minimizer.suggest_strategy()?);
        }
        Ok(profile)
    }

    /// Sum of every infoset's peak regret, averaged over `iteration`.
    ///
    /// Diagnostic only.
    pub fn mean_regrets(&self, iteration: u64) -> f64 {
        let total: f64 = self.minimizers.iter().map(RegretMinimizer::max_regret).sum();
        total / iteration.max(1) as f64
    }
}
