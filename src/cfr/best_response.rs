//! Best response by backward induction over a treeplex.

use serde::{Deserialize, Serialize};

use crate::sequence::{BehavioralStrategyProfile, Game, RealizationPlan, Role};

/// A pure best response and the value it earns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestResponse {
    /// Realization plan of the pure best-response strategy.
    pub plan: RealizationPlan,
    /// Expected utility of `plan` against the fixed opponent plan.
    pub value: f64,
}

/// Compute a best response for `role` against the other side's fixed plan.
///
/// Infosets are solved bottom-up in reverse breadth-first order. The value
/// of a sequence is its own immediate gradient plus the values of the
/// infosets that follow it; each infoset commits to its highest-valued
/// child, the lowest sequence id winning ties.
pub fn compute_best_response(role: Role, game: &Game, opponent_plan: &RealizationPlan) -> BestResponse {
    let treeplex = game.treeplex(role);
    let gradient = game
        .utility()
        .loss_vector(role, opponent_plan, treeplex.sequence_count());

    let mut infoset_values = vec![0.0; treeplex.infoset_count()];
    let mut profile = BehavioralStrategyProfile::zeros(treeplex);

    for infoset in treeplex.ordered_information_sets().rev() {
        if treeplex.is_empty_information_set(infoset.id()) {
            continue;
        }

        let mut best = infoset.first();
        let mut best_value = f64::NEG_INFINITY;
        for child in infoset.children() {
            let value = gradient[child]
                + treeplex
                    .child_information_sets(child)
                    .iter()
                    .map(|&follower| infoset_values[follower])
                    .sum::<f64>();
            if value > best_value {
                best = child;
                best_value = value;
            }
        }

        let pure: Vec<f64> = infoset
            .children()
            .map(|child| if child == best { 1.0 } else { 0.0 })
            .collect();
        profile.set_distribution(treeplex, infoset.id(), &pure);
        infoset_values[infoset.id()] = best_value;
    }

    let plan = profile.realization_plan(treeplex);
    let value = gradient.dot(&plan);

    BestResponse { plan, value }
}
