//! Sparse utility matrix over pairs of terminal sequences.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::sequence::strategy::{LossVector, RealizationPlan};
use crate::sequence::treeplex::Sequence;

/// Which side of the game a quantity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The first player (declarer in bridge endgames).
    Player,
    /// The second player.
    Opponent,
}

impl Role {
    /// The other role.
    pub fn other(self) -> Role {
        match self {
            Role::Player => Role::Opponent,
            Role::Opponent => Role::Player,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Player => f.pad("player"),
            Role::Opponent => f.pad("opponent"),
        }
    }
}

/// Declared relation between the two utilities of every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SumType {
    /// `u_player + u_opponent == 0` for every entry.
    ZeroSum,
    /// `u_player + u_opponent` is the same for every entry.
    ConstantSum,
    /// No constraint.
    #[default]
    GeneralSum,
}

impl SumType {
    fn name(self) -> &'static str {
        match self {
            SumType::ZeroSum => "zero-sum",
            SumType::ConstantSum => "constant-sum",
            SumType::GeneralSum => "general-sum",
        }
    }
}

/// Payoffs and chance weight of one terminal pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Utility of the player.
    pub player_utility: f64,
    /// Utility of the opponent.
    pub opponent_utility: f64,
    /// Probability of chance reaching this pair.
    pub chance: f64,
}

impl Outcome {
    /// Utility of `role`.
    pub fn utility(&self, role: Role) -> f64 {
        match role {
            Role::Player => self.player_utility,
            Role::Opponent => self.opponent_utility,
        }
    }

    fn sum(&self) -> f64 {
        self.player_utility + self.opponent_utility
    }
}

/// Sparse table `(player sequence, opponent sequence) -> Outcome`.
///
/// Entries are kept in ascending key order so that every summation over the
/// table happens in the same order on every run.
#[derive(Debug, Clone, Default)]
pub struct UtilityMatrix {
    sum_type: SumType,
    outcomes: FxHashMap<(Sequence, Sequence), Outcome>,
    keys: Vec<(Sequence, Sequence)>,
}

impl UtilityMatrix {
    /// Empty matrix of the given sum type.
    pub fn new(sum_type: SumType) -> Self {
        Self {
            sum_type,
            outcomes: FxHashMap::default(),
            keys: Vec::new(),
        }
    }

    /// Declared sum type.
    pub fn sum_type(&self) -> SumType {
        self.sum_type
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Set the outcome of `(player_sequence, opponent_sequence)`, replacing
    /// any previous one.
    pub fn insert(
        &mut self,
        player_sequence: Sequence,
        opponent_sequence: Sequence,
        player_utility: f64,
        opponent_utility: f64,
        chance: f64,
    ) {
        let key = (player_sequence, opponent_sequence);
        let outcome = Outcome {
            player_utility,
            opponent_utility,
            chance,
        };
        if self.outcomes.insert(key, outcome).is_none() {
            let at = self.keys.partition_point(|k| *k < key);
            self.keys.insert(at, key);
        }
    }

    /// Outcome of a terminal pair, if present.
    pub fn get(&self, player_sequence: Sequence, opponent_sequence: Sequence) -> Option<&Outcome> {
        self.outcomes.get(&(player_sequence, opponent_sequence))
    }

    /// Entries in ascending `(player, opponent)` order.
    pub fn iter(&self) -> impl Iterator<Item = ((Sequence, Sequence), &Outcome)> + '_ {
        self.keys.iter().map(move |key| (*key, &self.outcomes[key]))
    }

    /// Check every entry against the declared sum type.
    ///
    /// Constant-sum entries are compared with the first entry in key order.
    pub fn check_sum(&self) -> Result<(), GameError> {
        let expected = match self.sum_type {
            SumType::GeneralSum => return Ok(()),
            SumType::ZeroSum => 0.0,
            SumType::ConstantSum => match self.iter().next() {
                Some((_, outcome)) => outcome.sum(),
                None => return Ok(()),
            },
        };

        for ((player_sequence, opponent_sequence), outcome) in self.iter() {
            let sum = outcome.sum();
            if sum != expected {
                return Err(GameError::SumTypeMismatch {
                    player_sequence,
                    opponent_sequence,
                    sum,
                    expected,
                    sum_type: self.sum_type.name(),
                });
            }
        }

        Ok(())
    }

    /// Loss vector of `role` against the other side's fixed plan.
    ///
    /// ```text
    /// loss[s] = Σ_{(s, t)} other_plan[t] * utility_role(s, t) * chance(s, t)
    /// ```
    ///
    /// The result is dense over `sequence_count` sequences; sequences without
    /// an entry get 0.
    pub fn loss_vector(&self, role: Role, other_plan: &RealizationPlan, sequence_count: usize) -> LossVector {
        let mut loss = LossVector::zeros(sequence_count);

        for (key, outcome) in self.iter() {
            let (own, other) = split(role, key);
            if own < sequence_count {
                loss[own] += other_plan.get(other) * outcome.utility(role) * outcome.chance;
            }
        }

        loss
    }

    /// Expected utility of `role` when it plays `own_plan` against `other_plan`.
    pub fn expected_utility(&self, role: Role, own_plan: &RealizationPlan, other_plan: &RealizationPlan) -> f64 {
        self.iter()
            .map(|(key, outcome)| {
                let (own, other) = split(role, key);
                own_plan.get(own) * other_plan.get(other) * outcome.utility(role) * outcome.chance
            })
            .sum()
    }
}

/// `(role's sequence, other side's sequence)` of a key.
fn split(role: Role, (player, opponent): (Sequence, Sequence)) -> (Sequence, Sequence) {
    match role {
        Role::Player => (player, opponent),
        Role::Opponent => (opponent, player),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn toy_matrix() -> UtilityMatrix {
        let mut matrix = UtilityMatrix::new(SumType::ZeroSum);
        matrix.insert(1, 1, -1.0, 1.0, 0.5);
        matrix.insert(0, 0, 1.0, -1.0, 0.5);
        matrix
    }

    #[test]
    fn test_marginalize_player() {
        let matrix = toy_matrix();
        // opponent: empty sequence 2, all mass on sequence 0
        let opponent = RealizationPlan::from_values(vec![1.0, 0.0, 1.0]);

        let loss = matrix.loss_vector(Role::Player, &opponent, 3);
        assert_eq!(loss.as_slice(), &[0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_marginalize_opponent() {
        let matrix = toy_matrix();
        let player = RealizationPlan::from_values(vec![0.25, 0.75, 1.0]);

        let loss = matrix.loss_vector(Role::Opponent, &player, 3);
        assert_abs_diff_eq!(loss[0], -0.125);
        assert_abs_diff_eq!(loss[1], 0.375);
        assert_eq!(loss[2], 0.0);
    }

    #[test]
    fn test_expected_utility() {
        let matrix = toy_matrix();
        let player = RealizationPlan::from_values(vec![0.25, 0.75, 1.0]);
        let opponent = RealizationPlan::from_values(vec![0.5, 0.5, 1.0]);

        let ev = matrix.expected_utility(Role::Player, &player, &opponent);
        // 0.25 * 0.5 * 1 * 0.5 + 0.75 * 0.5 * -1 * 0.5
        assert_abs_diff_eq!(ev, -0.125);
        assert_abs_diff_eq!(
            matrix.expected_utility(Role::Opponent, &opponent, &player),
            0.125
        );

        // same number through the loss vector
        let loss = matrix.loss_vector(Role::Player, &opponent, 3);
        assert_abs_diff_eq!(loss.dot(&player), ev);
    }

    #[test]
    fn test_iteration_order_is_sorted() {
        let matrix = toy_matrix();
        let keys: Vec<_> = matrix.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_insert_replaces() {
        let mut matrix = toy_matrix();
        matrix.insert(0, 0, 2.0, -2.0, 1.0);
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.get(0, 0).unwrap().player_utility, 2.0);
        assert!(matrix.get(0, 1).is_none());
    }

    #[test]
    fn test_check_zero_sum() {
        let mut matrix = toy_matrix();
        assert!(matrix.check_sum().is_ok());

        matrix.insert(0, 1, 1.0, 1.0, 1.0);
        assert!(matches!(
            matrix.check_sum(),
            Err(GameError::SumTypeMismatch {
                player_sequence: 0,
                opponent_sequence: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_check_constant_sum() {
        let mut matrix = UtilityMatrix::new(SumType::ConstantSum);
        matrix.insert(0, 0, 3.0, 1.0, 1.0);
        matrix.insert(1, 0, 0.0, 4.0, 1.0);
        assert!(matrix.check_sum().is_ok());

        matrix.insert(1, 1, 0.0, 5.0, 1.0);
        assert!(matrix.check_sum().is_err());
    }

    #[test]
    fn test_general_sum_accepts_anything() {
        let mut matrix = UtilityMatrix::new(SumType::GeneralSum);
        matrix.insert(0, 0, 3.0, 1.0, 1.0);
        matrix.insert(1, 1, -7.0, 4.0, 1.0);
        assert!(matrix.check_sum().is_ok());
    }
}
