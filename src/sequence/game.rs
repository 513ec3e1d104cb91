//! Two-player game record: both treeplexes plus the utility matrix.

use crate::error::GameError;
use crate::sequence::treeplex::Treeplex;
use crate::sequence::utility::{Role, UtilityMatrix};

/// A validated two-player game in sequence form.
///
/// Construction checks the utility matrix against its declared sum type and
/// that every entry references sequences both treeplexes actually have. A
/// game that fails either check never reaches the solver.
#[derive(Debug, Clone)]
pub struct Game {
    player_id: usize,
    opponent_id: usize,
    player_treeplex: Treeplex,
    opponent_treeplex: Treeplex,
    utility: UtilityMatrix,
}

impl Game {
    /// Assemble and validate a game.
    pub fn new(
        player_id: usize,
        opponent_id: usize,
        player_treeplex: Treeplex,
        opponent_treeplex: Treeplex,
        utility: UtilityMatrix,
    ) -> Result<Self, GameError> {
        if player_id == opponent_id {
            return Err(GameError::DuplicatePlayerId(player_id));
        }

        utility.check_sum()?;

        for ((player_sequence, opponent_sequence), _) in utility.iter() {
            for (role, sequence, treeplex) in [
                (Role::Player, player_sequence, &player_treeplex),
                (Role::Opponent, opponent_sequence, &opponent_treeplex),
            ] {
                if !treeplex.has_sequence(sequence) {
                    return Err(GameError::UnknownSequence {
                        role,
                        sequence,
                        sequence_count: treeplex.sequence_count(),
                    });
                }
            }
        }

        log::trace!(
            "game {} vs {}: {} + {} sequences, {} utility entries",
            player_id,
            opponent_id,
            player_treeplex.sequence_count(),
            opponent_treeplex.sequence_count(),
            utility.len()
        );

        Ok(Self {
            player_id,
            opponent_id,
            player_treeplex,
            opponent_treeplex,
            utility,
        })
    }

    /// Id of the player.
    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Id of the opponent.
    pub fn opponent_id(&self) -> usize {
        self.opponent_id
    }

    /// Id of `role`.
    pub fn id(&self, role: Role) -> usize {
        match role {
            Role::Player => self.player_id,
            Role::Opponent => self.opponent_id,
        }
    }

    /// Treeplex of `role`.
    pub fn treeplex(&self, role: Role) -> &Treeplex {
        match role {
            Role::Player => &self.player_treeplex,
            Role::Opponent => &self.opponent_treeplex,
        }
    }

    /// The player's treeplex.
    pub fn player_treeplex(&self) -> &Treeplex {
        &self.player_treeplex
    }

    /// The opponent's treeplex.
    pub fn opponent_treeplex(&self) -> &Treeplex {
        &self.opponent_treeplex
    }

    /// The utility matrix.
    pub fn utility(&self) -> &UtilityMatrix {
        &self.utility
    }
}
