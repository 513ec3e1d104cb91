//! Small games shared by the unit tests.

use crate::sequence::{Game, SumType, Treeplex, TreeplexBuilder, UtilityMatrix};

/// Two decisions deep, with one three-way branch:
///
/// ```text
/// 0 ─ I1 {1, 2}
///     1 ─ I2 {3, 4}
///         3 ─ I4 {8, 9}
///     2 ─ I3 {5, 6, 7}
/// ```
pub fn two_level_treeplex() -> Treeplex {
    let mut builder = TreeplexBuilder::new(0);
    builder.information_set(0, 1, 2);
    builder.information_set(1, 3, 4);
    builder.information_set(2, 5, 7);
    builder.information_set(3, 8, 9);
    builder.build().unwrap()
}

/// One decision with `actions` actions `0..actions`; the empty sequence is
/// `actions`.
pub fn single_decision(actions: usize) -> Treeplex {
    let mut builder = TreeplexBuilder::new(actions);
    builder.information_set(actions, 0, actions - 1);
    builder.build().unwrap()
}

fn two_by_two(player_utilities: [[f64; 2]; 2], chance: f64) -> Game {
    let mut utility = UtilityMatrix::new(SumType::ZeroSum);
    for (p, row) in player_utilities.iter().enumerate() {
        for (o, &u) in row.iter().enumerate() {
            utility.insert(p, o, u, -u, chance);
        }
    }

    Game::new(0, 1, single_decision(2), single_decision(2), utility).unwrap()
}

/// Matching pennies; every outcome is weighted 0.25.
pub fn matching_pennies() -> Game {
    two_by_two([[1.0, -1.0], [-1.0, 1.0]], 0.25)
}

/// Zero-sum 2×2 game whose unique equilibrium plays action 0 with
/// probability 1/3 on both sides; the player's value is 1/3.
pub fn biased_pennies() -> Game {
    two_by_two([[3.0, -1.0], [-1.0, 1.0]], 1.0)
}

/// Kuhn poker in sequence form.
///
/// Cards are 0 (jack), 1 (queen), 2 (king), antes of 1 and bets of 1.
///
/// First player, card `c`: check `1+2c` / bet `2+2c`, then after check-bet
/// fold `7+2c` / call `8+2c`.
///
/// Second player, card `d`: facing a bet fold `1+2d` / call `2+2d`; facing a
/// check check `7+2d` / bet `8+2d`.
///
/// The first player's value is -1/18.
pub fn kuhn() -> Game {
    let mut first = TreeplexBuilder::new(0).with_player(0);
    for c in 0..3 {
        first.information_set(0, 1 + 2 * c, 2 + 2 * c);
    }
    for c in 0..3 {
        first.information_set(1 + 2 * c, 7 + 2 * c, 8 + 2 * c);
    }

    let mut second = TreeplexBuilder::new(0).with_player(1);
    for d in 0..3 {
        second.information_set(0, 1 + 2 * d, 2 + 2 * d);
    }
    for d in 0..3 {
        second.information_set(0, 7 + 2 * d, 8 + 2 * d);
    }

    let deal = 1.0 / 6.0;
    let mut utility = UtilityMatrix::new(SumType::ZeroSum);
    for c in 0..3usize {
        for d in 0..3usize {
            if c == d {
                continue;
            }
            let showdown = if c > d { 1.0 } else { -1.0 };

            // check, check
            utility.insert(1 + 2 * c, 7 + 2 * d, showdown, -showdown, deal);
            // check, bet, fold
            utility.insert(7 + 2 * c, 8 + 2 * d, -1.0, 1.0, deal);
            // check, bet, call
            utility.insert(8 + 2 * c, 8 + 2 * d, 2.0 * showdown, -2.0 * showdown, deal);
            // bet, fold
            utility.insert(2 + 2 * c, 1 + 2 * d, 1.0, -1.0, deal);
            // bet, call
            utility.insert(2 + 2 * c, 2 + 2 * d, 2.0 * showdown, -2.0 * showdown, deal);
        }
    }

    Game::new(0, 1, first.build().unwrap(), second.build().unwrap(), utility).unwrap()
}
