//! Strategy definitions and execution

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::network::Network;
use crate::payoff;
use crate::random::SeededRng;

/// A move in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    /// The other move.
    pub fn flipped(self) -> Move {
        match self {
            Move::Cooperate => Move::Defect,
            Move::Defect => Move::Cooperate,
        }
    }
}

/// A decision policy over both players' move histories.
///
/// The set is closed: every policy is a variant, so adding one is a
/// compile-time extension point rather than a runtime name lookup.
/// Decisions are pure functions of the two histories (plus a drawn
/// value for [`Strategy::Random`]) and each match holds its own copy,
/// so no state can leak between the matches on different edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    /// Always cooperate.
    Cooperator,
    /// Always defect.
    Defector,
    /// Cooperate on the first round, then repeat the opponent's
    /// previous move.
    TitForTat,
    /// Cooperate until the opponent defects once, then always defect.
    Grudger,
    /// Win-stay, lose-switch: repeat the last move after a good round
    /// (3+ points), switch after a bad one.
    Pavlov,
    /// Defect only after two consecutive opponent defections.
    TitForTwoTats,
    /// Cooperate with probability `cooperate_prob` each round.
    Random { cooperate_prob: f64 },
}

impl Strategy {
    /// The pool the reference tournament draws from.
    pub const DEFAULT_POOL: [Strategy; 4] = [
        Strategy::Cooperator,
        Strategy::Defector,
        Strategy::TitForTat,
        Strategy::Random { cooperate_prob: 0.5 },
    ];

    /// Unbiased coin-flip variant of [`Strategy::Random`].
    pub fn random() -> Strategy {
        Strategy::Random { cooperate_prob: 0.5 }
    }

    /// Display name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Cooperator => "Cooperator",
            Strategy::Defector => "Defector",
            Strategy::TitForTat => "TitForTat",
            Strategy::Grudger => "Grudger",
            Strategy::Pavlov => "Pavlov",
            Strategy::TitForTwoTats => "TitForTwoTats",
            Strategy::Random { .. } => "Random",
        }
    }

    /// Choose the next move given both histories so far.
    ///
    /// `mine` and `theirs` are the full move sequences of this player
    /// and the opponent, in round order; the engine never exposes the
    /// opponent's policy itself.
    pub fn decide(&self, mine: &[Move], theirs: &[Move], rng: &mut SeededRng) -> Move {
        match *self {
            Strategy::Cooperator => Move::Cooperate,
            Strategy::Defector => Move::Defect,
            Strategy::TitForTat => match theirs.last() {
                None => Move::Cooperate,
                Some(last) => *last,
            },
            Strategy::Grudger => {
                if theirs.contains(&Move::Defect) {
                    Move::Defect
                } else {
                    Move::Cooperate
                }
            }
            Strategy::Pavlov => match (mine.last(), theirs.last()) {
                (Some(my_last), Some(their_last)) => {
                    let (my_score, _) = payoff(*my_last, *their_last);
                    if my_score >= 3 {
                        *my_last
                    } else {
                        my_last.flipped()
                    }
                }
                _ => Move::Cooperate,
            },
            Strategy::TitForTwoTats => {
                if theirs.len() >= 2
                    && theirs[theirs.len() - 2..] == [Move::Defect, Move::Defect]
                {
                    Move::Defect
                } else {
                    Move::Cooperate
                }
            }
            Strategy::Random { cooperate_prob } => {
                if rng.chance(cooperate_prob) {
                    Move::Cooperate
                } else {
                    Move::Defect
                }
            }
        }
    }
}

/// Assign each player one strategy drawn independently and uniformly
/// from `pool`.
///
/// Players are visited in ascending id order and the draw consumes the
/// caller's RNG, so a fixed seed reproduces the same assignment on the
/// same graph. Scores are untouched.
pub fn assign_random(
    network: &mut Network,
    pool: &[Strategy],
    rng: &mut SeededRng,
) -> Result<(), Error> {
    if pool.is_empty() {
        log::warn!("assign_random called with an empty pool; nothing assigned");
        return Ok(());
    }
    for id in network.player_ids() {
        let pick = pool[rng.next_range(pool.len() as u32) as usize];
        network.assign(id, pick)?;
    }
    log::debug!(
        "assigned strategies to {} players from a pool of {}",
        network.num_players(),
        pool.len()
    );
    Ok(())
}
