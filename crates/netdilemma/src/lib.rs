//! Iterated Prisoner's Dilemma over a social network.
//!
//! Every node of an undirected graph is a player with an assigned
//! strategy; every edge hosts one iterated match. The tournament
//! plays each pairing — all at once, or one round across every edge
//! per call for animated replay — and accumulated payoffs rank the
//! players.

mod error;
mod game;
mod network;
mod random;
mod strategy;
mod tournament;

pub use error::Error;
pub use game::{play, MatchResult, MatchState, RoundResult};
pub use network::{EdgeReport, Network, Pairing, Player, PlayerReport};
pub use random::SeededRng;
pub use strategy::{assign_random, Move, Strategy};
pub use tournament::{best_player, run, run_parallel, step};

/// Payoff matrix for the Prisoner's Dilemma
/// Returns (score_a, score_b)
pub fn payoff(a: Move, b: Move) -> (u32, u32) {
    match (a, b) {
        (Move::Cooperate, Move::Cooperate) => (3, 3),
        (Move::Cooperate, Move::Defect) => (0, 5),
        (Move::Defect, Move::Cooperate) => (5, 0),
        (Move::Defect, Move::Defect) => (1, 1),
    }
}
