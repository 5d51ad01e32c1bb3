//! Match execution engine

use serde::Serialize;

use crate::payoff;
use crate::random::SeededRng;
use crate::strategy::{Move, Strategy};

/// Result of a single round
#[derive(Clone, Debug, Serialize)]
pub struct RoundResult {
    pub round: u32,
    pub move_a: Move,
    pub move_b: Move,
    pub score_a: u32,
    pub score_b: u32,
    pub cumulative_a: u32,
    pub cumulative_b: u32,
}

/// Result of a complete match
#[derive(Clone, Debug, Serialize)]
pub struct MatchResult {
    pub rounds: Vec<RoundResult>,
    pub total_a: u32,
    pub total_b: u32,
}

/// Live state of one iterated match.
///
/// Histories are append-only and grow by one move per side per round.
/// The same per-round computation backs bulk play and round-stepped
/// orchestration, so the two modes always agree.
#[derive(Clone, Debug)]
pub struct MatchState {
    strategy_a: Strategy,
    strategy_b: Strategy,
    history_a: Vec<Move>,
    history_b: Vec<Move>,
    total_a: u32,
    total_b: u32,
    rng: SeededRng,
}

impl MatchState {
    /// Start a match between two strategies with a per-match RNG.
    ///
    /// The strategies are copied in, so nothing here can bleed into
    /// the matches on other edges.
    pub fn new(strategy_a: Strategy, strategy_b: Strategy, rng: SeededRng) -> Self {
        Self {
            strategy_a,
            strategy_b,
            history_a: Vec::new(),
            history_b: Vec::new(),
            total_a: 0,
            total_b: 0,
            rng,
        }
    }

    /// Rounds played so far.
    pub fn rounds_played(&self) -> u32 {
        self.history_a.len() as u32
    }

    /// Running payoff totals.
    pub fn totals(&self) -> (u32, u32) {
        (self.total_a, self.total_b)
    }

    /// Both move histories so far.
    pub fn histories(&self) -> (&[Move], &[Move]) {
        (&self.history_a, &self.history_b)
    }

    /// Advance the match by exactly one round, returning that round's
    /// payoff pair.
    ///
    /// Each side decides from the two histories only; the opponent's
    /// policy is never exposed. The per-round RNG streams are derived
    /// from the match RNG rather than consumed, so a round's outcome
    /// is a pure function of the state at that round index.
    pub fn play_one_round(&mut self) -> (u32, u32) {
        let round = self.rounds_played();

        // Separate streams per side so one draw never shifts the other
        let mut rng_a = self.rng.for_round(round * 2);
        let mut rng_b = self.rng.for_round(round * 2 + 1);

        let move_a = self
            .strategy_a
            .decide(&self.history_a, &self.history_b, &mut rng_a);
        let move_b = self
            .strategy_b
            .decide(&self.history_b, &self.history_a, &mut rng_b);

        let (score_a, score_b) = payoff(move_a, move_b);
        self.total_a += score_a;
        self.total_b += score_b;
        self.history_a.push(move_a);
        self.history_b.push(move_b);

        (score_a, score_b)
    }
}

/// Run a complete match between two strategies
///
/// Runs exactly `rounds` sequential decision steps and records the
/// round-by-round detail. `rounds = 0` yields empty histories and zero
/// totals.
pub fn play(strategy_a: Strategy, strategy_b: Strategy, rounds: u32, rng: SeededRng) -> MatchResult {
    let mut state = MatchState::new(strategy_a, strategy_b, rng);
    let mut detail = Vec::with_capacity(rounds as usize);

    for round in 0..rounds {
        let (score_a, score_b) = state.play_one_round();
        detail.push(RoundResult {
            round,
            move_a: state.history_a[round as usize],
            move_b: state.history_b[round as usize],
            score_a,
            score_b,
            cumulative_a: state.total_a,
            cumulative_b: state.total_b,
        });
    }

    MatchResult {
        rounds: detail,
        total_a: state.total_a,
        total_b: state.total_b,
    }
}
