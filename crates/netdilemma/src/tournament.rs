//! Tournament orchestration across the network's edges.
//!
//! Two modes share the one match engine: a full run plays every
//! pairing to completion, while the stepped mode advances every
//! pairing by a single round per call for animated replay. Stepping
//! 0..n in order accumulates exactly what a full run of n rounds does.

use std::cmp::Reverse;

use petgraph::graph::EdgeIndex;
use rayon::prelude::*;

use crate::error::Error;
use crate::game::{self, MatchState};
use crate::network::{Network, Player};
use crate::random::SeededRng;
use crate::strategy::Strategy;

/// Edges with endpoint ids, sorted by canonical (low id, high id).
///
/// Stable regardless of source adjacency order, so reruns of the same
/// graph always traverse identically.
fn ordered_edges(network: &Network) -> Vec<(EdgeIndex, u32, u32)> {
    let graph = &network.graph;
    let mut edges: Vec<(EdgeIndex, u32, u32)> = graph
        .edge_indices()
        .filter_map(|e| {
            let (s, t) = graph.edge_endpoints(e)?;
            Some((e, graph[s].id, graph[t].id))
        })
        .collect();
    edges.sort_by_key(|&(_, a, b)| (a.min(b), a.max(b)));
    edges
}

/// Assignment must always precede play; the lowest unassigned id is
/// reported and no score is touched.
fn check_assignments(network: &Network) -> Result<(), Error> {
    match network
        .players()
        .filter(|p| p.strategy.is_none())
        .map(|p| p.id)
        .min()
    {
        Some(id) => Err(Error::MissingStrategy(id)),
        None => Ok(()),
    }
}

fn strategy_of(network: &Network, id: u32) -> Result<Strategy, Error> {
    network.player(id)?.strategy.ok_or(Error::MissingStrategy(id))
}

fn add_score(network: &mut Network, id: u32, delta: u32) {
    if let Some(&ix) = network.index.get(&id) {
        network.graph[ix].score += delta;
    }
}

/// Fold one finished match into player scores and the edge record.
fn settle(
    network: &mut Network,
    edge: EdgeIndex,
    a: u32,
    b: u32,
    total_a: u32,
    total_b: u32,
    rounds: u32,
) {
    let pairing = &mut network.graph[edge];
    pairing.payoffs = Some((total_a, total_b));
    pairing.rounds_played = rounds;
    add_score(network, a, total_a);
    add_score(network, b, total_b);
}

/// Play every pairing for `rounds` rounds and fold the totals into
/// player scores and edge results.
///
/// Each edge gets a fresh match seeded from the run seed plus the
/// edge identity, so a rerun with the same seed replays the same
/// tournament.
pub fn run(network: &mut Network, rounds: u32, seed: u64) -> Result<(), Error> {
    check_assignments(network)?;
    log::info!(
        "full run: {} pairings, {} rounds each",
        network.num_pairings(),
        rounds
    );

    for (edge, a, b) in ordered_edges(network) {
        let strategy_a = strategy_of(network, a)?;
        let strategy_b = strategy_of(network, b)?;
        let result = game::play(strategy_a, strategy_b, rounds, SeededRng::for_edge(seed, a, b));
        settle(network, edge, a, b, result.total_a, result.total_b, rounds);
    }

    Ok(())
}

/// Full run with matches executed on the rayon pool.
///
/// Pairings are independent, so each match runs in its own task with
/// its own state; totals merge sequentially afterward, and per-edge
/// seeding makes the outcome identical to [`run`].
pub fn run_parallel(network: &mut Network, rounds: u32, seed: u64) -> Result<(), Error> {
    check_assignments(network)?;

    let mut jobs = Vec::with_capacity(network.num_pairings());
    for (edge, a, b) in ordered_edges(network) {
        jobs.push((edge, a, b, strategy_of(network, a)?, strategy_of(network, b)?));
    }
    log::info!("parallel run: {} pairings, {} rounds each", jobs.len(), rounds);

    let results: Vec<(EdgeIndex, u32, u32, u32, u32)> = jobs
        .into_par_iter()
        .map(|(edge, a, b, strategy_a, strategy_b)| {
            let result =
                game::play(strategy_a, strategy_b, rounds, SeededRng::for_edge(seed, a, b));
            (edge, a, b, result.total_a, result.total_b)
        })
        .collect();

    for (edge, a, b, total_a, total_b) in results {
        settle(network, edge, a, b, total_a, total_b, rounds);
    }

    Ok(())
}

/// Apply round `round_index` (0-based) of every pairing's match, one
/// animation frame's worth of play.
///
/// The first call (index 0) starts a persisted match on every edge;
/// later calls advance it without replaying earlier rounds. Rounds
/// must arrive in increasing order with none repeated or skipped: a
/// mismatch on any edge aborts before any score moves.
pub fn step(network: &mut Network, round_index: u32, seed: u64) -> Result<(), Error> {
    check_assignments(network)?;
    let edges = ordered_edges(network);

    // Verify the whole frame first so a partial frame never settles
    for &(edge, _, _) in &edges {
        let expected = network.graph[edge]
            .live
            .as_ref()
            .map_or(0, MatchState::rounds_played);
        if round_index != expected {
            return Err(Error::RoundOutOfOrder {
                given: round_index,
                expected,
            });
        }
    }

    for (edge, a, b) in edges {
        let strategy_a = strategy_of(network, a)?;
        let strategy_b = strategy_of(network, b)?;

        let (score_a, score_b, totals, played) = {
            let pairing = &mut network.graph[edge];
            let state = pairing.live.get_or_insert_with(|| {
                MatchState::new(strategy_a, strategy_b, SeededRng::for_edge(seed, a, b))
            });
            let (score_a, score_b) = state.play_one_round();
            (score_a, score_b, state.totals(), state.rounds_played())
        };

        let pairing = &mut network.graph[edge];
        pairing.payoffs = Some(totals);
        pairing.rounds_played = played;
        add_score(network, a, score_a);
        add_score(network, b, score_b);
    }

    Ok(())
}

/// The player with the maximum cumulative score.
///
/// Ties break toward the lowest id, so the answer depends only on
/// scores, never on edge traversal order. Refuses to rank a network
/// whose players were never assigned strategies.
pub fn best_player(network: &Network) -> Result<&Player, Error> {
    check_assignments(network)?;
    network
        .players()
        .min_by_key(|p| (Reverse(p.score), p.id))
        .ok_or(Error::EmptyNetwork)
}
