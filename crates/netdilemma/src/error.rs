//! Error taxonomy for graph ingestion and tournament execution.

use thiserror::Error;

/// Everything that can go wrong inside the simulation core.
///
/// Parsing faults abort the whole load (a partial graph would make
/// score attribution undefined); query and orchestration faults
/// surface to the caller untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed edge-list line: wrong token count, non-integer id,
    /// or a self-loop.
    #[error("edge list line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// Query for a player that is not in the network.
    #[error("player {0} is not in the network")]
    UnknownPlayer(u32),

    /// Play or ranking attempted before the player had a strategy.
    #[error("player {0} has no assigned strategy")]
    MissingStrategy(u32),

    /// Ranking queried on a network with no players.
    #[error("the network has no players")]
    EmptyNetwork,

    /// A stepped round applied out of order.
    #[error("round {given} applied where round {expected} was due")]
    RoundOutOfOrder { given: u32, expected: u32 },

    /// Failure reading the edge-list file.
    #[error("failed to read edge list: {0}")]
    Io(#[from] std::io::Error),
}
