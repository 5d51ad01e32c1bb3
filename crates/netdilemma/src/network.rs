//! Social-network graph of players and their pairwise matches.
//!
//! The network exclusively owns its player and pairing records; the
//! orchestrator mutates them through it and never the other way round.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;

use crate::error::Error;
use crate::game::MatchState;
use crate::strategy::Strategy;

/// A node in the network.
#[derive(Clone, Debug, Serialize)]
pub struct Player {
    /// Stable id from the source edge list.
    pub id: u32,
    /// Display name shown in reports; defaults to the decimal id.
    pub name: String,
    /// Policy assigned before play; `None` until assignment.
    pub strategy: Option<Strategy>,
    /// Cumulative payoff across every match this player has been in.
    pub score: u32,
}

/// Per-edge match bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct Pairing {
    /// Persisted match for round-stepped play.
    pub(crate) live: Option<MatchState>,
    /// Last recorded payoff totals, oriented to the stored endpoints.
    pub payoffs: Option<(u32, u32)>,
    /// Rounds applied so far when stepping.
    pub rounds_played: u32,
}

/// Per-pairing row exposed to the reporting collaborator.
#[derive(Clone, Debug, Serialize)]
pub struct EdgeReport {
    pub player_a: u32,
    pub player_b: u32,
    pub payoff_a: u32,
    pub payoff_b: u32,
}

/// Per-player row exposed to the reporting collaborator.
#[derive(Clone, Debug, Serialize)]
pub struct PlayerReport {
    pub id: u32,
    pub score: u32,
    pub strategy: Option<&'static str>,
    pub neighbors: Vec<u32>,
}

/// Undirected simple graph of players.
#[derive(Debug)]
pub struct Network {
    pub(crate) graph: UnGraph<Player, Pairing>,
    pub(crate) index: HashMap<u32, NodeIndex>,
}

fn intern(
    graph: &mut UnGraph<Player, Pairing>,
    index: &mut HashMap<u32, NodeIndex>,
    id: u32,
) -> NodeIndex {
    *index.entry(id).or_insert_with(|| {
        graph.add_node(Player {
            id,
            name: id.to_string(),
            strategy: None,
            score: 0,
        })
    })
}

impl Network {
    /// Parse a MatrixMarket-style edge list: one `a b` pair of node
    /// ids per line, `%`-prefixed comment lines and blank lines
    /// skipped.
    ///
    /// Any malformed line (wrong token count, non-integer id,
    /// self-loop) aborts the whole load; a partial graph would leave
    /// downstream score attribution undefined. Duplicate undirected
    /// edges collapse into one pairing.
    pub fn parse(input: &str) -> Result<Network, Error> {
        let mut graph = UnGraph::new_undirected();
        let mut index = HashMap::new();

        for (lineno, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('%') {
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != 2 {
                return Err(Error::Format {
                    line: lineno + 1,
                    reason: format!("expected 2 node ids, found {}", tokens.len()),
                });
            }
            let a: u32 = tokens[0].parse().map_err(|_| Error::Format {
                line: lineno + 1,
                reason: format!("invalid node id {:?}", tokens[0]),
            })?;
            let b: u32 = tokens[1].parse().map_err(|_| Error::Format {
                line: lineno + 1,
                reason: format!("invalid node id {:?}", tokens[1]),
            })?;
            if a == b {
                return Err(Error::Format {
                    line: lineno + 1,
                    reason: format!("self-loop on node {}", a),
                });
            }

            let ia = intern(&mut graph, &mut index, a);
            let ib = intern(&mut graph, &mut index, b);
            if graph.find_edge(ia, ib).is_none() {
                graph.add_edge(ia, ib, Pairing::default());
            }
        }

        Ok(Network { graph, index })
    }

    /// Read and parse an edge-list file.
    pub fn load(path: impl AsRef<Path>) -> Result<Network, Error> {
        let path = path.as_ref();
        let network = Self::parse(&fs::read_to_string(path)?)?;
        log::info!(
            "loaded {}: {} players, {} pairings",
            path.display(),
            network.num_players(),
            network.num_pairings()
        );
        Ok(network)
    }

    pub fn num_players(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_pairings(&self) -> usize {
        self.graph.edge_count()
    }

    /// All player ids, ascending.
    pub fn player_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.index.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Players in graph storage order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.graph.node_weights()
    }

    fn node(&self, id: u32) -> Result<NodeIndex, Error> {
        self.index.get(&id).copied().ok_or(Error::UnknownPlayer(id))
    }

    pub fn player(&self, id: u32) -> Result<&Player, Error> {
        Ok(&self.graph[self.node(id)?])
    }

    /// Adjacency count of one player.
    pub fn degree(&self, id: u32) -> Result<usize, Error> {
        Ok(self.graph.neighbors(self.node(id)?).count())
    }

    /// Neighbor ids of one player, ascending.
    pub fn neighbors(&self, id: u32) -> Result<Vec<u32>, Error> {
        let ix = self.node(id)?;
        let mut out: Vec<u32> = self.graph.neighbors(ix).map(|n| self.graph[n].id).collect();
        out.sort_unstable();
        Ok(out)
    }

    /// Record a strategy on one player.
    pub fn assign(&mut self, id: u32, strategy: Strategy) -> Result<(), Error> {
        let ix = self.node(id)?;
        self.graph[ix].strategy = Some(strategy);
        Ok(())
    }

    /// Rows for every settled pairing, in canonical endpoint order.
    pub fn edge_reports(&self) -> Vec<EdgeReport> {
        let mut rows: Vec<EdgeReport> = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                let (s, t) = self.graph.edge_endpoints(e)?;
                let (payoff_a, payoff_b) = self.graph[e].payoffs?;
                Some(EdgeReport {
                    player_a: self.graph[s].id,
                    player_b: self.graph[t].id,
                    payoff_a,
                    payoff_b,
                })
            })
            .collect();
        rows.sort_by_key(|r| (r.player_a.min(r.player_b), r.player_a.max(r.player_b)));
        rows
    }

    /// One row per player, ascending by id.
    pub fn player_reports(&self) -> Vec<PlayerReport> {
        self.player_ids()
            .into_iter()
            .filter_map(|id| {
                let ix = *self.index.get(&id)?;
                let player = &self.graph[ix];
                let mut neighbors: Vec<u32> =
                    self.graph.neighbors(ix).map(|n| self.graph[n].id).collect();
                neighbors.sort_unstable();
                Some(PlayerReport {
                    id,
                    score: player.score,
                    strategy: player.strategy.map(|s| s.name()),
                    neighbors,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let net = Network::parse("1 2\n2 3\n").unwrap();

        assert_eq!(net.num_players(), 3);
        assert_eq!(net.num_pairings(), 2);
        assert_eq!(net.player_ids(), vec![1, 2, 3]);
        assert_eq!(net.degree(2).unwrap(), 2);
        assert_eq!(net.degree(1).unwrap(), 1);
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let net = Network::parse("% MatrixMarket pattern\n%----\n\n1 2\n\n2 3\n").unwrap();

        assert_eq!(net.num_players(), 3);
        assert_eq!(net.num_pairings(), 2);
    }

    #[test]
    fn test_parse_rejects_wrong_token_count() {
        let err = Network::parse("1 2\n3 4 5\n").unwrap_err();

        match err {
            Error::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_integer_ids() {
        let err = Network::parse("1 two\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_self_loop() {
        let err = Network::parse("1 2\n3 3\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }

    #[test]
    fn test_parse_collapses_duplicate_edges() {
        // Same undirected edge three times, once reversed
        let net = Network::parse("1 2\n2 1\n1 2\n").unwrap();

        assert_eq!(net.num_players(), 2);
        assert_eq!(net.num_pairings(), 1);
    }

    #[test]
    fn test_unknown_player_queries() {
        let net = Network::parse("1 2\n").unwrap();

        assert!(matches!(net.degree(9), Err(Error::UnknownPlayer(9))));
        assert!(matches!(net.player(9), Err(Error::UnknownPlayer(9))));
        assert!(matches!(net.neighbors(9), Err(Error::UnknownPlayer(9))));
    }

    #[test]
    fn test_assign_unknown_player() {
        let mut net = Network::parse("1 2\n").unwrap();
        let err = net.assign(5, Strategy::Cooperator).unwrap_err();
        assert!(matches!(err, Error::UnknownPlayer(5)));
    }

    #[test]
    fn test_player_defaults() {
        let net = Network::parse("7 9\n").unwrap();
        let p = net.player(7).unwrap();

        assert_eq!(p.name, "7");
        assert_eq!(p.score, 0);
        assert!(p.strategy.is_none());
    }

    #[test]
    fn test_neighbors_sorted() {
        let net = Network::parse("2 9\n2 1\n2 5\n").unwrap();
        assert_eq!(net.neighbors(2).unwrap(), vec![1, 5, 9]);
    }

    #[test]
    fn test_edge_reports_empty_before_any_run() {
        let net = Network::parse("1 2\n2 3\n").unwrap();
        assert!(net.edge_reports().is_empty());
    }

    #[test]
    fn test_player_reports_carry_strategy_names() {
        let mut net = Network::parse("1 2\n").unwrap();
        net.assign(1, Strategy::Grudger).unwrap();

        let rows = net.player_reports();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].strategy, Some("Grudger"));
        assert_eq!(rows[0].neighbors, vec![2]);
        assert_eq!(rows[1].strategy, None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Network::load("/no/such/edge/list.mtx").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_reports_serialize() {
        let mut net = Network::parse("1 2\n").unwrap();
        net.assign(1, Strategy::TitForTat).unwrap();
        net.assign(2, Strategy::Defector).unwrap();

        let json = serde_json::to_string(&net.player_reports()).unwrap();
        assert!(json.contains("\"TitForTat\""));
        assert!(json.contains("\"score\":0"));
    }
}
