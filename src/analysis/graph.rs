//! Interaction graph construction and community detection.
//!
//! Aggregates each wallet's counterparty interactions into a directed
//! weighted graph, then finds connected communities by treating edges as
//! undirected. Traversal uses an explicit stack so large populations cannot
//! blow the call stack.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::config::GraphConfig;
use crate::core::types::{Community, GraphEdge, GraphNode, NetworkGraph, WalletFeatureVector};

pub struct NetworkGraphBuilder {
    config: GraphConfig,
}

impl NetworkGraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    /// Build the interaction graph for a population of profiled wallets.
    ///
    /// An edge exists only when the interaction count meets the configured
    /// minimum. Nodes cover the profiled wallets; edges may point at
    /// counterparties outside the population, and those addresses still
    /// participate in community traversal.
    pub fn build(&self, wallets: &[WalletFeatureVector]) -> NetworkGraph {
        let nodes: Vec<GraphNode> = wallets
            .iter()
            .map(|w| GraphNode {
                address: w.address.clone(),
                importance: ((w.transaction_count + 1) as f64).ln()
                    * ((w.counterparties.len() + 1) as f64).ln(),
            })
            .collect();

        let mut edges: Vec<GraphEdge> = Vec::new();
        for wallet in wallets {
            for (counterparty, &interactions) in &wallet.counterparties {
                if interactions < self.config.min_interactions {
                    continue;
                }
                edges.push(GraphEdge {
                    from: wallet.address.clone(),
                    to: counterparty.clone(),
                    interactions,
                    total_value: interactions as f64 * wallet.avg_transaction_value,
                });
            }
        }

        let communities = detect_communities(&edges);
        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            communities = communities.len(),
            "graph build complete"
        );

        NetworkGraph { nodes, edges, communities }
    }
}

/// Connected components over the undirected view of the edge set.
/// Singleton components are dropped; density is the fraction of possible
/// intra-community pairs with at least one edge between them.
fn detect_communities(edges: &[GraphEdge]) -> Vec<Community> {
    // Undirected unique pairs (lexicographically ordered endpoints).
    let mut pairs: BTreeSet<(&str, &str)> = BTreeSet::new();
    let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for edge in edges {
        if edge.from == edge.to {
            continue;
        }
        let (a, b) = if edge.from < edge.to {
            (edge.from.as_str(), edge.to.as_str())
        } else {
            (edge.to.as_str(), edge.from.as_str())
        };
        if pairs.insert((a, b)) {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
    }

    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut communities = Vec::new();

    let starts: Vec<&str> = adjacency.keys().copied().collect();
    for start in starts {
        if visited.contains(start) {
            continue;
        }

        // Explicit stack instead of recursion.
        let mut members: Vec<&str> = Vec::new();
        let mut stack = vec![start];
        visited.insert(start);
        while let Some(current) = stack.pop() {
            members.push(current);
            if let Some(neighbors) = adjacency.get(current) {
                for &next in neighbors {
                    if visited.insert(next) {
                        stack.push(next);
                    }
                }
            }
        }

        if members.len() < 2 {
            continue;
        }

        let member_set: BTreeSet<&str> = members.iter().copied().collect();
        let internal_edges = pairs
            .iter()
            .filter(|(a, b)| member_set.contains(a) && member_set.contains(b))
            .count();
        let possible = members.len() * (members.len() - 1) / 2;
        let density = internal_edges as f64 / possible as f64;

        let mut member_list: Vec<String> =
            members.into_iter().map(str::to_string).collect();
        member_list.sort();
        communities.push(Community { members: member_list, density });
    }

    communities
}
