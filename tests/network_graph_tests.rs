// Interaction graph thresholding and community detection.

mod util;

use defi_wallet_profiler::analysis::NetworkGraphBuilder;
use defi_wallet_profiler::config::GraphConfig;
use util::feature_vector;

fn wallet(address: &str, counterparties: &[(&str, u64)]) -> defi_wallet_profiler::WalletFeatureVector {
    let tx_count: u64 = counterparties.iter().map(|(_, c)| *c).sum();
    feature_vector(address, tx_count.max(1), 1, 10.0, 20.0, 1.0, 10.0, &[10], counterparties)
}

#[test]
fn one_shared_interaction_is_below_default_threshold() {
    let builder = NetworkGraphBuilder::new(GraphConfig::default());
    let graph = builder.build(&[
        wallet("0xa", &[("0xb", 1)]),
        wallet("0xb", &[("0xa", 1)]),
    ]);
    assert!(graph.edges.is_empty());
    assert!(graph.communities.is_empty());
}

#[test]
fn two_shared_interactions_create_the_edge() {
    let builder = NetworkGraphBuilder::new(GraphConfig::default());
    let graph = builder.build(&[
        wallet("0xa", &[("0xb", 2)]),
        wallet("0xb", &[("0xa", 2)]),
    ]);
    assert_eq!(graph.edges.len(), 2);
    assert_eq!(graph.communities.len(), 1);
    assert_eq!(graph.communities[0].density, 1.0);
}

#[test]
fn threshold_is_configurable() {
    let builder = NetworkGraphBuilder::new(GraphConfig { min_interactions: 5 });
    let graph = builder.build(&[wallet("0xa", &[("0xb", 4), ("0xc", 5)])]);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].to, "0xc");
}

#[test]
fn singleton_components_are_dropped() {
    let builder = NetworkGraphBuilder::new(GraphConfig::default());
    // 0xloner has no qualifying edges; 0xa-0xb form the only community.
    let graph = builder.build(&[
        wallet("0xa", &[("0xb", 3)]),
        wallet("0xloner", &[("0xother", 1)]),
    ]);
    assert_eq!(graph.communities.len(), 1);
    assert!(graph.communities[0].members.contains(&"0xa".to_string()));
    assert!(graph.communities[0].members.contains(&"0xb".to_string()));
}

#[test]
fn chain_of_three_has_partial_density() {
    let builder = NetworkGraphBuilder::new(GraphConfig::default());
    let graph = builder.build(&[
        wallet("0xa", &[("0xb", 2)]),
        wallet("0xb", &[("0xc", 2)]),
    ]);
    assert_eq!(graph.communities.len(), 1);
    let c = &graph.communities[0];
    assert_eq!(c.members.len(), 3);
    assert!((c.density - 2.0 / 3.0).abs() < 1e-12);
    assert!((0.0..=1.0).contains(&c.density));
}

#[test]
fn large_ring_traversal_does_not_recurse() {
    // 5000-node ring; explicit-stack DFS must walk it without overflow.
    let wallets: Vec<_> = (0..5000)
        .map(|i| {
            let next = format!("0x{:04x}", (i + 1) % 5000);
            wallet(&format!("0x{i:04x}"), &[(next.as_str(), 2)])
        })
        .collect();
    let builder = NetworkGraphBuilder::new(GraphConfig::default());
    let graph = builder.build(&wallets);
    assert_eq!(graph.communities.len(), 1);
    assert_eq!(graph.communities[0].members.len(), 5000);
}

#[test]
fn importance_grows_with_activity() {
    let builder = NetworkGraphBuilder::new(GraphConfig::default());
    let graph = builder.build(&[
        wallet("0xbusy", &[("0xb", 10), ("0xc", 10), ("0xd", 10)]),
        wallet("0xquiet", &[("0xb", 2)]),
    ]);
    let busy = graph.nodes.iter().find(|n| n.address == "0xbusy").unwrap();
    let quiet = graph.nodes.iter().find(|n| n.address == "0xquiet").unwrap();
    assert!(busy.importance > quiet.importance);
}
