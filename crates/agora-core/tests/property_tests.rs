//! # Property-Based Tests
//!
//! Invariant verification for the filter and layout engines.
//!
//! These tests pin down the guarantees the views rely on: edge closure,
//! pinned-selection survival, the pruning bound, determinism, and the
//! Sankey conservation law.

use agora_core::overview::{EvidenceLink, EvidenceNode, EvidenceStage};
use agora_core::{
    FilterOptions, FilterPatch, FilterState, ForceLayoutOptions, GraphEdge, GraphModel, GraphNode,
    NodeId, NodeKind, SelectionPatch, SelectionState, evidence_flow_layout, filter_graph,
    force_network_layout,
};
use agora_core::{FlowLayoutOptions, ReducedGraph};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// GENERATORS
// =============================================================================

const KINDS: [NodeKind; 4] = [
    NodeKind::Person,
    NodeKind::Work,
    NodeKind::Concept,
    NodeKind::Argument,
];
const PERIODS: [&str; 3] = ["classical", "hellenistic", "late_antique"];
const SCHOOLS: [&str; 3] = ["academy", "stoa", "lyceum"];
const RELATIONS: [&str; 3] = ["influenced", "refuted", "developed"];

#[derive(Debug, Clone)]
struct RawGraph {
    nodes: Vec<(usize, Option<usize>, Option<usize>)>,
    edges: Vec<(usize, usize, usize)>,
}

fn raw_graph() -> impl Strategy<Value = RawGraph> {
    (
        vec(
            (0usize..KINDS.len(), proptest::option::of(0usize..PERIODS.len()), proptest::option::of(0usize..SCHOOLS.len())),
            1..30,
        ),
        vec((any::<usize>(), any::<usize>(), 0usize..RELATIONS.len()), 0..60),
    )
        .prop_map(|(nodes, edges)| RawGraph { nodes, edges })
}

fn build_model(raw: &RawGraph) -> GraphModel {
    let nodes: Vec<GraphNode> = raw
        .nodes
        .iter()
        .enumerate()
        .map(|(i, (kind, period, school))| {
            let mut node = GraphNode::new(format!("n{i}"), format!("Node {i}"), KINDS[*kind].clone());
            node.period = period.map(|p| PERIODS[p].to_string());
            node.school = school.map(|s| SCHOOLS[s].to_string());
            node
        })
        .collect();
    let n = raw.nodes.len();
    let edges: Vec<GraphEdge> = raw
        .edges
        .iter()
        .enumerate()
        .map(|(i, (a, b, rel))| {
            GraphEdge::new(
                format!("e{i}"),
                format!("n{}", a % n),
                format!("n{}", b % n),
                RELATIONS[*rel],
            )
        })
        .collect();
    GraphModel::new(nodes, edges)
}

fn build_filters(
    kinds: &[NodeKind],
    periods: &[&str],
    relations: &[&str],
    search: &str,
) -> FilterState {
    FilterPatch {
        node_kinds: Some(kinds.iter().map(|k| k.as_str().to_string()).collect()),
        periods: Some(periods.iter().map(|p| (*p).to_string()).collect()),
        relations: Some(relations.iter().map(|r| (*r).to_string()).collect()),
        search_term: Some(search.to_string()),
        ..FilterPatch::default()
    }
    .apply(&FilterState::default())
}

fn build_selection(raw: &RawGraph, picks: &[usize]) -> SelectionState {
    let n = raw.nodes.len();
    SelectionPatch {
        nodes: Some(picks.iter().map(|i| NodeId::new(format!("n{}", i % n))).collect()),
        ..SelectionPatch::default()
    }
    .apply(&SelectionState::default())
}

fn assert_closure(reduced: &ReducedGraph) {
    let ids = reduced.node_ids();
    for edge in &reduced.edges {
        assert!(ids.contains(&edge.source), "edge source outside node set");
        assert!(ids.contains(&edge.target), "edge target outside node set");
    }
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Every edge in the output has both endpoints in the output node set,
    /// for any graph, filter, selection, and budget.
    #[test]
    fn closure_holds_for_any_input(
        raw in raw_graph(),
        kinds in proptest::sample::subsequence(KINDS.to_vec(), 0..=4),
        periods in proptest::sample::subsequence(PERIODS.to_vec(), 0..=3),
        relations in proptest::sample::subsequence(RELATIONS.to_vec(), 0..=3),
        picks in vec(any::<usize>(), 0..5),
        max_nodes in 1usize..40,
    ) {
        let model = build_model(&raw);
        let filters = build_filters(&kinds, &periods, &relations, "");
        let selection = build_selection(&raw, &picks);
        let reduced = filter_graph(&model, &filters, &selection, &FilterOptions { max_nodes });
        assert_closure(&reduced);
    }

    /// Any pinned id that exists in the graph appears in the output
    /// regardless of the predicates.
    #[test]
    fn pinned_selection_always_survives(
        raw in raw_graph(),
        kinds in proptest::sample::subsequence(KINDS.to_vec(), 0..=4),
        picks in vec(any::<usize>(), 1..5),
        max_nodes in 1usize..10,
    ) {
        let model = build_model(&raw);
        let filters = build_filters(&kinds, &[], &[], "");
        let selection = build_selection(&raw, &picks);
        let reduced = filter_graph(&model, &filters, &selection, &FilterOptions { max_nodes });
        let ids = reduced.node_ids();
        for pinned in &selection.nodes {
            prop_assert!(ids.contains(pinned), "pinned {pinned} was dropped");
        }
    }

    /// Output size never exceeds the budget plus the pinned exemption.
    #[test]
    fn pruning_bound_holds(
        raw in raw_graph(),
        picks in vec(any::<usize>(), 0..5),
        max_nodes in 1usize..20,
    ) {
        let model = build_model(&raw);
        let selection = build_selection(&raw, &picks);
        let reduced = filter_graph(
            &model,
            &FilterState::default(),
            &selection,
            &FilterOptions { max_nodes },
        );
        prop_assert!(reduced.nodes.len() <= max_nodes + selection.nodes.len());
    }

    /// Identical inputs produce identical output sets AND ordering.
    #[test]
    fn filtering_is_deterministic(
        raw in raw_graph(),
        kinds in proptest::sample::subsequence(KINDS.to_vec(), 0..=4),
        relations in proptest::sample::subsequence(RELATIONS.to_vec(), 0..=3),
        max_nodes in 1usize..20,
    ) {
        let model = build_model(&raw);
        let filters = build_filters(&kinds, &[], &relations, "");
        let first = filter_graph(&model, &filters, &SelectionState::default(), &FilterOptions { max_nodes });
        let second = filter_graph(&model, &filters, &SelectionState::default(), &FilterOptions { max_nodes });
        prop_assert_eq!(first, second);
    }

    /// Applying the same filter patch twice is a no-op beyond the first.
    #[test]
    fn filter_normalization_is_idempotent(
        kinds in vec(0usize..KINDS.len(), 0..8),
        search in "[a-z]{0,8}",
    ) {
        let patch = FilterPatch {
            node_kinds: Some(kinds.iter().map(|k| KINDS[*k].as_str().to_string()).collect()),
            search_term: Some(search),
            ..FilterPatch::default()
        };
        let once = patch.apply(&FilterState::default());
        let twice = patch.apply(&once);
        prop_assert_eq!(once, twice);
    }

    /// For any positive values, column node heights plus gaps equal the
    /// available height when the floor clamp is disabled.
    #[test]
    fn sankey_conservation_holds(
        values in vec(0.5f64..200.0, 1..15),
        height in 100.0f64..800.0,
    ) {
        let nodes: Vec<EvidenceNode> = values
            .iter()
            .enumerate()
            .map(|(i, _)| EvidenceNode {
                id: NodeId::new(format!("a{i}")),
                label: format!("Argument {i}"),
                stage: EvidenceStage::Argument,
            })
            .collect();
        let sink = EvidenceNode {
            id: NodeId::new("sink"),
            label: "Sink".to_string(),
            stage: EvidenceStage::AncientSource,
        };
        let links: Vec<EvidenceLink> = values
            .iter()
            .enumerate()
            .map(|(i, v)| EvidenceLink {
                source: NodeId::new(format!("a{i}")),
                target: NodeId::new("sink"),
                value: *v,
            })
            .collect();
        let mut all_nodes = nodes;
        all_nodes.push(sink);

        let options = FlowLayoutOptions {
            height,
            gap: 12.0,
            min_node_height: 0.0,
            ..FlowLayoutOptions::default()
        };
        let layout = evidence_flow_layout(&all_nodes, &links, &options);

        let column_height: f64 = layout
            .nodes
            .iter()
            .filter(|n| n.stage == EvidenceStage::Argument)
            .map(|n| n.height)
            .sum();
        let gaps = 12.0 * (values.len() as f64 - 1.0);
        prop_assert!((column_height + gaps - height).abs() < 1e-6);
    }

    /// The force layout is a pure function of the id set.
    #[test]
    fn force_layout_is_deterministic(
        node_count in 1usize..10,
        edge_pairs in vec((any::<usize>(), any::<usize>()), 0..10),
    ) {
        let nodes: Vec<NodeId> = (0..node_count).map(|i| NodeId::new(format!("n{i}"))).collect();
        let edges: Vec<(NodeId, NodeId)> = edge_pairs
            .iter()
            .map(|(a, b)| {
                (
                    NodeId::new(format!("n{}", a % node_count)),
                    NodeId::new(format!("n{}", b % node_count)),
                )
            })
            .collect();
        let options = ForceLayoutOptions { iterations: 50, ..ForceLayoutOptions::default() };
        let first = force_network_layout(&nodes, &edges, &options);
        let second = force_network_layout(&nodes, &edges, &options);
        prop_assert_eq!(first, second);
    }
}
