//! Property-based checks for RR-set pools and spread estimates.

use proptest::{collection::vec, prelude::*};
use ris_core::{
    DiffusionModel, DirectedGraph, EdgeRecord, InfluenceGraph, LinearThresholdMode, NodeId,
    RrSetGeneratorBuilder,
};
use test_strategy::Arbitrary;

/// Kernel configuration explored by the properties.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
enum KernelChoice {
    #[weight(2)]
    Cascade,
    #[weight(1)]
    ThresholdEquivalent,
    #[weight(2)]
    ThresholdWalk,
}

impl KernelChoice {
    fn configure(self, builder: RrSetGeneratorBuilder) -> RrSetGeneratorBuilder {
        match self {
            Self::Cascade => builder.with_model(DiffusionModel::IndependentCascade),
            Self::ThresholdEquivalent => builder
                .with_model(DiffusionModel::LinearThreshold)
                .with_threshold_mode(LinearThresholdMode::CascadeEquivalent),
            Self::ThresholdWalk => builder
                .with_model(DiffusionModel::LinearThreshold)
                .with_threshold_mode(LinearThresholdMode::Threshold),
        }
    }
}

fn graph_strategy() -> impl Strategy<Value = DirectedGraph> {
    (1_usize..=12).prop_flat_map(|nodes| {
        vec((0..nodes, 0..nodes, 0.0_f64..=1.0), 0..=nodes * 3).prop_map(move |edges| {
            let mut graph = DirectedGraph::new();
            for node in 0..nodes {
                graph.add_node(node);
            }
            for (source, target, prob) in edges {
                graph.add_edge(EdgeRecord::new(source, target).with_influence_prob(prob));
            }
            graph
        })
    })
}

fn seeds_strategy() -> impl Strategy<Value = Vec<NodeId>> {
    vec(0_usize..12, 0..=6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pools_are_complete_and_rooted(
        graph in graph_strategy(),
        kernel in any::<KernelChoice>(),
        theta in 1_usize..64,
        seed in any::<u64>(),
    ) {
        let node_count = graph.node_count();
        let generator = kernel
            .configure(RrSetGeneratorBuilder::new())
            .with_workers(1)
            .with_seed(seed)
            .build(graph)
            .expect("configuration must be valid");

        let pool = generator.generate(theta);
        prop_assert_eq!(pool.len(), theta);
        prop_assert_eq!(pool.failed_tasks(), 0);
        for set in &pool {
            prop_assert!(set.contains(set.root()));
            prop_assert!(set.size() >= 1 && set.size() <= node_count);
            prop_assert!(set.nodes().windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn estimates_stay_within_node_count(
        graph in graph_strategy(),
        seeds in seeds_strategy(),
        theta in 0_usize..48,
        seed in any::<u64>(),
    ) {
        let node_count = graph.node_count() as f64;
        let generator = RrSetGeneratorBuilder::new()
            .with_workers(1)
            .with_seed(seed)
            .build(graph)
            .expect("configuration must be valid");
        let pool = generator.generate(theta);
        let estimator = generator.estimator(&pool);

        let spread = estimator.estimate_spread(&seeds);
        prop_assert!((0.0..=node_count).contains(&spread));

        let coverage_total: usize = estimator.node_coverage().values().sum();
        prop_assert_eq!(coverage_total, pool.total_size());
    }

    #[test]
    fn adding_seeds_never_lowers_the_estimate(
        graph in graph_strategy(),
        seeds in seeds_strategy(),
        extra in seeds_strategy(),
        seed in any::<u64>(),
    ) {
        let generator = RrSetGeneratorBuilder::new()
            .with_workers(1)
            .with_seed(seed)
            .build(graph)
            .expect("configuration must be valid");
        let pool = generator.generate(32);
        let estimator = generator.estimator(&pool);

        let base = estimator.estimate_spread(&seeds);
        let widened = estimator.estimate_spread(seeds.iter().chain(&extra));
        prop_assert!(widened >= base);
    }

    #[test]
    fn all_nodes_cover_every_set(graph in graph_strategy(), seed in any::<u64>()) {
        let nodes = graph.nodes().to_vec();
        let node_count = nodes.len() as f64;
        let generator = RrSetGeneratorBuilder::new()
            .with_workers(1)
            .with_seed(seed)
            .build(graph)
            .expect("configuration must be valid");
        let pool = generator.generate(16);

        let spread = generator.estimator(&pool).estimate_spread(&nodes);
        prop_assert!((spread - node_count).abs() < 1e-9);
    }
}
