use hiergraph::graph::{node_type_for_level, NodeKey};
use hiergraph::growth::{extend_levels, GraphExtender, GrowthConfig, LevelPlan};
use hiergraph::schema::load_schema;
use hiergraph::HierGraph;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

const SCENARIO: &str = r#"{"Business Group": {"name": "BG", "children": [{"name": "PF1"}, {"name": "PF2"}]}}"#;

#[test]
fn test_scenario_extension() {
    let mut graph = load_schema(SCENARIO).unwrap();
    let mut rng = StdRng::seed_from_u64(11);

    let report = GraphExtender::default()
        .with_connections_per_node(1)
        .with_jump_probability(0.0)
        .extend(&mut graph, &LevelPlan::from([(0, 4)]), &mut rng)
        .unwrap();

    assert_eq!(report.nodes_added(), 4);
    let new_nodes: Vec<&NodeKey> = graph.nodes_at_level(2);
    assert_eq!(new_nodes.len(), 4);
    for key in new_nodes {
        let from_parents = graph
            .predecessors(key.as_str())
            .unwrap()
            .into_iter()
            .filter(|p| p.as_str() == "PF1" || p.as_str() == "PF2")
            .count();
        assert_eq!(from_parents, 1, "{} should have one parent", key);
    }
}

#[test]
fn test_every_level_gets_exact_count_and_type() {
    let mut graph = load_schema(SCENARIO).unwrap();
    let config = GrowthConfig::with_levels(LevelPlan::from([(3, 25), (4, 40), (5, 5)])).with_seed(3);
    let mut rng = StdRng::seed_from_u64(3);

    let report = extend_levels(&mut graph, &config, &mut rng).unwrap();

    for (level, expected) in [(2, 25), (3, 40), (4, 5)] {
        let keys = graph.nodes_at_level(level);
        assert_eq!(keys.len(), expected);
        for key in keys {
            assert_eq!(graph.node(key.as_str()).unwrap().node_type, Some(node_type_for_level(level)));
        }
    }
    assert_eq!(graph.node_count(), 3 + 70);
    assert_eq!(report.levels.iter().map(|l| l.level).collect::<Vec<_>>(), vec![2, 3, 4]);
}

#[test]
fn test_levels_beyond_type_table() {
    let mut graph = load_schema(SCENARIO).unwrap();
    let plan: LevelPlan = (0..5).map(|i| (i, 2)).collect();
    GraphExtender::default()
        .extend(&mut graph, &plan, &mut StdRng::seed_from_u64(5))
        .unwrap();

    let deepest = graph.nodes_at_level(6);
    assert_eq!(deepest.len(), 2);
    assert_eq!(graph.node(deepest[0].as_str()).unwrap().node_type.as_deref(), Some("level_6"));
}

#[test]
fn test_jump_edge_rate() {
    let p = 0.3;
    let nodes_per_trial = 500;
    let trials = 10;

    let mut jumps = 0;
    for seed in 0..trials {
        let mut graph = load_schema(SCENARIO).unwrap();
        let report = GraphExtender::default()
            .with_jump_probability(p)
            .extend(&mut graph, &LevelPlan::from([(0, nodes_per_trial)]), &mut StdRng::seed_from_u64(seed))
            .unwrap();
        jumps += report.jump_edges();
    }

    let expected = p * (nodes_per_trial as f64) * (trials as f64);
    // 1500 expected, standard deviation about 35
    assert!(((jumps as f64) - expected).abs() < 200.0, "{} jumps, expected about {}", jumps, expected);
}

#[test]
fn test_zero_jump_probability_gives_no_jumps() {
    for seed in 0..5 {
        let mut graph = load_schema(SCENARIO).unwrap();
        let report = GraphExtender::default()
            .with_connections_per_node(2)
            .extend(&mut graph, &LevelPlan::from([(0, 100), (1, 100)]), &mut StdRng::seed_from_u64(seed))
            .unwrap();
        assert_eq!(report.jump_edges(), 0);
    }
}

#[test]
fn test_parents_are_distinct() {
    let mut graph = load_schema(SCENARIO).unwrap();
    let mut rng = StdRng::seed_from_u64(21);
    let extender = GraphExtender::default().with_connections_per_node(4);
    extender.extend(&mut graph, &LevelPlan::from([(0, 6), (1, 60)]), &mut rng).unwrap();

    let parent_level: HashSet<&str> = graph.nodes_at_level(2).into_iter().map(NodeKey::as_str).collect();
    for child in graph.nodes_at_level(3) {
        let parents: Vec<&str> = graph
            .predecessors(child.as_str())
            .unwrap()
            .into_iter()
            .map(NodeKey::as_str)
            .filter(|p| parent_level.contains(p))
            .collect();
        let distinct: HashSet<&str> = parents.iter().copied().collect();
        assert_eq!(parents.len(), 4);
        assert_eq!(distinct.len(), 4);
    }
}

#[test]
fn test_root_fallback_links_single_node() {
    let mut graph = HierGraph::new();
    graph.add_edge("BG", "PF1");
    // No levels declared: everything reads as level 0 and level 0 has no level below
    let plan = LevelPlan::from([(0, 0), (1, 3)]);
    let report = GraphExtender::default()
        .extend(&mut graph, &plan, &mut StdRng::seed_from_u64(1))
        .unwrap();

    let fallback = &report.levels[1];
    assert_eq!(fallback.level, 2);
    assert!(fallback.root_fallback);
    assert_eq!(fallback.parent_edges, 1);
    assert!(graph.has_edge("BG", fallback.nodes[0].as_str()));
    assert!(!graph.has_edge("BG", fallback.nodes[1].as_str()));
}

#[test]
fn test_seeded_runs_match() {
    let config = GrowthConfig::uniform(3, 3, 50).unwrap();
    let run = |seed| {
        let mut graph = load_schema(SCENARIO).unwrap();
        extend_levels(&mut graph, &config, &mut StdRng::seed_from_u64(seed)).unwrap();
        graph.to_document()
    };
    assert_eq!(run(8), run(8));
    assert_ne!(run(8), run(9));
}

#[test]
fn test_generated_graph_round_trips() {
    let mut graph = load_schema(SCENARIO).unwrap();
    extend_levels(&mut graph, &GrowthConfig::uniform(3, 2, 30).unwrap(), &mut StdRng::seed_from_u64(4)).unwrap();

    let restored = HierGraph::from_json(&graph.to_json_pretty().unwrap()).unwrap();

    let nodes = |g: &HierGraph| -> HashSet<(String, Option<u32>)> {
        g.nodes().map(|(k, a)| (k.to_string(), a.level)).collect()
    };
    let edges = |g: &HierGraph| -> HashSet<(String, String)> {
        g.edges().map(|(s, t)| (s.to_string(), t.to_string())).collect()
    };
    assert_eq!(nodes(&graph), nodes(&restored));
    assert_eq!(edges(&graph), edges(&restored));
}
