use hiergraph::graph::{GraphError, NodeAttrs};
use hiergraph::schema::{load_schema, SchemaError, SchemaLoader};
use std::collections::HashSet;
use std::io::Write;

const PRODUCT_TREE: &str = r#"{"Business Group": {"name": "Etch", "children": [
    {"name": "Kiyo", "children": [
        {"name": "Kiyo45", "children": [{"name": "Chamber", "connected_to": "RF Generator"}]},
        {"name": "KiyoF"}
    ]},
    {"name": "Versys", "connected_to": "Kiyo", "children": [
        {"name": "Versys Metal", "children": [{"name": "RF Generator", "children": [{"name": "Coil"}]}]}
    ]}
]}}"#;

#[test]
fn test_node_count_matches_distinct_names() {
    let graph = load_schema(PRODUCT_TREE).unwrap();

    let names: HashSet<&str> = [
        "Etch", "Kiyo", "Kiyo45", "Chamber", "KiyoF", "Versys", "Versys Metal", "RF Generator", "Coil",
    ]
    .into_iter()
    .collect();
    assert_eq!(graph.node_count(), names.len());
    assert_eq!(graph.in_degree("Etch"), Some(0));
    assert_eq!(graph.find_root().unwrap().as_str(), "Etch");
}

#[test]
fn test_levels_and_types_follow_depth() {
    let graph = load_schema(PRODUCT_TREE).unwrap();

    assert_eq!(graph.node("Etch"), Some(&NodeAttrs::at_level(0)));
    assert_eq!(graph.node("Versys").unwrap().node_type.as_deref(), Some("product_family"));
    assert_eq!(graph.node("Kiyo45").unwrap().node_type.as_deref(), Some("product_offering"));
    assert_eq!(graph.node("Chamber").unwrap().node_type.as_deref(), Some("module"));
    // Forward reference from Chamber, declared later at level 3
    assert_eq!(graph.node("RF Generator").unwrap().level, Some(3));
    assert_eq!(graph.node("Coil").unwrap().node_type.as_deref(), Some("part"));

    assert_eq!(graph.level_histogram().values().sum::<usize>(), graph.node_count());
}

#[test]
fn test_cross_links() {
    let graph = load_schema(PRODUCT_TREE).unwrap();
    assert!(graph.has_edge("Chamber", "RF Generator"));
    assert!(graph.has_edge("Versys", "Kiyo"));
    // tree edges + two cross links
    assert_eq!(graph.edge_count(), 8 + 2);
}

#[test]
fn test_cycle_through_root_leaves_no_root() {
    let json = r#"{"Business Group": {"name": "BG", "children": [{"name": "PF1", "connected_to": "BG"}]}}"#;
    let graph = load_schema(json).unwrap();
    assert_eq!(graph.find_root(), Err(GraphError::EmptyGraph));
}

#[test]
fn test_custom_root_key() {
    let json = r#"{"Division": {"name": "D", "children": [{"name": "F"}]}}"#;
    assert!(matches!(load_schema(json), Err(SchemaError::MalformedSchema { .. })));

    let graph = SchemaLoader::new().with_root_key("Division").load_str(json).unwrap();
    assert_eq!(graph.node_count(), 2);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", PRODUCT_TREE).unwrap();

    let graph = SchemaLoader::default().load_path(file.path()).unwrap();
    assert_eq!(graph.node_count(), 9);

    let missing = SchemaLoader::default().load_path(file.path().with_extension("missing"));
    assert!(matches!(missing, Err(SchemaError::Io(_))));
}

#[test]
fn test_malformed_schema_reports_location() {
    let json = r#"{"Business Group": {"name": "BG", "children": [{"name": "PF1"}, {"title": "PF2"}]}}"#;
    match load_schema(json) {
        Err(SchemaError::MalformedSchema { path, .. }) => {
            assert_eq!(path, "$.Business Group.children[1]");
        }
        other => panic!("expected malformed schema, got {:?}", other),
    }
}
