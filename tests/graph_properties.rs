//! Structural properties of the JSON to graph mapping.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use record_graph_viewer::browser::RecordBrowser;
use record_graph_viewer::graph::{
	BuildOptions, GraphBuilder, GraphData, NodeGroup, ROOT_ID, build_graph,
};
use record_graph_viewer::record::Record;
use serde_json::{Map, Value, json};

fn json_value() -> impl Strategy<Value = Value> {
	let leaf = prop_oneof![
		Just(Value::Null),
		any::<bool>().prop_map(Value::Bool),
		any::<i32>().prop_map(|n| json!(n)),
		"[a-z ]{0,8}".prop_map(Value::String),
	];
	leaf.prop_recursive(6, 64, 5, |inner| {
		prop_oneof![
			prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
			prop::collection::vec(("[a-z/~#]{0,3}", inner), 0..5)
				.prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
		]
	})
}

fn assert_rooted_tree(data: &GraphData) {
	let roots: Vec<_> = data
		.nodes
		.iter()
		.filter(|n| n.group == NodeGroup::Root)
		.collect();
	assert_eq!(roots.len(), 1);
	assert_eq!(roots[0].id, ROOT_ID);

	let ids: HashSet<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids.len(), data.nodes.len(), "node ids must be unique");

	let mut incoming: HashMap<&str, usize> = HashMap::new();
	for link in &data.links {
		assert!(ids.contains(link.source.as_str()), "dangling source {}", link.source);
		assert!(ids.contains(link.target.as_str()), "dangling target {}", link.target);
		*incoming.entry(link.target.as_str()).or_default() += 1;
	}
	assert_eq!(data.links.len() + 1, data.nodes.len());
	assert!(!incoming.contains_key(ROOT_ID));
	for node in data.nodes.iter().filter(|n| n.id != ROOT_ID) {
		assert_eq!(incoming.get(node.id.as_str()), Some(&1), "{} needs one parent", node.id);
	}
}

proptest! {
	#[test]
	fn any_document_maps_to_a_rooted_tree(value in json_value()) {
		assert_rooted_tree(&build_graph(&value));
	}

	#[test]
	fn shallow_limits_still_produce_a_tree(value in json_value(), max_depth in 0usize..3) {
		let builder = GraphBuilder::new(BuildOptions { max_depth, ..BuildOptions::default() });
		let build = builder.build(&value);
		assert_rooted_tree(&build.data);
		for node in &build.data.nodes {
			prop_assert!(node.id.matches('/').count() <= max_depth + 1);
		}
	}

	#[test]
	fn building_twice_gives_the_same_graph(value in json_value()) {
		prop_assert_eq!(build_graph(&value), build_graph(&value));
	}

	#[test]
	fn paging_wraps_around(len in 1usize..20, steps in 0usize..50) {
		let records = (0..len)
			.map(|i| Record { id: i as i64, json_content: json!({ "n": i }), created_at: None })
			.collect();
		let mut browser = RecordBrowser::new(records);
		for _ in 0..steps {
			browser.next();
		}
		prop_assert_eq!(browser.index(), steps % len);
		for _ in 0..steps {
			browser.previous();
		}
		prop_assert_eq!(browser.index(), 0);
	}
}

#[test]
fn empty_object_is_just_the_root() {
	let data = build_graph(&json!({}));
	assert_eq!(data.nodes.len(), 1);
	assert!(data.links.is_empty());
	assert_eq!(data.nodes[0].group, NodeGroup::Root);
}

#[test]
fn nested_object_becomes_a_chain() {
	let data = build_graph(&json!({ "a": { "b": 1 } }));
	let groups: Vec<_> = data.nodes.iter().map(|n| (n.name.as_str(), n.group)).collect();
	assert_eq!(
		groups,
		[
			("Self", NodeGroup::Root),
			("a", NodeGroup::Category),
			("b", NodeGroup::Leaf),
		]
	);
	assert_eq!(data.links.len(), 2);
	assert_rooted_tree(&data);
}
