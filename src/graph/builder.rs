use std::borrow::Cow;

use log::warn;
use serde_json::Value;

use super::types::{GraphData, GraphLink, GraphNode, NodeGroup, Position};
use crate::error::MalformedInputWarning;
use crate::tree::display_value;

/// Id of the single root node.
pub const ROOT_ID: &str = "root";
/// Default display name of the root node.
pub const ROOT_NAME: &str = "Self";
/// Nesting depth past which subtrees are replaced by a marker node.
pub const DEFAULT_MAX_DEPTH: usize = 64;

const ROOT_VALUE: f64 = 20.0;
const CATEGORY_VALUE: f64 = 15.0;
const LEAF_VALUE: f64 = 10.0;
const ROOT_LINK_VALUE: f64 = 2.0;
const LINK_VALUE: f64 = 1.0;

const SCALAR_SUFFIX: &str = "#value";
const TRUNCATED_SUFFIX: &str = "#truncated";

/// Limits and labels for [`GraphBuilder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
	/// Containers nested this deep are not expanded.
	pub max_depth: usize,
	/// Display name of the root node.
	pub root_name: String,
}

impl Default for BuildOptions {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
			root_name: ROOT_NAME.into(),
		}
	}
}

/// Graph data plus whatever had to be cut to produce it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphBuild {
	/// The graph itself.
	pub data: GraphData,
	/// One entry per truncated subtree.
	pub warnings: Vec<MalformedInputWarning>,
}

/// Container whose children still have to be emitted.
struct Pending<'v> {
	id: String,
	value: &'v Value,
	depth: usize,
}

/// Maps arbitrary JSON onto a rooted tree of nodes and links.
///
/// Every object key and every array element becomes a node linked to its
/// parent. Keys and elements holding objects or arrays are
/// [`NodeGroup::Category`] nodes and are expanded further; scalars are
/// [`NodeGroup::Leaf`] nodes carrying the stringified value in `detail`.
///
/// Node ids are the escaped path from the root joined with `/`, so two keys
/// with the same name under different parents never collide. The walk uses
/// an explicit stack and stops expanding at [`BuildOptions::max_depth`].
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
	options: BuildOptions,
}

impl GraphBuilder {
	/// A builder with custom limits.
	pub fn new(options: BuildOptions) -> Self {
		Self { options }
	}

	/// Map `value` onto a graph, collecting warnings instead of failing.
	pub fn build(&self, value: &Value) -> GraphBuild {
		let mut out = GraphBuild::default();
		out.data.nodes.push(GraphNode {
			id: ROOT_ID.into(),
			name: self.options.root_name.clone(),
			group: NodeGroup::Root,
			value: ROOT_VALUE,
			position: Some(Position::default()),
			detail: None,
		});

		if !is_container(value) {
			let id = format!("{ROOT_ID}{SCALAR_SUFFIX}");
			push_child(&mut out.data, ROOT_ID, id, "value".into(), value);
			return out;
		}

		let mut stack = vec![Pending {
			id: ROOT_ID.into(),
			value,
			depth: 0,
		}];
		while let Some(Pending { id, value, depth }) = stack.pop() {
			if is_empty_container(value) {
				continue;
			}
			if depth >= self.options.max_depth {
				self.truncate(&mut out, &id);
				continue;
			}

			let mut nested = Vec::new();
			for (segment, name, child) in entries(value) {
				let child_id = format!("{id}/{segment}");
				push_child(&mut out.data, &id, child_id.clone(), name, child);
				if is_container(child) {
					nested.push(Pending {
						id: child_id,
						value: child,
						depth: depth + 1,
					});
				}
			}
			// Reversed so siblings are expanded in document order.
			stack.extend(nested.into_iter().rev());
		}
		out
	}

	fn truncate(&self, out: &mut GraphBuild, id: &str) {
		let marker_id = format!("{id}{TRUNCATED_SUFFIX}");
		out.data.links.push(link(id, &marker_id));
		out.data.nodes.push(GraphNode {
			id: marker_id,
			name: "…".into(),
			group: NodeGroup::Leaf,
			value: LEAF_VALUE,
			position: None,
			detail: Some(format!("depth limit {} reached", self.options.max_depth)),
		});
		out.warnings.push(MalformedInputWarning::DepthLimit {
			node_id: id.into(),
			depth: self.options.max_depth,
		});
	}
}

/// Build with default options, logging anything that had to be truncated.
pub fn build_graph(value: &Value) -> GraphData {
	let build = GraphBuilder::default().build(value);
	for warning in &build.warnings {
		warn!("{warning}");
	}
	build.data
}

fn is_container(value: &Value) -> bool {
	matches!(value, Value::Object(_) | Value::Array(_))
}

fn is_empty_container(value: &Value) -> bool {
	match value {
		Value::Object(map) => map.is_empty(),
		Value::Array(items) => items.is_empty(),
		_ => true,
	}
}

/// `(id segment, display name, value)` for each child of a container.
fn entries(value: &Value) -> Vec<(Cow<'_, str>, String, &Value)> {
	match value {
		Value::Object(map) => map
			.iter()
			.map(|(key, child)| (escape_segment(key), key.clone(), child))
			.collect(),
		Value::Array(items) => items
			.iter()
			.enumerate()
			.map(|(i, child)| (Cow::Owned(i.to_string()), format!("[{i}]"), child))
			.collect(),
		_ => Vec::new(),
	}
}

/// Escape the characters the id scheme uses as separators.
fn escape_segment(key: &str) -> Cow<'_, str> {
	if !key.contains(['~', '/', '#']) {
		return Cow::Borrowed(key);
	}
	Cow::Owned(
		key.replace('~', "~0")
			.replace('/', "~1")
			.replace('#', "~2"),
	)
}

fn push_child(data: &mut GraphData, parent: &str, id: String, name: String, value: &Value) {
	let (group, weight, detail) = if is_container(value) {
		(NodeGroup::Category, CATEGORY_VALUE, None)
	} else {
		(NodeGroup::Leaf, LEAF_VALUE, Some(display_value(value)))
	};
	data.links.push(link(parent, &id));
	data.nodes.push(GraphNode {
		id,
		name,
		group,
		value: weight,
		position: None,
		detail,
	});
}

fn link(source: &str, target: &str) -> GraphLink {
	GraphLink {
		source: source.into(),
		target: target.into(),
		value: if source == ROOT_ID {
			ROOT_LINK_VALUE
		} else {
			LINK_VALUE
		},
	}
}

#[cfg(test)]
mod tests {
	use serde_json::{Map, json};

	use super::*;

	fn ids(data: &GraphData) -> Vec<&str> {
		data.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn empty_object_is_a_lone_root() {
		let data = build_graph(&json!({}));
		assert_eq!(ids(&data), ["root"]);
		assert!(data.links.is_empty());
		assert_eq!(data.root().map(|n| n.group), Some(NodeGroup::Root));
	}

	#[test]
	fn root_is_labelled_self() {
		let data = build_graph(&json!({"a": 1}));
		let root = data.root().unwrap();
		assert_eq!((root.id.as_str(), root.name.as_str()), (ROOT_ID, "Self"));
		assert!(data.node("root/a").is_some());
	}

	#[test]
	fn empty_array_is_a_lone_root() {
		let data = build_graph(&json!([]));
		assert_eq!(data.nodes.len(), 1);
		assert!(data.links.is_empty());
	}

	#[test]
	fn nested_key_becomes_category_with_leaf() {
		let data = build_graph(&json!({"a": {"b": 1}}));
		assert_eq!(ids(&data), ["root", "root/a", "root/a/b"]);
		assert_eq!(data.node("root/a").unwrap().group, NodeGroup::Category);
		let b = data.node("root/a/b").unwrap();
		assert_eq!(b.group, NodeGroup::Leaf);
		assert_eq!(b.name, "b");
		assert_eq!(b.label(), "b: 1");
		let pairs: Vec<_> = data
			.links
			.iter()
			.map(|l| (l.source.as_str(), l.target.as_str(), l.value))
			.collect();
		assert_eq!(
			pairs,
			[("root", "root/a", 2.0), ("root/a", "root/a/b", 1.0)]
		);
	}

	#[test]
	fn same_key_under_different_parents_stays_distinct() {
		let data = build_graph(&json!({"x": {"name": 1}, "y": {"name": 2}}));
		assert!(data.node("root/x/name").is_some());
		assert!(data.node("root/y/name").is_some());
	}

	#[test]
	fn separator_characters_in_keys_do_not_collide() {
		let data = build_graph(&json!({"a/b": 1, "a": {"b": 2}, "a#truncated": 3}));
		assert!(data.node("root/a~1b").is_some());
		assert!(data.node("root/a/b").is_some());
		assert!(data.node("root/a~2truncated").is_some());
	}

	#[test]
	fn arrays_get_one_node_per_element() {
		let data = build_graph(&json!({"Values": ["Honesty", {"k": true}, [null]]}));
		let values: Vec<_> = data.children("root/Values").collect();
		assert_eq!(values, ["root/Values/0", "root/Values/1", "root/Values/2"]);
		let first = data.node("root/Values/0").unwrap();
		assert_eq!((first.name.as_str(), first.group), ("[0]", NodeGroup::Leaf));
		assert_eq!(first.detail.as_deref(), Some("Honesty"));
		assert_eq!(data.node("root/Values/1").unwrap().group, NodeGroup::Category);
		assert_eq!(
			data.node("root/Values/2/0").unwrap().detail.as_deref(),
			Some("null")
		);
	}

	#[test]
	fn top_level_scalar_hangs_off_root() {
		let data = build_graph(&json!("hello"));
		assert_eq!(ids(&data), ["root", "root#value"]);
		assert_eq!(data.nodes[1].detail.as_deref(), Some("hello"));
		assert_eq!(data.links.len(), 1);
	}

	#[test]
	fn siblings_expand_in_document_order() {
		let data = build_graph(&json!({"z": {"z1": 1}, "a": {"a1": 1}}));
		assert_eq!(
			ids(&data),
			["root", "root/z", "root/a", "root/z/z1", "root/a/a1"]
		);
	}

	#[test]
	fn depth_limit_truncates_with_marker() {
		let builder = GraphBuilder::new(BuildOptions {
			max_depth: 2,
			..BuildOptions::default()
		});
		let build = builder.build(&json!({"a": {"b": {"c": {"d": 1}}}}));
		let data = &build.data;
		assert!(data.node("root/a/b").is_some());
		assert!(data.node("root/a/b/c").is_none());
		let marker = data.node("root/a/b#truncated").unwrap();
		assert_eq!(marker.group, NodeGroup::Leaf);
		assert_eq!(
			build.warnings,
			[MalformedInputWarning::DepthLimit {
				node_id: "root/a/b".into(),
				depth: 2,
			}]
		);
	}

	#[test]
	fn very_deep_input_does_not_overflow() {
		// json! would re-serialize the whole chain on every step.
		let mut value = json!(1);
		for _ in 0..10_000 {
			let mut map = Map::new();
			map.insert("n".into(), value);
			value = Value::Object(map);
		}
		let build = GraphBuilder::default().build(&value);
		assert_eq!(build.data.nodes.len(), DEFAULT_MAX_DEPTH + 2);
		assert_eq!(build.warnings.len(), 1);
		// serde_json drops nested values recursively; unwind by hand.
		let mut current = value;
		while let Value::Object(mut map) = current {
			current = map.remove("n").unwrap_or(Value::Null);
		}
	}
}
