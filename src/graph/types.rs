use serde::{Deserialize, Serialize};

/// Role of a node in the record graph. Drives size and colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
	/// The record itself. Exactly one per graph.
	Root,
	/// A key or element holding further structure.
	Category,
	/// A terminal value.
	Leaf,
}

/// Position hint in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	/// Horizontal.
	pub x: f64,
	/// Vertical.
	pub y: f64,
	/// Depth.
	pub z: f64,
}

/// A key, array element or the root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Unique within one [`GraphData`], derived from the path from the root.
	pub id: String,
	/// Key or `[i]` index, shown as the label.
	pub name: String,
	/// Root, category or leaf.
	pub group: NodeGroup,
	/// Visual weight.
	pub value: f64,
	/// Where the layout should start this node, if anywhere.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<Position>,
	/// Stringified scalar for leaves.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
}

impl GraphNode {
	/// Text shown next to the node: `name` or `name: detail`.
	pub fn label(&self) -> String {
		match &self.detail {
			Some(detail) => format!("{}: {}", self.name, detail),
			None => self.name.clone(),
		}
	}
}

/// Parent to child edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
	/// Parent id.
	pub source: String,
	/// Child id.
	pub target: String,
	/// Spring weight.
	pub value: f64,
}

/// The nodes and links of one record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Root first, then in expansion order.
	pub nodes: Vec<GraphNode>,
	/// Exactly one incoming link per non-root node.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// The node with [`NodeGroup::Root`], if any.
	pub fn root(&self) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.group == NodeGroup::Root)
	}

	/// Look a node up by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Ids of the nodes directly linked from `id`.
	pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		self.links
			.iter()
			.filter(move |l| l.source == id)
			.map(|l| l.target.as_str())
	}
}
