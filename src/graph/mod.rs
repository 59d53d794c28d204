//! Node/link graph model of a JSON record.

mod builder;
mod types;

pub use builder::{
	BuildOptions, DEFAULT_MAX_DEPTH, GraphBuild, GraphBuilder, ROOT_ID, ROOT_NAME, build_graph,
};
pub use types::{GraphData, GraphLink, GraphNode, NodeGroup, Position};
