//! Error and warning types surfaced by the viewer.
//!
//! None of these are fatal to the app: a fetch failure is shown as a message,
//! a render failure becomes the graph status line and a build warning turns
//! into a marker node.

use thiserror::Error;

/// Failure fetching records from the hosted database.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
	/// The data source URL or key was not provided at build time.
	#[error("data source is not configured: {0} is missing")]
	NotConfigured(&'static str),
	/// The request could not be sent or its body could not be read.
	#[error("network error: {0}")]
	Network(String),
	/// The server answered with a non-success status.
	#[error("query failed with status {status}: {body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, usually a PostgREST error object.
		body: String,
	},
	/// The response body was not a list of records.
	#[error("could not decode records: {0}")]
	Decode(String),
}

impl From<serde_json::Error> for FetchError {
	fn from(err: serde_json::Error) -> Self {
		Self::Decode(err.to_string())
	}
}

/// Failure creating a rendering surface. Retried on the next data or theme change.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RenderInitError {
	/// The container is not mounted yet or has no area.
	#[error("Container not ready")]
	ContainerNotReady,
	/// The surface itself refused to initialize.
	#[error("Error: {0}")]
	Surface(String),
}

/// Non-fatal problem met while turning a JSON value into graph data.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MalformedInputWarning {
	/// Nesting went past the configured depth; the subtree was replaced by a marker.
	#[error("depth limit {depth} reached at {node_id}, subtree truncated")]
	DepthLimit {
		/// Id of the node whose children were not expanded.
		node_id: String,
		/// The depth limit in effect.
		depth: usize,
	},
}
