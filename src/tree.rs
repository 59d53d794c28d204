//! Text tree view of a JSON value.

use serde_json::Value;

use crate::graph::DEFAULT_MAX_DEPTH;

/// One `key: value` line of an object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
	/// Object key.
	pub key: String,
	/// What the key maps to.
	pub value: TreeValue,
}

/// Rendered shape of a JSON value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeValue {
	/// An object: nested, indented entries.
	Branch(Vec<TreeEntry>),
	/// Anything else, already stringified.
	Inline(String),
}

impl TreeValue {
	/// Plain text with two spaces of indentation per level.
	pub fn to_text(&self) -> String {
		let mut out = String::new();
		match self {
			Self::Inline(text) => out.push_str(text),
			Self::Branch(entries) => write_entries(&mut out, entries, 0),
		}
		out
	}
}

fn write_entries(out: &mut String, entries: &[TreeEntry], indent: usize) {
	for entry in entries {
		out.push_str(&"  ".repeat(indent));
		out.push_str(&entry.key);
		out.push(':');
		match &entry.value {
			TreeValue::Inline(text) => {
				out.push(' ');
				out.push_str(text);
				out.push('\n');
			}
			TreeValue::Branch(children) => {
				out.push('\n');
				write_entries(out, children, indent + 1);
			}
		}
	}
}

/// Render `value` for display. Objects nested past the graph depth limit are
/// shown inline as compact JSON.
pub fn render_tree(value: &Value) -> TreeValue {
	render_at(value, 0)
}

fn render_at(value: &Value, depth: usize) -> TreeValue {
	match value {
		Value::Object(map) if depth < DEFAULT_MAX_DEPTH => TreeValue::Branch(
			map.iter()
				.map(|(key, child)| TreeEntry {
					key: key.clone(),
					value: render_at(child, depth + 1),
				})
				.collect(),
		),
		other => TreeValue::Inline(display_value(other)),
	}
}

/// Stringify a value the way it reads in the tree and in graph labels:
/// strings unquoted, `null` literal, arrays bracketed, objects as compact JSON.
/// Containers nested past the depth limit are cut to `[…]` or `{…}`.
pub fn display_value(value: &Value) -> String {
	let mut out = String::new();
	write_display(&mut out, value, 0);
	out
}

fn write_display(out: &mut String, value: &Value, depth: usize) {
	match value {
		Value::Null => out.push_str("null"),
		Value::Bool(b) => out.push_str(&b.to_string()),
		Value::Number(n) => out.push_str(&n.to_string()),
		Value::String(s) => out.push_str(s),
		Value::Array(_) if depth >= DEFAULT_MAX_DEPTH => out.push_str("[…]"),
		Value::Array(items) => {
			out.push('[');
			for (i, item) in items.iter().enumerate() {
				if i > 0 {
					out.push_str(", ");
				}
				write_display(out, item, depth + 1);
			}
			out.push(']');
		}
		Value::Object(_) => write_compact(out, value, depth),
	}
}

/// Compact JSON, like `serde_json::to_string`, but bounded in depth.
fn write_compact(out: &mut String, value: &Value, depth: usize) {
	match value {
		Value::Array(_) if depth >= DEFAULT_MAX_DEPTH => out.push_str("[…]"),
		Value::Object(_) if depth >= DEFAULT_MAX_DEPTH => out.push_str("{…}"),
		Value::Array(items) => {
			out.push('[');
			for (i, item) in items.iter().enumerate() {
				if i > 0 {
					out.push(',');
				}
				write_compact(out, item, depth + 1);
			}
			out.push(']');
		}
		Value::Object(map) => {
			out.push('{');
			for (i, (key, child)) in map.iter().enumerate() {
				if i > 0 {
					out.push(',');
				}
				out.push_str(&Value::String(key.clone()).to_string());
				out.push(':');
				write_compact(out, child, depth + 1);
			}
			out.push('}');
		}
		scalar => out.push_str(&scalar.to_string()),
	}
}
