//! Stored JSON documents as returned by the data source.

use std::borrow::Cow;

use chrono::{DateTime, Local, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stored JSON document plus its metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
	/// Primary key.
	pub id: i64,
	/// The document as stored. May be a JSON string holding serialized JSON.
	pub json_content: Value,
	/// Insertion time.
	#[serde(default)]
	pub created_at: Option<DateTime<Utc>>,
}

impl Record {
	/// The document to display. A string column holding serialized JSON is
	/// parsed; anything else, including unparseable strings, is used as is.
	pub fn content(&self) -> Cow<'_, Value> {
		match &self.json_content {
			Value::String(raw) => match from_str_unbounded::<Value>(raw) {
				Ok(parsed) => Cow::Owned(parsed),
				Err(_) => Cow::Borrowed(&self.json_content),
			},
			other => Cow::Borrowed(other),
		}
	}

	/// Compact serialization of the displayed document, used for searching.
	pub fn serialized_content(&self) -> String {
		serde_json::to_string(self.content().as_ref()).unwrap_or_default()
	}

	/// Creation time in the viewer's local timezone, if known.
	pub fn created_local(&self) -> Option<String> {
		self.created_at.map(|at| {
			at.with_timezone(&Local)
				.format("%Y-%m-%d %H:%M:%S")
				.to_string()
		})
	}
}

/// Parse JSON of any nesting depth. Depth is dealt with later by the graph
/// and tree limits, so one deep document cannot fail a whole batch.
pub fn from_str_unbounded<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
	let mut de = serde_json::Deserializer::from_str(raw);
	de.disable_recursion_limit();
	let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
	de.end()?;
	Ok(value)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn deserializes_postgrest_row() {
		let rows: Vec<Record> = serde_json::from_value(json!([
			{"id": 7, "json_content": {"Self": {"Name": "Ada"}}, "created_at": "2024-03-01T10:20:30.123456+00:00"},
			{"id": 8, "json_content": null}
		]))
		.unwrap();
		assert_eq!(rows[0].id, 7);
		assert!(rows[0].created_at.is_some());
		assert_eq!(rows[1].created_at, None);
		assert_eq!(rows[1].json_content, Value::Null);
	}

	#[test]
	fn string_content_holding_json_is_parsed() {
		let record = Record {
			id: 1,
			json_content: json!("{\"a\": [1, 2]}"),
			created_at: None,
		};
		assert_eq!(record.content().as_ref(), &json!({"a": [1, 2]}));

		let plain = Record {
			id: 2,
			json_content: json!("not json"),
			created_at: None,
		};
		assert_eq!(plain.content().as_ref(), &json!("not json"));
	}

	#[test]
	fn string_content_past_serde_default_depth_is_parsed() {
		let raw = format!("{}1{}", "[".repeat(200), "]".repeat(200));
		let record = Record {
			id: 3,
			json_content: Value::String(raw),
			created_at: None,
		};
		let mut depth = 0;
		let mut current = record.content().into_owned();
		while let Value::Array(mut items) = current {
			depth += 1;
			current = items.pop().unwrap_or(Value::Null);
		}
		assert_eq!((depth, current), (200, json!(1)));
	}

	#[test]
	fn unbounded_parse_still_rejects_trailing_garbage() {
		assert!(from_str_unbounded::<Value>("{} x").is_err());
	}
}
