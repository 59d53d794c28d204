//! Paging and search over the fetched records.

use crate::record::Record;

/// The fetched records and which one is on screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordBrowser {
	records: Vec<Record>,
	index: usize,
	search: String,
}

impl RecordBrowser {
	/// Start on the first record.
	pub fn new(records: Vec<Record>) -> Self {
		Self {
			records,
			index: 0,
			search: String::new(),
		}
	}

	/// All records, newest first.
	pub fn records(&self) -> &[Record] {
		&self.records
	}

	/// Number of records.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Whether nothing was fetched.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Zero-based index of the current record.
	pub fn index(&self) -> usize {
		self.index
	}

	/// The record on screen, if there is one.
	pub fn current(&self) -> Option<&Record> {
		self.records.get(self.index)
	}

	/// The last term passed to [`search`](Self::search).
	pub fn search_term(&self) -> &str {
		&self.search
	}

	/// Move to the next record, wrapping to the first. No-op when empty.
	pub fn next(&mut self) {
		if self.records.is_empty() {
			return;
		}
		self.index = (self.index + 1) % self.records.len();
	}

	/// Move to the previous record, wrapping to the last. No-op when empty.
	pub fn previous(&mut self) {
		if self.records.is_empty() {
			return;
		}
		let len = self.records.len();
		self.index = (self.index + len - 1) % len;
	}

	/// Jump to the first record whose serialized content contains `term`,
	/// ignoring case. Leaves the position alone when nothing matches.
	pub fn search(&mut self, term: &str) -> Option<usize> {
		self.search = term.into();
		let needle = term.to_lowercase();
		let found = self
			.records
			.iter()
			.position(|r| r.serialized_content().to_lowercase().contains(&needle))?;
		self.index = found;
		Some(found)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::{Value, json};

	use super::*;

	fn record(id: i64, json_content: Value) -> Record {
		Record {
			id,
			json_content,
			created_at: None,
		}
	}

	fn sample() -> RecordBrowser {
		RecordBrowser::new(vec![
			record(3, json!({"Self": {"Name": "Ada", "Vocation / Job": {"Title": "Engineer"}}})),
			record(2, json!({"Self": {"Name": "Grace", "Values": ["Curiosity"]}})),
			record(1, json!("{\"Self\": {\"Name\": \"Linus\"}}")),
		])
	}

	#[test]
	fn next_wraps_back_to_start() {
		let mut browser = sample();
		browser.next();
		let start = browser.index();
		for _ in 0..browser.len() {
			browser.next();
		}
		assert_eq!(browser.index(), start);
	}

	#[test]
	fn previous_wraps_to_last() {
		let mut browser = sample();
		browser.previous();
		assert_eq!(browser.index(), 2);
		assert_eq!(browser.current().map(|r| r.id), Some(1));
	}

	#[test]
	fn navigation_on_empty_list_is_noop() {
		let mut browser = RecordBrowser::default();
		browser.next();
		browser.previous();
		assert_eq!(browser.index(), 0);
		assert!(browser.current().is_none());
		assert_eq!(browser.search("x"), None);
	}

	#[test]
	fn search_is_case_insensitive_and_scans_from_start() {
		let mut browser = sample();
		browser.next();
		browser.next();
		assert_eq!(browser.search("ENGINEER"), Some(0));
		assert_eq!(browser.current().map(|r| r.id), Some(3));
		assert_eq!(browser.search("curiosity"), Some(1));
	}

	#[test]
	fn search_reads_string_encoded_content() {
		let mut browser = sample();
		assert_eq!(browser.search("linus"), Some(2));
	}

	#[test]
	fn search_without_match_keeps_position() {
		let mut browser = sample();
		browser.next();
		assert_eq!(browser.search("nobody"), None);
		assert_eq!(browser.index(), 1);
		assert_eq!(browser.search_term(), "nobody");
	}
}
