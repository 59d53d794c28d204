//! Reading records from the hosted database.

use log::{error, info};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::record::{Record, from_str_unbounded};

/// Anything that can hand over the full record list, newest first.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
	/// Every record the source holds, newest first.
	async fn fetch_records(&self) -> Result<Vec<Record>, FetchError>;
}

/// A Supabase table read through its PostgREST endpoint with the anon key.
#[derive(Clone, Debug)]
pub struct SupabaseSource {
	config: SourceConfig,
}

impl SupabaseSource {
	/// Read from the table described by `config`.
	pub fn new(config: SourceConfig) -> Self {
		Self { config }
	}

	/// Configure from the build environment.
	pub fn from_build_env() -> Result<Self, FetchError> {
		SourceConfig::from_build_env().map(Self::new)
	}

	fn request(&self) -> Result<Request, FetchError> {
		let init = RequestInit::new();
		init.set_method("GET");
		init.set_mode(RequestMode::Cors);
		let request = Request::new_with_str_and_init(&self.config.records_url(), &init)
			.map_err(js_error)?;
		let headers = request.headers();
		headers
			.set("apikey", &self.config.anon_key)
			.map_err(js_error)?;
		headers
			.set("Authorization", &format!("Bearer {}", self.config.anon_key))
			.map_err(js_error)?;
		headers
			.set("Accept", "application/json")
			.map_err(js_error)?;
		Ok(request)
	}
}

impl RecordSource for SupabaseSource {
	async fn fetch_records(&self) -> Result<Vec<Record>, FetchError> {
		let window =
			web_sys::window().ok_or_else(|| FetchError::Network("no window available".into()))?;
		let request = self.request()?;

		let response: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(js_error)?
			.dyn_into()
			.map_err(js_error)?;
		let body = JsFuture::from(response.text().map_err(js_error)?)
			.await
			.map_err(js_error)?
			.as_string()
			.unwrap_or_default();

		if !response.ok() {
			let err = FetchError::Status {
				status: response.status(),
				body: error_message(&body),
			};
			error!("fetching {} failed: {err}", self.config.table);
			return Err(err);
		}

		let records = parse_records(&body)?;
		info!("fetched {} records from {}", records.len(), self.config.table);
		Ok(records)
	}
}

/// Decode a PostgREST row list and order it newest first. Rows without a
/// timestamp go last; ties keep server order.
pub fn parse_records(body: &str) -> Result<Vec<Record>, FetchError> {
	let mut records: Vec<Record> = from_str_unbounded(body)?;
	records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
	Ok(records)
}

/// PostgREST errors carry a `message` field; fall back to the raw body.
fn error_message(body: &str) -> String {
	serde_json::from_str::<Value>(body)
		.ok()
		.and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
		.unwrap_or_else(|| body.to_string())
}

fn js_error(err: JsValue) -> FetchError {
	let message = match err.dyn_ref::<js_sys::Error>() {
		Some(e) => String::from(e.message()),
		None => err.as_string().unwrap_or_else(|| format!("{err:?}")),
	};
	FetchError::Network(message)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_orders_newest_first() {
		let body = r#"[
			{"id": 1, "json_content": {}, "created_at": "2024-01-01T00:00:00+00:00"},
			{"id": 2, "json_content": {}, "created_at": null},
			{"id": 3, "json_content": {}, "created_at": "2024-06-01T00:00:00+00:00"}
		]"#;
		let ids: Vec<i64> = parse_records(body).unwrap().iter().map(|r| r.id).collect();
		assert_eq!(ids, [3, 1, 2]);
	}

	#[test]
	fn one_deep_row_does_not_lose_the_others() {
		let deep = format!("{}1{}", r#"{"n":"#.repeat(200), "}".repeat(200));
		let body = format!(
			r#"[{{"id": 1, "json_content": {deep}, "created_at": "2024-01-01T00:00:00+00:00"}},
			{{"id": 2, "json_content": {{"a": 1}}, "created_at": "2024-02-01T00:00:00+00:00"}}]"#
		);
		let records = parse_records(&body).unwrap();
		let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
		assert_eq!(ids, [2, 1]);

		let graph = crate::graph::build_graph(&records[1].content());
		assert!(graph.node(&format!("root{}#truncated", "/n".repeat(64))).is_some());
	}

	#[test]
	fn parse_rejects_non_list() {
		assert!(matches!(
			parse_records(r#"{"message": "nope"}"#),
			Err(FetchError::Decode(_))
		));
	}

	#[test]
	fn error_message_prefers_postgrest_message() {
		assert_eq!(
			error_message(r#"{"code": "42P01", "message": "relation does not exist"}"#),
			"relation does not exist"
		);
		assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
	}
}
