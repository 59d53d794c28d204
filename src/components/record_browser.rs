use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;
use serde_json::Value;
use web_sys::{Event, KeyboardEvent};

use super::force_graph::ForceGraphView;
use super::json_tree::JsonTree;
use crate::browser::RecordBrowser;
use crate::config::Theme;
use crate::graph::{GraphData, build_graph};
use crate::source::{RecordSource, SupabaseSource};

#[derive(Clone, Debug, PartialEq)]
enum LoadState {
	Loading,
	Failed(String),
	Loaded,
}

/// Fetches the records once and pages through them, showing the current one
/// as a text tree next to its graph.
#[component]
pub fn RecordViewer(#[prop(into)] theme: Signal<Theme>) -> impl IntoView {
	let browser = RwSignal::new(RecordBrowser::default());
	let load = RwSignal::new(LoadState::Loading);

	spawn_local(async move {
		let fetched = match SupabaseSource::from_build_env() {
			Ok(source) => source.fetch_records().await,
			Err(err) => Err(err),
		};
		match fetched {
			Ok(records) => {
				browser.try_set(RecordBrowser::new(records));
				load.try_set(LoadState::Loaded);
			}
			Err(err) => {
				error!("could not load records: {err}");
				load.try_set(LoadState::Failed(err.to_string()));
			}
		}
	});

	move || match load.get() {
		LoadState::Loading => view! {
			<div class="loading">
				<div class="spinner"></div>
			</div>
		}
		.into_any(),
		LoadState::Failed(message) => view! {
			<div class="error-panel">
				<p>{message}</p>
			</div>
		}
		.into_any(),
		LoadState::Loaded if browser.with(RecordBrowser::is_empty) => view! {
			<div class="empty">
				<p>"No records found"</p>
			</div>
		}
		.into_any(),
		LoadState::Loaded => view! { <RecordPanels browser theme /> }.into_any(),
	}
}

#[component]
fn RecordPanels(browser: RwSignal<RecordBrowser>, theme: Signal<Theme>) -> impl IntoView {
	let content = Memo::new(move |_| {
		browser.with(|b| {
			b.current()
				.map(|r| r.content().into_owned())
				.unwrap_or(Value::Null)
		})
	});
	let graph_data: Memo<GraphData> = Memo::new(move |_| content.with(build_graph));

	let on_keydown = move |ev: KeyboardEvent| match ev.key().as_str() {
		"ArrowRight" => browser.update(RecordBrowser::next),
		"ArrowLeft" => browser.update(RecordBrowser::previous),
		_ => {}
	};

	let on_search = move |ev: Event| {
		let term = event_target_value(&ev);
		browser.update(|b| {
			b.search(&term);
		});
	};

	view! {
		<div class="record-viewer" tabindex="0" on:keydown=on_keydown>
			<div class="card record-header">
				<h2>
					{move || {
						browser.with(|b| b.current().map(|r| format!("Record {}", r.id)).unwrap_or_default())
					}}
				</h2>
				<div class="record-controls">
					<input
						type="text"
						class="search"
						placeholder="Search in JSON..."
						prop:value=move || browser.with(|b| b.search_term().to_string())
						on:input=on_search
					/>
					<button class="nav prev" on:click=move |_| browser.update(RecordBrowser::previous)>
						"‹"
					</button>
					<span class="counter">
						{move || browser.with(|b| format!("{} of {}", b.index() + 1, b.len()))}
					</span>
					<button class="nav next" on:click=move |_| browser.update(RecordBrowser::next)>
						"›"
					</button>
				</div>
			</div>
			<div class="card record-created">
				{move || {
					browser
						.with(|b| b.current().and_then(|r| r.created_local()))
						.map(|at| format!("Created: {at}"))
						.unwrap_or_else(|| "Created: unknown".into())
				}}
			</div>
			<div class="record-panels">
				<JsonTree data=content />
				<ForceGraphView data=graph_data theme />
			</div>
		</div>
	}
}
