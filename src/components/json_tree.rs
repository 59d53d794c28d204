use leptos::prelude::*;
use serde_json::Value;

use crate::tree::{TreeValue, render_tree};

fn tree_view(tree: TreeValue) -> AnyView {
	match tree {
		TreeValue::Inline(text) => view! { <span class="value">{text}</span> }.into_any(),
		TreeValue::Branch(entries) => view! {
			<ul class="json-tree">
				{entries
					.into_iter()
					.map(|entry| {
						let nested = matches!(entry.value, TreeValue::Branch(_));
						view! {
							<li>
								<span class="key">{entry.key}":"</span>
								{(!nested).then_some(" ")}
								{tree_view(entry.value)}
							</li>
						}
					})
					.collect_view()}
			</ul>
		}
		.into_any(),
	}
}

/// Indented `key: value` view of a JSON document.
#[component]
pub fn JsonTree(#[prop(into)] data: Signal<Value>) -> impl IntoView {
	view! {
		<div class="card json-panel">
			<h2>"JSON Data"</h2>
			<div class="json-viewer">{move || data.with(|value| tree_view(render_tree(value)))}</div>
		</div>
	}
}
