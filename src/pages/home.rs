use leptos::prelude::*;

use crate::components::record_browser::RecordViewer;
use crate::components::theme_toggle::{ThemeToggle, preferred_theme};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let theme = RwSignal::new(preferred_theme());

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="page" class:dark=move || theme.get().is_dark()>
				<div class="page-inner">
					<header class="page-header">
						<h1>"Record Graph Viewer"</h1>
						<ThemeToggle theme />
					</header>
					<RecordViewer theme=theme />
				</div>
			</div>
		</ErrorBoundary>
	}
}
