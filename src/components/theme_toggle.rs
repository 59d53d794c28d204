use leptos::prelude::*;

use crate::config::Theme;

/// The theme the browser asks for through `prefers-color-scheme`.
pub fn preferred_theme() -> Theme {
	let prefers_dark = web_sys::window()
		.and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
		.is_some_and(|query| query.matches());
	if prefers_dark { Theme::Dark } else { Theme::Light }
}

#[component]
pub fn ThemeToggle(theme: RwSignal<Theme>) -> impl IntoView {
	view! {
		<button
			class="theme-toggle"
			aria-label="Toggle dark mode"
			on:click=move |_| theme.update(|t| *t = t.toggled())
		>
			{move || if theme.get().is_dark() { "☀" } else { "☾" }}
		</button>
	}
}
