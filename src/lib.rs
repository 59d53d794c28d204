//! Leptos client-side app wiring and routes.
//!
//! Records are read from a hosted table, shown one at a time as a text tree
//! and as a 3D force-directed graph. Everything that does not touch the DOM
//! (graph and tree models, paging, the view controller) lives in plain modules
//! and is usable on its own.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod browser;
mod components;
pub mod config;
pub mod error;
pub mod graph;
mod pages;
pub mod record;
pub mod source;
pub mod tree;

pub use components::force_graph::{
	CameraPose, ContainerSize, ForceGraphView, GraphViewController, Lifecycle, Orbit,
	RenderSurface, SurfaceFactory, SurfaceStyle,
};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the record viewer and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />

		// sets the document title
		<Title text="Record Graph Viewer" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
