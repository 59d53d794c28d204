//! Trunk entry point: mounts the viewer on the page body.

use leptos::prelude::*;
use record_graph_viewer::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App)
}
