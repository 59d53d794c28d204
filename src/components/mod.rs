pub mod force_graph;
pub mod json_tree;
pub mod record_browser;
pub mod theme_toggle;
