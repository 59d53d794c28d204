//! Viewer configuration: data source endpoint and graph appearance.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

const DEFAULT_TABLE: &str = "selfmapsbench";

/// Colour scheme for the whole page and the graph surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
	/// Light background, saturated node colours.
	#[default]
	Light,
	/// Black background, softer node colours.
	Dark,
}

impl Theme {
	/// The other theme.
	pub fn toggled(self) -> Self {
		match self {
			Self::Light => Self::Dark,
			Self::Dark => Self::Light,
		}
	}

	/// Whether this is the dark theme.
	pub fn is_dark(self) -> bool {
		self == Self::Dark
	}
}

/// A colour with a variant per theme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
	/// Used with [`Theme::Light`].
	pub light: String,
	/// Used with [`Theme::Dark`].
	pub dark: String,
}

impl Palette {
	/// Build from two CSS colours.
	pub fn new(light: &str, dark: &str) -> Self {
		Self {
			light: light.into(),
			dark: dark.into(),
		}
	}

	/// The variant for `theme`.
	pub fn pick(&self, theme: Theme) -> &str {
		match theme {
			Theme::Light => &self.light,
			Theme::Dark => &self.dark,
		}
	}
}

/// Node sizes and colours keyed by node group.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Root sphere radius.
	pub root_radius: f64,
	/// Radius of every other node.
	pub radius: f64,
	/// Node opacity, 0 to 1.
	pub opacity: f64,
	/// Root node colours.
	pub root_color: Palette,
	/// Category node colours.
	pub category_color: Palette,
	/// Leaf node colours.
	pub leaf_color: Palette,
}

impl Default for NodeStyle {
	fn default() -> Self {
		Self {
			root_radius: 4.0,
			radius: 2.0,
			opacity: 0.9,
			root_color: Palette::new("#ff4444", "#ff6b6b"),
			category_color: Palette::new("#44ff44", "#69db7c"),
			leaf_color: Palette::new("#4444ff", "#74c0fc"),
		}
	}
}

/// Link appearance, including the moving particles that show direction.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkStyle {
	/// Line width in world units.
	pub width: f64,
	/// Link opacity, 0 to 1.
	pub opacity: f64,
	/// Colour of links and labels.
	pub color: Palette,
	/// Particles per link; 0 turns them off.
	pub particles: u32,
	/// Particle diameter in world units.
	pub particle_width: f64,
	/// Fraction of a link travelled per second.
	pub particle_speed: f64,
}

impl Default for LinkStyle {
	fn default() -> Self {
		Self {
			width: 0.5,
			opacity: 0.3,
			color: Palette::new("#666666", "#f0f0f0"),
			particles: 1,
			particle_width: 0.8,
			particle_speed: 0.6,
		}
	}
}

/// Initial camera placement and the automatic orbit.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraSettings {
	/// Where the camera starts.
	pub initial_position: [f64; 3],
	/// Horizontal orbit radius.
	pub orbit_distance: f64,
	/// Amplitude of the vertical bob while orbiting.
	pub orbit_height: f64,
	/// Radians per second.
	pub orbit_speed: f64,
	/// Longest frame gap the orbit will integrate, in seconds.
	pub max_frame_dt: f64,
	/// Vertical field of view in degrees.
	pub fov: f64,
}

impl Default for CameraSettings {
	fn default() -> Self {
		Self {
			initial_position: [100.0, 100.0, 100.0],
			orbit_distance: 150.0,
			orbit_height: 20.0,
			orbit_speed: 0.012,
			max_frame_dt: 0.1,
			fov: 40.0,
		}
	}
}

/// User driven rotate and zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSettings {
	/// Ease rotation and zoom out over several frames.
	pub enable_damping: bool,
	/// Fraction of the remaining motion applied per frame.
	pub damping_factor: f64,
	/// Radians per pixel of drag, scaled.
	pub rotate_speed: f64,
	/// Dolly factor per wheel step, scaled.
	pub zoom_speed: f64,
}

impl Default for ControlSettings {
	fn default() -> Self {
		Self {
			enable_damping: true,
			damping_factor: 0.1,
			rotate_speed: 0.5,
			zoom_speed: 0.5,
		}
	}
}

/// Parameters handed to the force simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutSettings {
	/// Repulsion between nodes.
	pub force_charge: f32,
	/// Link spring stiffness.
	pub force_spring: f32,
	/// Cap on the force applied per step.
	pub force_max: f32,
	/// Simulation speed multiplier.
	pub node_speed: f32,
	/// Velocity kept per step.
	pub damping_factor: f32,
	/// Radius of the sphere nodes are seeded on before the simulation starts.
	pub seed_radius: f64,
}

impl Default for LayoutSettings {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			seed_radius: 60.0,
		}
	}
}

/// A light injected into the scene. Colours are `0xRRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneLight {
	/// Uniform light on every surface.
	Ambient {
		/// `0xRRGGBB`.
		color: u32,
	},
	/// Parallel light from `direction`, scaled by `intensity`.
	Directional {
		/// `0xRRGGBB`.
		color: u32,
		/// 0 to 1.
		intensity: f64,
		/// Vector pointing from the scene towards the light.
		direction: [f64; 3],
	},
}

/// Everything the graph view can be tuned with.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphSettings {
	/// Canvas background.
	pub background: Palette,
	/// Canvas height in pixels. The width follows the container.
	pub height: f64,
	/// Node sizes and colours.
	pub nodes: NodeStyle,
	/// Link and particle appearance.
	pub links: LinkStyle,
	/// Initial camera and orbit.
	pub camera: CameraSettings,
	/// Mouse rotate and zoom.
	pub controls: ControlSettings,
	/// Force simulation parameters.
	pub layout: LayoutSettings,
	/// Added to every new surface in order.
	pub lights: Vec<SceneLight>,
}

impl Default for GraphSettings {
	fn default() -> Self {
		Self {
			background: Palette::new("#ffffff", "#000000"),
			height: 600.0,
			nodes: NodeStyle::default(),
			links: LinkStyle::default(),
			camera: CameraSettings::default(),
			controls: ControlSettings::default(),
			layout: LayoutSettings::default(),
			lights: vec![
				SceneLight::Ambient { color: 0xbbbbbb },
				SceneLight::Directional {
					color: 0xffffff,
					intensity: 0.6,
					direction: [0.0, 1.0, 0.0],
				},
			],
		}
	}
}

/// Where records are read from. Filled in at build time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceConfig {
	/// Project URL, without a trailing slash.
	pub url: String,
	/// Public anon key sent with every request.
	pub anon_key: String,
	/// Table holding the records.
	pub table: String,
}

impl SourceConfig {
	/// Read `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `SUPABASE_TABLE` as they were at compile time.
	pub fn from_build_env() -> Result<Self, FetchError> {
		Self::from_parts(
			option_env!("SUPABASE_URL"),
			option_env!("SUPABASE_ANON_KEY"),
			option_env!("SUPABASE_TABLE"),
		)
	}

	/// Assemble from optional pieces; empty strings count as missing.
	pub fn from_parts(
		url: Option<&str>,
		anon_key: Option<&str>,
		table: Option<&str>,
	) -> Result<Self, FetchError> {
		let url = url
			.filter(|s| !s.is_empty())
			.ok_or(FetchError::NotConfigured("SUPABASE_URL"))?;
		let anon_key = anon_key
			.filter(|s| !s.is_empty())
			.ok_or(FetchError::NotConfigured("SUPABASE_ANON_KEY"))?;
		Ok(Self {
			url: url.trim_end_matches('/').into(),
			anon_key: anon_key.into(),
			table: table.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_TABLE).into(),
		})
	}

	/// The PostgREST select for every record, newest first.
	pub fn records_url(&self) -> String {
		format!(
			"{}/rest/v1/{}?select=id,json_content,created_at&order=created_at.desc",
			self.url, self.table
		)
	}
}
