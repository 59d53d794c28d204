use crate::config::{ControlSettings, GraphSettings, LayoutSettings, SceneLight, Theme};
use crate::error::RenderInitError;
use crate::graph::{GraphData, NodeGroup};

/// Pixel size of the region a surface is bound to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerSize {
	/// Pixels.
	pub width: f64,
	/// Pixels.
	pub height: f64,
}

impl ContainerSize {
	/// `None` unless both sides are positive.
	pub fn new(width: f64, height: f64) -> Option<Self> {
		let size = Self { width, height };
		size.has_area().then_some(size)
	}

	/// Whether anything could be drawn at this size.
	pub fn has_area(&self) -> bool {
		self.width > 0.0 && self.height > 0.0
	}
}

/// Where the camera sits and what it looks at, in graph space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
	/// Camera position in world units.
	pub position: [f64; 3],
	/// Point the camera faces.
	pub look_at: [f64; 3],
}

impl CameraPose {
	/// A camera at `position` facing `(0, 0, 0)`.
	pub fn looking_at_origin(position: [f64; 3]) -> Self {
		Self {
			position,
			look_at: [0.0; 3],
		}
	}
}

/// Theme-resolved appearance handed to a new surface.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceStyle {
	/// CSS colour.
	pub background: String,
	/// Root sphere radius.
	pub root_radius: f64,
	/// Radius of every other node.
	pub node_radius: f64,
	/// Node opacity, 0 to 1.
	pub node_opacity: f64,
	/// CSS colour.
	pub root_color: String,
	/// CSS colour.
	pub category_color: String,
	/// CSS colour.
	pub leaf_color: String,
	/// Line width in world units.
	pub link_width: f64,
	/// Link opacity, 0 to 1.
	pub link_opacity: f64,
	/// CSS colour.
	pub link_color: String,
	/// Particles per link.
	pub particles: u32,
	/// Particle diameter in world units.
	pub particle_width: f64,
	/// Fraction of a link travelled per second.
	pub particle_speed: f64,
	/// Vertical field of view in degrees.
	pub fov: f64,
	/// Force simulation parameters.
	pub layout: LayoutSettings,
}

impl SurfaceStyle {
	/// Resolve `settings` for one theme.
	pub fn new(settings: &GraphSettings, theme: Theme) -> Self {
		let (nodes, links) = (&settings.nodes, &settings.links);
		Self {
			background: settings.background.pick(theme).into(),
			root_radius: nodes.root_radius,
			node_radius: nodes.radius,
			node_opacity: nodes.opacity,
			root_color: nodes.root_color.pick(theme).into(),
			category_color: nodes.category_color.pick(theme).into(),
			leaf_color: nodes.leaf_color.pick(theme).into(),
			link_width: links.width,
			link_opacity: links.opacity,
			link_color: links.color.pick(theme).into(),
			particles: links.particles,
			particle_width: links.particle_width,
			particle_speed: links.particle_speed,
			fov: settings.camera.fov,
			layout: settings.layout,
		}
	}

	/// Base radius of nodes in `group`.
	pub fn radius_for(&self, group: NodeGroup) -> f64 {
		match group {
			NodeGroup::Root => self.root_radius,
			NodeGroup::Category | NodeGroup::Leaf => self.node_radius,
		}
	}

	/// CSS colour of nodes in `group`.
	pub fn color_for(&self, group: NodeGroup) -> &str {
		match group {
			NodeGroup::Root => &self.root_color,
			NodeGroup::Category => &self.category_color,
			NodeGroup::Leaf => &self.leaf_color,
		}
	}
}

/// A live 3D graph drawing bound to a container.
pub trait RenderSurface {
	/// Replace the drawn graph and restart its layout.
	fn set_graph_data(&mut self, data: &GraphData);
	/// Move the camera.
	fn set_camera(&mut self, pose: CameraPose);
	/// Configure user rotate and zoom.
	fn set_controls(&mut self, controls: ControlSettings);
	/// Add a light to the scene.
	fn add_light(&mut self, light: SceneLight);
	/// Advance layout and animation by `dt` seconds and draw a frame.
	fn render(&mut self, dt: f64);
	/// Release everything the surface holds. Nothing may be drawn afterwards.
	fn dispose(&mut self);
}

/// Creates surfaces bound to one container.
pub trait SurfaceFactory {
	/// The surfaces this factory produces.
	type Surface: RenderSurface;

	/// A new surface of `size` filling the container.
	fn create(
		&mut self,
		size: ContainerSize,
		style: &SurfaceStyle,
	) -> Result<Self::Surface, RenderInitError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zero_sized_container_is_rejected() {
		assert_eq!(ContainerSize::new(0.0, 600.0), None);
		assert_eq!(ContainerSize::new(800.0, -1.0), None);
		assert!(ContainerSize::new(800.0, 600.0).is_some());
	}

	#[test]
	fn style_resolves_theme_and_group() {
		let settings = GraphSettings::default();
		let dark = SurfaceStyle::new(&settings, Theme::Dark);
		let light = SurfaceStyle::new(&settings, Theme::Light);
		assert_eq!(dark.background, "#000000");
		assert_eq!(light.background, "#ffffff");
		assert!(dark.radius_for(NodeGroup::Root) > dark.radius_for(NodeGroup::Category));
		assert_eq!(dark.radius_for(NodeGroup::Category), dark.radius_for(NodeGroup::Leaf));
		assert_eq!(dark.color_for(NodeGroup::Leaf), "#74c0fc");
		assert_ne!(
			light.color_for(NodeGroup::Root),
			light.color_for(NodeGroup::Category)
		);
	}
}
