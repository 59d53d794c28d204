use std::collections::{HashMap, HashSet};
use std::f64::consts::{PI, TAU};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::color::Rgb;
use super::surface::{CameraPose, ContainerSize, SurfaceStyle};
use crate::config::{ControlSettings, SceneLight};
use crate::graph::{GraphData, NodeGroup};

/// Objects closer to the camera than this are culled.
pub const NEAR_PLANE: f64 = 1.0;
/// Minimum on-screen hit radius in pixels.
pub const HIT_RADIUS: f64 = 6.0;
/// Seconds the camera takes to reach a newly requested pose.
const CAMERA_TRANSITION: f64 = 1.0;
/// Longest step fed to the simulation.
const MAX_STEP: f64 = 0.033;
const ZOOM_STEP: f64 = 0.051_293_294_4;
const MAX_ZOOM: f64 = 2.5;
const MIN_POLAR: f64 = 0.05;

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub group: NodeGroup,
	pub color: Rgb,
	pub radius: f64,
	pub z: f64,
}

/// A node as seen from the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub depth: f64,
}

/// A visible node ready to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
	pub idx: DefaultNodeIdx,
	pub at: Projected,
	pub color: Rgb,
	pub group: NodeGroup,
}

/// Camera basis and perspective for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
	pub eye: [f64; 3],
	pub right: [f64; 3],
	pub up: [f64; 3],
	pub forward: [f64; 3],
	focal: f64,
	center: (f64, f64),
}

impl View {
	pub fn new(eye: [f64; 3], look_at: [f64; 3], fov_deg: f64, width: f64, height: f64) -> Self {
		let forward = normalize(sub(look_at, eye)).unwrap_or([0.0, 0.0, -1.0]);
		let right = normalize(cross(forward, [0.0, 1.0, 0.0])).unwrap_or([1.0, 0.0, 0.0]);
		let up = cross(right, forward);
		Self {
			eye,
			right,
			up,
			forward,
			focal: (height / 2.0) / (fov_deg.to_radians() / 2.0).tan(),
			center: (width / 2.0, height / 2.0),
		}
	}

	/// Screen position of `p` and its scale factor; `None` behind the near plane.
	pub fn project(&self, p: [f64; 3], radius: f64) -> Option<Projected> {
		let v = sub(p, self.eye);
		let depth = dot(v, self.forward);
		if depth < NEAR_PLANE {
			return None;
		}
		let scale = self.focal / depth;
		Some(Projected {
			x: self.center.0 + dot(v, self.right) * scale,
			y: self.center.1 - dot(v, self.up) * scale,
			radius: radius * scale,
			depth,
		})
	}

	pub fn scale_at(&self, depth: f64) -> f64 {
		self.focal / depth.max(NEAR_PLANE)
	}
}

/// How the injected lights shade a sphere in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
	pub ambient: f64,
	pub key: f64,
	/// Offset of the highlight from the sphere centre, in radii.
	pub highlight: (f64, f64),
}

#[derive(Clone, Debug, Default)]
pub struct CameraState {
	pub position: [f64; 3],
	pub target: [f64; 3],
	pub look_at: [f64; 3],
	placed: bool,
}

/// Damped rotate and zoom on top of the requested camera pose.
#[derive(Clone, Debug, Default)]
pub struct OrbitControls {
	pub settings: ControlSettings,
	pub yaw: f64,
	pub pitch: f64,
	/// Natural log of the distance multiplier.
	pub zoom: f64,
	pending_yaw: f64,
	pending_pitch: f64,
	pending_zoom: f64,
}

impl OrbitControls {
	pub fn rotate(&mut self, dx: f64, dy: f64, height: f64) {
		let per_pixel = TAU / height.max(1.0) * self.settings.rotate_speed;
		self.pending_yaw -= dx * per_pixel;
		self.pending_pitch -= dy * per_pixel;
	}

	pub fn dolly(&mut self, delta_y: f64) {
		let step = ZOOM_STEP * self.settings.zoom_speed;
		self.pending_zoom += if delta_y > 0.0 { step } else { -step };
	}

	pub fn update(&mut self) {
		let k = if self.settings.enable_damping {
			self.settings.damping_factor.clamp(0.0, 1.0)
		} else {
			1.0
		};
		self.yaw += self.pending_yaw * k;
		self.pitch = (self.pitch + self.pending_pitch * k).clamp(-PI, PI);
		self.zoom = (self.zoom + self.pending_zoom * k).clamp(-MAX_ZOOM, MAX_ZOOM);
		self.pending_yaw *= 1.0 - k;
		self.pending_pitch *= 1.0 - k;
		self.pending_zoom *= 1.0 - k;
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub last_x: f64,
	pub last_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Layout, camera and interaction state behind a canvas surface.
pub struct SceneState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub style: SurfaceStyle,
	pub lights: Vec<SceneLight>,
	pub camera: CameraState,
	pub controls: OrbitControls,
	pub drag: DragState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	pub view: View,
	pub projected: HashMap<DefaultNodeIdx, Projected>,
	/// Visible nodes, farthest first.
	pub draw_order: Vec<Sprite>,
	pub labels: HashMap<DefaultNodeIdx, String>,
	pub edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
}

impl SceneState {
	pub fn new(size: ContainerSize, style: SurfaceStyle) -> Self {
		let view = View::new([0.0, 0.0, 1.0], [0.0; 3], style.fov, size.width, size.height);
		Self {
			graph: ForceGraph::new(simulation(&style)),
			style,
			lights: Vec::new(),
			camera: CameraState::default(),
			controls: OrbitControls::default(),
			drag: DragState::default(),
			hover: HoverState::default(),
			width: size.width,
			height: size.height,
			flow_time: 0.0,
			view,
			projected: HashMap::new(),
			draw_order: Vec::new(),
			labels: HashMap::new(),
			edges: Vec::new(),
		}
	}

	/// Replace the layout with `data`. Nodes without a position hint are
	/// seeded on a sphere; the root is pinned at its hint.
	pub fn set_data(&mut self, data: &GraphData) {
		let mut graph = ForceGraph::new(simulation(&self.style));
		let mut id_to_idx = HashMap::new();
		let mut labels = HashMap::new();
		let mut edges = Vec::new();
		let count = data.nodes.len().max(1) as f64;

		for (i, node) in data.nodes.iter().enumerate() {
			let [x, y, z] = match node.position {
				Some(p) => [p.x, p.y, p.z],
				None => sphere_point(i as f64, count, self.style.layout.seed_radius),
			};
			let color = Rgb::parse(self.style.color_for(node.group)).unwrap_or(Rgb::WHITE);
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: node.group == NodeGroup::Root,
				user_data: NodeInfo {
					group: node.group,
					color,
					radius: self.style.radius_for(node.group),
					z,
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
			labels.insert(idx, node.label());
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(link.source.as_str()),
				id_to_idx.get(link.target.as_str()),
			) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
			}
		}

		self.graph = graph;
		self.labels = labels;
		self.edges = edges;
		self.hover = HoverState::default();
		self.project();
	}

	/// Ease towards `pose`. The first pose is taken immediately.
	pub fn set_camera(&mut self, pose: CameraPose) {
		self.camera.target = pose.position;
		self.camera.look_at = pose.look_at;
		if !self.camera.placed {
			self.camera.position = pose.position;
			self.camera.placed = true;
		}
	}

	/// Camera position after user rotation and zoom.
	pub fn eye(&self) -> [f64; 3] {
		let look = self.camera.look_at;
		let rel = sub(self.camera.position, look);
		let base = length(rel).max(NEAR_PLANE);
		let r = base * self.controls.zoom.exp();
		let theta = rel[0].atan2(rel[2]) + self.controls.yaw;
		let phi = ((rel[1] / base).clamp(-1.0, 1.0).acos() + self.controls.pitch)
			.clamp(MIN_POLAR, PI - MIN_POLAR);
		[
			look[0] + r * phi.sin() * theta.sin(),
			look[1] + r * phi.cos(),
			look[2] + r * phi.sin() * theta.cos(),
		]
	}

	pub fn tick(&mut self, dt: f64) {
		let dt = dt.clamp(0.0, MAX_STEP);
		self.graph.update(dt as f32);
		self.flow_time += dt;

		let ease = (dt / CAMERA_TRANSITION).min(1.0);
		for axis in 0..3 {
			let (from, to) = (self.camera.position[axis], self.camera.target[axis]);
			self.camera.position[axis] = from + (to - from) * ease;
		}
		self.controls.update();
		self.ease_highlight(dt);
		self.project();
	}

	pub fn project(&mut self) {
		self.view = View::new(
			self.eye(),
			self.camera.look_at,
			self.style.fov,
			self.width,
			self.height,
		);
		let view = self.view;
		self.projected.clear();
		self.draw_order.clear();
		self.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			let p = [node.x() as f64, node.y() as f64, info.z];
			if let Some(at) = view.project(p, info.radius) {
				self.projected.insert(node.index(), at);
				self.draw_order.push(Sprite {
					idx: node.index(),
					at,
					color: info.color,
					group: info.group,
				});
			}
		});
		self.draw_order
			.sort_by(|a, b| b.at.depth.total_cmp(&a.at.depth));
	}

	/// Shading derived from the injected lights for the current view.
	pub fn lighting(&self) -> Lighting {
		let mut lighting = Lighting {
			ambient: 0.0,
			key: 0.0,
			highlight: (0.0, 0.0),
		};
		for light in &self.lights {
			match *light {
				SceneLight::Ambient { color } => lighting.ambient += Rgb::from_u32(color).luminance(),
				SceneLight::Directional {
					color,
					intensity,
					direction,
				} => {
					lighting.key += intensity * Rgb::from_u32(color).luminance();
					if let Some(dir) = normalize(direction) {
						lighting.highlight = (
							dot(dir, self.view.right) * 0.4,
							-dot(dir, self.view.up) * 0.4,
						);
					}
				}
			}
		}
		if self.lights.is_empty() {
			lighting.ambient = 1.0;
		}
		lighting
	}

	/// Front-most node under the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		self.draw_order
			.iter()
			.rev()
			.find(|sprite| {
				let (dx, dy) = (sprite.at.x - sx, sprite.at.y - sy);
				(dx * dx + dy * dy).sqrt() < sprite.at.radius.max(HIT_RADIUS)
			})
			.map(|sprite| sprite.idx)
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.drag = DragState {
			active: true,
			last_x: x,
			last_y: y,
		};
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if self.drag.active {
			let (dx, dy) = (x - self.drag.last_x, y - self.drag.last_y);
			self.controls.rotate(dx, dy, self.height);
			self.drag.last_x = x;
			self.drag.last_y = y;
		} else {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}
	}

	pub fn pointer_up(&mut self) {
		self.drag.active = false;
	}

	pub fn pointer_leave(&mut self) {
		self.drag.active = false;
		self.set_hover(None);
	}

	pub fn wheel(&mut self, delta_y: f64) {
		self.controls.dolly(delta_y);
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Keep the old highlight around so it can fade out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	fn ease_highlight(&mut self, dt: f64) {
		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.project();
	}
}

fn simulation(style: &SurfaceStyle) -> SimulationParameters {
	let layout = &style.layout;
	SimulationParameters {
		force_charge: layout.force_charge,
		force_spring: layout.force_spring,
		force_max: layout.force_max,
		node_speed: layout.node_speed,
		damping_factor: layout.damping_factor,
	}
}

/// Point `i` of `n` spread evenly over a sphere (golden angle spiral).
fn sphere_point(i: f64, n: f64, radius: f64) -> [f64; 3] {
	let golden = PI * (3.0 - 5f64.sqrt());
	let y = 1.0 - 2.0 * (i + 0.5) / n;
	let ring = (1.0 - y * y).max(0.0).sqrt();
	let theta = golden * i;
	[
		radius * ring * theta.cos(),
		radius * y,
		radius * ring * theta.sin(),
	]
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
	[a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
	a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
	[
		a[1] * b[2] - a[2] * b[1],
		a[2] * b[0] - a[0] * b[2],
		a[0] * b[1] - a[1] * b[0],
	]
}

fn length(a: [f64; 3]) -> f64 {
	dot(a, a).sqrt()
}

fn normalize(a: [f64; 3]) -> Option<[f64; 3]> {
	let len = length(a);
	(len > f64::EPSILON).then(|| [a[0] / len, a[1] / len, a[2] / len])
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::config::{GraphSettings, Theme};
	use crate::graph::build_graph;

	fn scene() -> SceneState {
		let size = ContainerSize::new(800.0, 600.0).unwrap();
		SceneState::new(size, SurfaceStyle::new(&GraphSettings::default(), Theme::Dark))
	}

	#[test]
	fn view_projects_origin_to_centre() {
		let view = View::new([0.0, 0.0, 150.0], [0.0; 3], 40.0, 800.0, 600.0);
		let p = view.project([0.0; 3], 2.0).unwrap();
		assert!((p.x - 400.0).abs() < 1e-9 && (p.y - 300.0).abs() < 1e-9);
		assert!((p.depth - 150.0).abs() < 1e-9);

		let right = view.project([10.0, 10.0, 0.0], 2.0).unwrap();
		assert!(right.x > 400.0 && right.y < 300.0);
		assert!(view.project([0.0, 0.0, 200.0], 2.0).is_none());
	}

	#[test]
	fn set_data_mirrors_links_and_pins_root() {
		let mut scene = scene();
		scene.set_camera(CameraPose::looking_at_origin([0.0, 0.0, 150.0]));
		scene.set_data(&build_graph(&json!({"a": {"b": 1}, "c": [1, 2]})));
		assert_eq!(scene.edges.len(), 5);
		let mut anchors = 0;
		scene.graph.visit_nodes(|node| {
			if node.data.is_anchor {
				anchors += 1;
				assert_eq!(node.data.user_data.group, NodeGroup::Root);
			}
		});
		assert_eq!(anchors, 1);
		assert_eq!(scene.draw_order.len(), 6);
	}

	#[test]
	fn camera_eases_towards_new_pose() {
		let mut scene = scene();
		scene.set_camera(CameraPose::looking_at_origin([100.0, 100.0, 100.0]));
		assert_eq!(scene.camera.position, [100.0, 100.0, 100.0]);
		scene.set_camera(CameraPose::looking_at_origin([0.0, 0.0, 150.0]));
		scene.tick(0.016);
		let z = scene.camera.position[2];
		assert!(z > 100.0 && z < 150.0);
	}

	#[test]
	fn drag_rotation_is_damped() {
		let mut scene = scene();
		scene.pointer_down(100.0, 100.0);
		scene.pointer_move(160.0, 100.0);
		scene.pointer_up();
		scene.controls.update();
		let first = scene.controls.yaw;
		scene.controls.update();
		let second = scene.controls.yaw - first;
		assert!(first < 0.0);
		assert!(second.abs() < first.abs());
	}

	#[test]
	fn wheel_zooms_out_on_positive_delta() {
		let mut scene = scene();
		scene.set_camera(CameraPose::looking_at_origin([0.0, 0.0, 150.0]));
		let before = length(scene.eye());
		scene.wheel(120.0);
		for _ in 0..50 {
			scene.controls.update();
		}
		assert!(length(scene.eye()) > before);
	}

	#[test]
	fn hover_highlights_neighbours() {
		let mut scene = scene();
		scene.set_camera(CameraPose::looking_at_origin([0.0, 0.0, 150.0]));
		scene.set_data(&build_graph(&json!({"a": 1, "b": 2})));
		let root = scene.edges[0].0;
		scene.set_hover(Some(root));
		assert!(scene.is_hovered(root));
		assert!(scene.edges.iter().all(|&(_, tgt)| scene.is_highlighted(tgt)));
		scene.set_hover(None);
		assert!(scene.has_active_highlight());
		for _ in 0..500 {
			scene.tick(0.033);
		}
		assert!(!scene.has_active_highlight());
	}

	#[test]
	fn lighting_reads_injected_lights() {
		let mut scene = scene();
		scene.lights = GraphSettings::default().lights;
		scene.set_camera(CameraPose::looking_at_origin([0.0, 0.0, 150.0]));
		scene.project();
		let lighting = scene.lighting();
		assert!((lighting.ambient - 0xbb as f64 / 255.0).abs() < 1e-9);
		assert!((lighting.key - 0.6).abs() < 1e-9);
		// light from above shows up towards the top of the sphere
		assert!(lighting.highlight.1 < 0.0);
	}

	#[test]
	fn seeded_points_lie_on_sphere() {
		for i in 0..10 {
			let p = sphere_point(i as f64, 10.0, 60.0);
			assert!((length(p) - 60.0).abs() < 1e-9);
		}
	}
}
