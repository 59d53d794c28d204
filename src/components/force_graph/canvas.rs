use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use super::render;
use super::state::SceneState;
use super::surface::{CameraPose, ContainerSize, RenderSurface, SurfaceFactory, SurfaceStyle};
use crate::config::{ControlSettings, SceneLight};
use crate::error::RenderInitError;
use crate::graph::GraphData;

/// Creates canvas surfaces inside one container element.
pub struct CanvasSurfaceFactory {
	container: HtmlElement,
}

impl CanvasSurfaceFactory {
	pub fn new(container: HtmlElement) -> Self {
		Self { container }
	}
}

impl SurfaceFactory for CanvasSurfaceFactory {
	type Surface = CanvasSurface;

	fn create(
		&mut self,
		size: ContainerSize,
		style: &SurfaceStyle,
	) -> Result<CanvasSurface, RenderInitError> {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| RenderInitError::Surface("no document".into()))?;
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(surface_error)?
			.dyn_into()
			.map_err(|_| RenderInitError::Surface("canvas element expected".into()))?;
		canvas.set_width(size.width as u32);
		canvas.set_height(size.height as u32);
		canvas.set_class_name("force-graph-canvas");

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(surface_error)?
			.ok_or_else(|| RenderInitError::Surface("2d context unavailable".into()))?
			.dyn_into()
			.map_err(|_| RenderInitError::Surface("2d context expected".into()))?;

		// Leftovers from a surface that was never disposed
		self.container.set_inner_html("");
		self.container.append_child(&canvas).map_err(surface_error)?;

		Ok(CanvasSurface {
			canvas,
			ctx,
			scene: Some(SceneState::new(size, style.clone())),
		})
	}
}

/// A force graph drawn on a 2D canvas with a perspective camera.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	scene: Option<SceneState>,
}

impl CanvasSurface {
	pub fn pointer_down(&mut self, x: f64, y: f64) {
		if let Some(s) = &mut self.scene {
			s.pointer_down(x, y);
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if let Some(s) = &mut self.scene {
			s.pointer_move(x, y);
		}
	}

	pub fn pointer_up(&mut self) {
		if let Some(s) = &mut self.scene {
			s.pointer_up();
		}
	}

	pub fn pointer_leave(&mut self) {
		if let Some(s) = &mut self.scene {
			s.pointer_leave();
		}
	}

	pub fn wheel(&mut self, delta_y: f64) {
		if let Some(s) = &mut self.scene {
			s.wheel(delta_y);
		}
	}

	pub fn resize(&mut self, size: ContainerSize) {
		if let Some(s) = &mut self.scene {
			self.canvas.set_width(size.width as u32);
			self.canvas.set_height(size.height as u32);
			s.resize(size.width, size.height);
		}
	}
}

impl RenderSurface for CanvasSurface {
	fn set_graph_data(&mut self, data: &GraphData) {
		if let Some(s) = &mut self.scene {
			s.set_data(data);
		}
	}

	fn set_camera(&mut self, pose: CameraPose) {
		if let Some(s) = &mut self.scene {
			s.set_camera(pose);
		}
	}

	fn set_controls(&mut self, controls: ControlSettings) {
		if let Some(s) = &mut self.scene {
			s.controls.settings = controls;
		}
	}

	fn add_light(&mut self, light: SceneLight) {
		if let Some(s) = &mut self.scene {
			s.lights.push(light);
		}
	}

	fn render(&mut self, dt: f64) {
		if let Some(s) = &mut self.scene {
			s.tick(dt);
			render::render(s, &self.ctx);
		}
	}

	fn dispose(&mut self) {
		if self.scene.take().is_some() {
			self.canvas.remove();
			debug!("canvas surface removed");
		}
	}
}

fn surface_error(err: wasm_bindgen::JsValue) -> RenderInitError {
	RenderInitError::Surface(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
