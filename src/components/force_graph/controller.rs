use log::{debug, info, warn};

use super::orbit::Orbit;
use super::surface::{CameraPose, ContainerSize, RenderSurface, SurfaceFactory, SurfaceStyle};
use crate::config::{GraphSettings, Theme};
use crate::error::RenderInitError;
use crate::graph::GraphData;

/// Where the controller is in its surface lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
	/// No surface has been created yet.
	Uninitialized,
	/// A surface is live.
	Ready,
	/// The last surface was disposed.
	Disposed,
}

enum Slot<S> {
	Uninitialized,
	Ready(S),
	Disposed,
}

/// Owns at most one rendering surface and rebuilds it for every new graph or
/// theme.
///
/// A running surface is always disposed before its replacement is created,
/// so there is never more than one alive. Once disposed, [`tick`](Self::tick)
/// leaves the surface alone and reports `false` so animation loops stop.
pub struct GraphViewController<F: SurfaceFactory> {
	factory: F,
	settings: GraphSettings,
	slot: Slot<F::Surface>,
	orbit: Orbit,
	status: String,
}

impl<F: SurfaceFactory> GraphViewController<F> {
	/// An uninitialized controller creating surfaces through `factory`.
	pub fn new(factory: F, settings: GraphSettings) -> Self {
		let orbit = Orbit::new(&settings.camera);
		Self {
			factory,
			settings,
			slot: Slot::Uninitialized,
			orbit,
			status: RenderInitError::ContainerNotReady.to_string(),
		}
	}

	/// Current lifecycle state.
	pub fn lifecycle(&self) -> Lifecycle {
		match self.slot {
			Slot::Uninitialized => Lifecycle::Uninitialized,
			Slot::Ready(_) => Lifecycle::Ready,
			Slot::Disposed => Lifecycle::Disposed,
		}
	}

	/// Human readable diagnostic for the last lifecycle change.
	pub fn status(&self) -> &str {
		&self.status
	}

	/// Settings applied to every new surface.
	pub fn settings(&self) -> &GraphSettings {
		&self.settings
	}

	/// The live surface, for forwarding user input.
	pub fn surface_mut(&mut self) -> Option<&mut F::Surface> {
		match &mut self.slot {
			Slot::Ready(surface) => Some(surface),
			_ => None,
		}
	}

	/// Replace the surface with a fresh one showing `data` in `theme`.
	///
	/// Without a usable container no surface is created. A surface still
	/// showing the previous graph is released and the controller goes back to
	/// [`Lifecycle::Uninitialized`] until retried.
	pub fn initialize(
		&mut self,
		container: Option<ContainerSize>,
		data: &GraphData,
		theme: Theme,
	) -> Result<(), RenderInitError> {
		let Some(size) = container.filter(ContainerSize::has_area) else {
			if matches!(self.slot, Slot::Ready(_)) {
				self.release();
				self.slot = Slot::Uninitialized;
			}
			return Err(self.fail(RenderInitError::ContainerNotReady));
		};

		self.release();
		let style = SurfaceStyle::new(&self.settings, theme);
		let mut surface = match self.factory.create(size, &style) {
			Ok(surface) => surface,
			Err(err) => {
				self.slot = Slot::Uninitialized;
				return Err(self.fail(err));
			}
		};

		surface.set_graph_data(data);
		for light in &self.settings.lights {
			surface.add_light(*light);
		}
		surface.set_controls(self.settings.controls);
		surface.set_camera(CameraPose::looking_at_origin(
			self.settings.camera.initial_position,
		));
		self.orbit = Orbit::new(&self.settings.camera);
		self.slot = Slot::Ready(surface);

		self.status = format!(
			"Nodes: {}, Links: {}\nGraph initialized successfully",
			data.nodes.len(),
			data.links.len()
		);
		info!(
			"graph view ready: {} nodes, {} links, {:?} theme",
			data.nodes.len(),
			data.links.len(),
			theme
		);
		Ok(())
	}

	/// Dispose the current surface. Safe to call in any state.
	pub fn dispose(&mut self) {
		self.release();
		self.slot = Slot::Disposed;
		self.status = "Graph disposed".into();
	}

	/// Advance the orbit by `dt` seconds and draw. Returns whether a surface
	/// is live; nothing is touched when it is not.
	pub fn tick(&mut self, dt: f64) -> bool {
		let Slot::Ready(surface) = &mut self.slot else {
			return false;
		};
		surface.set_camera(self.orbit.advance(dt));
		surface.render(dt);
		true
	}

	fn release(&mut self) {
		if let Slot::Ready(surface) = &mut self.slot {
			surface.dispose();
			self.slot = Slot::Disposed;
			debug!("graph view surface disposed");
		}
	}

	fn fail(&mut self, err: RenderInitError) -> RenderInitError {
		warn!("graph view not initialized: {err}");
		self.status = err.to_string();
		err
	}
}

impl<F: SurfaceFactory> Drop for GraphViewController<F> {
	fn drop(&mut self) {
		self.release();
	}
}
