use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, MouseEvent, WheelEvent};

use super::canvas::{CanvasSurface, CanvasSurfaceFactory};
use super::controller::GraphViewController;
use super::surface::ContainerSize;
use crate::config::{GraphSettings, Theme};
use crate::error::RenderInitError;
use crate::graph::GraphData;

type ViewSlot = StoredValue<Option<Rc<GraphView>>, LocalStorage>;

/// Controller plus the browser callbacks driving it. Callbacks only hold weak
/// references, so dropping the last `Rc` tears the whole view down.
struct GraphView {
	controller: RefCell<GraphViewController<CanvasSurfaceFactory>>,
	container: HtmlElement,
	height: f64,
	animate: RefCell<Option<Closure<dyn FnMut(f64)>>>,
	resize_cb: RefCell<Option<Closure<dyn FnMut()>>>,
	pending: Cell<Option<i32>>,
	last_frame: Cell<Option<f64>>,
}

impl GraphView {
	fn new(container: HtmlElement, settings: GraphSettings) -> Rc<Self> {
		let height = settings.height;
		let view = Rc::new(Self {
			controller: RefCell::new(GraphViewController::new(
				CanvasSurfaceFactory::new(container.clone()),
				settings,
			)),
			container,
			height,
			animate: RefCell::new(None),
			resize_cb: RefCell::new(None),
			pending: Cell::new(None),
			last_frame: Cell::new(None),
		});

		let weak = Rc::downgrade(&view);
		*view.animate.borrow_mut() = Some(Closure::new(move |now: f64| {
			if let Some(view) = weak.upgrade() {
				view.frame(now);
			}
		}));

		let weak = Rc::downgrade(&view);
		*view.resize_cb.borrow_mut() = Some(Closure::new(move || {
			if let Some(view) = weak.upgrade() {
				if let Some(size) = view.container_size() {
					view.with_surface(|s| s.resize(size));
				}
			}
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), view.resize_cb.borrow().as_ref()) {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		view
	}

	fn container_size(&self) -> Option<ContainerSize> {
		ContainerSize::new(self.container.client_width() as f64, self.height)
	}

	fn initialize(&self, data: &GraphData, theme: Theme) -> String {
		let size = self.container_size();
		let mut controller = self.controller.borrow_mut();
		if controller.initialize(size, data, theme).is_ok() {
			self.schedule();
		}
		controller.status().to_string()
	}

	fn frame(&self, now: f64) {
		self.pending.set(None);
		let dt = self
			.last_frame
			.replace(Some(now))
			.map_or(0.0, |last| (now - last) / 1000.0);
		if self.controller.borrow_mut().tick(dt) {
			self.schedule();
		} else {
			self.last_frame.set(None);
		}
	}

	fn schedule(&self) {
		if self.pending.get().is_some() {
			return;
		}
		let animate = self.animate.borrow();
		let (Some(window), Some(cb)) = (web_sys::window(), animate.as_ref()) else {
			return;
		};
		match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(id) => self.pending.set(Some(id)),
			Err(err) => warn!("animation frame not scheduled: {err:?}"),
		}
	}

	fn with_surface(&self, f: impl FnOnce(&mut CanvasSurface)) {
		if let Some(surface) = self.controller.borrow_mut().surface_mut() {
			f(surface);
		}
	}

	/// Cancel the pending frame, drop the listeners and dispose the surface.
	fn shutdown(&self) {
		let window = web_sys::window();
		if let (Some(window), Some(id)) = (&window, self.pending.take()) {
			let _ = window.cancel_animation_frame(id);
		}
		self.last_frame.set(None);
		if let (Some(window), Some(cb)) = (&window, self.resize_cb.borrow_mut().take()) {
			let _ =
				window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		self.controller.borrow_mut().dispose();
		self.animate.borrow_mut().take();
	}
}

fn forward(slot: ViewSlot, f: impl FnOnce(&mut CanvasSurface)) {
	slot.with_value(|view| {
		if let Some(view) = view {
			view.with_surface(f);
		}
	});
}

fn local_point(container_ref: NodeRef<leptos::html::Div>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let container: HtmlElement = container_ref.get_untracked()?.into();
	let rect = container.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// 3D force graph of `data`, rebuilt whenever `data` or `theme` changes.
#[component]
pub fn ForceGraphView(
	/// The graph to draw.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Picks background and node colours.
	#[prop(into)]
	theme: Signal<Theme>,
	/// Overrides [`GraphSettings::default`].
	#[prop(optional)]
	settings: Option<GraphSettings>,
) -> impl IntoView {
	let settings = settings.unwrap_or_default();
	let height = settings.height;
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let status = RwSignal::new(RenderInitError::ContainerNotReady.to_string());
	let slot: ViewSlot = StoredValue::new_local(None);

	Effect::new(move |_| {
		let data = data.get();
		let theme = theme.get();
		let Some(container) = container_ref.get() else {
			status.set(RenderInitError::ContainerNotReady.to_string());
			return;
		};

		let view = slot.with_value(Option::clone).unwrap_or_else(|| {
			let created = GraphView::new(container.into(), settings.clone());
			slot.set_value(Some(created.clone()));
			created
		});
		status.set(view.initialize(&data, theme));
	});

	on_cleanup(move || {
		if let Some(Some(view)) = slot.try_update_value(Option::take) {
			view.shutdown();
		}
	});

	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(container_ref, &ev) {
			forward(slot, |s| s.pointer_down(x, y));
		}
	};

	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(container_ref, &ev) {
			forward(slot, |s| s.pointer_move(x, y));
		}
	};

	let on_mouseup = move |_: MouseEvent| forward(slot, CanvasSurface::pointer_up);

	let on_mouseleave = move |_: MouseEvent| forward(slot, CanvasSurface::pointer_leave);

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		forward(slot, |s| s.wheel(ev.delta_y()));
	};

	view! {
		<div class="graph-panel">
			<pre class="graph-status">{move || status.get()}</pre>
			<div
				node_ref=container_ref
				class="graph-container"
				style=format!("height: {height}px; cursor: grab;")
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
			/>
		</div>
	}
}
