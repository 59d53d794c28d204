mod canvas;
mod color;
mod component;
mod controller;
mod orbit;
mod render;
mod state;
mod surface;

pub use component::ForceGraphView;
pub use controller::{GraphViewController, Lifecycle};
pub use orbit::Orbit;
pub use surface::{CameraPose, ContainerSize, RenderSurface, SurfaceFactory, SurfaceStyle};
