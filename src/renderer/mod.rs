//! WebGPU rendering module
//!
//! Flat-colored triangles: filled circles for rocks and shots, outlined
//! polygons for the ship.

pub mod gpu;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use gpu::GpuRenderer;
pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;
