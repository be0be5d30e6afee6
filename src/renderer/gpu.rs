//! `Renderer` backed by the WebGPU pipeline
//!
//! Shapes are batched into one vertex list per frame and submitted on
//! `present`. The HUD is not drawn on the GPU; the frontend reads it back
//! with [`GpuRenderer::hud`] and mirrors it into the page.

use glam::Vec2;

use super::pipeline::RenderState;
use super::shapes;
use super::vertex::Vertex;
use crate::platform::{Color, Hud, Renderer};

pub struct GpuRenderer {
    state: RenderState,
    vertices: Vec<Vertex>,
    hud: Option<Hud>,
}

impl GpuRenderer {
    pub fn new(state: RenderState) -> Self {
        Self {
            state,
            vertices: Vec::new(),
            hud: None,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.state.resize(width, height);
    }

    /// HUD requested by the last frame
    pub fn hud(&self) -> Option<Hud> {
        self.hud
    }
}

impl Renderer for GpuRenderer {
    fn clear(&mut self) {
        self.vertices.clear();
    }

    fn draw_circle(&mut self, color: Color, center: Vec2, radius: f32) {
        let segments = shapes::circle_segments(radius);
        self.vertices
            .extend(shapes::circle(center, radius, color, segments));
    }

    fn draw_polygon(&mut self, color: Color, points: &[Vec2], line_width: f32) {
        self.vertices
            .extend(shapes::polygon_outline(points, color, line_width));
    }

    fn draw_overlay(&mut self, hud: &Hud) {
        self.hud = Some(*hud);
    }

    fn present(&mut self) {
        match self.state.render(&self.vertices) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost) => {
                let (w, h) = self.state.size;
                self.state.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}
