//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::Palette;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const CYAN: [f32; 4] = [0.0, 0.98, 1.0, 1.0]; // #00faff
    pub const MAGENTA: [f32; 4] = [1.0, 0.0, 0.9, 1.0]; // #ff00e6
    pub const GREEN: [f32; 4] = [0.0, 1.0, 0.56, 1.0]; // #00ff8f
    pub const YELLOW: [f32; 4] = [1.0, 0.9, 0.0, 1.0]; // #ffe600
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.02, 1.0];
    /// Faint frame around the playfield when letterboxed
    pub const ARENA_EDGE: [f32; 4] = [0.12, 0.12, 0.16, 1.0];
}

/// RGBA for a palette entry
pub fn palette_color(palette: Palette) -> [f32; 4] {
    match palette {
        Palette::Cyan => colors::CYAN,
        Palette::Magenta => colors::MAGENTA,
        Palette::Green => colors::GREEN,
        Palette::Yellow => colors::YELLOW,
        Palette::White => colors::WHITE,
    }
}

/// Same color with its alpha scaled by `alpha`
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}
