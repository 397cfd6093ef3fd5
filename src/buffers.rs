//! GPU-resident position and colour buffers for the letter mesh.
//!
//! Both buffers are uploaded once at startup with `VERTEX` usage only, so
//! there is no way to rewrite them afterwards.
//!
//! # Vertex Layout
//!
//! | Buffer    | Attribute    | Format    | Stride | Shader Location |
//! |-----------|--------------|-----------|--------|-----------------|
//! | positions | `a_position` | Float32x3 | 12     | 0               |
//! | colors    | `a_color`    | Unorm8x4  | 4      | 1               |
//!
//! Colours are stored as three bytes per vertex. wgpu needs 4-byte aligned
//! strides and has no three-byte format, so each colour is padded with an
//! opaque alpha byte on upload; the shader only reads `.rgb`.

use wgpu::util::DeviceExt;

use crate::shader::{A_COLOR_LOCATION, A_POSITION_LOCATION};

pub const POSITION_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<[f32; 3]>() as u64,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: A_POSITION_LOCATION,
        format: wgpu::VertexFormat::Float32x3,
    }],
};

pub const COLOR_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<[u8; 4]>() as u64,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: A_COLOR_LOCATION,
        format: wgpu::VertexFormat::Unorm8x4,
    }],
};

/// Static buffer of `[x, y, z]` positions.
#[derive(Debug)]
pub struct PositionBuffer {
    buffer: wgpu::Buffer,
    len: u32,
}

/// Static buffer of normalized RGB colours.
#[derive(Debug)]
pub struct ColorBuffer {
    buffer: wgpu::Buffer,
    len: u32,
}

pub fn upload_positions(device: &wgpu::Device, data: &[[f32; 3]]) -> PositionBuffer {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Letter Positions"),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX,
    });
    PositionBuffer {
        buffer,
        len: data.len() as u32,
    }
}

pub fn upload_colors(device: &wgpu::Device, data: &[[u8; 3]]) -> ColorBuffer {
    let padded = pad_colors(data);
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Letter Colors"),
        contents: bytemuck::cast_slice(&padded),
        usage: wgpu::BufferUsages::VERTEX,
    });
    ColorBuffer {
        buffer,
        len: data.len() as u32,
    }
}

fn pad_colors(data: &[[u8; 3]]) -> Vec<[u8; 4]> {
    data.iter().map(|&[r, g, b]| [r, g, b, u8::MAX]).collect()
}

/// The position and colour buffers of one mesh.
///
/// Constructed only from equally sized tables, so the two buffers always
/// describe the same number of vertices.
#[derive(Debug)]
pub struct GeometryBuffers {
    positions: PositionBuffer,
    colors: ColorBuffer,
}

impl GeometryBuffers {
    pub fn new<const N: usize>(
        device: &wgpu::Device,
        positions: &[[f32; 3]; N],
        colors: &[[u8; 3]; N],
    ) -> Self {
        let positions = upload_positions(device, positions);
        let colors = upload_colors(device, colors);
        log::debug!("uploaded {} vertices", N);
        Self { positions, colors }
    }

    /// The extruded letter from [`crate::geometry`].
    pub fn letter(device: &wgpu::Device) -> Self {
        Self::new(device, &crate::geometry::POSITIONS, &crate::geometry::COLORS)
    }

    pub fn vertex_count(&self) -> u32 {
        debug_assert_eq!(self.positions.len, self.colors.len);
        self.positions.len
    }

    /// Bind positions to slot 0 and colours to slot 1.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_vertex_buffer(0, self.positions.buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.colors.buffer.slice(..));
    }

    pub fn release(self) {
        self.positions.buffer.destroy();
        self.colors.buffer.destroy();
    }
}
