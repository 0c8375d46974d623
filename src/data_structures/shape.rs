//! Drawable shapes: textured geometry living on the GPU.
//!
//! A [`Shape`] owns its vertex (and optional index) buffer and shares its
//! [`Texture`] with every other shape using the same image. Scene nodes hold
//! shapes behind an `Arc`, so one upload can be drawn by many nodes.

use std::sync::Arc;

use anyhow::{Context as _, bail};
use wgpu::util::DeviceExt;

use crate::data_structures::texture::Texture;

/// Describes how the bytes of a vertex buffer map onto shader inputs.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl ShapeVertex {
    /**
     * Interleave flat position (xyz) and texture coordinate (uv) arrays.
     *
     * Both arrays must describe the same number of vertices.
     */
    pub fn interleave(points: &[f32], tex_coords: &[f32]) -> anyhow::Result<Vec<ShapeVertex>> {
        if points.len() % 3 != 0 {
            bail!("{} position floats do not form whole xyz triples.", points.len());
        }
        if tex_coords.len() % 2 != 0 {
            bail!("{} texture floats do not form whole uv pairs.", tex_coords.len());
        }
        if points.len() / 3 != tex_coords.len() / 2 {
            bail!(
                "Shape has {} positions but {} texture coordinates.",
                points.len() / 3,
                tex_coords.len() / 2
            );
        }
        Ok(points
            .chunks_exact(3)
            .zip(tex_coords.chunks_exact(2))
            .map(|(p, t)| ShapeVertex {
                position: [p[0], p[1], p[2]],
                tex_coords: [t[0], t[1]],
            })
            .collect())
    }
}

impl Vertex for ShapeVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Primitive assembly of a shape. Each variant has its own pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawType {
    Triangles,
    TriangleStrip,
}

impl From<DrawType> for wgpu::PrimitiveTopology {
    fn from(draw_type: DrawType) -> Self {
        match draw_type {
            DrawType::Triangles => wgpu::PrimitiveTopology::TriangleList,
            DrawType::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }
}

#[rustfmt::skip]
const CUBE_POINTS: [f32; 72] = [
    // Bottom
    0.0, 0.0, 1.0,
    1.0, 0.0, 1.0,
    1.0, 0.0, 0.0,
    0.0, 0.0, 0.0,
    // Top
    0.0, 1.0, 1.0,
    1.0, 1.0, 1.0,
    1.0, 1.0, 0.0,
    0.0, 1.0, 0.0,
    // Front
    0.0, 0.0, 1.0,
    1.0, 0.0, 1.0,
    1.0, 1.0, 1.0,
    0.0, 1.0, 1.0,
    // Back
    1.0, 0.0, 0.0,
    0.0, 0.0, 0.0,
    0.0, 1.0, 0.0,
    1.0, 1.0, 0.0,
    // Left
    0.0, 0.0, 1.0,
    0.0, 1.0, 1.0,
    0.0, 1.0, 0.0,
    0.0, 0.0, 0.0,
    // Right
    1.0, 0.0, 1.0,
    1.0, 0.0, 0.0,
    1.0, 1.0, 0.0,
    1.0, 1.0, 1.0,
];

#[rustfmt::skip]
pub const CUBE_INDICES: [u16; 36] = [
    // Bottom
    3, 2, 1,
    1, 0, 3,
    // Top
    4, 5, 6,
    6, 7, 4,
    // Front
    8, 9, 10,
    10, 11, 8,
    // Back
    12, 13, 14,
    14, 15, 12,
    // Left
    16, 17, 18,
    18, 19, 16,
    // Right
    20, 21, 22,
    22, 23, 20,
];

/// The 24 vertices of the unit cube spanning [0, 1] on every axis.
///
/// Faces don't share vertices so each one maps the whole texture.
pub fn cube_vertices() -> Vec<ShapeVertex> {
    let face_uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    CUBE_POINTS
        .chunks_exact(3)
        .zip(face_uvs.iter().cycle())
        .map(|(p, uv)| ShapeVertex {
            position: [p[0], p[1], p[2]],
            tex_coords: *uv,
        })
        .collect()
}

/// Textured geometry uploaded to the GPU.
#[derive(Debug)]
pub struct Shape {
    pub name: String,
    pub draw_type: DrawType,
    pub vertex_buffer: wgpu::Buffer,
    pub num_vertices: u32,
    pub index_buffer: Option<wgpu::Buffer>,
    pub num_indices: u32,
    pub texture: Arc<Texture>,
    pub bind_group: wgpu::BindGroup,
}

impl Shape {
    /// Build a shape from flat position and texture coordinate arrays.
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        name: &str,
        draw_type: DrawType,
        points: &[f32],
        tex_coords: &[f32],
        texture: Arc<Texture>,
    ) -> anyhow::Result<Self> {
        let vertices = ShapeVertex::interleave(points, tex_coords)
            .with_context(|| format!("Invalid geometry for shape {name}"))?;
        Ok(Self::from_vertices(
            device, layout, name, draw_type, &vertices, None, texture,
        ))
    }

    /// The unit cube from [`cube_vertices`] drawn as indexed triangles.
    pub fn cube(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, texture: Arc<Texture>) -> Self {
        Self::from_vertices(
            device,
            layout,
            "cube",
            DrawType::Triangles,
            &cube_vertices(),
            Some(&CUBE_INDICES[..]),
            texture,
        )
    }

    pub fn from_vertices(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        name: &str,
        draw_type: DrawType,
        vertices: &[ShapeVertex],
        indices: Option<&[u16]>,
        texture: Arc<Texture>,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = indices.map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{name} Index Buffer")),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        let bind_group = texture.bind_group(device, layout, name);

        Self {
            name: name.to_string(),
            draw_type,
            vertex_buffer,
            num_vertices: vertices.len() as u32,
            index_buffer,
            num_indices: indices.map_or(0, |indices| indices.len() as u32),
            texture,
            bind_group,
        }
    }
}
