//! Per-draw transformation data for GPU rendering.
//!
//! Every draw gets its fully composed model-view-projection matrix written
//! into one shared vertex buffer that is stepped per instance. A draw binds
//! its own slice of that buffer and renders a single instance, which keeps
//! things working on WebGL2 where a non-zero first instance is unavailable.

use std::mem;

use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::data_structures::shape::Vertex;

/**
 * The raw instance is the actual data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model_view_projection: [[f32; 4]; 4],
}

impl From<Matrix4<f32>> for InstanceRaw {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self {
            model_view_projection: matrix.into(),
        }
    }
}

impl InstanceRaw {
    pub const SIZE: wgpu::BufferAddress = mem::size_of::<InstanceRaw>() as wgpu::BufferAddress;
}

/**
 * A mat4 takes up 4 vertex slots as it is technically 4 vec4s, one per column.
 *
 * Locations 0 and 1 belong to `ShapeVertex`, so the matrix starts at 2.
 */
impl Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: InstanceRaw::SIZE,
            // Shaders only advance to the next element when a new instance starts
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Growable GPU buffer holding one [`InstanceRaw`] per draw of the current frame.
#[derive(Debug)]
pub struct InstanceBuffer {
    pub buffer: wgpu::Buffer,
    capacity: usize,
}

impl InstanceBuffer {
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: InstanceRaw::SIZE * capacity as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Upload `instances`, replacing the buffer when it is too small.
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[InstanceRaw]) {
        if instances.is_empty() {
            return;
        }
        if instances.len() > self.capacity {
            log::debug!(
                "Growing the instance buffer from {} to {} draws.",
                self.capacity,
                instances.len()
            );
            self.buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Instance Buffer"),
                contents: bytemuck::cast_slice(instances),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
            self.capacity = instances.len();
        } else {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    /// The part of the buffer that belongs to draw number `idx`.
    pub fn slice(&self, idx: usize) -> wgpu::BufferSlice<'_> {
        let start = InstanceRaw::SIZE * idx as wgpu::BufferAddress;
        self.buffer.slice(start..start + InstanceRaw::SIZE)
    }
}
