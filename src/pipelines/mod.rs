//! Render pipelines.
//!
//! Primitive topology is baked into a pipeline, so shapes drawn as triangle
//! lists and as triangle strips each get their own instance of the basic
//! textured pipeline.

pub mod basic;

use crate::data_structures::shape::DrawType;

#[derive(Debug)]
pub struct Pipelines {
    pub triangles: wgpu::RenderPipeline,
    pub triangle_strip: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            triangles: basic::mk_basic_pipeline(
                device,
                config,
                texture_bind_group_layout,
                DrawType::Triangles,
            ),
            triangle_strip: basic::mk_basic_pipeline(
                device,
                config,
                texture_bind_group_layout,
                DrawType::TriangleStrip,
            ),
        }
    }

    pub fn get(&self, draw_type: DrawType) -> &wgpu::RenderPipeline {
        match draw_type {
            DrawType::Triangles => &self.triangles,
            DrawType::TriangleStrip => &self.triangle_strip,
        }
    }
}
