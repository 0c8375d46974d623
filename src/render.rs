//! Scene rendering.
//!
//! Rendering happens in two steps. [`collect_draws`] walks the scene from the
//! inverse camera transform with [`render_visitor`], producing a [`DrawList`]
//! of drawables and their model-view-projection matrices. [`draw_scene`] then
//! streams those matrices to the GPU and records one draw per entry.
//!
//! The first step does not touch the GPU at all, which keeps it usable with
//! any drawable type.

use cgmath::Matrix4;
use wgpu::RenderPass;

use crate::{
    context::Context,
    data_structures::{
        instance::InstanceRaw,
        scene_graph::{Node, Scene, walk},
        shape::Shape,
    },
};

/// One drawable and the matrix taking its vertices into clip space.
#[derive(Debug)]
pub struct Draw<'a, D> {
    pub drawable: &'a D,
    pub model_view_projection: Matrix4<f32>,
}

/// Draws gathered by a render walk, in traversal order.
#[derive(Debug)]
pub struct DrawList<'a, D> {
    pub projection: Matrix4<f32>,
    pub draws: Vec<Draw<'a, D>>,
}

impl<'a, D> DrawList<'a, D> {
    pub fn new(projection: Matrix4<f32>) -> Self {
        Self {
            projection,
            draws: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn instances(&self) -> Vec<InstanceRaw> {
        self.draws
            .iter()
            .map(|draw| draw.model_view_projection.into())
            .collect()
    }
}

/// Visitor queueing a draw for every node that carries a drawable.
///
/// `world` already contains the view transform since the walk starts from
/// the inverse camera; only the projection is left to apply.
pub fn render_visitor<'a, D>(
    node: &'a Node<D>,
    world: &Matrix4<f32>,
    list: &mut DrawList<'a, D>,
) -> anyhow::Result<()> {
    if let Some(drawable) = &node.drawable {
        list.draws.push(Draw {
            drawable: drawable.as_ref(),
            model_view_projection: list.projection * *world,
        });
    }
    Ok(())
}

/// Walk `scene` from its view transform and collect everything to draw.
pub fn collect_draws<'a, D>(
    scene: &'a Scene<D>,
    projection: Matrix4<f32>,
) -> anyhow::Result<DrawList<'a, D>> {
    let view = scene.view_transform()?;
    let mut list = DrawList::new(projection);
    walk(&scene.root, &mut render_visitor::<D>, &mut list, Some(&view))?;
    Ok(list)
}

/// Record the draws of `list` into `render_pass`.
///
/// The matrices must have been uploaded with [`Context::write_instances`]
/// for this very list beforehand.
pub fn draw_scene(ctx: &Context, list: &DrawList<'_, Shape>, render_pass: &mut RenderPass<'_>) {
    for (idx, draw) in list.draws.iter().enumerate() {
        let shape = draw.drawable;
        let pipeline = ctx.pipelines.get(shape.draw_type);
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &shape.bind_group, &[]);
        render_pass.set_vertex_buffer(0, shape.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, ctx.instances.slice(idx));
        match &shape.index_buffer {
            Some(index_buffer) => {
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..shape.num_indices, 0, 0..1);
            }
            None => render_pass.draw(0..shape.num_vertices, 0..1),
        }
    }
}
