//! Scene graph and hierarchical scene organization.
//!
//! A scene is a tree of [`Node`]s. Each node may carry a local transform
//! (relative to its parent), a shared drawable, an animation hook and an
//! ordered list of children. The graph itself knows nothing about rendering
//! or animating: both are expressed as visitors handed to [`walk`] and
//! [`walk_mut`], which do a depth-first pre-order traversal while composing
//! the world transform of every node on the way down.

use std::{fmt::Debug, sync::Arc};

use anyhow::anyhow;
use cgmath::{Matrix4, SquareMatrix};

use crate::data_structures::shape::Shape;

/// Per-tick behaviour attached to a node.
///
/// The hook receives the node's own local transform and the seconds elapsed
/// since the previous animation tick. It must not assume anything about the
/// rest of the tree.
pub trait Animate {
    fn animate(&mut self, transform: &mut Matrix4<f32>, elapsed: f32);
}

impl<F> Animate for F
where
    F: FnMut(&mut Matrix4<f32>, f32),
{
    fn animate(&mut self, transform: &mut Matrix4<f32>, elapsed: f32) {
        self(transform, elapsed)
    }
}

/// One element of the scene hierarchy.
///
/// All fields are optional. A node without a transform inherits its parent's
/// world transform unchanged, a node without a drawable contributes no
/// geometry and a node without children is a leaf.
pub struct Node<D = Shape> {
    pub transform: Option<Matrix4<f32>>,
    pub drawable: Option<Arc<D>>,
    pub animate: Option<Box<dyn Animate>>,
    pub children: Vec<Node<D>>,
}

impl<D> Node<D> {
    /// Create a node with every field absent.
    pub fn new() -> Self {
        Self {
            transform: None,
            drawable: None,
            animate: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_drawable(mut self, drawable: Arc<D>) -> Self {
        self.drawable = Some(drawable);
        self
    }

    pub fn with_animation(mut self, animate: impl Animate + 'static) -> Self {
        self.animate = Some(Box::new(animate));
        self
    }

    pub fn with_child(mut self, child: Node<D>) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: Node<D>) {
        self.children.push(child);
    }

    /// Run this node's animation hook, if it has one.
    ///
    /// The hook only ever sees this node's local transform. A node that is
    /// animated but has no transform yet starts from the identity.
    pub fn tick(&mut self, elapsed: f32) {
        let Self {
            transform, animate, ..
        } = self;
        if let Some(animate) = animate {
            let transform = transform.get_or_insert_with(Matrix4::identity);
            animate.animate(transform, elapsed);
        }
    }
}

impl<D> Default for Node<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Debug for Node<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("transform", &self.transform)
            .field("drawable", &self.drawable.is_some())
            .field("animate", &self.animate.is_some())
            .field("children", &self.children)
            .finish()
    }
}

/// Root node plus the camera the scene is viewed through.
///
/// `camera` maps camera space into world space. Rendering walks the tree
/// starting from its inverse, see [`Scene::view_transform`].
#[derive(Debug)]
pub struct Scene<D = Shape> {
    pub root: Node<D>,
    pub camera: Option<Matrix4<f32>>,
}

impl<D> Scene<D> {
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            camera: Some(Matrix4::identity()),
        }
    }

    /// World-to-camera matrix: the inverse of the camera transform, or the
    /// identity when the scene has no camera.
    pub fn view_transform(&self) -> anyhow::Result<Matrix4<f32>> {
        match &self.camera {
            Some(camera) => camera
                .invert()
                .ok_or_else(|| anyhow!("The camera transform {:?} is not invertible.", camera)),
            None => Ok(Matrix4::identity()),
        }
    }
}

impl<D> Default for Scene<D> {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * Top-down, depth-first walk of the subtree rooted at `node`.
 *
 * The world transform of each node is `parent * local` when the node has a
 * local transform and `parent` itself otherwise. The visitor sees a node
 * before any of its descendants and children are visited in sequence order.
 * `parent` defaults to the identity.
 *
 * The first error returned by the visitor stops the walk and is handed back
 * unchanged; nothing after the failing node is visited.
 */
pub fn walk<'a, D, C, E, V>(
    node: &'a Node<D>,
    visitor: &mut V,
    ctx: &mut C,
    parent: Option<&Matrix4<f32>>,
) -> Result<(), E>
where
    V: FnMut(&'a Node<D>, &Matrix4<f32>, &mut C) -> Result<(), E>,
{
    match parent {
        Some(parent) => walk_from(node, visitor, ctx, parent),
        None => walk_from(node, visitor, ctx, &Matrix4::identity()),
    }
}

fn walk_from<'a, D, C, E, V>(
    node: &'a Node<D>,
    visitor: &mut V,
    ctx: &mut C,
    parent: &Matrix4<f32>,
) -> Result<(), E>
where
    V: FnMut(&'a Node<D>, &Matrix4<f32>, &mut C) -> Result<(), E>,
{
    let composed;
    let world = match &node.transform {
        Some(local) => {
            composed = *parent * *local;
            &composed
        }
        None => parent,
    };

    visitor(node, world, ctx)?;

    for child in &node.children {
        walk_from(child, visitor, ctx, world)?;
    }
    Ok(())
}

/// Same traversal as [`walk`], but the visitor may mutate the nodes.
///
/// A node's world transform, and with it the parent transform handed to its
/// children, is fixed before the visitor runs. Changes the visitor makes to
/// the local transform therefore only show up in the next walk.
pub fn walk_mut<D, C, E, V>(
    node: &mut Node<D>,
    visitor: &mut V,
    ctx: &mut C,
    parent: Option<&Matrix4<f32>>,
) -> Result<(), E>
where
    V: FnMut(&mut Node<D>, &Matrix4<f32>, &mut C) -> Result<(), E>,
{
    let parent = parent.copied().unwrap_or_else(Matrix4::identity);
    walk_mut_from(node, visitor, ctx, &parent)
}

fn walk_mut_from<D, C, E, V>(
    node: &mut Node<D>,
    visitor: &mut V,
    ctx: &mut C,
    parent: &Matrix4<f32>,
) -> Result<(), E>
where
    V: FnMut(&mut Node<D>, &Matrix4<f32>, &mut C) -> Result<(), E>,
{
    let world = match node.transform {
        Some(local) => *parent * local,
        None => *parent,
    };

    visitor(node, &world, ctx)?;

    for child in node.children.iter_mut() {
        walk_mut_from(child, visitor, ctx, &world)?;
    }
    Ok(())
}
