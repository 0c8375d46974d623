//! webdraw
//!
//! A small scene-graph renderer on wgpu that runs natively and in the browser
//! through WebGL. A [`data_structures::scene_graph::Scene`] is a tree of
//! nodes, each with an optional local transform, drawable and animation hook.
//! Every frame the tree is walked depth-first, world transforms are composed
//! parent-first and each drawable is drawn with its own model-view-projection
//! matrix. Afterwards the animation hooks advance the local transforms.
//!
//! High-level modules
//! - `animation`: animation clock and the per-tick animation walk
//! - `camera`: perspective projection and the keyboard/mouse camera controller
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: scene graph, transforms, shapes, instances and textures
//! - `flow`: window, event loop and the per-frame tick
//! - `input`: keyboard and mouse state collected from window events
//! - `pipelines`: the textured shape pipelines, one per primitive topology
//! - `render`: draw list collection and submission
//! - `resources`: helpers to load textures from disk or over HTTP
//!

pub mod animation;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod input;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::{MouseButton, WindowEvent};
pub use winit::keyboard::KeyCode;
