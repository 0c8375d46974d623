//! Engine data structures: scene graphs, shapes, textures and instances.
//!
//! - `scene_graph` holds the node tree and the transform-composing traversal
//! - `transform` has in-place local-frame edits for 4x4 transforms
//! - `shape` contains textured geometry uploaded to the GPU
//! - `texture` contains GPU texture wrapper and creation utilities
//! - `instance` holds the per-draw matrix data streamed to the shaders

pub mod instance;
pub mod scene_graph;
pub mod shape;
pub mod texture;
pub mod transform;
