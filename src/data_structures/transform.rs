//! In-place edits of local transforms.
//!
//! Every operation post-multiplies, so it acts in the transform's own local
//! frame: `m.translate(v)` is `m = m * T(v)`. Chaining `translate`, `rotate`
//! and `translate` back is how a node spins about a point other than its
//! origin.

use cgmath::{InnerSpace, Matrix4, Rad, Vector3};

pub trait LocalTransform {
    fn translate(&mut self, offset: impl Into<Vector3<f32>>);

    /// Rotate about `axis` (normalised here). A zero-length axis leaves the
    /// transform untouched.
    fn rotate(&mut self, angle: impl Into<Rad<f32>>, axis: impl Into<Vector3<f32>>);

    fn scale(&mut self, factor: f32);
}

impl LocalTransform for Matrix4<f32> {
    fn translate(&mut self, offset: impl Into<Vector3<f32>>) {
        *self = *self * Matrix4::from_translation(offset.into());
    }

    fn rotate(&mut self, angle: impl Into<Rad<f32>>, axis: impl Into<Vector3<f32>>) {
        let axis = axis.into();
        if axis.magnitude2() == 0.0 {
            return;
        }
        *self = *self * Matrix4::from_axis_angle(axis.normalize(), angle.into());
    }

    fn scale(&mut self, factor: f32) {
        *self = *self * Matrix4::from_scale(factor);
    }
}
