/// 4x4 transformation matrices and their composition
///
/// Matrices are `nalgebra::Matrix4<f32>`, stored column-major, so
/// `as_slice()` yields the flat layout a GPU uniform expects with no
/// transpose. Every function is pure and returns a new matrix.
use nalgebra::{Matrix4, Point3, Vector4};

use crate::animation::AnimationState;

/// Transform builder for the model-view-projection pipeline
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix4<f32> {
        Matrix4::identity()
    }

    /// Pixel-space projection: x in [0, width] maps to [-1, 1], y in
    /// [0, height] maps to [1, -1] (row 0 at the top) and z in [0, depth]
    /// is scaled by 2 / depth.
    ///
    /// Width, height and depth must be positive; zero produces non-finite
    /// entries. Use [`crate::Viewport::projection`] for a checked version.
    pub fn projection(width: f32, height: f32, depth: f32) -> Matrix4<f32> {
        Matrix4::new(
            2.0 / width, 0.0, 0.0, -1.0,
            0.0, -2.0 / height, 0.0, 1.0,
            0.0, 0.0, 2.0 / depth, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Matrix product `a * b`. Not commutative: `b` is applied first to a
    /// point, in the local frame already set up by `a`.
    pub fn multiply(a: &Matrix4<f32>, b: &Matrix4<f32>) -> Matrix4<f32> {
        a * b
    }

    pub fn translation(tx: f32, ty: f32, tz: f32) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, tx,
            0.0, 1.0, 0.0, ty,
            0.0, 0.0, 1.0, tz,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation about the x axis (radians)
    pub fn x_rotation(angle: f32) -> Matrix4<f32> {
        let (s, c) = angle.sin_cos();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c, -s, 0.0,
            0.0, s, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation about the y axis (radians)
    pub fn y_rotation(angle: f32) -> Matrix4<f32> {
        let (s, c) = angle.sin_cos();
        Matrix4::new(
            c, 0.0, s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation about the z axis (radians)
    pub fn z_rotation(angle: f32) -> Matrix4<f32> {
        let (s, c) = angle.sin_cos();
        Matrix4::new(
            c, -s, 0.0, 0.0,
            s, c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new(
            sx, 0.0, 0.0, 0.0,
            0.0, sy, 0.0, 0.0,
            0.0, 0.0, sz, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn translate(m: &Matrix4<f32>, tx: f32, ty: f32, tz: f32) -> Matrix4<f32> {
        Self::multiply(m, &Self::translation(tx, ty, tz))
    }

    pub fn x_rotate(m: &Matrix4<f32>, angle: f32) -> Matrix4<f32> {
        Self::multiply(m, &Self::x_rotation(angle))
    }

    pub fn y_rotate(m: &Matrix4<f32>, angle: f32) -> Matrix4<f32> {
        Self::multiply(m, &Self::y_rotation(angle))
    }

    pub fn z_rotate(m: &Matrix4<f32>, angle: f32) -> Matrix4<f32> {
        Self::multiply(m, &Self::z_rotation(angle))
    }

    pub fn scale(m: &Matrix4<f32>, sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Self::multiply(m, &Self::scaling(sx, sy, sz))
    }

    /// Compose the per-frame matrix:
    /// projection, translate, x/y/z rotate, then scale innermost.
    pub fn model_view_projection(
        state: &AnimationState,
        width: f32,
        height: f32,
        depth: f32,
    ) -> Matrix4<f32> {
        let matrix = Self::projection(width, height, depth);
        Self::compose_onto(&matrix, state)
    }

    /// Chain the object's transform onto an already built projection
    pub fn compose_onto(projection: &Matrix4<f32>, state: &AnimationState) -> Matrix4<f32> {
        let t = &state.translation;
        let r = state.wrapped_rotation();
        let s = &state.scale;

        let matrix = Self::translate(projection, t.x, t.y, t.z);
        let matrix = Self::x_rotate(&matrix, r.x);
        let matrix = Self::y_rotate(&matrix, r.y);
        let matrix = Self::z_rotate(&matrix, r.z);
        Self::scale(&matrix, s.x, s.y, s.z)
    }

    /// Apply a matrix to a model-space point (w = 1)
    pub fn transform_point(matrix: &Matrix4<f32>, point: &Point3<f32>) -> Vector4<f32> {
        matrix * point.to_homogeneous()
    }
}
