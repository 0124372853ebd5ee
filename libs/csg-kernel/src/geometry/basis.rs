//! # Orthonormal Basis
//!
//! A 2D frame `(u, v)` embedded in a 3D plane, used to move geometry between
//! the plane and 2D areas.

use crate::context::Context;
use crate::error::{KernelError, KernelResult};
use crate::geometry::plane::Plane;
use crate::math::{Matrix4x4, Matrix4x4Ext, Vector2, Vector3, Vector3Ext};

/// Frame `(u, v, normal)` of a plane.
///
/// `v = normal × right` and `u = v × normal`, so `u` is the component of the
/// right vector lying in the plane.
#[derive(Debug, Clone, Copy)]
pub struct OrthoNormalBasis {
    plane: Plane,
    u: Vector3,
    v: Vector3,
    origin: Vector3,
}

impl OrthoNormalBasis {
    /// Builds the frame from a plane and a right-hand direction.
    ///
    /// # Arguments
    ///
    /// * `plane` - The plane the frame lies in
    /// * `right` - Direction that becomes `u` after projection into the plane
    ///
    /// # Errors
    ///
    /// `right` parallel to the plane normal.
    pub fn new(plane: Plane, right: Vector3) -> KernelResult<Self> {
        let normal = plane.normal();
        let v = normal.cross(right).try_normalize().ok_or_else(|| {
            KernelError::invalid_parameter("right", "must not be parallel to the plane normal")
        })?;
        let u = v.cross(normal);
        Ok(Self {
            plane,
            u,
            v,
            origin: normal * plane.w(),
        })
    }

    /// Frame with the right vector chosen along the axis the normal is least
    /// aligned with.
    pub fn from_plane(plane: Plane) -> KernelResult<Self> {
        Self::new(plane, plane.normal().random_non_parallel_vector())
    }

    /// The XY plane with `u = +X`, `v = +Y`.
    pub fn z0_plane(ctx: &Context) -> KernelResult<Self> {
        let plane = Plane::new(ctx, Vector3::Z, 0.0)?;
        Self::new(plane, Vector3::X)
    }

    /// The plane of the frame.
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// In-plane X direction.
    pub fn u(&self) -> Vector3 {
        self.u
    }

    /// In-plane Y direction.
    pub fn v(&self) -> Vector3 {
        self.v
    }

    /// Coordinates of `point` in the frame (its projection onto the plane).
    pub fn to_2d(&self, point: Vector3) -> Vector2 {
        Vector2::new(point.dot(self.u), point.dot(self.v))
    }

    /// Point of the plane with frame coordinates `point`.
    pub fn to_3d(&self, point: Vector2) -> Vector3 {
        self.origin + self.u * point.x + self.v * point.y
    }

    /// Matrix mapping world space into the frame: x, y become the frame
    /// coordinates and z the signed distance from the plane.
    pub fn projection_matrix(&self) -> Matrix4x4 {
        let (u, v, n) = (self.u, self.v, self.plane.normal());
        Matrix4x4::from_cols_array(&[
            u.x, v.x, n.x, 0.0, //
            u.y, v.y, n.y, 0.0, //
            u.z, v.z, n.z, 0.0, //
            0.0, 0.0, -self.plane.w(), 1.0,
        ])
    }

    /// Inverse of [`OrthoNormalBasis::projection_matrix`].
    pub fn inverse_projection_matrix(&self) -> Matrix4x4 {
        let (u, v, n, p) = (self.u, self.v, self.plane.normal(), self.origin);
        Matrix4x4::from_cols_array(&[
            u.x, u.y, u.z, 0.0, //
            v.x, v.y, v.z, 0.0, //
            n.x, n.y, n.z, 0.0, //
            p.x, p.y, p.z, 1.0,
        ])
    }

    /// Frame carried along by `matrix`.
    ///
    /// The plane is transformed directly; the right vector is the image of
    /// `u` relative to the image of the origin.
    pub fn transform(&self, ctx: &Context, matrix: &Matrix4x4) -> KernelResult<Self> {
        let plane = self.plane.transform(ctx, matrix)?;
        let right = matrix.transform_point(self.u) - matrix.transform_point(Vector3::ZERO);
        Self::new(plane, right)
    }
}
