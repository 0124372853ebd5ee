//! # Vectors and Matrices
//!
//! Double-precision vector and matrix types with the kernel-specific
//! operations layered on top through extension traits.
//!
//! ## Conventions
//!
//! Matrices are column-major (`glam`): a point is transformed by `M * p` with
//! the translation stored in the last column. Transforming a point divides by
//! the homogeneous coordinate.

pub use glam::{DMat4 as Matrix4x4, DVec2 as Vector2, DVec3 as Vector3, DVec4 as Vector4};

// =============================================================================
// VECTOR2
// =============================================================================

/// 2D vector operations used by the area algorithms.
pub trait Vector2Ext: Sized {
    /// Unit vector pointing at `degrees` from the +X axis.
    fn from_angle_degrees(degrees: f64) -> Self;

    /// Direction angle in degrees, in `(-180, 180]`.
    fn angle_degrees(self) -> f64;

    /// Vector rotated a quarter turn clockwise: `(y, -x)`.
    fn normal(self) -> Self;

    /// Z component of the 3D cross product.
    fn cross(self, other: Self) -> f64;

    /// Lifts the vector to 3D at height `z`.
    fn to_vector3(self, z: f64) -> Vector3;

    /// Transforms the point as `(x, y, 0)` and drops the resulting z.
    fn transform(self, matrix: &Matrix4x4) -> Self;
}

impl Vector2Ext for Vector2 {
    fn from_angle_degrees(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Vector2::new(radians.cos(), radians.sin())
    }

    fn angle_degrees(self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }

    fn normal(self) -> Self {
        Vector2::new(self.y, -self.x)
    }

    fn cross(self, other: Self) -> f64 {
        self.perp_dot(other)
    }

    fn to_vector3(self, z: f64) -> Vector3 {
        Vector3::new(self.x, self.y, z)
    }

    fn transform(self, matrix: &Matrix4x4) -> Self {
        matrix.transform_point(self.to_vector3(0.0)).truncate()
    }
}

// =============================================================================
// VECTOR3
// =============================================================================

/// 3D vector operations used by planes and bases.
pub trait Vector3Ext {
    /// Axis vector along the component with the smallest magnitude.
    ///
    /// The result is never parallel to a non-zero input.
    fn random_non_parallel_vector(self) -> Vector3;

    /// Transforms the point with homogeneous divide.
    fn transform(self, matrix: &Matrix4x4) -> Vector3;
}

impl Vector3Ext for Vector3 {
    fn random_non_parallel_vector(self) -> Vector3 {
        let abs = self.abs();
        if abs.x <= abs.y && abs.x <= abs.z {
            Vector3::X
        } else if abs.y <= abs.x && abs.y <= abs.z {
            Vector3::Y
        } else {
            Vector3::Z
        }
    }

    fn transform(self, matrix: &Matrix4x4) -> Vector3 {
        matrix.transform_point(self)
    }
}

// =============================================================================
// MATRIX4X4
// =============================================================================

/// Affine transform helpers.
pub trait Matrix4x4Ext {
    /// Applies the transform to a point (`M * p`), dividing by w.
    fn transform_point(&self, point: Vector3) -> Vector3;

    /// Multiplies the matrix by a column vector `(x, y, z, 1)` and divides by w.
    ///
    /// Same as [`Matrix4x4Ext::transform_point`].
    fn right_multiply_vec3(&self, v: Vector3) -> Vector3;

    /// Multiplies a row vector `(x, y, z, 1)` by the matrix and divides by w.
    fn left_multiply_vec3(&self, v: Vector3) -> Vector3;

    /// 2D form of [`Matrix4x4Ext::right_multiply_vec3`] at z = 0.
    fn right_multiply_vec2(&self, v: Vector2) -> Vector2;

    /// 2D form of [`Matrix4x4Ext::left_multiply_vec3`] at z = 0.
    fn left_multiply_vec2(&self, v: Vector2) -> Vector2;

    /// Whether the transform reverses orientation.
    fn is_mirroring(&self) -> bool;
}

impl Matrix4x4Ext for Matrix4x4 {
    fn transform_point(&self, point: Vector3) -> Vector3 {
        self.project_point3(point)
    }

    fn right_multiply_vec3(&self, v: Vector3) -> Vector3 {
        self.project_point3(v)
    }

    fn left_multiply_vec3(&self, v: Vector3) -> Vector3 {
        self.transpose().project_point3(v)
    }

    fn right_multiply_vec2(&self, v: Vector2) -> Vector2 {
        self.right_multiply_vec3(v.extend(0.0)).truncate()
    }

    fn left_multiply_vec2(&self, v: Vector2) -> Vector2 {
        self.left_multiply_vec3(v.extend(0.0)).truncate()
    }

    fn is_mirroring(&self) -> bool {
        let u = self.x_axis.truncate();
        let v = self.y_axis.truncate();
        let w = self.z_axis.truncate();
        u.cross(v).dot(w) < 0.0
    }
}

// =============================================================================
// TRANSFORM CONSTRUCTORS
// =============================================================================

/// Translation by `offset`.
pub fn translation(offset: Vector3) -> Matrix4x4 {
    Matrix4x4::from_translation(offset)
}

/// Non-uniform scaling about the origin.
pub fn scaling(factors: Vector3) -> Matrix4x4 {
    Matrix4x4::from_scale(factors)
}

/// Rotation about the X axis.
pub fn rotation_x(degrees: f64) -> Matrix4x4 {
    Matrix4x4::from_rotation_x(degrees.to_radians())
}

/// Rotation about the Y axis.
pub fn rotation_y(degrees: f64) -> Matrix4x4 {
    Matrix4x4::from_rotation_y(degrees.to_radians())
}

/// Rotation about the Z axis.
pub fn rotation_z(degrees: f64) -> Matrix4x4 {
    Matrix4x4::from_rotation_z(degrees.to_radians())
}

/// Rotation by `degrees` about the line through `center` along `axis`.
///
/// Returns `None` when `axis` has zero length.
pub fn rotation(center: Vector3, axis: Vector3, degrees: f64) -> Option<Matrix4x4> {
    let axis = axis.try_normalize()?;
    let rotate = Matrix4x4::from_axis_angle(axis, degrees.to_radians());
    Some(translation(center) * rotate * translation(-center))
}

/// Reflection across the plane `normal · p = w`.
///
/// `normal` must be unit length.
pub fn mirroring(normal: Vector3, w: f64) -> Matrix4x4 {
    let (nx, ny, nz) = (normal.x, normal.y, normal.z);
    Matrix4x4::from_cols_array(&[
        1.0 - 2.0 * nx * nx,
        -2.0 * ny * nx,
        -2.0 * nz * nx,
        0.0,
        -2.0 * nx * ny,
        1.0 - 2.0 * ny * ny,
        -2.0 * nz * ny,
        0.0,
        -2.0 * nx * nz,
        -2.0 * ny * nz,
        1.0 - 2.0 * nz * nz,
        0.0,
        2.0 * nx * w,
        2.0 * ny * w,
        2.0 * nz * w,
        1.0,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vector2_normal_and_angle() {
        let v = Vector2::new(1.0, 0.0);
        assert_eq!(v.normal(), Vector2::new(0.0, -1.0));
        assert_relative_eq!(Vector2::new(0.0, 2.0).angle_degrees(), 90.0);
        assert_relative_eq!(Vector2::new(-1.0, 0.0).angle_degrees(), 180.0);

        let u = Vector2::from_angle_degrees(45.0);
        assert_relative_eq!(u.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(u.angle_degrees(), 45.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vector2_cross() {
        assert_eq!(Vector2::X.cross(Vector2::Y), 1.0);
        assert_eq!(Vector2::Y.cross(Vector2::X), -1.0);
    }

    #[test]
    fn test_random_non_parallel_vector() {
        assert_eq!(Vector3::new(0.0, 0.0, 1.0).random_non_parallel_vector(), Vector3::X);
        assert_eq!(Vector3::new(1.0, 0.0, 0.5).random_non_parallel_vector(), Vector3::Y);
        assert_eq!(Vector3::new(1.0, 1.0, 0.0).random_non_parallel_vector(), Vector3::Z);
    }

    #[test]
    fn test_translation_moves_points() {
        let m = translation(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(Vector3::ZERO.transform(&m), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(Vector2::new(1.0, 1.0).transform(&m), Vector2::new(2.0, 3.0));
    }

    #[test]
    fn test_left_and_right_multiply_differ_by_transpose() {
        let m = translation(Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(m.right_multiply_vec3(Vector3::ZERO), Vector3::new(1.0, 0.0, 0.0));
        // The transposed translation lands in w: (x + 0) / (1 + x)
        let p = m.left_multiply_vec3(Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.5);
    }

    #[test]
    fn test_is_mirroring() {
        assert!(!Matrix4x4::IDENTITY.is_mirroring());
        assert!(!rotation_z(90.0).is_mirroring());
        assert!(scaling(Vector3::new(-1.0, 1.0, 1.0)).is_mirroring());
        assert!(mirroring(Vector3::Z, 0.0).is_mirroring());
    }

    #[test]
    fn test_mirroring_reflects_across_offset_plane() {
        let m = mirroring(Vector3::X, 2.0);
        let p = Vector3::new(3.0, 1.0, 1.0).transform(&m);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_about_center() {
        let m = rotation(Vector3::new(1.0, 0.0, 0.0), Vector3::Z, 180.0).unwrap();
        let p = Vector3::ZERO.transform(&m);
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert!(rotation(Vector3::ZERO, Vector3::ZERO, 10.0).is_none());
    }
}
