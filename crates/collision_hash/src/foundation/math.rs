//! Math utilities and types
//!
//! Collision math runs in double precision so world-space traces across large
//! levels keep their accuracy.

pub use nalgebra::Vector3;

/// 3D vector type (world space, double precision)
pub type Vec3 = Vector3<f64>;

/// World up axis. Cylinder and capsule heights are measured along it.
pub const WORLD_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Tolerance for treating near-zero denominators and discriminants as degenerate
pub const EPSILON: f64 = 1.0e-9;

/// Math utility functions
pub mod utils {
    use super::{Vec3, EPSILON};

    /// Component-wise minimum of two vectors
    pub fn min_components(a: &Vec3, b: &Vec3) -> Vec3 {
        a.inf(b)
    }

    /// Component-wise maximum of two vectors
    pub fn max_components(a: &Vec3, b: &Vec3) -> Vec3 {
        a.sup(b)
    }

    /// Check whether a value is within `EPSILON` of zero
    pub fn nearly_zero(value: f64) -> bool {
        value.abs() < EPSILON
    }

    /// Normalize a vector, or `None` if it is too short to have a direction
    pub fn try_normalize(v: &Vec3) -> Option<Vec3> {
        v.try_normalize(EPSILON)
    }

    /// Split `v` into its component along the unit `axis` and the remainder
    pub fn split_along(v: &Vec3, axis: &Vec3) -> (f64, Vec3) {
        let along = v.dot(axis);
        (along, v - axis * along)
    }
}
