//! Primitive collision shapes and intersection algorithms
//!
//! Provides rays, spheres, capsules, capped cylinders, circles and planes with
//! exact intersection tests. Traces return the ray parameter `t` of the first
//! hit inside a [`TraceRange`], or `None`. Near-zero denominators are gated
//! by [`EPSILON`] so degenerate input reports no hit instead of producing NaN.

use crate::foundation::math::{utils, Vec3, EPSILON, WORLD_UP};

/// A ray for ray casting and traces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (unit length unless degenerate)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray, normalizing `direction`.
    ///
    /// A direction too short to normalize is stored as zero; every trace
    /// with such a ray reports no hit.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: utils::try_normalize(&direction).unwrap_or_else(Vec3::zeros),
        }
    }

    /// Creates a ray from a direction the caller has already normalized
    pub const fn from_normalized(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray from `from` towards `to`, with the segment length as second value.
    ///
    /// Returns `None` when the endpoints coincide or are not finite.
    pub fn between(from: &Vec3, to: &Vec3) -> Option<(Self, f64)> {
        let delta = to - from;
        let length = delta.norm();
        if !length.is_finite() {
            return None;
        }
        let direction = utils::try_normalize(&delta)?;
        Some((Self::from_normalized(*from, direction), length))
    }

    /// Check whether the direction is usable
    pub fn is_degenerate(&self) -> bool {
        self.direction.norm_squared() < EPSILON
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Admissible interval `[tmin, tmax]` for a trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceRange {
    /// Smallest accepted `t`
    pub tmin: f64,
    /// Largest accepted `t`
    pub tmax: f64,
}

impl TraceRange {
    /// Create a trace range
    pub const fn new(tmin: f64, tmax: f64) -> Self {
        Self { tmin, tmax }
    }

    /// Everything in front of the ray origin
    pub const fn forward() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    /// Check whether `t` is finite and inside the range
    pub fn contains(&self, t: f64) -> bool {
        t.is_finite() && t >= self.tmin && t <= self.tmax
    }

    /// Smallest candidate inside the range
    pub fn earliest<I>(&self, candidates: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        candidates
            .into_iter()
            .filter(|&t| self.contains(t))
            .min_by(f64::total_cmp)
    }
}

/// Real roots of `a·t² + 2·half_b·t + c = 0` in ascending order.
///
/// A discriminant within the rounding error of `half_b² − a·c` is a double
/// root, so tangent rays still hit. The tolerance is a few ulps of the larger
/// term and does not grow into a real gap far from the shape.
fn quadratic_roots(a: f64, half_b: f64, c: f64) -> Option<(f64, f64)> {
    if a.abs() < EPSILON {
        return None;
    }
    let discriminant = half_b * half_b - a * c;
    if !discriminant.is_finite() {
        return None;
    }
    let tolerance = 4.0 * f64::EPSILON * (half_b * half_b).max((a * c).abs());
    if discriminant < -tolerance {
        return None;
    }
    let root = discriminant.max(0.0).sqrt();
    let t0 = (-half_b - root) / a;
    let t1 = (-half_b + root) / a;
    Some(if t0 <= t1 { (t0, t1) } else { (t1, t0) })
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f64,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub const fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another (touching counts)
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).norm_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// First `t` in `range` where the ray meets the sphere surface.
    ///
    /// Solves `|O + tD − C|² = r²`. A ray starting inside the sphere hits the
    /// far side unless the near root is still inside `range`.
    pub fn trace_ray(&self, ray: &Ray, range: TraceRange) -> Option<f64> {
        let offset = ray.origin - self.center;
        let a = ray.direction.norm_squared();
        let half_b = offset.dot(&ray.direction);
        let c = offset.norm_squared() - self.radius * self.radius;
        let (t0, t1) = quadratic_roots(a, half_b, c)?;
        range.earliest([t0, t1])
    }
}

/// Capsule: a segment of `height` along `axis` swept by `radius`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// Midpoint of the central segment
    pub center: Vec3,
    /// Length of the central segment
    pub height: f64,
    /// Radius around the segment
    pub radius: f64,
    /// Unit direction of the segment
    pub axis: Vec3,
}

impl Capsule {
    /// Creates an upright capsule
    pub const fn new(center: Vec3, height: f64, radius: f64) -> Self {
        Self { center, height, radius, axis: WORLD_UP }
    }

    /// Use a different segment direction (normalized here)
    pub fn with_axis(mut self, axis: Vec3) -> Self {
        self.axis = utils::try_normalize(&axis).unwrap_or(WORLD_UP);
        self
    }

    /// Point of the central segment closest to `point`
    pub fn closest_point(&self, point: &Vec3) -> Vec3 {
        let half = (self.height * 0.5).max(0.0);
        let along = (point - self.center).dot(&self.axis).clamp(-half, half);
        self.center + self.axis * along
    }

    /// Check if a sphere overlaps this capsule
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        let closest = self.closest_point(&sphere.center);
        BoundingSphere::new(closest, self.radius).intersects(sphere)
    }
}

/// Finite cylinder with flat caps, `height` measured along `axis`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Center of the cylinder (halfway between the caps)
    pub center: Vec3,
    /// Distance between the caps
    pub height: f64,
    /// Radius of the caps
    pub radius: f64,
    /// Unit direction from the bottom cap to the top cap
    pub axis: Vec3,
}

impl Cylinder {
    /// Creates an upright cylinder
    pub const fn new(center: Vec3, height: f64, radius: f64) -> Self {
        Self { center, height, radius, axis: WORLD_UP }
    }

    /// Use a different axis (normalized here)
    pub fn with_axis(mut self, axis: Vec3) -> Self {
        self.axis = utils::try_normalize(&axis).unwrap_or(WORLD_UP);
        self
    }

    /// First `t` in `range` where the ray meets the side wall or a cap
    pub fn trace_ray(&self, ray: &Ray, range: TraceRange) -> Option<f64> {
        if self.radius <= 0.0 || self.height < 0.0 || ray.is_degenerate() {
            return None;
        }
        let half = self.height * 0.5;
        let radius_squared = self.radius * self.radius;
        let (origin_along, origin_radial) = utils::split_along(&(ray.origin - self.center), &self.axis);
        let (dir_along, dir_radial) = utils::split_along(&ray.direction, &self.axis);

        let mut candidates = [f64::NAN; 4];

        // Side wall: radial distance equals the radius and the hit lies between the caps
        if let Some((t0, t1)) = quadratic_roots(
            dir_radial.norm_squared(),
            origin_radial.dot(&dir_radial),
            origin_radial.norm_squared() - radius_squared,
        ) {
            for (slot, t) in [t0, t1].into_iter().enumerate() {
                let along = origin_along + dir_along * t;
                if along.abs() <= half {
                    candidates[slot] = t;
                }
            }
        }

        // Caps: plane hit within the cap disc
        if !utils::nearly_zero(dir_along) {
            for (slot, cap) in [-half, half].into_iter().enumerate() {
                let t = (cap - origin_along) / dir_along;
                let radial = origin_radial + dir_radial * t;
                if radial.norm_squared() <= radius_squared {
                    candidates[2 + slot] = t;
                }
            }
        }

        range.earliest(candidates)
    }
}

/// Infinite plane through `origin` with normal `normal`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Any point on the plane
    pub origin: Vec3,
    /// Plane normal (need not be unit length)
    pub normal: Vec3,
}

impl Plane {
    /// Creates a new plane
    pub const fn new(origin: Vec3, normal: Vec3) -> Self {
        Self { origin, normal }
    }

    /// `t` where the ray crosses the plane, if it lies in `range`.
    ///
    /// Rays parallel to the plane and planes with a zero normal never hit.
    pub fn trace_ray(&self, ray: &Ray, range: TraceRange) -> Option<f64> {
        let normal = utils::try_normalize(&self.normal)?;
        let denominator = ray.direction.dot(&normal);
        if utils::nearly_zero(denominator) {
            return None;
        }
        let t = (self.origin - ray.origin).dot(&normal) / denominator;
        range.contains(t).then_some(t)
    }
}

/// Flat disc of `radius` around `center`, facing `normal`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center of the disc
    pub center: Vec3,
    /// Disc normal
    pub normal: Vec3,
    /// Disc radius
    pub radius: f64,
}

impl Circle {
    /// Creates a new circle
    pub const fn new(center: Vec3, normal: Vec3, radius: f64) -> Self {
        Self { center, normal, radius }
    }

    /// `t` where the ray crosses the disc, if it lies in `range`
    pub fn trace_ray(&self, ray: &Ray, range: TraceRange) -> Option<f64> {
        let t = Plane::new(self.center, self.normal).trace_ray(ray, range)?;
        let offset = ray.point_at(t) - self.center;
        (offset.norm_squared() <= self.radius * self.radius).then_some(t)
    }
}

/// Ray/sphere hit trace: first `t` in `[tmin, tmax]`, or `None`
pub fn ray_sphere_trace(
    ray_origin: &Vec3,
    ray_dir_normalized: &Vec3,
    tmin: f64,
    tmax: f64,
    sphere_center: &Vec3,
    sphere_radius: f64,
) -> Option<f64> {
    BoundingSphere::new(*sphere_center, sphere_radius).trace_ray(
        &Ray::from_normalized(*ray_origin, *ray_dir_normalized),
        TraceRange::new(tmin, tmax),
    )
}

/// Ray/upright cylinder hit trace: first `t` in `[tmin, tmax]`, or `None`
pub fn ray_cylinder_trace(
    ray_origin: &Vec3,
    ray_dir_normalized: &Vec3,
    tmin: f64,
    tmax: f64,
    cylinder_center: &Vec3,
    cylinder_height: f64,
    cylinder_radius: f64,
) -> Option<f64> {
    Cylinder::new(*cylinder_center, cylinder_height, cylinder_radius).trace_ray(
        &Ray::from_normalized(*ray_origin, *ray_dir_normalized),
        TraceRange::new(tmin, tmax),
    )
}

/// Ray/circle hit trace in front of the ray origin
pub fn ray_circle_trace(
    ray_origin: &Vec3,
    ray_dir_normalized: &Vec3,
    circle_center: &Vec3,
    circle_normal: &Vec3,
    radius: f64,
) -> Option<f64> {
    Circle::new(*circle_center, *circle_normal, radius).trace_ray(
        &Ray::from_normalized(*ray_origin, *ray_dir_normalized),
        TraceRange::forward(),
    )
}

/// Ray/plane hit trace in front of the ray origin
pub fn ray_plane_trace(
    ray_origin: &Vec3,
    ray_dir_normalized: &Vec3,
    plane_origin: &Vec3,
    plane_normal: &Vec3,
) -> Option<f64> {
    Plane::new(*plane_origin, *plane_normal).trace_ray(
        &Ray::from_normalized(*ray_origin, *ray_dir_normalized),
        TraceRange::forward(),
    )
}

/// Sphere/sphere overlap test
pub fn sphere_sphere_overlap(center_a: &Vec3, radius_a: f64, center_b: &Vec3, radius_b: f64) -> bool {
    BoundingSphere::new(*center_a, radius_a).intersects(&BoundingSphere::new(*center_b, radius_b))
}

/// Sphere/upright capsule overlap test
pub fn sphere_capsule_overlap(
    sphere_center: &Vec3,
    sphere_radius: f64,
    capsule_center: &Vec3,
    capsule_height: f64,
    capsule_radius: f64,
) -> bool {
    Capsule::new(*capsule_center, capsule_height, capsule_radius)
        .intersects_sphere(&BoundingSphere::new(*sphere_center, sphere_radius))
}
