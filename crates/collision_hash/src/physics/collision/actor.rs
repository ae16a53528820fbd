//! Actor-facing collision data
//!
//! Actors belong to the game layer. The collision core only needs a location,
//! a bounding box for the grid and a narrow-phase shape, which the game layer
//! exposes through [`CollisionActor`].

use crate::foundation::math::{utils, Vec3, WORLD_UP};
use super::primitives::{BoundingSphere, Capsule, Cylinder, Ray, TraceRange};

/// Narrow-phase representation of an actor, centered on its location
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActorShape {
    /// Sphere of the given radius
    Sphere {
        /// Sphere radius
        radius: f64,
    },
    /// Upright capped cylinder
    Cylinder {
        /// Cap radius
        radius: f64,
        /// Full height between the caps
        height: f64,
    },
}

impl ActorShape {
    /// Half-size of the axis-aligned box enclosing the shape
    pub fn extents(&self) -> Vec3 {
        match *self {
            Self::Sphere { radius } => Vec3::repeat(radius),
            Self::Cylinder { radius, height } => {
                Vec3::repeat(radius) + WORLD_UP * (height * 0.5 - radius)
            }
        }
    }

    /// Grow the shape to contain every box of half-size `extents` touching it.
    ///
    /// Spheres grow by the box's half-diagonal. Cylinders grow radially by the
    /// half-diagonal of the box's horizontal footprint and vertically by the
    /// full box height. The result may be larger than the exact sum but never
    /// smaller, so box corners cannot pass through.
    pub fn inflated(&self, extents: &Vec3) -> Self {
        let extents = extents.abs();
        match *self {
            Self::Sphere { radius } => Self::Sphere {
                radius: radius + extents.norm(),
            },
            Self::Cylinder { radius, height } => {
                let (along, across) = utils::split_along(&extents, &WORLD_UP);
                let along = along.abs();
                let across = across.norm();
                Self::Cylinder {
                    radius: radius + across,
                    height: height + 2.0 * along,
                }
            }
        }
    }

    /// First `t` in `range` where the ray hits this shape placed at `location`
    pub fn trace_ray(&self, location: &Vec3, ray: &Ray, range: TraceRange) -> Option<f64> {
        match *self {
            Self::Sphere { radius } => BoundingSphere::new(*location, radius).trace_ray(ray, range),
            Self::Cylinder { radius, height } => {
                Cylinder::new(*location, height, radius).trace_ray(ray, range)
            }
        }
    }

    /// Check whether a sphere overlaps this shape placed at `location`.
    ///
    /// Cylinders are tested as the capsule inscribed in them, so the result
    /// never reaches outside the shape's extents.
    pub fn overlaps_sphere(&self, location: &Vec3, sphere: &BoundingSphere) -> bool {
        match *self {
            Self::Sphere { radius } => BoundingSphere::new(*location, radius).intersects(sphere),
            Self::Cylinder { radius, height } => {
                let segment = (height - 2.0 * radius).max(0.0);
                Capsule::new(*location, segment, radius).intersects_sphere(sphere)
            }
        }
    }
}

/// Collision view of a game actor
pub trait CollisionActor {
    /// World-space location (center of the bounding box and shape)
    fn location(&self) -> Vec3;

    /// Narrow-phase shape
    fn collision_shape(&self) -> ActorShape;

    /// Half-size of the bounding box used by the grid
    fn extents(&self) -> Vec3 {
        self.collision_shape().extents()
    }
}

/// Plain actor data for callers without their own actor type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorBody {
    /// World-space location
    pub location: Vec3,
    /// Bounding box half-size
    pub extents: Vec3,
    /// Narrow-phase shape
    pub shape: ActorShape,
}

impl ActorBody {
    /// Body whose bounding box tightly encloses `shape`
    pub fn new(location: Vec3, shape: ActorShape) -> Self {
        Self { location, extents: shape.extents(), shape }
    }

    /// Body with an explicit bounding box
    pub const fn with_extents(location: Vec3, extents: Vec3, shape: ActorShape) -> Self {
        Self { location, extents, shape }
    }

    /// Sphere body
    pub fn sphere(location: Vec3, radius: f64) -> Self {
        Self::new(location, ActorShape::Sphere { radius })
    }

    /// Upright cylinder body
    pub fn cylinder(location: Vec3, radius: f64, height: f64) -> Self {
        Self::new(location, ActorShape::Cylinder { radius, height })
    }

    /// Copy of this body at another location
    pub fn moved_to(&self, location: Vec3) -> Self {
        Self { location, ..*self }
    }
}

impl CollisionActor for ActorBody {
    fn location(&self) -> Vec3 {
        self.location
    }

    fn collision_shape(&self) -> ActorShape {
        self.shape
    }

    fn extents(&self) -> Vec3 {
        self.extents
    }
}

/// Actor/ray hit trace: first `t` in `[tmin, tmax]` on the actor's shape
pub fn ray_actor_trace<A: CollisionActor + ?Sized>(
    origin: &Vec3,
    dir_normalized: &Vec3,
    tmin: f64,
    tmax: f64,
    actor: &A,
) -> Option<f64> {
    actor.collision_shape().trace_ray(
        &actor.location(),
        &Ray::from_normalized(*origin, *dir_normalized),
        TraceRange::new(tmin, tmax),
    )
}

/// Actor/sphere overlap test
pub fn sphere_actor_overlap<A: CollisionActor + ?Sized>(origin: &Vec3, sphere_radius: f64, actor: &A) -> bool {
    actor
        .collision_shape()
        .overlaps_sphere(&actor.location(), &BoundingSphere::new(*origin, sphere_radius))
}
