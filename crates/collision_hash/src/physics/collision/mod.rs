//! Narrow-phase collision geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays, spheres, capsules, cylinders, circles and planes
//!   with exact intersection tests
//! - [`actor`] - The collision view of game actors and actor-level tests
//!
//! # Key Types
//!
//! - [`CollisionActor`] - Trait the game layer implements for its actors
//! - [`ActorShape`] - Sphere or upright cylinder representation of an actor
//! - [`Ray`], [`TraceRange`] - Trace input; results are `Option<f64>` ray parameters

pub mod primitives;
pub mod actor;

// Re-export commonly used types
pub use primitives::{
    ray_circle_trace, ray_cylinder_trace, ray_plane_trace, ray_sphere_trace,
    sphere_capsule_overlap, sphere_sphere_overlap, BoundingSphere, Capsule, Circle, Cylinder,
    Plane, Ray, TraceRange,
};
pub use actor::{ray_actor_trace, sphere_actor_overlap, ActorBody, ActorShape, CollisionActor};
