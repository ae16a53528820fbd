//! Physics module for collision queries
//!
//! Combines the spatial hash broad phase with exact narrow-phase tests.

pub mod collision;
pub mod collision_system;

pub use collision::{
    ActorBody,
    ActorShape,
    BoundingSphere,
    CollisionActor,
    Ray,
    TraceRange,
};
pub use collision_system::{CollisionWorld, TraceHit};
