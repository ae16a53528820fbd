//! # Collision Hash
//!
//! Broad-phase and narrow-phase collision queries for game actors.
//!
//! ## Features
//!
//! - **Spatial Hash**: Uniform 256-unit grid indexing actors by the cells
//!   their bounding box covers
//! - **Exact Geometry**: Ray/sphere, ray/cylinder, ray/circle, ray/plane,
//!   sphere/sphere and sphere/capsule tests in double precision
//! - **Traces**: Closest-hit ray and swept-box traces through the world
//! - **Non-owning**: Actors are referenced by generational handles and
//!   resolved only for the narrow phase
//!
//! ## Quick Start
//!
//! ```rust
//! use collision_hash::prelude::*;
//!
//! let mut world = CollisionWorld::new();
//! let mut actors = ActorMap::with_key();
//!
//! let body = ActorBody::cylinder(Vec3::new(500.0, 0.0, 0.0), 20.0, 80.0);
//! let handle = actors.insert(body);
//! world.add_actor(handle, &body);
//!
//! let hit = world.trace_ray(&Vec3::zeros(), &Vec3::new(1000.0, 0.0, 0.0), &actors, None);
//! assert_eq!(hit.map(|hit| hit.actor), Some(handle));
//!
//! // Remove before moving or destroying the actor
//! world.remove_actor(handle, &body);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError},
        foundation::{
            collections::{ActorHandle, ActorLookup, ActorMap},
            math::{Vec3, WORLD_UP},
        },
        physics::{
            collision::{
                ray_actor_trace, ray_circle_trace, ray_cylinder_trace, ray_plane_trace,
                ray_sphere_trace, sphere_actor_overlap, sphere_capsule_overlap,
                sphere_sphere_overlap,
            },
            ActorBody, ActorShape, CollisionActor, CollisionWorld, Ray, TraceHit, TraceRange,
        },
        spatial::{CellCoord, CellRange, CollisionHash, GridLayout, SpatialQuery, CELL_SIZE},
    };
}
