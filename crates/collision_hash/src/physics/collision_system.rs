//! Collision query world
//!
//! Ties the broad phase to the narrow phase. Ray and sweep traces gather
//! candidates from the cells their segment envelope touches, test each one
//! exactly and keep the closest hit. Radius queries return broad-phase
//! candidates, optionally filtered by an exact sphere test.
//!
//! The world holds no per-query state. It is single-threaded by design; wrap
//! it in a `Mutex` to share it between threads.

use log::trace;

use crate::config::{CollisionConfig, ConfigError};
use crate::foundation::collections::{ActorHandle, ActorLookup};
use crate::foundation::math::Vec3;
use crate::physics::collision::{ActorShape, BoundingSphere, CollisionActor, Ray, TraceRange};
use crate::spatial::collision_hash::CollisionHash;
use crate::spatial::extents::{CellRange, GridLayout};
use crate::spatial::spatial_query::SpatialQuery;

/// Closest hit of a trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    /// The actor that was hit
    pub actor: ActorHandle,
    /// Distance from the trace start along the trace direction
    pub t: f64,
    /// Fraction of the traced segment covered before the hit (0 to 1)
    pub fraction: f64,
    /// Trace position at the moment of the hit
    pub location: Vec3,
}

/// Broad-phase grid plus narrow-phase queries over it
pub struct CollisionWorld {
    /// Spatial partitioning structure for the broad phase
    spatial_query: Box<dyn SpatialQuery>,

    config: CollisionConfig,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        let config = CollisionConfig::default();
        let grid = CollisionHash::new(GridLayout::new(config.cell_size))
            .with_warn_cells_per_actor(config.warn_cells_per_actor);
        Self::with_spatial_query(Box::new(grid), config)
    }
}

impl CollisionWorld {
    /// Create a world backed by a [`CollisionHash`] with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world backed by a [`CollisionHash`] built from `config`
    pub fn with_config(config: CollisionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = CollisionHash::new(GridLayout::new(config.cell_size))
            .with_warn_cells_per_actor(config.warn_cells_per_actor);
        Ok(Self::with_spatial_query(Box::new(grid), config))
    }

    /// Create a world over any spatial partitioning structure
    pub fn with_spatial_query(spatial_query: Box<dyn SpatialQuery>, config: CollisionConfig) -> Self {
        Self { spatial_query, config }
    }

    /// Configuration the world was built with
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Get spatial query for direct access
    pub fn spatial_query(&self) -> &dyn SpatialQuery {
        self.spatial_query.as_ref()
    }

    /// Start tracking an actor
    pub fn add_actor<A: CollisionActor + ?Sized>(&mut self, handle: ActorHandle, actor: &A) {
        self.spatial_query.insert(handle, &actor.location(), &actor.extents());
    }

    /// Stop tracking an actor. Call before the actor moves or is destroyed.
    pub fn remove_actor<A: CollisionActor + ?Sized>(&mut self, handle: ActorHandle, actor: &A) {
        self.spatial_query.remove(handle, &actor.location(), &actor.extents());
    }

    /// Re-index an actor whose state changes from `before` to `after`
    pub fn move_actor<A, B>(&mut self, handle: ActorHandle, before: &A, after: &B)
    where
        A: CollisionActor + ?Sized,
        B: CollisionActor + ?Sized,
    {
        self.remove_actor(handle, before);
        self.add_actor(handle, after);
    }

    /// Broad-phase candidates near `origin`. No exact test is applied.
    pub fn nearby_actors(&self, origin: &Vec3, radius: f64) -> Vec<ActorHandle> {
        self.spatial_query.query_sphere(origin, radius)
    }

    /// Actors whose shape overlaps the sphere at `center` with `radius`
    pub fn overlapping_actors<L>(
        &self,
        center: &Vec3,
        radius: f64,
        actors: &L,
        ignore: Option<ActorHandle>,
    ) -> Vec<ActorHandle>
    where
        L: ActorLookup,
        L::Actor: CollisionActor,
    {
        let sphere = BoundingSphere::new(*center, radius);
        self.spatial_query
            .query_sphere(center, radius)
            .into_iter()
            .filter(|&handle| Some(handle) != ignore)
            .filter(|&handle| match actors.actor(handle) {
                Some(actor) => actor.collision_shape().overlaps_sphere(&actor.location(), &sphere),
                None => {
                    trace!("Skipping stale actor handle {:?}", handle);
                    false
                }
            })
            .collect()
    }

    /// First actor hit by the segment `from`-`to`.
    ///
    /// A zero-length segment hits nothing.
    pub fn trace_ray<L>(
        &self,
        from: &Vec3,
        to: &Vec3,
        actors: &L,
        ignore: Option<ActorHandle>,
    ) -> Option<TraceHit>
    where
        L: ActorLookup,
        L::Actor: CollisionActor,
    {
        let range = self.spatial_query.layout().ray_range(from, to);
        self.closest_hit(from, to, &range, actors, ignore, |shape| shape)
    }

    /// First actor hit by a box of half-size `extents` moving from `from` to `to`.
    ///
    /// Candidates come from the swept cell range; each candidate's shape is
    /// grown by `extents` and traced against the path of the box center.
    pub fn trace_sweep<L>(
        &self,
        from: &Vec3,
        to: &Vec3,
        extents: &Vec3,
        actors: &L,
        ignore: Option<ActorHandle>,
    ) -> Option<TraceHit>
    where
        L: ActorLookup,
        L::Actor: CollisionActor,
    {
        let range = self.spatial_query.layout().sweep_range(from, to, extents);
        self.closest_hit(from, to, &range, actors, ignore, |shape| shape.inflated(extents))
    }

    fn closest_hit<L, F>(
        &self,
        from: &Vec3,
        to: &Vec3,
        range: &CellRange,
        actors: &L,
        ignore: Option<ActorHandle>,
        shape_for: F,
    ) -> Option<TraceHit>
    where
        L: ActorLookup,
        L::Actor: CollisionActor,
        F: Fn(ActorShape) -> ActorShape,
    {
        let (ray, length) = Ray::between(from, to)?;
        let mut best: Option<(ActorHandle, f64)> = None;

        for handle in self.spatial_query.query_range(range) {
            if Some(handle) == ignore {
                continue;
            }
            let Some(actor) = actors.actor(handle) else {
                trace!("Skipping stale actor handle {:?}", handle);
                continue;
            };
            // Only hits closer than the best so far are admissible
            let tmax = best.map_or(length, |(_, t)| t);
            let shape = shape_for(actor.collision_shape());
            if let Some(t) = shape.trace_ray(&actor.location(), &ray, TraceRange::new(0.0, tmax)) {
                if best.map_or(true, |(_, best_t)| t < best_t) {
                    best = Some((handle, t));
                }
            }
        }

        best.map(|(actor, t)| {
            trace!("Trace {:?} -> {:?} hit {:?} at t={}", from, to, actor, t);
            TraceHit {
                actor,
                t,
                fraction: t / length,
                location: ray.point_at(t),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::ActorMap;
    use crate::physics::collision::ActorBody;
    use approx::assert_relative_eq;

    fn create_test_world(bodies: &[ActorBody]) -> (CollisionWorld, ActorMap<ActorBody>, Vec<ActorHandle>) {
        let mut world = CollisionWorld::new();
        let mut actors = ActorMap::with_key();
        let handles = bodies
            .iter()
            .map(|body| {
                let handle = actors.insert(*body);
                world.add_actor(handle, body);
                handle
            })
            .collect();
        (world, actors, handles)
    }

    #[test]
    fn test_trace_ray_returns_closest_actor() {
        let (world, actors, handles) = create_test_world(&[
            ActorBody::sphere(Vec3::new(900.0, 0.0, 0.0), 10.0),
            ActorBody::sphere(Vec3::new(300.0, 0.0, 0.0), 10.0),
            ActorBody::cylinder(Vec3::new(600.0, 0.0, 0.0), 20.0, 100.0),
        ]);

        let hit = world
            .trace_ray(&Vec3::zeros(), &Vec3::new(1000.0, 0.0, 0.0), &actors, None)
            .unwrap();

        assert_eq!(hit.actor, handles[1]);
        assert_relative_eq!(hit.t, 290.0, epsilon = 1e-9);
        assert_relative_eq!(hit.fraction, 0.29, epsilon = 1e-9);
        assert_relative_eq!(hit.location, Vec3::new(290.0, 0.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_trace_ray_stops_at_segment_end() {
        let (world, actors, _) = create_test_world(&[ActorBody::sphere(Vec3::new(300.0, 0.0, 0.0), 10.0)]);
        assert!(world
            .trace_ray(&Vec3::zeros(), &Vec3::new(250.0, 0.0, 0.0), &actors, None)
            .is_none());
    }

    #[test]
    fn test_trace_ray_ignores_tracing_actor() {
        let (world, actors, handles) = create_test_world(&[
            ActorBody::cylinder(Vec3::zeros(), 20.0, 100.0),
            ActorBody::cylinder(Vec3::new(0.0, 0.0, 500.0), 20.0, 100.0),
        ]);

        let hit = world
            .trace_ray(&Vec3::zeros(), &Vec3::new(0.0, 0.0, 1000.0), &actors, Some(handles[0]))
            .unwrap();
        assert_eq!(hit.actor, handles[1]);
        assert_relative_eq!(hit.t, 480.0, epsilon = 1e-9);

        let own = world
            .trace_ray(&Vec3::zeros(), &Vec3::new(0.0, 0.0, 1000.0), &actors, None)
            .unwrap();
        assert_eq!(own.actor, handles[0]);
    }

    #[test]
    fn test_trace_ray_skips_stale_handles() {
        let (world, mut actors, handles) = create_test_world(&[
            ActorBody::sphere(Vec3::new(100.0, 0.0, 0.0), 10.0),
            ActorBody::sphere(Vec3::new(200.0, 0.0, 0.0), 10.0),
        ]);
        // Destroyed without being removed from the grid first
        actors.remove(handles[0]);

        let hit = world
            .trace_ray(&Vec3::zeros(), &Vec3::new(400.0, 0.0, 0.0), &actors, None)
            .unwrap();
        assert_eq!(hit.actor, handles[1]);
    }

    #[test]
    fn test_zero_length_trace_hits_nothing() {
        let (world, actors, _) = create_test_world(&[ActorBody::sphere(Vec3::zeros(), 10.0)]);
        assert!(world.trace_ray(&Vec3::zeros(), &Vec3::zeros(), &actors, None).is_none());
    }

    #[test]
    fn test_trace_sweep_hits_what_ray_misses() {
        let (world, actors, handles) =
            create_test_world(&[ActorBody::sphere(Vec3::new(500.0, 30.0, 0.0), 10.0)]);
        let from = Vec3::zeros();
        let to = Vec3::new(1000.0, 0.0, 0.0);

        assert!(world.trace_ray(&from, &to, &actors, None).is_none());

        let hit = world
            .trace_sweep(&from, &to, &Vec3::repeat(25.0), &actors, None)
            .unwrap();
        assert_eq!(hit.actor, handles[0]);
        // Inflated radius 10 + 25·sqrt(3) at height 30
        let radius: f64 = 10.0 + 25.0 * 3.0_f64.sqrt();
        assert_relative_eq!(hit.t, 500.0 - (radius * radius - 900.0).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_trace_sweep_catches_box_corner() {
        // Cylinder 44 units to the side of a diagonal path; only the box corner reaches it
        let side = Vec3::new(1.0, 0.0, -1.0).normalize();
        let center = Vec3::new(500.0, 0.0, 500.0) + side * 44.0;
        let (world, actors, handles) = create_test_world(&[ActorBody::cylinder(center, 10.0, 100.0)]);
        let from = Vec3::zeros();
        let to = Vec3::new(1000.0, 0.0, 1000.0);

        assert!(world.trace_ray(&from, &to, &actors, None).is_none());

        let hit = world
            .trace_sweep(&from, &to, &Vec3::repeat(25.0), &actors, None)
            .unwrap();
        assert_eq!(hit.actor, handles[0]);
        let radius: f64 = 10.0 + 25.0 * 2.0_f64.sqrt();
        let expected = 500.0 * 2.0_f64.sqrt() - (radius * radius - 44.0 * 44.0).sqrt();
        assert_relative_eq!(hit.t, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_non_finite_input_never_hits() {
        let (world, mut actors, handles) = create_test_world(&[
            ActorBody::sphere(Vec3::new(100.0, 0.0, 0.0), 10.0),
            ActorBody::sphere(Vec3::new(300.0, 0.0, 0.0), 10.0),
        ]);
        // Corrupted after indexing; the grid still lists it in its old cells
        actors[handles[0]].location = Vec3::new(f64::NAN, 0.0, 0.0);

        let hit = world
            .trace_ray(&Vec3::zeros(), &Vec3::new(1000.0, 0.0, 0.0), &actors, None)
            .unwrap();
        assert_eq!(hit.actor, handles[1]);
        assert!(hit.t.is_finite());
        assert_relative_eq!(hit.t, 290.0, epsilon = 1e-9);

        let nan_end = Vec3::new(f64::NAN, 0.0, 0.0);
        assert!(world.trace_ray(&Vec3::zeros(), &nan_end, &actors, None).is_none());
        let infinite_end = Vec3::new(f64::INFINITY, 0.0, 0.0);
        assert!(world.trace_ray(&Vec3::zeros(), &infinite_end, &actors, None).is_none());
    }

    #[test]
    fn test_nearby_actors_is_broad_phase_only() {
        let (world, actors, handles) = create_test_world(&[
            ActorBody::sphere(Vec3::new(10.0, 10.0, 10.0), 1.0),
            ActorBody::sphere(Vec3::new(200.0, 200.0, 200.0), 1.0),
        ]);

        let nearby = world.nearby_actors(&Vec3::new(10.0, 10.0, 10.0), 5.0);
        assert_eq!(nearby.len(), 2);

        let overlapping = world.overlapping_actors(&Vec3::new(10.0, 10.0, 10.0), 5.0, &actors, None);
        assert_eq!(overlapping, vec![handles[0]]);

        let excluding_self =
            world.overlapping_actors(&Vec3::new(10.0, 10.0, 10.0), 5.0, &actors, Some(handles[0]));
        assert!(excluding_self.is_empty());
    }

    #[test]
    fn test_move_actor_updates_queries() {
        let body = ActorBody::sphere(Vec3::new(10.0, 10.0, 10.0), 5.0);
        let (mut world, mut actors, handles) = create_test_world(&[body]);

        let moved = body.moved_to(Vec3::new(2000.0, 10.0, 10.0));
        world.move_actor(handles[0], &body, &moved);
        actors[handles[0]] = moved;

        assert!(world.nearby_actors(&body.location, 5.0).is_empty());
        assert_eq!(world.nearby_actors(&moved.location, 5.0), handles);
        let hit = world
            .trace_ray(&Vec3::new(1500.0, 10.0, 10.0), &Vec3::new(2500.0, 10.0, 10.0), &actors, None)
            .unwrap();
        assert_relative_eq!(hit.t, 495.0, epsilon = 1e-9);
    }

    #[test]
    fn test_with_config_validates() {
        let config = CollisionConfig::default().with_cell_size(-1.0);
        assert!(CollisionWorld::with_config(config).is_err());

        let world = CollisionWorld::with_config(CollisionConfig::default().with_cell_size(64.0)).unwrap();
        assert_eq!(world.spatial_query().layout().cell_size(), 64.0);
    }

    #[test]
    fn test_remove_actor_empties_world() {
        let body = ActorBody::cylinder(Vec3::new(-300.0, 40.0, 700.0), 30.0, 200.0);
        let (mut world, _actors, handles) = create_test_world(&[body]);
        assert!(world.spatial_query().reference_count() > 0);

        world.remove_actor(handles[0], &body);
        assert_eq!(world.spatial_query().reference_count(), 0);
    }
}
