//! Uniform spatial hash of actors keyed by packed cell coordinates
//!
//! Every actor is listed in each bucket its bounding box covers. The grid does
//! not watch actors move: callers remove an actor with its old location and
//! extents, change it, then add it again.

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};

use crate::foundation::collections::ActorHandle;
use crate::foundation::math::Vec3;
use crate::physics::collision::CollisionActor;
use crate::spatial::extents::{CellRange, GridLayout};

const DEFAULT_WARN_CELLS_PER_ACTOR: usize = 512;

/// Occupancy summary for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionHashStats {
    /// Number of non-empty buckets
    pub buckets: usize,
    /// Total actor references across all buckets
    pub references: usize,
    /// Largest number of references held by one bucket
    pub largest_bucket: usize,
}

/// Spatial hash grid mapping bucket ids to actor handles
#[derive(Debug, Clone)]
pub struct CollisionHash {
    layout: GridLayout,
    buckets: HashMap<u32, Vec<ActorHandle>>,
    warn_cells_per_actor: usize,
}

impl Default for CollisionHash {
    fn default() -> Self {
        Self::new(GridLayout::default())
    }
}

impl CollisionHash {
    /// Create an empty grid with the given layout
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            buckets: HashMap::new(),
            warn_cells_per_actor: DEFAULT_WARN_CELLS_PER_ACTOR,
        }
    }

    /// Log a warning when an actor covers more than `cells` cells.
    ///
    /// The warning is the only guard on actor size. An actor stores one handle
    /// per bucket it covers, and the bucket count is capped only by id
    /// aliasing at 1024 per axis, so a single huge actor can cost up to 1024³
    /// references. Pick a cell size that keeps actors to a few cells.
    pub fn with_warn_cells_per_actor(mut self, cells: usize) -> Self {
        self.warn_cells_per_actor = cells;
        self
    }

    /// Grid layout used to map positions to cells
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Add an actor to every bucket its bounding box covers.
    ///
    /// Adding the same actor twice without removing it in between lists it
    /// twice.
    pub fn add_to_collision<A: CollisionActor + ?Sized>(&mut self, handle: ActorHandle, actor: &A) {
        self.insert_box(handle, &actor.location(), &actor.extents());
    }

    /// Remove an actor from every bucket its current bounding box covers.
    ///
    /// Must be called before the actor's location or extents change. Removing
    /// an actor that was never added does nothing.
    pub fn remove_from_collision<A: CollisionActor + ?Sized>(&mut self, handle: ActorHandle, actor: &A) {
        self.remove_box(handle, &actor.location(), &actor.extents());
    }

    /// Move an actor from the buckets of `before` to the buckets of `after`
    pub fn update_collision<A, B>(&mut self, handle: ActorHandle, before: &A, after: &B)
    where
        A: CollisionActor + ?Sized,
        B: CollisionActor + ?Sized,
    {
        self.remove_from_collision(handle, before);
        self.add_to_collision(handle, after);
    }

    /// Add a handle under an explicit bounding box.
    ///
    /// Pushes one handle per distinct bucket of the box's range; see
    /// [`Self::with_warn_cells_per_actor`] for the memory bound.
    pub fn insert_box(&mut self, handle: ActorHandle, location: &Vec3, extents: &Vec3) {
        let range = self.layout.box_range(location, extents);
        let cells = range.cell_count();
        if cells > self.warn_cells_per_actor {
            warn!(
                "Actor {:?} covers {} cells (extents {:?}); consider a larger cell size",
                handle, cells, extents
            );
        }
        debug!("Adding actor {:?} to cells {:?}..{:?}", handle, range.start, range.end);

        for id in range.bucket_ids() {
            self.buckets.entry(id).or_default().push(handle);
        }
    }

    /// Remove a handle from the buckets of an explicit bounding box
    pub fn remove_box(&mut self, handle: ActorHandle, location: &Vec3, extents: &Vec3) {
        let range = self.layout.box_range(location, extents);
        debug!("Removing actor {:?} from cells {:?}..{:?}", handle, range.start, range.end);

        for id in range.bucket_ids() {
            if let Some(bucket) = self.buckets.get_mut(&id) {
                bucket.retain(|&entry| entry != handle);
                if bucket.is_empty() {
                    self.buckets.remove(&id);
                }
            }
        }
    }

    /// Broad-phase query: actors listed in any bucket overlapped by the
    /// bounding box of the sphere at `origin` with `radius`.
    ///
    /// Each actor appears once, in the order it was first found. Callers run
    /// their own narrow-phase test on the result.
    pub fn colliding_actors(&self, origin: &Vec3, radius: f64) -> Vec<ActorHandle> {
        let range = self.layout.sphere_range(origin, radius);
        trace!("Radius query at {:?} r={} over {} cells", origin, radius, range.cell_count());
        self.actors_in_range(&range)
    }

    /// Actors listed in any bucket of `range`, de-duplicated
    pub fn actors_in_range(&self, range: &CellRange) -> Vec<ActorHandle> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for id in range.bucket_ids() {
            if let Some(bucket) = self.buckets.get(&id) {
                for &handle in bucket {
                    if seen.insert(handle) {
                        found.push(handle);
                    }
                }
            }
        }
        found
    }

    /// Actors listed under one bucket id, in insertion order
    pub fn bucket(&self, id: u32) -> Option<&[ActorHandle]> {
        self.buckets.get(&id).map(Vec::as_slice)
    }

    /// Iterate `(bucket id, actors)` for every non-empty bucket
    pub fn buckets(&self) -> impl Iterator<Item = (u32, &[ActorHandle])> {
        self.buckets.iter().map(|(&id, bucket)| (id, bucket.as_slice()))
    }

    /// Number of non-empty buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total actor references across all buckets
    pub fn reference_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Check whether any bucket lists `handle`
    pub fn contains(&self, handle: ActorHandle) -> bool {
        self.buckets.values().any(|bucket| bucket.contains(&handle))
    }

    /// Occupancy summary
    pub fn stats(&self) -> CollisionHashStats {
        CollisionHashStats {
            buckets: self.bucket_count(),
            references: self.reference_count(),
            largest_bucket: self.buckets.values().map(Vec::len).max().unwrap_or(0),
        }
    }

    /// Drop every bucket
    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}
