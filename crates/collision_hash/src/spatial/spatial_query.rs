//! Abstract spatial query interface for broad-phase collision detection
//!
//! The query layer gathers candidates through this trait so the partitioning
//! scheme behind it can change without touching the narrow phase.

use crate::foundation::collections::ActorHandle;
use crate::foundation::math::Vec3;
use crate::spatial::collision_hash::CollisionHash;
use crate::spatial::extents::{CellRange, GridLayout};

/// Interface for spatial partitioning used in broad-phase collision detection
pub trait SpatialQuery: Send + Sync {
    /// Insert an actor under its bounding box
    fn insert(&mut self, handle: ActorHandle, location: &Vec3, extents: &Vec3);

    /// Remove an actor using the same bounding box it was inserted with
    fn remove(&mut self, handle: ActorHandle, location: &Vec3, extents: &Vec3);

    /// Candidates overlapping the bounding box of a sphere
    fn query_sphere(&self, center: &Vec3, radius: f64) -> Vec<ActorHandle>;

    /// Candidates listed anywhere in a cell range
    fn query_range(&self, range: &CellRange) -> Vec<ActorHandle>;

    /// Cell layout used to build ranges for [`SpatialQuery::query_range`]
    fn layout(&self) -> &GridLayout;

    /// Remove every actor
    fn clear(&mut self);

    /// Total actor references held by the structure
    fn reference_count(&self) -> usize;
}

impl SpatialQuery for CollisionHash {
    fn insert(&mut self, handle: ActorHandle, location: &Vec3, extents: &Vec3) {
        self.insert_box(handle, location, extents);
    }

    fn remove(&mut self, handle: ActorHandle, location: &Vec3, extents: &Vec3) {
        self.remove_box(handle, location, extents);
    }

    fn query_sphere(&self, center: &Vec3, radius: f64) -> Vec<ActorHandle> {
        self.colliding_actors(center, radius)
    }

    fn query_range(&self, range: &CellRange) -> Vec<ActorHandle> {
        self.actors_in_range(range)
    }

    fn layout(&self) -> &GridLayout {
        CollisionHash::layout(self)
    }

    fn clear(&mut self) {
        CollisionHash::clear(self);
    }

    fn reference_count(&self) -> usize {
        CollisionHash::reference_count(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::ActorMap;

    #[test]
    fn test_spatial_query_insert_remove() {
        let mut handles: ActorMap<()> = ActorMap::with_key();
        let handle = handles.insert(());
        let mut spatial: Box<dyn SpatialQuery> = Box::new(CollisionHash::default());

        let location = Vec3::new(40.0, 40.0, 40.0);
        let extents = Vec3::repeat(8.0);
        spatial.insert(handle, &location, &extents);
        assert_eq!(spatial.reference_count(), 1);
        assert_eq!(spatial.query_sphere(&location, 1.0), vec![handle]);

        let range = spatial.layout().ray_range(&Vec3::zeros(), &Vec3::repeat(100.0));
        assert_eq!(spatial.query_range(&range), vec![handle]);

        spatial.remove(handle, &location, &extents);
        assert_eq!(spatial.reference_count(), 0);
    }
}
