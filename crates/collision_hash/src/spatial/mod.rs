//! Spatial partitioning data structures
//!
//! Provides the uniform grid used for broad-phase candidate gathering, the
//! cell/bucket math shared by every grid query, and the trait the query layer
//! talks to.

pub mod extents;
pub mod collision_hash;
pub mod spatial_query;

pub use extents::{
    bucket_id, end_extents, ray_end_extents, ray_start_extents, start_extents,
    sweep_end_extents, sweep_start_extents, CellCoord, CellRange, GridLayout,
    BUCKET_AXIS_CELLS, CELL_SIZE,
};
pub use collision_hash::{CollisionHash, CollisionHashStats};
pub use spatial_query::SpatialQuery;
