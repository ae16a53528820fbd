//! Cell coordinates, cell ranges and bucket ids
//!
//! World space is divided into cubes of edge [`CELL_SIZE`]. A volume touches
//! the half-open cell range `[start, end)` on every axis, where `start` comes
//! from the low corner of its bounding box and `end` from the high corner plus
//! one. The range may cover more cells than the volume strictly needs but it
//! never misses one.

use crate::foundation::math::{utils, Vec3};

/// Default edge length of a grid cell in world units
pub const CELL_SIZE: f64 = 256.0;

/// Number of cells per axis before bucket ids wrap around
pub const BUCKET_AXIS_CELLS: i32 = 1024;

const BUCKET_AXIS_MASK: u32 = 0x3ff;

/// Integer coordinate of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellCoord {
    /// Cell index along X
    pub x: i32,
    /// Cell index along Y
    pub y: i32,
    /// Cell index along Z
    pub z: i32,
}

impl CellCoord {
    /// Create a cell coordinate
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Packed bucket id of this cell
    pub fn bucket_id(&self) -> u32 {
        bucket_id(self.x, self.y, self.z)
    }
}

/// Pack a cell coordinate into a 32-bit bucket id, 10 bits per axis.
///
/// Only the low 10 bits of each axis survive, so cells 1024 apart on any
/// axis share a bucket.
pub fn bucket_id(x: i32, y: i32, z: i32) -> u32 {
    // Two's complement reinterpretation keeps the low bits of negative indices.
    let (x, y, z) = (x as u32, y as u32, z as u32);
    ((x & BUCKET_AXIS_MASK) << 20) | ((y & BUCKET_AXIS_MASK) << 10) | (z & BUCKET_AXIS_MASK)
}

/// Half-open range of cells, `start` inclusive and `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// First cell on every axis
    pub start: CellCoord,
    /// One past the last cell on every axis
    pub end: CellCoord,
}

impl CellRange {
    /// Create a cell range
    pub const fn new(start: CellCoord, end: CellCoord) -> Self {
        Self { start, end }
    }

    /// Number of cells in the range
    pub fn cell_count(&self) -> usize {
        let span = |a: i32, b: i32| usize::try_from(i64::from(b) - i64::from(a)).unwrap_or(0);
        span(self.start.x, self.end.x)
            .saturating_mul(span(self.start.y, self.end.y))
            .saturating_mul(span(self.start.z, self.end.z))
    }

    /// Check whether the range contains no cells
    pub fn is_empty(&self) -> bool {
        self.start.x >= self.end.x || self.start.y >= self.end.y || self.start.z >= self.end.z
    }

    /// Check whether `cell` lies inside the range
    pub fn contains(&self, cell: &CellCoord) -> bool {
        (self.start.x..self.end.x).contains(&cell.x)
            && (self.start.y..self.end.y).contains(&cell.y)
            && (self.start.z..self.end.z).contains(&cell.z)
    }

    /// Iterate every cell of the range, X outermost and Z innermost
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let CellRange { start, end } = *self;
        (start.x..end.x).flat_map(move |x| {
            (start.y..end.y)
                .flat_map(move |y| (start.z..end.z).map(move |z| CellCoord::new(x, y, z)))
        })
    }

    /// Iterate the distinct bucket ids the range touches.
    ///
    /// Each axis is capped at [`BUCKET_AXIS_CELLS`] cells; past that point
    /// every residue is already covered and further cells would only revisit
    /// aliased buckets.
    pub fn bucket_ids(&self) -> impl Iterator<Item = u32> {
        let capped = |a: i32, b: i32| -> i32 {
            let span = (i64::from(b) - i64::from(a)).clamp(0, i64::from(BUCKET_AXIS_CELLS));
            // span fits in i32 after clamping
            a.saturating_add(span as i32)
        };
        let start = self.start;
        let end = CellCoord::new(
            capped(start.x, self.end.x),
            capped(start.y, self.end.y),
            capped(start.z, self.end.z),
        );
        CellRange::new(start, end).cells().map(|cell| cell.bucket_id())
    }
}

fn cell_index(value: f64, cell_size: f64) -> i32 {
    // `as` saturates out-of-range values and maps NaN to zero
    (value / cell_size).floor() as i32
}

fn cell_of(point: &Vec3, cell_size: f64) -> CellCoord {
    CellCoord::new(
        cell_index(point.x, cell_size),
        cell_index(point.y, cell_size),
        cell_index(point.z, cell_size),
    )
}

fn cell_after(point: &Vec3, cell_size: f64) -> CellCoord {
    let cell = cell_of(point, cell_size);
    CellCoord::new(
        cell.x.saturating_add(1),
        cell.y.saturating_add(1),
        cell.z.saturating_add(1),
    )
}

/// Grid layout for a given cell size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    cell_size: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(CELL_SIZE)
    }
}

impl GridLayout {
    /// Create a layout with the given cell edge length
    pub const fn new(cell_size: f64) -> Self {
        Self { cell_size }
    }

    /// Cell edge length in world units
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Cell containing a world position
    pub fn cell_at(&self, position: &Vec3) -> CellCoord {
        cell_of(position, self.cell_size)
    }

    /// First cell touched by a box at `location` with half-size `extents`.
    ///
    /// The sign of each extent is ignored.
    pub fn start_extents(&self, location: &Vec3, extents: &Vec3) -> CellCoord {
        cell_of(&(location - extents.abs()), self.cell_size)
    }

    /// One past the last cell touched by a box at `location` with half-size `extents`
    pub fn end_extents(&self, location: &Vec3, extents: &Vec3) -> CellCoord {
        cell_after(&(location + extents.abs()), self.cell_size)
    }

    /// First cell touched by the segment `from`-`to`
    pub fn ray_start_extents(&self, from: &Vec3, to: &Vec3) -> CellCoord {
        cell_of(&utils::min_components(from, to), self.cell_size)
    }

    /// One past the last cell touched by the segment `from`-`to`
    pub fn ray_end_extents(&self, from: &Vec3, to: &Vec3) -> CellCoord {
        cell_after(&utils::max_components(from, to), self.cell_size)
    }

    /// First cell touched by a box of half-size `extents` moving from `from` to `to`
    pub fn sweep_start_extents(&self, from: &Vec3, to: &Vec3, extents: &Vec3) -> CellCoord {
        cell_of(&(utils::min_components(from, to) - extents.abs()), self.cell_size)
    }

    /// One past the last cell touched by a box of half-size `extents` moving from `from` to `to`
    pub fn sweep_end_extents(&self, from: &Vec3, to: &Vec3, extents: &Vec3) -> CellCoord {
        cell_after(&(utils::max_components(from, to) + extents.abs()), self.cell_size)
    }

    /// Cells touched by a bounding box
    pub fn box_range(&self, location: &Vec3, extents: &Vec3) -> CellRange {
        CellRange::new(
            self.start_extents(location, extents),
            self.end_extents(location, extents),
        )
    }

    /// Cells touched by the bounding box of a sphere
    pub fn sphere_range(&self, center: &Vec3, radius: f64) -> CellRange {
        self.box_range(center, &Vec3::repeat(radius))
    }

    /// Cells touched by a segment
    pub fn ray_range(&self, from: &Vec3, to: &Vec3) -> CellRange {
        CellRange::new(self.ray_start_extents(from, to), self.ray_end_extents(from, to))
    }

    /// Cells touched by a swept box
    pub fn sweep_range(&self, from: &Vec3, to: &Vec3, extents: &Vec3) -> CellRange {
        CellRange::new(
            self.sweep_start_extents(from, to, extents),
            self.sweep_end_extents(from, to, extents),
        )
    }
}

/// [`GridLayout::start_extents`] with the default cell size
pub fn start_extents(location: &Vec3, extents: &Vec3) -> CellCoord {
    GridLayout::default().start_extents(location, extents)
}

/// [`GridLayout::end_extents`] with the default cell size
pub fn end_extents(location: &Vec3, extents: &Vec3) -> CellCoord {
    GridLayout::default().end_extents(location, extents)
}

/// [`GridLayout::ray_start_extents`] with the default cell size
pub fn ray_start_extents(from: &Vec3, to: &Vec3) -> CellCoord {
    GridLayout::default().ray_start_extents(from, to)
}

/// [`GridLayout::ray_end_extents`] with the default cell size
pub fn ray_end_extents(from: &Vec3, to: &Vec3) -> CellCoord {
    GridLayout::default().ray_end_extents(from, to)
}

/// [`GridLayout::sweep_start_extents`] with the default cell size
pub fn sweep_start_extents(from: &Vec3, to: &Vec3, extents: &Vec3) -> CellCoord {
    GridLayout::default().sweep_start_extents(from, to, extents)
}

/// [`GridLayout::sweep_end_extents`] with the default cell size
pub fn sweep_end_extents(from: &Vec3, to: &Vec3, extents: &Vec3) -> CellCoord {
    GridLayout::default().sweep_end_extents(from, to, extents)
}
