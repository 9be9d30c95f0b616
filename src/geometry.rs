//! Planar geometry: points, the simulation grid and point-in-hexagon lookup.
use crate::id::NodeID;
use itertools::iproduct;
use serde::Deserialize;
use std::collections::HashMap;

/// A point in the (projected) plane
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Point {
    /// Easting
    pub x: f64,
    /// Northing
    pub y: f64,
}

impl Point {
    /// Create a new [`Point`]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The raster grid on which the fire simulation was run.
///
/// Columns and rows are numbered from 1, starting at the lower-left corner.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Grid {
    /// Number of columns
    pub ncols: u32,
    /// Number of rows
    pub nrows: u32,
    /// X coordinate of the lower-left cell
    pub xllcorner: f64,
    /// Y coordinate of the lower-left cell
    pub yllcorner: f64,
    /// Width and height of a cell
    pub cellsize: f64,
}

impl Grid {
    /// Whether the given column and row lie within the grid
    pub fn contains(&self, column: u32, row: u32) -> bool {
        (1..=self.ncols).contains(&column) && (1..=self.nrows).contains(&row)
    }

    /// The location of the given grid cell
    pub fn cell_centre(&self, column: u32, row: u32) -> Point {
        Point::new(
            self.xllcorner + f64::from(column - 1) * self.cellsize,
            self.yllcorner + f64::from(row - 1) * self.cellsize,
        )
    }
}

/// The index of a square bucket in a [`HexLocator`]
type BucketKey = (i64, i64);

/// Finds which hexagon of a regular hexagonal tessellation contains a point.
///
/// The hexagon containing a point is the one with the nearest centroid, and that centroid is never
/// further away than the hexagons' circumradius. Centroids are binned into square buckets as wide
/// as the circumradius, so only the 3x3 block of buckets around a point needs to be searched.
pub struct HexLocator {
    radius: f64,
    buckets: HashMap<BucketKey, Vec<(NodeID, Point)>>,
}

impl HexLocator {
    /// Create a new [`HexLocator`].
    ///
    /// # Arguments
    ///
    /// * `centroids` - The hexagon centroids
    /// * `radius` - The circumradius (centre to vertex) of the hexagons
    pub fn new<'a, I>(centroids: I, radius: f64) -> Self
    where
        I: IntoIterator<Item = (&'a NodeID, &'a Point)>,
    {
        let mut buckets: HashMap<BucketKey, Vec<(NodeID, Point)>> = HashMap::new();
        for (id, point) in centroids {
            buckets
                .entry(bucket_key(point, radius))
                .or_default()
                .push((*id, *point));
        }

        Self { radius, buckets }
    }

    /// Get the hexagon containing `point`, if any.
    ///
    /// If the point is equidistant from two centroids (i.e. on a hexagon edge), the lowest node ID
    /// is returned.
    pub fn locate(&self, point: &Point) -> Option<NodeID> {
        let (bx, by) = bucket_key(point, self.radius);
        iproduct!(bx - 1..=bx + 1, by - 1..=by + 1)
            .filter_map(|key| self.buckets.get(&key))
            .flatten()
            .map(|(id, centroid)| (*id, centroid.distance(point)))
            .filter(|(_, dist)| *dist <= self.radius)
            .min_by(|(id1, dist1), (id2, dist2)| dist1.total_cmp(dist2).then(id1.cmp(id2)))
            .map(|(id, _)| id)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn bucket_key(point: &Point, size: f64) -> BucketKey {
    (
        (point.x / size).floor() as i64,
        (point.y / size).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{hex_nodes, HEX_RADIUS};
    use crate::network::NodeMap;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[test]
    fn test_point_distance() {
        assert_approx_eq!(f64, Point::new(0.0, 0.0).distance(&Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_grid_cell_centre() {
        let grid = Grid {
            ncols: 10,
            nrows: 5,
            xllcorner: 100.0,
            yllcorner: 200.0,
            cellsize: 5.0,
        };
        assert_eq!(grid.cell_centre(1, 1), Point::new(100.0, 200.0));
        assert_eq!(grid.cell_centre(3, 2), Point::new(110.0, 205.0));
        assert!(grid.contains(10, 5));
        assert!(!grid.contains(0, 1));
        assert!(!grid.contains(11, 1));
    }

    #[rstest]
    #[case(Point::new(0.0, 0.0), Some(NodeID(1)))]
    #[case(Point::new(10.2, 0.3), Some(NodeID(2)))]
    #[case(Point::new(5.0, 10.0), Some(NodeID(4)))]
    #[case(Point::new(15.0, 10.0), Some(NodeID(5)))]
    #[case(Point::new(25.0, 10.0), None)]
    #[case(Point::new(-100.0, -100.0), None)]
    fn test_hex_locator(hex_nodes: NodeMap, #[case] point: Point, #[case] expected: Option<NodeID>) {
        let locator = HexLocator::new(&hex_nodes, HEX_RADIUS);
        assert_eq!(locator.locate(&point), expected);
    }

    #[rstest]
    fn test_hex_locator_edge_prefers_lowest_id(hex_nodes: NodeMap) {
        // Midway between nodes 1 and 2
        let locator = HexLocator::new(&hex_nodes, HEX_RADIUS);
        assert_eq!(locator.locate(&Point::new(5.0, 0.0)), Some(NodeID(1)));
    }
}
