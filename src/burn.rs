//! Burn records from the fire simulation and the hexagons they fall in.
use crate::geometry::{Grid, HexLocator};
use crate::id::{IterationID, NodeID};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;

/// A map of iteration IDs to the hexagons which burned in that iteration
pub type BurnedNodesMap = IndexMap<IterationID, IndexSet<NodeID>>;

/// A map of grid cells (column, row) to the hexagon containing them
pub type GridHexMap = HashMap<(u32, u32), NodeID>;

/// A single grid cell burning during one round of one iteration
#[derive(Clone, Debug, PartialEq)]
pub struct BurnRecord {
    /// Grid column (from 1)
    pub column: u32,
    /// Grid row (from 1)
    pub row: u32,
    /// The round of the simulation output in which the cell burned
    pub round: u32,
    /// The iteration in which the cell burned
    pub iteration_id: IterationID,
    /// Rate of spread, if recorded
    pub ros: Option<f64>,
    /// Fire intensity, if recorded
    pub fi: Option<f64>,
}

/// Map the grid cells referenced by burn records to the hexagons containing them.
///
/// Cells lying outside the grid or outside every hexagon are left out of the map.
pub fn map_cells_to_hexes(
    records: &[BurnRecord],
    grid: &Grid,
    locator: &HexLocator,
) -> GridHexMap {
    let mut map = GridHexMap::new();
    for (column, row) in records.iter().map(|r| (r.column, r.row)).unique() {
        if !grid.contains(column, row) {
            warn!("Grid cell ({column}, {row}) lies outside the simulation grid");
            continue;
        }

        if let Some(node_id) = locator.locate(&grid.cell_centre(column, row)) {
            map.insert((column, row), node_id);
        }
    }

    map
}

/// Group the burned hexagons by iteration.
///
/// Records for cells which don't lie in any hexagon are ignored. The map is sorted by iteration ID
/// and each set of hexagons by node ID.
pub fn burned_nodes_by_iteration(records: &[BurnRecord], cell_hexes: &GridHexMap) -> BurnedNodesMap {
    let mut burned = BurnedNodesMap::new();
    let mut unmapped = 0;
    for record in records {
        let Some(&node_id) = cell_hexes.get(&(record.column, record.row)) else {
            unmapped += 1;
            continue;
        };

        burned
            .entry(record.iteration_id)
            .or_default()
            .insert(node_id);
    }

    if unmapped > 0 {
        debug!("{unmapped} burn records fall outside the hexagons and were ignored");
    }

    burned.sort_keys();
    for nodes in burned.values_mut() {
        nodes.sort();
    }

    burned
}

/// Summary statistics for the burn records of a dataset
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BurnSummary {
    /// Number of burn records
    pub records: usize,
    /// Number of iterations with at least one burn record
    pub iterations: usize,
    /// Mean rate of spread over all records with a recorded value.
    ///
    /// Every record counts once, so this is not the mean of the per-hexagon, per-iteration means.
    pub record_mean_ros: Option<f64>,
    /// Maximum fire intensity over all records with a recorded value
    pub max_fi: Option<f64>,
}

impl BurnSummary {
    /// Calculate summary statistics for the given records
    pub fn new(records: &[BurnRecord]) -> Self {
        let ros = records.iter().filter_map(|r| r.ros).collect_vec();
        #[allow(clippy::cast_precision_loss)]
        let record_mean_ros =
            (!ros.is_empty()).then(|| ros.iter().sum::<f64>() / ros.len() as f64);

        Self {
            records: records.len(),
            iterations: records.iter().map(|r| r.iteration_id).unique().count(),
            record_mean_ros,
            max_fi: records.iter().filter_map(|r| r.fi).reduce(f64::max),
        }
    }
}
