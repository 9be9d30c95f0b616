//! Code for reading ignition points and finding the hexagons they lie in.
use super::{deserialize_integral, read_csv};
use crate::geometry::{HexLocator, Point};
use crate::id::IterationID;
use crate::spread::IgnitionMap;
use anyhow::Result;
use indexmap::map::Entry;
use log::warn;
use serde::Deserialize;
use std::path::Path;

const IGNITIONS_FILE_NAME: &str = "stats_.csv";

/// The ignition point of one iteration, from the simulation statistics file.
///
/// Other columns in the file are ignored.
#[derive(Debug, Deserialize, PartialEq)]
struct IgnitionPoint {
    #[serde(deserialize_with = "deserialize_integral")]
    iteration: IterationID,
    x_coord: f64,
    y_coord: f64,
}

/// Read the ignition point of each iteration and find the hexagon containing it.
///
/// # Arguments
///
/// * `dataset_dir` - Folder containing the dataset files
/// * `locator` - For finding the hexagon containing a point
///
/// # Returns
///
/// The ignition hexagon for each iteration, sorted by iteration ID.
pub fn read_ignitions(dataset_dir: &Path, locator: &HexLocator) -> Result<IgnitionMap> {
    let points: Vec<IgnitionPoint> = read_csv(&dataset_dir.join(IGNITIONS_FILE_NAME))?;
    Ok(locate_ignitions(points, locator))
}

/// Find the hexagon containing each ignition point.
///
/// Points outside every hexagon are dropped. If an iteration has ignition points in more than one
/// hexagon, the first is kept.
fn locate_ignitions<I>(points: I, locator: &HexLocator) -> IgnitionMap
where
    I: IntoIterator<Item = IgnitionPoint>,
{
    let mut ignitions = IgnitionMap::new();
    for point in points {
        let Some(node_id) = locator.locate(&Point::new(point.x_coord, point.y_coord)) else {
            warn!(
                "The ignition point for iteration {} ({}, {}) is not in any hexagon; the \
                iteration will be excluded",
                point.iteration, point.x_coord, point.y_coord
            );
            continue;
        };

        match ignitions.entry(point.iteration) {
            Entry::Vacant(entry) => {
                entry.insert(node_id);
            }
            Entry::Occupied(entry) if *entry.get() != node_id => warn!(
                "Iteration {} has ignition points in more than one hexagon ({} and {}); keeping \
                the first",
                point.iteration,
                entry.get(),
                node_id
            ),
            Entry::Occupied(_) => {}
        }
    }

    ignitions.sort_keys();
    ignitions
}
