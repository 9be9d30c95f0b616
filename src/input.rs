//! Common routines for handling input data.
use crate::burn::{
    BurnSummary, BurnedNodesMap, burned_nodes_by_iteration, map_cells_to_hexes,
};
use crate::geometry::HexLocator;
use crate::network::Network;
use crate::spread::IgnitionMap;
use anyhow::{Context, Result, ensure};
use log::{info, warn};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

mod burn;
use burn::read_burn_records;
mod ignition;
use ignition::read_ignitions;
mod network;
use network::read_network;
pub mod parameters;
use parameters::DatasetParameters;

/// Read a series of type `T`s from a CSV file.
///
/// An empty file is not an error, but a warning is logged.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let records: Vec<T> = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .and_then(|reader| reader.into_deserialize().collect::<csv::Result<_>>())
        .with_context(|| input_err_msg(file_path))?;

    if records.is_empty() {
        warn!("{} contains no records", file_path.display());
    }

    Ok(records)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a non-negative integer which may have been written as a float (e.g. `12.0`)
#[allow(
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn parse_integral(value: &str) -> Result<u32> {
    if let Ok(value) = value.parse() {
        return Ok(value);
    }

    let float: f64 = value
        .parse()
        .with_context(|| format!("'{value}' is not a number"))?;
    ensure!(
        float.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&float),
        "'{value}' is not a non-negative integer"
    );

    Ok(float as u32)
}

/// Deserialise an ID field with [`parse_integral`], so that values like `12.0` are accepted
pub fn deserialize_integral<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<u32>,
{
    let value = String::deserialize(deserializer)?;
    parse_integral(&value)
        .map(T::from)
        .map_err(D::Error::custom)
}

/// A complete input dataset, ready for building spread graphs
#[derive(Debug)]
pub struct Dataset {
    /// Parameters from `fireplain.toml`
    pub parameters: DatasetParameters,
    /// Hexagon centroids and the arcs between them
    pub network: Network,
    /// Hexagons which burned in each iteration
    pub burned: BurnedNodesMap,
    /// The ignition hexagon of each iteration
    pub ignitions: IgnitionMap,
    /// Summary statistics for the raw burn records
    pub burn_summary: BurnSummary,
}

/// Read a dataset from the specified directory.
///
/// # Arguments
///
/// * `dataset_dir` - Folder containing the dataset files
///
/// # Returns
///
/// The dataset or an error if any of the files are missing or invalid
pub fn load_dataset(dataset_dir: &Path) -> Result<Dataset> {
    let parameters = DatasetParameters::from_path(dataset_dir)?;
    let network = read_network(dataset_dir)?;
    info!(
        "Read {} hexagons and {} arcs",
        network.nodes.len(),
        network.arcs.len()
    );

    let locator = HexLocator::new(&network.nodes, parameters.hex_radius);
    let records = read_burn_records(dataset_dir)?;
    let cell_hexes = map_cells_to_hexes(&records, &parameters.grid, &locator);
    let burned = burned_nodes_by_iteration(&records, &cell_hexes);
    let burn_summary = BurnSummary::new(&records);
    info!(
        "Read {} burn records covering {} iterations",
        burn_summary.records, burn_summary.iterations
    );

    let ignitions = read_ignitions(dataset_dir, &locator)?;

    Ok(Dataset {
        parameters,
        network,
        burned,
        ignitions,
        burn_summary,
    })
}
