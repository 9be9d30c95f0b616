//! The module responsible for writing output data to disk.
//!
//! All output tables are tab-separated with no header row, as expected by downstream network
//! analysis tools.
use crate::fireplain::Fireplains;
use crate::id::{IterationID, NodeID};
use crate::spread::SpreadGraphs;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which dataset-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "fireplain_results";

/// The output file name for the edges of the spread graphs
const SPREAD_GRAPHS_FILE_NAME: &str = "Fire_spread_graphs.txt";

/// The output file name for the ignition hexagon of each spread graph
const SPREAD_ROOTS_FILE_NAME: &str = "Fire_f_ign_node_i.txt";

/// The output file name for the list of iteration IDs
const ITERATION_IDS_FILE_NAME: &str = "f_ID.txt";

/// The output file name for the hexagons in each spread graph
const SPREAD_NODES_FILE_NAME: &str = "Fire_f_node_i.txt";

/// The output file name for the edges of the fireplains
const FIREPLAIN_TREES_FILE_NAME: &str = "Fireplain_trees.txt";

/// The output file name for the ignition hexagon of each fireplain
const FIREPLAIN_IGNITIONS_FILE_NAME: &str = "Fplain_ign_node_i.txt";

/// The output file name for the hexagons in each fireplain
const FIREPLAIN_NODES_FILE_NAME: &str = "Fplain_node_i.txt";

/// Marker value written in the weight column of unweighted tables
const MARKER: u32 = 1;

/// Get the default output directory for the dataset at the specified path
pub fn get_output_dir(dataset_dir: &Path) -> Result<PathBuf> {
    // Get the dataset name from the dir path
    let dataset_dir = dataset_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to dataset")?;

    let dataset_name = dataset_dir
        .file_name()
        .context("Dataset cannot be in root folder")?
        .to_str()
        .context("Invalid chars in dataset dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, dataset_name].iter().collect())
}

/// Create a new output directory at `output_dir`, with parents.
///
/// If the directory already exists and isn't empty, its contents are deleted if
/// `allow_overwrite` is true; otherwise an error is returned.
///
/// # Returns
///
/// Whether an existing output folder is being overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut entries) = fs::read_dir(output_dir) {
        if entries.next().is_none() {
            // Folder exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Please delete the folder or pass \
            the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// A row of the spread graph edges file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SpreadEdgeRow {
    iteration_id: IterationID,
    arc_start: NodeID,
    arc_end: NodeID,
    weight: u32,
}

/// A row of the spread graph ignition hexagons file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SpreadRootRow {
    iteration_id: IterationID,
    origin: NodeID,
    weight: u32,
}

/// A row of the iteration IDs file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct IterationIDRow {
    iteration_id: IterationID,
    iter_id: IterationID,
}

/// A row of the spread graph hexagons file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SpreadNodeRow {
    iteration_id: IterationID,
    node_id: NodeID,
    weight: u32,
}

/// A row of the fireplain edges file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct FireplainEdgeRow {
    ignition_id: NodeID,
    arc_start: NodeID,
    arc_end: NodeID,
    iteration_count: usize,
}

/// A row of the fireplain ignition hexagons file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct FireplainIgnitionRow {
    ignition_id: NodeID,
    ign_id: NodeID,
    weight: u32,
}

/// A row of the fireplain hexagons file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct FireplainNodeRow {
    ignition_id: NodeID,
    node_id: NodeID,
    weight: u32,
}

/// Open a tab-separated file with no header row for writing
fn new_writer(output_path: &Path, file_name: &str) -> Result<csv::Writer<File>> {
    let file_path = output_path.join(file_name);
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(&file_path)
        .with_context(|| format!("Failed to create {}", file_path.display()))
}

/// An object for writing spread graphs and fireplains to file
pub struct DataWriter {
    spread_edges_writer: csv::Writer<File>,
    spread_roots_writer: csv::Writer<File>,
    iteration_ids_writer: csv::Writer<File>,
    spread_nodes_writer: csv::Writer<File>,
    fireplain_edges_writer: csv::Writer<File>,
    fireplain_ignitions_writer: csv::Writer<File>,
    fireplain_nodes_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        Ok(Self {
            spread_edges_writer: new_writer(output_path, SPREAD_GRAPHS_FILE_NAME)?,
            spread_roots_writer: new_writer(output_path, SPREAD_ROOTS_FILE_NAME)?,
            iteration_ids_writer: new_writer(output_path, ITERATION_IDS_FILE_NAME)?,
            spread_nodes_writer: new_writer(output_path, SPREAD_NODES_FILE_NAME)?,
            fireplain_edges_writer: new_writer(output_path, FIREPLAIN_TREES_FILE_NAME)?,
            fireplain_ignitions_writer: new_writer(output_path, FIREPLAIN_IGNITIONS_FILE_NAME)?,
            fireplain_nodes_writer: new_writer(output_path, FIREPLAIN_NODES_FILE_NAME)?,
        })
    }

    /// Write the edges, ignition hexagons, iteration IDs and hexagons of the spread graphs
    pub fn write_spread_graphs(&mut self, spread_graphs: &SpreadGraphs) -> Result<()> {
        for arc in spread_graphs.edges() {
            self.spread_edges_writer.serialize(SpreadEdgeRow {
                iteration_id: arc.iteration_id,
                arc_start: arc.arc_start,
                arc_end: arc.arc_end,
                weight: MARKER,
            })?;
        }

        for (iteration_id, origin) in spread_graphs.roots() {
            self.spread_roots_writer.serialize(SpreadRootRow {
                iteration_id,
                origin,
                weight: MARKER,
            })?;
        }

        for iteration_id in spread_graphs.iteration_ids() {
            self.iteration_ids_writer.serialize(IterationIDRow {
                iteration_id,
                iter_id: iteration_id,
            })?;
        }

        for (iteration_id, node_id) in spread_graphs.node_memberships() {
            self.spread_nodes_writer.serialize(SpreadNodeRow {
                iteration_id,
                node_id,
                weight: MARKER,
            })?;
        }

        Ok(())
    }

    /// Write the edges, ignition hexagons and hexagons of the fireplains
    pub fn write_fireplains(&mut self, fireplains: &Fireplains) -> Result<()> {
        for (ignition_id, arc_start, arc_end, iteration_count) in fireplains.edges() {
            self.fireplain_edges_writer.serialize(FireplainEdgeRow {
                ignition_id,
                arc_start,
                arc_end,
                iteration_count,
            })?;
        }

        for ignition_id in fireplains.ignitions() {
            self.fireplain_ignitions_writer
                .serialize(FireplainIgnitionRow {
                    ignition_id,
                    ign_id: ignition_id,
                    weight: MARKER,
                })?;
        }

        for (ignition_id, node_id) in fireplains.node_memberships() {
            self.fireplain_nodes_writer.serialize(FireplainNodeRow {
                ignition_id,
                node_id,
                weight: MARKER,
            })?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        for writer in [
            &mut self.spread_edges_writer,
            &mut self.spread_roots_writer,
            &mut self.iteration_ids_writer,
            &mut self.spread_nodes_writer,
            &mut self.fireplain_edges_writer,
            &mut self.fireplain_ignitions_writer,
            &mut self.fireplain_nodes_writer,
        ] {
            writer.flush()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fireplain::build_fireplains;
    use crate::fixture::{line_network, scenario};
    use crate::network::Network;
    use crate::spread::{ErrorPolicy, build_spread_graphs};
    use itertools::{Itertools, assert_equal};
    use rstest::{fixture, rstest};
    use serde::de::DeserializeOwned;
    use tempfile::tempdir;

    /// Read back the rows of an output file
    fn read_rows<T: DeserializeOwned>(file_path: &Path) -> Vec<T> {
        csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(file_path)
            .unwrap()
            .into_deserialize()
            .try_collect()
            .unwrap()
    }

    #[fixture]
    fn spread_graphs(line_network: Network) -> SpreadGraphs {
        let scenarios = [
            scenario(1, 2, &[1]),
            scenario(2, 2, &[1, 3]),
            scenario(3, 1, &[2]),
        ];
        build_spread_graphs(&scenarios, &line_network, 0.0, ErrorPolicy::Abort).unwrap()
    }

    #[rstest]
    fn test_write_spread_graphs(spread_graphs: SpreadGraphs) {
        let dir = tempdir().unwrap();
        {
            let mut writer = DataWriter::create(dir.path()).unwrap();
            writer.write_spread_graphs(&spread_graphs).unwrap();
            writer.flush().unwrap();
        }

        let edges: Vec<SpreadEdgeRow> = read_rows(&dir.path().join(SPREAD_GRAPHS_FILE_NAME));
        assert_equal(
            edges
                .iter()
                .map(|row| (row.iteration_id.0, row.arc_start.0, row.arc_end.0, row.weight)),
            [(1, 2, 1, 1), (2, 2, 1, 1), (2, 2, 3, 1), (3, 1, 2, 1)],
        );

        let roots: Vec<SpreadRootRow> = read_rows(&dir.path().join(SPREAD_ROOTS_FILE_NAME));
        assert_equal(
            roots.iter().map(|row| (row.iteration_id.0, row.origin.0)),
            [(1, 2), (2, 2), (3, 1)],
        );

        let ids: Vec<IterationIDRow> = read_rows(&dir.path().join(ITERATION_IDS_FILE_NAME));
        assert_equal(
            ids,
            [1, 2, 3].map(|id| IterationIDRow {
                iteration_id: IterationID(id),
                iter_id: IterationID(id),
            }),
        );

        let nodes: Vec<SpreadNodeRow> = read_rows(&dir.path().join(SPREAD_NODES_FILE_NAME));
        assert_equal(
            nodes.iter().map(|row| (row.iteration_id.0, row.node_id.0)),
            [(1, 2), (1, 1), (2, 2), (2, 1), (2, 3), (3, 1), (3, 2)],
        );
    }

    #[rstest]
    fn test_write_fireplains(spread_graphs: SpreadGraphs) {
        let fireplains = build_fireplains(&spread_graphs);
        let dir = tempdir().unwrap();
        {
            let mut writer = DataWriter::create(dir.path()).unwrap();
            writer.write_fireplains(&fireplains).unwrap();
            writer.flush().unwrap();
        }

        // The exact file contents matter to downstream tools
        assert_eq!(
            fs::read_to_string(dir.path().join(FIREPLAIN_TREES_FILE_NAME)).unwrap(),
            "1\t1\t2\t1\n2\t2\t1\t2\n2\t2\t3\t1\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join(FIREPLAIN_IGNITIONS_FILE_NAME)).unwrap(),
            "1\t1\t1\n2\t2\t1\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join(FIREPLAIN_NODES_FILE_NAME)).unwrap(),
            "1\t1\t1\n1\t2\t1\n2\t2\t1\n2\t1\t1\n2\t3\t1\n"
        );
    }

    #[test]
    fn test_write_empty() {
        let dir = tempdir().unwrap();
        {
            let mut writer = DataWriter::create(dir.path()).unwrap();
            writer
                .write_spread_graphs(&SpreadGraphs::default())
                .unwrap();
            writer.write_fireplains(&Fireplains::default()).unwrap();
            writer.flush().unwrap();
        }

        // Files are still created
        for file_name in [SPREAD_GRAPHS_FILE_NAME, FIREPLAIN_NODES_FILE_NAME] {
            assert!(
                fs::read_to_string(dir.path().join(file_name))
                    .unwrap()
                    .is_empty()
            );
        }
    }

    #[test]
    fn test_create_output_directory() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("a").join("b");

        // New folder
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());

        // Empty folder
        assert!(!create_output_directory(&output_dir, false).unwrap());

        // Non-empty folder
        fs::write(output_dir.join("file.txt"), "contents").unwrap();
        assert!(create_output_directory(&output_dir, false).is_err());
        assert!(create_output_directory(&output_dir, true).unwrap());
        assert!(!output_dir.join("file.txt").exists());
    }

    #[test]
    fn test_get_output_dir() {
        let dir = tempdir().unwrap();
        let dataset_dir = dir.path().join("my_dataset");
        fs::create_dir(&dataset_dir).unwrap();
        assert_eq!(
            get_output_dir(&dataset_dir).unwrap(),
            PathBuf::from("fireplain_results/my_dataset")
        );
    }
}
