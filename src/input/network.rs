//! Code for reading the hex network (nodes and arcs) from CSV files.
use super::{input_err_msg, read_csv};
use crate::geometry::Point;
use crate::id::NodeID;
use crate::network::{Arc, Network, NodeMap};
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::Deserialize;
use std::path::Path;

const NODES_FILE_NAME: &str = "nodes.csv";
const ARCS_FILE_NAME: &str = "arcs.csv";

/// Represents a row of the nodes CSV file
#[derive(Debug, Deserialize, PartialEq)]
struct NodeRaw {
    node_id: NodeID,
    x: f64,
    y: f64,
}

/// Read the hexagon centroids and arcs for a dataset.
///
/// # Arguments
///
/// * `dataset_dir` - Folder containing the dataset files
pub fn read_network(dataset_dir: &Path) -> Result<Network> {
    let file_path = dataset_dir.join(NODES_FILE_NAME);
    let nodes = read_nodes_from_iter(read_csv(&file_path)?.into_iter())
        .with_context(|| input_err_msg(&file_path))?;

    let file_path = dataset_dir.join(ARCS_FILE_NAME);
    let arcs: Vec<Arc> = read_csv(&file_path)?;
    check_arcs(&arcs, &nodes).with_context(|| input_err_msg(&file_path))?;

    Ok(Network { nodes, arcs })
}

fn read_nodes_from_iter<I>(iter: I) -> Result<NodeMap>
where
    I: Iterator<Item = NodeRaw>,
{
    let mut nodes = NodeMap::new();
    for node in iter {
        ensure!(
            node.x.is_finite() && node.y.is_finite(),
            "Node {} has invalid coordinates",
            node.node_id
        );
        ensure!(
            nodes
                .insert(node.node_id, Point::new(node.x, node.y))
                .is_none(),
            "Duplicate node ID {} found",
            node.node_id
        );
    }

    ensure!(!nodes.is_empty(), "No nodes found");

    Ok(nodes)
}

/// Check that all arcs join known nodes
fn check_arcs(arcs: &[Arc], nodes: &NodeMap) -> Result<()> {
    for arc in arcs {
        for node_id in [arc.node_1, arc.node_2] {
            ensure!(
                nodes.contains_key(&node_id),
                "Arc {}-{} refers to unknown node {node_id}",
                arc.node_1,
                arc.node_2
            );
        }

        if arc.node_1 == arc.node_2 {
            warn!(
                "Arc {}-{} joins a node to itself and will never be part of a spread graph",
                arc.node_1, arc.node_2
            );
        }
    }

    Ok(())
}
