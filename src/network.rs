//! The hex network: hexagon centroids (nodes) and adjacency between hexagons (arcs).
use crate::geometry::Point;
use crate::id::NodeID;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

/// A map of node IDs to hexagon centroids
pub type NodeMap = IndexMap<NodeID, Point>;

/// An undirected adjacency between two hexagons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Arc {
    /// One end of the arc
    pub node_1: NodeID,
    /// The other end of the arc
    pub node_2: NodeID,
}

impl Arc {
    /// Create a new [`Arc`]
    pub fn new(node_1: NodeID, node_2: NodeID) -> Self {
        Self { node_1, node_2 }
    }
}

/// Hexagon centroids together with the arcs between them
#[derive(Debug, Default, PartialEq)]
pub struct Network {
    /// Hexagon centroids
    pub nodes: NodeMap,
    /// Adjacency between hexagons, in input order
    pub arcs: Vec<Arc>,
}

impl Network {
    /// Get the centroid of the given node
    pub fn centroid(&self, node_id: NodeID) -> Result<&Point> {
        self.nodes
            .get(&node_id)
            .with_context(|| format!("Node {node_id} is not in the node table"))
    }
}
