//! Fixtures for tests
use crate::geometry::Point;
use crate::id::{IterationID, NodeID};
use crate::network::{Arc, Network, NodeMap};
use crate::spread::Scenario;
use indexmap::{IndexSet, indexmap};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Circumradius of the hexagons in [`hex_nodes`]
pub const HEX_RADIUS: f64 = 5.7735;

/// Five pointy-topped hexagons, 10 units across: three in a row with two more sitting on top.
///
/// ```text
///     4   5
///   1   2   3
/// ```
#[fixture]
pub fn hex_nodes() -> NodeMap {
    indexmap! {
        NodeID(1) => Point::new(0.0, 0.0),
        NodeID(2) => Point::new(10.0, 0.0),
        NodeID(3) => Point::new(20.0, 0.0),
        NodeID(4) => Point::new(5.0, 8.660_254),
        NodeID(5) => Point::new(15.0, 8.660_254),
    }
}

/// Arcs between neighbouring hexagons in [`hex_nodes`]
#[fixture]
pub fn hex_arcs() -> Vec<Arc> {
    [(1, 2), (2, 3), (1, 4), (2, 4), (2, 5), (3, 5), (4, 5)]
        .into_iter()
        .map(|(n1, n2)| Arc::new(NodeID(n1), NodeID(n2)))
        .collect()
}

#[fixture]
pub fn hex_network(hex_nodes: NodeMap, hex_arcs: Vec<Arc>) -> Network {
    Network {
        nodes: hex_nodes,
        arcs: hex_arcs,
    }
}

/// Three nodes on a line, A(0,0), B(1,0) and C(2,0), all adjacent to one another
#[fixture]
pub fn line_network() -> Network {
    Network {
        nodes: indexmap! {
            NodeID(1) => Point::new(0.0, 0.0),
            NodeID(2) => Point::new(1.0, 0.0),
            NodeID(3) => Point::new(2.0, 0.0),
        },
        arcs: vec![
            Arc::new(NodeID(1), NodeID(2)),
            Arc::new(NodeID(2), NodeID(3)),
            Arc::new(NodeID(1), NodeID(3)),
        ],
    }
}

/// Create a [`Scenario`] from plain integers
pub fn scenario(iteration_id: u32, ignition: u32, burned: &[u32]) -> Scenario {
    Scenario {
        iteration_id: IterationID(iteration_id),
        ignition: NodeID(ignition),
        burned: burned.iter().copied().map(NodeID).collect::<IndexSet<_>>(),
    }
}
