//! Fireplains: spread graphs aggregated over all iterations sharing an ignition hexagon.
//!
//! The weight of each edge of a fireplain is the number of iterations in which fire spread along
//! it. Iterations with the same ignition hexagon orient every arc the same way, so a fireplain is
//! acyclic like the spread graphs it is built from.
use crate::id::{IterationID, NodeID};
use crate::spread::{IterationGraph, SpreadGraphs};
use indexmap::IndexSet;
use itertools::Itertools;
use log::debug;
use petgraph::graphmap::DiGraphMap;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::iter;

/// The fireplain for a single ignition hexagon
#[derive(Clone, Debug)]
pub struct Fireplain {
    /// The ignition hexagon
    pub ignition: NodeID,
    /// Number of iterations with this ignition hexagon
    pub iterations: usize,
    graph: DiGraphMap<NodeID, usize>,
}

impl Fireplain {
    /// Edges as `(arc_start, arc_end, iteration_count)`, sorted by start then end
    pub fn edges(&self) -> impl Iterator<Item = (NodeID, NodeID, usize)> + '_ {
        self.graph
            .all_edges()
            .map(|(arc_start, arc_end, count)| (arc_start, arc_end, *count))
    }

    /// The underlying graph
    pub fn graph(&self) -> &DiGraphMap<NodeID, usize> {
        &self.graph
    }

    /// The hexagons in the fireplain: the ignition hexagon, then the others in the order they
    /// appear along the edges.
    pub fn nodes(&self) -> IndexSet<NodeID> {
        iter::once(self.ignition)
            .chain(self.edges().flat_map(|(start, end, _)| [start, end]))
            .collect()
    }
}

/// Aggregate the spread graphs of all iterations which share the ignition hexagon `ignition`
fn build_fireplain(ignition: NodeID, graphs: &[&IterationGraph]) -> Fireplain {
    // Distinct iterations for each edge, sorted by edge
    let mut edge_iterations: BTreeMap<(NodeID, NodeID), HashSet<IterationID>> = BTreeMap::new();
    for graph in graphs {
        for arc in graph.edges() {
            edge_iterations
                .entry((arc.arc_start, arc.arc_end))
                .or_default()
                .insert(arc.iteration_id);
        }
    }

    let mut graph = DiGraphMap::with_capacity(0, edge_iterations.len());
    for ((start, end), iterations) in edge_iterations {
        graph.add_edge(start, end, iterations.len());
    }

    let iterations = graphs
        .iter()
        .map(|graph| graph.iteration_id)
        .unique()
        .count();
    debug!(
        "Fireplain for ignition hexagon {ignition}: {iterations} iterations, {} edges",
        graph.edge_count()
    );

    Fireplain {
        ignition,
        iterations,
        graph,
    }
}

/// The fireplains for all ignition hexagons, sorted by ignition hexagon
#[derive(Debug, Default)]
pub struct Fireplains(Vec<Fireplain>);

impl Fireplains {
    /// Iterate over the fireplains
    pub fn iter(&self) -> std::slice::Iter<'_, Fireplain> {
        self.0.iter()
    }

    /// Number of fireplains
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no fireplains
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All edges as `(ignition, arc_start, arc_end, iteration_count)`
    pub fn edges(&self) -> impl Iterator<Item = (NodeID, NodeID, NodeID, usize)> + '_ {
        self.0.iter().flat_map(|fireplain| {
            fireplain
                .edges()
                .map(|(start, end, count)| (fireplain.ignition, start, end, count))
        })
    }

    /// The ignition hexagon of each fireplain
    pub fn ignitions(&self) -> impl Iterator<Item = NodeID> + '_ {
        self.0.iter().map(|fireplain| fireplain.ignition)
    }

    /// The hexagons belonging to each fireplain, as `(ignition, node)`
    pub fn node_memberships(&self) -> impl Iterator<Item = (NodeID, NodeID)> + '_ {
        self.0.iter().flat_map(|fireplain| {
            fireplain
                .nodes()
                .into_iter()
                .map(move |node_id| (fireplain.ignition, node_id))
        })
    }
}

/// Build a fireplain for each distinct ignition hexagon.
///
/// Fireplains are built in parallel, one per ignition hexagon.
pub fn build_fireplains(spread_graphs: &SpreadGraphs) -> Fireplains {
    let by_ignition = spread_graphs
        .iter()
        .into_group_map_by(|graph| graph.origin)
        .into_iter()
        .sorted_unstable_by_key(|(ignition, _)| *ignition)
        .collect_vec();

    let fireplains = by_ignition
        .par_iter()
        .map(|(ignition, graphs)| build_fireplain(*ignition, graphs))
        .collect();

    Fireplains(fireplains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{hex_network, line_network, scenario};
    use crate::network::Network;
    use crate::spread::{ErrorPolicy, build_spread_graphs};
    use itertools::assert_equal;
    use petgraph::algo::is_cyclic_directed;
    use rstest::rstest;

    /// Fireplain edges as plain integers
    fn edge_tuples(fireplains: &Fireplains) -> Vec<(u32, u32, u32, usize)> {
        fireplains
            .edges()
            .map(|(ignition, start, end, count)| (ignition.0, start.0, end.0, count))
            .collect()
    }

    #[rstest]
    fn test_build_fireplains_shared_ignition(line_network: Network) {
        // Iterations 1 and 2 both start at B and both spread to A
        let scenarios = [
            scenario(1, 2, &[1]),
            scenario(2, 2, &[1, 3]),
            scenario(3, 1, &[2]),
        ];
        let graphs =
            build_spread_graphs(&scenarios, &line_network, 0.0, ErrorPolicy::Abort).unwrap();
        let fireplains = build_fireplains(&graphs);

        assert_eq!(
            edge_tuples(&fireplains),
            [(1, 1, 2, 1), (2, 2, 1, 2), (2, 2, 3, 1)]
        );
        assert_equal(fireplains.ignitions(), [NodeID(1), NodeID(2)]);
        assert_equal(
            fireplains
                .node_memberships()
                .map(|(ignition, node_id)| (ignition.0, node_id.0)),
            [(1, 1), (1, 2), (2, 2), (2, 1), (2, 3)],
        );
        assert_equal(fireplains.iter().map(|f| f.iterations), [1, 2]);
    }

    #[rstest]
    fn test_build_fireplains_properties(hex_network: Network) {
        let scenarios = [
            scenario(1, 2, &[1, 4, 5]),
            scenario(2, 2, &[1, 3]),
            scenario(3, 1, &[2, 3, 4, 5]),
            scenario(4, 2, &[3, 5]),
            scenario(5, 1, &[4]),
        ];
        let graphs =
            build_spread_graphs(&scenarios, &hex_network, 1e-3, ErrorPolicy::Abort).unwrap();
        let fireplains = build_fireplains(&graphs);
        assert_eq!(fireplains.len(), 2);

        for fireplain in fireplains.iter() {
            assert!(!is_cyclic_directed(fireplain.graph()));

            let nodes = fireplain.nodes();
            for (start, end, count) in fireplain.edges() {
                // Count can't exceed the number of iterations sharing the ignition hexagon
                assert!(count >= 1 && count <= fireplain.iterations);
                assert!(nodes.contains(&start) && nodes.contains(&end));
            }

            // Edges are sorted
            let pairs = fireplain.edges().map(|(s, e, _)| (s, e)).collect_vec();
            assert!(pairs.is_sorted());
        }
    }

    #[test]
    fn test_build_fireplains_empty() {
        let fireplains = build_fireplains(&SpreadGraphs::default());
        assert!(fireplains.is_empty());
        assert_eq!(fireplains.edges().count(), 0);
    }
}
