//! Fire spread graphs: one directed graph per simulation iteration.
//!
//! For each iteration, the arcs between burned hexagons are oriented away from the ignition point
//! so that every edge points from the hexagon nearer the ignition to the one further from it. Arcs
//! whose ends are equally far from the ignition point can't be oriented and are left out. The
//! resulting graphs are acyclic, as distance strictly increases along every edge.
use crate::burn::BurnedNodesMap;
use crate::id::{IterationID, NodeID};
use crate::network::Network;
use anyhow::{Context, Result};
use float_cmp::approx_eq;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use log::{debug, trace, warn};
use petgraph::graphmap::DiGraphMap;
use rayon::prelude::*;
use serde::Serialize;
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::iter;

/// Distances within this many units in the last place are always treated as ties
const TIE_ULPS: i64 = 4;

/// A map of iteration IDs to the hexagon in which the fire was ignited
pub type IgnitionMap = IndexMap<IterationID, NodeID>;

/// What to do when the spread graph for an iteration can't be built
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, SerializeLabeledStringEnum, DeserializeLabeledStringEnum,
)]
pub enum ErrorPolicy {
    /// Stop processing and report the error
    #[default]
    #[string = "abort"]
    Abort,
    /// Log the error and carry on without the failed iteration
    #[string = "skip"]
    Skip,
}

/// The inputs needed to build the spread graph for a single iteration
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    /// The iteration
    pub iteration_id: IterationID,
    /// The hexagon in which the fire was ignited
    pub ignition: NodeID,
    /// Hexagons which burned during the iteration, other than the ignition hexagon
    pub burned: IndexSet<NodeID>,
}

impl Scenario {
    /// The ignition hexagon followed by all the burned hexagons
    pub fn node_set(&self) -> impl Iterator<Item = NodeID> + '_ {
        iter::once(self.ignition).chain(self.burned.iter().copied())
    }
}

/// Combine burn footprints and ignition points into a [`Scenario`] for each iteration.
///
/// Iterations without an ignition point are excluded. The returned scenarios are sorted by
/// iteration ID.
pub fn build_scenarios(burned: &BurnedNodesMap, ignitions: &IgnitionMap) -> Vec<Scenario> {
    let mut scenarios = Vec::with_capacity(burned.len());
    for (iteration_id, nodes) in burned {
        let Some(&ignition) = ignitions.get(iteration_id) else {
            warn!("Iteration {iteration_id} has no ignition hexagon and will be excluded");
            continue;
        };

        scenarios.push(Scenario {
            iteration_id: *iteration_id,
            ignition,
            burned: nodes.iter().copied().filter(|id| *id != ignition).collect(),
        });
    }

    for iteration_id in ignitions.keys().filter(|id| !burned.contains_key(*id)) {
        debug!("Iteration {iteration_id} has an ignition point but no burned cells");
    }

    scenarios.sort_by_key(|scenario| scenario.iteration_id);
    scenarios
}

/// An arc of the hex network, oriented away from an iteration's ignition point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DirectedArc {
    /// The iteration the arc belongs to
    pub iteration_id: IterationID,
    /// The iteration's ignition hexagon
    pub origin: NodeID,
    /// The end of the arc nearer the ignition point
    pub arc_start: NodeID,
    /// The end of the arc further from the ignition point
    pub arc_end: NodeID,
}

/// The fire spread graph for a single iteration
#[derive(Clone, Debug)]
pub struct IterationGraph {
    /// The iteration
    pub iteration_id: IterationID,
    /// The hexagon in which the fire was ignited
    pub origin: NodeID,
    graph: DiGraphMap<NodeID, ()>,
    ties: usize,
}

impl IterationGraph {
    /// The edges of the graph, in the order in which they were found
    pub fn edges(&self) -> impl Iterator<Item = DirectedArc> + '_ {
        self.graph
            .all_edges()
            .map(|(arc_start, arc_end, ())| DirectedArc {
                iteration_id: self.iteration_id,
                origin: self.origin,
                arc_start,
                arc_end,
            })
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no edges
    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Number of arcs left out because both ends were equidistant from the ignition point
    pub fn ties(&self) -> usize {
        self.ties
    }

    /// The underlying graph
    pub fn graph(&self) -> &DiGraphMap<NodeID, ()> {
        &self.graph
    }

    /// The hexagons in the graph: the ignition hexagon, then the others in the order they appear
    /// along the edges.
    pub fn nodes(&self) -> IndexSet<NodeID> {
        iter::once(self.origin)
            .chain(self.edges().flat_map(|arc| [arc.arc_start, arc.arc_end]))
            .collect()
    }
}

/// Whether two distances from the ignition point should be treated as equal
fn is_tie(dist1: f64, dist2: f64, tolerance: f64) -> bool {
    approx_eq!(f64, dist1, dist2, epsilon = tolerance, ulps = TIE_ULPS)
}

/// Build the fire spread graph for a single iteration.
///
/// Only arcs whose ends both burned (or are the ignition hexagon) are included. Arcs are visited
/// in the order given by the network; if the same directed edge is produced more than once, only
/// the first is kept.
///
/// # Arguments
///
/// * `scenario` - Ignition and burned hexagons for the iteration
/// * `network` - Hexagon centroids and the arcs between them
/// * `tie_tolerance` - Distances closer than this are treated as equal
pub fn orient_iteration(
    scenario: &Scenario,
    network: &Network,
    tie_tolerance: f64,
) -> Result<IterationGraph> {
    let iteration_id = scenario.iteration_id;
    let distances = distances_from_ignition(scenario, network)
        .with_context(|| format!("Failed to build spread graph for iteration {iteration_id}"))?;

    let mut graph = DiGraphMap::new();
    let mut ties = 0;
    if distances.len() >= 2 {
        for arc in &network.arcs {
            let (Some(&dist1), Some(&dist2)) =
                (distances.get(&arc.node_1), distances.get(&arc.node_2))
            else {
                // At least one end didn't burn
                continue;
            };

            if is_tie(dist1, dist2, tie_tolerance) {
                trace!(
                    "Iteration {iteration_id}: both ends of arc {}-{} are {dist1} from the \
                    ignition point; leaving it out",
                    arc.node_1,
                    arc.node_2
                );
                ties += 1;
                continue;
            }

            let (start, end) = if dist2 > dist1 {
                (arc.node_1, arc.node_2)
            } else {
                (arc.node_2, arc.node_1)
            };

            if graph.contains_edge(start, end) {
                debug!("Iteration {iteration_id}: ignoring duplicate edge {start}->{end}");
                continue;
            }
            graph.add_edge(start, end, ());
        }
    }

    Ok(IterationGraph {
        iteration_id,
        origin: scenario.ignition,
        graph,
        ties,
    })
}

/// Distance from the ignition point for each hexagon in the scenario
fn distances_from_ignition(
    scenario: &Scenario,
    network: &Network,
) -> Result<HashMap<NodeID, f64>> {
    let origin = network
        .centroid(scenario.ignition)
        .context("Invalid ignition hexagon")?;

    scenario
        .node_set()
        .map(|node_id| -> Result<_> {
            Ok((node_id, network.centroid(node_id)?.distance(origin)))
        })
        .collect()
}

/// Counts of what happened while building the spread graphs
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SpreadSummary {
    /// Number of iterations considered
    pub iterations: usize,
    /// Iterations whose spread graph couldn't be built and were skipped
    pub failed: usize,
    /// Iterations whose spread graph had no edges
    pub empty: usize,
    /// Arcs left out because both ends were equidistant from the ignition point
    pub ties: usize,
    /// Total number of edges across all spread graphs
    pub edges: usize,
}

/// The fire spread graphs for all iterations, sorted by iteration ID.
///
/// Only graphs with at least one edge are included.
#[derive(Debug, Default)]
pub struct SpreadGraphs {
    graphs: Vec<IterationGraph>,
    summary: SpreadSummary,
}

impl SpreadGraphs {
    /// Iterate over the graphs
    pub fn iter(&self) -> std::slice::Iter<'_, IterationGraph> {
        self.graphs.iter()
    }

    /// Number of graphs
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Whether there are no graphs
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// What happened while building the graphs
    pub fn summary(&self) -> &SpreadSummary {
        &self.summary
    }

    /// All edges of all graphs
    pub fn edges(&self) -> impl Iterator<Item = DirectedArc> + '_ {
        self.graphs.iter().flat_map(IterationGraph::edges)
    }

    /// The ignition hexagon of each iteration
    pub fn roots(&self) -> impl Iterator<Item = (IterationID, NodeID)> + '_ {
        self.graphs
            .iter()
            .map(|graph| (graph.iteration_id, graph.origin))
    }

    /// The ID of each iteration
    pub fn iteration_ids(&self) -> impl Iterator<Item = IterationID> + '_ {
        self.graphs.iter().map(|graph| graph.iteration_id)
    }

    /// The hexagons belonging to each iteration's graph
    pub fn node_memberships(&self) -> impl Iterator<Item = (IterationID, NodeID)> + '_ {
        self.graphs.iter().flat_map(|graph| {
            graph
                .nodes()
                .into_iter()
                .map(move |node_id| (graph.iteration_id, node_id))
        })
    }
}

/// Keep only the first scenario for each iteration
fn dedup_scenarios(scenarios: &[Scenario]) -> Vec<&Scenario> {
    let mut ignitions = HashMap::new();
    scenarios
        .iter()
        .filter(|scenario| match ignitions.entry(scenario.iteration_id) {
            Entry::Vacant(entry) => {
                entry.insert(scenario.ignition);
                true
            }
            Entry::Occupied(entry) => {
                warn!(
                    "Iteration {} was given more than once (ignition hexagons {} and {}); keeping \
                    the first",
                    scenario.iteration_id,
                    entry.get(),
                    scenario.ignition
                );
                false
            }
        })
        .collect()
}

/// Build the fire spread graphs for all iterations.
///
/// The graphs are built in parallel. If the same iteration appears in more than one scenario, only
/// the first is used.
///
/// # Arguments
///
/// * `scenarios` - Ignition and burned hexagons for each iteration
/// * `network` - Hexagon centroids and the arcs between them
/// * `tie_tolerance` - Distances closer than this are treated as equal
/// * `policy` - What to do if an iteration's graph can't be built
pub fn build_spread_graphs(
    scenarios: &[Scenario],
    network: &Network,
    tie_tolerance: f64,
    policy: ErrorPolicy,
) -> Result<SpreadGraphs> {
    let scenarios = dedup_scenarios(scenarios);
    let results = scenarios
        .par_iter()
        .map(|scenario| orient_iteration(scenario, network, tie_tolerance))
        .collect::<Vec<_>>();

    let mut summary = SpreadSummary {
        iterations: scenarios.len(),
        ..SpreadSummary::default()
    };
    let mut graphs = Vec::with_capacity(results.len());
    for (scenario, result) in scenarios.iter().zip_eq(results) {
        let graph = match result {
            Ok(graph) => graph,
            Err(err) if policy == ErrorPolicy::Skip => {
                warn!("Skipping iteration {}: {err:#}", scenario.iteration_id);
                summary.failed += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        summary.ties += graph.ties();
        if graph.is_empty() {
            debug!(
                "Iteration {} produced no spread edges and will be excluded",
                graph.iteration_id
            );
            summary.empty += 1;
            continue;
        }

        summary.edges += graph.edge_count();
        graphs.push(graph);
    }

    if summary.ties > 0 {
        warn!(
            "{} arcs were left out of the spread graphs because both ends were equally far from \
            the ignition point",
            summary.ties
        );
    }

    graphs.sort_by_key(|graph| graph.iteration_id);
    Ok(SpreadGraphs { graphs, summary })
}
