// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Harmonic adjacency graph.
//!
//! Nodes are (family, transposition) pairs. Edges come from a name-keyed
//! connection table: each entry links every transposition of one family
//! to the transposition of another family offset by a fixed rotation.
//! Edges are undirected, so each pair is stored once with normalized
//! endpoint order.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::catalog::{FamilyId, ScaleCatalog, Transposition};
use super::locator::MatchResult;

/// Errors raised while building the graph
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("connection table references unknown scale family '{0}'")]
    UnknownFamily(String),
}

/// One node: a family at a transposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub family: FamilyId,
    pub transposition: Transposition,
}

impl NodeId {
    pub fn new(family: FamilyId, transposition: Transposition) -> Self {
        NodeId {
            family,
            transposition,
        }
    }
}

/// An undirected edge with normalized endpoint order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HarmonicEdge {
    a: NodeId,
    b: NodeId,
}

impl HarmonicEdge {
    /// Create an edge; endpoint order does not matter
    pub fn new(x: NodeId, y: NodeId) -> Self {
        if x <= y {
            HarmonicEdge { a: x, b: y }
        } else {
            HarmonicEdge { a: y, b: x }
        }
    }

    /// The two endpoints, smaller first
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }
}

/// A link from every transposition of one family to another family
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub target: String,
    pub rotation_offset: i8,
}

/// Name-keyed table of family-to-family connections
#[derive(Debug, Clone, Default)]
pub struct ConnectionTable {
    links: HashMap<String, Vec<Connection>>,
}

impl ConnectionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection from `from` to `to` with a rotation offset
    pub fn add(&mut self, from: &str, to: &str, rotation_offset: i8) {
        self.links.entry(from.to_string()).or_default().push(Connection {
            target: to.to_string(),
            rotation_offset,
        });
    }

    /// The standard connection table for the seven-family catalog.
    ///
    /// Every entry links scales sharing at least five pitch classes:
    /// fifth-related majors, the parallel and relative minor forms, and
    /// the symmetric scales closest to each minor form.
    pub fn standard() -> Self {
        let mut table = ConnectionTable::new();
        table.add("major", "major", 7);
        table.add("major", "melodic_minor", 0);
        table.add("major", "harmonic_major", 0);
        table.add("major", "harmonic_minor", 9);
        table.add("melodic_minor", "harmonic_minor", 0);
        table.add("harmonic_major", "harmonic_minor", 0);
        table.add("melodic_minor", "wholetone", 11);
        table.add("harmonic_minor", "octatonic", 2);
        table.add("harmonic_major", "octatonic", 2);
        table.add("harmonic_minor", "augmented", 0);
        table.add("harmonic_major", "augmented", 0);
        table
    }

    /// Iterate (source family, connections) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Connection])> {
        self.links
            .iter()
            .map(|(name, conns)| (name.as_str(), conns.as_slice()))
    }

    /// Total number of table entries
    pub fn len(&self) -> usize {
        self.links.values().map(Vec::len).sum()
    }

    /// Check whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// The full node and edge set for a catalog
#[derive(Debug, Clone)]
pub struct HarmonicGraph {
    nodes: Vec<NodeId>,
    edges: Vec<HarmonicEdge>,
}

impl HarmonicGraph {
    /// Build the graph for a catalog from a connection table.
    ///
    /// Fails if the table names a family the catalog does not have.
    /// Self-loops are dropped; duplicate edges collapse to one.
    pub fn build(catalog: &ScaleCatalog, table: &ConnectionTable) -> Result<Self, GraphError> {
        let mut nodes = Vec::with_capacity(catalog.total_transpositions());
        for (id, family) in catalog.iter().enumerate() {
            for t in family.transpositions() {
                nodes.push(NodeId::new(id, t));
            }
        }

        let mut seen: HashSet<HarmonicEdge> = HashSet::new();
        for (from_name, connections) in table.iter() {
            let from_id = catalog
                .find(from_name)
                .ok_or_else(|| GraphError::UnknownFamily(from_name.to_string()))?;
            let from_steps = match catalog.family(from_id) {
                Some(family) => family.n_steps(),
                None => 0,
            };

            for conn in connections {
                let to_id = catalog
                    .find(&conn.target)
                    .ok_or_else(|| GraphError::UnknownFamily(conn.target.clone()))?;
                let to_steps = match catalog.family(to_id) {
                    Some(family) => family.n_steps() as i16,
                    None => continue,
                };

                for t in 0..from_steps {
                    let target_t =
                        (t as i16 + conn.rotation_offset as i16).rem_euclid(to_steps) as Transposition;
                    let from_node = NodeId::new(from_id, t as Transposition);
                    let to_node = NodeId::new(to_id, target_t);
                    if from_node == to_node {
                        continue;
                    }
                    seen.insert(HarmonicEdge::new(from_node, to_node));
                }
            }
        }

        let mut edges: Vec<HarmonicEdge> = seen.into_iter().collect();
        edges.sort_unstable();

        Ok(HarmonicGraph { nodes, edges })
    }

    /// All nodes in catalog order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// All edges in sorted order
    pub fn edges(&self) -> &[HarmonicEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The nodes a match result lights up
    pub fn highlight(&self, result: &MatchResult) -> HashSet<NodeId> {
        let mut lit = HashSet::new();
        for (family, transpositions) in result.iter() {
            for &t in transpositions {
                lit.insert(NodeId::new(family, t));
            }
        }
        lit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::catalog::ScaleFamily;
    use crate::music::locator::ChordLocator;
    use crate::music::pitch::PitchClassSet;

    fn two_family_catalog() -> ScaleCatalog {
        ScaleCatalog::new(vec![
            ScaleFamily::new("left", "Left", &[1, 0, 1], 1.0).unwrap(),
            ScaleFamily::new("right", "Right", &[1, 0], 0.5).unwrap(),
        ])
    }

    #[test]
    fn test_standard_graph_counts() {
        let catalog = ScaleCatalog::standard();
        let graph = HarmonicGraph::build(&catalog, &ConnectionTable::standard()).unwrap();

        assert_eq!(graph.node_count(), 57);
        assert_eq!(graph.edge_count(), 132);
    }

    #[test]
    fn test_unknown_family_rejected() {
        let catalog = ScaleCatalog::standard();
        let mut table = ConnectionTable::new();
        table.add("major", "hexatonic", 0);

        let err = HarmonicGraph::build(&catalog, &table).unwrap_err();
        assert!(matches!(err, GraphError::UnknownFamily(name) if name == "hexatonic"));
    }

    #[test]
    fn test_two_family_edges() {
        let catalog = two_family_catalog();
        let mut table = ConnectionTable::new();
        table.add("left", "right", 0);

        let graph = HarmonicGraph::build(&catalog, &table).unwrap();
        assert_eq!(graph.node_count(), 5);

        // left t=0,1,2 map onto right t=0,1,0
        let expected = vec![
            HarmonicEdge::new(NodeId::new(0, 0), NodeId::new(1, 0)),
            HarmonicEdge::new(NodeId::new(0, 1), NodeId::new(1, 1)),
            HarmonicEdge::new(NodeId::new(0, 2), NodeId::new(1, 0)),
        ];
        assert_eq!(graph.edges(), expected.as_slice());
    }

    #[test]
    fn test_self_loops_dropped() {
        let catalog = ScaleCatalog::new(vec![
            ScaleFamily::new("solo", "Solo", &[1, 0, 1], 1.0).unwrap(),
        ]);
        let mut table = ConnectionTable::new();
        table.add("solo", "solo", 0);

        let graph = HarmonicGraph::build(&catalog, &table).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_tritone_edges_deduplicate() {
        // Offset 6 pairs each major with its tritone twin from both sides
        let catalog = ScaleCatalog::new(vec![ScaleFamily::new(
            "major",
            "Major",
            &[1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 0, 1],
            1.0,
        )
        .unwrap()]);
        let mut table = ConnectionTable::new();
        table.add("major", "major", 6);

        let graph = HarmonicGraph::build(&catalog, &table).unwrap();
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn test_edge_normalization() {
        let x = NodeId::new(1, 3);
        let y = NodeId::new(0, 5);
        assert_eq!(HarmonicEdge::new(x, y), HarmonicEdge::new(y, x));
        assert_eq!(HarmonicEdge::new(x, y).endpoints().0, y);
    }

    #[test]
    fn test_highlight_matches() {
        let catalog = ScaleCatalog::standard();
        let graph = HarmonicGraph::build(&catalog, &ConnectionTable::standard()).unwrap();
        let locator = ChordLocator::new(catalog);

        let result = locator.locate(PitchClassSet::from_pitch_classes(&[0, 4, 7]));
        let lit = graph.highlight(&result);

        let major = locator.catalog().find("major").unwrap();
        assert!(lit.contains(&NodeId::new(major, 0)));
        assert!(lit.contains(&NodeId::new(major, 5)));
        assert!(lit.contains(&NodeId::new(major, 7)));
        assert!(!lit.contains(&NodeId::new(major, 1)));
        assert_eq!(lit.len(), result.total_matches());
    }

    #[test]
    fn test_highlight_empty_for_no_matches() {
        let catalog = ScaleCatalog::standard();
        let graph = HarmonicGraph::build(&catalog, &ConnectionTable::standard()).unwrap();
        let locator = ChordLocator::new(catalog);

        let result = locator.locate(PitchClassSet::from_pitch_classes(&[0, 1, 2, 3, 4, 5, 6]));
        assert!(graph.highlight(&result).is_empty());
    }

    #[test]
    fn test_full_range_highlights_everything() {
        let catalog = ScaleCatalog::standard();
        let graph = HarmonicGraph::build(&catalog, &ConnectionTable::standard()).unwrap();
        let result = MatchResult::full_range(&ScaleCatalog::standard());

        assert_eq!(graph.highlight(&result).len(), graph.node_count());
    }
}
