//Idcodes
//Copyright (C) 2024 The idcodes developers
//
//This program is free software: you can redistribute it and/or modify
//it under the terms of the GNU Affero General Public License as published by
//the Free Software Foundation, either version 3 of the License, or
//(at your option) any later version.
//
//This program is distributed in the hope that it will be useful,
//but WITHOUT ANY WARRANTY; without even the implied warranty of
//MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//GNU Affero General Public License for more details.
//
//You should have received a copy of the GNU Affero General Public License
//along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Undirected simple graph over labelled nodes. Nodes are stored densely in the order in which
//! they are first seen, and are identified by a `NodeIndex` in that order. The graph is built once
//! and never modified afterward.
//!
//! The graph provides the closed neighbourhoods used by the encoding:
//!     - N1(v) = {v} U {u : (u, v) is an edge}
//!     - N2(v) = the nodes reachable from v in at most two hops (v included)
//!
//! Precondition for the encoding: the graph has no twins, that is two distinct nodes with
//! N1(u) = N1(v). This is not enforced here, but `twins` reports them.

use rustc_hash::{FxHashMap, FxHashSet};

/// Abstraction used as a typesafe way of retrieving a node in the `Graph` structure
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeIndex(pub usize);

#[derive(Debug, Default)]
pub struct Graph {
    /// Label of each node, in order of first appearance
    labels: Vec<String>,
    /// Maps a label to its node
    index: FxHashMap<String, NodeIndex>,
    /// Sorted adjacency list of each node (the node itself is excluded)
    neighbours: Vec<Vec<NodeIndex>>,
    /// Edges, each stored once with the smallest index first
    edges: FxHashSet<(NodeIndex, NodeIndex)>,
}

impl Graph {

    // --- GRAPH CREATION --- //

    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a list of edges given by the labels of their endpoints
    pub fn from_edges<'a, I>(edges: I) -> Self
        where I: IntoIterator<Item = (&'a str, &'a str)>
    {
        let mut g = Graph::new();
        for (u, v) in edges {
            let u = g.add_node(u);
            let v = g.add_node(v);
            g.add_edge(u, v);
        }
        g
    }

    /// Adds a node with the given label, if not yet present, and returns its index
    pub fn add_node(&mut self, label: &str) -> NodeIndex {
        if let Some(node) = self.index.get(label) {
            return *node;
        }
        let node = NodeIndex(self.labels.len());
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), node);
        self.neighbours.push(vec![]);
        node
    }

    /// Adds an undirected edge between two distinct nodes. Returns false if the edge is a
    /// self-loop or is already in the graph (in which case the graph is unchanged).
    pub fn add_edge(&mut self, u: NodeIndex, v: NodeIndex) -> bool {
        if u == v {
            return false;
        }
        let key = if u < v { (u, v) } else { (v, u) };
        if !self.edges.insert(key) {
            return false;
        }
        for (a, b) in [(u, v), (v, u)] {
            let adjacency = &mut self.neighbours[a.0];
            let position = adjacency.binary_search(&b).unwrap_or_else(|p| p);
            adjacency.insert(position, b);
        }
        true
    }

    // --- QUERIES --- //

    /// Returns the closed 1-neighbourhood of the node, sorted by node index
    pub fn closed_neighbourhood(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let adjacency = &self.neighbours[node.0];
        let mut n1 = Vec::with_capacity(adjacency.len() + 1);
        let position = adjacency.binary_search(&node).unwrap_or_else(|p| p);
        n1.extend_from_slice(&adjacency[..position]);
        n1.push(node);
        n1.extend_from_slice(&adjacency[position..]);
        n1
    }

    /// Returns the closed 2-neighbourhood of the node, sorted by node index
    pub fn closed_two_neighbourhood(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut reached: FxHashSet<NodeIndex> = FxHashSet::default();
        reached.insert(node);
        for neighbour in self.neighbours[node.0].iter().copied() {
            reached.insert(neighbour);
            reached.extend(self.neighbours[neighbour.0].iter().copied());
        }
        let mut n2 = reached.into_iter().collect::<Vec<NodeIndex>>();
        n2.sort_unstable();
        n2
    }

    /// Returns the pairs of twin nodes (distinct nodes with equal closed neighbourhoods).
    /// Twins are necessarily adjacent, so only the edges are inspected.
    pub fn twins(&self) -> Vec<(NodeIndex, NodeIndex)> {
        let mut twins = self.edges_iter()
            .filter(|(u, v)| self.closed_neighbourhood(*u) == self.closed_neighbourhood(*v))
            .collect::<Vec<(NodeIndex, NodeIndex)>>();
        twins.sort_unstable();
        twins
    }

    // --- GETTERS --- //

    /// Returns the number of nodes in the graph
    pub fn number_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Returns the number of (undirected) edges in the graph
    pub fn number_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns the label of the node
    pub fn label(&self, node: NodeIndex) -> &str {
        &self.labels[node.0]
    }

    /// Returns the node with the given label, if any
    pub fn node(&self, label: &str) -> Option<NodeIndex> {
        self.index.get(label).copied()
    }

    /// Returns true iff there is an edge between u and v
    pub fn has_edge(&self, u: NodeIndex, v: NodeIndex) -> bool {
        self.neighbours[u.0].binary_search(&v).is_ok()
    }

    /// Returns the (open) neighbours of the node
    pub fn neighbours(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.neighbours[node.0]
    }

    // --- ITERATORS --- //

    /// Returns an iterator on the nodes, in order of first appearance
    pub fn nodes_iter(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.labels.len()).map(NodeIndex)
    }

    /// Returns an iterator on the edges, smallest endpoint first. The order is unspecified.
    pub fn edges_iter(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.edges.iter().copied()
    }
}
