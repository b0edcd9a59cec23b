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

//! Encoding of the identifying code problem as a pseudo-Boolean formula. Each node v has a
//! variable telling whether a sensor is placed on v. With k the fault tolerance, a set of sensors
//! S is a k-fault-tolerant identifying code iff
//!     1. (covering) every closed neighbourhood N1(v) contains at least k+1 sensors;
//!     2. (distinguishing) for every pair of distinct nodes u, v, the symmetric difference
//!        N1(u) ^ N1(v) contains at least k+1 sensors.
//! The symmetric difference of two nodes at distance three or more is N1(u) U N1(v), which is
//! already covered by (1); hence (2) is only generated for the pairs with u in N2(v).
//! Optionally, a cardinality constraint bounds the number of sensors by the budget b.
//!
//! Constraints are first generated over the nodes (`generate`), then renamed into solver
//! variables and rendered as a formula (`serialize`).

use rustc_hash::FxHashSet;
use sysinfo::System;
use tracing::{debug, info, warn};

use crate::core::constraint::Constraint;
use crate::core::formula::Formula;
use crate::core::graph::{Graph, NodeIndex};
use crate::core::mapping::VariableMapping;
use crate::error::EncodeError;
use crate::parameters::Parameters;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Covering,
    Distinguishing,
}

/// A constraint `sum_{v in support} x_v >= degree` over the nodes of the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighbourhoodConstraint {
    kind: ConstraintKind,
    /// Sorted nodes of the constraint
    support: Vec<NodeIndex>,
    degree: usize,
}

impl NeighbourhoodConstraint {

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn support(&self) -> &[NodeIndex] {
        &self.support
    }

    pub fn degree(&self) -> usize {
        self.degree
    }
}

/// The constraints of the encoding, before renaming. Covering constraints come first, in node
/// order, followed by the distinguishing constraints. Two constraints never share the same
/// (support, degree).
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    constraints: Vec<NeighbourhoodConstraint>,
    cardinality: Option<usize>,
    number_nodes: usize,
}

impl ConstraintSet {

    fn new(number_nodes: usize, cardinality: Option<usize>) -> Self {
        Self {
            constraints: vec![],
            cardinality,
            number_nodes,
        }
    }

    /// Adds the constraint unless a constraint with the same support and degree is present
    fn insert(&mut self, seen: &mut FxHashSet<(Vec<NodeIndex>, usize)>, constraint: NeighbourhoodConstraint) -> bool {
        if seen.insert((constraint.support.clone(), constraint.degree)) {
            self.constraints.push(constraint);
            true
        } else {
            false
        }
    }

    pub fn constraints(&self) -> &[NeighbourhoodConstraint] {
        &self.constraints
    }

    pub fn covering_iter(&self) -> impl Iterator<Item = &NeighbourhoodConstraint> {
        self.constraints.iter().filter(|c| c.kind == ConstraintKind::Covering)
    }

    pub fn distinguishing_iter(&self) -> impl Iterator<Item = &NeighbourhoodConstraint> {
        self.constraints.iter().filter(|c| c.kind == ConstraintKind::Distinguishing)
    }

    /// Returns the bound on the number of sensors, if any
    pub fn cardinality(&self) -> Option<usize> {
        self.cardinality
    }

    pub fn number_nodes(&self) -> usize {
        self.number_nodes
    }

    /// Returns the total number of constraints, the cardinality constraint included
    pub fn len(&self) -> usize {
        self.constraints.len() + self.cardinality.is_some() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns the symmetric difference of two sorted sets of nodes, sorted
pub fn symmetric_difference(a: &[NodeIndex], b: &[NodeIndex]) -> Vec<NodeIndex> {
    let mut difference = vec![];
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            difference.push(a[i]);
            i += 1;
        } else if b[j] < a[i] {
            difference.push(b[j]);
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }
    difference.extend_from_slice(&a[i..]);
    difference.extend_from_slice(&b[j..]);
    difference
}

/// Generates the covering, distinguishing and cardinality constraints of the graph
pub fn generate(graph: &Graph, parameters: &Parameters) -> Result<ConstraintSet, EncodeError> {
    let k = parameters.fault_tolerance();
    let degree = k.checked_add(1)
        .filter(|d| i64::try_from(*d).is_ok())
        .ok_or(EncodeError::OutOfRange { parameter: "fault tolerance", value: k })?;
    if let Some(budget) = parameters.budget().filter(|b| i64::try_from(*b).is_err()) {
        return Err(EncodeError::OutOfRange { parameter: "budget", value: budget });
    }
    let mut set = ConstraintSet::new(graph.number_nodes(), parameters.budget());
    let mut seen: FxHashSet<(Vec<NodeIndex>, usize)> = FxHashSet::default();
    let neighbourhoods = graph.nodes_iter().map(|v| graph.closed_neighbourhood(v)).collect::<Vec<Vec<NodeIndex>>>();

    for v in graph.nodes_iter() {
        set.insert(&mut seen, NeighbourhoodConstraint { kind: ConstraintKind::Covering, support: neighbourhoods[v.0].clone(), degree });
    }
    let number_covering = set.constraints.len();

    let mut number_pairs = 0;
    for v in graph.nodes_iter() {
        for u in graph.closed_two_neighbourhood(v).into_iter().filter(|u| *u > v) {
            number_pairs += 1;
            let support = symmetric_difference(&neighbourhoods[v.0], &neighbourhoods[u.0]);
            if support.is_empty() {
                if !parameters.allow_twins() {
                    return Err(EncodeError::Twins { first: graph.label(v).to_string(), second: graph.label(u).to_string() });
                }
                warn!("nodes {} and {} are twins, the formula is unsatisfiable", graph.label(v), graph.label(u));
            }
            set.insert(&mut seen, NeighbourhoodConstraint { kind: ConstraintKind::Distinguishing, support, degree });
        }
    }
    debug!("{} covering constraints, {} distinct distinguishing sets for {} pairs", number_covering, set.constraints.len() - number_covering, number_pairs);
    Ok(set)
}

/// Renames the constraints into solver variables and renders them as a formula. Covering and
/// distinguishing constraints keep their order; the cardinality constraint, if any, comes last.
pub fn serialize(set: &ConstraintSet, mapping: &VariableMapping, metadata: Vec<String>) -> Formula {
    let mut constraints = set.constraints().iter().map(|c| {
        let mut variables = c.support().iter().map(|n| mapping.variable(*n)).collect::<Vec<_>>();
        variables.sort_unstable();
        Constraint::at_least(variables, c.degree() as i64)
    }).collect::<Vec<Constraint>>();
    if let Some(budget) = set.cardinality() {
        constraints.push(Constraint::at_most(mapping.variables_iter(), budget as i64));
    }
    Formula::new(mapping.len(), metadata, constraints)
}

/// Returns the human-readable header of the formula: the problem data, information to reproduce
/// the run and the renaming of the nodes
pub fn provenance(graph: &Graph, mapping: &VariableMapping, parameters: &Parameters) -> Vec<String> {
    let budget = parameters.budget().map(|b| b.to_string()).unwrap_or_else(|| "none".to_string());
    let mut lines = vec![
        "PROBLEM DATA".to_string(),
        format!("network file: {}", parameters.network().display()),
        format!("nodes: {}", graph.number_nodes()),
        format!("edges: {}", graph.number_edges()),
        format!("budget: {}", budget),
        format!("fault tolerance: {}", parameters.fault_tolerance()),
        String::new(),
        "REPRODUCIBILITY INFO".to_string(),
        format!("tool: {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        format!("date: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")),
        format!("machine: {}", System::host_name().unwrap_or_else(|| "unknown".to_string())),
        String::new(),
        "VARIABLE RENAMING".to_string(),
    ];
    lines.extend(mapping.table(graph));
    lines
}

/// The formula of the problem together with the renaming needed to decode its solutions
#[derive(Debug, Clone)]
pub struct Encoding {
    formula: Formula,
    mapping: VariableMapping,
}

impl Encoding {

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn mapping(&self) -> &VariableMapping {
        &self.mapping
    }
}

/// Encodes the identifying code problem of the graph into formula v0
pub fn encode(graph: &Graph, parameters: &Parameters) -> Result<Encoding, EncodeError> {
    let mapping = VariableMapping::new(graph)?;
    let set = generate(graph, parameters)?;
    let formula = serialize(&set, &mapping, provenance(graph, &mapping, parameters));
    mapping.check(graph)?;
    info!("encoded {} nodes into {} constraints", formula.number_variables(), formula.number_constraints());
    Ok(Encoding { formula, mapping })
}
