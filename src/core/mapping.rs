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

//! Renaming of the nodes into solver variables. The solver only accepts variables named by
//! positive integers, so each node receives a dense id in 1..=n, following the enumeration order
//! of the graph. The mapping is bijective and is fixed for the lifetime of one encoding; it is used
//! to decode the solver's assignments back into node labels.

use super::graph::{Graph, NodeIndex};
use super::literal::{Literal, Variable};
use super::solution::Solution;
use crate::error::EncodeError;

#[derive(Debug, Clone)]
pub struct VariableMapping {
    /// Variable of each node, indexed by node
    node_to_variable: Vec<Variable>,
    /// Node of each variable, indexed by variable offset
    variable_to_node: Vec<NodeIndex>,
}

impl VariableMapping {

    /// Creates the renaming of the nodes of the graph
    pub fn new(graph: &Graph) -> Result<Self, EncodeError> {
        let mut node_to_variable = Vec::with_capacity(graph.number_nodes());
        let mut variable_to_node = Vec::with_capacity(graph.number_nodes());
        for (i, node) in graph.nodes_iter().enumerate() {
            node_to_variable.push(Variable(i + 1));
            variable_to_node.push(node);
        }
        let mapping = Self {
            node_to_variable,
            variable_to_node,
        };
        mapping.check(graph)?;
        Ok(mapping)
    }

    /// Checks that the mapping is a bijection between the nodes of the graph and 1..=n
    pub fn check(&self, graph: &Graph) -> Result<(), EncodeError> {
        let n = graph.number_nodes();
        if self.node_to_variable.len() != n || self.variable_to_node.len() != n {
            return Err(EncodeError::InconsistentMapping { variables: self.variable_to_node.len(), nodes: n });
        }
        for node in graph.nodes_iter() {
            let variable = self.node_to_variable[node.0];
            if variable.0 == 0 || variable.0 > n || self.variable_to_node[variable.offset()] != node {
                return Err(EncodeError::UnmappedNode(graph.label(node).to_string()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.variable_to_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variable_to_node.is_empty()
    }

    /// Returns the variable of the node
    pub fn variable(&self, node: NodeIndex) -> Variable {
        self.node_to_variable[node.0]
    }

    /// Returns the node of the variable, if the variable is in the mapping
    pub fn node(&self, variable: Variable) -> Option<NodeIndex> {
        if variable.0 == 0 {
            return None;
        }
        self.variable_to_node.get(variable.offset()).copied()
    }

    /// Returns the variables, in increasing order
    pub fn variables_iter(&self) -> impl Iterator<Item = Variable> {
        (1..=self.variable_to_node.len()).map(Variable)
    }

    /// Returns the nodes holding a sensor in the solution, in increasing variable order
    pub fn sensors(&self, solution: &Solution) -> Vec<NodeIndex> {
        solution.true_variables().filter_map(|v| self.node(v)).collect()
    }

    /// Returns the total assignment placing a sensor exactly on the given nodes
    pub fn solution_from_sensors(&self, sensors: &[NodeIndex]) -> Solution {
        let mut values = vec![false; self.len()];
        for node in sensors.iter() {
            values[self.variable(*node).offset()] = true;
        }
        let literals = self.variables_iter().map(|v| Literal::from_variable(v, values[v.offset()])).collect();
        // The literals are built from the dense range 1..=n, hence they always form a total assignment
        Solution::try_from_literals(literals, self.len()).unwrap_or_else(|e| unreachable!("{}", e))
    }

    /// Returns the renaming as a table with one line per node, for the provenance header
    pub fn table(&self, graph: &Graph) -> Vec<String> {
        let node_width = graph.nodes_iter().map(|n| graph.label(n).len()).max().unwrap_or(0).max(10) + 1;
        let index_width = self.len().to_string().len() + 1;
        let mut lines = vec![
            format!("{:<node_width$}{:>index_width$}", "node", "idx"),
            "-".repeat(node_width + index_width),
        ];
        for variable in self.variables_iter() {
            let node = self.variable_to_node[variable.offset()];
            lines.push(format!("{:<node_width$}{:>index_width$}", graph.label(node), variable.0));
        }
        lines.push(String::new());
        lines
    }
}
