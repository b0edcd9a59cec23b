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

use super::constraint::{Comparator, Constraint, Term};
use super::literal::{Literal, Variable};
use crate::error::AssignmentError;

/// A total assignment returned by the solver: the set of literals that are true, exactly one per
/// variable. Literals are kept sorted by variable so that two solutions are equal iff they assign
/// the same values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Solution {
    literals: Vec<Literal>,
}

impl Solution {

    /// Builds a solution from the literals, checking that every variable in 1..=number_variables
    /// is assigned exactly once
    pub fn try_from_literals(mut literals: Vec<Literal>, number_variables: usize) -> Result<Self, AssignmentError> {
        literals.sort();
        for (i, literal) in literals.iter().enumerate() {
            let variable = literal.variable();
            if variable.0 > number_variables {
                return Err(AssignmentError::UnknownVariable(variable));
            }
            if i > 0 && literals[i - 1].variable() == variable {
                return Err(AssignmentError::DuplicateVariable(variable));
            }
            if variable.0 != i + 1 {
                return Err(AssignmentError::MissingVariable(Variable(i + 1)));
            }
        }
        if literals.len() < number_variables {
            return Err(AssignmentError::MissingVariable(Variable(literals.len() + 1)));
        }
        Ok(Self { literals })
    }

    pub fn number_variables(&self) -> usize {
        self.literals.len()
    }

    /// Returns the value assigned to the variable
    pub fn value(&self, variable: Variable) -> bool {
        self.literals[variable.offset()].is_positive()
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Returns the variables set to true
    pub fn true_variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.literals.iter().filter(|l| l.is_positive()).map(|l| l.variable())
    }

    /// Returns the constraint that is violated by this solution, and only by this one.
    /// With P the variables set to true and N the ones set to false, the constraint
    ///     sum_{x in P} (1 - x) + sum_{x in N} x >= 1
    /// counts the variables whose value differs from the solution. Moving the constants on the
    /// right-hand side gives
    ///     sum_{x in P} -x + sum_{x in N} x >= 1 - |P|
    pub fn blocking_constraint(&self) -> Constraint {
        let mut terms: Vec<Term> = self.literals.iter().filter(|l| l.is_positive()).map(|l| Term::negative(l.variable())).collect();
        terms.extend(self.literals.iter().filter(|l| !l.is_positive()).map(|l| Term::positive(l.variable())));
        let number_true = self.literals.iter().filter(|l| l.is_positive()).count() as i64;
        Constraint::new(terms, Comparator::AtLeast, 1 - number_true)
    }

    /// Returns one constraint per variable, fixing it to its value in this solution
    pub fn unit_clauses(&self) -> Vec<Constraint> {
        self.literals.iter().map(|l| Constraint::fix(l.variable(), l.is_positive())).collect()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tokens = self.literals.iter().map(|l| l.to_string()).collect::<Vec<String>>();
        write!(f, "{}", tokens.join(" "))
    }
}
