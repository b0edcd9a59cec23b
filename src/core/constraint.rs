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

//! Linear pseudo-Boolean constraints with unit coefficients.
//! A constraint is `sum_i c_i * x_i <cmp> rhs` where every c_i is +1 or -1 and <cmp> is `>=` or
//! `=`, the only two comparators accepted by the solver. It is written on one line, e.g.
//!
//! +1 x1 +1 x2 -1 x4 >= 1 ;

use super::literal::Variable;
use super::solution::Solution;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Comparator {
    AtLeast,
    Equal,
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparator::AtLeast => write!(f, ">="),
            Comparator::Equal => write!(f, "="),
        }
    }
}

/// A variable with a unit coefficient (+1 or -1)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    variable: Variable,
    negated: bool,
}

impl Term {

    pub fn positive(variable: Variable) -> Self {
        Self { variable, negated: false }
    }

    pub fn negative(variable: Variable) -> Self {
        Self { variable, negated: true }
    }

    pub fn variable(&self) -> Variable {
        self.variable
    }

    pub fn coefficient(&self) -> i64 {
        if self.negated { -1 } else { 1 }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+} {}", self.coefficient(), self.variable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    terms: Vec<Term>,
    comparator: Comparator,
    rhs: i64,
}

impl Constraint {

    pub fn new(terms: Vec<Term>, comparator: Comparator, rhs: i64) -> Self {
        Self { terms, comparator, rhs }
    }

    /// sum(variables) >= degree
    pub fn at_least(variables: impl IntoIterator<Item = Variable>, degree: i64) -> Self {
        Self::new(variables.into_iter().map(Term::positive).collect(), Comparator::AtLeast, degree)
    }

    /// sum(variables) <= bound. Since the solver does not accept `<=`, both sides are multiplied
    /// by -1, giving -sum(variables) >= -bound.
    pub fn at_most(variables: impl IntoIterator<Item = Variable>, bound: i64) -> Self {
        Self::new(variables.into_iter().map(Term::negative).collect(), Comparator::AtLeast, -bound)
    }

    /// +1 x = value, fixing the variable to 0 or 1
    pub fn fix(variable: Variable, value: bool) -> Self {
        Self::new(vec![Term::positive(variable)], Comparator::Equal, value as i64)
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    /// Returns an iterator on the variables appearing in the constraint
    pub fn support(&self) -> impl Iterator<Item = Variable> + '_ {
        self.terms.iter().map(|t| t.variable())
    }

    /// Evaluates the left-hand side of the constraint under a total assignment
    pub fn lhs_value(&self, solution: &Solution) -> i64 {
        self.terms.iter().filter(|t| solution.value(t.variable())).map(|t| t.coefficient()).sum()
    }

    pub fn is_satisfied_by(&self, solution: &Solution) -> bool {
        let lhs = self.lhs_value(solution);
        match self.comparator {
            Comparator::AtLeast => lhs >= self.rhs,
            Comparator::Equal => lhs == self.rhs,
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for term in self.terms.iter() {
            write!(f, "{} ", term)?;
        }
        write!(f, "{} {} ;", self.comparator, self.rhs)
    }
}

#[cfg(test)]
mod test_constraint {
    use super::*;
    use crate::core::literal::Literal;

    fn solution(values: &[bool]) -> Solution {
        let literals = values.iter().enumerate().map(|(i, v)| Literal::from_variable(Variable(i + 1), *v)).collect();
        Solution::try_from_literals(literals, values.len()).unwrap()
    }

    #[test]
    fn display_at_least() {
        let c = Constraint::at_least([Variable(1), Variable(3)], 2);
        assert_eq!("+1 x1 +1 x3 >= 2 ;", format!("{}", c));
    }

    #[test]
    fn display_at_most_is_negated() {
        let c = Constraint::at_most([Variable(1), Variable(2), Variable(3)], 2);
        assert_eq!("-1 x1 -1 x2 -1 x3 >= -2 ;", format!("{}", c));
    }

    #[test]
    fn display_fix() {
        assert_eq!("+1 x4 = 0 ;", format!("{}", Constraint::fix(Variable(4), false)));
        assert_eq!("+1 x4 = 1 ;", format!("{}", Constraint::fix(Variable(4), true)));
    }

    #[test]
    fn evaluation() {
        let s = solution(&[true, false, true]);
        assert!(Constraint::at_least([Variable(1), Variable(2)], 1).is_satisfied_by(&s));
        assert!(!Constraint::at_least([Variable(1), Variable(2)], 2).is_satisfied_by(&s));
        assert!(Constraint::at_most([Variable(1), Variable(2), Variable(3)], 2).is_satisfied_by(&s));
        assert!(!Constraint::at_most([Variable(1), Variable(2), Variable(3)], 1).is_satisfied_by(&s));
        assert!(Constraint::fix(Variable(2), false).is_satisfied_by(&s));
        assert!(!Constraint::fix(Variable(3), false).is_satisfied_by(&s));
    }

    #[test]
    fn empty_constraint_cannot_reach_positive_degree() {
        let c = Constraint::at_least([], 1);
        assert_eq!(">= 1 ;", format!("{}", c));
        assert!(!c.is_satisfied_by(&solution(&[true, true])));
    }
}
