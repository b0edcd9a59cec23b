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

//! Variables and literals as seen by the pseudo-Boolean solver.
//! A variable is a positive integer id (the solver's grammar does not accept arbitrary names) and
//! is written `x<id>` in formula files. A literal is a variable with a polarity, represented by a
//! signed integer: `x3` is the literal `3` (x3 = 1) and `-x3` is the literal `-3` (x3 = 0).

use std::str::FromStr;

use crate::error::AssignmentError;

/// Abstraction used as a typesafe way of identifying a solver variable. Ids start at 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Variable(pub usize);

impl Variable {
    /// Returns the 0-based position of the variable, to index dense vectors
    pub fn offset(&self) -> usize {
        self.0 - 1
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl FromStr for Variable {
    type Err = AssignmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.strip_prefix('x').map(|id| id.parse::<usize>()) {
            Some(Ok(id)) if id > 0 => Ok(Variable(id)),
            _ => Err(AssignmentError::InvalidLiteral(value.to_string())),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Literal(isize);

impl Literal {

    /// Returns the literal representing the variable with the given polarity
    pub fn from_variable(variable: Variable, polarity: bool) -> Self {
        if polarity {
            Literal(variable.0 as isize)
        } else {
            Literal(-(variable.0 as isize))
        }
    }

    /// Returns true iff the literal has a positive polarity
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Returns the variable represented by the literal
    pub fn variable(&self) -> Variable {
        Variable(self.0.unsigned_abs())
    }

    /// Returns the opposite of the current literal. That is, a literal representing the same
    /// variable but with opposite polarity
    pub fn opposite(&self) -> Literal {
        Literal(-self.0)
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_positive() {
            write!(f, "{}", self.variable())
        } else {
            write!(f, "-{}", self.variable())
        }
    }
}

impl FromStr for Literal {
    type Err = AssignmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (polarity, name) = match value.strip_prefix('-') {
            Some(rest) => (false, rest),
            None => (true, value),
        };
        let variable = name.parse::<Variable>().map_err(|_| AssignmentError::InvalidLiteral(value.to_string()))?;
        Ok(Literal::from_variable(variable, polarity))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.variable().cmp(&other.variable()).then(self.is_positive().cmp(&other.is_positive()))
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
