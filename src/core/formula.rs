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

//! A pseudo-Boolean formula in the textual format read by the solver (OPB). A file looks like
//!
//! * #variable= 4 #constraint= 2
//! * free text metadata, one comment line per entry
//! +1 x1 +1 x2 +1 x4 >= 1 ;
//! -1 x1 -1 x2 -1 x3 -1 x4 >= -3 ;
//!
//! The header is always derived from the constraints held by the formula when it is rendered, so
//! that the declared number of constraints can never be stale. Formulas are never modified:
//! appending constraints creates a new formula.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::constraint::Constraint;
use super::solution::Solution;
use crate::error::FormulaError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    number_variables: usize,
    metadata: Vec<String>,
    constraints: Vec<Constraint>,
}

impl Formula {

    pub fn new(number_variables: usize, metadata: Vec<String>, constraints: Vec<Constraint>) -> Self {
        Self {
            number_variables,
            metadata,
            constraints,
        }
    }

    /// Returns a new formula made of this formula followed by the given constraints
    pub fn with_constraints(&self, constraints: impl IntoIterator<Item = Constraint>) -> Formula {
        let mut extended = self.clone();
        extended.constraints.extend(constraints);
        extended
    }

    /// Returns the header line `* #variable= <n> #constraint= <m>`
    pub fn header(&self) -> String {
        format!("* #variable= {} #constraint= {}", self.number_variables, self.number_constraints())
    }

    pub fn number_variables(&self) -> usize {
        self.number_variables
    }

    pub fn number_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn metadata(&self) -> &[String] {
        &self.metadata
    }

    /// Returns the first constraint violated by the solution, if any
    pub fn first_violated(&self, solution: &Solution) -> Option<&Constraint> {
        self.constraints.iter().find(|c| !c.is_satisfied_by(solution))
    }

    pub fn is_satisfied_by(&self, solution: &Solution) -> bool {
        self.first_violated(solution).is_none()
    }

    /// Writes the formula in a new file. An existing file is overwritten.
    pub fn write_to(&self, path: &Path) -> Result<(), FormulaError> {
        let io_error = |source| FormulaError::Io { path: path.to_path_buf(), source };
        let file = File::create(path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        write!(writer, "{}", self).map_err(io_error)?;
        writer.flush().map_err(io_error)
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.header())?;
        for line in self.metadata.iter() {
            if line.is_empty() {
                writeln!(f, "*")?;
            } else {
                writeln!(f, "* {}", line)?;
            }
        }
        for constraint in self.constraints.iter() {
            writeln!(f, "{}", constraint)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_formula {
    use super::*;
    use crate::core::literal::{Literal, Variable};

    fn small() -> Formula {
        Formula::new(
            3,
            vec!["test formula".to_string(), String::new()],
            vec![
                Constraint::at_least([Variable(1), Variable(2)], 1),
                Constraint::at_most([Variable(1), Variable(2), Variable(3)], 1),
            ],
        )
    }

    #[test]
    fn render() {
        let expected = "* #variable= 3 #constraint= 2\n* test formula\n*\n+1 x1 +1 x2 >= 1 ;\n-1 x1 -1 x2 -1 x3 >= -1 ;\n";
        assert_eq!(expected, format!("{}", small()));
    }

    #[test]
    fn appending_updates_header_and_keeps_original() {
        let original = small();
        let extended = original.with_constraints([Constraint::fix(Variable(3), false), Constraint::fix(Variable(1), true)]);
        assert_eq!("* #variable= 3 #constraint= 2", original.header());
        assert_eq!("* #variable= 3 #constraint= 4", extended.header());
        assert_eq!(&original.constraints()[..], &extended.constraints()[..2]);
        assert!(format!("{}", extended).ends_with("+1 x3 = 0 ;\n+1 x1 = 1 ;\n"));
    }

    #[test]
    fn satisfaction() {
        let literals = vec![Literal::from_variable(Variable(1), true), Literal::from_variable(Variable(2), false), Literal::from_variable(Variable(3), false)];
        let s = Solution::try_from_literals(literals, 3).unwrap();
        assert!(small().is_satisfied_by(&s));
        let blocked = small().with_constraints([s.blocking_constraint()]);
        assert!(!blocked.is_satisfied_by(&s));
        assert_eq!(Some(&s.blocking_constraint()), blocked.first_violated(&s));
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.opb");
        small().write_to(&path).unwrap();
        assert_eq!(format!("{}", small()), std::fs::read_to_string(&path).unwrap());
    }
}
