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

//! This module reads back a formula written by `Formula::write_to`. Only the subset of the OPB
//! format produced by the encoder is accepted: unit coefficients, variables named `x<id>` with
//! 1 <= id <= n, and the comparators `>=` and `=`. The declared number of constraints must match
//! the number of constraint lines.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::constraint::{Comparator, Constraint, Term};
use crate::core::formula::Formula;
use crate::core::literal::Variable;
use crate::error::FormulaError;

/// Returns the integer following `key` in the header line, tolerating spaces after the `=`
fn header_value(line: &str, key: &str) -> Option<usize> {
    let start = line.find(key)? + key.len();
    let value = line[start..].trim_start();
    let end = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    value[..end].parse::<usize>().ok()
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    if !line.starts_with('*') {
        return None;
    }
    Some((header_value(line, "#variable=")?, header_value(line, "#constraint=")?))
}

fn parse_constraint(line: &str, number_variables: usize) -> Result<Constraint, String> {
    let body = line.trim_end().strip_suffix(';').ok_or_else(|| "missing terminating `;`".to_string())?;
    let mut tokens = body.split_whitespace();
    let mut terms: Vec<Term> = vec![];
    let comparator = loop {
        let token = tokens.next().ok_or_else(|| "missing comparator".to_string())?;
        let negated = match token {
            ">=" => break Comparator::AtLeast,
            "=" => break Comparator::Equal,
            "+1" | "1" => false,
            "-1" => true,
            _ => return Err(format!("unsupported coefficient {}", token)),
        };
        let name = tokens.next().ok_or_else(|| format!("coefficient {} without variable", token))?;
        let variable = name.parse::<Variable>().map_err(|_| format!("invalid variable {}", name))?;
        if variable.0 > number_variables {
            return Err(format!("variable {} is not declared in the header", variable));
        }
        terms.push(if negated { Term::negative(variable) } else { Term::positive(variable) });
    };
    let rhs = tokens.next().ok_or_else(|| "missing right-hand side".to_string())?;
    let rhs = rhs.parse::<i64>().map_err(|_| format!("invalid right-hand side {}", rhs))?;
    if let Some(token) = tokens.next() {
        return Err(format!("unexpected token {} after the right-hand side", token));
    }
    Ok(Constraint::new(terms, comparator, rhs))
}

pub fn formula_from_file(filepath: &Path) -> Result<Formula, FormulaError> {
    let io_error = |source| FormulaError::Io { path: filepath.to_path_buf(), source };
    let file = File::open(filepath).map_err(io_error)?;
    let reader = BufReader::new(file);
    let mut header: Option<(usize, usize)> = None;
    let mut metadata: Vec<String> = vec![];
    let mut constraints: Vec<Constraint> = vec![];
    for (i, l) in reader.lines().enumerate() {
        let line = l.map_err(io_error)?;
        let Some((number_variables, _)) = header else {
            if line.trim().is_empty() {
                continue;
            }
            header = parse_header(&line);
            if header.is_none() {
                return Err(FormulaError::MissingHeader { path: filepath.to_path_buf() });
            }
            continue;
        };
        if let Some(comment) = line.strip_prefix('*') {
            metadata.push(comment.strip_prefix(' ').unwrap_or(comment).to_string());
        } else if !line.trim().is_empty() {
            let constraint = parse_constraint(&line, number_variables)
                .map_err(|reason| FormulaError::Parse { path: filepath.to_path_buf(), line: i + 1, reason })?;
            constraints.push(constraint);
        }
    }
    let Some((number_variables, declared)) = header else {
        return Err(FormulaError::MissingHeader { path: filepath.to_path_buf() });
    };
    if declared != constraints.len() {
        return Err(FormulaError::HeaderMismatch { path: filepath.to_path_buf(), declared, actual: constraints.len() });
    }
    Ok(Formula::new(number_variables, metadata, constraints))
}

#[cfg(test)]
mod test_opb {
    use super::*;
    use std::io::Write;

    fn write(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn read_written_formula() {
        let formula = Formula::new(
            4,
            vec!["metadata".to_string(), String::new(), "node  idx".to_string()],
            vec![
                Constraint::at_least([Variable(1), Variable(2)], 1),
                Constraint::at_most([Variable(1), Variable(2), Variable(3), Variable(4)], 2),
                Constraint::fix(Variable(4), true),
            ],
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.opb");
        formula.write_to(&path).unwrap();
        assert_eq!(formula, formula_from_file(&path).unwrap());
    }

    #[test]
    fn header_without_spaces() {
        let file = write("* #variable=2 #constraint=1\n1 x1 -1 x2 >= 0;\n");
        let formula = formula_from_file(file.path()).unwrap();
        assert_eq!(2, formula.number_variables());
        assert_eq!("+1 x1 -1 x2 >= 0 ;", format!("{}", formula.constraints()[0]));
    }

    #[test]
    fn stale_header_is_rejected() {
        let file = write("* #variable= 2 #constraint= 1\n+1 x1 >= 1 ;\n+1 x2 >= 1 ;\n");
        assert!(matches!(formula_from_file(file.path()), Err(FormulaError::HeaderMismatch { declared: 1, actual: 2, .. })));
    }

    #[test]
    fn missing_header() {
        let file = write("+1 x1 >= 1 ;\n");
        assert!(matches!(formula_from_file(file.path()), Err(FormulaError::MissingHeader { .. })));
        let file = write("");
        assert!(matches!(formula_from_file(file.path()), Err(FormulaError::MissingHeader { .. })));
    }

    #[test]
    fn invalid_constraints() {
        for (content, line) in [
            ("* #variable= 2 #constraint= 1\n+2 x1 >= 1 ;\n", 2),
            ("* #variable= 2 #constraint= 1\n* meta\n+1 x3 >= 1 ;\n", 3),
            ("* #variable= 2 #constraint= 1\n+1 x1 >= 1\n", 2),
            ("* #variable= 2 #constraint= 1\n+1 x1 <= 1 ;\n", 2),
            ("* #variable= 2 #constraint= 1\n+1 y1 >= 1 ;\n", 2),
        ] {
            let file = write(content);
            match formula_from_file(file.path()) {
                Err(FormulaError::Parse { line: l, .. }) => assert_eq!(line, l),
                other => panic!("unexpected result {:?} for {:?}", other, content),
            }
        }
    }
}
