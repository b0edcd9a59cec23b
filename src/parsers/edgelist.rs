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

//! This module provides a parser for networks given as edge lists. A valid file looks like
//!
//! % This line is a comment
//! # This one too
//! 1 2
//! 2 3 0.5
//! 3 1
//!
//! A comment marker must be the first character of its line. Each other non-blank line describes
//! an edge by the labels of its two endpoints; any token after the second one is ignored (e.g. a
//! weight). Labels are opaque strings and nodes are numbered in order of first appearance.
//! Duplicate edges collapse, self-loops are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::core::graph::Graph;
use crate::error::IngestError;

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with('%')
}

pub fn graph_from_file(filepath: &Path) -> Result<Graph, IngestError> {
    let io_error = |source| IngestError::Io { path: filepath.to_path_buf(), source };
    let file = File::open(filepath).map_err(io_error)?;
    let reader = BufReader::new(file);
    let mut graph = Graph::new();
    for (i, l) in reader.lines().enumerate() {
        let line = l.map_err(io_error)?;
        let trimmed = line.trim();
        if trimmed.is_empty() || is_comment(&line) {
            continue;
        }
        let mut tokens = trimmed.split_whitespace();
        let (u, v) = match (tokens.next(), tokens.next()) {
            (Some(u), Some(v)) => (u, v),
            _ => return Err(IngestError::MalformedLine { path: filepath.to_path_buf(), line: i + 1, content: line.clone() }),
        };
        let u = graph.add_node(u);
        let v = graph.add_node(v);
        if u == v {
            warn!("{}:{}: skipping self-loop on node {}", filepath.display(), i + 1, graph.label(u));
            continue;
        }
        if !graph.add_edge(u, v) {
            debug!("{}:{}: duplicate edge {} {}", filepath.display(), i + 1, graph.label(u), graph.label(v));
        }
    }
    if graph.number_edges() == 0 {
        return Err(IngestError::Empty { path: filepath.to_path_buf() });
    }
    debug!("read network {} with {} nodes and {} edges", filepath.display(), graph.number_nodes(), graph.number_edges());
    Ok(graph)
}

#[cfg(test)]
mod test_edgelist {
    use super::*;
    use std::io::Write;

    fn write(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn read_with_comments() {
        let file = write("% comment\n# other comment\n1 2\n\n2 3 0.5\n3 1\n");
        let g = graph_from_file(file.path()).unwrap();
        assert_eq!(3, g.number_nodes());
        assert_eq!(3, g.number_edges());
        assert_eq!(vec!["1", "2", "3"], g.nodes_iter().map(|n| g.label(n)).collect::<Vec<&str>>());
    }

    #[test]
    fn comment_marker_must_start_the_line() {
        let file = write("1 2\n  # 3\n");
        let g = graph_from_file(file.path()).unwrap();
        assert_eq!(4, g.number_nodes());
        assert!(g.node("#").is_some());
        assert!(g.node("3").is_some());
    }

    #[test]
    fn duplicates_and_self_loops_are_dropped() {
        let file = write("a b\nb a\nb b\nb c\n");
        let g = graph_from_file(file.path()).unwrap();
        assert_eq!(3, g.number_nodes());
        assert_eq!(2, g.number_edges());
    }

    #[test]
    fn self_loop_introduces_the_node() {
        // The node exists even though its only line is a self-loop
        let file = write("a b\nc c\n");
        let g = graph_from_file(file.path()).unwrap();
        assert_eq!(3, g.number_nodes());
        assert!(g.node("c").is_some());
    }

    #[test]
    fn malformed_line_is_reported() {
        let file = write("1 2\n3\n");
        match graph_from_file(file.path()) {
            Err(IngestError::MalformedLine { line, content, .. }) => {
                assert_eq!(2, line);
                assert_eq!("3", content);
            },
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn no_edges_is_an_error() {
        let file = write("% nothing here\n");
        assert!(matches!(graph_from_file(file.path()), Err(IngestError::Empty { .. })));
        let file = write("a a\n");
        assert!(matches!(graph_from_file(file.path()), Err(IngestError::Empty { .. })));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(graph_from_file(&dir.path().join("missing.edges")), Err(IngestError::Io { .. })));
    }
}
