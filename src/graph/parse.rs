//! Graph text format.
//!
//! ```text
//! <num_vertices> <num_edges>
//! <x> <y>            # num_vertices lines
//! <a> <b> <weight>   # num_edges lines
//! ```
//!
//! Blank lines are ignored. Vertex ids are implicit (line order).

use super::types::{Edge, Graph, Point};
use crate::error::ParseError;
use std::path::Path;
use std::str::FromStr;

/// Reads and parses a graph file.
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph, ParseError> {
    let text = std::fs::read_to_string(path)?;
    parse_graph(&text)
}

/// Parses a graph from its text representation.
///
/// # Examples
///
/// ```
/// use u_coverage::graph::parse_graph;
///
/// let g = parse_graph("3 2\n0 0\n1 0\n2 0\n0 1 1\n1 2 2.5\n").unwrap();
/// assert_eq!(g.num_nodes(), 3);
/// assert_eq!(g.edge_weight(2, 1).unwrap(), 2.5);
/// ```
pub fn parse_graph(text: &str) -> Result<Graph, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (num_vertices, num_edges) = match lines.next() {
        Some((_, header)) => parse_header(header)?,
        None => return Err(ParseError::Header(String::new())),
    };

    // Header counts are untrusted; every entry needs at least one byte of input
    let mut vertices = Vec::with_capacity(num_vertices.min(text.len()));
    for _ in 0..num_vertices {
        let Some((line, text)) = lines.next() else {
            return Err(ParseError::Truncated {
                expected: num_vertices,
                found: vertices.len(),
            });
        };
        let [x, y] = fields(text, line)?;
        vertices.push(Point::new(parse_field(x, line)?, parse_field(y, line)?));
    }

    let mut edges = Vec::with_capacity(num_edges.min(text.len()));
    for (line, text) in lines {
        let [a, b, weight] = fields(text, line)?;
        edges.push(Edge::new(
            parse_field(a, line)?,
            parse_field(b, line)?,
            parse_field(weight, line)?,
        ));
    }
    if edges.len() != num_edges {
        return Err(ParseError::EdgeCount {
            expected: num_edges,
            found: edges.len(),
        });
    }

    Ok(Graph::new(vertices, edges)?)
}

fn parse_header(header: &str) -> Result<(usize, usize), ParseError> {
    let invalid = || ParseError::Header(header.to_string());
    let mut parts = header.split_whitespace();
    let (Some(v), Some(e), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    let v = v.parse().map_err(|_| invalid())?;
    let e = e.parse().map_err(|_| invalid())?;
    Ok((v, e))
}

/// Splits a line into exactly `N` whitespace-separated fields.
fn fields<const N: usize>(text: &str, line: usize) -> Result<[&str; N], ParseError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let found = parts.len();
    parts.try_into().map_err(|_| ParseError::Line {
        line,
        message: format!("expected {N} fields, found {found}"),
    })
}

fn parse_field<T: FromStr>(field: &str, line: usize) -> Result<T, ParseError> {
    field.parse().map_err(|_| ParseError::Line {
        line,
        message: format!("invalid number {field:?}"),
    })
}
