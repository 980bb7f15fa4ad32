// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Plain-text problem and solution formats.
//!
//! Input: a header `M C2 C3 ... Ck` where `M` is the number of items and `Cj`
//! the number of groups of capacity `j` (the first count is for capacity 2),
//! followed by `M` lines `L f1 ... fL`. Blank lines are ignored.
//!
//! Output: the number of complete groups, then one line per group,
//! `capacity id1 id2 ...`.

use crate::{
    err::{FeatureCountMismatchError, InvalidNumberError, ParseError},
    problem::{Problem, ProblemBuilder},
    sol::Solution,
};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};
use tracing::debug;

/// Capacity of the group kind counted by the first header field after `M`.
pub const FIRST_HEADER_CAPACITY: usize = 2;

#[inline]
fn parse_count(line: usize, token: &str) -> Result<usize, InvalidNumberError> {
    token
        .parse::<usize>()
        .map_err(|_| InvalidNumberError::new(line, token))
}

pub fn parse_problem<R: BufRead>(reader: R) -> Result<Problem, ParseError> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(ix, l)| (ix + 1, l))
        .filter(|(_, l)| !matches!(l, Ok(s) if s.trim().is_empty()));

    let (header_no, header) = match lines.next() {
        Some((no, line)) => (no, line?),
        None => return Err(ParseError::MissingHeader),
    };
    let mut header_tokens = header.split_whitespace();
    let declared_items = match header_tokens.next() {
        Some(tok) => parse_count(header_no, tok)?,
        None => return Err(ParseError::MissingHeader),
    };

    let mut builder = ProblemBuilder::new();
    for (ix, tok) in header_tokens.enumerate() {
        let count = parse_count(header_no, tok)?;
        builder
            .add_groups(FIRST_HEADER_CAPACITY + ix, count)
            .map_err(|error| ParseError::Header {
                line: header_no,
                error,
            })?;
    }

    let mut found = 0usize;
    for (no, line) in lines {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let declared = match tokens.next() {
            Some(tok) => parse_count(no, tok)?,
            None => continue,
        };
        let labels: Vec<&str> = tokens.collect();
        if labels.len() != declared {
            return Err(FeatureCountMismatchError::new(no, declared, labels.len()).into());
        }
        builder.add_item(labels);
        found += 1;
    }

    if found != declared_items {
        return Err(ParseError::ItemCountMismatch {
            declared: declared_items,
            found,
        });
    }

    let problem = builder.build()?;
    debug!(
        items = problem.item_count(),
        groups = problem.group_count(),
        features = problem.feature_len(),
        "Parsed problem"
    );
    Ok(problem)
}

pub fn read_problem_file(path: impl AsRef<Path>) -> Result<Problem, ParseError> {
    let file = File::open(path)?;
    parse_problem(BufReader::new(file))
}

pub fn write_solution<W: Write>(mut writer: W, solution: &Solution) -> io::Result<()> {
    write!(writer, "{solution}")?;
    writer.flush()
}

pub fn write_solution_file(path: impl AsRef<Path>, solution: &Solution) -> io::Result<()> {
    let file = File::create(path)?;
    write_solution(BufWriter::new(file), solution)
}

/// Writes `problem` in the input format. Groups are regrouped by capacity,
/// so declaration order is normalised to ascending capacity.
pub fn write_problem<W: Write>(mut writer: W, problem: &Problem) -> io::Result<()> {
    if let Some(&cap) = problem
        .capacities()
        .iter()
        .find(|&&c| c < FIRST_HEADER_CAPACITY)
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("capacity {cap} cannot be expressed in the input header"),
        ));
    }

    let max_cap = problem.capacities().iter().copied().max().unwrap_or(0);
    let mut counts = vec![0usize; max_cap.saturating_sub(FIRST_HEADER_CAPACITY - 1)];
    for &cap in problem.capacities() {
        counts[cap - FIRST_HEADER_CAPACITY] += 1;
    }

    write!(writer, "{}", problem.item_count())?;
    for c in counts {
        write!(writer, " {c}")?;
    }
    writeln!(writer)?;

    for item in problem.items() {
        write!(writer, "{}", item.features().len())?;
        for label in item.features() {
            write!(writer, " {label}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()
}

pub fn write_problem_file(path: impl AsRef<Path>, problem: &Problem) -> io::Result<()> {
    let file = File::create(path)?;
    write_problem(BufWriter::new(file), problem)
}
