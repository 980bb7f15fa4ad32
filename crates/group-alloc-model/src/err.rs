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

use group_alloc_core::{
    bitvec::BitPositionOutOfBoundsError,
    id::{GroupId, ItemId},
};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownFeatureError {
    label: String,
}

impl UnknownFeatureError {
    #[inline]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Display for UnknownFeatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Feature '{}' is not in the catalog", self.label)
    }
}

impl std::error::Error for UnknownFeatureError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemBuildError {
    ZeroCapacity,
    /// The declared groups cannot be stored.
    TooManyGroups { capacity: usize, count: usize },
    /// The sum of all declared capacities exceeds `usize::MAX`.
    CapacityOverflow { capacity: usize, count: usize },
    UnknownFeature(UnknownFeatureError),
    Encoding(BitPositionOutOfBoundsError),
}

impl Display for ProblemBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemBuildError::ZeroCapacity => write!(f, "Group capacity must be positive"),
            ProblemBuildError::TooManyGroups { capacity, count } => write!(
                f,
                "Cannot declare {count} groups of capacity {capacity}: too many groups"
            ),
            ProblemBuildError::CapacityOverflow { capacity, count } => write!(
                f,
                "Declaring {count} groups of capacity {capacity} overflows the total capacity"
            ),
            ProblemBuildError::UnknownFeature(e) => write!(f, "{e}"),
            ProblemBuildError::Encoding(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ProblemBuildError {}

impl From<UnknownFeatureError> for ProblemBuildError {
    fn from(value: UnknownFeatureError) -> Self {
        ProblemBuildError::UnknownFeature(value)
    }
}

impl From<BitPositionOutOfBoundsError> for ProblemBuildError {
    fn from(value: BitPositionOutOfBoundsError) -> Self {
        ProblemBuildError::Encoding(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvalidNumberError {
    line: usize,
    token: String,
}

impl InvalidNumberError {
    #[inline]
    pub fn new(line: usize, token: impl Into<String>) -> Self {
        Self {
            line,
            token: token.into(),
        }
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl Display for InvalidNumberError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Line {}: expected a non-negative integer, found '{}'",
            self.line, self.token
        )
    }
}

impl std::error::Error for InvalidNumberError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureCountMismatchError {
    line: usize,
    declared: usize,
    found: usize,
}

impl FeatureCountMismatchError {
    #[inline]
    pub fn new(line: usize, declared: usize, found: usize) -> Self {
        Self {
            line,
            declared,
            found,
        }
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn declared(&self) -> usize {
        self.declared
    }

    #[inline]
    pub fn found(&self) -> usize {
        self.found
    }
}

impl Display for FeatureCountMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Line {}: item declares {} features but lists {}",
            self.line, self.declared, self.found
        )
    }
}

impl std::error::Error for FeatureCountMismatchError {}

#[derive(Debug)]
pub enum ParseError {
    Io(std::io::Error),
    MissingHeader,
    InvalidNumber(InvalidNumberError),
    ItemCountMismatch { declared: usize, found: usize },
    FeatureCountMismatch(FeatureCountMismatchError),
    /// The header declares groups that cannot be built.
    Header {
        line: usize,
        error: ProblemBuildError,
    },
    Build(ProblemBuildError),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "I/O error while reading input: {e}"),
            ParseError::MissingHeader => write!(f, "Input is empty: missing header line"),
            ParseError::InvalidNumber(e) => write!(f, "{e}"),
            ParseError::ItemCountMismatch { declared, found } => write!(
                f,
                "Header declares {declared} items but the input lists {found}"
            ),
            ParseError::FeatureCountMismatch(e) => write!(f, "{e}"),
            ParseError::Header { line, error } => write!(f, "Line {line}: {error}"),
            ParseError::Build(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            ParseError::Header { error, .. } => Some(error),
            ParseError::Build(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(value: std::io::Error) -> Self {
        ParseError::Io(value)
    }
}

impl From<InvalidNumberError> for ParseError {
    fn from(value: InvalidNumberError) -> Self {
        ParseError::InvalidNumber(value)
    }
}

impl From<FeatureCountMismatchError> for ParseError {
    fn from(value: FeatureCountMismatchError) -> Self {
        ParseError::FeatureCountMismatch(value)
    }
}

impl From<ProblemBuildError> for ParseError {
    fn from(value: ProblemBuildError) -> Self {
        ParseError::Build(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WrongGroupSizeError {
    group: GroupId,
    capacity: usize,
    found: usize,
}

impl WrongGroupSizeError {
    #[inline]
    pub fn new(group: GroupId, capacity: usize, found: usize) -> Self {
        Self {
            group,
            capacity,
            found,
        }
    }

    #[inline]
    pub fn group(&self) -> GroupId {
        self.group
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn found(&self) -> usize {
        self.found
    }
}

impl Display for WrongGroupSizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Group {} has capacity {} but holds {} items",
            self.group, self.capacity, self.found
        )
    }
}

impl std::error::Error for WrongGroupSizeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionValidationError {
    UnknownItem(ItemId),
    DuplicateItem(ItemId),
    WrongGroupSize(WrongGroupSizeError),
    UndeclaredGroup(GroupId),
    DuplicateGroup(GroupId),
    CapacityMismatch(GroupId),
}

impl Display for SolutionValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionValidationError::UnknownItem(id) => write!(f, "Unknown item: {id}"),
            SolutionValidationError::DuplicateItem(id) => {
                write!(f, "Item {id} is assigned to more than one group")
            }
            SolutionValidationError::WrongGroupSize(e) => write!(f, "{e}"),
            SolutionValidationError::UndeclaredGroup(id) => {
                write!(f, "Group {id} was not declared by the problem")
            }
            SolutionValidationError::DuplicateGroup(id) => {
                write!(f, "Group {id} is delivered more than once")
            }
            SolutionValidationError::CapacityMismatch(id) => {
                write!(f, "Group {id} reports a capacity different from its declaration")
            }
        }
    }
}

impl std::error::Error for SolutionValidationError {}
