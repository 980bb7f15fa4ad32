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

//! # Group Allocation Model (`group-alloc-model`)
//!
//! Data model for splitting a pool of items into fixed-capacity groups.
//! Builds on the primitives of `group-alloc-core`.
//!
//! ## Key Data Structures
//!
//! - **`FeatureCatalog`**: maps feature labels to bit positions in first-seen
//!   order. Every item vector of a problem shares its layout.
//!
//! - **`Item`**: an id assigned in input order, its feature labels and the
//!   derived `BitVector`.
//!
//! - **`Problem`**: the item pool plus the declared group capacities, in
//!   declaration order. Built through `ProblemBuilder` or parsed from the
//!   text format in [`io`].
//!
//! - **`Solution`**: the groups that reached their capacity, together with
//!   `SolutionStats` and a `validate` check against the originating problem.
//!
//! The [`generator`] module produces seeded synthetic instances for
//! benchmarks and tests.

pub mod catalog;
pub mod err;
pub mod generator;
pub mod io;
pub mod item;
pub mod problem;
pub mod sol;

pub mod prelude {
    pub use crate::catalog::FeatureCatalog;
    pub use crate::err::{
        FeatureCountMismatchError, InvalidNumberError, ParseError, ProblemBuildError,
        SolutionValidationError, UnknownFeatureError, WrongGroupSizeError,
    };
    pub use crate::generator::{
        InstanceGenConfig, InstanceGenConfigBuildError, InstanceGenConfigBuilder,
        InstanceGenerator,
    };
    pub use crate::item::Item;
    pub use crate::problem::{Problem, ProblemBuilder, ProblemStats};
    pub use crate::sol::{GroupAssignment, Solution, SolutionStats};
}
