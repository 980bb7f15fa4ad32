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

//! # Group Allocation Solver (`group-alloc-solver`)
//!
//! Randomized greedy assembly of fixed-capacity groups from a shared item
//! pool.
//!
//! ## Overview
//!
//! The [`AllocationDriver`](driver::AllocationDriver) walks the declared
//! groups from the largest capacity to the smallest. Each group is seeded
//! with the item at the front of the pool and then grown one item at a time
//! by the [`GroupAssembler`](assembler::GroupAssembler): a fixed number of
//! pool indices is sampled with replacement and the candidate whose feature
//! vector differs most from the group summary joins the group. Distances are
//! memoised per run in a [`DistanceCache`](cache::DistanceCache).
//!
//! Randomness enters only through the [`IndexSampler`](sampler::IndexSampler)
//! seam, so a seeded generator or a scripted index sequence makes a run fully
//! reproducible.

pub mod assembler;
pub mod cache;
pub mod config;
pub mod driver;
pub mod group;
pub mod pool;
pub mod progress;
pub mod sampler;

pub mod prelude {
    pub use crate::assembler::{AssembleError, GroupAssembler, Selection};
    pub use crate::cache::{CacheStats, DistanceCache};
    pub use crate::config::{
        AllocConfig, AllocConfigError, DEFAULT_PROGRESS_STEP_PERCENT, DEFAULT_SAMPLE_SIZE,
        DEFAULT_SEED,
    };
    pub use crate::driver::{AllocError, Allocation, AllocationDriver, processing_order};
    pub use crate::group::{Group, GroupState};
    pub use crate::pool::Pool;
    pub use crate::progress::{NoProgress, Progress, ProgressObserver, TracingProgress};
    pub use crate::sampler::{IndexSampler, RandomIndexSampler, ScriptedIndexSampler};
}
