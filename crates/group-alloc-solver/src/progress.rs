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

use tracing::info;

/// A snapshot of pool consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    consumed: usize,
    total: usize,
    percent: u8,
}

impl Progress {
    pub fn new(consumed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            (consumed.min(total) * 100 / total) as u8
        };
        Self {
            consumed,
            total,
            percent,
        }
    }

    #[inline]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Floored percentage of the initial pool that has been assigned.
    #[inline]
    pub fn percent(&self) -> u8 {
        self.percent
    }
}

/// Receives progress notifications from the allocation driver. Observers
/// have no influence on the run.
pub trait ProgressObserver {
    fn on_progress(&mut self, progress: Progress);
}

impl<O: ProgressObserver + ?Sized> ProgressObserver for &mut O {
    #[inline]
    fn on_progress(&mut self, progress: Progress) {
        (**self).on_progress(progress)
    }
}

impl ProgressObserver for Vec<Progress> {
    fn on_progress(&mut self, progress: Progress) {
        self.push(progress);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn on_progress(&mut self, progress: Progress) {
        info!(
            consumed = progress.consumed(),
            total = progress.total(),
            "{}%",
            progress.percent()
        );
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    #[inline]
    fn on_progress(&mut self, _progress: Progress) {}
}

/// Emits one `Progress` each time consumption enters a new `step`-percent
/// bucket. Several buckets crossed at once yield a single notification.
#[derive(Debug, Clone)]
pub(crate) struct ProgressTracker {
    total: usize,
    step: u8,
    last_bucket: u8,
}

impl ProgressTracker {
    pub(crate) fn new(total: usize, step: u8) -> Self {
        Self {
            total,
            step: step.max(1),
            last_bucket: 0,
        }
    }

    pub(crate) fn update(&mut self, consumed: usize) -> Option<Progress> {
        if self.total == 0 {
            return None;
        }
        let progress = Progress::new(consumed, self.total);
        let bucket = progress.percent() / self.step;
        if bucket <= self.last_bucket {
            return None;
        }
        self.last_bucket = bucket;
        Some(progress)
    }
}
