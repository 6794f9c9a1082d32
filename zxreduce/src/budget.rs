// QuiZX - Rust library for quantum circuit rewriting and optimisation
//         using the ZX-calculus
// Copyright (C) 2021 - Aleks Kissinger
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cooperative limits on long-running passes.
//!
//! A [Budget] is checked between rewrites and between search steps. It never
//! interrupts a rewrite half way through, so a diagram is always left in a
//! sound state when a pass halts early.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The reason a pass stopped before reaching its fixed point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
#[serde(rename_all = "snake_case")]
pub enum Halt {
    #[error("rewrite limit reached")]
    RewriteLimit,
    #[error("deadline passed")]
    Deadline,
    #[error("cancelled")]
    Cancelled,
}

/// A deadline and a cancellation flag, both optional.
///
/// Cloning a budget shares the cancellation flag, so setting it from another
/// thread halts every pass holding a clone.
#[derive(Debug, Clone, Default)]
pub struct Budget {
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Budget {
    /// A budget that never runs out.
    pub fn unlimited() -> Self {
        Budget::default()
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set the deadline, keeping the earlier one if a deadline is already set.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(d) if d < deadline => d,
            _ => deadline,
        });
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the reason to stop, if any. Cancellation wins over the deadline.
    pub fn check(&self) -> Result<(), Halt> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(Halt::Cancelled);
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Halt::Deadline);
            }
        }
        Ok(())
    }

    pub fn is_exhausted(&self) -> bool {
        self.check().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_halts() {
        let b = Budget::unlimited();
        assert_eq!(b.check(), Ok(()));
        assert!(!b.is_exhausted());
    }

    #[test]
    fn zero_timeout_halts() {
        let b = Budget::unlimited().with_timeout(Duration::ZERO);
        assert_eq!(b.check(), Err(Halt::Deadline));
    }

    #[test]
    fn earlier_deadline_wins() {
        let now = Instant::now();
        let b = Budget::unlimited()
            .with_deadline(now)
            .with_deadline(now + Duration::from_secs(3600));
        assert_eq!(b.deadline(), Some(now));
    }

    #[test]
    fn cancel_flag_is_shared() {
        let flag = Arc::new(AtomicBool::new(false));
        let b = Budget::unlimited()
            .with_timeout(Duration::ZERO)
            .with_cancel_flag(flag.clone());
        let b1 = b.clone();
        assert_eq!(b1.check(), Err(Halt::Deadline));
        flag.store(true, Ordering::Relaxed);
        assert_eq!(b1.check(), Err(Halt::Cancelled));
    }
}
