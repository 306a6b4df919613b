// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! The freezer-delta global: the smallest `expiry - now` observed by any
//! freezable task currently blocked in nsleep, consumed (reset to zero) by
//! the suspend hook.
//!
//! Kept as its own small lock rather than folded into a `ClockBase`: a
//! thread never holds a base lock while acquiring this one, or vice versa.

use std::sync::Mutex;
use std::time::Duration;

pub struct FreezerDelta {
    min: Mutex<Duration>,
}

impl FreezerDelta {
    pub fn new() -> Self {
        FreezerDelta { min: Mutex::new(Duration::ZERO) }
    }

    /// Publishes `delta` if it is smaller than whatever is currently
    /// recorded (or nothing has been recorded yet, i.e. the slot reads
    /// zero). Called by the nsleep path when the calling task is freezing.
    pub fn publish(&self, delta: Duration) {
        let mut min = self.min.lock().unwrap();
        if *min == Duration::ZERO || delta < *min {
            *min = delta;
        }
    }

    /// Snapshots the current minimum and resets the slot to "unset". A
    /// zero result means unset.
    pub fn take(&self) -> Duration {
        let mut min = self.min.lock().unwrap();
        let taken = *min;
        *min = Duration::ZERO;
        taken
    }
}

impl Default for FreezerDelta {
    fn default() -> Self {
        Self::new()
    }
}
