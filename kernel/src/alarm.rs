// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! The `Alarm` data type and the two-member `AlarmType` sum it is
//! keyed by.

use std::sync::Mutex;
use std::time::Duration;

use crate::hil::clock::Instant;

/// Closed enumeration of the clock bases an alarm can be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlarmType {
    Realtime,
    Boottime,
}

/// Compile-time count of `AlarmType` variants.
pub const NUM_TYPES: usize = 2;

impl AlarmType {
    pub const ALL: [AlarmType; NUM_TYPES] = [AlarmType::Realtime, AlarmType::Boottime];

    pub fn index(self) -> usize {
        match self {
            AlarmType::Realtime => 0,
            AlarmType::Boottime => 1,
        }
    }
}

/// The callback invoked when an alarm fires. Invoked with the owning
/// base's lock released.
pub type AlarmFn = Box<dyn Fn() + Send + Sync>;

/// Mutable fields guarded by `Alarm::state`. All structural mutation of
/// these happens either under this lock alone (disabling) or under this
/// lock nested inside the owning base's lock (enqueue/remove).
struct AlarmState {
    expires: Instant,
    /// `None` for a one-shot alarm; `Some(period)` for periodic.
    period: Option<Duration>,
    /// True iff this alarm is currently linked into a base's queue.
    enabled: bool,
    /// Bumped every time this alarm is (re)enqueued, so a stale queue
    /// entry (one invalidated by `remove`, or superseded by a later
    /// `start`) can recognize itself as stale when popped. See
    /// `ClockBase`'s lazy-deletion note.
    generation: u64,
}

/// A one-shot or periodic event bound to a base clock, a deadline and a
/// callback.
///
/// An `Alarm` is created detached and disabled (`init`); callers
/// attach it to its base with `ClockBase::start` and detach it with
/// `ClockBase::cancel`. The core never frees an alarm's memory: in this
/// Rust rendition, an `Alarm` is always held behind an `Arc`, and it is
/// reclaimed like any other reference-counted value once the last handle
/// (including any still-queued heap entry) is dropped.
pub struct Alarm {
    alarm_type: AlarmType,
    function: AlarmFn,
    state: Mutex<AlarmState>,
}

impl Alarm {
    /// `init(alarm, type, function)`: detached, disabled, zero
    /// period.
    pub fn new(alarm_type: AlarmType, function: AlarmFn) -> Self {
        Alarm {
            alarm_type,
            function,
            state: Mutex::new(AlarmState {
                expires: Instant::ZERO,
                period: None,
                enabled: false,
                generation: 0,
            }),
        }
    }

    pub fn alarm_type(&self) -> AlarmType {
        self.alarm_type
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().unwrap().enabled
    }

    pub fn expires(&self) -> Instant {
        self.state.lock().unwrap().expires
    }

    pub fn period(&self) -> Option<Duration> {
        self.state.lock().unwrap().period
    }

    pub(crate) fn invoke(&self) {
        (self.function)();
    }

    pub(crate) fn generation(&self) -> u64 {
        self.state.lock().unwrap().generation
    }

    /// Marks the alarm linked with the given schedule, bumping its
    /// generation. Called by `ClockBase` under the base lock.
    pub(crate) fn attach(&self, expires: Instant, period: Option<Duration>) -> u64 {
        let mut st = self.state.lock().unwrap();
        st.expires = expires;
        st.period = period;
        st.enabled = true;
        st.generation += 1;
        st.generation
    }

    /// Marks the alarm unlinked. Called by `ClockBase` under the base
    /// lock.
    pub(crate) fn detach(&self) {
        let mut st = self.state.lock().unwrap();
        st.enabled = false;
    }

    /// Advances `expires` by one period, from the *previous* expiry (not
    /// from `now`), preserving phase. Keeps the alarm
    /// linked and bumps its generation so the new heap entry is
    /// recognized as current.
    pub(crate) fn rearm_periodic(&self) -> Option<(Instant, u64)> {
        let mut st = self.state.lock().unwrap();
        let period = st.period?;
        st.expires = st.expires.checked_add_periods(period, 1).unwrap_or(st.expires);
        st.enabled = true;
        st.generation += 1;
        Some((st.expires, st.generation))
    }
}
