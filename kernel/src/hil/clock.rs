// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! A reference clock: the pure function each `ClockBase` reads to learn
//! "now", plus the resolution the posix-clock façade reports through
//! `getres`.
//!
//! Deliberately does not abstract over a rolling hardware counter width
//! (`Ticks`) and a `Frequency` marker type: the alarm core here runs
//! against a host clock wide enough that wraparound never matters within a
//! process lifetime. Instants are nanoseconds since a clock-specific epoch
//! (wall-clock epoch for `Realtime`, boot for `Boottime`); the two are
//! never compared against each other, only within their own base.

use std::time::Duration;

/// An absolute instant on one particular reference clock, in nanoseconds
/// since that clock's epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(u64);

impl Instant {
    pub const ZERO: Instant = Instant(0);

    pub fn from_nanos(nanos: u64) -> Self {
        Instant(nanos)
    }

    pub fn as_nanos(self) -> u64 {
        self.0
    }

    /// Saturating `self + d`, so an absurdly large relative sleep cannot
    /// wrap around to a near-past deadline.
    pub fn saturating_add(self, d: Duration) -> Self {
        Instant(self.0.saturating_add(d.as_nanos().min(u64::MAX as u128) as u64))
    }

    /// `self + n * d`, used to advance a periodic alarm's expiry by whole
    /// periods, always counted from the previous expiry and never from
    /// `now`.
    pub fn checked_add_periods(self, d: Duration, n: u32) -> Option<Self> {
        let step = d.as_nanos().checked_mul(n as u128)?;
        let step: u64 = step.try_into().ok()?;
        self.0.checked_add(step).map(Instant)
    }

    /// Saturating `self - other`, zero if `other` is later than `self`.
    pub fn saturating_duration_since(self, other: Self) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(other.0))
    }
}

impl std::ops::Add<Duration> for Instant {
    type Output = Instant;
    fn add(self, rhs: Duration) -> Instant {
        self.saturating_add(rhs)
    }
}

/// Names the reference clock a `ClockBase` is built on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockKind {
    /// Wall-clock time; subject to NTP/user adjustment.
    Realtime,
    /// Monotonic time since boot; never steps backwards or is adjusted.
    Boottime,
}

/// A pure function returning the current time on some reference clock.
pub trait Clock: Send + Sync {
    /// Which reference clock this is.
    fn kind(&self) -> ClockKind;

    /// The current time on this clock.
    fn now(&self) -> Instant;

    /// The resolution of the underlying reference clock, as reported by
    /// `getres`.
    fn resolution(&self) -> Duration;
}
