// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! The error taxonomy surfaced across the upward interface.
//!
//! Kept as a flat, `Copy` enum rather than a boxed/dynamic error type:
//! callers match on a kind, they don't format a message. `Display`/`Error`
//! are implemented by hand rather than derived — no `thiserror` dependency
//! in `kernel`; the alarm-subsystem core has no use for its derive
//! machinery beyond what a short match arm gives us for free.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlarmError {
    /// No wakealarm-capable RTC present, or the clock ID is not an alarm
    /// clock.
    Unsupported,
    /// Caller lacks the wake-alarm capability.
    PermissionDenied,
    /// Copying remaining-time to the caller's out-parameter failed.
    AddressFault,
    /// Nanosleep was woken by a signal before the alarm fired.
    Interrupted,
    /// A timer-expiry event could not be delivered; recorded on the
    /// timer's overrun counter rather than returned directly.
    Overrun,
}

impl fmt::Display for AlarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            AlarmError::Unsupported => "clock or capability not supported",
            AlarmError::PermissionDenied => "caller lacks the wake-alarm capability",
            AlarmError::AddressFault => "failed to deliver remaining time to caller",
            AlarmError::Interrupted => "nanosleep interrupted by a signal",
            AlarmError::Overrun => "timer expiry event could not be delivered",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for AlarmError {}

/// Whether an interrupted nanosleep should ask the restart machinery to
/// resume the call automatically from the nanosleep entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Absolute-time sleeps carry their own deadline; the caller already
    /// knows it, so do not auto-restart.
    NoAutoRestart,
    /// Relative-time sleeps lose their reference point on restart, so the
    /// remaining duration is recorded and the call is auto-restarted.
    AutoRestart,
}
