// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! The single hardware-backed high-resolution timer each `ClockBase`
//! reprograms to the soonest head expiry. A callback is installed once,
//! and `start_absolute`/`try_cancel` arm and disarm a single outstanding
//! deadline.

use std::sync::Arc;

use super::clock::Instant;

/// Callback invoked when a `HighResTimer`'s programmed deadline elapses.
///
/// Mirrors `hil::time::AlarmClient`: the timer MUST be considered disarmed
/// by the time this fires, and the dispatch engine is solely responsible
/// for reprogramming it afterwards.
pub trait HighResTimerClient: Send + Sync {
    fn fired(&self);
}

/// A single hardware-backed high-resolution timer, absolute-mode only.
///
/// Exactly one `HighResTimer` is owned by each `ClockBase`; the core never
/// shares one `HighResTimer` between bases.
pub trait HighResTimer: Send + Sync {
    /// Install the callback invoked when the programmed deadline elapses.
    /// Replaces any previously installed callback.
    fn set_client(&self, client: Arc<dyn HighResTimerClient>);

    /// Arm the timer to fire at `deadline`, in absolute mode. Replaces any
    /// previously programmed deadline.
    fn start_absolute(&self, deadline: Instant);

    /// Disarm the timer. Best-effort: if the callback is already in
    /// flight, this cannot retract it.
    ///
    /// Returns `true` if the timer was armed and is now disarmed, `false`
    /// if it was already disarmed.
    fn try_cancel(&self) -> bool;

    /// Whether the timer currently has a programmed deadline.
    fn is_armed(&self) -> bool;
}
