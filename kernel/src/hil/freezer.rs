// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! Downward interfaces the freezer-aware nsleep path consumes: the
//! freezer's "is this task being frozen" query, and the scheduler's
//! park/unpark/signal-pending primitives a task blocks on.

use std::sync::Arc;

/// A wake token a blocked task parks on and another context unparks.
/// Implementations must make `unpark` idempotent: firing it twice (e.g. a
/// racing alarm callback and a restart) must not double-wake or panic.
///
/// Returned as an `Arc` rather than a `Box`: the alarm callback and the
/// parked task each need their own handle to the same token.
pub trait WaitHandle: Send + Sync {
    /// Block the calling thread until `unpark` is called or a signal
    /// becomes pending, whichever happens first.
    fn park(&self);

    /// Wake a thread blocked in `park`. Idempotent.
    fn unpark(&self);
}

/// The scheduler primitives the nsleep path rides on.
pub trait Scheduler: Send + Sync {
    /// Create a fresh wait handle for one sleep attempt.
    fn new_wait_handle(&self) -> Arc<dyn WaitHandle>;

    /// Whether a signal is pending for the calling task. Nsleep treats a
    /// pending signal as an interruption.
    fn signal_pending(&self) -> bool;
}

/// Queried by the nsleep path to decide whether to publish into the
/// freezer-delta global.
pub trait Freezer: Send + Sync {
    /// Whether the calling task is currently eligible to be frozen for
    /// suspend.
    fn is_freezing(&self) -> bool;
}
