// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! The upward-facing half of the alarm-timer subsystem: the posix-clock
//! façade, freezer-aware nsleep, and the suspend hook, all built on the
//! `kernel` crate's core primitives.

pub mod clock_id;
pub mod nsleep;
pub mod posix_timer;
pub mod suspend;

pub use clock_id::ClockId;
pub use nsleep::{nsleep, restart, NsleepOutcome, RemainingTimeSink, RestartBlock, SleepRequest};
pub use posix_timer::{AlarmClockFacade, EventSink, PosixTimer, TimerSettings, MIN_TIMER_INTERVAL};
pub use suspend::suspend;
