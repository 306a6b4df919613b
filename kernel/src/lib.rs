// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! Core alarm-timer subsystem: the per-base priority queue, its
//! high-resolution dispatch, and the alarm lifecycle. Everything above
//! this crate (the posix-clock façade, freezer-aware nsleep, the suspend
//! hook) is built on top of the types exported here; see `capsules-core`.

pub mod alarm;
pub mod capabilities;
pub mod clock_base;
pub mod errorcode;
pub mod freezer_delta;
pub mod hil;
pub mod log;

pub use alarm::{Alarm, AlarmType, NUM_TYPES};
pub use capabilities::WakeAlarmCapability;
pub use clock_base::ClockBase;
pub use errorcode::{AlarmError, RestartPolicy};
pub use freezer_delta::FreezerDelta;
