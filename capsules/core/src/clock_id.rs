// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! The externally visible clock identifiers the posix-clock façade
//! registers operations under, as a closed sum over clock IDs.
//!
//! The mapping to `AlarmType` is intrinsically a two-element sum; an
//! identifier that isn't one of the two is rejected at this boundary
//! rather than silently defaulted to one of them.

use kernel::AlarmType;

/// One of the two alarm-backed posix clocks the façade exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClockId {
    RealtimeAlarm,
    BoottimeAlarm,
}

impl ClockId {
    pub fn alarm_type(self) -> AlarmType {
        match self {
            ClockId::RealtimeAlarm => AlarmType::Realtime,
            ClockId::BoottimeAlarm => AlarmType::Boottime,
        }
    }
}

/// A raw clock identifier as a caller would pass it to `clock_gettime`
/// and friends. Every value other than the two alarm clocks is rejected
/// with an "unsupported" error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawClockId(pub i32);

pub const CLOCK_REALTIME_ALARM: RawClockId = RawClockId(8);
pub const CLOCK_BOOTTIME_ALARM: RawClockId = RawClockId(9);

impl TryFrom<RawClockId> for ClockId {
    type Error = kernel::AlarmError;

    fn try_from(raw: RawClockId) -> Result<Self, Self::Error> {
        match raw {
            CLOCK_REALTIME_ALARM => Ok(ClockId::RealtimeAlarm),
            CLOCK_BOOTTIME_ALARM => Ok(ClockId::BoottimeAlarm),
            _ => Err(kernel::AlarmError::Unsupported),
        }
    }
}
