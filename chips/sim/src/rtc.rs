// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! An in-memory `RtcDevice`, standing in for the real wakealarm-capable
//! RTC hardware a platform would discover at boot.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant as StdInstant};

use kernel::hil::rtc::RtcDevice;

pub struct InMemoryRtc {
    origin: StdInstant,
    armed: Mutex<Option<Duration>>,
}

impl InMemoryRtc {
    pub fn new() -> Arc<Self> {
        Arc::new(InMemoryRtc { origin: StdInstant::now(), armed: Mutex::new(None) })
    }

    /// The delta last programmed by `set_wake_alarm`, or `None` if the
    /// wakeup has since been cleared or was never armed. Exposed for
    /// tests to assert on.
    pub fn armed_delta(&self) -> Option<Duration> {
        *self.armed.lock().unwrap()
    }
}

impl RtcDevice for InMemoryRtc {
    fn supports_wakealarm(&self) -> bool {
        true
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn set_wake_alarm(&self, delta: Duration) {
        *self.armed.lock().unwrap() = Some(delta);
    }

    fn clear_wake_alarm(&self) {
        *self.armed.lock().unwrap() = None;
    }
}
