// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! The suspend hook: walks every base, consults the freezer delta, and
//! arms the RTC for the earliest future wakeup.

use std::time::Duration;

use kernel::{debug, warn};
use kernel::FreezerDelta;

use crate::posix_timer::{arm_rtc_for, AlarmClockFacade};

/// Invoked by the platform's power-management subsystem at suspend.
/// Never fails: if anything is amiss (no RTC registered, both bases
/// empty and no freezer delta published) it simply leaves the RTC idle,
/// because blocking suspend on an alarm-subsystem problem is worse than
/// missing the wakeup.
pub fn suspend(facade: &AlarmClockFacade, freezer_delta: &FreezerDelta) {
    // Lock ordering: freezer-delta first, then per base.
    let mut min = freezer_delta.take();

    for base in facade.bases() {
        let Some(head) = base.head_expiry() else { continue };
        let delta = head.saturating_duration_since(base.now());
        if min == Duration::ZERO || delta < min {
            min = delta;
        }
    }

    if min == Duration::ZERO {
        debug!("suspend hook: no alarm pending, leaving RTC idle");
        return;
    }

    let Some(rtc) = facade.rtc() else {
        debug!("suspend hook: no RTC registered, leaving RTC idle");
        return;
    };

    debug!("suspend hook: arming RTC for {:?}", min);
    arm_rtc_for(rtc, min);
}
