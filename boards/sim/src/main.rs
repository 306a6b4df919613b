// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! Demo binary: boots the reference platform, creates a one-shot posix
//! timer on `BOOTTIME_ALARM`, and nanosleeps on `REALTIME_ALARM`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use boards_sim::System;
use capsules_core::posix_timer::TimerSettings;
use capsules_core::{nsleep, ClockId, EventSink, NsleepOutcome, SleepRequest};
use kernel::WakeAlarmCapability;

struct PrintSink {
    fired: Arc<AtomicBool>,
}

impl EventSink for PrintSink {
    fn deliver(&self) -> bool {
        self.fired.store(true, Ordering::SeqCst);
        println!("timer fired");
        true
    }
}

fn main() {
    let system = System::production();

    // Platform boot wiring is the one trusted call site that mints a
    // capability.
    let cap = unsafe { WakeAlarmCapability::new() };

    let fired = Arc::new(AtomicBool::new(false));
    let timer = system
        .facade
        .timer_create(ClockId::BoottimeAlarm, cap, Box::new(PrintSink { fired: fired.clone() }))
        .expect("reference RTC registered at boot");

    let now = system.facade.clock_get(ClockId::BoottimeAlarm).unwrap();
    system.facade.timer_set(
        &timer,
        TimerSettings { expires: now.saturating_add(Duration::from_millis(200)), period: None },
        false,
    );

    while !fired.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(10));
    }

    println!("nanosleeping for 100ms on REALTIME_ALARM");
    match nsleep(
        &system.facade,
        &system.freezer_delta,
        system.freezer.as_ref(),
        system.scheduler.as_ref(),
        cap,
        ClockId::RealtimeAlarm,
        SleepRequest::Relative(Duration::from_millis(100)),
        None,
    ) {
        Ok(NsleepOutcome::Fired) => println!("nsleep woke up normally"),
        Ok(NsleepOutcome::Interrupted { .. }) => println!("nsleep interrupted"),
        Err(e) => println!("nsleep failed: {e}"),
    }
}
