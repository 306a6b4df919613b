// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! Six end-to-end scenarios run against the reference platform
//! (`ScriptedSystem`): real `ClockBase`/`Alarm` wiring, a
//! `VirtualClock` a test steps by hand, and a `ManualTimer` a test fires
//! by hand to stand in for "the hardware timer callback ran".

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use boards_sim::ScriptedSystem;
use capsules_core::nsleep::{nsleep, NsleepOutcome, RemainingTimeSink, SleepRequest};
use capsules_core::suspend::suspend;
use capsules_core::ClockId;
use kernel::hil::clock::Instant;
use kernel::hil::timer::HighResTimer;
use kernel::{Alarm, AlarmType, WakeAlarmCapability};

fn cap() -> WakeAlarmCapability {
    unsafe { WakeAlarmCapability::new() }
}

#[test]
fn scenario_1_one_shot_fire() {
    let sys = ScriptedSystem::new();
    let base = sys.facade.base(ClockId::BoottimeAlarm).clone();
    let fired = Arc::new(AtomicU32::new(0));
    let fired2 = fired.clone();
    let alarm = Arc::new(Alarm::new(AlarmType::Boottime, Box::new(move || {
        fired2.fetch_add(1, Ordering::SeqCst);
    })));

    base.start(&alarm, Instant::from_nanos(5), None);
    assert!(sys.boottime_timer.is_armed());

    sys.boottime_clock.set_nanos(5);
    sys.boottime_timer.fire();

    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!alarm.is_enabled());
    assert!(base.is_empty());
    assert!(!sys.boottime_timer.is_armed());
}

#[test]
fn scenario_2_periodic_drift_free() {
    let sys = ScriptedSystem::new();
    let base = sys.facade.base(ClockId::BoottimeAlarm).clone();
    let count = Arc::new(AtomicU32::new(0));
    let count2 = count.clone();
    let alarm = Arc::new(Alarm::new(AlarmType::Boottime, Box::new(move || {
        count2.fetch_add(1, Ordering::SeqCst);
    })));

    base.start(&alarm, Instant::from_nanos(10), Some(Duration::from_nanos(3)));
    sys.boottime_clock.set_nanos(19);
    sys.boottime_timer.fire();

    assert_eq!(count.load(Ordering::SeqCst), 3);
    assert_eq!(alarm.expires(), Instant::from_nanos(19));
    assert!(alarm.is_enabled());
}

#[test]
fn scenario_3_cancel_before_fire() {
    let sys = ScriptedSystem::new();
    let base = sys.facade.base(ClockId::BoottimeAlarm).clone();
    let fired = Arc::new(AtomicU32::new(0));
    let fired2 = fired.clone();
    let alarm = Arc::new(Alarm::new(AlarmType::Boottime, Box::new(move || {
        fired2.fetch_add(1, Ordering::SeqCst);
    })));

    base.start(&alarm, Instant::from_nanos(100), None);
    sys.boottime_clock.set_nanos(50);
    base.cancel(&alarm);

    assert!(!alarm.is_enabled());
    assert!(base.is_empty());
    assert!(!sys.boottime_timer.is_armed());
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

struct CapturingSink {
    remaining: Mutex<Option<Duration>>,
}

impl RemainingTimeSink for CapturingSink {
    fn write(&self, remaining: Duration) -> bool {
        *self.remaining.lock().unwrap() = Some(remaining);
        true
    }
}

#[test]
fn scenario_4_nsleep_interrupted_by_signal() {
    let sys = ScriptedSystem::new();
    sys.realtime_clock.set_nanos(0);

    let sink = Arc::new(CapturingSink { remaining: Mutex::new(None) });
    let sink_for_thread = sink.clone();
    let facade = sys.facade.clone();
    let freezer_delta = sys.freezer_delta.clone();
    let freezer = sys.freezer.clone();
    let scheduler = sys.scheduler.clone();

    let handle = std::thread::spawn(move || {
        nsleep(
            &facade,
            &freezer_delta,
            freezer.as_ref(),
            scheduler.as_ref(),
            cap(),
            ClockId::RealtimeAlarm,
            SleepRequest::Relative(Duration::from_millis(1000)),
            Some(sink_for_thread.as_ref()),
        )
    });

    // Give the sleeping thread time to reach `park`, then advance the
    // virtual clock to t=300ms and deliver a signal.
    std::thread::sleep(Duration::from_millis(30));
    sys.realtime_clock.set_nanos(300_000_000);
    sys.scheduler.raise_signal();

    let outcome = handle.join().unwrap().expect("nsleep should not error");
    match outcome {
        NsleepOutcome::Interrupted { policy, restart } => {
            assert_eq!(policy, kernel::RestartPolicy::AutoRestart);
            assert!(restart.is_some());
        }
        NsleepOutcome::Fired => panic!("expected interruption, not a normal fire"),
    }

    let remaining = sink.remaining.lock().unwrap().expect("remaining time recorded");
    assert!(
        remaining >= Duration::from_millis(650) && remaining <= Duration::from_millis(750),
        "remaining was {remaining:?}"
    );
    assert!(sys.facade.base(ClockId::RealtimeAlarm).is_empty());
}

#[test]
fn scenario_5_suspend_picks_earliest() {
    let sys = ScriptedSystem::new();
    let realtime = sys.facade.base(ClockId::RealtimeAlarm).clone();
    let boottime = sys.facade.base(ClockId::BoottimeAlarm).clone();

    let a = Arc::new(Alarm::new(AlarmType::Realtime, Box::new(|| {})));
    realtime.start(&a, Instant::from_nanos(30_000_000_000), None);
    let b = Arc::new(Alarm::new(AlarmType::Boottime, Box::new(|| {})));
    boottime.start(&b, Instant::from_nanos(10_000_000_000), None);

    suspend(&sys.facade, &sys.freezer_delta);

    assert_eq!(sys.rtc.armed_delta(), Some(Duration::from_secs(10)));
}

#[test]
fn scenario_6_freezer_delta_wins() {
    let sys = ScriptedSystem::new();
    let realtime = sys.facade.base(ClockId::RealtimeAlarm).clone();

    let a = Arc::new(Alarm::new(AlarmType::Realtime, Box::new(|| {})));
    realtime.start(&a, Instant::from_nanos(60_000_000_000), None);
    sys.freezer_delta.publish(Duration::from_secs(5));

    suspend(&sys.facade, &sys.freezer_delta);

    assert_eq!(sys.rtc.armed_delta(), Some(Duration::from_secs(5)));
    assert_eq!(sys.freezer_delta.take(), Duration::ZERO);
}

#[test]
fn suspend_leaves_rtc_idle_when_nothing_pending() {
    let sys = ScriptedSystem::new();
    suspend(&sys.facade, &sys.freezer_delta);
    assert_eq!(sys.rtc.armed_delta(), None);
}

