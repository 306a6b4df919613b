// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! Property tests for the core dispatch invariants, run against the
//! reference platform with `proptest` driving the sequence of
//! operations.

use std::sync::atomic::Ordering;
use std::sync::{atomic::AtomicU32, Arc};
use std::time::Duration;

use boards_sim::ScriptedSystem;
use capsules_core::posix_timer::{TimerSettings, MIN_TIMER_INTERVAL};
use capsules_core::{ClockId, EventSink};
use kernel::hil::clock::Instant;
use kernel::hil::timer::HighResTimer;
use kernel::{Alarm, AlarmType, WakeAlarmCapability};
use proptest::prelude::*;

fn cap() -> WakeAlarmCapability {
    unsafe { WakeAlarmCapability::new() }
}

#[derive(Clone, Copy, Debug)]
enum Op {
    Start { idx: usize, expiry: u64 },
    Cancel { idx: usize },
}

const NUM_ALARMS: usize = 5;

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..NUM_ALARMS, 0u64..1000).prop_map(|(idx, expiry)| Op::Start { idx, expiry }),
        (0..NUM_ALARMS).prop_map(|idx| Op::Cancel { idx }),
    ]
}

proptest! {
    /// Head correctness, linked-iff-enabled, and dispatch-timer-armed-iff
    /// non-empty-and-programmed-for-the-head — checked after every
    /// operation in an arbitrary start/cancel sequence, with no firing in
    /// between.
    #[test]
    fn p1_p2_p3_hold_after_any_start_cancel_sequence(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let sys = ScriptedSystem::new();
        let base = sys.facade.base(ClockId::BoottimeAlarm).clone();
        let alarms: Vec<Arc<Alarm>> = (0..NUM_ALARMS)
            .map(|_| Arc::new(Alarm::new(AlarmType::Boottime, Box::new(|| {}))))
            .collect();
        let mut model: [Option<u64>; NUM_ALARMS] = [None; NUM_ALARMS];

        for op in ops {
            match op {
                Op::Start { idx, expiry } => {
                    base.start(&alarms[idx], Instant::from_nanos(expiry), None);
                    model[idx] = Some(expiry);
                }
                Op::Cancel { idx } => {
                    base.cancel(&alarms[idx]);
                    model[idx] = None;
                }
            }

            // linked iff enabled
            for (idx, alarm) in alarms.iter().enumerate() {
                prop_assert_eq!(alarm.is_enabled(), model[idx].is_some());
            }

            let expected_min = model.iter().flatten().copied().min();

            // head correctness + dispatch timer tracks the head
            prop_assert_eq!(base.head_expiry().map(Instant::as_nanos), expected_min);
            prop_assert_eq!(sys.boottime_timer.is_armed(), expected_min.is_some());
            if let Some(m) = expected_min {
                prop_assert_eq!(sys.boottime_timer.deadline().map(Instant::as_nanos), Some(m));
            }
        }
    }

    /// A periodic alarm's k-th firing lands exactly on `e0 + k*p`, even
    /// when the clock jumps straight past several periods at once.
    #[test]
    fn p4_periodic_phase_preservation(e0 in 1u64..1_000, p in 1u64..50, k in 1u32..6) {
        let sys = ScriptedSystem::new();
        let base = sys.facade.base(ClockId::BoottimeAlarm).clone();
        let count = Arc::new(AtomicU32::new(0));
        let count2 = count.clone();
        let alarm = Arc::new(Alarm::new(AlarmType::Boottime, Box::new(move || {
            count2.fetch_add(1, Ordering::SeqCst);
        })));

        base.start(&alarm, Instant::from_nanos(e0), Some(Duration::from_nanos(p)));
        let target = e0 + p * k as u64;
        sys.boottime_clock.set_nanos(target);
        sys.boottime_timer.fire();

        prop_assert_eq!(count.load(Ordering::SeqCst), k);
        prop_assert_eq!(alarm.expires(), Instant::from_nanos(target));
        prop_assert!(alarm.is_enabled());
    }

    /// Whatever interval a caller requests through `timer_set`, the
    /// effective period is never below `MIN_TIMER_INTERVAL`.
    #[test]
    fn p5_interval_floor(requested_micros in 0u64..2_000) {
        struct NullSink;
        impl EventSink for NullSink {
            fn deliver(&self) -> bool { true }
        }

        let sys = ScriptedSystem::new();
        let timer = sys
            .facade
            .timer_create(ClockId::BoottimeAlarm, cap(), Box::new(NullSink))
            .expect("rtc registered");

        sys.facade.timer_set(
            &timer,
            TimerSettings {
                expires: Instant::from_nanos(1_000_000),
                period: Some(Duration::from_micros(requested_micros)),
            },
            false,
        );

        let settings = sys.facade.timer_get(&timer);
        prop_assert!(settings.period.unwrap() >= MIN_TIMER_INTERVAL);
    }
}

#[test]
fn p7_cancel_prevents_future_firing() {
    // After cancel returns, the alarm is not enabled, and it will never
    // fire again — demonstrated by firing the (now cancelled) dispatch
    // timer and observing no callback runs.
    let sys = ScriptedSystem::new();
    let base = sys.facade.base(ClockId::BoottimeAlarm).clone();
    let count = Arc::new(AtomicU32::new(0));
    let count2 = count.clone();
    let alarm = Arc::new(Alarm::new(AlarmType::Boottime, Box::new(move || {
        count2.fetch_add(1, Ordering::SeqCst);
    })));

    base.start(&alarm, Instant::from_nanos(10), None);
    base.cancel(&alarm);
    assert!(!alarm.is_enabled());

    sys.boottime_clock.set_nanos(100);
    // The dispatch timer is disarmed; firing it manually anyway must not
    // resurrect the cancelled alarm.
    sys.boottime_timer.fire();
    assert_eq!(count.load(Ordering::SeqCst), 0);
}
