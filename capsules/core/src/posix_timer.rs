// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! The posix-clock façade: maps `ClockId` to a `ClockBase` and
//! implements `getres`, `clock_get`, `timer_create/set/get/del`.
//!
//! A thin driver built entirely on `kernel`'s HIL-backed primitives, with
//! no knowledge of any concrete backend.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use kernel::hil::clock::Instant;
use kernel::hil::rtc::RtcDevice;
use kernel::{debug, warn};
use kernel::{Alarm, AlarmError, AlarmType, ClockBase, WakeAlarmCapability, NUM_TYPES};

use crate::clock_id::ClockId;

/// Floor below which `timer_set` clamps any requested interval, to keep
/// a misbehaving caller from monopolizing the dispatch loop. A policy
/// choice, not a semantic requirement — kept as a named constant rather
/// than a magic number so the policy is easy to find and retune.
pub const MIN_TIMER_INTERVAL: Duration = Duration::from_micros(100);

/// A timer's current expiry and period, as reported by `timer_get` and
/// handed back from `timer_set` when the caller asks for the old
/// settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerSettings {
    pub expires: Instant,
    pub period: Option<Duration>,
}

/// Delivers a timer-expiry event to whatever is waiting on a
/// `PosixTimer` (a signal queue, a channel, ...). Returns whether the
/// event was actually delivered; `timer_create`'s embedded alarm
/// callback bumps the timer's overrun counter when this returns `false`.
pub trait EventSink: Send + Sync {
    fn deliver(&self) -> bool;
}

struct TimerCore {
    sink: Box<dyn EventSink>,
    overrun: AtomicU32,
}

/// A user-visible posix timer: an embedded `Alarm` plus an overrun
/// counter and the event sink its callback feeds.
pub struct PosixTimer {
    alarm: Arc<Alarm>,
    core: Arc<TimerCore>,
    clock_id: ClockId,
}

impl PosixTimer {
    pub fn clock_id(&self) -> ClockId {
        self.clock_id
    }

    /// Number of expiry events that fired but could not be delivered.
    pub fn overrun(&self) -> u32 {
        self.core.overrun.load(Ordering::SeqCst)
    }
}

/// Façade state: one `ClockBase` per `AlarmType`, plus the lazily
/// discovered wakealarm-capable RTC every façade operation requires: if
/// none has been discovered, every operation reports "not supported".
pub struct AlarmClockFacade {
    bases: [Arc<ClockBase>; NUM_TYPES],
    rtc: OnceLock<Arc<dyn RtcDevice>>,
}

impl AlarmClockFacade {
    pub fn new(realtime: Arc<ClockBase>, boottime: Arc<ClockBase>) -> Arc<Self> {
        let mut bases: [Option<Arc<ClockBase>>; NUM_TYPES] = Default::default();
        bases[AlarmType::Realtime.index()] = Some(realtime);
        bases[AlarmType::Boottime.index()] = Some(boottime);
        Arc::new(AlarmClockFacade {
            bases: bases.map(|b| b.expect("both bases supplied")),
            rtc: OnceLock::new(),
        })
    }

    /// Records the one wakealarm-capable RTC the platform discovered at
    /// boot; arbitrating between multiple RTCs is out of scope. Returns
    /// `false` if a device was already registered.
    pub fn register_rtc(&self, rtc: Arc<dyn RtcDevice>) -> bool {
        self.rtc.set(rtc).is_ok()
    }

    pub fn rtc(&self) -> Option<&Arc<dyn RtcDevice>> {
        self.rtc.get()
    }

    pub fn base(&self, clock: ClockId) -> &Arc<ClockBase> {
        &self.bases[clock.alarm_type().index()]
    }

    pub fn bases(&self) -> &[Arc<ClockBase>; NUM_TYPES] {
        &self.bases
    }

    fn require_rtc(&self) -> Result<(), AlarmError> {
        if self.rtc.get().map(|r| r.supports_wakealarm()).unwrap_or(false) {
            Ok(())
        } else {
            Err(AlarmError::Unsupported)
        }
    }

    /// **getres(clock)**.
    pub fn getres(&self, clock: ClockId) -> Result<Duration, AlarmError> {
        self.require_rtc()?;
        Ok(self.base(clock).resolution())
    }

    /// **clock_get(clock)**.
    pub fn clock_get(&self, clock: ClockId) -> Result<Instant, AlarmError> {
        self.require_rtc()?;
        Ok(self.base(clock).now())
    }

    /// **timer_create(timer)**: requires the wake-alarm capability;
    /// initializes an embedded alarm whose callback generates a
    /// timer-expiry event and increments the overrun counter if delivery
    /// fails.
    pub fn timer_create(
        &self,
        clock: ClockId,
        _cap: WakeAlarmCapability,
        sink: Box<dyn EventSink>,
    ) -> Result<Arc<PosixTimer>, AlarmError> {
        self.require_rtc()?;
        let core = Arc::new(TimerCore { sink, overrun: AtomicU32::new(0) });
        let core_for_callback = core.clone();
        let alarm = Arc::new(Alarm::new(
            clock.alarm_type(),
            Box::new(move || {
                if !core_for_callback.sink.deliver() {
                    core_for_callback.overrun.fetch_add(1, Ordering::SeqCst);
                    debug!("timer-expiry event dropped, overrun incremented");
                }
            }),
        ));
        Ok(Arc::new(PosixTimer { alarm, core, clock_id: clock }))
    }

    /// **timer_set(timer, flags, new, old)**: clamps an interval below
    /// `MIN_TIMER_INTERVAL` up to it; optionally reports the pre-existing
    /// settings; cancels then restarts the embedded alarm with the new
    /// absolute expiry and interval.
    pub fn timer_set(
        &self,
        timer: &PosixTimer,
        new: TimerSettings,
        want_old: bool,
    ) -> Option<TimerSettings> {
        let old = want_old.then(|| self.timer_get(timer));
        let period = new.period.map(|p| p.max(MIN_TIMER_INTERVAL));
        let base = self.base(timer.clock_id);
        base.cancel(&timer.alarm);
        base.start(&timer.alarm, new.expires, period);
        old
    }

    /// **timer_get(timer, out)**.
    pub fn timer_get(&self, timer: &PosixTimer) -> TimerSettings {
        TimerSettings { expires: timer.alarm.expires(), period: timer.alarm.period() }
    }

    /// **timer_del(timer)**.
    pub fn timer_del(&self, timer: &PosixTimer) {
        self.base(timer.clock_id).cancel(&timer.alarm);
    }
}

/// Arms the RTC for `min` in the future, or leaves it idle if `min` is
/// zero ("unset"). Shared by the suspend hook; lives here because it is
/// the one place that actually touches the `RtcDevice`.
pub(crate) fn arm_rtc_for(rtc: &Arc<dyn RtcDevice>, min: Duration) {
    if min < Duration::from_secs(1) {
        warn!("suspend wakeup in {:?}, unusually short — check caller", min);
    }
    rtc.clear_wake_alarm();
    rtc.set_wake_alarm(min);
}
