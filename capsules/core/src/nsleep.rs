// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! Freezer-aware nsleep: a task blocks on an alarm, wakeable by the
//! alarm firing, by a pending signal, or by the freezer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kernel::hil::clock::Instant;
use kernel::hil::freezer::{Freezer, Scheduler};
use kernel::{Alarm, AlarmError, FreezerDelta, RestartPolicy, WakeAlarmCapability};

use crate::clock_id::ClockId;
use crate::posix_timer::AlarmClockFacade;

/// Either form a caller's sleep request can take: a duration relative
/// to the base's current time, or an already-absolute deadline on that
/// clock.
#[derive(Clone, Copy, Debug)]
pub enum SleepRequest {
    Relative(Duration),
    Absolute(Instant),
}

/// Delivers the remaining-sleep-time value to the caller's out-parameter
/// on interruption. Returns `false` on an address fault, in which case
/// `nsleep` reports `AlarmError::AddressFault` instead of the usual
/// restart bookkeeping.
pub trait RemainingTimeSink: Send + Sync {
    fn write(&self, remaining: Duration) -> bool;
}

/// Per-task scratch carrying what the restart entry point needs to
/// resume an interrupted nanosleep: `{type, expiry, rmt_ptr}`, with
/// `rmt_ptr` modeled here as the `RemainingTimeSink` the caller
/// re-supplies.
#[derive(Clone, Copy, Debug)]
pub struct RestartBlock {
    pub clock: ClockId,
    pub expires: Instant,
}

/// What `nsleep`/`restart` report once the sleep loop returns.
#[derive(Debug)]
pub enum NsleepOutcome {
    /// The alarm fired normally.
    Fired,
    /// Woken by a signal before the alarm fired.
    Interrupted { policy: RestartPolicy, restart: Option<RestartBlock> },
}

/// **Nanosleep entry point**. Converts a relative request to
/// absolute using the base's current time with saturating addition,
/// enters the sleep loop, and on interruption publishes a freezer delta,
/// fills the remaining-time out-parameter, and reports the restart
/// policy.
#[allow(clippy::too_many_arguments)]
pub fn nsleep(
    facade: &AlarmClockFacade,
    freezer_delta: &FreezerDelta,
    freezer: &dyn Freezer,
    scheduler: &dyn Scheduler,
    _cap: WakeAlarmCapability,
    clock: ClockId,
    request: SleepRequest,
    remaining: Option<&dyn RemainingTimeSink>,
) -> Result<NsleepOutcome, AlarmError> {
    require_rtc(facade)?;
    let base = facade.base(clock);
    let (expires, originally_relative) = match request {
        SleepRequest::Relative(d) => (base.now().saturating_add(d), true),
        SleepRequest::Absolute(i) => (i, false),
    };
    sleep_and_report(facade, freezer_delta, freezer, scheduler, clock, expires, originally_relative, remaining)
}

/// **Restart entry point**. Reconstructs an on-stack alarm from
/// the restart block and re-enters the sleep loop with the *original*
/// absolute expiry. Same freezer handling, same remaining-time handling
/// as the first attempt (a restart block only ever exists for a
/// relative-origin sleep, so it is always treated as one on the way
/// back in).
pub fn restart(
    facade: &AlarmClockFacade,
    freezer_delta: &FreezerDelta,
    freezer: &dyn Freezer,
    scheduler: &dyn Scheduler,
    _cap: WakeAlarmCapability,
    block: RestartBlock,
    remaining: Option<&dyn RemainingTimeSink>,
) -> Result<NsleepOutcome, AlarmError> {
    require_rtc(facade)?;
    sleep_and_report(facade, freezer_delta, freezer, scheduler, block.clock, block.expires, true, remaining)
}

fn require_rtc(facade: &AlarmClockFacade) -> Result<(), AlarmError> {
    match facade.rtc() {
        Some(rtc) if rtc.supports_wakealarm() => Ok(()),
        _ => Err(AlarmError::Unsupported),
    }
}

#[allow(clippy::too_many_arguments)]
fn sleep_and_report(
    facade: &AlarmClockFacade,
    freezer_delta: &FreezerDelta,
    freezer: &dyn Freezer,
    scheduler: &dyn Scheduler,
    clock: ClockId,
    expires: Instant,
    originally_relative: bool,
    remaining: Option<&dyn RemainingTimeSink>,
) -> Result<NsleepOutcome, AlarmError> {
    let base = facade.base(clock);

    if sleep_loop(base, scheduler, clock, expires) {
        return Ok(NsleepOutcome::Fired);
    }

    let now = base.now();
    if freezer.is_freezing() {
        freezer_delta.publish(expires.saturating_duration_since(now));
    }

    if !originally_relative {
        return Ok(NsleepOutcome::Interrupted { policy: RestartPolicy::NoAutoRestart, restart: None });
    }

    let remaining_time = expires.saturating_duration_since(now);
    if let Some(sink) = remaining {
        if !sink.write(remaining_time) {
            return Err(AlarmError::AddressFault);
        }
    }
    Ok(NsleepOutcome::Interrupted {
        policy: RestartPolicy::AutoRestart,
        restart: Some(RestartBlock { clock, expires }),
    })
}

/// The sleep loop itself. Returns `true` if the alarm fired, `false` if
/// a signal interrupted the wait first.
fn sleep_loop(
    base: &Arc<kernel::ClockBase>,
    scheduler: &dyn Scheduler,
    clock: ClockId,
    expires: Instant,
) -> bool {
    loop {
        if scheduler.signal_pending() {
            return false;
        }

        let wait = scheduler.new_wait_handle();
        let fired = Arc::new(AtomicBool::new(false));
        let fired_for_callback = fired.clone();
        let wait_for_callback = wait.clone();
        let alarm = Arc::new(Alarm::new(
            clock.alarm_type(),
            Box::new(move || {
                fired_for_callback.store(true, Ordering::SeqCst);
                wait_for_callback.unpark();
            }),
        ));

        base.start(&alarm, expires, None);
        if !fired.load(Ordering::SeqCst) {
            wait.park();
        }
        base.cancel(&alarm);

        if fired.load(Ordering::SeqCst) {
            return true;
        }
        if scheduler.signal_pending() {
            return false;
        }
        // Spurious wake with no signal pending: loop and re-arm.
    }
}
