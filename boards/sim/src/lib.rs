// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! Wires two `ClockBase`s (REALTIME, BOOTTIME) against `chips-sim`'s
//! reference HIL implementations, the way a board crate wires a chip's
//! alarm peripheral into a `VirtualMuxAlarm`.
//!
//! Two variants are provided: [`System::production`], built on real wall
//! and monotonic clocks for the demo binary, and [`ScriptedSystem::new`],
//! built on [`chips_sim::VirtualClock`]/[`chips_sim::ManualTimer`] so
//! integration tests can script exact expiry sequences.

use std::sync::Arc;

use capsules_core::posix_timer::AlarmClockFacade;
use chips_sim::{BootClock, FlagFreezer, InMemoryRtc, ManualTimer, SoftwareHighResTimer, ThreadScheduler, VirtualClock, WallClock};
use kernel::hil::clock::ClockKind;
use kernel::{ClockBase, FreezerDelta};

/// The wiring a production deployment would boot with: wall-clock and
/// monotonic reference clocks, each driving its own software
/// high-resolution dispatch timer.
pub struct System {
    pub facade: Arc<AlarmClockFacade>,
    pub freezer_delta: Arc<FreezerDelta>,
    pub freezer: Arc<FlagFreezer>,
    pub scheduler: Arc<ThreadScheduler>,
    pub rtc: Arc<InMemoryRtc>,
}

impl System {
    pub fn production() -> Arc<Self> {
        let realtime_clock = Arc::new(WallClock);
        let realtime_timer = SoftwareHighResTimer::new(realtime_clock.clone());
        let realtime_base = ClockBase::new(realtime_clock, realtime_timer);

        let boottime_clock = BootClock::new();
        let boottime_timer = SoftwareHighResTimer::new(boottime_clock.clone());
        let boottime_base = ClockBase::new(boottime_clock, boottime_timer);

        let facade = AlarmClockFacade::new(realtime_base, boottime_base);
        let rtc = InMemoryRtc::new();
        facade.register_rtc(rtc.clone());

        Arc::new(System {
            facade,
            freezer_delta: Arc::new(FreezerDelta::new()),
            freezer: FlagFreezer::new(),
            scheduler: ThreadScheduler::new(),
            rtc,
        })
    }
}

/// The wiring the end-to-end scenario tests script directly: a
/// [`VirtualClock`] per base, fired by calling the paired
/// [`ManualTimer::fire`] once the test has advanced the clock far enough
/// — standing in for "the hardware timer callback ran" without any real
/// waiting.
pub struct ScriptedSystem {
    pub facade: Arc<AlarmClockFacade>,
    pub freezer_delta: Arc<FreezerDelta>,
    pub freezer: Arc<FlagFreezer>,
    pub scheduler: Arc<ThreadScheduler>,
    pub rtc: Arc<InMemoryRtc>,
    pub realtime_clock: Arc<VirtualClock>,
    pub realtime_timer: Arc<ManualTimer>,
    pub boottime_clock: Arc<VirtualClock>,
    pub boottime_timer: Arc<ManualTimer>,
}

impl ScriptedSystem {
    pub fn new() -> Arc<Self> {
        let realtime_clock = VirtualClock::new(ClockKind::Realtime);
        let realtime_timer = ManualTimer::new();
        let realtime_base = ClockBase::new(realtime_clock.clone(), realtime_timer.clone());

        let boottime_clock = VirtualClock::new(ClockKind::Boottime);
        let boottime_timer = ManualTimer::new();
        let boottime_base = ClockBase::new(boottime_clock.clone(), boottime_timer.clone());

        let facade = AlarmClockFacade::new(realtime_base, boottime_base);
        let rtc = InMemoryRtc::new();
        facade.register_rtc(rtc.clone());

        Arc::new(ScriptedSystem {
            facade,
            freezer_delta: Arc::new(FreezerDelta::new()),
            freezer: FlagFreezer::new(),
            scheduler: ThreadScheduler::new(),
            rtc,
            realtime_clock,
            realtime_timer,
            boottime_clock,
            boottime_timer,
        })
    }
}
