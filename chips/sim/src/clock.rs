// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! Reference `Clock` implementations: one backed by `SystemTime` (for
//! `REALTIME`), one backed by `Instant` (for `BOOTTIME`) — and a `Virtual`
//! variant a test can step by hand for scenarios that script the clock
//! rather than sleeping in real time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant as StdInstant, SystemTime, UNIX_EPOCH};

use kernel::hil::clock::{Clock, ClockKind, Instant};

/// Wall-clock time, read from `SystemTime` — backs the REALTIME base.
pub struct WallClock;

impl Clock for WallClock {
    fn kind(&self) -> ClockKind {
        ClockKind::Realtime
    }

    fn now(&self) -> Instant {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_nanos()
            .min(u64::MAX as u128) as u64;
        Instant::from_nanos(nanos)
    }

    fn resolution(&self) -> Duration {
        Duration::from_nanos(1)
    }
}

/// Monotonic-since-boot time, read from `std::time::Instant` relative to
/// process start — backs the BOOTTIME base.
pub struct BootClock {
    origin: StdInstant,
}

impl BootClock {
    pub fn new() -> Arc<Self> {
        Arc::new(BootClock { origin: StdInstant::now() })
    }
}

impl Clock for BootClock {
    fn kind(&self) -> ClockKind {
        ClockKind::Boottime
    }

    fn now(&self) -> Instant {
        Instant::from_nanos(self.origin.elapsed().as_nanos().min(u64::MAX as u128) as u64)
    }

    fn resolution(&self) -> Duration {
        Duration::from_nanos(1)
    }
}

/// A clock a test steps by hand, used by the end-to-end scenario tests
/// that script monotonically increasing values on a base clock without
/// depending on wall-clock timing.
pub struct VirtualClock {
    kind: ClockKind,
    now: AtomicU64,
}

impl VirtualClock {
    pub fn new(kind: ClockKind) -> Arc<Self> {
        Arc::new(VirtualClock { kind, now: AtomicU64::new(0) })
    }

    pub fn set_nanos(&self, nanos: u64) {
        self.now.store(nanos, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_nanos().min(u64::MAX as u128) as u64, Ordering::SeqCst);
    }
}

impl Clock for VirtualClock {
    fn kind(&self) -> ClockKind {
        self.kind
    }

    fn now(&self) -> Instant {
        Instant::from_nanos(self.now.load(Ordering::SeqCst))
    }

    fn resolution(&self) -> Duration {
        Duration::from_nanos(1)
    }
}
