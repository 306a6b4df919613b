// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! Reference `HighResTimer` implementations: a real one backed by a
//! condvar-guarded deadline and a background dispatch thread, and a
//! manual one a scripted test fires by hand.

use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use kernel::hil::clock::{Clock, Instant};
use kernel::hil::timer::{HighResTimer, HighResTimerClient};

struct Shared {
    deadline: Mutex<Option<Instant>>,
    condvar: Condvar,
    client: Mutex<Option<Arc<dyn HighResTimerClient>>>,
}

/// A software high-resolution timer: a background thread parks on a
/// condvar until the programmed deadline elapses on the owning clock,
/// then invokes the installed callback.
pub struct SoftwareHighResTimer {
    shared: Arc<Shared>,
}

impl SoftwareHighResTimer {
    pub fn new(clock: Arc<dyn Clock>) -> Arc<Self> {
        let shared = Arc::new(Shared {
            deadline: Mutex::new(None),
            condvar: Condvar::new(),
            client: Mutex::new(None),
        });
        let worker_shared = shared.clone();
        thread::spawn(move || dispatch_loop(worker_shared, clock));
        Arc::new(SoftwareHighResTimer { shared })
    }
}

fn dispatch_loop(shared: Arc<Shared>, clock: Arc<dyn Clock>) {
    loop {
        let mut deadline = shared.deadline.lock().unwrap();
        match *deadline {
            None => {
                // Nothing armed; wait to be woken by `start_absolute`.
                deadline = shared.condvar.wait(deadline).unwrap();
                drop(deadline);
            }
            Some(d) => {
                let now = clock.now();
                if now >= d {
                    *deadline = None;
                    drop(deadline);
                    if let Some(client) = shared.client.lock().unwrap().clone() {
                        client.fired();
                    }
                } else {
                    let wait_for = d.saturating_duration_since(now).min(std::time::Duration::from_millis(50));
                    let (guard, _timeout) = shared.condvar.wait_timeout(deadline, wait_for).unwrap();
                    drop(guard);
                }
            }
        }
    }
}

impl HighResTimer for SoftwareHighResTimer {
    fn set_client(&self, client: Arc<dyn HighResTimerClient>) {
        *self.shared.client.lock().unwrap() = Some(client);
    }

    fn start_absolute(&self, deadline: Instant) {
        *self.shared.deadline.lock().unwrap() = Some(deadline);
        self.shared.condvar.notify_all();
    }

    fn try_cancel(&self) -> bool {
        let mut deadline = self.shared.deadline.lock().unwrap();
        let was_armed = deadline.is_some();
        *deadline = None;
        was_armed
    }

    fn is_armed(&self) -> bool {
        self.shared.deadline.lock().unwrap().is_some()
    }
}

/// A timer a scripted test fires by calling [`ManualTimer::fire`],
/// pairing with [`crate::clock::VirtualClock`] for deterministic
/// end-to-end scenarios with no real-time sleeping involved.
pub struct ManualTimer {
    armed: Mutex<Option<Instant>>,
    client: Mutex<Option<Arc<dyn HighResTimerClient>>>,
}

impl ManualTimer {
    pub fn new() -> Arc<Self> {
        Arc::new(ManualTimer { armed: Mutex::new(None), client: Mutex::new(None) })
    }

    /// Invokes the installed callback as if the hardware timer fired,
    /// regardless of the programmed deadline — the test is responsible
    /// for only calling this once the virtual clock has actually reached
    /// it.
    pub fn fire(&self) {
        if let Some(client) = self.client.lock().unwrap().clone() {
            client.fired();
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        *self.armed.lock().unwrap()
    }
}

impl HighResTimer for ManualTimer {
    fn set_client(&self, client: Arc<dyn HighResTimerClient>) {
        *self.client.lock().unwrap() = Some(client);
    }

    fn start_absolute(&self, deadline: Instant) {
        *self.armed.lock().unwrap() = Some(deadline);
    }

    fn try_cancel(&self) -> bool {
        let mut armed = self.armed.lock().unwrap();
        let was_armed = armed.is_some();
        *armed = None;
        was_armed
    }

    fn is_armed(&self) -> bool {
        self.armed.lock().unwrap().is_some()
    }
}
