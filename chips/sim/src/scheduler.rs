// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! A thread-parking `Scheduler`: each wait attempt gets its own
//! condvar-backed [`WaitHandle`], and `raise_signal` flips the shared
//! flag every outstanding `park` polls for.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use kernel::hil::freezer::{Scheduler, WaitHandle};

/// How often a parked wait re-checks the shared signal flag. A real
/// scheduler would wake a blocked task directly on signal delivery;
/// this reference implementation polls instead, which is simpler and
/// plenty fast enough for tests and the demo binary.
const SIGNAL_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct ThreadScheduler {
    signal_pending: Arc<AtomicBool>,
}

impl ThreadScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(ThreadScheduler { signal_pending: Arc::new(AtomicBool::new(false)) })
    }

    /// Simulates a signal being delivered to the calling task.
    pub fn raise_signal(&self) {
        self.signal_pending.store(true, Ordering::SeqCst);
    }

    pub fn clear_signal(&self) {
        self.signal_pending.store(false, Ordering::SeqCst);
    }
}

impl Scheduler for ThreadScheduler {
    fn new_wait_handle(&self) -> Arc<dyn WaitHandle> {
        Arc::new(CondvarWaitHandle {
            woken: Mutex::new(false),
            condvar: Condvar::new(),
            signal_pending: self.signal_pending.clone(),
        })
    }

    fn signal_pending(&self) -> bool {
        self.signal_pending.load(Ordering::SeqCst)
    }
}

struct CondvarWaitHandle {
    woken: Mutex<bool>,
    condvar: Condvar,
    signal_pending: Arc<AtomicBool>,
}

impl WaitHandle for CondvarWaitHandle {
    fn park(&self) {
        let mut woken = self.woken.lock().unwrap();
        while !*woken && !self.signal_pending.load(Ordering::SeqCst) {
            let (guard, _timeout) = self.condvar.wait_timeout(woken, SIGNAL_POLL_INTERVAL).unwrap();
            woken = guard;
        }
    }

    fn unpark(&self) {
        let mut woken = self.woken.lock().unwrap();
        *woken = true;
        self.condvar.notify_all();
    }
}
