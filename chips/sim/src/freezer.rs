// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! A `Freezer` a test can flip, standing in for the real freezer
//! subsystem's "is this task being frozen" query.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use kernel::hil::freezer::Freezer;

pub struct FlagFreezer {
    freezing: AtomicBool,
}

impl FlagFreezer {
    pub fn new() -> Arc<Self> {
        Arc::new(FlagFreezer { freezing: AtomicBool::new(false) })
    }

    pub fn set_freezing(&self, freezing: bool) {
        self.freezing.store(freezing, Ordering::SeqCst);
    }
}

impl Freezer for FlagFreezer {
    fn is_freezing(&self) -> bool {
        self.freezing.load(Ordering::SeqCst)
    }
}
