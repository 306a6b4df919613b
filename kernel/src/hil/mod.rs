// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! Hardware-independent layer (HIL): the traits the alarm-timer core is
//! written against. A concrete platform (see the `chips-sim` crate for a
//! reference one) supplies one implementation of each trait; the core never
//! names a concrete backend directly.

pub mod clock;
pub mod freezer;
pub mod rtc;
pub mod timer;
