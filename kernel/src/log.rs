// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! Hand-rolled `debug!`/`trace!`/`warn!` macros.
//!
//! A kernel-level crate has no use for a pulled-in logging façade: a
//! `debug!` macro that prefixes the caller's module path and is compiled
//! out entirely unless a feature is enabled does the whole job, without
//! depending on the `log` crate — nothing downstream of this crate needs
//! a pluggable subscriber, just lines on stderr during development.

/// Enabled when the `trace-log` feature is on; otherwise every call
/// compiles to nothing.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "trace-log")]
        {
            eprintln!("[trace {}] {}", module_path!(), format_args!($($arg)*));
        }
        #[cfg(not(feature = "trace-log"))]
        {
            let _ = format_args!($($arg)*);
        }
    };
}

/// Enabled when either `trace-log` or `debug-log` is on.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(any(feature = "trace-log", feature = "debug-log"))]
        {
            eprintln!("[debug {}] {}", module_path!(), format_args!($($arg)*));
        }
        #[cfg(not(any(feature = "trace-log", feature = "debug-log")))]
        {
            let _ = format_args!($($arg)*);
        }
    };
}

/// Always compiled in: diagnostics worth seeing even in a release build
/// (e.g. the suspend hook's sub-one-second warning).
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!("[warn {}] {}", module_path!(), format_args!($($arg)*));
    };
}
