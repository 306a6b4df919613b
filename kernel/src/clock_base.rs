// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Alarmtimer Contributors 2026.

//! `ClockBase`: one per `AlarmType`, owning the priority queue and the
//! dispatch engine that drains it.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use crate::alarm::Alarm;
use crate::hil::clock::{Clock, ClockKind, Instant};
use crate::hil::timer::{HighResTimer, HighResTimerClient};
use crate::{debug, trace};

/// One entry in a base's priority queue. Carries the `generation` the
/// alarm had when this entry was pushed, so a later `remove` or re-`start`
/// of the same `Alarm` can invalidate this entry without walking the heap
/// (reworked as lazy deletion over
/// a `BinaryHeap`: popped entries whose generation no longer matches the
/// alarm's current generation, or whose alarm is no longer enabled, are
/// silently dropped rather than fired).
struct HeapItem {
    expires: Instant,
    seq: u64,
    generation: u64,
    alarm: Arc<Alarm>,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.expires == other.expires && self.seq == other.seq
    }
}
impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Ties broken by insertion order (`seq`); not otherwise observable.
        self.expires.cmp(&other.expires).then(self.seq.cmp(&other.seq))
    }
}

struct BaseState {
    heap: BinaryHeap<Reverse<HeapItem>>,
}

/// The per-clock-type container of a priority queue and a single dispatch
/// timer.
pub struct ClockBase {
    clock: Arc<dyn Clock>,
    timer: Arc<dyn HighResTimer>,
    state: Mutex<BaseState>,
    next_seq: AtomicU64,
}

impl ClockBase {
    /// Wires a base against its reference clock and dispatch timer,
    /// installing itself as the timer's callback.
    pub fn new(clock: Arc<dyn Clock>, timer: Arc<dyn HighResTimer>) -> Arc<ClockBase> {
        let base = Arc::new(ClockBase {
            clock,
            timer,
            state: Mutex::new(BaseState { heap: BinaryHeap::new() }),
            next_seq: AtomicU64::new(0),
        });
        base.timer.set_client(base.clone() as Arc<dyn HighResTimerClient>);
        base
    }

    pub fn kind(&self) -> ClockKind {
        self.clock.kind()
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn resolution(&self) -> std::time::Duration {
        self.clock.resolution()
    }

    /// Links `alarm` (already marked enabled/attached by
    /// the caller) into the queue. If it becomes the new head, reprogram
    /// the dispatch timer.
    pub(crate) fn enqueue(&self, alarm: &Arc<Alarm>, expires: Instant, generation: u64) {
        let mut st = self.state.lock().unwrap();
        let was_head = Self::peek_valid(&mut st.heap).map(|h| h.expires);
        let seq = self.next_seq.fetch_add(1, AtomicOrdering::Relaxed);
        st.heap.push(Reverse(HeapItem {
            expires,
            seq,
            generation,
            alarm: alarm.clone(),
        }));
        let new_head = Self::peek_valid(&mut st.heap).map(|h| h.expires);
        if new_head != was_head {
            if let Some(head) = new_head {
                self.timer.start_absolute(head);
            }
        }
        trace!("{:?} enqueue: expires={:?} head={:?}", self.kind(), expires, new_head);
    }

    /// Unlinks `alarm`. Implemented as invalidation
    /// (`Alarm::detach` bumps nothing; the generation already on file no
    /// longer matches once re-armed) plus a check of whether the
    /// dispatch timer needs reprogramming because the head changed.
    pub(crate) fn remove(&self, alarm: &Arc<Alarm>) {
        let mut st = self.state.lock().unwrap();
        let was_head = Self::peek_valid(&mut st.heap).map(|h| h.expires);
        alarm.detach();
        let new_head = Self::peek_valid(&mut st.heap).map(|h| h.expires);
        self.reprogram_after_change(was_head, new_head);
        trace!("{:?} remove: new head={:?}", self.kind(), new_head);
    }

    /// Starts (or restarts) `alarm`: if already enabled, removes it first;
    /// sets the schedule; enqueues; marks enabled. Public — this, `cancel`,
    /// and `Alarm::new` (init) are the whole alarm lifecycle API exposed to
    /// in-kernel (and, via `capsules-core`, upward-facing) callers.
    pub fn start(&self, alarm: &Arc<Alarm>, expires: Instant, period: Option<std::time::Duration>) {
        if alarm.is_enabled() {
            self.remove(alarm);
        }
        let generation = alarm.attach(expires, period);
        self.enqueue(alarm, expires, generation);
    }

    /// Cancels `alarm`: if enabled, removes it and marks it disabled.
    /// Best-effort relative to a concurrent drain: an alarm whose callback
    /// is already in flight cannot be recalled, but will not be re-fired
    /// (it was already detached before the callback ran, per `dispatch`).
    pub fn cancel(&self, alarm: &Arc<Alarm>) {
        if alarm.is_enabled() {
            self.remove(alarm);
        }
    }

    /// Reprograms (or disarms) the dispatch timer after the head may have
    /// changed.
    fn reprogram_after_change(&self, was_head: Option<Instant>, new_head: Option<Instant>) {
        match (was_head, new_head) {
            (_, Some(head)) if was_head != new_head => self.timer.start_absolute(head),
            (Some(_), None) => {
                self.timer.try_cancel();
            }
            _ => {}
        }
    }

    /// Pops and discards stale heap entries (disabled, or superseded by a
    /// later `start`/rearm) until the real head is on top, then peeks it
    /// without removing it.
    fn peek_valid(heap: &mut BinaryHeap<Reverse<HeapItem>>) -> Option<HeapEntryView> {
        loop {
            let top = heap.peek()?;
            let item = &top.0;
            if item.alarm.is_enabled() && item.alarm.generation() == item.generation {
                return Some(HeapEntryView { expires: item.expires, period: item.alarm.period() });
            }
            heap.pop();
        }
    }

    /// Drains every node whose expiry is due, rearming periodics and
    /// invoking callbacks with the base lock released.
    ///
    /// A one-shot alarm is due at `expires <= now`: the dispatch timer
    /// only ever fires once `now` has reached it, so equality is the
    /// common case. A periodic alarm's *next* period is only counted as
    /// elapsed at `expires < now`: otherwise the period that lands exactly
    /// on `now` would both fire now and remain the reported head,
    /// double-counting it (draining a jump from expiry=10, period=3 to
    /// t=19 in one step fires for 10, 13, and 16, and leaves 19 as the
    /// next, unfired, expiry).
    fn dispatch(&self) {
        loop {
            let fired = {
                let mut st = self.state.lock().unwrap();
                let now = self.clock.now();
                let due = match Self::peek_valid(&mut st.heap) {
                    Some(head) => match head.period {
                        Some(_) => head.expires < now,
                        None => head.expires <= now,
                    },
                    None => false,
                };
                if !due {
                    None
                } else {
                    let Some(Reverse(item)) = st.heap.pop() else {
                        debug_assert!(false, "peek_valid guaranteed a valid head");
                        break;
                    };
                    let alarm = item.alarm;
                    if let Some((next_expires, next_generation)) = alarm.rearm_periodic() {
                        let seq = self.next_seq.fetch_add(1, AtomicOrdering::Relaxed);
                        st.heap.push(Reverse(HeapItem {
                            expires: next_expires,
                            seq,
                            generation: next_generation,
                            alarm: alarm.clone(),
                        }));
                        debug!("{:?} fired alarm, rearmed at {:?}", self.kind(), next_expires);
                    } else {
                        alarm.detach();
                        debug!("{:?} fired one-shot alarm", self.kind());
                    }
                    Some(alarm)
                }
            };
            match fired {
                Some(alarm) => alarm.invoke(),
                None => break,
            }
        }

        let mut st = self.state.lock().unwrap();
        match Self::peek_valid(&mut st.heap) {
            Some(head) => self.timer.start_absolute(head.expires),
            None => {
                self.timer.try_cancel();
            }
        }
    }

    /// The head expiry of this base's queue, if any alarm is enabled —
    /// used by the suspend hook.
    pub fn head_expiry(&self) -> Option<Instant> {
        let mut st = self.state.lock().unwrap();
        Self::peek_valid(&mut st.heap).map(|h| h.expires)
    }

    /// Whether the queue currently has any enabled alarm.
    pub fn is_empty(&self) -> bool {
        self.head_expiry().is_none()
    }
}

struct HeapEntryView {
    expires: Instant,
    period: Option<std::time::Duration>,
}

impl HighResTimerClient for ClockBase {
    fn fired(&self) {
        self.dispatch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::Alarm;
    use std::sync::atomic::{AtomicBool, AtomicU64 as StdAtomicU64};
    use std::sync::Mutex as StdMutex;

    /// A clock a test can step by hand, standing in for a base clock that
    /// returns monotonically increasing values 0, 1, ....
    struct FakeClock {
        kind: ClockKind,
        now: StdAtomicU64,
    }

    impl FakeClock {
        fn new(kind: ClockKind) -> Arc<Self> {
            Arc::new(FakeClock { kind, now: StdAtomicU64::new(0) })
        }

        fn set(&self, nanos: u64) {
            self.now.store(nanos, AtomicOrdering::SeqCst);
        }
    }

    impl Clock for FakeClock {
        fn kind(&self) -> ClockKind {
            self.kind
        }
        fn now(&self) -> Instant {
            Instant::from_nanos(self.now.load(AtomicOrdering::SeqCst))
        }
        fn resolution(&self) -> std::time::Duration {
            std::time::Duration::from_nanos(1)
        }
    }

    /// A timer that never fires on its own; tests drive dispatch by
    /// calling `ClockBase::dispatch` directly (private, but tests live in
    /// this module so they can reach it), simulating "the hardware timer
    /// callback ran".
    struct FakeTimer {
        armed: AtomicBool,
        deadline: StdMutex<Option<Instant>>,
    }

    impl FakeTimer {
        fn new() -> Arc<Self> {
            Arc::new(FakeTimer { armed: AtomicBool::new(false), deadline: StdMutex::new(None) })
        }
    }

    impl HighResTimer for FakeTimer {
        fn set_client(&self, _client: Arc<dyn HighResTimerClient>) {}
        fn start_absolute(&self, deadline: Instant) {
            self.armed.store(true, AtomicOrdering::SeqCst);
            *self.deadline.lock().unwrap() = Some(deadline);
        }
        fn try_cancel(&self) -> bool {
            let was_armed = self.armed.swap(false, AtomicOrdering::SeqCst);
            *self.deadline.lock().unwrap() = None;
            was_armed
        }
        fn is_armed(&self) -> bool {
            self.armed.load(AtomicOrdering::SeqCst)
        }
    }

    fn fixture() -> (Arc<ClockBase>, Arc<FakeClock>, Arc<FakeTimer>) {
        let clock = FakeClock::new(ClockKind::Boottime);
        let timer = FakeTimer::new();
        let base = ClockBase::new(clock.clone(), timer.clone());
        (base, clock, timer)
    }

    #[test]
    fn one_shot_fire() {
        // Start at t=0 with expiry 5, advance to t=5: dispatch fires exactly
        // once and leaves the queue empty.
        let (base, clock, timer) = fixture();
        let fired = Arc::new(StdAtomicU64::new(0));
        let fired2 = fired.clone();
        let alarm = Arc::new(Alarm::new(
            AlarmType::Boottime,
            Box::new(move || {
                fired2.fetch_add(1, AtomicOrdering::SeqCst);
            }),
        ));
        base.start(&alarm, Instant::from_nanos(5), None);
        assert!(timer.is_armed());

        clock.set(5);
        base.dispatch();

        assert_eq!(fired.load(AtomicOrdering::SeqCst), 1);
        assert!(!alarm.is_enabled());
        assert!(base.is_empty());
        assert!(!timer.is_armed());
    }

    #[test]
    fn periodic_drift_free() {
        // expiry=10, period=3, clock jumps to 19 in one step: three firings
        // at virtual expiries 10, 13, 16; after drain expires == 19, still
        // enabled.
        let (base, clock, _timer) = fixture();
        let count = Arc::new(StdAtomicU64::new(0));
        let count2 = count.clone();
        let alarm = Arc::new(Alarm::new(
            AlarmType::Boottime,
            Box::new(move || {
                count2.fetch_add(1, AtomicOrdering::SeqCst);
            }),
        ));
        base.start(&alarm, Instant::from_nanos(10), Some(std::time::Duration::from_nanos(3)));

        clock.set(19);
        base.dispatch();

        assert_eq!(count.load(AtomicOrdering::SeqCst), 3);
        assert_eq!(alarm.expires(), Instant::from_nanos(19));
        assert!(alarm.is_enabled());
    }

    #[test]
    fn cancel_before_fire() {
        // Cancel at t=50 an alarm due at t=100: no callback ever runs,
        // queue ends up empty and disarmed.
        let (base, clock, timer) = fixture();
        let fired = Arc::new(StdAtomicU64::new(0));
        let fired2 = fired.clone();
        let alarm = Arc::new(Alarm::new(
            AlarmType::Boottime,
            Box::new(move || {
                fired2.fetch_add(1, AtomicOrdering::SeqCst);
            }),
        ));
        base.start(&alarm, Instant::from_nanos(100), None);

        clock.set(50);
        base.cancel(&alarm);

        assert!(!alarm.is_enabled());
        assert!(base.is_empty());
        assert!(!timer.is_armed());
        assert_eq!(fired.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn head_tracks_minimum_across_inserts() {
        // The head is always the minimum expiry among enabled alarms,
        // including after inserting one that supersedes it and removing
        // the one that used to be soonest.
        let (base, _clock, _timer) = fixture();
        let mk = |e: u64| {
            let a = Arc::new(Alarm::new(AlarmType::Boottime, Box::new(|| {})));
            base.start(&a, Instant::from_nanos(e), None);
            a
        };
        let a10 = mk(10);
        let _a20 = mk(20);
        assert_eq!(base.head_expiry(), Some(Instant::from_nanos(10)));
        let a5 = mk(5);
        assert_eq!(base.head_expiry(), Some(Instant::from_nanos(5)));
        base.cancel(&a5);
        assert_eq!(base.head_expiry(), Some(Instant::from_nanos(10)));
        base.cancel(&a10);
        assert_eq!(base.head_expiry(), Some(Instant::from_nanos(20)));
    }

    #[test]
    fn restart_re_enqueues_and_reprograms() {
        // start() on an already-enabled alarm removes then re-enqueues:
        // the old schedule must not linger in the heap.
        let (base, _clock, timer) = fixture();
        let alarm = Arc::new(Alarm::new(AlarmType::Boottime, Box::new(|| {})));
        base.start(&alarm, Instant::from_nanos(100), None);
        base.start(&alarm, Instant::from_nanos(7), None);
        assert_eq!(base.head_expiry(), Some(Instant::from_nanos(7)));
        assert!(timer.is_armed());
    }
}
