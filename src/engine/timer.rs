//! Software timers on a virtual clock.
//!
//! Nothing here reads the wall clock: callers move time forward with
//! [`Scheduler::poll_until`], so the terminal loop can feed real elapsed time
//! while tests step through simulated time.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Entry<K> {
    id: TimerId,
    kind: K,
    due: Duration,
    period: Option<Duration>,
}

#[derive(Clone, Debug)]
pub struct Scheduler<K> {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry<K>>,
}

impl<K: Clone> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone> Scheduler<K> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn schedule_once(&mut self, delay: Duration, kind: K) -> TimerId {
        self.insert(delay, None, kind)
    }

    /// A zero period is bumped to one millisecond so polling always terminates.
    pub fn schedule_repeating(&mut self, period: Duration, kind: K) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(period, Some(period), kind)
    }

    /// Returns false if the timer already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Pops the earliest timer due at or before `deadline`, moving the clock to
    /// its due time. When nothing is due the clock moves to `deadline` and
    /// `None` is returned. Call in a loop: handlers may cancel or schedule
    /// timers between pops, and cancelled timers are never returned.
    pub fn poll_until(&mut self, deadline: Duration) -> Option<(TimerId, K)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= deadline)
            .min_by_key(|(_, e)| (e.due, e.id.0))
            .map(|(i, _)| i);

        let Some(index) = index else {
            self.now = self.now.max(deadline);
            return None;
        };

        let entry = &mut self.entries[index];
        self.now = self.now.max(entry.due);
        let fired = (entry.id, entry.kind.clone());
        match entry.period {
            Some(period) => entry.due += period,
            None => {
                self.entries.remove(index);
            }
        }
        Some(fired)
    }

    fn insert(&mut self, delay: Duration, period: Option<Duration>, kind: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            kind,
            due: self.now + delay,
            period,
        });
        id
    }
}
