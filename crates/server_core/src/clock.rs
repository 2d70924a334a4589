//! Single authoritative time source for a session.
//!
//! Timers are cooperative: nothing fires between ticks. `advance`
//! returns due entries in (deadline, schedule-order) order so two
//! timers due on the same tick fire deterministically. Cancellation
//! is explicit; a fired callback must re-check entity state before
//! mutating anything (the token alone does not prove the entity is
//! still in the state it was scheduled under).

use std::collections::HashSet;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Clone, Debug)]
struct TimerEntry<K> {
    fire_at: f64,
    seq: u64,
    token: TimerToken,
    kind: K,
}

/// Monotonic session clock with cancellable scheduled callbacks.
#[derive(Debug)]
pub struct SessionClock<K> {
    now: f64,
    next_seq: u64,
    timers: Vec<TimerEntry<K>>,
    cancelled: HashSet<TimerToken>,
}

impl<K> Default for SessionClock<K> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            timers: Vec::new(),
            cancelled: HashSet::new(),
        }
    }
}

impl<K: Clone> SessionClock<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session time in seconds since construction.
    #[inline]
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `kind` to fire `after_s` seconds from now.
    pub fn after(&mut self, after_s: f64, kind: K) -> TimerToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        let token = TimerToken(seq);
        self.timers.push(TimerEntry {
            fire_at: self.now + after_s.max(0.0),
            seq,
            token,
            kind,
        });
        token
    }

    /// Cancel a scheduled timer. Idempotent; cancelling an already
    /// fired or unknown token is a no-op.
    pub fn cancel(&mut self, token: TimerToken) {
        self.cancelled.insert(token);
    }

    /// Cancel everything outstanding (session teardown). No callback
    /// may fire after this returns.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
        self.cancelled.clear();
    }

    /// Advance the clock by `dt` seconds and drain due timers in
    /// deterministic order.
    pub fn advance(&mut self, dt: f64) -> Vec<(TimerToken, K)> {
        self.now += dt.max(0.0);
        let now = self.now;
        let mut due: Vec<TimerEntry<K>> = Vec::new();
        self.timers.retain(|t| {
            if t.fire_at <= now {
                due.push(t.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| {
            a.fire_at
                .partial_cmp(&b.fire_at)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        due.retain(|t| !self.cancelled.remove(&t.token));
        due.into_iter().map(|t| (t.token, t.kind)).collect()
    }

    /// Number of timers still scheduled (cancelled-but-not-drained
    /// entries included).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}
