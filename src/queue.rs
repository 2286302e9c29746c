use std::sync::atomic::Ordering;

use crate::backoff::Backoff;
use crate::config::Config;
use crate::counters::{BoundCounters, EdgeCounters};
use crate::error::QueueError;
use crate::invariants::{
    debug_assert_bounded_occupancy, debug_assert_front_lead_within_back_trail,
    debug_assert_monotonic, debug_assert_quiescent_size_agreement, debug_assert_trail_not_past_lead,
};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::slot::Slot;

/// A bounded, lock-free, multi-producer multi-consumer FIFO queue.
///
/// Backed by a fixed-capacity ring buffer addressed by bitmask rather than
/// modulus (capacity is always rounded up to a power of two). Producers and
/// consumers coordinate through six independent atomic counters instead of
/// a mutex: two admission gates bound occupancy, and two lead/trail pairs
/// reserve disjoint slots and publish completion in ticket order. See the
/// module-level documentation in [`crate`] for the full protocol.
pub struct BoundedMpmcQueue<T> {
    buffer: Box<[Slot<T>]>,
    mask: usize,
    capacity: usize,
    concurrency: u32,
    back: EdgeCounters,
    front: EdgeCounters,
    bounds: BoundCounters,
    metrics: Option<Metrics>,
}

unsafe impl<T: Send> Send for BoundedMpmcQueue<T> {}
unsafe impl<T: Send> Sync for BoundedMpmcQueue<T> {}

impl<T> BoundedMpmcQueue<T> {
    /// Constructs a queue with the given requested capacity, rounded up to
    /// the next power of two.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidCapacity`] if `requested_capacity` is
    /// zero or exceeds the platform's maximum capacity.
    pub fn new(requested_capacity: usize) -> Result<Self, QueueError> {
        Ok(Self::with_config(Config::new(requested_capacity)?))
    }

    /// Constructs a queue from an already-validated [`Config`].
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let capacity = config.capacity();
        let mut buffer = Vec::with_capacity(capacity);
        buffer.resize_with(capacity, Slot::empty);
        Self {
            buffer: buffer.into_boxed_slice(),
            mask: config.mask(),
            capacity,
            concurrency: config.concurrency,
            back: EdgeCounters::new(),
            front: EdgeCounters::new(),
            bounds: BoundCounters::new(),
            metrics: config.enable_metrics.then(Metrics::new),
        }
    }

    /// Returns the fixed, rounded-up capacity of this queue.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns an advisory, pessimistic upper-bound estimate of the number
    /// of occupied slots. May be stale the instant it is observed.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.bounds
            .size_upper_bound
            .load(Ordering::Relaxed)
            .max(0) as usize
    }

    /// Returns true if the queue's lower-bound availability counter is
    /// zero. Advisory and conservative from a consumer's point of view.
    #[inline]
    #[must_use]
    pub fn empty(&self) -> bool {
        self.bounds.size_lower_bound.load(Ordering::Relaxed) <= 0
    }

    /// Returns a snapshot of push/pop/retry counters, if metrics collection
    /// was enabled via [`Config::with_metrics`].
    #[must_use]
    pub fn metrics(&self) -> Option<MetricsSnapshot> {
        self.metrics.as_ref().map(Metrics::snapshot)
    }

    #[inline]
    fn slot(&self, ticket: usize) -> &Slot<T> {
        &self.buffer[ticket & self.mask]
    }

    /// Blocks until admission succeeds, incrementing `size_upper_bound`.
    fn admit_push(&self) {
        let mut backoff = Backoff::with_concurrency(self.concurrency);
        loop {
            let prev = self.bounds.size_upper_bound.fetch_add(1, Ordering::AcqRel);
            if prev < self.capacity as isize {
                return;
            }
            self.bounds.size_upper_bound.fetch_sub(1, Ordering::AcqRel);
            if let Some(m) = &self.metrics {
                m.add_admission_retry();
            }
            backoff.snooze();
        }
    }

    /// Attempts admission up to `attempts` retries, returning whether it
    /// succeeded. Does not touch any slot.
    fn try_admit_push(&self, attempts: u32) -> bool {
        let mut backoff = Backoff::with_concurrency(self.concurrency);
        let mut tries = 0u32;
        loop {
            let prev = self.bounds.size_upper_bound.fetch_add(1, Ordering::AcqRel);
            if prev < self.capacity as isize {
                return true;
            }
            self.bounds.size_upper_bound.fetch_sub(1, Ordering::AcqRel);
            if tries >= attempts {
                return false;
            }
            tries += 1;
            if let Some(m) = &self.metrics {
                m.add_admission_retry();
            }
            backoff.snooze();
        }
    }

    fn admit_pop(&self) {
        let mut backoff = Backoff::with_concurrency(self.concurrency);
        loop {
            let prev = self.bounds.size_lower_bound.fetch_sub(1, Ordering::AcqRel);
            if prev > 0 {
                return;
            }
            self.bounds.size_lower_bound.fetch_add(1, Ordering::AcqRel);
            if let Some(m) = &self.metrics {
                m.add_admission_retry();
            }
            backoff.snooze();
        }
    }

    fn try_admit_pop(&self, attempts: u32) -> bool {
        let mut backoff = Backoff::with_concurrency(self.concurrency);
        let mut tries = 0u32;
        loop {
            let prev = self.bounds.size_lower_bound.fetch_sub(1, Ordering::AcqRel);
            if prev > 0 {
                return true;
            }
            self.bounds.size_lower_bound.fetch_add(1, Ordering::AcqRel);
            if tries >= attempts {
                return false;
            }
            tries += 1;
            if let Some(m) = &self.metrics {
                m.add_admission_retry();
            }
            backoff.snooze();
        }
    }

    /// Performs the reservation/write/commit/signal steps once admission
    /// has already succeeded. Infallible.
    fn push_after_admission(&self, value: T) {
        let ticket = self.back.lead.fetch_add(1, Ordering::Relaxed);
        debug_assert_bounded_occupancy!(ticket + 1, self.front.trail.load(Ordering::Relaxed), self.capacity);

        // The occupancy gate bounds *how many* reservations can be in
        // flight, but the admission counter's decrement-then-maybe-undo
        // retry can observe a token that isn't causally tied to the
        // specific consumer that vacated this ticket's slot. front_trail
        // itself is only ever advanced by a plain commit store, so waiting
        // on it here (rather than trusting the occupancy gate alone) is
        // what actually establishes happens-before with that consumer's
        // take.
        let mut wait_for_vacancy = Backoff::with_concurrency(self.concurrency);
        while ticket >= self.front.trail.load(Ordering::Acquire).wrapping_add(self.capacity) {
            wait_for_vacancy.snooze();
        }

        // SAFETY: the wait above witnessed this slot's previous occupant
        // (if any) being taken, with proper acquire/release synchronization.
        unsafe {
            self.slot(ticket).store(value);
        }

        let mut backoff = Backoff::with_concurrency(self.concurrency);
        while self.back.trail.load(Ordering::Acquire) != ticket {
            if let Some(m) = &self.metrics {
                m.add_commit_spin();
            }
            backoff.snooze();
        }
        debug_assert_trail_not_past_lead!(
            "back",
            ticket,
            self.back.lead.load(Ordering::Relaxed)
        );
        self.back.trail.store(ticket + 1, Ordering::Release);
        debug_assert_monotonic!("back_trail", ticket, ticket + 1);

        self.bounds.size_lower_bound.fetch_add(1, Ordering::Release);
        if let Some(m) = &self.metrics {
            m.add_pushed(1);
        }
    }

    fn pop_after_admission(&self) -> T {
        let ticket = self.front.lead.fetch_add(1, Ordering::Relaxed);

        // Mirrors the producer-side wait: back_trail is the clean,
        // per-ticket publication point for a producer's write. The
        // admission gate alone can't guarantee *this* ticket's producer is
        // the one a racy decrement-then-undo happened to synchronize with.
        let mut wait_for_commit = Backoff::with_concurrency(self.concurrency);
        while self.back.trail.load(Ordering::Acquire) <= ticket {
            wait_for_commit.snooze();
        }
        debug_assert_front_lead_within_back_trail!(ticket, self.back.trail.load(Ordering::Relaxed));

        // SAFETY: the wait above witnessed this ticket's producer commit,
        // so the slot is guaranteed to be holding a value.
        let value = unsafe { self.slot(ticket).take() };

        let mut backoff = Backoff::with_concurrency(self.concurrency);
        while self.front.trail.load(Ordering::Acquire) != ticket {
            if let Some(m) = &self.metrics {
                m.add_commit_spin();
            }
            backoff.snooze();
        }
        debug_assert_trail_not_past_lead!(
            "front",
            ticket,
            self.front.lead.load(Ordering::Relaxed)
        );
        self.front.trail.store(ticket + 1, Ordering::Release);
        debug_assert_monotonic!("front_trail", ticket, ticket + 1);

        self.bounds.size_upper_bound.fetch_sub(1, Ordering::Release);
        if let Some(m) = &self.metrics {
            m.add_popped(1);
        }
        value
    }

    /// Enqueues `value`, blocking until a slot is available. Never fails.
    pub fn push(&self, value: T) {
        self.admit_push();
        self.push_after_admission(value);
    }

    /// Attempts to enqueue `value`, retrying admission up to `attempts`
    /// times. Returns `true` if enqueued, `false` if the retry budget was
    /// exhausted; `value` is dropped on failure just as it would be dropped
    /// by any other call that consumes it by move.
    #[must_use]
    pub fn try_push(&self, value: T, attempts: u32) -> bool {
        if !self.try_admit_push(attempts) {
            return false;
        }
        self.push_after_admission(value);
        true
    }

    /// Dequeues the next value in FIFO order, blocking until one is
    /// available. Never fails.
    pub fn pop(&self) -> T {
        self.admit_pop();
        self.pop_after_admission()
    }

    /// Attempts to dequeue the next value, retrying admission up to
    /// `attempts` times. Returns `None` if the retry budget was exhausted.
    #[must_use]
    pub fn try_pop(&self, attempts: u32) -> Option<T> {
        if !self.try_admit_pop(attempts) {
            return None;
        }
        Some(self.pop_after_admission())
    }
}

impl<T> Drop for BoundedMpmcQueue<T> {
    fn drop(&mut self) {
        let front_trail = *self.front.trail.get_mut();
        let back_trail = *self.back.trail.get_mut();
        debug_assert_quiescent_size_agreement!(
            *self.bounds.size_upper_bound.get_mut(),
            *self.bounds.size_lower_bound.get_mut(),
            back_trail,
            front_trail
        );
        for ticket in front_trail..back_trail {
            // SAFETY: every ticket in [front_trail, back_trail) was
            // committed by a producer and not yet claimed by a consumer,
            // so its slot holds a live value owned by this queue.
            unsafe {
                self.buffer[ticket & self.mask].drop_in_place();
            }
        }
    }
}
