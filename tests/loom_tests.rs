//! Loom-based concurrency tests for the reservation-and-commit protocol.
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! Loom exhaustively explores thread interleavings to find concurrency bugs
//! that only manifest under specific scheduling. `loom`'s atomics and
//! `std`'s atomics are different types, so this file models the protocol
//! against a small, standalone queue built the same way as
//! [`ringmpmc_rs::BoundedMpmcQueue`] rather than exercising the real type
//! directly; the state space of the full generic implementation is far too
//! large for exhaustive exploration regardless.

#![cfg(feature = "loom")]

use loom::cell::UnsafeCell;
use loom::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};
use loom::sync::Arc;
use loom::thread;

/// A capacity-2 model of the admission/reservation/commit/signal protocol,
/// scaled down so loom's exhaustive interleaving search stays tractable.
struct LoomQueue {
    buffer: [UnsafeCell<Option<u64>>; 2],
    back_lead: AtomicUsize,
    back_trail: AtomicUsize,
    front_lead: AtomicUsize,
    front_trail: AtomicUsize,
    size_upper_bound: AtomicIsize,
    size_lower_bound: AtomicIsize,
}

unsafe impl Send for LoomQueue {}
unsafe impl Sync for LoomQueue {}

const CAPACITY: isize = 2;

impl LoomQueue {
    fn new() -> Self {
        Self {
            buffer: [UnsafeCell::new(None), UnsafeCell::new(None)],
            back_lead: AtomicUsize::new(0),
            back_trail: AtomicUsize::new(0),
            front_lead: AtomicUsize::new(0),
            front_trail: AtomicUsize::new(0),
            size_upper_bound: AtomicIsize::new(0),
            size_lower_bound: AtomicIsize::new(0),
        }
    }

    /// Bounded admission attempt; loops at most `attempts` times since
    /// loom cannot explore an unbounded spin-wait.
    fn try_push(&self, value: u64, attempts: u32) -> bool {
        let mut admitted = false;
        for _ in 0..=attempts {
            let prev = self.size_upper_bound.fetch_add(1, Ordering::AcqRel);
            if prev < CAPACITY {
                admitted = true;
                break;
            }
            self.size_upper_bound.fetch_sub(1, Ordering::AcqRel);
            loom::thread::yield_now();
        }
        if !admitted {
            return false;
        }

        let ticket = self.back_lead.fetch_add(1, Ordering::Relaxed);

        // See the matching wait in try_pop: the occupancy gate alone
        // doesn't guarantee *this* ticket's slot was vacated by the
        // consumer that actually took it, since the admission counter's
        // decrement-then-undo retries can scramble which release a
        // successful admission ends up synchronizing with. front_trail is
        // only ever advanced by a plain commit store, so waiting on it
        // directly is the real synchronization edge.
        while ticket >= self.front_trail.load(Ordering::Acquire) + CAPACITY as usize {
            loom::thread::yield_now();
        }

        let idx = ticket & 1;
        self.buffer[idx].with_mut(|slot| unsafe {
            *slot = Some(value);
        });

        while self.back_trail.load(Ordering::Acquire) != ticket {
            loom::thread::yield_now();
        }
        self.back_trail.store(ticket + 1, Ordering::Release);
        self.size_lower_bound.fetch_add(1, Ordering::Release);
        true
    }

    fn try_pop(&self, attempts: u32) -> Option<u64> {
        let mut admitted = false;
        for _ in 0..=attempts {
            let prev = self.size_lower_bound.fetch_sub(1, Ordering::AcqRel);
            if prev > 0 {
                admitted = true;
                break;
            }
            self.size_lower_bound.fetch_add(1, Ordering::AcqRel);
            loom::thread::yield_now();
        }
        if !admitted {
            return None;
        }

        let ticket = self.front_lead.fetch_add(1, Ordering::Relaxed);

        // Wait for this specific ticket's producer commit rather than
        // trusting the admission gate to have synchronized with it.
        while self.back_trail.load(Ordering::Acquire) <= ticket {
            loom::thread::yield_now();
        }

        let idx = ticket & 1;
        let value = self.buffer[idx].with_mut(|slot| unsafe { (*slot).take() });

        while self.front_trail.load(Ordering::Acquire) != ticket {
            loom::thread::yield_now();
        }
        self.front_trail.store(ticket + 1, Ordering::Release);
        self.size_upper_bound.fetch_sub(1, Ordering::Release);
        value
    }
}

/// Two producers racing to fill a capacity-2 queue, then two consumers
/// draining it: no loss, no duplication, every value delivered exactly once.
#[test]
fn loom_two_producers_two_consumers_no_loss_no_duplication() {
    loom::model(|| {
        let q = Arc::new(LoomQueue::new());

        let producers: Vec<_> = (0..2u64)
            .map(|i| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    assert!(q.try_push(100 + i, 8));
                })
            })
            .collect();

        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let q = Arc::clone(&q);
                thread::spawn(move || q.try_pop(8))
            })
            .collect();

        for p in producers {
            p.join().unwrap();
        }
        let mut popped: Vec<_> = consumers
            .into_iter()
            .map(|c| c.join().unwrap())
            .collect();
        popped.sort();

        assert_eq!(popped, vec![Some(100), Some(101)]);
    });
}

/// A producer that fills both slots and a consumer that then empties them:
/// the commit barrier must make slot writes visible to the consumer.
#[test]
fn loom_commit_barrier_makes_writes_visible() {
    loom::model(|| {
        let q = Arc::new(LoomQueue::new());

        assert!(q.try_push(7, 4));
        assert!(q.try_push(9, 4));

        let q2 = Arc::clone(&q);
        let consumer = thread::spawn(move || {
            let a = q2.try_pop(4);
            let b = q2.try_pop(4);
            (a, b)
        });

        let (a, b) = consumer.join().unwrap();
        assert_eq!(a, Some(7));
        assert_eq!(b, Some(9));
    });
}

/// Admission never over-admits: a push racing a full queue with no spin
/// budget left must fail rather than silently clobber an occupied slot.
#[test]
fn loom_admission_never_overbooks_capacity() {
    loom::model(|| {
        let q = Arc::new(LoomQueue::new());
        assert!(q.try_push(1, 0));
        assert!(q.try_push(2, 0));

        let q2 = Arc::clone(&q);
        let third = thread::spawn(move || q2.try_push(3, 0));
        let consumer = thread::spawn({
            let q = Arc::clone(&q);
            move || q.try_pop(0)
        });

        let pushed = third.join().unwrap();
        let popped = consumer.join().unwrap();

        // Either the third push failed (queue stayed full) or it succeeded
        // because the concurrent pop freed a slot first; both are valid
        // outcomes, but the queue must never report push success without
        // a corresponding free slot having existed.
        if pushed {
            assert!(popped.is_some());
        }
    });
}
