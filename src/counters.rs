use std::sync::atomic::{AtomicIsize, AtomicUsize};

use crossbeam_utils::CachePadded;

/// The two edge-counter pairs that order reservations and commits on one
/// side of the ring (producer side or consumer side).
///
/// `lead` is fetch-and-incremented by each reservation to hand out a
/// monotonic ticket; `trail` is incremented only once the reservation
/// holding the next ticket in order has finished its slot-local work,
/// making that operation visible to the other side. The two fields are
/// cache-padded independently: under contention, `lead` is hammered by
/// every reserving thread while `trail` is polled by whichever thread is
/// racing to commit next, and collocating them would false-share.
pub struct EdgeCounters {
    pub lead: CachePadded<AtomicUsize>,
    pub trail: CachePadded<AtomicUsize>,
}

impl EdgeCounters {
    pub fn new() -> Self {
        Self {
            lead: CachePadded::new(AtomicUsize::new(0)),
            trail: CachePadded::new(AtomicUsize::new(0)),
        }
    }
}

/// The pair of admission gates that bound producer and consumer occupancy.
///
/// Both are signed: the admission protocol increments (or decrements)
/// optimistically and then undoes the change on failure, which transiently
/// pushes the value above `capacity` or below zero while a retry is in
/// flight. `max_capacity` reserves headroom so this transient excursion
/// never approaches the counter's actual range limits.
pub struct BoundCounters {
    pub size_upper_bound: CachePadded<AtomicIsize>,
    pub size_lower_bound: CachePadded<AtomicIsize>,
}

impl BoundCounters {
    pub fn new() -> Self {
        Self {
            size_upper_bound: CachePadded::new(AtomicIsize::new(0)),
            size_lower_bound: CachePadded::new(AtomicIsize::new(0)),
        }
    }
}
