//! A bounded, lock-free multi-producer / multi-consumer FIFO queue.
//!
//! [`BoundedMpmcQueue`] hands concurrent producers and consumers disjoint
//! slots of a fixed-capacity ring buffer via a reservation-and-commit
//! protocol built from six independent atomic counters — no mutex is ever
//! taken. Construction is the only fallible operation; blocking `push`/
//! `pop` never fail, and the bounded `try_push`/`try_pop` variants report
//! retry exhaustion as an ordinary `bool`/`Option`, not an error.
//!
//! ```
//! use ringmpmc_rs::BoundedMpmcQueue;
//!
//! let q = BoundedMpmcQueue::new(4).unwrap();
//! q.push(1);
//! q.push(2);
//! assert_eq!(q.pop(), 1);
//! assert_eq!(q.pop(), 2);
//! ```

mod backoff;
mod config;
mod counters;
mod error;
mod invariants;
mod metrics;
mod queue;
mod slot;

pub use backoff::Backoff;
pub use config::{max_capacity, round_up_to_power_of_2, Config};
pub use error::QueueError;
pub use metrics::MetricsSnapshot;
pub use queue::BoundedMpmcQueue;
