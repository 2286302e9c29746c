use crate::error::QueueError;

/// The platform's counter width in bits, used to derive the maximum
/// addressable queue capacity. Native `isize`/`usize` width is used rather
/// than hardcoding 32 or 64 bits, so the headroom reserved for transient
/// over-increments (2^30 on 32-bit, 2^62 on 64-bit) falls out of a single
/// formula instead of two hardcoded constants.
const COUNTER_BITS: u32 = usize::BITS;

/// Returns the smallest power of two `>= n`. `n == 0` returns 1.
///
/// `round_up_to_power_of_2(1) == 1`, `(2) == 2`, `(3) == 4`, `(4) == 4`,
/// `(5) == 8`, `(1023) == 1024`, `(1024) == 1024`, `(1025) == 2048`.
#[inline]
#[must_use]
pub fn round_up_to_power_of_2(n: usize) -> usize {
    if n <= 1 {
        1
    } else {
        1usize << (usize::BITS - (n - 1).leading_zeros())
    }
}

/// The largest capacity this crate will construct a queue with: `2^(W-2)`
/// where `W` is the counter width in bits, reserving headroom for the
/// admission protocol's transient over/under-increments without the
/// counters ever wrapping in practice.
#[must_use]
pub const fn max_capacity() -> usize {
    1usize << (COUNTER_BITS - 2)
}

/// Configuration for a [`crate::BoundedMpmcQueue`].
///
/// Constructed via [`Config::new`], which rounds the requested capacity up
/// to the next power of two and validates it against [`max_capacity`].
#[derive(Debug, Clone, Copy)]
pub struct Config {
    capacity: usize,
    /// Spin-before-yield cadence for the commit spin-wait: the thread
    /// yields to the OS roughly once every `concurrency` spins. Default 256.
    pub concurrency: u32,
    /// Enable lightweight push/pop/retry counters (slight overhead).
    pub enable_metrics: bool,
}

impl Config {
    const DEFAULT_CONCURRENCY: u32 = 256;

    /// Creates a configuration for the given requested capacity, rounding it
    /// up to the next power of two.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidCapacity`] if `requested` is `0` or
    /// exceeds [`max_capacity`].
    pub fn new(requested: usize) -> Result<Self, QueueError> {
        if requested == 0 {
            return Err(QueueError::InvalidCapacity {
                requested,
                max: max_capacity(),
            });
        }
        let capacity = round_up_to_power_of_2(requested);
        if capacity > max_capacity() {
            return Err(QueueError::InvalidCapacity {
                requested,
                max: max_capacity(),
            });
        }
        Ok(Self {
            capacity,
            concurrency: Self::DEFAULT_CONCURRENCY,
            enable_metrics: false,
        })
    }

    /// Sets the spin-to-yield cadence for the commit spin-wait.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: u32) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Enables push/pop/retry metrics collection.
    #[must_use]
    pub const fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Returns the rounded-up ring capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the index mask for wrapping (`capacity - 1`).
    #[inline]
    #[must_use]
    pub const fn mask(&self) -> usize {
        self.capacity - 1
    }
}
