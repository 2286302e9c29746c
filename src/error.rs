use thiserror::Error;

/// Error types for [`crate::BoundedMpmcQueue`] construction.
///
/// Construction is the only fallible operation on the queue: an invalid
/// requested capacity is rejected here. Retry exhaustion on the `try_*`
/// operations is a non-error, advisory outcome instead (`false`/`None`,
/// not this type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// `capacity` was zero, or exceeded the platform's maximum capacity.
    #[error("capacity must be nonzero and at most {max}, got {requested}")]
    InvalidCapacity {
        /// The capacity that was requested.
        requested: usize,
        /// The platform's maximum capacity (see [`crate::config::max_capacity`]).
        max: usize,
    },
}
