//! Debug assertion macros for queue invariants.
//!
//! Active only in debug builds (`#[cfg(debug_assertions)]`), so there is
//! zero overhead in release builds.

// =============================================================================
// INV-ORD-01: Lead dominates trail on each side
// =============================================================================

/// Assert that a side's trail counter never runs ahead of its lead counter.
///
/// **Invariant**: `trail ≤ lead`
macro_rules! debug_assert_trail_not_past_lead {
    ($name:literal, $trail:expr, $lead:expr) => {
        debug_assert!(
            $trail <= $lead,
            "INV-ORD-01 violated: {} trail {} exceeds lead {}",
            $name,
            $trail,
            $lead
        )
    };
}

// =============================================================================
// INV-ORD-02: Monotonic progress
// =============================================================================

/// Assert that a counter only increases between two observations.
///
/// **Invariant**: `new ≥ old`
macro_rules! debug_assert_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "INV-ORD-02 violated: {} decreased from {} to {}",
            $name,
            $old,
            $new
        )
    };
}

// =============================================================================
// INV-SIZE-01: Bounded occupancy
// =============================================================================

/// Assert that the in-flight reservation gap never exceeds capacity.
///
/// **Invariant**: `back_lead - front_trail ≤ capacity`
macro_rules! debug_assert_bounded_occupancy {
    ($back_lead:expr, $front_trail:expr, $capacity:expr) => {
        debug_assert!(
            $back_lead.wrapping_sub($front_trail) <= $capacity,
            "INV-SIZE-01 violated: occupancy {} exceeds capacity {}",
            $back_lead.wrapping_sub($front_trail),
            $capacity
        )
    };
}

// =============================================================================
// INV-SIZE-02: Consumers cannot outrun committed producers
// =============================================================================

/// Assert that a consumer reservation never names a slot beyond what
/// producers have committed.
///
/// **Invariant**: `ticket < back_trail`, i.e. `front_lead ≤ back_trail`
/// for the post-increment `front_lead`.
macro_rules! debug_assert_front_lead_within_back_trail {
    ($ticket:expr, $back_trail:expr) => {
        debug_assert!(
            $ticket < $back_trail,
            "INV-SIZE-02 violated: consumer ticket {} not yet committed (back_trail {})",
            $ticket,
            $back_trail
        )
    };
}

// =============================================================================
// INV-QUIESCENT-01: Bound counters agree with trail gap at rest
// =============================================================================

/// Assert that, with no operation in flight, the two bound counters equal
/// `back_trail - front_trail`.
///
/// **Invariant**: `size_upper_bound == size_lower_bound == back_trail - front_trail`
macro_rules! debug_assert_quiescent_size_agreement {
    ($upper:expr, $lower:expr, $back_trail:expr, $front_trail:expr) => {
        debug_assert!(
            $upper == $lower && $upper as isize == ($back_trail as isize - $front_trail as isize),
            "INV-QUIESCENT-01 violated: upper={} lower={} back_trail={} front_trail={}",
            $upper,
            $lower,
            $back_trail,
            $front_trail
        )
    };
}

pub(crate) use debug_assert_bounded_occupancy;
pub(crate) use debug_assert_front_lead_within_back_trail;
pub(crate) use debug_assert_monotonic;
pub(crate) use debug_assert_quiescent_size_agreement;
pub(crate) use debug_assert_trail_not_past_lead;
