use std::cell::UnsafeCell;
use std::mem::MaybeUninit;

/// A single cell of the ring buffer.
///
/// A slot has no atomic state of its own: the admission/reservation/commit
/// protocol in [`crate::BoundedMpmcQueue`] guarantees that at most one
/// thread ever calls [`Slot::store`] between two calls to [`Slot::take`],
/// and vice versa, so the cell itself needs no synchronization beyond the
/// `UnsafeCell` required to mutate through a shared reference.
pub struct Slot<T> {
    cell: UnsafeCell<MaybeUninit<T>>,
}

unsafe impl<T: Send> Sync for Slot<T> {}

impl<T> Slot<T> {
    #[inline]
    pub fn empty() -> Self {
        Self {
            cell: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Writes `value` into the slot.
    ///
    /// # Safety
    ///
    /// The caller must hold exclusive access to this slot (i.e. have won
    /// the reservation for this index and not yet written to it).
    #[inline]
    pub unsafe fn store(&self, value: T) {
        (*self.cell.get()).write(value);
    }

    /// Reads the value out of the slot, leaving it logically empty.
    ///
    /// # Safety
    ///
    /// The caller must hold exclusive access to this slot and the slot
    /// must currently be holding a value previously written by [`Slot::store`].
    #[inline]
    pub unsafe fn take(&self) -> T {
        (*self.cell.get()).assume_init_read()
    }

    /// Drops the value currently held in the slot in place, without moving it.
    ///
    /// # Safety
    ///
    /// The caller must hold exclusive access to this slot and the slot
    /// must currently be holding a value.
    #[inline]
    pub unsafe fn drop_in_place(&self) {
        (*self.cell.get()).assume_init_drop();
    }
}
