//! Persistent scratch segment allocator (C2)

use thiserror::Error;

/// Default maximum BSS segment size: 2 MiB, per spec's recommended cap.
pub const DEFAULT_BSS_CAPACITY: u32 = 2 * 1024 * 1024;

/// Errors raised while reserving BSS space.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BssError {
    /// The allocator's capacity would be exceeded by this reservation.
    #[error("BSS capacity exceeded: requested {requested} bytes at cursor {cursor}, capacity is {capacity}")]
    CapacityExceeded {
        /// Size of the reservation that could not be satisfied.
        requested: u32,
        /// Cursor position (after alignment) when the reservation was attempted.
        cursor: u32,
        /// The allocator's configured capacity.
        capacity: u32,
    },
}

/// Bump allocator for the program's persistent, zero-initialized scratch
/// segment. Every composite node reserves its re-entry/jump-back/counter
/// slots here during the setup pass; the VM zero-fills this segment once at
/// program load.
#[derive(Debug, Clone)]
pub struct BssAllocator {
    cursor: u32,
    capacity: u32,
}

impl BssAllocator {
    /// Create an allocator with the default 2 MiB capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BSS_CAPACITY)
    }

    /// Create an allocator with an explicit capacity, for hosts with a
    /// tighter scratch budget than the default.
    pub fn with_capacity(capacity: u32) -> Self {
        Self { cursor: 0, capacity }
    }

    /// Reserve `size` bytes aligned to `align`, returning the aligned
    /// offset. `align` must be a power of two; a caller passing a
    /// non-power-of-two alignment is a programming error within this
    /// codebase, not a runtime condition, so this asserts rather than
    /// returning `Result`.
    pub fn push(&mut self, size: u32, align: u32) -> Result<u32, BssError> {
        assert!(align.is_power_of_two(), "alignment must be a power of two");
        let aligned = (self.cursor + align - 1) & !(align - 1);
        let end = aligned
            .checked_add(size)
            .expect("BSS offset overflowed u32");
        if end > self.capacity {
            return Err(BssError::CapacityExceeded {
                requested: size,
                cursor: aligned,
                capacity: self.capacity,
            });
        }
        self.cursor = end;
        Ok(aligned)
    }

    /// Current segment size in bytes (the high-water mark of the cursor).
    pub fn size(&self) -> u32 {
        self.cursor
    }

    /// Configured maximum capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

impl Default for BssAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_aligned_and_monotonic() {
        let mut bss = BssAllocator::new();
        let a = bss.push(1, 1).unwrap();
        let b = bss.push(4, 4).unwrap();
        let c = bss.push(4, 4).unwrap();
        assert_eq!(a, 0);
        assert_eq!(b, 4); // bumped up from cursor=1 to the next 4-byte boundary
        assert_eq!(c, 8);
        assert_eq!(bss.size(), 12);
    }

    #[test]
    fn capacity_exceeded_is_reported() {
        let mut bss = BssAllocator::with_capacity(8);
        bss.push(4, 4).unwrap();
        let err = bss.push(8, 4).unwrap_err();
        assert_eq!(
            err,
            BssError::CapacityExceeded {
                requested: 8,
                cursor: 4,
                capacity: 8,
            }
        );
    }

    #[test]
    fn size_does_not_grow_on_failed_allocation() {
        let mut bss = BssAllocator::with_capacity(4);
        bss.push(4, 4).unwrap();
        assert!(bss.push(4, 4).is_err());
        assert_eq!(bss.size(), 4);
    }
}
