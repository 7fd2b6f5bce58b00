// src/error.rs

use std::fmt;

/// Errors raised by [`CircularBuffer`](crate::CircularBuffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A buffer was constructed or resized with an unusable capacity.
    InvalidCapacity(usize),
    /// The allocator could not provide a store of the requested size.
    AllocationFailed(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(capacity) => {
                write!(
                    f,
                    "Invalid capacity {}: must be between 1 and {}",
                    capacity,
                    isize::MAX
                )
            }
            Error::AllocationFailed(capacity) => {
                write!(f, "Failed to allocate {} bytes", capacity)
            }
        }
    }
}

impl std::error::Error for Error {}
