//! Error types for lanefold operations.
//!
//! Checked lane accesses, slice-based loads and stores, and the aligned allocator
//! report failures through [`LaneError`] instead of panicking. The raw-pointer
//! `*_unchecked` entry points keep their preconditions as documented `unsafe`
//! contracts and never produce these errors.

use std::fmt;

/// Errors that can occur during lanefold operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaneError {
    /// A lane index was not smaller than the lane count of the vector.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Lane count of the vector, mask or swizzle being accessed.
        lanes: usize,
    },
    /// An aligned memory access was given an address that violates the register alignment.
    Misaligned {
        /// Address of the first element.
        address: usize,
        /// Alignment in bytes required by the register.
        required: usize,
    },
    /// A slice did not hold enough elements for the access.
    LengthMismatch {
        /// Minimum number of elements required.
        expected: usize,
        /// Number of elements provided.
        actual: usize,
    },
    /// The allocator could not provide a block of the requested layout.
    AllocationFailure {
        /// Block size in bytes.
        size: usize,
        /// Block alignment in bytes.
        alignment: usize,
        message: String,
    },
    /// The size and alignment pair does not form a valid layout.
    Layout {
        /// Block size in bytes.
        size: usize,
        /// Block alignment in bytes.
        alignment: usize,
        message: String,
    },
}

impl fmt::Display for LaneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneError::IndexOutOfRange { index, lanes } => {
                write!(f, "Lane index {index} out of range for {lanes} lanes")
            }
            LaneError::Misaligned { address, required } => write!(
                f,
                "Misaligned access: address {address:#x} is not aligned to {required} bytes"
            ),
            LaneError::LengthMismatch { expected, actual } => write!(
                f,
                "Length mismatch: expected at least {expected} elements, got {actual}"
            ),
            LaneError::AllocationFailure {
                size,
                alignment,
                message,
            } => write!(f, "Cannot allocate {size} bytes aligned to {alignment}: {message}"),
            LaneError::Layout {
                size,
                alignment,
                message,
            } => write!(f, "Bad layout of {size} bytes aligned to {alignment}: {message}"),
        }
    }
}

impl std::error::Error for LaneError {}

/// Result type alias for lanefold operations.
pub type Result<T> = std::result::Result<T, LaneError>;

/// Creates an index error.
pub fn index_out_of_range(index: usize, lanes: usize) -> LaneError {
    LaneError::IndexOutOfRange { index, lanes }
}

/// Creates an alignment error for the address of `ptr`.
pub fn misaligned<T>(ptr: *const T, required: usize) -> LaneError {
    LaneError::Misaligned {
        address: ptr as usize,
        required,
    }
}

/// Creates a length error.
pub fn length_mismatch(expected: usize, actual: usize) -> LaneError {
    LaneError::LengthMismatch { expected, actual }
}

/// Creates an allocation error.
pub fn allocation_failure(size: usize, alignment: usize, message: impl Into<String>) -> LaneError {
    let message = message.into();
    LaneError::AllocationFailure {
        size,
        alignment,
        message,
    }
}

/// Creates a layout error.
pub fn layout_error(size: usize, alignment: usize, message: impl Into<String>) -> LaneError {
    let message = message.into();
    LaneError::Layout {
        size,
        alignment,
        message,
    }
}
