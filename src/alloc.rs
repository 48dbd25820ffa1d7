//! Aligned memory for the aligned load/store entry points.
//!
//! [`allocate`] and [`free`] are the raw capability; [`AlignedBuffer`] owns a
//! zero-initialised, aligned run of elements and frees it on drop. Failures are
//! reported as [`LaneError`](crate::LaneError) values, never through
//! `handle_alloc_error`.

use std::alloc::{alloc, alloc_zeroed, dealloc, Layout};
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use crate::element::Element;
use crate::error::{allocation_failure, layout_error, Result};

fn layout(size: usize, alignment: usize) -> Result<Layout> {
    if size == 0 {
        return Err(layout_error(size, alignment, "size must be non-zero"));
    }
    Layout::from_size_align(size, alignment).map_err(|e| layout_error(size, alignment, e.to_string()))
}

fn allocate_with(
    size: usize,
    alignment: usize,
    raw: unsafe fn(Layout) -> *mut u8,
) -> Result<NonNull<u8>> {
    let layout = layout(size, alignment)?;
    // SAFETY: `layout` has a non-zero size.
    let ptr = unsafe { raw(layout) };
    match NonNull::new(ptr) {
        Some(ptr) => {
            log::trace!("allocated {size} bytes aligned to {alignment} at {ptr:p}");
            Ok(ptr)
        }
        None => Err(allocation_failure(size, alignment, "allocator returned null")),
    }
}

/// Allocates `size` uninitialised bytes aligned to `alignment`.
///
/// # Errors
///
/// [`LaneError::Layout`](crate::LaneError::Layout) when `size` is zero,
/// `alignment` is not a power of two, or the rounded size overflows `isize`;
/// [`LaneError::AllocationFailure`](crate::LaneError::AllocationFailure) when the
/// system allocator has no memory to give.
///
/// ```rust
/// let ptr = lanefold::alloc::allocate(256, 64).unwrap();
/// assert_eq!(ptr.as_ptr() as usize % 64, 0);
/// unsafe { lanefold::alloc::free(ptr, 256, 64) };
/// ```
pub fn allocate(size: usize, alignment: usize) -> Result<NonNull<u8>> {
    allocate_with(size, alignment, alloc)
}

/// [`allocate`] with every byte set to zero.
pub fn allocate_zeroed(size: usize, alignment: usize) -> Result<NonNull<u8>> {
    allocate_with(size, alignment, alloc_zeroed)
}

/// Releases memory obtained from [`allocate`] or [`allocate_zeroed`].
///
/// # Safety
///
/// `ptr` must come from one of those functions called with the same `size` and
/// `alignment`, and must not be used or freed again afterwards.
pub unsafe fn free(ptr: NonNull<u8>, size: usize, alignment: usize) {
    log::trace!("freeing {size} bytes aligned to {alignment} at {ptr:p}");
    // SAFETY: the caller passes the layout the block was allocated with.
    dealloc(ptr.as_ptr(), Layout::from_size_align_unchecked(size, alignment));
}

/// An owned, zero-initialised slice of elements starting on an `alignment`-byte
/// boundary.
///
/// Dereferences to `[T]`, so it can be handed straight to
/// [`SimdVec::load_aligned`](crate::SimdVec::load_aligned) and the slice kernels.
///
/// ```rust
/// use lanefold::alloc::AlignedBuffer;
/// use lanefold::SimdVec;
///
/// let mut buffer = AlignedBuffer::<f32>::zeroed(32, SimdVec::<f32, 16>::ALIGNMENT).unwrap();
/// SimdVec::<f32, 16>::splat(2.0).store_aligned(&mut buffer[16..]).unwrap();
/// let v = SimdVec::<f32, 16>::load_aligned(&buffer[16..]).unwrap();
/// assert_eq!(v.hadd(), 32.0);
/// ```
pub struct AlignedBuffer<T: Element> {
    ptr: NonNull<T>,
    len: usize,
    alignment: usize,
}

impl<T: Element> AlignedBuffer<T> {
    /// `len` zero elements aligned to `alignment` bytes.
    ///
    /// # Errors
    ///
    /// [`LaneError::Layout`](crate::LaneError::Layout) when `alignment` is not a
    /// power of two or is smaller than the natural alignment of `T`, or the byte
    /// size overflows; [`LaneError::AllocationFailure`](crate::LaneError::AllocationFailure)
    /// when memory is exhausted.
    pub fn zeroed(len: usize, alignment: usize) -> Result<Self> {
        if alignment < mem::align_of::<T>() {
            return Err(layout_error(
                len,
                alignment,
                format!("alignment below the natural alignment of {}", T::KIND),
            ));
        }
        let bytes = len
            .checked_mul(mem::size_of::<T>())
            .ok_or_else(|| layout_error(len, alignment, "byte size overflows usize"))?;
        // Empty buffers still own one block so the pointer stays aligned.
        let ptr = allocate_zeroed(bytes.max(1), alignment)?;
        Ok(AlignedBuffer {
            ptr: ptr.cast(),
            len,
            alignment,
        })
    }

    /// An aligned copy of `values`.
    ///
    /// # Errors
    ///
    /// As [`zeroed`](Self::zeroed).
    pub fn from_slice(values: &[T], alignment: usize) -> Result<Self> {
        let mut buffer = Self::zeroed(values.len(), alignment)?;
        buffer.copy_from_slice(values);
        Ok(buffer)
    }

    /// Alignment in bytes of the first element.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    fn byte_size(&self) -> usize {
        (self.len * mem::size_of::<T>()).max(1)
    }
}

impl<T: Element> Deref for AlignedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // SAFETY: `ptr` owns `len` initialised elements.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Element> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: `ptr` owns `len` initialised elements and `&mut self` is unique.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Element> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        // SAFETY: allocated in `zeroed` with this size and alignment.
        unsafe { free(self.ptr.cast(), self.byte_size(), self.alignment) };
    }
}

impl<T: Element> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("alignment", &self.alignment)
            .field("values", &&**self)
            .finish()
    }
}

// SAFETY: the buffer uniquely owns plain `Send + Sync` elements.
unsafe impl<T: Element> Send for AlignedBuffer<T> {}
unsafe impl<T: Element> Sync for AlignedBuffer<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LaneError;
    use crate::simd::SimdVec;

    mod raw_tests {
        use super::*;

        #[test]
        fn test_allocate_alignment() {
            for alignment in [8, 16, 32, 64, 4096] {
                let ptr = allocate(100, alignment).unwrap();
                assert_eq!(ptr.as_ptr() as usize % alignment, 0);
                unsafe { free(ptr, 100, alignment) };
            }
        }

        #[test]
        fn test_allocate_zeroed() {
            let ptr = allocate_zeroed(64, 32).unwrap();
            let bytes = unsafe { std::slice::from_raw_parts(ptr.as_ptr(), 64) };
            assert!(bytes.iter().all(|&b| b == 0));
            unsafe { free(ptr, 64, 32) };
        }

        #[test]
        fn test_invalid_layouts() {
            assert!(matches!(allocate(64, 3), Err(LaneError::Layout { alignment: 3, .. })));
            assert!(matches!(allocate(0, 16), Err(LaneError::Layout { size: 0, .. })));
            assert!(matches!(allocate(usize::MAX, 64), Err(LaneError::Layout { .. })));
        }

        #[test]
        fn test_exhaustion_is_an_error() {
            let size = isize::MAX as usize - 64;
            assert!(matches!(
                allocate(size, 64),
                Err(LaneError::AllocationFailure { alignment: 64, .. })
            ));
        }
    }

    mod buffer_tests {
        use super::*;

        #[test]
        fn test_zeroed_buffer() {
            let buffer = AlignedBuffer::<f64>::zeroed(37, 64).unwrap();
            assert_eq!(buffer.len(), 37);
            assert_eq!(buffer.alignment(), 64);
            assert_eq!(buffer.as_ptr() as usize % 64, 0);
            assert!(buffer.iter().all(|&x| x == 0.0));
        }

        #[test]
        fn test_empty_buffer() {
            let buffer = AlignedBuffer::<u8>::zeroed(0, 32).unwrap();
            assert!(buffer.is_empty());
            assert_eq!(buffer.as_ptr() as usize % 32, 0);
        }

        #[test]
        fn test_alignment_below_element() {
            assert!(matches!(
                AlignedBuffer::<f64>::zeroed(4, 4),
                Err(LaneError::Layout { alignment: 4, .. })
            ));
        }

        #[test]
        fn test_aligned_vector_access() {
            let values: Vec<f32> = (0..64).map(|i| i as f32).collect();
            let buffer = AlignedBuffer::from_slice(&values, SimdVec::<f32, 16>::ALIGNMENT).unwrap();
            for block in buffer.chunks_exact(16) {
                let v = SimdVec::<f32, 16>::load_aligned(block).unwrap();
                assert_eq!(v.to_array(), <[f32; 16]>::try_from(block).unwrap());
            }
        }

        #[test]
        fn test_mutation_through_deref() {
            let mut buffer = AlignedBuffer::<i32>::zeroed(8, 32).unwrap();
            buffer[3] = 7;
            SimdVec::<i32, 4>::splat(-1).store_aligned(&mut buffer[4..]).unwrap();
            assert_eq!(&buffer[..], &[0, 0, 0, 7, -1, -1, -1, -1]);
        }
    }
}
