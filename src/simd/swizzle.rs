//! Lane permutations.

use std::fmt;

use crate::error::{index_out_of_range, Result};

use super::register::MAX_LANES;

/// A source lane for every destination lane of an `N`-lane vector.
///
/// Lane `i` of `v.swizzle(s)` is lane `s[i]` of `v`. Sources may repeat, so a
/// swizzle can broadcast as well as permute. Every source index is checked at
/// construction, which keeps [`apply`](Self::apply) infallible.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Swizzle<const N: usize> {
    lanes: [u8; N],
}

impl<const N: usize> Swizzle<N> {
    const CHECK: () = assert!(N >= 1 && N <= MAX_LANES, "swizzle lane count out of range");

    /// Builds a swizzle from source lane indices.
    ///
    /// # Errors
    ///
    /// [`LaneError::IndexOutOfRange`](crate::LaneError::IndexOutOfRange) for the
    /// first index that is not smaller than `N`.
    pub fn new(sources: [usize; N]) -> Result<Self> {
        if let Some(&bad) = sources.iter().find(|&&source| source >= N) {
            return Err(index_out_of_range(bad, N));
        }
        Ok(Self::from_fn(|i| sources[i]))
    }

    fn from_fn(f: impl Fn(usize) -> usize) -> Self {
        let () = Self::CHECK;
        Swizzle {
            lanes: std::array::from_fn(|i| (f(i) % N) as u8),
        }
    }

    /// Lane `i` takes lane `i`.
    pub fn identity() -> Self {
        Self::from_fn(|i| i)
    }

    /// Lane `i` takes lane `N - 1 - i`.
    pub fn reverse() -> Self {
        Self::from_fn(|i| N - 1 - i)
    }

    /// Lane `i` takes lane `(i + shift) % N`, moving every lane `shift` places down.
    pub fn rotate_left(shift: usize) -> Self {
        Self::from_fn(|i| (i + shift) % N)
    }

    /// Lane `i` takes lane `(i + N - shift % N) % N`.
    pub fn rotate_right(shift: usize) -> Self {
        Self::from_fn(|i| (i + N - shift % N) % N)
    }

    /// Every lane takes lane `source`.
    ///
    /// # Errors
    ///
    /// [`LaneError::IndexOutOfRange`](crate::LaneError::IndexOutOfRange) when
    /// `source >= N`.
    pub fn broadcast(source: usize) -> Result<Self> {
        if source >= N {
            return Err(index_out_of_range(source, N));
        }
        Ok(Self::from_fn(|_| source))
    }

    /// Source lane of destination lane `index`.
    ///
    /// # Errors
    ///
    /// [`LaneError::IndexOutOfRange`](crate::LaneError::IndexOutOfRange) when
    /// `index >= N`.
    pub fn source(&self, index: usize) -> Result<usize> {
        self.lanes
            .get(index)
            .map(|&source| source as usize)
            .ok_or_else(|| index_out_of_range(index, N))
    }

    /// The swizzle equivalent to applying `self` and then `next`.
    pub fn then(self, next: Swizzle<N>) -> Self {
        Self::from_fn(|i| self.lanes[next.lanes[i] as usize] as usize)
    }

    /// Permutes an array of lanes.
    pub fn apply<T: Copy>(&self, lanes: [T; N]) -> [T; N] {
        std::array::from_fn(|i| lanes[self.lanes[i] as usize])
    }
}

impl<const N: usize> Default for Swizzle<N> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<const N: usize> fmt::Debug for Swizzle<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Swizzle").field(&self.lanes).finish()
    }
}
