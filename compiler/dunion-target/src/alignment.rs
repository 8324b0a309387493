//! This module defines the [Alignment] of values, which is always a power
//! of two number of bytes.

use std::fmt;

use crate::size::Size;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AlignmentError {
    /// The provided alignment size is not a power of two.
    NotPowerOfTwo,

    /// The provided alignment value is too large.
    TooLarge,
}

impl fmt::Display for AlignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentError::NotPowerOfTwo => write!(f, "alignment is not a power of two"),
            AlignmentError::TooLarge => write!(f, "alignment is larger than 2^29 bytes"),
        }
    }
}

impl std::error::Error for AlignmentError {}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alignment {
    /// The alignment of the data in powers of two bytes.
    ///
    /// N.B. The alignment is always a power of two, and is always
    /// within `1..=2^29` bytes.
    pow2: u8,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Size::from_bytes(self.bytes()))
    }
}

impl fmt::Debug for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "align[value={}]", self.bytes())
    }
}

impl Alignment {
    pub const ONE: Alignment = Alignment { pow2: 0 };
    pub const MAX: Alignment = Alignment { pow2: 29 };

    /// Create a new alignment from the given alignment in bytes. If
    /// the specified alignment value is invalid, then an [AlignmentError]
    /// is returned.
    #[inline]
    pub fn from_bytes(size: u64) -> Result<Alignment, AlignmentError> {
        // A zero size is aligned to the minimum alignment of 1.
        if size == 0 {
            return Ok(Alignment::ONE);
        }

        if !size.is_power_of_two() {
            return Err(AlignmentError::NotPowerOfTwo);
        }

        let pow2 = size.trailing_zeros() as u8;

        if pow2 > Self::MAX.pow2 {
            return Err(AlignmentError::TooLarge);
        }

        Ok(Alignment { pow2 })
    }

    /// Get the alignment value in bytes.
    #[inline]
    pub fn bytes(&self) -> u64 {
        1 << self.pow2
    }
}
