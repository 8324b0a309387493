//! ABI level integer representations, used for storing discriminants
//! and sizing integer scalars.

use std::fmt;

use crate::{alignment::Alignment, data_layout::HasDataLayout, size::Size};

/// An integer of a particular width, without signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Integer {
    I8,
    I16,
    I32,
    I64,
    I128,
}

impl Integer {
    /// Compute the [Size] of the [Integer].
    #[inline]
    pub fn size(self) -> Size {
        use Integer::*;

        match self {
            I8 => Size::from_bytes(1),
            I16 => Size::from_bytes(2),
            I32 => Size::from_bytes(4),
            I64 => Size::from_bytes(8),
            I128 => Size::from_bytes(16),
        }
    }

    /// Get the [Alignment] of the [Integer] on the target.
    pub fn align<C: HasDataLayout>(self, ctx: &C) -> Alignment {
        use Integer::*;
        let dl = ctx.data_layout();

        match self {
            I8 => dl.i8_align,
            I16 => dl.i16_align,
            I32 => dl.i32_align,
            I64 => dl.i64_align,
            I128 => dl.i128_align,
        }
    }

    /// Find the smallest [Integer] that can hold the given number of bits.
    ///
    /// Returns [None] if the number of bits exceeds 128.
    pub fn fit_bits(bits: u32) -> Option<Self> {
        [Integer::I8, Integer::I16, Integer::I32, Integer::I64, Integer::I128]
            .into_iter()
            .find(|int| int.size().bits() >= bits as u64)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.size().bits())
    }
}
