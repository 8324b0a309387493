//! Represents all of the logic related to type sizes, and various
//! utilities surrounding type sizes.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, Mul},
};

use crate::alignment::Alignment;

/// Represents the size of some value in bytes. [Size] is a utility type that
/// allows one to perform conversions between bits and bytes, and to align
/// sizes.
#[derive(Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Size {
    value: u64,
}

impl Size {
    /// The [Size::ZERO] is used for zero-sized values, i.e. `()`.
    pub const ZERO: Size = Size { value: 0 };

    /// Create a [Size] from the number of bytes.
    pub const fn from_bytes(value: u64) -> Self {
        Self { value }
    }

    /// Return the [Size] in bytes.
    #[inline]
    pub fn bytes(self) -> u64 {
        self.value
    }

    /// Convert the [Size] into the number of bits.
    #[inline]
    pub fn bits(self) -> u64 {
        self.value * 8
    }

    /// Round the [Size] up to the next multiple of the given [Alignment].
    #[inline]
    pub fn align_to(self, alignment: Alignment) -> Size {
        let mask = alignment.bytes() - 1;
        Size::from_bytes((self.value + mask) & !mask)
    }

    /// Checked addition of two sizes.
    #[inline]
    pub fn checked_add(self, other: Size) -> Option<Size> {
        self.value.checked_add(other.value).map(Size::from_bytes)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}b", self.value)
    }
}

impl Add for Size {
    type Output = Size;

    #[inline]
    fn add(self, other: Size) -> Size {
        self.checked_add(other).unwrap_or_else(|| {
            panic!("Size::add: {} + {} doesn't fit in u64", self.bytes(), other.bytes())
        })
    }
}

impl Mul<u64> for Size {
    type Output = Size;

    #[inline]
    fn mul(self, count: u64) -> Size {
        match self.bytes().checked_mul(count) {
            Some(bytes) => Size::from_bytes(bytes),
            None => panic!("Size::mul: {} * {} doesn't fit in u64", self.bytes(), count),
        }
    }
}

impl Sum for Size {
    fn sum<I: Iterator<Item = Size>>(iter: I) -> Self {
        iter.fold(Size::ZERO, |acc, size| acc + size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_arithmetic() {
        let sizes = [1, 2, 4].map(Size::from_bytes);

        assert_eq!(sizes.into_iter().sum::<Size>(), Size::from_bytes(7));
        assert_eq!(Size::from_bytes(8) * 2, Size::from_bytes(16));
        assert_eq!(Size::from_bytes(u64::MAX).checked_add(Size::from_bytes(1)), None);
        assert_eq!(Size::from_bytes(24).to_string(), "24b");
    }

    #[test]
    fn test_size_align_to() {
        let eight = Alignment::from_bytes(8).unwrap();

        assert_eq!(Size::from_bytes(1).align_to(eight), Size::from_bytes(8));
        assert_eq!(Size::from_bytes(16).align_to(eight), Size::from_bytes(16));
        assert_eq!(Size::ZERO.align_to(eight), Size::ZERO);
    }
}
