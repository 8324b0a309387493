//! Describes how primitive types are laid out on a particular target. This
//! is the information that the layout planner consumes to derive the width
//! and alignment of every field.

use crate::{Target, TargetName, abi::Integer, alignment::Alignment, size::Size};

/// Interface to access information about the target layout.
pub trait HasDataLayout {
    fn data_layout(&self) -> &TargetDataLayout;
}

impl HasDataLayout for TargetDataLayout {
    #[inline]
    fn data_layout(&self) -> &TargetDataLayout {
        self
    }
}

/// Defines all of the specifics of how primitive types are laid out for a
/// specific target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDataLayout {
    /// The alignment of byte values on the target.
    pub i8_align: Alignment,

    /// The alignment of 16-bit values on the target.
    pub i16_align: Alignment,

    /// The alignment of 32-bit values on the target.
    pub i32_align: Alignment,

    /// The alignment of 64-bit values on the target.
    pub i64_align: Alignment,

    /// The alignment of 128-bit values on the target.
    pub i128_align: Alignment,

    /// The [Size] of a pointer on the target.
    pub pointer_size: Size,

    /// The alignment of pointers on the target.
    pub pointer_align: Alignment,

    /// Alignment of `f32` values on the target.
    pub f32_align: Alignment,

    /// Alignment of `f64` values on the target.
    pub f64_align: Alignment,
}

impl TargetDataLayout {
    /// Derive the [TargetDataLayout] of the given [Target].
    pub fn from_target(target: &Target) -> Self {
        let align = |bytes| Alignment::from_bytes(bytes).unwrap_or(Alignment::ONE);
        let pointer_size = Size::from_bytes(target.pointer_width as u64);

        // 32-bit x86 only aligns 64-bit scalars to 4 bytes.
        let (wide_align, i128_align) = match target.name {
            TargetName::X86 => (align(4), align(4)),
            TargetName::Arm => (align(8), align(8)),
            TargetName::X86_64 | TargetName::Aarch64 => (align(8), align(16)),
        };

        Self {
            i8_align: align(1),
            i16_align: align(2),
            i32_align: align(4),
            i64_align: wide_align,
            i128_align,
            pointer_size,
            pointer_align: align(pointer_size.bytes()),
            f32_align: align(4),
            f64_align: wide_align,
        }
    }

    /// Get an equivalent [Integer] representation for a pointer
    /// on the current target.
    pub fn ptr_sized_integer(&self) -> Integer {
        match self.pointer_size.bits() {
            16 => Integer::I16,
            32 => Integer::I32,
            64 => Integer::I64,
            size => unreachable!("unknown pointer size of `{size}`"),
        }
    }
}

impl Default for TargetDataLayout {
    fn default() -> Self {
        Self::from_target(&Target::new(TargetName::X86_64, 8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_two_bit_layouts() {
        let dl = TargetDataLayout::from_target(&Target::new(TargetName::X86, 4));

        assert_eq!(dl.pointer_size, Size::from_bytes(4));
        assert_eq!(dl.ptr_sized_integer(), Integer::I32);
        assert_eq!(dl.f64_align.bytes(), 4);
    }

    #[test]
    fn test_default_is_sixty_four_bit() {
        let dl = TargetDataLayout::default();

        assert_eq!(dl.ptr_sized_integer(), Integer::I64);
        assert_eq!(dl.pointer_align.bytes(), 8);
        assert_eq!(dl.i128_align.bytes(), 16);
    }
}
