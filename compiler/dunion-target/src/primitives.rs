//! Defines primitive types that are used to represent floating-point types,
//! integers, etc. These are shared by the schema model and the layout
//! planner, and carry their own sizing information.

use std::fmt;

use crate::{abi::Integer, alignment::Alignment, data_layout::HasDataLayout, size::Size};

/// A primitive floating-point type, either a `f32` or an `f64`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum FloatTy {
    F32,
    F64,
}

impl FloatTy {
    /// Compute the [Size] of the [FloatTy].
    #[inline]
    pub fn size(self) -> Size {
        match self {
            FloatTy::F32 => Size::from_bytes(4),
            FloatTy::F64 => Size::from_bytes(8),
        }
    }

    /// Get the [Alignment] of the [FloatTy].
    pub fn align<C: HasDataLayout>(self, cx: &C) -> Alignment {
        let dl = cx.data_layout();

        match self {
            FloatTy::F32 => dl.f32_align,
            FloatTy::F64 => dl.f64_align,
        }
    }

    /// Convert the [FloatTy] into a primitive type name.
    pub fn to_name(self) -> &'static str {
        match self {
            FloatTy::F32 => "f32",
            FloatTy::F64 => "f64",
        }
    }

    /// Parse a [FloatTy] from its primitive type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "f32" => Some(FloatTy::F32),
            "f64" => Some(FloatTy::F64),
            _ => None,
        }
    }
}

impl fmt::Display for FloatTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_name())
    }
}

/// Signed integer type variants.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum SIntTy {
    I8,
    I16,
    I32,
    I64,
    I128,
    ISize,
}

impl SIntTy {
    /// Get the [Integer] that represents this type on the target.
    pub fn to_integer<C: HasDataLayout>(self, cx: &C) -> Integer {
        match self {
            SIntTy::I8 => Integer::I8,
            SIntTy::I16 => Integer::I16,
            SIntTy::I32 => Integer::I32,
            SIntTy::I64 => Integer::I64,
            SIntTy::I128 => Integer::I128,
            SIntTy::ISize => cx.data_layout().ptr_sized_integer(),
        }
    }

    /// Get the [Size] of the [SIntTy] on the target.
    pub fn size<C: HasDataLayout>(self, cx: &C) -> Size {
        self.to_integer(cx).size()
    }

    /// Get the [Alignment] of the [SIntTy] on the target.
    pub fn align<C: HasDataLayout>(self, cx: &C) -> Alignment {
        self.to_integer(cx).align(cx)
    }

    /// Convert the [SIntTy] into a primitive type name.
    pub fn to_name(self) -> &'static str {
        match self {
            SIntTy::I8 => "i8",
            SIntTy::I16 => "i16",
            SIntTy::I32 => "i32",
            SIntTy::I64 => "i64",
            SIntTy::I128 => "i128",
            SIntTy::ISize => "isize",
        }
    }

    /// Parse a [SIntTy] from its primitive type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "i8" => Some(SIntTy::I8),
            "i16" => Some(SIntTy::I16),
            "i32" => Some(SIntTy::I32),
            "i64" => Some(SIntTy::I64),
            "i128" => Some(SIntTy::I128),
            "isize" => Some(SIntTy::ISize),
            _ => None,
        }
    }
}

impl fmt::Display for SIntTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_name())
    }
}

/// Unsigned integer type variants.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum UIntTy {
    U8,
    U16,
    U32,
    U64,
    U128,
    USize,
}

impl UIntTy {
    /// Get the [Integer] that represents this type on the target.
    pub fn to_integer<C: HasDataLayout>(self, cx: &C) -> Integer {
        match self {
            UIntTy::U8 => Integer::I8,
            UIntTy::U16 => Integer::I16,
            UIntTy::U32 => Integer::I32,
            UIntTy::U64 => Integer::I64,
            UIntTy::U128 => Integer::I128,
            UIntTy::USize => cx.data_layout().ptr_sized_integer(),
        }
    }

    /// Get the [Size] of the [UIntTy] on the target.
    pub fn size<C: HasDataLayout>(self, cx: &C) -> Size {
        self.to_integer(cx).size()
    }

    /// Get the [Alignment] of the [UIntTy] on the target.
    pub fn align<C: HasDataLayout>(self, cx: &C) -> Alignment {
        self.to_integer(cx).align(cx)
    }

    /// Convert the [UIntTy] into a primitive type name
    pub fn to_name(self) -> &'static str {
        match self {
            UIntTy::U8 => "u8",
            UIntTy::U16 => "u16",
            UIntTy::U32 => "u32",
            UIntTy::U64 => "u64",
            UIntTy::U128 => "u128",
            UIntTy::USize => "usize",
        }
    }

    /// Parse a [UIntTy] from its primitive type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "u8" => Some(UIntTy::U8),
            "u16" => Some(UIntTy::U16),
            "u32" => Some(UIntTy::U32),
            "u64" => Some(UIntTy::U64),
            "u128" => Some(UIntTy::U128),
            "usize" => Some(UIntTy::USize),
            _ => None,
        }
    }
}

impl fmt::Display for UIntTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_name())
    }
}
