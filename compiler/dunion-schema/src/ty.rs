//! Field types and the [FieldSpec]s that carry their physical
//! representation.
use std::fmt;

use dunion_target::{
    alignment::Alignment,
    data_layout::HasDataLayout,
    primitives::{FloatTy, SIntTy, UIntTy},
    size::Size,
};

use crate::{Schema, identifier::Identifier};

/// The declared type of a variant field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldTy {
    /// A signed integer type.
    Int(SIntTy),

    /// An unsigned integer type.
    UInt(UIntTy),

    /// A floating point type.
    Float(FloatTy),

    /// A boolean, `true` or `false`.
    Bool,

    /// A unicode scalar value.
    Char,

    /// An immutable string, represented as a pointer and a length.
    Str,

    /// The zero-sized unit type.
    Unit,

    /// Another, previously defined, union which is embedded by value.
    Union(Schema),
}

impl FieldTy {
    /// Parse a primitive [FieldTy] from its name, i.e. `f64` or `bool`.
    /// Union types cannot be named here since they need to be resolved.
    pub fn primitive_from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(FieldTy::Bool),
            "char" => Some(FieldTy::Char),
            "str" => Some(FieldTy::Str),
            "()" => Some(FieldTy::Unit),
            _ => SIntTy::from_name(name)
                .map(FieldTy::Int)
                .or_else(|| UIntTy::from_name(name).map(FieldTy::UInt))
                .or_else(|| FloatTy::from_name(name).map(FieldTy::Float)),
        }
    }

    /// Compute the size and alignment of a primitive [FieldTy]. Returns
    /// [None] for [FieldTy::Union] since the size of an embedded union is
    /// the size of its planned layout.
    pub fn primitive_layout<C: HasDataLayout>(&self, cx: &C) -> Option<(Size, Alignment)> {
        let dl = cx.data_layout();

        let layout = match self {
            FieldTy::Int(ty) => (ty.size(cx), ty.align(cx)),
            FieldTy::UInt(ty) => (ty.size(cx), ty.align(cx)),
            FieldTy::Float(ty) => (ty.size(), ty.align(cx)),
            FieldTy::Bool => (Size::from_bytes(1), dl.i8_align),
            FieldTy::Char => (Size::from_bytes(4), dl.i32_align),
            FieldTy::Str => (dl.pointer_size * 2, dl.pointer_align),
            FieldTy::Unit => (Size::ZERO, Alignment::ONE),
            FieldTy::Union(_) => return None,
        };

        Some(layout)
    }

    /// Compare two types structurally, ignoring the identity of any embedded
    /// union schemas.
    pub fn is_structurally_equivalent(&self, other: &FieldTy) -> bool {
        match (self, other) {
            (FieldTy::Union(left), FieldTy::Union(right)) => {
                left.is_structurally_equivalent(right)
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for FieldTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldTy::Int(ty) => write!(f, "{ty}"),
            FieldTy::UInt(ty) => write!(f, "{ty}"),
            FieldTy::Float(ty) => write!(f, "{ty}"),
            FieldTy::Bool => write!(f, "bool"),
            FieldTy::Char => write!(f, "char"),
            FieldTy::Str => write!(f, "str"),
            FieldTy::Unit => write!(f, "()"),
            FieldTy::Union(schema) => write!(f, "{}", schema.name()),
        }
    }
}

/// The specification of a single variant field: its declared type, and the
/// physical width and alignment that the layout planner uses for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    /// An optional name of the field, fields are always addressed by their
    /// position.
    pub name: Option<Identifier>,

    /// The declared type of the field.
    pub ty: FieldTy,

    /// The representation width of the field.
    pub size: Size,

    /// The representation alignment of the field.
    pub alignment: Alignment,
}

impl FieldSpec {
    /// Create a new [FieldSpec] from an explicit width and alignment.
    pub fn new(ty: FieldTy, size: Size, alignment: Alignment) -> Self {
        Self { name: None, ty, size, alignment }
    }

    /// Create a [FieldSpec] for a primitive type on the given target.
    pub fn primitive<C: HasDataLayout>(ty: FieldTy, cx: &C) -> Option<Self> {
        let (size, alignment) = ty.primitive_layout(cx)?;
        Some(Self::new(ty, size, alignment))
    }

    /// Give the [FieldSpec] a name.
    pub fn named(mut self, name: impl Into<Identifier>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}: {}", self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}
