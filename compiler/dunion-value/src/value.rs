//! Field values that can be stored in the slots of a [TaggedValue].
use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
    sync::Arc,
};

use dunion_schema::ty::FieldTy;
use dunion_target::{
    data_layout::HasDataLayout,
    primitives::{FloatTy, SIntTy, UIntTy},
};

use crate::{Comparability, TaggedValue};

/// A single field value. Every value carries its own type so that it can be
/// checked against the [FieldTy] of the field that it is written into.
///
/// Floats are compared and hashed by their bit pattern.
#[derive(Debug, Clone)]
pub enum Value {
    Unit,
    Bool(bool),
    Char(char),
    Int { value: i128, ty: SIntTy },
    UInt { value: u128, ty: UIntTy },
    Float { value: f64, ty: FloatTy },
    Str(Arc<str>),

    /// An embedded union value.
    Union(Box<TaggedValue>),
}

macro_rules! value_from_primitive {
    ($($ty:ty => |$value:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($value: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

value_from_primitive! {
    () => |_value| Value::Unit,
    bool => |value| Value::Bool(value),
    char => |value| Value::Char(value),
    i8 => |value| Value::Int { value: value.into(), ty: SIntTy::I8 },
    i16 => |value| Value::Int { value: value.into(), ty: SIntTy::I16 },
    i32 => |value| Value::Int { value: value.into(), ty: SIntTy::I32 },
    i64 => |value| Value::Int { value: value.into(), ty: SIntTy::I64 },
    i128 => |value| Value::Int { value, ty: SIntTy::I128 },
    u8 => |value| Value::UInt { value: value.into(), ty: UIntTy::U8 },
    u16 => |value| Value::UInt { value: value.into(), ty: UIntTy::U16 },
    u32 => |value| Value::UInt { value: value.into(), ty: UIntTy::U32 },
    u64 => |value| Value::UInt { value: value.into(), ty: UIntTy::U64 },
    u128 => |value| Value::UInt { value, ty: UIntTy::U128 },
    f32 => |value| Value::Float { value: value.into(), ty: FloatTy::F32 },
    f64 => |value| Value::Float { value, ty: FloatTy::F64 },
    &str => |value| Value::Str(value.into()),
    String => |value| Value::Str(value.into()),
    TaggedValue => |value| Value::Union(Box::new(value)),
}

impl Value {
    /// The [FieldTy] of the value.
    pub fn ty(&self) -> FieldTy {
        match self {
            Value::Unit => FieldTy::Unit,
            Value::Bool(_) => FieldTy::Bool,
            Value::Char(_) => FieldTy::Char,
            Value::Int { ty, .. } => FieldTy::Int(*ty),
            Value::UInt { ty, .. } => FieldTy::UInt(*ty),
            Value::Float { ty, .. } => FieldTy::Float(*ty),
            Value::Str(_) => FieldTy::Str,
            Value::Union(value) => FieldTy::Union(value.schema().clone()),
        }
    }

    /// Check whether the value may be stored in a field of the given type.
    /// No coercion is performed, an `i32` does not conform to `i64`, and
    /// embedded unions must be of the exact same schema.
    pub fn conforms_to(&self, ty: &FieldTy) -> bool {
        match (self, ty) {
            (Value::Unit, FieldTy::Unit)
            | (Value::Bool(_), FieldTy::Bool)
            | (Value::Char(_), FieldTy::Char)
            | (Value::Str(_), FieldTy::Str) => true,
            (Value::Int { ty, .. }, FieldTy::Int(expected)) => ty == expected,
            (Value::UInt { ty, .. }, FieldTy::UInt(expected)) => ty == expected,
            (Value::Float { ty, .. }, FieldTy::Float(expected)) => ty == expected,
            (Value::Union(value), FieldTy::Union(schema)) => value.schema() == schema,
            _ => false,
        }
    }

    /// Parse a value of the given primitive type from its textual form.
    /// Integers must fit into the width of their type on the target.
    /// Embedded unions cannot be parsed.
    pub fn parse<C: HasDataLayout>(text: &str, ty: &FieldTy, cx: &C) -> Option<Self> {
        let text = text.trim();

        let value = match ty {
            FieldTy::Unit => (text == "()").then_some(Value::Unit)?,
            FieldTy::Bool => Value::Bool(text.parse().ok()?),
            FieldTy::Char => {
                let mut chars = text.chars();
                let value = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }

                Value::Char(value)
            }
            FieldTy::Str => Value::Str(text.into()),
            FieldTy::Int(int_ty) => {
                let value: i128 = text.parse().ok()?;
                let bits = int_ty.size(cx).bits();

                if bits < 128 {
                    let max = (1i128 << (bits - 1)) - 1;
                    if value > max || value < -max - 1 {
                        return None;
                    }
                }

                Value::Int { value, ty: *int_ty }
            }
            FieldTy::UInt(int_ty) => {
                let value: u128 = text.parse().ok()?;
                let bits = int_ty.size(cx).bits();

                if bits < 128 && value >> bits != 0 {
                    return None;
                }

                Value::UInt { value, ty: *int_ty }
            }
            FieldTy::Float(FloatTy::F32) => {
                Value::Float { value: parse_float::<f32>(text)?, ty: FloatTy::F32 }
            }
            FieldTy::Float(FloatTy::F64) => {
                Value::Float { value: parse_float::<f64>(text)?, ty: FloatTy::F64 }
            }
            FieldTy::Union(_) => return None,
        };

        Some(value)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Value::Int { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Value::UInt { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&TaggedValue> {
        match self {
            Value::Union(value) => Some(value),
            _ => None,
        }
    }

    /// Compare two values, embedded unions are compared with the given
    /// [Comparability].
    pub fn eq_with(&self, other: &Value, comparability: Comparability) -> bool {
        match (self, other) {
            (Value::Union(left), Value::Union(right)) => left.eq_with(right, comparability),
            (Value::Float { value: left, ty: l }, Value::Float { value: right, ty: r }) => {
                l == r && left.to_bits() == right.to_bits()
            }
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Char(left), Value::Char(right)) => left == right,
            (Value::Int { value: left, ty: l }, Value::Int { value: right, ty: r }) => {
                l == r && left == right
            }
            (Value::UInt { value: left, ty: l }, Value::UInt { value: right, ty: r }) => {
                l == r && left == right
            }
            (Value::Str(left), Value::Str(right)) => left == right,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.eq_with(other, Comparability::Nominal)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Value::Unit => {}
            Value::Bool(value) => value.hash(state),
            Value::Char(value) => value.hash(state),
            Value::Int { value, ty } => (value, ty).hash(state),
            Value::UInt { value, ty } => (value, ty).hash(state),
            Value::Float { value, ty } => (value.to_bits(), ty).hash(state),
            Value::Str(value) => value.hash(state),
            Value::Union(value) => value.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Char(value) => write!(f, "{value:?}"),
            Value::Int { value, .. } => write!(f, "{value}"),
            Value::UInt { value, .. } => write!(f, "{value}"),
            Value::Float { value, .. } => write!(f, "{value:?}"),
            Value::Str(value) => write!(f, "{value:?}"),
            Value::Union(value) => write!(f, "{value}"),
        }
    }
}

/// Parse a float of width `F`. A finite literal that overflows the width is
/// rejected, only `inf` and `nan` spellings may produce non-finite values.
fn parse_float<F: FromStr + Into<f64>>(text: &str) -> Option<f64> {
    let value: f64 = text.parse::<F>().ok()?.into();

    if value.is_finite() {
        return Some(value);
    }

    let literal = text.trim_start_matches(['+', '-']).to_ascii_lowercase();
    matches!(literal.as_str(), "inf" | "infinity" | "nan").then_some(value)
}
