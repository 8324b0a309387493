//! The boundary to open, structurally tagged unions. An open union is a set
//! of types, and a value of it is a value of any one of those types. Such a
//! union needs no layout planning and no tag beyond the type of the value,
//! so the only operations it requires are a type test and a checked
//! conversion between two type sets.
use std::fmt;

use dunion_schema::ty::FieldTy;
use dunion_utils::{itertools::Itertools, printing::SequenceDisplay};

use crate::value::Value;

/// A conversion between two open unions failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTestFailed {
    /// The value is not of any type of the union that it is converted from.
    NotInSource { given: FieldTy, from: Vec<FieldTy> },

    /// The value is not of any type of the union that it is converted to,
    /// a narrowing conversion that failed its type test.
    NotInTarget { given: FieldTy, to: Vec<FieldTy> },
}

impl fmt::Display for TypeTestFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (given, tys) = match self {
            TypeTestFailed::NotInSource { given, from } => (given, from),
            TypeTestFailed::NotInTarget { given, to } => (given, to),
        };

        let names = tys.iter().map(|ty| ty.to_string()).collect_vec();
        write!(f, "a value of type `{given}` is not one of {}", SequenceDisplay::either(&names))
    }
}

impl std::error::Error for TypeTestFailed {}

/// Values that can be members of an open union.
pub trait TypeTest: Sized {
    type Ty;

    /// Check whether the value is of the given type.
    fn test_type(&self, ty: &Self::Ty) -> bool;

    /// Convert a value of the union `from` into a value of the union `to`.
    /// A widening conversion always succeeds, a narrowing conversion
    /// succeeds when the value passes a type test against `to`.
    fn convert(self, from: &[Self::Ty], to: &[Self::Ty]) -> Result<Self, TypeTestFailed>;
}

impl TypeTest for Value {
    type Ty = FieldTy;

    fn test_type(&self, ty: &FieldTy) -> bool {
        self.conforms_to(ty)
    }

    fn convert(self, from: &[FieldTy], to: &[FieldTy]) -> Result<Self, TypeTestFailed> {
        if !from.iter().any(|ty| self.test_type(ty)) {
            return Err(TypeTestFailed::NotInSource { given: self.ty(), from: from.to_vec() });
        }

        if !to.iter().any(|ty| self.test_type(ty)) {
            return Err(TypeTestFailed::NotInTarget { given: self.ty(), to: to.to_vec() });
        }

        Ok(self)
    }
}
