//! The schema model of a discriminated union. A [Schema] is an immutable
//! description of a closed set of [Variant]s, each of which carries a fixed,
//! ordered list of [FieldSpec]s.
//!
//! Schemas are only created through [define_schema], and never change after
//! they have been created. This is what allows the layout of a schema to be
//! computed once and shared.

pub mod error;
pub mod identifier;
pub mod ty;

use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};

use dunion_utils::{
    fxhash::FxHashMap,
    index_vec::{IndexVec, define_index_type},
    itertools::Itertools,
    log,
};
use error::SchemaError;
use identifier::Identifier;
use ty::FieldSpec;

define_index_type! {
    /// The index of a [Variant] within a [Schema], this is also the value of
    /// the tag of a union value.
    pub struct VariantIdx = u32;

    DISPLAY_FORMAT = "{}";
    MAX_INDEX = u32::MAX as usize;
    DISABLE_MAX_INDEX_CHECK = cfg!(not(debug_assertions));
}

define_index_type! {
    /// The index of a field within a [Variant].
    pub struct FieldIdx = u32;

    DISPLAY_FORMAT = "{}";
    MAX_INDEX = u32::MAX as usize;
    DISABLE_MAX_INDEX_CHECK = cfg!(not(debug_assertions));
}

/// The identity of a [Schema]. Two schemas with the same declaration still
/// have distinct identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaId(u32);

impl SchemaId {
    fn fresh() -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        SchemaId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single, named, mutually exclusive case of a union.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variant {
    /// The name of the variant.
    pub name: Identifier,

    /// The fields of the variant, in declaration order. This order is both
    /// the order of construction arguments and the order of bindings when
    /// the variant is deconstructed.
    pub fields: Vec<FieldSpec>,
}

impl Variant {
    /// Create a new [Variant] with the given fields.
    pub fn new(name: impl Into<Identifier>, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        Self { name: name.into(), fields: fields.into_iter().collect() }
    }

    /// Create a new [Variant] without any fields.
    pub fn unit(name: impl Into<Identifier>) -> Self {
        Self { name: name.into(), fields: vec![] }
    }

    /// Get the number of fields of the variant.
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Get the field at the given index.
    pub fn field(&self, index: FieldIdx) -> Option<&FieldSpec> {
        self.fields.get(index.index())
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}({})", self.name, self.fields.iter().join(", "))
        }
    }
}

/// The data of a [Schema].
#[derive(Debug)]
pub struct SchemaData {
    id: SchemaId,
    name: Identifier,
    variants: IndexVec<VariantIdx, Variant>,
    lookup: FxHashMap<Identifier, VariantIdx>,
}

impl SchemaData {
    /// The identity of the schema.
    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// The name of the schema.
    pub fn name(&self) -> &Identifier {
        &self.name
    }

    /// All of the variants of the schema, in declaration order.
    pub fn variants(&self) -> &IndexVec<VariantIdx, Variant> {
        &self.variants
    }

    /// Get a specific variant of the schema.
    pub fn variant(&self, index: VariantIdx) -> &Variant {
        &self.variants[index]
    }

    /// Get the number of variants in the schema.
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Find a variant by its name.
    pub fn variant_index(&self, name: &str) -> Option<VariantIdx> {
        self.lookup.get(name).copied()
    }

    /// Iterate over all of the variant indices of the schema.
    pub fn variant_indices(&self) -> impl Iterator<Item = VariantIdx> + '_ {
        self.variants.indices()
    }

    /// The largest number of fields that any variant of the schema has.
    pub fn max_arity(&self) -> usize {
        self.variants.iter().map(Variant::arity).max().unwrap_or(0)
    }
}

/// A shared handle to an immutable union schema.
///
/// Equality and hashing of [Schema]s is based on their identity, use
/// [Schema::is_structurally_equivalent] to compare declarations.
#[derive(Clone)]
pub struct Schema(Arc<SchemaData>);

impl Deref for Schema {
    type Target = SchemaData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Schema {}

impl Hash for Schema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema({}{})", self.name, self.id)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.variants.iter().join(" | "))
    }
}

impl Schema {
    /// Check whether two schemas declare the same variants, with the same
    /// names and field types in the same order. The name of the schema
    /// itself and the names of fields are not considered.
    pub fn is_structurally_equivalent(&self, other: &Schema) -> bool {
        if self == other {
            return true;
        }

        self.variants.len() == other.variants.len()
            && self.variants.iter().zip(other.variants.iter()).all(|(left, right)| {
                left.name == right.name
                    && left.arity() == right.arity()
                    && left
                        .fields
                        .iter()
                        .zip(&right.fields)
                        .all(|(l, r)| l.ty.is_structurally_equivalent(&r.ty))
            })
    }
}

/// The name of the catch-all arm of a match, which no variant may take.
pub const WILDCARD: &str = "_";

/// Define a new [Schema] with the given name and variants.
///
/// Fails if the variant list is empty, if a variant is named [WILDCARD], if
/// two variants share a name, or if two fields of one variant share a name.
pub fn define_schema(
    name: impl Into<Identifier>,
    variants: impl IntoIterator<Item = Variant>,
) -> Result<Schema, SchemaError> {
    let name = name.into();
    let variants: IndexVec<VariantIdx, Variant> = variants.into_iter().collect();

    if variants.is_empty() {
        return Err(SchemaError::EmptySchema { schema: name });
    }

    let mut lookup = FxHashMap::default();

    for (index, variant) in variants.iter_enumerated() {
        if variant.name == WILDCARD {
            return Err(SchemaError::ReservedVariantName { schema: name, variant: index });
        }

        if let Some(&first) = lookup.get(&variant.name) {
            return Err(SchemaError::DuplicateVariantName {
                schema: name,
                name: variant.name.clone(),
                first,
                duplicate: index,
            });
        }

        if let Some(field) = variant
            .fields
            .iter()
            .filter_map(|field| field.name.as_ref())
            .duplicates()
            .next()
        {
            return Err(SchemaError::DuplicateFieldName {
                schema: name,
                variant: variant.name.clone(),
                name: field.clone(),
            });
        }

        lookup.insert(variant.name.clone(), index);
    }

    let schema = Schema(Arc::new(SchemaData { id: SchemaId::fresh(), name, variants, lookup }));
    log::debug!("defined union schema {schema}");

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use dunion_target::{data_layout::TargetDataLayout, primitives::FloatTy};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ty::FieldTy;

    fn f64_field(name: &str) -> FieldSpec {
        FieldSpec::primitive(FieldTy::Float(FloatTy::F64), &TargetDataLayout::default())
            .unwrap()
            .named(name)
    }

    fn shape() -> Schema {
        define_schema(
            "Shape",
            [
                Variant::new("Rectangle", [f64_field("width"), f64_field("length")]),
                Variant::new("Circle", [f64_field("radius")]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_define_schema() {
        let schema = shape();

        assert_eq!(schema.variant_count(), 2);
        assert_eq!(schema.variant_index("Circle"), Some(VariantIdx::new(1)));
        assert_eq!(schema.variant_index("Triangle"), None);
        assert_eq!(schema.max_arity(), 2);
        assert_eq!(
            schema.to_string(),
            "Shape = Rectangle(width: f64, length: f64) | Circle(radius: f64)"
        );
    }

    #[test]
    fn test_empty_schema_is_rejected() {
        let err = define_schema("Never", []).unwrap_err();
        assert_eq!(err, SchemaError::EmptySchema { schema: "Never".into() });
    }

    #[test]
    fn test_duplicate_variant_is_rejected() {
        let err =
            define_schema("Dup", [Variant::unit("A"), Variant::unit("B"), Variant::unit("A")])
                .unwrap_err();

        assert_eq!(
            err,
            SchemaError::DuplicateVariantName {
                schema: "Dup".into(),
                name: "A".into(),
                first: VariantIdx::new(0),
                duplicate: VariantIdx::new(2),
            }
        );
    }

    #[test]
    fn test_wildcard_variant_is_rejected() {
        let err = define_schema("Pattern", [Variant::unit("Any"), Variant::unit(WILDCARD)])
            .unwrap_err();

        assert_eq!(
            err,
            SchemaError::ReservedVariantName { schema: "Pattern".into(), variant: VariantIdx::new(1) }
        );
        assert_eq!(err.to_string(), "variant #1 of union `Pattern` cannot be named `_`");
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let err = define_schema("Point", [Variant::new("P", [f64_field("x"), f64_field("x")])])
            .unwrap_err();

        assert!(matches!(err, SchemaError::DuplicateFieldName { .. }));
    }

    #[test]
    fn test_schema_identity() {
        let (left, right) = (shape(), shape());

        assert_ne!(left, right);
        assert_eq!(left, left.clone());
        assert!(left.is_structurally_equivalent(&right));

        let other = define_schema("Shape", [Variant::unit("Rectangle")]).unwrap();
        assert!(!left.is_structurally_equivalent(&other));
    }
}
