//! Runtime values of discriminated unions.
//!
//! A [TaggedValue] is a tag, the index of the active variant, and the slot
//! storage that the [Layout] of its schema describes. Only the slots of the
//! active variant hold a value, every other slot is empty. Values are only
//! created through [UnionRepr::construct] or a [VariantCtor], and the fields
//! of a value are only readable through the tag-checked accessors.

pub mod error;
pub mod open;
pub mod value;

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use dunion_repr::{Layout, LayoutStorage};
use dunion_schema::{FieldIdx, Schema, Variant, VariantIdx, identifier::Identifier};
use dunion_utils::{itertools::Itertools, log, smallvec::SmallVec};
use error::ValueError;
use value::Value;

/// How two union values of different schemas are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Comparability {
    /// Values are only comparable when they are of the same schema.
    #[default]
    Nominal,

    /// Values of distinct schemas are comparable when the schemas declare
    /// the same variants with the same field types.
    Structural,
}

impl fmt::Display for Comparability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparability::Nominal => write!(f, "nominal"),
            Comparability::Structural => write!(f, "structural"),
        }
    }
}

/// The representation of a union: its schema, and the layout that was
/// planned for it. This is cheap to clone, and is shared by all of the
/// values of the schema.
#[derive(Debug, Clone)]
pub struct UnionRepr {
    schema: Schema,
    layout: Arc<Layout>,
}

impl UnionRepr {
    /// Create the representation of a schema, planning its layout if it
    /// is not already in the storage.
    pub fn new(storage: &LayoutStorage, schema: Schema) -> Self {
        let layout = storage.layout_of(&schema);
        Self { schema, layout }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    /// Resolve a variant by its name.
    pub fn variant_index(&self, name: &str) -> Result<VariantIdx, ValueError> {
        self.schema.variant_index(name).ok_or_else(|| ValueError::UnknownVariant {
            schema: self.schema.name().clone(),
            name: name.into(),
        })
    }

    /// Get the definition of the variant at the given index.
    pub fn variant(&self, variant: VariantIdx) -> Result<&Variant, ValueError> {
        self.schema.variants().get(variant).ok_or_else(|| ValueError::VariantOutOfBounds {
            schema: self.schema.name().clone(),
            variant,
            count: self.schema.variant_count(),
        })
    }

    /// Get the constructor of the named variant.
    pub fn constructor(&self, name: &str) -> Result<VariantCtor<'_>, ValueError> {
        Ok(VariantCtor { repr: self, variant: self.variant_index(name)? })
    }

    /// Get the constructors of all of the variants, in declaration order.
    pub fn constructors(&self) -> impl Iterator<Item = VariantCtor<'_>> {
        self.schema.variant_indices().map(|variant| VariantCtor { repr: self, variant })
    }

    /// Construct a value of the named variant from its field values, in
    /// declared field order.
    pub fn construct(
        &self,
        name: &str,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<TaggedValue, ValueError> {
        self.construct_at(self.variant_index(name)?, values)
    }

    /// Construct a value of the variant at the given index.
    ///
    /// The number of values must be the arity of the variant, and each value
    /// must be of the declared type of its field. No coercion is performed.
    pub fn construct_at(
        &self,
        variant: VariantIdx,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<TaggedValue, ValueError> {
        let def = self.variant(variant)?;
        let values: SmallVec<[Value; 4]> = values.into_iter().collect();

        if values.len() != def.arity() {
            return Err(ValueError::ArityMismatch {
                variant: def.name.clone(),
                expected: def.arity(),
                given: values.len(),
            });
        }

        if let Some((index, (field, value))) = def
            .fields
            .iter()
            .zip(&values)
            .find_position(|(field, value)| !value.conforms_to(&field.ty))
        {
            return Err(ValueError::TypeMismatch {
                variant: def.name.clone(),
                field: FieldIdx::new(index),
                expected: field.ty.clone(),
                given: value.ty(),
            });
        }

        let mut slots: SmallVec<[Option<Value>; 4]> =
            std::iter::repeat_n(None, self.layout.slot_count()).collect();

        for (slot, value) in self.layout.slots_of(variant).iter().zip(values) {
            slots[slot.index()] = Some(value);
        }

        log::trace!("constructed `{}::{}`", self.schema.name(), def.name);
        Ok(TaggedValue { repr: self.clone(), tag: variant, slots })
    }
}

/// The constructor function of a single variant.
#[derive(Debug, Clone, Copy)]
pub struct VariantCtor<'r> {
    repr: &'r UnionRepr,
    variant: VariantIdx,
}

impl VariantCtor<'_> {
    pub fn variant(&self) -> VariantIdx {
        self.variant
    }

    pub fn name(&self) -> &Identifier {
        &self.repr.schema.variant(self.variant).name
    }

    pub fn arity(&self) -> usize {
        self.repr.schema.variant(self.variant).arity()
    }

    /// Construct a value of the variant.
    pub fn call(&self, values: impl IntoIterator<Item = Value>) -> Result<TaggedValue, ValueError> {
        self.repr.construct_at(self.variant, values)
    }
}

/// A value of a discriminated union.
///
/// Equality and hashing only consider the schema, the tag and the fields of
/// the active variant. The default equality is nominal, use
/// [TaggedValue::eq_with] to compare values structurally.
#[derive(Debug, Clone)]
pub struct TaggedValue {
    repr: UnionRepr,
    tag: VariantIdx,

    /// One entry per slot of the layout, only the slots of the active
    /// variant are occupied.
    slots: SmallVec<[Option<Value>; 4]>,
}

impl TaggedValue {
    pub fn schema(&self) -> &Schema {
        &self.repr.schema
    }

    pub fn repr(&self) -> &UnionRepr {
        &self.repr
    }

    /// The index of the active variant.
    pub fn tag(&self) -> VariantIdx {
        self.tag
    }

    /// The name of the active variant.
    pub fn tag_of(&self) -> &Identifier {
        &self.repr.schema.variant(self.tag).name
    }

    /// Read a field of the named variant.
    pub fn field_at(&self, variant: &str, field: usize) -> Result<&Value, ValueError> {
        self.read(self.repr.variant_index(variant)?, field)
    }

    /// Read the field of a variant. Fails with
    /// [ValueError::InactiveVariantAccess] if the variant is not the
    /// active one.
    pub fn field(&self, variant: VariantIdx, field: FieldIdx) -> Result<&Value, ValueError> {
        self.read(variant, field.index())
    }

    fn read(&self, variant: VariantIdx, field: usize) -> Result<&Value, ValueError> {
        let def = self.repr.variant(variant)?;

        if variant != self.tag {
            return Err(ValueError::InactiveVariantAccess {
                requested: def.name.clone(),
                active: self.tag_of().clone(),
            });
        }

        let out_of_bounds =
            || ValueError::FieldOutOfBounds { variant: def.name.clone(), field, arity: def.arity() };

        // Bounds are checked before the index is narrowed to a slot.
        if field >= def.arity() {
            return Err(out_of_bounds());
        }

        let slot = self.repr.layout.slots_of(variant)[field];
        self.slots[slot.index()].as_ref().ok_or_else(out_of_bounds)
    }

    /// Read a field of the active variant by the name of the field.
    pub fn field_named(&self, name: &str) -> Option<&Value> {
        let def = self.repr.schema.variant(self.tag);
        let index = def
            .fields
            .iter()
            .position(|field| field.name.as_ref().is_some_and(|field| field == name))?;

        self.field(self.tag, FieldIdx::new(index)).ok()
    }

    /// All of the fields of the active variant, in declared order.
    pub fn fields(&self) -> impl Iterator<Item = &Value> + '_ {
        self.repr
            .layout
            .slots_of(self.tag)
            .iter()
            .filter_map(|slot| self.slots[slot.index()].as_ref())
    }

    /// Check that the value is of the given schema.
    pub fn expect_schema(&self, schema: &Schema) -> Result<(), ValueError> {
        if self.schema() == schema {
            Ok(())
        } else {
            Err(ValueError::SchemaMismatch {
                expected: schema.name().clone(),
                given: self.schema().name().clone(),
            })
        }
    }

    /// Compare two values under the given [Comparability].
    pub fn eq_with(&self, other: &TaggedValue, comparability: Comparability) -> bool {
        let comparable = match comparability {
            Comparability::Nominal => self.schema() == other.schema(),
            Comparability::Structural => self.schema().is_structurally_equivalent(other.schema()),
        };

        comparable
            && self.tag == other.tag
            && self
                .fields()
                .zip(other.fields())
                .all(|(left, right)| left.eq_with(right, comparability))
    }
}

impl PartialEq for TaggedValue {
    fn eq(&self, other: &Self) -> bool {
        self.eq_with(other, Comparability::Nominal)
    }
}

impl Eq for TaggedValue {}

impl Hash for TaggedValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema().hash(state);
        self.tag.hash(state);
        self.fields().for_each(|field| field.hash(state));
    }
}

impl fmt::Display for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let def = self.repr.schema.variant(self.tag);
        write!(f, "{}", def.name)?;

        if def.fields.is_empty() {
            return Ok(());
        }

        let fields = def.fields.iter().zip(self.fields()).map(|(spec, value)| match &spec.name {
            Some(name) => format!("{name}: {value}"),
            None => value.to_string(),
        });

        write!(f, "({})", fields.format(", "))
    }
}

#[cfg(test)]
mod tests {
    use std::hash::{BuildHasher, BuildHasherDefault};

    use dunion_schema::{
        Variant, define_schema,
        ty::FieldTy,
    };
    use dunion_target::primitives::{FloatTy, SIntTy};
    use dunion_utils::fxhash::FxHasher;
    use pretty_assertions::assert_eq;

    use super::*;

    fn shape_schema(storage: &LayoutStorage) -> Schema {
        let f64 = FieldTy::Float(FloatTy::F64);

        define_schema(
            "Shape",
            [
                Variant::new(
                    "Rectangle",
                    [
                        storage.named_field("width", f64.clone()),
                        storage.named_field("length", f64.clone()),
                    ],
                ),
                Variant::new("Circle", [storage.named_field("radius", f64)]),
            ],
        )
        .unwrap()
    }

    fn shape(storage: &LayoutStorage) -> UnionRepr {
        UnionRepr::new(storage, shape_schema(storage))
    }

    fn hash_of(value: &TaggedValue) -> u64 {
        BuildHasherDefault::<FxHasher>::default().hash_one(value)
    }

    #[test]
    fn test_construct_circle() {
        let storage = LayoutStorage::default();
        let shape = shape(&storage);
        let circle = shape.construct("Circle", [Value::from(5.0)]).unwrap();

        assert_eq!(circle.tag_of(), "Circle");
        assert_eq!(circle.tag(), VariantIdx::new(1));
        assert_eq!(circle.field_at("Circle", 0), Ok(&Value::from(5.0)));
        assert_eq!(circle.field_named("radius"), Some(&Value::from(5.0)));
        assert_eq!(circle.to_string(), "Circle(radius: 5.0)");

        assert_eq!(
            circle.field_at("Rectangle", 0),
            Err(ValueError::InactiveVariantAccess {
                requested: "Rectangle".into(),
                active: "Circle".into()
            })
        );
        assert!(matches!(
            circle.field_at("Circle", 1),
            Err(ValueError::FieldOutOfBounds { arity: 1, .. })
        ));
        assert!(matches!(
            circle.field_at("Triangle", 0),
            Err(ValueError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_round_trip_every_variant() {
        let storage = LayoutStorage::default();
        let shape = shape(&storage);

        for ctor in shape.constructors() {
            let values =
                (0..ctor.arity()).map(|index| Value::from(index as f64 + 0.5)).collect_vec();
            let value = ctor.call(values.clone()).unwrap();

            assert_eq!(value.tag(), ctor.variant());
            assert_eq!(value.fields().cloned().collect_vec(), values);

            for (index, expected) in values.iter().enumerate() {
                assert_eq!(value.field(ctor.variant(), FieldIdx::new(index)), Ok(expected));
            }

            // Every other variant is inaccessible.
            for other in shape.schema().variant_indices().filter(|v| *v != ctor.variant()) {
                for index in 0..shape.schema().variant(other).arity() {
                    assert!(matches!(
                        value.field(other, FieldIdx::new(index)),
                        Err(ValueError::InactiveVariantAccess { .. })
                    ));
                }
            }
        }
    }

    #[test]
    fn test_construction_errors() {
        let storage = LayoutStorage::default();
        let shape = shape(&storage);

        assert_eq!(
            shape.construct("Rectangle", [Value::from(1.0)]).unwrap_err(),
            ValueError::ArityMismatch { variant: "Rectangle".into(), expected: 2, given: 1 }
        );
        assert_eq!(
            shape.construct("Circle", [Value::from(5i32)]).unwrap_err(),
            ValueError::TypeMismatch {
                variant: "Circle".into(),
                field: FieldIdx::new(0),
                expected: FieldTy::Float(FloatTy::F64),
                given: FieldTy::Int(SIntTy::I32),
            }
        );
        assert!(matches!(
            shape.construct("Square", []).unwrap_err(),
            ValueError::UnknownVariant { .. }
        ));
        assert_eq!(
            ValueError::ArityMismatch { variant: "Rectangle".into(), expected: 2, given: 1 }
                .to_string(),
            "variant `Rectangle` takes 2 fields, but 1 was given"
        );
    }

    #[test]
    fn test_out_of_range_indices() {
        let storage = LayoutStorage::default();
        let shape = shape(&storage);
        let circle = shape.construct("Circle", [Value::from(5.0)]).unwrap();

        // Indices that do not fit a field index never alias another field.
        let wide = 1usize.checked_shl(32).unwrap_or(usize::MAX);
        for field in [1, 2, wide, wide.saturating_add(1), usize::MAX] {
            assert_eq!(
                circle.field_at("Circle", field),
                Err(ValueError::FieldOutOfBounds { variant: "Circle".into(), field, arity: 1 })
            );
        }

        let past_the_end = VariantIdx::new(5);
        let out_of_bounds = ValueError::VariantOutOfBounds {
            schema: "Shape".into(),
            variant: past_the_end,
            count: 2,
        };

        assert_eq!(circle.field(past_the_end, FieldIdx::new(0)), Err(out_of_bounds.clone()));
        assert_eq!(
            shape.construct_at(past_the_end, [Value::from(1.0)]),
            Err(out_of_bounds.clone())
        );
        assert_eq!(
            out_of_bounds.to_string(),
            "variant #5 is out of bounds for `Shape`, which has 2 variants"
        );
    }

    #[test]
    fn test_equality_ignores_inactive_slots() {
        let storage = LayoutStorage::default();
        let shape = shape(&storage);

        let rectangle = shape.construct("Rectangle", [Value::from(2.0), Value::from(7.0)]).unwrap();
        let circle = shape.construct("Circle", [Value::from(2.0)]).unwrap();
        let other = shape.construct("Circle", [Value::from(2.0)]).unwrap();

        // The circle shares its first slot with the width of the rectangle,
        // yet they are never equal.
        assert_ne!(rectangle, circle);
        assert_eq!(circle, other);
        assert_eq!(hash_of(&circle), hash_of(&other));
        assert_ne!(circle, shape.construct("Circle", [Value::from(3.0)]).unwrap());
    }

    #[test]
    fn test_comparability() {
        let storage = LayoutStorage::default();
        let left = shape(&storage);
        let right = shape(&storage);

        let a = left.construct("Circle", [Value::from(1.0)]).unwrap();
        let b = right.construct("Circle", [Value::from(1.0)]).unwrap();

        assert_ne!(a, b);
        assert!(!a.eq_with(&b, Comparability::Nominal));
        assert!(a.eq_with(&b, Comparability::Structural));
        assert!(a.expect_schema(right.schema()).is_err());
        assert!(a.expect_schema(left.schema()).is_ok());
    }

    #[test]
    fn test_embedded_union_field() {
        let storage = LayoutStorage::default();
        let shape = shape(&storage);
        let scene = UnionRepr::new(
            &storage,
            define_schema(
                "Scene",
                [
                    Variant::new(
                        "Single",
                        [storage.field_spec(FieldTy::Union(shape.schema().clone()))],
                    ),
                    Variant::unit("Empty"),
                ],
            )
            .unwrap(),
        );

        let circle = shape.construct("Circle", [Value::from(5.0)]).unwrap();
        let single = scene.construct("Single", [Value::from(circle.clone())]).unwrap();

        assert_eq!(single.field_at("Single", 0).unwrap().as_union(), Some(&circle));
        assert_eq!(single.to_string(), "Single(Circle(radius: 5.0))");

        // A value of a distinct, equivalent schema does not conform.
        let stranger = shape_schema(&storage);
        let stranger = UnionRepr::new(&storage, stranger).construct("Circle", [Value::from(5.0)]);
        assert!(matches!(
            scene.construct("Single", [Value::from(stranger.unwrap())]),
            Err(ValueError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_unit_variant() {
        let storage = LayoutStorage::default();
        let ordering = UnionRepr::new(
            &storage,
            define_schema("Ordering", ["Less", "Equal", "Greater"].map(Variant::unit)).unwrap(),
        );

        let value = ordering.construct("Equal", []).unwrap();
        assert_eq!(value.tag_of(), "Equal");
        assert_eq!(value.fields().count(), 0);
        assert_eq!(value.to_string(), "Equal");
    }

    #[test]
    fn test_values_are_shareable() {
        use rayon::prelude::*;

        let storage = LayoutStorage::default();
        let shape = shape(&storage);
        let value = shape.construct("Rectangle", [Value::from(4.0), Value::from(2.5)]).unwrap();

        let areas: Vec<f64> = (0..32)
            .into_par_iter()
            .map(|_| {
                let width = value.field_at("Rectangle", 0).unwrap().as_f64().unwrap();
                let length = value.field_at("Rectangle", 1).unwrap().as_f64().unwrap();
                width * length
            })
            .collect();

        assert!(areas.iter().all(|area| *area == 10.0));
    }
}
