//! Contains the layout planner, which assigns the fields of every variant of
//! a schema to a minimal set of shared storage slots.
//!
//! Slot `i` holds the `i`-th field of every variant that has one. Two fields
//! of the same variant therefore never share a slot, while fields of
//! different variants at the same position always do. The width of a slot
//! is the widest field at its position, and the number of slots is the
//! largest arity of any variant.
//!
//! Slots are placed in index order, each aligned to its own alignment, and
//! the tag is placed after the last slot. The total size is rounded up to
//! the strictest alignment of the value.

use dunion_schema::{Schema, VariantIdx};
use dunion_target::{
    abi::Integer, alignment::Alignment, data_layout::HasDataLayout, size::Size,
};
use dunion_utils::{index_vec::IndexVec, log};

use crate::{Layout, Slot, SlotIdx, TagLayout};

/// The minimum number of bits `w` such that `2^w >= variant_count`.
pub fn tag_bits(variant_count: usize) -> u32 {
    match variant_count {
        0 | 1 => 0,
        n => usize::BITS - (n - 1).leading_zeros(),
    }
}

/// Compute the [Layout] of the given schema. This is a pure function of the
/// schema and the target data layout, and never fails for a schema that
/// [dunion_schema::define_schema] accepted.
pub fn plan_layout<C: HasDataLayout>(schema: &Schema, cx: &C) -> Layout {
    let arity = schema.max_arity();

    // The widest field and the strictest alignment at each position.
    let mut positions = vec![(Size::ZERO, Alignment::ONE); arity];

    for variant in schema.variants() {
        for (position, field) in variant.fields.iter().enumerate() {
            let (size, alignment) = &mut positions[position];
            *size = (*size).max(field.size);
            *alignment = (*alignment).max(field.alignment);
        }
    }

    let mut offset = Size::ZERO;
    let mut value_alignment = Alignment::ONE;

    let slots: IndexVec<SlotIdx, Slot> = positions
        .into_iter()
        .enumerate()
        .map(|(index, (size, alignment))| {
            let slot_offset = offset.align_to(alignment);
            offset = slot_offset + size;
            value_alignment = value_alignment.max(alignment);

            Slot { index: SlotIdx::new(index), size, alignment, offset: slot_offset }
        })
        .collect();

    let bits = tag_bits(schema.variant_count());
    let integer = Integer::fit_bits(bits).unwrap_or(Integer::I128);
    let tag_alignment = integer.align(cx);

    let tag_offset = offset.align_to(tag_alignment);
    value_alignment = value_alignment.max(tag_alignment);

    let size = (tag_offset + integer.size()).align_to(value_alignment);

    let slot_map: IndexVec<VariantIdx, Vec<SlotIdx>> = schema
        .variants()
        .iter()
        .map(|variant| (0..variant.arity()).map(SlotIdx::new).collect())
        .collect();

    log::trace!(
        "layout of `{}`: slots={:?}, tag={}@{}, size={}",
        schema.name(),
        slots.iter().map(|slot| (slot.offset.bytes(), slot.size.bytes())).collect::<Vec<_>>(),
        integer,
        tag_offset,
        size
    );

    Layout {
        schema: schema.id(),
        tag: TagLayout { bits, integer, alignment: tag_alignment, offset: tag_offset },
        slots,
        slot_map,
        size,
        alignment: value_alignment,
    }
}

#[cfg(test)]
mod tests {
    use dunion_schema::{
        FieldIdx, Variant, define_schema,
        ty::{FieldSpec, FieldTy},
    };
    use dunion_target::{
        Target, TargetName,
        data_layout::TargetDataLayout,
        primitives::{FloatTy, SIntTy, UIntTy},
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{LayoutStorage, tuple_baseline, widest_variant_size};

    fn shape(storage: &LayoutStorage) -> Schema {
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

    #[test]
    fn test_tag_bits() {
        assert_eq!(tag_bits(1), 0);
        assert_eq!(tag_bits(2), 1);
        assert_eq!(tag_bits(3), 2);
        assert_eq!(tag_bits(4), 2);
        assert_eq!(tag_bits(5), 3);
        assert_eq!(tag_bits(256), 8);
        assert_eq!(tag_bits(257), 9);
    }

    #[test]
    fn test_shape_layout() {
        let storage = LayoutStorage::default();
        let schema = shape(&storage);
        let layout = storage.layout_of(&schema);

        assert_eq!(layout.slot_count(), 2);

        let rectangle = VariantIdx::new(0);
        let circle = VariantIdx::new(1);

        // `width` and `radius` share the first slot, `length` is alone.
        assert_eq!(
            layout.slot_of(rectangle, FieldIdx::new(0)),
            layout.slot_of(circle, FieldIdx::new(0))
        );
        assert_eq!(layout.slot_of(rectangle, FieldIdx::new(1)).unwrap().index, SlotIdx::new(1));
        assert_eq!(layout.slot_of(circle, FieldIdx::new(1)), None);
        assert_eq!(
            layout.occupants(SlotIdx::new(1)).collect::<Vec<_>>(),
            vec![(rectangle, FieldIdx::new(1))]
        );

        assert_eq!(layout.tag.bits, 1);
        assert_eq!(layout.tag.integer, Integer::I8);
        assert_eq!(layout.tag.offset, Size::from_bytes(16));
        assert_eq!(layout.size, Size::from_bytes(24));
        assert_eq!(layout.alignment.bytes(), 8);

        // The payload is strictly smaller than storing every case at once.
        assert_eq!(layout.payload_size(), Size::from_bytes(16));
        assert_eq!(tuple_baseline(&schema), Size::from_bytes(24));
        assert!(layout.payload_size() < tuple_baseline(&schema));
        assert!(layout.unpadded_size() < tuple_baseline(&schema));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let storage = LayoutStorage::default();
        let schema = shape(&storage);
        let dl = TargetDataLayout::default();

        assert_eq!(plan_layout(&schema, &dl), plan_layout(&schema, &dl));

        // The cached layout is the same allocation on every lookup.
        let first = storage.layout_of(&schema);
        let second = storage.layout_of(&schema);
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_slots_take_widest_field() {
        let storage = LayoutStorage::default();
        let schema = define_schema(
            "Mixed",
            [
                Variant::new(
                    "A",
                    [
                        storage.field_spec(FieldTy::UInt(UIntTy::U8)),
                        storage.field_spec(FieldTy::Float(FloatTy::F64)),
                    ],
                ),
                Variant::new(
                    "B",
                    [
                        storage.field_spec(FieldTy::Int(SIntTy::I32)),
                        storage.field_spec(FieldTy::Bool),
                        storage.field_spec(FieldTy::Char),
                    ],
                ),
                Variant::unit("C"),
            ],
        )
        .unwrap();

        let layout = storage.layout_of(&schema);
        let sizes = layout.slots.iter().map(|slot| slot.size.bytes()).collect::<Vec<_>>();
        let offsets = layout.slots.iter().map(|slot| slot.offset.bytes()).collect::<Vec<_>>();

        assert_eq!(sizes, vec![4, 8, 4]);
        assert_eq!(offsets, vec![0, 8, 16]);
        assert_eq!(layout.tag.bits, 2);
        assert_eq!(layout.tag.offset, Size::from_bytes(20));
        assert_eq!(layout.size, Size::from_bytes(24));
        assert!(layout.slots_of(VariantIdx::new(2)).is_empty());

        // The payload never exceeds the sum of the per-position maxima, and
        // is strictly smaller than the all-cases record.
        assert_eq!(layout.payload_size(), Size::from_bytes(16));
        assert_eq!(tuple_baseline(&schema), Size::from_bytes(18));
        assert_eq!(widest_variant_size(&schema), Size::from_bytes(9));
    }

    #[test]
    fn test_fieldless_union() {
        let storage = LayoutStorage::default();
        let schema =
            define_schema("Ordering", ["Less", "Equal", "Greater"].map(Variant::unit)).unwrap();
        let layout = storage.layout_of(&schema);

        assert!(layout.is_fieldless());
        assert_eq!(layout.slot_count(), 0);
        assert_eq!(layout.size, Size::from_bytes(1));
        assert_eq!(layout.tag.bits, 2);
    }

    #[test]
    fn test_single_variant_still_has_tag() {
        let storage = LayoutStorage::default();
        let schema = define_schema(
            "Wrapper",
            [Variant::new("Only", [storage.field_spec(FieldTy::UInt(UIntTy::U16))])],
        )
        .unwrap();
        let layout = storage.layout_of(&schema);

        assert_eq!(layout.tag.bits, 0);
        assert_eq!(layout.tag.integer, Integer::I8);
        assert_eq!(layout.size, Size::from_bytes(4));
    }

    #[test]
    fn test_embedded_union_field() {
        let storage = LayoutStorage::default();
        let inner = shape(&storage);
        let field = storage.field_spec(FieldTy::Union(inner.clone()));

        assert_eq!(field.size, Size::from_bytes(24));
        assert_eq!(field.alignment.bytes(), 8);

        let outer = define_schema(
            "Scene",
            [Variant::new("Single", [field]), Variant::unit("Empty")],
        )
        .unwrap();
        let layout = storage.layout_of(&outer);

        assert_eq!(layout.size, Size::from_bytes(32));
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn test_str_depends_on_target() {
        let x86 = LayoutStorage::new(TargetDataLayout::from_target(&Target::new(
            TargetName::X86,
            4,
        )));
        let field = x86.field_spec(FieldTy::Str);

        assert_eq!(field.size, Size::from_bytes(8));
        assert_eq!(field.alignment.bytes(), 4);

        let unit = FieldSpec::primitive(FieldTy::Unit, &TargetDataLayout::default()).unwrap();
        assert_eq!(unit.size, Size::ZERO);
    }

    #[test]
    fn test_concurrent_layout_lookups() {
        use rayon::prelude::*;

        let storage = LayoutStorage::default();
        let schema = shape(&storage);

        let layouts: Vec<_> = (0..64).into_par_iter().map(|_| storage.layout_of(&schema)).collect();

        assert!(layouts.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(storage.len(), 1);
    }
}
