//! Defines all logic regarding computing the layout of union schemas, and
//! representing the said layouts in a way that is usable by the value
//! representation and by backends that want to emit the physical layout.
//!
//! A [Layout] assigns every `(variant, field)` pair of a schema to a [Slot].
//! Since only one variant of a union is ever live, slots are shared across
//! variants, but never within a variant. The layout is computed once per
//! schema by the [LayoutStorage] and then shared read-only.

pub mod compute;
pub mod write;

use std::sync::Arc;

use dashmap::DashMap;
use dunion_schema::{
    FieldIdx, Schema, SchemaId, VariantIdx,
    ty::{FieldSpec, FieldTy},
};
use dunion_target::{
    abi::Integer,
    alignment::Alignment,
    data_layout::{HasDataLayout, TargetDataLayout},
    size::Size,
};
use dunion_utils::{
    index_vec::{IndexVec, define_index_type},
    log,
};

define_index_type! {
    /// The index of a [Slot] within a [Layout].
    pub struct SlotIdx = u32;

    DISPLAY_FORMAT = "{}";
    MAX_INDEX = u32::MAX as usize;
    DISABLE_MAX_INDEX_CHECK = cfg!(not(debug_assertions));
}

/// A unit of shared storage within a [Layout].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    /// The index of the slot.
    pub index: SlotIdx,

    /// The width of the slot, the widest field that is assigned to it.
    pub size: Size,

    /// The alignment of the slot, the strictest alignment of any field
    /// that is assigned to it.
    pub alignment: Alignment,

    /// The offset of the slot from the start of the value.
    pub offset: Size,
}

/// The layout of the tag of a union value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagLayout {
    /// The minimum number of bits `w` such that `2^w` is at least the
    /// number of variants.
    pub bits: u32,

    /// The integer that the tag is stored as.
    pub integer: Integer,

    /// The alignment of the tag integer on the target.
    pub alignment: Alignment,

    /// The offset of the tag from the start of the value.
    pub offset: Size,
}

/// The computed, immutable layout of a [Schema].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// The schema that this layout was planned for.
    pub schema: SchemaId,

    /// The layout of the tag, always present.
    pub tag: TagLayout,

    /// All of the shared storage slots.
    pub slots: IndexVec<SlotIdx, Slot>,

    /// The slot that every field of every variant is assigned to, the slots
    /// of a single variant are always distinct.
    pub slot_map: IndexVec<VariantIdx, Vec<SlotIdx>>,

    /// The total size of the value, including the tag and padding.
    pub size: Size,

    /// The alignment of the value.
    pub alignment: Alignment,
}

impl Layout {
    /// The number of shared storage slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Get the slot that a field of a variant is stored in.
    pub fn slot_of(&self, variant: VariantIdx, field: FieldIdx) -> Option<&Slot> {
        let index = *self.slot_map.get(variant)?.get(field.index())?;
        Some(&self.slots[index])
    }

    /// Get all of the slots that a variant occupies, in field order.
    pub fn slots_of(&self, variant: VariantIdx) -> &[SlotIdx] {
        &self.slot_map[variant]
    }

    /// Get all of the `(variant, field)` pairs that share a slot.
    pub fn occupants(&self, slot: SlotIdx) -> impl Iterator<Item = (VariantIdx, FieldIdx)> + '_ {
        self.slot_map.iter_enumerated().flat_map(move |(variant, slots)| {
            slots
                .iter()
                .enumerate()
                .filter(move |(_, index)| **index == slot)
                .map(move |(field, _)| (variant, FieldIdx::new(field)))
        })
    }

    /// The sum of the widths of all of the slots, excluding the tag and any
    /// padding.
    pub fn payload_size(&self) -> Size {
        self.slots.iter().map(|slot| slot.size).sum()
    }

    /// The size of the tag plus the payload, excluding any padding.
    pub fn unpadded_size(&self) -> Size {
        self.tag.integer.size() + self.payload_size()
    }

    /// Check whether the layout stores any data besides the tag.
    pub fn is_fieldless(&self) -> bool {
        self.payload_size() == Size::ZERO
    }
}

/// Sum of the widths of every field of every variant, the size of a record
/// that would hold all of the cases of the union at the same time.
pub fn tuple_baseline(schema: &Schema) -> Size {
    schema.variants().iter().flat_map(|variant| &variant.fields).map(|field| field.size).sum()
}

/// The sum of the field widths of the widest variant of the schema.
pub fn widest_variant_size(schema: &Schema) -> Size {
    schema
        .variants()
        .iter()
        .map(|variant| variant.fields.iter().map(|field| field.size).sum::<Size>())
        .max()
        .unwrap_or(Size::ZERO)
}

/// A store for all of the computed [Layout]s, keyed by the identity of the
/// schema that they were computed for.
///
/// The store may be shared between threads. If two threads race to compute
/// the layout of the same schema, they both compute the same layout and
/// only one of them is published.
#[derive(Debug)]
pub struct LayoutStorage {
    /// The data layout of the target that layouts are computed for.
    data_layout: TargetDataLayout,

    /// Cache of all of the previously computed layouts.
    cache: DashMap<SchemaId, Arc<Layout>>,
}

impl HasDataLayout for LayoutStorage {
    fn data_layout(&self) -> &TargetDataLayout {
        &self.data_layout
    }
}

impl Default for LayoutStorage {
    fn default() -> Self {
        Self::new(TargetDataLayout::default())
    }
}

impl LayoutStorage {
    /// Create a new [LayoutStorage].
    pub fn new(data_layout: TargetDataLayout) -> Self {
        Self { data_layout, cache: DashMap::new() }
    }

    /// Get the [Layout] of a schema, computing it if it has not already been
    /// computed.
    pub fn layout_of(&self, schema: &Schema) -> Arc<Layout> {
        if let Some(layout) = self.cache.get(&schema.id()) {
            return Arc::clone(layout.value());
        }

        let layout = Arc::new(compute::plan_layout(schema, &self.data_layout));
        log::debug!(
            "planned layout for `{}`: {} slot(s), size {}",
            schema.name(),
            layout.slot_count(),
            layout.size
        );

        Arc::clone(self.cache.entry(schema.id()).or_insert(layout).value())
    }

    /// Create a [FieldSpec] for the given type on the target of this
    /// storage. Embedded unions take the size and alignment of their
    /// own layout.
    pub fn field_spec(&self, ty: FieldTy) -> FieldSpec {
        match ty.primitive_layout(self) {
            Some((size, alignment)) => FieldSpec::new(ty, size, alignment),
            None => {
                let FieldTy::Union(schema) = &ty else {
                    unreachable!("only union types lack a primitive layout")
                };

                let layout = self.layout_of(schema);
                FieldSpec::new(ty, layout.size, layout.alignment)
            }
        }
    }

    /// Create a named [FieldSpec] for the given type.
    pub fn named_field(&self, name: &str, ty: FieldTy) -> FieldSpec {
        self.field_spec(ty).named(name)
    }

    /// The number of layouts that have been computed.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check whether no layouts have been computed yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
