//! Contains logic for displaying a computed [Layout] as a table of slots,
//! showing which fields of which variants share each slot.

use std::fmt;

use dunion_schema::{FieldIdx, Schema, VariantIdx};
use dunion_utils::{itertools::Itertools, pluralise, printing::CharacterSet};

use crate::Layout;

/// The characters that the [LayoutWriter] draws the table with.
#[derive(Debug, Clone, Copy)]
pub struct LayoutWriterConfig {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub center_top: char,
    pub center_bottom: char,
    pub center_left: char,
    pub center_right: char,
    pub center: char,
    pub vertical: char,
    pub horizontal: char,
}

impl LayoutWriterConfig {
    /// Create a [LayoutWriterConfig] based on the [CharacterSet].
    pub fn from_character_set(set: CharacterSet) -> Self {
        match set {
            CharacterSet::Unicode => Self::unicode(),
            CharacterSet::Ascii => Self::ascii(),
        }
    }

    /// Box drawing characters.
    pub fn unicode() -> Self {
        Self {
            top_left: '┌',
            top_right: '┐',
            bottom_left: '└',
            bottom_right: '┘',
            center_top: '┬',
            center_bottom: '┴',
            center_left: '├',
            center_right: '┤',
            center: '┼',
            vertical: '│',
            horizontal: '─',
        }
    }

    /// Plain ASCII characters.
    pub fn ascii() -> Self {
        Self {
            top_left: '+',
            top_right: '+',
            bottom_left: '+',
            bottom_right: '+',
            center_top: '+',
            center_bottom: '+',
            center_left: '+',
            center_right: '+',
            center: '+',
            vertical: '|',
            horizontal: '-',
        }
    }
}

/// Which horizontal border of the table is being drawn.
#[derive(Clone, Copy)]
enum Border {
    Top,
    Middle,
    Bottom,
}

/// Writes the [Layout] of a [Schema] as a table.
pub struct LayoutWriter<'l> {
    schema: &'l Schema,
    layout: &'l Layout,
    config: LayoutWriterConfig,
}

impl<'l> LayoutWriter<'l> {
    pub fn new(schema: &'l Schema, layout: &'l Layout, config: LayoutWriterConfig) -> Self {
        Self { schema, layout, config }
    }

    /// The label of a field, `Variant.name`, or `Variant.index` if the field
    /// has no name.
    fn field_label(&self, variant: VariantIdx, field: FieldIdx) -> String {
        let variant = self.schema.variant(variant);

        match variant.field(field).and_then(|spec| spec.name.as_ref()) {
            Some(name) => format!("{}.{name}", variant.name),
            None => format!("{}.{field}", variant.name),
        }
    }

    fn rows(&self) -> Vec<[String; 5]> {
        let mut rows = vec![["slot", "offset", "size", "align", "fields"].map(String::from)];

        for slot in &self.layout.slots {
            let fields = self
                .layout
                .occupants(slot.index)
                .map(|(variant, field)| self.field_label(variant, field))
                .join(", ");

            rows.push([
                slot.index.to_string(),
                slot.offset.to_string(),
                slot.size.to_string(),
                slot.alignment.to_string(),
                fields,
            ]);
        }

        let tag = &self.layout.tag;
        rows.push([
            "tag".to_string(),
            tag.offset.to_string(),
            tag.integer.size().to_string(),
            tag.alignment.to_string(),
            format!("{} ({} bit{})", tag.integer, tag.bits, pluralise!(tag.bits)),
        ]);

        rows
    }

    fn write_border(
        &self,
        f: &mut fmt::Formatter<'_>,
        widths: &[usize],
        border: Border,
    ) -> fmt::Result {
        let c = &self.config;
        let (left, join, right) = match border {
            Border::Top => (c.top_left, c.center_top, c.top_right),
            Border::Middle => (c.center_left, c.center, c.center_right),
            Border::Bottom => (c.bottom_left, c.center_bottom, c.bottom_right),
        };

        let line = widths
            .iter()
            .map(|width| c.horizontal.to_string().repeat(width + 2))
            .join(&join.to_string());

        writeln!(f, "{left}{line}{right}")
    }

    fn write_row(
        &self,
        f: &mut fmt::Formatter<'_>,
        widths: &[usize],
        row: &[String],
    ) -> fmt::Result {
        let vertical = self.config.vertical;

        for (cell, width) in row.iter().zip(widths) {
            let padding = width - cell.chars().count();
            write!(f, "{vertical} {cell}{} ", " ".repeat(padding))?;
        }

        writeln!(f, "{vertical}")
    }
}

impl fmt::Display for LayoutWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = self.layout;

        writeln!(
            f,
            "{}: size {}, align {}, {} slot{}",
            self.schema.name(),
            layout.size,
            layout.alignment,
            layout.slot_count(),
            pluralise!(layout.slot_count())
        )?;

        let rows = self.rows();
        let widths = (0..5)
            .map(|column| rows.iter().map(|row| row[column].chars().count()).max().unwrap_or(0))
            .collect_vec();

        self.write_border(f, &widths, Border::Top)?;

        for (index, row) in rows.iter().enumerate() {
            self.write_row(f, &widths, row)?;

            // Separate the header and the tag from the slots.
            if index == 0 || index + 2 == rows.len() {
                self.write_border(f, &widths, Border::Middle)?;
            }
        }

        self.write_border(f, &widths, Border::Bottom)
    }
}
