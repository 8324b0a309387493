//! The driver runs the individual commands of `dunionc` against a file of
//! union declarations.
use std::path::Path;

use dunion_exhaustiveness::{Arm, storage::ExhaustivenessCache};
use dunion_reporting::{
    diagnostic::Diagnostics,
    error_codes::ErrorCode,
    report::{Report, ReportKind},
    reporter::Reports,
};
use dunion_repr::{
    LayoutStorage, tuple_baseline,
    write::{LayoutWriter, LayoutWriterConfig},
};
use dunion_schema::FieldIdx;
use dunion_utils::log;
use dunion_value::{TaggedValue, UnionRepr, error::ValueError, value::Value};

use crate::{declarations::Declarations, settings::CompilerSettings};

/// The result of running a command: the text that it printed, and all of
/// the reports that it produced.
#[derive(Debug, Default)]
pub struct Output {
    pub text: String,
    pub reports: Reports,
}

impl Output {
    fn failed(report: impl Into<Report>) -> Self {
        Self { text: String::new(), reports: vec![report.into()] }
    }

    /// Check whether any of the reports is an error.
    pub fn has_errors(&self) -> bool {
        self.reports.iter().any(Report::is_error)
    }
}

#[derive(Debug)]
pub struct Driver {
    settings: CompilerSettings,
    storage: LayoutStorage,
    cache: ExhaustivenessCache,
}

impl Driver {
    pub fn new(settings: CompilerSettings) -> Self {
        let storage = LayoutStorage::new(settings.data_layout());
        Self { settings, storage, cache: ExhaustivenessCache::new() }
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    fn load(&self, path: &Path) -> Result<Declarations, Report> {
        Ok(Declarations::load(path, &self.storage)?)
    }

    /// Print the layout of the named union, or of every union in the file.
    pub fn layout(&self, path: &Path, union: Option<&str>) -> Output {
        match self.write_layouts(path, union) {
            Ok(text) => Output { text, reports: vec![] },
            Err(report) => Output::failed(report),
        }
    }

    fn write_layouts(&self, path: &Path, union: Option<&str>) -> Result<String, Report> {
        let declarations = self.load(path)?;
        let config = LayoutWriterConfig::from_character_set(self.settings.character_set);

        let selected = match union {
            Some(name) => vec![declarations.get(name)?],
            None => declarations.iter().collect(),
        };

        let text = selected
            .into_iter()
            .map(|repr| {
                let (schema, layout) = (repr.schema(), repr.layout());
                format!(
                    "{schema}\n{}\npayload {}, unpadded {}, all fields {}\n\n",
                    LayoutWriter::new(schema, layout, config),
                    layout.payload_size(),
                    layout.unpadded_size(),
                    tuple_baseline(schema)
                )
            })
            .collect();

        Ok(text)
    }

    /// Check a list of arms against the named union.
    pub fn check(&self, path: &Path, union: &str, arms: &[String]) -> Output {
        let declarations = match self.load(path) {
            Ok(declarations) => declarations,
            Err(report) => return Output::failed(report),
        };

        let repr = match declarations.get(union) {
            Ok(repr) => repr,
            Err(error) => return Output::failed(error),
        };

        let arms = arms.iter().map(|arm| Arm::from(arm.as_str())).collect::<Vec<_>>();
        let report = self.cache.check(repr.schema(), &arms);

        let mut reports = report.diagnostics().into_reports();

        if self.settings.unreachable_handlers_are_errors {
            reports
                .iter_mut()
                .filter(|report| report.error_code == Some(ErrorCode::UnreachableHandler))
                .for_each(|report| {
                    report.kind(ReportKind::Error);
                });
        }

        let text = if report.is_ok() {
            format!("every variant of `{}` is handled exactly once\n", repr.schema().name())
        } else {
            String::new()
        };

        Output { text, reports }
    }

    /// Construct a value of a variant from the textual form of its fields.
    /// With `compare_with`, the same variant is also constructed in another
    /// union and the two values are compared.
    pub fn construct(
        &self,
        path: &Path,
        union: &str,
        variant: &str,
        values: &[String],
        compare_with: Option<&str>,
    ) -> Output {
        match self.write_construction(path, union, variant, values, compare_with) {
            Ok(text) => Output { text, reports: vec![] },
            Err(report) => Output::failed(report),
        }
    }

    fn write_construction(
        &self,
        path: &Path,
        union: &str,
        variant: &str,
        values: &[String],
        compare_with: Option<&str>,
    ) -> Result<String, Report> {
        let declarations = self.load(path)?;
        let value = self.parse_and_construct(declarations.get(union)?, variant, values)?;

        let mut text = format!(
            "{}::{value}\n  tag: {} (#{})\n  size: {}\n",
            value.schema().name(),
            value.tag_of(),
            value.tag(),
            value.repr().layout().size
        );

        if let Some(other) = compare_with {
            let other = self.parse_and_construct(declarations.get(other)?, variant, values)?;
            let comparability = self.settings.comparability;

            text.push_str(&format!(
                "  equal to {}::{other} ({comparability}): {}\n",
                other.schema().name(),
                value.eq_with(&other, comparability)
            ));
        }

        Ok(text)
    }

    fn parse_and_construct(
        &self,
        repr: &UnionRepr,
        variant: &str,
        values: &[String],
    ) -> Result<TaggedValue, Report> {
        let index = repr.variant_index(variant)?;
        let def = repr.schema().variant(index);

        if values.len() != def.arity() {
            return Err(ValueError::ArityMismatch {
                variant: def.name.clone(),
                expected: def.arity(),
                given: values.len(),
            }
            .into());
        }

        let values = def
            .fields
            .iter()
            .zip(values)
            .enumerate()
            .map(|(index, (field, text))| {
                Value::parse(text, &field.ty, &self.storage).ok_or_else(|| {
                    let mut report = Report::new();
                    report
                        .code(ErrorCode::InvalidArgument)
                        .title(format!("cannot read `{text}` as a value of type `{}`", field.ty))
                        .add_note(
                            "note",
                            format!("for field {} of `{}`", FieldIdx::new(index), def.name),
                        );
                    report
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "constructing `{}::{}` from {} value(s)",
            repr.schema().name(),
            def.name,
            values.len()
        );
        Ok(repr.construct_at(index, values)?)
    }
}
