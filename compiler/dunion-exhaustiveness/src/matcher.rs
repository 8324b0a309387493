//! Evaluation of matches on [TaggedValue]s.
//!
//! A [Matcher] is built from a list of handlers that has passed the
//! exhaustiveness check. Building it resolves every variant of the schema to
//! the handler that covers it, so evaluating a match is a single lookup in a
//! table that is indexed by the tag of the value.
use std::{fmt, sync::Arc};

use dunion_schema::{Schema, VariantIdx};
use dunion_utils::{index_vec::IndexVec, log, smallvec::SmallVec};
use dunion_value::{TaggedValue, error::ValueError, value::Value};

use crate::{Arm, ExhaustivenessReport, storage::ExhaustivenessCache};

/// A handler of one or more variants. It is called with the fields of the
/// active variant, in declared order.
pub type Handler<'h, R> = Box<dyn Fn(&[&Value]) -> R + Send + Sync + 'h>;

/// An ordered list of handlers.
pub struct Handlers<'h, R> {
    arms: Vec<Arm>,
    handlers: Vec<Handler<'h, R>>,
}

impl<R> Default for Handlers<'_, R> {
    fn default() -> Self {
        Self { arms: vec![], handlers: vec![] }
    }
}

impl<'h, R> Handlers<'h, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle the named variant.
    pub fn on(
        mut self,
        variant: &str,
        handler: impl Fn(&[&Value]) -> R + Send + Sync + 'h,
    ) -> Self {
        self.arms.push(Arm::Variant(variant.into()));
        self.handlers.push(Box::new(handler));
        self
    }

    /// Handle every variant that is not handled by an earlier handler.
    pub fn otherwise(mut self, handler: impl Fn(&[&Value]) -> R + Send + Sync + 'h) -> Self {
        self.arms.push(Arm::Wildcard);
        self.handlers.push(Box::new(handler));
        self
    }

    /// The arms of the handlers, in order.
    pub fn arms(&self) -> &[Arm] {
        &self.arms
    }
}

impl<R> fmt::Debug for Handlers<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers").field("arms", &self.arms).finish_non_exhaustive()
    }
}

/// A failed match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The handlers do not cover every variant of the schema.
    NonExhaustive(Arc<ExhaustivenessReport>),

    /// The value could not be matched.
    Value(ValueError),
}

impl From<ValueError> for MatchError {
    fn from(error: ValueError) -> Self {
        MatchError::Value(error)
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::NonExhaustive(report) => write!(
                f,
                "non-exhaustive match on `{}`: {} variant(s) not covered",
                report.schema,
                report.missing.len()
            ),
            MatchError::Value(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for MatchError {}

/// A validated match on the values of a single schema.
///
/// Unreachable handlers do not prevent a [Matcher] from being built, they
/// are never selected and remain visible through [Matcher::report].
pub struct Matcher<'h, R> {
    schema: Schema,
    handlers: Vec<Handler<'h, R>>,

    /// The handler that is selected for each tag.
    table: IndexVec<VariantIdx, usize>,
    report: Arc<ExhaustivenessReport>,
}

impl<'h, R> Matcher<'h, R> {
    /// Validate the handlers against the schema, and build the dispatch
    /// table. Fails if any variant is not handled.
    pub fn new(
        schema: &Schema,
        handlers: Handlers<'h, R>,
        cache: &ExhaustivenessCache,
    ) -> Result<Self, MatchError> {
        let report = cache.check(schema, &handlers.arms);
        Self::from_report(schema, handlers, report)
    }

    fn from_report(
        schema: &Schema,
        handlers: Handlers<'h, R>,
        report: Arc<ExhaustivenessReport>,
    ) -> Result<Self, MatchError> {
        let table = report.coverage.iter().copied().collect::<Option<IndexVec<_, _>>>();

        let Some(table) = table else {
            return Err(MatchError::NonExhaustive(report));
        };

        log::trace!("built dispatch table for `{}`: {:?}", schema.name(), table);
        Ok(Self { schema: schema.clone(), handlers: handlers.handlers, table, report })
    }

    /// The result of checking the handlers.
    pub fn report(&self) -> &ExhaustivenessReport {
        &self.report
    }

    /// Select the handler of the active variant of the value, and call it
    /// with the fields of the variant.
    pub fn evaluate(&self, value: &TaggedValue) -> Result<R, ValueError> {
        value.expect_schema(&self.schema)?;

        let handler = &self.handlers[self.table[value.tag()]];
        let fields: SmallVec<[&Value; 4]> = value.fields().collect();

        Ok(handler(&fields))
    }
}

impl<R> fmt::Debug for Matcher<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("schema", &self.schema)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

/// Validate the handlers against the schema, and evaluate them on the value
/// in one go.
pub fn evaluate<R>(
    schema: &Schema,
    value: &TaggedValue,
    handlers: Handlers<'_, R>,
) -> Result<R, MatchError> {
    let report = Arc::new(crate::check_exhaustive(schema, &handlers.arms));
    let matcher = Matcher::from_report(schema, handlers, report)?;

    Ok(matcher.evaluate(value)?)
}

#[cfg(test)]
mod tests {
    use dunion_repr::LayoutStorage;
    use dunion_schema::{Variant, define_schema, identifier::Identifier, ty::FieldTy};
    use dunion_target::primitives::FloatTy;
    use dunion_value::UnionRepr;
    use pretty_assertions::assert_eq;

    use super::*;

    fn shape(storage: &LayoutStorage) -> UnionRepr {
        let f64 = FieldTy::Float(FloatTy::F64);
        let schema = define_schema(
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
        .unwrap();

        UnionRepr::new(storage, schema)
    }

    fn float(value: &Value) -> f64 {
        value.as_f64().unwrap()
    }

    #[allow(clippy::approx_constant)]
    fn area<'h>() -> Handlers<'h, f64> {
        Handlers::new()
            .on("Rectangle", |fields| float(fields[0]) * float(fields[1]))
            .on("Circle", |fields| 3.14159 * float(fields[0]) * float(fields[0]))
    }

    #[test]
    fn test_area_of_circle() {
        let storage = LayoutStorage::default();
        let shape = shape(&storage);
        let cache = ExhaustivenessCache::new();

        let matcher = Matcher::new(shape.schema(), area(), &cache).unwrap();
        assert!(matcher.report().is_ok());

        let circle = shape.construct("Circle", [Value::from(5.0)]).unwrap();
        let result = matcher.evaluate(&circle).unwrap();
        assert!((result - 78.53975).abs() < 1e-9);

        let rectangle = shape.construct("Rectangle", [Value::from(2.0), Value::from(3.5)]).unwrap();
        assert_eq!(matcher.evaluate(&rectangle), Ok(7.0));
    }

    #[test]
    fn test_non_exhaustive_handlers_are_rejected() {
        let storage = LayoutStorage::default();
        let shape = shape(&storage);
        let cache = ExhaustivenessCache::new();

        let handlers = Handlers::new().on("Circle", |_| 0.0);
        let Err(MatchError::NonExhaustive(report)) = Matcher::new(shape.schema(), handlers, &cache)
        else {
            panic!("expected the handlers to be rejected");
        };

        assert_eq!(report.missing, vec![Identifier::from("Rectangle")]);
    }

    #[test]
    fn test_unreachable_handlers_are_never_selected() {
        let storage = LayoutStorage::default();
        let shape = shape(&storage);
        let cache = ExhaustivenessCache::new();

        let handlers = Handlers::new()
            .on("Circle", |_| "circle")
            .on("Circle", |_| "again")
            .otherwise(|_| "other")
            .on("Rectangle", |_| "never");

        let matcher = Matcher::new(shape.schema(), handlers, &cache).unwrap();
        assert_eq!(matcher.report().unreachable.len(), 2);

        let circle = shape.construct("Circle", [Value::from(1.0)]).unwrap();
        let rectangle = shape.construct("Rectangle", [Value::from(1.0), Value::from(1.0)]).unwrap();

        assert_eq!(matcher.evaluate(&circle), Ok("circle"));
        assert_eq!(matcher.evaluate(&rectangle), Ok("other"));
    }

    #[test]
    fn test_value_of_another_schema() {
        let storage = LayoutStorage::default();
        let (left, right) = (shape(&storage), shape(&storage));
        let cache = ExhaustivenessCache::new();

        let matcher = Matcher::new(left.schema(), area(), &cache).unwrap();
        let circle = right.construct("Circle", [Value::from(1.0)]).unwrap();

        assert!(matches!(matcher.evaluate(&circle), Err(ValueError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_one_shot_evaluate() {
        let storage = LayoutStorage::default();
        let shape = shape(&storage);
        let circle = shape.construct("Circle", [Value::from(5.0)]).unwrap();

        let result = evaluate(shape.schema(), &circle, area()).unwrap();
        assert!((result - 78.53975).abs() < 1e-9);

        let result = evaluate(shape.schema(), &circle, Handlers::new().on("Rectangle", |_| 1.0));
        assert!(matches!(result, Err(MatchError::NonExhaustive(_))));
    }

    #[test]
    fn test_shared_matcher() {
        use rayon::prelude::*;

        let storage = LayoutStorage::default();
        let shape = shape(&storage);
        let cache = ExhaustivenessCache::new();
        let matcher = Matcher::new(shape.schema(), area(), &cache).unwrap();

        let values: Vec<_> = (1..=16)
            .map(|side| {
                shape.construct("Rectangle", [Value::from(side as f64), Value::from(2.0)]).unwrap()
            })
            .collect();

        let total: f64 = values.par_iter().map(|value| matcher.evaluate(value).unwrap()).sum();
        assert_eq!(total, 272.0);
    }
}
