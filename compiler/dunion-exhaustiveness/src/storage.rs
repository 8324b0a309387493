//! Cache of [ExhaustivenessReport]s, keyed by the identity of the schema and
//! the list of arms that were checked against it.
use std::sync::Arc;

use dashmap::DashMap;
use dunion_schema::{Schema, SchemaId};

use crate::{Arm, ExhaustivenessReport, check_exhaustive};

type CacheKey = (SchemaId, Box<[Arm]>);

/// Stores the result of every distinct check. The cache may be shared
/// between threads, a check that is raced by two threads is computed twice
/// and the first result to be published wins.
#[derive(Debug, Default)]
pub struct ExhaustivenessCache {
    reports: DashMap<CacheKey, Arc<ExhaustivenessReport>>,
}

impl ExhaustivenessCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the arms against the schema, or get the result of a previous
    /// check of the same arms.
    pub fn check(&self, schema: &Schema, arms: &[Arm]) -> Arc<ExhaustivenessReport> {
        let key: CacheKey = (schema.id(), arms.into());

        if let Some(report) = self.reports.get(&key) {
            return Arc::clone(report.value());
        }

        let report = Arc::new(check_exhaustive(schema, arms));
        Arc::clone(self.reports.entry(key).or_insert(report).value())
    }

    /// The number of distinct checks that have been performed.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use dunion_schema::{Variant, define_schema};

    use super::*;

    #[test]
    fn test_reports_are_cached() {
        let cache = ExhaustivenessCache::new();
        let schema = define_schema("Abc", ["A", "B", "C"].map(Variant::unit)).unwrap();
        let arms = ["A", "B", "C"].map(Arm::from);

        let first = cache.check(&schema, &arms);
        let second = cache.check(&schema, &arms);
        assert!(Arc::ptr_eq(&first, &second));

        // The order of the arms is part of the key.
        cache.check(&schema, &["C", "B", "A"].map(Arm::from));
        assert_eq!(cache.len(), 2);

        // So is the identity of the schema.
        let other = define_schema("Abc", ["A", "B", "C"].map(Variant::unit)).unwrap();
        cache.check(&other, &arms);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_concurrent_checks() {
        use rayon::prelude::*;

        let cache = ExhaustivenessCache::new();
        let schema = define_schema("Abc", ["A", "B", "C"].map(Variant::unit)).unwrap();
        let arms = ["A", "_"].map(Arm::from);

        let reports: Vec<_> =
            (0..64).into_par_iter().map(|_| cache.check(&schema, &arms)).collect();

        assert!(reports.iter().all(|report| report.is_ok()));
        assert_eq!(cache.len(), 1);
    }
}
