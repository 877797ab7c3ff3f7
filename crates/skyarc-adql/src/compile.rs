//! Constraint-set compilation into ADQL.
//!
//! The compiler walks a [`ConstraintSet`] in insertion order, resolves each
//! key against the [`FieldRegistry`], and joins the resulting predicate
//! fragments into a `WHERE` clause appended to a fixed base select
//! statement. Unrecognized keys are collected across the whole set and
//! reported together; no partial query is ever returned.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CompileError;
use crate::fields::FieldRegistry;

/// Base select statement for ObsCore queries.
pub const OBSCORE_BASE_QUERY: &str = "select * from tap_schema.obscore";

/// Ordered set of logical-field constraints.
///
/// Insertion order is preserved and determines the order of predicate
/// fragments in the compiled query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintSet {
    entries: Vec<(String, Value)>,
}

impl ConstraintSet {
    /// Empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert a constraint, replacing any existing value for the key while
    /// keeping its original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Append an alternative to an existing string value using the `|` OR
    /// separator understood by encoders, or insert the value as-is.
    pub fn merge_or(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, Value::String(existing))) => {
                existing.push_str(" | ");
                existing.push_str(&value);
            }
            Some((_, slot)) => *slot = Value::String(value),
            None => self.entries.push((key, Value::String(value))),
        }
    }

    /// Constraints in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no constraints are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.set(key, value);
        }
        set
    }
}

/// Compiles constraint sets into ADQL query strings.
///
/// Compilation is pure in-memory work: the registry is never mutated and the
/// same input always yields byte-identical output.
pub struct QueryCompiler {
    registry: &'static FieldRegistry,
    base_query: String,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCompiler {
    /// Compiler over the global field registry and [`OBSCORE_BASE_QUERY`].
    pub fn new() -> Self {
        Self {
            registry: FieldRegistry::global(),
            base_query: OBSCORE_BASE_QUERY.to_string(),
        }
    }

    /// Compiler with a custom base select statement.
    pub fn with_base_query(base_query: impl Into<String>) -> Self {
        Self {
            registry: FieldRegistry::global(),
            base_query: base_query.into(),
        }
    }

    /// The base select statement queries are built on.
    pub fn base_query(&self) -> &str {
        &self.base_query
    }

    /// Compile a constraint set into a complete query string.
    ///
    /// Fragments appear in constraint order, joined with ` AND ` and
    /// prefixed with ` WHERE ` only when at least one fragment exists. A key
    /// whose encoder yields an empty fragment is still consumed. Encoder
    /// failures abort immediately; unrecognized keys are gathered across the
    /// whole set and reported together as
    /// [`CompileError::UnsupportedConstraints`].
    pub fn compile(&self, constraints: &ConstraintSet) -> Result<String, CompileError> {
        let mut where_clause = String::new();
        let mut unresolved: Vec<(String, Value)> = Vec::new();

        for (key, value) in constraints.iter() {
            let Some(field) = self.registry.resolve(key) else {
                unresolved.push((key.to_string(), value.clone()));
                continue;
            };
            let fragment =
                (field.encode)(field.columns, value).map_err(|source| CompileError::Encode {
                    field: key.to_string(),
                    source,
                })?;
            if fragment.is_empty() {
                continue;
            }
            if where_clause.is_empty() {
                where_clause.push_str(" WHERE ");
            } else {
                where_clause.push_str(" AND ");
            }
            where_clause.push_str(&fragment);
        }

        if !unresolved.is_empty() {
            return Err(CompileError::UnsupportedConstraints(unresolved));
        }

        Ok(format!("{}{}", self.base_query, where_clause))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =========================================================================
    // Base query behavior
    // =========================================================================

    #[test]
    fn test_empty_set_is_base_query_only() {
        let query = QueryCompiler::new().compile(&ConstraintSet::new()).unwrap();
        assert_eq!(query, OBSCORE_BASE_QUERY);
        assert!(!query.contains("WHERE"));
    }

    #[test]
    fn test_custom_base_query() {
        let compiler = QueryCompiler::with_base_query("select obs_id from ivoa.obscore");
        let constraints = ConstraintSet::new().with("fov", "5");

        let query = compiler.compile(&constraints).unwrap();
        assert_eq!(query, "select obs_id from ivoa.obscore WHERE s_fov=5");
    }

    // =========================================================================
    // Fragment assembly
    // =========================================================================

    #[test]
    fn test_position_constraint() {
        let constraints = ConstraintSet::new().with("ra_dec", "10.5, 20.3, 0.1");

        let query = QueryCompiler::new().compile(&constraints).unwrap();
        assert_eq!(
            query,
            "select * from tap_schema.obscore WHERE \
             CONTAINS(POINT('ICRS',s_ra,s_dec),CIRCLE('ICRS',10.5,20.3,0.1))=1"
        );
    }

    #[test]
    fn test_numeric_constraint() {
        let constraints = ConstraintSet::new().with("spatial_resolution", "5");

        let query = QueryCompiler::new().compile(&constraints).unwrap();
        assert!(query.contains("WHERE spatial_resolution=5"));
    }

    #[test]
    fn test_fragments_joined_with_and_in_insertion_order() {
        let constraints = ConstraintSet::new()
            .with("spatial_resolution", "<0.2")
            .with("fov", ">10");

        let query = QueryCompiler::new().compile(&constraints).unwrap();
        assert_eq!(
            query,
            "select * from tap_schema.obscore WHERE spatial_resolution<=0.2 AND s_fov>=10"
        );
    }

    #[test]
    fn test_fragment_order_follows_input_order() {
        let forward = ConstraintSet::new()
            .with("spatial_resolution", "5")
            .with("fov", "10");
        let reversed = ConstraintSet::new()
            .with("fov", "10")
            .with("spatial_resolution", "5");

        let compiler = QueryCompiler::new();
        let a = compiler.compile(&forward).unwrap();
        let b = compiler.compile(&reversed).unwrap();

        assert_ne!(a, b);
        for query in [&a, &b] {
            assert!(query.contains("spatial_resolution=5"));
            assert!(query.contains("s_fov=10"));
        }
    }

    #[test]
    fn test_no_deduplication_across_fields_sharing_a_column() {
        // spectral_resolution and em_resolution both target em_resolution;
        // both fragments are emitted as supplied.
        let constraints = ConstraintSet::new()
            .with("spectral_resolution", "5")
            .with("em_resolution", ">1");

        let query = QueryCompiler::new().compile(&constraints).unwrap();
        assert!(query.contains("em_resolution=59958.4916 AND em_resolution>=1"));
    }

    #[test]
    fn test_compile_is_idempotent() {
        let constraints = ConstraintSet::new()
            .with("ra_dec", "10.5, 20.3, 0.1")
            .with("start_date", ">01-01-2011");

        let compiler = QueryCompiler::new();
        assert_eq!(
            compiler.compile(&constraints).unwrap(),
            compiler.compile(&constraints).unwrap()
        );
    }

    #[test]
    fn test_empty_fragment_consumes_key_without_predicate() {
        // A null visibility flag is consumed but constrains nothing.
        let constraints = ConstraintSet::new()
            .with("public", Value::Null)
            .with("fov", "5");

        let query = QueryCompiler::new().compile(&constraints).unwrap();
        assert_eq!(query, "select * from tap_schema.obscore WHERE s_fov=5");
    }

    #[test]
    fn test_all_empty_fragments_yield_base_query() {
        let constraints = ConstraintSet::new().with("public", Value::Null);

        let query = QueryCompiler::new().compile(&constraints).unwrap();
        assert_eq!(query, OBSCORE_BASE_QUERY);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn test_recognized_keys_never_fail_validation() {
        let constraints = ConstraintSet::new()
            .with("source_name", "M83")
            .with("public", true)
            .with("frequency", "90..110");

        assert!(QueryCompiler::new().compile(&constraints).is_ok());
    }

    #[test]
    fn test_single_unknown_key_reported() {
        let constraints = ConstraintSet::new().with("bogus_field", "x");

        let err = QueryCompiler::new().compile(&constraints).unwrap_err();
        match err {
            CompileError::UnsupportedConstraints(unresolved) => {
                assert_eq!(unresolved, vec![("bogus_field".to_string(), json!("x"))]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_all_unknown_keys_reported_together() {
        let constraints = ConstraintSet::new()
            .with("bogus_field", "x")
            .with("fov", "5")
            .with("also_bogus", 7);

        let err = QueryCompiler::new().compile(&constraints).unwrap_err();
        match err {
            CompileError::UnsupportedConstraints(unresolved) => {
                assert_eq!(
                    unresolved,
                    vec![
                        ("bogus_field".to_string(), json!("x")),
                        ("also_bogus".to_string(), json!(7)),
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_encoder_failure_is_fatal() {
        let constraints = ConstraintSet::new().with("fov", "very wide");

        let err = QueryCompiler::new().compile(&constraints).unwrap_err();
        assert!(matches!(err, CompileError::Encode { ref field, .. } if field == "fov"));
    }

    // =========================================================================
    // ConstraintSet behavior
    // =========================================================================

    #[test]
    fn test_set_replaces_value_in_place() {
        let mut constraints = ConstraintSet::new();
        constraints.set("fov", "5");
        constraints.set("spatial_resolution", "1");
        constraints.set("fov", "10");

        let keys: Vec<&str> = constraints.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["fov", "spatial_resolution"]);
        let query = QueryCompiler::new().compile(&constraints).unwrap();
        assert!(query.contains("s_fov=10"));
    }

    #[test]
    fn test_merge_or_appends_alternative() {
        let mut constraints = ConstraintSet::new();
        constraints.merge_or("ra_dec", "10.5, 20.3, 0.1");
        constraints.merge_or("ra_dec", "11.0, 21.0, 0.2");

        let query = QueryCompiler::new().compile(&constraints).unwrap();
        assert!(query.contains(
            "(CONTAINS(POINT('ICRS',s_ra,s_dec),CIRCLE('ICRS',10.5,20.3,0.1))=1 \
             OR CONTAINS(POINT('ICRS',s_ra,s_dec),CIRCLE('ICRS',11.0,21.0,0.2))=1)"
        ));
    }

    #[test]
    fn test_from_iterator() {
        let constraints: ConstraintSet = [("fov", "5"), ("spatial_resolution", "1")]
            .into_iter()
            .collect();

        assert_eq!(constraints.len(), 2);
        assert!(!constraints.is_empty());
    }
}
