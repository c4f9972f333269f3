//! Equality filters and find options for document queries.

use super::{DocumentId, ID_FIELD};
use serde_json::Value;
use std::cmp::Ordering;

/// Conjunction of equality predicates on document field paths.
///
/// Paths may be dotted (`"address.city"`) to reach nested objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<(String, Value)>,
}

impl Filter {
    /// Empty filter. Matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter selecting the document with `_id == id`.
    pub fn by_id(id: DocumentId) -> Self {
        Self::new().eq(ID_FIELD, id.to_string())
    }

    /// Adds a `path == value` predicate.
    pub fn eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push((path.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Returns whether every predicate holds for `document`.
    pub fn matches(&self, document: &Value) -> bool {
        self.predicates
            .iter()
            .all(|(path, expected)| field_at(document, path) == Some(expected))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Paging and ordering applied to `find` results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub skip: u64,
    pub limit: Option<u64>,
    pub sort: Option<(String, SortOrder)>,
}

impl FindOptions {
    pub fn skip(mut self, count: u64) -> Self {
        self.skip = count;
        self
    }

    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self
    }

    pub fn sort_by(mut self, path: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((path.into(), order));
        self
    }
}

/// Resolves a dotted field path inside `document`.
pub(crate) fn field_at<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

/// Total order over JSON values: missing/null < bool < number < string,
/// with arrays and objects last and mutually equal.
pub(crate) fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) | Some(Value::Object(_)) => 4,
        }
    }

    match (left, right) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        _ => rank(left).cmp(&rank(right)),
    }
}

#[cfg(test)]
mod tests {
    use super::{compare_values, Filter};
    use serde_json::json;
    use std::cmp::Ordering;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::new().matches(&json!({"a": 1})));
    }

    #[test]
    fn all_predicates_must_match() {
        let doc = json!({"email": "a@example.com", "active": true});

        assert!(Filter::new()
            .eq("email", "a@example.com")
            .eq("active", true)
            .matches(&doc));
        assert!(!Filter::new()
            .eq("email", "a@example.com")
            .eq("active", false)
            .matches(&doc));
    }

    #[test]
    fn dotted_paths_reach_nested_fields() {
        let doc = json!({"address": {"city": "Oslo"}});

        assert!(Filter::new().eq("address.city", "Oslo").matches(&doc));
        assert!(!Filter::new().eq("address.zip", "0150").matches(&doc));
    }

    #[test]
    fn numbers_sort_numerically_and_missing_sorts_first() {
        assert_eq!(
            compare_values(Some(&json!(2)), Some(&json!(10))),
            Ordering::Less
        );
        assert_eq!(compare_values(None, Some(&json!("x"))), Ordering::Less);
    }
}
