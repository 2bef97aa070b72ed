//! Query parameters for outgoing calls.

use std::fmt;

/// A scalar query value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl QueryValue {
    /// Text sent on the wire, or `None` when the entry is left out.
    ///
    /// Null and empty strings are omitted; zero and `false` are kept.
    pub fn to_query_string(&self) -> Option<String> {
        match self {
            QueryValue::Null => None,
            QueryValue::Str(s) if s.is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Null => Ok(()),
            QueryValue::Str(s) => f.write_str(s),
            QueryValue::Int(i) => write!(f, "{i}"),
            QueryValue::Float(x) => write!(f, "{x}"),
            QueryValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(i64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::Null, Into::into)
    }
}

/// Ordered query parameters. Setting an existing key replaces its value in
/// place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`QueryParams::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// A copy with `key` set to `value`; `self` is left untouched.
    pub fn merged(&self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.clone().with(key, value)
    }

    /// Entries that are sent, in insertion order, not yet URL-encoded.
    pub fn pairs(&self) -> Vec<(&str, String)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.to_query_string().map(|v| (k.as_str(), v)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_empty_entries_are_omitted() {
        let params = QueryParams::new()
            .with("search", "")
            .with("page", 2)
            .with("categoryId", None::<String>)
            .with("active", false)
            .with("offset", 0);

        assert_eq!(
            params.pairs(),
            vec![
                ("page", "2".to_string()),
                ("active", "false".to_string()),
                ("offset", "0".to_string()),
            ]
        );
    }

    #[test]
    fn set_replaces_in_place() {
        let mut params = QueryParams::new().with("page", 1).with("pageSize", 20);
        params.set("page", 3);
        assert_eq!(params.pairs()[0], ("page", "3".to_string()));
        assert_eq!(params.pairs().len(), 2);
    }

    #[test]
    fn merged_leaves_the_original_alone() {
        let params = QueryParams::new().with("page", 1);
        let merged = params.merged("search", "lamp");
        assert!(params.get("search").is_none());
        assert_eq!(merged.get("search"), Some(&QueryValue::from("lamp")));
        assert_eq!(merged.get("page"), Some(&QueryValue::Int(1)));
    }

    #[test]
    fn floats_render_without_trailing_zeroes() {
        assert_eq!(QueryValue::Float(2.5).to_query_string().as_deref(), Some("2.5"));
        assert_eq!(QueryValue::Float(3.0).to_query_string().as_deref(), Some("3"));
    }

    #[test]
    fn collects_from_pairs() {
        let params: QueryParams = [("status", "pending"), ("search", "A-1")].into_iter().collect();
        assert_eq!(params.pairs().len(), 2);
    }
}
