//! Request parameter access
//!
//! The engine reads parameters through [`ParamSource`], so any multi-valued,
//! case-preserving string map can feed it. [`RequestParams`] is the concrete
//! map used by the CLI and the tests.

use std::collections::HashMap;

use crate::params::error::{ParamError, ParamResult};

/// Read-only access to request parameters
pub trait ParamSource {
    /// Every value supplied for `key`, in request order
    fn get_all(&self, key: &str) -> Vec<&str>;

    /// First value supplied for `key`
    fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).into_iter().next()
    }

    /// First value for `key`, treating an empty string as absent
    fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Whether `key` was supplied at all
    fn contains(&self, key: &str) -> bool {
        !self.get_all(key).is_empty()
    }
}

/// Ordered list of request parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    entries: Vec<(String, String)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse a URL query string like `geo=state:ca&time=day:20200419`
    ///
    /// A leading `?` is ignored, `+` decodes to a space and a key without
    /// `=` gets an empty value.
    pub fn from_query_string(query: &str) -> ParamResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.insert(decode(key)?, decode(value)?);
        }

        Ok(params)
    }

    /// Append a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Builder method: append a value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decode(component: &str) -> ParamResult<String> {
    urlencoding::decode(&component.replace('+', " "))
        .map(|s| s.into_owned())
        .map_err(|e| ParamError::Encoding(format!("{}: {}", component, e)))
}

impl ParamSource for RequestParams {
    fn get_all(&self, key: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

impl ParamSource for HashMap<String, Vec<String>> {
    fn get_all(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|values| values.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys_keep_order() {
        let params = RequestParams::new()
            .with("time", "day:20200101")
            .with("geo", "state:ca")
            .with("time", "day:20200105");
        assert_eq!(params.get_all("time"), vec!["day:20200101", "day:20200105"]);
        assert_eq!(params.get("geo"), Some("state:ca"));
        assert!(!params.contains("signal"));
    }

    #[test]
    fn test_keys_are_case_preserving() {
        let params = RequestParams::from_pairs([("Geo", "state:ca")]);
        assert!(params.get("geo").is_none());
        assert_eq!(params.get("Geo"), Some("state:ca"));
    }

    #[test]
    fn test_query_string() {
        let params =
            RequestParams::from_query_string("?geo=state%3Aca%2Ctx&signal=src:*&flag&time=day:2020-04-19+")
                .unwrap();
        assert_eq!(params.get("geo"), Some("state:ca,tx"));
        assert_eq!(params.get("signal"), Some("src:*"));
        assert_eq!(params.get("flag"), Some(""));
        assert_eq!(params.get_non_empty("flag"), None);
        assert_eq!(params.get("time"), Some("day:2020-04-19 "));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_query_string_bad_encoding() {
        let err = RequestParams::from_query_string("geo=%FF").unwrap_err();
        assert_eq!(err.code(), "ENCODING_ERROR");
    }

    #[test]
    fn test_hash_map_source() {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        map.insert("geo".into(), vec!["state:ca".into(), "county:06001".into()]);
        assert_eq!(map.get_all("geo").len(), 2);
        assert_eq!(ParamSource::get(&map, "geo"), Some("state:ca"));
        assert!(map.get_all("time").is_empty());
    }
}
