//! Flat parameter map sent to the Europeana Search API.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single API parameter value. Never nested: a list only holds strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Text(String),
    List(Vec<String>),
}

impl ParamValue {
    /// Lenient conversion from an echoed JSON parameter.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(ParamValue::Text(s.clone())),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(ParamValue::Int(i)),
                None => Some(ParamValue::Text(n.to_string())),
            },
            serde_json::Value::Bool(b) => Some(ParamValue::Text(b.to_string())),
            serde_json::Value::Array(items) => Some(ParamValue::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(s) => Some(s.clone()),
                        serde_json::Value::Number(n) => Some(n.to_string()),
                        serde_json::Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect(),
            )),
            serde_json::Value::Null | serde_json::Value::Object(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            ParamValue::Text(s) => s.trim().parse().ok(),
            ParamValue::List(_) => None,
        }
    }

    /// Whitespace-only text and empty lists count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            ParamValue::Int(_) => false,
            ParamValue::Text(s) => s.trim().is_empty(),
            ParamValue::List(items) => items.is_empty(),
        }
    }

    pub fn into_list(self) -> Vec<String> {
        match self {
            ParamValue::Int(i) => vec![i.to_string()],
            ParamValue::Text(s) => vec![s],
            ParamValue::List(items) => items,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        ParamValue::List(value.into_iter().map(|s| s.to_string()).collect())
    }
}

/// Insertion-ordered parameter map.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiParams(IndexMap<String, ParamValue>);

impl ApiParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from the `params` object echoed in an API payload.
    /// Entries that cannot be represented as flat values are dropped.
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self(
            object
                .iter()
                .filter_map(|(key, value)| ParamValue::from_json(value).map(|v| (key.clone(), v)))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sets `key`, keeping its original position when it already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Appends `values` to the list under `key`, coercing a scalar already
    /// stored there into the head of the list. Duplicates are kept.
    pub fn append_to_list<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = self.0.get(key).cloned().map(ParamValue::into_list).unwrap_or_default();
        list.extend(values.into_iter().map(Into::into));
        self.0.insert(key.to_string(), ParamValue::List(list));
    }

    /// Merges `value` into `key` as a union: the result is always a list,
    /// flattened and deduplicated in first-seen order.
    pub fn merge_overlay(&mut self, key: &str, value: ParamValue) {
        let mut merged: Vec<String> = Vec::new();
        let existing = self.0.get(key).cloned().map(ParamValue::into_list).unwrap_or_default();
        for item in existing.into_iter().chain(value.into_list()) {
            if !merged.contains(&item) {
                merged.push(item);
            }
        }
        self.0.insert(key.to_string(), ParamValue::List(merged));
    }

    /// Flattens the map into query-string pairs; lists become repeated keys.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            match value {
                ParamValue::List(items) => {
                    pairs.extend(items.iter().map(|item| (key.clone(), item.clone())));
                }
                scalar => pairs.push((key.clone(), scalar.to_string())),
            }
        }
        pairs
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ApiParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overlay_coerces_scalar_and_dedups() {
        let mut params = ApiParams::new();
        params.insert("qf", "A");
        params.merge_overlay("qf", ParamValue::from("B"));
        params.merge_overlay("qf", ParamValue::from(vec!["A", "C"]));
        assert_eq!(params.get("qf"), Some(&ParamValue::from(vec!["A", "B", "C"])));
    }

    #[test]
    fn test_append_to_list_keeps_duplicates() {
        let mut params = ApiParams::new();
        params.append_to_list("qf", ["TYPE:\"IMAGE\""]);
        params.append_to_list("qf", ["TYPE:\"IMAGE\""]);
        assert_eq!(params.get("qf").map(|v| v.clone().into_list().len()), Some(2));
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut params: ApiParams = [("query", "dog"), ("sort", "")].into_iter().collect();
        params.insert("query", "cat");
        let keys: Vec<_> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["query", "sort"]);
    }

    #[test]
    fn test_query_pairs_repeat_list_keys() {
        let mut params = ApiParams::new();
        params.insert("rows", 12_i64);
        params.insert("qf", vec!["A", "B"]);
        assert_eq!(
            params.to_query_pairs(),
            vec![
                ("rows".to_string(), "12".to_string()),
                ("qf".to_string(), "A".to_string()),
                ("qf".to_string(), "B".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_json_object_skips_nested() {
        let echoed = serde_json::json!({"start": "11", "rows": 10, "qf": ["A"], "nested": {"a": 1}});
        let params = ApiParams::from_json_object(echoed.as_object().unwrap());
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("start").and_then(ParamValue::as_int), Some(11));
        assert!(!params.contains_key("nested"));
    }
}
