//! Finalized queries
//!
//! A `Query` pairs the term tree produced by the expression builder with the
//! named global options sent alongside it.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use super::options::NOREPLY_KEY;
use crate::protocol::Datum;

/// Frame type codes for outgoing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Start = 1,
    Continue = 2,
}

/// Named query options, last write wins per key
///
/// Keys iterate in lexical order, so the encoded option object is the same
/// for the same set of options regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    entries: BTreeMap<String, Datum>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: Datum) -> Option<Datum> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Datum> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Datum)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encode as the wire option object
    pub fn to_datum(&self) -> Datum {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Value::Object(object)
    }
}

/// A term plus its options, ready to dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    term: Datum,
    options: QueryOptions,
}

impl Query {
    /// Wrap a built term with no options
    pub fn new(term: Datum) -> Self {
        Self {
            term,
            options: QueryOptions::new(),
        }
    }

    pub fn term(&self) -> &Datum {
        &self.term
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Set one named option
    pub fn set_option(&mut self, key: impl Into<String>, value: Datum) {
        self.options.insert(key, value);
    }

    /// Builder form of `set_option`
    pub fn with_option(mut self, key: impl Into<String>, value: Datum) -> Self {
        self.set_option(key, value);
        self
    }

    /// True when the server is told not to answer
    pub fn is_noreply(&self) -> bool {
        self.options.get(NOREPLY_KEY) == Some(&Value::Bool(true))
    }

    /// Encode as a START frame: `[1, term, {options}]`
    pub fn to_wire(&self) -> Datum {
        json!([QueryType::Start as u8, self.term, self.options.to_datum()])
    }

    /// Encode a CONTINUE frame: `[2]`
    pub fn continue_frame() -> Datum {
        json!([QueryType::Continue as u8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_query_has_no_options() {
        let query = Query::new(json!([15, [[14, ["test"]], "heroes"]]));
        assert!(query.options().is_empty());
        assert!(!query.is_noreply());
    }

    #[test]
    fn test_options_last_write_wins() {
        let mut options = QueryOptions::new();
        assert_eq!(options.insert("noreply", json!(false)), None);
        assert_eq!(options.insert("noreply", json!(true)), Some(json!(false)));
        assert_eq!(options.len(), 1);
        assert_eq!(options.get("noreply"), Some(&json!(true)));
    }

    #[test]
    fn test_options_iterate_in_key_order() {
        let query = Query::new(json!(1))
            .with_option("soft_durability", json!(true))
            .with_option("db", json!("test"));
        let keys: Vec<&str> = query.options().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["db", "soft_durability"]);
    }

    #[test]
    fn test_start_frame() {
        let query = Query::new(json!([39, [[15, ["heroes"]]]])).with_option("noreply", json!(true));
        assert!(query.is_noreply());
        assert_eq!(
            query.to_wire(),
            json!([1, [39, [[15, ["heroes"]]]], {"noreply": true}])
        );
    }

    #[test]
    fn test_start_frame_without_options() {
        assert_eq!(Query::new(json!("x")).to_wire(), json!([1, "x", {}]));
    }

    #[test]
    fn test_continue_frame() {
        assert_eq!(Query::continue_frame(), json!([2]));
    }
}
