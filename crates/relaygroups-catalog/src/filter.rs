//! Subscription filters.
//!
//! ```json
//! { "kinds": [9], "#h": ["group"], "authors": ["<hex>"], "since": 1, "until": 2, "limit": 10 }
//! ```
//!
//! Every field is optional and absent fields are omitted from the JSON
//! entirely. Values within one tag key are OR-ed, tag keys are AND-ed.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

use crate::error::{CatalogError, Result};
use crate::kinds::Kind;

/// A subscription query descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    kinds: Option<Vec<u32>>,
    tags: BTreeMap<char, Vec<String>>,
    authors: Option<Vec<String>>,
    since: Option<u64>,
    until: Option<u64>,
    limit: Option<u64>,
}

impl Filter {
    /// An empty filter. Legal on the wire: the relay applies its defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add kinds, keeping any already present.
    pub fn kinds(mut self, kinds: impl IntoIterator<Item = Kind>) -> Self {
        self.kinds
            .get_or_insert_with(Vec::new)
            .extend(kinds.into_iter().map(Kind::as_u32));
        self
    }

    pub fn kind(self, kind: Kind) -> Self {
        self.kinds([kind])
    }

    /// Add numeric kinds not in [`Kind`].
    pub fn raw_kinds(mut self, kinds: impl IntoIterator<Item = u32>) -> Self {
        self.kinds.get_or_insert_with(Vec::new).extend(kinds);
        self
    }

    /// Constrain tag `name` to any of `values`.
    pub fn tag<I, S>(mut self, name: char, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .entry(name)
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors
            .get_or_insert_with(Vec::new)
            .extend(authors.into_iter().map(Into::into));
        self
    }

    /// Inclusive lower time bound (Unix seconds).
    pub fn since(mut self, since: u64) -> Self {
        self.since = Some(since);
        self
    }

    /// Inclusive upper time bound (Unix seconds).
    pub fn until(mut self, until: u64) -> Self {
        self.until = Some(until);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn kinds_list(&self) -> Option<&[u32]> {
        self.kinds.as_deref()
    }

    pub fn tag_values(&self, name: char) -> Option<&[String]> {
        self.tags.get(&name).map(Vec::as_slice)
    }

    pub fn authors_list(&self) -> Option<&[String]> {
        self.authors.as_deref()
    }

    pub fn since_value(&self) -> Option<u64> {
        self.since
    }

    pub fn until_value(&self) -> Option<u64> {
        self.until
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// Check that the filter can be put on the wire.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.tags.keys().find(|c| !c.is_ascii_alphabetic()) {
            return Err(CatalogError::InvalidParameter(format!(
                "tag filter name must be a single ASCII letter, got {name:?}"
            )));
        }
        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                return Err(CatalogError::InvalidParameter(format!(
                    "since ({since}) is after until ({until})"
                )));
            }
        }
        Ok(())
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(kinds) = &self.kinds {
            map.serialize_entry("kinds", kinds)?;
        }
        for (name, values) in &self.tags {
            map.serialize_entry(&format!("#{name}"), values)?;
        }
        if let Some(authors) = &self.authors {
            map.serialize_entry("authors", authors)?;
        }
        if let Some(since) = self.since {
            map.serialize_entry("since", &since)?;
        }
        if let Some(until) = self.until {
            map.serialize_entry("until", &until)?;
        }
        if let Some(limit) = self.limit {
            map.serialize_entry("limit", &limit)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_filter() {
        let filter = Filter::new();
        assert_eq!(serde_json::to_string(&filter).unwrap(), "{}");
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_group_messages_shape() {
        let filter = Filter::new().kind(Kind::ChatMessage).tag('h', ["g1"]).limit(10);
        assert_eq!(
            serde_json::to_string(&filter).unwrap(),
            r##"{"kinds":[9],"#h":["g1"],"limit":10}"##
        );
    }

    #[test]
    fn test_all_fields() {
        let filter = Filter::new()
            .kinds([Kind::JoinRequest, Kind::LeaveRequest])
            .tag('p', ["pk"])
            .tag('d', ["g1"])
            .authors(["a1", "a2"])
            .since(10)
            .until(20)
            .limit(5);
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "kinds": [9021, 9022],
                "#d": ["g1"],
                "#p": ["pk"],
                "authors": ["a1", "a2"],
                "since": 10,
                "until": 20,
                "limit": 5
            })
        );
    }

    #[test]
    fn test_tag_values_accumulate() {
        let filter = Filter::new().tag('e', ["a"]).tag('e', ["b"]);
        assert_eq!(filter.tag_values('e').unwrap(), ["a", "b"]);
        assert!(filter.tag_values('h').is_none());
    }

    #[test]
    fn test_validate_rejects_bad_tag_name() {
        let filter = Filter::new().tag('1', ["x"]);
        assert!(matches!(
            filter.validate(),
            Err(CatalogError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let filter = Filter::new().since(20).until(10);
        assert!(filter.validate().is_err());
        assert!(Filter::new().since(10).until(10).validate().is_ok());
    }
}
