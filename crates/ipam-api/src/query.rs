// Query-string builder for list endpoints.
//
// Absent filters are dropped entirely: `None` and empty strings never
// become `key=` or `key=undefined` in the URL. Numeric paging and VLAN
// filters also treat zero as absent.

use url::form_urlencoded;

/// Ordered list of query pairs with absent values already filtered out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key=value` if the value is present and non-empty.
    pub fn push<V: ToString>(mut self, key: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.is_empty() {
                self.pairs.push((key, value));
            }
        }
        self
    }

    /// Like [`push`](Self::push), but a zero value is also left out.
    pub fn push_nonzero<V>(self, key: &'static str, value: Option<V>) -> Self
    where
        V: ToString + Default + PartialEq,
    {
        self.push(key, value.filter(|v| *v != V::default()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Form-encoded representation, without the leading `?`.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}
