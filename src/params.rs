//! Ordered form/query parameter multi-map.

use crate::percent;
use crate::uri::Uri;

/// Ordered multi-map of percent-decoded `(name, value)` pairs, as found in
/// a query string or `application/x-www-form-urlencoded` body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    /// An empty parameter set.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Parses `query` of the form `k=v(&k=v)*`. Each pair is split on the
    /// first `=`; a missing `=` yields an empty value. Names and values are
    /// percent-decoded (`+` maps to space).
    pub fn parse(query: &str) -> Self {
        let mut entries = Vec::new();
        if query.is_empty() {
            return Self { entries };
        }
        for pair in query.split('&') {
            let (name, value) = match pair.find('=') {
                Some(idx) => (&pair[..idx], &pair[idx + 1..]),
                None => (pair, ""),
            };
            entries.push((percent::decode(name), percent::decode(value)));
        }
        Self { entries }
    }

    /// Parses the parameters out of a [`Uri`]'s raw query string.
    pub fn from_uri(uri: &Uri) -> Self {
        Self::parse(uri.encoded_query())
    }

    /// Returns `true` if any parameter with this name exists.
    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Returns `true` if an exact `(name, value)` pair exists.
    pub fn has_value(&self, name: &str, value: &str) -> bool {
        self.entries.iter().any(|(n, v)| n == name && v == value)
    }

    /// Returns the first value for `name`, or an empty string if absent.
    pub fn get(&self, name: &str) -> &str {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// Appends a `(name, value)` pair.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of parameter entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Composes `encoded_name=encoded_value` pairs joined by `&`, skipping
    /// any entry whose name is empty.
    pub fn compose(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.entries {
            if name.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&percent::encode(name.as_bytes()));
            out.push('=');
            out.push_str(&percent::encode(value.as_bytes()));
        }
        out
    }

    /// Byte length of [`Params::compose`]'s output, without allocating it.
    pub fn composed_len(&self) -> usize {
        let mut len = 0usize;
        for (name, value) in &self.entries {
            if name.is_empty() {
                continue;
            }
            if len > 0 {
                len += 1;
            }
            len += percent::encode(name.as_bytes()).len() + 1 + percent::encode(value.as_bytes()).len();
        }
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ampersand_separated_pairs() {
        let p = Params::parse("page=1&limit=10");
        assert_eq!(p.get("page"), "1");
        assert_eq!(p.get("limit"), "10");
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn missing_equals_yields_empty_value() {
        let p = Params::parse("flag&name=val");
        assert_eq!(p.get("flag"), "");
        assert!(p.has("flag"));
    }

    #[test]
    fn percent_decodes_names_and_values_with_plus_as_space() {
        let p = Params::parse("na+me=val%20ue");
        assert_eq!(p.get("na me"), "val ue");
    }

    #[test]
    fn empty_query_yields_no_params() {
        let p = Params::parse("");
        assert!(p.is_empty());
    }

    #[test]
    fn round_trip_compose_then_parse() {
        let mut p = Params::new();
        p.append("name", "Василий Пупкин");
        p.append("q", "a b&c=d");
        let composed = p.compose();
        let reparsed = Params::parse(&composed);
        assert_eq!(reparsed.get("name"), "Василий Пупкин");
        assert_eq!(reparsed.get("q"), "a b&c=d");
    }

    #[test]
    fn compose_skips_empty_names() {
        let mut p = Params::new();
        p.append("", "ignored");
        p.append("kept", "v");
        assert_eq!(p.compose(), "kept=v");
    }

    #[test]
    fn composed_len_matches_compose_output_length() {
        let mut p = Params::new();
        p.append("a", "1");
        p.append("b", "two words");
        assert_eq!(p.composed_len(), p.compose().len());
    }

    #[test]
    fn from_uri_uses_encoded_query() {
        let uri = Uri::parse("/search?q=rust+lang");
        let p = Params::from_uri(&uri);
        assert_eq!(p.get("q"), "rust lang");
    }
}
