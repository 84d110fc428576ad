//! `path?query` request-target decomposition.

use crate::percent;

/// Immutable `path?query` decomposition of a request target.
///
/// Only the `path?query` shape is supported (see the crate's Non-goals);
/// full RFC 3986 decomposition is out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uri {
    encoded_path: String,
    path: String,
    encoded_query: String,
    query: String,
}

impl Uri {
    /// Parses `str` by splitting on the first `?`.
    pub fn parse(str: &str) -> Self {
        let (encoded_path, encoded_query) = match str.find('?') {
            Some(idx) => (&str[..idx], &str[idx + 1..]),
            None => (str, ""),
        };
        Self {
            encoded_path: encoded_path.to_string(),
            path: percent::decode(encoded_path),
            encoded_query: encoded_query.to_string(),
            query: percent::decode(encoded_query),
        }
    }

    /// Raw (not percent-decoded) path segment, as received.
    pub fn encoded_path(&self) -> &str {
        &self.encoded_path
    }

    /// Percent-decoded path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string, as received. Use this (not [`Uri::query`]) to
    /// construct [`crate::params::Params`].
    pub fn encoded_query(&self) -> &str {
        &self.encoded_query
    }

    /// Percent-decoded query string, for display only — do not parse this
    /// for parameter extraction.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Byte length of the composed form (`encoded_path` plus, if
    /// non-empty, `'?'` and `encoded_query`).
    pub fn composed_len(&self) -> usize {
        self.encoded_path.len()
            + if self.encoded_query.is_empty() { 0 } else { 1 + self.encoded_query.len() }
    }

    /// Writes the composed form into `out`, returning the number of bytes
    /// written (equal to [`Uri::composed_len`]).
    pub fn compose(&self, out: &mut Vec<u8>) -> usize {
        out.extend_from_slice(self.encoded_path.as_bytes());
        if !self.encoded_query.is_empty() {
            out.push(b'?');
            out.extend_from_slice(self.encoded_query.as_bytes());
        }
        self.composed_len()
    }
}
