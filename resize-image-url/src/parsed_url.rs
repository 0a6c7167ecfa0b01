// ABOUTME: Structured view of an absolute http(s) image URL
// ABOUTME: Splits the query into an editable mapping and regenerates it on serialization

use crate::error::ResizeError;
use crate::query::QueryMap;
use std::fmt;
use url::Url;

/// Parsed http(s) URL with its query held as a [`QueryMap`].
///
/// The raw query string is discarded at parse time, so serialization always
/// regenerates it from the mapping. An empty mapping serializes without `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    url: Url,
    query: QueryMap,
}

impl ParsedUrl {
    /// Parse an absolute URL, accepting only `http` and `https` with a hostname
    pub fn parse(input: &str) -> Result<Self, ResizeError> {
        let mut url = Url::parse(input).map_err(|e| ResizeError::Malformed {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ResizeError::UnsupportedScheme {
                url: input.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        if !has_authority(input) || url.host_str().is_none_or(str::is_empty) {
            return Err(ResizeError::MissingHost(input.to_string()));
        }

        let query = url.query().map(QueryMap::parse).unwrap_or_default();
        url.set_query(None);

        Ok(Self { url, query })
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.url.fragment()
    }

    pub fn query(&self) -> &QueryMap {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut QueryMap {
        &mut self.query
    }

    /// Reassemble the full URL from its parts and the current query mapping
    pub fn to_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.set_query(Some(&self.query.encode()));
        }
        url
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_url())
    }
}

/// Whether `input` spells out `//host` right after the scheme. WHATWG parsing
/// recovers a host from forms like `https:host` or `https:\\host`, which are
/// treated here as having none.
fn has_authority(input: &str) -> bool {
    input
        .split_once(':')
        .and_then(|(_, rest)| rest.strip_prefix("//"))
        .is_some_and(|authority| !authority.starts_with(['/', '\\']))
}
