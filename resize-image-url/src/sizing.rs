// ABOUTME: Resize requests and the sizing query parameters they produce
// ABOUTME: Normalizes numeric sizes per service and applies the scale factor to a query

use crate::constants::params::{is_list_param, is_size_param, LIST_SEPARATOR};
use crate::query::QueryMap;
use crate::scale::ScaleFactor;
use crate::service::Service;

/// Ordered sizing parameters, e.g. `{ w: "100" }` or `{ fit: "100,200" }`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeParams(Vec<(String, String)>);

impl SizeParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any earlier value for the same key
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge into `query`, scaling sizing values by `factor`
    pub fn apply(&self, query: &mut QueryMap, factor: ScaleFactor) {
        for (key, value) in self.iter() {
            let scaled = if is_list_param(key) {
                factor.scale_list(value)
            } else if is_size_param(key) {
                factor.scale(value)
            } else {
                value.to_string()
            };
            query.insert(key, scaled);
        }
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for SizeParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// What size to request: a width with optional height, or explicit parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeSpec {
    Numeric { width: u32, height: Option<u32> },
    Explicit(SizeParams),
}

impl ResizeSpec {
    pub fn width(width: u32) -> Self {
        ResizeSpec::Numeric {
            width,
            height: None,
        }
    }

    pub fn fit(width: u32, height: u32) -> Self {
        ResizeSpec::Numeric {
            width,
            height: Some(height),
        }
    }

    /// Resolve into the sizing parameters understood by `service`.
    ///
    /// Gravatar takes a single `s`; everything else takes `fit` when a
    /// positive height is given, `w` otherwise.
    pub fn normalize(self, service: Option<Service>) -> SizeParams {
        match self {
            ResizeSpec::Explicit(params) => params,
            ResizeSpec::Numeric { width, .. } if service == Some(Service::Gravatar) => {
                SizeParams::new().with("s", width)
            }
            ResizeSpec::Numeric {
                width,
                height: Some(height),
            } if height > 0 => {
                SizeParams::new().with("fit", format!("{width}{LIST_SEPARATOR}{height}"))
            }
            ResizeSpec::Numeric { width, .. } => SizeParams::new().with("w", width),
        }
    }
}

impl From<u32> for ResizeSpec {
    fn from(width: u32) -> Self {
        ResizeSpec::width(width)
    }
}

impl From<(u32, u32)> for ResizeSpec {
    fn from((width, height): (u32, u32)) -> Self {
        ResizeSpec::fit(width, height)
    }
}

impl From<SizeParams> for ResizeSpec {
    fn from(params: SizeParams) -> Self {
        ResizeSpec::Explicit(params)
    }
}
