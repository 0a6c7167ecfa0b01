// ABOUTME: Detection of trusted image services from a URL hostname
// ABOUTME: Static pattern table mapping Photon and Gravatar to hostname rules

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// A trusted image service able to resize images through query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    /// WordPress.com media and the Photon proxy (`i0.wp.com`, `s1.wp.com`, ...)
    Photon,
    Gravatar,
}

impl Service {
    pub fn id(&self) -> &'static str {
        match self {
            Service::Photon => "photon",
            Service::Gravatar => "gravatar",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Hostname patterns, checked in order
const SERVICE_HOSTNAME_PATTERNS: &[(Service, &str)] = &[
    (Service::Photon, r"(^[is]\d\.wp\.com|(^|\.)wordpress\.com)$"),
    (Service::Gravatar, r"(^|\.)gravatar\.com$"),
];

static COMPILED_PATTERNS: Lazy<Vec<(Service, Regex)>> = Lazy::new(|| {
    SERVICE_HOSTNAME_PATTERNS
        .iter()
        .filter_map(|(service, pattern)| match Regex::new(pattern) {
            Ok(regex) => Some((*service, regex)),
            Err(e) => {
                log::error!("Invalid hostname pattern for {}: {}", service, e);
                None
            }
        })
        .collect()
});

/// Find the first service whose hostname pattern matches
pub fn detect_service(hostname: &str) -> Option<Service> {
    COMPILED_PATTERNS
        .iter()
        .find(|(_, regex)| regex.is_match(hostname))
        .map(|(service, _)| *service)
}
