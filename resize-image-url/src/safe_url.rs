// ABOUTME: Routing of untrusted image URLs through the Photon proxy
// ABOUTME: Trusted hosts are promoted to HTTPS; external images are rewritten onto i<n>.wp.com

use crate::constants::proxy;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Source of "safe" URLs for images on hosts that cannot be resized directly
pub trait SafeUrlProvider {
    /// Return a proxied URL for `url`, or `None` if it cannot be made safe
    fn safe_url(&self, url: &str) -> Option<String>;
}

impl<F> SafeUrlProvider for F
where
    F: Fn(&str) -> Option<String>,
{
    fn safe_url(&self, url: &str) -> Option<String> {
        self(url)
    }
}

/// Relative paths and inline image data never leave the page
static EXEMPT_URL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(/[^/]|data:image/[^;]+;)").ok());

/// Hosts already served from trusted infrastructure
static TRUSTED_HOST: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^([-a-zA-Z0-9_]+\.)*(gravatar\.com|wordpress\.com|wp\.com|a8c\.com)$").ok()
});

fn is_match(pattern: &Lazy<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|regex| regex.is_match(text))
}

/// Photon-backed [`SafeUrlProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotonProxy {
    domain: String,
    subdomains: u8,
}

impl Default for PhotonProxy {
    fn default() -> Self {
        Self {
            domain: proxy::PHOTON_DOMAIN.to_string(),
            subdomains: proxy::PHOTON_SUBDOMAINS,
        }
    }
}

impl PhotonProxy {
    pub fn new(domain: impl Into<String>, subdomains: u8) -> Self {
        Self {
            domain: domain.into(),
            subdomains: subdomains.max(1),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn subdomains(&self) -> u8 {
        self.subdomains
    }

    /// Same image always maps to the same subdomain so caches stay warm
    fn subdomain_for(&self, url: &str) -> u8 {
        let hash = url
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
        (hash % u32::from(self.subdomains)) as u8
    }
}

impl SafeUrlProvider for PhotonProxy {
    fn safe_url(&self, url: &str) -> Option<String> {
        if is_match(&EXEMPT_URL, url) {
            return Some(url.to_string());
        }

        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?;

        if is_match(&TRUSTED_HOST, host) {
            return Some(match url.strip_prefix("http:") {
                Some(rest) => format!("https:{rest}"),
                None => url.to_string(),
            });
        }

        // Photon drops query strings on external images
        if parsed.query().is_some() {
            log::debug!("Not proxying {}: external URL has a query string", url);
            return None;
        }

        if parsed.path().to_ascii_lowercase().ends_with(".svg") {
            log::debug!("Not proxying {}: SVG images are unsupported", url);
            return None;
        }

        let origin = match parsed.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let mut safe = format!(
            "https://i{}.{}/{}{}",
            self.subdomain_for(url),
            self.domain,
            origin,
            parsed.path()
        );
        if parsed.scheme() == "https" {
            let (key, value) = proxy::SSL_PARAM;
            safe.push_str(&format!("?{key}={value}"));
        }

        Some(safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exempt_urls_unchanged() {
        let proxy = PhotonProxy::default();
        assert_eq!(
            proxy.safe_url("/wp-content/img.png"),
            Some("/wp-content/img.png".to_string())
        );
        assert_eq!(
            proxy.safe_url("data:image/png;base64,AAAA"),
            Some("data:image/png;base64,AAAA".to_string())
        );
    }

    #[test]
    fn test_trusted_hosts_promoted_to_https() {
        let proxy = PhotonProxy::default();
        assert_eq!(
            proxy.safe_url("http://example.files.wordpress.com/a.png?w=10"),
            Some("https://example.files.wordpress.com/a.png?w=10".to_string())
        );
        assert_eq!(
            proxy.safe_url("https://secure.gravatar.com/avatar/abc"),
            Some("https://secure.gravatar.com/avatar/abc".to_string())
        );
    }

    #[test]
    fn test_external_url_routed_through_photon() {
        let proxy = PhotonProxy::new("wp.com", 1);
        assert_eq!(
            proxy.safe_url("http://example.com/images/cat.jpg"),
            Some("https://i0.wp.com/example.com/images/cat.jpg".to_string())
        );
        assert_eq!(
            proxy.safe_url("https://example.com/images/cat.jpg"),
            Some("https://i0.wp.com/example.com/images/cat.jpg?ssl=1".to_string())
        );
        assert_eq!(
            proxy.safe_url("http://example.com:8080/cat.jpg"),
            Some("https://i0.wp.com/example.com:8080/cat.jpg".to_string())
        );
    }

    #[test]
    fn test_subdomain_is_stable_and_bounded() {
        let proxy = PhotonProxy::default();
        let url = "http://example.com/images/cat.jpg";
        let first = proxy.safe_url(url).unwrap();
        assert_eq!(proxy.safe_url(url).unwrap(), first);
        assert!(
            ["i0.wp.com", "i1.wp.com", "i2.wp.com"]
                .iter()
                .any(|host| first.starts_with(&format!("https://{host}/"))),
            "unexpected proxy host in {first}"
        );
    }

    #[test]
    fn test_unproxyable_urls() {
        let proxy = PhotonProxy::default();
        assert_eq!(proxy.safe_url("https://example.com/a.png?v=2"), None);
        assert_eq!(proxy.safe_url("https://example.com/logo.SVG"), None);
        assert_eq!(proxy.safe_url("not a url"), None);
    }

    #[test]
    fn test_zero_subdomains_clamped() {
        let proxy = PhotonProxy::new("photon.example", 0);
        assert_eq!(proxy.subdomains(), 1);
        assert_eq!(
            proxy.safe_url("http://example.com/a.png"),
            Some("https://i0.photon.example/example.com/a.png".to_string())
        );
    }

    #[test]
    fn test_closure_provider() {
        let provider = |url: &str| Some(format!("https://i0.wp.com/{}", &url[8..]));
        assert_eq!(
            provider.safe_url("https://example.com/img.png"),
            Some("https://i0.wp.com/example.com/img.png".to_string())
        );
    }
}
