// ABOUTME: Error types explaining why an image URL could not be resized
// ABOUTME: Callers of the infallible API never see these; they are logged and the input is returned

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResizeError {
    #[error("Invalid URL '{url}': {reason}")]
    Malformed { url: String, reason: String },

    #[error("Unsupported URL scheme '{scheme}': {url}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("URL has no hostname: {0}")]
    MissingHost(String),

    #[error("No safe proxy URL available for {0}")]
    Unproxyable(String),
}

impl ResizeError {
    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            ResizeError::Malformed { .. } => {
                Some("Only absolute URLs (e.g. https://example.com/image.png) can be resized")
            }
            ResizeError::UnsupportedScheme { .. } => Some("Use an http:// or https:// image URL"),
            ResizeError::Unproxyable(_) => Some(
                "External images with a query string or SVG images cannot be routed through Photon. Retry with --no-safe to resize in place",
            ),
            ResizeError::MissingHost(_) => None,
        }
    }

    /// The URL that was left unchanged
    pub fn url(&self) -> &str {
        match self {
            ResizeError::Malformed { url, .. } | ResizeError::UnsupportedScheme { url, .. } => url,
            ResizeError::MissingHost(url) | ResizeError::Unproxyable(url) => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ResizeError::Malformed {
                url: "/img.png".to_string(),
                reason: "relative URL without a base".to_string()
            }
            .to_string(),
            "Invalid URL '/img.png': relative URL without a base"
        );
        assert_eq!(
            ResizeError::UnsupportedScheme {
                url: "ftp://example.com/a.png".to_string(),
                scheme: "ftp".to_string()
            }
            .to_string(),
            "Unsupported URL scheme 'ftp': ftp://example.com/a.png"
        );
        assert_eq!(
            ResizeError::MissingHost("file:///tmp/a.png".to_string()).to_string(),
            "URL has no hostname: file:///tmp/a.png"
        );
        assert_eq!(
            ResizeError::Unproxyable("https://example.com/a.svg".to_string()).to_string(),
            "No safe proxy URL available for https://example.com/a.svg"
        );
    }

    #[test]
    fn test_help_text() {
        assert!(ResizeError::Unproxyable("x".to_string())
            .help_text()
            .unwrap()
            .contains("--no-safe"));
        assert_eq!(ResizeError::MissingHost("x".to_string()).help_text(), None);
    }

    #[test]
    fn test_url_accessor() {
        let err = ResizeError::UnsupportedScheme {
            url: "data:image/png;base64,AAAA".to_string(),
            scheme: "data".to_string(),
        };
        assert_eq!(err.url(), "data:image/png;base64,AAAA");
    }
}
