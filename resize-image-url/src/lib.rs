// ABOUTME: Image URL resizing for Photon, WordPress.com and Gravatar hosted images
// ABOUTME: Rewrites sizing query parameters, scaling them for high-density displays

pub mod constants;
pub mod error;
pub mod parsed_url;
pub mod query;
pub mod resizer;
pub mod safe_url;
pub mod scale;
pub mod service;
pub mod sizing;

pub use error::ResizeError;
pub use parsed_url::ParsedUrl;
pub use query::QueryMap;
pub use resizer::ImageUrlResizer;
pub use safe_url::{PhotonProxy, SafeUrlProvider};
pub use scale::{scale_factor, ScaleFactor};
pub use service::{detect_service, Service};
pub use sizing::{ResizeSpec, SizeParams};

use once_cell::sync::Lazy;
use std::borrow::Cow;

static DEFAULT_RESIZER: Lazy<ImageUrlResizer> = Lazy::new(ImageUrlResizer::new);

/// Resize `image_url` with the process-wide scale factor and the Photon proxy.
///
/// Returns the input unchanged when it is not an absolute http(s) URL.
///
/// ```
/// use resize_image_url::resize_image_url;
///
/// let url = resize_image_url("https://secure.gravatar.com/avatar/abc", 50);
/// assert!(url.starts_with("https://secure.gravatar.com/avatar/abc?s="));
///
/// assert_eq!(resize_image_url("/relative.png", 50), "/relative.png");
/// ```
pub fn resize_image_url<'a>(image_url: &'a str, size: impl Into<ResizeSpec>) -> Cow<'a, str> {
    DEFAULT_RESIZER.resize(image_url, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resizer_uses_process_scale() {
        assert_eq!(DEFAULT_RESIZER.scale_factor(), scale_factor());
    }

    #[test]
    fn test_resize_image_url_photon() {
        let expected = format!(
            "https://i0.wp.com/example.com/img.png?w={}",
            100 * scale_factor().multiplier()
        );
        assert_eq!(
            resize_image_url("https://i0.wp.com/example.com/img.png", 100),
            expected
        );
    }
}
