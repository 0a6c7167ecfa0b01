// ABOUTME: Centralized constants for image URL resizing
// ABOUTME: Contains reserved sizing parameters, proxy hosts, and environment variable names

/// Query parameters that encode requested image dimensions
pub mod params {
    /// Every query key treated as a sizing parameter. These are always
    /// recomputed, never carried over from the incoming URL.
    pub const SIZE_PARAMS: [&str; 5] = ["w", "h", "resize", "fit", "s"];

    /// Sizing parameters whose value is a comma-separated list of dimensions
    pub const LIST_PARAMS: [&str; 2] = ["resize", "fit"];

    /// Separator between dimensions in `fit` and `resize` values
    pub const LIST_SEPARATOR: char = ',';

    pub fn is_size_param(key: &str) -> bool {
        SIZE_PARAMS.contains(&key)
    }

    pub fn is_list_param(key: &str) -> bool {
        LIST_PARAMS.contains(&key)
    }
}

/// Photon proxy defaults
pub mod proxy {
    /// Domain whose numbered subdomains serve proxied images
    pub const PHOTON_DOMAIN: &str = "wp.com";

    /// Number of `i<n>` subdomains to spread proxied images across
    pub const PHOTON_SUBDOMAINS: u8 = 3;

    /// Query flag telling Photon to fetch the origin over HTTPS
    pub const SSL_PARAM: (&str, &str) = ("ssl", "1");
}

/// Environment variables read at runtime
pub mod env {
    /// Display pixel ratio used to derive the scale factor (e.g. `2` or `1.5`)
    pub const PIXEL_RATIO: &str = "RESIZE_IMAGE_PIXEL_RATIO";
}
