// ABOUTME: Rewrites image URLs so the serving proxy returns a resized, density-scaled variant
// ABOUTME: Unknown hosts take one detour through the safe-URL provider before sizing is applied

use crate::constants::params::SIZE_PARAMS;
use crate::error::ResizeError;
use crate::parsed_url::ParsedUrl;
use crate::safe_url::{PhotonProxy, SafeUrlProvider};
use crate::scale::ScaleFactor;
use crate::service::detect_service;
use crate::sizing::ResizeSpec;
use serde_json::Value;
use std::borrow::Cow;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct ImageUrlResizer {
    #[builder(default = crate::scale::scale_factor())]
    scale_factor: ScaleFactor,

    #[builder(default = Box::new(PhotonProxy::default()) as Box<dyn SafeUrlProvider + Send + Sync>)]
    safe_urls: Box<dyn SafeUrlProvider + Send + Sync>,
}

impl Default for ImageUrlResizer {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ImageUrlResizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale_factor(&self) -> ScaleFactor {
        self.scale_factor
    }

    /// Resize `image_url`, routing unknown hosts through the safe-URL provider.
    ///
    /// Anything that cannot be resized is returned unchanged. This includes
    /// external URLs the proxy declines, such as ones carrying a query string.
    pub fn resize<'a>(&self, image_url: &'a str, size: impl Into<ResizeSpec>) -> Cow<'a, str> {
        self.resize_with(image_url, size, true)
    }

    /// Like [`resize`](Self::resize), with control over the safe-URL detour
    pub fn resize_with<'a>(
        &self,
        image_url: &'a str,
        size: impl Into<ResizeSpec>,
        make_safe: bool,
    ) -> Cow<'a, str> {
        match self.try_resize(image_url, size.into(), make_safe) {
            Ok(resized) => Cow::Owned(resized),
            Err(e) => {
                log::debug!("Leaving image URL unchanged: {}", e);
                Cow::Borrowed(image_url)
            }
        }
    }

    /// Resize a JSON value. Strings are resized; every other value is returned as is.
    pub fn resize_value(&self, value: &Value, size: impl Into<ResizeSpec>, make_safe: bool) -> Value {
        match value {
            Value::String(url) => {
                Value::String(self.resize_with(url, size, make_safe).into_owned())
            }
            other => other.clone(),
        }
    }

    /// Resize `image_url`, reporting why it could not be rewritten
    pub fn try_resize(
        &self,
        image_url: &str,
        size: ResizeSpec,
        make_safe: bool,
    ) -> Result<String, ResizeError> {
        let mut current = Cow::Borrowed(image_url);
        let mut size = size;
        let mut make_safe = make_safe;
        let mut proxied = false;

        loop {
            let mut parsed = match ParsedUrl::parse(&current) {
                Ok(parsed) => parsed,
                // The provider's answer is final, even when it is not resizable
                Err(e) if proxied => {
                    log::debug!("Safe URL {} is not resizable: {}", current, e);
                    return Ok(current.into_owned());
                }
                Err(e) => return Err(e),
            };

            parsed.query_mut().strip(&SIZE_PARAMS);

            let service = detect_service(parsed.hostname());
            log::trace!("{} matched service {:?}", parsed.hostname(), service);

            let params = size.normalize(service);

            if service.is_none() && make_safe {
                let safe = self
                    .safe_urls
                    .safe_url(image_url)
                    .ok_or_else(|| ResizeError::Unproxyable(image_url.to_string()))?;
                log::debug!("Routing {} through safe URL {}", image_url, safe);

                current = Cow::Owned(safe);
                size = ResizeSpec::Explicit(params);
                make_safe = false;
                proxied = true;
                continue;
            }

            params.apply(parsed.query_mut(), self.scale_factor);
            return Ok(parsed.to_string());
        }
    }
}
