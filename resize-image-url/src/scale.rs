// ABOUTME: Display-density scale factor applied to requested image dimensions
// ABOUTME: Detected once per process from the reported pixel ratio, defaulting to 1x

use crate::constants::{env as env_vars, params::LIST_SEPARATOR};
use once_cell::sync::Lazy;
use std::env;

/// Multiplier for pixel dimensions on high-density displays. Capped at 2x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleFactor {
    #[default]
    One,
    Two,
}

static SCALE_FACTOR: Lazy<ScaleFactor> = Lazy::new(ScaleFactor::detect);

/// Process-wide scale factor, detected on first use
pub fn scale_factor() -> ScaleFactor {
    *SCALE_FACTOR
}

impl ScaleFactor {
    /// Any ratio above 1 is treated as a 2x display
    pub fn from_pixel_ratio(ratio: f64) -> Self {
        if ratio > 1.0 {
            ScaleFactor::Two
        } else {
            ScaleFactor::One
        }
    }

    /// Read the pixel ratio from the environment. Falls back to 1x when the
    /// variable is missing or unparsable.
    pub fn detect() -> Self {
        let Ok(raw) = env::var(env_vars::PIXEL_RATIO) else {
            return ScaleFactor::One;
        };

        match raw.trim().parse::<f64>() {
            Ok(ratio) if ratio.is_finite() => {
                let factor = Self::from_pixel_ratio(ratio);
                log::debug!("Detected pixel ratio {} -> {}x", ratio, factor.multiplier());
                factor
            }
            _ => {
                log::warn!(
                    "Ignoring invalid {} value '{}', using 1x",
                    env_vars::PIXEL_RATIO,
                    raw
                );
                ScaleFactor::One
            }
        }
    }

    pub fn multiplier(&self) -> u32 {
        match self {
            ScaleFactor::One => 1,
            ScaleFactor::Two => 2,
        }
    }

    /// Scale a single numeric value. Non-numeric input is returned unchanged.
    pub fn scale(&self, value: &str) -> String {
        match value.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => {
                format!("{}", number * f64::from(self.multiplier()))
            }
            _ => value.to_string(),
        }
    }

    /// Scale every component of a comma-separated dimension list
    pub fn scale_list(&self, value: &str) -> String {
        value
            .split(LIST_SEPARATOR)
            .map(|component| self.scale(component))
            .collect::<Vec<_>>()
            .join(&LIST_SEPARATOR.to_string())
    }
}

impl TryFrom<u32> for ScaleFactor {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ScaleFactor::One),
            2 => Ok(ScaleFactor::Two),
            other => Err(format!("Unsupported scale factor {other}; expected 1 or 2")),
        }
    }
}
