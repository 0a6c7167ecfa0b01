// ABOUTME: Command handlers wiring parsed CLI arguments and config to the resizer
// ABOUTME: Each handler writes to a caller-supplied writer so it can be exercised in tests

use anyhow::{anyhow, Context, Result};
use resize_image_url::{scale_factor, ImageUrlResizer, ParsedUrl, ScaleFactor};
use serde_json::Value;
use std::io::{BufRead, Read, Write};

use crate::cli::SizeArgs;
use crate::config::Config;
use crate::output::{JsonFormatter, OutputFormat, ResizeReport, TextFormatter, UrlReport};

/// Scale factor precedence: `--scale`, then config `pixel_ratio`, then detection
pub fn resolve_scale_factor(scale: Option<u32>, config: &Config) -> Result<ScaleFactor> {
    match scale {
        Some(value) => ScaleFactor::try_from(value).map_err(|e| anyhow!(e)),
        None => Ok(config.scale_factor().unwrap_or_else(scale_factor)),
    }
}

pub fn build_resizer(size: &SizeArgs, config: &Config) -> Result<ImageUrlResizer> {
    let factor = resolve_scale_factor(size.scale, config)?;
    log::debug!("Using {}x scale factor", factor.multiplier());

    Ok(ImageUrlResizer::builder()
        .scale_factor(factor)
        .safe_urls(Box::new(config.photon_proxy()))
        .build())
}

fn make_safe(size: &SizeArgs, config: &Config) -> bool {
    !size.no_safe && config.make_safe()
}

pub fn run_resize<W: Write>(
    url: &str,
    size: &SizeArgs,
    strict: bool,
    format: OutputFormat,
    config: &Config,
    writer: &mut W,
) -> Result<()> {
    let resizer = build_resizer(size, config)?;
    let spec = size.resize_spec()?;
    let make_safe = make_safe(size, config);

    let resized = if strict {
        match resizer.try_resize(url, spec, make_safe) {
            Ok(resized) => resized,
            Err(e) => {
                if let Some(help) = e.help_text() {
                    eprintln!("{}", help);
                }
                return Err(e.into());
            }
        }
    } else {
        resizer.resize_with(url, spec, make_safe).into_owned()
    };

    let report = ResizeReport::new(url, &resized);
    let output = match format {
        OutputFormat::Json => JsonFormatter::new(false).format_resize(&report)?,
        OutputFormat::Text => TextFormatter::new(false).format_resize(&report),
    };
    writeln!(writer, "{}", output)?;
    Ok(())
}

/// Resize one URL per line. Blank lines are skipped. Returns the number of URLs written.
pub fn run_batch_lines<R: BufRead, W: Write>(
    resizer: &ImageUrlResizer,
    size: &SizeArgs,
    make_safe: bool,
    reader: R,
    writer: &mut W,
) -> Result<usize> {
    let spec = size.resize_spec()?;
    let mut count = 0;

    for line in reader.lines() {
        let line = line.context("Failed to read URL from stdin")?;
        let url = line.trim();
        if url.is_empty() {
            continue;
        }
        writeln!(writer, "{}", resizer.resize_with(url, spec.clone(), make_safe))?;
        count += 1;
    }

    Ok(count)
}

/// Resize every string in a JSON array; other values are echoed unchanged
pub fn run_batch_json<R: Read, W: Write>(
    resizer: &ImageUrlResizer,
    size: &SizeArgs,
    make_safe: bool,
    reader: R,
    writer: &mut W,
) -> Result<usize> {
    let spec = size.resize_spec()?;
    let input: Value = serde_json::from_reader(reader).context("Failed to parse JSON input")?;

    let (output, count) = match input {
        Value::Array(items) => {
            let count = items.len();
            let resized = items
                .iter()
                .map(|item| resizer.resize_value(item, spec.clone(), make_safe))
                .collect();
            (Value::Array(resized), count)
        }
        other => (resizer.resize_value(&other, spec, make_safe), 1),
    };

    writeln!(writer, "{}", serde_json::to_string(&output)?)?;
    Ok(count)
}

pub fn run_batch<R: BufRead, W: Write>(
    size: &SizeArgs,
    json_input: bool,
    config: &Config,
    reader: R,
    writer: &mut W,
) -> Result<usize> {
    let resizer = build_resizer(size, config)?;
    let make_safe = make_safe(size, config);

    let count = if json_input {
        run_batch_json(&resizer, size, make_safe, reader, writer)?
    } else {
        run_batch_lines(&resizer, size, make_safe, reader, writer)?
    };
    log::debug!("Resized {} image URLs", count);
    Ok(count)
}

pub fn run_inspect<W: Write>(
    url: &str,
    format: OutputFormat,
    use_color: bool,
    config: &Config,
    writer: &mut W,
) -> Result<()> {
    let parsed = ParsedUrl::parse(url).map_err(|e| {
        if let Some(help) = e.help_text() {
            eprintln!("{}", help);
        }
        anyhow!(e)
    })?;

    let factor = resolve_scale_factor(None, config)?;
    let report = UrlReport::new(&parsed, factor);

    let output = match format {
        OutputFormat::Json => JsonFormatter::new(true).format_url_report(&report)?,
        OutputFormat::Text => TextFormatter::new(use_color).format_url_report(&report),
    };
    writeln!(writer, "{}", output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn size_args(width: u32) -> SizeArgs {
        SizeArgs {
            width: Some(width),
            height: None,
            param: Vec::new(),
            no_safe: false,
            scale: Some(1),
        }
    }

    fn photon_resizer() -> ImageUrlResizer {
        ImageUrlResizer::builder()
            .scale_factor(ScaleFactor::One)
            .build()
    }

    #[test]
    fn test_resolve_scale_factor_precedence() {
        let config = Config {
            pixel_ratio: Some(2.0),
            ..Default::default()
        };
        assert_eq!(
            resolve_scale_factor(Some(1), &config).unwrap(),
            ScaleFactor::One
        );
        assert_eq!(
            resolve_scale_factor(None, &config).unwrap(),
            ScaleFactor::Two
        );
        assert!(resolve_scale_factor(Some(3), &config).is_err());
    }

    #[test]
    fn test_run_resize_text() {
        let mut output = Vec::new();
        run_resize(
            "https://i0.wp.com/x.png",
            &size_args(100),
            false,
            OutputFormat::Text,
            &Config::default(),
            &mut output,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "https://i0.wp.com/x.png?w=100\n"
        );
    }

    #[test]
    fn test_run_resize_pass_through_and_strict() {
        let mut output = Vec::new();
        run_resize(
            "ftp://example.com/a.png",
            &size_args(100),
            false,
            OutputFormat::Json,
            &Config::default(),
            &mut output,
        )
        .unwrap();
        let value: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["changed"], false);
        assert_eq!(value["output"], "ftp://example.com/a.png");

        let mut output = Vec::new();
        let result = run_resize(
            "ftp://example.com/a.png",
            &size_args(100),
            true,
            OutputFormat::Text,
            &Config::default(),
            &mut output,
        );
        assert!(result.is_err());
        assert!(output.is_empty());
    }

    #[test]
    fn test_run_resize_respects_config_make_safe() {
        let config = Config {
            make_safe: Some(false),
            ..Default::default()
        };
        let mut output = Vec::new();
        run_resize(
            "https://example.com/a.png",
            &size_args(100),
            false,
            OutputFormat::Text,
            &config,
            &mut output,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "https://example.com/a.png?w=100\n"
        );
    }

    #[test]
    fn test_batch_lines_skips_blank_lines() {
        let input = "https://i0.wp.com/a.png\n\n  https://secure.gravatar.com/avatar/x  \nnot a url\n";
        let mut output = Vec::new();
        let count = run_batch_lines(
            &photon_resizer(),
            &size_args(40),
            true,
            Cursor::new(input),
            &mut output,
        )
        .unwrap();
        assert_eq!(count, 3);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "https://i0.wp.com/a.png?w=40\nhttps://secure.gravatar.com/avatar/x?s=40\nnot a url\n"
        );
    }

    #[test]
    fn test_batch_json_echoes_non_strings() {
        let input = r#"["https://i0.wp.com/a.png", null, 7, {"src": "x"}, "/local.png"]"#;
        let mut output = Vec::new();
        let count = run_batch_json(
            &photon_resizer(),
            &size_args(40),
            true,
            Cursor::new(input),
            &mut output,
        )
        .unwrap();
        assert_eq!(count, 5);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "[\"https://i0.wp.com/a.png?w=40\",null,7,{\"src\":\"x\"},\"/local.png\"]\n"
        );
    }

    #[test]
    fn test_batch_json_rejects_invalid_json() {
        let mut output = Vec::new();
        let result = run_batch_json(
            &photon_resizer(),
            &size_args(40),
            true,
            Cursor::new("[not json"),
            &mut output,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_run_inspect_json() {
        let mut output = Vec::new();
        run_inspect(
            "https://i0.wp.com/x.png?w=5",
            OutputFormat::Json,
            false,
            &Config {
                pixel_ratio: Some(1.0),
                ..Default::default()
            },
            &mut output,
        )
        .unwrap();
        let value: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["service"], "photon");
        assert_eq!(value["scale_factor"], 1);
    }

    #[test]
    fn test_run_inspect_rejects_relative_url() {
        let mut output = Vec::new();
        let result = run_inspect(
            "/x.png",
            OutputFormat::Text,
            false,
            &Config::default(),
            &mut output,
        );
        assert!(result.is_err());
    }
}
