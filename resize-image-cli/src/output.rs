// ABOUTME: This module handles output formatting for the resize CLI
// ABOUTME: It provides plain text (optionally colored) and JSON renderings of results

use anyhow::{anyhow, Result};
use owo_colors::OwoColorize;
use resize_image_url::{detect_service, ParsedUrl, ScaleFactor, Service};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unsupported format: {}. Supported formats: text, json", s)),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ResizeReport<'a> {
    pub input: &'a str,
    pub output: &'a str,
    pub changed: bool,
}

impl<'a> ResizeReport<'a> {
    pub fn new(input: &'a str, output: &'a str) -> Self {
        Self {
            input,
            output,
            changed: input != output,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct QueryPair {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct UrlReport {
    pub scheme: String,
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub path: String,
    pub query: Vec<QueryPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
    pub service: Option<Service>,
    pub scale_factor: u32,
}

impl UrlReport {
    pub fn new(parsed: &ParsedUrl, scale_factor: ScaleFactor) -> Self {
        Self {
            scheme: parsed.scheme().to_string(),
            host: parsed.hostname().to_string(),
            port: parsed.port(),
            path: parsed.path().to_string(),
            query: parsed
                .query()
                .iter()
                .map(|(key, value)| QueryPair {
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            fragment: parsed.fragment().map(str::to_string),
            service: detect_service(parsed.hostname()),
            scale_factor: scale_factor.multiplier(),
        }
    }
}

pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn label(&self, name: &str) -> String {
        let padded = format!("{:<9}", format!("{}:", name));
        if self.use_color {
            padded.dimmed().to_string()
        } else {
            padded
        }
    }

    fn format_service(&self, service: Option<Service>) -> String {
        match (service, self.use_color) {
            (Some(service), true) => service.to_string().green().to_string(),
            (Some(service), false) => service.to_string(),
            (None, true) => "none (untrusted host)".yellow().to_string(),
            (None, false) => "none (untrusted host)".to_string(),
        }
    }

    pub fn format_resize(&self, report: &ResizeReport) -> String {
        report.output.to_string()
    }

    pub fn format_url_report(&self, report: &UrlReport) -> String {
        let mut lines = vec![
            format!("{}{}", self.label("scheme"), report.scheme),
            format!("{}{}", self.label("host"), report.host),
        ];

        if let Some(port) = report.port {
            lines.push(format!("{}{}", self.label("port"), port));
        }

        lines.push(format!("{}{}", self.label("path"), report.path));

        if report.query.is_empty() {
            lines.push(format!("{}-", self.label("query")));
        } else {
            for (i, pair) in report.query.iter().enumerate() {
                let label = if i == 0 {
                    self.label("query")
                } else {
                    " ".repeat(9)
                };
                lines.push(format!("{}{}={}", label, pair.key, pair.value));
            }
        }

        if let Some(ref fragment) = report.fragment {
            lines.push(format!("{}{}", self.label("fragment"), fragment));
        }

        lines.push(format!(
            "{}{}",
            self.label("service"),
            self.format_service(report.service)
        ));
        lines.push(format!("{}{}x", self.label("scale"), report.scale_factor));

        lines.join("\n")
    }
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }

    pub fn format_resize(&self, report: &ResizeReport) -> Result<String> {
        self.to_json(report)
    }

    pub fn format_url_report(&self, report: &UrlReport) -> Result<String> {
        self.to_json(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(url: &str, factor: ScaleFactor) -> UrlReport {
        UrlReport::new(&ParsedUrl::parse(url).unwrap(), factor)
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_resize_report_changed() {
        assert!(ResizeReport::new("a", "b").changed);
        assert!(!ResizeReport::new("a", "a").changed);
    }

    #[test]
    fn test_text_url_report() {
        let formatter = TextFormatter::new(false);
        let result = formatter.format_url_report(&report(
            "https://i0.wp.com/example.com/img.png?w=100&ssl=1#top",
            ScaleFactor::Two,
        ));
        insta::assert_snapshot!(result, @r"
        scheme:  https
        host:    i0.wp.com
        path:    /example.com/img.png
        query:   w=100
                 ssl=1
        fragment:top
        service: photon
        scale:   2x
        ");
    }

    #[test]
    fn test_text_url_report_untrusted_host() {
        let formatter = TextFormatter::new(false);
        let result = formatter.format_url_report(&report(
            "http://cdn.example.org:8080/a.jpg",
            ScaleFactor::One,
        ));
        insta::assert_snapshot!(result, @r"
        scheme:  http
        host:    cdn.example.org
        port:    8080
        path:    /a.jpg
        query:   -
        service: none (untrusted host)
        scale:   1x
        ");
    }

    #[test]
    fn test_text_colored_output_contains_escapes() {
        let formatter = TextFormatter::new(true);
        let result =
            formatter.format_url_report(&report("https://gravatar.com/avatar/x", ScaleFactor::One));
        assert!(result.contains("\u{1b}["));
        assert!(result.contains("gravatar"));
    }

    #[test]
    fn test_json_resize_report() {
        let formatter = JsonFormatter::new(false);
        let result = formatter
            .format_resize(&ResizeReport::new(
                "https://i0.wp.com/x.png",
                "https://i0.wp.com/x.png?w=100",
            ))
            .unwrap();
        assert_eq!(
            result,
            r#"{"input":"https://i0.wp.com/x.png","output":"https://i0.wp.com/x.png?w=100","changed":true}"#
        );
    }

    #[test]
    fn test_json_url_report() {
        let formatter = JsonFormatter::new(false);
        let result = formatter
            .format_url_report(&report(
                "https://secure.gravatar.com/avatar/abc?s=20",
                ScaleFactor::Two,
            ))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(value["host"], "secure.gravatar.com");
        assert_eq!(value["service"], "gravatar");
        assert_eq!(value["scale_factor"], 2);
        assert_eq!(value["query"][0]["key"], "s");
        assert_eq!(value["query"][0]["value"], "20");
        assert!(value.get("port").is_none());
    }
}
