// ABOUTME: CLI argument definitions for the resize-image application
// ABOUTME: Defines the command-line interface structure using clap derive macros

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use resize_image_url::ResizeSpec;
use std::path::PathBuf;

use crate::completions::Shell;

#[derive(Parser, Debug)]
#[command(name = "resize-image")]
#[command(about = "Resize Photon, WordPress.com and Gravatar image URLs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output for debugging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Load configuration from this file only
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resize a single image URL
    Resize {
        /// Image URL to resize
        url: String,

        #[command(flatten)]
        size: SizeArgs,

        /// Fail instead of printing the URL unchanged when it cannot be resized
        #[arg(long)]
        strict: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resize image URLs read from stdin, one per line
    Batch {
        #[command(flatten)]
        size: SizeArgs,

        /// Read a JSON array instead of lines; non-string elements are echoed unchanged
        #[arg(long)]
        json_input: bool,
    },
    /// Show how an image URL is parsed and which service it matches
    Inspect {
        /// Image URL to inspect
        url: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SizeArgs {
    /// Target width in pixels
    #[arg(
        short,
        long,
        required_unless_present = "param",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub width: Option<u32>,

    /// Target height in pixels; with a width this requests a fit box
    #[arg(short = 'H', long, requires = "width", value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Explicit sizing parameter such as resize=300,200 (repeatable)
    #[arg(
        short,
        long,
        value_name = "KEY=VALUE",
        value_parser = parse_param,
        conflicts_with = "width"
    )]
    pub param: Vec<(String, String)>,

    /// Do not route unknown hosts through the Photon proxy
    #[arg(long)]
    pub no_safe: bool,

    /// Override the display scale factor
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=2))]
    pub scale: Option<u32>,
}

impl SizeArgs {
    pub fn resize_spec(&self) -> Result<ResizeSpec> {
        if !self.param.is_empty() {
            return Ok(ResizeSpec::Explicit(self.param.iter().cloned().collect()));
        }

        let width = self
            .width
            .ok_or_else(|| anyhow!("Either --width or --param is required"))?;
        Ok(ResizeSpec::Numeric {
            width,
            height: self.height,
        })
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter '{}'. Expected KEY=VALUE", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Invalid parameter '{}'. Key cannot be empty", raw));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
