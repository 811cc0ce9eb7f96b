// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Passform — exact-size file converter.
//
// Entry point. Initialises logging, loads configuration, wires optional
// capabilities into the router, and runs one conversion.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use passform_core::error::Result;
use passform_core::human_errors::humanize_error;
use passform_core::{ConverterConfig, MAX_TARGET_KB, MIN_TARGET_KB, OutputTarget};
use passform_document::ConversionRouter;
use tracing::info;

/// Convert an image or PDF to an exact file size.
#[derive(Debug, Parser)]
#[command(name = "passform", version, about)]
struct Cli {
    /// Image (jpg, jpeg, png, webp, bmp, tiff) or PDF to convert.
    input: PathBuf,

    /// Output type: jpg, jpeg, png, webp, bmp, tiff, or pdf.
    #[arg(short = 't', long = "to")]
    to: String,

    /// Target size in kilobytes (1 KB = 1024 bytes).
    #[arg(
        short = 's',
        long,
        value_parser = clap::value_parser!(u32).range(MIN_TARGET_KB as i64..=MAX_TARGET_KB as i64)
    )]
    target_kb: u32,

    /// Where to write the result. Defaults to `output.<type>`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Declared MIME type of the input; the file extension is used otherwise.
    #[arg(long)]
    mime: Option<String>,

    /// JSON configuration file.
    #[arg(long, env = "PASSFORM_CONFIG")]
    config: Option<PathBuf>,

    /// Directory containing the pdfium library (overrides the config file).
    #[arg(long, env = "PDFIUM_LIB_DIR")]
    pdfium_lib: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            info!(path = %output.display(), "Passform finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Conversion failed");
            eprintln!("{}", humanize_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf> {
    let mut config = match &cli.config {
        Some(path) => ConverterConfig::from_json_file(path)?,
        None => ConverterConfig::default(),
    };
    if let Some(dir) = &cli.pdfium_lib {
        config.pdfium_library_path = Some(dir.clone());
    }

    let target: OutputTarget = cli.to.parse()?;
    let router = build_router(config);

    let data = std::fs::read(&cli.input)?;
    let file_name = cli.input.file_name().and_then(|name| name.to_str());
    let conversion =
        router.convert_tagged(&data, cli.mime.as_deref(), file_name, &cli.to, cli.target_kb)?;

    if let Some(report) = &conversion.report {
        info!(
            strategy = ?report.strategy,
            quality = ?report.quality,
            width = report.width,
            height = report.height,
            encoded_len = report.encoded_len,
            within_budget = report.within_budget,
            "Fit report"
        );
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.to));
    std::fs::write(&output, &conversion.blob.bytes)?;
    info!(
        path = %output.display(),
        len = conversion.blob.len(),
        mime = target.mime_type(),
        "Wrote output"
    );
    Ok(output)
}

/// Download name used when `--output` is absent.
fn default_output_path(tag: &str) -> PathBuf {
    PathBuf::from(format!("output.{}", tag.trim().to_ascii_lowercase()))
}

#[cfg(feature = "pdfium")]
fn build_router(config: ConverterConfig) -> ConversionRouter {
    use passform_document::PdfiumRasterizer;

    let library_dir: Option<&Path> = config.pdfium_library_path.as_deref();
    match PdfiumRasterizer::bind(library_dir) {
        Ok(rasterizer) => ConversionRouter::new(config).with_rasterizer(Box::new(rasterizer)),
        Err(err) => {
            tracing::warn!(error = %err, "PDF → image conversion disabled");
            ConversionRouter::new(config)
        }
    }
}

#[cfg(not(feature = "pdfium"))]
fn build_router(config: ConverterConfig) -> ConversionRouter {
    if let Some(dir) = config.pdfium_library_path.as_deref() {
        warn_pdfium_ignored(dir);
    }
    ConversionRouter::new(config)
}

#[cfg(not(feature = "pdfium"))]
fn warn_pdfium_ignored(dir: &Path) {
    tracing::warn!(
        path = %dir.display(),
        "pdfium library path set, but this build lacks the \"pdfium\" feature"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn target_kb_range_is_enforced() {
        assert!(Cli::try_parse_from(["passform", "a.png", "--to", "jpg", "-s", "9"]).is_err());
        assert!(Cli::try_parse_from(["passform", "a.png", "--to", "jpg", "-s", "5001"]).is_err());
        let cli = Cli::try_parse_from(["passform", "a.png", "--to", "jpg", "-s", "100"]).unwrap();
        assert_eq!(cli.target_kb, 100);
    }

    #[test]
    fn output_tag_maps_to_download_mime() {
        let target: OutputTarget = "JPG".parse().unwrap();
        assert_eq!(target.mime_type(), "image/jpeg");
        assert_eq!(default_output_path("JPG"), PathBuf::from("output.jpg"));
    }

    #[test]
    fn default_output_follows_type() {
        assert_eq!(default_output_path("PDF"), PathBuf::from("output.pdf"));
        assert_eq!(default_output_path("jpeg"), PathBuf::from("output.jpeg"));
    }
}
