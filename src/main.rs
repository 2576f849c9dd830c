//! eqsnap - Clipboard-to-LaTeX equation OCR
//!
//! Sends a clipboard or file-provided image to the Mathpix OCR API and
//! copies (or prints) the recognized LaTeX. One linear flow per
//! invocation: credentials, image, one POST, present the result.

mod clipboard;
mod config;
mod history;
mod ocr;
mod output;
mod storage;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::ocr::{MathpixClient, OcrFormat};

/// eqsnap - equation image OCR
#[derive(Parser, Debug)]
#[command(name = "eqsnap")]
#[command(about = "Send a clipboard or file image to the Mathpix OCR API and copy back the LaTeX")]
struct Args {
    /// LaTeX flavor requested from the OCR service
    #[arg(long, value_enum, default_value = "latex_simplified")]
    format: OcrFormat,

    /// Path to an image file (default: grab the clipboard image)
    #[arg(short = 'i', long = "image")]
    image: Option<PathBuf>,

    /// Print the result to stdout instead of copying it to the clipboard
    #[arg(short = 'p', long = "print")]
    print: bool,

    /// Override the app_id credential
    #[arg(long)]
    app_id: Option<String>,

    /// Override the app_key credential
    #[arg(long)]
    app_key: Option<String>,

    /// Credentials file (default: credentials.json in the config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Warn once monthly API usage passes this count
    #[arg(long, default_value = "900")]
    usage_threshold: u32,

    /// Enable debug logging
    #[arg(short = 'D', long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Credentials first: without them no request can be authenticated
    let credentials_path = match &args.config {
        Some(path) => path.clone(),
        None => storage::credentials_path()?,
    };
    let credentials = config::resolve_credentials(
        args.app_id.as_deref(),
        args.app_key.as_deref(),
        &credentials_path,
    )?;

    // Resolve the image before touching the network
    let image_path = clipboard::resolve_image(args.image.as_deref())?;
    debug!("Using image {}", image_path.display());

    let usage = config::record_usage(&credentials_path, args.usage_threshold)?;
    if usage.rolled_over {
        history::clear(&storage::history_path()?)?;
    }
    if usage.count >= args.usage_threshold {
        warn!("{} API calls recorded this month", usage.count);
    }

    let client = MathpixClient::new(credentials)?;
    let response = client.recognize(&image_path, args.format)?;
    let text = response.extract(args.format)?.to_string();

    // History is best-effort; a failed write never loses the result
    if let Err(e) = history::append(&storage::history_path()?, &response) {
        warn!("Failed to record history: {e:#}");
    }

    output::present(&text, args.print)?;
    if !args.print {
        info!("Result copied to the clipboard");
    }

    Ok(())
}
