//! codecinfo CLI: prints the grouped codec capability report.

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use codecinfo_media::{
    Aggregator, CodecReport, CodecSource, NullSource, ReportOptions, SourceTier, StaticSource,
};
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "codecinfo")]
#[command(about = "Show deduplicated media codec capabilities")]
#[command(version)]
struct Args {
    /// Only list codecs that handle at least one video/* type
    #[arg(long, env = "CODECINFO_VIDEO_ONLY")]
    video_only: bool,

    /// Hide encoders
    #[arg(long, env = "CODECINFO_DECODE_ONLY")]
    decode_only: bool,

    /// JSON dump of codec descriptors to read
    #[arg(short, long, env = "CODECINFO_INPUT")]
    input: Option<PathBuf>,

    /// Override the source tier recorded in the dump
    #[arg(long)]
    tier: Option<SourceTier>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn load_source(args: &Args) -> Result<Box<dyn CodecSource>> {
    let Some(path) = &args.input else {
        warn!("no --input given; no platform codec source is available");
        return Ok(Box::new(NullSource));
    };

    let mut source = StaticSource::from_path(path)
        .with_context(|| format!("failed to load codec dump {}", path.display()))?;
    if let Some(tier) = args.tier {
        source = source.with_tier(tier);
    }
    info!(
        "loaded {} descriptors from {} ({})",
        source.len(),
        path.display(),
        source.tier()
    );
    Ok(Box::new(source))
}

fn render(
    source: &dyn CodecSource,
    options: ReportOptions,
    format: OutputFormat,
    cancel: Arc<AtomicBool>,
) -> Result<String> {
    let aggregator = Aggregator::new(source).with_cancel_flag(cancel);
    match format {
        OutputFormat::Text => Ok(aggregator.report_text(options)),
        OutputFormat::Json => {
            let mut json = match aggregator.build(options) {
                Ok(report) => serde_json::to_string_pretty(&report)?,
                Err(e) => {
                    warn!("codec report failed: {}", e);
                    let line = CodecReport::error_line(&e);
                    serde_json::to_string(&json!({ "error": line.trim_end() }))?
                }
            };
            json.push('\n');
            Ok(json)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    codecinfo_common::init_tracing_with_default("warn");

    let args = Args::parse();
    let options = ReportOptions::default()
        .video_only(args.video_only)
        .decode_only(args.decode_only);
    let source = load_source(&args)?;
    let format = args.format;

    let cancel = Arc::new(AtomicBool::new(false));
    let build_cancel = Arc::clone(&cancel);
    let build =
        tokio::task::spawn_blocking(move || render(source.as_ref(), options, format, build_cancel));

    let output = tokio::select! {
        joined = build => joined.context("report build panicked")??,
        Ok(()) = tokio::signal::ctrl_c() => {
            cancel.store(true, Ordering::Relaxed);
            warn!("interrupted; discarding report");
            return Ok(());
        }
    };

    print!("{output}");
    Ok(())
}
