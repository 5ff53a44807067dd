use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use trialsheet::{DirectorySink, ExportConfig, ExportError, ExporterBuilder, ViewTree};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(version, about = "Export a clinical-trial view to a single-page PDF with clickable links")]
struct Args {
    /// Display-list view to capture (JSON)
    view: PathBuf,

    /// Trial identifier used to name the document, e.g. NCT06189391
    identifier: String,

    /// Directory the document is saved to
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Export configuration (JSON, camelCase keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Outline link regions and also save the composited page as PNG
    #[arg(long)]
    debug_overlay: bool,

    /// Override the settle delay, in milliseconds
    #[arg(long)]
    settle_ms: Option<u64>,
}

async fn run(args: Args) -> Result<(), ExportError> {
    let config = match &args.config {
        Some(path) => ExportConfig::from_file(path)?,
        None => ExportConfig::default(),
    };

    let view = ViewTree::from_file(&args.view)?;
    log::info!("Loaded view from {}", args.view.display());

    let mut builder = ExporterBuilder::new()
        .with_config(config)
        .with_sink(Arc::new(DirectorySink::new(&args.out)));
    if args.debug_overlay {
        builder = builder.with_debug_overlay(true);
    }
    if let Some(ms) = args.settle_ms {
        builder = builder.with_settle_delay(Duration::from_millis(ms));
    }
    let exporter = builder.build()?;

    let document = exporter.export(Arc::new(view), &args.identifier).await?;
    println!("{}", document.location);
    if let Some(debug_image) = &document.debug_image {
        println!("{}", args.out.join(debug_image).display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
