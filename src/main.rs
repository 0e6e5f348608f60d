use anyhow::{Context, Result};
use clap::Parser;
use std::fs;

use pdf_squeeze::cli::Args;
use pdf_squeeze::{merge_then_reduce, ReduceOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    // Read input files
    let mut buffers = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        buffers.push(bytes);
    }

    log::info!("Merging {} documents", buffers.len());

    let settings = args.settings();
    let outcome = merge_then_reduce(buffers, &settings)
        .await
        .with_context(|| "Failed to merge and reduce documents")?;

    match &outcome {
        ReduceOutcome::Fit(_) => {}
        ReduceOutcome::BestEffort(bytes) => {
            log::warn!(
                "Result is {:.1} KB, above the {:.1} KB target",
                bytes.len() as f64 / 1024.0,
                settings.target_size_kb
            );
        }
        ReduceOutcome::Placeholder(_) => {
            log::warn!("Target size could not be approached; writing a placeholder document");
        }
    }

    // Write output
    let output_path = args.output_path();
    let bytes = outcome.into_bytes();
    fs::write(&output_path, &bytes)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    println!(
        "Successfully wrote {:.1} KB to {}",
        bytes.len() as f64 / 1024.0,
        output_path.display()
    );

    Ok(())
}
