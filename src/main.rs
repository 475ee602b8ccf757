//! # rowpack CLI
//!
//! Command-line interface for the rowpack library.

use std::fs;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use rowpack::cli::Args;
use rowpack::config::{CsvOptions, JsonOptions};
use rowpack::format::{ExportFormat, WriteMode};
use rowpack::record::records_from_value;
use rowpack::stream::records_from_vec;
use rowpack::{ExportError, Exporter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ExportError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    let output_path = adjust_output_extension(&args.output, args.format);
    let format: ExportFormat = args.format.into();
    let mode = if args.append {
        WriteMode::Append
    } else {
        WriteMode::Write
    };

    // Print header
    println!("📦 rowpack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    println!("💾 Output:  {}", output_path);
    println!("📄 Format:  {}", format);
    println!("✏️  Mode:    {}", mode);
    if args.streaming {
        println!("🌊 Batches: {}", args.batch_size);
    }
    println!();

    // Step 1: Load records
    println!("⏳ Reading {}...", args.input);
    let read_start = Instant::now();
    let content = fs::read_to_string(&args.input)
        .map_err(|e| ExportError::file_write(&args.input, e))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| ExportError::json_formatting(format!("input file {}", args.input), e))?;
    let records = records_from_value(value)?;
    let count = records.len();
    println!(
        "   Found {} records ({:.2}s)",
        count,
        read_start.elapsed().as_secs_f64()
    );

    // Step 2: Build the exporter
    let exporter = Exporter::new(&output_path)
        .with_format(format)
        .with_mode(mode)
        .with_batch_size(args.batch_size)
        .with_csv_options(
            CsvOptions::new()
                .with_delimiter(args.delimiter)
                .with_quote(args.quote)
                .with_bom(args.bom)
                .with_flatten(args.flatten),
        )
        .with_json_options(
            JsonOptions::new()
                .with_pretty(!args.no_pretty)
                .with_indent(args.indent)
                .with_bom(args.bom),
        );

    // Step 3: Write output
    println!("💾 Writing {}...", format);
    let write_start = Instant::now();
    let written = if args.streaming {
        exporter
            .on_progress(|current, _| println!("   {} records written...", current))
            .from_stream(records_from_vec(records))
            .await?
    } else if args.append {
        exporter.append(records).await?
    } else {
        exporter.write(records).await?
    };
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Output saved to {}", output_path);

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Records:     {}", written);
    println!(
        "   Total time:  {:.2}s",
        total_start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Adjusts output file extension based on format if using default output.
fn adjust_output_extension(output: &str, format: rowpack::cli::OutputFormat) -> String {
    if output != "export.csv" {
        return output.to_string();
    }

    format!("export.{}", format.extension())
}
