//! # bililinks CLI
//!
//! Command-line interface for the bililinks library.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser;

use bililinks::BililinksError;
use bililinks::cli::Args;
use bililinks::output::aggregate_table;
use bililinks::process::{ProcessOptions, process_export_dir};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), BililinksError> {
    let total_start = Instant::now();
    let args = Args::parse();

    println!("📦 bililinks v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    println!("💾 Output:  {}", args.output);
    if let Some(ref excel) = args.excel {
        println!("📊 Excel:   {}", excel);
    }
    if let Some(ref aggregate) = args.aggregate {
        println!("🗂️  Aggregated: {}", aggregate);
    }
    if args.fetch {
        println!("🌐 Mode:    Fetching page metadata per link");
    }
    println!();

    let mut opts = ProcessOptions::new(&args.input, &args.output);
    if args.fetch {
        opts = opts.with_fetch();
    }

    let report = process_export_dir(&opts)?;

    // Post-processing is best-effort: a failure here never invalidates the
    // CSV table that was just written.
    if let Some(ref excel) = args.excel {
        match convert_excel(&args.output, excel) {
            Ok(()) => println!("📊 Excel written to {}", excel),
            Err(e) => eprintln!("⚠️  Excel conversion failed: {}", e),
        }
    }

    if let Some(ref aggregate) = args.aggregate {
        match aggregate_table(Path::new(&args.output), Path::new(aggregate)) {
            Ok(count) => println!("🗂️  {} aggregated rows written to {}", count, aggregate),
            Err(e) => eprintln!("⚠️  Aggregation failed: {}", e),
        }
    }

    let total_time = total_start.elapsed();

    println!();
    println!("✅ Done! Table saved to {}", args.output);
    println!();
    println!("📊 Summary:");
    println!("   Links found:       {}", report.rows_written);
    println!("   Chunks processed:  {}", report.chunks_processed);
    if report.chunks_skipped > 0 {
        println!("   Chunks skipped:    {}", report.chunks_skipped);
    }
    println!("   Total time:        {:.2}s", total_time.as_secs_f64());

    Ok(())
}

#[cfg(feature = "xlsx")]
fn convert_excel(csv_path: &str, xlsx_path: &str) -> Result<(), BililinksError> {
    bililinks::output::xlsx::convert_csv(Path::new(csv_path), Path::new(xlsx_path))
}

#[cfg(not(feature = "xlsx"))]
fn convert_excel(_csv_path: &str, _xlsx_path: &str) -> Result<(), BililinksError> {
    Err(BililinksError::FeatureDisabled {
        output: "spreadsheet",
        feature: "xlsx",
    })
}
