//! Batch processing command for multiple campaign text files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use kampanya_core::{CampaignEngine, Extraction, ExtractionHints};

use super::extract::{
    CSV_HEADER, ExtractionOptions, OutputFormat, csv_fields, format_extraction, load_config,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    #[command(flatten)]
    options: ExtractionOptions,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    extraction: Option<Extraction>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let engine = Arc::new(CampaignEngine::new(config));

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files",
            )?
            .progress_chars("=>-"),
    );

    let reference_date = args.options.reference_date();
    let hints = args.options.hints();
    debug!("Reference date: {}, workers: {}", reference_date, args.jobs.max(1));

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let engine = Arc::clone(&engine);
        let hints = hints.clone();

        tasks.spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let result = process_single_file(&path, &engine, reference_date, &hints);
            (index, path, result, file_start.elapsed().as_millis() as u64)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, path, result, processing_time_ms) = joined?;

        match result {
            Ok(extraction) => results.push((
                index,
                ProcessResult {
                    path,
                    extraction: Some(extraction),
                    error: None,
                    processing_time_ms,
                },
            )),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push((
                        index,
                        ProcessResult {
                            path,
                            extraction: None,
                            error: Some(error_msg),
                            processing_time_ms,
                        },
                    ));
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    tasks.abort_all();
                    progress.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        progress.inc(1);
    }

    progress.finish_with_message("Complete");

    results.sort_by_key(|(index, _)| *index);
    let results: Vec<ProcessResult> = results.into_iter().map(|(_, r)| r).collect();

    let successful: Vec<_> = results.iter().filter(|r| r.extraction.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let partial = successful
        .iter()
        .filter(|r| r.extraction.as_ref().is_some_and(|e| e.partial))
        .count();

    if let Some(output_dir) = &args.output_dir {
        let names = output_names(results.iter().map(|r| r.path.as_path()));
        for (result, output_name) in results.iter().zip(&names) {
            if let Some(extraction) = &result.extraction {
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_extraction(extraction, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful ({} partial), {} failed",
        style(successful.len()).green(),
        style(partial).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Output file stems, one per input. Inputs sharing a stem get a `-N` suffix
/// in input order so no output overwrites another.
fn output_names<'a>(paths: impl Iterator<Item = &'a Path>) -> Vec<String> {
    let stems: Vec<String> = paths
        .map(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("campaign")
                .to_string()
        })
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for stem in &stems {
        *counts.entry(stem.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    stems
        .iter()
        .map(|stem| {
            if counts[stem.as_str()] < 2 {
                return stem.clone();
            }
            let n = seen.entry(stem.as_str()).or_default();
            *n += 1;
            warn!("Output name '{}' is shared by several inputs, writing {}-{}", stem, stem, n);
            format!("{}-{}", stem, n)
        })
        .collect()
}

fn process_single_file(
    path: &Path,
    engine: &CampaignEngine,
    reference_date: NaiveDate,
    hints: &ExtractionHints,
) -> anyhow::Result<Extraction> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        anyhow::bail!("File contains no text");
    }

    Ok(engine.extract(&text, reference_date, hints))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(CSV_HEADER);
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut record = vec![filename];
        match &result.extraction {
            Some(extraction) => {
                record.push("success".to_string());
                record.extend(csv_fields(extraction));
            }
            None => {
                record.push("error".to_string());
                record.extend(CSV_HEADER.iter().map(|_| String::new()));
            }
        }
        record.push(result.processing_time_ms.to_string());
        record.push(result.error.clone().unwrap_or_default());

        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names_unique_stems_unchanged() {
        let paths = [Path::new("in/a.txt"), Path::new("in/b.txt")];
        assert_eq!(output_names(paths.into_iter()), vec!["a", "b"]);
    }

    #[test]
    fn test_output_names_disambiguate_shared_stems() {
        let paths = [
            Path::new("akbank/offer.txt"),
            Path::new("garanti/offer.txt"),
            Path::new("garanti/other.txt"),
            Path::new("qnb/offer.md"),
        ];
        assert_eq!(
            output_names(paths.into_iter()),
            vec!["offer-1", "offer-2", "other", "offer-3"]
        );
    }
}
