//! Batch command implementation
//!
//! Reads one job per JSONL line and renders them in parallel against a
//! single template. Jobs may name their own font file; every font is loaded
//! once through a shared [`FontDatabase`].

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shahada::{fontdb::FontDatabase, traits::FontRef, CertificateFields, CertificateRenderer};

use super::{load_resources, Resources};
use crate::cli::BatchArgs;
use crate::error::{CliError, Result};

/// One line of a JSONL job file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchJob {
    #[serde(flatten)]
    pub fields: CertificateFields,
    /// Font file path (the command's `--font` if omitted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
    /// Output file name (relative to the output directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Parse the non-blank lines of a job file
///
/// Returns `(job number, parsed job)` pairs; job numbers count non-blank
/// lines from 1 so they match the `{}` in the file name pattern.
pub fn parse_jobs(reader: impl BufRead) -> Result<Vec<(usize, serde_json::Result<BatchJob>)>> {
    let mut jobs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        jobs.push((jobs.len() + 1, serde_json::from_str(&line)));
    }
    Ok(jobs)
}

/// Where a job's certificate goes
pub fn output_path(output_dir: &Path, pattern: &str, number: usize, job: &BatchJob) -> PathBuf {
    match &job.output {
        Some(name) => output_dir.join(name),
        None => output_dir.join(pattern.replace("{}", &number.to_string())),
    }
}

/// The font a job renders with
pub fn job_font(
    fonts: &FontDatabase,
    default: &Arc<dyn FontRef>,
    job: &BatchJob,
    face_index: u32,
) -> Result<Arc<dyn FontRef>> {
    match &job.font {
        Some(path) => Ok(fonts.load_font_index(path, face_index)?),
        None => Ok(default.clone()),
    }
}

pub fn run(args: &BatchArgs) -> Result<()> {
    if !args.quiet {
        eprintln!("shahada batch v{}", env!("CARGO_PKG_VERSION"));
    }

    let reader: Box<dyn BufRead> = match &args.jobs {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => {
            if !args.quiet {
                eprintln!("Reading jobs from stdin...");
            }
            Box::new(BufReader::new(io::stdin()))
        },
    };
    let jobs = parse_jobs(reader)?;

    let fonts = FontDatabase::new();
    let resources = load_resources(&args.resources, &fonts)?;
    fs::create_dir_all(&args.output_dir)?;
    let renderer = CertificateRenderer::builder().build();

    let failed = jobs
        .par_iter()
        .filter(|(number, job)| match job {
            Ok(job) => {
                let path = output_path(&args.output_dir, &args.pattern, *number, job);
                let rendered = job_font(&fonts, &resources.font, job, args.resources.face_index)
                    .and_then(|font| render_job(&renderer, &resources, font, job, &path));
                match rendered {
                    Ok(()) => {
                        if args.verbose {
                            eprintln!("Job {}: wrote {}", number, path.display());
                        }
                        false
                    },
                    Err(e) => {
                        log::error!("job {number}: {e}");
                        eprintln!("Error processing job {number}: {e}");
                        true
                    },
                }
            },
            Err(e) => {
                eprintln!("Error parsing job {number}: {e}");
                true
            },
        })
        .count();

    let total = jobs.len();
    log::debug!("batch used {} font files", fonts.font_count());
    if !args.quiet {
        eprintln!("Batch processing complete:");
        eprintln!("  Total jobs: {}", total);
        eprintln!("  Successful: {}", total - failed);
        eprintln!("  Failed: {}", failed);
    }

    if failed > 0 {
        Err(CliError::BatchFailed { failed, total })
    } else {
        Ok(())
    }
}

fn render_job(
    renderer: &CertificateRenderer,
    resources: &Resources,
    font: Arc<dyn FontRef>,
    job: &BatchJob,
    path: &Path,
) -> Result<()> {
    let bytes = renderer.render(&resources.template, &job.fields, &resources.layout, font)?;
    fs::write(path, bytes)?;
    Ok(())
}
