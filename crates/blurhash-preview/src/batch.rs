//! Batch driver: every matching image in a directory to one report file.
//!
//! Files are listed non-recursively and kept in the order the filesystem
//! returns them; no sorting is applied, so the report order is
//! platform-dependent. A failing file is logged and skipped. Only listing
//! the directory or writing the report ends the run with an error.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hash;
use crate::preview::{self, PreviewOptions};
use crate::report::{Report, ReportLine};

/// A file that could not be turned into a report line.
#[derive(Debug)]
pub struct FileFailure {
    pub file_name: String,
    pub error: Error,
}

/// Result of running the pipeline on one file.
#[derive(Debug)]
pub enum FileOutcome {
    Rendered(ReportLine),
    Failed(FileFailure),
}

/// What a batch run did.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Number of matching input files.
    pub discovered: usize,
    /// Lines written to the report, in processing order.
    pub report: Report,
    /// Files skipped because of an error, in processing order.
    pub failures: Vec<FileFailure>,
    /// Where the report was written; `None` when no input matched.
    pub report_path: Option<PathBuf>,
}

impl BatchSummary {
    pub fn rendered(&self) -> usize {
        self.report.len()
    }

    /// True when every discovered file made it into the report.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.to_lowercase() == extension)
}

/// List regular files directly inside `dir` whose extension, lower-cased,
/// equals `extension`.
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let list_error = |source| Error::ListDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_error)? {
        let path = entry.map_err(list_error)?.path();
        if has_extension(&path, extension) && path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Hash and render one image into its report line.
pub fn process_file(path: &Path, config: &Config) -> Result<ReportLine> {
    let generated = hash::generate(path, config.components)?;
    let uri = preview::render(
        &generated.token,
        generated.width,
        generated.height,
        &PreviewOptions::from(config),
    )?;
    Ok(ReportLine::new(file_name(path), uri))
}

fn process_one(path: &Path, config: &Config) -> FileOutcome {
    let name = file_name(path);
    info!("Processing: {name}");
    match process_file(path, config) {
        Ok(line) => FileOutcome::Rendered(line),
        Err(error) => {
            error!("Error processing image: {name} {error}");
            FileOutcome::Failed(FileFailure {
                file_name: name,
                error,
            })
        }
    }
}

#[cfg(feature = "parallel")]
fn process_all(files: &[PathBuf], config: &Config) -> Result<Vec<FileOutcome>> {
    use rayon::prelude::*;

    // Indexed collect keeps enumeration order regardless of completion order.
    let work = || -> Vec<FileOutcome> {
        files
            .par_iter()
            .map(|path| process_one(path, config))
            .collect()
    };

    match config.jobs {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::Configuration(format!("failed to build worker pool: {e}")))?;
            debug!("processing {} files on {threads} threads", files.len());
            Ok(pool.install(work))
        }
        None => Ok(work()),
    }
}

#[cfg(not(feature = "parallel"))]
fn process_all(files: &[PathBuf], config: &Config) -> Result<Vec<FileOutcome>> {
    if config.jobs.is_some_and(|n| n > 1) {
        warn!("built without the `parallel` feature, processing sequentially");
    }
    Ok(files.iter().map(|path| process_one(path, config)).collect())
}

/// Process every matching file in `config.working_dir` and write the report.
///
/// Returns `Ok` with an empty summary, and writes nothing, when no file
/// matches.
pub fn run(config: &Config) -> Result<BatchSummary> {
    config.validate()?;

    let files = discover(config.working_dir(), &config.extension)?;
    if files.is_empty() {
        warn!(
            "No .{} files found in the current directory.",
            config.extension
        );
        return Ok(BatchSummary::default());
    }
    debug!(
        "found {} .{} files in {}",
        files.len(),
        config.extension,
        config.working_dir().display()
    );

    let mut summary = BatchSummary {
        discovered: files.len(),
        ..BatchSummary::default()
    };
    for outcome in process_all(&files, config)? {
        match outcome {
            FileOutcome::Rendered(line) => summary.report.push(line),
            FileOutcome::Failed(failure) => summary.failures.push(failure),
        }
    }

    let output = config.output_path();
    summary.report.write_to(&output)?;
    info!("{} file has been generated.", config.output_file.display());
    summary.report_path = Some(output);
    Ok(summary)
}
