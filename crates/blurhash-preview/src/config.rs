//! Settings for a batch run.

use std::path::{Path, PathBuf};

use crate::codec::Components;
use crate::error::{Error, Result};

/// Default width of rendered previews, in pixels.
pub const DEFAULT_TARGET_WIDTH: u32 = 32;

/// Default JPEG quality for rendered previews.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Default report file name, created inside the working directory.
pub const DEFAULT_OUTPUT_FILE: &str = "output.txt";

/// Default input extension (compared lower-cased, without the dot).
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Settings for one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory scanned for inputs and receiving the report.
    pub working_dir: PathBuf,

    /// Extension selecting input files, e.g. `jpg`. `jpeg` is a different
    /// extension and is not matched by `jpg`.
    pub extension: String,

    /// Report file name, relative to `working_dir`.
    pub output_file: PathBuf,

    /// BlurHash grid used when hashing inputs.
    pub components: Components,

    /// Width of each rendered preview; height follows the aspect ratio.
    pub target_width: u32,

    /// Contrast factor applied when rendering previews.
    pub punch: f64,

    /// JPEG quality (1..=100) of rendered previews.
    pub jpeg_quality: u8,

    /// Worker threads for the `parallel` feature. `None` uses rayon's default.
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            components: Components::default(),
            target_width: DEFAULT_TARGET_WIDTH,
            punch: 1.0,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            jobs: None,
        }
    }
}

impl Config {
    /// Default configuration rooted at `dir`.
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn with_output_file(mut self, name: impl Into<PathBuf>) -> Self {
        self.output_file = name.into();
        self
    }

    pub fn with_extension(mut self, ext: impl AsRef<str>) -> Self {
        self.extension = ext.as_ref().trim_start_matches('.').to_ascii_lowercase();
        self
    }

    pub fn with_components(mut self, components: Components) -> Self {
        self.components = components;
        self
    }

    pub fn with_target_width(mut self, width: u32) -> Self {
        self.target_width = width;
        self
    }

    pub fn with_punch(mut self, punch: f64) -> Self {
        self.punch = punch;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Full path of the report file.
    pub fn output_path(&self) -> PathBuf {
        self.working_dir.join(&self.output_file)
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.extension.is_empty() {
            return Err(Error::Configuration("extension must not be empty".into()));
        }
        if self.target_width == 0 {
            return Err(Error::Configuration("target width must be > 0".into()));
        }
        if !(self.punch.is_finite() && self.punch > 0.0) {
            return Err(Error::Configuration(format!(
                "punch must be a positive number, got {}",
                self.punch
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::Configuration(format!(
                "JPEG quality must be 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.jobs == Some(0) {
            return Err(Error::Configuration("jobs must be > 0".into()));
        }
        if self.output_file.as_os_str().is_empty() {
            return Err(Error::Configuration("output file name must not be empty".into()));
        }
        Ok(())
    }
}
