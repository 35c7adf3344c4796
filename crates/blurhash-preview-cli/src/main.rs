use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use blurhash_preview::config::{
    DEFAULT_EXTENSION, DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_FILE, DEFAULT_TARGET_WIDTH,
};
use blurhash_preview::{batch, Components, Config};
use clap::Parser;
use log::{info, LevelFilter};

/// Exit status when the report was written but some images failed.
const EXIT_PARTIAL_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "blurhash-preview")]
#[command(about = "Write BlurHash previews of every JPEG in a directory to a text file")]
#[command(version)]
struct Cli {
    /// Directory to scan (not recursive); the report is written here too
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Report file name, relative to DIR
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Input file extension, matched case-insensitively
    #[arg(short, long, default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Preview width in pixels; height follows the aspect ratio
    #[arg(short, long, default_value_t = DEFAULT_TARGET_WIDTH)]
    width: u32,

    /// Horizontal BlurHash components (1-9)
    #[arg(short = 'x', long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=9))]
    components_x: u32,

    /// Vertical BlurHash components (1-9)
    #[arg(short = 'y', long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=9))]
    components_y: u32,

    /// Contrast factor applied when rendering previews
    #[arg(long, default_value_t = 1.0)]
    punch: f64,

    /// JPEG quality of the previews (1-100)
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Worker threads (defaults to one per CPU)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn config(&self) -> anyhow::Result<Config> {
        let components = Components::new(self.components_x, self.components_y)?;
        Ok(Config::for_dir(&self.dir)
            .with_output_file(&self.output)
            .with_extension(&self.extension)
            .with_components(components)
            .with_target_width(self.width)
            .with_punch(self.punch)
            .with_jpeg_quality(self.quality)
            .with_jobs(self.jobs))
    }
}

fn init_logger(level: LevelFilter) {
    let env = env_logger::Env::default().filter_or("BLURHASH_PREVIEW_LOG", level.as_str());
    env_logger::Builder::from_env(env)
        .format_target(false)
        .format_timestamp(None)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logger(cli.log_level());

    let config = cli.config()?;
    let summary = batch::run(&config)
        .with_context(|| format!("failed to process {}", config.working_dir().display()))?;

    if summary.is_clean() {
        return Ok(ExitCode::SUCCESS);
    }

    info!(
        "{} of {} images failed",
        summary.failures.len(),
        summary.discovered
    );
    Ok(ExitCode::from(EXIT_PARTIAL_FAILURE))
}
