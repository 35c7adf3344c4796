//! # blurhash-preview
//!
//! Turn a directory of JPEG photos into BlurHash placeholders and tiny
//! inline JPEG previews.
//!
//! Each image is decoded to RGBA, hashed with a 4 x 4 component
//! [BlurHash](https://blurha.sh/), and the token is decoded again into a
//! 32-pixel-wide preview that keeps the original aspect ratio. Previews are
//! written as `data:image/jpeg;base64,...` URIs, one line per file.
//!
//! ## Quick Start
//!
//! ```
//! use blurhash_preview::codec::{decode, encode, Components};
//! use blurhash_preview::preview::{render_default, target_height};
//!
//! let pixels = [128u8, 64, 32, 255].repeat(8 * 4);
//! let hash = encode(&pixels, 8, 4, Components::default()).unwrap();
//!
//! let rgba = decode(hash.as_str(), 32, 16, 1.0).unwrap();
//! assert_eq!(rgba.len(), 32 * 16 * 4);
//!
//! assert_eq!(target_height(8, 4, 32).unwrap(), 16);
//! let uri = render_default(&hash, 8, 4, 32).unwrap();
//! assert!(uri.starts_with("data:image/jpeg;base64,"));
//! ```
//!
//! Whole directories go through [`batch::run`]:
//!
//! ```no_run
//! use blurhash_preview::{batch, Config};
//!
//! let summary = batch::run(&Config::for_dir("photos")).unwrap();
//! println!("{} previews, {} failures", summary.rendered(), summary.failures.len());
//! ```

pub mod batch;
pub mod codec;
pub mod config;
pub mod error;
pub mod hash;
pub mod preview;
pub mod report;

pub use batch::{run, BatchSummary, FileFailure, FileOutcome};
pub use codec::{BlurHash, Components};
pub use config::Config;
pub use error::{BlurhashError, Error, Result};
pub use hash::{generate, GeneratedHash, ImageSample};
pub use preview::{render, PreviewOptions, DATA_URI_PREFIX};
pub use report::{Report, ReportLine};
