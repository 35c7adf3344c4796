//! Hash one image and print its BlurHash and preview URI.
//!
//! Run with: cargo run --example demo -- path/to/photo.jpg

use std::path::PathBuf;

use blurhash_preview::preview::{render, target_height, PreviewOptions};
use blurhash_preview::{generate, Components};

fn main() {
    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: demo <image>");
        std::process::exit(2);
    };

    let generated = generate(&path, Components::default()).expect("Failed to hash image");
    println!("Image:      {}", path.display());
    println!("Size:       {}x{}", generated.width, generated.height);
    println!(
        "BlurHash:   {} ({} components)",
        generated.token,
        generated.token.components()
    );

    let options = PreviewOptions::default();
    let height = target_height(generated.width, generated.height, options.target_width)
        .expect("Invalid dimensions");
    let uri = render(&generated.token, generated.width, generated.height, &options)
        .expect("Failed to render preview");
    println!("Preview:    {}x{}, {} bytes", options.target_width, height, uri.len());
    println!("{uri}");
}
