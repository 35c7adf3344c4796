use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use blurhash_preview::codec::{components, decode, encode};
use blurhash_preview::preview::{render_default, target_height};
use blurhash_preview::{batch, generate, BlurHash, Components, Config, Error, DATA_URI_PREFIX};
use image::{ImageFormat, Rgb, RgbImage};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Write a gradient JPEG of the given size.
fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            96,
        ])
    });
    img.save_with_format(path, ImageFormat::Jpeg)
        .expect("write fixture jpeg");
}

/// Solid RGBA buffer.
fn solid(width: usize, height: usize, rgb: [u8; 3]) -> Vec<u8> {
    [rgb[0], rgb[1], rgb[2], 255].repeat(width * height)
}

fn average_rgb(rgba: &[u8]) -> [f64; 3] {
    let n = (rgba.len() / 4) as f64;
    let mut sum = [0.0; 3];
    for px in rgba.chunks(4) {
        for c in 0..3 {
            sum[c] += px[c] as f64;
        }
    }
    sum.map(|s| s / n)
}

/// Split `output.txt` into (file name, decoded preview) pairs.
fn read_report(path: &Path) -> Vec<(String, image::DynamicImage)> {
    fs::read_to_string(path)
        .expect("report exists")
        .lines()
        .map(|line| {
            let (name, uri) = line.split_once(" - ").expect("`name - uri` line");
            let payload = uri.strip_prefix(DATA_URI_PREFIX).expect("jpeg data uri");
            let bytes = STANDARD.decode(payload).expect("valid base64");
            let img = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)
                .expect("preview is a jpeg");
            (name.to_string(), img)
        })
        .collect()
}

// ===========================================================================
// Codec
// ===========================================================================

#[test]
fn codec_roundtrip_keeps_dominant_color() {
    for (rgb, channel) in [([255, 0, 0], 0), ([0, 255, 0], 1), ([0, 0, 255], 2)] {
        let img = solid(16, 16, rgb);
        let hash = encode(&img, 16, 16, Components::default()).unwrap();
        let avg = average_rgb(&decode(hash.as_str(), 16, 16, 1.0).unwrap());
        for c in 0..3 {
            if c == channel {
                assert!(avg[c] > 200.0, "{rgb:?}: channel {c} = {}", avg[c]);
            } else {
                assert!(avg[c] < 80.0, "{rgb:?}: channel {c} = {}", avg[c]);
            }
        }
    }
}

#[test]
fn codec_is_deterministic() {
    let img: Vec<u8> = (0..32 * 32)
        .flat_map(|i| [(i % 32 * 8) as u8, (i / 32 * 8) as u8, 40, 255])
        .collect();
    let a = encode(&img, 32, 32, Components::default()).unwrap();
    let b = encode(&img, 32, 32, Components::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn codec_accepts_every_grid() {
    let img = solid(12, 9, [30, 60, 90]);
    for x in 1..=9 {
        for y in 1..=9 {
            let grid = Components::new(x, y).unwrap();
            let hash = encode(&img, 12, 9, grid).unwrap();
            assert_eq!(components(hash.as_str()).unwrap(), grid);
            assert_eq!(decode(hash.as_str(), 4, 3, 1.0).unwrap().len(), 4 * 3 * 4);
        }
    }
}

#[test]
fn known_reference_token_decodes() {
    let hash: BlurHash = "LEHV6nWB2yk8pyo0adR*.7kCMdnj".parse().unwrap();
    let pixels = decode(hash.as_str(), 4, 3, 1.0).unwrap();
    // Top-left, centre-ish and bottom-right pixels from the reference decoder.
    assert_eq!(pixels[..4], [135, 164, 177, 255]);
    assert_eq!(pixels[20..24], [148, 148, 154, 255]);
    assert_eq!(pixels[44..], [148, 140, 134, 255]);
}

#[test]
fn small_fixture_encodes_to_reference_token() {
    let mut img = Vec::new();
    for y in 0..3u8 {
        for x in 0..4u8 {
            img.extend_from_slice(&[250 - 60 * x, 90 * y + 20, 30 * (x + y) + 5, 255]);
        }
    }
    let hash = encode(&img, 4, 3, Components::new(4, 3).unwrap()).unwrap();
    assert_eq!(hash.as_str(), "L~KS@6}S]6=x:q+_wwwMd[erfReo");
}

// ===========================================================================
// Hash generator and preview renderer
// ===========================================================================

#[test]
fn generate_reports_true_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("landscape.jpg");
    write_jpeg(&path, 160, 90);

    let generated = generate(&path, Components::default()).unwrap();
    assert_eq!((generated.width, generated.height), (160, 90));
    assert!(!generated.token.as_str().is_empty());
}

#[test]
fn preview_is_32_wide_with_source_aspect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("landscape.jpg");
    write_jpeg(&path, 160, 90);

    let generated = generate(&path, Components::default()).unwrap();
    let uri = render_default(&generated.token, generated.width, generated.height, 32).unwrap();
    let payload = uri.strip_prefix(DATA_URI_PREFIX).unwrap();
    let img = image::load_from_memory(&STANDARD.decode(payload).unwrap()).unwrap();
    assert_eq!((img.width(), img.height()), (32, 18));
    assert_eq!(target_height(1600, 900, 32).unwrap(), 18);
}

// ===========================================================================
// Batch
// ===========================================================================

#[test]
fn batch_selects_jpg_case_insensitively() {
    let dir = tempfile::tempdir().unwrap();
    write_jpeg(&dir.path().join("a.jpg"), 40, 30);
    write_jpeg(&dir.path().join("b.JPG"), 30, 40);
    write_jpeg(&dir.path().join("c.jpeg"), 20, 20);
    fs::write(dir.path().join("d.png"), b"not read").unwrap();

    let summary = batch::run(&Config::for_dir(dir.path())).unwrap();
    assert_eq!(summary.discovered, 2);
    assert!(summary.is_clean());

    let mut report = read_report(&dir.path().join("output.txt"));
    report.sort_by(|a, b| a.0.cmp(&b.0));
    let shapes: Vec<(&str, u32, u32)> = report
        .iter()
        .map(|(name, img)| (name.as_str(), img.width(), img.height()))
        .collect();
    // 32 / (40 / 30) = 24, 32 / (30 / 40) = 42.67
    assert_eq!(shapes, [("a.jpg", 32, 24), ("b.JPG", 32, 43)]);
}

#[test]
fn batch_skips_corrupt_file_and_completes() {
    let dir = tempfile::tempdir().unwrap();
    write_jpeg(&dir.path().join("good.jpg"), 64, 64);
    fs::write(dir.path().join("bad.jpg"), b"\xff\xd8\xff truncated").unwrap();

    let summary = batch::run(&Config::for_dir(dir.path())).unwrap();
    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.rendered(), 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].file_name, "bad.jpg");
    assert!(matches!(summary.failures[0].error, Error::Decode { .. }));

    let report = read_report(&dir.path().join("output.txt"));
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].0, "good.jpg");
}

#[test]
fn batch_without_inputs_creates_no_report() {
    let dir = tempfile::tempdir().unwrap();
    write_jpeg(&dir.path().join("only.jpeg"), 8, 8);

    let summary = batch::run(&Config::for_dir(dir.path())).unwrap();
    assert_eq!(summary.discovered, 0);
    assert!(summary.report_path.is_none());
    assert!(!dir.path().join("output.txt").exists());
}

#[test]
fn batch_rerun_overwrites_report() {
    let dir = tempfile::tempdir().unwrap();
    write_jpeg(&dir.path().join("a.jpg"), 20, 10);
    write_jpeg(&dir.path().join("b.jpg"), 10, 20);
    let config = Config::for_dir(dir.path());

    batch::run(&config).unwrap();
    let first = fs::read_to_string(dir.path().join("output.txt")).unwrap();

    fs::remove_file(dir.path().join("b.jpg")).unwrap();
    batch::run(&config).unwrap();
    let second = fs::read_to_string(dir.path().join("output.txt")).unwrap();

    assert_eq!(first.lines().count(), 2);
    assert_eq!(second.lines().count(), 1);
    assert!(second.starts_with("a.jpg - "));
    assert!(first.contains(second.trim_end()));
}

#[test]
fn batch_report_follows_discovery_order() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..6 {
        write_jpeg(&dir.path().join(format!("img{i}.jpg")), 10 + i, 10);
    }
    let config = Config::for_dir(dir.path()).with_jobs(Some(3));
    let expected: Vec<String> = batch::discover(dir.path(), "jpg")
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    let summary = batch::run(&config).unwrap();
    let names: Vec<&str> = summary
        .report
        .lines()
        .iter()
        .map(|l| l.file_name.as_str())
        .collect();
    assert_eq!(names, expected);
}

#[test]
fn batch_honors_custom_output_and_width() {
    let dir = tempfile::tempdir().unwrap();
    write_jpeg(&dir.path().join("pic.jpg"), 100, 50);
    let config = Config::for_dir(dir.path())
        .with_output_file("previews.txt")
        .with_target_width(16)
        .with_components(Components::new(3, 2).unwrap());

    let summary = batch::run(&config).unwrap();
    assert_eq!(summary.report_path, Some(dir.path().join("previews.txt")));
    assert!(!dir.path().join("output.txt").exists());

    let report = read_report(&dir.path().join("previews.txt"));
    assert_eq!((report[0].1.width(), report[0].1.height()), (16, 8));
}

#[test]
fn batch_handles_panorama_wider_than_decode_limit() {
    let dir = tempfile::tempdir().unwrap();
    write_jpeg(&dir.path().join("pano.jpg"), 10_240, 16);

    let summary = batch::run(&Config::for_dir(dir.path())).unwrap();
    assert_eq!(summary.discovered, 1);
    assert_eq!(summary.rendered(), 1);
    assert!(summary.failures.is_empty());

    let report = read_report(&dir.path().join("output.txt"));
    assert_eq!(report[0].0, "pano.jpg");
    // 32 / 640 rounds to 0 and is clamped to one row.
    assert_eq!((report[0].1.width(), report[0].1.height()), (32, 1));
}

#[test]
fn batch_unwritable_report_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_jpeg(&dir.path().join("a.jpg"), 8, 8);
    let config = Config::for_dir(dir.path()).with_output_file("missing/output.txt");

    let err = batch::run(&config).unwrap_err();
    assert!(matches!(err, Error::ReportWrite { .. }));
    assert!(err.is_fatal());
}
