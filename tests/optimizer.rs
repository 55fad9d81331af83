#![cfg(feature = "imaging")]

//! End-to-end runs of the optimizer with the `image` backend on temporary galleries.

use image::{GenericImageView, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use web_image_optimizer::imaging::RustBackend;
use web_image_optimizer::{Config, FileOutcome, ImageOptimizer, OutputNaming};

fn write_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 3 % 256) as u8, ((x + y) % 256) as u8])
    })
    .save(&path)
    .unwrap();
    path
}

fn config(directories: Vec<PathBuf>, max_width: u32) -> Config {
    Config {
        directories,
        max_width,
        show_progress: false,
        efficient_encoding: false,
        ..Config::default()
    }
}

fn optimizer(config: Config) -> ImageOptimizer {
    ImageOptimizer::with_backend(config, Some(Arc::new(RustBackend::new(None)))).unwrap()
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_narrow_images_are_reencoded_but_not_resized() {
    let gallery = TempDir::new().unwrap();
    write_image(gallery.path(), "narrow.jpg", 40, 30);
    write_image(gallery.path(), "exact.png", 64, 20);

    let report = optimizer(config(vec![gallery.path().to_path_buf()], 64)).run().await.unwrap();

    assert_eq!(report.stats.files_optimized, 2);
    assert_eq!(report.stats.files_resized, 0);
    for file in report.optimized() {
        assert!(!file.resized);
        assert_eq!(file.output_dimensions, file.source_dimensions);
        let decoded = image::open(&file.output).unwrap();
        assert_eq!(decoded.width(), file.source_dimensions.width);
    }
}

#[tokio::test]
async fn test_wide_images_shrink_to_max_width() {
    let gallery = TempDir::new().unwrap();
    write_image(gallery.path(), "wide.jpg", 128, 72);

    let report = optimizer(config(vec![gallery.path().to_path_buf()], 64)).run().await.unwrap();

    let file = report.optimized().next().unwrap();
    assert!(file.resized);
    assert_eq!(file.output, gallery.path().join("optimized_wide.jpg"));

    let decoded = image::open(&file.output).unwrap();
    assert_eq!(decoded.dimensions(), (64, 36));
}

#[tokio::test]
async fn test_png_output_keeps_extension_but_holds_jpeg() {
    let gallery = TempDir::new().unwrap();
    write_image(gallery.path(), "logo.png", 32, 32);

    optimizer(config(vec![gallery.path().to_path_buf()], 64)).run().await.unwrap();

    let bytes = std::fs::read(gallery.path().join("optimized_logo.png")).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
}

#[tokio::test]
async fn test_jpeg_extension_naming() {
    let gallery = TempDir::new().unwrap();
    write_image(gallery.path(), "logo.png", 32, 32);
    write_image(gallery.path(), "menu.png", 32, 32);
    write_image(gallery.path(), "menu.jpg", 32, 32);

    let mut config = config(vec![gallery.path().to_path_buf()], 64);
    config.naming = OutputNaming::JpegExtension;
    let report = optimizer(config).run().await.unwrap();

    assert!(gallery.path().join("optimized_logo.jpg").exists());
    assert!(!gallery.path().join("optimized_logo.png").exists());

    // menu.jpg claims optimized_menu.jpg first; menu.png must not overwrite it
    assert_eq!(report.stats.errors, 1);
    let failure = report.failures().next().unwrap();
    assert_eq!(failure.source.file_name().unwrap(), "menu.png");
}

#[tokio::test]
async fn test_second_run_overwrites_same_outputs() {
    let gallery = TempDir::new().unwrap();
    write_image(gallery.path(), "a.jpg", 80, 40);
    write_image(gallery.path(), "b.png", 20, 20);

    let optimizer = optimizer(config(vec![gallery.path().to_path_buf()], 64));
    let first = optimizer.run().await.unwrap();
    let after_first = listing(gallery.path());
    let second = optimizer.run().await.unwrap();
    let after_second = listing(gallery.path());

    assert_eq!(after_first, vec!["a.jpg", "b.png", "optimized_a.jpg", "optimized_b.png"]);
    assert_eq!(after_second, after_first);

    let outputs = |report: &web_image_optimizer::RunReport| -> Vec<PathBuf> {
        report.optimized().map(|file| file.output.clone()).collect()
    };
    assert_eq!(outputs(&first), outputs(&second));
    assert_eq!(second.stats.files_processed, 2);
}

#[tokio::test]
async fn test_reprocess_optimized_restores_original_behaviour() {
    let gallery = TempDir::new().unwrap();
    write_image(gallery.path(), "a.jpg", 30, 30);

    let mut config = config(vec![gallery.path().to_path_buf()], 64);
    optimizer(config.clone()).run().await.unwrap();

    config.reprocess_optimized = true;
    let report = optimizer(config).run().await.unwrap();

    assert_eq!(report.stats.files_processed, 2);
    assert!(gallery.path().join("optimized_optimized_a.jpg").exists());
}

#[tokio::test]
async fn test_missing_directory_is_skipped() {
    let root = TempDir::new().unwrap();
    let a = root.path().join("a");
    let missing = root.path().join("missing");
    let b = root.path().join("b");
    std::fs::create_dir(&a).unwrap();
    std::fs::create_dir(&b).unwrap();
    write_image(&a, "one.jpg", 16, 16);
    write_image(&b, "two.jpg", 16, 16);

    let report = optimizer(config(vec![a.clone(), missing.clone(), b.clone()], 64))
        .run()
        .await
        .unwrap();

    assert_eq!(report.missing_directories, vec![missing]);
    assert_eq!(report.directories_processed, vec![a.clone(), b.clone()]);
    assert!(a.join("optimized_one.jpg").exists());
    assert!(b.join("optimized_two.jpg").exists());
}

#[tokio::test]
async fn test_corrupt_file_does_not_stop_directory() {
    let gallery = TempDir::new().unwrap();
    std::fs::write(gallery.path().join("a_corrupt.jpg"), b"\xFF\xD8 definitely not a jpeg").unwrap();
    write_image(gallery.path(), "b_sentinel.jpg", 16, 16);

    let report = optimizer(config(vec![gallery.path().to_path_buf()], 64)).run().await.unwrap();

    assert_eq!(report.outcomes.len(), 2);
    match &report.outcomes[0] {
        FileOutcome::Failed(failure) => {
            assert!(failure.summary_line().contains("a_corrupt.jpg"));
        }
        other => panic!("expected a failure, got {:?}", other),
    }
    assert!(report.outcomes[1].is_success());
    assert!(gallery.path().join("optimized_b_sentinel.jpg").exists());
    assert!(!gallery.path().join("optimized_a_corrupt.jpg").exists());
}

#[tokio::test]
async fn test_reduction_matches_file_sizes() {
    let gallery = TempDir::new().unwrap();
    let source = write_image(gallery.path(), "photo.png", 48, 48);

    let report = optimizer(config(vec![gallery.path().to_path_buf()], 64)).run().await.unwrap();
    let file = report.optimized().next().unwrap();

    let original = std::fs::metadata(&source).unwrap().len();
    let new = std::fs::metadata(&file.output).unwrap().len();
    assert_eq!(file.original_size, original);
    assert_eq!(file.new_size, new);

    let expected = ((1.0 - new as f64 / original as f64) * 100.0 * 10.0).round() / 10.0;
    assert_eq!(file.reduction_percent, expected);
}

#[tokio::test]
async fn test_without_backend_nothing_is_written() {
    let gallery = TempDir::new().unwrap();
    write_image(gallery.path(), "a.jpg", 80, 40);
    let before = listing(gallery.path());

    let optimizer = ImageOptimizer::with_backend(config(vec![gallery.path().to_path_buf()], 64), None).unwrap();
    assert!(!optimizer.is_available());

    let report = optimizer.run().await.unwrap();

    assert!(!report.imaging_available);
    assert!(report.outcomes.is_empty());
    assert_eq!(listing(gallery.path()), before);
}

#[tokio::test]
async fn test_detected_backend_is_available() {
    let gallery = TempDir::new().unwrap();
    let optimizer = ImageOptimizer::new(config(vec![gallery.path().to_path_buf()], 64)).await.unwrap();
    assert!(optimizer.is_available());

    let report = optimizer.run().await.unwrap();
    assert!(report.imaging_available);
    assert!(report.outcomes.is_empty());
}
