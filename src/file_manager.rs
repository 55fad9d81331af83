//! # File Management Module
//!
//! Questo modulo gestisce tutte le operazioni sui file e la discovery delle immagini.
//!
//! ## Responsabilità:
//! - Discovery **non ricorsiva** delle immagini in una directory
//! - Filtro case-insensitive sulle estensioni raster (jpg, jpeg, png)
//! - Esclusione dei file già generati da un run precedente
//! - Scrittura atomica dei file di output (temp file + rename)
//! - Utilità per calcoli dimensioni e percentuali
//!
//! ## Ordine di enumerazione:
//! I file vengono restituiti ordinati per nome, così due run sulla stessa
//! directory processano e loggano i file nello stesso ordine.
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = FileManager::find_images(dir, "optimized_", false)?;
//! for file in files {
//!     let size = FileManager::file_size(&file).await?;
//! }
//! ```

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Extensions accepted as raster images, compared case-insensitively
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Size in bytes of a file
    pub async fn file_size(path: &Path) -> std::io::Result<u64> {
        Ok(fs::metadata(path).await?.len())
    }

    /// Find the images directly inside `dir`, sorted by file name.
    ///
    /// Files whose name starts with `output_prefix` are left out unless
    /// `include_prefixed` is set.
    pub fn find_images(dir: &Path, output_prefix: &str, include_prefixed: bool) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !Self::is_image(path) {
                continue;
            }
            if !include_prefixed && Self::has_prefix(path, output_prefix) {
                continue;
            }
            files.push(path.to_path_buf());
        }

        Ok(files)
    }

    /// Check if a file is a supported raster image
    pub fn is_image(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
        } else {
            false
        }
    }

    /// Check if a file already holds JPEG data judging by its extension
    pub fn is_jpeg(path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy();
                ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg")
            })
            .unwrap_or(false)
    }

    /// Check if a file name starts with the output prefix
    pub fn has_prefix(path: &Path, prefix: &str) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().starts_with(prefix))
            .unwrap_or(false)
    }

    /// Write `bytes` to `path` through a temp file in the same directory.
    ///
    /// An existing file at `path` is replaced; a reader never sees a partial image.
    pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let dir = path.parent().unwrap_or(Path::new("."));
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Size in megabytes (1 MB = 1024 * 1024 bytes) with two decimals
    pub fn format_megabytes(size: u64) -> String {
        format!("{:.2}MB", size as f64 / 1024.0 / 1024.0)
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Percentage reduction `(1 - new/original) * 100`, rounded to one decimal.
    ///
    /// Negative when the output is bigger than the source.
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            let reduction = (1.0 - new_size as f64 / original_size as f64) * 100.0;
            (reduction * 10.0).round() / 10.0
        }
    }
}
