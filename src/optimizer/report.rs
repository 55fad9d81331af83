//! # Run Report Module
//!
//! Esito di ogni file e riepilogo del run. L'output su console resta il
//! canale per l'utente; `RunReport` serve ai test e a chi incorpora la libreria.

use crate::{file_manager::FileManager, imaging::Dimensions, progress::OptimizationStats};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// A source image that produced an output file
#[derive(Debug, Clone)]
pub struct OptimizedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub original_size: u64,
    pub new_size: u64,
    /// `(1 - new/original) * 100` rounded to one decimal; negative when the output grew
    pub reduction_percent: f64,
    pub source_dimensions: Dimensions,
    pub output_dimensions: Dimensions,
    pub resized: bool,
}

impl OptimizedFile {
    /// Console line for this file
    pub fn summary_line(&self) -> String {
        let name = file_name(&self.source);
        if self.resized {
            format!(
                "  ✓ {}: {} → {} ({:.1}% smaller)",
                name,
                FileManager::format_megabytes(self.original_size),
                FileManager::format_megabytes(self.new_size),
                self.reduction_percent
            )
        } else {
            format!("  ✓ {}: Compressed ({:.1}% smaller)", name, self.reduction_percent)
        }
    }
}

/// A source image that could not be processed
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub source: PathBuf,
    pub message: String,
}

impl FileFailure {
    pub fn summary_line(&self) -> String {
        format!("  ✗ Error processing {}: {}", file_name(&self.source), self.message)
    }
}

/// Result of one file
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Optimized(OptimizedFile),
    Failed(FileFailure),
}

impl FileOutcome {
    pub fn failed(source: PathBuf, error: &dyn std::fmt::Display) -> Self {
        FileOutcome::Failed(FileFailure {
            source,
            message: error.to_string(),
        })
    }

    pub fn source(&self) -> &Path {
        match self {
            FileOutcome::Optimized(file) => &file.source,
            FileOutcome::Failed(failure) => &failure.source,
        }
    }

    pub fn file_name(&self) -> String {
        file_name(self.source())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Optimized(_))
    }

    /// Emit the console line for this outcome
    pub fn log(&self) {
        match self {
            FileOutcome::Optimized(file) => info!("{}", file.summary_line()),
            FileOutcome::Failed(failure) => error!("{}", failure.summary_line()),
        }
    }
}

/// Everything a run did, in processing order
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// False when no imaging backend was available and nothing was touched
    pub imaging_available: bool,
    pub directories_processed: Vec<PathBuf>,
    pub missing_directories: Vec<PathBuf>,
    pub outcomes: Vec<FileOutcome>,
    pub stats: OptimizationStats,
}

impl RunReport {
    pub fn new(imaging_available: bool) -> Self {
        Self {
            imaging_available,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        match &outcome {
            FileOutcome::Optimized(file) => {
                self.stats.add_optimized(file.original_size, file.new_size, file.resized)
            }
            FileOutcome::Failed(_) => self.stats.add_error(),
        }
        self.outcomes.push(outcome);
    }

    pub fn optimized(&self) -> impl Iterator<Item = &OptimizedFile> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Optimized(file) => Some(file),
            FileOutcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileFailure> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Failed(failure) => Some(failure),
            FileOutcome::Optimized(_) => None,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap_or_default().to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimized(name: &str, original_size: u64, new_size: u64, resized: bool) -> OptimizedFile {
        OptimizedFile {
            source: PathBuf::from("gallery").join(name),
            output: PathBuf::from("gallery").join(format!("optimized_{}", name)),
            original_size,
            new_size,
            reduction_percent: FileManager::calculate_reduction(original_size, new_size),
            source_dimensions: Dimensions::new(3840, 2160),
            output_dimensions: Dimensions::new(1920, 1080),
            resized,
        }
    }

    #[test]
    fn test_resized_line_shows_both_sizes() {
        let file = optimized("terrace.jpg", 2_464_153, 838_861, true);
        assert_eq!(file.summary_line(), "  ✓ terrace.jpg: 2.35MB → 0.80MB (66.0% smaller)");
    }

    #[test]
    fn test_compressed_line_shows_reduction_only() {
        let file = optimized("bar.png", 1000, 877, false);
        assert_eq!(file.summary_line(), "  ✓ bar.png: Compressed (12.3% smaller)");
    }

    #[test]
    fn test_compressed_line_with_growth() {
        let file = optimized("tiny.jpg", 1000, 1250, false);
        assert_eq!(file.summary_line(), "  ✓ tiny.jpg: Compressed (-25.0% smaller)");
    }

    #[test]
    fn test_failure_line_names_file() {
        let outcome = FileOutcome::failed(PathBuf::from("food/broken.jpg"), &"unexpected EOF");
        assert!(!outcome.is_success());
        assert_eq!(outcome.file_name(), "broken.jpg");
        if let FileOutcome::Failed(failure) = outcome {
            assert_eq!(failure.summary_line(), "  ✗ Error processing broken.jpg: unexpected EOF");
        }
    }

    #[test]
    fn test_record_updates_stats() {
        let mut report = RunReport::new(true);
        report.record(FileOutcome::Optimized(optimized("a.jpg", 2000, 1000, true)));
        report.record(FileOutcome::failed(PathBuf::from("b.jpg"), &"bad"));

        assert_eq!(report.stats.files_processed, 2);
        assert_eq!(report.stats.files_resized, 1);
        assert_eq!(report.stats.errors, 1);
        assert_eq!(report.optimized().count(), 1);
        assert_eq!(report.failures().count(), 1);
    }
}
