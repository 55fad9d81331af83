//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di ottimizzazione.
//!
//! ## Componenti principali:
//! - `ProgressManager`: Progress bar per directory con `indicatif`
//! - `OptimizationStats`: Statistiche cumulative del run
//!
//! ## Statistiche tracciate:
//! - **files_processed**: Totale file elaborati (successi + errori)
//! - **files_optimized**: File per cui è stato scritto un output
//! - **files_resized**: Output ridimensionati perché oltre `max_width`
//! - **errors**: File falliti
//! - **total_original_size** / **total_output_size**: Byte prima e dopo
//!
//! La riduzione complessiva può essere negativa: ricomprimere un JPEG già
//! compresso non garantisce un file più piccolo.

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for one directory
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager; a hidden one draws nothing
    pub fn new(total_files: u64, visible: bool) -> Self {
        if !visible {
            return Self {
                bar: ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::hidden()),
            };
        }

        let bar = ProgressBar::new(total_files);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Run `f` with the bar hidden so log lines are not torn
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    /// Remove the bar once the directory is done
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

/// Statistics tracker for optimization results
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OptimizationStats {
    pub files_processed: usize,
    pub files_optimized: usize,
    pub files_resized: usize,
    pub errors: usize,
    pub total_original_size: u64,
    pub total_output_size: u64,
}

impl OptimizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_optimized(&mut self, original_size: u64, new_size: u64, resized: bool) {
        self.files_processed += 1;
        self.files_optimized += 1;
        if resized {
            self.files_resized += 1;
        }
        self.total_original_size += original_size;
        self.total_output_size += new_size;
    }

    pub fn add_error(&mut self) {
        self.files_processed += 1;
        self.errors += 1;
    }

    /// Signed byte difference between sources and outputs
    pub fn bytes_saved(&self) -> i64 {
        self.total_original_size as i64 - self.total_output_size as i64
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.total_original_size, self.total_output_size)
    }

    pub fn format_summary(&self) -> String {
        let saved = self.bytes_saved();
        let saved = if saved >= 0 {
            FileManager::format_size(saved as u64)
        } else {
            format!("-{}", FileManager::format_size(saved.unsigned_abs()))
        };

        format!(
            "Processed: {} files | Optimized: {} | Resized: {} | Errors: {} | Total saved: {} ({:.1}%)",
            self.files_processed,
            self.files_optimized,
            self.files_resized,
            self.errors,
            saved,
            self.overall_reduction_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_accumulate() {
        let mut stats = OptimizationStats::new();
        stats.add_optimized(4096, 1024, true);
        stats.add_optimized(2048, 2048, false);
        stats.add_error();

        assert_eq!(stats.files_processed, 3);
        assert_eq!(stats.files_optimized, 2);
        assert_eq!(stats.files_resized, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.bytes_saved(), 3072);
        assert_eq!(stats.overall_reduction_percent(), 50.0);
    }

    #[test]
    fn test_summary_reports_growth() {
        let mut stats = OptimizationStats::new();
        stats.add_optimized(1024, 2048, false);

        assert_eq!(stats.bytes_saved(), -1024);
        let summary = stats.format_summary();
        assert!(summary.contains("Total saved: -1.00 KB (-100.0%)"), "{}", summary);
    }

    #[test]
    fn test_hidden_progress_still_counts() {
        let progress = ProgressManager::new(2, false);
        progress.update("a.jpg");
        let value = progress.suspend(|| 7);
        progress.update("b.jpg");
        progress.finish();
        assert_eq!(value, 7);
        assert_eq!(progress.position(), 2);
    }
}
