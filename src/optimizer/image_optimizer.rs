//! # Image Optimizer Main Orchestrator
//!
//! Orchestratore principale: scorre le directory configurate in ordine,
//! delega ogni file a `TaskOptimizer` e raccoglie gli esiti in un `RunReport`.
//!
//! ## Gestione errori:
//! - Codec non disponibile: istruzioni su console, nessuna scrittura, `Ok`
//! - Directory mancante: un warning, si passa alla successiva
//! - Errore su un file: una riga di errore, si passa al file successivo
//! - Errore inatteso (directory illeggibile, worker del codec crashato):
//!   il run si interrompe e l'errore risale a `main`

use crate::{
    config::Config,
    file_manager::FileManager,
    imaging::{self, ImageBackend},
    optimizer::{
        path_resolver::PathResolver,
        report::RunReport,
        task_optimizer::TaskOptimizer,
    },
    progress::ProgressManager,
};
use anyhow::{Context, Result};
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestratore principale
pub struct ImageOptimizer {
    config: Config,
    backend: Option<Arc<dyn ImageBackend>>,
}

impl ImageOptimizer {
    /// Validate the configuration and detect the imaging backend once.
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let backend = imaging::detect_backend(&config).await;
        Ok(Self { config, backend })
    }

    /// Build with an explicit backend; `None` behaves like a build without codecs.
    pub fn with_backend(config: Config, backend: Option<Arc<dyn ImageBackend>>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Esegue il processo di ottimizzazione
    pub async fn run(&self) -> Result<RunReport> {
        let Some(backend) = self.backend.clone() else {
            self.print_guidance();
            return Ok(RunReport::new(false));
        };

        info!("🖼️  Starting image optimization...");
        self.log_configuration(backend.as_ref());

        let task = TaskOptimizer::new(self.config.clone(), backend);
        let mut report = RunReport::new(true);

        for dir in &self.config.directories {
            if !dir.exists() {
                warn!("⚠️  Directory not found: {}", dir.display());
                report.missing_directories.push(dir.clone());
                continue;
            }

            self.process_directory(&task, dir, &mut report).await?;
            report.directories_processed.push(dir.clone());
        }

        info!("✅ Image optimization complete!");
        info!("{}", report.stats.format_summary());
        info!("📝 Review optimized images and replace originals if satisfied.");

        Ok(report)
    }

    /// Processa i file di una directory con al massimo `workers` file in volo.
    ///
    /// Gli esiti vengono consumati nell'ordine di enumerazione, quindi log e
    /// report non dipendono dalla concorrenza.
    async fn process_directory(&self, task: &TaskOptimizer, dir: &Path, report: &mut RunReport) -> Result<()> {
        let files = FileManager::find_images(dir, &self.config.output_prefix, self.config.reprocess_optimized)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;

        info!("📁 Processing {} images in {}...", files.len(), dir.display());

        let plans = PathResolver::plan_outputs(files, &self.config);
        let progress = ProgressManager::new(plans.len() as u64, self.config.show_progress);

        let outcomes = futures::stream::iter(plans)
            .map(|(source, planned)| task.process(source, planned))
            .buffered(self.config.workers);
        futures::pin_mut!(outcomes);

        while let Some(outcome) = outcomes.next().await {
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(e) => {
                    progress.finish();
                    return Err(e).with_context(|| format!("Aborted while processing {}", dir.display()));
                }
            };

            progress.suspend(|| outcome.log());
            progress.update(&outcome.file_name());
            report.record(outcome);
        }

        progress.finish();
        Ok(())
    }

    fn log_configuration(&self, backend: &dyn ImageBackend) {
        debug!("Imaging backend: {}", backend.name());
        info!(
            "Mode: shrink to {}px wide, JPEG quality {}{}",
            self.config.max_width,
            self.config.quality,
            if self.config.efficient_encoding { ", efficient encoding" } else { "" }
        );
        if self.config.workers > 1 {
            info!("Workers: {} files at a time", self.config.workers);
        }
        if self.config.reprocess_optimized {
            info!(
                "Files starting with '{}' will be processed again",
                self.config.output_prefix
            );
        }
        debug!("Directories: {:?}", self.config.directories);
    }

    fn print_guidance(&self) {
        warn!("⚠️  Image codecs not available. Rebuild with: cargo build --features imaging");
        info!("📝 For now, images will be used as-is. Consider optimizing manually with:");
        info!(
            "   - ImageMagick: convert input.jpg -resize {}x -quality {} output.jpg",
            self.config.max_width, self.config.quality
        );
        info!("   - Online tools: Squoosh, TinyPNG, or ImageOptim");
    }
}
