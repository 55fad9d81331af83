//! # Task Optimizer Module
//!
//! Worker per l'ottimizzazione di singoli file: dimensione → probe →
//! branch sulla larghezza → encode → scrittura → statistiche.
//! Il lavoro CPU-bound del codec gira su `spawn_blocking`.

use crate::{
    config::Config,
    error::OptimizeError,
    file_manager::FileManager,
    imaging::{Dimensions, EncodeRequest, ImageBackend},
    optimizer::{
        path_resolver::PathResolver,
        report::{FileOutcome, OptimizedFile},
    },
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Worker per elaborazione singoli file
pub struct TaskOptimizer {
    config: Config,
    backend: Arc<dyn ImageBackend>,
}

impl TaskOptimizer {
    pub fn new(config: Config, backend: Arc<dyn ImageBackend>) -> Self {
        Self { config, backend }
    }

    /// Process one planned file.
    ///
    /// Per-file problems become `FileOutcome::Failed`, a codec panic included;
    /// only fatal errors are returned as `Err`.
    pub async fn process(
        &self,
        source: PathBuf,
        planned_output: Result<PathBuf, OptimizeError>,
    ) -> Result<FileOutcome, OptimizeError> {
        let output = match planned_output {
            Ok(output) => output,
            Err(e) => return Ok(FileOutcome::failed(source, &e)),
        };

        match self.process_single_file(&source, output).await {
            Ok(file) => Ok(FileOutcome::Optimized(file)),
            Err(OptimizeError::Task(e)) if e.is_panic() => {
                warn!("Codec panicked on {}", source.display());
                Ok(FileOutcome::failed(source, &"codec crashed while decoding or encoding"))
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                debug!("Failed to process {}: {:?}", source.display(), e);
                Ok(FileOutcome::failed(source, &e))
            }
        }
    }

    /// Processa un singolo file
    pub async fn process_single_file(&self, source: &Path, output: PathBuf) -> Result<OptimizedFile, OptimizeError> {
        let original_size = FileManager::file_size(source).await?;

        if PathResolver::has_mismatched_extension(source, &self.config) {
            debug!(
                "{} keeps its extension but will contain JPEG data",
                output.file_name().unwrap_or_default().to_string_lossy()
            );
        }

        let backend = Arc::clone(&self.backend);
        let max_width = self.config.max_width;
        let quality = self.config.quality;
        let efficient = self.config.efficient_encoding;
        let source_path = source.to_path_buf();
        let output_path = output.clone();

        let (source_dimensions, output_dimensions, resized) =
            tokio::task::spawn_blocking(move || -> Result<(Dimensions, Dimensions, bool), OptimizeError> {
                let source_dimensions = backend.probe(&source_path)?;
                let resize = source_dimensions.width > max_width;

                let request = EncodeRequest {
                    resize_to_width: resize.then_some(max_width),
                    quality,
                    efficient,
                };
                let encoded = backend.reencode(&source_path, &request)?;
                FileManager::write_atomic(&output_path, &encoded.bytes)?;

                Ok((source_dimensions, encoded.dimensions, resize))
            })
            .await??;

        let new_size = FileManager::file_size(&output).await?;

        debug!(
            "{}: {} → {}, {} → {} bytes",
            source.display(),
            source_dimensions,
            output_dimensions,
            original_size,
            new_size
        );

        Ok(OptimizedFile {
            source: source.to_path_buf(),
            output,
            original_size,
            new_size,
            reduction_percent: FileManager::calculate_reduction(original_size, new_size),
            source_dimensions,
            output_dimensions,
            resized,
        })
    }
}
