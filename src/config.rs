//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di ottimizzazione
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default che riproducono lo script di produzione
//!
//! ## Parametri di configurazione:
//! - `directories`: Directory da processare, in ordine (default: ambience, food, drinks)
//! - `max_width`: Larghezza oltre la quale l'immagine viene ridimensionata (default: 1920)
//! - `quality`: Qualità JPEG (1-100, default: 85)
//! - `efficient_encoding`: Ottimizzazione Huffman + progressive via jpegtran (default: true)
//! - `output_prefix`: Prefisso dei file generati (default: "optimized_")
//! - `naming`: Estensione dei file generati (default: mantiene quella originale)
//! - `reprocess_optimized`: Riprocessa anche i file già prefissati (default: false)
//! - `workers`: Numero di file elaborati in parallelo per directory (default: 1)
//! - `show_progress`: Mostra la progress bar (default: true)
//!
//! ## Esempio:
//! ```rust
//! use web_image_optimizer::Config;
//!
//! let config = Config {
//!     max_width: 1280,
//!     quality: 80,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use crate::error::OptimizeError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Gallery directories processed when nothing else is configured.
pub const DEFAULT_DIRECTORIES: [&str; 3] = [
    "public/images/ambience",
    "public/images/food",
    "public/images/drinks",
];

pub const DEFAULT_MAX_WIDTH: u32 = 1920;
pub const DEFAULT_QUALITY: u8 = 85;
pub const DEFAULT_OUTPUT_PREFIX: &str = "optimized_";

/// How the extension of an output file is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputNaming {
    /// `optimized_<name>.<ext>`: keeps the source extension even for PNG
    /// sources, whose output still holds JPEG data.
    #[default]
    KeepExtension,
    /// `optimized_<stem>.jpg` for non-JPEG sources.
    JpegExtension,
}

/// Configuration for image optimization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories to process, in order. Missing ones are skipped.
    pub directories: Vec<PathBuf>,
    /// Images wider than this are shrunk to exactly this width
    pub max_width: u32,
    /// JPEG quality (1-100)
    pub quality: u8,
    /// Run the encoded JPEG through the lossless optimizer when available
    pub efficient_encoding: bool,
    /// Prefix prepended to the source file name
    pub output_prefix: String,
    /// Output extension policy
    pub naming: OutputNaming,
    /// Also process files that already carry the output prefix
    pub reprocess_optimized: bool,
    /// Number of files processed concurrently inside one directory
    pub workers: usize,
    /// Draw a progress bar per directory
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directories: DEFAULT_DIRECTORIES.iter().map(PathBuf::from).collect(),
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
            efficient_encoding: true,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            naming: OutputNaming::default(),
            reprocess_optimized: false,
            workers: 1,
            show_progress: true,
        }
    }
}

impl Config {
    /// Configuration for the given directories with every other value at its default
    pub fn for_directories<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            directories: directories.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.directories.is_empty() {
            return Err(OptimizeError::Validation(
                "At least one directory must be configured".to_string(),
            ));
        }

        if self.max_width == 0 {
            return Err(OptimizeError::Validation(
                "Max width must be greater than 0".to_string(),
            ));
        }

        if self.quality == 0 || self.quality > 100 {
            return Err(OptimizeError::Validation(
                "JPEG quality must be between 1 and 100".to_string(),
            ));
        }

        if self.output_prefix.is_empty() {
            return Err(OptimizeError::Validation(
                "Output prefix must not be empty".to_string(),
            ));
        }

        if self.output_prefix.contains(['/', '\\']) {
            return Err(OptimizeError::Validation(format!(
                "Output prefix must be a plain file name fragment: {}",
                self.output_prefix
            )));
        }

        if self.workers == 0 {
            return Err(OptimizeError::Validation(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
