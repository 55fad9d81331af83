//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, scrittura output)
//! - `Image`: Errori del codec (formato corrotto, decode/encode falliti)
//! - `Probe`: Metadata dell'immagine non leggibili
//! - `Encode`: Encoding JPEG fallito
//! - `OutputCollision`: Due sorgenti producono lo stesso file di output
//! - `Validation`: Errori di validazione della configurazione
//! - `Task`: Il worker del codec non è stato eseguito (runtime in chiusura, errore fatale);
//!   un panic del codec viene invece trattato come errore del singolo file
//!
//! ## Propagazione:
//! Gli errori per singolo file vengono catturati dal driver e trasformati in
//! una riga di log; solo `Task` e gli errori di lettura directory risalgono
//! fino a `main`.
//!
//! ## Esempio:
//! ```rust
//! use web_image_optimizer::OptimizeError;
//!
//! let err = OptimizeError::Validation("quality must be between 1 and 100".to_string());
//! assert_eq!(err.to_string(), "Configuration error: quality must be between 1 and 100");
//! ```

use std::path::PathBuf;

/// Custom error types for image optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(String),

    #[error("Cannot read image metadata: {0}")]
    Probe(String),

    #[error("JPEG encoding failed: {0}")]
    Encode(String),

    #[error("Output {} already written by another source in this run", .0.display())]
    OutputCollision(PathBuf),

    #[error("Configuration error: {0}")]
    Validation(String),

    #[error("Codec worker failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl OptimizeError {
    /// Whether the error must abort the whole run instead of a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, OptimizeError::Task(_))
    }
}

#[cfg(feature = "imaging")]
impl From<image::ImageError> for OptimizeError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => OptimizeError::Io(io),
            other => OptimizeError::Image(other.to_string()),
        }
    }
}
