//! # Imaging Module
//!
//! Separa il *cosa* (la policy del driver) dal *come* (il codec):
//!
//! - [`ImageBackend`]: il contratto del collaboratore di imaging: probe dei
//!   metadata, resize shrink-to-fit, encoding JPEG con qualità e modalità
//!   ad alta efficienza.
//! - [`fit_to_width`]: calcolo puro delle dimensioni di output.
//! - [`detect_backend`]: capability check eseguito una sola volta all'avvio.
//!
//! ## Disponibilità
//!
//! Il backend di produzione (`RustBackend`, crate `image`) esiste solo con la
//! feature `imaging` (attiva di default). Senza, `detect_backend` ritorna
//! `None` e il driver stampa le istruzioni senza scrivere nulla.

#[cfg(feature = "imaging")]
pub mod rust_backend;

#[cfg(feature = "imaging")]
pub use rust_backend::RustBackend;

use crate::config::Config;
use crate::error::OptimizeError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Pixel size of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// What the backend must do to one image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeRequest {
    /// Shrink so the width fits this value; smaller images are never enlarged
    pub resize_to_width: Option<u32>,
    /// JPEG quality (1-100)
    pub quality: u8,
    /// Higher-efficiency entropy coding
    pub efficient: bool,
}

/// Encoded JPEG stream ready to be written
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub dimensions: Dimensions,
}

/// The imaging collaborator.
///
/// Implementations are called from blocking worker threads, one file at a time
/// per call; they must not touch any path other than the one they are given.
pub trait ImageBackend: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Read the pixel dimensions without a full decode
    fn probe(&self, path: &Path) -> Result<Dimensions, OptimizeError>;

    /// Decode `path`, apply the resize in `request` and encode as JPEG
    fn reencode(&self, path: &Path, request: &EncodeRequest) -> Result<EncodedImage, OptimizeError>;
}

/// Output size when shrinking to `max_width`, keeping the aspect ratio.
///
/// Images at or below `max_width` keep their size.
pub fn fit_to_width(source: Dimensions, max_width: u32) -> Dimensions {
    if source.width <= max_width || source.width == 0 {
        return source;
    }

    let height = (u64::from(source.height) * u64::from(max_width) + u64::from(source.width) / 2)
        / u64::from(source.width);

    Dimensions::new(max_width, height.max(1) as u32)
}

/// Pick the imaging backend for this build, or `None` when no codec is compiled in.
pub async fn detect_backend(config: &Config) -> Option<Arc<dyn ImageBackend>> {
    #[cfg(feature = "imaging")]
    {
        let backend = RustBackend::detect(config.efficient_encoding).await;
        Some(Arc::new(backend))
    }

    #[cfg(not(feature = "imaging"))]
    {
        let _ = config;
        None
    }
}
