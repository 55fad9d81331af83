//! Production backend on the `image` crate.
//!
//! Decode and resize (Lanczos3) happen in-process; the JPEG is encoded with
//! `JpegEncoder` and, in higher-efficiency mode, rewritten by `jpegtran`
//! when it was found at start-up.

use super::{fit_to_width, Dimensions, EncodeRequest, EncodedImage, ImageBackend};
use crate::error::OptimizeError;
use crate::platform::{PlatformCommands, JPEG_OPTIMIZER};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::io::Reader as ImageReader;
use image::{ColorType, GenericImageView};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

pub struct RustBackend {
    /// Command of the lossless JPEG optimizer, when available
    jpeg_optimizer: Option<String>,
}

impl RustBackend {
    pub fn new(jpeg_optimizer: Option<String>) -> Self {
        Self { jpeg_optimizer }
    }

    /// Build the backend, looking up the JPEG optimizer only when it will be used.
    pub async fn detect(efficient_encoding: bool) -> Self {
        if !efficient_encoding {
            return Self::new(None);
        }

        let platform = PlatformCommands::instance();
        if platform.is_command_available(JPEG_OPTIMIZER).await {
            info!("🔧 {} found: JPEGs get optimized Huffman tables", JPEG_OPTIMIZER);
            Self::new(Some(platform.get_command(JPEG_OPTIMIZER).to_string()))
        } else {
            warn!(
                "⚠️  {} not found: JPEGs are written with baseline entropy coding",
                JPEG_OPTIMIZER
            );
            Self::new(None)
        }
    }

    pub fn has_jpeg_optimizer(&self) -> bool {
        self.jpeg_optimizer.is_some()
    }

    fn open(path: &Path) -> Result<ImageReader<BufReader<File>>, OptimizeError> {
        Ok(ImageReader::open(path)?.with_guessed_format()?)
    }

    /// Lossless rewrite of a baseline JPEG with the external optimizer
    fn optimize_entropy(tool: &str, baseline: &[u8]) -> Result<Vec<u8>, OptimizeError> {
        let mut input = tempfile::NamedTempFile::new()?;
        input.write_all(baseline)?;
        input.flush()?;

        let output = Command::new(tool)
            .args(["-optimize", "-progressive", "-copy", "none"])
            .arg(input.path())
            .output()?;

        if !output.status.success() || output.stdout.is_empty() {
            return Err(OptimizeError::Encode(format!(
                "{} exited with {}: {}",
                tool,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output.stdout)
    }
}

impl ImageBackend for RustBackend {
    fn name(&self) -> &str {
        "image"
    }

    fn probe(&self, path: &Path) -> Result<Dimensions, OptimizeError> {
        let (width, height) = Self::open(path)?
            .into_dimensions()
            .map_err(|e| OptimizeError::Probe(e.to_string()))?;
        Ok(Dimensions::new(width, height))
    }

    fn reencode(&self, path: &Path, request: &EncodeRequest) -> Result<EncodedImage, OptimizeError> {
        let mut image = Self::open(path)?.decode()?;

        if let Some(max_width) = request.resize_to_width {
            let (width, height) = image.dimensions();
            let target = fit_to_width(Dimensions::new(width, height), max_width);
            if target.width != width {
                debug!("Resizing {} from {}x{} to {}", path.display(), width, height, target);
                image = image.resize_exact(target.width, target.height, FilterType::Lanczos3);
            }
        }

        // JPEG has no alpha channel
        let rgb = image.to_rgb8();
        let dimensions = Dimensions::new(rgb.width(), rgb.height());

        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, request.quality)
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
            .map_err(|e| OptimizeError::Encode(e.to_string()))?;

        if request.efficient {
            if let Some(ref tool) = self.jpeg_optimizer {
                match Self::optimize_entropy(tool, &bytes) {
                    Ok(optimized) => bytes = optimized,
                    Err(e) => warn!(
                        "Keeping baseline JPEG for {}: {}",
                        path.file_name().unwrap_or_default().to_string_lossy(),
                        e
                    ),
                }
            }
        }

        Ok(EncodedImage { bytes, dimensions })
    }
}
