//! # Web Image Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Costruzione della configurazione (default → file JSON → flag)
//! - Avvio dell'optimizer e gestione dell'errore fatale
//!
//! Senza argomenti processa le tre gallery di produzione
//! (`public/images/{ambience,food,drinks}`).
//!
//! ## Esempio di utilizzo:
//! ```bash
//! optimize-images
//! optimize-images public/images/menu --max-width 1280 --quality 80 --workers 4
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

use web_image_optimizer::{Config, ImageOptimizer, OutputNaming};

#[derive(Parser)]
#[command(name = "optimize-images")]
#[command(about = "Resize and recompress gallery images for the web")]
struct Args {
    /// Directories to optimize (default: the ambience, food and drinks galleries)
    directories: Vec<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Images wider than this are shrunk to this width
    #[arg(long)]
    max_width: Option<u32>,

    /// JPEG quality (1-100)
    #[arg(short, long)]
    quality: Option<u8>,

    /// Number of files processed at the same time in a directory
    #[arg(short, long)]
    workers: Option<usize>,

    /// Name outputs of non-JPEG sources `optimized_<stem>.jpg`
    #[arg(long)]
    jpeg_extension: bool,

    /// Skip the lossless jpegtran pass
    #[arg(long)]
    no_efficient: bool,

    /// Also process files that already carry the output prefix
    #[arg(long)]
    reprocess_optimized: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    async fn into_config(self) -> Result<Config> {
        let mut config = match self.config {
            Some(ref path) => Config::from_file(path).await?,
            None => Config::default(),
        };

        if !self.directories.is_empty() {
            config.directories = self.directories;
        }
        if let Some(max_width) = self.max_width {
            config.max_width = max_width;
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.jpeg_extension {
            config.naming = OutputNaming::JpegExtension;
        }
        if self.no_efficient {
            config.efficient_encoding = false;
        }
        if self.reprocess_optimized {
            config.reprocess_optimized = true;
        }
        if self.no_progress {
            config.show_progress = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let level = if args.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.into_config().await?;

    let outcome = async {
        let optimizer = ImageOptimizer::new(config).await?;
        optimizer.run().await
    }
    .await;

    if let Err(e) = outcome {
        error!("❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
