//! # Web Image Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom
//! - `file_manager`: Discovery delle immagini e operazioni sui file
//! - `imaging`: Contratto del codec e backend basato sul crate `image`
//! - `platform`: Rilevamento del tool esterno `jpegtran`
//! - `optimizer`: Orchestratore del processo
//! - `progress`: Progress bar e statistiche
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use web_image_optimizer::{Config, ImageOptimizer};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::for_directories(["public/images/food"]);
//! let optimizer = ImageOptimizer::new(config).await?;
//! let report = optimizer.run().await?;
//! println!("{}", report.stats.format_summary());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod imaging;
pub mod optimizer;
pub mod platform;
pub mod progress;

pub use config::{Config, OutputNaming};
pub use error::OptimizeError;
pub use imaging::{Dimensions, EncodeRequest, EncodedImage, ImageBackend};
pub use optimizer::{FileOutcome, ImageOptimizer, RunReport};
pub use progress::OptimizationStats;
