//! # Optimizer Module
//!
//! Modulo che separa le responsabilità in sottomoduli:
//! - `image_optimizer`: Orchestratore principale (directory → file)
//! - `task_optimizer`: Worker per singoli file
//! - `path_resolver`: Logica di calcolo path centralizzata
//! - `report`: Esiti per file e riepilogo del run

pub mod image_optimizer;
pub mod path_resolver;
pub mod report;
pub mod task_optimizer;

pub use image_optimizer::ImageOptimizer;
pub use path_resolver::PathResolver;
pub use report::{FileFailure, FileOutcome, OptimizedFile, RunReport};
pub use task_optimizer::TaskOptimizer;
