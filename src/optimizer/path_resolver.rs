//! # Path Resolution Module
//!
//! Centralizza il calcolo del nome dei file di output: `<prefisso><nome>`
//! nella stessa directory della sorgente.

use crate::{
    config::{Config, OutputNaming},
    error::OptimizeError,
    file_manager::FileManager,
};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Utility per calcolare i path di output in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Output path of a source image; the same input always yields the same path.
    pub fn get_output_path(input_path: &Path, config: &Config) -> Result<PathBuf, OptimizeError> {
        let file_name = input_path
            .file_name()
            .ok_or_else(|| OptimizeError::Validation(format!("Invalid file name: {}", input_path.display())))?;

        // Built as OsString so names that are not UTF-8 survive byte for byte
        let mut output_name = OsString::from(&config.output_prefix);
        match config.naming {
            OutputNaming::KeepExtension => output_name.push(file_name),
            OutputNaming::JpegExtension if FileManager::is_jpeg(input_path) => output_name.push(file_name),
            OutputNaming::JpegExtension => {
                output_name.push(input_path.file_stem().unwrap_or_default());
                output_name.push(".jpg");
            }
        }

        Ok(input_path.with_file_name(output_name))
    }

    /// True when the output keeps a non-JPEG extension but holds JPEG data
    pub fn has_mismatched_extension(input_path: &Path, config: &Config) -> bool {
        config.naming == OutputNaming::KeepExtension && !FileManager::is_jpeg(input_path)
    }

    /// Output paths for a directory's sources, in order.
    ///
    /// A source whose output was already claimed by an earlier source gets an
    /// `OutputCollision` error instead of a path.
    pub fn plan_outputs(
        sources: Vec<PathBuf>,
        config: &Config,
    ) -> Vec<(PathBuf, Result<PathBuf, OptimizeError>)> {
        let mut claimed = HashSet::new();

        sources
            .into_iter()
            .map(|source| {
                let planned = Self::get_output_path(&source, config).and_then(|output| {
                    if claimed.insert(output.clone()) {
                        Ok(output)
                    } else {
                        Err(OptimizeError::OutputCollision(output))
                    }
                });
                (source, planned)
            })
            .collect()
    }
}
