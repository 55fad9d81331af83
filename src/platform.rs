//! # Platform-specific utilities
//!
//! Questo modulo centralizza la logica cross-platform per i tool esterni.
//! L'unico tool usato è `jpegtran`, che riscrive il JPEG prodotto dal codec
//! con tabelle Huffman ottimizzate e scansioni progressive (lossless).

use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// External tool that implements the higher-efficiency JPEG mode
pub const JPEG_OPTIMIZER: &str = "jpegtran";

/// Platform-specific command manager
pub struct PlatformCommands {
    commands: HashMap<&'static str, &'static str>,
    which_command: &'static str,
}

impl PlatformCommands {
    /// Get the singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: OnceLock<PlatformCommands> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }

    fn new() -> Self {
        let mut commands = HashMap::new();
        let which_command = if cfg!(windows) {
            commands.insert(JPEG_OPTIMIZER, "jpegtran.exe");
            "where"
        } else {
            commands.insert(JPEG_OPTIMIZER, "jpegtran");
            "which"
        };

        Self {
            commands,
            which_command,
        }
    }

    /// Get the platform-specific command name
    pub fn get_command<'a>(&self, base_name: &'a str) -> &'a str {
        self.commands.get(base_name).copied().unwrap_or(base_name)
    }

    /// Get the command used to check if a program exists
    pub fn which_command(&self) -> &str {
        self.which_command
    }

    /// Check if a command is available on the system
    pub async fn is_command_available(&self, base_name: &str) -> bool {
        let command_name = self.get_command(base_name);

        let result = tokio::process::Command::new(self.which_command)
            .arg(command_name)
            .output()
            .await;

        match result {
            Ok(output) => output.status.success(),
            Err(e) => {
                debug!("`{} {}` could not run: {}", self.which_command, command_name, e);
                false
            }
        }
    }
}
