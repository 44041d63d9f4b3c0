//! Command pattern interfaces
//!
//! This module defines the core Command pattern interfaces
//! for the CLI application.

use crate::tiff::errors::TiffResult;

/// Represents an executable command in the application
pub trait Command {
    /// Execute the command
    fn execute(&self) -> TiffResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory {
    /// Create a new Command instance based on CLI arguments
    fn create_command(&self, args: &clap::ArgMatches) -> TiffResult<Box<dyn Command>>;
}
