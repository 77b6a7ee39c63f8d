//! # CLI Completions Command
//!
//! Shell completions generation for the Commit CLI.

use clap::Command;
use clap_complete::Shell;
use error::Result;

/// Generates shell completions for the CLI
///
/// # Errors
///
/// Infallible in practice; kept as `Result` to match the command surface.
pub fn completions(shell: Shell, cmd: &mut Command) -> Result<()> {
    clap_complete::generate(shell, cmd, "commit", &mut std::io::stdout());
    Ok(())
}
