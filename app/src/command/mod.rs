//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use scorematch_config::Config;
use scorematch_extract::ExtractionConfig;
use std::path::Path;
use tracing::info;

mod extract;
mod info;
mod init;
mod patterns;
mod version;

pub use extract::{ExtractInput, ExtractStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use patterns::{PatternsInput, PatternsStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Extraction settings from `path`, or from the default config file when it
/// exists, or the built-in defaults.
fn resolve_extraction_config(path: Option<&Path>) -> anyhow::Result<ExtractionConfig> {
    if let Some(path) = path {
        return Config::load_from(path)?.extraction_config();
    }

    let default_path = Config::config_dir()?.join(scorematch_config::CONFIG_FILE_NAME);
    if default_path.exists() {
        Config::load_from(&default_path)?.extraction_config()
    } else {
        info!("No config file, using built-in defaults");
        Ok(ExtractionConfig::default())
    }
}
