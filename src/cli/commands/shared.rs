//! Shared components for CLI commands

use crate::cli::args::Args;
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Set up structured logging for the process command
///
/// `RUST_LOG` overrides the level derived from `-v`/`-q`. Calling this twice
/// keeps the first subscriber.
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quake_geocoder={}", log_level)));

    let initialized = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();

    match initialized {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        Err(e) => debug!("Logging already initialized: {}", e),
    }
    Ok(())
}

/// Create the directory that will hold the output file
pub fn prepare_output_directory(output_path: &Path) -> Result<()> {
    let Some(directory) = output_path.parent() else {
        return Ok(());
    };

    if !directory.as_os_str().is_empty() && !directory.exists() {
        std::fs::create_dir_all(directory).map_err(|e| {
            Error::io(
                format!("Failed to create output directory '{}'", directory.display()),
                e,
            )
        })?;
        info!("Created output directory: {}", directory.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_output_directory_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("nested").join("deeper").join("out.csv");

        prepare_output_directory(&output).unwrap();

        assert!(output.parent().unwrap().is_dir());
        assert!(!output.exists());
    }

    #[test]
    fn test_prepare_output_directory_existing_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        prepare_output_directory(&temp_dir.path().join("out.csv")).unwrap();
        prepare_output_directory(Path::new("out.csv")).unwrap();
    }
}
