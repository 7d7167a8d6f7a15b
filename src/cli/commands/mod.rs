//! Command implementations for the quake geocoder CLI
//!
//! The tool has a single command: reverse geo-code one source file. The
//! workflow lives in [`process`]; logging and filesystem helpers shared with
//! it live in [`shared`].

pub mod process;
pub mod shared;

use crate::Result;
use crate::app::services::record_processor::RunStats;
use crate::cli::args::Args;
use tokio_util::sync::CancellationToken;

/// Main command runner for the quake geocoder
///
/// Cancelling `cancellation_token` stops the read loop at the next row.
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<RunStats> {
    process::run_process(args, cancellation_token).await
}
