//! Process command implementation for the quake geocoder CLI
//!
//! This module contains the complete run: configuration, banner, place
//! registry and index preparation, the pipeline pass, and the final report.

use super::shared::{prepare_output_directory, setup_logging};
use crate::app::services::csv_writer::QuakeCsvWriter;
use crate::app::services::field_transformer::{FieldTransformer, OutputSchema};
use crate::app::services::index_sink::{BatchSink, ElasticClient};
use crate::app::services::ncedc_csv_reader::NcedcCsvReader;
use crate::app::services::place_registry::PlaceRegistry;
use crate::app::services::record_processor::progress::progress_line;
use crate::app::services::record_processor::{
    GeocodePipeline, LocationEnricher, ProgressReporter, RunStats,
};
use crate::cli::args::Args;
use crate::config::Config;
use crate::Result;
use colored::*;
use indicatif::HumanCount;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Process command runner for the quake geocoder
///
/// This function orchestrates the whole run:
/// 1. Set up logging and resolve configuration
/// 2. Report a missing source file and finish with zero rows
/// 3. Load the place registry and prepare the search index
/// 4. Stream the source file through the pipeline
/// 5. Print the final report
pub async fn run_process(args: Args, cancellation_token: CancellationToken) -> Result<RunStats> {
    setup_logging(&args)?;

    info!("Starting quake geocoder");
    debug!("Command line arguments: {:?}", args);

    let config = Config::from_args(&args)?;
    execute(&config, cancellation_token).await
}

/// Run the geocoding pass for a resolved configuration
pub async fn execute(config: &Config, cancellation_token: CancellationToken) -> Result<RunStats> {
    print_banner(config);
    debug!("Resolved configuration:\n{}", config.to_pretty_json()?);

    if !config.source_path.exists() {
        println!(
            "{}",
            format!(
                "NCEDC-formatted Earthquake file not found: \"{}\"",
                config.source_path.display()
            )
            .yellow()
        );
        let stats = RunStats::new();
        generate_final_report(config, &stats);
        return Ok(stats);
    }

    let places_path = config.resolve_places_path()?;
    let (registry, load_stats) = PlaceRegistry::load(&places_path)?;
    println!(
        "   • Places: {} from {}",
        HumanCount(registry.place_count() as u64),
        registry
            .source_path()
            .map(|path| path.display().to_string())
            .unwrap_or_default()
    );
    debug!("Place registry: {}", load_stats.summary());

    let sink = match &config.index {
        Some(index) => {
            let client = ElasticClient::new(index)?;
            info!("Indexing into '{}' at {}", index.index_name, client.base_url());
            let sink = BatchSink::new(
                client,
                index.index_name.clone(),
                index.doc_type.clone(),
                config.nulls.es.clone(),
            );
            sink.prepare().await?;
            Some(sink)
        }
        None => None,
    };

    prepare_output_directory(&config.output_path)?;

    let mut reader = NcedcCsvReader::open(&config.source_path, &config.source_dialect)?;
    let schema = OutputSchema::from_source_headers(reader.headers())?;
    let mut writer = QuakeCsvWriter::create(
        &config.output_path,
        &config.output_dialect,
        schema,
        config.header_row,
        config.nulls.db.clone(),
    )?;

    let mut pipeline = GeocodePipeline::new(
        FieldTransformer::new(config.dates.clone()),
        LocationEnricher::new(&registry),
        config.max_rows,
        config.flush_rows,
    )
    .with_progress(ProgressReporter::new(config.show_progress))
    .with_cancellation(cancellation_token);
    if let Some(sink) = sink {
        pipeline = pipeline.with_sink(sink);
    }

    let stats = pipeline.run(&mut reader, &mut writer).await?;
    writer.into_inner()?;

    generate_final_report(config, &stats);
    Ok(stats)
}

/// Print what is about to be processed
fn print_banner(config: &Config) {
    println!("{}", "Reverse geo-coding earthquake events".bright_green().bold());
    println!("   • Source file: {}", config.source_path.display());
    println!("   • Output file: {}", config.output_path.display());
    if let Some(index) = &config.index {
        println!(
            "   • Search index: {} at {}",
            index.index_name.bright_white().bold(),
            index.base_url()
        );
    }
}

/// Print the closing progress line and output totals
fn generate_final_report(config: &Config, stats: &RunStats) {
    println!("{}", progress_line(stats.rows_read, stats.elapsed));
    println!("Output file path: \"{}\"", config.output_path.display());
    println!(
        "Processing finished, {} rows output!",
        HumanCount(stats.rows_written).to_string().bright_white().bold()
    );

    if stats.rows_skipped > 0 {
        println!(
            "   • Rows skipped for unparseable DateTime: {}",
            HumanCount(stats.rows_skipped)
        );
    }
    if stats.documents_indexed > 0 {
        println!(
            "   • Documents indexed: {}",
            HumanCount(stats.documents_indexed)
        );
    }
}
