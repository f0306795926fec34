use crate::cli::args::{Cli, Commands};
use crate::config::ProcessorConfig;
use crate::error::{ProcessingError, Result};
use crate::processors::ParallelProcessor;
use crate::readers::DlyReader;
use crate::utils::filename::output_file_path;
use crate::writers::{write_header, ObservationWriter};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Process {
            input_dir,
            output_dir,
            output_name,
            extension,
            max_workers,
            on_malformed,
            json,
        } => {
            let Some((input_dir, output_dir)) = select_paths(input_dir, output_dir) else {
                info!("Input folder or output folder not selected, no work performed");
                return Ok(());
            };

            let output_path = output_file_path(&output_dir, Some(&output_name));
            info!("Input directory: {}", input_dir.display());
            info!("Output file: {}", output_path.display());
            info!("Workers: {}, malformed lines: {:?}", max_workers, on_malformed);

            let config = ProcessorConfig::new(max_workers)
                .with_input_extension(&extension)
                .with_malformed_lines(on_malformed)
                .with_progress(!cli.quiet && !json);
            let processor = ParallelProcessor::new(config);
            let cancel = processor.cancel_handle();

            let mut task =
                tokio::task::spawn_blocking(move || processor.run(&input_dir, &output_path));

            let report = tokio::select! {
                joined = &mut task => joined??,
                signal = tokio::signal::ctrl_c() => {
                    handle_interrupt(signal, &cancel);
                    task.await??
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("\n{}", report.summary());
            }

            if report.cancelled {
                return Err(ProcessingError::Cancelled);
            }
            if !report.failures.is_empty() {
                return Err(ProcessingError::PartialFailure {
                    failed: report.files_failed(),
                    total: report.files_discovered,
                });
            }
        }

        Commands::Inspect { file, sample } => {
            inspect_file(&file, sample, io::stdout().lock())?;
        }
    }

    Ok(())
}

/// Cancel on Ctrl-C; a handler that failed to register leaves the run going
fn handle_interrupt(signal: io::Result<()>, cancel: &AtomicBool) {
    match signal {
        Ok(()) => {
            warn!("Interrupt received, finishing files already in progress");
            cancel.store(true, Ordering::SeqCst);
        }
        Err(e) => warn!("Unable to listen for interrupts: {}", e),
    }
}

/// Both directories are required; a missing one means there is nothing to do
pub fn select_paths(
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Option<(PathBuf, PathBuf)> {
    match (input_dir, output_dir) {
        (Some(input), Some(output)) => Some((input, output)),
        _ => None,
    }
}

/// Write the header and the first `sample` rows of one `.dly` file
pub fn inspect_file<W: Write>(file: &Path, sample: usize, mut out: W) -> Result<()> {
    debug!("Inspecting {}", file.display());
    write_header(&mut out)?;

    let mut writer = ObservationWriter::new(out);
    for observation in DlyReader::new().stream_observations(file)?.take(sample) {
        match observation {
            Ok(observation) => writer.write(&observation)?,
            Err(e @ ProcessingError::MalformedLine { .. }) => warn!("Skipping {}", e),
            Err(e) => return Err(e),
        }
    }
    writer.flush()?;

    Ok(())
}

/// Set up structured logging on stderr, honouring `RUST_LOG` when present
fn setup_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ghcnd_processor={}", log_level)));

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(io::stderr),
        )
        .try_init();
}
