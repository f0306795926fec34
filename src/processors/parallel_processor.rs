use crate::config::ProcessorConfig;
use crate::error::{ProcessingError, Result};
use crate::processors::{FileProcessor, RunReport};
use crate::utils::constants::SPOOLS_IN_FLIGHT_PER_WORKER;
use crate::utils::discovery::discover_input_files;
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvOutputWriter, Spool, SpoolDirectory};
use crossbeam::channel::{bounded, Receiver};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use validator::Validate;

/// A finished file task, tagged with its position in discovery order
struct FileOutcome {
    index: usize,
    path: PathBuf,
    result: Result<Spool>,
}

/// Converts a directory of `.dly` files into one CSV table.
///
/// Files are unpacked concurrently on a rayon pool, each into its own spool.
/// The calling thread is the only writer of the output: it receives finished
/// spools over a bounded channel and appends them in discovery order, so the
/// output is identical from run to run.
pub struct ParallelProcessor {
    config: ProcessorConfig,
    cancelled: Arc<AtomicBool>,
}

impl ParallelProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops new files from starting once set.
    ///
    /// Files already being unpacked finish and are still written. A processor
    /// whose flag is set refuses further runs and leaves their output untouched.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn run(&self, input_dir: &Path, output_path: &Path) -> Result<RunReport> {
        let started = Instant::now();
        self.config.validate()?;
        if self.cancelled.load(Ordering::SeqCst) {
            return Err(ProcessingError::Cancelled);
        }

        let files = discover_input_files(input_dir, &self.config.input_extension)?;
        info!(
            "Found {} .{} files in {}",
            files.len(),
            self.config.input_extension,
            input_dir.display()
        );

        let mut output = CsvOutputWriter::create(output_path)?;
        let spools = SpoolDirectory::beside(output_path)?;
        let mut report = RunReport::new(output_path, files.len());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let progress = ProgressReporter::new(
            files.len() as u64,
            "Unpacking station files...",
            !self.config.show_progress,
        );

        let processor = FileProcessor::new(self.config.malformed_lines)
            .with_buffer_size(self.config.buffer_size);
        let (sender, receiver) =
            bounded::<FileOutcome>(self.config.max_workers * SPOOLS_IN_FLIGHT_PER_WORKER);
        // Set by the writer when the output fails; lives only for this run
        let aborted = AtomicBool::new(false);

        std::thread::scope(|scope| {
            let files = &files;
            let processor = &processor;
            let spools = &spools;
            let stop = [&*self.cancelled, &aborted];
            let pool = &pool;

            scope.spawn(move || {
                pool.install(|| {
                    files
                        .par_iter()
                        .enumerate()
                        .for_each_with(sender, |sender, (index, path)| {
                            let outcome = FileOutcome {
                                index,
                                path: path.clone(),
                                result: unpack_file(processor, path, spools, &stop),
                            };
                            // The receiver only hangs up after an output failure
                            let _ = sender.send(outcome);
                        });
                });
            });

            Self::write_in_order(receiver, &mut output, &mut report, &progress, &aborted)
        })?;

        let output_path = output.finish()?;
        report.elapsed_ms = started.elapsed().as_millis() as u64;

        progress.finish_with_message(&format!(
            "Wrote {} rows from {} files",
            report.rows_written, report.files_succeeded
        ));
        info!(
            "Wrote {} rows from {} of {} files to {} in {} ms",
            report.rows_written,
            report.files_succeeded,
            report.files_discovered,
            output_path.display(),
            report.elapsed_ms
        );

        Ok(report)
    }

    /// Append spools to the output strictly in discovery order.
    ///
    /// The first output failure sets `aborted` and ends the run; outcomes still
    /// pending are dropped with their spools.
    fn write_in_order(
        receiver: Receiver<FileOutcome>,
        output: &mut CsvOutputWriter,
        report: &mut RunReport,
        progress: &ProgressReporter,
        aborted: &AtomicBool,
    ) -> Result<()> {
        let mut pending: BTreeMap<usize, FileOutcome> = BTreeMap::new();
        let mut next_index = 0;

        for outcome in receiver {
            pending.insert(outcome.index, outcome);

            while let Some(outcome) = pending.remove(&next_index) {
                if let Err(e) = Self::write_outcome(outcome, output, report) {
                    aborted.store(true, Ordering::SeqCst);
                    return Err(e);
                }

                next_index += 1;
                progress.increment(1);
            }
        }

        Ok(())
    }

    fn write_outcome(
        outcome: FileOutcome,
        output: &mut CsvOutputWriter,
        report: &mut RunReport,
    ) -> Result<()> {
        match outcome.result {
            Ok(spool) => {
                output.append_spool(&spool)?;
                report.record_success(&spool.stats);
                debug!(
                    "Appended {} rows from {}",
                    spool.stats.rows_written,
                    outcome.path.display()
                );
            }
            Err(ProcessingError::Cancelled) => report.record_cancelled(),
            Err(e @ ProcessingError::OutputWrite { .. }) => return Err(e),
            Err(e) => {
                warn!("Failed to process {}: {}", outcome.path.display(), e);
                report.record_failure(&outcome.path, &e);
            }
        }

        Ok(())
    }
}

/// Unpack one file unless any of the `stop` flags is set
fn unpack_file(
    processor: &FileProcessor,
    path: &Path,
    spools: &SpoolDirectory,
    stop: &[&AtomicBool],
) -> Result<Spool> {
    if stop.iter().any(|flag| flag.load(Ordering::SeqCst)) {
        return Err(ProcessingError::Cancelled);
    }
    processor.spool(path, spools)
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}
