use super::error::{SinkError, SourceError};
use super::pipeline::{ProgressObserver, RunReport};
use super::types::{FileStats, RejectReason};

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Renders run checkpoints as log lines.
pub struct ConsoleProgress {
    output: PathBuf,
    started: Instant,
}

impl ConsoleProgress {
    pub fn new(output: &Path) -> Self {
        Self {
            output: output.to_path_buf(),
            started: Instant::now(),
        }
    }
}

impl ProgressObserver for ConsoleProgress {
    fn run_started(&mut self, file_count: usize) {
        self.started = Instant::now();
        info!(
            "Starting to write filtered games to: {} ({} input file(s))",
            self.output.display(),
            file_count
        );
    }

    fn file_started(&mut self, index: usize, file_count: usize, path: &Path) {
        info!("Processing file {}/{}: {}", index + 1, file_count, path.display());
    }

    fn progress(&mut self, path: &Path, seen_in_file: u64, accepted_total: u64) {
        info!(
            "Processed {} games, written {} games from {}",
            seen_in_file,
            accepted_total,
            path.display()
        );
    }

    fn file_skipped(&mut self, path: &Path, error: &SourceError) {
        warn!("Error reading {}: {}", path.display(), error);
    }

    fn file_failed(&mut self, path: &Path, error: &SourceError) {
        warn!("Stopped reading {} early: {}", path.display(), error);
    }

    fn file_done(&mut self, file: &FileStats) {
        info!(
            "Finished processing: {} ({} seen, {} written)",
            file.path.display(),
            file.seen,
            file.accepted
        );
    }

    fn sink_failed(&mut self, error: &SinkError) {
        error!("An error occurred while writing to {}: {}", self.output.display(), error);
    }

    fn run_done(&mut self, report: &RunReport) {
        let stats = &report.stats;
        for reason in RejectReason::ALL {
            debug!("Rejected ({}): {}", reason.name(), stats.rejected(reason));
        }
        if stats.all_files_failed() {
            warn!("No input file could be read ({} attempted)", stats.files_attempted);
        } else if stats.files_failed > 0 {
            warn!(
                "{} of {} input file(s) could not be fully read",
                stats.files_failed, stats.files_attempted
            );
        }
        info!(
            "Done! Total games written: {} ({} seen, {:.1}s)",
            stats.accepted,
            stats.total_seen(),
            self.started.elapsed().as_secs_f64()
        );
    }
}
