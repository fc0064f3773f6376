use super::error::{SinkError, SourceError};
use super::filter::evaluate;
use super::lowtime::LowTimeTransform;
use super::reader::RecordSource;
use super::sink::GameSink;
use super::types::{FileOutcome, FileStats, FilterOptions, GameRecord, RunStats, Verdict};

use std::path::{Path, PathBuf};
use tracing::trace;

/// Progress is reported for accepted records whose 0-based position in their
/// file is a multiple of this.
pub const PROGRESS_EVERY: u64 = 1000;

/// Checkpoints of a run. Rendering is up to the implementation.
pub trait ProgressObserver {
    fn run_started(&mut self, _file_count: usize) {}
    fn file_started(&mut self, _index: usize, _file_count: usize, _path: &Path) {}
    fn progress(&mut self, _path: &Path, _seen_in_file: u64, _accepted_total: u64) {}
    fn file_skipped(&mut self, _path: &Path, _error: &SourceError) {}
    fn file_failed(&mut self, _path: &Path, _error: &SourceError) {}
    fn file_done(&mut self, _file: &FileStats) {}
    fn sink_failed(&mut self, _error: &SinkError) {}
    fn run_done(&mut self, _report: &RunReport) {}
}

/// Observer that ignores every checkpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {}

#[derive(Debug)]
pub struct RunReport {
    pub stats: RunStats,
    /// Set when a sink failure ended the run early.
    pub aborted: Option<SinkError>,
}

impl RunReport {
    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }
}

enum FileEnd {
    Exhausted,
    SourceFailed(SourceError),
    SinkFailed(SinkError),
}

/// Drives the run: every file in sorted order, every game in file order.
pub struct Pipeline<'a, S, T, O> {
    source: &'a S,
    trim: &'a T,
    observer: &'a mut O,
    options: FilterOptions,
    stats: RunStats,
}

impl<'a, S, T, O> Pipeline<'a, S, T, O>
where
    S: RecordSource,
    T: LowTimeTransform,
    O: ProgressObserver,
{
    pub fn new(source: &'a S, trim: &'a T, observer: &'a mut O, options: FilterOptions) -> Self {
        Self {
            source,
            trim,
            observer,
            options,
            stats: RunStats::default(),
        }
    }

    /// Filters `paths` into `sink`. The caller owns the sink and closes it
    /// whatever the outcome.
    pub fn run<K: GameSink>(mut self, paths: &[PathBuf], sink: &mut K) -> RunReport {
        let mut ordered: Vec<&PathBuf> = paths.iter().collect();
        ordered.sort();

        self.observer.run_started(ordered.len());

        let mut aborted = None;
        for (index, path) in ordered.iter().enumerate() {
            self.observer.file_started(index, ordered.len(), path);
            if let Err(err) = self.process_file(path, sink) {
                self.observer.sink_failed(&err);
                aborted = Some(err);
                break;
            }
        }

        let report = RunReport {
            stats: self.stats,
            aborted,
        };
        self.observer.run_done(&report);
        report
    }

    fn process_file<K: GameSink>(&mut self, path: &Path, sink: &mut K) -> Result<(), SinkError> {
        self.stats.files_attempted += 1;

        let games = match self.source.open(path) {
            Ok(games) => games,
            Err(err) => {
                self.stats.files_failed += 1;
                self.observer.file_skipped(path, &err);
                self.stats.files.push(FileStats {
                    path: path.to_path_buf(),
                    seen: 0,
                    accepted: 0,
                    outcome: FileOutcome::Skipped,
                });
                return Ok(());
            }
        };

        let mut file = FileStats {
            path: path.to_path_buf(),
            seen: 0,
            accepted: 0,
            outcome: FileOutcome::Completed,
        };
        let end = self.process_games(games, &mut file, sink);

        let result = match end {
            FileEnd::Exhausted => {
                self.observer.file_done(&file);
                Ok(())
            }
            FileEnd::SourceFailed(err) => {
                self.stats.files_failed += 1;
                file.outcome = FileOutcome::Failed;
                self.observer.file_failed(path, &err);
                Ok(())
            }
            FileEnd::SinkFailed(err) => {
                file.outcome = FileOutcome::Aborted;
                Err(err)
            }
        };
        self.stats.files.push(file);
        result
    }

    fn process_games<I, K>(&mut self, games: I, file: &mut FileStats, sink: &mut K) -> FileEnd
    where
        I: Iterator<Item = Result<GameRecord, SourceError>>,
        K: GameSink,
    {
        for (position, game) in (0u64..).zip(games) {
            let game = match game {
                Ok(game) => game,
                Err(err) => return FileEnd::SourceFailed(err),
            };
            file.seen += 1;

            if let Verdict::Reject(reason) = evaluate(&game.tags, &self.options) {
                trace!("Rejected game {} of {}: {}", position, file.path.display(), reason.name());
                self.stats.record_reject(reason);
                continue;
            }

            let written = if self.options.remove_low_time {
                sink.write_game(&self.trim.trim(&game.raw))
            } else {
                sink.write_game(&game.raw)
            };
            if let Err(err) = written {
                return FileEnd::SinkFailed(err);
            }

            file.accepted += 1;
            self.stats.accepted += 1;

            if position % PROGRESS_EVERY == 0 {
                self.observer
                    .progress(&file.path, position + 1, self.stats.accepted);
            }
        }
        FileEnd::Exhausted
    }
}
