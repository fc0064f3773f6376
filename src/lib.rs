pub mod chess;

pub use chess::{
    ClockTrim, CompressedSink, ConsoleProgress, FilterOptions, GameRecord, LowTimeTransform,
    PgnFileSource, Pipeline, PipelineError, RecordSource, RunReport, RunStats, accept, evaluate,
    expand_targets,
};

use chess::SinkError;
use std::path::{Path, PathBuf};
use tracing::error;

/// Everything one run needs besides the filter options.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub output: PathBuf,
    pub targets: Vec<String>,
    pub compression_level: i32,
    pub low_time_seconds: u32,
}

/// Opens the output, filters every target into it, and closes it.
///
/// Per-file problems never fail the run. A sink write failure ends the run
/// early and is returned inside the report; the output is closed either way.
/// A failure to close the output is reported the same way.
pub fn run(options: FilterOptions, config: &RunConfig) -> Result<RunReport, PipelineError> {
    let paths = expand_targets(&config.targets);
    run_paths(options, config, &paths, &mut ConsoleProgress::new(&config.output))
}

pub fn run_paths<O: chess::ProgressObserver>(
    options: FilterOptions,
    config: &RunConfig,
    paths: &[PathBuf],
    observer: &mut O,
) -> Result<RunReport, PipelineError> {
    let output: &Path = &config.output;
    let mut sink = CompressedSink::create(output, config.compression_level)?;
    let trim = ClockTrim::new(config.low_time_seconds);

    let mut report = Pipeline::new(&PgnFileSource, &trim, observer, options).run(paths, &mut sink);
    if let Err(err) = sink.finish() {
        record_finish_error(&mut report, err);
    }
    Ok(report)
}

/// Keeps the first sink failure of the run; a later close failure is only logged.
fn record_finish_error(report: &mut RunReport, err: SinkError) {
    if report.aborted.is_some() {
        error!("{}", err);
    } else {
        report.aborted = Some(err);
    }
}
