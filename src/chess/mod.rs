pub mod error;
pub mod filter;
pub mod log;
pub mod lowtime;
pub mod pipeline;
pub mod progress;
pub mod reader;
pub mod sink;
pub mod types;
mod visitor;

pub use error::{PipelineError, SinkError, SourceError};
pub use filter::{accept, evaluate};
pub use lowtime::{ClockTrim, LowTimeTransform};
pub use pipeline::{Pipeline, ProgressObserver, RunReport, SilentProgress};
pub use progress::ConsoleProgress;
pub use reader::{PgnFileSource, RecordSource, expand_targets};
pub use sink::{CompressedSink, GameSink};
pub use types::{FilterOptions, GameRecord, PgnTags, RunStats};
pub use visitor::parse_tags;
