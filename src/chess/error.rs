use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a record source. All of them are scoped to one input file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to open file '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Failed to initialize zstd decoder for '{}': {source}", path.display())]
    Decoder { path: PathBuf, source: io::Error },

    #[error("Read error in '{}' after game {game_index}: {source}", path.display())]
    Read {
        path: PathBuf,
        game_index: u64,
        source: io::Error,
    },

    #[error("Parser-stage error: file='{}'; game_index={game_index}; error={source}", path.display())]
    Parse {
        path: PathBuf,
        game_index: u64,
        source: io::Error,
    },
}

/// Failures of the compressed output stream. Any of these ends the run.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create output '{}': {source}", path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("Failed to write to output: {0}")]
    Write(#[source] io::Error),

    #[error("Failed to finish output stream: {0}")]
    Finish(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_messages_name_the_file() {
        let err = SourceError::Open {
            path: PathBuf::from("games/2013-01.pgn"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to open file 'games/2013-01.pgn': missing"
        );
    }

    #[test]
    fn test_read_error_reports_game_index() {
        let err = SourceError::Read {
            path: PathBuf::from("a.pgn"),
            game_index: 12,
            source: io::Error::new(io::ErrorKind::InvalidData, "bad utf-8"),
        };
        assert_eq!(err.to_string(), "Read error in 'a.pgn' after game 12: bad utf-8");
    }

    #[test]
    fn test_sink_error_converts_into_pipeline_error() {
        let err: PipelineError =
            SinkError::Write(io::Error::new(io::ErrorKind::WriteZero, "disk full")).into();
        assert_eq!(err.to_string(), "Failed to write to output: disk full");
    }
}
