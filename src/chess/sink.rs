use super::error::SinkError;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use zstd::stream::write::Encoder as ZstdEncoder;

pub const DEFAULT_COMPRESSION_LEVEL: i32 = zstd::DEFAULT_COMPRESSION_LEVEL;

/// Append-only destination for accepted games.
pub trait GameSink {
    fn write_game(&mut self, raw: &str) -> Result<(), SinkError>;
}

impl GameSink for Vec<u8> {
    fn write_game(&mut self, raw: &str) -> Result<(), SinkError> {
        self.extend_from_slice(raw.as_bytes());
        Ok(())
    }
}

/// The single zstd output stream of a run.
///
/// `finish` ends the frame and flushes the file. If the sink is dropped
/// without `finish` (early return, panic) the frame is still ended on a
/// best-effort basis.
pub struct CompressedSink {
    path: PathBuf,
    encoder: Option<ZstdEncoder<'static, BufWriter<File>>>,
    bytes_in: u64,
}

impl CompressedSink {
    pub fn create(path: &Path, level: i32) -> Result<Self, SinkError> {
        let create_err = |source: io::Error| SinkError::Create {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(create_err)?;
        let encoder = ZstdEncoder::new(BufWriter::new(file), level).map_err(create_err)?;

        Ok(Self {
            path: path.to_path_buf(),
            encoder: Some(encoder),
            bytes_in: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Uncompressed bytes accepted so far.
    pub fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    pub fn finish(mut self) -> Result<(), SinkError> {
        self.close()
    }

    fn close(&mut self) -> Result<(), SinkError> {
        let Some(encoder) = self.encoder.take() else {
            return Ok(());
        };
        let mut writer = encoder.finish().map_err(SinkError::Finish)?;
        writer.flush().map_err(SinkError::Finish)?;
        debug!(
            "Closed {} after {} uncompressed bytes",
            self.path.display(),
            self.bytes_in
        );
        Ok(())
    }
}

impl GameSink for CompressedSink {
    fn write_game(&mut self, raw: &str) -> Result<(), SinkError> {
        let encoder = self.encoder.as_mut().ok_or_else(|| {
            SinkError::Write(io::Error::new(io::ErrorKind::BrokenPipe, "sink already closed"))
        })?;
        encoder.write_all(raw.as_bytes()).map_err(SinkError::Write)?;
        self.bytes_in += raw.len() as u64;
        Ok(())
    }
}

impl Drop for CompressedSink {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            error!("{}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_produces_decodable_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pgn.zst");

        let mut sink = CompressedSink::create(&path, DEFAULT_COMPRESSION_LEVEL).unwrap();
        sink.write_game("[Event \"A\"]\n\n1. e4 1-0\n\n").unwrap();
        sink.write_game("[Event \"B\"]\n\n1. d4 0-1\n\n").unwrap();
        assert_eq!(sink.bytes_in(), 48);
        sink.finish().unwrap();

        let decoded = zstd::decode_all(File::open(&path).unwrap()).unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            "[Event \"A\"]\n\n1. e4 1-0\n\n[Event \"B\"]\n\n1. d4 0-1\n\n"
        );
    }

    #[test]
    fn test_drop_without_finish_still_closes_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pgn.zst");

        {
            let mut sink = CompressedSink::create(&path, 1).unwrap();
            sink.write_game("1. e4 *\n\n").unwrap();
        }

        let decoded = zstd::decode_all(File::open(&path).unwrap()).unwrap();
        assert_eq!(decoded, b"1. e4 *\n\n");
    }

    #[test]
    fn test_empty_run_is_a_valid_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.zst");

        CompressedSink::create(&path, DEFAULT_COMPRESSION_LEVEL)
            .unwrap()
            .finish()
            .unwrap();

        let decoded = zstd::decode_all(File::open(&path).unwrap()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let err = CompressedSink::create(Path::new("/no/such/dir/out.zst"), 3)
            .err()
            .expect("create must fail");
        assert!(matches!(err, SinkError::Create { .. }));
    }
}
