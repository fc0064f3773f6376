use super::error::SourceError;
use super::types::GameRecord;
use super::visitor::parse_tags;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::warn;
use zstd::stream::read::Decoder as ZstdDecoder;

pub type PgnInput = Box<dyn Read + Send>;

/// Opens one input file and yields its games lazily, in file order.
///
/// `open` failing means nothing was read from the file. An `Err` item from the
/// iterator means the file could not be read to the end.
pub trait RecordSource {
    type Games: Iterator<Item = Result<GameRecord, SourceError>>;

    fn open(&self, path: &Path) -> Result<Self::Games, SourceError>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompressionMode {
    Plain,
    Zstd,
}

impl CompressionMode {
    /// Picks the decoder from the file extension (`.zst` only, case-insensitive).
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("zst") => Self::Zstd,
            _ => Self::Plain,
        }
    }
}

pub fn open_input_stream(path: &Path, compression: CompressionMode) -> Result<PgnInput, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    match compression {
        CompressionMode::Plain => Ok(Box::new(file)),
        CompressionMode::Zstd => ZstdDecoder::new(file)
            .map(|decoder| Box::new(decoder) as PgnInput)
            .map_err(|source| SourceError::Decoder {
                path: path.to_path_buf(),
                source,
            }),
    }
}

/// Record source for PGN files, plain or zstd-compressed.
#[derive(Clone, Copy, Debug, Default)]
pub struct PgnFileSource;

impl RecordSource for PgnFileSource {
    type Games = PgnGames<BufReader<PgnInput>>;

    fn open(&self, path: &Path) -> Result<Self::Games, SourceError> {
        let input = open_input_stream(path, CompressionMode::detect(path))?;
        Ok(PgnGames::new(BufReader::new(input), path.to_path_buf()))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LineKind {
    Blank,
    Tag,
    Movetext,
}

/// Splits a PGN text stream into the verbatim text of each game.
///
/// A game owns its tag block, its movetext and any blank lines after it. A tag
/// line only opens a new game once the current one has movetext or a blank
/// line after its tags, and never while a `{` comment is still open.
struct GameSplitter<R> {
    input: R,
    pending: Option<String>,
    comment_depth: usize,
    finished: bool,
}

impl<R: BufRead> GameSplitter<R> {
    fn new(input: R) -> Self {
        Self {
            input,
            pending: None,
            comment_depth: 0,
            finished: false,
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn classify(&self, line: &str) -> LineKind {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            LineKind::Blank
        } else if self.comment_depth == 0 && trimmed.starts_with('[') {
            LineKind::Tag
        } else {
            LineKind::Movetext
        }
    }

    fn track_comments(&mut self, line: &str) {
        if line.starts_with('%') {
            return;
        }
        for c in line.chars() {
            match c {
                '{' => self.comment_depth += 1,
                '}' => self.comment_depth = self.comment_depth.saturating_sub(1),
                // Rest-of-line comment.
                ';' if self.comment_depth == 0 => break,
                _ => {}
            }
        }
    }

    fn next_game(&mut self) -> io::Result<Option<String>> {
        if self.finished {
            return Ok(None);
        }

        let mut game = String::new();
        let mut has_content = false;
        let mut closed_tags = false;

        while let Some(line) = self.read_line()? {
            match self.classify(&line) {
                LineKind::Blank => {
                    if !has_content {
                        continue;
                    }
                    // An unterminated `{` never spans past the end of a game.
                    self.comment_depth = 0;
                    closed_tags = true;
                }
                LineKind::Tag => {
                    if closed_tags {
                        self.pending = Some(line);
                        return Ok(Some(game));
                    }
                    has_content = true;
                }
                LineKind::Movetext => {
                    self.track_comments(&line);
                    has_content = true;
                    closed_tags = true;
                }
            }
            game.push_str(&line);
        }

        self.finished = true;
        Ok(has_content.then_some(game))
    }
}

/// Games of one PGN file, read one at a time.
pub struct PgnGames<R> {
    splitter: GameSplitter<R>,
    path: PathBuf,
    game_index: u64,
    failed: bool,
}

impl<R: BufRead> PgnGames<R> {
    pub fn new(input: R, path: PathBuf) -> Self {
        Self {
            splitter: GameSplitter::new(input),
            path,
            game_index: 0,
            failed: false,
        }
    }

    fn read_next_game(&mut self) -> Result<Option<GameRecord>, SourceError> {
        loop {
            let raw = match self.splitter.next_game() {
                Ok(Some(raw)) => raw,
                Ok(None) => return Ok(None),
                Err(source) => {
                    return Err(SourceError::Read {
                        path: self.path.clone(),
                        game_index: self.game_index,
                        source,
                    });
                }
            };
            self.game_index += 1;

            match parse_tags(&raw) {
                Ok(Some(tags)) => return Ok(Some(GameRecord { tags, raw })),
                // Stray text with no game in it (e.g. a trailing comment).
                Ok(None) => continue,
                Err(source) => {
                    return Err(SourceError::Parse {
                        path: self.path.clone(),
                        game_index: self.game_index,
                        source,
                    });
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for PgnGames<R> {
    type Item = Result<GameRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_next_game() {
            Ok(game) => game.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

fn is_glob_pattern(target: &str) -> bool {
    target.contains(['*', '?', '['])
}

/// Expands glob targets and returns every path in lexicographic order.
///
/// Existing files and plain paths are kept as given, even when they do not
/// exist; opening them later reports the error against that file. So is a
/// target that is not a valid pattern. A valid pattern without matches is
/// logged and contributes nothing.
pub fn expand_targets<S: AsRef<str>>(targets: &[S]) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(targets.len());

    for target in targets {
        let target = target.as_ref();
        if !is_glob_pattern(target) || Path::new(target).exists() {
            paths.push(PathBuf::from(target));
            continue;
        }

        let entries = match glob::glob(target) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Treating '{}' as a plain path: {}", target, err);
                paths.push(PathBuf::from(target));
                continue;
            }
        };

        let before = paths.len();
        for entry in entries {
            match entry {
                Ok(path) => paths.push(path),
                Err(err) => warn!("Skipping unreadable match for '{}': {}", target, err),
            }
        }
        if paths.len() == before {
            warn!("Pattern '{}' matched no files", target);
        }
    }

    paths.sort();
    paths
}
