use super::types::PgnTags;

use pgn_reader::{RawTag, Reader, Skip, Visitor};
use std::io;
use std::ops::ControlFlow;

/// Streaming PGN visitor (pgn-reader) that only keeps the tag pairs.
///
/// Movetext is walked but not collected; variations are skipped. Tag values
/// are taken as raw bytes (lossy UTF-8) and the first occurrence of a
/// duplicated tag wins.
#[derive(Default)]
pub struct TagVisitor;

impl Visitor for TagVisitor {
    type Tags = PgnTags;
    type Movetext = PgnTags;
    type Output = PgnTags;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(PgnTags::new())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        key: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let key = String::from_utf8_lossy(key);
        if !tags.contains_key(key.as_ref()) {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            tags.insert(key.into_owned(), value);
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(tags)
    }

    fn begin_variation(&mut self, _: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, tags: Self::Movetext) -> Self::Output {
        tags
    }
}

/// Parses the tag section of a single game's text.
///
/// Returns `Ok(None)` when the text holds no game at all.
pub fn parse_tags(raw: &str) -> io::Result<Option<PgnTags>> {
    let mut reader = Reader::new(raw.as_bytes());
    reader.read_game(&mut TagVisitor)
}
