use std::collections::BTreeMap;
use std::path::PathBuf;

/// Header tag pairs of one game, keyed by tag name.
pub type PgnTags = BTreeMap<String, String>;

/// One game as handed from a record source to the pipeline.
///
/// `raw` is the verbatim text of the game (tags, movetext and the blank lines
/// that followed it in the source file).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRecord {
    pub tags: PgnTags,
    pub raw: String,
}

impl GameRecord {
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }
}

/// Per-run filter configuration. Built once from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Exclusive lower rating bound.
    pub elo_min: i32,
    /// Inclusive upper rating bound.
    pub elo_max: i32,
    pub remove_bullet: bool,
    pub remove_low_time: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum RejectReason {
    Rating,
    EloRange,
    Result,
    Bullet,
}

impl RejectReason {
    pub const ALL: [RejectReason; 4] = [
        RejectReason::Rating,
        RejectReason::EloRange,
        RejectReason::Result,
        RejectReason::Bullet,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::EloRange => "elo_range",
            Self::Result => "result",
            Self::Bullet => "bullet",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileOutcome {
    Completed,
    /// Could not be opened; nothing was read.
    Skipped,
    /// Opened, then failed while reading. Records accepted before the failure stay written.
    Failed,
    /// Reading stopped because the sink failed.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub path: PathBuf,
    pub seen: u64,
    pub accepted: u64,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub accepted: u64,
    pub files_attempted: usize,
    pub files_failed: usize,
    pub files: Vec<FileStats>,
    rejected: [u64; RejectReason::ALL.len()],
}

impl RunStats {
    pub fn record_reject(&mut self, reason: RejectReason) {
        self.rejected[reason.index()] += 1;
    }

    pub fn rejected(&self, reason: RejectReason) -> u64 {
        self.rejected[reason.index()]
    }

    pub fn total_rejected(&self) -> u64 {
        self.rejected.iter().sum()
    }

    pub fn total_seen(&self) -> u64 {
        self.files.iter().map(|file| file.seen).sum()
    }

    /// Files that were attempted but produced no complete read.
    pub fn all_files_failed(&self) -> bool {
        self.files_attempted > 0 && self.files_failed == self.files_attempted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_tallies_are_tracked_per_reason() {
        let mut stats = RunStats::default();
        stats.record_reject(RejectReason::Rating);
        stats.record_reject(RejectReason::Rating);
        stats.record_reject(RejectReason::Bullet);

        assert_eq!(stats.rejected(RejectReason::Rating), 2);
        assert_eq!(stats.rejected(RejectReason::Bullet), 1);
        assert_eq!(stats.rejected(RejectReason::Result), 0);
        assert_eq!(stats.total_rejected(), 3);
    }

    #[test]
    fn test_all_files_failed_requires_attempts() {
        let mut stats = RunStats::default();
        assert!(!stats.all_files_failed());

        stats.files_attempted = 2;
        stats.files_failed = 2;
        assert!(stats.all_files_failed());

        stats.files_failed = 1;
        assert!(!stats.all_files_failed());
    }

    #[test]
    fn test_game_record_tag_lookup() {
        let mut record = GameRecord::default();
        record.tags.insert("Event".to_string(), "Rated Blitz game".to_string());

        assert_eq!(record.tag("Event"), Some("Rated Blitz game"));
        assert_eq!(record.tag("Site"), None);
    }
}
