use super::types::{FilterOptions, PgnTags, RejectReason, Verdict};

/// Event labels containing this are bullet games ("Rated Bullet game",
/// "Rated UltraBullet game", "Bullet Arena", ...).
pub const BULLET_MARKER: &str = "Bullet";

pub const CANONICAL_RESULTS: [&str; 3] = ["1-0", "0-1", "1/2-1/2"];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ratings {
    pub white: i32,
    pub black: i32,
}

impl Ratings {
    /// `None` when either side's rating is missing or not an integer.
    pub fn parse(tags: &PgnTags) -> Option<Self> {
        Some(Self {
            white: parse_rating(tags.get("WhiteElo")?)?,
            black: parse_rating(tags.get("BlackElo")?)?,
        })
    }
}

fn parse_rating(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}

fn in_range(rating: i32, options: &FilterOptions) -> bool {
    rating > options.elo_min && rating <= options.elo_max
}

pub fn is_canonical_result(result: &str) -> bool {
    CANONICAL_RESULTS.contains(&result)
}

/// Runs every check in order and stops at the first failure.
pub fn evaluate(tags: &PgnTags, options: &FilterOptions) -> Verdict {
    let Some(ratings) = Ratings::parse(tags) else {
        return Verdict::Reject(RejectReason::Rating);
    };

    if !in_range(ratings.white, options) || !in_range(ratings.black, options) {
        return Verdict::Reject(RejectReason::EloRange);
    }

    if !tags.get("Result").is_some_and(|r| is_canonical_result(r)) {
        return Verdict::Reject(RejectReason::Result);
    }

    if options.remove_bullet
        && tags
            .get("Event")
            .is_some_and(|event| event.contains(BULLET_MARKER))
    {
        return Verdict::Reject(RejectReason::Bullet);
    }

    Verdict::Accept
}

pub fn accept(tags: &PgnTags, options: &FilterOptions) -> bool {
    evaluate(tags, options).is_accept()
}
