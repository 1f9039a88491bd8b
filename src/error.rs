use serde::Serialize;
use thiserror::Error;

use crate::course::{Course, Side};

/// A raw leaderboard value that could not be decoded. Fails only the player that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodingError {
    #[error("unrecognized token {token:?} in THRU label {raw:?}")]
    UnknownToken { raw: String, token: String },
    #[error("THRU label {raw:?} names both courses")]
    AmbiguousCourse { raw: String },
    #[error("THRU label {raw:?} has neither a course name nor a progress marker")]
    NoCourseOrProgress { raw: String },
    #[error("hole count {count} out of range in THRU label {raw:?}")]
    HoleCountOutOfRange { raw: String, count: u32 },
    #[error("unknown course {raw:?}")]
    UnknownCourse { raw: String },
    #[error("column {column} has non-numeric value {raw:?}")]
    BadNumber { column: String, raw: String },
    #[error("cannot resolve round courses (THRU {thru:?}, no round-1 course)")]
    UnresolvedCourses { thru: Option<String> },
    #[error("THRU course {round_two} repeats round-1 course {round_one}")]
    CourseConflict { round_one: Course, round_two: Course },
}

/// Hole data that decodes but does not add up. The affected round is kept and marked incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("round {round}: reported {reported} strokes but holes sum to {computed}")]
    RoundTotalMismatch {
        round: u8,
        reported: u16,
        computed: u16,
    },
    #[error("round {round}: finished with only {present} holes recorded")]
    FinishedWithMissingHoles { round: u8, present: usize },
    #[error("round {round}: thru {thru} from the {side} nine but recorded holes do not follow playing order")]
    NonMonotonicHoles { round: u8, thru: u8, side: Side },
    #[error("reported total {reported} differs from round sum {computed}")]
    GrandTotalMismatch { reported: u16, computed: u16 },
}

/// Course reference problems. Always fatal for the whole build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceDataError {
    #[error("{course} hole {hole} missing from course reference")]
    MissingHole { course: Course, hole: u8 },
    #[error("{course} hole {hole} listed more than once")]
    DuplicateHole { course: Course, hole: u8 },
    #[error("{course} hole number {hole} out of range")]
    HoleOutOfRange { course: Course, hole: u8 },
    #[error("{course} hole {hole} has invalid par {par}")]
    InvalidPar { course: Course, hole: u8, par: u8 },
    #[error("{course} pars sum to {actual}, expected {expected}")]
    ParTotal {
        course: Course,
        expected: u16,
        actual: u16,
    },
    #[error("course reference row {row}: {reason}")]
    Malformed { row: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum IssueKind {
    Decoding,
    /// Not started with no course on record. The label itself was fine.
    UnresolvedCourse,
    Consistency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerIssue {
    pub player: String,
    pub kind: IssueKind,
    pub message: String,
}

impl PlayerIssue {
    pub fn decoding(player: &str, err: &DecodingError) -> Self {
        let kind = match err {
            DecodingError::UnresolvedCourses { .. } => IssueKind::UnresolvedCourse,
            _ => IssueKind::Decoding,
        };
        Self {
            player: player.to_string(),
            kind,
            message: err.to_string(),
        }
    }

    pub fn consistency(player: &str, err: &ConsistencyError) -> Self {
        Self {
            player: player.to_string(),
            kind: IssueKind::Consistency,
            message: err.to_string(),
        }
    }
}
