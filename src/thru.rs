use crate::course::{Course, HOLES_PER_ROUND, Side};
use crate::error::DecodingError;

const BACK_NINE_MARKER: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Finished,
    Thru(u8),
}

impl Progress {
    pub fn holes_completed(self) -> u8 {
        match self {
            Progress::Finished => HOLES_PER_ROUND as u8,
            Progress::Thru(n) => n,
        }
    }
}

/// Decoded round-2 location label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThruStatus {
    /// No label at all: round 2 has not started.
    NotStarted,
    /// Progress is known but the label carries no course; the course is the
    /// complement of round 1.
    Unresolved { side: Side, progress: Progress },
    Parsed {
        course: Course,
        side: Side,
        progress: Progress,
    },
}

impl ThruStatus {
    pub fn course(&self) -> Option<Course> {
        match self {
            ThruStatus::Parsed { course, .. } => Some(*course),
            _ => None,
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            ThruStatus::NotStarted => None,
            ThruStatus::Unresolved { side, .. } | ThruStatus::Parsed { side, .. } => Some(*side),
        }
    }

    pub fn progress(&self) -> Option<Progress> {
        match self {
            ThruStatus::NotStarted => None,
            ThruStatus::Unresolved { progress, .. } | ThruStatus::Parsed { progress, .. } => {
                Some(*progress)
            }
        }
    }
}

/// Decodes a THRU cell such as `"Lake 12"`, `"Ocean F*"`, `"F"` or `"14*"`.
pub fn parse_thru(raw: Option<&str>) -> Result<ThruStatus, DecodingError> {
    let Some(label) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(ThruStatus::NotStarted);
    };

    let mut course: Option<Course> = None;
    let mut progress: Option<Progress> = None;
    let mut back = false;

    for token in label.split_whitespace() {
        if token.chars().all(|c| c == BACK_NINE_MARKER) {
            back = true;
            continue;
        }
        if let Some(found) = Course::find_in(token) {
            if course.is_some_and(|c| c != found) {
                return Err(DecodingError::AmbiguousCourse {
                    raw: label.to_string(),
                });
            }
            course = Some(found);
            continue;
        }
        let lower = token.to_ascii_lowercase();
        if lower.contains("lake") && lower.contains("ocean") {
            return Err(DecodingError::AmbiguousCourse {
                raw: label.to_string(),
            });
        }

        let stripped = token.trim_end_matches(BACK_NINE_MARKER);
        if stripped.len() != token.len() {
            back = true;
        }
        let parsed = if stripped.eq_ignore_ascii_case("f") {
            Progress::Finished
        } else if stripped.bytes().all(|b| b.is_ascii_digit())
            && let Ok(count) = stripped.parse::<u32>()
        {
            if count > HOLES_PER_ROUND as u32 {
                return Err(DecodingError::HoleCountOutOfRange {
                    raw: label.to_string(),
                    count,
                });
            }
            if count == HOLES_PER_ROUND as u32 {
                Progress::Finished
            } else {
                Progress::Thru(count as u8)
            }
        } else {
            return Err(DecodingError::UnknownToken {
                raw: label.to_string(),
                token: token.to_string(),
            });
        };
        if progress.is_some() {
            return Err(DecodingError::UnknownToken {
                raw: label.to_string(),
                token: token.to_string(),
            });
        }
        progress = Some(parsed);
    }

    let side = if back { Side::Back } else { Side::Front };
    match (course, progress) {
        (Some(course), progress) => Ok(ThruStatus::Parsed {
            course,
            side,
            progress: progress.unwrap_or(Progress::Thru(0)),
        }),
        (None, Some(progress)) => Ok(ThruStatus::Unresolved { side, progress }),
        (None, None) => Err(DecodingError::NoCourseOrProgress {
            raw: label.to_string(),
        }),
    }
}
