use crate::course::{Course, HOLES_PER_ROUND, Side};
use crate::error::{ConsistencyError, DecodingError};
use crate::leaderboard::{RawEntry, hole_column};
use crate::thru::{Progress, ThruStatus, parse_thru};

pub type HoleScores = [Option<u8>; HOLES_PER_ROUND];

const MAX_HOLE_STROKES: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Complete,
    InProgress,
    NotStarted,
    /// Holes were recorded but failed a consistency check; kept for display,
    /// excluded from every aggregate.
    Inconsistent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    pub round: u8,
    pub course: Course,
    /// Round 1 always starts on the front; round 2 is `None` until the player tees off.
    pub start: Option<Side>,
    /// Indexed by hole number - 1. `None` means not yet played.
    pub holes: HoleScores,
    pub status: RoundStatus,
}

impl RoundRecord {
    pub fn is_complete(&self) -> bool {
        self.status == RoundStatus::Complete
    }

    pub fn hole(&self, hole: u8) -> Option<u8> {
        self.holes[usize::from(hole - 1)]
    }

    pub fn holes_played(&self) -> usize {
        self.holes.iter().filter(|h| h.is_some()).count()
    }

    pub fn missing_holes(&self) -> usize {
        HOLES_PER_ROUND - self.holes_played()
    }

    /// Sum of a nine when all nine holes are present.
    pub fn nine(&self, side: Side) -> Option<u16> {
        if self.status == RoundStatus::Inconsistent {
            return None;
        }
        side.holes()
            .map(|h| self.hole(h).map(u16::from))
            .sum::<Option<u16>>()
    }

    pub fn front(&self) -> Option<u16> {
        self.nine(Side::Front)
    }

    pub fn back(&self) -> Option<u16> {
        self.nine(Side::Back)
    }

    pub fn total(&self) -> Option<u16> {
        if !self.is_complete() {
            return None;
        }
        Some(self.front()? + self.back()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub player: String,
    pub country: String,
    /// Position label as scraped, e.g. `"T12"`.
    pub source_pos: String,
    pub source_to_par: String,
    pub rounds: [RoundRecord; 2],
}

impl PlayerRecord {
    pub fn round(&self, round: u8) -> &RoundRecord {
        &self.rounds[usize::from(round - 1)]
    }

    /// Defined only when both rounds are complete.
    pub fn total(&self) -> Option<u16> {
        Some(self.rounds[0].total()? + self.rounds[1].total()?)
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedPlayer {
    pub record: PlayerRecord,
    pub issues: Vec<ConsistencyError>,
}

/// Builds both round records for one leaderboard row.
pub fn normalize_entry(entry: &RawEntry) -> Result<NormalizedPlayer, DecodingError> {
    let thru = parse_thru(entry.thru.as_deref())?;
    let r1_hint = entry
        .r1_course
        .as_deref()
        .map(Course::from_label)
        .transpose()?;

    let (r1_course, r2_course) = match (thru.course(), r1_hint) {
        (Some(r2), Some(r1)) if r1 == r2 => {
            return Err(DecodingError::CourseConflict {
                round_one: r1,
                round_two: r2,
            });
        }
        (Some(r2), _) => (r2.complement(), r2),
        (None, Some(r1)) => (r1, r1.complement()),
        (None, None) => {
            return Err(DecodingError::UnresolvedCourses {
                thru: entry.thru.clone(),
            });
        }
    };

    let r1_holes = parse_hole_cells(entry, 1)?;
    let r2_holes = parse_hole_cells(entry, 2)?;
    let r1_reported = parse_strokes(entry.r1_strokes.as_deref(), "R1")?;
    let r2_reported = parse_strokes(entry.r2_strokes.as_deref(), "R2")?;
    let tot_reported = parse_strokes(entry.total_strokes.as_deref(), "TOT")?;

    let mut issues = Vec::new();

    let mut r1 = RoundRecord {
        round: 1,
        course: r1_course,
        start: Some(Side::Front),
        status: status_from_holes(&r1_holes),
        holes: r1_holes,
    };
    check_reported(&mut r1, r1_reported, &mut issues);

    let mut r2 = RoundRecord {
        round: 2,
        course: r2_course,
        start: thru.side(),
        status: RoundStatus::NotStarted,
        holes: r2_holes,
    };
    r2.status = round_two_status(&r2, &thru, &mut issues);
    check_reported(&mut r2, r2_reported, &mut issues);

    if let (Some(reported), Some(a), Some(b)) = (tot_reported, r1.total(), r2.total())
        && reported != a + b
    {
        issues.push(ConsistencyError::GrandTotalMismatch {
            reported,
            computed: a + b,
        });
    }

    Ok(NormalizedPlayer {
        record: PlayerRecord {
            player: entry.player.clone(),
            country: entry.country.clone(),
            source_pos: entry.pos.clone(),
            source_to_par: entry.to_par.clone(),
            rounds: [r1, r2],
        },
        issues,
    })
}

fn parse_hole_cells(entry: &RawEntry, round: u8) -> Result<HoleScores, DecodingError> {
    let mut out: HoleScores = [None; HOLES_PER_ROUND];
    for (idx, raw) in entry.holes(round).iter().take(HOLES_PER_ROUND).enumerate() {
        let cell = raw.trim();
        if cell.is_empty() || cell == "-" {
            continue;
        }
        match cell.parse::<u8>() {
            Ok(v) if (1..=MAX_HOLE_STROKES).contains(&v) => out[idx] = Some(v),
            _ => {
                return Err(DecodingError::BadNumber {
                    column: hole_column(round, idx + 1),
                    raw: cell.to_string(),
                });
            }
        }
    }
    Ok(out)
}

fn parse_strokes(raw: Option<&str>, column: &str) -> Result<Option<u16>, DecodingError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty() && *s != "-") else {
        return Ok(None);
    };
    raw.parse::<u16>()
        .map(Some)
        .map_err(|_| DecodingError::BadNumber {
            column: column.to_string(),
            raw: raw.to_string(),
        })
}

fn status_from_holes(holes: &HoleScores) -> RoundStatus {
    let present = holes.iter().filter(|h| h.is_some()).count();
    match present {
        0 => RoundStatus::NotStarted,
        HOLES_PER_ROUND => RoundStatus::Complete,
        _ => RoundStatus::InProgress,
    }
}

fn round_two_status(
    round: &RoundRecord,
    thru: &ThruStatus,
    issues: &mut Vec<ConsistencyError>,
) -> RoundStatus {
    let present = round.holes_played();
    let (side, progress) = match (thru.side(), thru.progress()) {
        (Some(side), Some(progress)) => (side, progress),
        _ => {
            if present == 0 {
                return RoundStatus::NotStarted;
            }
            // Holes without a THRU label cannot be placed in playing order.
            issues.push(ConsistencyError::NonMonotonicHoles {
                round: round.round,
                thru: 0,
                side: Side::Front,
            });
            return RoundStatus::Inconsistent;
        }
    };

    match progress {
        Progress::Finished => {
            if present < HOLES_PER_ROUND {
                issues.push(ConsistencyError::FinishedWithMissingHoles {
                    round: round.round,
                    present,
                });
                RoundStatus::Inconsistent
            } else {
                RoundStatus::Complete
            }
        }
        Progress::Thru(0) if present == 0 => RoundStatus::NotStarted,
        Progress::Thru(n) => {
            let follows_order = side
                .playing_order()
                .enumerate()
                .all(|(played, hole)| round.hole(hole).is_some() == (played < usize::from(n)));
            if !follows_order {
                issues.push(ConsistencyError::NonMonotonicHoles {
                    round: round.round,
                    thru: n,
                    side,
                });
                RoundStatus::Inconsistent
            } else {
                RoundStatus::InProgress
            }
        }
    }
}

fn check_reported(
    round: &mut RoundRecord,
    reported: Option<u16>,
    issues: &mut Vec<ConsistencyError>,
) {
    let (Some(reported), Some(computed)) = (reported, round.total()) else {
        return;
    };
    if reported != computed {
        issues.push(ConsistencyError::RoundTotalMismatch {
            round: round.round,
            reported,
            computed,
        });
        round.status = RoundStatus::Inconsistent;
    }
}
