use std::fmt;

use serde::Serialize;

use crate::course::{Course, Side};
use crate::rounds::PlayerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BestNine {
    pub score: u16,
    pub course: Course,
    pub side: Side,
}

impl BestNine {
    pub fn label(&self) -> String {
        format!("{} {}", self.course, self.side)
    }
}

impl fmt::Display for BestNine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.score, self.label())
    }
}

/// Lowest complete nine across both rounds. Ties keep the earliest segment
/// (R1 front, R1 back, R2 front, R2 back).
pub fn best_nine(player: &PlayerRecord) -> Option<BestNine> {
    let mut best: Option<BestNine> = None;
    for round in &player.rounds {
        for side in [Side::Front, Side::Back] {
            let Some(score) = round.nine(side) else {
                continue;
            };
            if best.is_none_or(|b| score < b.score) {
                best = Some(BestNine {
                    score,
                    course: round.course,
                    side,
                });
            }
        }
    }
    best
}

/// Round 2 minus round 1, both complete.
pub fn round_differential(player: &PlayerRecord) -> Option<i32> {
    let r1 = player.rounds[0].total()?;
    let r2 = player.rounds[1].total()?;
    Some(i32::from(r2) - i32::from(r1))
}

pub fn improved_r2(differential: Option<i32>) -> Option<bool> {
    differential.map(|d| d < 0)
}

pub fn scoring_average(player: &PlayerRecord) -> Option<f64> {
    let totals: Vec<f64> = player
        .rounds
        .iter()
        .filter_map(|r| r.total())
        .map(f64::from)
        .collect();
    if totals.is_empty() {
        return None;
    }
    Some(totals.iter().sum::<f64>() / totals.len() as f64)
}

/// Absolute gap between the two round totals. Lower is steadier.
pub fn consistency_score(player: &PlayerRecord) -> Option<u16> {
    round_differential(player).map(|d| d.unsigned_abs() as u16)
}

/// `1 - (rank - 1) / field`: the leader sits at 1.0, the last group nears 0.
pub fn percentile(rank: Option<u32>, field: usize) -> Option<f64> {
    let rank = rank?;
    if field == 0 {
        return None;
    }
    Some(1.0 - f64::from(rank - 1) / field as f64)
}

/// Positive when the player climbed between the round-1 board and the final board.
pub fn rank_change(r1_rank: Option<u32>, pos_rank: Option<u32>) -> Option<i64> {
    Some(i64::from(r1_rank?) - i64::from(pos_rank?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataQuality {
    pub has_complete_holes: bool,
    pub missing_holes: usize,
}

pub fn data_quality(player: &PlayerRecord) -> DataQuality {
    let missing_holes: usize = player.rounds.iter().map(|r| r.missing_holes()).sum();
    DataQuality {
        has_complete_holes: missing_holes == 0,
        missing_holes,
    }
}

/// `Lake-Ocean` or `Ocean-Lake`.
pub fn course_sequence(player: &PlayerRecord) -> String {
    format!("{}-{}", player.rounds[0].course, player.rounds[1].course)
}

/// Ocean minus Lake. Negative means the player went lower on Ocean.
pub fn course_differential(lake: Option<u16>, ocean: Option<u16>) -> Option<i32> {
    Some(i32::from(ocean?) - i32::from(lake?))
}
