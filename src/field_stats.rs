use std::cmp::Ordering;

use serde::Serialize;

use crate::course::{Course, CourseReference, HOLES_PER_ROUND};
use crate::par::ScoringCounts;
use crate::pipeline::EnhancedRecord;

pub const PROXIMITY_MARGINS: [u32; 4] = [1, 2, 3, 5];
const STRETCH_LEN: u8 = 3;
const STRETCHES_PER_COURSE: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoleStat {
    pub course: Course,
    pub hole: u8,
    pub par: u8,
    pub yardage: u16,
    pub players: u32,
    pub average: Option<f64>,
    pub average_vs_par: Option<f64>,
    pub counts: ScoringCounts,
}

/// Field scoring per (course, hole), taken from every consistent round.
pub fn hole_stats(players: &[EnhancedRecord], reference: &CourseReference) -> Vec<HoleStat> {
    let mut out = Vec::with_capacity(HOLES_PER_ROUND * 2);
    for course in Course::ALL {
        for hole in 1..=HOLES_PER_ROUND as u8 {
            let idx = usize::from(hole - 1);
            let mut strokes = 0u32;
            let mut counts = ScoringCounts::default();
            for player in players {
                for (round, summary) in player.record.rounds.iter().zip(&player.par) {
                    if round.course != course || summary.counts.is_none() {
                        continue;
                    }
                    if let (Some(score), Some(result)) = (round.holes[idx], summary.results[idx]) {
                        strokes += u32::from(score);
                        counts.add(result);
                    }
                }
            }
            let par = reference.par(course, hole);
            let played = counts.total();
            let average = (played > 0).then(|| f64::from(strokes) / f64::from(played));
            out.push(HoleStat {
                course,
                hole,
                par,
                yardage: reference.yardage(course, hole),
                players: played,
                average,
                average_vs_par: average.map(|a| a - f64::from(par)),
                counts,
            });
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stretch {
    pub course: Course,
    pub first_hole: u8,
    pub last_hole: u8,
    pub vs_par: f64,
}

impl Stretch {
    pub fn label(&self) -> String {
        format!("{} {}-{}", self.course, self.first_hole, self.last_hole)
    }
}

/// Top three consecutive-hole runs per course by combined average over par.
pub fn hardest_stretches(stats: &[HoleStat]) -> Vec<Stretch> {
    let mut out = Vec::new();
    for course in Course::ALL {
        let course_stats: Vec<&HoleStat> = stats.iter().filter(|s| s.course == course).collect();
        let mut candidates: Vec<Stretch> = course_stats
            .windows(usize::from(STRETCH_LEN))
            .filter_map(|window| {
                let vs_par = window
                    .iter()
                    .map(|s| s.average_vs_par)
                    .sum::<Option<f64>>()?;
                Some(Stretch {
                    course,
                    first_hole: window[0].hole,
                    last_hole: window[0].hole + STRETCH_LEN - 1,
                    vs_par,
                })
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.vs_par
                .total_cmp(&a.vs_par)
                .then_with(|| a.first_hole.cmp(&b.first_hole))
        });
        out.extend(candidates.into_iter().take(STRETCHES_PER_COURSE));
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CutProximityRow {
    pub margin: u32,
    pub players: usize,
    pub made: usize,
    pub missed: usize,
}

/// Players within each margin of the line, on either side of it.
pub fn cut_proximity(players: &[EnhancedRecord]) -> Vec<CutProximityRow> {
    PROXIMITY_MARGINS
        .iter()
        .map(|&margin| {
            let near: Vec<i32> = players
                .iter()
                .filter_map(|p| p.cut_margin)
                .filter(|m| m.unsigned_abs() <= margin)
                .collect();
            let made = near.iter().filter(|m| **m >= 0).count();
            CutProximityRow {
                margin,
                players: near.len(),
                made,
                missed: near.len() - made,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoundChangeSplit {
    pub improved: usize,
    pub tied: usize,
    pub worsened: usize,
}

pub fn round_change_split(players: &[EnhancedRecord]) -> RoundChangeSplit {
    let mut split = RoundChangeSplit::default();
    for diff in players.iter().filter_map(|p| p.round_differential) {
        match diff.cmp(&0) {
            Ordering::Less => split.improved += 1,
            Ordering::Equal => split.tied += 1,
            Ordering::Greater => split.worsened += 1,
        }
    }
    split
}
