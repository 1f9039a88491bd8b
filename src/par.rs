use serde::Serialize;

use crate::course::{Course, CourseReference, HOLES_PER_ROUND};
use crate::rounds::{PlayerRecord, RoundRecord, RoundStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HoleResult {
    EagleOrBetter,
    Birdie,
    Par,
    Bogey,
    DoubleOrWorse,
}

impl HoleResult {
    pub fn from_delta(delta: i32) -> Self {
        match delta {
            i32::MIN..=-2 => HoleResult::EagleOrBetter,
            -1 => HoleResult::Birdie,
            0 => HoleResult::Par,
            1 => HoleResult::Bogey,
            _ => HoleResult::DoubleOrWorse,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HoleResult::EagleOrBetter => "EAGLE_OR_BETTER",
            HoleResult::Birdie => "BIRDIE",
            HoleResult::Par => "PAR",
            HoleResult::Bogey => "BOGEY",
            HoleResult::DoubleOrWorse => "DOUBLE_OR_WORSE",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoringCounts {
    pub eagles: u32,
    pub birdies: u32,
    pub pars: u32,
    pub bogeys: u32,
    pub doubles_plus: u32,
}

impl ScoringCounts {
    pub fn add(&mut self, result: HoleResult) {
        match result {
            HoleResult::EagleOrBetter => self.eagles += 1,
            HoleResult::Birdie => self.birdies += 1,
            HoleResult::Par => self.pars += 1,
            HoleResult::Bogey => self.bogeys += 1,
            HoleResult::DoubleOrWorse => self.doubles_plus += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.eagles + self.birdies + self.pars + self.bogeys + self.doubles_plus
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundParSummary {
    pub deltas: [Option<i32>; HOLES_PER_ROUND],
    pub results: [Option<HoleResult>; HOLES_PER_ROUND],
    /// `None` for an inconsistent round: its holes are shown but never aggregated.
    pub counts: Option<ScoringCounts>,
    /// Sum over played holes only; `None` when nothing has been played.
    pub to_par: Option<i32>,
    pub front_to_par: Option<i32>,
    pub back_to_par: Option<i32>,
}

pub fn reconcile_round(round: &RoundRecord, reference: &CourseReference) -> RoundParSummary {
    let mut deltas = [None; HOLES_PER_ROUND];
    let mut results = [None; HOLES_PER_ROUND];
    let mut counts = ScoringCounts::default();

    for hole in 1..=HOLES_PER_ROUND as u8 {
        let Some(score) = round.hole(hole) else {
            continue;
        };
        let delta = i32::from(score) - i32::from(reference.par(round.course, hole));
        let result = HoleResult::from_delta(delta);
        let idx = usize::from(hole - 1);
        deltas[idx] = Some(delta);
        results[idx] = Some(result);
        counts.add(result);
    }

    if round.status == RoundStatus::Inconsistent {
        return RoundParSummary {
            deltas,
            results,
            counts: None,
            to_par: None,
            front_to_par: None,
            back_to_par: None,
        };
    }

    RoundParSummary {
        to_par: sum_present(deltas.iter()),
        front_to_par: sum_present(deltas[..9].iter()),
        back_to_par: sum_present(deltas[9..].iter()),
        deltas,
        results,
        counts: Some(counts),
    }
}

fn sum_present<'a>(deltas: impl Iterator<Item = &'a Option<i32>>) -> Option<i32> {
    deltas
        .flatten()
        .fold(None, |acc, d| Some(acc.unwrap_or(0) + d))
}

/// Strokes over the player's complete rounds on `course`.
pub fn course_score(player: &PlayerRecord, course: Course) -> Option<u16> {
    player
        .rounds
        .iter()
        .filter(|r| r.course == course)
        .filter_map(|r| r.total())
        .fold(None, |acc, t| Some(acc.unwrap_or(0) + t))
}

/// `E`, `+3`, `-2`.
pub fn format_to_par(value: i32) -> String {
    match value {
        0 => "E".to_string(),
        v if v > 0 => format!("+{v}"),
        v => v.to_string(),
    }
}
