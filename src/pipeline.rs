use rayon::prelude::*;
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::course::{Course, CourseHole, CourseReference};
use crate::error::{PlayerIssue, ReferenceDataError};
use crate::features::{self, BestNine, DataQuality};
use crate::field_stats::{self, CutProximityRow, RoundChangeSplit};
use crate::leaderboard::RawEntry;
use crate::par::{self, RoundParSummary};
use crate::ranking::{CutLine, Standings};
use crate::rounds::{PlayerRecord, normalize_entry};

pub struct BuildProgress {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// One player with every derived column. Terminal output of a build.
#[derive(Debug, Clone)]
pub struct EnhancedRecord {
    pub record: PlayerRecord,
    pub par: [RoundParSummary; 2],
    pub total: Option<u16>,
    pub total_to_par: Option<i32>,
    pub pos_rank: Option<u32>,
    pub pos: Option<String>,
    pub r1_rank: Option<u32>,
    pub rank_change: Option<i64>,
    pub percentile: Option<f64>,
    pub made_cut: bool,
    pub cut_margin: Option<i32>,
    pub lake_score: Option<u16>,
    pub ocean_score: Option<u16>,
    pub course_differential: Option<i32>,
    pub best_nine: Option<BestNine>,
    pub round_differential: Option<i32>,
    pub improved_r2: Option<bool>,
    pub scoring_average: Option<f64>,
    pub consistency_score: Option<u16>,
    pub quality: DataQuality,
    pub course_sequence: String,
}

impl EnhancedRecord {
    pub fn player(&self) -> &str {
        &self.record.player
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub players_in: usize,
    pub players_built: usize,
    pub players_failed: usize,
    pub ranked: usize,
    pub incomplete_players: usize,
    pub cut_size: usize,
    pub cut_line: Option<CutLine>,
    pub made_cut: usize,
    pub round_change: RoundChangeSplit,
    pub cut_proximity: Vec<CutProximityRow>,
    pub issues: Vec<PlayerIssue>,
}

pub struct BuildOutput {
    pub players: Vec<EnhancedRecord>,
    pub reference: CourseReference,
    pub report: BuildReport,
}

pub fn build(
    entries: &[RawEntry],
    holes: &[CourseHole],
    config: &PipelineConfig,
) -> Result<BuildOutput, ReferenceDataError> {
    build_with_progress(entries, holes, config, |_| {})
}

/// Runs the whole pipeline. Only a bad course reference fails the build;
/// player-level problems land in the report.
pub fn build_with_progress(
    entries: &[RawEntry],
    holes: &[CourseHole],
    config: &PipelineConfig,
    mut on_progress: impl FnMut(BuildProgress),
) -> Result<BuildOutput, ReferenceDataError> {
    let reference = CourseReference::new(holes, config.course_par)?;
    let total = entries.len();

    on_progress(BuildProgress {
        current: 0,
        total,
        message: "Validated course reference".to_string(),
    });

    let normalized: Vec<_> = entries.par_iter().map(normalize_entry).collect();

    let mut issues = Vec::new();
    let mut records = Vec::with_capacity(total);
    for (idx, (entry, result)) in entries.iter().zip(normalized).enumerate() {
        match result {
            Ok(player) => {
                issues.extend(
                    player
                        .issues
                        .iter()
                        .map(|err| PlayerIssue::consistency(&entry.player, err)),
                );
                records.push(player.record);
            }
            Err(err) => issues.push(PlayerIssue::decoding(&entry.player, &err)),
        }
        on_progress(BuildProgress {
            current: idx + 1,
            total,
            message: format!("Normalized: {}", entry.player),
        });
    }

    let totals: Vec<Option<u16>> = records.iter().map(|r| r.total()).collect();
    let r1_scores: Vec<Option<u16>> = records.iter().map(|r| r.rounds[0].total()).collect();
    let standings = Standings::compute(&totals, &r1_scores, config.cut_size);
    let field_par = i32::from(reference.course_par(Course::Lake))
        + i32::from(reference.course_par(Course::Ocean));

    let mut players: Vec<EnhancedRecord> = records
        .into_par_iter()
        .enumerate()
        .map(|(idx, record)| enhance(record, idx, &standings, &reference, field_par))
        .collect();
    players.sort_by(|a, b| {
        let rank_a = a.pos_rank.unwrap_or(u32::MAX);
        let rank_b = b.pos_rank.unwrap_or(u32::MAX);
        rank_a
            .cmp(&rank_b)
            .then_with(|| a.record.player.cmp(&b.record.player))
    });

    on_progress(BuildProgress {
        current: total,
        total,
        message: format!("Ranked {} of {} players", standings.ranked, players.len()),
    });

    let report = BuildReport {
        players_in: total,
        players_built: players.len(),
        players_failed: total - players.len(),
        ranked: standings.ranked,
        incomplete_players: players
            .iter()
            .filter(|p| !p.quality.has_complete_holes)
            .count(),
        cut_size: config.cut_size,
        cut_line: standings.cut,
        made_cut: players.iter().filter(|p| p.made_cut).count(),
        round_change: field_stats::round_change_split(&players),
        cut_proximity: field_stats::cut_proximity(&players),
        issues,
    };

    Ok(BuildOutput {
        players,
        reference,
        report,
    })
}

fn enhance(
    record: PlayerRecord,
    idx: usize,
    standings: &Standings,
    reference: &CourseReference,
    field_par: i32,
) -> EnhancedRecord {
    let par = [
        par::reconcile_round(&record.rounds[0], reference),
        par::reconcile_round(&record.rounds[1], reference),
    ];
    let total = record.total();
    let pos_rank = standings.pos_rank[idx];
    let r1_rank = standings.r1_rank[idx];
    let lake_score = par::course_score(&record, Course::Lake);
    let ocean_score = par::course_score(&record, Course::Ocean);
    let round_differential = features::round_differential(&record);

    EnhancedRecord {
        total_to_par: total.map(|t| i32::from(t) - field_par),
        pos: standings.pos[idx].clone(),
        rank_change: features::rank_change(r1_rank, pos_rank),
        percentile: features::percentile(pos_rank, standings.ranked),
        made_cut: standings.made_cut(total),
        cut_margin: standings.cut_margin(total),
        course_differential: features::course_differential(lake_score, ocean_score),
        best_nine: features::best_nine(&record),
        improved_r2: features::improved_r2(round_differential),
        scoring_average: features::scoring_average(&record),
        consistency_score: features::consistency_score(&record),
        quality: features::data_quality(&record),
        course_sequence: features::course_sequence(&record),
        round_differential,
        lake_score,
        ocean_score,
        pos_rank,
        r1_rank,
        total,
        par,
        record,
    }
}
