use crate::course::{CourseReference, HOLES_PER_ROUND, Side};
use crate::field_stats::{self, CutProximityRow, HoleStat, Stretch};
use crate::par::{RoundParSummary, ScoringCounts, format_to_par};
use crate::pipeline::{BuildOutput, EnhancedRecord};
use crate::ranking::position_labels;
use crate::rounds::RoundRecord;

pub const PLAYER_SUMMARY: &str = "PLAYER_SUMMARY_PROD";
pub const PER_HOLE_SCORES: &str = "PER_HOLE_SCORES_PROD";
pub const ENHANCED_DATA: &str = "ENHANCED_DATA_PROD";
pub const COURSE_PARS: &str = "COURSE_PARS_PROD";
pub const HOLE_STATS: &str = "HOLE_STATS_PROD";
pub const STRETCHES: &str = "STRETCHES_PROD";
pub const CUT_PROXIMITY: &str = "CUT_PROXIMITY_PROD";

/// A named output table. `rows[0]` is the header.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: &'static str,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(name: &'static str, header: Vec<String>) -> Self {
        Self {
            name,
            rows: vec![header],
        }
    }

    pub fn header(&self) -> &[String] {
        &self.rows[0]
    }

    pub fn body(&self) -> &[Vec<String>] {
        &self.rows[1..]
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.header().iter().position(|h| h == name)
    }
}

pub fn all_tables(output: &BuildOutput) -> Vec<Table> {
    let stats = field_stats::hole_stats(&output.players, &output.reference);
    let stretches = field_stats::hardest_stretches(&stats);
    vec![
        player_summary_table(&output.players),
        per_hole_table(&output.players),
        enhanced_table(&output.players),
        course_pars_table(&output.reference),
        hole_stats_table(&stats),
        stretches_table(&stretches),
        cut_proximity_table(&output.report.cut_proximity),
    ]
}

pub fn player_summary_table(players: &[EnhancedRecord]) -> Table {
    let mut table = Table::new(
        PLAYER_SUMMARY,
        columns(&[
            "POS",
            "POS_RANK",
            "PLAYER",
            "CTRY",
            "ROUND_1_COURSE",
            "ROUND_1_START",
            "ROUND_1_SCORE",
            "ROUND_1_TO_PAR",
            "ROUND_2_COURSE",
            "ROUND_2_START",
            "ROUND_2_SCORE",
            "ROUND_2_TO_PAR",
            "TOTAL_SCORE",
            "TOTAL_TO_PAR",
            "MADE_CUT",
            "SOURCE_POS",
            "SOURCE_TO_PAR",
        ]),
    );
    for p in players {
        let [r1, r2] = &p.record.rounds;
        table.rows.push(vec![
            opt_to_string(p.pos.as_deref()),
            opt_to_string(p.pos_rank),
            p.record.player.clone(),
            p.record.country.clone(),
            r1.course.to_string(),
            side_label(r1.start),
            opt_to_string(r1.total()),
            to_par_label(p.par[0].to_par),
            r2.course.to_string(),
            side_label(r2.start),
            opt_to_string(r2.total()),
            to_par_label(p.par[1].to_par),
            opt_to_string(p.total),
            to_par_label(p.total_to_par),
            bool_label(p.made_cut),
            p.record.source_pos.clone(),
            p.record.source_to_par.clone(),
        ]);
    }
    table
}

/// Two rows per player. POS is the standing after that round.
pub fn per_hole_table(players: &[EnhancedRecord]) -> Table {
    let mut header = columns(&["PLAYER", "CTRY", "ROUND", "COURSE", "START", "POS"]);
    for hole in 1..=HOLES_PER_ROUND {
        header.push(format!("HOLE_{hole}"));
    }
    header.extend(columns(&[
        "FRONT",
        "BACK",
        "TOTAL",
        "TO_PAR",
        "FRONT_TO_PAR",
        "BACK_TO_PAR",
        "HOLES_PLAYED",
    ]));
    let mut table = Table::new(PER_HOLE_SCORES, header);

    let r1_ranks: Vec<Option<u32>> = players.iter().map(|p| p.r1_rank).collect();
    let r1_pos = position_labels(&r1_ranks);

    for (p, r1_pos) in players.iter().zip(r1_pos) {
        for (round, summary) in p.record.rounds.iter().zip(&p.par) {
            let pos = if round.round == 1 {
                r1_pos.clone()
            } else {
                p.pos.clone()
            };
            table.rows.push(per_hole_row(p, round, summary, pos));
        }
    }
    table
}

fn per_hole_row(
    p: &EnhancedRecord,
    round: &RoundRecord,
    summary: &RoundParSummary,
    pos: Option<String>,
) -> Vec<String> {
    let mut row = vec![
        p.record.player.clone(),
        p.record.country.clone(),
        round.round.to_string(),
        round.course.to_string(),
        side_label(round.start),
        pos.unwrap_or_default(),
    ];
    row.extend(round.holes.iter().map(|h| opt_to_string(*h)));
    row.extend([
        opt_to_string(round.front()),
        opt_to_string(round.back()),
        opt_to_string(round.total()),
        to_par_label(summary.to_par),
        to_par_label(summary.front_to_par),
        to_par_label(summary.back_to_par),
        round.holes_played().to_string(),
    ]);
    row
}

pub fn enhanced_table(players: &[EnhancedRecord]) -> Table {
    let mut header = columns(&[
        "POS",
        "POS_RANK",
        "PLAYER",
        "CTRY",
        "MADE_CUT",
        "CUT_MARGIN",
        "TOTAL_SCORE",
        "TOTAL_TO_PAR",
        "PERCENTILE",
        "R1_RANK",
        "RANK_CHANGE",
        "ROUND_1_COURSE",
        "ROUND_1_SCORE",
        "ROUND_1_TO_PAR",
        "ROUND_2_COURSE",
        "ROUND_2_START",
        "ROUND_2_SCORE",
        "ROUND_2_TO_PAR",
        "COURSE_SEQUENCE",
        "LAKE_SCORE",
        "OCEAN_SCORE",
        "COURSE_DIFFERENTIAL",
        "BEST_NINE",
        "BEST_NINE_LABEL",
        "ROUND_DIFFERENTIAL",
        "IMPROVED_R2",
        "SCORING_AVERAGE",
        "CONSISTENCY_SCORE",
        "HAS_COMPLETE_HOLES",
        "MISSING_HOLES_COUNT",
    ]);
    for round in 1..=2 {
        for bucket in ["EAGLES", "BIRDIES", "PARS", "BOGEYS", "DOUBLES_PLUS"] {
            header.push(format!("R{round}_{bucket}"));
        }
        header.push(format!("R{round}_FRONT_TO_PAR"));
        header.push(format!("R{round}_BACK_TO_PAR"));
    }
    for round in 1..=2 {
        for hole in 1..=HOLES_PER_ROUND {
            header.push(format!("R{round}_H{hole}_RESULT"));
        }
    }
    for round in 1..=2 {
        for hole in 1..=HOLES_PER_ROUND {
            header.push(format!("R{round}_H{hole}_TO_PAR"));
        }
    }
    let mut table = Table::new(ENHANCED_DATA, header);

    for p in players {
        let [r1, r2] = &p.record.rounds;
        let mut row = vec![
            opt_to_string(p.pos.as_deref()),
            opt_to_string(p.pos_rank),
            p.record.player.clone(),
            p.record.country.clone(),
            bool_label(p.made_cut),
            opt_to_string(p.cut_margin),
            opt_to_string(p.total),
            to_par_label(p.total_to_par),
            p.percentile.map(|v| format!("{v:.4}")).unwrap_or_default(),
            opt_to_string(p.r1_rank),
            opt_to_string(p.rank_change),
            r1.course.to_string(),
            opt_to_string(r1.total()),
            to_par_label(p.par[0].to_par),
            r2.course.to_string(),
            side_label(r2.start),
            opt_to_string(r2.total()),
            to_par_label(p.par[1].to_par),
            p.course_sequence.clone(),
            opt_to_string(p.lake_score),
            opt_to_string(p.ocean_score),
            opt_to_string(p.course_differential),
            opt_to_string(p.best_nine.map(|b| b.score)),
            p.best_nine.map(|b| b.label()).unwrap_or_default(),
            opt_to_string(p.round_differential),
            p.improved_r2.map(bool_label).unwrap_or_default(),
            p.scoring_average
                .map(|v| format!("{v:.2}"))
                .unwrap_or_default(),
            opt_to_string(p.consistency_score),
            bool_label(p.quality.has_complete_holes),
            p.quality.missing_holes.to_string(),
        ];
        for summary in &p.par {
            row.extend(count_cells(summary.counts));
            row.push(to_par_label(summary.front_to_par));
            row.push(to_par_label(summary.back_to_par));
        }
        for summary in &p.par {
            row.extend(
                summary
                    .results
                    .iter()
                    .map(|r| r.map(|r| r.label().to_string()).unwrap_or_default()),
            );
        }
        for summary in &p.par {
            row.extend(summary.deltas.iter().map(|d| to_par_label(*d)));
        }
        table.rows.push(row);
    }
    table
}

pub fn course_pars_table(reference: &CourseReference) -> Table {
    let mut table = Table::new(COURSE_PARS, columns(&["COURSE", "HOLE", "PAR", "YARDAGE"]));
    for h in reference.holes() {
        table.rows.push(vec![
            h.course.to_string(),
            h.hole.to_string(),
            h.par.to_string(),
            h.yardage.to_string(),
        ]);
    }
    table
}

pub fn hole_stats_table(stats: &[HoleStat]) -> Table {
    let mut table = Table::new(
        HOLE_STATS,
        columns(&[
            "COURSE",
            "HOLE",
            "PAR",
            "YARDAGE",
            "PLAYERS",
            "AVERAGE",
            "AVERAGE_VS_PAR",
            "EAGLES",
            "BIRDIES",
            "PARS",
            "BOGEYS",
            "DOUBLES_PLUS",
        ]),
    );
    for s in stats {
        let mut row = vec![
            s.course.to_string(),
            s.hole.to_string(),
            s.par.to_string(),
            s.yardage.to_string(),
            s.players.to_string(),
            s.average.map(|v| format!("{v:.3}")).unwrap_or_default(),
            s.average_vs_par
                .map(|v| format!("{v:+.3}"))
                .unwrap_or_default(),
        ];
        row.extend(count_cells(Some(s.counts)));
        table.rows.push(row);
    }
    table
}

pub fn stretches_table(stretches: &[Stretch]) -> Table {
    let mut table = Table::new(
        STRETCHES,
        columns(&["COURSE", "FIRST_HOLE", "LAST_HOLE", "LABEL", "VS_PAR"]),
    );
    for s in stretches {
        table.rows.push(vec![
            s.course.to_string(),
            s.first_hole.to_string(),
            s.last_hole.to_string(),
            s.label(),
            format!("{:+.3}", s.vs_par),
        ]);
    }
    table
}

pub fn cut_proximity_table(rows: &[CutProximityRow]) -> Table {
    let mut table = Table::new(
        CUT_PROXIMITY,
        columns(&["MARGIN", "PLAYERS", "MADE", "MISSED"]),
    );
    for r in rows {
        table.rows.push(vec![
            r.margin.to_string(),
            r.players.to_string(),
            r.made.to_string(),
            r.missed.to_string(),
        ]);
    }
    table
}

fn count_cells(counts: Option<ScoringCounts>) -> [String; 5] {
    match counts {
        Some(c) => [
            c.eagles.to_string(),
            c.birdies.to_string(),
            c.pars.to_string(),
            c.bogeys.to_string(),
            c.doubles_plus.to_string(),
        ],
        None => Default::default(),
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn side_label(side: Option<Side>) -> String {
    side.map(|s| s.label().to_string()).unwrap_or_default()
}

fn to_par_label(value: Option<i32>) -> String {
    value.map(format_to_par).unwrap_or_default()
}

fn bool_label(value: bool) -> String {
    let label = if value { "True" } else { "False" };
    label.to_string()
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::DEFAULT_COURSE_PAR;

    #[test]
    fn course_pars_table_lists_both_courses() {
        let reference = CourseReference::bundled(DEFAULT_COURSE_PAR).unwrap();
        let table = course_pars_table(&reference);
        assert_eq!(table.body().len(), 36);
        assert_eq!(table.body()[0][0], "Lake");
        assert_eq!(table.body()[18][0], "Ocean");
        assert_eq!(table.column("YARDAGE"), Some(3));
    }

    #[test]
    fn labels() {
        assert_eq!(bool_label(true), "True");
        assert_eq!(to_par_label(Some(-2)), "-2");
        assert_eq!(to_par_label(None), "");
        assert_eq!(side_label(Some(Side::Back)), "Back");
    }
}
