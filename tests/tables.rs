use std::fs;
use std::path::PathBuf;

use usam_stroke_play::config::PipelineConfig;
use usam_stroke_play::course::OLYMPIC_CLUB;
use usam_stroke_play::export::{REPORT_FILE, export_with_progress};
use usam_stroke_play::fake_field::{FieldSpec, generate_field};
use usam_stroke_play::leaderboard::read_leaderboard;
use usam_stroke_play::pipeline::{BuildOutput, build};
use usam_stroke_play::tables::{self, Table};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_build() -> BuildOutput {
    let raw = read_fixture("leaderboard_small.csv");
    let entries = read_leaderboard(raw.as_bytes()).unwrap();
    build(&entries, &OLYMPIC_CLUB, &PipelineConfig::default()).unwrap()
}

fn cell<'a>(table: &'a Table, row: usize, column: &str) -> &'a str {
    let idx = table
        .column(column)
        .unwrap_or_else(|| panic!("{} has no column {column}", table.name));
    &table.body()[row][idx]
}

fn row_of(table: &Table, player: &str) -> usize {
    table
        .body()
        .iter()
        .position(|r| r[table.column("PLAYER").unwrap()] == player)
        .unwrap_or_else(|| panic!("{player} not in {}", table.name))
}

#[test]
fn enhanced_table_writes_blanks_for_undefined_values() {
    let output = fixture_build();
    let table = tables::enhanced_table(&output.players);
    let echo = row_of(&table, "Echo Five");
    assert_eq!(cell(&table, echo, "TOTAL_SCORE"), "");
    assert_eq!(cell(&table, echo, "POS"), "");
    assert_eq!(cell(&table, echo, "MADE_CUT"), "False");
    assert_eq!(cell(&table, echo, "ROUND_2_SCORE"), "");
    assert_eq!(cell(&table, echo, "ROUND_2_TO_PAR"), "-1");
    assert_eq!(cell(&table, echo, "CONSISTENCY_SCORE"), "");
    assert_eq!(cell(&table, echo, "SCORING_AVERAGE"), "72.00");
    assert_eq!(cell(&table, echo, "HAS_COMPLETE_HOLES"), "False");
    assert_eq!(cell(&table, echo, "MISSING_HOLES_COUNT"), "9");
    assert_eq!(cell(&table, echo, "R2_H10_RESULT"), "");
    assert_eq!(cell(&table, echo, "R2_H2_RESULT"), "BIRDIE");
    assert_eq!(cell(&table, echo, "BEST_NINE_LABEL"), "Ocean Front");

    let alpha = row_of(&table, "Alpha One");
    assert_eq!(cell(&table, alpha, "TOTAL_TO_PAR"), "-2");
    assert_eq!(cell(&table, alpha, "ROUND_2_TO_PAR"), "E");
    assert_eq!(cell(&table, alpha, "PERCENTILE"), "1.0000");
    assert_eq!(cell(&table, alpha, "IMPROVED_R2"), "False");
    assert_eq!(cell(&table, alpha, "R1_BIRDIES"), "2");

    let hotel = row_of(&table, "Hotel Eight");
    assert_eq!(cell(&table, hotel, "R1_PARS"), "");
    assert_eq!(cell(&table, hotel, "R2_BOGEYS"), "1");
    assert_eq!(cell(&table, hotel, "R1_FRONT_TO_PAR"), "");
}

#[test]
fn enhanced_table_carries_nine_and_hole_to_par() {
    let output = fixture_build();
    let table = tables::enhanced_table(&output.players);

    let alpha = row_of(&table, "Alpha One");
    assert_eq!(cell(&table, alpha, "R1_FRONT_TO_PAR"), "-1");
    assert_eq!(cell(&table, alpha, "R1_BACK_TO_PAR"), "-1");
    assert_eq!(cell(&table, alpha, "R1_H1_TO_PAR"), "E");
    assert_eq!(cell(&table, alpha, "R1_H3_TO_PAR"), "-1");

    let echo = row_of(&table, "Echo Five");
    assert_eq!(cell(&table, echo, "R2_FRONT_TO_PAR"), "-1");
    assert_eq!(cell(&table, echo, "R2_BACK_TO_PAR"), "");
    assert_eq!(cell(&table, echo, "R2_H2_TO_PAR"), "-1");
    assert_eq!(cell(&table, echo, "R2_H10_TO_PAR"), "");
}

#[test]
fn per_hole_table_has_two_rows_per_player() {
    let output = fixture_build();
    let table = tables::per_hole_table(&output.players);
    assert_eq!(table.body().len(), output.players.len() * 2);
    assert_eq!(table.header().len(), 6 + 18 + 7);

    let delta = row_of(&table, "Delta Four");
    assert_eq!(cell(&table, delta, "ROUND"), "1");
    assert_eq!(cell(&table, delta, "POS"), "3");
    assert_eq!(cell(&table, delta + 1, "ROUND"), "2");
    assert_eq!(cell(&table, delta + 1, "POS"), "T2");
    assert_eq!(cell(&table, delta + 1, "COURSE"), "Ocean");

    let echo = row_of(&table, "Echo Five");
    assert_eq!(cell(&table, echo + 1, "HOLE_10"), "");
    assert_eq!(cell(&table, echo + 1, "FRONT"), "34");
    assert_eq!(cell(&table, echo + 1, "BACK"), "");
    assert_eq!(cell(&table, echo + 1, "FRONT_TO_PAR"), "-1");
    assert_eq!(cell(&table, echo + 1, "BACK_TO_PAR"), "");
    assert_eq!(cell(&table, echo + 1, "HOLES_PLAYED"), "9");
}

#[test]
fn summary_table_carries_start_sides() {
    let output = fixture_build();
    let table = tables::player_summary_table(&output.players);
    let bravo = row_of(&table, "Bravo Two");
    assert_eq!(cell(&table, bravo, "ROUND_1_START"), "Front");
    assert_eq!(cell(&table, bravo, "ROUND_2_START"), "Back");
    assert_eq!(cell(&table, bravo, "SOURCE_POS"), "T4");
    assert_eq!(cell(&table, bravo, "SOURCE_TO_PAR"), "+2");
    let golf = row_of(&table, "Golf Seven");
    assert_eq!(cell(&table, golf, "ROUND_2_START"), "");
    assert_eq!(cell(&table, golf, "ROUND_2_COURSE"), "Lake");
}

#[test]
fn field_stats_tables_cover_both_courses() {
    let entries = generate_field(&FieldSpec::default());
    let output = build(&entries, &OLYMPIC_CLUB, &PipelineConfig::default()).unwrap();
    let all = tables::all_tables(&output);
    let names: Vec<&str> = all.iter().map(|t| t.name).collect();
    assert_eq!(
        names,
        vec![
            tables::PLAYER_SUMMARY,
            tables::PER_HOLE_SCORES,
            tables::ENHANCED_DATA,
            tables::COURSE_PARS,
            tables::HOLE_STATS,
            tables::STRETCHES,
            tables::CUT_PROXIMITY,
        ]
    );
    let hole_stats = &all[4];
    assert_eq!(hole_stats.body().len(), 36);
    let stretches = &all[5];
    assert_eq!(stretches.body().len(), 6);
    let proximity = &all[6];
    assert_eq!(proximity.body().len(), 4);
}

#[test]
fn export_writes_every_file() {
    let output = fixture_build();
    let all = tables::all_tables(&output);
    let dir = std::env::temp_dir().join(format!("stroke_play_export_{}", std::process::id()));
    let mut messages = Vec::new();
    let summary =
        export_with_progress(&dir, &all, &output.report, false, |p| messages.push(p.message))
            .unwrap();
    assert_eq!(summary.files.len(), all.len() + 1);
    assert_eq!(messages.len(), all.len() + 1);
    assert!(dir.join("ENHANCED_DATA_PROD.csv").exists());
    let report = fs::read_to_string(dir.join(REPORT_FILE)).unwrap();
    assert!(report.contains("\"players_failed\": 1"));
    let enhanced = fs::read_to_string(dir.join("ENHANCED_DATA_PROD.csv")).unwrap();
    assert_eq!(enhanced.lines().count(), output.players.len() + 1);
    let _ = fs::remove_dir_all(&dir);
}
