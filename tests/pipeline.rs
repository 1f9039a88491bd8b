use std::fs;
use std::path::PathBuf;

use usam_stroke_play::config::PipelineConfig;
use usam_stroke_play::course::{Course, OLYMPIC_CLUB, Side};
use usam_stroke_play::error::IssueKind;
use usam_stroke_play::fake_field::{FieldSpec, generate_field};
use usam_stroke_play::leaderboard::{RawEntry, read_leaderboard};
use usam_stroke_play::pipeline::{BuildOutput, EnhancedRecord, build};
use usam_stroke_play::rounds::RoundStatus;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn small_board(cut_size: usize) -> BuildOutput {
    let raw = read_fixture("leaderboard_small.csv");
    let entries = read_leaderboard(raw.as_bytes()).expect("fixture should parse");
    let config = PipelineConfig {
        cut_size,
        ..PipelineConfig::default()
    };
    build(&entries, &OLYMPIC_CLUB, &config).expect("bundled reference is valid")
}

fn find<'a>(output: &'a BuildOutput, name: &str) -> &'a EnhancedRecord {
    output
        .players
        .iter()
        .find(|p| p.player() == name)
        .unwrap_or_else(|| panic!("{name} missing from build"))
}

fn pars(course: Course) -> Vec<u8> {
    OLYMPIC_CLUB
        .iter()
        .filter(|h| h.course == course)
        .map(|h| h.par)
        .collect()
}

/// Spreads `to_par` one stroke per hole from hole 1.
fn round_cells(course: Course, to_par: i32) -> Vec<String> {
    let mut holes: Vec<i32> = pars(course).into_iter().map(i32::from).collect();
    let step = to_par.signum();
    for hole in holes.iter_mut().take(to_par.unsigned_abs() as usize) {
        *hole += step;
    }
    holes.iter().map(|h| h.to_string()).collect()
}

fn complete_entry(player: &str, r1_course: Course, r1_total: i32, r2_total: i32) -> RawEntry {
    let r2_course = r1_course.complement();
    RawEntry {
        pos: String::new(),
        country: "USA".to_string(),
        player: player.to_string(),
        to_par: String::new(),
        thru: Some(format!("{r2_course} F")),
        r1_course: None,
        r1_strokes: None,
        r2_strokes: None,
        total_strokes: None,
        r1_holes: round_cells(r1_course, r1_total - 70),
        r2_holes: round_cells(r2_course, r2_total - 70),
    }
}

#[test]
fn two_under_after_sixty_eight_and_seventy() {
    let output = small_board(64);
    let alpha = find(&output, "Alpha One");
    assert_eq!(alpha.total, Some(138));
    assert_eq!(alpha.par[0].to_par, Some(-2));
    assert_eq!(alpha.par[1].to_par, Some(0));
    assert_eq!(alpha.total_to_par, Some(-2));
    assert_eq!(alpha.round_differential, Some(2));
    assert_eq!(alpha.improved_r2, Some(false));
    assert_eq!(alpha.record.rounds[0].course, Course::Ocean);
    assert_eq!(alpha.record.rounds[1].course, Course::Lake);
    assert_eq!(alpha.ocean_score, Some(68));
    assert_eq!(alpha.lake_score, Some(70));
    assert_eq!(alpha.course_differential, Some(-2));
    assert_eq!(alpha.course_sequence, "Ocean-Lake");
    assert_eq!(alpha.pos.as_deref(), Some("1"));
    assert_eq!(alpha.percentile, Some(1.0));
    let r1 = alpha.par[0].counts.unwrap();
    assert_eq!((r1.birdies, r1.pars), (2, 16));
}

#[test]
fn tie_shares_rank_and_label() {
    let output = small_board(64);
    let charlie = find(&output, "Charlie Three");
    let delta = find(&output, "Delta Four");
    let bravo = find(&output, "Bravo Two");
    assert_eq!(charlie.pos_rank, Some(2));
    assert_eq!(delta.pos_rank, Some(2));
    assert_eq!(charlie.pos.as_deref(), Some("T2"));
    assert_eq!(bravo.pos_rank, Some(3));
    assert_eq!(bravo.pos.as_deref(), Some("3"));
    assert_eq!(charlie.percentile, Some(0.75));
    assert_eq!(bravo.percentile, Some(0.5));
    assert_eq!(delta.rank_change, Some(1));
    assert_eq!(bravo.rank_change, Some(1));

    let eagles = charlie.par[1].counts.unwrap();
    assert_eq!((eagles.eagles, eagles.doubles_plus), (1, 1));
    assert_eq!(bravo.record.rounds[1].start, Some(Side::Back));
}

#[test]
fn small_cut_includes_players_on_the_line() {
    let output = small_board(2);
    let line = output.report.cut_line.unwrap();
    assert_eq!(line.score, 140);
    assert_eq!(line.size, 3);
    for name in ["Charlie Three", "Delta Four"] {
        let p = find(&output, name);
        assert!(p.made_cut);
        assert_eq!(p.cut_margin, Some(0));
    }
    let bravo = find(&output, "Bravo Two");
    assert!(!bravo.made_cut);
    assert_eq!(bravo.cut_margin, Some(-2));
    assert_eq!(output.report.made_cut, 3);
}

#[test]
fn mid_round_player_keeps_round_one() {
    let output = small_board(64);
    let echo = find(&output, "Echo Five");
    assert!(!echo.quality.has_complete_holes);
    assert_eq!(echo.quality.missing_holes, 9);
    assert_eq!(echo.record.rounds[1].status, RoundStatus::InProgress);
    assert_eq!(echo.record.rounds[1].total(), None);
    assert_eq!(echo.record.rounds[0].total(), Some(72));
    assert_eq!(echo.total, None);
    assert_eq!(echo.pos_rank, None);
    assert!(!echo.made_cut);
    assert_eq!(echo.scoring_average, Some(72.0));
    assert_eq!(echo.consistency_score, None);
    assert_eq!(echo.par[1].to_par, Some(-1));
    assert_eq!(echo.par[1].back_to_par, None);
    assert_eq!(echo.best_nine.map(|b| b.score), Some(34));
    assert_eq!(echo.best_nine.map(|b| b.label()).as_deref(), Some("Ocean Front"));
}

#[test]
fn bad_rows_are_reported_not_fatal() {
    let output = small_board(64);
    let report = &output.report;
    assert_eq!(report.players_in, 8);
    assert_eq!(report.players_built, 7);
    assert_eq!(report.players_failed, 1);
    assert_eq!(report.ranked, 4);

    let foxtrot = report
        .issues
        .iter()
        .find(|i| i.player == "Foxtrot Six")
        .expect("decoding issue for Foxtrot");
    assert_eq!(foxtrot.kind, IssueKind::Decoding);
    assert!(foxtrot.message.contains("Cypress"));

    let hotel = find(&output, "Hotel Eight");
    assert_eq!(hotel.record.rounds[0].status, RoundStatus::Inconsistent);
    assert_eq!(hotel.par[0].counts, None);
    assert!(hotel.record.rounds[1].is_complete());
    assert_eq!(hotel.total, None);
    assert!(
        report
            .issues
            .iter()
            .any(|i| i.player == "Hotel Eight" && i.kind == IssueKind::Consistency)
    );

    let golf = find(&output, "Golf Seven");
    assert_eq!(golf.record.rounds[1].course, Course::Lake);
    assert_eq!(golf.record.rounds[1].status, RoundStatus::NotStarted);
    assert_eq!(golf.quality.missing_holes, 18);
}

#[test]
fn not_started_without_course_is_its_own_issue_kind() {
    let raw = read_fixture("leaderboard_small.csv");
    let mut entries = read_leaderboard(raw.as_bytes()).unwrap();
    let golf = entries
        .iter_mut()
        .find(|e| e.player == "Golf Seven")
        .unwrap();
    golf.r1_course = None;
    let output = build(&entries, &OLYMPIC_CLUB, &PipelineConfig::default()).unwrap();

    let issue = output
        .report
        .issues
        .iter()
        .find(|i| i.player == "Golf Seven")
        .expect("issue for Golf");
    assert_eq!(issue.kind, IssueKind::UnresolvedCourse);
    assert!(
        output
            .report
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::Decoding)
            .all(|i| i.player == "Foxtrot Six")
    );
}

#[test]
fn ranked_players_lead_unranked_follow_by_name() {
    let output = small_board(64);
    let names: Vec<&str> = output.players.iter().map(|p| p.player()).collect();
    assert_eq!(
        names,
        vec![
            "Alpha One",
            "Charlie Three",
            "Delta Four",
            "Bravo Two",
            "Echo Five",
            "Golf Seven",
            "Hotel Eight",
        ]
    );
}

#[test]
fn cut_tie_at_the_boundary_lets_everyone_through() {
    let mut entries = Vec::new();
    for i in 0..62 {
        let total = 130 + (i % 10);
        entries.push(complete_entry(&format!("Inside {i:02}"), Course::Lake, 68, total - 68));
    }
    for i in 0..4 {
        entries.push(complete_entry(&format!("Line {i}"), Course::Ocean, 71, 69));
    }
    for i in 0..5 {
        entries.push(complete_entry(&format!("Outside {i}"), Course::Lake, 72, 70 + i));
    }

    let output = build(&entries, &OLYMPIC_CLUB, &PipelineConfig::default()).unwrap();
    let line = output.report.cut_line.unwrap();
    assert_eq!(line.score, 140);
    assert_eq!(line.size, 66);
    assert!(line.size > 64);
    for p in output.players.iter().filter(|p| p.player().starts_with("Line")) {
        assert_eq!(p.total, Some(140));
        assert!(p.made_cut);
        assert_eq!(p.cut_margin, Some(0));
    }
    for p in output.players.iter().filter(|p| p.player().starts_with("Outside")) {
        assert!(!p.made_cut);
        assert!(p.cut_margin.unwrap() < 0);
    }
}

#[test]
fn rebuild_is_identical() {
    let a = small_board(64);
    let b = small_board(64);
    let a_tables = usam_stroke_play::tables::all_tables(&a);
    let b_tables = usam_stroke_play::tables::all_tables(&b);
    assert_eq!(a_tables, b_tables);
    assert_eq!(
        serde_json::to_string(&a.report).unwrap(),
        serde_json::to_string(&b.report).unwrap()
    );
}

#[test]
fn broken_reference_fails_the_build() {
    let raw = read_fixture("leaderboard_small.csv");
    let entries = read_leaderboard(raw.as_bytes()).unwrap();
    let holes: Vec<_> = OLYMPIC_CLUB.iter().copied().filter(|h| h.hole != 18).collect();
    assert!(build(&entries, &holes, &PipelineConfig::default()).is_err());
}

#[test]
fn generated_field_holds_round_invariants() {
    let entries = generate_field(&FieldSpec::default());
    let output = build(&entries, &OLYMPIC_CLUB, &PipelineConfig::default()).unwrap();
    assert_eq!(output.players.len(), entries.len());

    for p in &output.players {
        let [r1, r2] = &p.record.rounds;
        assert_ne!(r1.course, r2.course, "{}", p.player());

        for round in [r1, r2] {
            if round.is_complete() {
                assert_eq!(round.holes_played(), 18);
                assert_eq!(
                    round.front().unwrap() + round.back().unwrap(),
                    round.total().unwrap(),
                    "{} round {}",
                    p.player(),
                    round.round
                );
            }
        }

        let segments: Vec<(u16, Course, Side)> = [r1, r2]
            .into_iter()
            .flat_map(|round| {
                [Side::Front, Side::Back]
                    .into_iter()
                    .filter_map(move |side| round.nine(side).map(|s| (s, round.course, side)))
            })
            .collect();
        let lowest = segments.iter().map(|s| s.0).min();
        assert_eq!(p.best_nine.map(|b| b.score), lowest, "{}", p.player());
        if let Some(best) = p.best_nine {
            let first = segments
                .iter()
                .find(|s| s.0 == best.score)
                .unwrap();
            assert_eq!((best.course, best.side), (first.1, first.2));
            assert_eq!(best.label(), format!("{} {}", first.1, first.2));
        }
    }
}
