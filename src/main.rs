use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use usam_stroke_play::archive;
use usam_stroke_play::config::{RunConfig, load_env_files};
use usam_stroke_play::course::{CourseHole, OLYMPIC_CLUB, read_course_holes};
use usam_stroke_play::export;
use usam_stroke_play::leaderboard::read_leaderboard;
use usam_stroke_play::pipeline::{self, BuildOutput};
use usam_stroke_play::tables;

fn main() -> Result<()> {
    load_env_files();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = RunConfig::from_args_and_env(&args)?;

    let input = config
        .input
        .clone()
        .ok_or_else(|| anyhow!("no leaderboard input (pass --input=<csv> or set LEADERBOARD_CSV)"))?;
    let file = File::open(&input).with_context(|| format!("open leaderboard {}", input.display()))?;
    let entries = read_leaderboard(file)
        .with_context(|| format!("read leaderboard {}", input.display()))?;
    eprintln!("[INFO] {} leaderboard rows from {}", entries.len(), input.display());

    let holes = load_course_holes(config.course_pars.as_deref())?;
    let output = pipeline::build_with_progress(&entries, &holes, &config.pipeline, |progress| {
        if progress.current == progress.total || progress.current == 0 {
            eprintln!(
                "[INFO] {}/{} {}",
                progress.current, progress.total, progress.message
            );
        }
    })
    .context("course reference rejected")?;

    let tables = tables::all_tables(&output);
    let summary = export::export_with_progress(
        &config.out_dir,
        &tables,
        &output.report,
        config.xlsx,
        |progress| eprintln!("[INFO] {}", progress.message),
    )?;

    if let Some(db_path) = config.archive_db.as_deref() {
        let mut conn = archive::open_db(db_path)?;
        let run_id = archive::record_build(&mut conn, &input.display().to_string(), &output)?;
        eprintln!("[INFO] archived run {run_id} to {}", db_path.display());
    }

    print_summary(&output);
    println!("Output: {}", config.out_dir.display());
    println!("Files: {} ({} rows)", summary.files.len(), summary.rows);
    Ok(())
}

fn load_course_holes(path: Option<&Path>) -> Result<Vec<CourseHole>> {
    let Some(path) = path else {
        return Ok(OLYMPIC_CLUB.to_vec());
    };
    let file = File::open(path).with_context(|| format!("open course pars {}", path.display()))?;
    let holes =
        read_course_holes(file).with_context(|| format!("read course pars {}", path.display()))?;
    Ok(holes)
}

fn print_summary(output: &BuildOutput) {
    let report = &output.report;
    println!("Stroke play build complete");
    println!(
        "Players: {}/{} built, {} ranked, {} incomplete",
        report.players_built, report.players_in, report.ranked, report.incomplete_players
    );
    match report.cut_line {
        Some(line) => println!(
            "Cut: {} strokes ({} made it, top {} plus ties)",
            line.score, report.made_cut, report.cut_size
        ),
        None => println!("Cut: n/a"),
    }
    println!(
        "R1 -> R2: improved {} tied {} worsened {}",
        report.round_change.improved, report.round_change.tied, report.round_change.worsened
    );
    if let Some(leader) = output.players.first()
        && leader.pos_rank == Some(1)
    {
        println!(
            "Leader: {} {}",
            leader.player(),
            leader.total.map(|t| t.to_string()).unwrap_or_default()
        );
    }
    if !report.issues.is_empty() {
        eprintln!("[WARN] {} player issues", report.issues.len());
        for issue in report.issues.iter().take(10) {
            eprintln!("[WARN]  - {} ({:?}): {}", issue.player, issue.kind, issue.message);
        }
    }
}
