use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use usam_stroke_play::config::{arg_value, load_env_files};
use usam_stroke_play::fake_field::{FieldSpec, generate_field};
use usam_stroke_play::leaderboard::write_leaderboard;

fn main() -> Result<()> {
    load_env_files();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let defaults = FieldSpec::default();

    let spec = FieldSpec {
        players: parse_arg(&args, "--players")?.unwrap_or(defaults.players),
        mid_round: parse_arg(&args, "--mid-round")?.unwrap_or(defaults.mid_round),
        seed: parse_arg(&args, "--seed")?.unwrap_or(defaults.seed),
    };
    let out = arg_value(&args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("leaderboard.csv"));

    let entries = generate_field(&spec);
    let file = File::create(&out).with_context(|| format!("create {}", out.display()))?;
    write_leaderboard(file, &entries)?;

    println!(
        "Wrote {} players ({} mid-round, seed {}) to {}",
        entries.len(),
        spec.mid_round.min(spec.players),
        spec.seed,
        out.display()
    );
    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], name: &str) -> Result<Option<T>> {
    let Some(raw) = arg_value(args, name) else {
        return Ok(None);
    };
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| anyhow!("{name} expects a number, got {raw:?}"))
}
