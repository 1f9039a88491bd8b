use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::course::DEFAULT_COURSE_PAR;
use crate::ranking::DEFAULT_CUT_SIZE;

const DEFAULT_OUT_DIR: &str = "out";

/// Knobs that change what the pipeline computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub cut_size: usize,
    /// Par of one course; both courses must match it.
    pub course_par: u16,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cut_size: DEFAULT_CUT_SIZE,
            course_par: DEFAULT_COURSE_PAR,
        }
    }
}

/// Everything the `stroke_play` binary needs, resolved from flags then env.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub pipeline: PipelineConfig,
    pub input: Option<PathBuf>,
    pub course_pars: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub archive_db: Option<PathBuf>,
    pub xlsx: bool,
}

pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

impl RunConfig {
    pub fn from_args_and_env(args: &[String]) -> Result<Self> {
        let cut_size = match arg_value(args, "--cut-size").or_else(|| env_value("CUT_SIZE")) {
            Some(raw) => parse_positive(&raw, "cut size")?,
            None => DEFAULT_CUT_SIZE,
        };
        let course_par = match env_value("COURSE_PAR") {
            Some(raw) => parse_positive(&raw, "COURSE_PAR")?
                .try_into()
                .map_err(|_| anyhow!("COURSE_PAR {raw} out of range"))?,
            None => DEFAULT_COURSE_PAR,
        };

        Ok(Self {
            pipeline: PipelineConfig {
                cut_size,
                course_par,
            },
            input: arg_value(args, "--input")
                .or_else(|| env_value("LEADERBOARD_CSV"))
                .map(PathBuf::from),
            course_pars: arg_value(args, "--pars")
                .or_else(|| env_value("COURSE_PARS_CSV"))
                .map(PathBuf::from),
            out_dir: arg_value(args, "--out")
                .or_else(|| env_value("OUT_DIR"))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
            archive_db: arg_value(args, "--db")
                .or_else(|| env_value("ARCHIVE_DB"))
                .map(PathBuf::from),
            xlsx: has_flag(args, "--xlsx"),
        })
    }
}

/// Accepts both `--name=value` and `--name value`.
pub fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
            && !next.starts_with("--")
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_positive(raw: &str, what: &str) -> Result<usize> {
    let value = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| anyhow!("{what} must be a positive integer, got {raw:?}"))?;
    if value == 0 {
        return Err(anyhow!("{what} must be at least 1"));
    }
    Ok(value)
}
