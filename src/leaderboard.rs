use std::io::{Read, Write};

use anyhow::{Context, Result, anyhow};
use csv::StringRecord;

use crate::course::HOLES_PER_ROUND;

/// One scraped leaderboard row, as text. Consumed once by the round normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub pos: String,
    pub country: String,
    pub player: String,
    pub to_par: String,
    pub thru: Option<String>,
    pub r1_course: Option<String>,
    pub r1_strokes: Option<String>,
    pub r2_strokes: Option<String>,
    pub total_strokes: Option<String>,
    pub r1_holes: Vec<String>,
    pub r2_holes: Vec<String>,
}

impl RawEntry {
    pub fn holes(&self, round: u8) -> &[String] {
        if round == 1 {
            &self.r1_holes
        } else {
            &self.r2_holes
        }
    }
}

pub fn hole_column(round: u8, hole: usize) -> String {
    format!("R{round}_H{hole}")
}

pub fn leaderboard_header() -> Vec<String> {
    let mut header = [
        "POS", "CTRY", "PLAYER", "TO_PAR", "THRU", "R1_COURSE", "R1", "R2", "TOT",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect::<Vec<_>>();
    for round in 1..=2u8 {
        for hole in 1..=HOLES_PER_ROUND {
            header.push(hole_column(round, hole));
        }
    }
    header
}

struct Columns {
    pos: usize,
    country: usize,
    player: usize,
    to_par: usize,
    thru: Option<usize>,
    r1_course: Option<usize>,
    r1: Option<usize>,
    r2: Option<usize>,
    tot: Option<usize>,
    holes: [[usize; HOLES_PER_ROUND]; 2],
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let need = |name: &str| find(name).ok_or_else(|| anyhow!("leaderboard missing column {name}"));

        let mut holes = [[0usize; HOLES_PER_ROUND]; 2];
        for round in 1..=2u8 {
            for hole in 1..=HOLES_PER_ROUND {
                holes[usize::from(round - 1)][hole - 1] = need(&hole_column(round, hole))?;
            }
        }

        Ok(Self {
            pos: need("POS")?,
            country: need("CTRY")?,
            player: need("PLAYER")?,
            to_par: need("TO_PAR")?,
            thru: find("THRU"),
            r1_course: find("R1_COURSE"),
            r1: find("R1"),
            r2: find("R2"),
            tot: find("TOT"),
            holes,
        })
    }
}

pub fn read_leaderboard<R: Read>(rdr: R) -> Result<Vec<RawEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr);
    let headers = reader.headers().context("read leaderboard header")?.clone();
    let cols = Columns::from_headers(&headers)?;

    let mut out = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read leaderboard row {}", idx + 1))?;
        let text = |i: usize| record.get(i).unwrap_or("").to_string();
        let optional = |i: Option<usize>| {
            i.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let player = text(cols.player);
        if player.is_empty() {
            continue;
        }
        out.push(RawEntry {
            pos: text(cols.pos),
            country: text(cols.country),
            player,
            to_par: text(cols.to_par),
            thru: optional(cols.thru),
            r1_course: optional(cols.r1_course),
            r1_strokes: optional(cols.r1),
            r2_strokes: optional(cols.r2),
            total_strokes: optional(cols.tot),
            r1_holes: cols.holes[0].iter().map(|i| text(*i)).collect(),
            r2_holes: cols.holes[1].iter().map(|i| text(*i)).collect(),
        });
    }
    Ok(out)
}

pub fn write_leaderboard<W: Write>(wtr: W, entries: &[RawEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(wtr);
    writer
        .write_record(leaderboard_header())
        .context("write leaderboard header")?;
    for entry in entries {
        let mut row = vec![
            entry.pos.clone(),
            entry.country.clone(),
            entry.player.clone(),
            entry.to_par.clone(),
            entry.thru.clone().unwrap_or_default(),
            entry.r1_course.clone().unwrap_or_default(),
            entry.r1_strokes.clone().unwrap_or_default(),
            entry.r2_strokes.clone().unwrap_or_default(),
            entry.total_strokes.clone().unwrap_or_default(),
        ];
        for round in 1..=2u8 {
            let cells = entry.holes(round);
            for hole in 0..HOLES_PER_ROUND {
                row.push(cells.get(hole).cloned().unwrap_or_default());
            }
        }
        writer
            .write_record(&row)
            .with_context(|| format!("write leaderboard row for {}", entry.player))?;
    }
    writer.flush().context("flush leaderboard")?;
    Ok(())
}
