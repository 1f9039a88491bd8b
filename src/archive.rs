use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, params};

use crate::pipeline::{BuildOutput, EnhancedRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct StoredSnapshot {
    pub player: String,
    pub pos: Option<String>,
    pub pos_rank: Option<u32>,
    pub total: Option<u16>,
    pub made_cut: bool,
    pub cut_margin: Option<i32>,
    pub missing_holes: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredRun {
    pub run_id: i64,
    pub built_at: String,
    pub source: String,
    pub players: usize,
    pub cut_score: Option<u16>,
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS build_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            built_at TEXT NOT NULL,
            source TEXT NOT NULL,
            players INTEGER NOT NULL,
            ranked INTEGER NOT NULL,
            cut_size INTEGER NOT NULL,
            cut_score INTEGER NULL,
            issues_json TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS player_snapshots (
            run_id INTEGER NOT NULL REFERENCES build_runs(run_id),
            player TEXT NOT NULL,
            country TEXT NOT NULL,
            pos TEXT NULL,
            pos_rank INTEGER NULL,
            total INTEGER NULL,
            made_cut INTEGER NOT NULL,
            cut_margin INTEGER NULL,
            round_1_score INTEGER NULL,
            round_2_score INTEGER NULL,
            missing_holes INTEGER NOT NULL,
            PRIMARY KEY (run_id, player)
        );
        CREATE INDEX IF NOT EXISTS idx_snapshots_player ON player_snapshots(player);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Stores one build. Returns the new run id.
pub fn record_build(conn: &mut Connection, source: &str, output: &BuildOutput) -> Result<i64> {
    let report = &output.report;
    let issues_json = serde_json::to_string(&report.issues).context("serialize build issues")?;

    let tx = conn.transaction().context("begin archive transaction")?;
    tx.execute(
        "INSERT INTO build_runs(built_at, source, players, ranked, cut_size, cut_score, issues_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            Utc::now().to_rfc3339(),
            source,
            output.players.len() as i64,
            report.ranked as i64,
            report.cut_size as i64,
            report.cut_line.map(|c| i64::from(c.score)),
            issues_json,
        ],
    )
    .context("insert build run")?;
    let run_id = tx.last_insert_rowid();

    for player in &output.players {
        insert_snapshot(&tx, run_id, player)?;
    }
    tx.commit().context("commit archive transaction")?;
    Ok(run_id)
}

fn insert_snapshot(conn: &Connection, run_id: i64, p: &EnhancedRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO player_snapshots(
            run_id, player, country, pos, pos_rank, total, made_cut, cut_margin,
            round_1_score, round_2_score, missing_holes
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            run_id,
            p.record.player,
            p.record.country,
            p.pos,
            p.pos_rank,
            p.total,
            p.made_cut as i64,
            p.cut_margin,
            p.record.rounds[0].total(),
            p.record.rounds[1].total(),
            p.quality.missing_holes as i64,
        ],
    )
    .with_context(|| format!("insert snapshot for {}", p.record.player))?;
    Ok(())
}

pub fn load_runs(conn: &Connection) -> Result<Vec<StoredRun>> {
    let mut stmt = conn
        .prepare(
            "SELECT run_id, built_at, source, players, cut_score
             FROM build_runs ORDER BY run_id ASC",
        )
        .context("prepare load runs query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StoredRun {
                run_id: row.get(0)?,
                built_at: row.get(1)?,
                source: row.get(2)?,
                players: row.get::<_, i64>(3)? as usize,
                cut_score: row.get(4)?,
            })
        })
        .context("query load runs")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode run row")?);
    }
    Ok(out)
}

pub fn load_snapshots(conn: &Connection, run_id: i64) -> Result<Vec<StoredSnapshot>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT player, pos, pos_rank, total, made_cut, cut_margin, missing_holes
            FROM player_snapshots
            WHERE run_id = ?1
            ORDER BY pos_rank IS NULL, pos_rank ASC, player ASC
            "#,
        )
        .context("prepare load snapshots query")?;
    let rows = stmt
        .query_map(params![run_id], |row| {
            Ok(StoredSnapshot {
                player: row.get(0)?,
                pos: row.get(1)?,
                pos_rank: row.get(2)?,
                total: row.get(3)?,
                made_cut: row.get::<_, i64>(4)? != 0,
                cut_margin: row.get(5)?,
                missing_holes: row.get(6)?,
            })
        })
        .context("query load snapshots")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode snapshot row")?);
    }
    Ok(out)
}

/// Final-position movement between two archived runs, by player.
pub fn position_moves(before: &[StoredSnapshot], after: &[StoredSnapshot]) -> Vec<(String, i64)> {
    let mut out = Vec::new();
    for snap in after {
        let Some(now) = snap.pos_rank else { continue };
        let Some(prev) = before
            .iter()
            .find(|b| b.player == snap.player)
            .and_then(|b| b.pos_rank)
        else {
            continue;
        };
        out.push((snap.player.clone(), i64::from(prev) - i64::from(now)));
    }
    out
}
