use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::pipeline::BuildReport;
use crate::tables::Table;

pub const REPORT_FILE: &str = "BUILD_REPORT.json";
pub const WORKBOOK_FILE: &str = "STROKE_PLAY_PROD.xlsx";

pub struct ExportSummary {
    pub files: Vec<PathBuf>,
    pub rows: usize,
}

pub struct ExportProgress {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// Writes every table as `{name}.csv`, the JSON report, and optionally one workbook.
pub fn export_with_progress(
    dir: &Path,
    tables: &[Table],
    report: &BuildReport,
    xlsx: bool,
    mut on_progress: impl FnMut(ExportProgress),
) -> Result<ExportSummary> {
    fs::create_dir_all(dir).with_context(|| format!("create output dir {}", dir.display()))?;

    let total = tables.len() + 1 + usize::from(xlsx);
    let mut current = 0usize;
    let mut files = Vec::with_capacity(total);
    let mut rows = 0usize;

    for table in tables {
        let path = write_csv(dir, table)?;
        rows += table.body().len();
        current += 1;
        on_progress(ExportProgress {
            current,
            total,
            message: format!("Wrote {} ({} rows)", table.name, table.body().len()),
        });
        files.push(path);
    }

    files.push(write_report(dir, report)?);
    current += 1;
    on_progress(ExportProgress {
        current,
        total,
        message: "Wrote build report".to_string(),
    });

    if xlsx {
        let path = dir.join(WORKBOOK_FILE);
        export_workbook(&path, tables)?;
        current += 1;
        on_progress(ExportProgress {
            current,
            total,
            message: format!("Wrote workbook {}", path.display()),
        });
        files.push(path);
    }

    Ok(ExportSummary { files, rows })
}

pub fn write_csv(dir: &Path, table: &Table) -> Result<PathBuf> {
    let path = dir.join(format!("{}.csv", table.name));
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("create {}", path.display()))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(path)
}

pub fn write_report(dir: &Path, report: &BuildReport) -> Result<PathBuf> {
    let path = dir.join(REPORT_FILE);
    let json = serde_json::to_string_pretty(report).context("serialize build report")?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

pub fn export_workbook(path: &Path, tables: &[Table]) -> Result<()> {
    let mut workbook = Workbook::new();
    for table in tables {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(table.name))?;
        write_rows(sheet, &table.rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn sheet_name(table: &str) -> &str {
    table.strip_suffix("_PROD").unwrap_or(table)
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet.write_string(row_idx as u32, col_idx as u16, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_names_drop_suffix() {
        assert_eq!(sheet_name("PLAYER_SUMMARY_PROD"), "PLAYER_SUMMARY");
        assert_eq!(sheet_name("OTHER"), "OTHER");
    }
}
