//! ワークブック書き出しレイヤー
//!
//! rust_xlsxwriterでシートデータを新しいワークブックへ複写する。
//! シート名の衝突はタイムスタンプ由来のサフィックスで回避する。

use crate::error::{AuditError, Result};
use crate::workbook::{SheetGrid, WorkbookData};
use calamine::Data;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Excelのシート名上限（31文字）に収めるための基部長
const RENAME_BASE_LEN: usize = 24;

/// 衝突回避の試行回数上限
const RENAME_ATTEMPTS: u128 = 5;

/// シートのセル内容を出力先ワークシートへ複写する
///
/// 日付型セルはISO形式の文字列として書き出す。エラー型セルは複写しない。
pub fn copy_grid(worksheet: &mut Worksheet, grid: &SheetGrid) -> Result<()> {
    for (row, col, data) in grid.used_cells() {
        let col = col as u16;
        match data {
            Data::String(s) => {
                worksheet.write_string(row, col, s)?;
            }
            Data::DateTimeIso(s) | Data::DurationIso(s) => {
                worksheet.write_string(row, col, s)?;
            }
            Data::Float(f) => {
                worksheet.write_number(row, col, *f)?;
            }
            Data::Int(i) => {
                worksheet.write_number(row, col, *i as f64)?;
            }
            Data::Bool(b) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(datetime) => {
                    worksheet.write_string(
                        row,
                        col,
                        &datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
                    )?;
                }
                None => {
                    worksheet.write_number(row, col, dt.as_f64())?;
                }
            },
            Data::Empty | Data::Error(_) => {}
        }
    }
    Ok(())
}

/// 使用済み名と衝突しないシート名を返す
///
/// 衝突時はエポックミリ秒由来の5桁サフィックスで試行する。
/// usedの照合は小文字化した名前で行う（Excelのシート名は大文字小文字を区別しない）。
pub fn unique_sheet_name(base: &str, used: &HashSet<String>) -> Result<String> {
    if !used.contains(&base.to_lowercase()) {
        return Ok(base.to_string());
    }

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    let trunc: String = base.chars().take(RENAME_BASE_LEN).collect();
    for attempt in 0..RENAME_ATTEMPTS {
        let candidate = format!("{}_{:05}", trunc, (stamp + attempt) % 100_000);
        if !used.contains(&candidate.to_lowercase()) {
            return Ok(candidate);
        }
    }

    Err(AuditError::NotFound(format!(
        "シート名「{}」の衝突を回避できません",
        base
    )))
}

/// 連番シート名を生成する（prefix01〜prefix99）
pub fn serial_names(prefix: &str, count: usize) -> Result<Vec<String>> {
    if count > 99 {
        return Err(AuditError::Input(
            "連番リネームは99シートまでです".into(),
        ));
    }
    Ok((1..=count).map(|i| format!("{}{:02}", prefix, i)).collect())
}

/// 全シートを連番名に付け替えたコピーを書き出し、新しい名前を返す
pub fn rename_sheets(workbook: &WorkbookData, prefix: &str, out_path: &Path) -> Result<Vec<String>> {
    let names = serial_names(prefix, workbook.sheets().len())?;

    let mut out = Workbook::new();
    for (grid, name) in workbook.sheets().iter().zip(names.iter()) {
        let worksheet = out.add_worksheet();
        worksheet.set_name(name)?;
        copy_grid(worksheet, grid)?;
    }
    out.save(out_path)?;

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name_no_collision() {
        let used = HashSet::new();
        assert_eq!(unique_sheet_name("Data", &used).unwrap(), "Data");
    }

    #[test]
    fn test_unique_name_collision_gets_suffix() {
        let mut used = HashSet::new();
        used.insert("data".to_string());
        let name = unique_sheet_name("Data", &used).unwrap();

        assert_ne!(name, "Data");
        assert!(name.starts_with("Data_"));
        assert!(name.len() <= 31);
    }

    #[test]
    fn test_unique_name_case_insensitive() {
        let mut used = HashSet::new();
        used.insert("summary".to_string());
        let name = unique_sheet_name("SUMMARY", &used).unwrap();
        assert!(name.starts_with("SUMMARY_"));
    }

    #[test]
    fn test_unique_name_truncates_long_base() {
        let mut used = HashSet::new();
        let long = "a".repeat(31);
        used.insert(long.clone());
        let name = unique_sheet_name(&long, &used).unwrap();
        assert!(name.len() <= 31);
    }

    #[test]
    fn test_serial_names_two_digit() {
        let names = serial_names("wk", 3).unwrap();
        assert_eq!(names, vec!["wk01", "wk02", "wk03"]);

        let names = serial_names("wk", 12).unwrap();
        assert_eq!(names[9], "wk10");
        assert_eq!(names[11], "wk12");
    }

    #[test]
    fn test_serial_names_capped_at_99() {
        assert!(serial_names("wk", 99).is_ok());
        assert!(matches!(
            serial_names("wk", 100),
            Err(AuditError::Input(_))
        ));
    }
}
