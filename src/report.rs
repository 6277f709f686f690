//! ワークブック構造サマリ
//!
//! 各シートの日付・開始行と対象列の一覧をまとめ、
//! workbook_structure_<YYYYMMDD>.json として保存する。

use crate::dates::DateAuditor;
use crate::error::Result;
use crate::points::PointFinder;
use crate::workbook::WorkbookData;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// 開始行の値（見つからなかったシートは文言が入る）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowEntry {
    Row(u32),
    Text(String),
}

/// ワークブック構造のスナップショット
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureReport {
    /// シート名 → 日付（テキスト表現、未取得は文言）
    pub dates: BTreeMap<String, String>,
    /// シート名 → 開始行
    pub start_rows: BTreeMap<String, RowEntry>,
    /// 監査対象の列番号
    pub cols: Vec<u32>,
}

impl StructureReport {
    /// 日付検査器と行検索器の結果からサマリを組み立てる
    pub fn build(
        workbook: &WorkbookData,
        dates: &DateAuditor,
        points: &PointFinder,
        cols: Vec<u32>,
    ) -> Self {
        let dates = dates
            .check_all_dates(workbook)
            .into_iter()
            .map(|(name, outcome)| (name, outcome.to_string()))
            .collect();

        let start_rows = points
            .find_all_points(workbook)
            .into_iter()
            .map(|(name, outcome)| {
                let entry = match outcome.as_row() {
                    Some(row) => RowEntry::Row(row),
                    None => RowEntry::Text(outcome.to_string()),
                };
                (name, entry)
            })
            .collect();

        Self {
            dates,
            start_rows,
            cols,
        }
    }

    /// workbook_structure_<YYYYMMDD>.json として保存し、保存先パスを返す
    pub fn save(&self, out_dir: &Path) -> Result<PathBuf> {
        let stamp = Local::now().format("%Y%m%d");
        let path = out_dir.join(format!("workbook_structure_{}.json", stamp));

        let file = File::create(&path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(path)
    }
}
