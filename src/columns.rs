//! 列ヘッダ照合
//!
//! 各シートの指定行・指定列のセル値を正規化して読み出し、
//! 先頭シートをマスタとして不一致を検出する。

use crate::error::{AuditError, Result};
use crate::workbook::{SheetGrid, WorkbookData};
use std::collections::{BTreeMap, HashMap};

/// 列位置の集合に対する照合器
#[derive(Debug, Clone)]
pub struct ColumnComparator {
    column_values: Vec<u32>,
}

impl ColumnComparator {
    /// 照合対象の列番号（1始まり）で初期化
    pub fn new(column_values: Vec<u32>) -> Result<Self> {
        if column_values.is_empty() {
            return Err(AuditError::Input("列番号リストが空です".into()));
        }
        if column_values.iter().any(|&c| c == 0) {
            return Err(AuditError::Input("列番号は1以上で指定してください".into()));
        }
        Ok(Self { column_values })
    }

    pub fn column_values(&self) -> &[u32] {
        &self.column_values
    }

    /// 指定行の各列のセル値（小文字化・空白除去済み）を返す
    pub fn values_at(&self, sheet: &SheetGrid, row: u32) -> Vec<String> {
        self.column_values
            .iter()
            .map(|&col| sheet.cell_text(row, col))
            .collect()
    }

    /// マスタ値と不一致のあるインデックスのマスタ値を返す
    fn compare_values(master_list: &[String], sheet_list: &[String]) -> Vec<String> {
        master_list
            .iter()
            .zip(sheet_list.iter())
            .filter(|(m, s)| m != s)
            .map(|(m, _)| m.clone())
            .collect()
    }

    /// 全シートの列値を先頭シートのマスタ値と照合する
    ///
    /// 戻り値はシート名ごとの不一致リスト。不一致がなければ空リスト。
    /// start_rowsに載っていないシートがあればエラー。
    pub fn compare_all(
        &self,
        workbook: &WorkbookData,
        start_rows: &HashMap<String, u32>,
    ) -> Result<BTreeMap<String, Vec<String>>> {
        let first = workbook
            .first_sheet()
            .ok_or_else(|| AuditError::Input("ワークブックにシートがありません".into()))?;

        for name in workbook.sheet_names() {
            if !start_rows.contains_key(&name) {
                return Err(AuditError::Input(format!(
                    "シート「{}」の開始行が指定されていません",
                    name
                )));
            }
        }

        let master_list = self.values_at(first, start_rows[first.name()]);

        let mut disparity_map: BTreeMap<String, Vec<String>> = workbook
            .sheet_names()
            .into_iter()
            .map(|name| (name, Vec::new()))
            .collect();

        for sheet in workbook.sheets().iter().skip(1) {
            let sheet_list = self.values_at(sheet, start_rows[sheet.name()]);
            let disparities = Self::compare_values(&master_list, &sheet_list);
            if !disparities.is_empty() {
                disparity_map
                    .entry(sheet.name().to_string())
                    .or_default()
                    .extend(disparities);
            }
        }

        Ok(disparity_map)
    }
}
