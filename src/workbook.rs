//! ワークブック読み込みレイヤー
//!
//! calamineで全シートをメモリに展開し、シート順序を保持したまま
//! 1始まりの (行, 列) 参照でセルを読む。

use crate::error::{AuditError, Result};
use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use chrono::NaiveDate;
use std::path::Path;

/// 1シート分のセルデータ
#[derive(Debug, Clone)]
pub struct SheetGrid {
    name: String,
    range: Range<Data>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>, range: Range<Data>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    /// 行ベクタからシートを構築（0始まりの行・列がそのまま絶対位置になる）
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Data>>) -> Self {
        let max_row = rows.len().max(1) as u32 - 1;
        let max_col = rows.iter().map(|r| r.len()).max().unwrap_or(1).max(1) as u32 - 1;
        let mut range = Range::new((0, 0), (max_row, max_col));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                if !value.is_empty() {
                    range.set_value((r as u32, c as u32), value);
                }
            }
        }
        Self::new(name, range)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1始まりの (行, 列) でセルを参照
    pub fn cell(&self, row: u32, col: u32) -> Option<&Data> {
        if row == 0 || col == 0 {
            return None;
        }
        self.range.get_value((row - 1, col - 1))
    }

    /// セルの文字列値（小文字化・前後空白除去、空セルは空文字）
    pub fn cell_text(&self, row: u32, col: u32) -> String {
        match self.cell(row, col) {
            None | Some(Data::Empty) => String::new(),
            Some(data) => data.to_string().trim().to_lowercase(),
        }
    }

    /// セルの生文字列値（正規化なし）
    pub fn cell_raw(&self, row: u32, col: u32) -> String {
        match self.cell(row, col) {
            None | Some(Data::Empty) => String::new(),
            Some(data) => data.to_string(),
        }
    }

    /// 日付型セルをNaiveDateとして読む（日付型でなければNone）
    pub fn cell_date(&self, row: u32, col: u32) -> Option<NaiveDate> {
        self.cell(row, col).and_then(|data| data.as_date())
    }

    /// 絶対位置（0始まり）つきで非空セルを列挙
    pub fn used_cells(&self) -> impl Iterator<Item = (u32, u32, &Data)> {
        let (start_row, start_col) = self.range.start().unwrap_or((0, 0));
        self.range.rows().enumerate().flat_map(move |(r, row)| {
            row.iter().enumerate().filter_map(move |(c, value)| {
                if value.is_empty() {
                    None
                } else {
                    Some((start_row + r as u32, start_col + c as u32, value))
                }
            })
        })
    }
}

/// ワークブック全体（シート順序はファイル内の順序）
#[derive(Debug)]
pub struct WorkbookData {
    sheets: Vec<SheetGrid>,
}

impl WorkbookData {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AuditError::FileNotFound(path.display().to_string()));
        }

        let mut workbook = open_workbook_auto(path)?;
        let names = workbook.sheet_names().to_owned();

        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let range = workbook.worksheet_range(&name)?;
            sheets.push(SheetGrid::new(name, range));
        }

        Ok(Self { sheets })
    }

    pub fn from_sheets(sheets: Vec<SheetGrid>) -> Self {
        Self { sheets }
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheets(&self) -> &[SheetGrid] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetGrid> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn first_sheet(&self) -> Option<&SheetGrid> {
        self.sheets.first()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
