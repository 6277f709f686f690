//! 行マーカー検索
//!
//! 指定列を開始行から下方向に走査し、目印テキストに一致する行を探す。
//! ヘッダ行や集計行の位置特定に使う。

use crate::error::{AuditError, Result};
use crate::workbook::{SheetGrid, WorkbookData};
use std::collections::BTreeMap;
use std::fmt;

/// 走査の上限行（この行の手前まで見る）
pub const SCAN_LIMIT_ROW: u32 = 300;

/// 見つからなかったシートに入る文言
pub const POINT_NOT_FOUND: &str = "Point Not Found";

/// シートごとの検索結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    Row(u32),
    NotFound,
}

impl PointOutcome {
    pub fn as_row(&self) -> Option<u32> {
        match self {
            PointOutcome::Row(row) => Some(*row),
            PointOutcome::NotFound => None,
        }
    }
}

impl fmt::Display for PointOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointOutcome::Row(row) => write!(f, "{}", row),
            PointOutcome::NotFound => write!(f, "{}", POINT_NOT_FOUND),
        }
    }
}

/// 目印テキストによる行位置の検索器
#[derive(Debug, Clone)]
pub struct PointFinder {
    col: u32,
    start_row: u32,
    end_value: String,
    adjustments: Option<i64>,
}

impl PointFinder {
    /// 検索列・開始行・目印テキスト・行補正で初期化
    ///
    /// 目印テキストは構築時に正規化（前後空白除去・小文字化）する。
    pub fn new(
        col: u32,
        start_row: u32,
        end_value: impl Into<String>,
        adjustments: Option<i64>,
    ) -> Result<Self> {
        if col == 0 {
            return Err(AuditError::Input("colは1以上で指定してください".into()));
        }
        if start_row == 0 {
            return Err(AuditError::Input(
                "start_rowは1以上で指定してください".into(),
            ));
        }
        let end_value = end_value.into().trim().to_lowercase();
        if end_value.is_empty() {
            return Err(AuditError::Input("end_valueが空です".into()));
        }
        Ok(Self {
            col,
            start_row,
            end_value,
            adjustments,
        })
    }

    /// 目印テキストに一致する行を返す（補正適用後）
    ///
    /// 走査はSCAN_LIMIT_ROWの手前まで。見つからなければNotFound。
    pub fn find_point(&self, sheet: &SheetGrid) -> Result<u32> {
        let mut row = self.start_row;
        while row < SCAN_LIMIT_ROW {
            if sheet.cell_text(row, self.col) == self.end_value {
                let adjusted = row as i64 + self.adjustments.unwrap_or(0);
                if adjusted < 1 {
                    return Err(AuditError::Input(format!(
                        "補正後の行が範囲外です: {}",
                        adjusted
                    )));
                }
                return Ok(adjusted as u32);
            }
            row += 1;
        }
        Err(AuditError::NotFound(format!(
            "「{}」が{}行目までに見つかりません",
            self.end_value, SCAN_LIMIT_ROW
        )))
    }

    /// 全シートで検索し、見つからないシートは文言で埋める
    pub fn find_all_points(&self, workbook: &WorkbookData) -> BTreeMap<String, PointOutcome> {
        workbook
            .sheets()
            .iter()
            .map(|sheet| {
                let outcome = match self.find_point(sheet) {
                    Ok(row) => PointOutcome::Row(row),
                    Err(_) => PointOutcome::NotFound,
                };
                (sheet.name().to_string(), outcome)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::Data;

    fn sheet_with_marker(name: &str, marker_row: usize, marker: &str) -> SheetGrid {
        let mut rows = vec![vec![Data::String("filler".into())]; marker_row - 1];
        rows.push(vec![Data::String(marker.to_string())]);
        SheetGrid::from_rows(name, rows)
    }

    #[test]
    fn test_new_validates_arguments() {
        assert!(matches!(
            PointFinder::new(0, 1, "total", None),
            Err(AuditError::Input(_))
        ));
        assert!(matches!(
            PointFinder::new(1, 0, "total", None),
            Err(AuditError::Input(_))
        ));
        assert!(matches!(
            PointFinder::new(1, 1, "   ", None),
            Err(AuditError::Input(_))
        ));
    }

    #[test]
    fn test_find_point_case_insensitive() {
        let sheet = sheet_with_marker("S", 5, "  TOTAL ");
        let finder = PointFinder::new(1, 1, "total", None).unwrap();
        assert_eq!(finder.find_point(&sheet).unwrap(), 5);
    }

    #[test]
    fn test_find_point_applies_adjustment() {
        let sheet = sheet_with_marker("S", 5, "total");
        let finder = PointFinder::new(1, 1, "total", Some(2)).unwrap();
        assert_eq!(finder.find_point(&sheet).unwrap(), 7);

        let finder = PointFinder::new(1, 1, "total", Some(-1)).unwrap();
        assert_eq!(finder.find_point(&sheet).unwrap(), 4);
    }

    #[test]
    fn test_find_point_not_found_past_limit() {
        // 300行目以降にあっても対象外
        let sheet = sheet_with_marker("S", 300, "total");
        let finder = PointFinder::new(1, 1, "total", None).unwrap();
        assert!(matches!(
            finder.find_point(&sheet),
            Err(AuditError::NotFound(_))
        ));
    }

    #[test]
    fn test_find_point_found_at_row_299() {
        let sheet = sheet_with_marker("S", 299, "total");
        let finder = PointFinder::new(1, 1, "total", None).unwrap();
        assert_eq!(finder.find_point(&sheet).unwrap(), 299);
    }

    #[test]
    fn test_find_point_absent_marker() {
        let sheet = sheet_with_marker("S", 5, "subtotal");
        let finder = PointFinder::new(1, 1, "total", None).unwrap();
        assert!(matches!(
            finder.find_point(&sheet),
            Err(AuditError::NotFound(_))
        ));
    }

    #[test]
    fn test_find_all_points_uses_sentinel() {
        let wb = WorkbookData::from_sheets(vec![
            sheet_with_marker("S1", 3, "total"),
            sheet_with_marker("S2", 4, "something else"),
        ]);
        let finder = PointFinder::new(1, 1, "total", None).unwrap();
        let points = finder.find_all_points(&wb);

        assert_eq!(points["S1"], PointOutcome::Row(3));
        assert_eq!(points["S2"], PointOutcome::NotFound);
        assert_eq!(points["S2"].to_string(), POINT_NOT_FOUND);
    }
}
