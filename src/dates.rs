//! 日付検査
//!
//! 各シートの固定セルから日付を取り出し、重複・順序・連続性を検査する。
//! セル値が文字列の場合はフォーマット指定（必要なら分割ルール）で変換する。

use crate::error::{AuditError, Result};
use crate::workbook::{SheetGrid, WorkbookData};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

/// 日付が取れなかったシートに入る文言
pub const DATE_NOT_FOUND: &str = "Date not found on this sheet";

/// シートごとの日付取得結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOutcome {
    Found(NaiveDate),
    Missing,
}

impl DateOutcome {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            DateOutcome::Found(date) => Some(*date),
            DateOutcome::Missing => None,
        }
    }
}

impl fmt::Display for DateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateOutcome::Found(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DateOutcome::Missing => write!(f, "{}", DATE_NOT_FOUND),
        }
    }
}

/// シート順の並びと日付順の並びの食い違い
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDrift {
    /// 実際のシート順のうち、日付順と食い違う位置の名前
    pub actual_order: Vec<String>,
    /// 日付が示唆する順序のうち、実際と食い違う位置の名前
    pub implied_order: Vec<String>,
}

/// ファイル名照合の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameCheck {
    /// シート上の日付とファイル名中の日付が一致
    Match(NaiveDate),
    /// 双方とも取得できたが不一致
    Mismatch {
        sheet_date: NaiveDate,
        file_date: NaiveDate,
    },
    /// ファイル名から抽出した文字列が日付として解釈できない
    Unparseable(String),
    /// シート名に対応するファイルが見つからない／正規表現が一致しない
    NoFileMatch,
    /// シート側の日付が取得できない
    SheetDateMissing,
}

/// 固定セル位置の日付検査器
#[derive(Debug, Clone)]
pub struct DateAuditor {
    date_cell: (u32, u32),
    strp_format: Option<String>,
    separator: Option<String>,
    index_pos: usize,
}

impl DateAuditor {
    /// 日付セル参照（1始まりの行・列）で初期化
    pub fn new(date_cell: (u32, u32)) -> Result<Self> {
        if date_cell.0 == 0 || date_cell.1 == 0 {
            return Err(AuditError::Input(
                "date_cellは1以上の行・列で指定してください".into(),
            ));
        }
        Ok(Self {
            date_cell,
            strp_format: None,
            separator: None,
            index_pos: 0,
        })
    }

    /// セル値を文字列として解釈するときのchronoフォーマット
    pub fn with_format(mut self, strp_format: impl Into<String>) -> Self {
        self.strp_format = Some(strp_format.into());
        self
    }

    /// セル値を分割してから解釈する場合の区切り文字と位置
    ///
    /// フォーマット未指定のまま分割ルールだけ渡すのはエラー。
    pub fn with_split(mut self, separator: impl Into<String>, index_pos: usize) -> Result<Self> {
        if self.strp_format.is_none() {
            return Err(AuditError::Input(
                "分割ルールにはstrp_formatの指定が必要です".into(),
            ));
        }
        self.separator = Some(separator.into());
        self.index_pos = index_pos;
        Ok(self)
    }

    /// シート上の日付セルをNaiveDateに変換する
    ///
    /// フォーマット未指定なら日付型セルのみ変換対象。変換できなければNone。
    pub fn cell_to_date(&self, sheet: &SheetGrid) -> Option<NaiveDate> {
        let (row, col) = self.date_cell;

        let format = match &self.strp_format {
            None => return sheet.cell_date(row, col),
            Some(format) => format,
        };

        let raw = sheet.cell_raw(row, col);
        let candidate = match &self.separator {
            None => raw.trim().to_string(),
            Some(separator) => raw
                .split(separator.as_str())
                .nth(self.index_pos)?
                .trim()
                .to_string(),
        };

        NaiveDate::parse_from_str(&candidate, format).ok()
    }

    /// 全シートの日付取得結果（シート名→結果）
    pub fn check_all_dates(&self, workbook: &WorkbookData) -> BTreeMap<String, DateOutcome> {
        workbook
            .sheets()
            .iter()
            .map(|sheet| {
                let outcome = match self.cell_to_date(sheet) {
                    Some(date) => DateOutcome::Found(date),
                    None => DateOutcome::Missing,
                };
                (sheet.name().to_string(), outcome)
            })
            .collect()
    }

    /// 全シートで日付が取得できていることを確認し、シート順の(名前, 日付)列を返す
    fn dated_sheets(
        &self,
        workbook: &WorkbookData,
        date_map: Option<&BTreeMap<String, DateOutcome>>,
    ) -> Result<Vec<(String, NaiveDate)>> {
        let computed;
        let map = match date_map {
            Some(map) => map,
            None => {
                computed = self.check_all_dates(workbook);
                &computed
            }
        };

        let mut dated = Vec::new();
        for name in workbook.sheet_names() {
            let outcome = map.get(&name).copied().unwrap_or(DateOutcome::Missing);
            match outcome.as_date() {
                Some(date) => dated.push((name, date)),
                None => {
                    return Err(AuditError::Input(format!(
                        "シート「{}」の日付が取得できません。check_all_datesで確認してください",
                        name
                    )));
                }
            }
        }
        Ok(dated)
    }

    /// 複数シートに現れる日付を検出する（日付→該当シート名のリスト）
    pub fn find_duplicates(
        &self,
        workbook: &WorkbookData,
        date_map: Option<&BTreeMap<String, DateOutcome>>,
    ) -> Result<BTreeMap<NaiveDate, Vec<String>>> {
        let dated = self.dated_sheets(workbook, date_map)?;

        let mut by_date: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
        for (name, date) in dated {
            by_date.entry(date).or_default().push(name);
        }
        by_date.retain(|_, sheets| sheets.len() > 1);
        Ok(by_date)
    }

    /// 日付が示唆するシート順と実際のシート順を突き合わせる
    ///
    /// 一致していればNone。重複日付があると結果は安定しない。
    pub fn relative_order(
        &self,
        workbook: &WorkbookData,
        date_map: Option<&BTreeMap<String, DateOutcome>>,
    ) -> Result<Option<OrderDrift>> {
        let dated = self.dated_sheets(workbook, date_map)?;

        let actual: Vec<String> = dated.iter().map(|(name, _)| name.clone()).collect();
        let mut sorted = dated.clone();
        sorted.sort_by_key(|(_, date)| *date);
        let implied: Vec<String> = sorted.into_iter().map(|(name, _)| name).collect();

        if actual == implied {
            return Ok(None);
        }

        let drift = OrderDrift {
            actual_order: actual
                .iter()
                .zip(implied.iter())
                .filter(|(a, i)| a != i)
                .map(|(a, _)| a.clone())
                .collect(),
            implied_order: actual
                .iter()
                .zip(implied.iter())
                .filter(|(a, i)| a != i)
                .map(|(_, i)| i.clone())
                .collect(),
        };
        Ok(Some(drift))
    }

    /// 隣接シート間の日付差がしきい値（日数）を超える箇所を返す
    pub fn discontinuities(
        &self,
        discontinuity_days: i64,
        workbook: &WorkbookData,
        date_map: Option<&BTreeMap<String, DateOutcome>>,
    ) -> Result<Vec<(String, String)>> {
        let dated = self.dated_sheets(workbook, date_map)?;

        let mut gaps = Vec::new();
        for pair in dated.windows(2) {
            let (ref prev_name, prev_date) = pair[0];
            let (ref name, date) = pair[1];
            if (date - prev_date).num_days() > discontinuity_days {
                gaps.push((prev_name.clone(), name.clone()));
            }
        }
        Ok(gaps)
    }

    /// シート上の日付とファイル名から抽出した日付を突き合わせる
    ///
    /// シート名（小文字化）を含むファイル名を対応ファイルとみなし、
    /// patternの最初のキャプチャ（なければ一致全体）を日付文字列として
    /// strp_formatで解釈、失敗時はフォールバックで一般的な形式を試す。
    pub fn cross_check_filenames(
        &self,
        workbook: &WorkbookData,
        filenames: &[String],
        pattern: &Regex,
    ) -> BTreeMap<String, FilenameCheck> {
        let mut results = BTreeMap::new();

        for sheet in workbook.sheets() {
            let sheet_date = match self.cell_to_date(sheet) {
                Some(date) => date,
                None => {
                    results.insert(sheet.name().to_string(), FilenameCheck::SheetDateMissing);
                    continue;
                }
            };

            let needle = sheet.name().to_lowercase();
            let matching_file = filenames
                .iter()
                .find(|f| f.to_lowercase().contains(&needle));

            let extracted = matching_file.and_then(|f| {
                pattern.captures(f).map(|caps| {
                    caps.get(1)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_else(|| caps[0].to_string())
                })
            });

            let check = match extracted {
                None => FilenameCheck::NoFileMatch,
                Some(text) => match self.parse_with_fallback(&text) {
                    None => FilenameCheck::Unparseable(text),
                    Some(file_date) if file_date == sheet_date => FilenameCheck::Match(file_date),
                    Some(file_date) => FilenameCheck::Mismatch {
                        sheet_date,
                        file_date,
                    },
                },
            };
            results.insert(sheet.name().to_string(), check);
        }

        results
    }

    fn parse_with_fallback(&self, text: &str) -> Option<NaiveDate> {
        if let Some(format) = &self.strp_format {
            if let Ok(date) = NaiveDate::parse_from_str(text.trim(), format) {
                return Some(date);
            }
        }
        fuzzy_parse_date(text)
    }
}

/// 代表的な日付表記を順に試すフォールバックパーサ
pub fn fuzzy_parse_date(text: &str) -> Option<NaiveDate> {
    lazy_static! {
        static ref YMD_RE: Regex =
            Regex::new(r"(\d{4})[-/._](\d{1,2})[-/._](\d{1,2})").unwrap();
    }

    let text = text.trim();

    const FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y%m%d",
        "%d-%m-%Y",
        "%d/%m/%Y",
        "%d.%m.%Y",
        "%d %b %Y",
        "%b %d %Y",
        "%Y年%m月%d日",
    ];
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    // 形式が揃わない場合でも年月日の並びが拾えれば採用する
    if let Some(caps) = YMD_RE.captures(text) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}
