//! シート集約
//!
//! フォルダ内の各ワークブックから部分文字列で特定した1シートを
//! 新しいワークブックへ複写する。処理対象のファイル一覧は
//! 集約前にJSONマニフェストとして保存する。

use crate::error::{AuditError, Result};
use crate::workbook::WorkbookData;
use crate::writer;
use chrono::Local;
use rust_xlsxwriter::Workbook;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm"];

/// 集約結果のレポート
#[derive(Debug)]
pub struct CompileReport {
    pub output_path: PathBuf,
    /// 複写できたファイルと出力先でのシート名
    pub compiled: Vec<(String, String)>,
    /// シートを特定できなかった・読めなかったファイル
    pub unsuccessful: Vec<String>,
}

impl CompileReport {
    /// 成否に応じた利用者向けメッセージ
    pub fn message(&self) -> String {
        if self.unsuccessful.is_empty() {
            "全ファイルのシート集約に成功しました".to_string()
        } else {
            format!(
                "次のファイルでは複写対象のシートを一意に特定できませんでした:\n{}",
                self.unsuccessful.join("\n")
            )
        }
    }
}

/// フォルダ単位のシート集約器
#[derive(Debug)]
pub struct SheetCompiler {
    dir: PathBuf,
}

impl SheetCompiler {
    pub fn new(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(AuditError::FolderNotFound(dir.display().to_string()));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// フォルダ直下のワークブックファイル名をソートして返す
    ///
    /// Excelの一時ファイル（~$始まり）は除外する。
    pub fn file_list(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension() else {
                continue;
            };
            let ext = ext.to_string_lossy().to_lowercase();
            if !WORKBOOK_EXTENSIONS.iter().any(|&e| e == ext) {
                continue;
            }
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if file_name.starts_with("~$") {
                continue;
            }
            files.push(file_name);
        }

        files.sort();
        Ok(files)
    }

    /// 処理対象ファイルのマニフェストをJSONで保存し、保存先パスを返す
    ///
    /// ファイル名は final_file_list_dict_<YYYYMMDD>.json。
    pub fn write_manifest(&self, files: &[String]) -> Result<PathBuf> {
        let label = self
            .dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.dir.display().to_string());

        let mut manifest: BTreeMap<String, Vec<String>> = BTreeMap::new();
        manifest.insert(label, files.to_vec());

        let stamp = Local::now().format("%Y%m%d");
        let path = self.dir.join(format!("final_file_list_dict_{}.json", stamp));

        let file = File::create(&path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &manifest)?;
        Ok(path)
    }

    /// 部分文字列で複写対象のシートを一意に特定する
    fn select_sheet(
        workbook: &WorkbookData,
        sub_string1: &str,
        sub_string2: Option<&str>,
    ) -> Result<String> {
        let sub1 = sub_string1.to_lowercase();
        let sub2 = sub_string2.map(|s| s.to_lowercase());

        let selected: Vec<String> = workbook
            .sheet_names()
            .into_iter()
            .filter(|name| {
                let lowered = name.to_lowercase();
                lowered.contains(&sub1)
                    && sub2.as_ref().map_or(true, |s| lowered.contains(s))
            })
            .collect();

        match selected.as_slice() {
            [single] => Ok(single.clone()),
            [] => Err(AuditError::SheetNotFound(format!(
                "部分文字列「{}」に一致するシートがありません",
                sub_string1
            ))),
            multiple => Err(AuditError::SheetNotFound(format!(
                "部分文字列「{}」に一致するシートが{}件あり一意に特定できません",
                sub_string1,
                multiple.len()
            ))),
        }
    }

    /// 各ワークブックから特定した1シートを新しいワークブックへ集約する
    ///
    /// ファイルはリストの逆順で処理する。シートを特定できないファイルは
    /// レポートのunsuccessfulに積み、処理全体は中断しない。
    /// 集約前にwrite_manifestでファイル一覧を保存する。
    pub fn compile(
        &self,
        file_list: &[String],
        new_wkbk_name: &str,
        sub_string1: &str,
        sub_string2: Option<&str>,
    ) -> Result<CompileReport> {
        if new_wkbk_name.trim().is_empty() {
            return Err(AuditError::Input("出力ワークブック名が空です".into()));
        }

        self.write_manifest(file_list)?;

        let output_path = self.dir.join(new_wkbk_name);
        let mut out = Workbook::new();
        let mut used_names: HashSet<String> = HashSet::new();
        let mut compiled = Vec::new();
        let mut unsuccessful = Vec::new();

        for file_name in file_list.iter().rev() {
            let path = self.dir.join(file_name);
            let source = match WorkbookData::open(&path) {
                Ok(wb) => wb,
                Err(_) => {
                    unsuccessful.push(file_name.clone());
                    continue;
                }
            };

            let sheet_name = match Self::select_sheet(&source, sub_string1, sub_string2) {
                Ok(name) => name,
                Err(_) => {
                    unsuccessful.push(file_name.clone());
                    continue;
                }
            };

            let Some(grid) = source.sheet(&sheet_name) else {
                unsuccessful.push(file_name.clone());
                continue;
            };
            let target_name = match writer::unique_sheet_name(&sheet_name, &used_names) {
                Ok(name) => name,
                Err(_) => {
                    unsuccessful.push(file_name.clone());
                    continue;
                }
            };

            let worksheet = out.add_worksheet();
            worksheet.set_name(&target_name)?;
            writer::copy_grid(worksheet, grid)?;
            used_names.insert(target_name.to_lowercase());
            compiled.push((file_name.clone(), target_name));
        }

        out.save(&output_path)?;

        Ok(CompileReport {
            output_path,
            compiled,
            unsuccessful,
        })
    }
}
