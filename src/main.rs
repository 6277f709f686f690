use clap::Parser;
use regex::Regex;
use sheet_audit::{cli, columns, compiler, config, dates, error, points, report, workbook, writer};
use cli::{Cli, Commands};
use config::Config;
use error::{AuditError, Result};
use std::collections::HashMap;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Columns { workbook, cols, row } => {
            println!("📊 sheet-audit - 列ヘッダ照合\n");

            let wb = workbook::WorkbookData::open(&workbook)?;
            println!("✔ {}シートを読み込み\n", wb.sheets().len());

            let comparator = columns::ColumnComparator::new(cols)?;
            let start_rows: HashMap<String, u32> =
                wb.sheet_names().into_iter().map(|name| (name, row)).collect();
            let disparities = comparator.compare_all(&wb, &start_rows)?;

            let mut mismatch_count = 0;
            for (sheet, values) in &disparities {
                if values.is_empty() {
                    if cli.verbose {
                        println!("  {} : 一致", sheet);
                    }
                } else {
                    mismatch_count += 1;
                    println!("  {} : 不一致 {:?}", sheet, values);
                }
            }

            if mismatch_count == 0 {
                println!("\n✅ 全シートのヘッダが一致しました");
            } else {
                println!("\n⚠ {}シートで不一致がありました", mismatch_count);
            }
        }

        Commands::Dates {
            workbook,
            row,
            col,
            format,
            separator,
            index_pos,
            gap_days,
            source_dir,
            file_pattern,
        } => {
            println!("📅 sheet-audit - 日付検査\n");

            let wb = workbook::WorkbookData::open(&workbook)?;
            let cell = (
                row.unwrap_or(config.date_cell.0),
                col.unwrap_or(config.date_cell.1),
            );

            let mut auditor = dates::DateAuditor::new(cell)?;
            let format = format.unwrap_or_else(|| config.date_format.clone());
            if format != "-" {
                auditor = auditor.with_format(format);
            }
            if let Some(separator) = separator {
                auditor = auditor.with_split(separator, index_pos)?;
            }

            println!("[1/4] 日付を取得中...");
            let date_map = auditor.check_all_dates(&wb);
            for (sheet, outcome) in &date_map {
                println!("  {} : {}", sheet, outcome);
            }
            let all_found = date_map.values().all(|o| o.as_date().is_some());
            if !all_found {
                println!("\n⚠ 日付が取得できないシートがあるため以降の検査をスキップします");
                return Ok(());
            }

            println!("\n[2/4] 重複を検査中...");
            let duplicates = auditor.find_duplicates(&wb, Some(&date_map))?;
            if duplicates.is_empty() {
                println!("✔ 重複なし");
            } else {
                for (date, sheets) in &duplicates {
                    println!("  {} : {:?}", date, sheets);
                }
            }

            println!("\n[3/4] 順序を検査中...");
            match auditor.relative_order(&wb, Some(&date_map))? {
                None => println!("✔ シート順と日付順が一致"),
                Some(drift) => {
                    println!("  実際の順序: {:?}", drift.actual_order);
                    println!("  日付順: {:?}", drift.implied_order);
                }
            }

            println!("\n[4/4] 連続性を検査中...");
            let threshold = gap_days.unwrap_or(config.discontinuity_days);
            let gaps = auditor.discontinuities(threshold, &wb, Some(&date_map))?;
            if gaps.is_empty() {
                println!("✔ {}日を超える間隔なし", threshold);
            } else {
                for (prev, next) in &gaps {
                    println!("  {} → {} の間に{}日超の間隔", prev, next, threshold);
                }
            }

            if let (Some(dir), Some(pattern)) = (source_dir, file_pattern) {
                println!("\n[追加] ファイル名と照合中...");
                let pattern = Regex::new(&pattern)
                    .map_err(|e| AuditError::Input(format!("正規表現が不正です: {}", e)))?;
                let files = compiler::SheetCompiler::new(&dir)?.file_list()?;
                let checks = auditor.cross_check_filenames(&wb, &files, &pattern);
                for (sheet, check) in &checks {
                    match check {
                        dates::FilenameCheck::Match(date) => {
                            println!("  {} : 一致 ({})", sheet, date)
                        }
                        dates::FilenameCheck::Mismatch {
                            sheet_date,
                            file_date,
                        } => println!(
                            "  {} : 不一致 シート={} ファイル={}",
                            sheet, sheet_date, file_date
                        ),
                        dates::FilenameCheck::Unparseable(text) => {
                            println!("  {} : ファイル名の日付を解釈できません ({})", sheet, text)
                        }
                        dates::FilenameCheck::NoFileMatch => {
                            println!("  {} : 対応ファイルなし", sheet)
                        }
                        dates::FilenameCheck::SheetDateMissing => {
                            println!("  {} : シート側の日付なし", sheet)
                        }
                    }
                }
            }

            println!("\n✅ 日付検査完了");
        }

        Commands::Points {
            workbook,
            col,
            start_row,
            marker,
            adjust,
        } => {
            println!("🔍 sheet-audit - 行マーカー検索\n");

            let wb = workbook::WorkbookData::open(&workbook)?;
            let start_row = start_row.unwrap_or(config.default_start_row);
            let finder = points::PointFinder::new(col, start_row, marker, adjust)?;

            let results = finder.find_all_points(&wb);
            for (sheet, outcome) in &results {
                println!("  {} : {}", sheet, outcome);
            }

            println!("\n✅ 検索完了");
        }

        Commands::Compile {
            folder,
            output,
            sub1,
            sub2,
        } => {
            println!("📦 sheet-audit - シート集約\n");

            let compiler = compiler::SheetCompiler::new(&folder)?;

            println!("[1/2] ファイル一覧を取得中...");
            let files = compiler.file_list()?;
            println!("✔ {}ファイルを検出\n", files.len());

            println!("[2/2] 集約中...");
            let report = compiler.compile(&files, &output, &sub1, sub2.as_deref())?;
            println!("✔ {}シートを複写\n", report.compiled.len());

            if cli.verbose {
                for (file, sheet) in &report.compiled {
                    println!("  {} → {}", file, sheet);
                }
            }

            println!("{}", report.message());
            println!("\n✅ 出力: {}", report.output_path.display());
        }

        Commands::Structure {
            workbook,
            cols,
            marker_col,
            marker,
            format,
            out_dir,
        } => {
            println!("🗂 sheet-audit - 構造サマリ\n");

            let wb = workbook::WorkbookData::open(&workbook)?;
            let mut auditor = dates::DateAuditor::new(config.date_cell)?;
            auditor = auditor.with_format(format.unwrap_or_else(|| config.date_format.clone()));
            let finder =
                points::PointFinder::new(marker_col, config.default_start_row, marker, None)?;

            let report = report::StructureReport::build(&wb, &auditor, &finder, cols);

            let out_dir = out_dir.unwrap_or_else(|| {
                workbook
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| std::path::PathBuf::from("."))
            });
            let path = report.save(&out_dir)?;

            println!("✅ 保存: {}", path.display());
        }

        Commands::Rename {
            workbook,
            prefix,
            output,
        } => {
            println!("✏ sheet-audit - 連番リネーム\n");

            let wb = workbook::WorkbookData::open(&workbook)?;
            let names = writer::rename_sheets(&wb, &prefix, &output)?;

            for (old, new) in wb.sheet_names().iter().zip(names.iter()) {
                println!("  {} → {}", old, new);
            }
            println!("\n✅ 出力: {}", output.display());
        }

        Commands::Config {
            set_gap_days,
            set_date_format,
            show,
        } => {
            let mut config = config;
            let mut changed = false;

            if let Some(days) = set_gap_days {
                config.discontinuity_days = days;
                changed = true;
            }
            if let Some(format) = set_date_format {
                config.date_format = format;
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  日付セル: ({}, {})", config.date_cell.0, config.date_cell.1);
                println!("  日付フォーマット: {}", config.date_format);
                println!("  連続性しきい値: {}日", config.discontinuity_days);
                println!("  検索開始行: {}", config.default_start_row);
            }
        }
    }

    Ok(())
}
