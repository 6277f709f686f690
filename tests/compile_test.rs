//! シート集約の統合テスト

use rust_xlsxwriter::Workbook;
use sheet_audit::{SheetCompiler, WorkbookData};
use std::path::Path;
use tempfile::tempdir;

/// 指定した名前のシートを持つワークブックを生成する
fn build_source(dir: &Path, file_name: &str, sheet_names: &[&str]) {
    let mut workbook = Workbook::new();
    for name in sheet_names {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        worksheet.write_string(0, 0, *name).unwrap();
        worksheet.write_number(1, 0, 42.0).unwrap();
    }
    workbook.save(dir.join(file_name)).unwrap();
}

#[test]
fn test_file_list_only_workbooks_sorted() {
    let dir = tempdir().unwrap();
    build_source(dir.path(), "b.xlsx", &["Data"]);
    build_source(dir.path(), "a.xlsx", &["Data"]);
    std::fs::write(dir.path().join("note.txt"), "memo").unwrap();
    std::fs::write(dir.path().join("~$a.xlsx"), "lock").unwrap();

    let compiler = SheetCompiler::new(dir.path()).unwrap();
    let files = compiler.file_list().unwrap();
    assert_eq!(files, vec!["a.xlsx".to_string(), "b.xlsx".to_string()]);
}

#[test]
fn test_compile_collects_matching_sheets() {
    let dir = tempdir().unwrap();
    build_source(dir.path(), "jan.xlsx", &["Summary", "Data Jan"]);
    build_source(dir.path(), "feb.xlsx", &["Summary", "Data Feb"]);

    let compiler = SheetCompiler::new(dir.path()).unwrap();
    let files = compiler.file_list().unwrap();
    let report = compiler
        .compile(&files, "compiled.xlsx", "data", None)
        .unwrap();

    assert!(report.unsuccessful.is_empty());
    assert_eq!(report.compiled.len(), 2);
    // リストの逆順で処理される
    assert_eq!(report.compiled[0].0, "jan.xlsx");
    assert_eq!(report.compiled[1].0, "feb.xlsx");

    let out = WorkbookData::open(&report.output_path).unwrap();
    let names = out.sheet_names();
    assert!(names.contains(&"Data Jan".to_string()));
    assert!(names.contains(&"Data Feb".to_string()));

    // セル内容も複写されている
    let jan = out.sheet("Data Jan").unwrap();
    assert_eq!(jan.cell_raw(1, 1), "Data Jan");
}

#[test]
fn test_compile_renames_on_name_collision() {
    let dir = tempdir().unwrap();
    build_source(dir.path(), "jan.xlsx", &["Data"]);
    build_source(dir.path(), "feb.xlsx", &["Data"]);

    let compiler = SheetCompiler::new(dir.path()).unwrap();
    let files = compiler.file_list().unwrap();
    let report = compiler
        .compile(&files, "compiled.xlsx", "data", None)
        .unwrap();

    assert!(report.unsuccessful.is_empty());
    assert_eq!(report.compiled.len(), 2);

    let out = WorkbookData::open(&report.output_path).unwrap();
    let names = out.sheet_names();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Data".to_string()));
    // 2枚目は衝突回避のサフィックスつき
    let renamed = names.iter().find(|n| n.as_str() != "Data").unwrap();
    assert!(renamed.starts_with("Data_"));
}

#[test]
fn test_compile_reports_unresolvable_files() {
    let dir = tempdir().unwrap();
    build_source(dir.path(), "good.xlsx", &["Data"]);
    build_source(dir.path(), "bad.xlsx", &["Summary", "Notes"]);

    let compiler = SheetCompiler::new(dir.path()).unwrap();
    let files = compiler.file_list().unwrap();
    let report = compiler
        .compile(&files, "compiled.xlsx", "data", None)
        .unwrap();

    assert_eq!(report.compiled.len(), 1);
    assert_eq!(report.unsuccessful, vec!["bad.xlsx".to_string()]);
    assert!(report.message().contains("bad.xlsx"));
}

#[test]
fn test_compile_two_substrings() {
    let dir = tempdir().unwrap();
    build_source(dir.path(), "q.xlsx", &["Data 2024 Q1", "Data 2024 Q2"]);

    let compiler = SheetCompiler::new(dir.path()).unwrap();
    let files = compiler.file_list().unwrap();
    let report = compiler
        .compile(&files, "compiled.xlsx", "data", Some("q2"))
        .unwrap();

    assert!(report.unsuccessful.is_empty());
    let out = WorkbookData::open(&report.output_path).unwrap();
    assert_eq!(out.sheet_names(), vec!["Data 2024 Q2".to_string()]);
}

#[test]
fn test_manifest_written_before_compile() {
    let dir = tempdir().unwrap();
    build_source(dir.path(), "jan.xlsx", &["Data"]);

    let compiler = SheetCompiler::new(dir.path()).unwrap();
    let files = compiler.file_list().unwrap();
    compiler
        .compile(&files, "compiled.xlsx", "data", None)
        .unwrap();

    let manifest = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .find(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("final_file_list_dict_")
        })
        .expect("マニフェストが保存されていること");

    let content = std::fs::read_to_string(manifest.path()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    let (label, file_list) = parsed.as_object().unwrap().iter().next().unwrap();

    // フォルダ名がラベルになる
    assert_eq!(
        label,
        &dir.path().file_name().unwrap().to_string_lossy().to_string()
    );
    assert!(file_list
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "jan.xlsx"));
}

#[test]
fn test_report_message_success_text() {
    let dir = tempdir().unwrap();
    build_source(dir.path(), "jan.xlsx", &["Data"]);

    let compiler = SheetCompiler::new(dir.path()).unwrap();
    let files = compiler.file_list().unwrap();
    let report = compiler
        .compile(&files, "compiled.xlsx", "data", None)
        .unwrap();

    assert!(report.unsuccessful.is_empty());
    assert!(report.message().contains("成功"));
}
