//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use sheet_audit::{
    AuditError, ColumnComparator, DateAuditor, PointFinder, SheetCompiler, WorkbookData,
};
use std::path::Path;
use tempfile::tempdir;

/// 存在しないワークブックを開いた場合
#[test]
fn test_open_nonexistent_workbook() {
    let result = WorkbookData::open(Path::new("/nonexistent/book.xlsx"));
    assert!(matches!(result, Err(AuditError::FileNotFound(_))));
}

/// 存在しないフォルダで集約器を作った場合
#[test]
fn test_compiler_nonexistent_folder() {
    let result = SheetCompiler::new(Path::new("/nonexistent/folder/12345"));
    assert!(matches!(result, Err(AuditError::FolderNotFound(_))));
}

/// Excelでないファイルを開いた場合
#[test]
fn test_open_non_excel_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fake.xlsx");
    std::fs::write(&path, "not an excel file").unwrap();

    let result = WorkbookData::open(&path);
    assert!(result.is_err());
}

/// 不正な構築引数は入力エラーになる
#[test]
fn test_constructor_validation() {
    assert!(matches!(
        ColumnComparator::new(vec![]),
        Err(AuditError::Input(_))
    ));
    assert!(matches!(DateAuditor::new((0, 0)), Err(AuditError::Input(_))));
    assert!(matches!(
        PointFinder::new(0, 1, "x", None),
        Err(AuditError::Input(_))
    ));
}

/// AuditErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        AuditError::Input("テスト入力エラー".to_string()),
        AuditError::NotFound("目印".to_string()),
        AuditError::FileNotFound("book.xlsx".to_string()),
        AuditError::FolderNotFound("/path/to/folder".to_string()),
        AuditError::SheetNotFound("週次".to_string()),
        AuditError::Config("設定エラー".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: AuditError = io_err.into();

    assert!(matches!(err, AuditError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: AuditError = json_err.into();

    assert!(matches!(err, AuditError::JsonParse(_)));
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = AuditError::Input("テスト".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Input"));
    assert!(debug.contains("テスト"));
}
