//! sheet-audit: Excel帳票の監査・集約ライブラリ
//!
//! calamineで読んだワークブックに対して列ヘッダ照合・日付検査・
//! 行マーカー検索・シート集約を行う。

pub mod cli;
pub mod columns;
pub mod compiler;
pub mod config;
pub mod dates;
pub mod error;
pub mod points;
pub mod report;
pub mod workbook;
pub mod writer;

pub use columns::ColumnComparator;
pub use compiler::{CompileReport, SheetCompiler};
pub use dates::{DateAuditor, DateOutcome, FilenameCheck, OrderDrift};
pub use error::{AuditError, Result};
pub use points::{PointFinder, PointOutcome};
pub use report::StructureReport;
pub use workbook::{SheetGrid, WorkbookData};
