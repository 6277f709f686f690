use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheet-audit")]
#[command(about = "Excel帳票の監査・集約ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 全シートの列ヘッダを先頭シートと照合
    Columns {
        /// 対象ワークブック（.xlsx/.xlsm）
        #[arg(required = true)]
        workbook: PathBuf,

        /// 照合する列番号（1始まり、カンマ区切り）
        #[arg(short, long, required = true, value_delimiter = ',')]
        cols: Vec<u32>,

        /// ヘッダ行（全シート共通）
        #[arg(short, long, default_value = "1")]
        row: u32,
    },

    /// 各シートの日付セルを検査（重複・順序・連続性）
    Dates {
        /// 対象ワークブック
        #[arg(required = true)]
        workbook: PathBuf,

        /// 日付セルの行（省略時は設定値）
        #[arg(long)]
        row: Option<u32>,

        /// 日付セルの列（省略時は設定値）
        #[arg(long)]
        col: Option<u32>,

        /// 文字列セルを解釈するchronoフォーマット（例: %Y-%m-%d、"-"で日付型セルをそのまま読む）
        #[arg(short, long)]
        format: Option<String>,

        /// セル値を分割する区切り文字
        #[arg(long)]
        separator: Option<String>,

        /// 分割後に日付として読む位置（0始まり）
        #[arg(long, default_value = "0")]
        index_pos: usize,

        /// 連続性検査のしきい値（日数、省略時は設定値）
        #[arg(short, long)]
        gap_days: Option<i64>,

        /// ファイル名照合に使う元ファイルのフォルダ
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// ファイル名から日付を抽出する正規表現
        #[arg(long)]
        file_pattern: Option<String>,
    },

    /// 目印テキストで各シートの行位置を検索
    Points {
        /// 対象ワークブック
        #[arg(required = true)]
        workbook: PathBuf,

        /// 検索する列番号（1始まり）
        #[arg(short, long, required = true)]
        col: u32,

        /// 検索を始める行（省略時は設定値）
        #[arg(short, long)]
        start_row: Option<u32>,

        /// 探す目印テキスト（大文字小文字は無視）
        #[arg(short, long, required = true)]
        marker: String,

        /// 一致行への補正量（正負の整数）
        #[arg(short, long)]
        adjust: Option<i64>,
    },

    /// フォルダ内の各ワークブックから1シートずつ集約
    Compile {
        /// 元ワークブックのあるフォルダ
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力ワークブック名
        #[arg(short, long, default_value = "compiled.xlsx")]
        output: String,

        /// シートを特定する部分文字列
        #[arg(long, required = true)]
        sub1: String,

        /// 追加の部分文字列（1つで特定できない場合）
        #[arg(long)]
        sub2: Option<String>,
    },

    /// ワークブック構造のサマリJSONを出力
    Structure {
        /// 対象ワークブック
        #[arg(required = true)]
        workbook: PathBuf,

        /// 監査対象の列番号（カンマ区切り）
        #[arg(long, required = true, value_delimiter = ',')]
        cols: Vec<u32>,

        /// 行マーカー検索の列番号
        #[arg(long, required = true)]
        marker_col: u32,

        /// 探す目印テキスト
        #[arg(short, long, required = true)]
        marker: String,

        /// 文字列セルを解釈するchronoフォーマット
        #[arg(short, long)]
        format: Option<String>,

        /// 出力先フォルダ（省略時はワークブックと同じ場所）
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// 全シートを連番名に付け替えたコピーを出力
    Rename {
        /// 対象ワークブック
        #[arg(required = true)]
        workbook: PathBuf,

        /// シート名の接頭辞
        #[arg(short, long, required = true)]
        prefix: String,

        /// 出力ワークブックのパス
        #[arg(short, long, required = true)]
        output: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 連続性検査の既定しきい値（日数）を設定
        #[arg(long)]
        set_gap_days: Option<i64>,

        /// 日付の既定フォーマットを設定
        #[arg(long)]
        set_date_format: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
