use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "extract-eval")]
#[command(about = "フィールド抽出精度評価・モデルランキングツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スナップショットJSONを評価してリーダーボードを出力
    Evaluate {
        /// スナップショットJSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力先（フォルダまたはファイル、デフォルト: 入力ファイルのフォルダ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (json/excel/text/all、デフォルト: 設定ファイルの値)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// レポートタイトル
        #[arg(long, default_value = "leaderboard")]
        title: String,

        /// 集計対象から外すフィールドキー（複数指定可）
        #[arg(long = "exclude-field")]
        exclude_fields: Vec<String>,

        /// キャッシュを使用（再計算をスキップ）
        #[arg(long)]
        use_cache: bool,

        /// 混同行列の詳細をJSONに含める
        #[arg(long)]
        debug: bool,
    },

    /// 2つの値を比較して判定を表示
    Compare {
        /// 抽出値
        predicted: String,

        /// 正解値
        ground_truth: String,
    },

    /// 設定の表示・変更
    Config {
        /// 部分一致の最小長さ比を設定（0〜1）
        #[arg(long)]
        set_partial_ratio: Option<f64>,

        /// 混同行列サンプル数を設定
        #[arg(long)]
        set_example_limit: Option<usize>,

        /// 既定の出力形式を設定
        #[arg(long)]
        set_default_format: Option<ExportFormat>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// 対象フォルダ（デフォルト: カレントディレクトリ）
        folder: Option<PathBuf>,

        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Excel,
    #[default]
    Text,
    All,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "text" | "txt" => Ok(ExportFormat::Text),
            "all" => Ok(ExportFormat::All),
            _ => Err(format!("Unknown format: {}. Use json, excel, text, or all", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::All => write!(f, "all"),
        }
    }
}
