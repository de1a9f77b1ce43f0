//! Extract Eval
//!
//! 抽出モデルの出力を正解データと照合し、フィールド別指標とモデルのランキングを出力するCLI。
//! 評価ロジックは `extract_eval_common` にあり、ここではファイル入出力・設定・キャッシュを扱う。

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod report;
pub mod snapshot;
