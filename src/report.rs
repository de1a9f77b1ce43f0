//! 評価レポート
//!
//! - JSON: メタデータ（生成日時・入力ハッシュ）付きのリーダーボード
//! - テキスト: 順位表とフィールド別成績

use crate::error::Result;
use extract_eval_common::{winner_label, EvaluationOptions, Leaderboard, ModelSummary};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// レポートのメタデータ
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub title: String,
    /// 生成日時（RFC 3339）
    pub generated_at: String,
    /// 入力ファイル
    pub source: String,
    /// スナップショットのハッシュ
    pub snapshot_hash: String,
    pub partial_min_ratio: f64,
    pub example_limit: usize,
}

impl ReportMetadata {
    pub fn new(title: &str, source: &str, snapshot_hash: &str, options: &EvaluationOptions) -> Self {
        Self {
            title: title.to_string(),
            generated_at: chrono::Local::now().to_rfc3339(),
            source: source.to_string(),
            snapshot_hash: snapshot_hash.to_string(),
            partial_min_ratio: options.comparator.partial_min_ratio,
            example_limit: options.example_limit,
        }
    }
}

/// 評価レポート
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    pub metadata: ReportMetadata,
    pub leaderboard: Leaderboard,
}

impl EvaluationReport {
    pub fn new(metadata: ReportMetadata, leaderboard: Leaderboard) -> Self {
        Self {
            metadata,
            leaderboard,
        }
    }

    /// JSON文字列に変換（debug=false なら混同行列の詳細を省く）
    pub fn to_json(&self, debug: bool) -> Result<String> {
        if debug {
            return Ok(serde_json::to_string_pretty(self)?);
        }

        let mut trimmed = self.clone();
        trimmed.leaderboard.table = Default::default();
        Ok(serde_json::to_string_pretty(&trimmed)?)
    }

    /// テキスト表に変換
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        writeln!(output, "{}", RULE).ok();
        writeln!(output, "  {}", self.metadata.title).ok();
        writeln!(output, "{}", RULE).ok();
        writeln!(output, "  入力:     {}", self.metadata.source).ok();
        writeln!(output, "  生成日時: {}", self.metadata.generated_at).ok();
        writeln!(output).ok();

        output.push_str(&leaderboard_table(&self.leaderboard.summaries));
        writeln!(output).ok();
        output.push_str(&field_breakdown(&self.leaderboard.summaries));

        output
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// 順位表
pub fn leaderboard_table(summaries: &[ModelSummary]) -> String {
    let mut output = String::new();

    writeln!(output, "LEADERBOARD").ok();
    writeln!(output, "{}", THIN_RULE).ok();
    writeln!(
        output,
        "{:>4}  {:<24} {:>8} {:>9} {:>8} {:>8} {:>6}",
        "順位", "モデル", "Accuracy", "Precision", "Recall", "F1", "勝利"
    )
    .ok();

    for summary in summaries {
        writeln!(
            output,
            "{:>4}  {:<24} {:>8} {:>9} {:>8} {:>8} {:>6}",
            summary.rank,
            summary.model_name,
            percent(summary.overall_accuracy),
            percent(summary.overall_precision),
            percent(summary.overall_recall),
            percent(summary.overall_f1),
            format!("{}/{}", summary.fields_won, summary.total_fields),
        )
        .ok();
    }

    output
}

/// フィールド別成績
pub fn field_breakdown(summaries: &[ModelSummary]) -> String {
    let mut output = String::new();

    writeln!(output, "FIELDS").ok();
    writeln!(output, "{}", THIN_RULE).ok();

    for summary in summaries {
        writeln!(output, "[{}] {}", summary.rank, summary.model_name).ok();
        for performance in &summary.field_performance {
            let excluded = if performance.is_included_in_metrics {
                ""
            } else {
                " (集計対象外)"
            };
            writeln!(
                output,
                "  {:<24} acc {:>6}  f1 {:>6}  {}{}",
                performance.field_name,
                percent(performance.accuracy),
                percent(performance.f1),
                winner_label(performance),
                excluded,
            )
            .ok();
        }
    }

    output
}
