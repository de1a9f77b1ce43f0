//! スナップショットからリーダーボードまでの一括評価
//!
//! ## 処理フロー
//! 1. 結果行からモデルを列挙（出現順）
//! 2. フィールド×モデルごとに抽出値・正解値の並列配列を作成
//! 3. 混同行列 → 指標を算出し MetricsTable に格納
//! 4. モデル別サマリ → フィールド勝者 → 順位付け

use crate::comparator::{compare_values_with, ComparatorOptions};
use crate::confusion::{ConfusionAccumulator, DEFAULT_EXAMPLE_LIMIT};
use crate::error::Result;
use crate::metrics::calculate_with_accumulator;
use crate::normalizer::{is_excluded_state, PENDING_PREFIX};
use crate::ranking::{assign_ranks, determine_field_winners};
use crate::summary::calculate_model_summaries;
use crate::types::{
    ConfusionDebugInfo, EvaluationSnapshot, FieldDefinition, MatchClassification, MetricsResult,
    ModelSummary, ResultRow, GROUND_TRUTH_MODEL,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 評価オプション
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationOptions {
    pub comparator: ComparatorOptions,
    /// 混同行列のバケットごとのサンプル数
    pub example_limit: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            comparator: ComparatorOptions::default(),
            example_limit: DEFAULT_EXAMPLE_LIMIT,
        }
    }
}

/// フィールド×モデル1組の評価結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEvaluation {
    pub metrics: MetricsResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<ConfusionDebugInfo>,
    /// 一致分類ごとの件数
    #[serde(default)]
    pub classifications: BTreeMap<MatchClassification, usize>,
}

impl From<MetricsResult> for FieldEvaluation {
    fn from(metrics: MetricsResult) -> Self {
        Self {
            metrics,
            ..Default::default()
        }
    }
}

/// フィールドキー → モデル名 → 評価結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsTable {
    entries: BTreeMap<String, BTreeMap<String, FieldEvaluation>>,
}

impl MetricsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 評価結果を登録
    pub fn insert(&mut self, field_key: &str, model: &str, evaluation: FieldEvaluation) {
        self.entries
            .entry(field_key.to_string())
            .or_default()
            .insert(model.to_string(), evaluation);
    }

    /// 指標のみを登録
    pub fn insert_metrics(&mut self, field_key: &str, model: &str, metrics: MetricsResult) {
        self.insert(field_key, model, metrics.into());
    }

    /// 指標を取得（未登録なら None）
    pub fn get(&self, field_key: &str, model: &str) -> Option<&MetricsResult> {
        self.evaluation(field_key, model).map(|e| &e.metrics)
    }

    /// 評価結果を取得
    pub fn evaluation(&self, field_key: &str, model: &str) -> Option<&FieldEvaluation> {
        self.entries.get(field_key)?.get(model)
    }

    /// 登録件数（フィールド×モデル）
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 評価結果（リーダーボード）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    /// 順位順のモデル別サマリ
    pub summaries: Vec<ModelSummary>,
    pub table: MetricsTable,
}

impl Leaderboard {
    /// 1位のモデル
    pub fn winner(&self) -> Option<&ModelSummary> {
        self.summaries.iter().find(|s| s.rank == 1)
    }

    /// モデル名でサマリを取得
    pub fn summary(&self, model: &str) -> Option<&ModelSummary> {
        self.summaries.iter().find(|s| s.model_name == model)
    }
}

/// 結果行に現れるモデルを出現順に列挙（正解データを除く）
///
/// 行は入力順に走査する。1行内のフィールド・モデルは順序付きマップのため
/// キーの辞書順となる。この順序が同率時の順位を決める。
pub fn discover_models(rows: &[ResultRow]) -> Vec<String> {
    let mut models: Vec<String> = Vec::new();

    for row in rows {
        for model_values in row.values.values() {
            for model in model_values.keys() {
                if model != GROUND_TRUTH_MODEL && !models.iter().any(|m| m == model) {
                    models.push(model.clone());
                }
            }
        }
    }

    models
}

/// フィールド×モデルの並列配列を作成
///
/// 正解値のない行は除外する。モデルの値がない行は抽出待ちとして扱う。
pub fn collect_pairs<'a>(
    rows: &'a [ResultRow],
    field_key: &str,
    model: &str,
) -> (Vec<&'a str>, Vec<&'a str>) {
    let mut predictions = Vec::new();
    let mut ground_truths = Vec::new();

    for row in rows {
        let Some(truth) = row.ground_truth(field_key) else {
            tracing::debug!(file = %row.file_name, field = field_key, "no ground truth; row skipped");
            continue;
        };
        predictions.push(row.value(field_key, model).unwrap_or(PENDING_PREFIX));
        ground_truths.push(truth);
    }

    (predictions, ground_truths)
}

/// 一致分類ごとの件数を集計（除外状態の抽出値は数えない）
pub fn classify_pairs(
    predictions: &[&str],
    ground_truths: &[&str],
    options: &ComparatorOptions,
) -> BTreeMap<MatchClassification, usize> {
    let mut counts = BTreeMap::new();

    for (predicted, truth) in predictions.iter().zip(ground_truths) {
        if is_excluded_state(predicted) {
            continue;
        }
        let result = compare_values_with(predicted, truth, options);
        *counts.entry(result.match_classification).or_insert(0) += 1;
    }

    counts
}

/// フィールド×モデルごとの指標表を作成
pub fn compute_metrics_table(
    rows: &[ResultRow],
    fields: &[FieldDefinition],
    models: &[String],
    options: &EvaluationOptions,
) -> Result<MetricsTable> {
    let mut table = MetricsTable::new();

    for field in fields {
        for model in models {
            let (predictions, ground_truths) = collect_pairs(rows, &field.key, model);
            let accumulator = ConfusionAccumulator::new()
                .with_comparator(options.comparator)
                .with_example_limit(options.example_limit);
            let result = calculate_with_accumulator(&predictions, &ground_truths, accumulator)?;
            let classifications = classify_pairs(&predictions, &ground_truths, &options.comparator);

            table.insert(
                &field.key,
                model,
                FieldEvaluation {
                    metrics: result.metrics,
                    debug: Some(result.debug),
                    classifications,
                },
            );
        }
    }

    Ok(table)
}

/// スナップショットを評価してリーダーボードを作成
pub fn evaluate_snapshot(
    snapshot: &EvaluationSnapshot,
    options: &EvaluationOptions,
) -> Result<Leaderboard> {
    let models = discover_models(&snapshot.rows);
    let table = compute_metrics_table(&snapshot.rows, &snapshot.fields, &models, options)?;

    let mut summaries = calculate_model_summaries(
        &models,
        &snapshot.fields,
        &table,
        Some(&snapshot.field_settings),
    );
    determine_field_winners(&mut summaries, &snapshot.fields);
    assign_ranks(&mut summaries);

    tracing::debug!(
        models = models.len(),
        fields = snapshot.fields.len(),
        rows = snapshot.rows.len(),
        "snapshot evaluated"
    );

    Ok(Leaderboard { summaries, table })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::NOT_PRESENT;

    fn row(file_name: &str, field: &str, values: &[(&str, &str)]) -> ResultRow {
        let mut row = ResultRow {
            file_name: file_name.to_string(),
            ..Default::default()
        };
        let models = row.values.entry(field.to_string()).or_default();
        for (model, value) in values {
            models.insert(model.to_string(), value.to_string());
        }
        row
    }

    #[test]
    fn test_discover_models_excludes_ground_truth() {
        let rows = vec![
            row("a.pdf", "vendor", &[(GROUND_TRUTH_MODEL, "Acme"), ("gpt", "Acme")]),
            row("b.pdf", "vendor", &[(GROUND_TRUTH_MODEL, "Beta"), ("claude", "Beta")]),
        ];
        assert_eq!(discover_models(&rows), vec!["gpt".to_string(), "claude".to_string()]);
    }

    #[test]
    fn test_discover_models_order() {
        // 1行内は辞書順、以降は初出の行順
        let rows = vec![
            row("a.pdf", "vendor", &[("zeta", "Acme"), (GROUND_TRUTH_MODEL, "Acme"), ("beta", "Acme")]),
            row("b.pdf", "vendor", &[(GROUND_TRUTH_MODEL, "Beta"), ("alpha", "Beta"), ("zeta", "Beta")]),
        ];
        assert_eq!(
            discover_models(&rows),
            vec!["beta".to_string(), "zeta".to_string(), "alpha".to_string()]
        );
    }

    #[test]
    fn test_collect_pairs_skips_missing_ground_truth() {
        let rows = vec![
            row("a.pdf", "vendor", &[(GROUND_TRUTH_MODEL, "Acme"), ("gpt", "Acme")]),
            row("b.pdf", "vendor", &[("gpt", "Beta")]),
            row("c.pdf", "vendor", &[(GROUND_TRUTH_MODEL, "Charlie")]),
        ];
        let (predictions, truths) = collect_pairs(&rows, "vendor", "gpt");
        assert_eq!(truths, vec!["Acme", "Charlie"]);
        assert_eq!(predictions, vec!["Acme", PENDING_PREFIX]);
    }

    #[test]
    fn test_classify_pairs() {
        let counts = classify_pairs(
            &["Acme", "ACME", "2025-01-15", "Pending", "Wrong"],
            &["Acme", "Acme", "01/15/2025", "Acme", "Right"],
            &ComparatorOptions::default(),
        );
        assert_eq!(counts.get(&MatchClassification::Exact), Some(&1));
        assert_eq!(counts.get(&MatchClassification::Normalized), Some(&1));
        assert_eq!(counts.get(&MatchClassification::DifferentFormat), Some(&1));
        assert_eq!(counts.get(&MatchClassification::None), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), 4);
    }

    #[test]
    fn test_metrics_table_missing_lookup() {
        let mut table = MetricsTable::new();
        table.insert_metrics("vendor", "gpt", MetricsResult::default());
        assert!(table.get("vendor", "gpt").is_some());
        assert!(table.get("vendor", "claude").is_none());
        assert!(table.get("total", "gpt").is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_evaluate_snapshot() {
        let snapshot = EvaluationSnapshot {
            fields: vec![FieldDefinition::new("vendor", "Vendor")],
            rows: vec![
                row("a.pdf", "vendor", &[(GROUND_TRUTH_MODEL, "Acme"), ("good", "Acme"), ("bad", "Nope")]),
                row("b.pdf", "vendor", &[(GROUND_TRUTH_MODEL, NOT_PRESENT), ("good", NOT_PRESENT), ("bad", "Ghost")]),
            ],
            ..Default::default()
        };

        let leaderboard = evaluate_snapshot(&snapshot, &EvaluationOptions::default()).unwrap();
        let winner = leaderboard.winner().expect("1位が存在しない");
        assert_eq!(winner.model_name, "good");
        assert_eq!(winner.overall_accuracy, 1.0);
        assert_eq!(winner.fields_won, 1);

        let bad = leaderboard.summary("bad").expect("badが存在しない");
        assert_eq!(bad.rank, 2);
        assert_eq!(bad.overall_accuracy, 0.0);

        let evaluation = leaderboard.table.evaluation("vendor", "bad").unwrap();
        let debug = evaluation.debug.as_ref().unwrap();
        assert_eq!(debug.false_positives, 2);
        assert_eq!(debug.false_negatives, 1);
    }
}
