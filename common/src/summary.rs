//! モデル別サマリの集計
//!
//! フィールド別指標をモデルごとにマクロ平均する。
//! 集計対象外に設定されたフィールドは総合指標から外すが、
//! `total_fields` とフィールド別成績には残す。

use crate::dataset::MetricsTable;
use crate::types::{
    is_field_included, FieldDefinition, FieldPerformance, FieldSettings, MetricsResult,
    ModelSummary,
};

/// フィールド別指標からモデル別サマリを作成
///
/// 指標が未登録のフィールド×モデルは 0 として扱う。
/// 順位・勝者はここでは設定しない（`ranking` を参照）。
pub fn calculate_model_summaries(
    models: &[String],
    fields: &[FieldDefinition],
    table: &MetricsTable,
    settings: Option<&FieldSettings>,
) -> Vec<ModelSummary> {
    models
        .iter()
        .map(|model| summarize_model(model, fields, table, settings))
        .collect()
}

fn summarize_model(
    model: &str,
    fields: &[FieldDefinition],
    table: &MetricsTable,
    settings: Option<&FieldSettings>,
) -> ModelSummary {
    let field_performance: Vec<FieldPerformance> = fields
        .iter()
        .map(|field| {
            let metrics = match table.get(&field.key, model) {
                Some(metrics) => *metrics,
                None => {
                    tracing::warn!(
                        model = model,
                        field = %field.key,
                        "no metrics recorded; treating as zero"
                    );
                    MetricsResult::default()
                }
            };

            FieldPerformance {
                field_key: field.key.clone(),
                field_name: field.name.clone(),
                accuracy: metrics.accuracy,
                precision: metrics.precision,
                recall: metrics.recall,
                f1: metrics.f1_score,
                is_winner: false,
                is_shared_victory: false,
                is_included_in_metrics: is_field_included(settings, &field.key),
            }
        })
        .collect();

    let overall = macro_average(&field_performance);

    ModelSummary {
        model_name: model.to_string(),
        overall_accuracy: overall.accuracy,
        overall_precision: overall.precision,
        overall_recall: overall.recall,
        overall_f1: overall.f1_score,
        fields_won: 0,
        total_fields: fields.len(),
        rank: 0,
        field_performance,
    }
}

/// 集計対象フィールドのマクロ平均（対象が 0 件なら全て 0）
pub fn macro_average(performance: &[FieldPerformance]) -> MetricsResult {
    let included: Vec<&FieldPerformance> = performance
        .iter()
        .filter(|p| p.is_included_in_metrics)
        .collect();

    if included.is_empty() {
        return MetricsResult::default();
    }

    let count = included.len() as f64;
    let mean = |value: fn(&FieldPerformance) -> f64| {
        included.iter().map(|p| value(p)).sum::<f64>() / count
    };

    MetricsResult {
        accuracy: mean(|p| p.accuracy),
        precision: mean(|p| p.precision),
        recall: mean(|p| p.recall),
        f1_score: mean(|p| p.f1),
    }
}
