//! フィールド指標の算出
//!
//! ```text
//! accuracy  = (TP + TN) / total_valid_pairs
//! precision = TP / (TP + FP)
//! recall    = TP / (TP + FN)
//! f1        = 2 * precision * recall / (precision + recall)
//! ```
//!
//! 分母が 0 の場合は 0。すべての値は 0〜1 に収める。

use crate::confusion::{accumulate_with, ConfusionAccumulator};
use crate::error::Result;
use crate::types::{ConfusionDebugInfo, MetricsResult};
use serde::{Deserialize, Serialize};

/// 指標と混同行列の詳細
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetricsWithDebug {
    pub metrics: MetricsResult,
    pub debug: ConfusionDebugInfo,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    clamp_unit(numerator as f64 / denominator as f64)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// F1スコア（precision・recall のどちらかが 0 なら 0）
pub fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision <= 0.0 || recall <= 0.0 {
        return 0.0;
    }
    clamp_unit(2.0 * precision * recall / (precision + recall))
}

/// 混同行列のカウントから指標を算出
pub fn metrics_from_counts(info: &ConfusionDebugInfo) -> MetricsResult {
    let accuracy = ratio(
        info.true_positives + info.true_negatives,
        info.total_valid_pairs,
    );
    let precision = ratio(
        info.true_positives,
        info.true_positives + info.false_positives,
    );
    let recall = ratio(
        info.true_positives,
        info.true_positives + info.false_negatives,
    );

    MetricsResult {
        accuracy,
        precision,
        recall,
        f1_score: f1_score(precision, recall),
    }
}

/// フィールド指標を算出
pub fn calculate_field_metrics<P, G>(predictions: &[P], ground_truths: &[G]) -> Result<MetricsResult>
where
    P: AsRef<str>,
    G: AsRef<str>,
{
    calculate_field_metrics_with_debug(predictions, ground_truths).map(|result| result.metrics)
}

/// フィールド指標を混同行列の詳細付きで算出
pub fn calculate_field_metrics_with_debug<P, G>(
    predictions: &[P],
    ground_truths: &[G],
) -> Result<FieldMetricsWithDebug>
where
    P: AsRef<str>,
    G: AsRef<str>,
{
    calculate_with_accumulator(predictions, ground_truths, ConfusionAccumulator::new())
}

/// 指定のアキュムレータで指標を算出
pub fn calculate_with_accumulator<P, G>(
    predictions: &[P],
    ground_truths: &[G],
    accumulator: ConfusionAccumulator,
) -> Result<FieldMetricsWithDebug>
where
    P: AsRef<str>,
    G: AsRef<str>,
{
    let debug = accumulate_with(predictions, ground_truths, accumulator)?;
    let metrics = metrics_from_counts(&debug);
    Ok(FieldMetricsWithDebug { metrics, debug })
}
