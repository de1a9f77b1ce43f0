//! 混同行列の集計
//!
//! 抽出値・正解値の並列配列を TP/FP/FN/TN に振り分ける。
//!
//! | 正解値 | 抽出値 | 計上 |
//! |---|---|---|
//! | 値なし | 値なし | TN |
//! | 値なし | それ以外 | FP |
//! | 値あり | 値なし | FP + FN |
//! | 値あり | 一致 | TP |
//! | 値あり | 不一致 | FP + FN |
//!
//! 誤った値は「誤りを主張した」FP と「正しい値を出せなかった」FN の両方に計上する。
//! 抽出待ち・エラー状態の抽出値は集計から除外する。

use crate::comparator::{compare_values_with, ComparatorOptions};
use crate::error::{Error, Result};
use crate::normalizer::{value_state, ValueState};
use crate::types::{ConfusionDebugInfo, ExamplePair};

/// バケットごとに保持するサンプル数の既定値
pub const DEFAULT_EXAMPLE_LIMIT: usize = 5;

/// 1組の振り分け結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    /// 抽出待ち・エラーのため除外
    Skipped,
    TruePositive,
    TrueNegative,
    /// 値なしの項目に値を出した
    FalsePositive,
    /// 誤った値（FP と FN の両方）
    Wrong,
}

/// 混同行列アキュムレータ
#[derive(Debug, Clone)]
pub struct ConfusionAccumulator {
    comparator: ComparatorOptions,
    example_limit: usize,
    info: ConfusionDebugInfo,
}

impl Default for ConfusionAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfusionAccumulator {
    pub fn new() -> Self {
        Self {
            comparator: ComparatorOptions::default(),
            example_limit: DEFAULT_EXAMPLE_LIMIT,
            info: ConfusionDebugInfo::default(),
        }
    }

    /// サンプル保持数を設定
    pub fn with_example_limit(mut self, limit: usize) -> Self {
        self.example_limit = limit;
        self
    }

    /// 比較オプションを設定
    pub fn with_comparator(mut self, options: ComparatorOptions) -> Self {
        self.comparator = options;
        self
    }

    /// 1組を振り分け
    pub fn push(&mut self, index: usize, predicted: &str, ground_truth: &str) -> PairOutcome {
        let outcome = self.classify(predicted, ground_truth);
        let example = || ExamplePair {
            index,
            predicted: predicted.to_string(),
            ground_truth: ground_truth.to_string(),
        };
        let limit = self.example_limit;
        let info = &mut self.info;

        match outcome {
            PairOutcome::Skipped => return outcome,
            PairOutcome::TruePositive => {
                info.true_positives += 1;
                push_bounded(&mut info.examples.tp, limit, example);
            }
            PairOutcome::TrueNegative => {
                info.true_negatives += 1;
                push_bounded(&mut info.examples.tn, limit, example);
            }
            PairOutcome::FalsePositive => {
                info.false_positives += 1;
                push_bounded(&mut info.examples.fp, limit, example);
            }
            PairOutcome::Wrong => {
                info.false_positives += 1;
                info.false_negatives += 1;
                push_bounded(&mut info.examples.fp, limit, example);
                push_bounded(&mut info.examples.fn_, limit, example);
            }
        }

        info.total_valid_pairs += 1;
        outcome
    }

    fn classify(&self, predicted: &str, ground_truth: &str) -> PairOutcome {
        let predicted_state = value_state(predicted);
        if predicted_state.is_excluded() {
            return PairOutcome::Skipped;
        }

        let truth_absent = value_state(ground_truth) == ValueState::NotPresent;
        let predicted_absent = predicted_state == ValueState::NotPresent;

        match (truth_absent, predicted_absent) {
            (true, true) => PairOutcome::TrueNegative,
            // 空文字の抽出値も「値なし」とは扱わない
            (true, false) => PairOutcome::FalsePositive,
            (false, true) => PairOutcome::Wrong,
            (false, false) => {
                if compare_values_with(predicted, ground_truth, &self.comparator).is_match {
                    PairOutcome::TruePositive
                } else {
                    PairOutcome::Wrong
                }
            }
        }
    }

    /// 集計結果を取得
    pub fn finish(self) -> ConfusionDebugInfo {
        self.info
    }
}

fn push_bounded<F>(examples: &mut Vec<ExamplePair>, limit: usize, make: F)
where
    F: Fn() -> ExamplePair,
{
    if examples.len() < limit {
        examples.push(make());
    }
}

/// 並列配列の長さを検証
pub fn ensure_same_length<P, G>(predictions: &[P], ground_truths: &[G]) -> Result<()> {
    if predictions.len() != ground_truths.len() {
        tracing::error!(
            predictions = predictions.len(),
            ground_truths = ground_truths.len(),
            "prediction and ground truth arrays differ in length"
        );
        return Err(Error::LengthMismatch {
            predictions: predictions.len(),
            ground_truths: ground_truths.len(),
        });
    }
    Ok(())
}

/// 並列配列を混同行列に集計（既定オプション）
pub fn accumulate<P, G>(predictions: &[P], ground_truths: &[G]) -> Result<ConfusionDebugInfo>
where
    P: AsRef<str>,
    G: AsRef<str>,
{
    accumulate_with(predictions, ground_truths, ConfusionAccumulator::new())
}

/// 並列配列を指定のアキュムレータで集計
pub fn accumulate_with<P, G>(
    predictions: &[P],
    ground_truths: &[G],
    mut accumulator: ConfusionAccumulator,
) -> Result<ConfusionDebugInfo>
where
    P: AsRef<str>,
    G: AsRef<str>,
{
    ensure_same_length(predictions, ground_truths)?;

    for (index, (predicted, truth)) in predictions.iter().zip(ground_truths).enumerate() {
        accumulator.push(index, predicted.as_ref(), truth.as_ref());
    }

    Ok(accumulator.finish())
}
