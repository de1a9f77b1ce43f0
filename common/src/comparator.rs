//! 抽出値と正解値の意味的比較
//!
//! 判定は以下の優先順で行い、最初に成立した規則を採用する。
//! 1. 抽出待ち・エラー状態 → 不一致
//! 2. 予約値（値なし）の対称性 → 両方なら完全一致、片方なら不一致
//! 3. 空文字 → 不一致
//! 4. 完全一致（大文字小文字を区別）
//! 5. 正規化後の一致（数値・通貨の表記揺れもここで吸収）
//! 6. 日付の同値（日付同士は部分一致の対象外）
//! 7. 部分一致（短い方が長い方に含まれ、長さの比が閾値以上。数値同士は対象外）
//! 8. 上記以外 → 不一致

use crate::date::{compare_dates, is_date_like};
use crate::normalizer::{normalize, value_state, ValueState};
use crate::types::{ComparisonResult, Confidence, MatchType};

/// 部分一致とみなす最小の長さ比（短い方 / 長い方）
pub const DEFAULT_PARTIAL_MIN_RATIO: f64 = 0.6;

/// 比較オプション
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparatorOptions {
    /// 部分一致の最小長さ比（0〜1）
    pub partial_min_ratio: f64,
}

impl Default for ComparatorOptions {
    fn default() -> Self {
        Self {
            partial_min_ratio: DEFAULT_PARTIAL_MIN_RATIO,
        }
    }
}

/// 抽出値と正解値を比較（既定オプション）
pub fn compare_values(predicted: &str, ground_truth: &str) -> ComparisonResult {
    compare_values_with(predicted, ground_truth, &ComparatorOptions::default())
}

/// 抽出値と正解値を比較
pub fn compare_values_with(
    predicted: &str,
    ground_truth: &str,
    options: &ComparatorOptions,
) -> ComparisonResult {
    let predicted_state = value_state(predicted);
    let truth_state = value_state(ground_truth);

    if predicted_state.is_excluded() || truth_state.is_excluded() {
        return ComparisonResult::mismatch();
    }

    match (predicted_state, truth_state) {
        (ValueState::NotPresent, ValueState::NotPresent) => {
            return ComparisonResult::matched(MatchType::Exact, Confidence::High);
        }
        (ValueState::NotPresent, _) | (_, ValueState::NotPresent) => {
            return ComparisonResult::mismatch();
        }
        (ValueState::Empty, _) | (_, ValueState::Empty) => {
            return ComparisonResult::mismatch();
        }
        _ => {}
    }

    if predicted == ground_truth {
        return ComparisonResult::matched(MatchType::Exact, Confidence::High);
    }

    let normalized_predicted = normalize(predicted);
    let normalized_truth = normalize(ground_truth);

    if !normalized_predicted.is_empty() && normalized_predicted == normalized_truth {
        return ComparisonResult::matched(MatchType::Normalized, Confidence::High);
    }

    if is_date_like(predicted) && is_date_like(ground_truth) {
        if compare_dates(predicted, ground_truth) {
            return ComparisonResult::matched(MatchType::DateFormat, Confidence::High);
        }
        return ComparisonResult::mismatch();
    }

    if is_partial_match(&normalized_predicted, &normalized_truth, options.partial_min_ratio) {
        return ComparisonResult::matched(MatchType::Partial, Confidence::Medium);
    }

    ComparisonResult::mismatch()
}

/// 正規化後の値が数字と空白だけで構成されているか
fn is_numeric(normalized: &str) -> bool {
    normalized.chars().any(|c| c.is_ascii_digit())
        && normalized
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace())
}

/// 短い方が長い方に含まれ、かつ長さ比が閾値以上か
///
/// 桁区切りや小数点は正規化で消えるため、数値同士は桁違いでも含まれてしまう。
/// 両方が数値の場合は部分一致を認めない。
fn is_partial_match(a: &str, b: &str, min_ratio: f64) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    if is_numeric(a) && is_numeric(b) {
        return false;
    }

    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let (shorter, longer, shorter_len, longer_len) = if a_len <= b_len {
        (a, b, a_len, b_len)
    } else {
        (b, a, b_len, a_len)
    };

    if !longer.contains(shorter) {
        return false;
    }

    shorter_len as f64 / longer_len as f64 >= min_ratio
}
