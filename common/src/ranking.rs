//! フィールド勝者の判定と順位付け

use crate::types::{FieldDefinition, FieldPerformance, ModelSummary};
use std::cmp::Ordering;

/// フィールドごとに最高精度のモデルを勝者にする
///
/// 最高値に並んだモデルはすべて勝者となり、2モデル以上なら共同勝利とする。
/// `fields_won` は集計対象設定に関係なく数える。
pub fn determine_field_winners(summaries: &mut [ModelSummary], fields: &[FieldDefinition]) {
    for field in fields {
        let best = summaries
            .iter()
            .filter_map(|s| field_accuracy(s, &field.key))
            .fold(None, |best: Option<f64>, accuracy| match best {
                Some(current) if current >= accuracy => Some(current),
                _ => Some(accuracy),
            });

        let Some(best) = best else {
            continue;
        };

        let winners = summaries
            .iter()
            .filter(|s| field_accuracy(s, &field.key) == Some(best))
            .count();

        for summary in summaries.iter_mut() {
            if let Some(performance) = summary
                .field_performance
                .iter_mut()
                .find(|p| p.field_key == field.key)
            {
                performance.is_winner = performance.accuracy == best;
                performance.is_shared_victory = performance.is_winner && winners > 1;
            }
        }
    }

    for summary in summaries.iter_mut() {
        summary.fields_won = summary
            .field_performance
            .iter()
            .filter(|p| p.is_winner)
            .count();
    }
}

fn field_accuracy(summary: &ModelSummary, field_key: &str) -> Option<f64> {
    summary
        .field_performance
        .iter()
        .find(|p| p.field_key == field_key)
        .map(|p| p.accuracy)
}

/// 勝者欄の表示（単独勝利 ★、共同勝利 ☆）
pub fn winner_label(performance: &FieldPerformance) -> &'static str {
    match (performance.is_winner, performance.is_shared_victory) {
        (true, true) => "☆ shared",
        (true, false) => "★",
        _ => "",
    }
}

/// 総合精度の降順、同率なら F1 の降順で並べる
///
/// 両方とも同じ場合は元の順序を保つ（安定ソート）。
pub fn compare_summaries(a: &ModelSummary, b: &ModelSummary) -> Ordering {
    b.overall_accuracy
        .total_cmp(&a.overall_accuracy)
        .then_with(|| b.overall_f1.total_cmp(&a.overall_f1))
}

/// サマリを並べ替え、1始まりの順位を設定
pub fn assign_ranks(summaries: &mut [ModelSummary]) {
    summaries.sort_by(compare_summaries);

    for (index, summary) in summaries.iter_mut().enumerate() {
        summary.rank = index + 1;
    }
}
