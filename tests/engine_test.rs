//! 評価エンジンの結合テスト
//!
//! 比較 → 混同行列 → 指標 → サマリ → 勝者判定 → 順位付けの一連の流れを検証

use extract_eval_common::{
    assign_ranks, calculate_field_metrics, calculate_model_summaries, compare_values,
    determine_field_winners, evaluate_snapshot, EvaluationOptions, EvaluationSnapshot,
    FieldDefinition, FieldInclusion, FieldSettings, MatchType, MetricsResult, MetricsTable,
    ResultRow, GROUND_TRUTH_MODEL, NOT_PRESENT,
};
use std::collections::BTreeMap;

fn row(file_name: &str, values: &[(&str, Vec<(&str, &str)>)]) -> ResultRow {
    let mut map = BTreeMap::new();
    for (field, models) in values {
        let model_values: BTreeMap<String, String> = models
            .iter()
            .map(|(m, v)| (m.to_string(), v.to_string()))
            .collect();
        map.insert(field.to_string(), model_values);
    }
    ResultRow {
        file_name: file_name.to_string(),
        values: map,
    }
}

fn invoice_snapshot() -> EvaluationSnapshot {
    let gt = GROUND_TRUTH_MODEL;
    EvaluationSnapshot {
        fields: vec![
            FieldDefinition::new("vendor", "Vendor"),
            FieldDefinition::new("invoice_date", "Invoice Date"),
            FieldDefinition::new("total", "Total"),
        ],
        rows: vec![
            row(
                "invoice-1.pdf",
                &[
                    ("vendor", vec![(gt, "Acme Corp"), ("alpha", "ACME Corp."), ("beta", "Acme Corp")]),
                    ("invoice_date", vec![(gt, "2025-01-15"), ("alpha", "01/15/2025"), ("beta", "2025-01-16")]),
                    ("total", vec![(gt, "$1,234.56"), ("alpha", "1234.56"), ("beta", "$1,234.56")]),
                ],
            ),
            row(
                "invoice-2.pdf",
                &[
                    ("vendor", vec![(gt, "Beta Inc"), ("alpha", "Wrong Inc"), ("beta", "Beta Inc")]),
                    ("invoice_date", vec![(gt, NOT_PRESENT), ("alpha", NOT_PRESENT), ("beta", "2025-02-01")]),
                    ("total", vec![(gt, "$99.00"), ("alpha", "Pending..."), ("beta", "Error: timeout")]),
                ],
            ),
            row(
                "invoice-3.pdf",
                &[
                    ("vendor", vec![(gt, "Charlie Co"), ("alpha", "Charlie Co"), ("beta", "Charlie Co")]),
                    ("invoice_date", vec![(gt, "March 3, 2025"), ("alpha", "2025-03-03"), ("beta", "2025-03-03")]),
                    ("total", vec![(gt, "500"), ("alpha", "500"), ("beta", "$500")]),
                ],
            ),
        ],
        field_settings: FieldSettings::new(),
    }
}

/// 仕様例: 誤った値1件は全指標0
#[test]
fn test_single_wrong_value_metrics() {
    let metrics = calculate_field_metrics(&["Wrong Corp"], &["Acme Corp"]).unwrap();
    assert_eq!(metrics, MetricsResult::default());
}

/// 仕様例: 3件中2件正解
#[test]
fn test_two_of_three_metrics() {
    let metrics = calculate_field_metrics(
        &["Acme Corp", "Wrong Inc", "Charlie Co"],
        &["Acme Corp", "Beta Inc", "Charlie Co"],
    )
    .unwrap();
    for value in [metrics.accuracy, metrics.precision, metrics.recall, metrics.f1_score] {
        assert!((value - 2.0 / 3.0).abs() < 0.001);
    }
}

/// 日付表記違いの一致と予約値の非対称性
#[test]
fn test_comparator_contract() {
    let date = compare_values("2025-01-15", "01/15/2025");
    assert!(date.is_match);
    assert_eq!(date.match_type, MatchType::DateFormat);

    let both = compare_values(NOT_PRESENT, NOT_PRESENT);
    assert!(both.is_match);
    assert_eq!(both.match_type, MatchType::Exact);

    for result in [
        compare_values(NOT_PRESENT, "Acme Corp"),
        compare_values("Acme Corp", NOT_PRESENT),
    ] {
        assert!(!result.is_match);
        assert_eq!(result.match_type, MatchType::None);
    }

    assert!(compare_values("123 Main St", "123 Main Street").is_match);
    assert!(!compare_values("Acme", "Beta Corporation").is_match);
}

/// スナップショット全体の評価
#[test]
fn test_evaluate_invoice_snapshot() {
    let leaderboard = evaluate_snapshot(&invoice_snapshot(), &EvaluationOptions::default()).unwrap();
    assert_eq!(leaderboard.summaries.len(), 2);

    let alpha = leaderboard.summary("alpha").unwrap();
    let beta = leaderboard.summary("beta").unwrap();

    // alpha: vendor 2/3, date 3/3, total 2/2（Pendingは除外）
    let alpha_vendor = &alpha.field_performance[0];
    assert!((alpha_vendor.accuracy - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(alpha.field_performance[1].accuracy, 1.0);
    assert_eq!(alpha.field_performance[2].accuracy, 1.0);

    // beta: vendor 3/3, date 1/3, total 2/2（Errorは除外）
    assert_eq!(beta.field_performance[0].accuracy, 1.0);
    assert!((beta.field_performance[1].accuracy - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(beta.field_performance[2].accuracy, 1.0);

    // total は両者同率 → 共同勝利
    assert!(alpha.field_performance[2].is_shared_victory);
    assert!(beta.field_performance[2].is_shared_victory);
    assert_eq!(alpha.fields_won, 2);
    assert_eq!(beta.fields_won, 2);

    // 総合: alpha (2/3+1+1)/3 > beta (1+1/3+1)/3
    assert_eq!(leaderboard.winner().unwrap().model_name, "alpha");
    assert_eq!(beta.rank, 2);

    let total = leaderboard.table.evaluation("total", "alpha").unwrap();
    assert_eq!(total.debug.as_ref().unwrap().total_valid_pairs, 2);
}

/// 弱いフィールドを集計対象外にすると総合精度が上がる
#[test]
fn test_field_exclusion_raises_accuracy() {
    let mut snapshot = invoice_snapshot();
    let base = evaluate_snapshot(&snapshot, &EvaluationOptions::default()).unwrap();
    let base_beta = base.summary("beta").unwrap().overall_accuracy;

    snapshot.field_settings.insert(
        "invoice_date".to_string(),
        FieldInclusion {
            include_in_metrics: false,
        },
    );
    let filtered = evaluate_snapshot(&snapshot, &EvaluationOptions::default()).unwrap();
    let beta = filtered.summary("beta").unwrap();

    assert!(beta.overall_accuracy > base_beta);
    assert_eq!(beta.overall_accuracy, 1.0);
    assert_eq!(beta.total_fields, 3);
    // 勝利数は集計対象設定に依存しない
    assert_eq!(beta.fields_won, base.summary("beta").unwrap().fields_won);
}

/// 全フィールドを対象外にすると総合指標はすべて0
#[test]
fn test_all_fields_excluded() {
    let mut snapshot = invoice_snapshot();
    for field in snapshot.fields.clone() {
        snapshot.field_settings.insert(
            field.key,
            FieldInclusion {
                include_in_metrics: false,
            },
        );
    }
    let leaderboard = evaluate_snapshot(&snapshot, &EvaluationOptions::default()).unwrap();
    for summary in &leaderboard.summaries {
        assert_eq!(summary.overall_accuracy, 0.0);
        assert_eq!(summary.overall_precision, 0.0);
        assert_eq!(summary.overall_recall, 0.0);
        assert_eq!(summary.overall_f1, 0.0);
    }
}

/// 個別関数を組み合わせた場合も同じ結果
#[test]
fn test_manual_pipeline() {
    let fields = vec![FieldDefinition::new("vendor", "Vendor")];
    let mut table = MetricsTable::new();
    let good = calculate_field_metrics(&["Acme", "Beta"], &["Acme", "Beta"]).unwrap();
    let bad = calculate_field_metrics(&["Acme", "Nope"], &["Acme", "Beta"]).unwrap();
    table.insert_metrics("vendor", "good", good);
    table.insert_metrics("vendor", "bad", bad);

    let models = vec!["bad".to_string(), "good".to_string(), "absent".to_string()];
    let mut summaries = calculate_model_summaries(&models, &fields, &table, None);
    determine_field_winners(&mut summaries, &fields);
    assign_ranks(&mut summaries);

    let names: Vec<&str> = summaries.iter().map(|s| s.model_name.as_str()).collect();
    assert_eq!(names, vec!["good", "bad", "absent"]);
    assert_eq!(summaries[2].overall_accuracy, 0.0);
    assert!(summaries[0].field_performance[0].is_winner);
    assert!(!summaries[0].field_performance[0].is_shared_victory);

    // 再実行しても順位は変わらない
    let before: Vec<(String, usize)> =
        summaries.iter().map(|s| (s.model_name.clone(), s.rank)).collect();
    assign_ranks(&mut summaries);
    let after: Vec<(String, usize)> =
        summaries.iter().map(|s| (s.model_name.clone(), s.rank)).collect();
    assert_eq!(before, after);
}

/// 同じ入力からは常に同じリーダーボード
#[test]
fn test_evaluation_is_deterministic() {
    let snapshot = invoice_snapshot();
    let first = evaluate_snapshot(&snapshot, &EvaluationOptions::default()).unwrap();
    for _ in 0..3 {
        let again = evaluate_snapshot(&snapshot, &EvaluationOptions::default()).unwrap();
        assert_eq!(again, first);
    }
}
