//! 評価エンジンの型定義
//!
//! 入力（外部から供給される）:
//! - FieldDefinition / ResultRow / FieldSettings: 評価対象のスナップショット
//!
//! 出力（毎回生成され、保持されない）:
//! - ComparisonResult: 値1組の比較判定
//! - ConfusionDebugInfo / MetricsResult: フィールド×モデルの集計
//! - ModelSummary / FieldPerformance: リーダーボード

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 正解データとして扱う予約モデル名
pub const GROUND_TRUTH_MODEL: &str = "Ground Truth";

/// 一致の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Normalized,
    Partial,
    DateFormat,
    None,
}

/// レポート上のグルーピング用ラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchClassification {
    Exact,
    Normalized,
    Partial,
    DifferentFormat,
    None,
}

impl From<MatchType> for MatchClassification {
    fn from(match_type: MatchType) -> Self {
        match match_type {
            MatchType::Exact => MatchClassification::Exact,
            MatchType::Normalized => MatchClassification::Normalized,
            MatchType::Partial => MatchClassification::Partial,
            MatchType::DateFormat => MatchClassification::DifferentFormat,
            MatchType::None => MatchClassification::None,
        }
    }
}

impl std::fmt::Display for MatchClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchClassification::Exact => write!(f, "exact"),
            MatchClassification::Normalized => write!(f, "normalized"),
            MatchClassification::Partial => write!(f, "partial"),
            MatchClassification::DifferentFormat => write!(f, "different-format"),
            MatchClassification::None => write!(f, "none"),
        }
    }
}

/// 判定の確信度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// 値1組の比較結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub is_match: bool,
    pub match_type: MatchType,
    pub match_classification: MatchClassification,
    pub confidence: Confidence,
}

impl ComparisonResult {
    /// 一致として判定
    pub fn matched(match_type: MatchType, confidence: Confidence) -> Self {
        Self {
            is_match: true,
            match_type,
            match_classification: match_type.into(),
            confidence,
        }
    }

    /// 不一致として判定（不一致は常に高確信度）
    pub fn mismatch() -> Self {
        Self {
            is_match: false,
            match_type: MatchType::None,
            match_classification: MatchClassification::None,
            confidence: Confidence::High,
        }
    }
}

/// デバッグ用のサンプルペア
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamplePair {
    pub index: usize,
    pub predicted: String,
    pub ground_truth: String,
}

/// 混同行列の各バケットのサンプル
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionExamples {
    pub tp: Vec<ExamplePair>,
    pub fp: Vec<ExamplePair>,
    #[serde(rename = "fn")]
    pub fn_: Vec<ExamplePair>,
    pub tn: Vec<ExamplePair>,
}

/// 混同行列のカウントとサンプル
///
/// 誤った値は FP と FN の両方に計上されるため、
/// `TP + FP + FN + TN >= total_valid_pairs` となる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfusionDebugInfo {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
    pub total_valid_pairs: usize,
    pub examples: ConfusionExamples,
}

/// フィールド単位の指標（すべて 0〜1）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// フィールドの種類
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Date,
    Number,
    Currency,
    Other,
}

/// フィールド定義
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub key: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            field_type: FieldType::default(),
        }
    }
}

/// フィールドの集計対象設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInclusion {
    pub include_in_metrics: bool,
}

impl Default for FieldInclusion {
    fn default() -> Self {
        Self {
            include_in_metrics: true,
        }
    }
}

/// フィールドキー → 集計対象設定
pub type FieldSettings = BTreeMap<String, FieldInclusion>;

/// フィールドが集計対象かどうか（明示的に false の場合のみ除外）
pub fn is_field_included(settings: Option<&FieldSettings>, field_key: &str) -> bool {
    settings
        .and_then(|s| s.get(field_key))
        .map_or(true, |inclusion| inclusion.include_in_metrics)
}

/// 1ファイル分の抽出結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultRow {
    pub file_name: String,
    /// フィールドキー → モデル名 → 抽出値
    pub values: BTreeMap<String, BTreeMap<String, String>>,
}

impl ResultRow {
    /// 指定フィールド・モデルの値を取得
    pub fn value(&self, field_key: &str, model: &str) -> Option<&str> {
        self.values
            .get(field_key)
            .and_then(|models| models.get(model))
            .map(String::as_str)
    }

    /// 正解値を取得
    pub fn ground_truth(&self, field_key: &str) -> Option<&str> {
        self.value(field_key, GROUND_TRUTH_MODEL)
    }
}

/// 評価対象スナップショット
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluationSnapshot {
    pub fields: Vec<FieldDefinition>,
    pub rows: Vec<ResultRow>,
    pub field_settings: FieldSettings,
}

/// モデルのフィールド別成績
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPerformance {
    pub field_key: String,
    pub field_name: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub is_winner: bool,
    pub is_shared_victory: bool,
    pub is_included_in_metrics: bool,
}

/// モデルの総合成績
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub model_name: String,
    pub overall_accuracy: f64,
    pub overall_precision: f64,
    pub overall_recall: f64,
    #[serde(rename = "overallF1")]
    pub overall_f1: f64,
    pub fields_won: usize,
    pub total_fields: usize,
    pub rank: usize,
    pub field_performance: Vec<FieldPerformance>,
}
