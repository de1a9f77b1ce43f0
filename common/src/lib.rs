//! Extract Eval Common Library
//!
//! 抽出値と正解データの照合、フィールド指標の算出、モデルのランキングを行う評価エンジン。
//! すべて純粋関数で、入出力・時刻・乱数に依存しない。
//!
//! ```text
//! 抽出値・正解値 → comparator → confusion → metrics
//!                → summary → ranking（勝者判定・順位付け）→ リーダーボード
//! ```

pub mod comparator;
pub mod confusion;
pub mod dataset;
pub mod date;
pub mod error;
pub mod export;
pub mod metrics;
pub mod normalizer;
pub mod ranking;
pub mod summary;
pub mod types;

pub use comparator::{compare_values, compare_values_with, ComparatorOptions};
pub use confusion::{accumulate, ConfusionAccumulator, PairOutcome};
pub use dataset::{
    discover_models, evaluate_snapshot, EvaluationOptions, FieldEvaluation, Leaderboard,
    MetricsTable,
};
pub use date::{compare_dates, is_date_like, ParsedDate};
pub use error::{Error, Result};
pub use metrics::{
    calculate_field_metrics, calculate_field_metrics_with_debug, metrics_from_counts,
    FieldMetricsWithDebug,
};
pub use normalizer::{normalize, ERROR_PREFIX, NOT_PRESENT, PENDING_PREFIX};
pub use ranking::{assign_ranks, determine_field_winners, winner_label};
pub use summary::calculate_model_summaries;
pub use types::{
    ComparisonResult, Confidence, ConfusionDebugInfo, EvaluationSnapshot, FieldDefinition,
    FieldInclusion, FieldPerformance, FieldSettings, FieldType, MatchClassification, MatchType,
    MetricsResult, ModelSummary, ResultRow, GROUND_TRUTH_MODEL,
};
