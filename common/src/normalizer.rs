//! 値の正規化と予約状態の判定
//!
//! 比較前に抽出値を正規形に揃える。
//!
//! ## 正規化の手順
//! 1. 前後の空白除去・小文字化
//! 2. 括弧書き（内容ごと）の除去
//! 3. 句読点・引用符・通貨記号・パーセント・アポストロフィの除去
//! 4. ハイフンを空白に置換し、連続する空白を1つにまとめる

use lazy_static::lazy_static;
use regex::Regex;

/// 「値なし」を表す予約値
pub const NOT_PRESENT: &str = "Not Present";

/// 抽出待ち状態のプレフィックス
pub const PENDING_PREFIX: &str = "Pending";

/// 抽出エラー状態のプレフィックス
pub const ERROR_PREFIX: &str = "Error:";

/// 値の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueState {
    /// 予約値（値なし）
    NotPresent,
    /// 抽出待ち
    Pending,
    /// 抽出エラー
    Error,
    /// 空文字・空白のみ
    Empty,
    /// 通常の値
    Value,
}

impl ValueState {
    /// 比較・集計から除外すべき状態か
    pub fn is_excluded(self) -> bool {
        matches!(self, ValueState::Pending | ValueState::Error)
    }
}

/// 値の状態を判定
pub fn value_state(value: &str) -> ValueState {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        ValueState::Empty
    } else if trimmed == NOT_PRESENT {
        ValueState::NotPresent
    } else if trimmed.starts_with(PENDING_PREFIX) {
        ValueState::Pending
    } else if trimmed.starts_with(ERROR_PREFIX) {
        ValueState::Error
    } else {
        ValueState::Value
    }
}

/// 予約値（値なし）か
pub fn is_not_present(value: &str) -> bool {
    value_state(value) == ValueState::NotPresent
}

/// 抽出待ち状態か
pub fn is_pending(value: &str) -> bool {
    value_state(value) == ValueState::Pending
}

/// 抽出エラー状態か
pub fn is_error(value: &str) -> bool {
    value_state(value) == ValueState::Error
}

/// 除外対象（抽出待ち・エラー）か
pub fn is_excluded_state(value: &str) -> bool {
    value_state(value).is_excluded()
}

/// 空文字・空白のみか
///
/// 予約値とは区別される。空文字同士は一致しない。
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// 比較用に値を正規化
pub fn normalize(value: &str) -> String {
    lazy_static! {
        // 括弧書き（内容ごと除去）
        static ref BRACKETED_RE: Regex = Regex::new(r"\([^)]*\)|\[[^\]]*\]|\{[^}]*\}").unwrap();
        // 対応の取れていない括弧
        static ref BRACKET_RE: Regex = Regex::new(r"[()\[\]{}]").unwrap();
        // 句読点・引用符・通貨記号・パーセント
        static ref PUNCT_RE: Regex = Regex::new(r#"[,.;:!?'"`‘’“”$€£¥₹%]"#).unwrap();
        // ハイフン・ダッシュ
        static ref DASH_RE: Regex = Regex::new(r"[-‐‑–—]").unwrap();
        static ref SPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    }

    let lowered = value.trim().to_lowercase();
    let without_brackets = BRACKETED_RE.replace_all(&lowered, " ");
    let without_brackets = BRACKET_RE.replace_all(&without_brackets, " ");
    let without_punct = PUNCT_RE.replace_all(&without_brackets, "");
    let without_dash = DASH_RE.replace_all(&without_punct, " ");

    SPACE_RE.replace_all(&without_dash, " ").trim().to_string()
}
