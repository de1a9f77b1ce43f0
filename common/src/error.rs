//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Length mismatch: {predictions} predictions vs {ground_truths} ground truth values")]
    LengthMismatch {
        predictions: usize,
        ground_truths: usize,
    },
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
