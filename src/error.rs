use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("スナップショットが不正: {0}")]
    InvalidSnapshot(String),

    #[error("未定義のフィールド: {0}")]
    UnknownField(String),

    #[error("評価エラー: {0}")]
    Engine(#[from] extract_eval_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),
}

pub type Result<T> = std::result::Result<T, EvalError>;
