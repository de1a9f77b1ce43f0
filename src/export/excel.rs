//! Excel生成（CLI版）
//!
//! 共通ライブラリの excel_core でバッファを生成してファイルに保存

use crate::error::{EvalError, Result};
use extract_eval_common::export::excel_core::generate_leaderboard_buffer;
use extract_eval_common::ModelSummary;
use std::path::Path;

pub fn generate_excel(summaries: &[ModelSummary], output_path: &Path) -> Result<()> {
    let buffer = generate_leaderboard_buffer(summaries).map_err(EvalError::ExcelGeneration)?;

    std::fs::write(output_path, buffer)
        .map_err(|e| EvalError::ExcelGeneration(format!("ファイル保存エラー: {}", e)))?;

    Ok(())
}
