//! Excel生成（共通ライブラリ）
//!
//! リーダーボードを2シート構成のExcelに変換する。
//! - Leaderboard: 順位・総合指標
//! - Fields: モデル×フィールドの成績と勝者表示

use crate::ranking::winner_label;
use crate::types::ModelSummary;
use rust_xlsxwriter::*;

const LEADERBOARD_HEADERS: [&str; 8] = [
    "Rank",
    "Model",
    "Accuracy",
    "Precision",
    "Recall",
    "F1",
    "Fields Won",
    "Total Fields",
];

const FIELD_HEADERS: [&str; 8] = [
    "Model",
    "Field",
    "Accuracy",
    "Precision",
    "Recall",
    "F1",
    "Winner",
    "Included",
];

fn write_headers(worksheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), String> {
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }
    Ok(())
}

fn write_metrics(
    worksheet: &mut Worksheet,
    row: u32,
    first_col: u16,
    values: [f64; 4],
    format: &Format,
) -> Result<(), String> {
    for (offset, value) in values.iter().enumerate() {
        worksheet
            .write_number_with_format(row, first_col + offset as u16, *value, format)
            .map_err(|e| format!("数値書き込みエラー: {}", e))?;
    }
    Ok(())
}

/// リーダーボードをExcelバッファに生成
///
/// # Arguments
/// * `summaries` - 順位付け済みのモデル別サマリ
pub fn generate_leaderboard_buffer(summaries: &[ModelSummary]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    // フォーマット定義
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let percent_format = Format::new()
        .set_num_format("0.0%")
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let text_format = Format::new()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let excluded_format = Format::new()
        .set_font_color(Color::RGB(0x999999))
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    // Leaderboardシート
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Leaderboard")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_headers(worksheet, &LEADERBOARD_HEADERS, &header_format)?;
    worksheet
        .set_column_width(1, 28)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;

    for (index, summary) in summaries.iter().enumerate() {
        let row = index as u32 + 1;
        worksheet
            .write_number_with_format(row, 0, summary.rank as f64, &text_format)
            .map_err(|e| format!("順位書き込みエラー: {}", e))?;
        worksheet
            .write_string_with_format(row, 1, &summary.model_name, &text_format)
            .map_err(|e| format!("モデル名書き込みエラー: {}", e))?;
        write_metrics(
            worksheet,
            row,
            2,
            [
                summary.overall_accuracy,
                summary.overall_precision,
                summary.overall_recall,
                summary.overall_f1,
            ],
            &percent_format,
        )?;
        worksheet
            .write_number_with_format(row, 6, summary.fields_won as f64, &text_format)
            .map_err(|e| format!("勝利数書き込みエラー: {}", e))?;
        worksheet
            .write_number_with_format(row, 7, summary.total_fields as f64, &text_format)
            .map_err(|e| format!("フィールド数書き込みエラー: {}", e))?;
    }

    // Fieldsシート
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Fields")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    write_headers(worksheet, &FIELD_HEADERS, &header_format)?;
    worksheet
        .set_column_width(0, 28)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    worksheet
        .set_column_width(1, 24)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;

    let mut row: u32 = 1;
    for summary in summaries {
        for performance in &summary.field_performance {
            // 集計対象外のフィールドは灰色表示
            let format = if performance.is_included_in_metrics {
                &text_format
            } else {
                &excluded_format
            };

            worksheet
                .write_string_with_format(row, 0, &summary.model_name, format)
                .map_err(|e| format!("モデル名書き込みエラー: {}", e))?;
            worksheet
                .write_string_with_format(row, 1, &performance.field_name, format)
                .map_err(|e| format!("フィールド名書き込みエラー: {}", e))?;
            write_metrics(
                worksheet,
                row,
                2,
                [
                    performance.accuracy,
                    performance.precision,
                    performance.recall,
                    performance.f1,
                ],
                &percent_format,
            )?;
            worksheet
                .write_string_with_format(row, 6, winner_label(performance), format)
                .map_err(|e| format!("勝者書き込みエラー: {}", e))?;
            let included = if performance.is_included_in_metrics { "yes" } else { "no" };
            worksheet
                .write_string_with_format(row, 7, included, format)
                .map_err(|e| format!("集計対象書き込みエラー: {}", e))?;

            row += 1;
        }
    }

    // バッファに書き出し
    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldPerformance;

    fn sample_summary() -> ModelSummary {
        ModelSummary {
            model_name: "gpt".to_string(),
            overall_accuracy: 0.75,
            overall_f1: 0.7,
            rank: 1,
            fields_won: 1,
            total_fields: 1,
            field_performance: vec![FieldPerformance {
                field_key: "vendor".to_string(),
                field_name: "Vendor".to_string(),
                accuracy: 0.75,
                is_winner: true,
                is_included_in_metrics: true,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_leaderboard_buffer() {
        let buffer = generate_leaderboard_buffer(&[sample_summary()]).expect("Excel生成失敗");
        // xlsxはZIP形式
        assert!(buffer.starts_with(b"PK"));
    }

    #[test]
    fn test_generate_empty_leaderboard() {
        let buffer = generate_leaderboard_buffer(&[]).expect("Excel生成失敗");
        assert!(!buffer.is_empty());
    }
}
