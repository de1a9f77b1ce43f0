pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use crate::report::EvaluationReport;
use std::path::{Path, PathBuf};

fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.with_extension(extension)
    }
}

/// レポートを指定形式で出力し、書き出したファイルのパスを返す
///
/// テキスト形式は標準出力にも表示する。
pub fn export_report(
    report: &EvaluationReport,
    format: &ExportFormat,
    output: &Path,
    title: &str,
    debug: bool,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if output.extension().is_none() {
        std::fs::create_dir_all(output)?;
    }

    if matches!(format, ExportFormat::Text | ExportFormat::All) {
        let text = report.to_text();
        println!("{}", text);
        if matches!(format, ExportFormat::All) {
            let path = output_path_for_format(output, title, "txt");
            std::fs::write(&path, text)?;
            written.push(path);
        }
    }

    if matches!(format, ExportFormat::Json | ExportFormat::All) {
        let path = output_path_for_format(output, title, "json");
        println!("- JSONを生成中...");
        std::fs::write(&path, report.to_json(debug)?)?;
        println!("✔ JSON出力: {}", path.display());
        written.push(path);
    }

    if matches!(format, ExportFormat::Excel | ExportFormat::All) {
        let path = output_path_for_format(output, title, "xlsx");
        println!("- Excelを生成中...");
        excel::generate_excel(&report.leaderboard.summaries, &path)?;
        println!("✔ Excel出力: {}", path.display());
        written.push(path);
    }

    Ok(written)
}
