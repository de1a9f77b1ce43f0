use anyhow::Context;
use clap::Parser;
use extract_eval::{cache, cli, config, export, report, snapshot};
use extract_eval_common::{compare_values_with, evaluate_snapshot, ComparatorOptions};
use cli::{Cli, Commands};
use config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().context("設定の読み込みに失敗")?;

    match cli.command {
        Commands::Evaluate { input, output, format, title, exclude_fields, use_cache, debug } => {
            println!("📊 extract-eval - 精度評価\n");

            // 1. スナップショット読み込み
            println!("[1/3] スナップショットを読み込み中...");
            let mut snapshot = snapshot::load_snapshot(&input)
                .with_context(|| format!("{} の読み込みに失敗", input.display()))?;
            snapshot::apply_exclusions(&mut snapshot, &exclude_fields)?;
            println!(
                "✔ {}フィールド / {}ファイル\n",
                snapshot.fields.len(),
                snapshot.rows.len()
            );

            // 2. 評価
            println!("[2/3] 評価中...{}", if use_cache { " (キャッシュ有効)" } else { "" });
            let options = config.evaluation_options();
            let base_dir = input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(std::path::Path::new("."))
                .to_path_buf();
            let source = input.display().to_string();
            let hash = cache::compute_snapshot_hash(&snapshot, &options)?;

            let leaderboard = if use_cache {
                let (leaderboard, hit) =
                    cache::evaluate_with_cache(&snapshot, &options, &hash, &base_dir, &source)?;
                if hit {
                    println!("✔ キャッシュから取得\n");
                } else {
                    println!("✔ 評価完了\n");
                }
                leaderboard
            } else {
                let leaderboard = evaluate_snapshot(&snapshot, &options)?;
                println!("✔ 評価完了\n");
                leaderboard
            };

            if let Some(winner) = leaderboard.winner() {
                tracing::info!(
                    model = %winner.model_name,
                    accuracy = winner.overall_accuracy,
                    "top ranked model"
                );
            }

            // 3. 出力
            println!("[3/3] 出力中...");
            let format = match format {
                Some(format) => format,
                None => config
                    .default_format
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))?,
            };
            let metadata = report::ReportMetadata::new(&title, &source, &hash, &options);
            let report = report::EvaluationReport::new(metadata, leaderboard);
            let output_dir = output.unwrap_or(base_dir);
            export::export_report(&report, &format, &output_dir, &title, debug)?;

            println!("\n✅ 完了");
        }

        Commands::Compare { predicted, ground_truth } => {
            let options = ComparatorOptions {
                partial_min_ratio: config.partial_min_ratio,
            };
            let result = compare_values_with(&predicted, &ground_truth, &options);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Config { set_partial_ratio, set_example_limit, set_default_format, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(ratio) = set_partial_ratio {
                config.set_partial_min_ratio(ratio)?;
                changed = true;
            }

            if let Some(limit) = set_example_limit {
                config.example_limit = limit;
                changed = true;
            }

            if let Some(format) = set_default_format {
                config.default_format = format.to_string();
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  部分一致の最小長さ比: {}", config.partial_min_ratio);
                println!("  サンプル数: {}", config.example_limit);
                println!("  既定の出力形式: {}", config.default_format);
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }

        Commands::Cache { folder, clear, info } => {
            let target = folder.unwrap_or_else(|| std::path::PathBuf::from("."));
            let cache_path = cache::CacheFile::cache_path(&target);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let cache = cache::CacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match cache::CacheFile::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}
