use crate::error::{EvalError, Result};
use extract_eval_common::{ComparatorOptions, EvaluationOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 部分一致閾値の環境変数
pub const PARTIAL_RATIO_ENV: &str = "EXTRACT_EVAL_PARTIAL_RATIO";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 部分一致の最小長さ比
    pub partial_min_ratio: f64,
    /// 混同行列のバケットごとのサンプル数
    pub example_limit: usize,
    /// 既定の出力形式（json/excel/text/all）
    pub default_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            partial_min_ratio: extract_eval_common::comparator::DEFAULT_PARTIAL_MIN_RATIO,
            example_limit: extract_eval_common::confusion::DEFAULT_EXAMPLE_LIMIT,
            default_format: "text".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        config.with_env_overrides()
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| EvalError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("extract-eval").join("config.json"))
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        // 環境変数を優先
        if let Ok(value) = std::env::var(PARTIAL_RATIO_ENV) {
            let ratio = value.trim().parse::<f64>().map_err(|_| {
                EvalError::Config(format!("{} が数値ではありません: {}", PARTIAL_RATIO_ENV, value))
            })?;
            self.set_partial_min_ratio(ratio)?;
        }
        Ok(self)
    }

    /// 部分一致の閾値を設定（0〜1）
    pub fn set_partial_min_ratio(&mut self, ratio: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(EvalError::Config(format!(
                "部分一致の閾値は0〜1で指定してください: {}",
                ratio
            )));
        }
        self.partial_min_ratio = ratio;
        Ok(())
    }

    /// 評価エンジンのオプションに変換
    pub fn evaluation_options(&self) -> EvaluationOptions {
        EvaluationOptions {
            comparator: ComparatorOptions {
                partial_min_ratio: self.partial_min_ratio,
            },
            example_limit: self.example_limit,
        }
    }
}
