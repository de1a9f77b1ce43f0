//! リーダーボードキャッシュモジュール
//!
//! スナップショットと評価オプションのSHA-256ハッシュをキーにして
//! 評価結果をキャッシュし、同じ入力の再計算をスキップする。

use crate::error::Result;
use extract_eval_common::{evaluate_snapshot, EvaluationOptions, EvaluationSnapshot, Leaderboard};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = ".leaderboard-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// スナップショットハッシュ → 評価結果のマップ
    entries: HashMap<String, CacheEntry>,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// 入力ファイル名
    pub source: String,
    /// 評価結果
    pub leaderboard: Leaderboard,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 1;

    /// キャッシュファイルのパス
    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, CacheFile>(reader) {
            Ok(cache) => {
                // バージョンチェック
                if cache.version != Self::CURRENT_VERSION {
                    tracing::warn!(
                        found = cache.version,
                        expected = Self::CURRENT_VERSION,
                        "キャッシュバージョン不一致、再生成します"
                    );
                    return Self::default();
                }
                cache
            }
            Err(e) => {
                tracing::warn!(error = %e, "キャッシュ読み込み失敗、再生成します");
                Self::default()
            }
        }
    }

    /// キャッシュファイルを保存
    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（存在しなければ false）
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(cache_path)?;
        Ok(true)
    }

    /// キャッシュをルックアップ
    pub fn get(&self, hash: &str) -> Option<&Leaderboard> {
        self.entries.get(hash).map(|e| &e.leaderboard)
    }

    /// キャッシュに追加
    pub fn insert(&mut self, hash: String, source: String, leaderboard: Leaderboard) {
        self.entries.insert(hash, CacheEntry { source, leaderboard });
    }

    /// キャッシュ件数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// スナップショットと評価オプションのハッシュを計算（SHA-256）
pub fn compute_snapshot_hash(
    snapshot: &EvaluationSnapshot,
    options: &EvaluationOptions,
) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(snapshot)?);
    hasher.update(options.comparator.partial_min_ratio.to_le_bytes());
    hasher.update((options.example_limit as u64).to_le_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// キャッシュを使用して評価
///
/// `hash` は `compute_snapshot_hash` で計算済みの値を渡す。
/// 戻り値の bool はキャッシュヒットしたかどうか。
pub fn evaluate_with_cache(
    snapshot: &EvaluationSnapshot,
    options: &EvaluationOptions,
    hash: &str,
    folder: &Path,
    source: &str,
) -> Result<(Leaderboard, bool)> {
    let mut cache = CacheFile::load(folder);

    if let Some(leaderboard) = cache.get(hash) {
        tracing::debug!(hash = %hash, "cache hit");
        return Ok((leaderboard.clone(), true));
    }

    let leaderboard = evaluate_snapshot(snapshot, options)?;
    cache.insert(hash.to_string(), source.to_string(), leaderboard.clone());
    cache.save(folder)?;

    Ok((leaderboard, false))
}
