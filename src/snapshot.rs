//! スナップショットの読み込みと検証

use crate::error::{EvalError, Result};
use extract_eval_common::{EvaluationSnapshot, FieldInclusion};
use std::collections::HashSet;
use std::path::Path;

/// スナップショットJSONを読み込んで検証
pub fn load_snapshot(path: &Path) -> Result<EvaluationSnapshot> {
    if !path.exists() {
        return Err(EvalError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let snapshot: EvaluationSnapshot = serde_json::from_str(&content)?;
    validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

/// フィールドキーの重複・空キーを検出
pub fn validate_snapshot(snapshot: &EvaluationSnapshot) -> Result<()> {
    let mut seen = HashSet::new();

    for field in &snapshot.fields {
        if field.key.trim().is_empty() {
            return Err(EvalError::InvalidSnapshot(format!(
                "フィールドキーが空です: {}",
                field.name
            )));
        }
        if !seen.insert(field.key.as_str()) {
            return Err(EvalError::InvalidSnapshot(format!(
                "フィールドキーが重複しています: {}",
                field.key
            )));
        }
    }

    for key in snapshot.field_settings.keys() {
        if !seen.contains(key.as_str()) {
            tracing::warn!(field = %key, "設定に未定義のフィールドがあります");
        }
    }

    Ok(())
}

/// 指定フィールドを集計対象外にする
pub fn apply_exclusions(snapshot: &mut EvaluationSnapshot, field_keys: &[String]) -> Result<()> {
    for key in field_keys {
        if !snapshot.fields.iter().any(|f| &f.key == key) {
            return Err(EvalError::UnknownField(key.clone()));
        }
        snapshot.field_settings.insert(
            key.clone(),
            FieldInclusion {
                include_in_metrics: false,
            },
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract_eval_common::FieldDefinition;

    fn snapshot() -> EvaluationSnapshot {
        EvaluationSnapshot {
            fields: vec![
                FieldDefinition::new("vendor", "Vendor"),
                FieldDefinition::new("total", "Total"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_duplicate_keys() {
        let mut snapshot = snapshot();
        snapshot.fields.push(FieldDefinition::new("vendor", "Vendor 2"));
        assert!(matches!(
            validate_snapshot(&snapshot),
            Err(EvalError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_validate_empty_key() {
        let mut snapshot = snapshot();
        snapshot.fields.push(FieldDefinition::new(" ", "Blank"));
        assert!(validate_snapshot(&snapshot).is_err());
    }

    #[test]
    fn test_apply_exclusions() {
        let mut snapshot = snapshot();
        apply_exclusions(&mut snapshot, &["total".to_string()]).unwrap();
        assert_eq!(
            snapshot.field_settings.get("total"),
            Some(&FieldInclusion {
                include_in_metrics: false
            })
        );
        assert!(snapshot.field_settings.get("vendor").is_none());
    }

    #[test]
    fn test_apply_exclusions_unknown_field() {
        let mut snapshot = snapshot();
        let result = apply_exclusions(&mut snapshot, &["missing".to_string()]);
        assert!(matches!(result, Err(EvalError::UnknownField(key)) if key == "missing"));
    }
}
