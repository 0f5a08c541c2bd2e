//! YAMLローダー
//!
//! 読み込み → 構文解析 → 認証情報ファイルの上書きマージ → 型検証 の順で処理する。

use crate::error::{Error, Result};
use crate::resume::ResumeDocument;
use crate::work_history::{ContentFormat, WorkHistoryDocument};
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::fs;
use std::io;
use std::path::Path;

/// YAMLファイルを読み込み、`Value` として返す
pub fn read_yaml(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;

    serde_yaml::from_str(&text).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// 認証情報をトップレベルで上書きマージする（1階層のみ）
///
/// 認証情報が空（null）の場合は何もしない。
pub fn merge_credential(primary: Value, credential: Value) -> std::result::Result<Value, String> {
    let mut base = match primary {
        Value::Mapping(map) => map,
        Value::Null => return Err("ドキュメントが空です".to_string()),
        _ => return Err("トップレベルはマッピングである必要があります".to_string()),
    };

    match credential {
        Value::Null => {}
        Value::Mapping(overlay) => {
            for (key, value) in overlay {
                base.insert(key, value);
            }
        }
        _ => return Err("認証情報ファイルのトップレベルはマッピングである必要があります".to_string()),
    }

    Ok(Value::Mapping(base))
}

/// 本体と認証情報を読み込み、マージ済みの `Value` を返す
fn load_merged(path: &Path, credential: Option<&Path>) -> Result<Value> {
    let primary = read_yaml(path)?;
    let credential_value = match credential {
        Some(cred_path) => read_yaml(cred_path)?,
        None => Value::Null,
    };

    merge_credential(primary, credential_value).map_err(|message| Error::Validation {
        path: path.to_path_buf(),
        message,
    })
}

fn validate<T: DeserializeOwned>(path: &Path, value: Value, context: &str) -> Result<T> {
    serde_yaml::from_value(value).map_err(|e| Error::Validation {
        path: path.to_path_buf(),
        message: format!("{}: {}", context, e),
    })
}

/// 職務経歴書YAMLを読み込む
pub fn load_work_history(
    path: &Path,
    format: ContentFormat,
    credential: Option<&Path>,
) -> Result<WorkHistoryDocument> {
    let value = load_merged(path, credential)?;
    let context = format!("'{}' 形式の職務経歴書として不正です", format);

    match format {
        ContentFormat::Standard => validate(path, value, &context).map(WorkHistoryDocument::Standard),
        ContentFormat::Star => validate(path, value, &context).map(WorkHistoryDocument::Star),
    }
}

/// 履歴書YAMLを読み込む
pub fn load_resume(path: &Path, credential: Option<&Path>) -> Result<ResumeDocument> {
    let value = load_merged(path, credential)?;
    validate(path, value, "履歴書として不正です")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("一時ファイル作成失敗");
        file.write_all(content.as_bytes()).expect("書き込み失敗");
        file
    }

    const RESUME_MINIMAL: &str = "date: 2024年1月1日現在\nname_kana: ダミー\nname: ダミー\nbirth_day: 不明\n";

    #[test]
    fn test_load_minimal_work_history() {
        let file = yaml_file("date: 2024年1月1日現在\nname: 山田 太郎\n");
        let doc = load_work_history(file.path(), ContentFormat::Standard, None).unwrap();

        let WorkHistoryDocument::Standard(wh) = doc else {
            panic!("Standard形式であるべき");
        };
        assert_eq!(wh.summary, "");
        assert!(wh.highlights.is_empty());
        assert!(wh.experience.is_empty());
    }

    #[test]
    fn test_star_payload_under_standard_fails() {
        let file = yaml_file(
            "date: d\nname: n\nexperience:\n  - company: A社\n    period: 2020年\n    projects:\n      - period: 2020年\n        name: P\n        situation: S\n        task: T\n        action: [a]\n        result: [r]\n",
        );
        let err = load_work_history(file.path(), ContentFormat::Standard, None).unwrap_err();
        assert!(err.is_validation(), "バリデーションエラーであるべき: {:?}", err);

        let doc = load_work_history(file.path(), ContentFormat::Star, None).unwrap();
        assert_eq!(doc.format(), ContentFormat::Star);
    }

    #[test]
    fn test_standard_payload_under_star_fails() {
        let file = yaml_file(
            "date: d\nname: n\nexperience:\n  - company: A社\n    period: 2020年\n    projects:\n      - period: 2020年\n        name: P\n        overview: 概要\n",
        );
        let err = load_work_history(file.path(), ContentFormat::Star, None).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("'star' 形式"));
    }

    #[test]
    fn test_credential_overrides_fields() {
        let primary = yaml_file(RESUME_MINIMAL);
        let credential = yaml_file("name: 山田 太郎\nname_kana: やまだ たろう\nbirth_day: 1990年1月1日生\n");

        let resume = load_resume(primary.path(), Some(credential.path())).unwrap();
        assert_eq!(resume.name, "山田 太郎");
        assert_eq!(resume.name_kana, "やまだ たろう");
        assert_eq!(resume.birth_day, "1990年1月1日生");
        assert_eq!(resume.date, "2024年1月1日現在");
    }

    #[test]
    fn test_empty_credential_is_noop() {
        let primary = yaml_file(RESUME_MINIMAL);
        let credential = yaml_file("");

        let resume = load_resume(primary.path(), Some(credential.path())).unwrap();
        assert_eq!(resume.name, "ダミー");
    }

    #[test]
    fn test_credential_can_supply_required_fields() {
        let primary = yaml_file("date: 2024年\n");
        let credential = yaml_file("name: 山田\n");
        let doc = load_work_history(primary.path(), ContentFormat::Standard, Some(credential.path())).unwrap();
        assert_eq!(doc.name(), "山田");
    }

    #[test]
    fn test_nonexistent_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        let err = load_resume(&missing, None).unwrap_err();
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_missing_credential_is_not_found() {
        let primary = yaml_file(RESUME_MINIMAL);
        let dir = tempfile::tempdir().unwrap();
        let err = load_resume(primary.path(), Some(&dir.path().join("cred.yaml"))).unwrap_err();
        assert!(matches!(err, Error::NotFound(ref p) if p.ends_with("cred.yaml")));
    }

    #[test]
    fn test_syntax_error_is_parse() {
        let file = yaml_file("date: [unclosed\n");
        let err = load_resume(file.path(), None).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_unknown_field_is_validation() {
        let file = yaml_file(&format!("{}nickname: たろー\n", RESUME_MINIMAL));
        let err = load_resume(file.path(), None).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("nickname"));
    }

    #[test]
    fn test_non_mapping_top_level() {
        let file = yaml_file("- a\n- b\n");
        let err = load_resume(file.path(), None).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_merge_credential_shallow() {
        let primary: Value = serde_yaml::from_str("a: 1\nb:\n  x: 1\n  y: 2\n").unwrap();
        let credential: Value = serde_yaml::from_str("b:\n  x: 9\nc: 3\n").unwrap();
        let merged = merge_credential(primary, credential).unwrap();

        let expected: Value = serde_yaml::from_str("a: 1\nb:\n  x: 9\nc: 3\n").unwrap();
        assert_eq!(merged, expected);
    }
}
