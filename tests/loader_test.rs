//! YAML読み込み・認証情報マージの統合テスト

use jp_career_docs_common::work_history::{ContentFormat, WorkHistoryDocument};
use jp_career_docs_common::{load_resume, load_work_history, Error};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const STANDARD_YAML: &str = r#"
date: 2024年4月1日現在
name: （仮名）
summary: |
  Webアプリケーション開発に8年従事。
highlights:
  - 要件定義から運用までの一貫した経験
experience:
  - company: 株式会社サンプル
    period: 2018年4月～現在
    business: 受託開発
    employees: 300名
    employment_type: 正社員
    projects:
      - period: 2022年1月～現在
        industry: 金融
        name: 決済基盤刷新
        environment:
          languages: [Rust, TypeScript]
          db: [PostgreSQL]
        team_size: 8名
        role: リーダー
        overview: 決済APIの再設計
        responsibilities:
          - 設計
          - レビュー
technical_skills:
  - category: 言語
    items:
      - name: Rust
        period: 3年
        level: 設計から実装まで可能
qualifications:
  - name: 応用情報技術者
    date: 2016年11月
self_pr:
  - title: 設計力
    content: 保守しやすい構造を重視しています。
"#;

const STAR_YAML: &str = r#"
date: 2024年4月1日現在
name: （仮名）
experience:
  - company: 株式会社サンプル
    period: 2018年4月～現在
    projects:
      - period: 2022年1月～現在
        name: 決済基盤刷新
        situation: 障害が多発していた
        task: 可用性の向上
        action: [監視の整備]
        result: [障害件数を半減]
"#;

const CREDENTIAL_YAML: &str = "name: 山田 太郎\nname_kana: やまだ たろう\nbirth_day: 1990年1月1日生\n";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("書き込み失敗");
    path
}

#[test]
fn test_standard_document_with_credential() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "wh.yaml", STANDARD_YAML);
    let credential = write(dir.path(), "cred.yaml", "name: 山田 太郎\n");

    let doc = load_work_history(&input, ContentFormat::Standard, Some(&credential)).unwrap();
    assert_eq!(doc.format(), ContentFormat::Standard);
    assert_eq!(doc.name(), "山田 太郎", "認証情報の氏名で上書きされるべき");

    let WorkHistoryDocument::Standard(wh) = doc else {
        panic!("Standard形式であるべき");
    };
    assert_eq!(wh.experience.len(), 1);
    assert_eq!(wh.experience[0].projects[0].environment.languages, ["Rust", "TypeScript"]);
    assert_eq!(wh.technical_skills[0].items[0].name, "Rust");
    assert_eq!(wh.self_pr[0].title, "設計力");
}

#[test]
fn test_star_document() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "star.yaml", STAR_YAML);

    let doc = load_work_history(&input, ContentFormat::Star, None).unwrap();
    let WorkHistoryDocument::Star(wh) = doc else {
        panic!("STAR形式であるべき");
    };
    assert_eq!(wh.experience[0].projects[0].situation, "障害が多発していた");
}

#[test]
fn test_format_mismatch_is_validation_error() {
    let dir = tempdir().unwrap();
    let standard = write(dir.path(), "wh.yaml", STANDARD_YAML);
    let star = write(dir.path(), "star.yaml", STAR_YAML);

    let err = load_work_history(&star, ContentFormat::Standard, None).unwrap_err();
    assert!(err.is_validation(), "STARをstandardで読むと検証エラー: {:?}", err);
    assert!(err.to_string().contains("'standard' 形式"));

    let err = load_work_history(&standard, ContentFormat::Star, None).unwrap_err();
    assert!(err.is_validation(), "standardをSTARで読むと検証エラー: {:?}", err);
    assert!(err.to_string().contains("'star' 形式"));
}

#[test]
fn test_missing_file_is_not_validation() {
    let dir = tempdir().unwrap();
    let err = load_work_history(&dir.path().join("none.yaml"), ContentFormat::Standard, None).unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_validation());
}

#[test]
fn test_syntax_error_is_parse_error() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "broken.yaml", "date: [unclosed\n");
    let err = load_work_history(&input, ContentFormat::Standard, None).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }), "{:?}", err);
}

#[test]
fn test_resume_credential_overlay() {
    let dir = tempdir().unwrap();
    let input = write(
        dir.path(),
        "resume.yaml",
        "date: 2024年4月1日現在\nname_kana: ダミー\nname: ダミー\nbirth_day: 不明\neducation:\n  - year: 2012\n    month: 3\n    value: 〇〇大学 卒業\n",
    );
    let credential = write(dir.path(), "cred.yaml", CREDENTIAL_YAML);

    let resume = load_resume(&input, Some(&credential)).unwrap();
    assert_eq!(resume.name, "山田 太郎");
    assert_eq!(resume.name_kana, "やまだ たろう");
    assert_eq!(resume.birth_day, "1990年1月1日生");
    assert_eq!(resume.education[0].year, "2012");
    assert_eq!(resume.education[0].month, "3");
}

#[test]
fn test_empty_credential_is_noop() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "wh.yaml", "date: 2024年1月1日現在\nname: 山田 太郎\n");
    let credential = write(dir.path(), "cred.yaml", "");

    let doc = load_work_history(&input, ContentFormat::Standard, Some(&credential)).unwrap();
    assert_eq!(doc.name(), "山田 太郎");
}

#[test]
fn test_unknown_resume_field_rejected() {
    let dir = tempdir().unwrap();
    let input = write(
        dir.path(),
        "resume.yaml",
        "date: x\nname_kana: x\nname: x\nbirth_day: x\nnickname: x\n",
    );
    let err = load_resume(&input, None).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("nickname"));
}
