//! PDF出力の統合テスト

use jp_career_docs::cli::DocumentType;
use jp_career_docs::export::flow::PageCount;
use jp_career_docs::export::{export_document, resume, work_history, ExportOptions};
use jp_career_docs::fonts::FontContext;
use jp_career_docs_common::resume::{HistoryEntry, ResumeDocument};
use jp_career_docs_common::work_history::{ContentFormat, WorkHistoryDocument};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

fn standard_document(projects: usize) -> WorkHistoryDocument {
    let project = r#"
      - period: 2020年4月～2022年3月
        industry: 製造
        name: 生産管理システム開発
        environment:
          languages: [Java, SQL]
          os: [Linux]
          tools: [Git, Jenkins]
        team_size: 10名
        role: メンバー
        overview: |
          工場の生産計画を管理するシステムの新規開発。
          複数拠点の在庫情報を統合した。
        phases: 詳細設計～結合テスト
        responsibilities:
          - バッチ処理の設計と実装
          - 性能改善
        achievements:
          - 夜間バッチの処理時間を40%短縮
"#;
    let yaml = format!(
        "date: 2024年4月1日現在\nname: 山田 太郎\nsummary: 製造業向けの業務システム開発に従事。\nexperience:\n  - company: 株式会社サンプル\n    period: 2015年4月～現在\n    business: システム開発\n    projects:{}",
        project.repeat(projects)
    );
    WorkHistoryDocument::Standard(serde_yaml::from_str(&yaml).expect("YAML解析失敗"))
}

fn star_document() -> WorkHistoryDocument {
    let yaml = r#"
date: 2024年4月1日現在
name: 山田 太郎
experience:
  - company: 株式会社サンプル
    period: 2015年4月～現在
    projects:
      - period: 2021年1月～現在
        name: 監視基盤構築
        situation: 障害検知が遅れていた
        task: 検知までの時間短縮
        action:
          - メトリクス収集の整備
          - アラート基準の見直し
        result:
          - 平均検知時間を10分から1分へ短縮
technical_skills:
  - category: 言語
    items:
      - name: Go
        period: 3年
        level: 実務で設計可能
      - name: Python
        period: 5年
        level: 実務で設計可能
"#;
    WorkHistoryDocument::Star(serde_yaml::from_str(yaml).expect("YAML解析失敗"))
}

fn assert_pdf(path: &Path) {
    let bytes = std::fs::read(path).expect("PDF読み込み失敗");
    assert!(bytes.starts_with(b"%PDF"), "PDFヘッダがない");
}

#[test]
fn test_standard_work_history_pdf() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("standard.pdf");

    let pages = work_history::generate_pdf(&standard_document(1), &output, &FontContext::builtin(), true)
        .expect("PDF生成に失敗");
    assert_eq!(pages, PageCount(1));
    assert_pdf(&output);
}

#[test]
fn test_star_work_history_pdf() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("star.pdf");

    let pages = work_history::generate_pdf(&star_document(), &output, &FontContext::builtin(), true)
        .expect("PDF生成に失敗");
    assert!(pages.0 >= 1);
    assert_pdf(&output);
}

#[test]
fn test_long_work_history_paginates() {
    let dir = tempdir().unwrap();
    let doc = standard_document(12);
    let fonts = FontContext::builtin();

    let split = work_history::generate_pdf(&doc, &dir.path().join("split.pdf"), &fonts, true).unwrap();
    let whole = work_history::generate_pdf(&doc, &dir.path().join("whole.pdf"), &fonts, false).unwrap();

    assert!(split.0 > 1, "複数ページになるべき");
    assert!(whole.0 >= split.0, "行を分割しない方がページ数は多いか同じ");
}

#[test]
fn test_resume_pdf_is_two_pages() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("resume.pdf");
    let resume = ResumeDocument {
        date: "2024年4月1日現在".into(),
        name_kana: "やまだ たろう".into(),
        name: "山田 太郎".into(),
        birth_day: "1990年1月1日生".into(),
        education: vec![HistoryEntry { year: "2012".into(), month: "3".into(), value: "〇〇大学 卒業".into() }],
        hobby: "読書\n登山".into(),
        ..Default::default()
    };

    let pages = resume::generate_pdf(&resume, &output, &FontContext::builtin()).expect("PDF生成に失敗");
    assert_eq!(pages, PageCount(2));
    assert_pdf(&output);
}

#[test]
fn test_export_document_creates_output_dirs() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("resume.yaml");
    let credential = dir.path().join("cred.yaml");
    std::fs::write(&input, "date: 2024年4月1日現在\nname_kana: ダミー\nname: ダミー\nbirth_day: 不明\n").unwrap();
    std::fs::write(&credential, "name: 山田 太郎\n").unwrap();

    let options = ExportOptions {
        input,
        credential,
        output: dir.path().join("nested").join("out").join("resume.pdf"),
        document_type: DocumentType::Resume,
        format: ContentFormat::Standard,
        font_dir: Some(dir.path().to_path_buf()),
        split_rows: true,
    };

    let written = export_document(&options).expect("出力に失敗");
    assert_eq!(written, options.output);
    assert_pdf(&written);
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_no_fonts_emits_exactly_one_warning() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let dir = tempdir().unwrap();
    tracing::subscriber::with_default(subscriber, || {
        let fonts = FontContext::from_search_dirs(&[]);
        assert!(fonts.is_degraded());

        work_history::generate_pdf(&standard_document(2), &dir.path().join("wh.pdf"), &fonts, true)
            .expect("フォントなしでも生成できるべき");

        let mut resume = ResumeDocument {
            date: "2024年4月1日現在".into(),
            name: "山田 太郎".into(),
            ..Default::default()
        };
        // 欄に収まらない行の省略は warn にしない
        resume.experience = (0..30)
            .map(|i| HistoryEntry { year: "2020".into(), month: "4".into(), value: format!("entry {}", i) })
            .collect();
        resume::generate_pdf(&resume, &dir.path().join("resume.pdf"), &fonts)
            .expect("フォントなしでも生成できるべき");
    });

    let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
    assert_eq!(output.matches("WARN").count(), 1, "警告は1回だけ: {}", output);
}

fn fixture_font() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join("RobotoMedium.ttf")
}

/// TrueType フォントは使ったグリフだけを埋め込む
#[test]
fn test_external_font_is_embedded_as_subset() {
    let fonts_dir = tempdir().unwrap();
    std::fs::copy(fixture_font(), fonts_dir.path().join("ipaexg.ttf")).unwrap();
    std::fs::copy(fixture_font(), fonts_dir.path().join("ipaexm.ttf")).unwrap();
    let fonts = FontContext::from_search_dirs(&[fonts_dir.path().to_path_buf()]);
    assert!(!fonts.is_degraded());

    let out_dir = tempdir().unwrap();
    let output = out_dir.path().join("wh.pdf");
    let doc = WorkHistoryDocument::Standard(serde_yaml::from_str("date: d\nname: AB\n").unwrap());
    let pages = work_history::generate_pdf(&doc, &output, &fonts, true).expect("PDF生成に失敗");
    assert_eq!(pages, PageCount(1));
    assert_pdf(&output);

    let font_size = std::fs::metadata(fixture_font()).unwrap().len();
    let pdf_size = std::fs::metadata(&output).unwrap().len();
    assert!(
        pdf_size < font_size / 2,
        "フォント全体が埋め込まれている: font={} pdf={}",
        font_size,
        pdf_size
    );
}

#[test]
fn test_resume_with_external_font() {
    let fonts_dir = tempdir().unwrap();
    std::fs::copy(fixture_font(), fonts_dir.path().join("ipaexg.ttf")).unwrap();
    let fonts = FontContext::from_search_dirs(&[fonts_dir.path().to_path_buf()]);

    let out_dir = tempdir().unwrap();
    let output = out_dir.path().join("resume.pdf");
    let resume = ResumeDocument {
        date: "2024-04-01".into(),
        name: "Taro Yamada".into(),
        email: "taro@example.com".into(),
        ..Default::default()
    };
    let pages = resume::generate_pdf(&resume, &output, &fonts).expect("PDF生成に失敗");
    assert_eq!(pages, PageCount(2));
    assert_pdf(&output);
}
