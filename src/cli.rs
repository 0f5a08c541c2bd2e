use clap::Parser;
use jp_career_docs_common::work_history::ContentFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jp-career-docs")]
#[command(about = "YAMLから職務経歴書・履歴書のPDFを生成するツール", long_about = None)]
pub struct Cli {
    /// 入力YAMLファイル
    #[arg(required = true)]
    pub input: PathBuf,

    /// 出力PDFファイル（デフォルト: output/output.pdf）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 日本語フォントを探すディレクトリ
    #[arg(long)]
    pub font_dir: Option<PathBuf>,

    /// 書類の種類 (work-history/resume)
    #[arg(long = "type", default_value = "work-history")]
    pub document_type: DocumentType,

    /// 氏名などを上書きする認証情報YAML
    #[arg(short, long, required = true)]
    pub credential: PathBuf,

    /// 職務経歴書の記述形式 (standard/star)
    #[arg(long, default_value = "standard")]
    pub format: ContentFormat,

    /// 表の行をページをまたいで分割しない
    #[arg(long)]
    pub no_split_row: bool,

    /// 詳細ログを出力
    #[arg(short, long)]
    pub verbose: bool,
}

/// 出力する書類の種類
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DocumentType {
    /// 職務経歴書
    #[default]
    WorkHistory,
    /// 履歴書
    Resume,
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "work-history" | "work_history" => Ok(DocumentType::WorkHistory),
            "resume" => Ok(DocumentType::Resume),
            _ => Err(format!("Unknown type: {}. Use work-history or resume", s)),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::WorkHistory => write!(f, "work-history"),
            DocumentType::Resume => write!(f, "resume"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["jp-career-docs", "wh.yaml", "-c", "cred.yaml"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("wh.yaml"));
        assert_eq!(cli.credential, PathBuf::from("cred.yaml"));
        assert_eq!(cli.document_type, DocumentType::WorkHistory);
        assert_eq!(cli.format, ContentFormat::Standard);
        assert!(cli.output.is_none());
        assert!(!cli.no_split_row);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "jp-career-docs",
            "resume.yaml",
            "--type",
            "resume",
            "--credential",
            "cred.yaml",
            "-o",
            "out/resume.pdf",
            "--font-dir",
            "fonts",
            "--format",
            "star",
            "--no-split-row",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.document_type, DocumentType::Resume);
        assert_eq!(cli.format, ContentFormat::Star);
        assert_eq!(cli.output, Some(PathBuf::from("out/resume.pdf")));
        assert_eq!(cli.font_dir, Some(PathBuf::from("fonts")));
        assert!(cli.no_split_row);
        assert!(cli.verbose);
    }

    #[test]
    fn test_credential_is_required() {
        assert!(Cli::try_parse_from(["jp-career-docs", "wh.yaml"]).is_err());
    }

    #[test]
    fn test_unknown_type() {
        let result = Cli::try_parse_from(["jp-career-docs", "wh.yaml", "-c", "c.yaml", "--type", "cv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_document_type_round_trip() {
        for t in [DocumentType::WorkHistory, DocumentType::Resume] {
            assert_eq!(t.to_string().parse::<DocumentType>(), Ok(t));
        }
    }
}
