use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocsError {
    #[error("入力ファイルが見つかりません: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("認証情報ファイルが見つかりません: {}", .0.display())]
    CredentialNotFound(PathBuf),

    #[error(transparent)]
    Common(#[from] jp_career_docs_common::Error),

    #[error("フォント読み込みエラー: {0}")]
    FontLoad(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("設定エラー: {0}")]
    Config(String),
}

impl From<printpdf::Error> for DocsError {
    fn from(e: printpdf::Error) -> Self {
        DocsError::PdfGeneration(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DocsError>;
