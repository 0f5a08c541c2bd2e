pub mod canvas;
pub mod flow;
pub mod resume;
pub mod text;
pub mod work_history;

use crate::cli::DocumentType;
use crate::error::{DocsError, Result};
use crate::fonts::FontContext;
use jp_career_docs_common::work_history::ContentFormat;
use jp_career_docs_common::{load_resume, load_work_history};
use printpdf::PdfDocumentReference;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// 1回の出力に必要な指定一式（CLI と設定ファイルを解決済みのもの）
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub input: PathBuf,
    pub credential: PathBuf,
    pub output: PathBuf,
    pub document_type: DocumentType,
    pub format: ContentFormat,
    pub font_dir: Option<PathBuf>,
    pub split_rows: bool,
}

/// 親ディレクトリを作成してPDFを書き出す
pub fn save_pdf(doc: PdfDocumentReference, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file))?;
    Ok(())
}

/// 入力と認証情報の存在を確認する
fn check_inputs(options: &ExportOptions) -> Result<()> {
    if !options.input.exists() {
        return Err(DocsError::FileNotFound(options.input.clone()));
    }
    if !options.credential.exists() {
        return Err(DocsError::CredentialNotFound(options.credential.clone()));
    }
    Ok(())
}

/// YAML を読み込み、フォントを解決して PDF を出力する
pub fn export_document(options: &ExportOptions) -> Result<PathBuf> {
    check_inputs(options)?;

    println!("[1/3] 読み込み中: {}", options.input.display());
    let credential = Some(options.credential.as_path());

    match options.document_type {
        DocumentType::WorkHistory => {
            let doc = load_work_history(&options.input, options.format, credential)?;
            println!("[2/3] フォントを探索中...");
            let fonts = FontContext::discover(options.font_dir.as_deref());
            println!("[3/3] 職務経歴書を生成中... (形式: {})", options.format);
            let pages = work_history::generate_pdf(&doc, &options.output, &fonts, options.split_rows)?;
            println!("✔ {}ページ", pages.0);
        }
        DocumentType::Resume => {
            let resume = load_resume(&options.input, credential)?;
            println!("[2/3] フォントを探索中...");
            let fonts = FontContext::discover(options.font_dir.as_deref());
            println!("[3/3] 履歴書を生成中...");
            resume::generate_pdf(&resume, &options.output, &fonts)?;
        }
    }

    println!("✔ PDF出力: {}", options.output.display());
    Ok(options.output.clone())
}
