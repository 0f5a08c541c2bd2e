//! 日本語フォントの探索と計測
//!
//! 探索順: 明示ディレクトリ → ./fonts → OS標準のフォントディレクトリ。
//! 各ディレクトリは直下と1階層下のサブディレクトリを調べる。
//! 候補ファイル名の優先度はディレクトリの優先度より強い。

use crate::error::{DocsError, Result};
use jp_career_docs_common::layout::pt_to_mm;
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use printpdf::{BuiltinFont, IndirectFontRef, PdfDocumentReference};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// ゴシック体の候補（優先順）
pub const GOTHIC_CANDIDATES: &[&str] = &[
    "ipaexg.ttf",
    "ipag.ttf",
    "NotoSansJP-Regular.ttf",
    "NotoSansCJKjp-Regular.ttf",
    "AppleGothic.ttf",
];

/// 明朝体の候補（優先順）
pub const MINCHO_CANDIDATES: &[&str] = &[
    "ipaexm.ttf",
    "ipam.ttf",
    "NotoSerifJP-Regular.ttf",
    "NotoSerifCJKjp-Regular.ttf",
    "AppleMyungjo.ttf",
];

/// 書体の役割
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Gothic,
    Mincho,
}

/// 計測・埋め込みに使うフォント
#[derive(Debug, Clone)]
pub enum FontFace {
    /// TrueTypeファイルから読み込んだフォント
    External {
        name: String,
        path: PathBuf,
        face: Arc<OwnedFace>,
    },
    /// 日本語フォントが見つからない場合の Helvetica
    Builtin,
}

impl FontFace {
    /// TTFファイルを読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| DocsError::FontLoad(format!("{}: {}", path.display(), e)))?;
        let face = OwnedFace::from_vec(bytes, 0)
            .map_err(|e| DocsError::FontLoad(format!("{}: {}", path.display(), e)))?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(FontFace::External {
            name,
            path: path.to_path_buf(),
            face: Arc::new(face),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            FontFace::External { name, .. } => name,
            FontFace::Builtin => "Helvetica",
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            FontFace::External { path, .. } => Some(path),
            FontFace::Builtin => None,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontFace::Builtin)
    }

    /// 1文字の送り幅（em単位）
    pub fn advance_em(&self, ch: char) -> f32 {
        if let FontFace::External { face, .. } = self {
            let face = face.as_face_ref();
            let units = face.units_per_em() as f32;
            if let Some(advance) = face
                .glyph_index(ch)
                .and_then(|gid| face.glyph_hor_advance(gid))
            {
                if units > 0.0 {
                    return advance as f32 / units;
                }
            }
        }
        approximate_em(ch)
    }

    /// 文字列の幅（mm）
    pub fn text_width_mm(&self, text: &str, size_pt: f32) -> f32 {
        let em: f32 = text.chars().map(|ch| self.advance_em(ch)).sum();
        pt_to_mm(em * size_pt)
    }

    /// 描画前の文字列調整
    ///
    /// 組み込みフォントは WinAnsi しか扱えないため、ASCII外の文字を `?` に置き換える。
    pub fn prepare_text<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            FontFace::External { .. } => Cow::Borrowed(text),
            FontFace::Builtin if text.is_ascii() => Cow::Borrowed(text),
            FontFace::Builtin => Cow::Owned(
                text.chars()
                    .map(|ch| if ch.is_ascii() { ch } else { '?' })
                    .collect(),
            ),
        }
    }

    fn same_source(&self, other: &FontFace) -> bool {
        match (self.path(), other.path()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            _ => false,
        }
    }
}

/// 半角は0.5em、それ以外は1em
fn approximate_em(ch: char) -> f32 {
    if ch.is_ascii() {
        0.5
    } else {
        1.0
    }
}

/// 1回の実行で使うフォント一式
#[derive(Debug, Clone)]
pub struct FontContext {
    pub gothic: FontFace,
    pub mincho: FontFace,
}

impl FontContext {
    /// 既定の探索順でフォントを解決する
    pub fn discover(font_dir: Option<&Path>) -> Self {
        Self::from_search_dirs(&search_dirs(font_dir))
    }

    /// 指定ディレクトリ群からフォントを解決する
    ///
    /// 明朝が見つからなければゴシックで代用する。どちらもなければ
    /// Helvetica で続行し、警告を1回だけ出す。
    pub fn from_search_dirs(dirs: &[PathBuf]) -> Self {
        let gothic = find_face(dirs, GOTHIC_CANDIDATES);
        let mincho = find_face(dirs, MINCHO_CANDIDATES);

        let context = match (gothic, mincho) {
            (Some(gothic), Some(mincho)) => Self { gothic, mincho },
            (Some(gothic), None) => {
                tracing::debug!("明朝体が見つからないためゴシック体で代用: {}", gothic.name());
                Self { mincho: gothic.clone(), gothic }
            }
            (None, Some(mincho)) => {
                tracing::debug!("ゴシック体が見つからないため明朝体で代用: {}", mincho.name());
                Self { gothic: mincho.clone(), mincho }
            }
            (None, None) => {
                tracing::warn!(
                    "日本語フォントが見つかりません。Helveticaで出力します（日本語は表示されません）。--font-dir でフォントの場所を指定してください"
                );
                Self::builtin()
            }
        };

        tracing::debug!(
            "フォント: ゴシック={} 明朝={}",
            context.gothic.name(),
            context.mincho.name()
        );
        context
    }

    /// 組み込みフォントのみ（探索しない）
    pub fn builtin() -> Self {
        Self {
            gothic: FontFace::Builtin,
            mincho: FontFace::Builtin,
        }
    }

    pub fn face(&self, role: FontRole) -> &FontFace {
        match role {
            FontRole::Gothic => &self.gothic,
            FontRole::Mincho => &self.mincho,
        }
    }

    /// 日本語フォントなしで動いているか
    pub fn is_degraded(&self) -> bool {
        self.gothic.is_builtin() && self.mincho.is_builtin()
    }

    /// PDF文書にフォントを登録する（同じファイルは1回だけ埋め込む）
    pub fn register(&self, doc: &PdfDocumentReference) -> Result<RegisteredFonts> {
        let gothic = add_face(doc, &self.gothic)?;
        let mincho = if self.mincho.same_source(&self.gothic) {
            gothic.clone()
        } else {
            add_face(doc, &self.mincho)?
        };
        Ok(RegisteredFonts { gothic, mincho })
    }
}

fn add_face(doc: &PdfDocumentReference, face: &FontFace) -> Result<IndirectFontRef> {
    let font = match face {
        FontFace::External { face, path, .. } => doc
            .add_external_font(face.as_slice())
            .map_err(|e| DocsError::FontLoad(format!("{}: {}", path.display(), e)))?,
        FontFace::Builtin => doc.add_builtin_font(BuiltinFont::Helvetica)?,
    };
    Ok(font)
}

/// 1つのPDF文書に登録済みのフォント参照
#[derive(Debug, Clone)]
pub struct RegisteredFonts {
    gothic: IndirectFontRef,
    mincho: IndirectFontRef,
}

impl RegisteredFonts {
    pub fn get(&self, role: FontRole) -> &IndirectFontRef {
        match role {
            FontRole::Gothic => &self.gothic,
            FontRole::Mincho => &self.mincho,
        }
    }
}

/// OS標準のフォントディレクトリ
fn platform_font_dirs() -> Vec<PathBuf> {
    let mut dirs_list = Vec::new();

    if cfg!(target_os = "macos") {
        if let Some(home) = dirs::home_dir() {
            dirs_list.push(home.join("Library").join("Fonts"));
        }
        dirs_list.push(PathBuf::from("/Library/Fonts"));
        dirs_list.push(PathBuf::from("/System/Library/Fonts"));
    } else if cfg!(target_os = "windows") {
        dirs_list.push(PathBuf::from("C:/Windows/Fonts"));
    } else {
        if let Some(home) = dirs::home_dir() {
            dirs_list.push(home.join(".local").join("share").join("fonts"));
        }
        dirs_list.push(PathBuf::from("/usr/share/fonts"));
        dirs_list.push(PathBuf::from("/usr/local/share/fonts"));
    }
    dirs_list
}

/// 探索するディレクトリ（存在するもののみ、優先順）
pub fn search_dirs(font_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = font_dir {
        candidates.push(dir.to_path_buf());
    }
    candidates.push(PathBuf::from("fonts"));
    candidates.extend(platform_font_dirs());

    candidates.into_iter().filter(|d| d.is_dir()).collect()
}

/// ディレクトリ直下と1階層下にあるファイル候補
fn probe_paths(dir: &Path, file_name: &str) -> Vec<PathBuf> {
    let mut paths = vec![dir.join(file_name)];

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() {
            paths.push(entry.path().join(file_name));
        }
    }
    paths
}

/// 候補順に探し、最初に読み込めたフォントを返す
fn find_face(dirs: &[PathBuf], candidates: &[&str]) -> Option<FontFace> {
    for file_name in candidates {
        for dir in dirs {
            for path in probe_paths(dir, file_name) {
                if !path.is_file() {
                    continue;
                }
                match FontFace::load(&path) {
                    Ok(face) => {
                        tracing::debug!("フォント検出: {}", path.display());
                        return Some(face);
                    }
                    Err(e) => tracing::debug!("フォントをスキップ: {}", e),
                }
            }
        }
    }
    None
}
