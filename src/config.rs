use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 出力先が指定されなかった場合の既定値
pub const DEFAULT_OUTPUT: &str = "output/output.pdf";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// フォント探索で最優先するディレクトリ
    pub font_dir: Option<PathBuf>,
    /// `-o` 省略時の出力先
    pub default_output: Option<PathBuf>,
}

impl Config {
    /// `~/.config/jp-career-docs/config.json` を読む（なければ既定値）
    pub fn load() -> Result<Self> {
        Self::load_optional(Self::config_path().as_deref())
    }

    /// 設定ファイルの場所が決まらない場合も既定値で続行する
    pub fn load_optional(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from(path),
            None => {
                tracing::debug!("ホームディレクトリが見つからないため設定ファイルを読みません");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("jp-career-docs").join("config.json"))
    }

    /// CLI指定 → 設定ファイル → 既定値 の順で出力先を決める
    pub fn resolve_output(&self, cli_output: Option<&Path>) -> PathBuf {
        cli_output
            .map(Path::to_path_buf)
            .or_else(|| self.default_output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    /// CLI指定 → 設定ファイル の順でフォントディレクトリを決める
    pub fn resolve_font_dir(&self, cli_font_dir: Option<&Path>) -> Option<PathBuf> {
        cli_font_dir
            .map(Path::to_path_buf)
            .or_else(|| self.font_dir.clone())
    }
}
