//! エラー型定義

use std::path::PathBuf;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 入力ファイルが存在しない（スキーマエラーとは区別する）
    #[error("ファイルが見つかりません: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAMLとして読めない
    #[error("YAML構文エラー ({}): {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// 構文は正しいがスキーマに合わない
    #[error("バリデーションエラー ({}): {message}", path.display())]
    Validation { path: PathBuf, message: String },
}

impl Error {
    /// 不足・不正・未知フィールド等によるエラーか
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// ファイル未検出によるエラーか
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let error = Error::NotFound(PathBuf::from("missing.yaml"));
        let display = format!("{}", error);
        assert_eq!(display, "ファイルが見つかりません: missing.yaml");
        assert!(error.is_not_found());
        assert!(!error.is_validation());
    }

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("access denied"));
    }

    #[test]
    fn test_error_display_parse() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("a: [1, 2").unwrap_err();
        let error = Error::Parse {
            path: PathBuf::from("broken.yaml"),
            source: yaml_error,
        };
        let display = format!("{}", error);
        assert!(display.starts_with("YAML構文エラー (broken.yaml)"));
    }

    #[test]
    fn test_error_display_validation() {
        let error = Error::Validation {
            path: PathBuf::from("cv.yaml"),
            message: "missing field `name`".to_string(),
        };
        let display = format!("{}", error);
        assert_eq!(display, "バリデーションエラー (cv.yaml): missing field `name`");
        assert!(error.is_validation());
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::NotFound(PathBuf::from("テスト.yaml"));
        let debug = format!("{:?}", error);
        assert!(debug.contains("NotFound"));
        assert!(debug.contains("テスト"));
    }
}
