//! YAML から日本語の職務経歴書・履歴書 PDF を生成する

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod fonts;
pub mod logging;
