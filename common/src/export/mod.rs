//! 描画に依存しない組版用の部品

pub mod resume_core;
pub mod work_history_core;
