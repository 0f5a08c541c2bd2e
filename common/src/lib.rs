//! 職務経歴書・履歴書 PDF生成の共通ライブラリ
//!
//! データモデル、YAMLローダー、レイアウト定数、描画非依存のセル組み立て

pub mod error;
pub mod export;
pub mod layout;
pub mod loader;
pub mod resume;
pub mod work_history;

pub use error::{Error, Result};
pub use layout::PageLayout;
pub use loader::{load_resume, load_work_history, merge_credential};
pub use resume::{AddressBlock, HistoryEntry, ResumeDocument};
pub use work_history::{ContentFormat, ProjectEntry, WorkHistory, WorkHistoryDocument};
