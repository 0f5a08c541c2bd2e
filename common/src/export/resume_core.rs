//! 履歴書の行割り当て・切り詰め（描画非依存）

use crate::layout::{pt_to_mm, RESUME_HISTORY_ROWS, RESUME_LICENCE_ROWS};
use crate::resume::{HistoryEntry, ResumeDocument};

/// 学歴・職歴欄のデータ行数（見出し行を除く）
pub const HISTORY_CAPACITY: usize = RESUME_HISTORY_ROWS - 1;

/// 免許・資格欄のデータ行数（見出し行を除く）
pub const LICENCE_CAPACITY: usize = RESUME_LICENCE_ROWS - 1;

/// 自由記述欄の行送り（フォントサイズに対する倍率）
pub const TEXT_BOX_LEADING_RATIO: f32 = 1.5;

/// 固定枠に収めた結果
#[derive(Debug, Clone, PartialEq)]
pub struct Fitted<T> {
    pub rows: Vec<T>,
    /// 枠に入らず捨てた件数
    pub dropped: usize,
}

impl<T> Fitted<T> {
    fn take(items: Vec<T>, capacity: usize) -> Self {
        let dropped = items.len().saturating_sub(capacity);
        let rows = items.into_iter().take(capacity).collect();
        Self { rows, dropped }
    }

    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }
}

/// 「学　歴」見出し + 学歴 + 「職　歴」見出し + 職歴 を表の容量で切り詰める
pub fn history_rows(resume: &ResumeDocument) -> Fitted<HistoryEntry> {
    let mut entries = Vec::with_capacity(resume.education.len() + resume.experience.len() + 2);
    entries.push(HistoryEntry::header("学　歴"));
    entries.extend(resume.education.iter().cloned());
    entries.push(HistoryEntry::header("職　歴"));
    entries.extend(resume.experience.iter().cloned());
    Fitted::take(entries, HISTORY_CAPACITY)
}

/// 免許・資格を表の容量で切り詰める
pub fn licence_rows(resume: &ResumeDocument) -> Fitted<HistoryEntry> {
    Fitted::take(resume.licences.clone(), LICENCE_CAPACITY)
}

/// 自由記述欄の行送り（mm）
pub fn text_box_leading_mm(size_pt: f32) -> f32 {
    pt_to_mm(size_pt * TEXT_BOX_LEADING_RATIO)
}

/// 自由記述欄に入る行数
///
/// 先頭行は枠の上端に置き、下端を越えた行から捨てる。
pub fn text_box_capacity(size_pt: f32, height_mm: f32) -> usize {
    let leading = text_box_leading_mm(size_pt);
    if leading <= 0.0 {
        return 0;
    }
    (height_mm / leading).floor() as usize + 1
}

/// 自由記述を明示的な改行でのみ分割し、欄の容量で切り詰める
pub fn text_box_lines(text: &str, capacity: usize) -> Fitted<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Fitted { rows: Vec::new(), dropped: 0 };
    }
    let lines = trimmed.split('\n').map(|line| line.trim().to_string()).collect();
    Fitted::take(lines, capacity)
}

/// 写真の配置（枠内の左下オフセットと描画サイズ, mm）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoPlacement {
    pub offset_x_mm: f32,
    pub offset_y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// 縦横比を保って枠に収め、中央に寄せる
pub fn fit_photo(image_width: u32, image_height: u32, box_width_mm: f32, box_height_mm: f32) -> PhotoPlacement {
    if image_width == 0 || image_height == 0 {
        return PhotoPlacement { offset_x_mm: 0.0, offset_y_mm: 0.0, width_mm: box_width_mm, height_mm: box_height_mm };
    }

    let scale = (box_width_mm / image_width as f32).min(box_height_mm / image_height as f32);
    let width_mm = image_width as f32 * scale;
    let height_mm = image_height as f32 * scale;

    PhotoPlacement {
        offset_x_mm: (box_width_mm - width_mm) / 2.0,
        offset_y_mm: (box_height_mm - height_mm) / 2.0,
        width_mm,
        height_mm,
    }
}
