//! レイアウト設定モジュール
//!
//! mm基準のレイアウト定義（Source of Truth）。
//! 職務経歴書（フロー配置）と履歴書（固定座標）の両方で使う寸法をここに集める。

// ============================================
// mm基準レイアウト（Source of Truth）
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 職務経歴書の余白（mm）
pub const MARGIN_LEFT_MM: f32 = 20.0;
pub const MARGIN_RIGHT_MM: f32 = 20.0;
pub const MARGIN_TOP_MM: f32 = 15.0;
pub const MARGIN_BOTTOM_MM: f32 = 15.0;

/// 本文フレーム（mm）
pub const CONTENT_WIDTH_MM: f32 = A4_WIDTH_MM - MARGIN_LEFT_MM - MARGIN_RIGHT_MM; // 170mm
pub const CONTENT_HEIGHT_MM: f32 = A4_HEIGHT_MM - MARGIN_TOP_MM - MARGIN_BOTTOM_MM; // 267mm

/// フッター（ページ番号）のベースライン: 下余白の5mm下
pub const FOOTER_OFFSET_MM: f32 = 5.0;

// ============================================
// 職務経歴書の列幅（mm）
// ============================================

/// プロジェクト表: 期間 | 内容 | 開発環境 | 規模
pub const COL_PERIOD_MM: f32 = 18.0;
pub const COL_CONTENT_MM: f32 = 117.0;
pub const COL_ENV_MM: f32 = 21.0;
pub const COL_TEAM_MM: f32 = 14.0;

/// 会社情報行: 情報 | 雇用形態
pub const COL_COMPANY_INFO_MM: f32 = 135.0;
pub const COL_EMPLOYMENT_MM: f32 = 35.0;

/// スキル表: 種類 | 名称 | 使用期間 | レベル
pub const COL_SKILL_CAT_MM: f32 = 25.0;
pub const COL_SKILL_NAME_MM: f32 = 45.0;
pub const COL_SKILL_PERIOD_MM: f32 = 35.0;
pub const COL_SKILL_LEVEL_MM: f32 = 65.0;

/// 資格表: 名称 | 取得日
pub const COL_QUAL_NAME_MM: f32 = 110.0;
pub const COL_QUAL_DATE_MM: f32 = 60.0;

// ============================================
// 文字サイズ（pt）
// ============================================

pub const TITLE_SIZE_PT: f32 = 16.0;
pub const SECTION_HEADER_SIZE_PT: f32 = 11.0;
pub const BODY_SIZE_PT: f32 = 9.0;
pub const SMALL_SIZE_PT: f32 = 8.0;
pub const TABLE_SIZE_PT: f32 = 8.0;

// ============================================
// 履歴書（固定座標）
// ============================================

/// 左端のx座標オフセット（mm）。履歴書の座標はこの位置からの相対値
pub const RESUME_ORIGIN_X_MM: f32 = 16.0;
/// 使用幅（mm）
pub const RESUME_CONTENT_WIDTH_MM: f32 = 177.0;
/// 履歴表の行高（mm）
pub const RESUME_ROW_HEIGHT_MM: f32 = 7.0;
/// 学歴・職歴表の行数（見出し行を含む）
pub const RESUME_HISTORY_ROWS: usize = 16;
/// 免許・資格表の行数（見出し行を含む）
pub const RESUME_LICENCE_ROWS: usize = 6;

pub const RESUME_TITLE_SIZE_PT: f32 = 14.0;
pub const RESUME_LARGE_SIZE_PT: f32 = 12.0;
pub const RESUME_NORMAL_SIZE_PT: f32 = 9.0;
pub const RESUME_SMALL_SIZE_PT: f32 = 8.0;

/// 写真枠（mm、左下基準・相対x）
pub const PHOTO_X_MM: f32 = 145.0;
pub const PHOTO_Y_MM: f32 = 204.0;
pub const PHOTO_WIDTH_MM: f32 = 30.0;
pub const PHOTO_HEIGHT_MM: f32 = 40.0;

// ============================================
// 変換係数
// ============================================

/// mm → pt変換 (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// mm → pt 変換
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// pt → mm 変換
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}

// ============================================
// レイアウト設定構造体
// ============================================

/// フロー配置のページ設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_right_mm: f32,
    pub margin_top_mm: f32,
    pub margin_bottom_mm: f32,
}

impl PageLayout {
    /// 職務経歴書のA4縦レイアウト
    pub fn a4_portrait() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_left_mm: MARGIN_LEFT_MM,
            margin_right_mm: MARGIN_RIGHT_MM,
            margin_top_mm: MARGIN_TOP_MM,
            margin_bottom_mm: MARGIN_BOTTOM_MM,
        }
    }

    /// 利用可能幅（mm）
    pub fn frame_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_left_mm - self.margin_right_mm
    }

    /// 利用可能高さ（mm）
    pub fn frame_height_mm(&self) -> f32 {
        self.page_height_mm - self.margin_top_mm - self.margin_bottom_mm
    }

    /// コンテンツ開始Y座標（mm、下から）
    pub fn frame_top_mm(&self) -> f32 {
        self.page_height_mm - self.margin_top_mm
    }

    /// ページ番号のベースラインY座標（mm、下から）
    pub fn footer_y_mm(&self) -> f32 {
        self.margin_bottom_mm - FOOTER_OFFSET_MM
    }

    /// ページ番号の右端X座標（mm）
    pub fn footer_right_x_mm(&self) -> f32 {
        self.page_width_mm - self.margin_right_mm
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::a4_portrait()
    }
}

/// 履歴書の相対x座標（mm）を絶対x座標（mm）へ
#[inline]
pub fn resume_x(v: f32) -> f32 {
    RESUME_ORIGIN_X_MM + v
}
