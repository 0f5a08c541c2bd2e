//! printpdf のレイヤーを mm 座標（左下原点）で扱う描画ラッパー

use crate::fonts::{FontContext, FontRole, RegisteredFonts};
use printpdf::path::PaintMode;
use printpdf::{
    Color, Image, ImageTransform, ImageXObject, Line, LineDashPattern, Mm, PdfLayerReference,
    Point, Rect, Rgb, TextRenderingMode,
};

/// 標準の罫線幅（pt）
pub const THIN_LINE_PT: f32 = 0.5;
/// 外枠の罫線幅（pt）
pub const THICK_LINE_PT: f32 = 2.0;
/// 疑似太字の輪郭線幅（pt）
const BOLD_STROKE_PT: f32 = 0.3;
/// 破線の長さ・間隔（pt）
const DASH_PT: i64 = 3;
/// 画像の基準解像度（printpdf の既定値）
const IMAGE_DPI: f32 = 300.0;

fn gray(level: f32) -> Color {
    Color::Rgb(Rgb::new(level, level, level, None))
}

/// 1ページ分の描画面
pub struct Canvas<'a> {
    layer: PdfLayerReference,
    fonts: &'a FontContext,
    registered: &'a RegisteredFonts,
}

impl<'a> Canvas<'a> {
    pub fn new(layer: PdfLayerReference, fonts: &'a FontContext, registered: &'a RegisteredFonts) -> Self {
        layer.set_fill_color(gray(0.0));
        layer.set_outline_color(gray(0.0));
        Self { layer, fonts, registered }
    }

    /// 文字列の幅（mm）
    pub fn text_width(&self, text: &str, role: FontRole, size_pt: f32) -> f32 {
        self.fonts.face(role).text_width_mm(text, size_pt)
    }

    /// 左端基準で文字列を描く（y はベースライン）
    pub fn text(&self, x: f32, y: f32, text: &str, role: FontRole, size_pt: f32) {
        self.styled_text(x, y, text, role, size_pt, false);
    }

    /// 太字指定付きで文字列を描く
    ///
    /// 太字書体を持たないため、塗り＋輪郭線で太く見せる。
    pub fn styled_text(&self, x: f32, y: f32, text: &str, role: FontRole, size_pt: f32, bold: bool) {
        if text.is_empty() {
            return;
        }
        let prepared = self.fonts.face(role).prepare_text(text);
        let font = self.registered.get(role);

        if bold {
            self.layer.save_graphics_state();
            self.layer.set_text_rendering_mode(TextRenderingMode::FillStroke);
            self.layer.set_outline_thickness(BOLD_STROKE_PT);
            self.layer.use_text(prepared, size_pt, Mm(x), Mm(y), font);
            self.layer.restore_graphics_state();
        } else {
            self.layer.use_text(prepared, size_pt, Mm(x), Mm(y), font);
        }
    }

    /// 中央揃え
    pub fn text_centered(&self, center_x: f32, y: f32, text: &str, role: FontRole, size_pt: f32) {
        let width = self.text_width(text, role, size_pt);
        self.text(center_x - width / 2.0, y, text, role, size_pt);
    }

    /// 右揃え
    pub fn text_right(&self, right_x: f32, y: f32, text: &str, role: FontRole, size_pt: f32) {
        let width = self.text_width(text, role, size_pt);
        self.text(right_x - width, y, text, role, size_pt);
    }

    fn with_stroke<F: FnOnce(&PdfLayerReference)>(&self, width_pt: f32, dashed: bool, draw: F) {
        self.layer.save_graphics_state();
        self.layer.set_outline_thickness(width_pt);
        if dashed {
            self.layer.set_line_dash_pattern(LineDashPattern {
                dash_1: Some(DASH_PT),
                gap_1: Some(DASH_PT),
                ..Default::default()
            });
        }
        draw(&self.layer);
        self.layer.restore_graphics_state();
    }

    /// 直線
    pub fn line(&self, x1: f32, y1: f32, x2: f32, y2: f32, width_pt: f32, dashed: bool) {
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y1)), false),
                (Point::new(Mm(x2), Mm(y2)), false),
            ],
            is_closed: false,
        };
        self.with_stroke(width_pt, dashed, |layer| layer.add_line(line));
    }

    /// 閉じた折れ線
    pub fn polygon(&self, points: &[(f32, f32)], width_pt: f32) {
        let line = Line {
            points: points
                .iter()
                .map(|&(x, y)| (Point::new(Mm(x), Mm(y)), false))
                .collect(),
            is_closed: true,
        };
        self.with_stroke(width_pt, false, |layer| layer.add_line(line));
    }

    /// 矩形の枠（x, y は左下）
    pub fn rect(&self, x: f32, y: f32, w: f32, h: f32, width_pt: f32, dashed: bool) {
        let rect = Rect::new(Mm(x), Mm(y), Mm(x + w), Mm(y + h)).with_mode(PaintMode::Stroke);
        self.with_stroke(width_pt, dashed, |layer| layer.add_rect(rect));
    }

    /// 矩形の塗り（level: 0.0=黒 〜 1.0=白）
    pub fn fill_rect(&self, x: f32, y: f32, w: f32, h: f32, level: f32) {
        self.layer.save_graphics_state();
        self.layer.set_fill_color(gray(level));
        self.layer
            .add_rect(Rect::new(Mm(x), Mm(y), Mm(x + w), Mm(y + h)).with_mode(PaintMode::Fill));
        self.layer.restore_graphics_state();
    }

    /// 画像を指定サイズ（mm）で配置する
    pub fn image(&self, xobject: ImageXObject, x: f32, y: f32, w: f32, h: f32) {
        let px_to_mm = 25.4 / IMAGE_DPI;
        let natural_w = xobject.width.0 as f32 * px_to_mm;
        let natural_h = xobject.height.0 as f32 * px_to_mm;
        if natural_w <= 0.0 || natural_h <= 0.0 {
            return;
        }

        Image::from(xobject).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(y)),
                scale_x: Some(w / natural_w),
                scale_y: Some(h / natural_h),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
    }
}
