//! 履歴書（JIS標準様式）PDF生成
//!
//! A4 2ページ固定。座標は左下原点の mm で、x は `resume_x` で本文の左端に寄せる。

use crate::error::{DocsError, Result};
use crate::export::canvas::{Canvas, THICK_LINE_PT, THIN_LINE_PT};
use crate::export::flow::PageCount;
use crate::export::save_pdf;
use crate::fonts::{FontContext, FontRole};
use jp_career_docs_common::export::resume_core::{
    fit_photo, history_rows, licence_rows, text_box_capacity, text_box_leading_mm, text_box_lines,
    Fitted,
};
use jp_career_docs_common::layout::{
    resume_x, A4_HEIGHT_MM, A4_WIDTH_MM, PHOTO_HEIGHT_MM, PHOTO_WIDTH_MM, PHOTO_X_MM, PHOTO_Y_MM,
    RESUME_CONTENT_WIDTH_MM, RESUME_HISTORY_ROWS, RESUME_LARGE_SIZE_PT, RESUME_LICENCE_ROWS,
    RESUME_NORMAL_SIZE_PT, RESUME_ROW_HEIGHT_MM, RESUME_SMALL_SIZE_PT, RESUME_TITLE_SIZE_PT,
};
use jp_career_docs_common::resume::{AddressBlock, HistoryEntry, ResumeDocument};
use printpdf::{ColorBits, ColorSpace, ImageXObject, Mm, PdfDocument, Px};
use std::path::Path;

const DOCUMENT_TITLE: &str = "履歴書";

/// 写真の埋め込み解像度（px/mm, 約300dpi）
const PHOTO_PX_PER_MM: f32 = 300.0 / 25.4;

// 年・月列の区切り位置（相対 x）
const YEAR_COL_END: f32 = 19.0;
const MONTH_COL_END: f32 = 31.0;
const YEAR_CENTER: f32 = 9.5;
const MONTH_CENTER: f32 = 25.0;

// 学歴・職歴欄（1ページ目）
const HISTORY_TOP: f32 = 136.0;
const HISTORY_BOTTOM: f32 = 17.0;

// 免許・資格欄（2ページ目）
const LICENCE_TOP: f32 = 239.0;
const LICENCE_BOTTOM: f32 = 190.0;

/// 自由記述欄の高さ
const TEXT_BOX_HEIGHT: f32 = 40.0;
/// 自由記述欄のうち本文に使える高さ
const TEXT_BOX_BODY_HEIGHT: f32 = 28.0;

/// 自由記述欄（ラベル, 枠の下端 y）
const TEXT_BOXES: [(&str, f32); 3] = [("趣味・特技", 120.0), ("志望動機", 73.0), ("本人希望記入欄", 26.0)];

fn mincho(canvas: &Canvas<'_>, x: f32, y: f32, text: &str, size_pt: f32) {
    canvas.text(resume_x(x), y, text, FontRole::Mincho, size_pt);
}

fn hline(canvas: &Canvas<'_>, x1: f32, x2: f32, y: f32, dashed: bool) {
    canvas.line(resume_x(x1), y, resume_x(x2), y, THIN_LINE_PT, dashed);
}

fn vline(canvas: &Canvas<'_>, x: f32, y1: f32, y2: f32, dashed: bool) {
    canvas.line(resume_x(x), y1, resume_x(x), y2, THIN_LINE_PT, dashed);
}

fn frame(canvas: &Canvas<'_>, y: f32, height: f32) {
    canvas.rect(resume_x(0.0), y, RESUME_CONTENT_WIDTH_MM, height, THICK_LINE_PT, false);
}

fn report_truncation<T>(area: &str, fitted: &Fitted<T>) {
    if fitted.is_truncated() {
        tracing::info!("履歴書: {}が欄に収まらないため {}行を省略しました", area, fitted.dropped);
    }
}

// ============================================
// 1ページ目
// ============================================

fn draw_photo(canvas: &Canvas<'_>, photo: &str) -> Result<()> {
    let x = resume_x(PHOTO_X_MM);
    canvas.rect(x, PHOTO_Y_MM, PHOTO_WIDTH_MM, PHOTO_HEIGHT_MM, THIN_LINE_PT, true);

    if !photo.is_empty() {
        let path = Path::new(photo);
        if path.exists() {
            let xobject = load_photo(path)?;
            let placement = fit_photo(
                xobject.width.0 as u32,
                xobject.height.0 as u32,
                PHOTO_WIDTH_MM,
                PHOTO_HEIGHT_MM,
            );
            canvas.image(
                xobject,
                x + placement.offset_x_mm,
                PHOTO_Y_MM + placement.offset_y_mm,
                placement.width_mm,
                placement.height_mm,
            );
            return Ok(());
        }
        tracing::info!("写真が見つからないため枠のみ出力します: {}", path.display());
    }

    mincho(canvas, 148.0, 240.0, "写真を貼る位置", RESUME_NORMAL_SIZE_PT);
    let notes = [
        (147.0, 233.0, "1. 縦36〜40 mm"),
        (150.0, 230.0, "横24〜30 mm"),
        (147.0, 227.0, "2. 本人単身胸から上"),
        (147.0, 224.0, "3. 裏面にのりづけ"),
        (147.0, 221.0, "4. 裏面に氏名記入"),
    ];
    for (x, y, text) in notes {
        mincho(canvas, x, y, text, RESUME_SMALL_SIZE_PT);
    }
    Ok(())
}

/// 写真を読み込み、枠に対して十分な解像度まで縮小して RGB の XObject にする
fn load_photo(path: &Path) -> Result<ImageXObject> {
    let img = image::open(path)
        .map_err(|e| DocsError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let max_w = (PHOTO_WIDTH_MM * PHOTO_PX_PER_MM).round() as u32;
    let max_h = (PHOTO_HEIGHT_MM * PHOTO_PX_PER_MM).round() as u32;
    let img = if img.width() > max_w || img.height() > max_h {
        img.thumbnail(max_w, max_h)
    } else {
        img
    };

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    tracing::debug!("写真: {} ({}x{}px)", path.display(), width, height);

    Ok(ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb.into_raw(),
        image_filter: None,
        smask: None,
        clipping_bbox: None,
    })
}

fn draw_frame(canvas: &Canvas<'_>) {
    // 写真欄を避けた L 字型の外枠
    let outline: Vec<(f32, f32)> = [
        (0.0, 240.0),
        (139.0, 240.0),
        (139.0, 199.0),
        (177.0, 199.0),
        (177.0, 146.0),
        (0.0, 146.0),
    ]
    .iter()
    .map(|&(x, y)| (resume_x(x), y))
    .collect();
    canvas.polygon(&outline, THICK_LINE_PT);

    hline(canvas, 0.0, 139.0, 233.0, true);
    hline(canvas, 0.0, 139.0, 218.0, false);
    hline(canvas, 0.0, 139.0, 205.0, false);
    hline(canvas, 0.0, 139.0, 199.0, false);
    vline(canvas, 15.0, 218.0, 205.0, false);
    vline(canvas, 110.0, 218.0, 205.0, false);
    vline(canvas, 23.0, 205.0, 199.0, true);
    vline(canvas, 56.0, 205.0, 199.0, false);
    vline(canvas, 71.0, 205.0, 199.0, true);

    hline(canvas, 0.0, 139.0, 192.0, true);
    hline(canvas, 0.0, 177.0, 173.0, false);
    hline(canvas, 0.0, 139.0, 166.0, true);
    vline(canvas, 139.0, 199.0, 146.0, false);
    hline(canvas, 139.0, 177.0, 186.0, true);
    hline(canvas, 139.0, 177.0, 160.0, true);
}

fn draw_personal(canvas: &Canvas<'_>, resume: &ResumeDocument) {
    let size = RESUME_NORMAL_SIZE_PT;
    let large = RESUME_LARGE_SIZE_PT;

    canvas.text(resume_x(5.0), 247.0, "履　歴　書", FontRole::Gothic, RESUME_TITLE_SIZE_PT);
    mincho(canvas, 110.0, 245.0, &resume.date, size);

    mincho(canvas, 2.0, 235.0, "ふりがな", size);
    mincho(canvas, 30.0, 235.0, &resume.name_kana, size);
    mincho(canvas, 2.0, 228.0, "氏　　名", size);
    mincho(canvas, 30.0, 224.0, &resume.name, RESUME_TITLE_SIZE_PT);

    mincho(canvas, 1.5, 210.0, "生年月日", size);
    mincho(canvas, 30.0, 210.0, &resume.birth_day, large);
    mincho(canvas, 121.0, 210.0, &resume.gender, large);

    canvas.text_centered(resume_x(11.5), 201.0, "携帯電話番号", FontRole::Mincho, size);
    mincho(canvas, 25.0, 201.0, &resume.cell_phone, size);
    canvas.text_centered(resume_x(63.5), 201.0, "E-MAIL", FontRole::Mincho, size);
    mincho(canvas, 75.0, 201.0, &resume.email, size);
}

/// 住所ブロック（ふりがな・〒・住所）と右側の電話/FAX欄
fn draw_address(canvas: &Canvas<'_>, block: &AddressBlock<'_>, label: &str, top: f32, phone_top: f32) {
    let size = RESUME_NORMAL_SIZE_PT;

    mincho(canvas, 2.0, top, "ふりがな", size);
    mincho(canvas, 20.0, top, block.kana, size);
    mincho(canvas, 2.0, top - 6.0, &format!("{} 〒", label), size);
    mincho(canvas, 16.0, top - 6.0, block.zip, size);
    mincho(canvas, 15.0, top - 12.0, block.address, RESUME_LARGE_SIZE_PT);

    mincho(canvas, 141.0, phone_top, "電話", size);
    mincho(canvas, 143.0, phone_top - 5.0, block.tel, size);
    mincho(canvas, 141.0, phone_top - 13.0, "FAX", size);
    mincho(canvas, 143.0, phone_top - 18.0, block.fax, size);
}

/// 年|月|内容 の罫線表（見出し行 + データ行）
fn draw_dated_table(canvas: &Canvas<'_>, top: f32, bottom: f32, rows: usize) {
    frame(canvas, bottom, top - bottom);
    vline(canvas, YEAR_COL_END, top, bottom, false);
    vline(canvas, MONTH_COL_END, top, bottom, false);
    for i in 1..rows {
        hline(canvas, 0.0, RESUME_CONTENT_WIDTH_MM, top - i as f32 * RESUME_ROW_HEIGHT_MM, false);
    }
}

fn draw_dated_headers(canvas: &Canvas<'_>, y: f32, title_x: f32, title: &str) {
    let size = RESUME_NORMAL_SIZE_PT;
    canvas.text_centered(resume_x(YEAR_CENTER), y, "年", FontRole::Mincho, size);
    canvas.text_centered(resume_x(MONTH_CENTER), y, "月", FontRole::Mincho, size);
    mincho(canvas, title_x, y, title, size);
}

/// データ行を見出し行の直下から詰めて描く
fn draw_dated_rows(canvas: &Canvas<'_>, top: f32, rows: &[HistoryEntry]) {
    let size = RESUME_LARGE_SIZE_PT;
    let mut y = top - RESUME_ROW_HEIGHT_MM - 5.0;
    for row in rows {
        canvas.text_centered(resume_x(YEAR_CENTER), y, &row.year, FontRole::Mincho, size);
        canvas.text_centered(resume_x(MONTH_CENTER), y, &row.month, FontRole::Mincho, size);
        mincho(canvas, 35.0, y, &row.value, size);
        y -= RESUME_ROW_HEIGHT_MM;
    }
}

fn paint_first_page(canvas: &Canvas<'_>, resume: &ResumeDocument) -> Result<()> {
    draw_photo(canvas, &resume.photo)?;
    draw_frame(canvas);
    draw_personal(canvas, resume);

    draw_address(canvas, &resume.current_address(), "現住所", 194.0, 195.0);
    draw_address(canvas, &resume.contact_address(), "連絡先", 168.0, 169.0);
    canvas.text_right(
        resume_x(137.0),
        162.0,
        "（現住所以外に連絡を希望する場合のみ記入）",
        FontRole::Mincho,
        RESUME_SMALL_SIZE_PT,
    );

    draw_dated_table(canvas, HISTORY_TOP, HISTORY_BOTTOM, RESUME_HISTORY_ROWS + 1);
    draw_dated_headers(canvas, HISTORY_TOP - 5.0, 77.0, "学歴・職歴（各項目ごとにまとめて書く）");
    let history = history_rows(resume);
    report_truncation("学歴・職歴", &history);
    draw_dated_rows(canvas, HISTORY_TOP, &history.rows);

    mincho(canvas, 1.0, 12.0, "記入上の注意", RESUME_NORMAL_SIZE_PT);
    mincho(canvas, 22.0, 12.0, "数字はアラビア数字で、文字はくずさず正確に書く。", RESUME_NORMAL_SIZE_PT);
    Ok(())
}

// ============================================
// 2ページ目
// ============================================

fn draw_family_strip(canvas: &Canvas<'_>, resume: &ResumeDocument) {
    let size = RESUME_NORMAL_SIZE_PT;
    let large = RESUME_LARGE_SIZE_PT;

    frame(canvas, 167.0, 15.0);
    for x in [57.0, 97.0, 137.0] {
        vline(canvas, x, 182.0, 167.0, false);
    }

    mincho(canvas, 2.0, 178.0, "通勤時間", size);
    mincho(canvas, 5.0, 171.0, &resume.commuting_time, large);
    mincho(canvas, 59.0, 178.0, "扶養家族", size);
    mincho(canvas, 59.0, 171.0, "(配偶者を除く)", size);
    mincho(canvas, 85.0, 171.0, &resume.dependents, large);
    mincho(canvas, 99.0, 178.0, "配偶者", size);
    mincho(canvas, 116.0, 171.0, &resume.spouse, large);
    mincho(canvas, 139.0, 178.0, "配偶者の扶養義務", size);
    mincho(canvas, 155.0, 171.0, &resume.supporting_spouse, large);
}

/// 自由記述欄。明示的な改行でのみ行を分け、枠に入らない行は捨てる
fn draw_text_box(canvas: &Canvas<'_>, label: &str, bottom: f32, text: &str) {
    let size = RESUME_LARGE_SIZE_PT;
    let top = bottom + TEXT_BOX_HEIGHT;

    frame(canvas, bottom, TEXT_BOX_HEIGHT);
    mincho(canvas, 2.0, top - 4.0, label, RESUME_NORMAL_SIZE_PT);

    let lines = text_box_lines(text, text_box_capacity(size, TEXT_BOX_BODY_HEIGHT));
    report_truncation(label, &lines);

    let leading = text_box_leading_mm(size);
    let mut y = top - 10.0;
    for line in &lines.rows {
        mincho(canvas, 2.0, y, line, size);
        y -= leading;
    }
}

fn paint_second_page(canvas: &Canvas<'_>, resume: &ResumeDocument) -> Result<()> {
    draw_dated_table(canvas, LICENCE_TOP, LICENCE_BOTTOM, RESUME_LICENCE_ROWS + 1);
    draw_dated_headers(canvas, LICENCE_TOP - 5.0, 90.0, "免許・資格");
    let licences = licence_rows(resume);
    report_truncation("免許・資格", &licences);
    draw_dated_rows(canvas, LICENCE_TOP, &licences.rows);

    draw_family_strip(canvas, resume);

    let texts = [&resume.hobby, &resume.motivation, &resume.request];
    for ((label, bottom), text) in TEXT_BOXES.iter().zip(texts) {
        draw_text_box(canvas, label, *bottom, text);
    }
    Ok(())
}

type PagePainter = fn(&Canvas<'_>, &ResumeDocument) -> Result<()>;

const PAGES: [PagePainter; 2] = [paint_first_page, paint_second_page];

/// 履歴書PDFを生成する（常に2ページ）
pub fn generate_pdf(resume: &ResumeDocument, output_path: &Path, fonts: &FontContext) -> Result<PageCount> {
    let width = Mm(A4_WIDTH_MM);
    let height = Mm(A4_HEIGHT_MM);
    let (doc, first_page, first_layer) = PdfDocument::new(DOCUMENT_TITLE, width, height, "Layer 1");
    let registered = fonts.register(&doc)?;

    for (index, paint) in PAGES.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Layer 1")
        };
        let canvas = Canvas::new(doc.get_page(page).get_layer(layer), fonts, &registered);
        paint(&canvas, resume)?;
    }

    save_pdf(doc, output_path)?;
    Ok(PageCount(PAGES.len()))
}
