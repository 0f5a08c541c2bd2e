//! フロー型レイアウトエンジン
//!
//! ブロック（段落・余白・表）を1つのフレームに上から流し込み、ページを割り付ける。
//! 処理は2段階:
//! 1. `FlowDocument::layout` で折り返しとページ割りを確定し、描画命令の列にする
//! 2. `LaidOutDocument::render` で総ページ数を受け取り、ページ番号付きでPDFに描く

use crate::error::Result;
use crate::export::canvas::{Canvas, THIN_LINE_PT};
use crate::export::text::wrap_text;
use crate::fonts::{FontContext, FontRole};
use jp_career_docs_common::export::work_history_core::{CellLine, RowSpan};
use jp_career_docs_common::layout::{pt_to_mm, PageLayout, SMALL_SIZE_PT};
use printpdf::{Mm, PdfDocument, PdfDocumentReference};

/// 位置の誤差許容（mm）
const EPSILON_MM: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// 文字スタイル
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub role: FontRole,
    pub size_pt: f32,
    pub leading_pt: f32,
    pub align: Align,
}

impl TextStyle {
    pub const fn new(role: FontRole, size_pt: f32, leading_pt: f32) -> Self {
        Self { role, size_pt, leading_pt, align: Align::Left }
    }

    pub const fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn leading_mm(&self) -> f32 {
        pt_to_mm(self.leading_pt)
    }

    /// 行の上端からベースラインまでの距離（mm）
    fn baseline_offset_mm(&self) -> f32 {
        pt_to_mm(self.leading_pt / 2.0 + self.size_pt * 0.35)
    }
}

/// 段落
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub lines: Vec<CellLine>,
    pub style: TextStyle,
    pub indent_mm: f32,
    pub space_before_mm: f32,
    pub space_after_mm: f32,
}

impl Paragraph {
    /// 改行で区切られた本文から段落を作る
    pub fn new(text: &str, style: TextStyle) -> Self {
        Self {
            lines: text.split('\n').map(CellLine::plain).collect(),
            style,
            indent_mm: 0.0,
            space_before_mm: 0.0,
            space_after_mm: 0.0,
        }
    }

    pub fn spacing(mut self, before_mm: f32, after_mm: f32) -> Self {
        self.space_before_mm = before_mm;
        self.space_after_mm = after_mm;
        self
    }

    pub fn indent(mut self, indent_mm: f32) -> Self {
        self.indent_mm = indent_mm;
        self
    }
}

/// 表のセル
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub lines: Vec<CellLine>,
    pub style: TextStyle,
    pub background: Option<f32>,
}

impl Cell {
    pub fn new(lines: Vec<CellLine>, style: TextStyle) -> Self {
        Self { lines, style, background: None }
    }

    /// 装飾なしの文字列（改行可）
    pub fn text(text: &str, style: TextStyle) -> Self {
        Self::new(text.split('\n').map(CellLine::plain).collect(), style)
    }

    pub fn with_background(mut self, level: f32) -> Self {
        self.background = Some(level);
        self
    }
}

/// セル内余白（pt）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Padding {
    /// 通常のセル
    pub const CELL: Padding = Padding { top: 2.0, bottom: 2.0, left: 3.0, right: 3.0 };
    /// 会社見出しの帯
    pub const HEADER_BAR: Padding = Padding { top: 3.0, bottom: 3.0, left: 4.0, right: 3.0 };

    fn vertical_mm(&self) -> f32 {
        pt_to_mm(self.top + self.bottom)
    }
}

/// 表
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub col_widths_mm: Vec<f32>,
    pub rows: Vec<Vec<Cell>>,
    pub row_backgrounds: Vec<Option<f32>>,
    /// 縦方向の結合（行添字は見出し行を含む表全体の添字）
    pub spans: Vec<RowSpan>,
    pub padding: Padding,
    pub grid_pt: f32,
}

impl Table {
    pub fn new(col_widths_mm: Vec<f32>) -> Self {
        Self {
            col_widths_mm,
            rows: Vec::new(),
            row_backgrounds: Vec::new(),
            spans: Vec::new(),
            padding: Padding::CELL,
            grid_pt: THIN_LINE_PT,
        }
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn push_row(&mut self, cells: Vec<Cell>, background: Option<f32>) {
        self.rows.push(cells);
        self.row_backgrounds.push(background);
    }

    pub fn push_span(&mut self, span: RowSpan) {
        self.spans.push(span);
    }
}

/// フレームに流し込む要素
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    /// 縦方向の余白（mm）
    Spacer(f32),
    Table(Table),
}

/// 総ページ数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCount(pub usize);

/// 割り付け済みの描画命令（mm、左下原点）
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        role: FontRole,
        size_pt: f32,
        bold: bool,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width_pt: f32,
    },
    Fill {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        level: f32,
    },
}

/// 流し込み前の文書
#[derive(Debug, Clone)]
pub struct FlowDocument {
    title: String,
    blocks: Vec<Block>,
    page: PageLayout,
    split_rows: bool,
}

impl FlowDocument {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            blocks: Vec::new(),
            page: PageLayout::a4_portrait(),
            split_rows: true,
        }
    }

    /// 表の行をページ境界で分割するか（しない場合は行ごと次ページへ送る）
    pub fn split_rows(mut self, enabled: bool) -> Self {
        self.split_rows = enabled;
        self
    }

    pub fn page_layout(mut self, page: PageLayout) -> Self {
        self.page = page;
        self
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn extend<I: IntoIterator<Item = Block>>(&mut self, blocks: I) {
        self.blocks.extend(blocks);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// 折り返しとページ割りを確定する
    pub fn layout(&self, fonts: &FontContext) -> LaidOutDocument {
        let mut composer = Composer::new(fonts, self.page, self.split_rows);
        for block in &self.blocks {
            match block {
                Block::Paragraph(paragraph) => composer.paragraph(paragraph),
                Block::Spacer(height) => composer.spacer(*height),
                Block::Table(table) => composer.table(table),
            }
        }

        LaidOutDocument {
            title: self.title.clone(),
            page: self.page,
            pages: composer.pages,
        }
    }
}

/// ページ割り済みの文書
#[derive(Debug, Clone)]
pub struct LaidOutDocument {
    title: String,
    page: PageLayout,
    pages: Vec<Vec<DrawOp>>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> PageCount {
        PageCount(self.pages.len())
    }

    pub fn pages(&self) -> &[Vec<DrawOp>] {
        &self.pages
    }

    /// PDFに描画する（各ページ右下に「N / 総数」）
    pub fn render(&self, total: PageCount, fonts: &FontContext) -> Result<PdfDocumentReference> {
        let width = Mm(self.page.page_width_mm);
        let height = Mm(self.page.page_height_mm);
        let (doc, first_page, first_layer) = PdfDocument::new(&self.title, width, height, "Layer 1");
        let registered = fonts.register(&doc)?;

        for (index, ops) in self.pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(width, height, "Layer 1")
            };
            let canvas = Canvas::new(doc.get_page(page).get_layer(layer), fonts, &registered);

            for op in ops {
                paint(&canvas, op);
            }

            canvas.text_right(
                self.page.footer_right_x_mm(),
                self.page.footer_y_mm(),
                &format!("{} / {}", index + 1, total.0),
                FontRole::Mincho,
                SMALL_SIZE_PT,
            );
        }

        Ok(doc)
    }
}

fn paint(canvas: &Canvas<'_>, op: &DrawOp) {
    match op {
        DrawOp::Text { x, y, text, role, size_pt, bold } => {
            canvas.styled_text(*x, *y, text, *role, *size_pt, *bold)
        }
        DrawOp::Line { x1, y1, x2, y2, width_pt } => canvas.line(*x1, *y1, *x2, *y2, *width_pt, false),
        DrawOp::Fill { x, y, w, h, level } => canvas.fill_rect(*x, *y, *w, *h, *level),
    }
}

// ============================================
// 割り付け処理
// ============================================

/// 折り返し済みのセル
#[derive(Debug, Clone)]
struct MeasuredCell {
    lines: Vec<CellLine>,
    style: TextStyle,
    background: Option<f32>,
}

impl MeasuredCell {
    fn content_height(&self) -> f32 {
        self.lines.len() as f32 * self.style.leading_mm()
    }
}

/// 折り返し済みの行
#[derive(Debug, Clone)]
struct MeasuredRow {
    /// None は上のセルに結合されている
    cells: Vec<Option<MeasuredCell>>,
    /// 各列のセルが占める行数
    spans: Vec<usize>,
    background: Option<f32>,
    height: f32,
}

struct Composer<'a> {
    fonts: &'a FontContext,
    page: PageLayout,
    split_rows: bool,
    pages: Vec<Vec<DrawOp>>,
    cursor: f32,
}

impl<'a> Composer<'a> {
    fn new(fonts: &'a FontContext, page: PageLayout, split_rows: bool) -> Self {
        Self {
            fonts,
            page,
            split_rows,
            pages: vec![Vec::new()],
            cursor: page.frame_top_mm(),
        }
    }

    fn left(&self) -> f32 {
        self.page.margin_left_mm
    }

    fn bottom(&self) -> f32 {
        self.page.margin_bottom_mm
    }

    fn remaining(&self) -> f32 {
        self.cursor - self.bottom()
    }

    fn at_page_top(&self) -> bool {
        (self.page.frame_top_mm() - self.cursor).abs() < EPSILON_MM
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor = self.page.frame_top_mm();
    }

    fn emit(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }

    fn spacer(&mut self, height: f32) {
        if self.at_page_top() {
            return;
        }
        self.cursor = (self.cursor - height).max(self.bottom());
    }

    fn aligned_x(&self, align: Align, left: f32, width: f32, text_width: f32) -> f32 {
        match align {
            Align::Left => left,
            Align::Center => left + (width - text_width) / 2.0,
            Align::Right => left + width - text_width,
        }
    }

    fn paragraph(&mut self, paragraph: &Paragraph) {
        let style = paragraph.style;
        let face = self.fonts.face(style.role);
        let leading = style.leading_mm();
        let left = self.left() + paragraph.indent_mm;
        let width = self.page.frame_width_mm() - paragraph.indent_mm;

        if !self.at_page_top() {
            if self.remaining() < paragraph.space_before_mm + leading {
                self.new_page();
            } else {
                self.cursor -= paragraph.space_before_mm;
            }
        }

        for line in &paragraph.lines {
            for visual in wrap_text(&line.text, face, style.size_pt, width) {
                if self.remaining() + EPSILON_MM < leading && !self.at_page_top() {
                    self.new_page();
                }
                let text_width = face.text_width_mm(&visual, style.size_pt);
                let x = self.aligned_x(style.align, left, width, text_width);
                let y = self.cursor - style.baseline_offset_mm();
                self.emit(DrawOp::Text {
                    x,
                    y,
                    text: visual,
                    role: style.role,
                    size_pt: style.size_pt,
                    bold: line.bold,
                });
                self.cursor -= leading;
            }
        }

        self.cursor = (self.cursor - paragraph.space_after_mm).max(self.bottom());
    }

    fn measure_cell(&self, cell: &Cell, width: f32, padding: &Padding) -> MeasuredCell {
        let inner = width - pt_to_mm(padding.left + padding.right);
        let face = self.fonts.face(cell.style.role);
        let lines = cell
            .lines
            .iter()
            .flat_map(|line| {
                wrap_text(&line.text, face, cell.style.size_pt, inner)
                    .into_iter()
                    .map(move |text| CellLine { text, bold: line.bold })
            })
            .collect();

        MeasuredCell {
            lines,
            style: cell.style,
            background: cell.background,
        }
    }

    /// 結合セルを除いた行の高さ
    fn natural_height(row: &MeasuredRow, padding: &Padding) -> f32 {
        let content = row
            .cells
            .iter()
            .zip(&row.spans)
            .filter(|(_, span)| **span == 1)
            .filter_map(|(cell, _)| cell.as_ref())
            .map(MeasuredCell::content_height)
            .fold(0.0_f32, f32::max);

        let minimum = row
            .cells
            .iter()
            .flatten()
            .map(|cell| cell.style.leading_mm())
            .next()
            .unwrap_or(0.0);

        content.max(minimum) + padding.vertical_mm()
    }

    fn measure_table(&self, table: &Table) -> Vec<MeasuredRow> {
        let columns = table.col_widths_mm.len();
        let mut rows: Vec<MeasuredRow> = table
            .rows
            .iter()
            .enumerate()
            .map(|(index, cells)| {
                let cells = (0..columns)
                    .map(|col| {
                        cells
                            .get(col)
                            .map(|cell| self.measure_cell(cell, table.col_widths_mm[col], &table.padding))
                    })
                    .collect();
                MeasuredRow {
                    cells,
                    spans: vec![1; columns],
                    background: table.row_backgrounds.get(index).copied().flatten(),
                    height: 0.0,
                }
            })
            .collect();

        let spans: Vec<&RowSpan> = table
            .spans
            .iter()
            .filter(|s| s.column < columns && s.first_row < s.last_row && s.last_row < rows.len())
            .collect();

        for span in &spans {
            rows[span.first_row].spans[span.column] = span.row_count();
            for row in &mut rows[span.first_row + 1..=span.last_row] {
                row.cells[span.column] = None;
                row.spans[span.column] = 0;
            }
        }

        for row in &mut rows {
            row.height = Self::natural_height(row, &table.padding);
        }

        // 結合セルが収まるよう、範囲の最終行を伸ばす
        for span in &spans {
            let needed = rows[span.first_row].cells[span.column]
                .as_ref()
                .map(|cell| cell.content_height() + table.padding.vertical_mm())
                .unwrap_or(0.0);
            let available: f32 = rows[span.first_row..=span.last_row].iter().map(|r| r.height).sum();
            if needed > available {
                rows[span.last_row].height += needed - available;
            }
        }

        rows
    }

    /// 結合で結びついた行のまとまり
    fn row_groups(rows: &[MeasuredRow]) -> Vec<std::ops::Range<usize>> {
        let mut groups = Vec::new();
        let mut start = 0;
        while start < rows.len() {
            let mut end = start;
            let mut index = start;
            while index <= end {
                for span in &rows[index].spans {
                    if *span > 1 {
                        end = end.max(index + span - 1);
                    }
                }
                index += 1;
            }
            groups.push(start..end + 1);
            start = end + 1;
        }
        groups
    }

    fn table(&mut self, table: &Table) {
        let rows = self.measure_table(table);
        let frame_height = self.page.frame_height_mm();

        for group in Self::row_groups(&rows) {
            let group_rows = &rows[group];
            let height: f32 = group_rows.iter().map(|r| r.height).sum();

            if height <= self.remaining() + EPSILON_MM {
                self.emit_rows(table, group_rows);
            } else if group_rows.len() > 1 && height <= frame_height {
                self.new_page();
                self.emit_rows(table, group_rows);
            } else if group_rows.len() > 1 {
                // 1ページに収まらない結合は解除して1行ずつ流す
                for row in unspan(group_rows, &table.padding) {
                    self.place_row(table, row);
                }
            } else {
                self.place_row(table, group_rows[0].clone());
            }
        }
    }

    fn place_row(&mut self, table: &Table, mut row: MeasuredRow) {
        let frame_height = self.page.frame_height_mm();
        loop {
            if row.height <= self.remaining() + EPSILON_MM {
                self.emit_rows(table, std::slice::from_ref(&row));
                return;
            }

            if !self.split_rows && row.height <= frame_height && !self.at_page_top() {
                self.new_page();
                continue;
            }

            match split_row(&row, self.remaining(), &table.padding) {
                Some((head, tail)) => {
                    self.emit_rows(table, std::slice::from_ref(&head));
                    self.new_page();
                    row = tail;
                }
                None if self.at_page_top() => {
                    // 1行も入らない高さのページでは諦めてそのまま置く
                    self.emit_rows(table, std::slice::from_ref(&row));
                    return;
                }
                None => self.new_page(),
            }
        }
    }

    /// 現在位置から行を並べる（結合セルは同じスライス内で完結している前提）
    fn emit_rows(&mut self, table: &Table, rows: &[MeasuredRow]) {
        let mut fills = Vec::new();
        let mut lines = Vec::new();
        let mut texts = Vec::new();
        let padding = &table.padding;

        let mut top = self.cursor;
        for (row_index, row) in rows.iter().enumerate() {
            let mut x = self.left();
            for (col, width) in table.col_widths_mm.iter().enumerate() {
                let span = row.spans.get(col).copied().unwrap_or(1);
                if let Some(cell) = row.cells.get(col).and_then(Option::as_ref) {
                    let span_end = (row_index + span.max(1)).min(rows.len());
                    let height: f32 = rows[row_index..span_end].iter().map(|r| r.height).sum();
                    let bottom = top - height;

                    if let Some(level) = cell.background.or(row.background) {
                        fills.push(DrawOp::Fill { x, y: bottom, w: *width, h: height, level });
                    }
                    push_box(&mut lines, x, bottom, *width, height, table.grid_pt);

                    let text_left = x + pt_to_mm(padding.left);
                    let text_width = width - pt_to_mm(padding.left + padding.right);
                    let face = self.fonts.face(cell.style.role);
                    let mut line_top = top - pt_to_mm(padding.top);
                    for line in &cell.lines {
                        let measured = face.text_width_mm(&line.text, cell.style.size_pt);
                        texts.push(DrawOp::Text {
                            x: self.aligned_x(cell.style.align, text_left, text_width, measured),
                            y: line_top - cell.style.baseline_offset_mm(),
                            text: line.text.clone(),
                            role: cell.style.role,
                            size_pt: cell.style.size_pt,
                            bold: line.bold,
                        });
                        line_top -= cell.style.leading_mm();
                    }
                } else if span != 0 {
                    // セル定義のない列も罫線だけは引く
                    push_box(&mut lines, x, top - row.height, *width, row.height, table.grid_pt);
                }
                x += width;
            }
            top -= row.height;
        }

        for op in fills.into_iter().chain(lines).chain(texts) {
            self.emit(op);
        }
        self.cursor = top;
    }
}

fn push_box(ops: &mut Vec<DrawOp>, x: f32, y: f32, w: f32, h: f32, width_pt: f32) {
    let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h), (x, y)];
    for pair in corners.windows(2) {
        ops.push(DrawOp::Line {
            x1: pair[0].0,
            y1: pair[0].1,
            x2: pair[1].0,
            y2: pair[1].1,
            width_pt,
        });
    }
}

/// 結合を解除し、結合されていたセルを空セルにする
fn unspan(rows: &[MeasuredRow], padding: &Padding) -> Vec<MeasuredRow> {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            for (col, span) in row.spans.iter_mut().enumerate() {
                if *span == 0 {
                    let style = rows
                        .iter()
                        .find_map(|r| r.cells.get(col).and_then(Option::as_ref))
                        .map(|c| c.style);
                    if let Some(style) = style {
                        row.cells[col] = Some(MeasuredCell { lines: Vec::new(), style, background: None });
                    }
                }
                *span = 1;
            }
            row.height = Composer::natural_height(&row, padding);
            row
        })
        .collect()
}

/// 残り高さに収まる行数で行を上下に分ける
///
/// どのセルも1行も入らない場合は None。
fn split_row(row: &MeasuredRow, available: f32, padding: &Padding) -> Option<(MeasuredRow, MeasuredRow)> {
    let content = available - padding.vertical_mm();
    if content <= 0.0 {
        return None;
    }

    let mut head = row.clone();
    let mut tail = row.clone();
    let mut progressed = false;

    for (col, cell) in row.cells.iter().enumerate() {
        let Some(cell) = cell else { continue };
        let fit = ((content + EPSILON_MM) / cell.style.leading_mm()).floor() as usize;
        let take = fit.min(cell.lines.len());
        if take > 0 {
            progressed = true;
        }
        if let (Some(h), Some(t)) = (head.cells[col].as_mut(), tail.cells[col].as_mut()) {
            h.lines.truncate(take);
            t.lines.drain(..take);
            t.background = cell.background;
        }
    }

    if !progressed {
        return None;
    }

    head.height = Composer::natural_height(&head, padding).min(available);
    tail.height = Composer::natural_height(&tail, padding);
    Some((head, tail))
}
