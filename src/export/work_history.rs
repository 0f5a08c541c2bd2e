//! 職務経歴書のブロック組み立て
//!
//! モデルからフロー用のブロック列を作り、`flow` で割り付けて描画する。

use crate::error::Result;
use crate::export::flow::{Align, Block, Cell, FlowDocument, PageCount, Padding, Paragraph, Table, TextStyle};
use crate::export::save_pdf;
use crate::fonts::{FontContext, FontRole};
use jp_career_docs_common::export::work_history_core::{
    company_header_text, company_info_lines, environment_lines, period_lines, project_content_lines,
    side_company_header_text, side_project_content_lines, skill_rows, team_lines, CellLine, RowSpan,
    BULLET, PROJECT_TABLE_HEADERS, SKILL_TABLE_HEADERS,
};
use jp_career_docs_common::layout::{
    BODY_SIZE_PT, COL_COMPANY_INFO_MM, COL_CONTENT_MM, COL_EMPLOYMENT_MM, COL_ENV_MM, COL_PERIOD_MM,
    COL_QUAL_DATE_MM, COL_QUAL_NAME_MM, COL_SKILL_CAT_MM, COL_SKILL_LEVEL_MM, COL_SKILL_NAME_MM,
    COL_SKILL_PERIOD_MM, COL_TEAM_MM, CONTENT_WIDTH_MM, SECTION_HEADER_SIZE_PT, TABLE_SIZE_PT,
    TITLE_SIZE_PT,
};
use jp_career_docs_common::work_history::{
    Company, ProjectEntry, SideCompany, WorkHistory, WorkHistoryDocument,
};
use std::path::Path;

pub const DOCUMENT_TITLE: &str = "職 務 経 歴 書";

const TITLE: TextStyle = TextStyle::new(FontRole::Gothic, TITLE_SIZE_PT, TITLE_SIZE_PT * 1.4).aligned(Align::Center);
const DATE: TextStyle = TextStyle::new(FontRole::Mincho, BODY_SIZE_PT, 12.0).aligned(Align::Right);
const SECTION_HEADER: TextStyle = TextStyle::new(FontRole::Gothic, SECTION_HEADER_SIZE_PT, SECTION_HEADER_SIZE_PT * 1.4);
const BODY: TextStyle = TextStyle::new(FontRole::Mincho, BODY_SIZE_PT, BODY_SIZE_PT * 1.8);
const CELL: TextStyle = TextStyle::new(FontRole::Mincho, TABLE_SIZE_PT, TABLE_SIZE_PT * 1.6);
const CELL_GOTHIC: TextStyle = TextStyle::new(FontRole::Gothic, TABLE_SIZE_PT, TABLE_SIZE_PT * 1.6);
const COMPANY_HEADER: TextStyle = TextStyle::new(FontRole::Gothic, BODY_SIZE_PT, BODY_SIZE_PT * 1.6);

/// 会社見出し帯の背景
const HEADER_BAR_GRAY: f32 = 0.92;
/// 表の見出し行の背景
const TABLE_HEADER_GRAY: f32 = 0.95;

/// 箇条書きの字下げ（mm）
const BULLET_INDENT_MM: f32 = 4.0;

fn section_header(label: &str) -> Block {
    Block::Paragraph(Paragraph::new(label, SECTION_HEADER).spacing(4.0, 2.0))
}

fn body(text: &str) -> Block {
    Block::Paragraph(Paragraph::new(text.trim(), BODY).spacing(0.0, 2.0))
}

fn lines_cell(lines: Vec<String>, style: TextStyle) -> Cell {
    Cell::new(lines.into_iter().map(CellLine::plain).collect(), style)
}

/// 見出し行（太字ゴシック・中央揃え）を付けた表
fn table_with_header(col_widths: Vec<f32>, headers: &[&str]) -> Table {
    let mut table = Table::new(col_widths);
    let cells = headers
        .iter()
        .map(|h| Cell::new(vec![CellLine::bold(*h)], CELL_GOTHIC.aligned(Align::Center)))
        .collect();
    table.push_row(cells, Some(TABLE_HEADER_GRAY));
    table
}

/// 全幅の網掛け見出し帯
fn header_bar(text: &str) -> Block {
    let mut table = Table::new(vec![CONTENT_WIDTH_MM]).padding(Padding::HEADER_BAR);
    table.push_row(vec![Cell::text(text, COMPANY_HEADER).with_background(HEADER_BAR_GRAY)], None);
    Block::Table(table)
}

fn build_header<P>(wh: &WorkHistory<P>) -> Vec<Block> {
    vec![
        Block::Paragraph(Paragraph::new(DOCUMENT_TITLE, TITLE).spacing(0.0, 2.0)),
        Block::Paragraph(Paragraph::new(&wh.date, DATE).spacing(0.0, 1.0)),
        Block::Paragraph(Paragraph::new(&wh.name, DATE).spacing(0.0, 3.0)),
    ]
}

fn build_summary<P>(wh: &WorkHistory<P>) -> Vec<Block> {
    if wh.summary.trim().is_empty() {
        return Vec::new();
    }
    vec![section_header("■職務要約"), body(&wh.summary)]
}

fn build_highlights<P>(wh: &WorkHistory<P>) -> Vec<Block> {
    if wh.highlights.is_empty() {
        return Vec::new();
    }
    let mut blocks = vec![section_header("■活かせる経験・知識・技術")];
    for highlight in &wh.highlights {
        blocks.push(Block::Paragraph(
            Paragraph::new(&format!("{}{}", BULLET, highlight), BODY).indent(BULLET_INDENT_MM),
        ));
    }
    blocks.push(Block::Spacer(2.0));
    blocks
}

fn project_table<I>(rows: I) -> Table
where
    I: IntoIterator<Item = [Cell; 4]>,
{
    let mut table = table_with_header(
        vec![COL_PERIOD_MM, COL_CONTENT_MM, COL_ENV_MM, COL_TEAM_MM],
        &PROJECT_TABLE_HEADERS,
    );
    for row in rows {
        table.push_row(row.into(), None);
    }
    table
}

fn project_row<P: ProjectEntry>(project: &P) -> [Cell; 4] {
    [
        lines_cell(period_lines(project.period()), CELL),
        Cell::new(project_content_lines(project), CELL),
        lines_cell(environment_lines(project.environment()), CELL),
        lines_cell(team_lines(project.team_size(), project.role()), CELL),
    ]
}

fn build_company<P: ProjectEntry>(company: &Company<P>) -> Vec<Block> {
    let mut blocks = vec![header_bar(&company_header_text(&company.period, &company.name))];

    let mut info = Table::new(vec![COL_COMPANY_INFO_MM, COL_EMPLOYMENT_MM]);
    info.push_row(
        vec![
            lines_cell(company_info_lines(company), CELL),
            Cell::text(&company.employment_type, CELL),
        ],
        None,
    );
    blocks.push(Block::Table(info));

    if !company.projects.is_empty() {
        blocks.push(Block::Table(project_table(company.projects.iter().map(project_row))));
    }
    blocks
}

fn build_experience<P: ProjectEntry>(wh: &WorkHistory<P>) -> Vec<Block> {
    if wh.experience.is_empty() {
        return Vec::new();
    }
    let mut blocks = vec![section_header("■職務経歴")];
    for company in &wh.experience {
        blocks.extend(build_company(company));
        blocks.push(Block::Spacer(3.0));
    }
    blocks
}

fn build_side_company(company: &SideCompany) -> Vec<Block> {
    let mut blocks = vec![header_bar(&side_company_header_text(
        &company.period,
        &company.name,
        &company.employment_type,
    ))];

    if !company.projects.is_empty() {
        let rows = company.projects.iter().map(|project| {
            [
                lines_cell(period_lines(&project.period), CELL),
                Cell::new(side_project_content_lines(project), CELL),
                lines_cell(environment_lines(&project.environment), CELL),
                lines_cell(team_lines(&project.team_size, &project.role), CELL),
            ]
        });
        blocks.push(Block::Table(project_table(rows)));
    }
    blocks.push(Block::Spacer(3.0));
    blocks
}

fn build_side_experience<P>(wh: &WorkHistory<P>) -> Vec<Block> {
    if wh.side_experience.is_empty() {
        return Vec::new();
    }
    let mut blocks = vec![section_header("■副業・その他経歴")];
    for company in &wh.side_experience {
        blocks.extend(build_side_company(company));
    }
    blocks
}

fn build_technical_skills<P>(wh: &WorkHistory<P>) -> Vec<Block> {
    if wh.technical_skills.is_empty() {
        return Vec::new();
    }

    let mut table = table_with_header(
        vec![COL_SKILL_CAT_MM, COL_SKILL_NAME_MM, COL_SKILL_PERIOD_MM, COL_SKILL_LEVEL_MM],
        &SKILL_TABLE_HEADERS,
    );
    let (rows, spans) = skill_rows(&wh.technical_skills);
    for row in rows {
        table.push_row(
            vec![
                Cell::text(&row.category, CELL_GOTHIC),
                Cell::text(&row.name, CELL),
                Cell::text(&row.period, CELL),
                Cell::text(&row.level, CELL),
            ],
            None,
        );
    }
    // 見出し行の分だけずらす
    for span in spans {
        table.push_span(RowSpan {
            column: span.column,
            first_row: span.first_row + 1,
            last_row: span.last_row + 1,
        });
    }

    vec![section_header("■テクニカルスキル"), Block::Table(table), Block::Spacer(2.0)]
}

fn build_qualifications<P>(wh: &WorkHistory<P>) -> Vec<Block> {
    if wh.qualifications.is_empty() {
        return Vec::new();
    }
    let mut table = Table::new(vec![COL_QUAL_NAME_MM, COL_QUAL_DATE_MM]);
    for qualification in &wh.qualifications {
        table.push_row(
            vec![Cell::text(&qualification.name, CELL), Cell::text(&qualification.date, CELL)],
            None,
        );
    }
    vec![section_header("■資格"), Block::Table(table), Block::Spacer(2.0)]
}

fn build_self_pr<P>(wh: &WorkHistory<P>) -> Vec<Block> {
    if wh.self_pr.is_empty() {
        return Vec::new();
    }
    let mut blocks = vec![section_header("■自己PR")];
    for section in &wh.self_pr {
        blocks.push(section_header(&format!("＜{}＞", section.title)));
        blocks.push(body(&section.content));
    }
    blocks
}

fn build_blocks_for<P: ProjectEntry>(wh: &WorkHistory<P>) -> Vec<Block> {
    let mut blocks = Vec::new();
    blocks.extend(build_header(wh));
    blocks.extend(build_summary(wh));
    blocks.extend(build_highlights(wh));
    blocks.extend(build_experience(wh));
    blocks.extend(build_side_experience(wh));
    blocks.extend(build_technical_skills(wh));
    blocks.extend(build_qualifications(wh));
    blocks.extend(build_self_pr(wh));
    blocks.push(Block::Paragraph(Paragraph::new("以上", DATE).spacing(4.0, 0.0)));
    blocks
}

/// 文書全体のブロック列
pub fn build_blocks(doc: &WorkHistoryDocument) -> Vec<Block> {
    match doc {
        WorkHistoryDocument::Standard(wh) => build_blocks_for(wh),
        WorkHistoryDocument::Star(wh) => build_blocks_for(wh),
    }
}

/// 割り付け前の文書
pub fn build_document(doc: &WorkHistoryDocument, split_rows: bool) -> FlowDocument {
    let mut flow = FlowDocument::new("職務経歴書").split_rows(split_rows);
    flow.extend(build_blocks(doc));
    flow
}

/// 職務経歴書PDFを生成する
pub fn generate_pdf(
    doc: &WorkHistoryDocument,
    output_path: &Path,
    fonts: &FontContext,
    split_rows: bool,
) -> Result<PageCount> {
    let laid_out = build_document(doc, split_rows).layout(fonts);
    let total = laid_out.page_count();
    tracing::debug!("職務経歴書: {}ページ", total.0);

    let pdf = laid_out.render(total, fonts)?;
    save_pdf(pdf, output_path)?;
    Ok(total)
}
