//! 職務経歴書のセル内容組み立て（描画非依存）
//!
//! 各関数はモデルから「セルに並べる行」を作るだけで、折り返しや座標計算は行わない。

use crate::work_history::{
    Company, ContentSection, Environment, ProjectEntry, SideProject, SkillCategory,
};

/// セル内の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellLine {
    pub text: String,
    pub bold: bool,
}

impl CellLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), bold: false }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self { text: text.into(), bold: true }
    }

    /// セクション区切りの空行
    pub fn blank() -> Self {
        Self::plain("")
    }
}

/// 期間の区切り文字
pub const PERIOD_SEPARATOR: char = '～';

/// 箇条書きの行頭記号
pub const BULLET: &str = "・";

/// 期間を「開始 / ～ / 終了」の3行に分ける
///
/// 区切りがなければ1行のまま返す。最初の区切りでのみ分割する。
pub fn period_lines(period: &str) -> Vec<String> {
    match period.split_once(PERIOD_SEPARATOR) {
        Some((start, end)) => vec![
            start.to_string(),
            PERIOD_SEPARATOR.to_string(),
            end.to_string(),
        ],
        None => vec![period.to_string()],
    }
}

/// 開発環境セル: 「◆ ラベル」の後に1項目1行
pub fn environment_lines(env: &Environment) -> Vec<String> {
    let mut lines = Vec::new();
    for (label, items) in env.categories() {
        if items.is_empty() {
            continue;
        }
        lines.push(format!("◆ {}", label));
        lines.extend(items.iter().cloned());
    }
    lines
}

/// 規模セル: チーム規模 → 役割
pub fn team_lines(team_size: &str, role: &str) -> Vec<String> {
    [team_size, role]
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// 「業種 / 案件名」（業種が空なら案件名のみ）
pub fn project_heading(industry: &str, name: &str) -> String {
    if industry.is_empty() {
        name.to_string()
    } else {
        format!("{} / {}", industry, name)
    }
}

/// 内容セル: 太字の見出し + 空行区切りのセクション
pub fn project_content_lines<P: ProjectEntry + ?Sized>(project: &P) -> Vec<CellLine> {
    let mut lines = vec![CellLine::bold(project_heading(project.industry(), project.name()))];

    for section in project.content_sections() {
        lines.push(CellLine::blank());
        match section {
            ContentSection::Prose { label, text } => {
                lines.push(CellLine::plain(format!("◆ {}", label)));
                lines.extend(text.lines().map(CellLine::plain));
            }
            ContentSection::Bullets { label, items } => {
                lines.push(CellLine::plain(format!("◆ {}", label)));
                lines.extend(items.iter().map(|item| CellLine::plain(format!("{}{}", BULLET, item))));
            }
        }
    }
    lines
}

/// 副業プロジェクトの内容セル: 太字の案件名 + 説明
pub fn side_project_content_lines(project: &SideProject) -> Vec<CellLine> {
    let mut lines = vec![CellLine::bold(project.name.clone())];
    let description = project.description.trim();
    if !description.is_empty() {
        lines.extend(description.lines().map(CellLine::plain));
    }
    lines
}

/// 会社見出し「期間　会社名」
pub fn company_header_text(period: &str, company: &str) -> String {
    format!("{}　{}", period, company)
}

/// 副業の会社見出し（雇用形態があれば括弧書きで付加）
pub fn side_company_header_text(period: &str, company: &str, employment_type: &str) -> String {
    let mut text = company_header_text(period, company);
    if !employment_type.is_empty() {
        text.push_str(&format!("（{}）", employment_type));
    }
    text
}

/// 会社情報セル: 事業内容 / 資本金・売上高 / 従業員数・上場
pub fn company_info_lines<P>(company: &Company<P>) -> Vec<String> {
    let mut lines = Vec::new();
    if !company.business.is_empty() {
        lines.push(format!("事業内容：{}", company.business));
    }

    let finance = join_labeled(&[("資本金", &company.capital), ("売上高", &company.revenue)]);
    if !finance.is_empty() {
        lines.push(finance);
    }

    let size = join_labeled(&[("従業員数", &company.employees), ("上場", &company.listing)]);
    if !size.is_empty() {
        lines.push(size);
    }
    lines
}

fn join_labeled(pairs: &[(&str, &String)]) -> String {
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{}：{}", label, value))
        .collect::<Vec<_>>()
        .join("　")
}

/// スキル表の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRow {
    pub category: String,
    pub name: String,
    pub period: String,
    pub level: String,
}

/// 縦方向のセル結合（データ行の添字、両端含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub column: usize,
    pub first_row: usize,
    pub last_row: usize,
}

impl RowSpan {
    pub fn row_count(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    pub fn contains(&self, row: usize) -> bool {
        (self.first_row..=self.last_row).contains(&row)
    }
}

/// スキル表のデータ行と結合範囲
///
/// 2項目以上のカテゴリだけが種類列を結合する。
pub fn skill_rows(categories: &[SkillCategory]) -> (Vec<SkillRow>, Vec<RowSpan>) {
    let mut rows = Vec::new();
    let mut spans = Vec::new();

    for category in categories {
        let first_row = rows.len();
        for item in &category.items {
            rows.push(SkillRow {
                category: category.category.clone(),
                name: item.name.clone(),
                period: item.period.clone(),
                level: item.level.clone(),
            });
        }
        if category.items.len() > 1 {
            spans.push(RowSpan { column: 0, first_row, last_row: rows.len() - 1 });
        }
    }
    (rows, spans)
}

/// 見出し行を持つ表の列見出し
pub const PROJECT_TABLE_HEADERS: [&str; 4] = ["期間", "内容", "開発環境", "規模"];
pub const SKILL_TABLE_HEADERS: [&str; 4] = ["種類", "名称", "使用期間", "レベル"];
