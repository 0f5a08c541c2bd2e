//! 職務経歴書の型定義
//!
//! プロジェクト内容の表現は2種類:
//! - StandardProject: 概要・担当フェーズ・業務内容・実績
//! - StarProject: STAR法（状況・課題・行動・結果）
//!
//! どちらの形式かは読み込み時に明示的に選択し、1つの文書内で混在させない。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// プロジェクト内容の表示形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentFormat {
    #[default]
    Standard,
    Star,
}

impl FromStr for ContentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(ContentFormat::Standard),
            "star" => Ok(ContentFormat::Star),
            _ => Err(format!("Unknown format: {}. Use standard or star", s)),
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentFormat::Standard => write!(f, "standard"),
            ContentFormat::Star => write!(f, "star"),
        }
    }
}

/// 開発環境
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Environment {
    pub languages: Vec<String>,
    pub os: Vec<String>,
    pub db: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
    pub other: Vec<String>,
}

impl Environment {
    /// 表示ラベル付きのカテゴリ一覧（入力順を保つ）
    pub fn categories(&self) -> [(&'static str, &[String]); 6] {
        [
            ("言語", &self.languages),
            ("OS", &self.os),
            ("DB", &self.db),
            ("FW", &self.frameworks),
            ("ツール", &self.tools),
            ("その他", &self.other),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.categories().iter().all(|(_, items)| items.is_empty())
    }
}

/// 標準パターンのプロジェクト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandardProject {
    pub period: String,
    #[serde(default)]
    pub industry: String,
    pub name: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub team_size: String,
    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub phases: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// STAR法パターンのプロジェクト（内容4項目は必須）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StarProject {
    pub period: String,
    #[serde(default)]
    pub industry: String,
    pub name: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub team_size: String,
    #[serde(default)]
    pub role: String,

    pub situation: String,
    pub task: String,
    pub action: Vec<String>,
    pub result: Vec<String>,
}

/// プロジェクト内容欄の1セクション
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSection<'a> {
    /// 見出し + 文章（改行を保持）
    Prose { label: &'static str, text: &'a str },
    /// 見出し + 箇条書き
    Bullets { label: &'static str, items: &'a [String] },
}

/// 両形式のプロジェクトに共通する読み取りインターフェース
///
/// レンダラはこのトレイト経由で形式を意識せずに描画する。
pub trait ProjectEntry {
    fn period(&self) -> &str;
    fn industry(&self) -> &str;
    fn name(&self) -> &str;
    fn environment(&self) -> &Environment;
    fn team_size(&self) -> &str;
    fn role(&self) -> &str;
    /// 内容欄に並べるセクション（空のものは除外済み）
    fn content_sections(&self) -> Vec<ContentSection<'_>>;
}

impl ProjectEntry for StandardProject {
    fn period(&self) -> &str {
        &self.period
    }
    fn industry(&self) -> &str {
        &self.industry
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn environment(&self) -> &Environment {
        &self.environment
    }
    fn team_size(&self) -> &str {
        &self.team_size
    }
    fn role(&self) -> &str {
        &self.role
    }

    fn content_sections(&self) -> Vec<ContentSection<'_>> {
        let mut sections = Vec::new();
        if !self.overview.trim().is_empty() {
            sections.push(ContentSection::Prose { label: "プロジェクト概要", text: self.overview.trim() });
        }
        if !self.phases.trim().is_empty() {
            sections.push(ContentSection::Prose { label: "担当フェーズ", text: self.phases.trim() });
        }
        if !self.responsibilities.is_empty() {
            sections.push(ContentSection::Bullets { label: "業務内容", items: &self.responsibilities });
        }
        if !self.achievements.is_empty() {
            sections.push(ContentSection::Bullets { label: "実績・取り組み", items: &self.achievements });
        }
        sections
    }
}

impl ProjectEntry for StarProject {
    fn period(&self) -> &str {
        &self.period
    }
    fn industry(&self) -> &str {
        &self.industry
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn environment(&self) -> &Environment {
        &self.environment
    }
    fn team_size(&self) -> &str {
        &self.team_size
    }
    fn role(&self) -> &str {
        &self.role
    }

    fn content_sections(&self) -> Vec<ContentSection<'_>> {
        let mut sections = Vec::new();
        if !self.situation.trim().is_empty() {
            sections.push(ContentSection::Prose { label: "状況（Situation）", text: self.situation.trim() });
        }
        if !self.task.trim().is_empty() {
            sections.push(ContentSection::Prose { label: "課題（Task）", text: self.task.trim() });
        }
        if !self.action.is_empty() {
            sections.push(ContentSection::Bullets { label: "行動（Action）", items: &self.action });
        }
        if !self.result.is_empty() {
            sections.push(ContentSection::Bullets { label: "結果（Result）", items: &self.result });
        }
        sections
    }
}

/// 会社経歴
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "P: Deserialize<'de>"))]
pub struct Company<P> {
    #[serde(rename = "company")]
    pub name: String,
    pub period: String,
    #[serde(default)]
    pub business: String,
    #[serde(default)]
    pub capital: String,
    #[serde(default)]
    pub revenue: String,
    #[serde(default)]
    pub employees: String,
    #[serde(default)]
    pub listing: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default = "Vec::new")]
    pub projects: Vec<P>,
}

/// 副業・その他経歴のプロジェクト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideProject {
    pub period: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub team_size: String,
    #[serde(default)]
    pub role: String,
}

/// 副業・その他経歴の会社（財務情報なし）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideCompany {
    #[serde(rename = "company")]
    pub name: String,
    pub period: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub projects: Vec<SideProject>,
}

/// スキル項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillItem {
    pub name: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub level: String,
}

/// スキルカテゴリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillCategory {
    pub category: String,
    pub items: Vec<SkillItem>,
}

/// 資格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Qualification {
    pub name: String,
    #[serde(default)]
    pub date: String,
}

/// 自己PRセクション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelfPRSection {
    pub title: String,
    pub content: String,
}

/// 職務経歴書全体（プロジェクト型でパラメータ化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "P: Deserialize<'de>"))]
pub struct WorkHistory<P> {
    pub date: String,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default = "Vec::new")]
    pub experience: Vec<Company<P>>,
    #[serde(default)]
    pub side_experience: Vec<SideCompany>,
    #[serde(default)]
    pub technical_skills: Vec<SkillCategory>,
    #[serde(default)]
    pub qualifications: Vec<Qualification>,
    #[serde(default)]
    pub self_pr: Vec<SelfPRSection>,
}

pub type StandardWorkHistory = WorkHistory<StandardProject>;
pub type StarWorkHistory = WorkHistory<StarProject>;

/// 形式タグ付きの職務経歴書
#[derive(Debug, Clone, PartialEq)]
pub enum WorkHistoryDocument {
    Standard(StandardWorkHistory),
    Star(StarWorkHistory),
}

impl WorkHistoryDocument {
    pub fn format(&self) -> ContentFormat {
        match self {
            WorkHistoryDocument::Standard(_) => ContentFormat::Standard,
            WorkHistoryDocument::Star(_) => ContentFormat::Star,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            WorkHistoryDocument::Standard(doc) => &doc.name,
            WorkHistoryDocument::Star(doc) => &doc.name,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            WorkHistoryDocument::Standard(doc) => &doc.date,
            WorkHistoryDocument::Star(doc) => &doc.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_work_history() {
        let yaml = "date: 2024年1月1日現在\nname: 山田 太郎\n";
        let wh: StandardWorkHistory = serde_yaml::from_str(yaml).expect("デシリアライズ失敗");
        assert_eq!(wh.date, "2024年1月1日現在");
        assert_eq!(wh.name, "山田 太郎");
        assert_eq!(wh.summary, "");
        assert!(wh.highlights.is_empty());
        assert!(wh.experience.is_empty());
        assert!(wh.side_experience.is_empty());
        assert!(wh.technical_skills.is_empty());
        assert!(wh.qualifications.is_empty());
        assert!(wh.self_pr.is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let result = serde_yaml::from_str::<StandardWorkHistory>("summary: だけ\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "date: 2024年\nname: 山田\nunknown: NG\n";
        let err = serde_yaml::from_str::<StandardWorkHistory>(yaml).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn test_star_project_requires_content() {
        let yaml = "period: 2020年\nname: テスト\n";
        assert!(serde_yaml::from_str::<StarProject>(yaml).is_err());
        assert!(serde_yaml::from_str::<StandardProject>(yaml).is_ok());
    }

    #[test]
    fn test_standard_project_rejects_star_fields() {
        let yaml = "period: 2020年\nname: テスト\nsituation: 老朽化\n";
        assert!(serde_yaml::from_str::<StandardProject>(yaml).is_err());
    }

    #[test]
    fn test_environment_categories_order() {
        let env = Environment {
            languages: vec!["Go".into(), "Python".into()],
            tools: vec!["Docker".into()],
            ..Default::default()
        };
        let labels: Vec<&str> = env.categories().iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, ["言語", "OS", "DB", "FW", "ツール", "その他"]);
        assert_eq!(env.categories()[0].1, ["Go".to_string(), "Python".to_string()]);
        assert!(!env.is_empty());
        assert!(Environment::default().is_empty());
    }

    #[test]
    fn test_standard_sections_skip_empty() {
        let project = StandardProject {
            period: "2020年".into(),
            industry: String::new(),
            name: "基幹刷新".into(),
            environment: Environment::default(),
            team_size: String::new(),
            role: String::new(),
            overview: "  概要テキスト\n".into(),
            phases: String::new(),
            responsibilities: vec![],
            achievements: vec!["障害ゼロ".into()],
        };
        let sections = project.content_sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0], ContentSection::Prose { label: "プロジェクト概要", text: "概要テキスト" });
        assert!(matches!(sections[1], ContentSection::Bullets { label: "実績・取り組み", .. }));
    }

    #[test]
    fn test_star_sections_order() {
        let project = StarProject {
            period: "2020年".into(),
            industry: "金融".into(),
            name: "移行".into(),
            environment: Environment::default(),
            team_size: String::new(),
            role: String::new(),
            situation: "老朽化".into(),
            task: "移行完了".into(),
            action: vec!["要件定義".into()],
            result: vec!["予定通りリリース".into()],
        };
        let labels: Vec<&str> = project
            .content_sections()
            .iter()
            .map(|s| match s {
                ContentSection::Prose { label, .. } | ContentSection::Bullets { label, .. } => *label,
            })
            .collect();
        assert_eq!(labels, ["状況（Situation）", "課題（Task）", "行動（Action）", "結果（Result）"]);
    }

    #[test]
    fn test_content_format_from_str() {
        assert_eq!("standard".parse::<ContentFormat>(), Ok(ContentFormat::Standard));
        assert_eq!("STAR".parse::<ContentFormat>(), Ok(ContentFormat::Star));
        assert!("narrative".parse::<ContentFormat>().is_err());
        assert_eq!(ContentFormat::Star.to_string(), "star");
    }
}
