//! 履歴書（JIS標準様式）の型定義

use serde::{Deserialize, Deserializer, Serialize};

/// 学歴・職歴・免許資格の1行
///
/// 年・月は `2020` のような数値で書かれても文字列として受け付ける。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryEntry {
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub month: String,
    pub value: String,
}

impl HistoryEntry {
    /// 見出し行（"学　歴" など）を作る
    pub fn header(label: &str) -> Self {
        Self {
            year: String::new(),
            month: String::new(),
            value: label.to_string(),
        }
    }

    pub fn is_header(&self) -> bool {
        self.year.is_empty() && self.month.is_empty()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

/// 住所ブロック（現住所・連絡先で共通の表示用ビュー）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressBlock<'a> {
    pub kana: &'a str,
    pub address: &'a str,
    pub zip: &'a str,
    pub tel: &'a str,
    pub fax: &'a str,
}

impl AddressBlock<'_> {
    pub fn is_empty(&self) -> bool {
        [self.kana, self.address, self.zip, self.tel, self.fax]
            .iter()
            .all(|s| s.is_empty())
    }
}

/// 履歴書データ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResumeDocument {
    // 基本情報（必須）
    pub date: String,
    pub name_kana: String,
    pub name: String,
    pub birth_day: String,

    // 基本情報（任意）
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub cell_phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub photo: String,

    // 現住所
    #[serde(default)]
    pub address_kana: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub address_zip: String,
    #[serde(default)]
    pub tel: String,
    #[serde(default)]
    pub fax: String,

    // 連絡先
    #[serde(default)]
    pub address_kana2: String,
    #[serde(default)]
    pub address2: String,
    #[serde(default)]
    pub address_zip2: String,
    #[serde(default)]
    pub tel2: String,
    #[serde(default)]
    pub fax2: String,

    #[serde(default)]
    pub education: Vec<HistoryEntry>,
    #[serde(default)]
    pub experience: Vec<HistoryEntry>,
    #[serde(default)]
    pub licences: Vec<HistoryEntry>,

    // 通勤・扶養
    #[serde(default)]
    pub commuting_time: String,
    #[serde(default)]
    pub dependents: String,
    #[serde(default)]
    pub spouse: String,
    #[serde(default)]
    pub supporting_spouse: String,

    // 自由記述
    #[serde(default)]
    pub hobby: String,
    #[serde(default)]
    pub motivation: String,
    #[serde(default)]
    pub request: String,
}

impl ResumeDocument {
    pub fn current_address(&self) -> AddressBlock<'_> {
        AddressBlock {
            kana: &self.address_kana,
            address: &self.address,
            zip: &self.address_zip,
            tel: &self.tel,
            fax: &self.fax,
        }
    }

    pub fn contact_address(&self) -> AddressBlock<'_> {
        AddressBlock {
            kana: &self.address_kana2,
            address: &self.address2,
            zip: &self.address_zip2,
            tel: &self.tel2,
            fax: &self.fax2,
        }
    }
}
