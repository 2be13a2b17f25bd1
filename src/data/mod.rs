//! 数据集加载 - 把两张 CSV 表读成只读的记录集

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::config::DataConfig;
use crate::types::{NewsDetailRecord, OutbreakRecord};

/// 主数据集的原始行，列名沿用上游导出的表头
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutbreakRow {
    name: String,
    #[serde(rename = "Country")]
    country: String,
    cases: String,
    description: String,
    sentiment: String,
    outbreak: String,
    deaths: String,
    region: String,
}

impl From<OutbreakRow> for OutbreakRecord {
    fn from(row: OutbreakRow) -> Self {
        OutbreakRecord {
            outbreak_flag: parse_flag(&row.outbreak),
            name: row.name,
            country: row.country,
            region: row.region,
            cases: row.cases,
            deaths: row.deaths,
            sentiment: row.sentiment,
            description: row.description,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct NewsDetailRow {
    outbreak_name: String,
    negative_sentiment: String,
    impacts: String,
}

impl From<NewsDetailRow> for NewsDetailRecord {
    fn from(row: NewsDetailRow) -> Self {
        NewsDetailRecord {
            outbreak_name: row.outbreak_name,
            negative_sentiment_pct: row.negative_sentiment,
            impacts: parse_impacts(&row.impacts),
        }
    }
}

/// 预加载的只读数据集
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    outbreaks: Vec<OutbreakRecord>,
    active: Vec<OutbreakRecord>,
    details: Vec<NewsDetailRecord>,
}

impl Dataset {
    pub fn new(outbreaks: Vec<OutbreakRecord>, details: Vec<NewsDetailRecord>) -> Self {
        let active = outbreaks
            .iter()
            .filter(|record| record.outbreak_flag)
            .cloned()
            .collect();
        Self {
            outbreaks,
            active,
            details,
        }
    }

    /// 按配置路径加载两张表
    pub fn load(config: &DataConfig) -> Result<Self> {
        let outbreaks = load_outbreaks(&config.outbreaks_path)?;
        let details = load_details(&config.details_path)?;
        let dataset = Self::new(outbreaks, details);
        tracing::info!(
            "Dataset loaded - outbreaks={}, active={}, details={}",
            dataset.outbreaks.len(),
            dataset.active.len(),
            dataset.details.len()
        );
        Ok(dataset)
    }

    pub fn outbreaks(&self) -> &[OutbreakRecord] {
        &self.outbreaks
    }

    /// 仅 `outbreak == TRUE` 的行
    pub fn active_outbreaks(&self) -> &[OutbreakRecord] {
        &self.active
    }

    pub fn details(&self) -> &[NewsDetailRecord] {
        &self.details
    }

    /// 历史对比提示词中附带的新闻数据
    pub fn news_context(&self) -> Result<String> {
        serde_json::to_string(&self.active).context("Failed to serialize news context")
    }
}

pub fn load_outbreaks(path: &Path) -> Result<Vec<OutbreakRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open outbreak table: {}", path.display()))?;
    read_outbreaks(file).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn load_details(path: &Path) -> Result<Vec<NewsDetailRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open news detail table: {}", path.display()))?;
    read_details(file).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn read_outbreaks<R: Read>(reader: R) -> Result<Vec<OutbreakRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in rdr.deserialize::<OutbreakRow>() {
        records.push(result?.into());
    }
    Ok(records)
}

pub fn read_details<R: Read>(reader: R) -> Result<Vec<NewsDetailRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in rdr.deserialize::<NewsDetailRow>() {
        records.push(result?.into());
    }
    Ok(records)
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// 解析 impacts 单元格。`['a', 'b']` 形式的列表按元素拆分，其余文本视为单个元素。
pub fn parse_impacts(cell: &str) -> Vec<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return vec![trimmed.to_string()];
    };

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in inner.chars() {
        match quote {
            Some(q) => {
                if escaped {
                    current.push(ch);
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                } else {
                    current.push(ch);
                }
            }
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                ',' => push_item(&mut items, &mut current),
                _ => current.push(ch),
            },
        }
    }
    push_item(&mut items, &mut current);
    items
}

fn push_item(items: &mut Vec<String>, current: &mut String) {
    let item = current.trim();
    if !item.is_empty() {
        items.push(item.to_string());
    }
    current.clear();
}
