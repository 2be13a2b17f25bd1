use serde::{Deserialize, Serialize};

/// 主数据集中的一行：一个疫情话题
///
/// `cases`、`deaths`、`sentiment` 保留原始文本，在查询时才转换为数值，
/// 这样损坏的数据会在查询时以 `ParseError` 暴露出来。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutbreakRecord {
    pub name: String,
    pub country: String,
    /// 以 `"; "` 分隔的地名列表
    pub region: String,
    pub cases: String,
    pub deaths: String,
    pub sentiment: String,
    pub outbreak_flag: bool,
    pub description: String,
}

/// 新闻详情数据集中的一行，按 `outbreak_name` 独立关联
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDetailRecord {
    pub outbreak_name: String,
    /// 负面报道占比（原始文本）
    pub negative_sentiment_pct: String,
    pub impacts: Vec<String>,
}

/// 某个话题的指标汇总
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsBundle {
    pub name: String,
    pub country: String,
    pub cases: i64,
    pub deaths: i64,
    pub description: String,
    pub sentiment: Option<f64>,
    pub outbreak: bool,
    pub region: String,
}

impl MetricsBundle {
    /// 未命中时返回的空汇总，仅保留查询的话题名
    pub fn empty(topic: &str) -> Self {
        Self {
            name: topic.to_string(),
            ..Default::default()
        }
    }
}
