//! 指标聚合 - 把话题名解析成展示用的指标、描述、情绪与影响
//!
//! 主表未命中时返回空汇总（软未命中）；数值字段损坏则返回 `ParseError`。

use crate::error::{BriefingError, Result};
use crate::geo::{Geocoder, RegionResolver};
use crate::types::{GeoPoint, MetricsBundle, NewsDetailRecord, OutbreakRecord};

/// impacts 多个条目拼接时使用的分隔符
pub const IMPACT_SEPARATOR: &str = "; ";

/// 指标聚合器。只读取传入的记录集，不持有状态。
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// 取主表中第一条 `name == topic` 的记录（区分大小写）
    pub fn get_metrics(topic: &str, primary: &[OutbreakRecord]) -> Result<MetricsBundle> {
        let Some(record) = primary.iter().find(|record| record.name == topic) else {
            tracing::debug!("Topic not found in primary dataset - topic={:?}", topic);
            return Ok(MetricsBundle::empty(topic));
        };

        Ok(MetricsBundle {
            name: topic.to_string(),
            country: record.country.clone(),
            cases: parse_count("cases", &record.cases)?,
            deaths: parse_count("deaths", &record.deaths)?,
            description: record.description.clone(),
            sentiment: parse_optional_number("sentiment", &record.sentiment)?,
            outbreak: record.outbreak_flag,
            region: record.region.clone(),
        })
    }

    pub fn get_description(topic: &str, primary: &[OutbreakRecord]) -> Result<String> {
        Ok(Self::get_metrics(topic, primary)?.description)
    }

    /// 解析话题的报道地点。未知话题解析空地区字段，得到一个缺坐标的点。
    pub async fn get_region<G: Geocoder>(
        topic: &str,
        primary: &[OutbreakRecord],
        resolver: &RegionResolver<G>,
    ) -> Result<Vec<GeoPoint>> {
        let bundle = Self::get_metrics(topic, primary)?;
        Ok(resolver.resolve(&bundle.region).await)
    }

    /// 第一条匹配详情记录的影响描述；没有匹配记录时为明确的错误
    pub fn get_impact(topic: &str, detail: &[NewsDetailRecord]) -> Result<String> {
        detail
            .iter()
            .find(|record| record.outbreak_name == topic)
            .map(|record| record.impacts.join(IMPACT_SEPARATOR))
            .ok_or_else(|| BriefingError::NoImpactData {
                topic: topic.to_string(),
            })
    }

    /// 负面报道百分比，截断为整数，不做 [0, 100] 裁剪
    pub fn get_negative_sentiment(topic: &str, detail: &[NewsDetailRecord]) -> Result<i64> {
        let record = detail
            .iter()
            .find(|record| record.outbreak_name == topic)
            .ok_or_else(|| BriefingError::NoMatch {
                topic: topic.to_string(),
            })?;
        parse_count("negative_sentiment", &record.negative_sentiment_pct)
    }
}

/// 先按浮点解析再截断为整数
fn parse_count(field: &'static str, value: &str) -> Result<i64> {
    let number = parse_number(field, value)?;
    Ok(number.trunc() as i64)
}

fn parse_optional_number(field: &'static str, value: &str) -> Result<Option<f64>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_number(field, value).map(Some)
}

fn parse_number(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| BriefingError::Parse {
            field,
            value: value.to_string(),
        })
}
