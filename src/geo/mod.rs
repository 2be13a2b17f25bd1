//! 地区解析 - 把 `"; "` 分隔的地名列表解析成地图点
//!
//! 单个地名解析失败只会得到一个缺坐标的点，不会中断整个列表。

use async_trait::async_trait;

use crate::types::{Coordinates, GeoPoint};

mod nominatim;

pub use nominatim::NominatimGeocoder;

/// 地名列表分隔符
pub const REGION_DELIMITER: &str = "; ";

/// 地理编码失败的原因
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeocodeFailure {
    #[error("place not found: {0:?}")]
    NotFound(String),
    #[error("geocoding service error: {0}")]
    Service(String),
    #[error("malformed geocoding response: {0}")]
    Malformed(String),
}

/// 外部地理编码服务：地名 -> 坐标
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> Result<Coordinates, GeocodeFailure>;
}

/// 按输入顺序拆分地名，空输入得到一个空地名
pub fn split_region(region_field: &str) -> Vec<&str> {
    region_field.split(REGION_DELIMITER).collect()
}

/// 地区解析器
pub struct RegionResolver<G> {
    geocoder: G,
    weight: u32,
}

impl<G: Geocoder> RegionResolver<G> {
    pub fn new(geocoder: G, weight: u32) -> Self {
        Self { geocoder, weight }
    }

    /// 解析单个地名，失败以值的形式返回
    pub async fn locate(&self, place: &str) -> Result<GeoPoint, GeocodeFailure> {
        let coordinates = self.geocoder.geocode(place).await?;
        Ok(GeoPoint::located(coordinates, self.weight))
    }

    /// 逐个解析地名。不去重、不缓存、不重试，输出顺序与输入一致。
    pub async fn resolve(&self, region_field: &str) -> Vec<GeoPoint> {
        let places = split_region(region_field);
        let mut points = Vec::with_capacity(places.len());

        for place in places {
            match self.locate(place).await {
                Ok(point) => points.push(point),
                Err(failure) => {
                    tracing::debug!("Geocoding skipped - place={:?}, reason={}", place, failure);
                    points.push(GeoPoint::unresolved(self.weight));
                }
            }
        }

        let resolved = points.iter().filter(|p| p.is_resolved()).count();
        tracing::debug!(
            "Region resolved - places={}, located={}",
            points.len(),
            resolved
        );
        points
    }
}
