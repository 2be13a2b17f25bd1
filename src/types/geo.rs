use serde::{Deserialize, Serialize};

/// 地图上的默认点大小
pub const DEFAULT_POINT_WEIGHT: u32 = 100;

/// 地理编码成功时的坐标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// 一个用于展示的地理点。坐标缺失时仍然带有 weight。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub weight: u32,
}

impl GeoPoint {
    pub fn located(coordinates: Coordinates, weight: u32) -> Self {
        Self {
            latitude: Some(coordinates.latitude),
            longitude: Some(coordinates.longitude),
            weight,
        }
    }

    pub fn unresolved(weight: u32) -> Self {
        Self {
            latitude: None,
            longitude: None,
            weight,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}
