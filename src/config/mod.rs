use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::DEFAULT_POINT_WEIGHT;

/// 默认配置文件名，位于当前工作目录
pub const DEFAULT_CONFIG_FILE: &str = "briefing.toml";

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// 数据源配置
    pub data: DataConfig,

    /// 助手服务配置
    pub assistant: AssistantConfig,

    /// 地理编码配置
    pub geocoder: GeocoderConfig,

    /// 仪表盘配置
    pub dashboard: DashboardConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// 数据源配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    /// 主数据集（疫情话题）
    pub outbreaks_path: PathBuf,

    /// 新闻详情数据集
    pub details_path: PathBuf,
}

/// 助手服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AssistantConfig {
    /// API KEY
    pub api_key: String,

    /// API基地址
    pub api_base_url: String,

    /// 生成周报与国家聊天使用的助手
    pub briefing_assistant_id: String,

    /// 历史对比与对比聊天使用的助手
    pub comparison_assistant_id: String,

    /// 轮询间隔（毫秒）
    pub poll_interval_ms: u64,

    /// 单次 run 最长等待时间（秒）
    pub max_wait_seconds: u64,

    /// 单个 HTTP 请求超时时间（秒）
    pub timeout_seconds: u64,

    /// 轮询请求的重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,
}

/// 地理编码配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
    /// 服务基地址
    pub api_base_url: String,

    /// 请求携带的 User-Agent
    pub user_agent: String,

    /// 地图点大小
    pub point_weight: u32,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 仪表盘配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    /// 标题
    pub title: String,

    /// 周报提示词
    pub country_prompt: String,

    /// 每日新闻中展示的话题
    pub topics: Vec<String>,

    /// 提取后的展示延迟（毫秒）
    pub extract_delay_ms: u64,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 显式路径优先，其次当前目录下的默认文件，都没有时使用默认值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_config_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE);

        if default_config_path.exists() {
            Self::from_file(&default_config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// 在发起任何远程调用前检查必需的凭据与助手标识
    pub fn validate(&self) -> Result<()> {
        if self.assistant.api_key.trim().is_empty() {
            bail!("Missing assistant API key (set `assistant.api_key`, --api-key or OPENAI_API_KEY)");
        }
        if self.assistant.briefing_assistant_id.trim().is_empty() {
            bail!("Missing briefing assistant id (set `assistant.briefing_assistant_id` or BRIEFING_ASSISTANT_ID)");
        }
        if self.assistant.comparison_assistant_id.trim().is_empty() {
            bail!("Missing comparison assistant id (set `assistant.comparison_assistant_id` or COMPARISON_ASSISTANT_ID)");
        }
        if self.assistant.poll_interval_ms == 0 {
            bail!("`assistant.poll_interval_ms` must be greater than zero");
        }
        Ok(())
    }
}

impl AssistantConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_seconds)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            outbreaks_path: PathBuf::from("news_output.csv"),
            details_path: PathBuf::from("llm_news_detail.csv"),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.openai.com/v1"),
            briefing_assistant_id: std::env::var("BRIEFING_ASSISTANT_ID").unwrap_or_default(),
            comparison_assistant_id: std::env::var("COMPARISON_ASSISTANT_ID").unwrap_or_default(),
            poll_interval_ms: 2000,
            max_wait_seconds: 300,
            timeout_seconds: 60,
            retry_attempts: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::from("https://nominatim.openstreetmap.org"),
            user_agent: String::from("outbreak-brief"),
            point_weight: DEFAULT_POINT_WEIGHT,
            timeout_seconds: 10,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: String::from("Global Influenza Dashboard"),
            country_prompt: String::from(
                "Produce a very concise summary (using a maximum of 4 bullet points and one short paragraph) of trends in influenza using the provided data, there should be a bullet discussing the situation in key countries such as Australia and the USA, with the summary covering the whole world. Do not include information or trends about other diseases.",
            ),
            topics: vec!["Avian influenza".to_string(), "swine flu".to_string()],
            extract_delay_ms: 5000,
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
