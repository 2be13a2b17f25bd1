use crate::config::Config;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// outbreak-brief - 终端流感仪表盘
#[derive(Parser, Debug)]
#[command(name = "outbreak-brief")]
#[command(
    about = "Terminal influenza dashboard: weekly briefings from an assistant service, daily news metrics with geocoded locations, and historical comparisons."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 主数据集路径
    #[arg(long)]
    pub outbreaks_path: Option<PathBuf>,

    /// 新闻详情数据集路径
    #[arg(long)]
    pub details_path: Option<PathBuf>,

    /// 助手服务 API KEY
    #[arg(long)]
    pub api_key: Option<String>,

    /// 助手服务 API 基地址
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// 周报助手
    #[arg(long)]
    pub briefing_assistant: Option<String>,

    /// 历史对比助手
    #[arg(long)]
    pub comparison_assistant: Option<String>,

    /// 轮询间隔（毫秒）
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// 单次助手调用最长等待（秒）
    #[arg(long)]
    pub max_wait_seconds: Option<u64>,

    /// 提取后的展示延迟（毫秒）
    #[arg(long)]
    pub extract_delay_ms: Option<u64>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq, Default)]
pub enum Command {
    /// 生成每周国家简报，可附带追问
    Briefing {
        #[arg(long = "chat", value_name = "MESSAGE")]
        chat: Vec<String>,
    },
    /// 提取每日新闻指标
    Extract {
        /// 覆盖配置中的话题列表
        #[arg(long = "topic", value_name = "NAME")]
        topics: Vec<String>,
    },
    /// 生成国家简报、提取新闻，再生成历史对比，可附带追问
    Compare {
        #[arg(long = "chat", value_name = "MESSAGE")]
        chat: Vec<String>,
    },
    /// 交互式会话
    #[default]
    Interactive,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<(Config, Command)> {
        let mut config = Config::load(self.config.as_deref())?;

        // 覆盖数据源配置
        if let Some(outbreaks_path) = self.outbreaks_path {
            config.data.outbreaks_path = outbreaks_path;
        }
        if let Some(details_path) = self.details_path {
            config.data.details_path = details_path;
        }

        // 覆盖助手配置
        if let Some(api_key) = self.api_key {
            config.assistant.api_key = api_key;
        }
        if let Some(api_base_url) = self.api_base_url {
            config.assistant.api_base_url = api_base_url;
        }
        if let Some(briefing_assistant) = self.briefing_assistant {
            config.assistant.briefing_assistant_id = briefing_assistant;
        }
        if let Some(comparison_assistant) = self.comparison_assistant {
            config.assistant.comparison_assistant_id = comparison_assistant;
        }
        if let Some(poll_interval_ms) = self.poll_interval_ms {
            config.assistant.poll_interval_ms = poll_interval_ms;
        }
        if let Some(max_wait_seconds) = self.max_wait_seconds {
            config.assistant.max_wait_seconds = max_wait_seconds;
        }

        if let Some(extract_delay_ms) = self.extract_delay_ms {
            config.dashboard.extract_delay_ms = extract_delay_ms;
        }

        let command = self.command.unwrap_or_default();
        if let Command::Extract { topics } = &command
            && !topics.is_empty()
        {
            config.dashboard.topics = topics.clone();
        }

        config.verbose = config.verbose || self.verbose;

        Ok((config, command))
    }
}
