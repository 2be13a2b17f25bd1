//! 仪表盘 - 把会话状态、数据集、助手编排与地区解析串成用户可触发的动作
//!
//! 每个动作都先检查会话门槛，再调用对应的组件，最后把结果写回会话。

use std::time::Duration;

use crate::assistant::{AssistantOrchestrator, AssistantService, PollPolicy};
use crate::config::{Config, DashboardConfig};
use crate::data::Dataset;
use crate::error::{BriefingError, Result};
use crate::geo::{Geocoder, RegionResolver};
use crate::metrics::MetricsAggregator;
use crate::session::{BriefingKind, SessionState};
use crate::types::{GeoPoint, MetricsBundle};

pub mod render;
mod workflow;

pub use workflow::{launch, run_command, run_interactive};

/// 每日新闻中单个话题的展示数据
#[derive(Debug, Clone, PartialEq)]
pub struct TopicReport {
    pub bundle: MetricsBundle,
    /// 详情表没有该话题时为 None
    pub negative_coverage_pct: Option<i64>,
    pub impact: Option<String>,
    pub locations: Vec<GeoPoint>,
}

pub struct Dashboard<A, G> {
    config: DashboardConfig,
    briefing_assistant_id: String,
    comparison_assistant_id: String,
    dataset: Dataset,
    orchestrator: AssistantOrchestrator<A>,
    resolver: RegionResolver<G>,
    session: SessionState,
}

impl<A: AssistantService, G: Geocoder> Dashboard<A, G> {
    pub fn new(config: &Config, dataset: Dataset, service: A, geocoder: G) -> Self {
        let session = SessionState::new();
        tracing::info!(
            "Dashboard session started - session={}, topics={:?}",
            session.id,
            config.dashboard.topics
        );

        Self {
            config: config.dashboard.clone(),
            briefing_assistant_id: config.assistant.briefing_assistant_id.clone(),
            comparison_assistant_id: config.assistant.comparison_assistant_id.clone(),
            dataset,
            orchestrator: AssistantOrchestrator::new(
                service,
                PollPolicy::from(&config.assistant),
            ),
            resolver: RegionResolver::new(geocoder, config.geocoder.point_weight),
            session,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// 生成每周国家简报
    pub async fn generate_country_briefing(&mut self) -> Result<String> {
        let prompt = self.config.country_prompt.clone();
        let assistant_id = self.briefing_assistant_id.clone();
        self.run_context(BriefingKind::Country, &prompt, &assistant_id)
            .await
    }

    /// 针对国家简报追问，回答不写回会话
    pub async fn country_chat(&self, message: &str) -> Result<String> {
        self.chat(BriefingKind::Country, message, &self.briefing_assistant_id)
            .await
    }

    /// 提取每日新闻：开放新闻上下文，等待展示延迟，再为每个话题生成报告
    pub async fn extract_news(&mut self) -> anyhow::Result<Vec<TopicReport>> {
        let news_context = self.dataset.news_context()?;
        self.session.mark_extracted(news_context);

        if self.config.extract_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.extract_delay_ms)).await;
        }

        let mut reports = Vec::with_capacity(self.config.topics.len());
        for topic in &self.config.topics {
            reports.push(self.topic_report(topic).await?);
        }
        Ok(reports)
    }

    /// 按活跃疫情视图查询单个话题。影响与负面报道缺失时记为 None。
    pub async fn topic_report(&self, topic: &str) -> Result<TopicReport> {
        let active = self.dataset.active_outbreaks();
        let details = self.dataset.details();

        let bundle = MetricsAggregator::get_metrics(topic, active)?;
        let locations = MetricsAggregator::get_region(topic, active, &self.resolver).await?;

        let negative_coverage_pct = match MetricsAggregator::get_negative_sentiment(topic, details)
        {
            Ok(pct) => Some(pct),
            Err(BriefingError::NoMatch { .. }) => {
                tracing::debug!("No negative coverage row - topic={:?}", topic);
                None
            }
            Err(err) => return Err(err),
        };

        let impact = match MetricsAggregator::get_impact(topic, details) {
            Ok(impact) => Some(impact),
            Err(BriefingError::NoImpactData { .. }) => {
                tracing::debug!("No impact row - topic={:?}", topic);
                None
            }
            Err(err) => return Err(err),
        };

        Ok(TopicReport {
            bundle,
            negative_coverage_pct,
            impact,
            locations,
        })
    }

    /// 国家简报与新闻提取都可用后，生成历史对比
    pub async fn generate_comparison(&mut self) -> Result<String> {
        let (Some(country), Some(news)) = (
            self.session.briefing(BriefingKind::Country).response(),
            self.session.briefing(BriefingKind::News).response(),
        ) else {
            return Err(BriefingError::InvalidTransition {
                context: BriefingKind::Comparison,
                action: "begin",
                state: "locked",
            });
        };

        let prompt = comparison_prompt(country, news);
        let assistant_id = self.comparison_assistant_id.clone();
        self.run_context(BriefingKind::Comparison, &prompt, &assistant_id)
            .await
    }

    /// 针对历史对比追问
    pub async fn comparison_chat(&self, message: &str) -> Result<String> {
        self.chat(
            BriefingKind::Comparison,
            message,
            &self.comparison_assistant_id,
        )
        .await
    }

    /// Pending -> 调用助手 -> Available / Failed
    async fn run_context(
        &mut self,
        kind: BriefingKind,
        prompt: &str,
        assistant_id: &str,
    ) -> Result<String> {
        self.session.begin(kind)?;

        match self.orchestrator.run_briefing(prompt, assistant_id).await {
            Ok(response) => {
                self.session.complete(kind, response.clone())?;
                Ok(response)
            }
            Err(err) => {
                tracing::error!("Briefing {} failed: {}", kind, err);
                self.session.fail(kind, err.to_string())?;
                Err(err)
            }
        }
    }

    async fn chat(&self, kind: BriefingKind, message: &str, assistant_id: &str) -> Result<String> {
        if !self.session.chat_enabled(kind) {
            return Err(BriefingError::ChatUnavailable { context: kind });
        }
        self.orchestrator.run_briefing(message, assistant_id).await
    }
}

/// 历史对比提示词
pub fn comparison_prompt(country_briefing: &str, news_context: &str) -> String {
    format!(
        "Current Flu Status: {}, Data from the latest news: {}",
        country_briefing, news_context
    )
}
