//! 会话状态 - 记录每个简报上下文的生命周期，并据此开放聊天与对比入口
//!
//! 会话在启动时创建，只由用户显式触发的动作修改，进程退出即销毁。
//! 状态通过 `&mut SessionState` 传递，不存在全局可变量。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BriefingError, Result};

/// 简报上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BriefingKind {
    /// 每周国家级简报
    Country,
    /// 每日新闻指标提取
    News,
    /// 历史对比与关注等级
    Comparison,
}

impl std::fmt::Display for BriefingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BriefingKind::Country => write!(f, "country"),
            BriefingKind::News => write!(f, "news"),
            BriefingKind::Comparison => write!(f, "comparison"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum BriefingStatus {
    #[default]
    NotRequested,
    Pending,
    Available(String),
    Failed(String),
}

impl BriefingStatus {
    fn label(&self) -> &'static str {
        match self {
            BriefingStatus::NotRequested => "not requested",
            BriefingStatus::Pending => "pending",
            BriefingStatus::Available(_) => "available",
            BriefingStatus::Failed(_) => "failed",
        }
    }
}

/// 单个上下文的简报状态
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BriefingState {
    status: BriefingStatus,
    /// 最近一次成功的回答，重新生成失败时据此恢复
    last_response: Option<String>,
    /// 最近一次失败的原因，成功后清空
    last_error: Option<String>,
}

impl BriefingState {
    pub fn status(&self) -> &BriefingStatus {
        &self.status
    }

    pub fn requested(&self) -> bool {
        !matches!(self.status, BriefingStatus::NotRequested)
    }

    pub fn response(&self) -> Option<&str> {
        match &self.status {
            BriefingStatus::Available(response) => Some(response),
            _ => None,
        }
    }

    /// 最近一次失败的原因。重新生成失败后上下文仍可用时也会保留。
    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, BriefingStatus::Available(_))
    }
}

/// 一次交互会话的全部状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    country: BriefingState,
    news: BriefingState,
    comparison: BriefingState,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            country: BriefingState::default(),
            news: BriefingState::default(),
            comparison: BriefingState::default(),
        }
    }

    pub fn briefing(&self, kind: BriefingKind) -> &BriefingState {
        match kind {
            BriefingKind::Country => &self.country,
            BriefingKind::News => &self.news,
            BriefingKind::Comparison => &self.comparison,
        }
    }

    fn briefing_mut(&mut self, kind: BriefingKind) -> &mut BriefingState {
        match kind {
            BriefingKind::Country => &mut self.country,
            BriefingKind::News => &mut self.news,
            BriefingKind::Comparison => &mut self.comparison,
        }
    }

    /// "Generate"：进入 Pending。已在 Pending 时不允许重复发起。
    pub fn begin(&mut self, kind: BriefingKind) -> Result<()> {
        let state = self.briefing_mut(kind);
        if state.status == BriefingStatus::Pending {
            return Err(BriefingError::InvalidTransition {
                context: kind,
                action: "begin",
                state: state.status.label(),
            });
        }
        tracing::debug!("Briefing {} -> pending", kind);
        state.status = BriefingStatus::Pending;
        Ok(())
    }

    /// Pending -> Available
    pub fn complete(&mut self, kind: BriefingKind, response: String) -> Result<()> {
        let state = self.briefing_mut(kind);
        if state.status != BriefingStatus::Pending {
            return Err(BriefingError::InvalidTransition {
                context: kind,
                action: "complete",
                state: state.status.label(),
            });
        }
        tracing::debug!("Briefing {} -> available ({} chars)", kind, response.len());
        state.last_response = Some(response.clone());
        state.last_error = None;
        state.status = BriefingStatus::Available(response);
        Ok(())
    }

    /// Pending -> Failed。之前生成过的回答不会丢失，此时回到 Available 并记录错误。
    pub fn fail(&mut self, kind: BriefingKind, error: String) -> Result<()> {
        let state = self.briefing_mut(kind);
        if state.status != BriefingStatus::Pending {
            return Err(BriefingError::InvalidTransition {
                context: kind,
                action: "fail",
                state: state.status.label(),
            });
        }
        state.last_error = Some(error.clone());
        match &state.last_response {
            Some(previous) => {
                tracing::debug!("Briefing {} refresh failed, keeping previous: {}", kind, error);
                state.status = BriefingStatus::Available(previous.clone());
            }
            None => {
                tracing::debug!("Briefing {} -> failed: {}", kind, error);
                state.status = BriefingStatus::Failed(error);
            }
        }
        Ok(())
    }

    /// "Extract"：直接置为可用，重复触发时覆盖上下文
    pub fn mark_extracted(&mut self, news_context: String) {
        tracing::debug!("Briefing {} -> available", BriefingKind::News);
        self.news.last_response = Some(news_context.clone());
        self.news.last_error = None;
        self.news.status = BriefingStatus::Available(news_context);
    }

    /// 只有上下文本身可用后才开放聊天。对比聊天因此要等历史对比生成之后，
    /// 仅完成国家简报与新闻提取还不够。
    pub fn chat_enabled(&self, kind: BriefingKind) -> bool {
        self.briefing(kind).is_available()
    }

    /// 国家简报与新闻提取都可用后才开放历史对比
    pub fn comparison_unlocked(&self) -> bool {
        self.country.is_available() && self.news.is_available()
    }
}
