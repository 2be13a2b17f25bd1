use std::time::Duration;

use crate::session::BriefingKind;
use crate::types::RunStatus;

pub type Result<T, E = BriefingError> = std::result::Result<T, E>;

/// 简报流程中的领域错误
#[derive(Debug, thiserror::Error)]
pub enum BriefingError {
    /// 数值字段无法解析，说明输入数据已损坏
    #[error("failed to parse `{field}` as a number: {value:?}")]
    Parse { field: &'static str, value: String },

    #[error("no impact data for topic `{topic}`")]
    NoImpactData { topic: String },

    #[error("no detail record matches topic `{topic}`")]
    NoMatch { topic: String },

    /// run 以非成功终态结束
    #[error("assistant run ended with status `{status}`{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    AssistantRun {
        status: RunStatus,
        message: Option<String>,
    },

    #[error("assistant run still `{last_status}` after {:.1}s", .waited.as_secs_f64())]
    AssistantTimeout {
        waited: Duration,
        last_status: RunStatus,
    },

    #[error("assistant thread `{thread_id}` has no messages")]
    EmptyThread { thread_id: String },

    #[error("assistant API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("assistant API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat is not available for the {context} briefing yet")]
    ChatUnavailable { context: BriefingKind },

    #[error("cannot {action} the {context} briefing while it is {state}")]
    InvalidTransition {
        context: BriefingKind,
        action: &'static str,
        state: &'static str,
    },
}

impl BriefingError {
    /// 传输层故障或服务端 5xx/429，可对幂等请求重试
    pub fn is_transient(&self) -> bool {
        match self {
            BriefingError::Http(_) => true,
            BriefingError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(
            BriefingError::Api {
                status: 503,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            BriefingError::Api {
                status: 429,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            !BriefingError::Api {
                status: 401,
                body: String::new()
            }
            .is_transient()
        );
        assert!(
            !BriefingError::AssistantRun {
                status: RunStatus::Failed,
                message: None
            }
            .is_transient()
        );
    }

    #[test]
    fn test_assistant_error_messages() {
        let err = BriefingError::AssistantRun {
            status: RunStatus::Failed,
            message: Some("server_error: boom".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "assistant run ended with status `failed`: server_error: boom"
        );

        let err = BriefingError::AssistantRun {
            status: RunStatus::Expired,
            message: None,
        };
        assert_eq!(err.to_string(), "assistant run ended with status `expired`");

        let err = BriefingError::AssistantTimeout {
            waited: Duration::from_millis(1500),
            last_status: RunStatus::InProgress,
        };
        assert_eq!(
            err.to_string(),
            "assistant run still `in_progress` after 1.5s"
        );
    }
}
