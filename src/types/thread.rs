use serde::{Deserialize, Serialize};

/// 远端 run 的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// 本地已建线程，尚未提交 run
    Created,
    Queued,
    InProgress,
    /// 服务端正在取消，仍非终态
    Cancelling,
    /// 本客户端从不提交工具输出，视为失败终态
    RequiresAction,
    Completed,
    Failed,
    Cancelled,
    Expired,
    Incomplete,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// 是否为终态（成功或失败）
    pub fn is_terminal(&self) -> bool {
        self.is_success() || self.is_failure()
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RunStatus::Failed
                | RunStatus::Cancelled
                | RunStatus::Expired
                | RunStatus::Incomplete
                | RunStatus::RequiresAction
        )
    }

    /// 状态在生命周期中的先后次序，用于保证状态只前进不后退。
    /// `Unknown` 返回 None，不参与比较。
    fn rank(&self) -> Option<u8> {
        match self {
            RunStatus::Created => Some(0),
            RunStatus::Queued => Some(1),
            RunStatus::InProgress => Some(2),
            RunStatus::Cancelling => Some(3),
            RunStatus::RequiresAction
            | RunStatus::Completed
            | RunStatus::Failed
            | RunStatus::Cancelled
            | RunStatus::Expired
            | RunStatus::Incomplete => Some(4),
            RunStatus::Unknown => None,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Created => "created",
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::Cancelling => "cancelling",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Expired => "expired",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// 线程中的一条消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub role: String,
    pub content: String,
}

impl ThreadMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// 单次编排调用对应的对话线程，只在调用期间存在
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationThread {
    pub id: String,
    pub messages: Vec<ThreadMessage>,
    run_status: RunStatus,
}

impl ConversationThread {
    pub fn new(id: impl Into<String>, initial: ThreadMessage) -> Self {
        Self {
            id: id.into(),
            messages: vec![initial],
            run_status: RunStatus::Created,
        }
    }

    pub fn run_status(&self) -> RunStatus {
        self.run_status
    }

    /// 推进 run 状态。`Unknown`、状态倒退或离开终态的观测都会被拒绝，
    /// 返回 false，当前状态保持不变。
    pub fn advance(&mut self, next: RunStatus) -> bool {
        if self.run_status.is_terminal() && next != self.run_status {
            return false;
        }
        match (self.run_status.rank(), next.rank()) {
            (Some(current), Some(incoming)) if incoming >= current => {
                self.run_status = next;
                true
            }
            _ => false,
        }
    }
}
