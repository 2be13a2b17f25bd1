//! 助手服务的线上数据结构

use serde::{Deserialize, Serialize};

use crate::types::{RunStatus, ThreadMessage};

/// 一次 run 的快照
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    /// 服务端给出的失败原因
    pub last_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateThreadRequest<'a> {
    pub messages: Vec<MessageInput<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageInput<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRunRequest<'a> {
    pub assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThreadObject {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunObject {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunErrorObject {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl From<RunObject> for Run {
    fn from(run: RunObject) -> Self {
        Run {
            id: run.id,
            status: run.status,
            last_error: run.last_error.map(|e| match e.code {
                Some(code) => format!("{}: {}", code, e.message),
                None => e.message,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageList {
    pub data: Vec<MessageObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageObject {
    pub role: String,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextContent {
    pub value: String,
}

impl From<MessageObject> for ThreadMessage {
    /// 取第一段文本内容，非文本内容（图片等）跳过
    fn from(message: MessageObject) -> Self {
        let content = message
            .content
            .into_iter()
            .find_map(|part| match part {
                MessageContent::Text { text } => Some(text.value),
                MessageContent::Other => None,
            })
            .unwrap_or_default();
        ThreadMessage {
            role: message.role,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_object_with_last_error() {
        let body = r#"{
            "id": "run_abc",
            "object": "thread.run",
            "thread_id": "thread_abc",
            "assistant_id": "asst_abc",
            "status": "failed",
            "last_error": {"code": "rate_limit_exceeded", "message": "Slow down"}
        }"#;
        let run: Run = serde_json::from_str::<RunObject>(body).unwrap().into();

        assert_eq!(run.id, "run_abc");
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(
            run.last_error.as_deref(),
            Some("rate_limit_exceeded: Slow down")
        );
    }

    #[test]
    fn test_run_object_null_last_error() {
        let body = r#"{"id": "run_abc", "status": "queued", "last_error": null}"#;
        let run: Run = serde_json::from_str::<RunObject>(body).unwrap().into();

        assert_eq!(run.status, RunStatus::Queued);
        assert!(run.last_error.is_none());
    }

    #[test]
    fn test_message_list_most_recent_first() {
        let body = r#"{
            "object": "list",
            "data": [
                {
                    "id": "msg_2",
                    "role": "assistant",
                    "content": [
                        {"type": "image_file", "image_file": {"file_id": "file_1"}},
                        {"type": "text", "text": {"value": "- Influenza is rising in Australia", "annotations": []}}
                    ]
                },
                {
                    "id": "msg_1",
                    "role": "user",
                    "content": [{"type": "text", "text": {"value": "Summarise", "annotations": []}}]
                }
            ],
            "first_id": "msg_2",
            "last_id": "msg_1",
            "has_more": false
        }"#;
        let list: MessageList = serde_json::from_str(body).unwrap();
        let messages: Vec<ThreadMessage> = list.data.into_iter().map(Into::into).collect();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "assistant");
        assert_eq!(messages[0].content, "- Influenza is rising in Australia");
        assert_eq!(messages[1].content, "Summarise");
    }

    #[test]
    fn test_create_thread_request_shape() {
        let request = CreateThreadRequest {
            messages: vec![MessageInput {
                role: "user",
                content: "hello",
            }],
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"messages": [{"role": "user", "content": "hello"}]})
        );
    }
}
