//! 助手服务客户端 - threads/runs/messages 协议的 HTTP 实现

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::types::{
    CreateRunRequest, CreateThreadRequest, MessageInput, MessageList, Run, RunObject,
    ThreadObject,
};
use crate::config::AssistantConfig;
use crate::error::{BriefingError, Result};
use crate::types::ThreadMessage;

/// 远端助手服务协议
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// 以一条用户消息创建线程，返回线程 id
    async fn create_thread(&self, initial_message: &str) -> Result<String>;

    /// 在线程上提交一次 run
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// 线程消息，按时间倒序（最新在前）
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;
}

/// OpenAI Assistants v2 客户端
#[derive(Clone)]
pub struct OpenAiAssistantClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiAssistantClient {
    pub fn new(config: &AssistantConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("OpenAI-Beta", HeaderValue::from_static("assistants=v2"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = request.bearer_auth(&self.api_key).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BriefingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl AssistantService for OpenAiAssistantClient {
    async fn create_thread(&self, initial_message: &str) -> Result<String> {
        let body = CreateThreadRequest {
            messages: vec![MessageInput {
                role: "user",
                content: initial_message,
            }],
        };
        let thread: ThreadObject = self
            .send_json(self.client.post(self.url("threads")).json(&body))
            .await?;
        Ok(thread.id)
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        let body = CreateRunRequest { assistant_id };
        let run: RunObject = self
            .send_json(
                self.client
                    .post(self.url(&format!("threads/{}/runs", thread_id)))
                    .json(&body),
            )
            .await?;
        Ok(run.into())
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let run: RunObject = self
            .send_json(
                self.client
                    .get(self.url(&format!("threads/{}/runs/{}", thread_id, run_id))),
            )
            .await?;
        Ok(run.into())
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let list: MessageList = self
            .send_json(
                self.client
                    .get(self.url(&format!("threads/{}/messages", thread_id)))
                    .query(&[("order", "desc")]),
            )
            .await?;
        Ok(list.data.into_iter().map(Into::into).collect())
    }
}
