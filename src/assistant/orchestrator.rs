//! 助手编排器 - 建线程、提交 run、轮询到终态、取最新消息

use std::time::Duration;
use tokio::time::Instant;

use super::client::AssistantService;
use super::types::Run;
use crate::config::AssistantConfig;
use crate::error::{BriefingError, Result};
use crate::types::{ConversationThread, RunStatus, ThreadMessage};

/// 轮询策略
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// 两次查询 run 状态之间的间隔
    pub interval: Duration,
    /// 单次调用的最长等待时间
    pub max_wait: Duration,
    /// 单次状态查询的重试次数（仅针对可重试错误）
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(&AssistantConfig::default())
    }
}

impl From<&AssistantConfig> for PollPolicy {
    fn from(config: &AssistantConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            max_wait: config.max_wait(),
            retry_attempts: config.retry_attempts,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// 助手编排器。每次调用都新建线程，不复用、不缓存。
pub struct AssistantOrchestrator<S> {
    service: S,
    policy: PollPolicy,
}

impl<S: AssistantService> AssistantOrchestrator<S> {
    pub fn new(service: S, policy: PollPolicy) -> Self {
        Self { service, policy }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// 发送提示词给指定助手，等待 run 结束并返回最新一条消息的文本。
    ///
    /// 调用方在整个轮询期间处于等待状态。run 以非成功终态结束时返回
    /// `AssistantRun`，超过 `max_wait` 返回 `AssistantTimeout`。
    pub async fn run_briefing(&self, prompt: &str, assistant_id: &str) -> Result<String> {
        let started = Instant::now();

        let thread_id = self.service.create_thread(prompt).await?;
        let mut thread = ConversationThread::new(thread_id, ThreadMessage::user(prompt));
        tracing::info!("Assistant thread created - thread={}", thread.id);

        let run = self.service.create_run(&thread.id, assistant_id).await?;
        thread.advance(run.status);
        tracing::info!(
            "Assistant run created - run={}, assistant={}, status={}",
            run.id,
            assistant_id,
            run.status
        );

        let outcome = self.wait_for_terminal(&mut thread, run, started).await?;

        if outcome.status.is_failure() {
            tracing::warn!(
                "Assistant run failed - thread={}, status={}",
                thread.id,
                outcome.status
            );
            return Err(BriefingError::AssistantRun {
                status: outcome.status,
                message: outcome.last_error,
            });
        }

        let latest = self
            .service
            .list_messages(&thread.id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BriefingError::EmptyThread {
                thread_id: thread.id.clone(),
            })?;

        tracing::info!(
            "Assistant run completed - thread={}, duration={:.2}s, chars={}",
            thread.id,
            started.elapsed().as_secs_f32(),
            latest.content.len()
        );
        tracing::debug!("Final assistant response: {}", latest.content);

        thread.messages.push(latest.clone());
        Ok(latest.content)
    }

    /// 轮询直到终态或超出等待预算。每次查询（含重试与重试间隔）都计入预算。
    async fn wait_for_terminal(
        &self,
        thread: &mut ConversationThread,
        run: Run,
        started: Instant,
    ) -> Result<Run> {
        let run_id = run.id;
        let mut last_error = run.last_error;
        let mut polls = 0u32;

        while !thread.run_status().is_terminal() {
            let Some(remaining) = self.remaining(started) else {
                return Err(self.timed_out(thread, started, polls));
            };
            tokio::time::sleep(self.policy.interval.min(remaining)).await;

            let Some(remaining) = self.remaining(started) else {
                return Err(self.timed_out(thread, started, polls));
            };
            let polled =
                match tokio::time::timeout(remaining, self.poll_run(&thread.id, &run_id)).await {
                    Ok(polled) => polled?,
                    Err(_) => return Err(self.timed_out(thread, started, polls)),
                };
            polls += 1;

            if polled.status == RunStatus::Unknown {
                tracing::warn!(
                    "Unrecognised run status, keeping {} - run={}",
                    thread.run_status(),
                    run_id
                );
            } else if !thread.advance(polled.status) {
                tracing::warn!(
                    "Ignoring regressed run status - run={}, current={}, observed={}",
                    run_id,
                    thread.run_status(),
                    polled.status
                );
            }
            tracing::debug!("run.status: {} (poll {})", thread.run_status(), polls);

            if polled.last_error.is_some() {
                last_error = polled.last_error;
            }
        }

        Ok(Run {
            id: run_id,
            status: thread.run_status(),
            last_error,
        })
    }

    /// 剩余等待预算，耗尽时为 None
    fn remaining(&self, started: Instant) -> Option<Duration> {
        self.policy
            .max_wait
            .checked_sub(started.elapsed())
            .filter(|remaining| !remaining.is_zero())
    }

    fn timed_out(&self, thread: &ConversationThread, started: Instant, polls: u32) -> BriefingError {
        tracing::warn!(
            "Assistant run timed out - thread={}, polls={}, status={}",
            thread.id,
            polls,
            thread.run_status()
        );
        BriefingError::AssistantTimeout {
            waited: started.elapsed(),
            last_status: thread.run_status(),
        }
    }

    /// 查询 run 状态，可重试错误按配置重试
    async fn poll_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let max_retries = self.policy.retry_attempts;
        let mut retries = 0;

        loop {
            match self.service.get_run(thread_id, run_id).await {
                Ok(run) => return Ok(run),
                Err(err) if err.is_transient() => {
                    retries += 1;
                    tracing::warn!(
                        "Polling run failed, retrying ({} / {}): {}",
                        retries,
                        max_retries,
                        err
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(self.policy.retry_delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
