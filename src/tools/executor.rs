//! 工具执行器
//!
//! 持有 ToolRegistry 与全局超时，execute(tool_name, args) 在超时内调用工具并
//! 封装为响应包络：成功 {"ok": true, "result": ...}，失败 {"ok": false,
//! "error": {"kind", "message"}}；每次调用输出结构化审计日志（JSON）。

use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::time::timeout;

use crate::tools::ToolRegistry;

/// 工具执行器：超时、审计日志与响应包络
pub struct ToolExecutor {
    registry: ToolRegistry,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry, timeout_secs: u64) -> Self {
        Self {
            registry,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }

    pub fn schema_json(&self) -> String {
        self.registry.to_schema_json()
    }

    /// 执行指定工具并返回响应包络；未注册工具与超时也走包络，不抛出
    pub async fn execute(&self, tool_name: &str, args: Value) -> Value {
        let start = Instant::now();
        let args_preview = args_preview(&args);

        let tool = match self.registry.get(tool_name) {
            Some(tool) => tool,
            None => {
                tracing::warn!(tool = %tool_name, "unknown tool requested");
                return error_envelope(
                    "UnknownTool",
                    &format!("unknown tool: {tool_name}"),
                );
            }
        };

        // 工具 future 派生为独立任务：超时只是不再等待，任务本身继续执行，
        // 会话状态机总能走完 commit / fail 迁移，不会停在 RUNNING
        let task = tokio::spawn(async move { tool.execute(args).await });
        let result = timeout(self.timeout, task).await;

        let (ok, outcome): (bool, &str) = match &result {
            Ok(Ok(Ok(_))) => (true, "ok"),
            Ok(Ok(Err(e))) => (false, e.kind()),
            Ok(Err(_)) => (false, "panic"),
            Err(_) => (false, "timeout"),
        };
        let duration_ms = start.elapsed().as_millis() as u64;
        let audit = serde_json::json!({
            "event": "tool_audit",
            "tool": tool_name,
            "ok": ok,
            "outcome": outcome,
            "duration_ms": duration_ms,
            "args_preview": args_preview,
        });
        tracing::info!(audit = %audit.to_string(), "tool");

        match result {
            Ok(Ok(Ok(payload))) => serde_json::json!({ "ok": true, "result": payload }),
            Ok(Ok(Err(e))) => error_envelope(e.kind(), &e.to_string()),
            Ok(Err(join_err)) => error_envelope(
                "ToolExecutionFailed",
                &format!("tool '{tool_name}' task failed: {join_err}"),
            ),
            Err(_) => error_envelope(
                "ToolTimeout",
                &format!("tool '{tool_name}' exceeded {}s", self.timeout.as_secs()),
            ),
        }
    }
}

fn error_envelope(kind: &str, message: &str) -> Value {
    serde_json::json!({
        "ok": false,
        "error": { "kind": kind, "message": message }
    })
}

fn args_preview(args: &Value) -> String {
    let s = args.to_string();
    if s.len() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionError;
    use crate::tools::Tool;
    use async_trait::async_trait;

    struct PingTool;

    #[async_trait]
    impl Tool for PingTool {
        fn name(&self) -> &str {
            "ping"
        }
        fn description(&self) -> &str {
            "Reply pong"
        }
        async fn execute(&self, _args: Value) -> Result<Value, SessionError> {
            Ok(serde_json::json!("pong"))
        }
    }

    struct AlwaysFailsTool;

    #[async_trait]
    impl Tool for AlwaysFailsTool {
        fn name(&self) -> &str {
            "broken"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        async fn execute(&self, _args: Value) -> Result<Value, SessionError> {
            Err(SessionError::ResultsNotAvailable)
        }
    }

    fn executor() -> ToolExecutor {
        let mut registry = ToolRegistry::new();
        registry.register(PingTool);
        registry.register(AlwaysFailsTool);
        ToolExecutor::new(registry, 5)
    }

    #[tokio::test]
    async fn success_envelope() {
        let resp = executor().execute("ping", serde_json::json!({})).await;
        assert_eq!(resp["ok"], true);
        assert_eq!(resp["result"], "pong");
    }

    #[tokio::test]
    async fn error_envelope_carries_kind() {
        let resp = executor().execute("broken", serde_json::json!({})).await;
        assert_eq!(resp["ok"], false);
        assert_eq!(resp["error"]["kind"], "ResultsNotAvailable");
    }

    struct SlowTool {
        finished: std::sync::Arc<std::sync::atomic::AtomicBool>,
    }

    #[async_trait]
    impl Tool for SlowTool {
        fn name(&self) -> &str {
            "slow"
        }
        fn description(&self) -> &str {
            "Finishes after the executor timeout"
        }
        async fn execute(&self, _args: Value) -> Result<Value, SessionError> {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            self.finished
                .store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(serde_json::json!("done"))
        }
    }

    #[tokio::test]
    async fn timed_out_tool_still_runs_to_completion() {
        let finished = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let mut registry = ToolRegistry::new();
        registry.register(SlowTool {
            finished: finished.clone(),
        });
        let exec = ToolExecutor::new(registry, 1);

        let resp = exec.execute("slow", serde_json::json!({})).await;
        assert_eq!(resp["error"]["kind"], "ToolTimeout");
        assert!(!finished.load(std::sync::atomic::Ordering::SeqCst));

        // 超时只是放弃等待，任务继续到完成
        tokio::time::sleep(Duration::from_millis(800)).await;
        assert!(finished.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unknown_tool_envelope() {
        let resp = executor().execute("nope", serde_json::json!({})).await;
        assert_eq!(resp["ok"], false);
        assert_eq!(resp["error"]["kind"], "UnknownTool");
    }
}
