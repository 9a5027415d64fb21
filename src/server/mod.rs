//! stdio 行式 JSON 服务循环
//!
//! 每行一个请求：`{"id": 任意, "tool": "...", "args": {...}}`，
//! 每行一个响应：`{"id": ..., "ok": true, "result": ...}` 或
//! `{"id": ..., "ok": false, "error": {"kind", "message"}}`。
//! 请求串行处理：上一个工具（含阻塞的 run_simulation）返回前不取下一行。

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::tools::{tool_call_schema_json, ToolExecutor};

/// 从 stdin 读请求、向 stdout 写响应，直到 EOF
pub async fn run_stdio(executor: ToolExecutor) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = tokio::io::stdout();

    tracing::info!(tools = ?executor.tool_names(), "server ready");
    tracing::debug!(
        call_format = %tool_call_schema_json(),
        tools_schema = %executor.schema_json(),
        "tool schema"
    );

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = dispatch_line(&executor, &line).await;
        let mut bytes = serde_json::to_vec(&response)?;
        bytes.push(b'\n');
        stdout.write_all(&bytes).await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

/// 解析一行请求并分发；解析失败返回 InvalidRequest 包络
pub async fn dispatch_line(executor: &ToolExecutor, line: &str) -> Value {
    let request: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return serde_json::json!({
                "ok": false,
                "error": { "kind": "InvalidRequest", "message": format!("malformed request: {e}") }
            })
        }
    };

    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let tool = match request.get("tool").and_then(Value::as_str) {
        Some(tool) => tool.to_string(),
        None => {
            return serde_json::json!({
                "id": id,
                "ok": false,
                "error": { "kind": "InvalidRequest", "message": "missing 'tool' field" }
            })
        }
    };
    let args = request
        .get("args")
        .cloned()
        .unwrap_or_else(|| serde_json::json!({}));

    let mut response = executor.execute(&tool, args).await;
    response["id"] = id;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionManager;
    use crate::simulation::SamplingEngine;
    use crate::tools::{build_registry, ToolExecutor};
    use std::sync::Arc;

    fn executor() -> ToolExecutor {
        let manager = Arc::new(SessionManager::new(Arc::new(SamplingEngine::new(Some(1)))));
        ToolExecutor::new(build_registry(manager), 60)
    }

    #[tokio::test]
    async fn malformed_line_is_invalid_request() {
        let resp = dispatch_line(&executor(), "not json at all").await;
        assert_eq!(resp["ok"], false);
        assert_eq!(resp["error"]["kind"], "InvalidRequest");
    }

    #[tokio::test]
    async fn missing_tool_field_is_invalid_request() {
        let resp = dispatch_line(&executor(), r#"{"id": 1, "args": {}}"#).await;
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["error"]["kind"], "InvalidRequest");
    }

    #[tokio::test]
    async fn id_is_echoed_back() {
        let resp = dispatch_line(
            &executor(),
            r#"{"id": "req-7", "tool": "get_simulation_status"}"#,
        )
        .await;
        assert_eq!(resp["id"], "req-7");
        assert_eq!(resp["ok"], true);
        assert_eq!(resp["result"]["state"], "UNCONFIGURED");
    }
}
