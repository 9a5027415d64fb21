//! get_results 工具
//!
//! 汇总永远返回；逐事件列表只在 include_events 为 true 时附带（可能很大）。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{SessionError, SessionManager};
use crate::tools::Tool;

pub struct GetResultsTool {
    manager: Arc<SessionManager>,
}

impl GetResultsTool {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for GetResultsTool {
    fn name(&self) -> &str {
        "get_results"
    }

    fn description(&self) -> &str {
        "Get results from the last completed run: summary statistics, and optionally the \
         event-by-event data. Args: {\"include_events\": bool, default false}."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "include_events": {
                    "type": "boolean",
                    "description": "Include detailed event data (default: false)"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, SessionError> {
        let include_events = args
            .get("include_events")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let (outcomes, summary) = self.manager.fetch_results().await?;
        let mut payload = serde_json::json!({ "summary": summary });
        if include_events {
            payload["events"] = serde_json::to_value(&outcomes)
                .map_err(|e| SessionError::Io(format!("serialize events: {e}")))?;
        }
        Ok(payload)
    }
}
