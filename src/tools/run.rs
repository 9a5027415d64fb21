//! run_simulation 工具
//!
//! 阻塞语义：请求直到全部事件完成或引擎失败才返回；无进度流、无取消。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{SessionError, SessionManager};
use crate::tools::Tool;

pub struct RunSimulationTool {
    manager: Arc<SessionManager>,
}

impl RunSimulationTool {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for RunSimulationTool {
    fn name(&self) -> &str {
        "run_simulation"
    }

    fn description(&self) -> &str {
        "Run the simulation with the current configuration. Blocks until all events \
         complete. Args: {\"num_events\": optional integer overriding the configured count \
         for this run only}. Returns the results summary."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "num_events": {
                    "type": "integer",
                    "description": "Number of events to run (overrides config if provided)"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, SessionError> {
        let num_events_override = match args.get("num_events") {
            None | Some(Value::Null) => None,
            Some(v) => Some(v.as_u64().and_then(|n| u32::try_from(n).ok()).ok_or_else(
                || {
                    SessionError::InvalidConfiguration(
                        "num_events: must be a non-negative integer".to_string(),
                    )
                },
            )?),
        };

        let report = self.manager.run(num_events_override).await?;
        Ok(serde_json::json!({
            "message": "Simulation completed successfully",
            "summary": report.summary,
            "summary_text": report.summary_text,
            "output_file": report.output_file
        }))
    }
}
