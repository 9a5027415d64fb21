//! get_simulation_status 工具

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{SessionError, SessionManager};
use crate::tools::Tool;

pub struct GetSimulationStatusTool {
    manager: Arc<SessionManager>,
}

impl GetSimulationStatusTool {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for GetSimulationStatusTool {
    fn name(&self) -> &str {
        "get_simulation_status"
    }

    fn description(&self) -> &str {
        "Get the current lifecycle state, stored configuration and result availability."
    }

    async fn execute(&self, _args: Value) -> Result<Value, SessionError> {
        let status = self.manager.status().await;
        let mut payload = serde_json::to_value(&status)
            .map_err(|e| SessionError::Io(format!("serialize status: {e}")))?;
        payload["physics_list"] = Value::String(self.manager.physics_list());
        Ok(payload)
    }
}
