//! save_configuration 工具

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{SessionError, SessionManager};
use crate::tools::Tool;

pub struct SaveConfigurationTool {
    manager: Arc<SessionManager>,
}

impl SaveConfigurationTool {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for SaveConfigurationTool {
    fn name(&self) -> &str {
        "save_configuration"
    }

    fn description(&self) -> &str {
        "Save the current configuration to a JSON file. \
         Args: {\"filename\": path, default \"config.json\"}."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Filename to save configuration (default: config.json)"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, SessionError> {
        let filename = args
            .get("filename")
            .and_then(Value::as_str)
            .unwrap_or("config.json");
        let path = self.manager.save_configuration(Path::new(filename)).await?;
        Ok(serde_json::json!({
            "message": format!("Configuration saved to {}", path.display())
        }))
    }
}
