//! load_configuration 工具

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{SessionError, SessionManager};
use crate::tools::Tool;

pub struct LoadConfigurationTool {
    manager: Arc<SessionManager>,
}

impl LoadConfigurationTool {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for LoadConfigurationTool {
    fn name(&self) -> &str {
        "load_configuration"
    }

    fn description(&self) -> &str {
        "Load a configuration document from a JSON file and make it the active \
         configuration after validation. Args: {\"filename\": path, required}."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Filename to load configuration from"
                }
            },
            "required": ["filename"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, SessionError> {
        let filename = args
            .get("filename")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                SessionError::InvalidConfiguration("filename: required string argument".to_string())
            })?;
        let config = self.manager.load_configuration(Path::new(filename)).await?;
        Ok(serde_json::json!({
            "message": format!("Configuration loaded from {filename}"),
            "configuration": config
        }))
    }
}
