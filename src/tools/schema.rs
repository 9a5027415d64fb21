//! 工具调用 JSON Schema 生成（schemars 自动生成）
//!
//! 用于把「合法 tool call」的 JSON 结构提供给客户端，减少请求格式错误。

use schemars::{schema_for, JsonSchema};
use std::collections::HashMap;

/// 工具调用请求格式：与 server 解析的 `{"tool": "...", "args": {...}}` 一致（仅用于 Schema 生成）
#[allow(dead_code)]
#[derive(JsonSchema)]
struct ToolCallFormat {
    /// 工具名：configure_simulation、run_simulation、get_simulation_status、
    /// get_results、save_configuration、load_configuration
    pub tool: String,
    /// 工具参数，依工具不同而不同（particle_type、num_events、filename 等）
    pub args: HashMap<String, serde_json::Value>,
}

/// 返回工具调用的 JSON Schema 字符串
pub fn tool_call_schema_json() -> String {
    let schema = schema_for!(ToolCallFormat);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mentions_both_fields() {
        let schema = tool_call_schema_json();
        assert!(schema.contains("\"tool\""));
        assert!(schema.contains("\"args\""));
    }
}
