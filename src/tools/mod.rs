//! 工具面：六个模拟操作 + 注册表 / 执行器 / Schema 生成

pub mod configure;
pub mod executor;
pub mod load_config;
pub mod registry;
pub mod results;
pub mod run;
pub mod save_config;
pub mod schema;
pub mod status;

use std::sync::Arc;

pub use configure::ConfigureSimulationTool;
pub use executor::ToolExecutor;
pub use load_config::LoadConfigurationTool;
pub use registry::{Tool, ToolRegistry};
pub use results::GetResultsTool;
pub use run::RunSimulationTool;
pub use save_config::SaveConfigurationTool;
pub use schema::tool_call_schema_json;
pub use status::GetSimulationStatusTool;

use crate::core::SessionManager;

/// 注册完整工具面（六个操作共享同一个会话管理器）
pub fn build_registry(manager: Arc<SessionManager>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(ConfigureSimulationTool::new(manager.clone()));
    registry.register(RunSimulationTool::new(manager.clone()));
    registry.register(GetSimulationStatusTool::new(manager.clone()));
    registry.register(GetResultsTool::new(manager.clone()));
    registry.register(SaveConfigurationTool::new(manager.clone()));
    registry.register(LoadConfigurationTool::new(manager));
    registry
}
