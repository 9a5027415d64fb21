//! g4mcp - GEANT4 模拟会话服务器
//!
//! 入口：初始化日志、加载配置、装配引擎与工具面，进入 stdio 服务循环。

use std::sync::Arc;

use anyhow::Context;
use g4mcp::core::SessionManager;
use g4mcp::simulation::SamplingEngine;
use g4mcp::tools::{build_registry, ToolExecutor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    g4mcp::observability::init();

    let app_config = g4mcp::config::load_config(None).context("Failed to load config")?;
    if let Some(name) = &app_config.app.name {
        tracing::info!(name = %name, "starting");
    }

    // 默认输出目录提前建好，结果文档落盘不再依赖工作目录状态
    let output_root = app_config
        .app
        .output_root
        .clone()
        .unwrap_or_else(|| "output".into());
    let _ = std::fs::create_dir_all(&output_root);

    let engine = Arc::new(
        SamplingEngine::new(app_config.engine.seed)
            .with_physics_list(&app_config.engine.physics_list),
    );
    let manager = Arc::new(SessionManager::new(engine));
    let registry = build_registry(manager);
    let executor = ToolExecutor::new(registry, app_config.tools.tool_timeout_secs);

    g4mcp::server::run_stdio(executor)
        .await
        .context("Server loop failed")?;

    Ok(())
}
