//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `G4MCP__*` 覆盖
//! （双下划线表示嵌套，如 `G4MCP__ENGINE__SEED=42`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub tools: ToolsSection,
}

/// [app] 段：应用名、输出根目录
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    pub name: Option<String>,
    /// 结果/配置文档的默认输出目录，未设置时用 ./output
    pub output_root: Option<PathBuf>,
}

/// [engine] 段：内置引擎的种子与物理列表名
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    /// 抽样种子；不设置则每次从系统熵初始化
    pub seed: Option<u64>,
    #[serde(default = "default_physics_list")]
    pub physics_list: String,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            seed: None,
            physics_list: default_physics_list(),
        }
    }
}

fn default_physics_list() -> String {
    "FTFP_BERT".to_string()
}

/// [tools] 段：单次工具调用超时
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    /// run_simulation 也受此约束，默认放宽到 1 小时
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            tool_timeout_secs: default_tool_timeout_secs(),
        }
    }
}

fn default_tool_timeout_secs() -> u64 {
    3600
}

/// 从 config 目录加载配置，环境变量 G4MCP__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 G4MCP__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("G4MCP")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.engine.physics_list, "FTFP_BERT");
        assert!(cfg.engine.seed.is_none());
        assert_eq!(cfg.tools.tool_timeout_secs, 3600);
    }
}
