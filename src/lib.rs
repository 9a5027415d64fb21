//! g4mcp - GEANT4 模拟会话服务器
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、会话状态机、会话管理器
//! - **simulation**: 模拟领域：配置校验、逐事件结果与汇总、引擎适配层
//! - **tools**: 工具面（configure / run / status / results / save / load）与执行器
//! - **server**: stdio 行式 JSON 请求/响应循环
//! - **observability**: 日志初始化

pub mod config;
pub mod core;
pub mod observability;
pub mod server;
pub mod simulation;
pub mod tools;

pub use crate::core::{SessionError, SessionManager, SessionState, SimulationSession};
pub use crate::simulation::{SamplingEngine, SimulationConfig, TrialExecutor};
