//! 会话错误类型
//!
//! 所有工具操作的失败都落在这个枚举上；`kind()` 给出响应包络里的稳定错误名，
//! 消息部分保留给人读的细节（字段名、原因、底层报错）。

use thiserror::Error;

/// 会话操作可能出现的错误（校验、状态机违规、引擎失败、文件读写）
#[derive(Error, Debug)]
pub enum SessionError {
    /// 配置字段非法，消息中注明字段与原因；校验在本地完成，不会到达引擎
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// 操作需要已存入的配置，但从未配置过（或会话已失效需重新配置）
    #[error("no simulation configured; call configure_simulation or load_configuration first")]
    NotConfigured,

    /// 单飞约束：已有一次 run 在执行中
    #[error("a simulation run is already in progress")]
    RunAlreadyInProgress,

    /// 外部引擎中途失败；本次 run 整体作废，不保留部分结果
    #[error("engine execution failed: {0}")]
    EngineExecution(String),

    /// 在没有完成过成功 run 的状态下取结果
    #[error("no simulation results available; run a simulation first")]
    ResultsNotAvailable,

    /// 对零条结果做汇总
    #[error("cannot aggregate an empty result set")]
    EmptyResultSet,

    /// 配置/结果文档的读写失败
    #[error("I/O failure: {0}")]
    Io(String),
}

impl SessionError {
    /// 响应包络中的错误名（跨版本稳定，客户端按名分支）
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::InvalidConfiguration(_) => "InvalidConfiguration",
            SessionError::NotConfigured => "NotConfigured",
            SessionError::RunAlreadyInProgress => "RunAlreadyInProgress",
            SessionError::EngineExecution(_) => "EngineExecutionError",
            SessionError::ResultsNotAvailable => "ResultsNotAvailable",
            SessionError::EmptyResultSet => "EmptyResultSet",
            SessionError::Io(_) => "IOFailure",
        }
    }
}
