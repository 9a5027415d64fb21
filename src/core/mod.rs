//! 核心层：错误类型、会话状态机、会话管理器

pub mod error;
pub mod manager;
pub mod session;

pub use error::SessionError;
pub use manager::{RunReport, SessionManager};
pub use session::{SessionState, SimulationSession, StatusReport};
