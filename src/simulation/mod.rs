//! 模拟领域：配置、逐事件结果与汇总、引擎适配层

pub mod config;
pub mod engine;
pub mod results;

pub use config::{SimulationConfig, MATERIALS, MAX_NUM_EVENTS, PARTICLES};
pub use engine::{EngineError, SamplingEngine, TrialExecutor};
pub use results::{aggregate, render_summary, ResultsDocument, ResultsSummary, TrialOutcome};
