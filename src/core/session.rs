//! 会话状态机
//!
//! 一次会话 = 当前配置 + 生命周期状态 + 最近一次成功 run 的结果。
//! 状态迁移全部走这里的方法；每个方法要么完整成功（状态可见变化），
//! 要么完整失败（状态分毫不动），不存在半提交。

use serde::Serialize;

use crate::core::SessionError;
use crate::simulation::{
    aggregate, ResultsSummary, SimulationConfig, TrialOutcome, MAX_NUM_EVENTS,
};

/// 生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconfigured,
    Configured,
    Running,
    Completed,
    Failed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Unconfigured => "UNCONFIGURED",
            SessionState::Configured => "CONFIGURED",
            SessionState::Running => "RUNNING",
            SessionState::Completed => "COMPLETED",
            SessionState::Failed => "FAILED",
        }
    }
}

/// get_simulation_status 的载荷
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub state: &'static str,
    pub configuration: Option<SimulationConfig>,
    pub results_available: bool,
    pub total_events_recorded: u64,
}

/// 单个模拟会话；由 SessionManager 独占修改
pub struct SimulationSession {
    state: SessionState,
    config: Option<SimulationConfig>,
    outcomes: Vec<TrialOutcome>,
    summary: Option<ResultsSummary>,
}

impl Default for SimulationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Unconfigured,
            config: None,
            outcomes: Vec::new(),
            summary: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> Option<&SimulationConfig> {
        self.config.as_ref()
    }

    /// 任意状态可配置；校验失败时旧配置与旧结果原样保留。
    /// 成功后丢弃先前的结果/汇总：它们属于产生它们的那次 run。
    pub fn configure(&mut self, config: SimulationConfig) -> Result<(), SessionError> {
        config.validate().map_err(SessionError::InvalidConfiguration)?;
        self.config = Some(config);
        self.outcomes.clear();
        self.summary = None;
        self.state = SessionState::Configured;
        Ok(())
    }

    /// 进入 RUNNING 并交出本次 run 的配置与有效事件数。
    /// num_events_override 只影响本次 run，不写回配置。
    pub fn begin_run(
        &mut self,
        num_events_override: Option<u32>,
    ) -> Result<(SimulationConfig, u32), SessionError> {
        match self.state {
            SessionState::Running => return Err(SessionError::RunAlreadyInProgress),
            SessionState::Configured | SessionState::Completed => {}
            // FAILED 会话必须先 configure / load_configuration 重新确立配置
            SessionState::Unconfigured | SessionState::Failed => {
                return Err(SessionError::NotConfigured)
            }
        }
        let config = match &self.config {
            Some(config) => config.clone(),
            None => return Err(SessionError::NotConfigured),
        };
        // override 与存储配置适用同一取值范围
        let num_events = match num_events_override {
            Some(0) => {
                return Err(SessionError::InvalidConfiguration(
                    "num_events: must be >= 1 (got 0)".to_string(),
                ))
            }
            Some(n) if n > MAX_NUM_EVENTS => {
                return Err(SessionError::InvalidConfiguration(format!(
                    "num_events: must be <= {} (got {})",
                    MAX_NUM_EVENTS, n
                )))
            }
            Some(n) => n,
            None => config.simulation.num_events,
        };
        self.state = SessionState::Running;
        Ok((config, num_events))
    }

    /// 提交一次成功 run 的全部结果；只在 RUNNING 下合法
    pub fn complete_run(
        &mut self,
        outcomes: Vec<TrialOutcome>,
    ) -> Result<ResultsSummary, SessionError> {
        if self.state != SessionState::Running {
            return Err(SessionError::EngineExecution(
                "run completion without an active run".to_string(),
            ));
        }
        let summary = aggregate(&outcomes)?;
        self.outcomes = outcomes;
        self.summary = Some(summary.clone());
        self.state = SessionState::Completed;
        Ok(summary)
    }

    /// run 失败：部分结果整体丢弃，进入 FAILED
    pub fn fail_run(&mut self) {
        self.outcomes.clear();
        self.summary = None;
        self.state = SessionState::Failed;
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            state: self.state.as_str(),
            configuration: self.config.clone(),
            results_available: self.state == SessionState::Completed,
            total_events_recorded: self.outcomes.len() as u64,
        }
    }

    /// 结果只在 COMPLETED 下可取
    pub fn results(&self) -> Result<(&[TrialOutcome], &ResultsSummary), SessionError> {
        if self.state != SessionState::Completed {
            return Err(SessionError::ResultsNotAvailable);
        }
        match &self.summary {
            Some(summary) => Ok((&self.outcomes, summary)),
            None => Err(SessionError::ResultsNotAvailable),
        }
    }

    /// save_configuration 只在 CONFIGURED / COMPLETED 下合法
    pub fn config_for_save(&self) -> Result<&SimulationConfig, SessionError> {
        match self.state {
            SessionState::Configured | SessionState::Completed => self
                .config
                .as_ref()
                .ok_or(SessionError::NotConfigured),
            _ => Err(SessionError::NotConfigured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::results::PrimaryVertex;

    fn outcome(event_id: u32) -> TrialOutcome {
        TrialOutcome {
            event_id,
            primary: PrimaryVertex {
                particle: "gamma".to_string(),
                energy_mev: 1.0,
                position: [0.0, 0.0, -10.0],
                direction: [0.0, 0.0, 1.0],
            },
            energy_deposited_mev: 0.5,
            tracks_created: 2,
            interactions: 1,
        }
    }

    fn configured() -> SimulationSession {
        let mut s = SimulationSession::new();
        s.configure(SimulationConfig::default()).unwrap();
        s
    }

    #[test]
    fn starts_unconfigured() {
        let s = SimulationSession::new();
        assert_eq!(s.state(), SessionState::Unconfigured);
        assert!(s.config().is_none());
        assert!(matches!(
            s.results().unwrap_err(),
            SessionError::ResultsNotAvailable
        ));
    }

    #[test]
    fn run_before_configure_fails_without_state_change() {
        let mut s = SimulationSession::new();
        assert!(matches!(
            s.begin_run(None).unwrap_err(),
            SessionError::NotConfigured
        ));
        assert_eq!(s.state(), SessionState::Unconfigured);
    }

    #[test]
    fn invalid_configure_leaves_previous_config() {
        let mut s = configured();
        let mut bad = SimulationConfig::default();
        bad.particle.energy_mev = -5.0;
        assert!(matches!(
            s.configure(bad).unwrap_err(),
            SessionError::InvalidConfiguration(_)
        ));
        assert_eq!(s.state(), SessionState::Configured);
        assert_eq!(s.config().unwrap().particle.energy_mev, 1.0);
    }

    #[test]
    fn run_while_running_fails_and_keeps_outcomes() {
        let mut s = configured();
        let (_, n) = s.begin_run(Some(2)).unwrap();
        assert_eq!(n, 2);
        assert_eq!(s.state(), SessionState::Running);
        assert!(matches!(
            s.begin_run(None).unwrap_err(),
            SessionError::RunAlreadyInProgress
        ));
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn override_beyond_event_limit_rejected() {
        let mut s = configured();
        let err = s.begin_run(Some(MAX_NUM_EVENTS + 1)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("num_events"));
        // 拒绝不留痕迹，仍可正常开跑
        assert_eq!(s.state(), SessionState::Configured);
        assert!(s.begin_run(Some(MAX_NUM_EVENTS)).is_ok());
    }

    #[test]
    fn complete_run_transitions_to_completed() {
        let mut s = configured();
        s.begin_run(Some(2)).unwrap();
        let summary = s.complete_run(vec![outcome(0), outcome(1)]).unwrap();
        assert_eq!(s.state(), SessionState::Completed);
        assert_eq!(summary.total_events, 2);
        let (outcomes, _) = s.results().unwrap();
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn failed_run_discards_everything_and_blocks_rerun() {
        let mut s = configured();
        s.begin_run(None).unwrap();
        s.fail_run();
        assert_eq!(s.state(), SessionState::Failed);
        assert!(matches!(
            s.results().unwrap_err(),
            SessionError::ResultsNotAvailable
        ));
        // FAILED 下不允许直接重跑
        assert!(matches!(
            s.begin_run(None).unwrap_err(),
            SessionError::NotConfigured
        ));
        // configure 可恢复
        s.configure(SimulationConfig::default()).unwrap();
        assert_eq!(s.state(), SessionState::Configured);
    }

    #[test]
    fn reconfigure_after_completed_clears_results() {
        let mut s = configured();
        s.begin_run(Some(1)).unwrap();
        s.complete_run(vec![outcome(0)]).unwrap();
        s.configure(SimulationConfig::default()).unwrap();
        assert_eq!(s.state(), SessionState::Configured);
        assert!(matches!(
            s.results().unwrap_err(),
            SessionError::ResultsNotAvailable
        ));
        assert_eq!(s.status().total_events_recorded, 0);
    }

    #[test]
    fn rerun_from_completed_overwrites_results() {
        let mut s = configured();
        s.begin_run(Some(1)).unwrap();
        s.complete_run(vec![outcome(0)]).unwrap();
        s.begin_run(Some(3)).unwrap();
        s.complete_run(vec![outcome(0), outcome(1), outcome(2)]).unwrap();
        let (outcomes, summary) = s.results().unwrap();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(summary.total_events, 3);
    }

    #[test]
    fn save_requires_configured_or_completed() {
        let s = SimulationSession::new();
        assert!(matches!(
            s.config_for_save().unwrap_err(),
            SessionError::NotConfigured
        ));
        let mut s = configured();
        assert!(s.config_for_save().is_ok());
        s.begin_run(None).unwrap();
        s.fail_run();
        assert!(matches!(
            s.config_for_save().unwrap_err(),
            SessionError::NotConfigured
        ));
    }

    #[test]
    fn status_reflects_lifecycle() {
        let mut s = configured();
        assert_eq!(s.status().state, "CONFIGURED");
        assert!(!s.status().results_available);
        s.begin_run(Some(1)).unwrap();
        assert_eq!(s.status().state, "RUNNING");
        s.complete_run(vec![outcome(0)]).unwrap();
        let st = s.status();
        assert_eq!(st.state, "COMPLETED");
        assert!(st.results_available);
        assert_eq!(st.total_events_recorded, 1);
    }
}
