//! 会话管理器
//!
//! 持有唯一会话（Arc<RwLock>）与引擎句柄，实现六个操作的完整语义：
//! run 走「begin → 引擎执行 → commit / fail」三段，引擎执行期间不持锁，
//! 因此状态查询在 run 进行中依然即时返回 RUNNING。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::session::{SessionState, SimulationSession, StatusReport};
use crate::core::SessionError;
use crate::simulation::{
    render_summary, ResultsDocument, ResultsSummary, SimulationConfig, TrialExecutor, TrialOutcome,
};

/// run_simulation 的成功载荷
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: ResultsSummary,
    pub summary_text: String,
    pub output_file: String,
}

/// 会话管理器：六个操作的唯一入口
pub struct SessionManager {
    session: Arc<RwLock<SimulationSession>>,
    engine: Arc<dyn TrialExecutor>,
}

impl SessionManager {
    pub fn new(engine: Arc<dyn TrialExecutor>) -> Self {
        Self {
            session: Arc::new(RwLock::new(SimulationSession::new())),
            engine,
        }
    }

    /// 校验并存入完整配置；成功后丢弃旧结果
    pub async fn configure(&self, config: SimulationConfig) -> Result<SimulationConfig, SessionError> {
        let mut session = self.session.write().await;
        session.configure(config)?;
        // configure 刚成功，配置必然在
        session
            .config()
            .cloned()
            .ok_or(SessionError::NotConfigured)
    }

    /// 当前配置快照（configure_simulation 的增量合并基底）
    pub async fn current_config(&self) -> Option<SimulationConfig> {
        self.session.read().await.config().cloned()
    }

    pub async fn state(&self) -> SessionState {
        self.session.read().await.state()
    }

    pub async fn status(&self) -> StatusReport {
        self.session.read().await.status()
    }

    /// 引擎物理列表名（状态展示）
    pub fn physics_list(&self) -> String {
        self.engine.physics_list().to_string()
    }

    /// 同步阻塞语义的 run：直到全部事件完成或引擎报错才返回。
    /// 引擎少给/多给结果都按执行失败处理，绝不提交不完整的一次 run。
    pub async fn run(&self, num_events_override: Option<u32>) -> Result<RunReport, SessionError> {
        let (config, num_events) = {
            let mut session = self.session.write().await;
            session.begin_run(num_events_override)?
        };
        tracing::info!(
            particle = %config.particle.kind,
            energy_mev = config.particle.energy_mev,
            num_events,
            "starting simulation run"
        );

        let executed = self.engine.execute(&config, num_events).await;

        let mut session = self.session.write().await;
        let outcomes = match executed {
            Ok(outcomes) if outcomes.len() == num_events as usize => outcomes,
            Ok(outcomes) => {
                session.fail_run();
                return Err(SessionError::EngineExecution(format!(
                    "engine returned {} outcomes, expected {}",
                    outcomes.len(),
                    num_events
                )));
            }
            Err(e) => {
                session.fail_run();
                tracing::warn!(error = %e, "simulation run failed");
                return Err(SessionError::EngineExecution(e.to_string()));
            }
        };

        let summary = session.complete_run(outcomes)?;
        let (results, _) = session.results()?;
        let document = ResultsDocument {
            config: config.clone(),
            results: results.to_vec(),
            summary: summary.clone(),
        };
        drop(session);

        // 结果文件写失败不回滚会话：run 本身已成功，结果仍可在内存中取到
        write_document(Path::new(&config.simulation.output_file), &document)?;
        tracing::info!(output_file = %config.simulation.output_file, "results written");

        Ok(RunReport {
            summary_text: render_summary(&config, &summary),
            summary,
            output_file: config.simulation.output_file,
        })
    }

    /// COMPLETED 下返回结果列表与汇总的克隆
    pub async fn fetch_results(
        &self,
    ) -> Result<(Vec<TrialOutcome>, ResultsSummary), SessionError> {
        let session = self.session.read().await;
        let (outcomes, summary) = session.results()?;
        Ok((outcomes.to_vec(), summary.clone()))
    }

    /// 序列化当前配置到 path（父目录自动创建）
    pub async fn save_configuration(&self, path: &Path) -> Result<PathBuf, SessionError> {
        let session = self.session.read().await;
        let config = session.config_for_save()?;
        write_document(path, config)?;
        tracing::info!(path = %path.display(), "configuration saved");
        Ok(path.to_path_buf())
    }

    /// 从 path 读取配置文档，校验通过后成为当前配置（任意状态可调用）
    pub async fn load_configuration(&self, path: &Path) -> Result<SimulationConfig, SessionError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Io(format!("read {}: {}", path.display(), e)))?;
        // 解析失败按非法配置处理，不是 IO 问题
        let config: SimulationConfig = serde_json::from_str(&raw).map_err(|e| {
            SessionError::InvalidConfiguration(format!("malformed configuration document: {e}"))
        })?;
        let stored = self.configure(config).await?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(stored)
    }
}

fn write_document<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::Io(format!("create {}: {}", parent.display(), e)))?;
        }
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| SessionError::Io(format!("serialize: {e}")))?;
    std::fs::write(path, json)
        .map_err(|e| SessionError::Io(format!("write {}: {}", path.display(), e)))
}
