//! 引擎适配层
//!
//! 所有物理引擎绑定实现 TrialExecutor：给定已校验的配置与事件数，
//! 按事件序返回等长的结果列表，或整体报错（调用方不保留部分结果）。
//! SamplingEngine 是内置替身：几何/物理语义全在真实引擎里，这里只按
//! 原始分布抽样逐事件观测量，供无 GEANT4 环境下联调与测试。

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::Mutex;

use crate::simulation::results::{PrimaryVertex, TrialOutcome};
use crate::simulation::SimulationConfig;

/// 引擎层错误：包一层底层报错原文
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct EngineError(pub String);

/// 引擎适配 trait：一次 execute 完成 num_events 个独立事件
#[async_trait]
pub trait TrialExecutor: Send + Sync {
    /// 执行 num_events 个事件，按 event_id 0..num_events 顺序返回
    async fn execute(
        &self,
        config: &SimulationConfig,
        num_events: u32,
    ) -> Result<Vec<TrialOutcome>, EngineError>;

    /// 物理列表名（状态展示用）
    fn physics_list(&self) -> &str {
        "FTFP_BERT"
    }
}

/// 内置抽样引擎：沉积能量 ~ U(0, 真值能量)，径迹数 1..=10，相互作用数 1..=5
pub struct SamplingEngine {
    physics_list: String,
    rng: Mutex<ChaCha8Rng>,
}

impl SamplingEngine {
    /// seed 为 None 时从系统熵初始化；注入种子可复现整条结果序列
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            physics_list: "FTFP_BERT".to_string(),
            rng: Mutex::new(rng),
        }
    }

    /// 替换物理列表名（来自 [engine] 配置段）
    pub fn with_physics_list(mut self, name: impl Into<String>) -> Self {
        self.physics_list = name.into();
        self
    }
}

#[async_trait]
impl TrialExecutor for SamplingEngine {
    async fn execute(
        &self,
        config: &SimulationConfig,
        num_events: u32,
    ) -> Result<Vec<TrialOutcome>, EngineError> {
        tracing::info!(
            material = %config.detector.material,
            size_x_cm = config.detector.cube_size_x_cm,
            size_y_cm = config.detector.cube_size_y_cm,
            size_z_cm = config.detector.cube_size_z_cm,
            "constructing detector"
        );
        tracing::info!(physics_list = %self.physics_list, "physics list ready");

        let mut rng = self.rng.lock().await;
        let mut outcomes = Vec::with_capacity(num_events as usize);
        for event_id in 0..num_events {
            outcomes.push(sample_event(config, event_id, &mut *rng));
            if (event_id + 1) % 1000 == 0 {
                tracing::debug!(processed = event_id + 1, total = num_events, "tracking");
            }
        }
        tracing::info!(events = num_events, "simulation pass completed");
        Ok(outcomes)
    }

    fn physics_list(&self) -> &str {
        &self.physics_list
    }
}

fn sample_event(config: &SimulationConfig, event_id: u32, rng: &mut impl Rng) -> TrialOutcome {
    let truth = config.particle.energy_mev;
    TrialOutcome {
        event_id,
        primary: PrimaryVertex {
            particle: config.particle.kind.clone(),
            energy_mev: truth,
            position: config.particle.position,
            direction: config.particle.direction,
        },
        energy_deposited_mev: rng.gen_range(0.0..truth),
        tracks_created: rng.gen_range(1..=10),
        interactions: rng.gen_range(1..=5),
    }
}
