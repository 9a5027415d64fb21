//! 逐事件结果与汇总
//!
//! TrialOutcome 与结果文档中的单条记录同形；aggregate 是纯函数，
//! 相同输入永远给出相同汇总，汇总永远可以从完整结果列表重算。

use serde::{Deserialize, Serialize};

use crate::core::SessionError;
use crate::simulation::SimulationConfig;

/// 初级粒子（真值）：每个事件记录一份
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryVertex {
    pub particle: String,
    #[serde(rename = "energy_MeV")]
    pub energy_mev: f64,
    pub position: [f64; 3],
    pub direction: [f64; 3],
}

/// 单个事件的结果记录；产生后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub event_id: u32,
    pub primary: PrimaryVertex,
    #[serde(rename = "energy_deposited_MeV")]
    pub energy_deposited_mev: f64,
    pub tracks_created: u32,
    pub interactions: u32,
}

/// 一次完成 run 的汇总统计；永远由结果列表推导，不独立持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub total_events: u64,
    #[serde(rename = "total_energy_deposited_MeV")]
    pub total_energy_deposited_mev: f64,
    #[serde(rename = "avg_energy_deposited_MeV")]
    pub avg_energy_deposited_mev: f64,
}

/// 写入磁盘的结果文档：配置 + 逐事件结果 + 汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsDocument {
    pub config: SimulationConfig,
    pub results: Vec<TrialOutcome>,
    pub summary: ResultsSummary,
}

/// 对结果列表做汇总；空列表返回 EmptyResultSet
pub fn aggregate(outcomes: &[TrialOutcome]) -> Result<ResultsSummary, SessionError> {
    if outcomes.is_empty() {
        return Err(SessionError::EmptyResultSet);
    }
    let total: f64 = outcomes.iter().map(|o| o.energy_deposited_mev).sum();
    let n = outcomes.len() as u64;
    Ok(ResultsSummary {
        total_events: n,
        total_energy_deposited_mev: total,
        avg_energy_deposited_mev: total / n as f64,
    })
}

/// 人读的运行摘要（run_simulation 响应里附带）
pub fn render_summary(config: &SimulationConfig, summary: &ResultsSummary) -> String {
    format!(
        "Simulation Summary:\n  \
         Total Events: {}\n  \
         Particle Type: {}\n  \
         Initial Energy: {} MeV\n  \
         Total Energy Deposited: {:.4} MeV\n  \
         Average Energy Deposited: {:.4} MeV\n  \
         Detector Material: {}\n  \
         Detector Size: {} x {} x {} cm³",
        summary.total_events,
        config.particle.kind,
        config.particle.energy_mev,
        summary.total_energy_deposited_mev,
        summary.avg_energy_deposited_mev,
        config.detector.material,
        config.detector.cube_size_x_cm,
        config.detector.cube_size_y_cm,
        config.detector.cube_size_z_cm,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(event_id: u32, deposited: f64) -> TrialOutcome {
        TrialOutcome {
            event_id,
            primary: PrimaryVertex {
                particle: "gamma".to_string(),
                energy_mev: 1.0,
                position: [0.0, 0.0, -10.0],
                direction: [0.0, 0.0, 1.0],
            },
            energy_deposited_mev: deposited,
            tracks_created: 3,
            interactions: 2,
        }
    }

    #[test]
    fn aggregate_sums_exactly() {
        let outcomes = vec![outcome(0, 0.25), outcome(1, 0.5), outcome(2, 0.25)];
        let summary = aggregate(&outcomes).unwrap();
        assert_eq!(summary.total_events, 3);
        assert_eq!(summary.total_energy_deposited_mev, 1.0);
        assert_eq!(summary.avg_energy_deposited_mev, 1.0 / 3.0);
    }

    #[test]
    fn aggregate_is_deterministic() {
        let outcomes = vec![outcome(0, 0.125), outcome(1, 0.75)];
        let a = aggregate(&outcomes).unwrap();
        let b = aggregate(&outcomes).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn aggregate_empty_fails() {
        let err = aggregate(&[]).unwrap_err();
        assert!(matches!(err, SessionError::EmptyResultSet));
    }

    #[test]
    fn single_outcome_average_equals_total() {
        let summary = aggregate(&[outcome(0, 0.7)]).unwrap();
        assert_eq!(summary.total_events, 1);
        assert_eq!(summary.avg_energy_deposited_mev, summary.total_energy_deposited_mev);
    }

    #[test]
    fn outcome_document_shape() {
        let json = serde_json::to_value(outcome(7, 0.5)).unwrap();
        assert_eq!(json["event_id"], 7);
        assert_eq!(json["energy_deposited_MeV"], 0.5);
        assert_eq!(json["primary"]["particle"], "gamma");
        assert_eq!(json["primary"]["energy_MeV"], 1.0);
    }
}
