//! 模拟配置
//!
//! SimulationConfig 与配置文档（JSON）一一对应：particle / detector / simulation 三段。
//! 校验遵循「先到先报」：发现第一个非法字段即失败，消息注明字段与原因；
//! 未知粒子 / 材料直接拒绝，绝不静默替换默认值。

use serde::{Deserialize, Serialize};

/// 已知粒子与 PDG 编码
pub const PARTICLES: &[(&str, i32)] = &[
    ("gamma", 22),
    ("e-", 11),
    ("e+", -11),
    ("proton", 2212),
    ("neutron", 2112),
    ("mu-", 13),
    ("mu+", -13),
    ("pi+", 211),
    ("pi-", -211),
    ("alpha", 1000020040),
];

/// 已知探测器材料（G4 NIST 子集）
pub const MATERIALS: &[&str] = &[
    "G4_WATER",
    "G4_AIR",
    "G4_Al",
    "G4_Pb",
    "G4_Fe",
    "G4_Cu",
    "G4_Si",
    "G4_Ge",
    "G4_NaI",
    "G4_CsI",
    "G4_CONCRETE",
    "G4_GRAPHITE",
];

/// 能量上限（MeV），1 TeV
pub const MAX_ENERGY_MEV: f64 = 1.0e6;
/// 立方体边长上限（cm）
pub const MAX_CUBE_SIZE_CM: f64 = 1.0e4;
/// 单次 run 事件数上限
pub const MAX_NUM_EVENTS: u32 = 10_000_000;

/// 粒子枪参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// 粒子类型（gamma、e-、proton 等，见 PARTICLES）
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "energy_MeV")]
    pub energy_mev: f64,
    /// 初始位置 [x, y, z]（cm）
    #[serde(rename = "position_cm")]
    pub position: [f64; 3],
    /// 方向向量，允许未归一化，但不能为零向量
    pub direction: [f64; 3],
}

/// 立方体探测器参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub cube_size_x_cm: f64,
    pub cube_size_y_cm: f64,
    pub cube_size_z_cm: f64,
    pub material: String,
}

/// 运行参数（文档中的 "simulation" 段）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub num_events: u32,
    pub output_file: String,
}

/// 完整模拟配置；通过 validate 后才允许进入会话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub particle: ParticleConfig,
    pub detector: DetectorConfig,
    pub simulation: RunConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle: ParticleConfig {
                kind: "gamma".to_string(),
                energy_mev: 1.0,
                position: [0.0, 0.0, -10.0],
                direction: [0.0, 0.0, 1.0],
            },
            detector: DetectorConfig {
                cube_size_x_cm: 10.0,
                cube_size_y_cm: 10.0,
                cube_size_z_cm: 10.0,
                material: "G4_WATER".to_string(),
            },
            simulation: RunConfig {
                num_events: 100,
                output_file: "output/simulation_results.json".to_string(),
            },
        }
    }
}

impl SimulationConfig {
    /// 校验所有字段；返回第一个违规处的字段名与原因
    pub fn validate(&self) -> Result<(), String> {
        if !PARTICLES.iter().any(|(name, _)| *name == self.particle.kind) {
            return Err(format!(
                "particle.type: unknown particle '{}' (known: {})",
                self.particle.kind,
                particle_names().join(", ")
            ));
        }
        check_finite("particle.energy_MeV", self.particle.energy_mev)?;
        if self.particle.energy_mev <= 0.0 {
            return Err(format!(
                "particle.energy_MeV: must be > 0 (got {})",
                self.particle.energy_mev
            ));
        }
        if self.particle.energy_mev > MAX_ENERGY_MEV {
            return Err(format!(
                "particle.energy_MeV: must be <= {} (got {})",
                MAX_ENERGY_MEV, self.particle.energy_mev
            ));
        }
        check_vec3("particle.position_cm", &self.particle.position)?;
        check_vec3("particle.direction", &self.particle.direction)?;
        if self.particle.direction.iter().all(|c| *c == 0.0) {
            return Err("particle.direction: must not be the zero vector".to_string());
        }

        let sides = [
            ("detector.cube_size_x_cm", self.detector.cube_size_x_cm),
            ("detector.cube_size_y_cm", self.detector.cube_size_y_cm),
            ("detector.cube_size_z_cm", self.detector.cube_size_z_cm),
        ];
        for (field, value) in sides {
            check_finite(field, value)?;
            if value <= 0.0 {
                return Err(format!("{}: must be > 0 (got {})", field, value));
            }
            if value > MAX_CUBE_SIZE_CM {
                return Err(format!(
                    "{}: must be <= {} (got {})",
                    field, MAX_CUBE_SIZE_CM, value
                ));
            }
        }
        if !MATERIALS.contains(&self.detector.material.as_str()) {
            return Err(format!(
                "detector.material: unknown material '{}' (known: {})",
                self.detector.material,
                MATERIALS.join(", ")
            ));
        }

        if self.simulation.num_events < 1 {
            return Err(format!(
                "simulation.num_events: must be >= 1 (got {})",
                self.simulation.num_events
            ));
        }
        if self.simulation.num_events > MAX_NUM_EVENTS {
            return Err(format!(
                "simulation.num_events: must be <= {} (got {})",
                MAX_NUM_EVENTS, self.simulation.num_events
            ));
        }
        if self.simulation.output_file.is_empty() {
            return Err("simulation.output_file: must not be empty".to_string());
        }

        Ok(())
    }

    /// 粒子的 PDG 编码；仅对已通过 validate 的配置调用
    pub fn particle_pdg(&self) -> i32 {
        PARTICLES
            .iter()
            .find(|(name, _)| *name == self.particle.kind)
            .map(|(_, pdg)| *pdg)
            .unwrap_or(0)
    }
}

fn particle_names() -> Vec<&'static str> {
    PARTICLES.iter().map(|(name, _)| *name).collect()
}

fn check_finite(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{}: must be finite (got {})", field, value))
    }
}

fn check_vec3(field: &str, v: &[f64; 3]) -> Result<(), String> {
    for (i, c) in v.iter().enumerate() {
        if !c.is_finite() {
            return Err(format!("{}[{}]: must be finite (got {})", field, i, c));
        }
    }
    Ok(())
}
