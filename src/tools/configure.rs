//! configure_simulation 工具
//!
//! 支持两种参数形态：
//! 1. 扁平参数（particle_type、particle_energy、cube_size_x、num_events 等），
//!    增量合并到当前配置（未配置时以默认配置为基底）；
//! 2. 配置文档形态（particle / detector / simulation 三段），按段深合并。
//! 合并后的完整配置整体校验，失败时会话保持原状。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{SessionError, SessionManager};
use crate::simulation::SimulationConfig;
use crate::tools::Tool;

pub struct ConfigureSimulationTool {
    manager: Arc<SessionManager>,
}

impl ConfigureSimulationTool {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Tool for ConfigureSimulationTool {
    fn name(&self) -> &str {
        "configure_simulation"
    }

    fn description(&self) -> &str {
        "Configure the simulation: particle type, energy, detector dimensions and material. \
         Accepts flat params (particle_type, particle_energy, particle_position, \
         particle_direction, cube_size_x/y/z, cube_material, num_events, output_file) \
         or the nested configuration document. Returns the stored configuration."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "particle_type": {
                    "type": "string",
                    "description": "Particle type (gamma, e-, e+, proton, neutron, etc.)"
                },
                "particle_energy": {
                    "type": "number",
                    "description": "Particle energy in MeV"
                },
                "particle_position": {
                    "type": "array",
                    "items": { "type": "number" },
                    "description": "Initial position [x, y, z] in cm"
                },
                "particle_direction": {
                    "type": "array",
                    "items": { "type": "number" },
                    "description": "Direction vector [x, y, z] (need not be normalized)"
                },
                "cube_size_x": { "type": "number", "description": "Detector cube X size (cm)" },
                "cube_size_y": { "type": "number", "description": "Detector cube Y size (cm)" },
                "cube_size_z": { "type": "number", "description": "Detector cube Z size (cm)" },
                "cube_material": {
                    "type": "string",
                    "description": "Detector material (G4_WATER, G4_Al, G4_Pb, etc.)"
                },
                "num_events": {
                    "type": "integer",
                    "description": "Number of events to simulate"
                },
                "output_file": {
                    "type": "string",
                    "description": "Results document path"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, SessionError> {
        let base = self
            .manager
            .current_config()
            .await
            .unwrap_or_default();

        let is_document = ["particle", "detector", "simulation"]
            .iter()
            .any(|key| args.get(key).is_some());
        let merged = if is_document {
            merge_document(&base, &args)?
        } else {
            apply_flat(&base, &args)?
        };

        let stored = self.manager.configure(merged).await?;
        Ok(serde_json::json!({
            "message": "Configuration updated successfully",
            "configuration": stored
        }))
    }
}

/// 文档形态：三段各自按键深合并到基底，缺省键保留基底值
fn merge_document(base: &SimulationConfig, args: &Value) -> Result<SimulationConfig, SessionError> {
    let mut doc = serde_json::to_value(base)
        .map_err(|e| SessionError::InvalidConfiguration(format!("internal: {e}")))?;
    for section in ["particle", "detector", "simulation"] {
        if let Some(patch) = args.get(section) {
            let target = &mut doc[section];
            let patch = patch.as_object().ok_or_else(|| {
                SessionError::InvalidConfiguration(format!("{section}: must be an object"))
            })?;
            for (key, value) in patch {
                target[key.as_str()] = value.clone();
            }
        }
    }
    serde_json::from_value(doc)
        .map_err(|e| SessionError::InvalidConfiguration(format!("configuration document: {e}")))
}

/// 扁平形态：出现哪个参数就改哪个字段
fn apply_flat(base: &SimulationConfig, args: &Value) -> Result<SimulationConfig, SessionError> {
    let mut cfg = base.clone();
    if let Some(v) = args.get("particle_type") {
        cfg.particle.kind = want_str("particle_type", v)?;
    }
    if let Some(v) = args.get("particle_energy") {
        cfg.particle.energy_mev = want_f64("particle_energy", v)?;
    }
    if let Some(v) = args.get("particle_position") {
        cfg.particle.position = want_vec3("particle_position", v)?;
    }
    if let Some(v) = args.get("particle_direction") {
        cfg.particle.direction = want_vec3("particle_direction", v)?;
    }
    if let Some(v) = args.get("cube_size_x") {
        cfg.detector.cube_size_x_cm = want_f64("cube_size_x", v)?;
    }
    if let Some(v) = args.get("cube_size_y") {
        cfg.detector.cube_size_y_cm = want_f64("cube_size_y", v)?;
    }
    if let Some(v) = args.get("cube_size_z") {
        cfg.detector.cube_size_z_cm = want_f64("cube_size_z", v)?;
    }
    if let Some(v) = args.get("cube_material") {
        cfg.detector.material = want_str("cube_material", v)?;
    }
    if let Some(v) = args.get("num_events") {
        cfg.simulation.num_events = want_u32("num_events", v)?;
    }
    if let Some(v) = args.get("output_file") {
        cfg.simulation.output_file = want_str("output_file", v)?;
    }
    Ok(cfg)
}

fn want_str(field: &str, v: &Value) -> Result<String, SessionError> {
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| SessionError::InvalidConfiguration(format!("{field}: must be a string")))
}

fn want_f64(field: &str, v: &Value) -> Result<f64, SessionError> {
    v.as_f64()
        .ok_or_else(|| SessionError::InvalidConfiguration(format!("{field}: must be a number")))
}

fn want_u32(field: &str, v: &Value) -> Result<u32, SessionError> {
    v.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            SessionError::InvalidConfiguration(format!("{field}: must be a non-negative integer"))
        })
}

fn want_vec3(field: &str, v: &Value) -> Result<[f64; 3], SessionError> {
    let items = v.as_array().ok_or_else(|| {
        SessionError::InvalidConfiguration(format!("{field}: must be an array of 3 numbers"))
    })?;
    if items.len() != 3 {
        return Err(SessionError::InvalidConfiguration(format!(
            "{field}: must have exactly 3 components (got {})",
            items.len()
        )));
    }
    let mut out = [0.0; 3];
    for (i, item) in items.iter().enumerate() {
        out[i] = item.as_f64().ok_or_else(|| {
            SessionError::InvalidConfiguration(format!("{field}[{i}]: must be a number"))
        })?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_args_overlay_base() {
        let base = SimulationConfig::default();
        let cfg = apply_flat(
            &base,
            &serde_json::json!({
                "particle_type": "e-",
                "particle_energy": 5.0,
                "cube_material": "G4_Pb",
                "num_events": 500
            }),
        )
        .unwrap();
        assert_eq!(cfg.particle.kind, "e-");
        assert_eq!(cfg.particle.energy_mev, 5.0);
        assert_eq!(cfg.detector.material, "G4_Pb");
        assert_eq!(cfg.simulation.num_events, 500);
        // 未提及的字段不动
        assert_eq!(cfg.particle.position, base.particle.position);
        assert_eq!(cfg.detector.cube_size_x_cm, 10.0);
    }

    #[test]
    fn flat_type_errors_are_named() {
        let base = SimulationConfig::default();
        let err = apply_flat(&base, &serde_json::json!({"particle_energy": "high"})).unwrap_err();
        assert!(err.to_string().contains("particle_energy"));

        let err =
            apply_flat(&base, &serde_json::json!({"particle_position": [1, 2]})).unwrap_err();
        assert!(err.to_string().contains("3 components"));
    }

    #[test]
    fn document_sections_merge_partially() {
        let base = SimulationConfig::default();
        let cfg = merge_document(
            &base,
            &serde_json::json!({
                "particle": {"type": "proton", "energy_MeV": 250.0},
                "simulation": {"num_events": 1000}
            }),
        )
        .unwrap();
        assert_eq!(cfg.particle.kind, "proton");
        assert_eq!(cfg.particle.energy_mev, 250.0);
        assert_eq!(cfg.simulation.num_events, 1000);
        // simulation 段其余键保留
        assert_eq!(cfg.simulation.output_file, base.simulation.output_file);
        assert_eq!(cfg.detector, base.detector);
    }

    #[test]
    fn document_with_wrong_section_type_rejected() {
        let base = SimulationConfig::default();
        let err = merge_document(&base, &serde_json::json!({"particle": 7})).unwrap_err();
        assert!(err.to_string().contains("particle: must be an object"));
    }
}
