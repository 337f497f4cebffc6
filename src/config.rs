//! Simulation parameters, their defaults and validation.

use crate::error::{FluidError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Semi-Lagrangian advection accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvectionMode {
    /// Single backward trace.
    Simple,
    /// Back-and-forth error compensation (three extra samples per cell).
    Bfecc,
}

/// What happens at the domain edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryMode {
    /// Periodic addressing, flow leaving one edge re-enters at the opposite one.
    Wrap,
    /// Clamp-to-edge addressing with a zero-velocity border ring.
    Bounded,
}

/// Timing and strength of the autonomous demo motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotParams {
    pub enabled: bool,
    /// Seconds without pointer input before the autopilot takes over
    pub idle_delay: f32,
    /// Seconds the user takeover interpolation lasts
    pub handoff_duration: f32,
    /// Seconds for the autopilot to reach full speed
    pub ramp_duration: f32,
    /// NDC units per second
    pub speed: f32,
    /// Displacement multiplier while autonomous
    pub intensity: f32,
}

impl Default for AutopilotParams {
    fn default() -> Self {
        Self {
            enabled: true,
            idle_delay: 3.0,
            handoff_duration: 0.25,
            ramp_duration: 0.6,
            speed: 0.5,
            intensity: 2.2,
        }
    }
}

/// Everything the stages and the orchestrator need to know.
///
/// Passed by reference into every stage call. Runtime changes go through
/// [`crate::Orchestrator::apply_params`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Grid size relative to the display size
    pub resolution_scale: f32,
    pub timestep: f32,
    pub force_multiplier: f32,
    /// Half extent of the force injection square, in grid cells. When the
    /// square plus `force_edge_margin` cannot fit inside an axis (roughly
    /// fewer than `2 * influence_radius` cells), injection on that axis is
    /// pinned to the domain centre whatever the pointer position.
    pub influence_radius: f32,
    /// Extra clearance between the injection square and the domain edge, in
    /// units of half a cell (NDC pixel size)
    pub force_edge_margin: f32,
    pub viscosity_enabled: bool,
    pub viscosity_coefficient: f32,
    pub viscosity_iterations: usize,
    pub pressure_iterations: usize,
    pub advection_mode: AdvectionMode,
    pub boundary_mode: BoundaryMode,
    pub autopilot: AutopilotParams,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            resolution_scale: 0.5,
            timestep: 0.014,
            force_multiplier: 20.0,
            influence_radius: 50.0,
            force_edge_margin: 2.0,
            viscosity_enabled: false,
            viscosity_coefficient: 30.0,
            viscosity_iterations: 32,
            pressure_iterations: 32,
            advection_mode: AdvectionMode::Bfecc,
            boundary_mode: BoundaryMode::Wrap,
            autopilot: AutopilotParams::default(),
        }
    }
}

impl SimulationParams {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let params = Self::from_json_str(&contents)?;
        log::info!("loaded simulation parameters from {}", path.display());
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects anything that would hang a solver, divide by zero or build a
    /// degenerate grid. Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        positive("resolution_scale", self.resolution_scale)?;
        positive("timestep", self.timestep)?;
        positive("influence_radius", self.influence_radius)?;
        non_negative("force_multiplier", self.force_multiplier)?;
        non_negative("force_edge_margin", self.force_edge_margin)?;
        non_negative("viscosity_coefficient", self.viscosity_coefficient)?;

        if self.pressure_iterations == 0 {
            return Err(FluidError::InvalidConfig(
                "pressure_iterations must be at least 1".into(),
            ));
        }
        if self.viscosity_enabled && self.viscosity_iterations == 0 {
            return Err(FluidError::InvalidConfig(
                "viscosity_iterations must be at least 1 when viscosity is enabled".into(),
            ));
        }

        let auto = &self.autopilot;
        non_negative("autopilot.idle_delay", auto.idle_delay)?;
        non_negative("autopilot.handoff_duration", auto.handoff_duration)?;
        non_negative("autopilot.ramp_duration", auto.ramp_duration)?;
        non_negative("autopilot.intensity", auto.intensity)?;
        positive("autopilot.speed", auto.speed)?;

        Ok(())
    }

    /// Grid dimensions for a display of `display_width × display_height`.
    pub fn grid_size(&self, display_width: u32, display_height: u32) -> (usize, usize) {
        let scale = |d: u32| ((self.resolution_scale * d as f32).round() as usize).max(1);
        (scale(display_width), scale(display_height))
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FluidError::InvalidConfig(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FluidError::InvalidConfig(format!(
            "{name} must be a non-negative finite number, got {value}"
        )))
    }
}
