//! Frame loop: pointer resolution, autopilot and stage sequencing.

use crate::autopilot::AutopilotDriver;
use crate::config::SimulationParams;
use crate::error::{FluidError, Result};
use crate::fields::FieldSet;
use crate::grid::VectorGrid;
use crate::input::{InputEvent, InputSource, InputSubscription};
use crate::pointer::{PointerMode, PointerState};
use crate::stages::{
    ForceImpulse, advect, apply_force, diffuse, divergence, solve_pressure, subtract_gradient,
};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// Runs one frame of the solver over `fields`:
/// advection, force, optional viscosity, divergence, pressure, correction.
/// The corrected field ends up in `fields.velocity`.
pub fn simulate_frame(fields: &mut FieldSet, params: &SimulationParams, impulse: &ForceImpulse) {
    let FieldSet {
        velocity,
        advected,
        viscous,
        divergence: div,
        pressure,
    } = fields;
    let dt = params.timestep;
    let boundary = params.boundary_mode;

    advect(velocity, advected, dt, params.advection_mode, boundary);
    apply_force(advected, impulse, params);

    let forced: &VectorGrid = if params.viscosity_enabled {
        let slot = diffuse(
            advected,
            viscous,
            params.viscosity_coefficient,
            dt,
            params.viscosity_iterations,
            boundary,
        );
        viscous.slot(slot)
    } else {
        advected
    };

    divergence(forced, div, dt, boundary);
    let slot = solve_pressure(div, pressure, params.pressure_iterations, boundary);
    subtract_gradient(forced, pressure.slot(slot), velocity, dt, boundary);
}

/// Owns the grids, the pointer and the autopilot for one simulation.
///
/// `tick` is the per-frame entry point. It takes `&mut self`, so a frame can
/// never start while another is still running.
#[derive(Debug)]
pub struct Orchestrator {
    params: SimulationParams,
    fields: FieldSet,
    pointer: PointerState,
    autopilot: AutopilotDriver,
    input: InputSubscription,
    display: (u32, u32),
    pending_resize: Option<(u32, u32)>,
    time: f64,
    frame: u64,
    state: RunState,
}

impl Orchestrator {
    pub fn new(
        params: SimulationParams,
        display_width: u32,
        display_height: u32,
        input: &dyn InputSource,
    ) -> Result<Self> {
        params.validate()?;
        check_display(display_width, display_height)?;

        let (width, height) = params.grid_size(display_width, display_height);
        log::info!(
            "fluid grid {width}x{height} for display {display_width}x{display_height}"
        );

        Ok(Self {
            fields: FieldSet::new(width, height),
            params,
            pointer: PointerState::new(0.0),
            autopilot: AutopilotDriver::new(),
            input: input.subscribe(),
            display: (display_width, display_height),
            pending_resize: None,
            time: 0.0,
            frame: 0,
            state: RunState::Running,
        })
    }

    /// Replaces the autopilot's random source with a seeded one.
    pub fn with_autopilot_seed(mut self, seed: u64) -> Self {
        self.autopilot = AutopilotDriver::seeded(seed);
        self
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn velocity(&self) -> &VectorGrid {
        &self.fields.velocity
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn pointer_mode(&self) -> PointerMode {
        self.pointer.mode()
    }

    pub fn autopilot(&self) -> &AutopilotDriver {
        &self.autopilot
    }

    pub fn display_size(&self) -> (u32, u32) {
        self.display
    }

    pub fn grid_size(&self) -> (usize, usize) {
        (self.fields.width(), self.fields.height())
    }

    /// Simulated seconds so far.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    /// Stops frame processing. Grid state is kept as is.
    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            log::debug!("simulation paused at frame {}", self.frame);
            self.state = RunState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == RunState::Paused {
            log::debug!("simulation resumed at frame {}", self.frame);
            self.state = RunState::Running;
        }
    }

    /// Queues a display resize for the next frame boundary. A zero dimension
    /// is rejected and the current size stays.
    pub fn request_resize(&mut self, display_width: u32, display_height: u32) -> Result<()> {
        check_display(display_width, display_height)?;
        self.pending_resize = Some((display_width, display_height));
        Ok(())
    }

    /// Swaps in new parameters, reallocating the grids if the resolution
    /// changed. Invalid parameters leave the current ones in place.
    pub fn apply_params(&mut self, params: SimulationParams) -> Result<()> {
        params.validate()?;
        let (width, height) = params.grid_size(self.display.0, self.display.1);
        if (width, height) != self.grid_size() {
            log::info!("resolution change reallocates grid to {width}x{height}");
            self.fields.resize(width, height);
        }
        if !params.autopilot.enabled && self.autopilot.is_active() {
            self.autopilot.deactivate();
            self.pointer.set_autonomous(false);
        }
        self.params = params;
        Ok(())
    }

    /// Advances one frame. Returns `false` without doing any work while
    /// paused.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.state == RunState::Paused {
            return false;
        }

        self.apply_pending_resize();

        let now = self.time + elapsed.as_secs_f64();
        self.drain_input(now);
        self.update_autopilot(now);

        let displacement = self.pointer.resolve_frame(now, &self.params.autopilot);
        let impulse = ForceImpulse::new(self.pointer.position(), displacement);
        simulate_frame(&mut self.fields, &self.params, &impulse);

        self.time = now;
        self.frame += 1;
        true
    }

    /// Runs the solver stages with an explicit impulse, bypassing pointer
    /// and autopilot handling.
    pub fn step_with_impulse(&mut self, impulse: ForceImpulse) {
        self.apply_pending_resize();
        simulate_frame(&mut self.fields, &self.params, &impulse);
        self.frame += 1;
    }

    fn apply_pending_resize(&mut self) {
        let Some((display_width, display_height)) = self.pending_resize.take() else {
            return;
        };
        self.display = (display_width, display_height);

        let (width, height) = self.params.grid_size(display_width, display_height);
        if (width, height) != self.grid_size() {
            log::info!(
                "resizing grid {}x{} -> {width}x{height}",
                self.fields.width(),
                self.fields.height()
            );
            self.fields.resize(width, height);
        }
    }

    fn drain_input(&mut self, now: f64) {
        for event in self.input.drain() {
            match event {
                InputEvent::PointerMove(position) => self.pointer.on_pointer_move(position, now),
                InputEvent::TouchStart(position) => self.pointer.on_touch_start(position, now),
                InputEvent::TouchMove(position) => self.pointer.on_touch_move(position, now),
                InputEvent::PointerLeave | InputEvent::TouchEnd => self.pointer.on_leave(),
            }
        }
    }

    fn update_autopilot(&mut self, now: f64) {
        let auto = &self.params.autopilot;
        if !auto.enabled {
            return;
        }

        let idle = now - self.pointer.last_user_input();
        if idle < auto.idle_delay as f64 || self.pointer.is_hover_inside() {
            if self.autopilot.is_active() {
                log::debug!("autopilot released after user input");
                self.autopilot.deactivate();
                self.pointer.set_autonomous(false);
            }
            return;
        }

        if !self.autopilot.is_active() {
            log::debug!("autopilot engaged after {idle:.2}s idle");
            self.autopilot.activate(self.pointer.position(), now);
            self.pointer.set_autonomous(true);
        }

        let position = self.autopilot.update(now, auto);
        self.pointer.set_autonomous_position(position);
    }
}

fn check_display(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        log::warn!("rejecting display size {width}x{height}");
        return Err(FluidError::InvalidResize { width, height });
    }
    Ok(())
}
