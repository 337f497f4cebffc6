use crate::config::AutopilotParams;
use crate::pointer::smoothstep;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Distance at which the current target counts as reached.
pub const RETARGET_DISTANCE: f32 = 0.01;

/// Keeps targets this far inside the `[-1, 1]` square.
pub const TARGET_MARGIN: f32 = 0.2;

// Frame gaps longer than this (tab switch, pause) advance by a nominal frame.
const MAX_FRAME_GAP: f64 = 0.2;
const NOMINAL_FRAME: f64 = 0.016;

/// Steers an imaginary pointer toward random interior targets while nobody
/// is using the real one.
#[derive(Debug, Clone)]
pub struct AutopilotDriver {
    active: bool,
    current: Vec2,
    target: Vec2,
    last_update: f64,
    activated_at: f64,
    margin: f32,
    rng: StdRng,
}

impl AutopilotDriver {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic target sequence, for tests and recorded runs.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut driver = Self {
            active: false,
            current: Vec2::ZERO,
            target: Vec2::ZERO,
            last_update: 0.0,
            activated_at: 0.0,
            margin: TARGET_MARGIN,
            rng,
        };
        driver.pick_new_target();
        driver
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn position(&self) -> Vec2 {
        self.current
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    /// Starts driving from `from`; the speed ramp restarts at `now`.
    pub fn activate(&mut self, from: Vec2, now: f64) {
        self.active = true;
        self.current = from;
        self.last_update = now;
        self.activated_at = now;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn pick_new_target(&mut self) {
        let extent = 1.0 - self.margin;
        self.target = Vec2::new(
            self.rng.gen_range(-1.0..=1.0f32) * extent,
            self.rng.gen_range(-1.0..=1.0f32) * extent,
        );
    }

    /// Moves toward the target and returns the new position. Once within
    /// [`RETARGET_DISTANCE`] a new target is drawn and the position holds
    /// for that call.
    ///
    /// A call at the activation time itself does not move: no time has
    /// passed and the speed ramp is still at zero. Every later call with
    /// time advancing moves strictly closer to the target.
    pub fn update(&mut self, now: f64, params: &AutopilotParams) -> Vec2 {
        let mut dt = now - self.last_update;
        self.last_update = now;
        if dt > MAX_FRAME_GAP {
            dt = NOMINAL_FRAME;
        }

        let to_target = self.target - self.current;
        let dist = to_target.length();
        if dist < RETARGET_DISTANCE {
            self.pick_new_target();
            return self.current;
        }

        let ramp = if params.ramp_duration > 0.0 {
            smoothstep(((now - self.activated_at) / params.ramp_duration as f64) as f32)
        } else {
            1.0
        };

        let step = params.speed * dt.max(0.0) as f32 * ramp;
        self.current += to_target / dist * step.min(dist);
        self.current
    }
}

impl Default for AutopilotDriver {
    fn default() -> Self {
        Self::new()
    }
}
