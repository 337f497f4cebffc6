//! Pointer state and the user / autopilot control hand-off.

use crate::config::AutopilotParams;
use glam::Vec2;

/// Hermite ease used for both the takeover and the autopilot speed ramp.
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerMode {
    UserControlled,
    Autonomous,
    /// Easing from the autopilot position to the user's pointer
    HandoffToUser,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Handoff {
    from: Vec2,
    to: Vec2,
    started_at: f64,
}

#[derive(Debug, Clone)]
pub struct PointerState {
    position: Vec2,
    previous: Vec2,
    displacement: Vec2,
    hover_inside: bool,
    has_user_control: bool,
    autonomous: bool,
    handoff: Option<Handoff>,
    first_frame: bool,
    last_user_input: f64,
}

impl PointerState {
    /// `now` counts as the last user interaction so the autopilot waits a
    /// full idle delay after start-up.
    pub fn new(now: f64) -> Self {
        Self {
            position: Vec2::ZERO,
            previous: Vec2::ZERO,
            displacement: Vec2::ZERO,
            hover_inside: false,
            has_user_control: false,
            autonomous: false,
            handoff: None,
            first_frame: true,
            last_user_input: now,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn displacement(&self) -> Vec2 {
        self.displacement
    }

    pub fn is_hover_inside(&self) -> bool {
        self.hover_inside
    }

    pub fn has_user_control(&self) -> bool {
        self.has_user_control
    }

    pub fn last_user_input(&self) -> f64 {
        self.last_user_input
    }

    pub fn mode(&self) -> PointerMode {
        if self.handoff.is_some() {
            PointerMode::HandoffToUser
        } else if self.autonomous {
            PointerMode::Autonomous
        } else {
            PointerMode::UserControlled
        }
    }

    pub fn on_pointer_move(&mut self, position: Vec2, now: f64) {
        self.hover_inside = true;
        self.last_user_input = now;

        if let Some(handoff) = self.handoff.as_mut() {
            handoff.to = position;
            return;
        }

        if self.autonomous {
            self.handoff = Some(Handoff {
                from: self.position,
                to: position,
                started_at: now,
            });
            self.autonomous = false;
            self.has_user_control = true;
            return;
        }

        self.position = position;
        self.has_user_control = true;
    }

    pub fn on_touch_start(&mut self, position: Vec2, now: f64) {
        self.hover_inside = true;
        self.handoff = None;
        self.autonomous = false;
        self.position = position;
        self.has_user_control = true;
        self.last_user_input = now;
    }

    pub fn on_touch_move(&mut self, position: Vec2, now: f64) {
        self.position = position;
        self.last_user_input = now;
    }

    /// Pointer left the viewport or the touch ended.
    pub fn on_leave(&mut self) {
        self.hover_inside = false;
    }

    /// Called by the orchestrator when the autopilot starts or stops driving.
    pub fn set_autonomous(&mut self, autonomous: bool) {
        if autonomous && !self.autonomous {
            self.has_user_control = false;
        }
        self.autonomous = autonomous;
    }

    pub fn set_autonomous_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Resolves this frame's pointer position and returns the displacement
    /// since the previous frame.
    pub fn resolve_frame(&mut self, now: f64, params: &AutopilotParams) -> Vec2 {
        if let Some(handoff) = self.handoff {
            let t = if params.handoff_duration > 0.0 {
                ((now - handoff.started_at) / params.handoff_duration as f64).min(1.0) as f32
            } else {
                1.0
            };

            if t >= 1.0 {
                self.handoff = None;
                self.position = handoff.to;
                self.previous = handoff.to;
                self.displacement = Vec2::ZERO;
                self.first_frame = false;
                return self.displacement;
            }

            self.position = handoff.from.lerp(handoff.to, smoothstep(t));
        }

        self.displacement = self.position - self.previous;
        self.previous = self.position;

        if self.first_frame {
            self.displacement = Vec2::ZERO;
            self.first_frame = false;
        }

        if self.autonomous && self.handoff.is_none() {
            self.displacement *= params.intensity;
        }

        self.displacement
    }
}
