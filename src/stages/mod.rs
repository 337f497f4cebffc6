//! The per-frame solver stages.
//!
//! Each stage is a free function over explicit grids and parameters. The
//! orchestrator composes them in a fixed order every frame.

pub mod advection;
pub mod force;
pub mod projection;
pub mod viscosity;

pub use advection::advect;
pub use force::{ForceImpulse, apply_force};
pub use projection::{divergence, solve_pressure, subtract_gradient};
pub use viscosity::diffuse;
