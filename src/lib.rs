//! Pointer-driven stable-fluids simulation.
//!
//! A velocity field is advected along itself (optionally with BFECC), pushed
//! by a pointer or an autopilot, optionally diffused, and projected toward
//! zero divergence with a Jacobi pressure solve every frame.

pub mod analysis;
pub mod autopilot;
pub mod config;
pub mod desktop;
pub mod error;
pub mod export;
pub mod fields;
pub mod grid;
pub mod input;
pub mod orchestrator;
pub mod pointer;
pub mod render;
pub mod stages;

pub use analysis::{AnalysisRecorder, FieldMetrics};
pub use autopilot::AutopilotDriver;
pub use config::{AdvectionMode, AutopilotParams, BoundaryMode, SimulationParams};
pub use desktop::LiquidEtherApp;
pub use error::{FluidError, Result};
pub use export::ImageExporter;
pub use fields::FieldSet;
pub use grid::{DoubleBuffer, Grid, ScalarGrid, VectorGrid};
pub use input::{InputEvent, InputSource, InputSubscription, PointerHub};
pub use orchestrator::{Orchestrator, RunState, simulate_frame};
pub use pointer::{PointerMode, PointerState, smoothstep};
pub use render::{Palette, Renderer};
pub use stages::ForceImpulse;
