use crate::grid::{DoubleBuffer, ScalarGrid, VectorGrid};
use glam::Vec2;

/// Every grid the pipeline touches, allocated together and resized together.
#[derive(Debug, Clone)]
pub struct FieldSet {
    /// Projected velocity, the frame's result and next frame's input
    pub velocity: VectorGrid,
    /// Advection output, forces are blended into it
    pub advected: VectorGrid,
    pub viscous: DoubleBuffer<Vec2>,
    pub divergence: ScalarGrid,
    pub pressure: DoubleBuffer<f32>,
}

impl FieldSet {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            velocity: VectorGrid::new(width, height),
            advected: VectorGrid::new(width, height),
            viscous: DoubleBuffer::new(width, height),
            divergence: ScalarGrid::new(width, height),
            pressure: DoubleBuffer::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.velocity.width()
    }

    pub fn height(&self) -> usize {
        self.velocity.height()
    }

    /// Reallocates all grids. Flow state does not survive a resize.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.velocity.resize(width, height);
        self.advected.resize(width, height);
        self.viscous.resize(width, height);
        self.divergence.resize(width, height);
        self.pressure.resize(width, height);
    }
}
