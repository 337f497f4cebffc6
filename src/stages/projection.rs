use crate::config::BoundaryMode;
use crate::grid::{DoubleBuffer, ScalarGrid, VectorGrid};
use glam::Vec2;

/// Central-difference divergence of `velocity`, divided by `dt`.
pub fn divergence(velocity: &VectorGrid, out: &mut ScalarGrid, dt: f32, boundary: BoundaryMode) {
    out.fill_with(|x, y| {
        let (x, y) = (x as isize, y as isize);
        let x0 = velocity.fetch(x - 1, y, boundary).x;
        let x1 = velocity.fetch(x + 1, y, boundary).x;
        let y0 = velocity.fetch(x, y - 1, boundary).y;
        let y1 = velocity.fetch(x, y + 1, boundary).y;
        (x1 - x0 + y1 - y0) / 2.0 / dt
    });
}

/// Jacobi solve of the pressure Poisson equation, seeded at zero.
///
/// Neighbours sit two cells apart so the stencil matches the composition of
/// the central differences used by [`divergence`] and [`subtract_gradient`].
/// That composition gives `(Σp - 4p) / 4 = div` at a fixed point, so each
/// sweep writes `p = Σp / 4 - div`.
/// Returns the slot of `buffers` holding the final pressure.
pub fn solve_pressure(
    divergence: &ScalarGrid,
    buffers: &mut DoubleBuffer<f32>,
    iterations: usize,
    boundary: BoundaryMode,
) -> usize {
    buffers.seed_mut().fill(0.0);

    buffers.iterate(iterations, |prev, next| {
        next.fill_with(|x, y| {
            let (xi, yi) = (x as isize, y as isize);
            let sum = prev.fetch(xi + 2, yi, boundary)
                + prev.fetch(xi - 2, yi, boundary)
                + prev.fetch(xi, yi + 2, boundary)
                + prev.fetch(xi, yi - 2, boundary);
            sum / 4.0 - divergence.get(x, y)
        });
    })
}

/// Writes `velocity - 0.5·∇p·dt` into `out`.
pub fn subtract_gradient(
    velocity: &VectorGrid,
    pressure: &ScalarGrid,
    out: &mut VectorGrid,
    dt: f32,
    boundary: BoundaryMode,
) {
    out.fill_with(|x, y| {
        let (xi, yi) = (x as isize, y as isize);
        let grad = Vec2::new(
            pressure.fetch(xi + 1, yi, boundary) - pressure.fetch(xi - 1, yi, boundary),
            pressure.fetch(xi, yi + 1, boundary) - pressure.fetch(xi, yi - 1, boundary),
        ) * 0.5;
        velocity.get(x, y) - grad * dt
    });

    if boundary == BoundaryMode::Bounded {
        out.zero_border();
    }
}
