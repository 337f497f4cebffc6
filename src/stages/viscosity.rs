use crate::config::BoundaryMode;
use crate::grid::{DoubleBuffer, VectorGrid};
use glam::Vec2;

/// Relaxes `seed` toward the implicit viscous-diffusion solution with
/// `iterations` Jacobi sweeps and returns the slot of `buffers` holding the
/// result.
///
/// Every sweep blends the untouched seed with the previous iterate's axis
/// neighbours, sampled two cells away:
/// `new = (4·old + ν·dt·Σn) / (4·(1 + ν·dt))`.
pub fn diffuse(
    seed: &VectorGrid,
    buffers: &mut DoubleBuffer<Vec2>,
    viscosity: f32,
    dt: f32,
    iterations: usize,
    boundary: BoundaryMode,
) -> usize {
    buffers.seed_mut().copy_from(seed);

    let k = viscosity * dt;
    let denom = 4.0 * (1.0 + k);

    buffers.iterate(iterations, |prev, next| {
        next.fill_with(|x, y| {
            let (x, y) = (x as isize, y as isize);
            let neighbours = prev.fetch(x + 2, y, boundary)
                + prev.fetch(x - 2, y, boundary)
                + prev.fetch(x, y + 2, boundary)
                + prev.fetch(x, y - 2, boundary);
            (seed.fetch(x, y, boundary) * 4.0 + neighbours * k) / denom
        });
    })
}
