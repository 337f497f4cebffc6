use crate::config::{AdvectionMode, BoundaryMode};
use crate::grid::VectorGrid;
use glam::Vec2;

/// Transports `src` along itself by `dt` and writes the result into `dst`.
///
/// Displacements are scaled by `max(w, h) / (w, h)` so a non-square grid
/// advects isotropically. With [`AdvectionMode::Bfecc`] the backward trace is
/// re-advected forward, half the round-trip error is subtracted from the
/// start position and the trace is repeated from there.
pub fn advect(
    src: &VectorGrid,
    dst: &mut VectorGrid,
    dt: f32,
    mode: AdvectionMode,
    boundary: BoundaryMode,
) {
    let (w, h) = (src.width() as f32, src.height() as f32);
    let ratio = Vec2::splat(w.max(h)) / Vec2::new(w, h);
    let step = dt * ratio;

    dst.fill_with(|x, y| {
        let uv = src.cell_uv(x, y);
        let vel = src.get(x, y);

        match mode {
            AdvectionMode::Simple => src.sample(uv - vel * step, boundary),
            AdvectionMode::Bfecc => {
                let spot_old = uv - vel * step;
                let vel_back = src.sample(spot_old, boundary);
                let spot_forward = spot_old + vel_back * step;
                let error = spot_forward - uv;
                let corrected = uv - error * 0.5;
                let vel_corrected = src.sample(corrected, boundary);
                src.sample(corrected - vel_corrected * step, boundary)
            }
        }
    });

    if boundary == BoundaryMode::Bounded {
        dst.zero_border();
    }
}
