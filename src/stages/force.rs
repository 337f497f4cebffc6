use crate::config::SimulationParams;
use crate::grid::VectorGrid;
use glam::Vec2;

/// Pointer sample driving one frame's force injection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceImpulse {
    /// Pointer position in NDC, `[-1, 1]` on both axes with y up
    pub position: Vec2,
    /// Pointer movement since the previous frame, in NDC
    pub displacement: Vec2,
}

impl ForceImpulse {
    pub fn new(position: Vec2, displacement: Vec2) -> Self {
        Self {
            position,
            displacement,
        }
    }

    /// Velocity added at the injection centre.
    pub fn force(&self, force_multiplier: f32) -> Vec2 {
        self.displacement * 0.5 * force_multiplier
    }
}

/// Clamps the injection centre so the influence square stays
/// `force_edge_margin` half-cells clear of the domain edge.
pub fn clamp_center(position: Vec2, width: usize, height: usize, params: &SimulationParams) -> Vec2 {
    let axis = |p: f32, cells: usize| {
        let px = 1.0 / cells as f32;
        let radius_ndc = 2.0 * params.influence_radius * px;
        let limit = 1.0 - radius_ndc - params.force_edge_margin * px;
        if limit >= 0.0 { p.clamp(-limit, limit) } else { 0.0 }
    };
    Vec2::new(axis(position.x, width), axis(position.y, height))
}

/// Additively blends the impulse into `field` over the cells within
/// `influence_radius` of the (clamped) pointer position. The weight falls off
/// as `(1 - min(1, distance / radius))²`.
pub fn apply_force(field: &mut VectorGrid, impulse: &ForceImpulse, params: &SimulationParams) {
    let force = impulse.force(params.force_multiplier);
    if force == Vec2::ZERO {
        return;
    }

    let (w, h) = (field.width(), field.height());
    let center = clamp_center(impulse.position, w, h, params);
    let radius = params.influence_radius;

    // centre in cell space, where cell i spans [i, i + 1)
    let cx = (center.x + 1.0) * 0.5 * w as f32;
    let cy = (center.y + 1.0) * 0.5 * h as f32;

    let range = |c: f32, cells: usize| {
        let lo = (c - radius - 0.5).ceil().max(0.0) as usize;
        let hi = (c + radius - 0.5).floor().min(cells as f32 - 1.0);
        (lo, hi)
    };
    let (x_lo, x_hi) = range(cx, w);
    let (y_lo, y_hi) = range(cy, h);
    if x_hi < 0.0 || y_hi < 0.0 {
        return;
    }

    for y in y_lo..=y_hi as usize {
        for x in x_lo..=x_hi as usize {
            let offset = Vec2::new(x as f32 + 0.5 - cx, y as f32 + 0.5 - cy) / radius;
            let d = 1.0 - offset.length().min(1.0);
            let idx = field.index(x, y);
            field.data_mut()[idx] += force * (d * d);
        }
    }
}
