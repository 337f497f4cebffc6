use crate::config::BoundaryMode;
use crate::grid::VectorGrid;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMetrics {
    /// Mean of |∇·v| using the same central difference as the solver (without
    /// the 1/dt factor)
    pub mean_abs_divergence: f32,
    pub max_divergence: f32,
    pub max_speed: f32,
    pub avg_speed: f32,
    pub kinetic_energy: f32,
    pub mean_abs_vorticity: f32,
    pub frame: u64,
}

impl FieldMetrics {
    pub fn analyze(velocity: &VectorGrid, boundary: BoundaryMode, frame: u64) -> Self {
        let mut total_divergence = 0.0f64;
        let mut max_divergence: f32 = 0.0;
        let mut total_vorticity = 0.0f64;
        let mut kinetic_energy = 0.0f64;
        let mut speed_sum = 0.0f64;
        let mut max_speed: f32 = 0.0;

        for y in 0..velocity.height() {
            for x in 0..velocity.width() {
                let (xi, yi) = (x as isize, y as isize);
                let left = velocity.fetch(xi - 1, yi, boundary);
                let right = velocity.fetch(xi + 1, yi, boundary);
                let down = velocity.fetch(xi, yi - 1, boundary);
                let up = velocity.fetch(xi, yi + 1, boundary);

                // ∇·v
                let divergence = (right.x - left.x + up.y - down.y) / 2.0;
                total_divergence += divergence.abs() as f64;
                max_divergence = max_divergence.max(divergence.abs());

                // ∇×v
                let vorticity = (right.y - left.y - (up.x - down.x)) / 2.0;
                total_vorticity += vorticity.abs() as f64;

                let v = velocity.get(x, y);
                let speed = v.length();
                max_speed = max_speed.max(speed);
                speed_sum += speed as f64;
                kinetic_energy += 0.5 * v.length_squared() as f64;
            }
        }

        let cells = velocity.len().max(1) as f64;
        Self {
            mean_abs_divergence: (total_divergence / cells) as f32,
            max_divergence,
            max_speed,
            avg_speed: (speed_sum / cells) as f32,
            kinetic_energy: kinetic_energy as f32,
            mean_abs_vorticity: (total_vorticity / cells) as f32,
            frame,
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "frame {}: |div| mean {:.6} max {:.6}, speed max {:.4} avg {:.4}, energy {:.4}, |curl| {:.6}",
            self.frame,
            self.mean_abs_divergence,
            self.max_divergence,
            self.max_speed,
            self.avg_speed,
            self.kinetic_energy,
            self.mean_abs_vorticity
        );
    }
}

#[derive(Debug, Default)]
pub struct AnalysisRecorder {
    pub metrics_history: Vec<FieldMetrics>,
}

impl AnalysisRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, velocity: &VectorGrid, boundary: BoundaryMode, frame: u64) -> &FieldMetrics {
        self.metrics_history
            .push(FieldMetrics::analyze(velocity, boundary, frame));
        &self.metrics_history[self.metrics_history.len() - 1]
    }

    pub fn log_trends(&self) {
        let (Some(first), Some(last)) = (self.metrics_history.first(), self.metrics_history.last())
        else {
            return;
        };
        if self.metrics_history.len() < 2 {
            return;
        }

        log::info!(
            "kinetic energy {:.6} -> {:.6} over {} frames",
            first.kinetic_energy,
            last.kinetic_energy,
            last.frame - first.frame
        );
        log::info!(
            "mean |div| {:.6} -> {:.6}",
            first.mean_abs_divergence,
            last.mean_abs_divergence
        );
    }
}
