use crate::error::Result;
use crate::grid::VectorGrid;
use crate::render::Renderer;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes colour-mapped velocity frames to PNG.
pub struct ImageExporter {
    renderer: Renderer,
    size: Option<(u32, u32)>,
}

impl ImageExporter {
    /// Exports at grid resolution.
    pub fn new(renderer: Renderer) -> Self {
        Self {
            renderer,
            size: None,
        }
    }

    /// Exports upsampled to `width × height`.
    pub fn with_size(renderer: Renderer, width: u32, height: u32) -> Self {
        Self {
            renderer,
            size: Some((width, height)),
        }
    }

    pub fn export_png(&self, velocity: &VectorGrid, path: &Path) -> Result<()> {
        let img = match self.size {
            Some((w, h)) => self.renderer.render_scaled(velocity, w, h),
            None => self.renderer.render(velocity),
        };
        img.save(path)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    /// Writes `<dir>/<prefix>_frame_<NNNN>.png`, creating `dir` if needed.
    pub fn export_frame(
        &self,
        velocity: &VectorGrid,
        output_dir: &Path,
        prefix: &str,
        frame: u64,
    ) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(format!("{prefix}_frame_{frame:04}.png"));
        self.export_png(velocity, &path)?;
        Ok(path)
    }
}
