//! Row-major 2D grids, boundary-aware addressing and ping-pong buffers.

use crate::config::BoundaryMode;
use glam::Vec2;
use std::ops::{Add, Mul};

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Values a grid can hold and bilinearly interpolate.
pub trait Sample:
    Copy + Default + Send + Sync + Add<Output = Self> + Mul<f32, Output = Self>
{
}

impl<T> Sample for T where
    T: Copy + Default + Send + Sync + Add<Output = T> + Mul<f32, Output = T>
{
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

pub type VectorGrid = Grid<Vec2>;
pub type ScalarGrid = Grid<f32>;

impl<T: Sample> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn copy_from(&mut self, other: &Grid<T>) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.data.copy_from_slice(&other.data);
    }

    /// Reallocates to the new shape. Contents are reset to the default value.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width * height, T::default());
    }

    /// Reads a cell by signed coordinates, resolving out-of-range reads the
    /// way the boundary mode addresses texels.
    #[inline]
    pub fn fetch(&self, x: isize, y: isize, boundary: BoundaryMode) -> T {
        let (w, h) = (self.width as isize, self.height as isize);
        let (x, y) = match boundary {
            BoundaryMode::Wrap => (x.rem_euclid(w), y.rem_euclid(h)),
            BoundaryMode::Bounded => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
        };
        self.data[y as usize * self.width + x as usize]
    }

    /// Bilinear sample at a uv position where cell centres sit at
    /// `(x + 0.5) / width`.
    pub fn sample(&self, uv: Vec2, boundary: BoundaryMode) -> T {
        let fx = uv.x * self.width as f32 - 0.5;
        let fy = uv.y * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let sx = fx - x0;
        let sy = fy - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let v00 = self.fetch(x0, y0, boundary);
        let v10 = self.fetch(x0 + 1, y0, boundary);
        let v01 = self.fetch(x0, y0 + 1, boundary);
        let v11 = self.fetch(x0 + 1, y0 + 1, boundary);

        v00 * ((1.0 - sx) * (1.0 - sy))
            + v10 * (sx * (1.0 - sy))
            + v01 * ((1.0 - sx) * sy)
            + v11 * (sx * sy)
    }

    /// uv coordinate of a cell centre.
    #[inline]
    pub fn cell_uv(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.width as f32,
            (y as f32 + 0.5) / self.height as f32,
        )
    }

    /// Writes every cell from `f(x, y)`. Rows are processed in parallel on
    /// native targets; `f` must not depend on this grid.
    pub fn fill_with<F>(&mut self, f: F)
    where
        F: Fn(usize, usize) -> T + Send + Sync,
    {
        let width = self.width;

        #[cfg(not(target_arch = "wasm32"))]
        self.data
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = f(x, y);
                }
            });

        #[cfg(target_arch = "wasm32")]
        for (y, row) in self.data.chunks_mut(width).enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = f(x, y);
            }
        }
    }

    /// Forces the outermost ring of cells to the default value.
    pub fn zero_border(&mut self) {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 {
            return;
        }
        for x in 0..w {
            self.data[x] = T::default();
            self.data[(h - 1) * w + x] = T::default();
        }
        for y in 0..h {
            self.data[y * w] = T::default();
            self.data[y * w + w - 1] = T::default();
        }
    }
}

/// Two same-shaped grids for Jacobi iteration.
///
/// Iteration `i` reads slot `i % 2` and writes slot `(i + 1) % 2`, so slot 0
/// is always the seed and `N` iterations leave the result in slot `N % 2`.
#[derive(Debug, Clone)]
pub struct DoubleBuffer<T> {
    slots: [Grid<T>; 2],
}

impl<T: Sample> DoubleBuffer<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            slots: [Grid::new(width, height), Grid::new(width, height)],
        }
    }

    pub fn slot(&self, slot: usize) -> &Grid<T> {
        &self.slots[slot]
    }

    pub fn slot_mut(&mut self, slot: usize) -> &mut Grid<T> {
        &mut self.slots[slot]
    }

    /// Slot 0, where the seed goes before iterating.
    pub fn seed_mut(&mut self) -> &mut Grid<T> {
        &mut self.slots[0]
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        for slot in &mut self.slots {
            slot.resize(width, height);
        }
    }

    /// Runs `iterations` steps of `step(previous, next)` and returns the slot
    /// holding the last write (0 when no iteration ran).
    pub fn iterate<F>(&mut self, iterations: usize, mut step: F) -> usize
    where
        F: FnMut(&Grid<T>, &mut Grid<T>),
    {
        let mut written = 0;
        for i in 0..iterations {
            let read = i % 2;
            // read from the slot written last iteration, write the other one
            let [a, b] = &mut self.slots;
            let (src, dst) = if read == 0 { (&*a, b) } else { (&*b, a) };
            step(src, dst);
            written = (i + 1) % 2;
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_wraps_and_clamps() {
        let mut grid = ScalarGrid::new(4, 3);
        grid.fill_with(|x, y| (y * 4 + x) as f32);

        assert_eq!(grid.fetch(-1, 0, BoundaryMode::Wrap), 3.0);
        assert_eq!(grid.fetch(4, 2, BoundaryMode::Wrap), 8.0);
        assert_eq!(grid.fetch(-1, 0, BoundaryMode::Bounded), 0.0);
        assert_eq!(grid.fetch(7, 5, BoundaryMode::Bounded), 11.0);
    }

    #[test]
    fn sample_at_cell_centre_is_exact() {
        let mut grid = ScalarGrid::new(8, 8);
        grid.fill_with(|x, y| (x * 10 + y) as f32);

        let uv = grid.cell_uv(3, 5);
        assert!((grid.sample(uv, BoundaryMode::Bounded) - 35.0).abs() < 1e-4);
    }

    #[test]
    fn sample_interpolates_between_centres() {
        let mut grid = ScalarGrid::new(2, 1);
        grid.set(0, 0, 0.0);
        grid.set(1, 0, 1.0);

        // halfway between the two centres
        let v = grid.sample(Vec2::new(0.5, 0.5), BoundaryMode::Bounded);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_border_keeps_interior() {
        let mut grid = VectorGrid::new(5, 5);
        grid.fill(Vec2::ONE);
        grid.zero_border();

        assert_eq!(grid.get(0, 2), Vec2::ZERO);
        assert_eq!(grid.get(4, 4), Vec2::ZERO);
        assert_eq!(grid.get(2, 2), Vec2::ONE);
    }

    #[test]
    fn double_buffer_writes_alternate() {
        let mut buffers = DoubleBuffer::<f32>::new(2, 2);
        let mut writes = Vec::new();
        let mut tag = 0.0;
        let last = buffers.iterate(3, |_, dst| {
            tag += 1.0;
            dst.fill(tag);
            writes.push(tag);
        });

        assert_eq!(last, 1);
        assert_eq!(buffers.slot(1).get(0, 0), 3.0);
        assert_eq!(buffers.slot(0).get(0, 0), 2.0);
        assert_eq!(writes, vec![1.0, 2.0, 3.0]);
    }
}
