//! Pseudocolor mesh rasterization for gridded time-height data.
//!
//! Cell centers become cell edges by taking midpoints between neighbours
//! and extrapolating half a step at each end, so a value painted at a
//! center fills the surrounding cell. Every canvas pixel inside the plot
//! rectangle maps back to a data cell; pixels with no cell, or whose cell
//! holds an unplottable value, keep the background.

use crate::canvas::{Canvas, Rect};
use crate::colormap::{Colormap, LogScale};
use crate::error::{RenderError, RenderResult};

/// Cell edges from cell centers. Centers must be strictly increasing.
pub fn edges_from_centers(centers: &[f64]) -> RenderResult<Vec<f64>> {
    if centers.is_empty() {
        return Err(RenderError::InvalidGeometry(
            "cannot derive edges from zero centers".to_string(),
        ));
    }
    if centers.windows(2).any(|w| w[1] <= w[0]) {
        return Err(RenderError::InvalidGeometry(
            "cell centers must be strictly increasing".to_string(),
        ));
    }
    if centers.len() == 1 {
        return Ok(vec![centers[0] - 0.5, centers[0] + 0.5]);
    }
    let n = centers.len();
    let mut edges = Vec::with_capacity(n + 1);
    edges.push(centers[0] - (centers[1] - centers[0]) / 2.0);
    for w in centers.windows(2) {
        edges.push((w[0] + w[1]) / 2.0);
    }
    edges.push(centers[n - 1] + (centers[n - 1] - centers[n - 2]) / 2.0);
    Ok(edges)
}

/// Index of the cell containing `v`, where cell i spans [edges[i], edges[i+1]).
fn bin(edges: &[f64], v: f64) -> Option<usize> {
    if v < edges[0] || v >= edges[edges.len() - 1] {
        return None;
    }
    Some(edges.partition_point(|e| *e <= v) - 1)
}

/// Rasterize a value grid into `rect` on the canvas.
///
/// `values` is column-major over the cell grid: `values[ix * ny + iy]`
/// where `ix` indexes `x_edges` cells and `iy` indexes `y_edges` cells.
/// `x_range` and `y_range` define the data window shown by the rectangle;
/// the y axis points up (the top pixel row shows `y_range.1`).
#[allow(clippy::too_many_arguments)]
pub fn rasterize_mesh(
    canvas: &mut Canvas,
    rect: Rect,
    x_edges: &[f64],
    y_edges: &[f64],
    values: &[f64],
    x_range: (f64, f64),
    y_range: (f64, f64),
    scale: &LogScale,
    colormap: &Colormap,
) -> RenderResult<()> {
    let nx = x_edges.len() - 1;
    let ny = y_edges.len() - 1;
    if values.len() != nx * ny {
        return Err(RenderError::InvalidGeometry(format!(
            "value grid has {} cells, edges describe {}x{}",
            values.len(),
            nx,
            ny
        )));
    }
    if rect.w == 0 || rect.h == 0 || x_range.1 <= x_range.0 || y_range.1 <= y_range.0 {
        return Err(RenderError::InvalidGeometry(
            "degenerate plot rectangle or data window".to_string(),
        ));
    }

    // Per-pixel cell lookups, computed once per column and once per row.
    let x_span = x_range.1 - x_range.0;
    let y_span = y_range.1 - y_range.0;
    let col_cells: Vec<Option<usize>> = (0..rect.w)
        .map(|px| {
            let x = x_range.0 + (px as f64 + 0.5) / rect.w as f64 * x_span;
            bin(x_edges, x)
        })
        .collect();
    let row_cells: Vec<Option<usize>> = (0..rect.h)
        .map(|py| {
            // Pixel row 0 is the top of the rectangle.
            let y = y_range.1 - (py as f64 + 0.5) / rect.h as f64 * y_span;
            bin(y_edges, y)
        })
        .collect();

    for (py, iy) in row_cells.iter().enumerate() {
        let Some(iy) = iy else { continue };
        for (px, ix) in col_cells.iter().enumerate() {
            let Some(ix) = ix else { continue };
            let value = values[ix * ny + iy];
            if let Some(t) = scale.normalize(value) {
                canvas.set_pixel(rect.x + px as i32, rect.y + py as i32, colormap.sample(t));
            }
        }
    }
    Ok(())
}
