//! Fixed figure geometry.
//!
//! Figures are sized in inches at a fixed raster resolution: 15x4 in for a
//! single panel, 15x8.5 in for the two-panel montage, both at 200 dots per
//! inch. The data window is likewise fixed: a full UTC day on the x axis and
//! 0-12 km on the y axis, colored over [1e-7, 1e-4] m-1 sr-1.

use renderer::Rect;

/// Raster resolution, dots per inch.
pub const DPI: usize = 200;

/// Single-panel canvas, 15 x 4 inches.
pub const SINGLE_SIZE: (usize, usize) = (15 * DPI, 4 * DPI);
/// Two-panel montage canvas, 15 x 8.5 inches.
pub const MONTAGE_SIZE: (usize, usize) = (15 * DPI, 17 * DPI / 2);

/// Color scale limits in m-1 sr-1.
pub const VMIN: f64 = 1e-7;
pub const VMAX: f64 = 1e-4;

/// Top of the altitude axis in kilometres.
pub const HMAX_KM: f64 = 12.0;

/// Seconds shown on the x axis.
pub const WINDOW_SECONDS: f64 = 24.0 * 3600.0;
/// X tick spacing in seconds.
pub const X_TICK_STEP: f64 = 3.0 * 3600.0;
/// Y tick spacing in kilometres.
pub const Y_TICK_STEP: f64 = 2.0;

const MARGIN_LEFT: i32 = 170;
const MARGIN_RIGHT: u32 = 265;
const MARGIN_TOP: i32 = 70;
const PANEL_GAP: i32 = 190;
const AXIS_STRIP: u32 = 130;
const COLORBAR_WIDTH: u32 = 45;
const COLORBAR_GAP: i32 = 30;

/// Geometry of one panel: the plot area and its colorbar.
#[derive(Debug, Clone, Copy)]
pub struct PanelLayout {
    pub plot: Rect,
    pub colorbar: Rect,
}

impl PanelLayout {
    fn new(width: usize, y: i32, plot_height: u32) -> Self {
        let plot = Rect::new(
            MARGIN_LEFT,
            y,
            (width as u32).saturating_sub(MARGIN_LEFT as u32 + MARGIN_RIGHT),
            plot_height,
        );
        let colorbar = Rect::new(plot.right() + COLORBAR_GAP, y, COLORBAR_WIDTH, plot_height);
        Self { plot, colorbar }
    }
}

/// Full-figure geometry: canvas size and the stacked panels.
#[derive(Debug, Clone)]
pub struct FigureLayout {
    pub width: usize,
    pub height: usize,
    pub panels: Vec<PanelLayout>,
}

impl FigureLayout {
    pub fn single() -> Self {
        let (width, height) = SINGLE_SIZE;
        let plot_height = height as u32 - MARGIN_TOP as u32 - AXIS_STRIP;
        Self {
            width,
            height,
            panels: vec![PanelLayout::new(width, MARGIN_TOP, plot_height)],
        }
    }

    pub fn montage() -> Self {
        let (width, height) = MONTAGE_SIZE;
        let plot_height =
            (height as u32 - 2 * MARGIN_TOP as u32 - PANEL_GAP as u32 - AXIS_STRIP) / 2;
        let second_y = MARGIN_TOP + plot_height as i32 + PANEL_GAP + MARGIN_TOP;
        Self {
            width,
            height,
            panels: vec![
                PanelLayout::new(width, MARGIN_TOP, plot_height),
                PanelLayout::new(width, second_y, plot_height),
            ],
        }
    }

    /// X pixel of a time offset (seconds past midnight) on a panel.
    pub fn x_pixel(plot: &Rect, seconds: f64) -> i32 {
        plot.x + (seconds / WINDOW_SECONDS * plot.w as f64).round() as i32
    }

    /// Y pixel of an altitude in kilometres on a panel.
    pub fn y_pixel(plot: &Rect, km: f64) -> i32 {
        plot.bottom() - 1 - (km / HMAX_KM * (plot.h as f64 - 1.0)).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_sizes_match_figure_inches() {
        assert_eq!(SINGLE_SIZE, (3000, 800));
        assert_eq!(MONTAGE_SIZE, (3000, 1700));
    }

    #[test]
    fn panels_fit_inside_their_canvas() {
        for layout in [FigureLayout::single(), FigureLayout::montage()] {
            for panel in &layout.panels {
                assert!(panel.plot.x >= 0 && panel.plot.y >= 0);
                assert!(panel.colorbar.right() < layout.width as i32);
                assert!(panel.plot.bottom() <= layout.height as i32);
            }
        }
    }

    #[test]
    fn axis_transforms_hit_plot_corners() {
        let layout = FigureLayout::single();
        let plot = layout.panels[0].plot;
        assert_eq!(FigureLayout::x_pixel(&plot, 0.0), plot.x);
        assert_eq!(FigureLayout::x_pixel(&plot, WINDOW_SECONDS), plot.right());
        assert_eq!(FigureLayout::y_pixel(&plot, 0.0), plot.bottom() - 1);
        assert_eq!(FigureLayout::y_pixel(&plot, HMAX_KM), plot.y);
    }
}
