//! Figure composition: panels, axes, annotations and the colorbar.

use renderer::{
    draw_colorbar, edges_from_centers, rasterize_mesh, Canvas, Color, Colormap, LogScale,
    TextRenderer,
};

use crate::dataset::CeilometerDay;
use crate::error::Result;
use crate::layout::{
    FigureLayout, HMAX_KM, VMAX, VMIN, WINDOW_SECONDS, X_TICK_STEP, Y_TICK_STEP,
};

const GRID_COLOR: Color = Color::rgb(178, 178, 178);
const UNIT_LABEL: &str = "m-1 sr-1";

// Font sizes in pixels at the fixed 200 DPI of the figure.
const TICK_SIZE: f32 = 28.0;
const LABEL_SIZE: f32 = 28.0;
const TITLE_SIZE: f32 = 34.0;
const TICK_LEN: i32 = 10;

/// What to draw in one panel.
pub struct PanelContent<'a> {
    /// Time-major value grid, same shape as the day's backscatter.
    pub values: &'a [f64],
    /// Caption above the plot, left-aligned.
    pub caption: Option<&'a str>,
    /// Title above the plot, right-aligned.
    pub title: Option<&'a str>,
}

/// Render a complete figure: each panel's mesh, axes and colorbar, plus the
/// instrument annotation in the lower-left corner.
pub fn render_figure(
    day: &CeilometerDay,
    panels: &[PanelContent],
    layout: &FigureLayout,
    colormap: &Colormap,
    instrument: &str,
) -> Result<Canvas> {
    let mut canvas = Canvas::new(layout.width, layout.height, Color::WHITE);
    let scale = LogScale::new(VMIN, VMAX)?;
    let text = TextRenderer::new()?;

    let x_edges = edges_from_centers(&day.time_offsets())?;
    let y_edges = edges_from_centers(&day.altitude_km)?;

    for (content, panel) in panels.iter().zip(&layout.panels) {
        rasterize_mesh(
            &mut canvas,
            panel.plot,
            &x_edges,
            &y_edges,
            content.values,
            (0.0, WINDOW_SECONDS),
            (0.0, HMAX_KM),
            &scale,
            colormap,
        )?;
        draw_axes(&mut canvas, &text, &panel.plot);
        draw_colorbar(
            &mut canvas,
            panel.colorbar,
            &scale,
            colormap,
            UNIT_LABEL,
            &text,
            TICK_SIZE,
        )?;

        let header_y = panel.plot.y - TITLE_SIZE as i32 - 14;
        if let Some(caption) = content.caption {
            text.draw(&mut canvas, panel.plot.x, header_y, caption, TITLE_SIZE, Color::BLACK);
        }
        if let Some(title) = content.title {
            let (width, _) = text.size_of(title, TITLE_SIZE);
            text.draw(
                &mut canvas,
                panel.plot.right() - width as i32,
                header_y,
                title,
                TITLE_SIZE,
                Color::BLACK,
            );
        }
    }

    text.draw(
        &mut canvas,
        30,
        layout.height as i32 - LABEL_SIZE as i32 - 12,
        instrument,
        LABEL_SIZE,
        Color::BLACK,
    );

    Ok(canvas)
}

/// Gridlines, frame, ticks and axis labels for one plot area.
fn draw_axes(canvas: &mut Canvas, text: &TextRenderer, plot: &renderer::Rect) {
    let tick_text_h = TICK_SIZE as i32;

    // Gridlines over the mesh, at the tick positions.
    let mut s = X_TICK_STEP;
    while s < WINDOW_SECONDS {
        let x = FigureLayout::x_pixel(plot, s);
        canvas.vline(x, plot.y, plot.bottom(), GRID_COLOR);
        s += X_TICK_STEP;
    }
    let mut km = Y_TICK_STEP;
    while km < HMAX_KM {
        let y = FigureLayout::y_pixel(plot, km);
        canvas.hline(plot.x, plot.right(), y, GRID_COLOR);
        km += Y_TICK_STEP;
    }

    canvas.outline_rect(*plot, Color::BLACK);

    // X ticks: HH:MM labels from midnight to midnight.
    let mut s = 0.0;
    while s <= WINDOW_SECONDS {
        let x = FigureLayout::x_pixel(plot, s);
        canvas.vline(x, plot.bottom(), plot.bottom() + TICK_LEN, Color::BLACK);
        let hours = (s / 3600.0).round() as u32;
        let label = format!("{:02}:00", hours % 24);
        let (w, _) = text.size_of(&label, TICK_SIZE);
        text.draw(
            canvas,
            x - w as i32 / 2,
            plot.bottom() + TICK_LEN + 6,
            &label,
            TICK_SIZE,
            Color::BLACK,
        );
        s += X_TICK_STEP;
    }

    // Y ticks: whole kilometres.
    let mut km = 0.0;
    while km <= HMAX_KM {
        let y = FigureLayout::y_pixel(plot, km);
        canvas.hline(plot.x - TICK_LEN, plot.x, y, Color::BLACK);
        let label = format!("{km:.0}");
        let (w, _) = text.size_of(&label, TICK_SIZE);
        text.draw(
            canvas,
            plot.x - TICK_LEN - 8 - w as i32,
            y - tick_text_h / 2,
            &label,
            TICK_SIZE,
            Color::BLACK,
        );
        km += Y_TICK_STEP;
    }

    // Axis labels.
    let x_label = "Time (UTC)";
    let (w, _) = text.size_of(x_label, LABEL_SIZE);
    text.draw(
        canvas,
        plot.x + (plot.w as i32 - w as i32) / 2,
        plot.bottom() + TICK_LEN + 6 + tick_text_h + 16,
        x_label,
        LABEL_SIZE,
        Color::BLACK,
    );

    let y_label = "Altitude (km)";
    // Rotated 90 degrees, so the text width becomes the vertical extent.
    let (w, _) = text.size_of(y_label, LABEL_SIZE);
    text.draw_up(
        canvas,
        plot.x - 130,
        plot.y + (plot.h as i32 - w as i32) / 2,
        y_label,
        LABEL_SIZE,
        Color::BLACK,
    );
}
