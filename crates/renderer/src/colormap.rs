//! Named colormaps and logarithmic value normalization.

use crate::error::{RenderError, RenderResult};

/// Color value in RGBA format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Linear color interpolation.
pub fn interpolate_color(color1: Color, color2: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    Color::new(
        ((color1.r as f64 * t_inv) + (color2.r as f64 * t)).round() as u8,
        ((color1.g as f64 * t_inv) + (color2.g as f64 * t)).round() as u8,
        ((color1.b as f64 * t_inv) + (color2.b as f64 * t)).round() as u8,
        ((color1.a as f64 * t_inv) + (color2.a as f64 * t)).round() as u8,
    )
}

/// A colormap defined by positioned color stops on [0, 1].
#[derive(Debug)]
pub struct Colormap {
    pub name: &'static str,
    stops: &'static [(f64, Color)],
}

impl Colormap {
    /// Sample the colormap at a normalized position, clamping to the ends.
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let first = self.stops[0];
        if t <= first.0 {
            return first.1;
        }
        for window in self.stops.windows(2) {
            let (p0, c0) = window[0];
            let (p1, c1) = window[1];
            if t <= p1 {
                let span = p1 - p0;
                let local = if span > 0.0 { (t - p0) / span } else { 1.0 };
                return interpolate_color(c0, c1, local);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

const JET: Colormap = Colormap {
    name: "jet",
    stops: &[
        (0.0, Color::rgb(0, 0, 128)),
        (0.125, Color::rgb(0, 0, 255)),
        (0.375, Color::rgb(0, 255, 255)),
        (0.625, Color::rgb(255, 255, 0)),
        (0.875, Color::rgb(255, 0, 0)),
        (1.0, Color::rgb(128, 0, 0)),
    ],
};

const VIRIDIS: Colormap = Colormap {
    name: "viridis",
    stops: &[
        (0.0, Color::rgb(0x44, 0x01, 0x54)),
        (1.0 / 9.0, Color::rgb(0x48, 0x28, 0x78)),
        (2.0 / 9.0, Color::rgb(0x3E, 0x4A, 0x89)),
        (3.0 / 9.0, Color::rgb(0x31, 0x68, 0x8E)),
        (4.0 / 9.0, Color::rgb(0x26, 0x82, 0x8E)),
        (5.0 / 9.0, Color::rgb(0x1F, 0x9E, 0x89)),
        (6.0 / 9.0, Color::rgb(0x35, 0xB7, 0x79)),
        (7.0 / 9.0, Color::rgb(0x6D, 0xCD, 0x59)),
        (8.0 / 9.0, Color::rgb(0xB4, 0xDE, 0x2C)),
        (1.0, Color::rgb(0xFD, 0xE7, 0x25)),
    ],
};

const PLASMA: Colormap = Colormap {
    name: "plasma",
    stops: &[
        (0.0, Color::rgb(0x0D, 0x08, 0x87)),
        (0.2, Color::rgb(0x6A, 0x00, 0xA8)),
        (0.4, Color::rgb(0xB1, 0x2A, 0x90)),
        (0.6, Color::rgb(0xE1, 0x64, 0x62)),
        (0.8, Color::rgb(0xFC, 0xA6, 0x36)),
        (1.0, Color::rgb(0xF0, 0xF9, 0x21)),
    ],
};

const GRAY: Colormap = Colormap {
    name: "gray",
    stops: &[(0.0, Color::rgb(0, 0, 0)), (1.0, Color::rgb(255, 255, 255))],
};

const HOT: Colormap = Colormap {
    name: "hot",
    stops: &[
        (0.0, Color::rgb(10, 0, 0)),
        (0.36, Color::rgb(230, 0, 0)),
        (0.72, Color::rgb(255, 210, 0)),
        (1.0, Color::rgb(255, 255, 255)),
    ],
};

/// Resolve a colormap by name. Unknown names are a fatal configuration
/// error; nothing falls back silently.
pub fn by_name(name: &str) -> RenderResult<&'static Colormap> {
    match name.to_ascii_lowercase().as_str() {
        "jet" => Ok(&JET),
        "viridis" => Ok(&VIRIDIS),
        "plasma" => Ok(&PLASMA),
        "gray" | "grey" | "greys" => Ok(&GRAY),
        "hot" => Ok(&HOT),
        _ => Err(RenderError::UnknownColormap(name.to_string())),
    }
}

/// Logarithmic normalization onto [0, 1] over a fixed value range.
///
/// Values outside the range are clamped by the color mapping rather than
/// rejected; NaN and non-positive values have no logarithm and are treated
/// as invalid (no color).
#[derive(Debug, Clone, Copy)]
pub struct LogScale {
    pub vmin: f64,
    pub vmax: f64,
    log_min: f64,
    log_span: f64,
}

impl LogScale {
    pub fn new(vmin: f64, vmax: f64) -> RenderResult<Self> {
        if !(vmin > 0.0 && vmax > vmin) {
            return Err(RenderError::InvalidScale(format!(
                "log scale requires 0 < vmin < vmax, got [{vmin}, {vmax}]"
            )));
        }
        let log_min = vmin.log10();
        Ok(Self {
            vmin,
            vmax,
            log_min,
            log_span: vmax.log10() - log_min,
        })
    }

    /// Normalized position of a value, or None for unplottable values.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        Some(((value.log10() - self.log_min) / self.log_span).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_known_names() {
        assert_eq!(by_name("jet").unwrap().name, "jet");
        assert_eq!(by_name("Greys").unwrap().name, "gray");
        assert!(matches!(
            by_name("pyart_HomeyerRainbow"),
            Err(RenderError::UnknownColormap(_))
        ));
    }

    #[test]
    fn jet_endpoints() {
        let jet = by_name("jet").unwrap();
        assert_eq!(jet.sample(0.0), Color::rgb(0, 0, 128));
        assert_eq!(jet.sample(1.0), Color::rgb(128, 0, 0));
        // Midpoint falls between cyan and yellow.
        let mid = jet.sample(0.5);
        assert_eq!(mid.b, mid.r);
        assert_eq!(mid.g, 255);
    }

    #[test]
    fn sample_clamps_out_of_range() {
        let gray = by_name("gray").unwrap();
        assert_eq!(gray.sample(-1.0), Color::rgb(0, 0, 0));
        assert_eq!(gray.sample(2.0), Color::rgb(255, 255, 255));
    }

    #[test]
    fn log_scale_normalization() {
        let scale = LogScale::new(1e-7, 1e-4).unwrap();
        assert_eq!(scale.normalize(1e-7), Some(0.0));
        assert_eq!(scale.normalize(1e-4), Some(1.0));
        let mid = scale.normalize(10f64.powf(-5.5)).unwrap();
        assert!((mid - 0.5).abs() < 1e-9);
        // Clamped, not rejected.
        assert_eq!(scale.normalize(1e-9), Some(0.0));
        assert_eq!(scale.normalize(1.0), Some(1.0));
        // Unplottable.
        assert_eq!(scale.normalize(0.0), None);
        assert_eq!(scale.normalize(-1.0), None);
        assert_eq!(scale.normalize(f64::NAN), None);
    }

    #[test]
    fn log_scale_rejects_bad_ranges() {
        assert!(LogScale::new(0.0, 1.0).is_err());
        assert!(LogScale::new(1e-4, 1e-7).is_err());
    }
}
