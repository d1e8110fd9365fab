//! Daily quicklook figures from ceilometer backscatter files.
//!
//! The pipeline reads one classic-format day file, blanks cells that fail
//! the quality flag, renders a time-height pseudocolor plot on a fixed
//! 24-hour / 0-12 km window with a logarithmic color scale, and writes one
//! PNG into the requested directory, silently replacing any existing figure
//! of the same name.

pub mod dataset;
pub mod error;
pub mod layout;
pub mod mask;
pub mod render;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

pub use dataset::CeilometerDay;
pub use error::{QuicklookError, Result};
pub use mask::apply_qc_mask;
pub use render::{render_figure, PanelContent};

use layout::FigureLayout;

/// Colormap used when the caller does not pick one.
pub const DEFAULT_COLORMAP: &str = "jet";
/// Flags strictly above this are blanked.
pub const DEFAULT_QC_THRESHOLD: i32 = 2;

/// Caption over the quality-controlled panel.
pub const CAPTION: &str = "Attenuated backscatter coefficient (calibrated)";
/// Annotation in the lower-left corner of every figure.
pub const INSTRUMENT_LABEL: &str = "Chilbolton CL51 Ceilometer";

/// Rendering options.
#[derive(Debug, Clone)]
pub struct QuicklookOptions {
    pub colormap: String,
    pub qc_threshold: i32,
    /// Also show the raw field in a second panel below the masked one.
    pub montage: bool,
    /// Annotation text in the lower-left corner.
    pub instrument_label: String,
}

impl Default for QuicklookOptions {
    fn default() -> Self {
        Self {
            colormap: DEFAULT_COLORMAP.to_string(),
            qc_threshold: DEFAULT_QC_THRESHOLD,
            montage: false,
            instrument_label: INSTRUMENT_LABEL.to_string(),
        }
    }
}

/// Render one day file and write the figure into `figpath`.
///
/// Returns the path of the written PNG. Any failure, from a malformed file
/// to an unwritable directory, aborts the whole figure.
pub fn make_quicklook(
    input: impl AsRef<Path>,
    figpath: impl AsRef<Path>,
    options: &QuicklookOptions,
) -> Result<PathBuf> {
    let input = input.as_ref();
    let figpath = figpath.as_ref();
    info!(
        input = %input.display(),
        figpath = %figpath.display(),
        colormap = %options.colormap,
        qc_threshold = options.qc_threshold,
        montage = options.montage,
        "rendering quicklook"
    );

    let day = CeilometerDay::load(input)?;
    let masked = apply_qc_mask(&day.backscatter, &day.qc_flag, options.qc_threshold);
    let colormap = renderer::by_name(&options.colormap)?;
    let title = day.times[0].format("%d-%b-%Y").to_string();

    let (layout, panels) = panel_stack(&masked, &day.backscatter, &title, options.montage);
    let canvas = render_figure(&day, &panels, &layout, colormap, &options.instrument_label)?;
    let png = renderer::encode_canvas(&canvas)?;

    let output = output_path(input, figpath);
    fs::write(&output, &png)?;
    info!(output = %output.display(), bytes = png.len(), "wrote quicklook");
    Ok(output)
}

/// Assemble the figure layout and panel contents.
///
/// The masked field always comes first, captioned and dated. In montage
/// mode the raw field follows below, repeating the date title so each
/// panel stands alone.
pub fn panel_stack<'a>(
    masked: &'a [f64],
    raw: &'a [f64],
    title: &'a str,
    montage: bool,
) -> (FigureLayout, Vec<PanelContent<'a>>) {
    let masked_panel = PanelContent {
        values: masked,
        caption: Some(CAPTION),
        title: Some(title),
    };
    if montage {
        let raw_panel = PanelContent {
            values: raw,
            caption: None,
            title: Some(title),
        };
        (FigureLayout::montage(), vec![masked_panel, raw_panel])
    } else {
        (FigureLayout::single(), vec![masked_panel])
    }
}

/// Output filename: the input's name with a trailing `.nc` swapped for
/// `.png` (appended when the input has some other name), in `figpath`.
pub fn output_path(input: &Path, figpath: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let png_name = match name.strip_suffix(".nc") {
        Some(stem) => format!("{stem}.png"),
        None => format!("{name}.png"),
    };
    figpath.join(png_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_swaps_nc_for_png() {
        let out = output_path(
            Path::new("/data/ncas-ceilometer-3_20240301.nc"),
            Path::new("/figs"),
        );
        assert_eq!(out, PathBuf::from("/figs/ncas-ceilometer-3_20240301.png"));
    }

    #[test]
    fn output_name_appends_for_other_extensions() {
        let out = output_path(Path::new("day.dat"), Path::new("."));
        assert_eq!(out, PathBuf::from("./day.dat.png"));
    }

    #[test]
    fn montage_stack_titles_both_panels() {
        let masked = [f64::NAN, 1e-6];
        let raw = [2e-6, 1e-6];
        let (_, panels) = panel_stack(&masked, &raw, "01-Mar-2024", true);
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].title, Some("01-Mar-2024"));
        assert_eq!(panels[1].title, Some("01-Mar-2024"));
        assert_eq!(panels[0].caption, Some(CAPTION));
        assert_eq!(panels[1].caption, None);
    }

    #[test]
    fn single_stack_has_one_panel() {
        let values = [1e-6];
        let (_, panels) = panel_stack(&values, &values, "01-Mar-2024", false);
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].title, Some("01-Mar-2024"));
    }
}
