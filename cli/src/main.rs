//! Command-line front end for the quicklook renderer.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use quicklook::{make_quicklook, QuicklookOptions, DEFAULT_COLORMAP, DEFAULT_QC_THRESHOLD};

#[derive(Parser, Debug)]
#[command(name = "make_quicklook")]
#[command(about = "Render a daily ceilometer backscatter quicklook")]
struct Args {
    /// Input day file (classic NetCDF)
    #[arg(short = 'i', long = "ifile")]
    ifile: String,

    /// Directory the figure is written into
    #[arg(short = 'p', long = "figpath")]
    figpath: PathBuf,

    /// Colormap name
    #[arg(short = 'c', long = "colormap", default_value = DEFAULT_COLORMAP)]
    colormap: String,

    /// Blank cells whose quality flag exceeds this value
    #[arg(short = 'q', long = "qcthreshold", default_value_t = DEFAULT_QC_THRESHOLD)]
    qcthreshold: i32,

    /// Also plot the raw field in a second panel
    #[arg(short = 'm', long = "montage")]
    montage: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.ifile.is_empty() {
        info!("operation disabled: no input file given");
        return Ok(());
    }

    info!("Input file is {}", args.ifile);
    info!("Figure path is {}", args.figpath.display());

    let options = QuicklookOptions {
        colormap: args.colormap,
        qc_threshold: args.qcthreshold,
        montage: args.montage,
        ..QuicklookOptions::default()
    };
    let output = make_quicklook(&args.ifile, &args.figpath, &options)?;
    info!("Figure written to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_documented_flags() {
        let args = Args::try_parse_from([
            "make_quicklook",
            "-i",
            "day.nc",
            "-p",
            "/figs",
            "-c",
            "viridis",
            "-q",
            "1",
            "-m",
        ])
        .unwrap();
        assert_eq!(args.ifile, "day.nc");
        assert_eq!(args.colormap, "viridis");
        assert_eq!(args.qcthreshold, 1);
        assert!(args.montage);
    }

    #[test]
    fn rejects_flags_outside_the_surface() {
        let result = Args::try_parse_from([
            "make_quicklook",
            "-i",
            "day.nc",
            "-p",
            "/figs",
            "--log-level",
            "debug",
        ]);
        assert!(result.is_err());
    }
}
