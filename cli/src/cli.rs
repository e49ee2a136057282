use std::path::PathBuf;

use clap::Parser;

/// Turns a grayscale heightmap image into an error-bounded triangle mesh.
#[derive(Parser, Debug)]
#[command(name = "reliefmesh", version, about)]
pub struct Cli {
    /// Input heightmap image (any format the `image` crate can decode).
    pub infile: PathBuf,

    /// Output mesh path; extension (.stl or .obj, case-insensitive) selects the writer.
    pub outfile: Option<PathBuf>,

    /// Physical X size of the output mesh. Defaults to the image width in pixels.
    #[arg(long)]
    pub xsize: Option<f64>,

    /// Physical Y size of the output mesh. Defaults to the image height in pixels.
    #[arg(long)]
    pub ysize: Option<f64>,

    /// Physical Z scale applied to normalised [0,1] elevations.
    #[arg(long)]
    pub zscale: f64,

    /// Maximum allowed per-pixel error, as a fraction of the [0,1] elevation range.
    #[arg(long, default_value_t = 0.001)]
    pub error: f64,

    /// Maximum triangle count (0 = unbounded).
    #[arg(long, default_value_t = 0)]
    pub triangles: usize,

    /// Maximum vertex count (0 = unbounded).
    #[arg(long, default_value_t = 0)]
    pub points: usize,

    /// Extrude a closed solid base this far below the lowest point (0 = surface only).
    #[arg(long, default_value_t = 0.0)]
    pub base: f64,

    /// Auto-level: rescale sample range so darkest -> 0.0 and lightest -> 1.0.
    #[arg(long)]
    pub level: bool,

    /// Invert elevations (z' = 1 - z).
    #[arg(long)]
    pub invert: bool,

    /// Gaussian blur standard deviation applied before triangulation (0 = off).
    #[arg(long, default_value_t = 0.0)]
    pub blur: f64,

    /// Gamma curve applied to samples (1.0 = off).
    #[arg(long, default_value_t = 1.0)]
    pub gamma: f64,

    /// Width in pixels of an added flat border (0 = off).
    #[arg(long = "border-size", default_value_t = 0)]
    pub border_size: u32,

    /// Elevation (fraction of [0,1]) of the added border.
    #[arg(long = "border-height", default_value_t = 0.0)]
    pub border_height: f64,

    /// Write a normal-map PNG to this path.
    #[arg(long = "normal-map")]
    pub normal_map: Option<PathBuf>,

    /// Write a hillshade PNG to this path.
    #[arg(long = "shade-path")]
    pub shade_path: Option<PathBuf>,

    /// Hillshade light source altitude, in degrees above the horizon.
    #[arg(long = "shade-alt", default_value_t = 45.0)]
    pub shade_alt: f64,

    /// Hillshade light source azimuth, in degrees clockwise from north.
    #[arg(long = "shade-az", default_value_t = 315.0)]
    pub shade_az: f64,

    /// Suppress progress logging.
    #[arg(long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_required_arguments() {
        let cli = Cli::try_parse_from(["reliefmesh", "in.png", "out.stl", "--zscale", "10"]).unwrap();
        assert_eq!(cli.infile, PathBuf::from("in.png"));
        assert_eq!(cli.outfile, Some(PathBuf::from("out.stl")));
        assert_eq!(cli.zscale, 10.0);
        assert_eq!(cli.error, 0.001);
        assert!(!cli.quiet);
    }

    #[test]
    fn missing_zscale_is_rejected() {
        assert!(Cli::try_parse_from(["reliefmesh", "in.png"]).is_err());
    }

    #[test]
    fn flags_and_named_options_parse_together() {
        let cli = Cli::try_parse_from([
            "reliefmesh",
            "in.png",
            "--zscale",
            "5",
            "--invert",
            "--level",
            "--blur",
            "1.5",
            "--border-size",
            "4",
            "--border-height",
            "0.0",
        ])
        .unwrap();
        assert!(cli.invert);
        assert!(cli.level);
        assert_eq!(cli.blur, 1.5);
        assert_eq!(cli.border_size, 4);
        assert_eq!(cli.outfile, None);
    }
}
