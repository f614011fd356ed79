use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use num_complex::Complex64;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hypertile",
    version,
    about = "Render a Schwarz {p,q} tessellation of the Poincare disk to PNG"
)]
pub struct Config {
    /// Polygon sides.
    #[arg(long)]
    pub p: u32,

    /// Polygons meeting at each vertex; negative means infinity.
    #[arg(long)]
    pub q: i64,

    #[arg(long, default_value_t = 512)]
    pub size: u32,

    /// Source texture mapped onto each tile.
    #[arg(long, value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Use the upper-half-plane conformal view instead of the direct disk view.
    #[arg(long, default_value_t = false)]
    pub half_plane: bool,

    /// Mobius transform parameter applied after mapping.
    #[arg(long, value_name = "RE,IM", value_parser = parse_complex)]
    pub mobius: Option<Complex64>,

    /// Suppress reflection parity, producing a purely rotational coloring.
    #[arg(long, default_value_t = false)]
    pub polygon: bool,

    #[arg(long, default_value_t = 100)]
    pub max_iterations: u32,

    #[arg(long, default_value_t = 1.0)]
    pub zoom: f64,

    #[arg(long, value_name = "RE,IM", value_parser = parse_complex, default_value = "0,0")]
    pub translate: Complex64,

    /// Interleave two inversion circles per wedge; requires even p.
    #[arg(long, default_value_t = false)]
    pub alternating: bool,

    /// Render at size * N and downsample.
    #[arg(long, default_value_t = 1)]
    pub oversampling: u32,

    #[arg(long, default_value = "#FF3333")]
    pub even_color: String,

    #[arg(long, default_value = "#000000")]
    pub odd_color: String,

    #[arg(long, value_name = "PNG", default_value = "tiling.png")]
    pub out: PathBuf,
}

impl Config {
    /// Range checks; the hyperbolicity and alternating-parity rules live
    /// in [`crate::geometry::Geometry::new`].
    pub fn validate(&self) -> Result<()> {
        if self.p < 3 {
            bail!("--p must be >= 3");
        }
        if self.q >= 0 && self.q > i64::from(u32::MAX) {
            bail!("--q is out of range");
        }
        if self.size == 0 {
            bail!("--size must be >= 1");
        }
        if self.max_iterations == 0 {
            bail!("--max-iterations must be >= 1");
        }
        if self.oversampling == 0 {
            bail!("--oversampling must be >= 1");
        }
        if self.zoom == 0.0 {
            bail!("--zoom must be non-zero");
        }
        Ok(())
    }
}

fn parse_complex(s: &str) -> Result<Complex64, String> {
    let (re, im) = s
        .split_once(',')
        .ok_or_else(|| format!("expected RE,IM, got '{s}'"))?;
    let re: f64 = re
        .trim()
        .parse()
        .map_err(|_| format!("bad real part '{re}'"))?;
    let im: f64 = im
        .trim()
        .parse()
        .map_err(|_| format!("bad imaginary part '{im}'"))?;
    Ok(Complex64::new(re, im))
}
