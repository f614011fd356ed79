//! Per-pixel pipeline and its parallel driver.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use image::RgbaImage;
use image::imageops::{self, FilterType};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::color::{Palette, Rgba};
use crate::config::Config;
use crate::geometry::{self, Geometry, Reduction, Viewport};
use crate::texture::Texture;

/// Everything one render reads: immutable after construction, shared by
/// every worker thread.
#[derive(Debug)]
pub struct Scene {
    pub geometry: Geometry,
    pub viewport: Viewport,
    pub mobius: Option<Complex64>,
    pub texture: Option<Texture>,
    pub palette: Palette,
}

/// One relaxed increment per affected pixel is the only hot-path write.
#[derive(Debug, Default)]
pub struct RenderStats {
    pub nonconvergent: u64,
    pub escaped: u64,
}

impl Scene {
    /// Build a scene from CLI arguments; all fatal validation happens here,
    /// before any pixel work.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let geometry = Geometry::new(
            cfg.p,
            cfg.q,
            cfg.alternating,
            cfg.polygon,
            cfg.max_iterations,
        )?;
        let palette = Palette {
            even: Rgba::from_hex(&cfg.even_color)?,
            odd: Rgba::from_hex(&cfg.odd_color)?,
            ..Palette::default()
        };
        let texture = match &cfg.image {
            Some(path) => {
                let img = image::open(path)
                    .with_context(|| format!("read texture {}", path.display()))?;
                Some(Texture::from_rgba8(img.to_rgba8()))
            }
            None => None,
        };
        let viewport = if cfg.half_plane {
            Viewport::HalfPlane
        } else {
            Viewport::Affine {
                zoom: cfg.zoom,
                translate: cfg.translate,
            }
        };
        Ok(Self {
            geometry,
            viewport,
            mobius: cfg.mobius,
            texture,
            palette,
        })
    }

    /// Map one pixel into the disk and fold it; `None` when the pixel
    /// falls outside the unit disk.
    pub fn trace(&self, x: u32, y: u32, size: u32) -> Option<Reduction> {
        let mut z = self.viewport.to_disk(x, y, size)?;
        if let Some(m) = self.mobius {
            z = geometry::mobius(z, m);
        }
        Some(self.geometry.reduce(z))
    }

    /// Color one pixel of a `size`-pixel render. Pure in the scene, so
    /// rows can be shaded on any thread.
    pub fn shade(&self, x: u32, y: u32, size: u32) -> Rgba {
        self.shade_traced(x, y, size).0
    }

    fn shade_traced(&self, x: u32, y: u32, size: u32) -> (Rgba, Option<Reduction>) {
        match self.trace(x, y, size) {
            Some(fold) => (self.resolve(&fold), Some(fold)),
            None => (self.palette.background, None),
        }
    }

    fn resolve(&self, fold: &Reduction) -> Rgba {
        if fold.escaped {
            return self.palette.escaped;
        }
        if fold.nonconvergent {
            return match &self.texture {
                Some(tex) => tex.average(),
                None => self.palette.nonconvergent,
            };
        }
        match &self.texture {
            Some(tex) => {
                let sector = self.geometry.input_sector();
                let tx = fold.z.re / sector * f64::from(tex.width());
                let ty = fold.z.im / sector * f64::from(tex.height());
                tex.bilinear(tx, ty).unwrap_or_else(|| tex.average())
            }
            None if fold.parity % 2 == 0 => self.palette.even,
            None => self.palette.odd,
        }
    }
}

/// Render the scene at `size * oversampling` pixels per side and, when the
/// factor exceeds one, downsample to `size x size` with a Lanczos3 filter.
pub fn render_image(scene: &Scene, size: u32, oversampling: u32) -> (RgbaImage, RenderStats) {
    let raster = size * oversampling.max(1);
    let mut buf = vec![0u8; raster as usize * raster as usize * 4];
    let nonconvergent = AtomicU64::new(0);
    let escaped = AtomicU64::new(0);

    let row_stride = raster as usize * 4;
    buf.par_chunks_mut(row_stride).enumerate().for_each(|(y, row)| {
        for x in 0..raster {
            let (color, fold) = scene.shade_traced(x, y as u32, raster);
            if let Some(fold) = fold {
                if fold.nonconvergent {
                    nonconvergent.fetch_add(1, Ordering::Relaxed);
                }
                if fold.escaped {
                    escaped.fetch_add(1, Ordering::Relaxed);
                }
            }
            let idx = x as usize * 4;
            row[idx] = color.r;
            row[idx + 1] = color.g;
            row[idx + 2] = color.b;
            row[idx + 3] = color.a;
        }
    });

    let full = RgbaImage::from_raw(raster, raster, buf)
        .unwrap_or_else(|| RgbaImage::new(raster, raster));
    let out = if oversampling > 1 {
        imageops::resize(&full, size, size, FilterType::Lanczos3)
    } else {
        full
    };
    let stats = RenderStats {
        nonconvergent: nonconvergent.into_inner(),
        escaped: escaped.into_inner(),
    };
    (out, stats)
}

pub fn run(cfg: &Config) -> Result<()> {
    cfg.validate()?;
    let scene = Scene::from_config(cfg)?;
    let started = Instant::now();
    let (img, stats) = render_image(&scene, cfg.size, cfg.oversampling);
    img.save(&cfg.out)
        .with_context(|| format!("write output image {}", cfg.out.display()))?;
    println!(
        "rendered {{{},{}}} at {}x{} (oversampling {}, {} nonconvergent px, {:.2}s) -> {}",
        cfg.p,
        cfg.q,
        cfg.size,
        cfg.size,
        cfg.oversampling,
        stats.nonconvergent,
        started.elapsed().as_secs_f32(),
        cfg.out.display()
    );
    Ok(())
}
